//! Process-wide cache of derived operator tables.
//!
//! Deriving a table is expensive compared to using it, and a table only depends on the problem
//! class and the interpolation order. Tables are derived on first use and kept for the lifetime
//! of the process.
use crate::operators::OperatorTable;
use crate::weak_form::{derive_operators, WeakForm};
use log::debug;
use parking_lot::RwLock;
use rustc_hash::FxHashMap;
use std::any::TypeId;
use std::sync::{Arc, OnceLock};

type CacheKey = (TypeId, usize);

static OPERATOR_TABLES: OnceLock<RwLock<FxHashMap<CacheKey, Arc<OperatorTable>>>> = OnceLock::new();

fn tables() -> &'static RwLock<FxHashMap<CacheKey, Arc<OperatorTable>>> {
    OPERATOR_TABLES.get_or_init(Default::default)
}

/// Returns the operator table of `P` at the given order, deriving it on a cache miss.
pub fn cached_operators<P: WeakForm>(order: usize) -> Arc<OperatorTable> {
    let key = (TypeId::of::<P>(), order);
    if let Some(table) = tables().read().get(&key) {
        return Arc::clone(table);
    }

    let mut tables_mut = tables().write();
    // Another thread may have derived the table while we waited for the write lock
    let table = tables_mut.entry(key).or_insert_with(|| {
        debug!("Deriving operators for {} at order {}", P::NAME, order);
        Arc::new(derive_operators::<P>(order))
    });
    Arc::clone(table)
}

/// Number of tables currently cached.
pub fn cached_table_count() -> usize {
    tables().read().len()
}

//! Concrete boundary value problems.
use crate::operators::ParametricValue;
use crate::weak_form::{EssentialCondition, Integrand, PointwiseForm, WeakForm};

/// Steady heat conduction `u'' = 0` on `[0, 1]` with `u(0) = 1` and `u(1) = 0`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct HeatEquation;

impl WeakForm for HeatEquation {
    const NAME: &'static str = "heat equation";

    fn integrand(_x: f64, _u: f64, du: f64, _parameters: &[f64]) -> Integrand {
        Integrand {
            flux: -du,
            flux_du: -1.0,
            ..Integrand::default()
        }
    }

    fn essential_conditions() -> Vec<EssentialCondition> {
        vec![EssentialCondition::value_at(0.0, 1.0), EssentialCondition::value_at(1.0, 0.0)]
    }

    fn exact_solution(x: f64, _parameters: &[f64]) -> Option<f64> {
        Some(1.0 - x)
    }
}

/// Flat interface of the Ginzburg-Landau model, `a u + g u^3 - K u'' = 0`, with parameters
/// `[a, g, K]` where `a < 0` and `g, K > 0`.
///
/// The solution switches between the two bulk phases `∓sqrt(-a / g)` around the origin. The domain
/// extends 25 interfacial widths to either side.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct GinzburgLandauFlatInterface;

impl GinzburgLandauFlatInterface {
    /// Bulk value `sqrt(-a / g)` of the ordered phase.
    pub fn binodal(parameters: &[f64]) -> f64 {
        let (a, g) = (parameters[0], parameters[1]);
        (-a / g).sqrt()
    }

    pub fn interfacial_width(parameters: &[f64]) -> f64 {
        let (a, k) = (parameters[0], parameters[2]);
        (-k / (2.0 * a)).sqrt()
    }

    /// Half-width `L` of the domain `[-L, L]`.
    pub fn domain_size(parameters: &[f64]) -> f64 {
        25.0 * Self::interfacial_width(parameters)
    }

    fn natural(_x: f64, _u: f64, du: f64, parameters: &[f64]) -> Integrand {
        let k = parameters[2];
        Integrand {
            source: -k * du,
            source_du: -k,
            ..Integrand::default()
        }
    }
}

impl WeakForm for GinzburgLandauFlatInterface {
    const NAME: &'static str = "Ginzburg-Landau flat interface";
    const PARAMETERS: &'static [&'static str] = &["a", "g", "K"];

    fn integrand(_x: f64, u: f64, du: f64, parameters: &[f64]) -> Integrand {
        let (a, g, k) = (parameters[0], parameters[1], parameters[2]);
        Integrand {
            source: a * u + g * u * u * u,
            flux: k * du,
            source_u: a + 3.0 * g * u * u,
            flux_du: k,
            ..Integrand::default()
        }
    }

    fn natural_term() -> Option<PointwiseForm> {
        Some(Self::natural)
    }

    fn essential_conditions() -> Vec<EssentialCondition> {
        vec![
            EssentialCondition::value_at(
                ParametricValue::Parametric(|p| -GinzburgLandauFlatInterface::domain_size(p)),
                ParametricValue::Parametric(|p| -GinzburgLandauFlatInterface::binodal(p)),
            ),
            EssentialCondition::value_at(0.0, 0.0),
            EssentialCondition::value_at(
                ParametricValue::Parametric(GinzburgLandauFlatInterface::domain_size),
                ParametricValue::Parametric(GinzburgLandauFlatInterface::binodal),
            ),
        ]
    }

    fn exact_solution(x: f64, parameters: &[f64]) -> Option<f64> {
        let (a, k) = (parameters[0], parameters[2]);
        let width = (-2.0 * k / a).sqrt();
        Some(Self::binodal(parameters) * (x / width).tanh())
    }
}

/// Nonlinear reaction-diffusion `u'' = lambda u^3` on `[0, 1]` with `u(0) = 1` and `u(1) = 0`,
/// parameters `[lambda]`.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct CubicReactionDiffusion;

impl CubicReactionDiffusion {
    fn natural(_x: f64, _u: f64, du: f64, _parameters: &[f64]) -> Integrand {
        Integrand {
            source: du,
            source_du: 1.0,
            ..Integrand::default()
        }
    }
}

impl WeakForm for CubicReactionDiffusion {
    const NAME: &'static str = "cubic reaction-diffusion";
    const PARAMETERS: &'static [&'static str] = &["lambda"];

    fn integrand(_x: f64, u: f64, du: f64, parameters: &[f64]) -> Integrand {
        let lambda = parameters[0];
        Integrand {
            source: -lambda * u * u * u,
            flux: -du,
            source_u: -3.0 * lambda * u * u,
            flux_du: -1.0,
            ..Integrand::default()
        }
    }

    fn natural_term() -> Option<PointwiseForm> {
        Some(Self::natural)
    }

    fn essential_conditions() -> Vec<EssentialCondition> {
        vec![EssentialCondition::value_at(0.0, 1.0), EssentialCondition::value_at(1.0, 0.0)]
    }
}

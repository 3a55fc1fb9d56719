//! Velocity-space integration of the Galactic macro flux.
//!
//! Given a one-dimensional [`VelocityAxis`] (reused for vx, vy, and vz) and the
//! halo kinematics, [`VelocityGridIntegrator`] produces the cumulative
//! detectable-mass sequence and the per-sample minimum cross-section sequence
//! that together trace an exclusion curve.

pub mod axis;
pub mod distribution;
pub mod grid;
pub mod params;

pub use axis::VelocityAxis;
pub use distribution::{BinnedMaxwellian, VelocityDistribution, maxwellian_weight};
pub use grid::{
    CrossSectionIntegration, CrossSectionSample, Execution, ExclusionCurve, MassIntegration,
    MassSample, RunningState, VelocityGridIntegrator,
};
pub use params::{InteractionParameters, KinematicParameters};

use macro_core::QuantityError;
use thiserror::Error;

/// Errors raised while validating an integration run. Nothing fails mid-walk.
#[derive(Debug, Error)]
pub enum IntegrationError {
    #[error("velocity axis needs at least two samples, got {0}")]
    AxisTooShort(usize),
    #[error("velocity axis has a zero step")]
    ZeroStep,
    #[error("velocity axis is not evenly spaced: step {index} is {found}, previous step is {expected}")]
    UnevenAxis {
        index: usize,
        expected: f64,
        found: f64,
    },
    #[error("{name} must be {requirement} (got {value})")]
    OutOfDomain {
        name: &'static str,
        value: f64,
        requirement: &'static str,
    },
    #[error("{name} must be finite (got {value})")]
    NonFinite { name: &'static str, value: f64 },
    #[error(transparent)]
    Quantity(#[from] QuantityError),
}

/// Coarse classification of [`IntegrationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
    /// The inputs are individually valid but do not describe a usable grid.
    Configuration,
    /// A value lies outside the physical domain or has the wrong dimension.
    Domain,
    /// A value could not be read as a physical quantity at all.
    Uninterpretable,
}

impl IntegrationError {
    pub fn class(&self) -> ErrorClass {
        match self {
            IntegrationError::AxisTooShort(_)
            | IntegrationError::ZeroStep
            | IntegrationError::UnevenAxis { .. } => ErrorClass::Configuration,
            IntegrationError::OutOfDomain { .. }
            | IntegrationError::NonFinite { .. }
            | IntegrationError::Quantity(QuantityError::IncompatibleUnits { .. }) => {
                ErrorClass::Domain
            }
            IntegrationError::Quantity(
                QuantityError::UnknownUnit(_) | QuantityError::Uninterpretable(_),
            ) => ErrorClass::Uninterpretable,
        }
    }
}

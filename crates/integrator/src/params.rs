//! Kinematic and interaction inputs of an integration run.

use macro_core::constants::{
    AREA_DENSITY_G_S_PER_M, CIRCULAR_KM_S, EARTH_INFALL_KM_S, GALACTIC_ESCAPE_KM_S,
    MIN_SIGMA_CM2, VIRIAL_KM_S,
};
use macro_core::{Dimension, Quantity, Unit};
use serde::{Deserialize, Serialize};

use crate::IntegrationError;

/// Galactic kinematics of the macro population, fixed for a whole run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinematicParameters {
    /// Virial velocity of the halo distribution.
    pub virial: Quantity,
    /// Galactocentric escape velocity, the acceptance bound of the grid walk.
    pub escape: Quantity,
    /// Galactic circular velocity, subtracted from the y component.
    pub circular: Quantity,
    /// Minimum infall velocity onto the Earth.
    pub infall: Quantity,
}

impl Default for KinematicParameters {
    fn default() -> Self {
        Self {
            virial: Quantity::new(VIRIAL_KM_S, Unit::KM_PER_S),
            escape: Quantity::new(GALACTIC_ESCAPE_KM_S, Unit::KM_PER_S),
            circular: Quantity::new(CIRCULAR_KM_S, Unit::KM_PER_S),
            infall: Quantity::new(EARTH_INFALL_KM_S, Unit::KM_PER_S),
        }
    }
}

/// Validated kinematics in SI (m/s).
#[derive(Debug, Clone, Copy)]
pub(crate) struct Kinematics {
    pub virial: f64,
    pub escape: f64,
    pub circular: f64,
    pub infall: f64,
}

impl KinematicParameters {
    pub(crate) fn resolve(&self) -> Result<Kinematics, IntegrationError> {
        let virial = speed("virial velocity", self.virial)?;
        let escape = speed("escape velocity", self.escape)?;
        let circular = speed("circular velocity", self.circular)?;
        let infall = speed("infall velocity", self.infall)?;
        positive("virial velocity", virial)?;
        positive("escape velocity", escape)?;
        Ok(Kinematics {
            virial,
            escape,
            circular,
            infall,
        })
    }
}

/// Detector and cross-section model of a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InteractionParameters {
    /// Detector area times local dark-matter density (`Arho`).
    pub area_density: Quantity,
    /// Floor applied to every emitted cross-section.
    pub min_sigma: Quantity,
    /// Numerator of `sigma_factor / vrel^2`.
    pub sigma_factor: Quantity,
    #[serde(with = "unit_symbol")]
    pub mass_unit: Unit,
    #[serde(with = "unit_symbol")]
    pub sigma_unit: Unit,
}

impl InteractionParameters {
    /// Default detector (`Arho = 3 g s / m`, floor `6e-8 cm^2`, grams and cm^2 out).
    pub fn new(sigma_factor: Quantity) -> Self {
        Self {
            area_density: Quantity::new(AREA_DENSITY_G_S_PER_M, Unit::G_S_PER_M),
            min_sigma: Quantity::new(MIN_SIGMA_CM2, Unit::CM2),
            sigma_factor,
            mass_unit: Unit::G,
            sigma_unit: Unit::CM2,
        }
    }
}

pub(crate) fn speed(name: &'static str, q: Quantity) -> Result<f64, IntegrationError> {
    finite(name, q.require(Dimension::SPEED)?.si_value())
}

pub(crate) fn finite(name: &'static str, value: f64) -> Result<f64, IntegrationError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(IntegrationError::NonFinite { name, value })
    }
}

pub(crate) fn positive(name: &'static str, value: f64) -> Result<f64, IntegrationError> {
    if value > 0.0 {
        Ok(value)
    } else {
        Err(IntegrationError::OutOfDomain {
            name,
            value,
            requirement: "positive",
        })
    }
}

pub(crate) fn non_negative(name: &'static str, value: f64) -> Result<f64, IntegrationError> {
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(IntegrationError::OutOfDomain {
            name,
            value,
            requirement: "non-negative",
        })
    }
}

mod unit_symbol {
    use macro_core::Unit;
    use serde::{Deserialize, Deserializer, Serializer, de::Error};

    pub fn serialize<S: Serializer>(unit: &Unit, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(unit.symbol)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Unit, D::Error> {
        let symbol = String::deserialize(deserializer)?;
        Unit::parse(&symbol).map_err(D::Error::custom)
    }
}

//! Velocity distributions used to weight grid samples.

use std::f64::consts::PI;

use macro_core::{Dimension, Quantity};

use crate::IntegrationError;

/// Probability weight of a velocity bin.
///
/// Arguments share one unit system; the integrator always passes SI values
/// that have already been validated (`virial > 0`, `bin_width > 0`).
pub trait VelocityDistribution {
    fn weight(&self, speed: f64, bin_width: f64, virial: f64) -> f64;
}

/// Binned Maxwell-Boltzmann weight of the Galactic halo (Sidhu & Starkman 2019, eq. 3):
///
/// `(bin / vvir)^3 / pi^(3/2) * exp(-(v / vvir)^2)`
#[derive(Debug, Clone, Copy, Default)]
pub struct BinnedMaxwellian;

impl VelocityDistribution for BinnedMaxwellian {
    #[inline]
    fn weight(&self, speed: f64, bin_width: f64, virial: f64) -> f64 {
        let norm = (bin_width / virial).powi(3) / PI.powf(1.5);
        norm * (-(speed / virial).powi(2)).exp()
    }
}

/// Dimension-checked form of [`BinnedMaxwellian`].
pub fn maxwellian_weight(
    speed: Quantity,
    bin_width: Quantity,
    virial: Quantity,
) -> Result<f64, IntegrationError> {
    let speed = speed.require(Dimension::SPEED)?.si_value();
    let bin_width = bin_width.require(Dimension::SPEED)?.si_value();
    let virial = virial.require(Dimension::SPEED)?.si_value();
    if virial.is_nan() || virial <= 0.0 {
        return Err(IntegrationError::OutOfDomain {
            name: "virial velocity",
            value: virial,
            requirement: "positive",
        });
    }
    Ok(BinnedMaxwellian.weight(speed, bin_width, virial))
}

#[cfg(test)]
mod tests {
    use super::*;
    use macro_core::Unit;

    fn kms(v: f64) -> Quantity {
        Quantity::new(v, Unit::KM_PER_S)
    }

    #[test]
    fn weight_at_rest_is_the_normalisation() {
        let w = maxwellian_weight(kms(0.0), kms(250.0), kms(250.0)).unwrap();
        assert!((w - 1.0 / PI.powf(1.5)).abs() < 1e-15);
    }

    #[test]
    fn weight_is_unit_independent() {
        let a = maxwellian_weight(kms(100.0), kms(10.0), kms(250.0)).unwrap();
        let b = maxwellian_weight(
            Quantity::new(100_000.0, Unit::M_PER_S),
            Quantity::new(1.0e6, Unit::CM_PER_S),
            kms(250.0),
        )
        .unwrap();
        assert!((a - b).abs() < 1e-15 * a.abs().max(1.0));
        let expected = (10.0f64 / 250.0).powi(3) / PI.powf(1.5) * (-(0.4f64).powi(2)).exp();
        assert!((a - expected).abs() < 1e-15);
    }

    #[test]
    fn weight_decreases_with_speed() {
        let slow = BinnedMaxwellian.weight(10.0, 1.0, 250.0);
        let fast = BinnedMaxwellian.weight(500.0, 1.0, 250.0);
        assert!(slow > fast);
    }

    #[test]
    fn non_positive_virial_is_a_domain_error() {
        let err = maxwellian_weight(kms(1.0), kms(1.0), kms(0.0)).unwrap_err();
        assert_eq!(err.class(), crate::ErrorClass::Domain);
        assert!(maxwellian_weight(kms(1.0), kms(1.0), kms(-5.0)).is_err());
        assert!(maxwellian_weight(kms(1.0), Quantity::new(1.0, Unit::G), kms(250.0)).is_err());
    }
}

//! Core units, constants, and shared primitives for the macro_lightning workspace.

pub mod quantity;

pub use quantity::{Dimension, Quantity, QuantityError, Unit};

/// Reference values used across crates. Speeds are in km/s unless stated otherwise.
pub mod constants {
    /// Escape velocity from the Sun at the orbit of the Earth (km/s).
    pub const VESC_SUN_AT_EARTH_KM_S: f64 = 42.1;

    /// Virial velocity of the Galactic dark-matter halo (km/s).
    pub const VIRIAL_KM_S: f64 = 250.0;
    /// Galactocentric escape velocity at the Sun (km/s).
    pub const GALACTIC_ESCAPE_KM_S: f64 = 550.0;
    /// Galactic circular velocity at the Sun (km/s).
    pub const CIRCULAR_KM_S: f64 = 220.0;
    /// Minimum infall velocity of a macro onto the Earth (km/s).
    pub const EARTH_INFALL_KM_S: f64 = 42.1;

    /// Detector area times local dark-matter density (g s / m).
    pub const AREA_DENSITY_G_S_PER_M: f64 = 3.0;
    /// Cross-section floor (cm^2).
    pub const MIN_SIGMA_CM2: f64 = 6e-8;

    /// Seed of the relative-velocity ratchet before any grid sample is accepted (km/s).
    pub const DEFAULT_VHOLD_KM_S: f64 = 800.0;
}

/// Minimal vector helpers to avoid ad-hoc `[f64; 3]` math everywhere.
pub mod vector {
    /// Alias for a 3D velocity vector, in whatever unit the caller works in.
    pub type Vector3 = [f64; 3];

    /// Euclidean norm over any number of components.
    #[inline]
    pub fn norm(components: &[f64]) -> f64 {
        components.iter().map(|c| c * c).sum::<f64>().sqrt()
    }

    /// Euclidean norm of a pair, the combining step of compound escape velocities.
    #[inline]
    pub fn norm2(a: f64, b: f64) -> f64 {
        (a * a + b * b).sqrt()
    }

    /// Euclidean norm of a 3D vector.
    #[inline]
    pub fn norm3(v: &Vector3) -> f64 {
        norm(v)
    }
}

#[cfg(test)]
mod tests {
    use super::vector;

    #[test]
    fn norm_handles_scalars_and_pairs() {
        assert_eq!(vector::norm(&[-2.0]), 2.0);
        assert_eq!(vector::norm(&[3.0, 4.0]), 5.0);
        assert_eq!(vector::norm2(3.0, 4.0), 5.0);
        assert_eq!(vector::norm3(&[2.0, 3.0, 6.0]), 7.0);
        assert_eq!(vector::norm(&[]), 0.0);
    }
}

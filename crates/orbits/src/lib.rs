//! Compound escape velocities for a body orbiting a second body orbiting a third, and so on.
//!
//! Leaving body 1 at its escape velocity `ve1` still leaves the traveller bound to body 2,
//! moving with body 1's orbital speed `vo`. The excess needed to escape body 2 is
//! `ve2 - vo`, so the total is `sqrt(ve1^2 + (ve2 - vo)^2)`. For a circular orbit
//! `vo = ve2 / sqrt(2)`, i.e. the correction factor is `1 - 1/sqrt(2) ~ 0.2929`.
use std::f64::consts::SQRT_2;

use macro_core::constants::VESC_SUN_AT_EARTH_KM_S;
use macro_core::vector::norm2;
use macro_core::{Dimension, Quantity, QuantityError, Unit};
use thiserror::Error;

/// Fraction of an escape velocity left after subtracting a circular orbital velocity.
pub const CIRCULAR_ORBIT_FACTOR: f64 = 1.0 - 1.0 / SQRT_2;

#[derive(Debug, Error)]
pub enum EscapeError {
    #[error("at least one escape velocity is required")]
    Empty,
    #[error("expected {expected} orbital velocities for {bodies} bodies, got {found}")]
    OrbitalLengthMismatch {
        bodies: usize,
        expected: usize,
        found: usize,
    },
    #[error(transparent)]
    Quantity(#[from] QuantityError),
}

/// Whether to reduce a body chain to its total escape velocity or keep every prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Composition {
    Total,
    Accumulate,
}

/// Result of [`multi_body`].
#[derive(Debug, Clone, PartialEq)]
pub enum CompoundEscape {
    Total(Quantity),
    /// One compound velocity per prefix of the body chain, innermost first.
    Accumulated(Vec<Quantity>),
}

impl CompoundEscape {
    /// Escape velocity of the full chain.
    pub fn total(&self) -> Quantity {
        match self {
            CompoundEscape::Total(q) => *q,
            // Accumulated chains are never empty: `multi_body` rejects empty input.
            CompoundEscape::Accumulated(steps) => steps[steps.len() - 1],
        }
    }
}

/// Two-body escape velocity. `vo = None` assumes a circular orbit of body 1 around body 2.
///
/// The result is expressed in the unit of `ve1`.
pub fn two_body(ve1: Quantity, ve2: Quantity, vo: Option<Quantity>) -> Result<Quantity, QuantityError> {
    let ve1 = ve1.require(Dimension::SPEED)?;
    let ve2_si = ve2.require(Dimension::SPEED)?.si_value();
    let vo_si = match vo {
        Some(vo) => vo.require(Dimension::SPEED)?.si_value(),
        None => ve2_si / SQRT_2,
    };
    let total = norm2(ve1.si_value(), ve2_si - vo_si);
    Ok(Quantity::from_si(total, ve1.unit))
}

/// Escape velocity of a chain of bodies, ordered from the innermost body outwards.
///
/// `orbital`, when given, holds the orbital velocity of body `i` around body `i + 1`
/// and must have one entry fewer than `escapes`. Without it every orbit is circular.
pub fn multi_body(
    escapes: &[Quantity],
    orbital: Option<&[Quantity]>,
    composition: Composition,
) -> Result<CompoundEscape, EscapeError> {
    let first = escapes.first().ok_or(EscapeError::Empty)?;
    let unit = first.require(Dimension::SPEED)?.unit;

    if let Some(orbital) = orbital {
        let expected = escapes.len() - 1;
        if orbital.len() != expected {
            return Err(EscapeError::OrbitalLengthMismatch {
                bodies: escapes.len(),
                expected,
                found: orbital.len(),
            });
        }
    }

    let mut corrected = Vec::with_capacity(escapes.len());
    corrected.push(first.si_value());
    for (i, ve) in escapes.iter().enumerate().skip(1) {
        let ve = ve.require(Dimension::SPEED)?.si_value();
        let excess = match orbital {
            Some(orbital) => ve - orbital[i - 1].require(Dimension::SPEED)?.si_value(),
            None => ve * CIRCULAR_ORBIT_FACTOR,
        };
        corrected.push(excess);
    }

    let result = match composition {
        Composition::Total => {
            let total = corrected[1..].iter().fold(corrected[0], |acc, &v| norm2(acc, v));
            CompoundEscape::Total(Quantity::from_si(total, unit))
        }
        Composition::Accumulate => {
            let steps = corrected[1..]
                .iter()
                .scan(corrected[0], |acc, &v| {
                    *acc = norm2(*acc, v);
                    Some(*acc)
                });
            let all = std::iter::once(corrected[0]).chain(steps);
            CompoundEscape::Accumulated(all.map(|v| Quantity::from_si(v, unit)).collect())
        }
    };
    Ok(result)
}

/// Escape velocity from the Sun at heliocentric distance `r`, in km/s.
///
/// Scaled from 42.1 km/s at 1 AU with the Newtonian `v ~ r^(-1/2)` law.
pub fn vesc_sun_at(r: Quantity) -> Result<Quantity, QuantityError> {
    let au = r.require(Dimension::LENGTH)?.value_in(Unit::AU)?;
    Ok(Quantity::new(VESC_SUN_AT_EARTH_KM_S / au.sqrt(), Unit::KM_PER_S))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kms(v: f64) -> Quantity {
        Quantity::new(v, Unit::KM_PER_S)
    }

    #[test]
    fn two_body_earth_sun() {
        let v = two_body(kms(11.186), kms(42.1), None).unwrap();
        assert_eq!(v.unit, Unit::KM_PER_S);
        assert!((v.value - 16.6485836).abs() < 1e-6, "got {}", v.value);
    }

    #[test]
    fn two_body_explicit_orbit() {
        // Zero orbital speed: the full second escape velocity is needed.
        let v = two_body(kms(3.0), kms(4.0), Some(kms(0.0))).unwrap();
        assert!((v.value - 5.0).abs() < 1e-12);
    }

    #[test]
    fn two_body_converts_units() {
        let v = two_body(
            Quantity::new(11_186.0, Unit::M_PER_S),
            kms(42.1),
            None,
        )
        .unwrap();
        assert_eq!(v.unit, Unit::M_PER_S);
        assert!((v.value - 16_648.5836).abs() < 1e-3);
    }

    #[test]
    fn multi_body_earth_sun_galaxy() {
        let chain = [kms(11.186), kms(42.1), kms(550.0)];
        let total = multi_body(&chain, None, Composition::Total).unwrap().total();
        assert!((total.value - 161.94929058).abs() < 1e-6, "got {}", total.value);
    }

    #[test]
    fn multi_body_accumulates_prefixes() {
        let chain = [kms(11.186), kms(42.1), kms(550.0)];
        let CompoundEscape::Accumulated(steps) =
            multi_body(&chain, None, Composition::Accumulate).unwrap()
        else {
            panic!("expected accumulated result");
        };
        assert_eq!(steps.len(), 3);
        assert!((steps[0].value - 11.186).abs() < 1e-12);
        assert!((steps[1].value - 16.6485836).abs() < 1e-6);
        assert!((steps[2].value - 161.94929058).abs() < 1e-6);
    }

    #[test]
    fn multi_body_matches_two_body_for_pairs() {
        let pair = [kms(11.186), kms(42.1)];
        let a = multi_body(&pair, None, Composition::Total).unwrap().total();
        let b = two_body(pair[0], pair[1], None).unwrap();
        assert!((a.value - b.value).abs() < 1e-9);

        let vo = [kms(29.78)];
        let a = multi_body(&pair, Some(&vo), Composition::Total).unwrap().total();
        let b = two_body(pair[0], pair[1], Some(vo[0])).unwrap();
        assert!((a.value - b.value).abs() < 1e-9);
    }

    #[test]
    fn multi_body_validates_inputs() {
        assert!(matches!(
            multi_body(&[], None, Composition::Total),
            Err(EscapeError::Empty)
        ));
        let chain = [kms(11.186), kms(42.1), kms(550.0)];
        let vo = [kms(29.78)];
        assert!(matches!(
            multi_body(&chain, Some(&vo), Composition::Total),
            Err(EscapeError::OrbitalLengthMismatch { expected: 2, found: 1, .. })
        ));
        let bad = [kms(11.186), Quantity::new(1.0, Unit::G)];
        assert!(matches!(
            multi_body(&bad, None, Composition::Total),
            Err(EscapeError::Quantity(_))
        ));
    }

    #[test]
    fn single_body_chain_is_its_own_escape_velocity() {
        let total = multi_body(&[kms(11.186)], None, Composition::Total).unwrap().total();
        assert_eq!(total.unit, Unit::KM_PER_S);
        assert!((total.value - 11.186).abs() < 1e-12);
    }

    #[test]
    fn solar_escape_velocity_scales_with_distance() {
        let at_earth = vesc_sun_at(Quantity::new(1.0, Unit::AU)).unwrap();
        assert!((at_earth.value - VESC_SUN_AT_EARTH_KM_S).abs() < 1e-12);
        let at_4au = vesc_sun_at(Quantity::new(4.0, Unit::AU)).unwrap();
        assert!((at_4au.value - VESC_SUN_AT_EARTH_KM_S / 2.0).abs() < 1e-12);
        assert!(vesc_sun_at(kms(1.0)).is_err());
    }
}

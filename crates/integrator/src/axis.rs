//! Evenly spaced velocity samples shared by all three Cartesian axes.

use macro_core::{Dimension, Quantity, Unit};

use crate::IntegrationError;

/// Relative tolerance when comparing consecutive steps.
pub const SPACING_RTOL: f64 = 1e-5;
/// Absolute tolerance when comparing consecutive steps, in the axis unit.
pub const SPACING_ATOL: f64 = 1e-8;

/// An ordered, evenly spaced sequence of speeds.
///
/// Spacing is validated on construction; the bin width of the velocity
/// distribution is the magnitude of the first step.
#[derive(Debug, Clone, PartialEq)]
pub struct VelocityAxis {
    values: Vec<f64>,
    unit: Unit,
    bin_width: f64,
}

impl VelocityAxis {
    /// Validate `values` (expressed in `unit`) as an evenly spaced axis.
    pub fn new(values: Vec<f64>, unit: Unit) -> Result<Self, IntegrationError> {
        let unit = unit.require(Dimension::SPEED)?;
        if values.len() < 2 {
            return Err(IntegrationError::AxisTooShort(values.len()));
        }
        if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
            return Err(IntegrationError::NonFinite {
                name: "velocity axis sample",
                value: *bad,
            });
        }

        let steps: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
        for (index, pair) in steps.windows(2).enumerate() {
            let (a, b) = (pair[0], pair[1]);
            if (a - b).abs() > SPACING_ATOL + SPACING_RTOL * b.abs() {
                return Err(IntegrationError::UnevenAxis {
                    index: index + 1,
                    expected: a,
                    found: b,
                });
            }
        }

        let bin_width = steps[0].abs();
        if bin_width == 0.0 {
            return Err(IntegrationError::ZeroStep);
        }

        Ok(Self {
            values,
            unit,
            bin_width,
        })
    }

    /// Samples from `start` up to but excluding `stop`, every `step`.
    ///
    /// `stop` and `step` are converted to the unit of `start`.
    pub fn arange(start: Quantity, stop: Quantity, step: Quantity) -> Result<Self, IntegrationError> {
        let unit = start.require(Dimension::SPEED)?.unit;
        let stop = stop.value_in(unit)?;
        let step = step.value_in(unit)?;
        if step == 0.0 {
            return Err(IntegrationError::ZeroStep);
        }
        let span = (stop - start.value) / step;
        if !span.is_finite() {
            return Err(IntegrationError::NonFinite {
                name: "velocity axis span",
                value: span,
            });
        }
        let count = span.ceil().max(0.0) as usize;
        let values = (0..count).map(|i| start.value + step * i as f64).collect();
        Self::new(values, unit)
    }

    /// `count` samples from `start` to `stop` inclusive.
    pub fn linspace(start: Quantity, stop: Quantity, count: usize) -> Result<Self, IntegrationError> {
        let unit = start.require(Dimension::SPEED)?.unit;
        let stop = stop.value_in(unit)?;
        if count < 2 {
            return Err(IntegrationError::AxisTooShort(count));
        }
        let step = (stop - start.value) / (count - 1) as f64;
        let values = (0..count)
            .map(|i| {
                if i == count - 1 {
                    stop
                } else {
                    start.value + step * i as f64
                }
            })
            .collect();
        Self::new(values, unit)
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn unit(&self) -> Unit {
        self.unit
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Number of grid points visited by a pass, `len^3`.
    pub fn grid_size(&self) -> usize {
        self.values.len().pow(3)
    }

    pub fn bin_width(&self) -> Quantity {
        Quantity::new(self.bin_width, self.unit)
    }

    pub(crate) fn si_values(&self) -> Vec<f64> {
        self.values.iter().map(|v| v * self.unit.si_factor).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorClass;

    fn kms(v: f64) -> Quantity {
        Quantity::new(v, Unit::KM_PER_S)
    }

    #[test]
    fn accepts_even_spacing() {
        let axis = VelocityAxis::new(vec![-2.0, -1.0, 0.0, 1.0, 2.0], Unit::KM_PER_S).unwrap();
        assert_eq!(axis.len(), 5);
        assert_eq!(axis.grid_size(), 125);
        assert_eq!(axis.bin_width(), kms(1.0));
    }

    #[test]
    fn decreasing_axis_has_positive_bin_width() {
        let axis = VelocityAxis::new(vec![3.0, 2.0, 1.0], Unit::KM_PER_S).unwrap();
        assert_eq!(axis.bin_width(), kms(1.0));
    }

    #[test]
    fn rejects_uneven_spacing() {
        let err = VelocityAxis::new(vec![0.0, 1.0, 3.0], Unit::KM_PER_S).unwrap_err();
        assert!(matches!(err, IntegrationError::UnevenAxis { index: 1, .. }));
        assert_eq!(err.class(), ErrorClass::Configuration);
    }

    #[test]
    fn tolerates_rounding_noise() {
        let values: Vec<f64> = (0..50).map(|i| 0.1 * i as f64).collect();
        assert!(VelocityAxis::new(values, Unit::KM_PER_S).is_ok());
    }

    #[test]
    fn rejects_degenerate_axes() {
        assert!(matches!(
            VelocityAxis::new(vec![1.0], Unit::KM_PER_S),
            Err(IntegrationError::AxisTooShort(1))
        ));
        assert!(matches!(
            VelocityAxis::new(vec![1.0, 1.0, 1.0], Unit::KM_PER_S),
            Err(IntegrationError::ZeroStep)
        ));
        assert!(matches!(
            VelocityAxis::new(vec![0.0, f64::NAN], Unit::KM_PER_S),
            Err(IntegrationError::NonFinite { .. })
        ));
    }

    #[test]
    fn rejects_non_speed_units() {
        let err = VelocityAxis::new(vec![0.0, 1.0], Unit::CM2).unwrap_err();
        assert_eq!(err.class(), ErrorClass::Domain);
    }

    #[test]
    fn arange_excludes_stop_and_converts_units() {
        let axis = VelocityAxis::arange(kms(1.0), kms(10.0), kms(1.0)).unwrap();
        assert_eq!(axis.values(), &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]);

        let axis = VelocityAxis::arange(
            kms(-1.0),
            Quantity::new(1_000.0, Unit::M_PER_S),
            Quantity::new(50_000.0, Unit::CM_PER_S),
        )
        .unwrap();
        assert_eq!(axis.unit(), Unit::KM_PER_S);
        assert_eq!(axis.len(), 4);

        assert!(VelocityAxis::arange(kms(0.0), kms(1.0), Quantity::new(1.0, Unit::G)).is_err());
        assert!(matches!(
            VelocityAxis::arange(kms(0.0), kms(1.0), kms(0.0)),
            Err(IntegrationError::ZeroStep)
        ));
    }

    #[test]
    fn linspace_hits_both_ends() {
        let axis = VelocityAxis::linspace(kms(-600.0), kms(600.0), 13).unwrap();
        assert_eq!(axis.values()[0], -600.0);
        assert_eq!(axis.values()[12], 600.0);
        assert!((axis.bin_width().value - 100.0).abs() < 1e-12);
    }
}

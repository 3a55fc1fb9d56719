//! Triple-product walk over a velocity axis.
//!
//! Both passes visit `axis x axis x axis` in nested order (vx outermost, vz
//! innermost) and keep only points inside the Galactic escape sphere.
//! The mass pass accumulates `vbar`; the cross-section pass ratchets `vhold`
//! down. Each call starts from a fresh [`RunningState`].

use macro_core::constants::DEFAULT_VHOLD_KM_S;
use macro_core::vector::{Vector3, norm, norm3};
use macro_core::{Dimension, Quantity, Unit};
use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::IntegrationError;
use crate::axis::VelocityAxis;
use crate::distribution::{BinnedMaxwellian, VelocityDistribution};
use crate::params::{
    InteractionParameters, KinematicParameters, Kinematics, finite, non_negative, speed,
};

/// How accepted grid points are enumerated. Emitted sequences are identical either way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Execution {
    #[default]
    Sequential,
    /// Acceptance, relative velocities, and weights are computed on the rayon pool;
    /// the running sums are still folded left to right.
    Parallel,
}

/// Accumulators threaded through a pass, in SI (m/s).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunningState {
    /// Cumulative weighted relative velocity.
    pub vbar: f64,
    /// Most recent (mass pass) or smallest so far (cross-section pass) relative velocity.
    pub vhold: f64,
}

impl RunningState {
    fn fresh(vhold: f64) -> Self {
        Self { vbar: 0.0, vhold }
    }
}

/// One emitted mass estimate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MassSample {
    /// Position in the flattened `len^3` walk.
    pub grid_index: usize,
    /// Grid velocity in the axis unit.
    pub velocity: Vector3,
    pub mass: f64,
}

/// One emitted minimum cross-section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CrossSectionSample {
    pub grid_index: usize,
    pub velocity: Vector3,
    pub cross_section: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MassIntegration {
    pub unit: Unit,
    pub samples: Vec<MassSample>,
    /// Final `vbar`, in the axis unit.
    pub vbar: Quantity,
    /// Relative velocity of the last accepted point, in the axis unit.
    pub vhold: Quantity,
    /// Number of grid points inside the escape sphere.
    pub accepted: usize,
}

impl MassIntegration {
    pub fn masses(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.mass).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrossSectionIntegration {
    pub unit: Unit,
    pub samples: Vec<CrossSectionSample>,
    /// Final ratchet value, in the axis unit.
    pub vhold: Quantity,
    pub accepted: usize,
}

impl CrossSectionIntegration {
    pub fn cross_sections(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.cross_section).collect()
    }
}

/// Both passes of a run, the cross-section pass seeded by the mass pass's `vhold`.
#[derive(Debug, Clone, PartialEq)]
pub struct ExclusionCurve {
    pub mass: MassIntegration,
    pub cross_section: CrossSectionIntegration,
}

impl ExclusionCurve {
    pub fn vbar(&self) -> Quantity {
        self.mass.vbar
    }

    pub fn vhold(&self) -> Quantity {
        self.cross_section.vhold
    }
}

/// A grid point inside the escape sphere.
#[derive(Debug, Clone, Copy)]
struct Accepted {
    index: usize,
    velocity: Vector3,
    speed: f64,
    vrel: f64,
}

/// Walks the velocity grid with a pluggable velocity distribution.
#[derive(Debug, Clone, Default)]
pub struct VelocityGridIntegrator<D = BinnedMaxwellian> {
    distribution: D,
    execution: Execution,
}

impl VelocityGridIntegrator<BinnedMaxwellian> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<D: VelocityDistribution + Sync> VelocityGridIntegrator<D> {
    pub fn with_distribution(distribution: D) -> Self {
        Self {
            distribution,
            execution: Execution::Sequential,
        }
    }

    pub fn execution(mut self, execution: Execution) -> Self {
        self.execution = execution;
        self
    }

    pub fn distribution(&self) -> &D {
        &self.distribution
    }

    /// Cumulative mass estimate `Arho * vbar`, one value per accepted point.
    ///
    /// Non-positive values are dropped, so the sequence is non-decreasing for `Arho > 0`.
    pub fn integrate_mass(
        &self,
        axis: &VelocityAxis,
        kinematics: &KinematicParameters,
        area_density: Quantity,
        mass_unit: Unit,
    ) -> Result<MassIntegration, IntegrationError> {
        let kin = kinematics.resolve()?;
        let arho = finite(
            "area density",
            area_density.require(Dimension::AREA_DENSITY)?.si_value(),
        )?;
        let mass_unit = mass_unit.require(Dimension::MASS)?;
        let bin_width = axis.bin_width().si_value();

        debug!(
            axis_len = axis.len(),
            grid_size = axis.grid_size(),
            "starting mass pass"
        );

        let weighted: Vec<(Accepted, f64)> = match self.execution {
            Execution::Sequential => accepted_points(axis, &kin)
                .into_iter()
                .map(|p| {
                    let w = self.distribution.weight(p.speed, bin_width, kin.virial);
                    (p, p.vrel * w)
                })
                .collect(),
            Execution::Parallel => accepted_points_par(axis, &kin)
                .into_par_iter()
                .map(|p| {
                    let w = self.distribution.weight(p.speed, bin_width, kin.virial);
                    (p, p.vrel * w)
                })
                .collect(),
        };

        let mut state = RunningState::fresh(DEFAULT_VHOLD_KM_S * 1.0e3);
        let mut samples = Vec::with_capacity(weighted.len());
        for (point, contribution) in &weighted {
            state.vbar += contribution;
            state.vhold = point.vrel;
            let mass = arho * state.vbar / mass_unit.si_factor;
            if mass > 0.0 {
                samples.push(MassSample {
                    grid_index: point.index,
                    velocity: to_axis_unit(point.velocity, axis.unit()),
                    mass,
                });
            }
        }

        debug!(
            accepted = weighted.len(),
            emitted = samples.len(),
            vbar_m_s = state.vbar,
            vhold_m_s = state.vhold,
            "finished mass pass"
        );

        Ok(MassIntegration {
            unit: mass_unit,
            samples,
            vbar: Quantity::from_si(state.vbar, axis.unit()),
            vhold: Quantity::from_si(state.vhold, axis.unit()),
            accepted: weighted.len(),
        })
    }

    /// Minimum detectable cross-section `sigma_factor / vrel^2`, floored at `min_sigma`.
    ///
    /// `vrel` is clamped to the running `vhold`, which only ever decreases.
    /// A point whose clamped `vrel` is zero updates the ratchet but emits nothing.
    pub fn integrate_cross_section(
        &self,
        axis: &VelocityAxis,
        kinematics: &KinematicParameters,
        vhold_initial: Quantity,
        min_sigma: Quantity,
        sigma_factor: Quantity,
        sigma_unit: Unit,
    ) -> Result<CrossSectionIntegration, IntegrationError> {
        let kin = kinematics.resolve()?;
        let vhold = non_negative("initial vhold", speed("initial vhold", vhold_initial)?)?;
        let min_sigma = finite("minimum cross-section", min_sigma.require(Dimension::AREA)?.si_value())?;
        let sigma_factor = finite(
            "sigma factor",
            sigma_factor.require(Dimension::SIGMA_FACTOR)?.si_value(),
        )?;
        let sigma_unit = sigma_unit.require(Dimension::AREA)?;

        debug!(
            axis_len = axis.len(),
            grid_size = axis.grid_size(),
            vhold_m_s = vhold,
            "starting cross-section pass"
        );

        let points = match self.execution {
            Execution::Sequential => accepted_points(axis, &kin),
            Execution::Parallel => accepted_points_par(axis, &kin),
        };

        let mut state = RunningState::fresh(vhold);
        let mut samples = Vec::with_capacity(points.len());
        for point in &points {
            let vrel = point.vrel.min(state.vhold);
            state.vhold = vrel;
            if vrel == 0.0 {
                continue;
            }
            let sigma = (sigma_factor / (vrel * vrel)).max(min_sigma);
            let cross_section = sigma / sigma_unit.si_factor;
            if cross_section > 0.0 {
                samples.push(CrossSectionSample {
                    grid_index: point.index,
                    velocity: to_axis_unit(point.velocity, axis.unit()),
                    cross_section,
                });
            }
        }

        debug!(
            accepted = points.len(),
            emitted = samples.len(),
            vhold_m_s = state.vhold,
            "finished cross-section pass"
        );

        Ok(CrossSectionIntegration {
            unit: sigma_unit,
            samples,
            vhold: Quantity::from_si(state.vhold, axis.unit()),
            accepted: points.len(),
        })
    }

    /// Mass pass followed by the cross-section pass seeded with its final `vhold`.
    pub fn integrate_mass_and_cross_section(
        &self,
        axis: &VelocityAxis,
        kinematics: &KinematicParameters,
        interaction: &InteractionParameters,
    ) -> Result<ExclusionCurve, IntegrationError> {
        // Validate the cross-section inputs up front so a failure leaves no half-run.
        interaction.min_sigma.require(Dimension::AREA)?;
        interaction.sigma_factor.require(Dimension::SIGMA_FACTOR)?;
        interaction.sigma_unit.require(Dimension::AREA)?;

        let mass = self.integrate_mass(
            axis,
            kinematics,
            interaction.area_density,
            interaction.mass_unit,
        )?;
        let cross_section = self.integrate_cross_section(
            axis,
            kinematics,
            mass.vhold,
            interaction.min_sigma,
            interaction.sigma_factor,
            interaction.sigma_unit,
        )?;
        Ok(ExclusionCurve {
            mass,
            cross_section,
        })
    }
}

fn grid_point(index: usize, values: &[f64], kin: &Kinematics) -> Option<Accepted> {
    let n = values.len();
    let (vx, vy, vz) = (values[index / (n * n)], values[(index / n) % n], values[index % n]);
    let velocity = [vx, vy, vz];
    let speed = norm3(&velocity);
    if speed > kin.escape {
        return None;
    }
    let vrel = norm(&[kin.infall, vx, vy - kin.circular, vz]);
    Some(Accepted {
        index,
        velocity,
        speed,
        vrel,
    })
}

fn accepted_points(axis: &VelocityAxis, kin: &Kinematics) -> Vec<Accepted> {
    let values = axis.si_values();
    (0..axis.grid_size())
        .filter_map(|i| grid_point(i, &values, kin))
        .collect()
}

fn accepted_points_par(axis: &VelocityAxis, kin: &Kinematics) -> Vec<Accepted> {
    let values = axis.si_values();
    (0..axis.grid_size())
        .into_par_iter()
        .filter_map(|i| grid_point(i, &values, kin))
        .collect()
}

fn to_axis_unit(v: Vector3, unit: Unit) -> Vector3 {
    [v[0] / unit.si_factor, v[1] / unit.si_factor, v[2] / unit.si_factor]
}

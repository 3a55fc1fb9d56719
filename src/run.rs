//! Turning a [`RunConfig`] into integrator inputs and running it.

use macro_config::{ConfigError, EscapeVelocityRegistry, RunConfig};
use macro_core::{Quantity, Unit};
use macro_integrator::{
    ExclusionCurve, IntegrationError, InteractionParameters, KinematicParameters, VelocityAxis,
    VelocityGridIntegrator,
};
use macro_orbits::{Composition, EscapeError};
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("integration failed: {0}")]
    Integration(#[from] IntegrationError),
    #[error("escape-velocity chain failed: {0}")]
    Escape(#[from] EscapeError),
}

/// Fully resolved inputs of a run.
#[derive(Debug, Clone)]
pub struct RunInputs {
    pub axis: VelocityAxis,
    pub kinematics: KinematicParameters,
    pub interaction: InteractionParameters,
}

/// Resolve a manifest against an escape-velocity registry.
pub fn resolve(config: &RunConfig, registry: &EscapeVelocityRegistry) -> Result<RunInputs, RunError> {
    let axis = VelocityAxis::arange(config.axis.start, config.axis.stop, config.axis.step)?;

    let defaults = KinematicParameters::default();
    let k = &config.kinematics;
    let mut kinematics = KinematicParameters {
        virial: k.virial.unwrap_or(defaults.virial),
        escape: k.escape.unwrap_or(defaults.escape),
        circular: k.circular.unwrap_or(defaults.circular),
        infall: k.infall.unwrap_or(defaults.infall),
    };

    if let Some(chain) = &config.escape_chain {
        let escapes = chain
            .bodies
            .iter()
            .map(|entry| match entry.parse::<Quantity>() {
                Ok(q) => Ok(q),
                Err(_) => registry.body(&chain.parameter_set, entry),
            })
            .collect::<Result<Vec<_>, _>>()?;
        let infall = macro_orbits::multi_body(&escapes, chain.orbital.as_deref(), Composition::Total)?
            .total();
        info!(bodies = ?chain.bodies, %infall, "infall velocity from escape chain");
        kinematics.infall = infall;
    }

    let i = &config.interaction;
    let mut interaction = InteractionParameters::new(i.sigma_factor);
    if let Some(area_density) = i.area_density {
        interaction.area_density = area_density;
    }
    if let Some(min_sigma) = i.min_sigma {
        interaction.min_sigma = min_sigma;
    }
    if let Some(symbol) = &i.mass_unit {
        interaction.mass_unit = parse_unit(symbol)?;
    }
    if let Some(symbol) = &i.sigma_unit {
        interaction.sigma_unit = parse_unit(symbol)?;
    }

    Ok(RunInputs {
        axis,
        kinematics,
        interaction,
    })
}

/// Resolve and integrate a manifest with the default Maxwellian halo.
pub fn run(config: &RunConfig, registry: &EscapeVelocityRegistry) -> Result<ExclusionCurve, RunError> {
    let inputs = resolve(config, registry)?;
    let curve = VelocityGridIntegrator::new().integrate_mass_and_cross_section(
        &inputs.axis,
        &inputs.kinematics,
        &inputs.interaction,
    )?;
    info!(
        masses = curve.mass.samples.len(),
        cross_sections = curve.cross_section.samples.len(),
        vbar = %curve.vbar(),
        vhold = %curve.vhold(),
        "run complete"
    );
    Ok(curve)
}

fn parse_unit(symbol: &str) -> Result<Unit, IntegrationError> {
    Ok(Unit::parse(symbol)?)
}

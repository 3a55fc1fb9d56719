//! Reference curves on the macro mass / cross-section plane.
//!
//! Every curve maps a macro mass in grams to a geometric cross-section in cm^2.
//! The functions are plain `f64 -> f64` maps so callers can evaluate them over
//! any mass grid; [`evaluate`] is the vectorised form.

use std::f64::consts::PI;

use serde::Serialize;

/// Nuclear mass density (g / cm^3).
pub const NUCLEAR_DENSITY_G_CM3: f64 = 3.6e14;
/// Atomic mass density (g / cm^3).
pub const ATOMIC_DENSITY_G_CM3: f64 = 1.0;
/// Solar mass (g).
pub const SOLAR_MASS_G: f64 = 2.0e33;
/// Schwarzschild radius of one solar mass (cm).
pub const SOLAR_SCHWARZSCHILD_RADIUS_CM: f64 = 3.0e5;

/// Geometric cross-section of a uniform sphere of mass `mass_g` and density `density_g_cm3`.
///
/// `sigma = pi r^2` with `r = (3 M / (4 pi rho))^(1/3)`.
pub fn constant_density_cross_section(mass_g: f64, density_g_cm3: f64) -> f64 {
    let volume_per_gram = 4.0 / 3.0 * PI * density_g_cm3;
    PI * (mass_g / volume_per_gram).powf(2.0 / 3.0)
}

/// Cross-section of a macro at atomic density.
pub fn atomic_density(mass_g: f64) -> f64 {
    constant_density_cross_section(mass_g, ATOMIC_DENSITY_G_CM3)
}

/// Cross-section of a macro at nuclear density.
pub fn nuclear_density(mass_g: f64) -> f64 {
    constant_density_cross_section(mass_g, NUCLEAR_DENSITY_G_CM3)
}

/// Areal cross-section of a black hole of mass `mass_g`: `pi r_s^2`.
///
/// Macros cannot be denser than this; it bounds cross-sections from below.
pub fn black_hole(mass_g: f64) -> f64 {
    PI * SOLAR_SCHWARZSCHILD_RADIUS_CM.powi(2) * (mass_g / SOLAR_MASS_G).powi(2)
}

/// CMB constraint line, `sigma / M = 4.5e-7 cm^2 / g`.
pub fn cmb(mass_g: f64) -> f64 {
    4.5e-7 * mass_g
}

/// Best Kepler observation ceiling, `sigma / M = 1e-6 cm^2 / g`.
pub fn kepler_top(mass_g: f64) -> f64 {
    1e-6 * mass_g
}

/// Best LMC observation ceiling, `sigma / M = 1e-4 cm^2 / g`.
pub fn lmc_top(mass_g: f64) -> f64 {
    1e-4 * mass_g
}

/// The reference curves by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceCurve {
    AtomicDensity,
    NuclearDensity,
    BlackHole,
    Cmb,
    KeplerTop,
    LmcTop,
}

impl ReferenceCurve {
    pub const ALL: [ReferenceCurve; 6] = [
        ReferenceCurve::AtomicDensity,
        ReferenceCurve::NuclearDensity,
        ReferenceCurve::BlackHole,
        ReferenceCurve::Cmb,
        ReferenceCurve::KeplerTop,
        ReferenceCurve::LmcTop,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ReferenceCurve::AtomicDensity => "atomic_density",
            ReferenceCurve::NuclearDensity => "nuclear_density",
            ReferenceCurve::BlackHole => "black_hole",
            ReferenceCurve::Cmb => "cmb",
            ReferenceCurve::KeplerTop => "kepler_top",
            ReferenceCurve::LmcTop => "lmc_top",
        }
    }

    /// Cross-section (cm^2) at `mass_g`.
    pub fn at(&self, mass_g: f64) -> f64 {
        match self {
            ReferenceCurve::AtomicDensity => atomic_density(mass_g),
            ReferenceCurve::NuclearDensity => nuclear_density(mass_g),
            ReferenceCurve::BlackHole => black_hole(mass_g),
            ReferenceCurve::Cmb => cmb(mass_g),
            ReferenceCurve::KeplerTop => kepler_top(mass_g),
            ReferenceCurve::LmcTop => lmc_top(mass_g),
        }
    }
}

/// Evaluate a curve over a mass grid.
pub fn evaluate(curve: ReferenceCurve, masses_g: &[f64]) -> Vec<f64> {
    masses_g.iter().map(|&m| curve.at(m)).collect()
}

/// `n` masses evenly spaced in log10 between `10^lo_exp` and `10^hi_exp`, inclusive.
pub fn log_space(lo_exp: f64, hi_exp: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![10f64.powf(lo_exp)],
        _ => {
            let step = (hi_exp - lo_exp) / (n - 1) as f64;
            (0..n)
                .map(|i| 10f64.powf(lo_exp + step * i as f64))
                .collect()
        }
    }
}

/// Vertical extent of an excluded region at one mass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub mass_g: f64,
    pub lower_cm2: f64,
    pub upper_cm2: f64,
}

/// Region above the CMB line, up to the plot ceiling `ymax`.
pub fn cmb_band(masses_g: &[f64], ymax: f64) -> Vec<Band> {
    masses_g
        .iter()
        .map(|&m| Band {
            mass_g: m,
            lower_cm2: cmb(m),
            upper_cm2: ymax,
        })
        .collect()
}

/// Region between the plot floor `ymin` and the black-hole line.
pub fn black_hole_band(masses_g: &[f64], ymin: f64) -> Vec<Band> {
    masses_g
        .iter()
        .map(|&m| Band {
            mass_g: m,
            lower_cm2: ymin,
            upper_cm2: black_hole(m),
        })
        .collect()
}

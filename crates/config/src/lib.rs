//! Configuration models and loaders for macro_lightning runs.

use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use macro_core::Quantity;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Velocity axis described by its range, `start..stop` every `step`.
#[derive(Debug, Deserialize, Clone)]
pub struct AxisConfig {
    pub start: Quantity,
    pub stop: Quantity,
    pub step: Quantity,
}

/// Halo kinematics; missing entries fall back to the Galactic defaults.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct KinematicsConfig {
    #[serde(default)]
    pub virial: Option<Quantity>,
    #[serde(default)]
    pub escape: Option<Quantity>,
    #[serde(default)]
    pub circular: Option<Quantity>,
    #[serde(default)]
    pub infall: Option<Quantity>,
}

/// Detector and cross-section model. Only `sigma_factor` has no default.
#[derive(Debug, Deserialize, Clone)]
pub struct InteractionConfig {
    #[serde(default)]
    pub area_density: Option<Quantity>,
    #[serde(default)]
    pub min_sigma: Option<Quantity>,
    pub sigma_factor: Quantity,
    #[serde(default)]
    pub mass_unit: Option<String>,
    #[serde(default)]
    pub sigma_unit: Option<String>,
}

/// Chain of bodies whose compound escape velocity replaces the infall velocity.
///
/// Each entry is either a body name looked up in `parameter_set` or a literal
/// speed such as `"42.1 km/s"`, ordered from the innermost body outwards.
#[derive(Debug, Deserialize, Clone)]
pub struct EscapeChainConfig {
    pub bodies: Vec<String>,
    #[serde(default = "latest")]
    pub parameter_set: String,
    #[serde(default)]
    pub orbital: Option<Vec<Quantity>>,
}

fn latest() -> String {
    "latest".to_string()
}

/// A full integration run manifest.
#[derive(Debug, Deserialize, Clone)]
pub struct RunConfig {
    pub axis: AxisConfig,
    #[serde(default)]
    pub kinematics: KinematicsConfig,
    pub interaction: InteractionConfig,
    #[serde(default)]
    pub escape_chain: Option<EscapeChainConfig>,
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid escape-velocity parameter set '{0}'")]
    UnknownParameterSet(String),
    #[error("body '{body}' not found in parameter set '{set}'")]
    UnknownBody { set: String, body: String },
}

/// Load a run manifest from a YAML or TOML file.
pub fn load_run_config<P: AsRef<Path>>(path: P) -> Result<RunConfig, ConfigError> {
    load_record(path)
}

/// Load named parameter sets (`name -> set`) from a YAML or TOML file.
pub fn load_parameter_sets<P: AsRef<Path>>(
    path: P,
) -> Result<BTreeMap<String, ParameterSet>, ConfigError> {
    load_record(path)
}

fn load_record<T, P>(path: P) -> Result<T, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

/// Escape velocities of a set of bodies, with literature references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    pub params: BTreeMap<String, Quantity>,
    #[serde(default)]
    pub references: BTreeMap<String, Vec<String>>,
}

impl ParameterSet {
    /// Escape velocity of `body`, matched case-insensitively.
    pub fn get(&self, body: &str) -> Option<Quantity> {
        self.params
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(body))
            .map(|(_, q)| *q)
    }
}

const DEFAULT_SET: &str = "DEFAULT";
const JPL_SOURCE: &str = "https://ssd.jpl.nasa.gov/?planet_phys_par";
const REF_ALMANAC: &str = "Explanatory Supplement to the Astronomical Almanac. 1992. K. P. Seidelmann, Ed., p.706 (Table 15.8) and p.316 (Table 5.8.1), University Science Books, Mill Valley, California.";
const REF_IAU_2006: &str = "Seidelmann, P.K. et al. 2007. 'Report of the IAU/IAG Working Group on cartographic coordinates and rotational elements: 2006' Celestial Mech. Dyn. Astr. 98:155-180.";
const REF_IAU_2015: &str = "Archinal, B.A. et al. 2018. 'Report of the IAU/IAG Working Group on cartographic coordinates and rotational elements: 2015' Celestial Mech. Dyn. Astr. 130:22.";

/// Surface escape velocities of the Solar System bodies (km/s).
const SOLAR_SYSTEM_KM_S: [(&str, f64); 10] = [
    ("Sun", 617.5),
    ("Mercury", 4.25),
    ("Venus", 10.36),
    ("Earth", 11.19),
    ("Mars", 5.03),
    ("Jupiter", 60.20),
    ("Saturn", 36.09),
    ("Uranus", 21.38),
    ("Neptune", 23.56),
    ("Pluto", 1.21),
];

impl ParameterSet {
    /// The JPL planetary physical parameters.
    pub fn solar_system() -> Self {
        let params = SOLAR_SYSTEM_KM_S
            .iter()
            .map(|(name, v)| {
                (
                    name.to_string(),
                    Quantity::new(*v, macro_core::Unit::KM_PER_S),
                )
            })
            .collect();
        let mut references: BTreeMap<String, Vec<String>> = SOLAR_SYSTEM_KM_S
            .iter()
            .map(|(name, _)| {
                (
                    name.to_string(),
                    vec![
                        REF_ALMANAC.to_string(),
                        REF_IAU_2006.to_string(),
                        REF_IAU_2015.to_string(),
                    ],
                )
            })
            .collect();
        references.insert("_source".to_string(), vec![JPL_SOURCE.to_string()]);
        Self { params, references }
    }
}

/// Keyed lookup of escape-velocity parameter sets.
///
/// An owned value: callers pass it explicitly rather than sharing it globally.
#[derive(Debug, Clone)]
pub struct EscapeVelocityRegistry {
    sets: BTreeMap<String, ParameterSet>,
    latest: String,
}

impl Default for EscapeVelocityRegistry {
    fn default() -> Self {
        let mut sets = BTreeMap::new();
        sets.insert(DEFAULT_SET.to_string(), ParameterSet::solar_system());
        Self {
            sets,
            latest: DEFAULT_SET.to_string(),
        }
    }
}

impl EscapeVelocityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `name`: `"latest"` is the current selection, any case of `"default"` is `DEFAULT`.
    pub fn get(&self, name: &str) -> Result<&ParameterSet, ConfigError> {
        let key = self.resolve(name);
        self.sets
            .get(key)
            .ok_or_else(|| ConfigError::UnknownParameterSet(name.to_string()))
    }

    /// Add or replace a named set.
    pub fn register(&mut self, name: impl Into<String>, set: ParameterSet) {
        self.sets.insert(name.into(), set);
    }

    /// Make `name` the set returned for `"latest"`.
    pub fn select(&mut self, name: &str) -> Result<(), ConfigError> {
        let key = self.resolve(name).to_string();
        if !self.sets.contains_key(&key) {
            return Err(ConfigError::UnknownParameterSet(name.to_string()));
        }
        self.latest = key;
        Ok(())
    }

    /// The set currently returned for `"latest"`.
    pub fn latest(&self) -> &str {
        &self.latest
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.sets.keys().map(String::as_str)
    }

    /// Register every set from a YAML or TOML file.
    pub fn extend_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<usize, ConfigError> {
        let sets = load_parameter_sets(path)?;
        let count = sets.len();
        self.sets.extend(sets);
        Ok(count)
    }

    /// Escape velocity of `body` in the named set.
    pub fn body(&self, set: &str, body: &str) -> Result<Quantity, ConfigError> {
        self.get(set)?
            .get(body)
            .ok_or_else(|| ConfigError::UnknownBody {
                set: set.to_string(),
                body: body.to_string(),
            })
    }

    fn resolve<'a>(&'a self, name: &'a str) -> &'a str {
        if name == "latest" {
            &self.latest
        } else if name.eq_ignore_ascii_case("default") {
            DEFAULT_SET
        } else {
            name
        }
    }
}

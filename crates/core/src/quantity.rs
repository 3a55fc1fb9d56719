//! Dimension-checked scalar quantities.
//!
//! A [`Quantity`] is an `f64` tagged with a [`Unit`] from a closed catalogue.
//! Conversions only succeed between units of the same [`Dimension`]; nothing
//! is ever inferred from a bare number.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Integer exponents of mass, length, and time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimension {
    pub mass: i8,
    pub length: i8,
    pub time: i8,
}

impl Dimension {
    pub const DIMENSIONLESS: Dimension = Dimension::new(0, 0, 0);
    pub const MASS: Dimension = Dimension::new(1, 0, 0);
    pub const LENGTH: Dimension = Dimension::new(0, 1, 0);
    pub const AREA: Dimension = Dimension::new(0, 2, 0);
    pub const SPEED: Dimension = Dimension::new(0, 1, -1);
    /// Detector area times mass density times time: `Arho * speed` is a mass.
    pub const AREA_DENSITY: Dimension = Dimension::new(1, -1, 1);
    /// Area times squared speed: `sigma_factor / speed^2` is an area.
    pub const SIGMA_FACTOR: Dimension = Dimension::new(0, 4, -2);

    pub const fn new(mass: i8, length: i8, time: i8) -> Self {
        Self { mass, length, time }
    }

    fn name(&self) -> Option<&'static str> {
        match *self {
            Self::DIMENSIONLESS => Some("dimensionless"),
            Self::MASS => Some("mass"),
            Self::LENGTH => Some("length"),
            Self::AREA => Some("area"),
            Self::SPEED => Some("speed"),
            Self::AREA_DENSITY => Some("area-density"),
            Self::SIGMA_FACTOR => Some("sigma-factor"),
            _ => None,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.name() {
            Some(name) => f.write_str(name),
            None => write!(
                f,
                "M^{} L^{} T^{}",
                self.mass, self.length, self.time
            ),
        }
    }
}

/// A named unit with its dimension and its factor to SI (kg, m, s).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    pub symbol: &'static str,
    pub dimension: Dimension,
    pub si_factor: f64,
}

impl Unit {
    pub const DIMENSIONLESS: Unit = Unit::new("", Dimension::DIMENSIONLESS, 1.0);

    pub const KM_PER_S: Unit = Unit::new("km/s", Dimension::SPEED, 1.0e3);
    pub const M_PER_S: Unit = Unit::new("m/s", Dimension::SPEED, 1.0);
    pub const CM_PER_S: Unit = Unit::new("cm/s", Dimension::SPEED, 1.0e-2);

    pub const G: Unit = Unit::new("g", Dimension::MASS, 1.0e-3);
    pub const KG: Unit = Unit::new("kg", Dimension::MASS, 1.0);

    pub const CM: Unit = Unit::new("cm", Dimension::LENGTH, 1.0e-2);
    pub const M: Unit = Unit::new("m", Dimension::LENGTH, 1.0);
    pub const KM: Unit = Unit::new("km", Dimension::LENGTH, 1.0e3);
    pub const AU: Unit = Unit::new("AU", Dimension::LENGTH, 1.495_978_707e11);

    pub const CM2: Unit = Unit::new("cm^2", Dimension::AREA, 1.0e-4);
    pub const M2: Unit = Unit::new("m^2", Dimension::AREA, 1.0);
    pub const KM2: Unit = Unit::new("km^2", Dimension::AREA, 1.0e6);

    pub const G_S_PER_M: Unit = Unit::new("g s / m", Dimension::AREA_DENSITY, 1.0e-3);
    pub const KG_S_PER_M: Unit = Unit::new("kg s / m", Dimension::AREA_DENSITY, 1.0);

    pub const CM2_KM2_PER_S2: Unit = Unit::new("cm^2 km^2 / s^2", Dimension::SIGMA_FACTOR, 1.0e2);
    pub const M4_PER_S2: Unit = Unit::new("m^4 / s^2", Dimension::SIGMA_FACTOR, 1.0);

    const CATALOGUE: [Unit; 18] = [
        Unit::DIMENSIONLESS,
        Unit::KM_PER_S,
        Unit::M_PER_S,
        Unit::CM_PER_S,
        Unit::G,
        Unit::KG,
        Unit::CM,
        Unit::M,
        Unit::KM,
        Unit::AU,
        Unit::CM2,
        Unit::M2,
        Unit::KM2,
        Unit::G_S_PER_M,
        Unit::KG_S_PER_M,
        Unit::CM2_KM2_PER_S2,
        Unit::M4_PER_S2,
        Unit::new("s", Dimension::new(0, 0, 1), 1.0),
    ];

    const ALIASES: [(&'static str, Unit); 8] = [
        ("kms^-1", Unit::KM_PER_S),
        ("ms^-1", Unit::M_PER_S),
        ("au", Unit::AU),
        ("cm2", Unit::CM2),
        ("m2", Unit::M2),
        ("km2", Unit::KM2),
        ("gs/m", Unit::G_S_PER_M),
        ("kgs/m", Unit::KG_S_PER_M),
    ];

    pub const fn new(symbol: &'static str, dimension: Dimension, si_factor: f64) -> Self {
        Self {
            symbol,
            dimension,
            si_factor,
        }
    }

    /// Look up a unit by symbol. Whitespace is ignored, so `"g s / m"` and `"g s/m"` agree.
    pub fn parse(symbol: &str) -> Result<Unit, QuantityError> {
        let compact: String = symbol.chars().filter(|c| !c.is_whitespace()).collect();
        Self::CATALOGUE
            .iter()
            .copied()
            .find(|unit| unit.symbol.replace(' ', "") == compact)
            .or_else(|| {
                Self::ALIASES
                    .iter()
                    .find(|(alias, _)| *alias == compact)
                    .map(|(_, unit)| *unit)
            })
            .ok_or_else(|| QuantityError::UnknownUnit(symbol.to_string()))
    }

    /// Fail unless the unit has the requested dimension.
    pub fn require(self, dimension: Dimension) -> Result<Unit, QuantityError> {
        if self.dimension == dimension {
            Ok(self)
        } else {
            Err(QuantityError::IncompatibleUnits {
                expected: dimension,
                found: self.dimension,
                unit: self.symbol,
            })
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol)
    }
}

/// Errors raised when a value cannot be used as the physical quantity required.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuantityError {
    #[error("expected a {expected} quantity, got {found} ('{unit}')")]
    IncompatibleUnits {
        expected: Dimension,
        found: Dimension,
        unit: &'static str,
    },
    #[error("unknown unit '{0}'")]
    UnknownUnit(String),
    #[error("cannot interpret '{0}' as a physical quantity")]
    Uninterpretable(String),
}

/// A scalar value tagged with a unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub const fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    /// Construct a quantity that must carry the given dimension.
    pub fn with_dimension(value: f64, unit: Unit, dimension: Dimension) -> Result<Self, QuantityError> {
        Ok(Self::new(value, unit.require(dimension)?))
    }

    pub fn dimension(&self) -> Dimension {
        self.unit.dimension
    }

    /// Value expressed in SI base units.
    pub fn si_value(&self) -> f64 {
        self.value * self.unit.si_factor
    }

    /// Build a quantity from an SI value, expressed in `unit`.
    pub fn from_si(si_value: f64, unit: Unit) -> Self {
        Self::new(si_value / unit.si_factor, unit)
    }

    /// Convert to another unit of the same dimension.
    pub fn to(&self, unit: Unit) -> Result<Quantity, QuantityError> {
        let unit = unit.require(self.dimension())?;
        Ok(Self::from_si(self.si_value(), unit))
    }

    /// Numeric value in `unit`, failing on a dimension mismatch.
    pub fn value_in(&self, unit: Unit) -> Result<f64, QuantityError> {
        self.to(unit).map(|q| q.value)
    }

    /// Fail unless the quantity has the requested dimension.
    pub fn require(self, dimension: Dimension) -> Result<Quantity, QuantityError> {
        self.unit.require(dimension)?;
        Ok(self)
    }

    /// Multiply the value, keeping the unit.
    pub fn scale(&self, factor: f64) -> Quantity {
        Self::new(self.value * factor, self.unit)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.unit.symbol.is_empty() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, self.unit.symbol)
        }
    }
}

impl FromStr for Quantity {
    type Err = QuantityError;

    /// Parse `"<number> <unit>"`. A bare number is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (number, unit) = trimmed
            .split_once(char::is_whitespace)
            .ok_or_else(|| QuantityError::Uninterpretable(s.to_string()))?;
        let value: f64 = number
            .parse()
            .map_err(|_| QuantityError::Uninterpretable(s.to_string()))?;
        let unit = Unit::parse(unit.trim())?;
        Ok(Self::new(value, unit))
    }
}

impl TryFrom<String> for Quantity {
    type Error = QuantityError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Quantity> for String {
    fn from(q: Quantity) -> Self {
        q.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_within_a_dimension() {
        let v = Quantity::new(550.0, Unit::KM_PER_S);
        assert_eq!(v.to(Unit::M_PER_S).unwrap().value, 550_000.0);
        let area = Quantity::new(1.0, Unit::M2);
        assert!((area.value_in(Unit::CM2).unwrap() - 1.0e4).abs() < 1e-9);
    }

    #[test]
    fn rejects_cross_dimension_conversion() {
        let v = Quantity::new(1.0, Unit::KM_PER_S);
        let err = v.to(Unit::CM2).unwrap_err();
        assert!(matches!(
            err,
            QuantityError::IncompatibleUnits {
                expected: Dimension::AREA,
                found: Dimension::SPEED,
                ..
            }
        ));
        assert!(Quantity::with_dimension(1.0, Unit::G, Dimension::SPEED).is_err());
    }

    #[test]
    fn parses_dimensioned_text_only() {
        let q: Quantity = "550 km/s".parse().unwrap();
        assert_eq!(q, Quantity::new(550.0, Unit::KM_PER_S));
        let arho: Quantity = "3 g s/m".parse().unwrap();
        assert_eq!(arho.unit, Unit::G_S_PER_M);
        let sigma: Quantity = "6e-8 cm2".parse().unwrap();
        assert_eq!(sigma.unit, Unit::CM2);

        assert!(matches!(
            "550".parse::<Quantity>(),
            Err(QuantityError::Uninterpretable(_))
        ));
        assert!(matches!(
            "arg".parse::<Quantity>(),
            Err(QuantityError::Uninterpretable(_))
        ));
        assert!(matches!(
            "1 furlong".parse::<Quantity>(),
            Err(QuantityError::UnknownUnit(_))
        ));
    }

    #[test]
    fn serde_round_trips_through_text() {
        let q = Quantity::new(42.1, Unit::KM_PER_S);
        let json = serde_json::to_string(&q).unwrap();
        assert_eq!(json, "\"42.1 km/s\"");
        let back: Quantity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, q);
        assert!(serde_json::from_str::<Quantity>("\"12\"").is_err());
    }

    #[test]
    fn dimension_names_for_messages() {
        assert_eq!(Dimension::SPEED.to_string(), "speed");
        assert_eq!(Dimension::new(2, 0, 0).to_string(), "M^2 L^0 T^0");
    }
}

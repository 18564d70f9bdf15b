//! Typed user preference values
//!
//! Mirrors the profile settings the backend knows about: display theme,
//! interface language, and measurement units. Each parses from / renders to
//! the string form used in the config file and on the wire.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error when a preference string is not a known value
#[derive(Debug, Clone, Error)]
#[error("Invalid {preference}: \"{input}\". Valid values are: {valid}")]
pub struct InvalidPreference {
    pub preference: &'static str,
    pub input: String,
    pub valid: &'static str,
}

/// Display theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Theme {
    type Err = InvalidPreference;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            "system" => Ok(Self::System),
            _ => Err(InvalidPreference {
                preference: "theme",
                input: s.to_string(),
                valid: "light, dark, system",
            }),
        }
    }
}

/// Interface language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Language {
    #[default]
    En,
    Es,
    Fr,
    De,
    Hi,
}

impl Language {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Es => "es",
            Self::Fr => "fr",
            Self::De => "de",
            Self::Hi => "hi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Language {
    type Err = InvalidPreference;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "en" => Ok(Self::En),
            "es" => Ok(Self::Es),
            "fr" => Ok(Self::Fr),
            "de" => Ok(Self::De),
            "hi" => Ok(Self::Hi),
            _ => Err(InvalidPreference {
                preference: "language",
                input: s.to_string(),
                valid: "en, es, fr, de, hi",
            }),
        }
    }
}

/// Measurement unit system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Units {
    #[default]
    Metric,
    Imperial,
}

impl Units {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Metric => "metric",
            Self::Imperial => "imperial",
        }
    }

    /// Weight unit label for display
    pub const fn weight_label(&self) -> &'static str {
        match self {
            Self::Metric => "kg",
            Self::Imperial => "lbs",
        }
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Units {
    type Err = InvalidPreference;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "metric" => Ok(Self::Metric),
            "imperial" => Ok(Self::Imperial),
            _ => Err(InvalidPreference {
                preference: "units",
                input: s.to_string(),
                valid: "metric, imperial",
            }),
        }
    }
}

/// kg per lb
const KG_TO_LBS: f64 = 2.20462;
/// cm per inch
const CM_TO_INCHES: f64 = 0.393701;

/// Convert a weight value between unit systems (kg <-> lbs)
pub fn convert_weight(value: f64, from: Units, to: Units) -> f64 {
    if from == to {
        return value;
    }
    match from {
        Units::Metric => value * KG_TO_LBS,
        Units::Imperial => value / KG_TO_LBS,
    }
}

/// Convert a height value between unit systems (cm <-> inches)
pub fn convert_height(value: f64, from: Units, to: Units) -> f64 {
    if from == to {
        return value;
    }
    match from {
        Units::Metric => value * CM_TO_INCHES,
        Units::Imperial => value / CM_TO_INCHES,
    }
}

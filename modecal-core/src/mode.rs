use serde::{Deserialize, Serialize};
use std::{fmt::Display, str::FromStr};

use crate::ModecalError;

/// label used by the survey for trips whose main leg is a walk. these trips
/// are treated as plain walk trips.
pub const WALK_MAIN_LABEL: &str = "walk_main";

/// the travel modes that take part in calibration. declaration order is the
/// order used for reporting.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    Walk,
    Car,
    Ride,
    Pt,
    Bike,
}

impl Mode {
    pub const ALL: [Mode; 5] = [Mode::Walk, Mode::Car, Mode::Ride, Mode::Pt, Mode::Bike];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Walk => "walk",
            Mode::Car => "car",
            Mode::Ride => "ride",
            Mode::Pt => "pt",
            Mode::Bike => "bike",
        }
    }

    /// maps a raw main mode label onto a calibrated mode. `walk_main` becomes
    /// [`Mode::Walk`]; any label outside the mode set yields `None`.
    pub fn from_label(label: &str) -> Option<Mode> {
        if label == WALK_MAIN_LABEL {
            return Some(Mode::Walk);
        }
        label.parse().ok()
    }
}

impl FromStr for Mode {
    type Err = ModecalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "walk" => Ok(Mode::Walk),
            "car" => Ok(Mode::Car),
            "ride" => Ok(Mode::Ride),
            "pt" => Ok(Mode::Pt),
            "bike" => Ok(Mode::Bike),
            other => Err(ModecalError::UnknownMode(other.to_string())),
        }
    }
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_walk_main_is_walk() {
        assert_eq!(Mode::from_label("walk_main"), Some(Mode::Walk));
        assert_eq!(Mode::from_label("walk"), Some(Mode::Walk));
    }

    #[test]
    fn test_unknown_label() {
        assert_eq!(Mode::from_label("freight"), None);
        assert!("Car".parse::<Mode>().is_err());
    }

    #[test]
    fn test_declaration_order() {
        let labels: Vec<&str> = Mode::ALL.iter().map(|m| m.as_str()).collect();
        assert_eq!(labels, vec!["walk", "car", "ride", "pt", "bike"]);
    }
}

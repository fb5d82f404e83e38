//! Crowdedness tiers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown crowdedness tier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid crowdedness tier: {0:?}")]
pub struct InvalidCrowdedness(String);

/// How full a bus is expected to be between two stops.
///
/// Tiers are strictly ordered: `Green < Orange < Red`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum Crowdedness {
    Green,
    Orange,
    #[default]
    Red,
}

impl Crowdedness {
    /// Parse a tier name, ignoring ASCII case.
    pub fn parse(s: &str) -> Result<Self, InvalidCrowdedness> {
        match s.to_ascii_uppercase().as_str() {
            "GREEN" => Ok(Crowdedness::Green),
            "ORANGE" => Ok(Crowdedness::Orange),
            "RED" => Ok(Crowdedness::Red),
            _ => Err(InvalidCrowdedness(s.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Crowdedness::Green => "GREEN",
            Crowdedness::Orange => "ORANGE",
            Crowdedness::Red => "RED",
        }
    }
}

impl fmt::Display for Crowdedness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

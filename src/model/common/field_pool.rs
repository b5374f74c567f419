use std::{fmt, str::FromStr};

use mongodb::bson::{to_bson, Bson};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// States in the field pool lifecycle.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FieldPoolStatus {
    /// Accepting registrations.
    Open,
    /// Registration is over, but the pool is still visible.
    Closed,
    /// Withdrawn from view. Only ever entered or left by hand.
    Hidden,
}

impl FieldPoolStatus {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::Closed => "CLOSED",
            Self::Hidden => "HIDDEN",
        }
    }
}

impl fmt::Display for FieldPoolStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<FieldPoolStatus> for Bson {
    fn from(status: FieldPoolStatus) -> Self {
        to_bson(&status).expect("Serialisation is infallible")
    }
}

/// Parses the wire representation, e.g. `"OPEN"`.
impl FromStr for FieldPoolStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "OPEN" => Ok(Self::Open),
            "CLOSED" => Ok(Self::Closed),
            "HIDDEN" => Ok(Self::Hidden),
            _ => Err(Error::invalid(format!("Unknown field pool status '{s}'"))),
        }
    }
}

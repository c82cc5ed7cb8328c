//! Customer Tier Parameters
//!
//! PID gains and gate ceiling per customer tier. More aggressive tiers
//! trade damping for responsiveness: from SHIELD to REAPER `max_gate`
//! strictly increases and `Kd` strictly decreases.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Customer tier selecting the PID tuning profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Tier {
    Shield,
    Guardian,
    Gladiator,
    Reaper,
}

/// Immutable PID tuning record for one tier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TierParams {
    /// Proportional gain
    pub kp: f64,
    /// Integral gain
    pub ki: f64,
    /// Derivative gain (damping)
    pub kd: f64,
    /// Gate intensity ceiling
    pub max_gate: f64,
}

impl Tier {
    /// All tiers, least to most aggressive.
    pub const ALL: [Tier; 4] = [Tier::Shield, Tier::Guardian, Tier::Gladiator, Tier::Reaper];

    /// PID parameters tuned for this tier.
    pub fn params(&self) -> TierParams {
        match self {
            // Conservative, strong damping
            Tier::Shield => TierParams {
                kp: 0.04,
                ki: 0.005,
                kd: 0.03,
                max_gate: 2.9,
            },
            // Balanced
            Tier::Guardian => TierParams {
                kp: 0.06,
                ki: 0.01,
                kd: 0.02,
                max_gate: 3.9,
            },
            // Aggressive
            Tier::Gladiator => TierParams {
                kp: 0.10,
                ki: 0.015,
                kd: 0.01,
                max_gate: 4.9,
            },
            // Extremely aggressive, minimal damping
            Tier::Reaper => TierParams {
                kp: 0.15,
                ki: 0.02,
                kd: 0.005,
                max_gate: 5.0,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Shield => "SHIELD",
            Tier::Guardian => "GUARDIAN",
            Tier::Gladiator => "GLADIATOR",
            Tier::Reaper => "REAPER",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Tier {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SHIELD" => Ok(Tier::Shield),
            "GUARDIAN" => Ok(Tier::Guardian),
            "GLADIATOR" => Ok(Tier::Gladiator),
            "REAPER" => Ok(Tier::Reaper),
            _ => Err(CoreError::UnknownTier(s.to_string())),
        }
    }
}

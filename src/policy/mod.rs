//! Policy type registry.
//!
//! Health, motor and life policies share one CRUD and filter engine; the only
//! thing that differs between them is the [`PolicySchema`] returned here.

pub mod schema;
pub mod validate;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub use schema::{FieldKind, FieldSpec, PolicySchema, PAYMENT_MODES};
pub use validate::{Document, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PolicyType {
    Health,
    Motor,
    Life,
}

impl PolicyType {
    pub const ALL: [PolicyType; 3] = [PolicyType::Health, PolicyType::Motor, PolicyType::Life];

    pub fn as_str(&self) -> &'static str {
        match self {
            PolicyType::Health => "health",
            PolicyType::Motor => "motor",
            PolicyType::Life => "life",
        }
    }

    /// Collection route, e.g. `/health-insurance`
    pub fn route(&self) -> &'static str {
        match self {
            PolicyType::Health => "/health-insurance",
            PolicyType::Motor => "/motor-insurance",
            PolicyType::Life => "/life-insurance",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PolicyType::Health => "HealthInsurance",
            PolicyType::Motor => "MotorInsurance",
            PolicyType::Life => "LifeInsurance",
        }
    }

    pub fn schema(&self) -> &'static PolicySchema {
        match self {
            PolicyType::Health => &schema::HEALTH,
            PolicyType::Motor => &schema::MOTOR,
            PolicyType::Life => &schema::LIFE,
        }
    }
}

impl std::fmt::Display for PolicyType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PolicyType {
    type Err = String;

    /// Accepts the short name or the route segment (`life`, `life-insurance`)
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_start_matches('/');
        let short = s.strip_suffix("-insurance").unwrap_or(s);
        match short.to_ascii_lowercase().as_str() {
            "health" => Ok(PolicyType::Health),
            "motor" => Ok(PolicyType::Motor),
            "life" => Ok(PolicyType::Life),
            _ => Err(format!("unknown policy type '{}' (expected health, motor or life)", s)),
        }
    }
}

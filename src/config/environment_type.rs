/**
 * Define `EnvironmentType` enum and implements various traits for it.
 *
 * The `EnvironmentType` enum selects which `stunwire.{environment}.yaml` file is layered
 * over the defaults, and the default log level:
 * - `development` (also aliased as 'dev')
 * - `staging` (also aliased as 'stg')
 * - `production` (also aliased as 'prod')
 */
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[allow(non_camel_case_types)]
pub enum EnvironmentType {
    development,
    staging,
    production,
}

impl std::str::FromStr for EnvironmentType {
    type Err = ();

    /**
     * Parse a string into an `EnvironmentType` enum. Unknown names mean production.
     */
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(EnvironmentType::development),
            "staging" | "stg" => Ok(EnvironmentType::staging),
            "production" | "prod" => Ok(EnvironmentType::production),
            _ => Ok(EnvironmentType::production),
        }
    }
}

impl EnvironmentType {
    /**
     * Convert an `EnvironmentType` enum into a string.
     */
    pub fn as_str(&self) -> &'static str {
        match self {
            EnvironmentType::development => "development",
            EnvironmentType::staging => "staging",
            EnvironmentType::production => "production",
        }
    }
}

impl<'de> Deserialize<'de> for EnvironmentType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(EnvironmentType::from_str(&s).unwrap_or(EnvironmentType::production))
    }
}

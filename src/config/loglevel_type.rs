use serde::de::{self, Deserializer, Visitor};

use slog::Level;
use std::{env, fmt};

use super::ENVIRONMENT_VARIABLE;

/**
 * Deserialize the log level from the configuration file.
 *
 * If the value is not a known level it is inferred from the environment type:
 * debug for development, warn for everything else.
 */
pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
where
    D: Deserializer<'de>,
{
    match deserializer.deserialize_str(LogLevelVisitor) {
        Ok(level) => Ok(level),
        Err(_) => {
            let env = env::var(ENVIRONMENT_VARIABLE).unwrap_or_else(|_| "production".into());
            Ok(default_level(&env))
        }
    }
}

/**
 * The level used when none (or garbage) is configured
 */
pub(crate) fn default_level(environment: &str) -> Level {
    match environment.to_lowercase().as_str() {
        "development" | "dev" => Level::Debug,
        _ => Level::Warning,
    }
}

struct LogLevelVisitor;

impl<'de> Visitor<'de> for LogLevelVisitor {
    type Value = Level;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a string representing a log level")
    }

    fn visit_str<E>(self, value: &str) -> Result<Level, E>
    where
        E: de::Error,
    {
        match value.to_lowercase().as_str() {
            "trace" => Ok(Level::Trace),
            "debug" => Ok(Level::Debug),
            "info" => Ok(Level::Info),
            "warn" => Ok(Level::Warning),
            "error" => Ok(Level::Error),
            "critical" => Ok(Level::Critical),
            _ => Err(de::Error::unknown_variant(
                value,
                &["trace", "debug", "info", "warn", "error", "critical"],
            )),
        }
    }
}

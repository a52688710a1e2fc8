use compliance_type::Compliance;
/**
 * Initialize probe configuration, using hierarchical configuration
 * https://docs.rs/config/latest/config/
 *
 * 1. First stunwire.yaml is read
 * 2. Then stunwire.{environment}.yaml is read
 * 3. Then stunwire.local.yaml is read (this is normally used for dev and not checked in git)
 * 4. Finally, environment variables are read
 */
use config::{Config, ConfigError, Environment, File};
use environment_type::EnvironmentType;
use serde::Deserialize;
use std::{env, time::Duration};
pub mod compliance_type;
pub mod environment_type;
mod loglevel_type;

/// Selects the environment-specific config file and the default log level
pub(crate) const ENVIRONMENT_VARIABLE: &str = "STUNWIRE_ENVIRONMENT";

/**
 * Represents the configuration settings for the probe.
 *
 * Fields:
 * - `environment`: The environment type (e.g., development, staging, or production).
 * - `server_address`: The STUN server to query (hostname:port format)
 * - `bind_address`: The local address to send from (hostname:port format, port 0 picks one)
 * - `timeout_ms`: How long to wait for the response, in milliseconds
 * - `compliance`: Which RFC the requests follow, this decides the magic cookie. By default, RFC5389 is used.
 * - `change_ip`: Ask the server to answer from its other IP address.
 * - `change_port`: Ask the server to answer from its other port.
 * - `log_level`: The logging level. By default, logging is inferred from environment type if no other settings are found.
 */
#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub environment: EnvironmentType,
    pub server_address: String,
    pub bind_address: String,
    pub timeout_ms: u64,
    #[serde(deserialize_with = "compliance_type::deserialize")]
    pub compliance: Compliance,
    pub change_ip: bool,
    pub change_port: bool,
    #[serde(deserialize_with = "loglevel_type::deserialize")]
    pub log_level: slog::Level,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = env::var(ENVIRONMENT_VARIABLE).unwrap_or_else(|_| "production".into());

        let s = Config::builder()
            // default config file
            .add_source(File::with_name("stunwire.yaml").required(false))
            // environment-based config file
            .add_source(File::with_name(&format!("stunwire.{run_mode}.yaml")).required(false))
            // local config file (don't check this into source control)
            .add_source(File::with_name("stunwire.local.yaml").required(false))
            .add_source(Environment::with_prefix("STUNWIRE"))
            .set_default("server_address", "stun.l.google.com:19302")?
            .set_default("bind_address", "0.0.0.0:0")?
            .set_default("timeout_ms", 3000)?
            .set_default("compliance", Compliance::RFC5389.as_str())?
            .set_default("change_ip", false)?
            .set_default("change_port", false)?
            .set_default(
                "log_level",
                if loglevel_type::default_level(&run_mode) == slog::Level::Debug {
                    "debug"
                } else {
                    "warn"
                },
            )?
            .set_default("environment", EnvironmentType::production.as_str())?
            .build()?;

        s.try_deserialize()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

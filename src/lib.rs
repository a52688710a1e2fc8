/**
 * A STUN (RFC 3489 / RFC 5389 / RFC 5780) message codec, with the configuration,
 * logging and UDP transport needed to query a server with it.
 */
use slog::{info, warn, Logger};
use std::sync::Arc;

pub mod config;
pub mod logging;
pub mod net;
pub mod stun;
mod utils;

use net::{StunTransport, TransportError, UdpTransport};
use stun::{StunChangeRequest, StunMessage};

/**
 * Represents the context shared by the probe and its transport.
 *
 * Fields:
 * - `config`: The configuration settings.
 * - `logger`: The logger instance.
 */
#[derive(Debug)]
pub struct Context {
    pub config: config::Settings,
    pub logger: Logger,
}

pub struct StunProbe {
    context: Arc<Context>,
}

impl StunProbe {
    /**
     * Creates a new `StunProbe` instance.
     *
     * This function loads the configuration and initializes the logger.
     *
     * @return An `Arc` containing the new `StunProbe` instance, or the configuration error.
     */
    pub fn new() -> Result<Arc<Self>, ::config::ConfigError> {
        let cfg = config::Settings::new()?;

        let context = Context {
            logger: logging::init_logger(&cfg),
            config: cfg,
        };

        Ok(Arc::new(Self {
            context: Arc::new(context),
        }))
    }

    /**
     * Build the request described by the configuration: a Binding Request
     * in the configured cookie mode, with CHANGE-REQUEST when either flag is set.
     */
    pub fn build_request(settings: &config::Settings) -> StunMessage {
        let mode = settings.compliance.cookie_mode();
        if settings.change_ip || settings.change_port {
            StunMessage::binding_request_with_change(
                mode,
                StunChangeRequest::new(settings.change_ip, settings.change_port),
            )
        } else {
            StunMessage::binding_request(mode)
        }
    }

    /**
     * Run the probe: one request to the configured server, the outcome logged.
     *
     * @return The server's response, or the transport error.
     */
    pub async fn run(self: Arc<Self>) -> Result<StunMessage, TransportError> {
        let transport = UdpTransport::connect(&self.context).await?;
        info!(
            self.context.logger,
            "Querying STUN server {} ({})",
            self.context.config.server_address,
            self.context.config.compliance.as_str()
        );

        Self::query(&self.context.logger, &transport, &self.context.config).await
    }

    /**
     * Send the configured request over `transport` and report the response
     */
    pub async fn query<T: StunTransport + Sync>(
        logger: &Logger,
        transport: &T,
        settings: &config::Settings,
    ) -> Result<StunMessage, TransportError> {
        let request = Self::build_request(settings);
        let response = transport.exchange(&request).await?;
        report(logger, &response);
        Ok(response)
    }
}

fn report(logger: &Logger, response: &StunMessage) {
    if let Some(error_code) = &response.error_code {
        warn!(logger, "{}: {}", response.message_type, error_code);
        return;
    }

    match response.reflexive_address() {
        Some(addr) => info!(logger, "{}: mapped address {}", response.message_type, addr),
        None => warn!(logger, "{} carries no mapped address", response.message_type),
    }
    if let Some(addr) = response.alternate_address() {
        info!(logger, "Server alternate address {}", addr);
    }
    if let Some(addr) = response.source_address {
        info!(logger, "Response sent from {}", addr);
    }
    if let Some(addr) = response.xor_relayed_address {
        info!(logger, "Relayed address {}", addr);
    }
}

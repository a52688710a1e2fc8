/**
 * Network related functionality: a single request/response exchange with a STUN server
 *
 */
use std::{net::SocketAddr, sync::Arc};

use crate::{
    stun::{StunError, StunMessage},
    utils, Context,
};
use async_trait::async_trait;
use slog::{debug, trace};
use thiserror::Error;
use tokio::net::{lookup_host, UdpSocket};
use tokio::time::{timeout, Duration};

/// Largest datagram accepted from the server
const MAX_MESSAGE_SIZE: usize = 1500;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("network I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("no response from {server} within {elapsed:?}")]
    Timeout { server: SocketAddr, elapsed: Duration },

    #[error("cannot resolve STUN server {0}")]
    Resolve(String),

    #[error(transparent)]
    Codec(#[from] StunError),

    #[error("response transaction {received} does not match request {expected}")]
    TransactionMismatch { expected: String, received: String },
}

/**
 * This trait defines an asynchronous method for sending one STUN request and
 * receiving its response. Retransmission is left to the caller.
 */
#[async_trait]
pub trait StunTransport {
    async fn exchange(&self, request: &StunMessage) -> Result<StunMessage, TransportError>;
}

/**
 * UDP transport towards the configured STUN server.
 *
 * The socket is not connected: a server honouring CHANGE-REQUEST answers
 * from a different address than the one the request went to.
 */
pub struct UdpTransport {
    context: Arc<Context>,
    socket: UdpSocket,
    server: SocketAddr,
    timeout: Duration,
}

impl UdpTransport {
    /**
     * Bind the local socket and resolve the server, both taken from the configuration
     *
     * @param context The context containing configuration and logger
     * @return The transport, or an error if binding or resolution fails
     */
    pub async fn connect(context: &Arc<Context>) -> Result<Self, TransportError> {
        let socket = UdpSocket::bind(&context.config.bind_address).await?;

        let server_address = &context.config.server_address;
        let server = lookup_host(server_address)
            .await
            .map_err(|_| TransportError::Resolve(server_address.clone()))?
            .find(SocketAddr::is_ipv4)
            .ok_or_else(|| TransportError::Resolve(server_address.clone()))?;

        debug!(
            context.logger,
            "Using STUN server {} ({}) from {}",
            server_address,
            server,
            socket.local_addr()?
        );

        Ok(Self {
            context: Arc::clone(context),
            socket,
            server,
            timeout: context.config.timeout(),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, TransportError> {
        Ok(self.socket.local_addr()?)
    }

    pub fn server(&self) -> SocketAddr {
        self.server
    }
}

#[async_trait]
impl StunTransport for UdpTransport {
    /**
     * Send the request once and wait for the first datagram to come back.
     *
     * @param request The request to send
     * @return The parsed response, which must carry the request's transaction ID
     */
    async fn exchange(&self, request: &StunMessage) -> Result<StunMessage, TransportError> {
        let logger = &self.context.logger;
        let output = request.to_bytes();

        trace!(
            logger,
            "--<-- [{}] {}: {}",
            hex::encode(request.transaction_id),
            request.message_type,
            utils::hex_encode_delimited(&output)
        );
        self.socket.send_to(&output, self.server).await?;

        let mut buffer = [0u8; MAX_MESSAGE_SIZE];
        let (n, from) = timeout(self.timeout, self.socket.recv_from(&mut buffer))
            .await
            .map_err(|_| TransportError::Timeout {
                server: self.server,
                elapsed: self.timeout,
            })??;

        trace!(
            logger,
            "-->-- [{}] from {}: {}",
            hex::encode(request.transaction_id),
            from,
            utils::hex_encode_delimited(&buffer[..n])
        );

        let response = StunMessage::parse(&buffer[..n]).map_err(|e| {
            debug!(logger, "Discarding undecodable response from {}: {}", from, e);
            e
        })?;

        if !response.is_response_to(request) {
            return Err(TransportError::TransactionMismatch {
                expected: hex::encode(request.transaction_id),
                received: hex::encode(response.transaction_id),
            });
        }

        Ok(response)
    }
}

/**
 * A STUN message, the single entity handled by the codec.
 *
 * A message is either built locally as an outgoing request (fresh random
 * transaction ID, a chosen magic-cookie mode, at most one attribute) or
 * produced by `StunMessage::parse` from a received datagram.
 */
use std::net::SocketAddrV4;

use rand::Rng;

use super::{
    decode::decode_message,
    defs::{StunChangeRequest, StunErrorCode, StunMessageType},
    encode::encode_message,
    error::StunError,
    MAGIC_COOKIE, TRANSACTION_ID_LENGTH,
};

/**
 * Which flavour of header to build: RFC 3489 clients send a zero cookie,
 * RFC 5389 / RFC 5780 clients send 0x2112A442.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CookieMode {
    Legacy,
    Rfc5389,
}

impl CookieMode {
    pub fn magic_cookie(&self) -> u32 {
        match self {
            CookieMode::Legacy => 0,
            CookieMode::Rfc5389 => MAGIC_COOKIE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StunMessage {
    pub message_type: StunMessageType,
    pub magic_cookie: u32,
    pub transaction_id: [u8; TRANSACTION_ID_LENGTH],
    pub mapped_address: Option<SocketAddrV4>,
    pub response_address: Option<SocketAddrV4>,
    pub source_address: Option<SocketAddrV4>,
    pub changed_address: Option<SocketAddrV4>,
    pub change_request: Option<StunChangeRequest>,
    pub error_code: Option<StunErrorCode>,
    /// Never filled by `parse`: 0x802B is dispatched as XOR-RELAYED-ADDRESS, and the encoder never writes it
    pub response_origin: Option<SocketAddrV4>,
    pub reflected_from: Option<SocketAddrV4>,
    pub other_address: Option<SocketAddrV4>,
    pub xor_mapped_address: Option<SocketAddrV4>,
    pub xor_relayed_address: Option<SocketAddrV4>,
}

impl StunMessage {
    /**
     * Create an empty message with a random transaction ID
     *
     * @param message_type The message type
     * @param magic_cookie Either 0 (RFC 3489) or `MAGIC_COOKIE`
     */
    pub fn new(message_type: StunMessageType, magic_cookie: u32) -> Self {
        let mut transaction_id = [0u8; TRANSACTION_ID_LENGTH];
        rand::thread_rng().fill(&mut transaction_id);

        Self::with_header(message_type, magic_cookie, transaction_id)
    }

    pub(crate) fn with_header(
        message_type: StunMessageType,
        magic_cookie: u32,
        transaction_id: [u8; TRANSACTION_ID_LENGTH],
    ) -> Self {
        StunMessage {
            message_type,
            magic_cookie,
            transaction_id,
            mapped_address: None,
            response_address: None,
            source_address: None,
            changed_address: None,
            change_request: None,
            error_code: None,
            response_origin: None,
            reflected_from: None,
            other_address: None,
            xor_mapped_address: None,
            xor_relayed_address: None,
        }
    }

    /**
     * A Binding Request without attributes
     */
    pub fn binding_request(mode: CookieMode) -> Self {
        Self::new(StunMessageType::BindingRequest, mode.magic_cookie())
    }

    /**
     * A Binding Request carrying a CHANGE-REQUEST attribute
     */
    pub fn binding_request_with_change(mode: CookieMode, change_request: StunChangeRequest) -> Self {
        Self::binding_request(mode).with_change_request(change_request)
    }

    pub fn with_transaction_id(mut self, transaction_id: [u8; TRANSACTION_ID_LENGTH]) -> Self {
        self.transaction_id = transaction_id;
        self
    }

    pub fn with_mapped_address(mut self, addr: SocketAddrV4) -> Self {
        self.mapped_address = Some(addr);
        self
    }

    pub fn with_response_address(mut self, addr: SocketAddrV4) -> Self {
        self.response_address = Some(addr);
        self
    }

    pub fn with_change_request(mut self, change_request: StunChangeRequest) -> Self {
        self.change_request = Some(change_request);
        self
    }

    pub fn with_source_address(mut self, addr: SocketAddrV4) -> Self {
        self.source_address = Some(addr);
        self
    }

    pub fn with_changed_address(mut self, addr: SocketAddrV4) -> Self {
        self.changed_address = Some(addr);
        self
    }

    pub fn with_error_code(mut self, error_code: StunErrorCode) -> Self {
        self.error_code = Some(error_code);
        self
    }

    /**
     * Decode a received datagram
     *
     * @param bytes The raw message
     * @return The decoded message, or the first fatal decode error
     */
    pub fn parse(bytes: &[u8]) -> Result<StunMessage, StunError> {
        decode_message(bytes)
    }

    /**
     * Encode the message for transmission.
     *
     * Only one attribute is written, the first present in this order:
     * MAPPED-ADDRESS, RESPONSE-ADDRESS, CHANGE-REQUEST, SOURCE-ADDRESS,
     * CHANGED-ADDRESS, ERROR-CODE. Other attributes set on the message are
     * not sent.
     */
    pub fn to_bytes(&self) -> Vec<u8> {
        encode_message(self)
    }

    /**
     * The client's reflexive address. XOR-MAPPED-ADDRESS takes precedence
     * over MAPPED-ADDRESS when both are present.
     */
    pub fn reflexive_address(&self) -> Option<SocketAddrV4> {
        self.xor_mapped_address.or(self.mapped_address)
    }

    /**
     * The server's alternate address, from OTHER-ADDRESS (RFC 5780) or,
     * failing that, CHANGED-ADDRESS (RFC 3489)
     */
    pub fn alternate_address(&self) -> Option<SocketAddrV4> {
        self.other_address.or(self.changed_address)
    }

    /**
     * Check whether this message answers `request`
     */
    pub fn is_response_to(&self, request: &StunMessage) -> bool {
        self.transaction_id == request.transaction_id
    }

    pub fn is_error(&self) -> bool {
        matches!(
            self.message_type,
            StunMessageType::BindingErrorResponse | StunMessageType::SharedSecretErrorResponse
        )
    }
}

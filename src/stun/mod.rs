/**
 * The STUN-specific module: the message codec plus the constant definitions it relies on
 */

mod address;
mod decode;
mod defs;
mod encode;
mod error;
mod header;
mod message;

pub use defs::{AttributeType, StunChangeRequest, StunErrorCode, StunMessageType};
pub use error::StunError;
pub use message::{CookieMode, StunMessage};

/// length of a STUN header is 20 bytes
pub const HEADER_LENGTH: u16 = 20;

/// This value is included in STUN messages to help differentiate them from other types of network traffic and to
/// ensure that the messages are processed correctly by STUN servers and clients. The Magic Cookie value is 0x2112A442.
/// RFC 3489 clients put zero in the same four bytes.
pub const MAGIC_COOKIE: u32 = 0x2112A442;

/// Length of the transaction ID following the magic cookie
pub const TRANSACTION_ID_LENGTH: usize = 12;

// Message Types
pub mod message_type {
    /// A STUN client sends a Binding Request to a STUN server to learn the address the server sees it from.
    pub const MSG_BINDING_REQUEST: u16 = 0x0001;

    /// This message provides the client with its public IP address and port information, which is essential for
    /// establishing peer-to-peer connections across NATs and firewalls.
    pub const MSG_BINDING_RESPONSE: u16 = 0x0101;

    /// This message informs the client that the Binding Request could not be processed due to an error and
    /// carries an ERROR-CODE attribute describing it.
    pub const MSG_BINDING_ERROR_RESPONSE: u16 = 0x0111;

    /// In this message, the client asks the server for a short-lived username and password (RFC 3489).
    pub const MSG_SHARED_SECRET_REQUEST: u16 = 0x0002;

    /// The server's answer to a SHARED_SECRET_REQUEST, normally carrying USERNAME and PASSWORD.
    pub const MSG_SHARED_SECRET_RESPONSE: u16 = 0x0102;

    /// This message notifies the client that the Shared Secret Request could not be processed.
    pub const MSG_SHARED_SECRET_ERROR_RESPONSE: u16 = 0x0112;
}

/*
   Attribute codes understood by the decoder. Anything else aborts the parse.

     0x0001: MAPPED-ADDRESS
     0x0002: RESPONSE-ADDRESS
     0x0003: CHANGE-REQUEST
     0x0004: SOURCE-ADDRESS
     0x0005: CHANGED-ADDRESS
     0x0006: USERNAME
     0x0007: PASSWORD
     0x0008: MESSAGE-INTEGRITY
     0x0009: ERROR-CODE
     0x000A: UNKNOWN-ATTRIBUTES
     0x000B: REFLECTED-FROM
     0x0020: XOR-MAPPED-ADDRESS
     0x0021: XOR-ONLY
     0x8022: SERVER (SOFTWARE)
     0x8028: FINGERPRINT
     0x802B: XOR-RELAYED-ADDRESS
     0x802C: OTHER-ADDRESS
*/

// Attribute Types
pub mod attribute_type {
    /// The reflexive transport address of the client as seen by the server, in the clear.
    pub const ATTR_MAPPED_ADDRESS: u16 = 0x0001;

    /// This optional attribute, found in the Binding Request, specifies where the Binding Response should be
    /// sent. If omitted, the response goes to the source of the request.
    pub const ATTR_RESPONSE_ADDRESS: u16 = 0x0002;

    /// This optional attribute, exclusive to the Binding Request, contains two flags: "change IP" and "change Port."
    /// They ask the server to answer from a different source IP address and/or port, which is how restricted cone
    /// and port restricted cone NATs are told apart.
    pub const ATTR_CHANGE_REQUEST: u16 = 0x0003;

    /// The source IP address and port the server sent the response from.
    pub const ATTR_SOURCE_ADDRESS: u16 = 0x0004;

    /// The address the server would answer from if the client set both change flags.
    pub const ATTR_CHANGED_ADDRESS: u16 = 0x0005;

    /// Credential used to authenticate the client to the server.
    pub const ATTR_USERNAME: u16 = 0x0006;

    /// Shared secret handed out in Shared Secret Responses, alongside USERNAME.
    pub const ATTR_PASSWORD: u16 = 0x0007;

    /// HMAC-SHA1 of the message. It is skipped by the decoder, never verified.
    pub const ATTR_MESSAGE_INTEGRITY: u16 = 0x0008;

    /// Present in error responses only. Carries a numeric code in the range 100 to 699 and a UTF-8 reason phrase.
    pub const ATTR_ERROR_CODE: u16 = 0x0009;

    /// Lists the attributes of the request the server did not understand (error code 420).
    pub const ATTR_UNKNOWN_ATTRIBUTES: u16 = 0x000A;

    /// Identity of the requester, included by the server to provide traceability when RESPONSE-ADDRESS is used.
    pub const ATTR_REFLECTED_FROM: u16 = 0x000B;

    /// The reflexive address obfuscated with the magic cookie, so that NATs rewriting payload addresses leave it alone.
    pub const ATTR_XOR_MAPPED_ADDRESS: u16 = 0x0020;

    /// Asks the server to send XOR-MAPPED-ADDRESS only (pre-RFC 5389 drafts).
    pub const ATTR_XOR_ONLY: u16 = 0x0021;

    /// Human-readable name and version of the server software.
    pub const ATTR_SERVER_NAME: u16 = 0x8022;

    /// CRC32 of the message XOR'd with 0x5354554E. Skipped by the decoder.
    pub const ATTR_XOR_FRAG: u16 = 0x8028;

    /// Relayed transport address, obfuscated with the message's own magic cookie field.
    pub const ATTR_XOR_RELAYED_ADDRESS: u16 = 0x802B;

    /// RFC 5780 replacement for CHANGED-ADDRESS: the alternate address and port of the server.
    pub const ATTR_OTHER_ADDRESS: u16 = 0x802C;
}

// Error Codes
pub mod error_code {
    /// Bad Request (400)
    pub const ERROR_CODE_BAD_REQUEST: u16 = 400;

    /// Unauthorized (401)
    pub const ERROR_CODE_UNAUTHORIZED: u16 = 401;

    /// Unknown Attribute (420)
    pub const ERROR_CODE_UNKNOWN_ATTRIBUTE: u16 = 420;

    /// Stale Credentials (430)
    pub const ERROR_CODE_STALE_CREDENTIALS: u16 = 430;

    /// Integrity Check Failure (431)
    pub const ERROR_CODE_INTEGRITY_CHECK_FAILURE: u16 = 431;

    /// Missing Username (432)
    pub const ERROR_CODE_MISSING_USERNAME: u16 = 432;

    /// Use TLS (433)
    pub const ERROR_CODE_USE_TLS: u16 = 433;

    /// Stale Nonce (438)
    pub const ERROR_CODE_STALE_NONCE: u16 = 438;

    /// Server Error (500)
    pub const ERROR_CODE_SERVER_ERROR: u16 = 500;

    /// Global Failure (600)
    pub const ERROR_CODE_GLOBAL_FAILURE: u16 = 600;
}

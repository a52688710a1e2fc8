use thiserror::Error;

/**
 * Errors raised while decoding a STUN message or building one of its values.
 *
 * `InvalidErrorCode` comes from `StunErrorCode::new` only. Of the rest, all but `InvalidUtf8`
 * abort the parse. `InvalidUtf8` is recovered from locally by the ERROR-CODE decoder and
 * never reaches the caller of `StunMessage::parse`.
 */
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StunError {
    #[error("malformed STUN message: {0}")]
    MalformedMessage(String),

    #[error("unknown STUN message type 0x{0:04X}")]
    UnknownMessageType(u16),

    #[error("unknown STUN attribute type 0x{0:04X}")]
    UnknownAttributeType(u16),

    #[error("error code {0} is outside 300..=699")]
    InvalidErrorCode(u16),

    #[error("reason phrase is not valid UTF-8")]
    InvalidUtf8,
}

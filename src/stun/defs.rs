use std::fmt;

use super::{attribute_type::*, error::StunError, message_type::*};

/**
 * A trait for STUN attribute values that the encoder knows how to write
 */
pub(crate) trait StunAttribute {
    fn write_to(&self, out: &mut Vec<u8>);
    fn attr_length(&self) -> u16;
}

/**
 * The six message types this codec understands. Any other value in the
 * header is rejected.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StunMessageType {
    BindingRequest,
    BindingResponse,
    BindingErrorResponse,
    SharedSecretRequest,
    SharedSecretResponse,
    SharedSecretErrorResponse,
}

impl StunMessageType {
    /**
     * Map a raw header value to a message type.
     *
     * @param value The 16-bit type field, as read from the wire
     * @return The message type, or `UnknownMessageType` if the value is not one of the six known ones
     */
    pub fn from_u16(value: u16) -> Result<Self, StunError> {
        match value {
            MSG_BINDING_REQUEST => Ok(StunMessageType::BindingRequest),
            MSG_BINDING_RESPONSE => Ok(StunMessageType::BindingResponse),
            MSG_BINDING_ERROR_RESPONSE => Ok(StunMessageType::BindingErrorResponse),
            MSG_SHARED_SECRET_REQUEST => Ok(StunMessageType::SharedSecretRequest),
            MSG_SHARED_SECRET_RESPONSE => Ok(StunMessageType::SharedSecretResponse),
            MSG_SHARED_SECRET_ERROR_RESPONSE => Ok(StunMessageType::SharedSecretErrorResponse),
            other => Err(StunError::UnknownMessageType(other)),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            StunMessageType::BindingRequest => MSG_BINDING_REQUEST,
            StunMessageType::BindingResponse => MSG_BINDING_RESPONSE,
            StunMessageType::BindingErrorResponse => MSG_BINDING_ERROR_RESPONSE,
            StunMessageType::SharedSecretRequest => MSG_SHARED_SECRET_REQUEST,
            StunMessageType::SharedSecretResponse => MSG_SHARED_SECRET_RESPONSE,
            StunMessageType::SharedSecretErrorResponse => MSG_SHARED_SECRET_ERROR_RESPONSE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StunMessageType::BindingRequest => "Binding Request",
            StunMessageType::BindingResponse => "Binding Response",
            StunMessageType::BindingErrorResponse => "Binding Error Response",
            StunMessageType::SharedSecretRequest => "Shared Secret Request",
            StunMessageType::SharedSecretResponse => "Shared Secret Response",
            StunMessageType::SharedSecretErrorResponse => "Shared Secret Error Response",
        }
    }
}

impl fmt::Display for StunMessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/**
 * The closed set of attribute codes the decoder accepts
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeType {
    MappedAddress,
    ResponseAddress,
    ChangeRequest,
    SourceAddress,
    ChangedAddress,
    Username,
    Password,
    MessageIntegrity,
    ErrorCode,
    UnknownAttribute,
    ReflectedFrom,
    XorMappedAddress,
    XorOnly,
    ServerName,
    XorFrag,
    XorRelayAddress,
    OtherAddress,
}

impl AttributeType {
    /**
     * Map a raw attribute type to the known set.
     *
     * @param value The 16-bit attribute type
     * @return The attribute type, or `UnknownAttributeType` for anything outside the set
     */
    pub fn from_u16(value: u16) -> Result<Self, StunError> {
        match value {
            ATTR_MAPPED_ADDRESS => Ok(AttributeType::MappedAddress),
            ATTR_RESPONSE_ADDRESS => Ok(AttributeType::ResponseAddress),
            ATTR_CHANGE_REQUEST => Ok(AttributeType::ChangeRequest),
            ATTR_SOURCE_ADDRESS => Ok(AttributeType::SourceAddress),
            ATTR_CHANGED_ADDRESS => Ok(AttributeType::ChangedAddress),
            ATTR_USERNAME => Ok(AttributeType::Username),
            ATTR_PASSWORD => Ok(AttributeType::Password),
            ATTR_MESSAGE_INTEGRITY => Ok(AttributeType::MessageIntegrity),
            ATTR_ERROR_CODE => Ok(AttributeType::ErrorCode),
            ATTR_UNKNOWN_ATTRIBUTES => Ok(AttributeType::UnknownAttribute),
            ATTR_REFLECTED_FROM => Ok(AttributeType::ReflectedFrom),
            ATTR_XOR_MAPPED_ADDRESS => Ok(AttributeType::XorMappedAddress),
            ATTR_XOR_ONLY => Ok(AttributeType::XorOnly),
            ATTR_SERVER_NAME => Ok(AttributeType::ServerName),
            ATTR_XOR_FRAG => Ok(AttributeType::XorFrag),
            ATTR_XOR_RELAYED_ADDRESS => Ok(AttributeType::XorRelayAddress),
            ATTR_OTHER_ADDRESS => Ok(AttributeType::OtherAddress),
            other => Err(StunError::UnknownAttributeType(other)),
        }
    }

    pub fn as_u16(&self) -> u16 {
        match self {
            AttributeType::MappedAddress => ATTR_MAPPED_ADDRESS,
            AttributeType::ResponseAddress => ATTR_RESPONSE_ADDRESS,
            AttributeType::ChangeRequest => ATTR_CHANGE_REQUEST,
            AttributeType::SourceAddress => ATTR_SOURCE_ADDRESS,
            AttributeType::ChangedAddress => ATTR_CHANGED_ADDRESS,
            AttributeType::Username => ATTR_USERNAME,
            AttributeType::Password => ATTR_PASSWORD,
            AttributeType::MessageIntegrity => ATTR_MESSAGE_INTEGRITY,
            AttributeType::ErrorCode => ATTR_ERROR_CODE,
            AttributeType::UnknownAttribute => ATTR_UNKNOWN_ATTRIBUTES,
            AttributeType::ReflectedFrom => ATTR_REFLECTED_FROM,
            AttributeType::XorMappedAddress => ATTR_XOR_MAPPED_ADDRESS,
            AttributeType::XorOnly => ATTR_XOR_ONLY,
            AttributeType::ServerName => ATTR_SERVER_NAME,
            AttributeType::XorFrag => ATTR_XOR_FRAG,
            AttributeType::XorRelayAddress => ATTR_XOR_RELAYED_ADDRESS,
            AttributeType::OtherAddress => ATTR_OTHER_ADDRESS,
        }
    }
}

/**
 * CHANGE-REQUEST value: asks the server to answer from a different IP and/or port
 */
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StunChangeRequest {
    pub change_ip: bool,
    pub change_port: bool,
}

const CHANGE_IP_FLAG: u8 = 0x04;
const CHANGE_PORT_FLAG: u8 = 0x02;

impl StunChangeRequest {
    pub fn new(change_ip: bool, change_port: bool) -> Self {
        Self {
            change_ip,
            change_port,
        }
    }

    pub(crate) fn from_flags(flags: u8) -> Self {
        Self {
            change_ip: flags & CHANGE_IP_FLAG != 0,
            change_port: flags & CHANGE_PORT_FLAG != 0,
        }
    }

    pub(crate) fn flags(&self) -> u8 {
        ((self.change_ip as u8) << 2) | ((self.change_port as u8) << 1)
    }
}

impl StunAttribute for StunChangeRequest {
    /**
     * Three reserved zero bytes followed by the flag byte
     */
    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[0, 0, 0, self.flags()]);
    }

    fn attr_length(&self) -> u16 {
        4
    }
}

/**
 * ERROR-CODE value: `code` is class * 100 + number (e.g. 420)
 */
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StunErrorCode {
    code: u16,
    reason_text: String,
}

/// RFC 5389 caps the reason phrase at 763 bytes
pub(crate) const MAX_REASON_LENGTH: usize = 763;

/// Codes a sender may put in an ERROR-CODE attribute
const ERROR_CODE_RANGE: std::ops::RangeInclusive<u16> = 300..=699;

/**
 * The longest prefix of `reason_text` that fits in `MAX_REASON_LENGTH` bytes
 * without splitting a character
 */
fn clamp_reason(reason_text: &str) -> &str {
    let mut end = reason_text.len().min(MAX_REASON_LENGTH);
    while !reason_text.is_char_boundary(end) {
        end -= 1;
    }
    &reason_text[..end]
}

impl StunErrorCode {
    /**
     * Create an error code value. Reason phrases longer than 763 bytes are
     * cut at the last character boundary that fits.
     *
     * @param code Class * 100 + number, 300 to 699
     * @param reason_text Human readable reason phrase
     * @return The value, or `InvalidErrorCode` when `code` is out of range
     */
    pub fn new(code: u16, reason_text: impl Into<String>) -> Result<Self, StunError> {
        if !ERROR_CODE_RANGE.contains(&code) {
            return Err(StunError::InvalidErrorCode(code));
        }

        let mut reason_text = reason_text.into();
        let end = clamp_reason(&reason_text).len();
        reason_text.truncate(end);

        Ok(Self { code, reason_text })
    }

    /**
     * Build a value exactly as read from the wire: class 0 to 7, number 0 to 255,
     * reason phrase of any length
     */
    pub(crate) fn from_wire(code: u16, reason_text: String) -> Self {
        Self { code, reason_text }
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn reason_text(&self) -> &str {
        &self.reason_text
    }

    pub fn class(&self) -> u8 {
        (self.code / 100) as u8
    }

    pub fn number(&self) -> u8 {
        (self.code % 100) as u8
    }
}

impl StunAttribute for StunErrorCode {
    /**
     * Two reserved bytes, the class, the number, then the raw reason phrase (unpadded).
     * A decoded phrase longer than 763 bytes goes out truncated.
     */
    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&[0, 0, self.class(), self.number()]);
        out.extend_from_slice(clamp_reason(&self.reason_text).as_bytes());
    }

    fn attr_length(&self) -> u16 {
        (4 + clamp_reason(&self.reason_text).len()) as u16
    }
}

impl fmt::Display for StunErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.reason_text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stun::error_code::*;

    #[test]
    fn test_message_type_mapping() {
        let all = [
            StunMessageType::BindingRequest,
            StunMessageType::BindingResponse,
            StunMessageType::BindingErrorResponse,
            StunMessageType::SharedSecretRequest,
            StunMessageType::SharedSecretResponse,
            StunMessageType::SharedSecretErrorResponse,
        ];
        for t in all {
            assert_eq!(StunMessageType::from_u16(t.as_u16()).unwrap(), t);
        }
        assert_eq!(
            StunMessageType::from_u16(0x0003),
            Err(StunError::UnknownMessageType(0x0003))
        );
    }

    #[test]
    fn test_attribute_type_mapping() {
        let all = [
            AttributeType::MappedAddress,
            AttributeType::ResponseAddress,
            AttributeType::ChangeRequest,
            AttributeType::SourceAddress,
            AttributeType::ChangedAddress,
            AttributeType::Username,
            AttributeType::Password,
            AttributeType::MessageIntegrity,
            AttributeType::ErrorCode,
            AttributeType::UnknownAttribute,
            AttributeType::ReflectedFrom,
            AttributeType::XorMappedAddress,
            AttributeType::XorOnly,
            AttributeType::ServerName,
            AttributeType::XorFrag,
            AttributeType::XorRelayAddress,
            AttributeType::OtherAddress,
        ];
        for t in all {
            assert_eq!(AttributeType::from_u16(t.as_u16()).unwrap(), t);
        }
        assert_eq!(AttributeType::OtherAddress.as_u16(), 0x802C);
    }

    #[test]
    fn test_attribute_type_rejects_unknown() {
        assert_eq!(
            AttributeType::from_u16(0x0014),
            Err(StunError::UnknownAttributeType(0x0014))
        );
    }

    #[test]
    fn test_change_request_flags() {
        assert_eq!(StunChangeRequest::new(true, false).flags(), 0x04);
        assert_eq!(StunChangeRequest::new(false, true).flags(), 0x02);
        assert_eq!(StunChangeRequest::new(true, true).flags(), 0x06);
        assert_eq!(
            StunChangeRequest::from_flags(0x06),
            StunChangeRequest::new(true, true)
        );
        assert_eq!(
            StunChangeRequest::from_flags(0x00),
            StunChangeRequest::default()
        );
    }

    #[test]
    fn test_error_code_value() {
        let err = StunErrorCode::new(420, "Unknown Attribute").unwrap();
        let mut out = Vec::new();
        err.write_to(&mut out);

        assert_eq!(err.attr_length() as usize, 4 + "Unknown Attribute".len());
        assert_eq!(&out[..4], &[0, 0, 4, 20]);
        assert_eq!(&out[4..], b"Unknown Attribute");
    }

    #[test]
    fn test_error_code_reason_truncated() {
        let err = StunErrorCode::new(500, "é".repeat(400)).unwrap();
        assert!(err.reason_text().len() <= MAX_REASON_LENGTH);
        assert_eq!(err.reason_text().len(), 762);
        assert_eq!(err.class(), 5);
        assert_eq!(err.number(), 0);
    }

    #[test]
    fn test_error_code_out_of_range() {
        assert_eq!(
            StunErrorCode::new(1000, "x"),
            Err(StunError::InvalidErrorCode(1000))
        );
        assert_eq!(
            StunErrorCode::new(65535, "x"),
            Err(StunError::InvalidErrorCode(65535))
        );
        assert_eq!(
            StunErrorCode::new(299, "x"),
            Err(StunError::InvalidErrorCode(299))
        );
        assert!(StunErrorCode::new(300, "Try Alternate").is_ok());
        assert!(StunErrorCode::new(699, "x").is_ok());
    }

    #[test]
    fn test_error_code_constants() {
        let expected = [
            (ERROR_CODE_BAD_REQUEST, 4, 0),
            (ERROR_CODE_UNAUTHORIZED, 4, 1),
            (ERROR_CODE_UNKNOWN_ATTRIBUTE, 4, 20),
            (ERROR_CODE_STALE_CREDENTIALS, 4, 30),
            (ERROR_CODE_INTEGRITY_CHECK_FAILURE, 4, 31),
            (ERROR_CODE_MISSING_USERNAME, 4, 32),
            (ERROR_CODE_USE_TLS, 4, 33),
            (ERROR_CODE_STALE_NONCE, 4, 38),
            (ERROR_CODE_SERVER_ERROR, 5, 0),
            (ERROR_CODE_GLOBAL_FAILURE, 6, 0),
        ];
        for (code, class, number) in expected {
            let err = StunErrorCode::new(code, "reason").unwrap();
            assert_eq!(err.code(), code);
            assert_eq!((err.class(), err.number()), (class, number));
        }
    }

    #[test]
    fn test_decoded_long_reason_encoded_within_cap() {
        let err = StunErrorCode::from_wire(400, "a".repeat(70000));
        let mut out = Vec::new();
        err.write_to(&mut out);

        assert_eq!(err.attr_length() as usize, 4 + MAX_REASON_LENGTH);
        assert_eq!(out.len(), err.attr_length() as usize);
        assert_eq!(&out[..4], &[0, 0, 4, 0]);
    }
}

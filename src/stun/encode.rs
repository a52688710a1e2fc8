/**
 * Encoding of outgoing STUN messages.
 *
 * A message carries at most one attribute on the wire. When several are set,
 * the first present in this order wins: MAPPED-ADDRESS, RESPONSE-ADDRESS,
 * CHANGE-REQUEST, SOURCE-ADDRESS, CHANGED-ADDRESS, ERROR-CODE.
 */
use super::{
    attribute_type::{
        ATTR_CHANGED_ADDRESS, ATTR_CHANGE_REQUEST, ATTR_ERROR_CODE, ATTR_MAPPED_ADDRESS,
        ATTR_RESPONSE_ADDRESS, ATTR_SOURCE_ADDRESS,
    },
    defs::{StunAttribute, MAX_REASON_LENGTH},
    header::StunHeader,
    message::StunMessage,
    HEADER_LENGTH,
};

/// Header, one attribute header and the largest attribute value (ERROR-CODE)
const MAX_ENCODED_LENGTH: usize = HEADER_LENGTH as usize + 4 + 4 + MAX_REASON_LENGTH;

/**
 * Write an attribute header followed by its value
 */
fn write_attribute<T: StunAttribute>(attr_id: u16, out: &mut Vec<u8>, value: &T) {
    out.extend_from_slice(&attr_id.to_be_bytes());
    out.extend_from_slice(&value.attr_length().to_be_bytes());
    value.write_to(out);
}

/**
 * Serialize a message
 *
 * @param message The message to encode
 * @return Exactly the bytes to put on the wire
 */
pub(crate) fn encode_message(message: &StunMessage) -> Vec<u8> {
    let mut out = Vec::with_capacity(MAX_ENCODED_LENGTH);

    let header = StunHeader {
        message_type: message.message_type,
        message_length: 0,
        magic_cookie: message.magic_cookie,
        transaction_id: message.transaction_id,
    };
    header.encode(&mut out);

    if let Some(ref addr) = message.mapped_address {
        write_attribute(ATTR_MAPPED_ADDRESS, &mut out, addr);
    } else if let Some(ref addr) = message.response_address {
        write_attribute(ATTR_RESPONSE_ADDRESS, &mut out, addr);
    } else if let Some(ref change_request) = message.change_request {
        write_attribute(ATTR_CHANGE_REQUEST, &mut out, change_request);
    } else if let Some(ref addr) = message.source_address {
        write_attribute(ATTR_SOURCE_ADDRESS, &mut out, addr);
    } else if let Some(ref addr) = message.changed_address {
        write_attribute(ATTR_CHANGED_ADDRESS, &mut out, addr);
    } else if let Some(ref error_code) = message.error_code {
        write_attribute(ATTR_ERROR_CODE, &mut out, error_code);
    }

    StunHeader::patch_length(&mut out);
    out
}

#[cfg(test)]
mod tests {
    use std::net::SocketAddrV4;

    use super::*;
    use crate::stun::{
        defs::{StunChangeRequest, StunErrorCode, StunMessageType},
        error_code::{ERROR_CODE_BAD_REQUEST, ERROR_CODE_SERVER_ERROR, ERROR_CODE_UNKNOWN_ATTRIBUTE},
        CookieMode, MAGIC_COOKIE,
    };

    const TRANSACTION_ID: [u8; 12] = [
        0xcc, 0x96, 0x2d, 0x59, 0x2e, 0x49, 0x85, 0x1e, 0x5b, 0x4f, 0x2f, 0x20,
    ];

    fn addr(s: &str) -> SocketAddrV4 {
        s.parse().unwrap()
    }

    fn length_field(bytes: &[u8]) -> usize {
        u16::from_be_bytes([bytes[2], bytes[3]]) as usize
    }

    #[test]
    fn test_serialize_plain_request() {
        let expected = [
            0, 1, 0, 0, 33, 18, 164, 66, 204, 150, 45, 89, 46, 73, 133, 30, 91, 79, 47, 32,
        ];

        let msg = StunMessage::binding_request(CookieMode::Rfc5389).with_transaction_id(TRANSACTION_ID);
        let bytes = encode_message(&msg);

        assert_eq!(bytes, expected);
    }

    #[test]
    fn test_serialize_change_request() {
        let expected = [
            0, 1, 0, 8, 0, 0, 0, 0, 204, 150, 45, 89, 46, 73, 133, 30, 91, 79, 47, 32, 0, 3, 0, 4,
            0, 0, 0, 4,
        ];

        let msg = StunMessage::binding_request_with_change(
            CookieMode::Legacy,
            StunChangeRequest::new(true, false),
        )
        .with_transaction_id(TRANSACTION_ID);
        let bytes = encode_message(&msg);

        assert_eq!(bytes, expected);
        assert_eq!(length_field(&bytes), bytes.len() - 20);
    }

    #[test]
    fn test_serialize_mapped_address() {
        let msg = StunMessage::new(StunMessageType::BindingResponse, MAGIC_COOKIE)
            .with_transaction_id(TRANSACTION_ID)
            .with_mapped_address(addr("192.168.1.1:54321"));
        let bytes = encode_message(&msg);

        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[0..4], &[0x01, 0x01, 0x00, 0x0c]);
        assert_eq!(
            &bytes[20..],
            &[0x00, 0x01, 0x00, 0x08, 0x00, 0x01, 0xd4, 0x31, 192, 168, 1, 1]
        );
    }

    #[test]
    fn test_serialize_error() {
        let msg = StunMessage::new(StunMessageType::BindingErrorResponse, MAGIC_COOKIE)
            .with_transaction_id(TRANSACTION_ID)
            .with_error_code(
                StunErrorCode::new(ERROR_CODE_UNKNOWN_ATTRIBUTE, "Unknown Attribute").unwrap(),
            );
        let bytes = encode_message(&msg);

        let value_length = u16::from_be_bytes([bytes[22], bytes[23]]) as usize;
        assert_eq!(value_length, 4 + "Unknown Attribute".len());
        assert_eq!(&bytes[20..22], &[0x00, 0x09]);
        assert_eq!(&bytes[24..28], &[0, 0, 4, 20]);
        assert_eq!(&bytes[28..], b"Unknown Attribute");
        assert_eq!(length_field(&bytes), bytes.len() - 20);
    }

    #[test]
    fn test_only_first_attribute_is_written() {
        let msg = StunMessage::new(StunMessageType::BindingResponse, 0)
            .with_transaction_id(TRANSACTION_ID)
            .with_error_code(StunErrorCode::new(ERROR_CODE_SERVER_ERROR, "Server Error").unwrap())
            .with_changed_address(addr("10.0.0.2:3479"))
            .with_source_address(addr("10.0.0.1:3478"))
            .with_change_request(StunChangeRequest::new(true, true))
            .with_response_address(addr("10.0.0.3:5000"));
        let bytes = encode_message(&msg);

        assert_eq!(bytes.len(), 32);
        assert_eq!(&bytes[20..22], &[0x00, 0x02]);

        let parsed = StunMessage::parse(&bytes).unwrap();
        assert_eq!(parsed.response_address, Some(addr("10.0.0.3:5000")));
        assert!(parsed.change_request.is_none());
        assert!(parsed.source_address.is_none());
        assert!(parsed.changed_address.is_none());
        assert!(parsed.error_code.is_none());
    }

    #[test]
    fn test_priority_order() {
        let base = StunMessage::new(StunMessageType::BindingResponse, 0)
            .with_error_code(StunErrorCode::new(ERROR_CODE_BAD_REQUEST, "Bad Request").unwrap());
        assert_eq!(&encode_message(&base)[20..22], &[0x00, 0x09]);

        let base = base.with_changed_address(addr("10.0.0.2:3479"));
        assert_eq!(&encode_message(&base)[20..22], &[0x00, 0x05]);

        let base = base.with_source_address(addr("10.0.0.1:3478"));
        assert_eq!(&encode_message(&base)[20..22], &[0x00, 0x04]);

        let base = base.with_change_request(StunChangeRequest::new(false, true));
        assert_eq!(&encode_message(&base)[20..22], &[0x00, 0x03]);

        let base = base.with_response_address(addr("10.0.0.3:5000"));
        assert_eq!(&encode_message(&base)[20..22], &[0x00, 0x02]);

        let base = base.with_mapped_address(addr("10.0.0.4:6000"));
        assert_eq!(&encode_message(&base)[20..22], &[0x00, 0x01]);
    }

    #[test]
    fn test_type_bits_masked() {
        let msg = StunMessage::new(StunMessageType::SharedSecretErrorResponse, 0);
        let bytes = encode_message(&msg);
        assert_eq!(bytes[0] & 0xc0, 0);
        assert_eq!(&bytes[0..2], &[0x01, 0x12]);
    }

    #[test]
    fn test_round_trips() {
        let messages = vec![
            StunMessage::binding_request(CookieMode::Rfc5389),
            StunMessage::binding_request(CookieMode::Legacy)
                .with_response_address(addr("198.51.100.20:40000")),
            StunMessage::binding_request_with_change(
                CookieMode::Rfc5389,
                StunChangeRequest::new(true, true),
            ),
            StunMessage::new(StunMessageType::BindingResponse, 0)
                .with_mapped_address(addr("192.168.1.1:54321")),
            StunMessage::new(StunMessageType::BindingResponse, MAGIC_COOKIE)
                .with_source_address(addr("203.0.113.1:3478")),
            StunMessage::new(StunMessageType::BindingResponse, 0)
                .with_changed_address(addr("203.0.113.2:3479")),
            StunMessage::new(StunMessageType::SharedSecretErrorResponse, MAGIC_COOKIE)
                .with_error_code(StunErrorCode::new(420, "Unknown Attribute").unwrap()),
            StunMessage::new(StunMessageType::SharedSecretRequest, 0),
            StunMessage::new(StunMessageType::SharedSecretResponse, MAGIC_COOKIE),
        ];

        for msg in messages {
            let bytes = msg.to_bytes();
            assert_eq!(length_field(&bytes), bytes.len() - 20);
            assert_eq!(StunMessage::parse(&bytes).unwrap(), msg);
        }
    }

    #[test]
    fn test_length_field_with_long_decoded_reason() {
        let mut attributes = vec![0x00, 0x09, 0x03, 0x88, 0x00, 0x00, 0x04, 0x00];
        attributes.extend(std::iter::repeat(b'a').take(900));
        let mut bytes = vec![0x01, 0x11];
        bytes.extend_from_slice(&(attributes.len() as u16).to_be_bytes());
        bytes.extend_from_slice(&MAGIC_COOKIE.to_be_bytes());
        bytes.extend_from_slice(&TRANSACTION_ID);
        bytes.extend_from_slice(&attributes);

        let decoded = StunMessage::parse(&bytes).unwrap();
        assert_eq!(decoded.error_code.as_ref().unwrap().reason_text().len(), 900);

        let encoded = encode_message(&decoded);
        assert_eq!(length_field(&encoded), encoded.len() - 20);
        assert_eq!(encoded.len(), 20 + 4 + 4 + MAX_REASON_LENGTH);

        let reparsed = StunMessage::parse(&encoded).unwrap();
        let error_code = reparsed.error_code.unwrap();
        assert_eq!(error_code.code(), ERROR_CODE_BAD_REQUEST);
        assert_eq!(error_code.reason_text().len(), MAX_REASON_LENGTH);
    }
}

/**
 * Decoding of received STUN messages: header first, then the attribute
 * section one TLV at a time.
 * See RFC 3489 Section 11 and RFC 5389 Section 15
 */
use super::{
    address::{decode_plain, decode_xor_fixed, decode_xor_with_cookie, ADDRESS_LENGTH},
    defs::{AttributeType, StunChangeRequest, StunErrorCode},
    error::StunError,
    header::StunHeader,
    message::StunMessage,
    HEADER_LENGTH,
};

/// Substituted for an ERROR-CODE reason phrase that is not valid UTF-8
pub(crate) const UNKNOWN_REASON: &str = "Unknown";

/**
 * Bounds-checked cursor over a received buffer
 */
pub(crate) struct AttributeReader<'a> {
    bytes: &'a [u8],
    offset: usize,
}

impl<'a> AttributeReader<'a> {
    pub fn new(bytes: &'a [u8], offset: usize) -> Self {
        Self { bytes, offset }
    }

    pub fn position(&self) -> usize {
        self.offset
    }

    /**
     * Take the next `len` bytes and advance past them
     *
     * @return The bytes, or `MalformedMessage` if the buffer ends first
     */
    pub fn take(&mut self, len: usize) -> Result<&'a [u8], StunError> {
        let end = self
            .offset
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or_else(|| {
                StunError::MalformedMessage(format!(
                    "attribute at offset {} needs {} bytes but only {} remain",
                    self.offset,
                    len,
                    self.bytes.len().saturating_sub(self.offset)
                ))
            })?;

        let slice = &self.bytes[self.offset..end];
        self.offset = end;
        Ok(slice)
    }

    pub fn read_u16(&mut self) -> Result<u16, StunError> {
        let b = self.take(2)?;
        Ok(u16::from_be_bytes([b[0], b[1]]))
    }

    /**
     * Take an 8-byte address value, whatever length the attribute declared
     */
    pub fn read_address(&mut self) -> Result<[u8; ADDRESS_LENGTH], StunError> {
        let mut value = [0u8; ADDRESS_LENGTH];
        value.copy_from_slice(self.take(ADDRESS_LENGTH)?);
        Ok(value)
    }
}

/**
 * Decode a complete message
 *
 * @param bytes The raw datagram
 * @return The message; any fatal error aborts the whole parse
 */
pub(crate) fn decode_message(bytes: &[u8]) -> Result<StunMessage, StunError> {
    let header = StunHeader::decode(bytes)?;

    let mut message =
        StunMessage::with_header(header.message_type, header.magic_cookie, header.transaction_id);

    let mut reader = AttributeReader::new(bytes, HEADER_LENGTH as usize);
    let end = HEADER_LENGTH as usize + header.message_length as usize;

    while reader.position() < end {
        let attribute_type = AttributeType::from_u16(reader.read_u16()?)?;
        let attribute_length = reader.read_u16()? as usize;

        match attribute_type {
            AttributeType::MappedAddress => {
                message.mapped_address = Some(decode_plain(&reader.read_address()?));
            }
            AttributeType::ResponseAddress => {
                message.response_address = Some(decode_plain(&reader.read_address()?));
            }
            AttributeType::SourceAddress => {
                message.source_address = Some(decode_plain(&reader.read_address()?));
            }
            AttributeType::ChangedAddress => {
                message.changed_address = Some(decode_plain(&reader.read_address()?));
            }
            AttributeType::ReflectedFrom => {
                message.reflected_from = Some(decode_plain(&reader.read_address()?));
            }
            AttributeType::OtherAddress => {
                message.other_address = Some(decode_plain(&reader.read_address()?));
            }
            AttributeType::ChangeRequest => {
                let value = reader.take(4)?;
                message.change_request = Some(StunChangeRequest::from_flags(value[3]));
            }
            AttributeType::ErrorCode => {
                message.error_code = Some(decode_error_code(reader.take(attribute_length)?)?);
            }
            AttributeType::XorMappedAddress => {
                message.xor_mapped_address = Some(decode_xor_fixed(&reader.read_address()?));
            }
            AttributeType::XorRelayAddress => {
                message.xor_relayed_address = Some(decode_xor_with_cookie(
                    &reader.read_address()?,
                    message.magic_cookie,
                ));
            }
            AttributeType::MessageIntegrity
            | AttributeType::UnknownAttribute
            | AttributeType::Username
            | AttributeType::Password
            | AttributeType::XorOnly
            | AttributeType::ServerName
            | AttributeType::XorFrag => {
                reader.take(attribute_length)?;
            }
        }
    }

    Ok(message)
}

/**
 * ERROR-CODE value: 2 reserved bytes, class in the low 3 bits of the
 * third byte, number in the fourth, then the reason phrase
 */
fn decode_error_code(value: &[u8]) -> Result<StunErrorCode, StunError> {
    if value.len() < 4 {
        return Err(StunError::MalformedMessage(format!(
            "ERROR-CODE value is {} bytes, expected at least 4",
            value.len()
        )));
    }

    let class = (value[2] & 0x07) as u16;
    let number = value[3] as u16;
    let reason_text = decode_reason(&value[4..]).unwrap_or_else(|_| UNKNOWN_REASON.to_string());

    Ok(StunErrorCode::from_wire(class * 100 + number, reason_text))
}

fn decode_reason(bytes: &[u8]) -> Result<String, StunError> {
    String::from_utf8(bytes.to_vec()).map_err(|_| StunError::InvalidUtf8)
}

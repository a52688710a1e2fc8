/**
 * The fixed 20-byte STUN header
 * See RFC 5389 Section 6 for details
 * https://datatracker.ietf.org/doc/html/rfc5389#section-6
 */
use super::{defs::StunMessageType, error::StunError, HEADER_LENGTH, TRANSACTION_ID_LENGTH};

/// The two most significant bits of the type field are always zero
const MESSAGE_TYPE_MASK: u16 = 0x3FFF;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct StunHeader {
    pub message_type: StunMessageType,
    pub message_length: u16,
    pub magic_cookie: u32,
    pub transaction_id: [u8; TRANSACTION_ID_LENGTH],
}

impl StunHeader {
    /**
     * Read the header from the start of a buffer
     *
     * @param bytes The raw message, at least 20 bytes long
     * @return The header; `message_length` is the size of the attribute section still to be consumed
     */
    pub fn decode(bytes: &[u8]) -> Result<StunHeader, StunError> {
        if bytes.len() < HEADER_LENGTH as usize {
            return Err(StunError::MalformedMessage(format!(
                "message is too short: {} bytes",
                bytes.len()
            )));
        }

        let message_type = StunMessageType::from_u16(u16::from_be_bytes([bytes[0], bytes[1]]))?;
        let message_length = u16::from_be_bytes([bytes[2], bytes[3]]);
        let magic_cookie = u32::from_be_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        let mut transaction_id = [0u8; TRANSACTION_ID_LENGTH];
        transaction_id.copy_from_slice(&bytes[8..20]);

        Ok(StunHeader {
            message_type,
            message_length,
            magic_cookie,
            transaction_id,
        })
    }

    /**
     * Write the header. The length field is left at zero and patched
     * once the attributes are written, see `patch_length`.
     */
    pub fn encode(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&(self.message_type.as_u16() & MESSAGE_TYPE_MASK).to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&self.magic_cookie.to_be_bytes());
        out.extend_from_slice(&self.transaction_id);
    }

    /**
     * Store the attribute section length (everything after the header) at offset 2
     */
    pub fn patch_length(out: &mut [u8]) {
        let length = (out.len() - HEADER_LENGTH as usize) as u16;
        out[2..4].copy_from_slice(&length.to_be_bytes());
    }
}

/**
 * Address attribute values: the plain form used by the RFC 3489 attributes and
 * the two XOR-obfuscated forms.
 *
 * All three share the same 8-byte layout:
 *   reserved (1) | family (1) | port (2) | IPv4 address (4)
 * The family byte is written as IPv4 and not checked on the way in.
 */
use std::net::{Ipv4Addr, SocketAddrV4};

use super::{defs::StunAttribute, MAGIC_COOKIE};

/// Size of an IPv4 address attribute value
pub(crate) const ADDRESS_LENGTH: usize = 8;

const FAMILY_IPV4: u8 = 0x01;

impl StunAttribute for SocketAddrV4 {
    fn write_to(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&encode_plain(self));
    }

    fn attr_length(&self) -> u16 {
        ADDRESS_LENGTH as u16
    }
}

/**
 * Encode an address in the clear
 *
 * @param addr The IPv4 address and port
 * @return The 8-byte attribute value
 */
pub(crate) fn encode_plain(addr: &SocketAddrV4) -> [u8; ADDRESS_LENGTH] {
    let mut value = [0u8; ADDRESS_LENGTH];
    value[1] = FAMILY_IPV4;
    value[2..4].copy_from_slice(&addr.port().to_be_bytes());
    value[4..8].copy_from_slice(&addr.ip().octets());
    value
}

/**
 * Decode an address sent in the clear
 */
pub(crate) fn decode_plain(value: &[u8; ADDRESS_LENGTH]) -> SocketAddrV4 {
    let port = u16::from_be_bytes([value[2], value[3]]);
    let ip = Ipv4Addr::new(value[4], value[5], value[6], value[7]);
    SocketAddrV4::new(ip, port)
}

/**
 * Decode XOR-MAPPED-ADDRESS. The port and address are always XOR'd against the
 * RFC 5389 magic cookie constant, whatever cookie the message itself carries.
 */
pub(crate) fn decode_xor_fixed(value: &[u8; ADDRESS_LENGTH]) -> SocketAddrV4 {
    decode_xor(value, MAGIC_COOKIE)
}

/**
 * Decode XOR-RELAYED-ADDRESS. The key is the magic cookie field of the message
 * being parsed, so a legacy message (cookie 0) carries the address in the clear.
 *
 * @param value The attribute value
 * @param magic_cookie The cookie from the header of the same message
 */
pub(crate) fn decode_xor_with_cookie(value: &[u8; ADDRESS_LENGTH], magic_cookie: u32) -> SocketAddrV4 {
    decode_xor(value, magic_cookie)
}

fn decode_xor(value: &[u8; ADDRESS_LENGTH], key: u32) -> SocketAddrV4 {
    let key_bytes = key.to_be_bytes();
    let port = u16::from_be_bytes([value[2], value[3]]) ^ (key >> 16) as u16;

    let mut ip = [0u8; 4];
    for i in 0..4 {
        ip[i] = value[4 + i] ^ key_bytes[i];
    }

    SocketAddrV4::new(Ipv4Addr::from(ip), port)
}

//! Address decoding for kernel socket tables.
//!
//! The kernel stores addresses in host byte order, so the hex text in
//! `/proc/net/tcp` is byte-swapped relative to the wire form: `0100007F`
//! is 127.0.0.1. IPv6 addresses are four 32-bit words, each byte-swapped
//! independently; `::ffff:127.0.0.1` appears as
//! `0000000000000000FFFF00000100007F` and decodes to
//! `00000000:00000000:0000FFFF:7F000001`.

use outpost_common::types::Connection;

use crate::error::NetscanError;

/// Which socket table an address field came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    /// `/proc/net/tcp` — 8-hex-char addresses.
    V4,
    /// `/proc/net/tcp6` — 32-hex-char addresses.
    V6,
}

/// The decoded IPv6 unspecified address (`::`), i.e. an all-zero bind.
pub const V6_WILDCARD: &str = "00000000:00000000:00000000:00000000";

/// The IPv4 wildcard bind in its decoded (and publish-binding) form.
pub const V4_WILDCARD: &str = "0.0.0.0";

/// Decoded prefix of every IPv4-mapped IPv6 address (`::ffff:a.b.c.d`).
pub const V6_MAPPED_PREFIX: &str = "00000000:00000000:0000FFFF:";

/// Decodes a hex address field into its textual form.
///
/// IPv4: four 2-hex-char byte groups, group order reversed, joined as
/// dotted decimal. IPv6: four 8-hex-char words, bytes reversed within each
/// word, words joined with `:`.
///
/// # Errors
///
/// Returns [`NetscanError::MalformedAddress`] if the field has the wrong
/// length for its family or contains a non-hex digit.
pub fn decode_address(hex: &str, family: AddressFamily) -> Result<String, NetscanError> {
    match family {
        AddressFamily::V4 => decode_v4(hex),
        AddressFamily::V6 => decode_v6(hex),
    }
}

/// Decodes a hex port field.
///
/// # Errors
///
/// Returns [`NetscanError::MalformedPort`] if the field does not parse as
/// a 16-bit hex number.
pub fn decode_port(hex: &str) -> Result<u16, NetscanError> {
    u16::from_str_radix(hex, 16).map_err(|_| NetscanError::MalformedPort {
        value: hex.to_string(),
    })
}

/// Whether an address is a wildcard bind in either form it can reach this
/// stage in: freshly decoded (`::` from a host-network table) or already
/// resolved to a publish binding's default host IP (`0.0.0.0`).
#[must_use]
pub fn is_wildcard(address: &str) -> bool {
    address == V6_WILDCARD || address == V4_WILDCARD
}

/// Expands a wildcard bind into one connection per configured interface,
/// all sharing the original port.
#[must_use]
pub fn fan_out(port: u16, interfaces: &[String]) -> Vec<Connection> {
    interfaces
        .iter()
        .map(|interface| Connection::new(interface.clone(), port))
        .collect()
}

/// Rewrites an IPv4-mapped IPv6 address to its embedded IPv4 form.
///
/// Detection matches the decoded `::ffff:` prefix; the trailing 8 hex
/// chars are then re-decoded as IPv4 without reversing the byte groups —
/// the primary IPv6 decode already put them in network order. Anything
/// that is not a mapped address passes through unchanged.
#[must_use]
pub fn rewrite_mapped(address: &str) -> String {
    let Some(tail) = address.strip_prefix(V6_MAPPED_PREFIX) else {
        return address.to_string();
    };
    match decode_mapped_tail(tail) {
        Ok(v4) => v4,
        // Cannot happen for addresses produced by decode_address; keep
        // the input rather than fabricate one.
        Err(_) => address.to_string(),
    }
}

fn decode_v4(hex: &str) -> Result<String, NetscanError> {
    let octets = byte_groups(hex, 4)?;
    let dotted: Vec<String> = octets.iter().rev().map(ToString::to_string).collect();
    Ok(dotted.join("."))
}

fn decode_v6(hex: &str) -> Result<String, NetscanError> {
    // The ASCII check must come before slicing by byte index: a
    // multi-byte character straddling a word boundary would otherwise
    // panic instead of erroring.
    if hex.len() != 32 || !hex.is_ascii() {
        return Err(NetscanError::MalformedAddress {
            value: hex.to_string(),
        });
    }
    let mut words = Vec::with_capacity(4);
    for i in 0..4 {
        let word = &hex[i * 8..(i + 1) * 8];
        let bytes = byte_groups(word, 4)?;
        let swapped: Vec<String> = bytes.iter().rev().map(|b| format!("{b:02X}")).collect();
        words.push(swapped.concat());
    }
    Ok(words.join(":"))
}

/// Second-stage decode for the low 32 bits of a mapped address. The byte
/// groups are intentionally NOT reversed here, unlike [`decode_v4`].
fn decode_mapped_tail(hex: &str) -> Result<String, NetscanError> {
    let octets = byte_groups(hex, 4)?;
    let dotted: Vec<String> = octets.iter().map(ToString::to_string).collect();
    Ok(dotted.join("."))
}

/// Splits a hex string into `count` byte values, in textual order.
fn byte_groups(hex: &str, count: usize) -> Result<Vec<u8>, NetscanError> {
    let malformed = || NetscanError::MalformedAddress {
        value: hex.to_string(),
    };
    if hex.len() != count * 2 || !hex.is_ascii() {
        return Err(malformed());
    }
    let mut bytes = Vec::with_capacity(count);
    for i in 0..count {
        let group = &hex[i * 2..(i + 1) * 2];
        bytes.push(u8::from_str_radix(group, 16).map_err(|_| malformed())?);
    }
    Ok(bytes)
}

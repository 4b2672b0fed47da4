//! Wake-on-LAN support.
//!
//! Powering a Sony device on over the network requires a magic packet first;
//! the IRCC service is only reachable once the network stack is awake.

use crate::error::{ApiError, Result};
use std::net::UdpSocket;

const WOL_PORT: u16 = 9;

/// Parse a MAC address in `aa:bb:cc:dd:ee:ff` or `aa-bb-...` form.
pub fn parse_mac(mac: &str) -> Result<[u8; 6]> {
    let parts: Vec<&str> = mac.split(|c| c == ':' || c == '-').collect();
    if parts.len() != 6 {
        return Err(ApiError::InvalidParameter(format!(
            "Malformed MAC address: {}",
            mac
        )));
    }

    let mut bytes = [0u8; 6];
    for (i, part) in parts.iter().enumerate() {
        bytes[i] = u8::from_str_radix(part, 16).map_err(|_| {
            ApiError::InvalidParameter(format!("Malformed MAC address: {}", mac))
        })?;
    }
    Ok(bytes)
}

/// Build the magic packet: 6 bytes of 0xFF followed by the MAC 16 times.
pub fn magic_packet(mac: [u8; 6]) -> Vec<u8> {
    let mut packet = Vec::with_capacity(6 + 16 * 6);
    packet.extend_from_slice(&[0xFF; 6]);
    for _ in 0..16 {
        packet.extend_from_slice(&mac);
    }
    packet
}

/// Send a wake-on-LAN magic packet to the given broadcast address.
pub fn wake(mac: &str, broadcast_address: &str) -> Result<()> {
    let packet = magic_packet(parse_mac(mac)?);

    let socket = UdpSocket::bind(("0.0.0.0", 0))
        .map_err(|e| ApiError::ConnectionError(e.to_string()))?;
    socket
        .set_broadcast(true)
        .map_err(|e| ApiError::ConnectionError(e.to_string()))?;
    socket
        .send_to(&packet, (broadcast_address, WOL_PORT))
        .map_err(|e| ApiError::ConnectionError(e.to_string()))?;

    tracing::debug!(mac, broadcast_address, "Sent wake-on-LAN packet");
    Ok(())
}

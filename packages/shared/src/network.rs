//! Host network helpers.

use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// Well-known public address used only to let the OS pick the outbound interface.
/// No packet is sent: connecting a UDP socket just resolves the route.
const ROUTE_PROBE_ADDR: (Ipv4Addr, u16) = (Ipv4Addr::new(8, 8, 8, 8), 80);

/// Detect the host's local (non-loopback) IPv4 address.
///
/// Returns `None` when the host has no route to an IPv4 network.
pub fn local_ipv4() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind((Ipv4Addr::UNSPECIFIED, 0)).ok()?;
    socket.connect(ROUTE_PROBE_ADDR).ok()?;
    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(ip) if usable_ipv4(ip) => Some(ip),
        _ => None,
    }
}

/// Local IPv4 address to listen on, falling back to loopback.
pub fn local_ipv4_or_loopback() -> Ipv4Addr {
    match local_ipv4() {
        Some(ip) => {
            tracing::info!("Local IPv4 address: {}", ip);
            ip
        }
        None => {
            tracing::warn!(
                "Local IPv4 address not found, falling back to {}",
                Ipv4Addr::LOCALHOST
            );
            Ipv4Addr::LOCALHOST
        }
    }
}

fn usable_ipv4(ip: Ipv4Addr) -> bool {
    !ip.is_loopback() && !ip.is_unspecified()
}

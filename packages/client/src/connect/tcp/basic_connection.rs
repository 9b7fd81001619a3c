//! Basic TCP connection establishment
//!
//! Tries each resolved address in turn, optionally binding a local address
//! first and bounding each attempt by the connect timeout.

use std::io;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr, TcpStream};
use std::time::Duration;

use socket2::{Domain, Protocol, SockAddr, Socket, Type};

/// Connect to the first reachable address.
///
/// When `local_address` is given, remote addresses of the other IP family
/// are skipped. A `local_port` of zero lets the OS choose.
///
/// # Errors
///
/// Returns the error of the last attempt, or `AddrNotAvailable` when no
/// address was eligible.
pub fn connect_to_address_list(
    addrs: &[SocketAddr],
    local_address: Option<IpAddr>,
    local_port: u16,
    timeout: Option<Duration>,
) -> io::Result<TcpStream> {
    let mut last_error = None;

    for addr in addrs {
        if local_address.is_some_and(|local| local.is_ipv4() != addr.is_ipv4()) {
            tracing::trace!("Skipping {} (local address family differs)", addr);
            continue;
        }

        match connect_one(*addr, local_address, local_port, timeout) {
            Ok(stream) => return Ok(stream),
            Err(e) => {
                tracing::debug!("Failed to connect to {}: {}", addr, e);
                last_error = Some(e);
            }
        }
    }

    Err(last_error.unwrap_or_else(|| {
        io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            "No addresses to connect to",
        )
    }))
}

fn connect_one(
    addr: SocketAddr,
    local_address: Option<IpAddr>,
    local_port: u16,
    timeout: Option<Duration>,
) -> io::Result<TcpStream> {
    let socket = Socket::new(Domain::for_address(addr), Type::STREAM, Some(Protocol::TCP))?;

    if local_address.is_some() || local_port != 0 {
        let ip = local_address.unwrap_or(if addr.is_ipv4() {
            IpAddr::V4(Ipv4Addr::UNSPECIFIED)
        } else {
            IpAddr::V6(Ipv6Addr::UNSPECIFIED)
        });
        socket.bind(&SockAddr::from(SocketAddr::new(ip, local_port)))?;
    }

    let remote = SockAddr::from(addr);
    match timeout {
        Some(t) => socket.connect_timeout(&remote, t)?,
        None => socket.connect(&remote)?,
    }

    Ok(socket.into())
}

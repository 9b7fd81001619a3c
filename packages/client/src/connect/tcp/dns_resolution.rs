//! Host name resolution
//!
//! IP literals skip the resolver entirely.

use std::io;
use std::net::{IpAddr, SocketAddr, ToSocketAddrs};

/// Resolve `host` to the socket addresses to try, in resolver order.
///
/// Bracketed IPv6 literals (`[::1]`) are accepted.
///
/// # Errors
///
/// Returns the resolver's error, or `NotFound` when it yields no address.
pub fn resolve_host_sync(host: &str, port: u16) -> io::Result<Vec<SocketAddr>> {
    let bare = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);

    if let Ok(ip) = bare.parse::<IpAddr>() {
        return Ok(vec![SocketAddr::new(ip, port)]);
    }

    let addrs: Vec<SocketAddr> = (bare, port).to_socket_addrs()?.collect();
    if addrs.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::NotFound,
            format!("No addresses resolved for {host}"),
        ));
    }
    Ok(addrs)
}

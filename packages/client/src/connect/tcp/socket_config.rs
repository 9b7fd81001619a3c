//! TCP socket configuration utilities
//!
//! Applies [`ConnectionParams`] to an established stream.

use std::io;
use std::net::TcpStream;

use socket2::{SockRef, TcpKeepalive};

use crate::config::ConnectionParams;

/// Configure an established TCP stream.
///
/// # Errors
///
/// Returns the first socket option the OS refuses.
pub fn configure_tcp_socket(stream: &TcpStream, params: &ConnectionParams) -> io::Result<()> {
    stream.set_nodelay(params.tcp_nodelay)?;
    stream.set_read_timeout(params.so_timeout)?;
    stream.set_write_timeout(params.so_timeout)?;

    let socket = SockRef::from(stream);
    if let Some(linger) = params.linger {
        socket.set_linger(Some(linger))?;
    }
    if let Some(size) = params.send_buffer_size {
        socket.set_send_buffer_size(size)?;
    }
    if let Some(size) = params.receive_buffer_size {
        socket.set_recv_buffer_size(size)?;
    }
    if let Some(idle) = params.keepalive {
        socket.set_tcp_keepalive(&TcpKeepalive::new().with_time(idle))?;
    }

    tracing::trace!("Configured TCP socket: {:?}", params);
    Ok(())
}

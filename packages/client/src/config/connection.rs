//! Per-connection socket parameters

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Parameters applied while establishing and configuring a TCP connection.
///
/// Durations are expressed in milliseconds when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionParams {
    /// Upper bound for each connect attempt; `None` waits for the OS
    #[serde(rename = "connect_timeout_ms", with = "duration_ms")]
    pub connect_timeout: Option<Duration>,
    /// Read and write timeout on the established socket
    #[serde(rename = "so_timeout_ms", with = "duration_ms")]
    pub so_timeout: Option<Duration>,
    /// Disable Nagle's algorithm
    pub tcp_nodelay: bool,
    /// `SO_LINGER`; `None` leaves the OS default
    #[serde(rename = "linger_ms", with = "duration_ms")]
    pub linger: Option<Duration>,
    /// `SO_SNDBUF`
    pub send_buffer_size: Option<usize>,
    /// `SO_RCVBUF`
    pub receive_buffer_size: Option<usize>,
    /// Idle time before TCP keepalive probes start
    #[serde(rename = "keepalive_ms", with = "duration_ms")]
    pub keepalive: Option<Duration>,
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            connect_timeout: None,
            so_timeout: None,
            tcp_nodelay: true,
            linger: None,
            send_buffer_size: None,
            receive_buffer_size: None,
            keepalive: None,
        }
    }
}

impl ConnectionParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn so_timeout(mut self, timeout: Duration) -> Self {
        self.so_timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn tcp_nodelay(mut self, nodelay: bool) -> Self {
        self.tcp_nodelay = nodelay;
        self
    }

    #[must_use]
    pub fn linger(mut self, linger: Duration) -> Self {
        self.linger = Some(linger);
        self
    }

    #[must_use]
    pub fn send_buffer_size(mut self, size: usize) -> Self {
        self.send_buffer_size = Some(size);
        self
    }

    #[must_use]
    pub fn receive_buffer_size(mut self, size: usize) -> Self {
        self.receive_buffer_size = Some(size);
        self
    }

    #[must_use]
    pub fn keepalive(mut self, idle: Duration) -> Self {
        self.keepalive = Some(idle);
        self
    }

    /// Reject values the OS would refuse.
    ///
    /// # Errors
    ///
    /// Returns a message naming the offending field.
    pub fn validate(&self) -> Result<(), String> {
        for (name, value) in [
            ("connect_timeout", self.connect_timeout),
            ("so_timeout", self.so_timeout),
        ] {
            if value.is_some_and(|d| d.is_zero()) {
                return Err(format!("{name} must be greater than zero"));
            }
        }
        for (name, value) in [
            ("send_buffer_size", self.send_buffer_size),
            ("receive_buffer_size", self.receive_buffer_size),
        ] {
            if value == Some(0) {
                return Err(format!("{name} must be greater than zero"));
            }
        }
        Ok(())
    }
}

mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    #[allow(clippy::ref_option)]
    pub fn serialize<S: Serializer>(
        value: &Option<Duration>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(d) => {
                serializer.serialize_some(&u64::try_from(d.as_millis()).unwrap_or(u64::MAX))
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(deserializer)?.map(Duration::from_millis))
    }
}

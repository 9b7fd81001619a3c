//! Process-wide property store
//!
//! A small string-keyed registry consulted by [`ProtocolSource::Property`]
//! on every socket creation. Values can be changed at any time by any thread;
//! readers see whatever value is current.
//!
//! [`ProtocolSource::Property`]: super::ProtocolSource::Property

use dashmap::DashMap;
use once_cell::sync::Lazy;

/// Property holding the comma-separated list of enabled HTTPS protocols.
pub const HTTPS_PROTOCOLS_KEY: &str = "https.protocols";

static PROPERTIES: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

/// Current value of `key`, if set.
#[must_use]
pub fn get(key: &str) -> Option<String> {
    PROPERTIES.get(key).map(|value| value.clone())
}

/// Set `key` to `value`, returning the previous value.
pub fn set(key: impl Into<String>, value: impl Into<String>) -> Option<String> {
    let key = key.into();
    let value = value.into();
    tracing::debug!("Setting property {} = {:?}", key, value);
    PROPERTIES.insert(key, value)
}

/// Remove `key`, returning the value it held.
pub fn clear(key: &str) -> Option<String> {
    PROPERTIES.remove(key).map(|(_, value)| value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_clear() {
        let key = "tlspin.test.properties.set_get_clear";
        assert_eq!(get(key), None);
        assert_eq!(set(key, "a"), None);
        assert_eq!(set(key, "b").as_deref(), Some("a"));
        assert_eq!(get(key).as_deref(), Some("b"));
        assert_eq!(clear(key).as_deref(), Some("b"));
        assert_eq!(get(key), None);
    }
}

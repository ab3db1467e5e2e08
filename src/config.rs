//! Connection configuration for a LionChief train.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic to use on desktop with `std`. The core never computes any of
//! these identifiers; they are handed to the [`TrainConnector`] as-is.
//!
//! # Example
//!
//! ```rust
//! use rs_lionchief::config::{Config, DeviceConfig, LinkConfig};
//!
//! // Use defaults (published LionChief GATT identifiers)
//! let config = Config::default();
//! assert_eq!(config.link.service_uuid.as_str(), "e20a39f4-73f5-4bc4-a12f-17d1ad07a961");
//!
//! // Or customize
//! let config = Config::default()
//!     .with_device(DeviceConfig::default().with_address("44:A6:E5:41:AE:72"))
//!     .with_link(LinkConfig::default().with_acknowledged_writes(false));
//! assert_eq!(config.device.mac(), Some([0x44, 0xA6, 0xE5, 0x41, 0xAE, 0x72]));
//! ```
//!
//! [`TrainConnector`]: crate::traits::TrainConnector

use heapless::String as HString;

/// Maximum length for short config strings (names, addresses)
pub const MAX_SHORT_STRING: usize = 64;

/// Type alias for short config strings
pub type ShortString = HString<MAX_SHORT_STRING>;

/// GATT service exposing the command characteristic.
pub const LIONCHIEF_SERVICE_UUID: &str = "e20a39f4-73f5-4bc4-a12f-17d1ad07a961";

/// Characteristic commands are written to.
pub const LIONCHIEF_WRITE_CHARACTERISTIC_UUID: &str = "08590f7e-db05-467e-8757-72f6faeb13d4";

/// Notification characteristic (unused by the command path).
pub const LIONCHIEF_READ_CHARACTERISTIC_UUID: &str = "08590f7e-db05-467e-8757-72f6faeb14d3";

// ============================================================================
// Helper for creating heapless strings
// ============================================================================

/// Create a ShortString from a &str, truncating if too long
pub fn short_string(s: &str) -> ShortString {
    let mut hs = ShortString::new();
    let take = s.len().min(MAX_SHORT_STRING);
    // Find valid UTF-8 boundary
    let valid_end = s
        .char_indices()
        .take_while(|(i, c)| i + c.len_utf8() <= take)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let _ = hs.push_str(&s[..valid_end]);
    hs
}

// ============================================================================
// Main Config
// ============================================================================

/// Complete connection configuration
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// Which train to connect to
    pub device: DeviceConfig,
    /// GATT identifiers and write mode
    pub link: LinkConfig,
}

impl Config {
    /// Set device configuration
    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.device = device;
        self
    }

    /// Set link configuration
    pub fn with_link(mut self, link: LinkConfig) -> Self {
        self.link = link;
        self
    }
}

// ============================================================================
// Device Config
// ============================================================================

/// Identification of the train to connect to
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DeviceConfig {
    /// Advertised local name (e.g. "LC-0-1-0429-754D")
    pub name: ShortString,
    /// MAC address text, "AA:BB:CC:DD:EE:FF" (empty = locate by name)
    pub address: ShortString,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: short_string("LC-0-1-0429-754D"),
            address: ShortString::new(),
        }
    }
}

impl DeviceConfig {
    /// Set the advertised name
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = short_string(name);
        self
    }

    /// Set the MAC address
    pub fn with_address(mut self, address: &str) -> Self {
        self.address = short_string(address);
        self
    }

    /// Check if a fixed address is configured
    pub fn has_address(&self) -> bool {
        !self.address.is_empty()
    }

    /// Parse the configured address into bytes.
    ///
    /// Returns `None` if no address is set or it is not six
    /// colon-separated hex octets.
    pub fn mac(&self) -> Option<[u8; 6]> {
        let mut mac = [0u8; 6];
        let mut parts = self.address.split(':');
        for byte in mac.iter_mut() {
            let part = parts.next()?;
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return None;
            }
            *byte = u8::from_str_radix(part, 16).ok()?;
        }
        if parts.next().is_some() {
            return None;
        }
        Some(mac)
    }
}

// ============================================================================
// Link Config
// ============================================================================

/// GATT identifiers for the command path
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LinkConfig {
    /// Service UUID
    pub service_uuid: ShortString,
    /// Write characteristic UUID
    pub write_characteristic_uuid: ShortString,
    /// Read/notify characteristic UUID
    pub read_characteristic_uuid: ShortString,
    /// Use acknowledged writes (can report soft timeouts) instead of
    /// write-without-response
    pub acknowledged_writes: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            service_uuid: short_string(LIONCHIEF_SERVICE_UUID),
            write_characteristic_uuid: short_string(LIONCHIEF_WRITE_CHARACTERISTIC_UUID),
            read_characteristic_uuid: short_string(LIONCHIEF_READ_CHARACTERISTIC_UUID),
            acknowledged_writes: true,
        }
    }
}

impl LinkConfig {
    /// Set the service UUID
    pub fn with_service_uuid(mut self, uuid: &str) -> Self {
        self.service_uuid = short_string(uuid);
        self
    }

    /// Set the write characteristic UUID
    pub fn with_write_characteristic_uuid(mut self, uuid: &str) -> Self {
        self.write_characteristic_uuid = short_string(uuid);
        self
    }

    /// Choose acknowledged or unacknowledged writes
    pub fn with_acknowledged_writes(mut self, acknowledged: bool) -> Self {
        self.acknowledged_writes = acknowledged;
        self
    }
}

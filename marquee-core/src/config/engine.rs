//! Engine tunables
//!
//! Frame cadence and watchdog timings, persisted as a small postcard
//! record with a magic number, version and CRC so stale or foreign data
//! is rejected on load.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::anim::DEFAULT_FRAME_MS;
use crate::watchdog::{WatchdogConfig, DEFAULT_GRACE_MS, DEFAULT_TIMEOUT_MS};
use crate::widget::WidgetConfig;

/// Magic number identifying an engine config record
pub const ENGINE_MAGIC: u32 = 0x4D51_5545; // "MQUE"

/// Current record version
pub const ENGINE_VERSION: u8 = 1;

/// Upper bound on the encoded size of [`EngineConfig`]
pub const MAX_ENCODED_LEN: usize = 32;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Magic number or version mismatch
    InvalidFormat,
    /// CRC check failed
    CrcMismatch,
    /// A tunable is out of range
    InvalidValue,
    /// Serialization failed (buffer too small)
    Serialize,
    /// Deserialization failed
    Deserialize,
}

/// Engine-wide timing configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    /// Magic number for validation
    pub magic: u32,
    /// Record format version
    pub version: u8,
    /// Frame cadence applied to widgets
    pub frame_ms: u16,
    /// Watchdog timings applied to every supervised widget
    pub watchdog: WatchdogConfig,
    /// CRC32 over the fields above
    pub crc: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfig {
    /// Defaults: 80 ms frames, 1000 ms watchdog timeout, 500 ms grace
    pub const fn new() -> Self {
        Self {
            magic: ENGINE_MAGIC,
            version: ENGINE_VERSION,
            frame_ms: DEFAULT_FRAME_MS,
            watchdog: WatchdogConfig {
                timeout_ms: DEFAULT_TIMEOUT_MS,
                grace_ms: DEFAULT_GRACE_MS,
            },
            crc: 0,
        }
    }

    /// Check magic and version
    pub fn is_valid(&self) -> bool {
        self.magic == ENGINE_MAGIC && self.version == ENGINE_VERSION
    }

    /// Check the header and that every tunable is usable
    ///
    /// Zero frame cadence or watchdog timeout would make the engine spin
    /// or reset every tick.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.is_valid() {
            return Err(ConfigError::InvalidFormat);
        }
        if self.frame_ms == 0 || self.watchdog.timeout_ms == 0 {
            return Err(ConfigError::InvalidValue);
        }
        Ok(())
    }

    /// Apply the frame cadence to a widget config
    pub const fn apply<'a>(&self, config: WidgetConfig<'a>) -> WidgetConfig<'a> {
        config.with_frame_ms(self.frame_ms)
    }

    /// CRC32 over everything but the CRC field
    pub fn calculate_crc(&self) -> u32 {
        let mut crc: u32 = 0xFFFF_FFFF;
        crc = crc32_update(crc, &self.magic.to_le_bytes());
        crc = crc32_update(crc, &[self.version]);
        crc = crc32_update(crc, &self.frame_ms.to_le_bytes());
        crc = crc32_update(crc, &self.watchdog.timeout_ms.to_le_bytes());
        crc = crc32_update(crc, &self.watchdog.grace_ms.to_le_bytes());
        !crc
    }

    /// Update the CRC field
    pub fn update_crc(&mut self) {
        self.crc = self.calculate_crc();
    }

    /// Verify the CRC field
    pub fn verify_crc(&self) -> bool {
        self.crc == self.calculate_crc()
    }

    /// Serialize into `buf`, refreshing the CRC first
    ///
    /// Returns the used prefix of `buf`.
    #[cfg(feature = "serde")]
    pub fn encode<'b>(&mut self, buf: &'b mut [u8]) -> Result<&'b mut [u8], ConfigError> {
        self.update_crc();
        postcard::to_slice(self, buf).map_err(|_| ConfigError::Serialize)
    }

    /// Deserialize and validate a stored record
    #[cfg(feature = "serde")]
    pub fn decode(bytes: &[u8]) -> Result<Self, ConfigError> {
        let config: Self = postcard::from_bytes(bytes).map_err(|_| ConfigError::Deserialize)?;
        if !config.is_valid() {
            return Err(ConfigError::InvalidFormat);
        }
        if !config.verify_crc() {
            return Err(ConfigError::CrcMismatch);
        }
        config.validate()?;
        Ok(config)
    }
}

/// CRC32 update (IEEE 802.3 polynomial, reflected)
fn crc32_update(crc: u32, data: &[u8]) -> u32 {
    const POLY: u32 = 0xEDB8_8320;
    let mut crc = crc;

    for &byte in data {
        crc ^= byte as u32;
        for _ in 0..8 {
            if crc & 1 != 0 {
                crc = (crc >> 1) ^ POLY;
            } else {
                crc >>= 1;
            }
        }
    }

    crc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{seq, TAGGED};

    #[test]
    fn test_defaults_match_keyboard_config() {
        let config = EngineConfig::default();
        assert!(config.is_valid());
        assert_eq!(config.frame_ms, 80);
        assert_eq!(config.watchdog.timeout_ms, 1000);
        assert_eq!(config.watchdog.grace_ms, 500);
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn test_validate_rejects_zero_values() {
        let mut config = EngineConfig::new();
        config.frame_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidValue));

        let mut config = EngineConfig::new();
        config.watchdog.timeout_ms = 0;
        assert_eq!(config.validate(), Err(ConfigError::InvalidValue));

        let mut config = EngineConfig::new();
        config.version = 9;
        assert_eq!(config.validate(), Err(ConfigError::InvalidFormat));
    }

    #[test]
    fn test_crc_tracks_contents() {
        let mut config = EngineConfig::new();
        config.update_crc();
        assert!(config.verify_crc());

        config.frame_ms = 60;
        assert!(!config.verify_crc());
    }

    #[test]
    fn test_crc32_check_value() {
        // Standard CRC32 check value for "123456789"
        assert_eq!(!crc32_update(0xFFFF_FFFF, b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn test_apply_frame_cadence() {
        let mut engine = EngineConfig::new();
        engine.frame_ms = 50;
        let widget = engine.apply(WidgetConfig::toggle(seq(&TAGGED, 4), 0, 0));
        assert_eq!(widget.frame_ms, 50);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_encode_decode() {
        let mut config = EngineConfig::new();
        config.frame_ms = 66;
        let mut buf = [0u8; MAX_ENCODED_LEN];
        let len = config.encode(&mut buf).unwrap().len();

        let decoded = EngineConfig::decode(&buf[..len]).unwrap();
        assert_eq!(decoded, config);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_decode_rejects_corruption() {
        let mut config = EngineConfig::new();
        let mut buf = [0u8; MAX_ENCODED_LEN];
        let len = config.encode(&mut buf).unwrap().len();

        // Flip a bit in the version byte (magic varint is 5 bytes)
        buf[5] ^= 0x01;
        assert_eq!(
            EngineConfig::decode(&buf[..len]),
            Err(ConfigError::InvalidFormat)
        );

        assert_eq!(EngineConfig::decode(&[]), Err(ConfigError::Deserialize));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_encode_small_buffer() {
        let mut config = EngineConfig::new();
        let mut buf = [0u8; 4];
        assert_eq!(config.encode(&mut buf), Err(ConfigError::Serialize));
    }
}

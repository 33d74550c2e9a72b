//! Format configuration
//!
//! Controls how strictly files are validated on load and how they are
//! compressed and synced on save.

use serde::{Deserialize, Serialize};

/// Highest gzip compression level
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

/// How end-of-structure marker mismatches are handled
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerPolicy {
    /// Record a warning, consume the byte and keep reading
    #[default]
    Lenient,
    /// Fail the load on the first mismatch
    Strict,
}

/// sbconf format configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Handling of `0xFD` / `0xFE` / `0xFF` mismatches (default: lenient)
    pub marker_policy: MarkerPolicy,
    /// gzip level, 0..=9 (default: 9)
    pub compression_level: u32,
    /// Largest blob length accepted on read (default: `u32::MAX`)
    pub max_blob_len: u32,
    /// fsync the temporary file and directory during save (default: true)
    pub sync_on_save: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        FormatConfig {
            marker_policy: MarkerPolicy::Lenient,
            compression_level: MAX_COMPRESSION_LEVEL,
            max_blob_len: u32::MAX,
            sync_on_save: true,
        }
    }
}

impl FormatConfig {
    /// Config that rejects any marker mismatch
    pub fn strict() -> Self {
        FormatConfig {
            marker_policy: MarkerPolicy::Strict,
            ..Default::default()
        }
    }

    /// Config that tolerates marker mismatches (default)
    pub fn lenient() -> Self {
        FormatConfig {
            marker_policy: MarkerPolicy::Lenient,
            ..Default::default()
        }
    }

    /// Config for testing
    ///
    /// Fast compression and no fsync.
    pub fn for_testing() -> Self {
        FormatConfig {
            compression_level: 1,
            sync_on_save: false,
            ..Default::default()
        }
    }

    /// Set marker policy
    pub fn with_marker_policy(mut self, policy: MarkerPolicy) -> Self {
        self.marker_policy = policy;
        self
    }

    /// Set gzip compression level
    pub fn with_compression_level(mut self, level: u32) -> Self {
        self.compression_level = level;
        self
    }

    /// Set the largest blob length accepted on read
    pub fn with_max_blob_len(mut self, max: u32) -> Self {
        self.max_blob_len = max;
        self
    }

    /// Set whether save fsyncs
    pub fn with_sync_on_save(mut self, sync: bool) -> Self {
        self.sync_on_save = sync;
        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compression_level > MAX_COMPRESSION_LEVEL {
            return Err(ConfigError::InvalidCompressionLevel {
                level: self.compression_level,
            });
        }
        if self.max_blob_len == 0 {
            return Err(ConfigError::ZeroBlobLimit);
        }
        Ok(())
    }
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Compression level above 9
    #[error("Invalid compression level {level} (expected 0..=9)")]
    InvalidCompressionLevel {
        /// The rejected level
        level: u32,
    },

    /// `max_blob_len` of zero would reject every image
    #[error("max_blob_len must be greater than zero")]
    ZeroBlobLimit,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FormatConfig::default();
        assert_eq!(config.marker_policy, MarkerPolicy::Lenient);
        assert_eq!(config.compression_level, 9);
        assert_eq!(config.max_blob_len, u32::MAX);
        assert!(config.sync_on_save);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_presets() {
        assert_eq!(FormatConfig::strict().marker_policy, MarkerPolicy::Strict);
        assert_eq!(FormatConfig::lenient().marker_policy, MarkerPolicy::Lenient);

        let testing = FormatConfig::for_testing();
        assert_eq!(testing.compression_level, 1);
        assert!(!testing.sync_on_save);
    }

    #[test]
    fn test_builder_chain() {
        let config = FormatConfig::default()
            .with_marker_policy(MarkerPolicy::Strict)
            .with_compression_level(0)
            .with_max_blob_len(1024)
            .with_sync_on_save(false);

        assert_eq!(config.marker_policy, MarkerPolicy::Strict);
        assert_eq!(config.compression_level, 0);
        assert_eq!(config.max_blob_len, 1024);
        assert!(!config.sync_on_save);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = FormatConfig::default().with_compression_level(10);
        assert_eq!(
            config.validate(),
            Err(ConfigError::InvalidCompressionLevel { level: 10 })
        );

        let config = FormatConfig::default().with_max_blob_len(0);
        assert_eq!(config.validate(), Err(ConfigError::ZeroBlobLimit));
    }

    #[test]
    fn test_serde_roundtrip() {
        let config = FormatConfig::strict().with_max_blob_len(4096);
        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"strict\""));
        let restored: FormatConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_serde_fills_missing_fields_with_defaults() {
        let restored: FormatConfig = serde_json::from_str(r#"{"marker_policy":"strict"}"#).unwrap();
        assert_eq!(restored.marker_policy, MarkerPolicy::Strict);
        assert_eq!(restored.compression_level, 9);
        assert!(restored.sync_on_save);
    }
}

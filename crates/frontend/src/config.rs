//! Configuration system for the frontend.
//!
//! This module defines the configuration structures used to parameterize the
//! fetch target buffer and the fetch stage hand-off. It provides:
//! 1. **Defaults:** Baseline constants (block span, fetch block size).
//! 2. **Structures:** Hierarchical config for the FTB and the fetch stage.
//!
//! Configuration is supplied as JSON by the driving simulator, or built with
//! `FrontendConfig::default()`.

use serde::Deserialize;

use crate::common::Result;

/// Default configuration constants for the frontend.
mod defaults {
    /// Maximum span, in bytes, of a fetch block described by one FTB entry.
    ///
    /// Every valid slot address and the fallthrough address of an entry must
    /// lie in `(start, start + MAX_BLOCK_SPAN]`.
    pub const MAX_BLOCK_SPAN: u64 = 34;

    /// Largest address range handed to the instruction cache in one fetch target.
    pub const FETCH_BLOCK_BYTES: u64 = 32;
}

/// Root configuration structure containing all frontend settings.
///
/// # Examples
///
/// ```
/// use ftbsim_core::config::FrontendConfig;
///
/// let json = r#"{ "ftb": { "max_block_span": 66 }, "fetch": { "fetch_block_bytes": 64 } }"#;
/// let config = FrontendConfig::from_json(json).unwrap();
/// assert_eq!(config.ftb.max_block_span, 66);
/// assert_eq!(config.fetch.fetch_block_bytes, 64);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrontendConfig {
    /// Fetch target buffer settings
    #[serde(default)]
    pub ftb: FtbConfig,
    /// Fetch stage hand-off settings
    #[serde(default)]
    pub fetch: FetchConfig,
}

impl FrontendConfig {
    /// Parses a configuration from a JSON document.
    ///
    /// Missing sections and fields fall back to their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`FrontendError::Config`](crate::common::FrontendError::Config)
    /// if the document is not valid JSON or has fields of the wrong type.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Fetch target buffer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FtbConfig {
    /// Maximum fetch block span in bytes (bounds slot and fallthrough addresses)
    #[serde(default = "FtbConfig::default_max_block_span")]
    pub max_block_span: u64,
}

impl FtbConfig {
    /// Returns the default maximum fetch block span.
    const fn default_max_block_span() -> u64 {
        defaults::MAX_BLOCK_SPAN
    }
}

impl Default for FtbConfig {
    fn default() -> Self {
        Self {
            max_block_span: defaults::MAX_BLOCK_SPAN,
        }
    }
}

/// Fetch stage hand-off configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct FetchConfig {
    /// Largest range, in bytes, covered by a single fetch target entry
    #[serde(default = "FetchConfig::default_fetch_block_bytes")]
    pub fetch_block_bytes: u64,
}

impl FetchConfig {
    /// Returns the default fetch block size in bytes.
    const fn default_fetch_block_bytes() -> u64 {
        defaults::FETCH_BLOCK_BYTES
    }
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            fetch_block_bytes: defaults::FETCH_BLOCK_BYTES,
        }
    }
}

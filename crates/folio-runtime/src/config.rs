#![forbid(unsafe_code)]

//! Runtime tuning as data.
//!
//! Every timing constant the runtime uses lives in [`FolioConfig`] and can be
//! loaded from TOML or JSON. Missing fields take their defaults, so an empty
//! document yields the stock behavior.
//!
//! ```toml
//! [navigation]
//! sticky_offset = 64.0
//! manual_override_ms = 900
//!
//! [preload]
//! timeout_ms = 4000
//! ```
//!
//! ```rust
//! use folio_runtime::config::FolioConfig;
//!
//! let config = FolioConfig::from_toml_str("[preload]\ntimeout_ms = 4000\n").unwrap();
//! assert_eq!(config.preload.timeout_ms, 4000);
//! assert_eq!(config.navigation.manual_override_ms, 900);
//! assert!(config.validate().is_empty());
//! ```

use core::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::retry::RetryPolicy;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// All runtime tuning, grouped by component.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FolioConfig {
    pub navigation: NavigationConfig,
    pub preload: PreloadConfig,
    pub layout: LayoutConfig,
}

impl FolioConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(ConfigError::Toml)
    }

    /// Load from a JSON string.
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        serde_json::from_str(s).map_err(ConfigError::Json)
    }

    /// Serialize to pretty TOML.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(ConfigError::TomlSer)
    }

    /// Range-check every parameter. An empty list means the config is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        let nav = &self.navigation;
        if !nav.sticky_offset.is_finite() || nav.sticky_offset < 0.0 {
            errors.push(format!(
                "navigation.sticky_offset must be a non-negative number, got {}",
                nav.sticky_offset
            ));
        }
        if nav.manual_override_ms == 0 {
            errors.push("navigation.manual_override_ms must be > 0".into());
        }
        if nav.scroll_retry_interval_ms == 0 {
            errors.push("navigation.scroll_retry_interval_ms must be > 0".into());
        }
        if nav.settle_delays_ms.windows(2).any(|w| w[0] > w[1]) {
            errors.push("navigation.settle_delays_ms must be ascending".into());
        }
        if self.preload.timeout_ms == 0 {
            errors.push("preload.timeout_ms must be > 0".into());
        }
        if self.layout.desktop_min_width <= 0.0 || !self.layout.desktop_min_width.is_finite() {
            errors.push(format!(
                "layout.desktop_min_width must be positive, got {}",
                self.layout.desktop_min_width
            ));
        }
        errors
    }

    /// Consume and return `self` if [`validate`](Self::validate) is clean.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Invalid(errors))
        }
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Section locator and scroll-to-section tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Height of the sticky header, subtracted from scroll targets.
    pub sticky_offset: f64,
    /// How long a manual navigation suppresses scroll-derived updates.
    pub manual_override_ms: u64,
    /// Interval between lookups of a section that is not mounted yet.
    pub scroll_retry_interval_ms: u64,
    /// Lookups after the first before giving up.
    pub scroll_max_retries: u32,
    /// Extra locator passes after mount, to catch late layout.
    pub settle_delays_ms: Vec<u64>,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            sticky_offset: 72.0,
            manual_override_ms: 900,
            scroll_retry_interval_ms: 120,
            scroll_max_retries: 8,
            settle_delays_ms: vec![200, 600],
        }
    }
}

impl NavigationConfig {
    #[must_use]
    pub fn manual_override(&self) -> Duration {
        Duration::from_millis(self.manual_override_ms)
    }

    #[must_use]
    pub fn scroll_retry_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(
            self.scroll_max_retries,
            Duration::from_millis(self.scroll_retry_interval_ms),
        )
    }

    #[must_use]
    pub fn settle_delays(&self) -> Vec<Duration> {
        self.settle_delays_ms
            .iter()
            .copied()
            .map(Duration::from_millis)
            .collect()
    }
}

/// Image preloader tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreloadConfig {
    /// Hard deadline after which the preload completes regardless.
    pub timeout_ms: u64,
    /// Delay before image requests are issued.
    pub load_start_delay_ms: u64,
    /// Cosmetic pause between "all settled" and hiding the loading screen.
    pub finish_delay_ms: u64,
    /// Cosmetic pause after a timeout.
    pub timeout_finish_delay_ms: u64,
    /// Cosmetic pause when there is nothing to load.
    pub empty_finish_delay_ms: u64,
}

impl Default for PreloadConfig {
    fn default() -> Self {
        Self {
            timeout_ms: 6000,
            load_start_delay_ms: 20,
            finish_delay_ms: 300,
            timeout_finish_delay_ms: 220,
            empty_finish_delay_ms: 160,
        }
    }
}

/// Responsive layout thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Viewport width at or above which the desktop layout applies.
    pub desktop_min_width: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            desktop_min_width: 768.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("TOML parse error: {0}")]
    Toml(#[source] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    TomlSer(#[source] toml::ser::Error),
    #[error("JSON parse error: {0}")]
    Json(#[source] serde_json::Error),
    #[error("invalid config: {}", .0.join("; "))]
    Invalid(Vec<String>),
}

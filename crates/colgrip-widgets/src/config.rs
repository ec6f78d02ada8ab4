#![forbid(unsafe_code)]

//! Resize configuration.
//!
//! Every field has a default, so an empty TOML or JSON document yields a
//! usable configuration. Loading parses only; call
//! [`ResizeConfig::validate`] (or use [`ResizeConfig::validated`]) to reject
//! nonsensical values.
//!
//! # Example
//!
//! ```toml
//! policy = "fit"
//! min_width_floor = 40
//! keyboard_step = 8
//! keyboard_large_step = 64
//! activation_button = "primary"
//! ```

#[cfg(feature = "resize-config")]
use std::path::Path;

use colgrip_core::event::PointerButton;
use colgrip_layout::ResizePolicy;
use serde::{Deserialize, Serialize};

/// Default arrow-key step in width units.
pub const DEFAULT_KEYBOARD_STEP: u32 = 10;
/// Default Shift+arrow step in width units.
pub const DEFAULT_KEYBOARD_LARGE_STEP: u32 = 50;

/// Options for one resize controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResizeConfig {
    /// `fit` redistributes between neighbours; `expand` grows the host.
    pub policy: ResizePolicy,

    /// Global floor raised under every column's minimum width.
    pub min_width_floor: u32,

    /// Width change per arrow-key press.
    pub keyboard_step: u32,

    /// Width change per Shift+arrow press.
    pub keyboard_large_step: u32,

    /// Button that starts a drag.
    pub activation_button: PointerButton,
}

impl Default for ResizeConfig {
    fn default() -> Self {
        Self {
            policy: ResizePolicy::default(),
            min_width_floor: 0,
            keyboard_step: DEFAULT_KEYBOARD_STEP,
            keyboard_large_step: DEFAULT_KEYBOARD_LARGE_STEP,
            activation_button: PointerButton::Primary,
        }
    }
}

impl ResizeConfig {
    #[must_use]
    pub fn with_policy(mut self, policy: ResizePolicy) -> Self {
        self.policy = policy;
        self
    }

    #[must_use]
    pub fn with_min_width_floor(mut self, floor: u32) -> Self {
        self.min_width_floor = floor;
        self
    }

    #[must_use]
    pub fn with_keyboard_steps(mut self, step: u32, large_step: u32) -> Self {
        self.keyboard_step = step;
        self.keyboard_large_step = large_step;
        self
    }

    /// Load from a TOML string.
    #[cfg(feature = "resize-config")]
    pub fn from_toml_str(s: &str) -> Result<Self, ResizeConfigError> {
        toml::from_str(s).map_err(ResizeConfigError::Toml)
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "resize-config")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ResizeConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ResizeConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "resize-config")]
    pub fn from_json_str(s: &str) -> Result<Self, ResizeConfigError> {
        serde_json::from_str(s).map_err(ResizeConfigError::Json)
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "resize-config")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ResizeConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ResizeConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Validate all parameters.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.keyboard_step == 0 {
            errors.push("keyboard_step must be > 0".into());
        }
        if self.keyboard_large_step < self.keyboard_step {
            errors.push(format!(
                "keyboard_large_step must be >= keyboard_step ({}), got {}",
                self.keyboard_step, self.keyboard_large_step
            ));
        }
        if self.keyboard_large_step > i32::MAX as u32 {
            errors.push(format!(
                "keyboard_large_step must be <= {}, got {}",
                i32::MAX,
                self.keyboard_large_step
            ));
        }

        errors
    }

    /// Return `self` if valid, otherwise every validation error.
    pub fn validated(self) -> Result<Self, ResizeConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ResizeConfigError::Validation(errors))
        }
    }
}

/// Errors from loading or validating a [`ResizeConfig`].
#[derive(Debug)]
pub enum ResizeConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "resize-config")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "resize-config")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ResizeConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "resize-config")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "resize-config")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ResizeConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "resize-config")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "resize-config")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

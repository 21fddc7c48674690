//! Configuration for the annotation layer.
//!
//! Mirrors the options a viewer passes when it enables annotations: header
//! style, locale, device class, permissions, selection tuning and the
//! localized strings rendered into dialogs.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::DRAW_BORDER_OFFSET;
use crate::error::ConfigError;

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Log level setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Which mode header, if any, the controller injects into the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum HeaderMode {
    /// Light header
    #[default]
    Light,
    /// Dark header
    Dark,
    /// The host supplies its own header
    None,
}

/// Strategy for choosing among overlapping drawings under the pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum TieBreakMode {
    /// Uniformly random candidate
    #[default]
    Random,
    /// First candidate returned by the index
    First,
    /// Most recently indexed candidate
    Newest,
}

/// Drawing selection tuning.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// Half-size of the square searched around the pointer
    #[serde(default = "default_border_offset")]
    pub border_offset: f32,

    /// How overlapping candidates are resolved
    #[serde(default)]
    pub tie_break: TieBreakMode,
}

fn default_border_offset() -> f32 {
    DRAW_BORDER_OFFSET
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            border_offset: default_border_offset(),
            tie_break: TieBreakMode::default(),
        }
    }
}

/// Stroke history limits for in-progress drawings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryConfig {
    /// Maximum number of strokes kept for undo
    #[serde(default = "default_max_strokes")]
    pub max_strokes: usize,
}

fn default_max_strokes() -> usize {
    100
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_strokes: default_max_strokes(),
        }
    }
}

/// Localized labels rendered into dialogs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Strings {
    /// Name shown while a comment is still being posted
    pub posting_message: String,
    /// Name shown for users without a name
    pub anonymous_user_name: String,
    /// Alt text for avatar images
    pub profile_alt: String,
    /// Delete button label
    pub delete: String,
    /// Cancel button label
    pub cancel: String,
    /// Post button label
    pub post: String,
    /// Placeholder for the top-level comment textarea
    pub add_comment_placeholder: String,
    /// Placeholder for the reply textarea
    pub reply_placeholder: String,
    /// Prompt shown before deleting a comment
    pub delete_confirmation_message: String,
    /// Drawing toolbar save label
    pub draw_save: String,
    /// Drawing author label, `{1}` is replaced by the user name
    pub who_drew: String,
}

impl Default for Strings {
    fn default() -> Self {
        Self {
            posting_message: "Posting...".to_string(),
            anonymous_user_name: "Anonymous User".to_string(),
            profile_alt: "Profile picture".to_string(),
            delete: "Delete".to_string(),
            cancel: "Cancel".to_string(),
            post: "Post".to_string(),
            add_comment_placeholder: "Add a comment here...".to_string(),
            reply_placeholder: "Post a reply...".to_string(),
            delete_confirmation_message: "Delete this annotation?".to_string(),
            draw_save: "Save".to_string(),
            who_drew: "{1} drew".to_string(),
        }
    }
}

/// Annotation layer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnnotatorConfig {
    /// Version of the configuration file format
    pub version: u32,

    /// Header injected by mode controllers
    #[serde(default)]
    pub header: HeaderMode,

    /// Locale used for comment dates
    #[serde(default = "default_locale")]
    pub locale: String,

    /// Use the shared mobile dialog instead of floating dialogs
    #[serde(default)]
    pub is_mobile: bool,

    /// Whether the current user may reply, edit or delete
    #[serde(default = "default_can_annotate")]
    pub can_annotate: bool,

    /// Drawing selection tuning
    #[serde(default)]
    pub selection: SelectionConfig,

    /// Stroke history limits
    #[serde(default)]
    pub history: HistoryConfig,

    /// Localized labels
    #[serde(default)]
    pub strings: Strings,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,
}

fn default_locale() -> String {
    "en-US".to_string()
}

fn default_can_annotate() -> bool {
    true
}

impl AnnotatorConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            header: HeaderMode::default(),
            locale: default_locale(),
            is_mobile: false,
            can_annotate: default_can_annotate(),
            selection: SelectionConfig::default(),
            history: HistoryConfig::default(),
            strings: Strings::default(),
            log_level: LogLevel::default(),
        }
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize and validate configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| ConfigError::io(path, e))?;
        let config = Self::from_json(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Check version compatibility and value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version > CONFIG_VERSION {
            return Err(ConfigError::VersionMismatch {
                expected: CONFIG_VERSION,
                found: self.version,
            });
        }

        let offset = self.selection.border_offset;
        if !offset.is_finite() || offset < 0.0 {
            return Err(ConfigError::invalid_value(
                "selection.border_offset",
                format!("must be a non-negative number, got {offset}"),
            ));
        }

        if self.history.max_strokes == 0 {
            return Err(ConfigError::invalid_value(
                "history.max_strokes",
                "must keep at least one stroke",
            ));
        }

        if self.locale.trim().is_empty() {
            return Err(ConfigError::invalid_value("locale", "must not be empty"));
        }

        Ok(())
    }
}

impl Default for AnnotatorConfig {
    fn default() -> Self {
        Self::new()
    }
}

//! User settings and preferences for Markpad
//!
//! This module defines the `Settings` struct that holds all user-configurable
//! options, with serde support for JSON persistence.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ─────────────────────────────────────────────────────────────────────────────
// Render Mode Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Which panes are visible in the central area.
///
/// This is pure view state: switching modes never touches the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RenderMode {
    /// Editor and preview side by side
    #[default]
    Split,
    /// Only the markdown editor
    Editor,
    /// Only the rendered preview
    Preview,
}

impl RenderMode {
    /// Cycle to the next mode (Split -> Editor -> Preview -> Split).
    pub fn next(&self) -> Self {
        match self {
            RenderMode::Split => RenderMode::Editor,
            RenderMode::Editor => RenderMode::Preview,
            RenderMode::Preview => RenderMode::Split,
        }
    }

    /// Whether the editing surface is shown in this mode.
    pub fn shows_editor(&self) -> bool {
        matches!(self, RenderMode::Split | RenderMode::Editor)
    }

    /// Whether the rendered preview is shown in this mode.
    pub fn shows_preview(&self) -> bool {
        matches!(self, RenderMode::Split | RenderMode::Preview)
    }

    /// Get the icon for this mode.
    pub fn icon(&self) -> &'static str {
        match self {
            RenderMode::Split => "◫",
            RenderMode::Editor => "📝",
            RenderMode::Preview => "👁",
        }
    }

    /// Get the tooltip for this mode in the given direction's language.
    pub fn tooltip(&self, direction: Direction) -> &'static str {
        match (self, direction) {
            (RenderMode::Split, Direction::Ltr) => "Split View",
            (RenderMode::Split, Direction::Rtl) => "عرض مقسم",
            (RenderMode::Editor, Direction::Ltr) => "Editor Only",
            (RenderMode::Editor, Direction::Rtl) => "المحرر فقط",
            (RenderMode::Preview, Direction::Ltr) => "Preview Only",
            (RenderMode::Preview, Direction::Rtl) => "المعاينة فقط",
        }
    }

    /// Get all modes in toolbar order.
    pub fn all() -> &'static [RenderMode] {
        &[RenderMode::Split, RenderMode::Editor, RenderMode::Preview]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Text Direction
// ─────────────────────────────────────────────────────────────────────────────

/// Writing direction of the UI and exported documents.
///
/// Right-to-left also switches the UI labels to Arabic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl Direction {
    /// Flip between left-to-right and right-to-left.
    pub fn toggle(&self) -> Self {
        match self {
            Direction::Ltr => Direction::Rtl,
            Direction::Rtl => Direction::Ltr,
        }
    }

    pub fn is_rtl(&self) -> bool {
        matches!(self, Direction::Rtl)
    }

    /// Value of the HTML `dir` attribute.
    pub fn html_dir(&self) -> &'static str {
        match self {
            Direction::Ltr => "ltr",
            Direction::Rtl => "rtl",
        }
    }

    /// Value of the HTML `lang` attribute.
    pub fn lang(&self) -> &'static str {
        match self {
            Direction::Ltr => "en",
            Direction::Rtl => "ar",
        }
    }

    /// The side where lines start ("left" or "right").
    pub fn start_side(&self) -> &'static str {
        match self {
            Direction::Ltr => "left",
            Direction::Rtl => "right",
        }
    }

    /// Label of the button that switches to the other language.
    pub fn toggle_label(&self) -> &'static str {
        match self {
            Direction::Ltr => "العربية",
            Direction::Rtl => "English",
        }
    }

    /// Pick the string matching this direction's language.
    pub fn pick<'a>(&self, en: &'a str, ar: &'a str) -> &'a str {
        match self {
            Direction::Ltr => en,
            Direction::Rtl => ar,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Window Size Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Window dimensions and position.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindowSize {
    /// Window width in pixels
    pub width: f32,
    /// Window height in pixels
    pub height: f32,
    /// Window X position (None = centered)
    pub x: Option<f32>,
    /// Window Y position (None = centered)
    pub y: Option<f32>,
    /// Whether the window is maximized
    pub maximized: bool,
}

impl Default for WindowSize {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            x: None,
            y: None,
            maximized: false,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Storage Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Environment variable holding the storage service base URL.
pub const STORAGE_URL_ENV: &str = "MARKPAD_STORAGE_URL";

/// Environment variable holding the anonymous storage access key.
pub const STORAGE_KEY_ENV: &str = "MARKPAD_STORAGE_KEY";

/// Bucket that receives uploaded images.
pub const DEFAULT_BUCKET: &str = "markdown-images";

/// Where uploaded images go.
///
/// Endpoint and key are baked in at build time and may be overridden by the
/// same environment variables at run time. The key is never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    /// Base URL of the storage service (e.g. `https://xyz.supabase.co`)
    pub endpoint: String,
    /// Target bucket name
    pub bucket: String,
    /// Anonymous access key, sent as a bearer token
    #[serde(skip)]
    pub access_key: Option<String>,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            endpoint: option_env!("MARKPAD_STORAGE_URL")
                .unwrap_or_default()
                .to_string(),
            bucket: DEFAULT_BUCKET.to_string(),
            access_key: option_env!("MARKPAD_STORAGE_KEY").map(str::to_string),
        }
    }
}

impl StorageSettings {
    /// Apply run-time overrides from the environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(
            std::env::var(STORAGE_URL_ENV).ok(),
            std::env::var(STORAGE_KEY_ENV).ok(),
        );
    }

    fn apply_overrides(&mut self, endpoint: Option<String>, key: Option<String>) {
        if let Some(endpoint) = endpoint.filter(|e| !e.trim().is_empty()) {
            self.endpoint = endpoint;
        }
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.access_key = Some(key);
        }
    }

    /// Whether both an endpoint and an access key are available.
    pub fn is_configured(&self) -> bool {
        !self.endpoint.trim().is_empty()
            && self
                .access_key
                .as_deref()
                .is_some_and(|k| !k.trim().is_empty())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Main Settings Struct
// ─────────────────────────────────────────────────────────────────────────────

/// Application settings and user preferences.
///
/// This struct is serialized to JSON and persisted to the user's config directory.
/// All fields have sensible defaults via the `Default` trait and `#[serde(default)]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Appearance
    // ─────────────────────────────────────────────────────────────────────────
    /// Visible panes
    pub render_mode: RenderMode,

    /// UI and export direction
    pub direction: Direction,

    /// Font size for the editor and preview (in points)
    pub font_size: f32,

    /// Whether to wrap long lines in the editor
    pub word_wrap: bool,

    // ─────────────────────────────────────────────────────────────────────────
    // Window State
    // ─────────────────────────────────────────────────────────────────────────
    /// Window size and position
    pub window_size: WindowSize,

    /// Split ratio for the editor/preview panes (0.0 to 1.0)
    pub split_ratio: f32,

    // ─────────────────────────────────────────────────────────────────────────
    // Export & Upload
    // ─────────────────────────────────────────────────────────────────────────
    /// Last directory used for exports
    pub last_export_directory: Option<PathBuf>,

    /// Whether to open exported files after export
    pub open_after_export: bool,

    /// Last directory an image was picked from
    pub last_image_directory: Option<PathBuf>,

    /// Image storage target
    pub storage: StorageSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            render_mode: RenderMode::default(),
            direction: Direction::default(),
            font_size: 14.0,
            word_wrap: true,

            window_size: WindowSize::default(),
            split_ratio: 0.5,

            last_export_directory: None,
            open_after_export: false,
            last_image_directory: None,
            storage: StorageSettings::default(),
        }
    }
}

impl Settings {
    // ─────────────────────────────────────────────────────────────────────────
    // Validation Constants and Sanitization
    // ─────────────────────────────────────────────────────────────────────────

    /// Minimum allowed font size.
    pub const MIN_FONT_SIZE: f32 = 8.0;
    /// Maximum allowed font size.
    pub const MAX_FONT_SIZE: f32 = 72.0;
    /// Minimum window dimension.
    pub const MIN_WINDOW_SIZE: f32 = 200.0;
    /// Maximum window dimension.
    pub const MAX_WINDOW_SIZE: f32 = 10000.0;
    /// Minimum split ratio (either pane keeps some width).
    pub const MIN_SPLIT_RATIO: f32 = 0.1;
    /// Maximum split ratio.
    pub const MAX_SPLIT_RATIO: f32 = 0.9;

    /// Sanitize settings by clamping values to valid ranges.
    ///
    /// This is useful after loading settings from a file that might have
    /// been manually edited with invalid values.
    pub fn sanitize(&mut self) {
        self.font_size = self
            .font_size
            .clamp(Self::MIN_FONT_SIZE, Self::MAX_FONT_SIZE);

        self.window_size.width = self
            .window_size
            .width
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);
        self.window_size.height = self
            .window_size
            .height
            .clamp(Self::MIN_WINDOW_SIZE, Self::MAX_WINDOW_SIZE);

        self.split_ratio = self
            .split_ratio
            .clamp(Self::MIN_SPLIT_RATIO, Self::MAX_SPLIT_RATIO);

        if self.storage.bucket.trim().is_empty() {
            self.storage.bucket = DEFAULT_BUCKET.to_string();
        }
    }

    /// Load settings and sanitize them to ensure validity.
    ///
    /// This is a convenience method that deserializes and then sanitizes.
    pub fn from_json_sanitized(json: &str) -> Result<Self, serde_json::Error> {
        let mut settings: Self = serde_json::from_str(json)?;
        settings.sanitize();
        Ok(settings)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.render_mode, RenderMode::Split);
        assert_eq!(settings.direction, Direction::Ltr);
        assert_eq!(settings.font_size, 14.0);
        assert_eq!(settings.storage.bucket, "markdown-images");
    }

    #[test]
    fn test_render_mode_cycle() {
        assert_eq!(RenderMode::Split.next(), RenderMode::Editor);
        assert_eq!(RenderMode::Editor.next(), RenderMode::Preview);
        assert_eq!(RenderMode::Preview.next(), RenderMode::Split);
    }

    #[test]
    fn test_render_mode_panes() {
        assert!(RenderMode::Split.shows_editor() && RenderMode::Split.shows_preview());
        assert!(RenderMode::Editor.shows_editor() && !RenderMode::Editor.shows_preview());
        assert!(!RenderMode::Preview.shows_editor() && RenderMode::Preview.shows_preview());
    }

    #[test]
    fn test_direction_attributes() {
        assert_eq!(Direction::Ltr.html_dir(), "ltr");
        assert_eq!(Direction::Rtl.html_dir(), "rtl");
        assert_eq!(Direction::Ltr.lang(), "en");
        assert_eq!(Direction::Rtl.lang(), "ar");
        assert_eq!(Direction::Ltr.start_side(), "left");
        assert_eq!(Direction::Rtl.start_side(), "right");
        assert_eq!(Direction::Ltr.toggle(), Direction::Rtl);
    }

    #[test]
    fn test_direction_pick() {
        assert_eq!(Direction::Ltr.pick("Bold", "غامق"), "Bold");
        assert_eq!(Direction::Rtl.pick("Bold", "غامق"), "غامق");
    }

    #[test]
    fn test_serialization_roundtrip() {
        let mut settings = Settings::default();
        settings.render_mode = RenderMode::Preview;
        settings.direction = Direction::Rtl;

        let json = serde_json::to_string(&settings).unwrap();
        assert!(json.contains("\"render_mode\":\"preview\""));
        assert!(json.contains("\"direction\":\"rtl\""));

        let restored: Settings = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.render_mode, RenderMode::Preview);
        assert_eq!(restored.direction, Direction::Rtl);
    }

    #[test]
    fn test_access_key_not_serialized() {
        let mut settings = Settings::default();
        settings.storage.access_key = Some("secret-anon-key".to_string());
        let json = serde_json::to_string(&settings).unwrap();
        assert!(!json.contains("secret-anon-key"));
    }

    #[test]
    fn test_missing_fields_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"direction":"rtl"}"#).unwrap();
        assert_eq!(settings.direction, Direction::Rtl);
        assert_eq!(settings.render_mode, RenderMode::Split);
        assert!(settings.word_wrap);
    }

    #[test]
    fn test_sanitize_clamps_values() {
        let mut settings = Settings {
            font_size: 200.0,
            split_ratio: 1.5,
            ..Default::default()
        };
        settings.window_size.width = 5.0;
        settings.storage.bucket = "  ".to_string();
        settings.sanitize();

        assert_eq!(settings.font_size, Settings::MAX_FONT_SIZE);
        assert_eq!(settings.split_ratio, Settings::MAX_SPLIT_RATIO);
        assert_eq!(settings.window_size.width, Settings::MIN_WINDOW_SIZE);
        assert_eq!(settings.storage.bucket, DEFAULT_BUCKET);
    }

    #[test]
    fn test_from_json_sanitized() {
        let settings = Settings::from_json_sanitized(r#"{"font_size": 1.0}"#).unwrap();
        assert_eq!(settings.font_size, Settings::MIN_FONT_SIZE);
    }

    #[test]
    fn test_storage_overrides() {
        let mut storage = StorageSettings {
            endpoint: String::new(),
            bucket: DEFAULT_BUCKET.to_string(),
            access_key: None,
        };
        assert!(!storage.is_configured());

        storage.apply_overrides(Some("https://example.supabase.co".into()), Some("anon".into()));
        assert_eq!(storage.endpoint, "https://example.supabase.co");
        assert!(storage.is_configured());

        // Blank overrides leave existing values alone
        storage.apply_overrides(Some("  ".into()), Some(String::new()));
        assert_eq!(storage.endpoint, "https://example.supabase.co");
        assert_eq!(storage.access_key.as_deref(), Some("anon"));
    }
}

//! Font management for Markpad
//!
//! egui's bundled fonts have no Arabic glyphs. At startup we look for an
//! Arabic-capable font on the system and register it as a fallback for both
//! the proportional and the monospace family.

use eframe::egui::{self, FontData, FontDefinitions, FontFamily, FontId, TextStyle};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

// ─────────────────────────────────────────────────────────────────────────────
// Font Discovery
// ─────────────────────────────────────────────────────────────────────────────

/// Name under which the fallback font is registered.
pub const FONT_ARABIC: &str = "Arabic";

/// Environment variable pointing at a font file to use instead of the search.
pub const ARABIC_FONT_ENV: &str = "MARKPAD_ARABIC_FONT";

/// Well-known locations of fonts covering Arabic, tried in order.
const ARABIC_FONT_CANDIDATES: &[&str] = &[
    // Linux
    "/usr/share/fonts/truetype/noto/NotoSansArabic-Regular.ttf",
    "/usr/share/fonts/noto/NotoSansArabic-Regular.ttf",
    "/usr/share/fonts/google-noto/NotoSansArabic-Regular.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    // macOS
    "/System/Library/Fonts/Supplemental/GeezaPro.ttc",
    "/Library/Fonts/Arial Unicode.ttf",
    "/System/Library/Fonts/Supplemental/Arial Unicode.ttf",
    // Windows
    "C:\\Windows\\Fonts\\segoeui.ttf",
    "C:\\Windows\\Fonts\\tahoma.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Locate a font file that covers Arabic.
pub fn find_arabic_font() -> Option<PathBuf> {
    let from_env = std::env::var_os(ARABIC_FONT_ENV).map(PathBuf::from);
    let candidates = from_env
        .into_iter()
        .chain(ARABIC_FONT_CANDIDATES.iter().map(PathBuf::from));
    first_existing(candidates)
}

fn first_existing(candidates: impl IntoIterator<Item = PathBuf>) -> Option<PathBuf> {
    candidates.into_iter().find(|path| path.is_file())
}

fn read_font(path: &Path) -> Option<Vec<u8>> {
    match std::fs::read(path) {
        Ok(bytes) => Some(bytes),
        Err(e) => {
            warn!("Failed to read font {}: {}", path.display(), e);
            None
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Font Definitions
// ─────────────────────────────────────────────────────────────────────────────

/// Create font definitions, appending `arabic` as the last fallback of
/// every family when given.
pub fn create_font_definitions(arabic: Option<Vec<u8>>) -> FontDefinitions {
    let mut fonts = FontDefinitions::default();

    if let Some(bytes) = arabic {
        fonts
            .font_data
            .insert(FONT_ARABIC.to_owned(), FontData::from_owned(bytes));

        // Order matters: first font is primary, rest are fallbacks
        for family in [FontFamily::Proportional, FontFamily::Monospace] {
            fonts
                .families
                .entry(family)
                .or_default()
                .push(FONT_ARABIC.to_owned());
        }
    }

    fonts
}

/// Apply fonts and text styles to an egui context.
///
/// This should be called once during application initialization.
pub fn setup_fonts(ctx: &egui::Context) {
    let arabic = match find_arabic_font() {
        Some(path) => {
            info!("Using {} for Arabic text", path.display());
            read_font(&path)
        }
        None => {
            warn!(
                "No Arabic font found; set {} to a .ttf file to render Arabic text",
                ARABIC_FONT_ENV
            );
            None
        }
    };
    ctx.set_fonts(create_font_definitions(arabic));

    let text_styles: BTreeMap<TextStyle, FontId> = [
        (
            TextStyle::Heading,
            FontId::new(24.0, FontFamily::Proportional),
        ),
        (TextStyle::Body, FontId::new(14.0, FontFamily::Proportional)),
        (
            TextStyle::Monospace,
            FontId::new(14.0, FontFamily::Monospace),
        ),
        (
            TextStyle::Button,
            FontId::new(14.0, FontFamily::Proportional),
        ),
        (
            TextStyle::Small,
            FontId::new(11.0, FontFamily::Proportional),
        ),
    ]
    .into();

    ctx.style_mut(|style| {
        style.text_styles = text_styles.clone();
    });

    debug!("Configured egui text styles");
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_font_definitions_without_arabic() {
        let fonts = create_font_definitions(None);
        assert!(!fonts.font_data.contains_key(FONT_ARABIC));
        assert_eq!(
            fonts.families[&FontFamily::Proportional],
            FontDefinitions::default().families[&FontFamily::Proportional]
        );
    }

    #[test]
    fn test_arabic_is_last_fallback() {
        let fonts = create_font_definitions(Some(vec![0u8; 4]));
        assert!(fonts.font_data.contains_key(FONT_ARABIC));
        for family in [FontFamily::Proportional, FontFamily::Monospace] {
            assert_eq!(
                fonts.families[&family].last().map(String::as_str),
                Some(FONT_ARABIC)
            );
        }
    }

    #[test]
    fn test_first_existing_skips_missing() {
        let dir = TempDir::new().unwrap();
        let present = dir.path().join("font.ttf");
        std::fs::write(&present, b"ttf").unwrap();

        let found = first_existing(vec![dir.path().join("missing.ttf"), present.clone()]);
        assert_eq!(found, Some(present));
        assert_eq!(first_existing(vec![dir.path().to_path_buf()]), None);
    }
}

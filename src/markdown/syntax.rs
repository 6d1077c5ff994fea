//! Syntax Highlighting Module
//!
//! This module integrates syntect for code block syntax highlighting in the
//! preview pane.
//!
//! # Example
//! ```ignore
//! use crate::markdown::syntax::highlight_code;
//!
//! let job = highlight_code("fn main() {}", "rust", 14.0, true);
//! ui.label(job);
//! ```

use eframe::egui::text::LayoutJob;
use eframe::egui::{Color32, FontId, Stroke, TextFormat};
use log::{debug, warn};
use std::sync::OnceLock;
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Style, Theme, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Theme used on dark backgrounds
pub const DARK_THEME: &str = "base16-ocean.dark";

/// Theme used on light backgrounds
pub const LIGHT_THEME: &str = "InspiredGitHub";

// ─────────────────────────────────────────────────────────────────────────────
// Syntax Highlighter
// ─────────────────────────────────────────────────────────────────────────────

/// Syntax highlighter that caches syntect sets.
///
/// Loading the bundled syntaxes and themes is expensive, so a single instance
/// lives for the whole process (see [`get_highlighter`]).
pub struct SyntaxHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl SyntaxHighlighter {
    /// Load the default syntaxes and themes bundled with syntect.
    pub fn new() -> Self {
        debug!("Loading syntect syntax and theme sets");
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let theme_set = ThemeSet::load_defaults();
        debug!(
            "Loaded {} syntaxes and {} themes",
            syntax_set.syntaxes().len(),
            theme_set.themes.len()
        );
        Self {
            syntax_set,
            theme_set,
        }
    }

    /// Theme for dark or light mode, if it is bundled.
    fn theme_for_mode(&self, dark_mode: bool) -> Option<&Theme> {
        let name = if dark_mode { DARK_THEME } else { LIGHT_THEME };
        self.theme_set
            .themes
            .get(name)
            .or_else(|| self.theme_set.themes.values().next())
    }

    /// Highlight `code` into a layout job of monospace runs.
    ///
    /// Unknown languages, and any line syntect fails on, fall back to plain
    /// text in `fallback_color`.
    pub fn highlight(
        &self,
        code: &str,
        language: &str,
        font_size: f32,
        dark_mode: bool,
        fallback_color: Color32,
    ) -> LayoutJob {
        let font_id = FontId::monospace(font_size);
        let mut job = LayoutJob::default();

        let syntax = self.find_syntax_for_language(language);
        let theme = self.theme_for_mode(dark_mode);

        let (Some(syntax), Some(theme)) = (syntax, theme) else {
            debug!("No syntax found for language: {:?}", language);
            job.append(code, 0.0, plain_format(font_id, fallback_color));
            return job;
        };

        let mut highlighter = HighlightLines::new(syntax, theme);
        for line in LinesWithEndings::from(code) {
            match highlighter.highlight_line(line, &self.syntax_set) {
                Ok(ranges) => {
                    for (style, text) in ranges {
                        job.append(text, 0.0, style_to_format(style, font_id.clone()));
                    }
                }
                Err(e) => {
                    warn!("Failed to highlight line: {}", e);
                    job.append(line, 0.0, plain_format(font_id.clone(), fallback_color));
                }
            }
        }

        job
    }

    /// Find the syntax definition for a fenced code block's language tag.
    fn find_syntax_for_language(&self, language: &str) -> Option<&SyntaxReference> {
        if language.is_empty() {
            return None;
        }

        let lang_lower = language.to_lowercase();

        let extension = match lang_lower.as_str() {
            "rust" => "rs",
            "python" => "py",
            "javascript" | "jsx" => "js",
            "typescript" | "tsx" => "ts",
            "c++" | "cxx" => "cpp",
            "csharp" | "c#" => "cs",
            "golang" => "go",
            "ruby" => "rb",
            "htm" => "html",
            "yml" => "yaml",
            "markdown" => "md",
            "shell" | "bash" | "zsh" => "sh",
            other => other,
        };

        self.syntax_set
            .find_syntax_by_extension(extension)
            .or_else(|| self.syntax_set.find_syntax_by_name(language))
            .or_else(|| {
                self.syntax_set
                    .syntaxes()
                    .iter()
                    .find(|syntax| syntax.name.to_lowercase() == lang_lower)
            })
    }
}

impl Default for SyntaxHighlighter {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Helper Functions
// ─────────────────────────────────────────────────────────────────────────────

/// Convert syntect Color to egui Color32.
pub fn syntect_to_egui_color(color: syntect::highlighting::Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

fn plain_format(font_id: FontId, color: Color32) -> TextFormat {
    TextFormat::simple(font_id, color)
}

/// Convert a syntect style into an egui text format.
fn style_to_format(style: Style, font_id: FontId) -> TextFormat {
    let color = syntect_to_egui_color(style.foreground);
    let mut format = TextFormat::simple(font_id, color);
    format.italics = style.font_style.contains(FontStyle::ITALIC);
    if style.font_style.contains(FontStyle::UNDERLINE) {
        format.underline = Stroke::new(1.0, color);
    }
    format
}

// ─────────────────────────────────────────────────────────────────────────────
// Global Highlighter Instance
// ─────────────────────────────────────────────────────────────────────────────

static HIGHLIGHTER: OnceLock<SyntaxHighlighter> = OnceLock::new();

/// Get or create the global syntax highlighter.
pub fn get_highlighter() -> &'static SyntaxHighlighter {
    HIGHLIGHTER.get_or_init(SyntaxHighlighter::new)
}

/// Highlight code using the global highlighter.
pub fn highlight_code(code: &str, language: &str, font_size: f32, dark_mode: bool) -> LayoutJob {
    let fallback = if dark_mode {
        Color32::from_gray(220)
    } else {
        Color32::from_gray(40)
    };
    get_highlighter().highlight(code, language, font_size, dark_mode, fallback)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_rust_code_has_several_runs() {
        let job = highlight_code("fn main() {\n    let x = 1;\n}\n", "rust", 14.0, true);
        assert_eq!(job.text, "fn main() {\n    let x = 1;\n}\n");
        assert!(job.sections.len() > 1);
    }

    #[test]
    fn test_highlight_unknown_language_is_plain() {
        let job = highlight_code("some text", "no-such-language", 14.0, false);
        assert_eq!(job.text, "some text");
        assert_eq!(job.sections.len(), 1);
    }

    #[test]
    fn test_highlight_empty_language_is_plain() {
        let job = highlight_code("x = 1", "", 12.0, true);
        assert_eq!(job.sections.len(), 1);
    }

    #[test]
    fn test_language_aliases() {
        let highlighter = get_highlighter();
        for lang in ["rust", "rs", "python", "py", "javascript", "js", "bash", "json"] {
            assert!(
                highlighter.find_syntax_for_language(lang).is_some(),
                "missing syntax for {}",
                lang
            );
        }
    }

    #[test]
    fn test_syntect_to_egui_color() {
        let color = syntect::highlighting::Color {
            r: 10,
            g: 20,
            b: 30,
            a: 255,
        };
        assert_eq!(syntect_to_egui_color(color), Color32::from_rgb(10, 20, 30));
    }
}

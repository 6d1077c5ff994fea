//! Export Formats
//!
//! This module defines the two export formats and the artifact every export
//! produces before it reaches the disk.

use crate::config::Direction;

// ─────────────────────────────────────────────────────────────────────────────
// Export Format
// ─────────────────────────────────────────────────────────────────────────────

/// Supported export formats for documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// The raw markdown buffer
    #[default]
    Markdown,
    /// A standalone HTML page
    Html,
}

impl ExportFormat {
    /// Suggested file name for the save dialog.
    pub fn file_name(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "document.md",
            ExportFormat::Html => "document.html",
        }
    }

    /// MIME type of the exported contents.
    pub fn mime(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "text/markdown",
            ExportFormat::Html => "text/html",
        }
    }

    /// File extension, without the leading dot.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "md",
            ExportFormat::Html => "html",
        }
    }

    /// Get the display label for this format.
    pub fn label(&self, direction: Direction) -> &'static str {
        match self {
            ExportFormat::Markdown => direction.pick("Export Markdown", "تصدير Markdown"),
            ExportFormat::Html => direction.pick("Export HTML", "تصدير HTML"),
        }
    }

    /// Name of the file type filter in the save dialog.
    pub fn filter_name(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "Markdown",
            ExportFormat::Html => "HTML",
        }
    }

    /// Get an icon for this format.
    pub fn icon(&self) -> &'static str {
        match self {
            ExportFormat::Markdown => "📄",
            ExportFormat::Html => "🌐",
        }
    }

    /// Get all available export formats.
    pub fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Markdown, ExportFormat::Html]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Export Artifact
// ─────────────────────────────────────────────────────────────────────────────

/// The output of an export: a suggested name, its MIME type and the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub mime: &'static str,
    pub contents: String,
}

impl ExportArtifact {
    /// Build an artifact with the default name and MIME type of `format`.
    pub fn new(format: ExportFormat, contents: String) -> Self {
        Self {
            file_name: format.file_name().to_string(),
            mime: format.mime(),
            contents,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_format_default() {
        assert_eq!(ExportFormat::default(), ExportFormat::Markdown);
    }

    #[test]
    fn test_export_format_names() {
        assert_eq!(ExportFormat::Markdown.file_name(), "document.md");
        assert_eq!(ExportFormat::Html.file_name(), "document.html");
        assert_eq!(ExportFormat::Markdown.mime(), "text/markdown");
        assert_eq!(ExportFormat::Html.mime(), "text/html");
    }

    #[test]
    fn test_file_name_matches_extension() {
        for format in ExportFormat::all() {
            assert!(format.file_name().ends_with(format.extension()));
        }
    }

    #[test]
    fn test_label_follows_direction() {
        assert_eq!(ExportFormat::Html.label(Direction::Ltr), "Export HTML");
        assert_eq!(ExportFormat::Html.label(Direction::Rtl), "تصدير HTML");
    }

    #[test]
    fn test_artifact_new() {
        let artifact = ExportArtifact::new(ExportFormat::Html, "<p>x</p>".to_string());
        assert_eq!(artifact.file_name, "document.html");
        assert_eq!(artifact.mime, "text/html");
        assert_eq!(artifact.contents, "<p>x</p>");
    }
}

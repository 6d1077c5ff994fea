//! HTML Export Generation
//!
//! This module generates complete HTML documents from markdown content. The
//! stylesheet is mirrored for right-to-left documents and math spans are
//! typeset by KaTeX when the page loads.

use super::options::{ExportArtifact, ExportFormat};
use crate::config::Direction;
use crate::editor::Document;
use crate::markdown::render_to_html;
use log::debug;

// ─────────────────────────────────────────────────────────────────────────────
// Constants
// ─────────────────────────────────────────────────────────────────────────────

/// Title of every exported page.
pub const EXPORT_TITLE: &str = "Exported Markdown";

const KATEX_CSS: &str = "https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.css";
const KATEX_JS: &str = "https://cdn.jsdelivr.net/npm/katex@0.16.9/dist/katex.min.js";

/// Renders every `<span data-math-style>` emitted for `$...$` and `$$...$$`.
const KATEX_TYPESET: &str = r#"document.addEventListener("DOMContentLoaded", function () {
        if (typeof katex === "undefined") { return; }
        document.querySelectorAll("[data-math-style]").forEach(function (el) {
            katex.render(el.textContent, el, {
                displayMode: el.getAttribute("data-math-style") === "display",
                throwOnError: false
            });
        });
    });"#;

// ─────────────────────────────────────────────────────────────────────────────
// HTML Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Export the document as a standalone HTML page.
///
/// The buffer is rendered afresh, so the result does not depend on whether
/// the preview pane is currently visible.
pub fn export_html(document: &Document, direction: Direction) -> ExportArtifact {
    let html = generate_html_document(&document.content, direction);
    debug!(
        "Generated HTML export ({} bytes, dir={})",
        html.len(),
        direction.html_dir()
    );
    ExportArtifact::new(ExportFormat::Html, html)
}

/// Generate a complete HTML document from markdown content.
pub fn generate_html_document(markdown: &str, direction: Direction) -> String {
    let body = render_to_html(markdown);

    format!(
        r#"<!DOCTYPE html>
<html lang="{lang}" dir="{dir}">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="{katex_css}">
    <script defer src="{katex_js}"></script>
    <script>
    {katex_typeset}
    </script>
    <style>
{css}
    </style>
</head>
<body>
{body}
</body>
</html>
"#,
        lang = direction.lang(),
        dir = direction.html_dir(),
        title = EXPORT_TITLE,
        katex_css = KATEX_CSS,
        katex_js = KATEX_JS,
        katex_typeset = KATEX_TYPESET,
        css = generate_css(direction),
        body = body,
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// CSS Generation
// ─────────────────────────────────────────────────────────────────────────────

/// Build the page stylesheet. Only the start side of the page is styled
/// for block quotes, so an rtl page never carries a left border.
fn generate_css(direction: Direction) -> String {
    let side = direction.start_side();

    format!(
        r#"        body {{
            font-family: system-ui, -apple-system, sans-serif;
            line-height: 1.6;
            max-width: 800px;
            margin: 0 auto;
            padding: 2rem;
            color: #374151;
            direction: {dir};
            text-align: {side};
        }}
        pre {{
            background: #f3f4f6;
            padding: 1rem;
            border-radius: 0.5rem;
            overflow-x: auto;
            direction: ltr;
            text-align: left;
        }}
        code {{
            font-family: ui-monospace, monospace;
            font-size: 0.9em;
            direction: ltr;
            text-align: left;
        }}
        blockquote {{
            border-{side}: 4px solid #e5e7eb;
            margin-{side}: 0;
            padding-{side}: 1rem;
            color: #6b7280;
        }}
        table {{
            border-collapse: collapse;
            width: 100%;
            margin: 1rem 0;
        }}
        th, td {{
            border: 1px solid #e5e7eb;
            padding: 0.5rem;
            text-align: {side};
        }}
        th {{
            background: #f9fafb;
        }}
        img {{
            max-width: 100%;
            height: auto;
        }}"#,
        dir = direction.html_dir(),
        side = side,
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

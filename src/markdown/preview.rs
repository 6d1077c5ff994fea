//! Rendered Markdown Preview
//!
//! This module renders a parsed [`MarkdownDocument`] into read-only egui
//! widgets. Block layout follows the writing direction: in right-to-left mode
//! blocks hug the right edge, inline runs flow from the right, list markers and
//! quote bars sit on the right. Code stays left-to-right in both modes.
//!
//! # Example
//! ```ignore
//! let document = cache.get(version, &source);
//! MarkdownPreview::new(document)
//!     .font_size(settings.font_size)
//!     .direction(settings.direction)
//!     .show(ui);
//! ```

use crate::config::Direction;
use crate::markdown::parser::{
    parse_markdown, HeadingLevel, ListType, MarkdownDocument, MarkdownNode, MarkdownNodeType,
};
use crate::markdown::syntax::highlight_code;
use eframe::egui::{self, Align, Color32, FontId, Layout, RichText, ScrollArea, Ui, Vec2};
use log::debug;

// ─────────────────────────────────────────────────────────────────────────────
// Colors
// ─────────────────────────────────────────────────────────────────────────────

/// Colors used by the preview.
#[derive(Debug, Clone)]
pub struct PreviewColors {
    pub text: Color32,
    pub heading: Color32,
    pub code_bg: Color32,
    pub code_text: Color32,
    pub quote_border: Color32,
    pub quote_text: Color32,
    pub link: Color32,
    pub hr: Color32,
    pub list_marker: Color32,
    pub math: Color32,
}

impl PreviewColors {
    /// Pick the palette matching the current egui visuals.
    pub fn from_visuals(visuals: &egui::Visuals) -> Self {
        if visuals.dark_mode {
            Self::dark()
        } else {
            Self::light()
        }
    }

    pub fn dark() -> Self {
        Self {
            text: Color32::from_rgb(220, 220, 220),
            heading: Color32::from_rgb(100, 180, 255),
            code_bg: Color32::from_rgb(45, 45, 45),
            code_text: Color32::from_rgb(200, 200, 150),
            quote_border: Color32::from_rgb(80, 80, 80),
            quote_text: Color32::from_rgb(180, 180, 180),
            link: Color32::from_rgb(100, 180, 255),
            hr: Color32::from_rgb(80, 80, 80),
            list_marker: Color32::from_rgb(150, 150, 150),
            math: Color32::from_rgb(230, 180, 120),
        }
    }

    pub fn light() -> Self {
        Self {
            text: Color32::from_rgb(30, 30, 30),
            heading: Color32::from_rgb(0, 100, 180),
            code_bg: Color32::from_rgb(245, 245, 245),
            code_text: Color32::from_rgb(80, 80, 80),
            quote_border: Color32::from_rgb(200, 200, 200),
            quote_text: Color32::from_rgb(100, 100, 100),
            link: Color32::from_rgb(0, 100, 180),
            hr: Color32::from_rgb(200, 200, 200),
            list_marker: Color32::from_rgb(100, 100, 100),
            math: Color32::from_rgb(150, 70, 0),
        }
    }

    fn is_dark(&self) -> bool {
        self.text.r() > 128
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parse Cache
// ─────────────────────────────────────────────────────────────────────────────

/// Keeps the last parse around until the document version changes.
#[derive(Debug, Default)]
pub struct PreviewCache {
    version: Option<u64>,
    document: Option<MarkdownDocument>,
}

impl PreviewCache {
    /// Return the parsed form of `source`, reparsing only when `version` moved.
    pub fn get(&mut self, version: u64, source: &str) -> &MarkdownDocument {
        if self.version != Some(version) {
            debug!("Reparsing preview for document version {}", version);
            self.version = Some(version);
            self.document = None;
        }
        self.document.get_or_insert_with(|| parse_markdown(source))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Preview Widget
// ─────────────────────────────────────────────────────────────────────────────

/// Read-only renderer for a parsed markdown document.
pub struct MarkdownPreview<'a> {
    document: &'a MarkdownDocument,
    font_size: f32,
    direction: Direction,
    id: Option<egui::Id>,
}

impl<'a> MarkdownPreview<'a> {
    pub fn new(document: &'a MarkdownDocument) -> Self {
        Self {
            document,
            font_size: 14.0,
            direction: Direction::default(),
            id: None,
        }
    }

    #[must_use]
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    #[must_use]
    pub fn id(mut self, id: egui::Id) -> Self {
        self.id = Some(id);
        self
    }

    /// Render the document inside a vertical scroll area.
    pub fn show(self, ui: &mut Ui) {
        let id = self.id.unwrap_or_else(|| ui.id().with("markpad_preview"));
        let ctx = RenderContext {
            colors: PreviewColors::from_visuals(ui.visuals()),
            font_size: self.font_size,
            direction: self.direction,
        };
        let document = self.document;

        ScrollArea::vertical()
            .id_source(id.with("scroll"))
            .auto_shrink([false, false])
            .show(ui, |ui| {
                ui.with_layout(ctx.block_layout(), |ui| {
                    for child in &document.root.children {
                        render_block(ui, child, &ctx);
                    }
                });
            });
    }
}

/// Settings shared by every render call.
struct RenderContext {
    colors: PreviewColors,
    font_size: f32,
    direction: Direction,
}

impl RenderContext {
    /// Vertical layout hugging the start side.
    fn block_layout(&self) -> Layout {
        Layout::top_down(self.start_align())
    }

    /// Wrapping horizontal layout flowing from the start side.
    fn inline_layout(&self) -> Layout {
        if self.direction.is_rtl() {
            Layout::right_to_left(Align::TOP).with_main_wrap(true)
        } else {
            Layout::left_to_right(Align::TOP).with_main_wrap(true)
        }
    }

    /// Non-wrapping row starting at the start side.
    fn row_layout(&self) -> Layout {
        if self.direction.is_rtl() {
            Layout::right_to_left(Align::TOP)
        } else {
            Layout::left_to_right(Align::TOP)
        }
    }

    fn start_align(&self) -> Align {
        if self.direction.is_rtl() {
            Align::RIGHT
        } else {
            Align::LEFT
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Block Rendering
// ─────────────────────────────────────────────────────────────────────────────

fn render_block(ui: &mut Ui, node: &MarkdownNode, ctx: &RenderContext) {
    match &node.node_type {
        MarkdownNodeType::Heading { level } => render_heading(ui, node, ctx, *level),
        MarkdownNodeType::Paragraph => {
            render_inline_content(ui, node, ctx, InlineStyle::new());
            ui.add_space(ctx.font_size * 0.5);
        }
        MarkdownNodeType::BlockQuote => render_blockquote(ui, node, ctx),
        MarkdownNodeType::List { list_type, tight } => {
            render_list(ui, node, ctx, list_type, *tight);
        }
        MarkdownNodeType::CodeBlock { language, literal } => {
            render_code_block(ui, ctx, language, literal);
        }
        MarkdownNodeType::HtmlBlock(html) => {
            ui.label(
                RichText::new(html.trim_end())
                    .font(FontId::monospace(ctx.font_size * 0.9))
                    .color(ctx.colors.quote_text),
            );
        }
        MarkdownNodeType::ThematicBreak => render_thematic_break(ui, ctx),
        MarkdownNodeType::Table { .. } => render_table(ui, node, ctx),
        MarkdownNodeType::FootnoteDefinition(name) => {
            ui.label(
                RichText::new(format!("[^{}]", name))
                    .size(ctx.font_size * 0.85)
                    .color(ctx.colors.quote_text),
            );
            for child in &node.children {
                render_block(ui, child, ctx);
            }
        }
        _ => {
            if node.children.is_empty() {
                return;
            }
            for child in &node.children {
                render_block(ui, child, ctx);
            }
        }
    }
}

fn render_heading(ui: &mut Ui, node: &MarkdownNode, ctx: &RenderContext, level: HeadingLevel) {
    let size = match level {
        HeadingLevel::H1 => ctx.font_size * 1.8,
        HeadingLevel::H2 => ctx.font_size * 1.5,
        HeadingLevel::H3 => ctx.font_size * 1.3,
        HeadingLevel::H4 => ctx.font_size * 1.15,
        HeadingLevel::H5 => ctx.font_size * 1.05,
        HeadingLevel::H6 => ctx.font_size,
    };
    let top_margin = match level {
        HeadingLevel::H1 => 8.0,
        HeadingLevel::H2 => 6.0,
        _ => 4.0,
    };

    ui.add_space(top_margin);
    let style = InlineStyle {
        size: Some(size),
        heading: true,
        ..InlineStyle::new()
    };
    render_inline_content(ui, node, ctx, style);
    if matches!(level, HeadingLevel::H1 | HeadingLevel::H2) {
        ui.separator();
    }
    ui.add_space(4.0);
}

fn render_blockquote(ui: &mut Ui, node: &MarkdownNode, ctx: &RenderContext) {
    ui.with_layout(ctx.row_layout(), |ui| {
        // Quote bar on the start side
        let (rect, _) =
            ui.allocate_exact_size(Vec2::new(4.0, ctx.font_size * 1.4), egui::Sense::hover());
        ui.painter().rect_filled(rect, 0.0, ctx.colors.quote_border);
        ui.add_space(8.0);

        let bar_rect = rect;
        let inner = ui.with_layout(ctx.block_layout(), |ui| {
            for child in &node.children {
                render_block(ui, child, ctx);
            }
        });

        // Stretch the bar over the full quote height
        let full = egui::Rect::from_min_max(
            egui::pos2(bar_rect.min.x, inner.response.rect.min.y),
            egui::pos2(bar_rect.max.x, inner.response.rect.max.y),
        );
        ui.painter().rect_filled(full, 0.0, ctx.colors.quote_border);
    });
}

fn render_list(
    ui: &mut Ui,
    node: &MarkdownNode,
    ctx: &RenderContext,
    list_type: &ListType,
    tight: bool,
) {
    let mut item_number = match list_type {
        ListType::Ordered { start, .. } => *start,
        ListType::Bullet => 0,
    };

    for item in &node.children {
        let marker = match (&item.node_type, list_type) {
            (MarkdownNodeType::TaskItem { checked }, _) => ListMarker::Task(*checked),
            (_, ListType::Ordered { delimiter, .. }) => {
                ListMarker::Text(format!("{}{}", item_number, delimiter))
            }
            (_, ListType::Bullet) => ListMarker::Text("\u{2022}".to_string()),
        };

        ui.with_layout(ctx.row_layout(), |ui| {
            ui.add_space(12.0);
            match marker {
                ListMarker::Task(checked) => {
                    let mut checked = checked;
                    ui.add_enabled(false, egui::Checkbox::without_text(&mut checked));
                }
                ListMarker::Text(text) => {
                    ui.label(
                        RichText::new(text)
                            .size(ctx.font_size)
                            .color(ctx.colors.list_marker),
                    );
                }
            }
            ui.add_space(4.0);
            ui.with_layout(ctx.block_layout(), |ui| {
                for child in &item.children {
                    render_block(ui, child, ctx);
                }
            });
        });

        if !tight {
            ui.add_space(ctx.font_size * 0.3);
        }
        item_number += 1;
    }

    ui.add_space(4.0);
}

enum ListMarker {
    Text(String),
    Task(bool),
}

fn render_code_block(ui: &mut Ui, ctx: &RenderContext, language: &str, literal: &str) {
    let job = highlight_code(
        literal.trim_end_matches('\n'),
        language,
        ctx.font_size * 0.9,
        ctx.colors.is_dark(),
    );

    egui::Frame::none()
        .fill(ctx.colors.code_bg)
        .rounding(4.0)
        .inner_margin(8.0)
        .show(ui, |ui| {
            // Code reads left-to-right whatever the document direction
            ui.with_layout(Layout::top_down(Align::LEFT), |ui| {
                ui.set_width(ui.available_width());
                ui.label(job);
            });
        });
    ui.add_space(6.0);
}

fn render_thematic_break(ui: &mut Ui, ctx: &RenderContext) {
    ui.add_space(4.0);
    let (rect, _) =
        ui.allocate_exact_size(Vec2::new(ui.available_width(), 1.0), egui::Sense::hover());
    ui.painter().rect_filled(rect, 0.0, ctx.colors.hr);
    ui.add_space(4.0);
}

fn render_table(ui: &mut Ui, node: &MarkdownNode, ctx: &RenderContext) {
    let grid_id = ui.id().with("table").with(node.start_line);

    egui::Grid::new(grid_id)
        .striped(true)
        .spacing(Vec2::new(16.0, 4.0))
        .show(ui, |ui| {
            for row in &node.children {
                let header = matches!(row.node_type, MarkdownNodeType::TableRow { header: true });
                let style = InlineStyle {
                    bold: header,
                    ..InlineStyle::new()
                };

                // Columns run from the start side
                let cells: Vec<&MarkdownNode> = if ctx.direction.is_rtl() {
                    row.children.iter().rev().collect()
                } else {
                    row.children.iter().collect()
                };
                for cell in cells {
                    render_inline_content(ui, cell, ctx, style);
                }
                ui.end_row();
            }
        });
    ui.add_space(6.0);
}

// ─────────────────────────────────────────────────────────────────────────────
// Inline Rendering
// ─────────────────────────────────────────────────────────────────────────────

/// Formatting accumulated from enclosing inline nodes.
#[derive(Debug, Clone, Copy, Default)]
struct InlineStyle {
    bold: bool,
    italic: bool,
    strikethrough: bool,
    superscript: bool,
    subscript: bool,
    heading: bool,
    /// Overrides the base font size
    size: Option<f32>,
}

impl InlineStyle {
    fn new() -> Self {
        Self::default()
    }

    fn apply(&self, text: &str, ctx: &RenderContext, color: Color32) -> RichText {
        let base = self.size.unwrap_or(ctx.font_size);
        let size = if self.superscript || self.subscript {
            base * 0.75
        } else {
            base
        };

        let mut rich = RichText::new(text).size(size).color(color);
        if self.bold || self.heading {
            rich = rich.strong();
        }
        if self.italic {
            rich = rich.italics();
        }
        if self.strikethrough {
            rich = rich.strikethrough();
        }
        if self.superscript {
            rich = rich.raised();
        }
        rich
    }

    fn text_color(&self, ctx: &RenderContext) -> Color32 {
        if self.heading {
            ctx.colors.heading
        } else {
            ctx.colors.text
        }
    }
}

/// Render the inline children of `node` as one wrapped run.
fn render_inline_content(ui: &mut Ui, node: &MarkdownNode, ctx: &RenderContext, style: InlineStyle) {
    ui.with_layout(ctx.inline_layout(), |ui| {
        ui.spacing_mut().item_spacing.x = 0.0;
        for child in &node.children {
            render_inline_node(ui, child, ctx, style);
        }
    });
}

fn render_inline_node(ui: &mut Ui, node: &MarkdownNode, ctx: &RenderContext, style: InlineStyle) {
    let render_children = |ui: &mut Ui, style: InlineStyle| {
        for child in &node.children {
            render_inline_node(ui, child, ctx, style);
        }
    };

    match &node.node_type {
        MarkdownNodeType::Text(text) => {
            if !text.is_empty() {
                ui.label(style.apply(text, ctx, style.text_color(ctx)));
            }
        }
        MarkdownNodeType::Strong => render_children(
            ui,
            InlineStyle {
                bold: true,
                ..style
            },
        ),
        MarkdownNodeType::Emphasis => render_children(
            ui,
            InlineStyle {
                italic: true,
                ..style
            },
        ),
        MarkdownNodeType::Strikethrough => render_children(
            ui,
            InlineStyle {
                strikethrough: true,
                ..style
            },
        ),
        MarkdownNodeType::Superscript => render_children(
            ui,
            InlineStyle {
                superscript: true,
                ..style
            },
        ),
        MarkdownNodeType::Subscript => render_children(
            ui,
            InlineStyle {
                subscript: true,
                ..style
            },
        ),
        MarkdownNodeType::Code(code) => {
            ui.label(
                RichText::new(code)
                    .color(ctx.colors.code_text)
                    .font(FontId::monospace(style.size.unwrap_or(ctx.font_size) * 0.9))
                    .background_color(ctx.colors.code_bg),
            );
        }
        MarkdownNodeType::Math { display, literal } => {
            let text = if *display {
                literal.trim().to_string()
            } else {
                literal.clone()
            };
            let label = RichText::new(text)
                .font(FontId::monospace(style.size.unwrap_or(ctx.font_size)))
                .italics()
                .color(ctx.colors.math);
            if *display {
                ui.end_row();
                ui.label(label);
                ui.end_row();
            } else {
                ui.label(label);
            }
        }
        MarkdownNodeType::Link { url, title } => {
            let text = node.text_content();
            let shown = if text.is_empty() { url.as_str() } else { &text };
            let response = ui.hyperlink_to(style.apply(shown, ctx, ctx.colors.link), url);
            if !title.is_empty() {
                response.on_hover_text(title);
            }
        }
        MarkdownNodeType::Image { url, .. } => {
            let alt = node.text_content();
            let shown = format!("🖼 {}", if alt.is_empty() { url.as_str() } else { &alt });
            ui.hyperlink_to(style.apply(&shown, ctx, ctx.colors.link), url)
                .on_hover_text(url);
        }
        MarkdownNodeType::FootnoteReference(name) => {
            ui.label(
                InlineStyle {
                    superscript: true,
                    ..style
                }
                .apply(&format!("[{}]", name), ctx, ctx.colors.link),
            );
        }
        MarkdownNodeType::HtmlInline(html) => {
            ui.label(
                RichText::new(html)
                    .font(FontId::monospace(ctx.font_size * 0.9))
                    .color(ctx.colors.quote_text),
            );
        }
        MarkdownNodeType::SoftBreak => {
            ui.label(style.apply(" ", ctx, style.text_color(ctx)));
        }
        MarkdownNodeType::LineBreak => {
            ui.end_row();
        }
        _ => render_children(ui, style),
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_cache_reparses_on_version_change() {
        let mut cache = PreviewCache::default();
        let first = cache.get(1, "# One").root.children.len();
        assert_eq!(first, 1);

        // Same version: cached parse is returned even if the text differs
        let cached = cache.get(1, "# One\n\nTwo").root.children.len();
        assert_eq!(cached, 1);

        let fresh = cache.get(2, "# One\n\nTwo").root.children.len();
        assert_eq!(fresh, 2);
    }

    #[test]
    fn test_inline_style_sizes() {
        let ctx = RenderContext {
            colors: PreviewColors::light(),
            font_size: 16.0,
            direction: Direction::Ltr,
        };
        let sup = InlineStyle {
            superscript: true,
            ..InlineStyle::new()
        };
        assert_eq!(sup.text_color(&ctx), ctx.colors.text);

        let heading = InlineStyle {
            heading: true,
            size: Some(24.0),
            ..InlineStyle::new()
        };
        assert_eq!(heading.text_color(&ctx), ctx.colors.heading);
    }

    #[test]
    fn test_layouts_follow_direction() {
        let rtl = RenderContext {
            colors: PreviewColors::dark(),
            font_size: 14.0,
            direction: Direction::Rtl,
        };
        assert_eq!(rtl.start_align(), Align::RIGHT);
        assert!(rtl.inline_layout().main_wrap);

        let ltr = RenderContext {
            direction: Direction::Ltr,
            ..rtl
        };
        assert_eq!(ltr.start_align(), Align::LEFT);
    }

    #[test]
    fn test_palette_darkness() {
        assert!(PreviewColors::dark().is_dark());
        assert!(!PreviewColors::light().is_dark());
    }
}

//! Text editor widget for Markpad
//!
//! This module implements the markdown editing surface using egui's TextEdit.
//! Besides plain editing it reports the current selection to the app (toolbar
//! commands read it) and restores the caret after a command rewrote the buffer.

use crate::config::Direction;
use crate::editor::{Document, Selection};
use crate::string_utils::char_len;
use eframe::egui::{self, Align, FontId, ScrollArea, TextEdit, Ui};
use eframe::egui::text::{CCursor, CCursorRange};
use log::debug;
use std::sync::Arc;

/// Result of showing the editor widget.
pub struct EditorOutput {
    /// Selection after this frame, in character offsets.
    pub selection: Selection,
}

/// A text editor widget bound to a [`Document`].
///
/// This widget wraps egui's TextEdit with additional functionality:
/// - Integration with the document's undo/redo stack
/// - Selection reporting for toolbar commands
/// - Caret restoration after programmatic inserts
/// - Right-aligned layout for right-to-left text
///
/// # Example
///
/// ```ignore
/// let output = EditorWidget::new(&mut document)
///     .font_size(settings.font_size)
///     .direction(settings.direction)
///     .show(ui);
/// state.selection = Some(output.selection);
/// ```
pub struct EditorWidget<'a> {
    /// The document being edited.
    document: &'a mut Document,
    /// Font size for the editor.
    font_size: f32,
    /// Whether word wrap is enabled.
    word_wrap: bool,
    /// Text direction, controls alignment.
    direction: Direction,
    /// ID for the editor (for state persistence).
    id: Option<egui::Id>,
}

impl<'a> EditorWidget<'a> {
    /// Create a new editor widget for the given document.
    pub fn new(document: &'a mut Document) -> Self {
        Self {
            document,
            font_size: 14.0,
            word_wrap: true,
            direction: Direction::default(),
            id: None,
        }
    }

    /// Set the font size for the editor.
    #[must_use]
    pub fn font_size(mut self, size: f32) -> Self {
        self.font_size = size;
        self
    }

    /// Set whether word wrap is enabled.
    #[must_use]
    pub fn word_wrap(mut self, wrap: bool) -> Self {
        self.word_wrap = wrap;
        self
    }

    /// Set the text direction.
    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Set a custom ID for the editor.
    #[must_use]
    pub fn id(mut self, id: egui::Id) -> Self {
        self.id = Some(id);
        self
    }

    /// Show the editor widget and return the output.
    pub fn show(self, ui: &mut Ui) -> EditorOutput {
        let id = self.id.unwrap_or_else(|| ui.id().with("markpad_editor"));

        // Store original content for change detection
        let original_content = self.document.content.clone();

        let font_size = self.font_size;
        let word_wrap = self.word_wrap;
        let halign = if self.direction.is_rtl() {
            Align::RIGHT
        } else {
            Align::LEFT
        };

        let mut layouter = move |ui: &Ui, text: &str, wrap_width: f32| -> Arc<egui::Galley> {
            let font_id = FontId::monospace(font_size);
            let mut layout_job = if word_wrap {
                egui::text::LayoutJob::simple(
                    text.to_owned(),
                    font_id,
                    ui.visuals().text_color(),
                    wrap_width,
                )
            } else {
                egui::text::LayoutJob::simple_singleline(
                    text.to_owned(),
                    font_id,
                    ui.visuals().text_color(),
                )
            };
            if word_wrap {
                layout_job.halign = halign;
            }
            ui.fonts(|f| f.layout_job(layout_job))
        };

        let document = self.document;

        let text_output = ScrollArea::vertical()
            .id_source(id.with("scroll"))
            .auto_shrink([false, false])
            .show(ui, |ui| {
                TextEdit::multiline(&mut document.content)
                    .id(id)
                    .frame(false)
                    .font(FontId::monospace(font_size))
                    .desired_width(f32::INFINITY)
                    .layouter(&mut layouter)
                    .show(ui)
            })
            .inner;

        let mut state = text_output.state;
        let response = text_output.response;

        // TextEdit modifies content directly, so the edit is recorded afterwards
        if document.content != original_content {
            document.record_edit(original_content);
            debug!("Editor content changed, recorded for undo");
        }

        // The galley above was laid out from the current buffer, so a caret
        // left by a toolbar command can be placed now.
        let selection = if let Some(pos) = document.take_pending_cursor() {
            let ccursor = CCursor::new(pos);
            state
                .cursor
                .set_char_range(Some(CCursorRange::one(ccursor)));
            state.store(ui.ctx(), response.id);
            response.request_focus();
            debug!("Restored caret to {}", pos);
            Selection::caret(pos)
        } else {
            let len = char_len(&document.content);
            state
                .cursor
                .char_range()
                .map(|range| {
                    Selection::new(
                        range.primary.index.min(len),
                        range.secondary.index.min(len),
                    )
                })
                .unwrap_or_else(|| Selection::caret(len))
        };

        EditorOutput { selection }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn run_frame(ctx: &egui::Context, document: &mut Document, id: egui::Id) -> EditorOutput {
        let mut output = None;
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                output = Some(EditorWidget::new(document).id(id).show(ui));
            });
        });
        output.unwrap()
    }

    #[test]
    fn test_pending_cursor_applied_after_layout() {
        let ctx = egui::Context::default();
        let id = egui::Id::new("test_editor");
        let mut doc = Document::new("hello world");

        run_frame(&ctx, &mut doc, id);
        assert!(doc.insert(Some(Selection::new(6, 11)), "**", "**"));
        assert_eq!(doc.pending_cursor(), Some(15));

        let output = run_frame(&ctx, &mut doc, id);
        assert_eq!(output.selection, Selection::caret(15));
        assert_eq!(doc.pending_cursor(), None);

        let stored = TextEdit::load_state(&ctx, id).unwrap();
        assert_eq!(
            stored.cursor.char_range(),
            Some(CCursorRange::one(CCursor::new(15)))
        );
    }

    #[test]
    fn test_typing_free_frame_keeps_history_clean() {
        let ctx = egui::Context::default();
        let id = egui::Id::new("test_editor");
        let mut doc = Document::new("unchanged");

        run_frame(&ctx, &mut doc, id);
        run_frame(&ctx, &mut doc, id);
        assert_eq!(doc.content, "unchanged");
        assert!(!doc.can_undo());
    }

    #[test]
    fn test_rtl_editor_renders() {
        let ctx = egui::Context::default();
        let mut doc = Document::new("# مرحبا");
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                let output = EditorWidget::new(&mut doc)
                    .direction(Direction::Rtl)
                    .font_size(16.0)
                    .show(ui);
                assert!(output.selection.end <= char_len("# مرحبا"));
            });
        });
    }
}

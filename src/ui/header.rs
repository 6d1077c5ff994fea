//! Header bar for Markpad
//!
//! Title, language/direction toggle, export buttons and the render-mode
//! switch.

use crate::config::{Direction, RenderMode};
use crate::export::ExportFormat;
use eframe::egui::{self, Layout, RichText, Ui};

/// Actions that can be triggered from the header bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderAction {
    /// Switch between ltr and rtl
    ToggleDirection,
    /// Export the document in the given format
    Export(ExportFormat),
    /// Show the given panes
    SetRenderMode(RenderMode),
}

/// Application title in the given direction's language.
pub fn app_title(direction: Direction) -> &'static str {
    direction.pick("Markdown Editor", "محرر Markdown")
}

/// Render the header bar and return any triggered action.
pub fn show_header(ui: &mut Ui, direction: Direction, render_mode: RenderMode) -> Option<HeaderAction> {
    let mut action = None;

    let (start, end) = if direction.is_rtl() {
        (
            Layout::right_to_left(egui::Align::Center),
            Layout::left_to_right(egui::Align::Center),
        )
    } else {
        (
            Layout::left_to_right(egui::Align::Center),
            Layout::right_to_left(egui::Align::Center),
        )
    };

    // Title on the start side, controls packed against the end side
    ui.with_layout(start, |ui| {
        ui.label(RichText::new(app_title(direction)).size(18.0).strong());

        ui.with_layout(end, |ui| {
            // Render mode switch
            for mode in RenderMode::all().iter().rev() {
                let selected = *mode == render_mode;
                if ui
                    .selectable_label(selected, RichText::new(mode.icon()).size(16.0))
                    .on_hover_text(mode.tooltip(direction))
                    .clicked()
                    && !selected
                {
                    action = Some(HeaderAction::SetRenderMode(*mode));
                }
            }

            ui.separator();

            for format in ExportFormat::all().iter().rev() {
                let shortcut = match format {
                    ExportFormat::Markdown => "Ctrl+S",
                    ExportFormat::Html => "Ctrl+Shift+E",
                };
                if ui
                    .button(format!("{} {}", format.icon(), format.label(direction)))
                    .on_hover_text(shortcut)
                    .clicked()
                {
                    action = Some(HeaderAction::Export(*format));
                }
            }

            ui.separator();

            if ui
                .button(format!("🌐 {}", direction.toggle_label()))
                .on_hover_text(direction.pick("Switch to Arabic (right-to-left)", "التبديل إلى الإنجليزية"))
                .clicked()
            {
                action = Some(HeaderAction::ToggleDirection);
            }
        });
    });

    action
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_title() {
        assert_eq!(app_title(Direction::Ltr), "Markdown Editor");
        assert_eq!(app_title(Direction::Rtl), "محرر Markdown");
    }

    #[test]
    fn test_header_renders_without_action() {
        let ctx = egui::Context::default();
        for direction in [Direction::Ltr, Direction::Rtl] {
            let _ = ctx.run(egui::RawInput::default(), |ctx| {
                egui::TopBottomPanel::top("header").show(ctx, |ui| {
                    assert!(show_header(ui, direction, RenderMode::Split).is_none());
                });
            });
        }
    }
}

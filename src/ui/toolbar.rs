//! Formatting toolbar for Markpad
//!
//! Icon buttons for every toolbar command, organized into the command
//! table's groups, plus undo/redo. The toolbar only reports what was
//! clicked; the app applies it after the editor has run this frame.

use crate::config::Direction;
use crate::editor::{commands_in, CommandAction, ToolbarCommand, ToolbarGroup};
use eframe::egui::{self, Color32, Layout, Response, RichText, Ui, Vec2};

/// Height of the toolbar in expanded state.
const TOOLBAR_HEIGHT_EXPANDED: f32 = 40.0;

/// Height of the toolbar in collapsed state.
const TOOLBAR_HEIGHT_COLLAPSED: f32 = 28.0;

/// Size of icon buttons.
const ICON_BUTTON_SIZE: Vec2 = Vec2::new(32.0, 28.0);

/// Actions that can be triggered from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ToolbarAction {
    /// A formatting, table or upload command
    Command(&'static ToolbarCommand),
    /// Undo last change
    Undo,
    /// Redo last undone change
    Redo,
    /// Toggle toolbar collapsed state
    ToggleCollapse,
}

/// What the toolbar needs to know about the app this frame.
#[derive(Debug, Clone, Copy)]
pub struct ToolbarState {
    pub direction: Direction,
    /// Whether an editing surface is mounted
    pub has_editor: bool,
    pub can_undo: bool,
    pub can_redo: bool,
    /// Whether an image upload is in flight
    pub uploading: bool,
}

/// Toolbar UI state and rendering.
#[derive(Debug, Clone, Default)]
pub struct Toolbar {
    /// Whether group labels are hidden.
    collapsed: bool,
}

impl Toolbar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Toggle the collapsed state.
    pub fn toggle_collapsed(&mut self) {
        self.collapsed = !self.collapsed;
    }

    /// Get the current toolbar height.
    pub fn height(&self) -> f32 {
        if self.collapsed {
            TOOLBAR_HEIGHT_COLLAPSED
        } else {
            TOOLBAR_HEIGHT_EXPANDED
        }
    }

    /// Render the toolbar and return any triggered action.
    pub fn show(&mut self, ui: &mut Ui, state: ToolbarState) -> Option<ToolbarAction> {
        let mut action: Option<ToolbarAction> = None;
        let is_dark = ui.visuals().dark_mode;
        let direction = state.direction;

        let toolbar_bg = if is_dark {
            Color32::from_rgb(40, 40, 40)
        } else {
            Color32::from_rgb(248, 248, 248)
        };
        let separator_color = if is_dark {
            Color32::from_rgb(70, 70, 70)
        } else {
            Color32::from_rgb(210, 210, 210)
        };
        let muted = ui.visuals().weak_text_color();

        ui.painter()
            .rect_filled(ui.available_rect_before_wrap(), 0.0, toolbar_bg);

        let layout = if direction.is_rtl() {
            Layout::right_to_left(egui::Align::Center).with_main_wrap(true)
        } else {
            Layout::left_to_right(egui::Align::Center).with_main_wrap(true)
        };

        ui.with_layout(layout, |ui| {
            ui.set_min_height(self.height());
            ui.spacing_mut().item_spacing.x = 2.0;

            let collapse_icon = match (self.collapsed, direction.is_rtl()) {
                (true, false) | (false, true) => "▶",
                (true, true) | (false, false) => "◀",
            };
            let collapse_tooltip = if self.collapsed {
                direction.pick("Expand toolbar", "توسيع الشريط")
            } else {
                direction.pick("Collapse toolbar", "طي الشريط")
            };
            if icon_button(ui, collapse_icon, collapse_tooltip, true, is_dark).clicked() {
                action = Some(ToolbarAction::ToggleCollapse);
            }

            ui.add_space(4.0);
            vertical_separator(ui, separator_color, self.height() - 8.0);
            ui.add_space(4.0);

            // Edit
            if icon_button(
                ui,
                "↩",
                &format!("{} (Ctrl+Z)", direction.pick("Undo", "تراجع")),
                state.can_undo,
                is_dark,
            )
            .clicked()
            {
                action = Some(ToolbarAction::Undo);
            }
            if icon_button(
                ui,
                "↪",
                &format!("{} (Ctrl+Y)", direction.pick("Redo", "إعادة")),
                state.can_redo,
                is_dark,
            )
            .clicked()
            {
                action = Some(ToolbarAction::Redo);
            }

            for group in ToolbarGroup::all() {
                ui.add_space(4.0);
                vertical_separator(ui, separator_color, self.height() - 8.0);
                ui.add_space(4.0);

                if !self.collapsed {
                    ui.label(RichText::new(group.label(direction)).size(10.0).color(muted));
                }

                for command in commands_in(*group) {
                    if command.action == CommandAction::UploadImage && state.uploading {
                        ui.add_sized(ICON_BUTTON_SIZE, egui::Spinner::new())
                            .on_hover_text(direction.pick("Uploading…", "جارٍ الرفع…"));
                        continue;
                    }

                    if icon_button(
                        ui,
                        command.icon,
                        &command.tooltip(direction),
                        state.has_editor,
                        is_dark,
                    )
                    .clicked()
                    {
                        action = Some(ToolbarAction::Command(command));
                    }
                }
            }
        });

        action
    }
}

/// Render an icon button with consistent styling.
fn icon_button(ui: &mut Ui, icon: &str, tooltip: &str, enabled: bool, is_dark: bool) -> Response {
    let text_color = if enabled {
        if is_dark {
            Color32::from_rgb(220, 220, 220)
        } else {
            Color32::from_rgb(50, 50, 50)
        }
    } else if is_dark {
        Color32::from_rgb(100, 100, 100)
    } else {
        Color32::from_rgb(160, 160, 160)
    };

    let hover_bg = if is_dark {
        Color32::from_rgb(60, 60, 60)
    } else {
        Color32::from_rgb(220, 220, 220)
    };

    // Invisible button as the clickable area, glyph painted on top
    let btn = ui.add_enabled(
        enabled,
        egui::Button::new(RichText::new(" ").size(16.0))
            .frame(false)
            .min_size(ICON_BUTTON_SIZE),
    );

    if btn.hovered() && enabled {
        ui.painter()
            .rect_filled(btn.rect, egui::Rounding::same(3.0), hover_bg);
    }

    ui.painter().text(
        btn.rect.center(),
        egui::Align2::CENTER_CENTER,
        icon,
        egui::FontId::proportional(15.0),
        text_color,
    );

    btn.on_hover_text(tooltip)
}

/// Draw a thin vertical line between groups.
fn vertical_separator(ui: &mut Ui, color: Color32, height: f32) {
    let (rect, _response) = ui.allocate_exact_size(Vec2::new(1.0, height), egui::Sense::hover());
    ui.painter().line_segment(
        [rect.center_top(), rect.center_bottom()],
        egui::Stroke::new(1.0, color),
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::command;

    #[test]
    fn test_toolbar_new() {
        let toolbar = Toolbar::new();
        assert!(!toolbar.collapsed);
    }

    #[test]
    fn test_toolbar_toggle_collapsed() {
        let mut toolbar = Toolbar::new();
        toolbar.toggle_collapsed();
        assert!(toolbar.collapsed);
        toolbar.toggle_collapsed();
        assert!(!toolbar.collapsed);
    }

    #[test]
    fn test_toolbar_height() {
        let mut toolbar = Toolbar::new();
        assert_eq!(toolbar.height(), TOOLBAR_HEIGHT_EXPANDED);
        toolbar.toggle_collapsed();
        assert_eq!(toolbar.height(), TOOLBAR_HEIGHT_COLLAPSED);
    }

    #[test]
    fn test_toolbar_action_equality() {
        let bold = command("bold").unwrap();
        assert_eq!(ToolbarAction::Command(bold), ToolbarAction::Command(bold));
        assert_ne!(ToolbarAction::Undo, ToolbarAction::Redo);
    }

    #[test]
    fn test_toolbar_renders_every_command() {
        let ctx = egui::Context::default();
        let mut toolbar = Toolbar::new();
        let state = ToolbarState {
            direction: Direction::Rtl,
            has_editor: true,
            can_undo: false,
            can_redo: false,
            uploading: true,
        };
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                assert!(toolbar.show(ui, state).is_none());
            });
        });
    }
}

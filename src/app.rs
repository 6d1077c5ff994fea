//! Main application module for Markpad
//!
//! This module contains the eframe App implementation: the header bar, the
//! formatting toolbar, the editor/preview panes and the glue that applies
//! commands, exports documents and inserts uploaded images.

use crate::config::{Direction, RenderMode, Settings, WindowSize};
use crate::editor::{CommandAction, EditorWidget, ToolbarCommand};
use crate::export::{export_html, export_markdown, write_artifact, ExportFormat};
use crate::files::{pick_image_dialog, save_export_dialog};
use crate::fonts;
use crate::markdown::MarkdownPreview;
use crate::state::AppState;
use crate::string_utils::char_len;
use crate::ui::{app_title, show_header, HeaderAction, Toolbar, ToolbarAction, ToolbarState};
use crate::upload::{HttpStorageClient, ImageUploader, UploadOutcome};
use eframe::egui::{self, Key, Modifiers};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// How often to repaint while waiting for an upload.
const UPLOAD_POLL_INTERVAL: Duration = Duration::from_millis(100);

// ─────────────────────────────────────────────────────────────────────────────
// Actions
// ─────────────────────────────────────────────────────────────────────────────

/// Everything the user can trigger in a frame, from any surface.
///
/// Actions are collected while the UI renders and applied afterwards, so
/// commands always see the selection the editor reported this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
enum AppAction {
    Command(&'static ToolbarCommand),
    Undo,
    Redo,
    Export(ExportFormat),
    SetRenderMode(RenderMode),
    CycleRenderMode,
    ToggleDirection,
    ToggleToolbar,
}

impl From<HeaderAction> for AppAction {
    fn from(action: HeaderAction) -> Self {
        match action {
            HeaderAction::ToggleDirection => AppAction::ToggleDirection,
            HeaderAction::Export(format) => AppAction::Export(format),
            HeaderAction::SetRenderMode(mode) => AppAction::SetRenderMode(mode),
        }
    }
}

impl From<ToolbarAction> for AppAction {
    fn from(action: ToolbarAction) -> Self {
        match action {
            ToolbarAction::Command(command) => AppAction::Command(command),
            ToolbarAction::Undo => AppAction::Undo,
            ToolbarAction::Redo => AppAction::Redo,
            ToolbarAction::ToggleCollapse => AppAction::ToggleToolbar,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Application
// ─────────────────────────────────────────────────────────────────────────────

/// The main application struct.
pub struct MarkpadApp {
    /// Application state
    state: AppState,
    /// Formatting toolbar
    toolbar: Toolbar,
    /// Image uploader; `None` when no storage is configured
    uploader: Option<ImageUploader>,
    /// Last known window size (for detecting changes)
    last_window_size: Option<egui::Vec2>,
    /// Last known window position (for detecting changes)
    last_window_pos: Option<egui::Pos2>,
    /// Title last sent to the viewport
    last_title: Option<&'static str>,
    /// Application start time for timing toast messages
    start_time: Instant,
}

impl MarkpadApp {
    /// Create a new MarkpadApp instance.
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        info!("Initializing Markpad");

        fonts::setup_fonts(&cc.egui_ctx);

        let state = AppState::new();

        let uploader = match HttpStorageClient::from_settings(&state.settings.storage) {
            Ok(client) => Some(ImageUploader::new(Arc::new(client))),
            Err(e) => {
                warn!("Image upload disabled: {}", e);
                None
            }
        };

        Self {
            state,
            toolbar: Toolbar::new(),
            uploader,
            last_window_size: None,
            last_window_pos: None,
            last_title: None,
            start_time: Instant::now(),
        }
    }

    /// Get elapsed time since app start in seconds.
    fn get_app_time(&self) -> f64 {
        self.start_time.elapsed().as_secs_f64()
    }

    fn is_uploading(&self) -> bool {
        self.uploader.as_ref().is_some_and(ImageUploader::is_busy)
    }

    /// Update window size in settings if changed.
    ///
    /// The new geometry is saved with the other settings on exit.
    fn update_window_state(&mut self, ctx: &egui::Context) {
        let Some(rect) = ctx.input(|i| i.viewport().outer_rect) else {
            return;
        };
        let current_size = rect.size();
        let current_pos = rect.min;

        let size_changed = self
            .last_window_size
            .map(|s| (s - current_size).length() > 1.0)
            .unwrap_or(true);
        let pos_changed = self
            .last_window_pos
            .map(|p| (p - current_pos).length() > 1.0)
            .unwrap_or(true);

        if size_changed || pos_changed {
            self.last_window_size = Some(current_size);
            self.last_window_pos = Some(current_pos);
            let maximized = ctx.input(|i| i.viewport().maximized.unwrap_or(false));

            self.state.settings.window_size = WindowSize {
                width: current_size.x,
                height: current_size.y,
                x: Some(current_pos.x),
                y: Some(current_pos.y),
                maximized,
            };
            debug!(
                "Window state updated: {}x{} at ({}, {}), maximized: {}",
                current_size.x, current_size.y, current_pos.x, current_pos.y, maximized
            );
        }
    }

    /// Keep the window title in the UI language.
    fn update_window_title(&mut self, ctx: &egui::Context) {
        let title = app_title(self.state.settings.direction);
        if self.last_title != Some(title) {
            ctx.send_viewport_cmd(egui::ViewportCommand::Title(title.to_string()));
            self.last_title = Some(title);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Keyboard Shortcuts
    // ─────────────────────────────────────────────────────────────────────────

    /// Consume global shortcuts before the editor sees them.
    ///
    /// Consuming Ctrl+Z/Ctrl+Y here keeps the text widget's own undo from
    /// running alongside the document history. More specific shortcuts are
    /// checked first, since extra Shift is ignored when matching.
    fn collect_keyboard_shortcuts(&mut self, ctx: &egui::Context) -> Vec<AppAction> {
        let ctrl = Modifiers::COMMAND;
        let ctrl_shift = Modifiers::COMMAND | Modifiers::SHIFT;

        ctx.input_mut(|i| {
            let mut actions = Vec::new();

            if i.consume_key(ctrl_shift, Key::Z) {
                debug!("Keyboard shortcut: Ctrl+Shift+Z (Redo)");
                actions.push(AppAction::Redo);
            } else if i.consume_key(ctrl, Key::Z) {
                debug!("Keyboard shortcut: Ctrl+Z (Undo)");
                actions.push(AppAction::Undo);
            }
            if i.consume_key(ctrl, Key::Y) {
                debug!("Keyboard shortcut: Ctrl+Y (Redo)");
                actions.push(AppAction::Redo);
            }

            if i.consume_key(ctrl_shift, Key::E) {
                debug!("Keyboard shortcut: Ctrl+Shift+E (Export HTML)");
                actions.push(AppAction::Export(ExportFormat::Html));
            } else if i.consume_key(ctrl, Key::E) {
                debug!("Keyboard shortcut: Ctrl+E (Cycle Render Mode)");
                actions.push(AppAction::CycleRenderMode);
            }
            if i.consume_key(ctrl, Key::S) {
                debug!("Keyboard shortcut: Ctrl+S (Export Markdown)");
                actions.push(AppAction::Export(ExportFormat::Markdown));
            }

            for key in [Key::B, Key::I, Key::K] {
                if let Some(command) = crate::editor::command_for_shortcut(key) {
                    if i.consume_key(ctrl, key) {
                        debug!("Keyboard shortcut: Ctrl+{} ({})", key.name(), command.id);
                        actions.push(AppAction::Command(command));
                    }
                }
            }

            actions
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Rendering
    // ─────────────────────────────────────────────────────────────────────────

    /// Render the main UI and return the actions triggered this frame.
    fn render_ui(&mut self, ctx: &egui::Context) -> Vec<AppAction> {
        let mut actions = Vec::new();
        let direction = self.state.settings.direction;
        let render_mode = self.state.settings.render_mode;

        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(4.0);
            if let Some(action) = show_header(ui, direction, render_mode) {
                actions.push(action.into());
            }
            ui.add_space(4.0);
        });

        let toolbar_state = ToolbarState {
            direction,
            has_editor: render_mode.shows_editor(),
            can_undo: self.state.document.can_undo(),
            can_redo: self.state.document.can_redo(),
            uploading: self.is_uploading(),
        };
        egui::TopBottomPanel::top("toolbar")
            .frame(egui::Frame::none())
            .show(ctx, |ui| {
                if let Some(action) = self.toolbar.show(ui, toolbar_state) {
                    actions.push(action.into());
                }
            });

        egui::TopBottomPanel::bottom("status_bar").show(ctx, |ui| {
            self.show_status_bar(ui);
        });

        if render_mode.shows_editor() && render_mode.shows_preview() {
            let screen_width = ctx.screen_rect().width();
            let panel = if direction.is_rtl() {
                egui::SidePanel::right("editor_panel")
            } else {
                egui::SidePanel::left("editor_panel")
            };
            let max_width = (screen_width - 200.0).max(200.0);
            let response = panel
                .resizable(true)
                .default_width(screen_width * self.state.settings.split_ratio)
                .width_range(200.0..=max_width)
                .show(ctx, |ui| self.show_editor(ui));

            if screen_width > 0.0 {
                let ratio = (response.response.rect.width() / screen_width)
                    .clamp(Settings::MIN_SPLIT_RATIO, Settings::MAX_SPLIT_RATIO);
                self.state.settings.split_ratio = ratio;
            }

            egui::CentralPanel::default().show(ctx, |ui| self.show_preview(ui));
        } else if render_mode.shows_editor() {
            egui::CentralPanel::default().show(ctx, |ui| self.show_editor(ui));
        } else {
            egui::CentralPanel::default().show(ctx, |ui| self.show_preview(ui));
        }

        actions
    }

    /// Show the editor and record the selection it reports.
    fn show_editor(&mut self, ui: &mut egui::Ui) {
        let settings = &self.state.settings;
        let output = EditorWidget::new(&mut self.state.document)
            .font_size(settings.font_size)
            .word_wrap(settings.word_wrap)
            .direction(settings.direction)
            .id(egui::Id::new("markpad_editor"))
            .show(ui);
        self.state.selection = Some(output.selection);
    }

    /// Show the rendered preview of the current buffer.
    fn show_preview(&mut self, ui: &mut egui::Ui) {
        let font_size = self.state.settings.font_size;
        let direction = self.state.settings.direction;
        let version = self.state.document.content_version();
        let document = self
            .state
            .preview_cache
            .get(version, &self.state.document.content);
        MarkdownPreview::new(document)
            .font_size(font_size)
            .direction(direction)
            .id(egui::Id::new("markpad_preview"))
            .show(ui);
    }

    fn show_status_bar(&self, ui: &mut egui::Ui) {
        let direction = self.state.settings.direction;
        let layout = if direction.is_rtl() {
            egui::Layout::right_to_left(egui::Align::Center)
        } else {
            egui::Layout::left_to_right(egui::Align::Center)
        };

        ui.with_layout(layout, |ui| {
            let chars = char_len(&self.state.document.content);
            ui.label(
                egui::RichText::new(format!(
                    "{} {}",
                    chars,
                    direction.pick("characters", "حرف")
                ))
                .small(),
            );

            ui.separator();
            ui.label(
                egui::RichText::new(undo_steps_label(
                    direction,
                    self.state.document.undo_count(),
                ))
                .small(),
            );

            if self.is_uploading() {
                ui.separator();
                ui.spinner();
                ui.label(egui::RichText::new(direction.pick("Uploading image…", "جارٍ رفع الصورة…")).small());
            }

            if let Some(toast) = &self.state.ui.toast_message {
                ui.separator();
                ui.label(egui::RichText::new(toast).italics());
            }
        });
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Action Handling
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply everything collected this frame against the reported selection.
    ///
    /// A finished upload goes in first, at the selection the user had when
    /// the frame was drawn. Each edit moves the selection along with its
    /// text, so the actions after it still land where they were aimed.
    fn apply_frame(&mut self, upload: Option<UploadOutcome>, actions: Vec<AppAction>) {
        if let Some(outcome) = upload {
            self.handle_upload_outcome(outcome);
        }
        for action in actions {
            debug!("Applying deferred action: {:?}", action);
            self.handle_action(action);
        }
    }

    fn handle_action(&mut self, action: AppAction) {
        let time = self.get_app_time();
        match action {
            AppAction::Command(command) => match command.action {
                CommandAction::UploadImage => self.handle_upload_image(),
                CommandAction::Wrap { .. } | CommandAction::Table => {
                    self.state.apply_command(command);
                }
            },
            AppAction::Undo => self.state.undo(time),
            AppAction::Redo => self.state.redo(time),
            AppAction::Export(format) => self.handle_export(format),
            AppAction::SetRenderMode(mode) => self.state.set_render_mode(mode),
            AppAction::CycleRenderMode => self.state.cycle_render_mode(),
            AppAction::ToggleDirection => {
                self.state.toggle_direction();
            }
            AppAction::ToggleToolbar => self.toolbar.toggle_collapsed(),
        }
    }

    /// Export the document through a save dialog.
    fn handle_export(&mut self, format: ExportFormat) {
        let direction = self.state.settings.direction;
        let artifact = match format {
            ExportFormat::Markdown => export_markdown(&self.state.document),
            ExportFormat::Html => export_html(&self.state.document, direction),
        };

        let initial_dir = self.state.settings.last_export_directory.clone();
        let Some(path) = save_export_dialog(format, initial_dir.as_deref(), direction) else {
            debug!("Export cancelled");
            return;
        };

        let time = self.get_app_time();
        match write_artifact(&artifact, &path) {
            Ok(()) => {
                self.state.remember_export_directory(&path);
                self.state.show_toast(
                    format!(
                        "{} {}",
                        direction.pick("Exported to", "تم التصدير إلى"),
                        path.display()
                    ),
                    time,
                    2.5,
                );

                if self.state.settings.open_after_export {
                    if let Err(e) = open::that(&path) {
                        warn!("Failed to open exported file: {}", e);
                    }
                }
            }
            Err(e) => {
                warn!("Export failed: {}", e);
                self.state.show_toast(
                    format!("{}: {}", direction.pick("Export failed", "فشل التصدير"), e),
                    time,
                    4.0,
                );
            }
        }
    }

    /// Pick an image and start uploading it.
    fn handle_upload_image(&mut self) {
        let time = self.get_app_time();
        let direction = self.state.settings.direction;

        let Some(uploader) = self.uploader.as_mut() else {
            self.state.show_toast(
                direction.pick(
                    "Image storage is not configured",
                    "لم يتم إعداد تخزين الصور",
                ),
                time,
                3.0,
            );
            return;
        };
        if uploader.is_busy() {
            debug!("Upload button ignored: an upload is pending");
            return;
        }

        let initial_dir = self.state.settings.last_image_directory.clone();
        let Some(path) = pick_image_dialog(initial_dir.as_deref(), direction) else {
            debug!("Image pick cancelled");
            return;
        };

        self.state.remember_image_directory(&path);
        uploader.start(&path);
    }

    /// Take a finished upload, if any, and keep repainting while one runs.
    fn poll_upload(&mut self, ctx: &egui::Context) -> Option<UploadOutcome> {
        let uploader = self.uploader.as_mut()?;
        let outcome = uploader.poll();
        if outcome.is_none() && uploader.is_busy() {
            ctx.request_repaint_after(UPLOAD_POLL_INTERVAL);
        }
        outcome
    }

    /// Insert a finished upload into the document, or report its failure.
    fn handle_upload_outcome(&mut self, outcome: UploadOutcome) {
        let time = self.get_app_time();
        let direction = self.state.settings.direction;
        let file_name = outcome.file_name.clone();
        match self.state.apply_upload(outcome) {
            Ok(true) => info!("Inserted uploaded image {}", file_name),
            Ok(false) => {
                self.state.show_toast(
                    direction.pick(
                        "Image uploaded, but no editor is open to insert it",
                        "تم رفع الصورة، لكن المحرر غير مفتوح لإدراجها",
                    ),
                    time,
                    3.0,
                );
            }
            Err(e) => {
                warn!("Image upload did not complete: {}", e);
                self.state.show_toast(
                    direction.pick("Upload did not complete", "لم يكتمل رفع الصورة"),
                    time,
                    3.0,
                );
            }
        }
    }
}

/// Status bar text for the undo history depth.
fn undo_steps_label(direction: Direction, count: usize) -> String {
    format!("{} {}", direction.pick("Undo steps:", "خطوات التراجع:"), count)
}

impl eframe::App for MarkpadApp {
    /// Called each time the UI needs repainting.
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let current_time = self.get_app_time();
        self.state.update_toast(current_time);

        self.update_window_title(ctx);
        self.update_window_state(ctx);

        let mut actions = self.collect_keyboard_shortcuts(ctx);

        // The editor sets this again if it is rendered this frame
        self.state.selection = None;
        actions.extend(self.render_ui(ctx));

        let upload = self.poll_upload(ctx);
        self.apply_frame(upload, actions);

        if let Some(expires_at) = self.state.ui.toast_expires_at {
            ctx.request_repaint_after(Duration::from_secs_f64(
                (expires_at - current_time).max(0.0),
            ));
        }

        self.state.save_settings_if_dirty();
    }

    /// Called when the application is about to close.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        info!("Application exiting");
        self.state.shutdown();
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::{command, Document, Selection};

    fn test_app(content: &str) -> MarkpadApp {
        let mut state = AppState::with_settings(Settings::default());
        state.document = Document::new(content);
        MarkpadApp {
            state,
            toolbar: Toolbar::new(),
            uploader: None,
            last_window_size: None,
            last_window_pos: None,
            last_title: None,
            start_time: Instant::now(),
        }
    }

    #[test]
    fn test_header_actions_convert() {
        assert_eq!(
            AppAction::from(HeaderAction::ToggleDirection),
            AppAction::ToggleDirection
        );
        assert_eq!(
            AppAction::from(HeaderAction::Export(ExportFormat::Html)),
            AppAction::Export(ExportFormat::Html)
        );
        assert_eq!(
            AppAction::from(HeaderAction::SetRenderMode(RenderMode::Preview)),
            AppAction::SetRenderMode(RenderMode::Preview)
        );
    }

    #[test]
    fn test_toolbar_actions_convert() {
        let bold = command("bold").unwrap();
        assert_eq!(
            AppAction::from(ToolbarAction::Command(bold)),
            AppAction::Command(bold)
        );
        assert_eq!(AppAction::from(ToolbarAction::Undo), AppAction::Undo);
        assert_eq!(
            AppAction::from(ToolbarAction::ToggleCollapse),
            AppAction::ToggleToolbar
        );
    }

    #[test]
    fn test_title_follows_direction() {
        assert_ne!(app_title(Direction::Ltr), app_title(Direction::Rtl));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Frame Application Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_upload_and_command_in_same_frame() {
        let mut app = test_app("hello world");
        app.state.selection = Some(Selection::new(6, 11));

        let upload = UploadOutcome {
            file_name: "cat.png".to_string(),
            result: Ok("https://cdn.example/1-2.png".to_string()),
        };
        app.apply_frame(Some(upload), vec![AppAction::Command(command("bold").unwrap())]);

        assert_eq!(
            app.state.document.content,
            "hello ![cat.png](https://cdn.example/1-2.png)**world**"
        );
        assert_eq!(app.state.document.undo_count(), 2);
    }

    #[test]
    fn test_upload_without_editor_shows_toast() {
        let mut app = test_app("text");
        app.state.selection = None;

        let upload = UploadOutcome {
            file_name: "cat.png".to_string(),
            result: Ok("https://cdn.example/1-2.png".to_string()),
        };
        app.apply_frame(Some(upload), Vec::new());

        assert_eq!(app.state.document.content, "text");
        assert!(app.state.ui.toast_message.is_some());
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Status Bar Tests
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_undo_steps_label() {
        assert_eq!(undo_steps_label(Direction::Ltr, 3), "Undo steps: 3");
        assert_eq!(undo_steps_label(Direction::Rtl, 0), "خطوات التراجع: 0");
    }

    #[test]
    fn test_status_bar_renders() {
        let mut app = test_app("abc");
        app.state.selection = Some(Selection::caret(3));
        app.state.apply_command(command("bold").unwrap());
        app.state.show_toast("Saved", 0.0, 5.0);

        let ctx = egui::Context::default();
        let _ = ctx.run(egui::RawInput::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| app.show_status_bar(ui));
        });
        assert_eq!(app.state.document.undo_count(), 1);
    }
}

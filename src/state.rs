//! Application state management for Markpad
//!
//! This module defines the central `AppState` struct that owns the document,
//! the user settings, the selection reported by the editor and transient UI
//! state such as toasts.

use crate::config::{load_config, save_config_silent, Direction, RenderMode, Settings};
use crate::editor::{CommandAction, Document, Selection, ToolbarCommand, TABLE_TEMPLATE};
use crate::error::Result;
use crate::markdown::PreviewCache;
use crate::string_utils::char_len;
use crate::upload::UploadOutcome;
use log::{debug, info, warn};
use std::path::Path;

// ─────────────────────────────────────────────────────────────────────────────
// UI State
// ─────────────────────────────────────────────────────────────────────────────

/// UI-related state flags.
#[derive(Debug, Clone, Default)]
pub struct UiState {
    /// Temporary toast message (shown in the status bar)
    pub toast_message: Option<String>,
    /// When the toast message should expire (as seconds since app start)
    pub toast_expires_at: Option<f64>,
}

// ─────────────────────────────────────────────────────────────────────────────
// Application State
// ─────────────────────────────────────────────────────────────────────────────

/// Central application state struct.
///
/// All of it lives on the UI thread. The upload worker never touches it.
#[derive(Debug)]
pub struct AppState {
    /// The markdown buffer
    pub document: Document,
    /// User settings (loaded from config)
    pub settings: Settings,
    /// UI-related state
    pub ui: UiState,
    /// Selection reported by the editor this frame.
    ///
    /// `None` while no editing surface is mounted (preview-only mode).
    pub selection: Option<Selection>,
    /// Parsed document for the preview pane
    pub preview_cache: PreviewCache,
    /// Whether settings have been modified and need saving
    settings_dirty: bool,
}

impl AppState {
    /// Create a new AppState with settings loaded from config.
    pub fn new() -> Self {
        let settings = load_config();
        info!("AppState initialized with settings");
        debug!(
            "Render mode: {:?}, direction: {:?}",
            settings.render_mode, settings.direction
        );
        Self::with_settings(settings)
    }

    /// Create a state around the given settings and the welcome document.
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            document: Document::welcome(),
            settings,
            ui: UiState::default(),
            selection: None,
            preview_cache: PreviewCache::default(),
            settings_dirty: false,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Editing
    // ─────────────────────────────────────────────────────────────────────────

    /// Apply a toolbar command at the current selection.
    ///
    /// Returns `true` if the document changed. The selection moves right
    /// with the text it covered, so a later edit in the same frame still
    /// lands on it. Image upload is not an edit and is started by the app
    /// instead, so it returns `false` here.
    pub fn apply_command(&mut self, command: &ToolbarCommand) -> bool {
        let (changed, inserted_before) = match command.action {
            CommandAction::Wrap { before, after } => (
                self.document.insert(self.selection, before, after),
                char_len(before),
            ),
            CommandAction::Table => (
                self.document.insert_table(self.selection),
                char_len(TABLE_TEMPLATE),
            ),
            CommandAction::UploadImage => (false, 0),
        };
        if changed {
            self.selection = self.selection.map(|s| s.shifted(inserted_before));
            debug!("Applied toolbar command '{}'", command.id);
        }
        changed
    }

    /// Insert a finished upload at the current selection.
    ///
    /// Returns `Ok(false)` when no editor is mounted to receive it.
    pub fn apply_upload(&mut self, outcome: UploadOutcome) -> Result<bool> {
        outcome.apply(&mut self.document, &mut self.selection)
    }

    /// Undo the last edit.
    pub fn undo(&mut self, current_time: f64) {
        if self.document.undo() {
            debug!("Undo performed");
        } else {
            let msg = self.settings.direction.pick("Nothing to undo", "لا يوجد ما يمكن التراجع عنه");
            self.show_toast(msg, current_time, 1.5);
        }
    }

    /// Redo the last undone edit.
    pub fn redo(&mut self, current_time: f64) {
        if self.document.redo() {
            debug!("Redo performed");
        } else {
            let msg = self.settings.direction.pick("Nothing to redo", "لا يوجد ما يمكن إعادته");
            self.show_toast(msg, current_time, 1.5);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // View State
    // ─────────────────────────────────────────────────────────────────────────

    /// Show the given panes.
    pub fn set_render_mode(&mut self, mode: RenderMode) {
        if self.settings.render_mode != mode {
            info!("Render mode: {:?} -> {:?}", self.settings.render_mode, mode);
            self.update_settings(|s| s.render_mode = mode);
        }
    }

    /// Cycle Split -> Editor -> Preview.
    pub fn cycle_render_mode(&mut self) {
        let next = self.settings.render_mode.next();
        self.set_render_mode(next);
    }

    /// Flip the text direction (and UI language).
    pub fn toggle_direction(&mut self) -> Direction {
        let direction = self.settings.direction.toggle();
        info!("Direction: {:?}", direction);
        self.update_settings(|s| s.direction = direction);
        direction
    }

    /// Remember the folder an export was written to.
    pub fn remember_export_directory(&mut self, exported: &Path) {
        if let Some(dir) = exported.parent() {
            let dir = dir.to_path_buf();
            if self.settings.last_export_directory.as_ref() != Some(&dir) {
                self.update_settings(|s| s.last_export_directory = Some(dir));
            }
        }
    }

    /// Remember the folder an image was picked from.
    pub fn remember_image_directory(&mut self, picked: &Path) {
        if let Some(dir) = picked.parent() {
            let dir = dir.to_path_buf();
            if self.settings.last_image_directory.as_ref() != Some(&dir) {
                self.update_settings(|s| s.last_image_directory = Some(dir));
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Settings Management
    // ─────────────────────────────────────────────────────────────────────────

    /// Update settings and mark as dirty.
    pub fn update_settings<F>(&mut self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        f(&mut self.settings);
        self.settings_dirty = true;
    }

    /// Save settings to config file if modified.
    ///
    /// Returns `true` if settings were saved.
    pub fn save_settings_if_dirty(&mut self) -> bool {
        if self.settings_dirty {
            if save_config_silent(&self.settings) {
                self.settings_dirty = false;
                info!("Settings saved");
                return true;
            }
            warn!("Failed to save settings");
        }
        false
    }

    /// Save settings on exit.
    pub fn shutdown(&mut self) {
        info!("Shutting down, saving settings");
        self.settings_dirty = true;
        self.save_settings_if_dirty();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Toasts
    // ─────────────────────────────────────────────────────────────────────────

    /// Show a temporary toast message (disappears after duration).
    ///
    /// `current_time` should be the current app time in seconds.
    /// `duration` is how long to show the message in seconds.
    pub fn show_toast(&mut self, message: impl Into<String>, current_time: f64, duration: f64) {
        self.ui.toast_message = Some(message.into());
        self.ui.toast_expires_at = Some(current_time + duration);
    }

    /// Update toast state - clears expired toasts.
    ///
    /// Call this each frame with the current time.
    pub fn update_toast(&mut self, current_time: f64) {
        if let Some(expires_at) = self.ui.toast_expires_at {
            if current_time >= expires_at {
                self.ui.toast_message = None;
                self.ui.toast_expires_at = None;
            }
        }
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

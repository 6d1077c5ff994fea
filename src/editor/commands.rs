//! Toolbar command table
//!
//! Every formatting button is a stateless descriptor: the markers to splice
//! around the selection, its labels in both UI languages, the group it is
//! shown in and an optional Ctrl shortcut.
//!
//! # Usage
//! ```ignore
//! use crate::editor::commands::{command, CommandAction};
//!
//! let bold = command("bold").unwrap();
//! if let CommandAction::Wrap { before, after } = bold.action {
//!     document.insert(selection, before, after);
//! }
//! ```

use crate::config::Direction;
use eframe::egui::Key;

// ─────────────────────────────────────────────────────────────────────────────
// Groups
// ─────────────────────────────────────────────────────────────────────────────

/// Toolbar groups, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarGroup {
    Text,
    Headings,
    Format,
    Lists,
    Blocks,
    Media,
}

impl ToolbarGroup {
    /// Group label in the given direction's language.
    pub fn label(&self, direction: Direction) -> &'static str {
        match self {
            ToolbarGroup::Text => direction.pick("Text", "نص"),
            ToolbarGroup::Headings => direction.pick("Headings", "عناوين"),
            ToolbarGroup::Format => direction.pick("Format", "تنسيق"),
            ToolbarGroup::Lists => direction.pick("Lists", "قوائم"),
            ToolbarGroup::Blocks => direction.pick("Blocks", "كتل"),
            ToolbarGroup::Media => direction.pick("Media", "وسائط"),
        }
    }

    /// All groups in toolbar order.
    pub fn all() -> &'static [ToolbarGroup] {
        &[
            ToolbarGroup::Text,
            ToolbarGroup::Headings,
            ToolbarGroup::Format,
            ToolbarGroup::Lists,
            ToolbarGroup::Blocks,
            ToolbarGroup::Media,
        ]
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Commands
// ─────────────────────────────────────────────────────────────────────────────

/// What a toolbar command does when triggered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandAction {
    /// Splice `before`/`after` around the selection
    Wrap {
        before: &'static str,
        after: &'static str,
    },
    /// Insert the table skeleton
    Table,
    /// Pick an image and upload it
    UploadImage,
}

/// A toolbar button descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarCommand {
    /// Stable identifier
    pub id: &'static str,
    pub group: ToolbarGroup,
    pub label_en: &'static str,
    pub label_ar: &'static str,
    /// Short glyph drawn on the button
    pub icon: &'static str,
    pub action: CommandAction,
    /// Triggered by Ctrl + this key
    pub shortcut: Option<Key>,
}

impl ToolbarCommand {
    /// Label in the given direction's language.
    pub fn label(&self, direction: Direction) -> &'static str {
        direction.pick(self.label_en, self.label_ar)
    }

    /// Hover text, with the shortcut appended when there is one.
    pub fn tooltip(&self, direction: Direction) -> String {
        match self.shortcut {
            Some(key) => format!("{} (Ctrl+{})", self.label(direction), key.name()),
            None => self.label(direction).to_string(),
        }
    }
}

const fn wrap(before: &'static str, after: &'static str) -> CommandAction {
    CommandAction::Wrap { before, after }
}

/// Every toolbar command, in display order.
pub static TOOLBAR_COMMANDS: &[ToolbarCommand] = &[
    // Text
    ToolbarCommand {
        id: "normal",
        group: ToolbarGroup::Text,
        label_en: "Normal Text",
        label_ar: "نص عادي",
        icon: "¶",
        action: wrap("# ", "\n"),
        shortcut: None,
    },
    // Headings
    ToolbarCommand {
        id: "h1",
        group: ToolbarGroup::Headings,
        label_en: "Heading 1",
        label_ar: "عنوان 1",
        icon: "H1",
        action: wrap("# ", "\n"),
        shortcut: None,
    },
    ToolbarCommand {
        id: "h2",
        group: ToolbarGroup::Headings,
        label_en: "Heading 2",
        label_ar: "عنوان 2",
        icon: "H2",
        action: wrap("## ", "\n"),
        shortcut: None,
    },
    ToolbarCommand {
        id: "h3",
        group: ToolbarGroup::Headings,
        label_en: "Heading 3",
        label_ar: "عنوان 3",
        icon: "H3",
        action: wrap("### ", "\n"),
        shortcut: None,
    },
    // Format
    ToolbarCommand {
        id: "bold",
        group: ToolbarGroup::Format,
        label_en: "Bold",
        label_ar: "غامق",
        icon: "B",
        action: wrap("**", "**"),
        shortcut: Some(Key::B),
    },
    ToolbarCommand {
        id: "italic",
        group: ToolbarGroup::Format,
        label_en: "Italic",
        label_ar: "مائل",
        icon: "I",
        action: wrap("*", "*"),
        shortcut: Some(Key::I),
    },
    ToolbarCommand {
        id: "strikethrough",
        group: ToolbarGroup::Format,
        label_en: "Strikethrough",
        label_ar: "يتوسطه خط",
        icon: "S̶",
        action: wrap("~~", "~~"),
        shortcut: None,
    },
    ToolbarCommand {
        id: "superscript",
        group: ToolbarGroup::Format,
        label_en: "Superscript",
        label_ar: "نص مرتفع",
        icon: "x²",
        action: wrap("^", "^"),
        shortcut: None,
    },
    ToolbarCommand {
        id: "subscript",
        group: ToolbarGroup::Format,
        label_en: "Subscript",
        label_ar: "نص منخفض",
        icon: "x₂",
        action: wrap("~", "~"),
        shortcut: None,
    },
    // Lists
    ToolbarCommand {
        id: "numbered_list",
        group: ToolbarGroup::Lists,
        label_en: "Numbered List",
        label_ar: "قائمة مرقمة",
        icon: "1.",
        action: wrap("1. ", ""),
        shortcut: None,
    },
    ToolbarCommand {
        id: "bullet_list",
        group: ToolbarGroup::Lists,
        label_en: "Bullet List",
        label_ar: "قائمة نقطية",
        icon: "\u{2022}",
        action: wrap("- ", ""),
        shortcut: None,
    },
    ToolbarCommand {
        id: "task_list",
        group: ToolbarGroup::Lists,
        label_en: "Task List",
        label_ar: "قائمة مهام",
        icon: "☑",
        action: wrap("- [ ] ", ""),
        shortcut: None,
    },
    // Blocks
    ToolbarCommand {
        id: "quote",
        group: ToolbarGroup::Blocks,
        label_en: "Quote",
        label_ar: "اقتباس",
        icon: "\u{275D}",
        action: wrap("> ", ""),
        shortcut: None,
    },
    ToolbarCommand {
        id: "code_block",
        group: ToolbarGroup::Blocks,
        label_en: "Code Block",
        label_ar: "كتلة برمجية",
        icon: "{ }",
        action: wrap("```\n", "\n```"),
        shortcut: None,
    },
    ToolbarCommand {
        id: "horizontal_rule",
        group: ToolbarGroup::Blocks,
        label_en: "Horizontal Rule",
        label_ar: "خط أفقي",
        icon: "―",
        action: wrap("\n---\n", ""),
        shortcut: None,
    },
    ToolbarCommand {
        id: "table",
        group: ToolbarGroup::Blocks,
        label_en: "Table",
        label_ar: "جدول",
        icon: "▦",
        action: CommandAction::Table,
        shortcut: None,
    },
    // Media
    ToolbarCommand {
        id: "link",
        group: ToolbarGroup::Media,
        label_en: "Link",
        label_ar: "رابط",
        icon: "🔗",
        action: wrap("[", "](url)"),
        shortcut: Some(Key::K),
    },
    ToolbarCommand {
        id: "upload_image",
        group: ToolbarGroup::Media,
        label_en: "Upload Image",
        label_ar: "رفع صورة",
        icon: "🖼",
        action: CommandAction::UploadImage,
        shortcut: None,
    },
];

/// Look up a command by id.
pub fn command(id: &str) -> Option<&'static ToolbarCommand> {
    TOOLBAR_COMMANDS.iter().find(|c| c.id == id)
}

/// Commands belonging to `group`, in display order.
pub fn commands_in(group: ToolbarGroup) -> impl Iterator<Item = &'static ToolbarCommand> {
    TOOLBAR_COMMANDS.iter().filter(move |c| c.group == group)
}

/// The command bound to Ctrl + `key`, if any.
pub fn command_for_shortcut(key: Key) -> Option<&'static ToolbarCommand> {
    TOOLBAR_COMMANDS.iter().find(|c| c.shortcut == Some(key))
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn markers(id: &str) -> (&'static str, &'static str) {
        match command(id).map(|c| c.action) {
            Some(CommandAction::Wrap { before, after }) => (before, after),
            other => panic!("{} is not a wrap command: {:?}", id, other),
        }
    }

    #[test]
    fn test_command_markers() {
        assert_eq!(markers("normal"), ("# ", "\n"));
        assert_eq!(markers("h1"), ("# ", "\n"));
        assert_eq!(markers("h2"), ("## ", "\n"));
        assert_eq!(markers("h3"), ("### ", "\n"));
        assert_eq!(markers("bold"), ("**", "**"));
        assert_eq!(markers("italic"), ("*", "*"));
        assert_eq!(markers("strikethrough"), ("~~", "~~"));
        assert_eq!(markers("superscript"), ("^", "^"));
        assert_eq!(markers("subscript"), ("~", "~"));
        assert_eq!(markers("numbered_list"), ("1. ", ""));
        assert_eq!(markers("bullet_list"), ("- ", ""));
        assert_eq!(markers("task_list"), ("- [ ] ", ""));
        assert_eq!(markers("quote"), ("> ", ""));
        assert_eq!(markers("code_block"), ("```\n", "\n```"));
        assert_eq!(markers("horizontal_rule"), ("\n---\n", ""));
        assert_eq!(markers("link"), ("[", "](url)"));
    }

    #[test]
    fn test_special_actions() {
        assert_eq!(command("table").map(|c| c.action), Some(CommandAction::Table));
        assert_eq!(
            command("upload_image").map(|c| c.action),
            Some(CommandAction::UploadImage)
        );
        assert!(command("does_not_exist").is_none());
    }

    #[test]
    fn test_ids_are_unique() {
        let ids: HashSet<_> = TOOLBAR_COMMANDS.iter().map(|c| c.id).collect();
        assert_eq!(ids.len(), TOOLBAR_COMMANDS.len());
    }

    #[test]
    fn test_every_group_has_commands() {
        for group in ToolbarGroup::all() {
            assert!(commands_in(*group).count() > 0, "{:?} is empty", group);
        }
        assert_eq!(commands_in(ToolbarGroup::Headings).count(), 3);
    }

    #[test]
    fn test_labels_follow_direction() {
        let bold = command("bold").unwrap();
        assert_eq!(bold.label(Direction::Ltr), "Bold");
        assert_eq!(bold.label(Direction::Rtl), "غامق");
        assert_eq!(ToolbarGroup::Media.label(Direction::Rtl), "وسائط");
        assert_eq!(ToolbarGroup::Blocks.label(Direction::Ltr), "Blocks");
    }

    #[test]
    fn test_shortcuts() {
        assert_eq!(command_for_shortcut(Key::B).map(|c| c.id), Some("bold"));
        assert_eq!(command_for_shortcut(Key::I).map(|c| c.id), Some("italic"));
        assert_eq!(command_for_shortcut(Key::K).map(|c| c.id), Some("link"));
        assert!(command_for_shortcut(Key::Q).is_none());
        assert_eq!(command("bold").unwrap().tooltip(Direction::Ltr), "Bold (Ctrl+B)");
        assert_eq!(command("quote").unwrap().tooltip(Direction::Ltr), "Quote");
    }
}

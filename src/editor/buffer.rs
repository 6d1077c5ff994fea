//! Document buffer and the snippet insertion engine
//!
//! Every toolbar command boils down to one operation: splice a `before`
//! marker and an `after` marker around the current selection and put the
//! caret right after the inserted content. The splice itself is the pure
//! [`insert`] function; [`Document`] wraps it with undo history and the
//! pending-cursor handoff to the editor widget.
//!
//! # Example
//! ```ignore
//! use crate::editor::buffer::{insert, Selection};
//!
//! let result = insert("Hello world", Selection::new(0, 5), "**", "**");
//! assert_eq!(result.text, "**Hello** world");
//! assert_eq!(result.cursor, 9);
//! ```

use crate::string_utils::{char_len, char_to_byte_index, clamp_char_range};
use log::debug;

/// Table skeleton inserted by the table command.
pub const TABLE_TEMPLATE: &str = "\n| العنوان 1 | العنوان 2 | العنوان 3 |\n| -------- | -------- | -------- |\n| خلية 1   | خلية 2   | خلية 3   |\n";

/// Maximum number of undo steps kept per document.
const MAX_UNDO_SIZE: usize = 100;

// ─────────────────────────────────────────────────────────────────────────────
// Selection
// ─────────────────────────────────────────────────────────────────────────────

/// A character range in the document, always `start <= end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Selection {
    pub start: usize,
    pub end: usize,
}

impl Selection {
    /// Create a selection from two offsets in any order.
    pub fn new(a: usize, b: usize) -> Self {
        Self {
            start: a.min(b),
            end: a.max(b),
        }
    }

    /// An empty selection (a caret) at `pos`.
    pub fn caret(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// The same range moved right by `by` characters.
    pub fn shifted(self, by: usize) -> Self {
        Self {
            start: self.start + by,
            end: self.end + by,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Pure Insertion
// ─────────────────────────────────────────────────────────────────────────────

/// Result of splicing markers around a selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Insertion {
    /// The new buffer
    pub text: String,
    /// Caret position (character offset) after the inserted content
    pub cursor: usize,
}

/// Wrap the selection with `before` and `after`.
///
/// Produces `text[..s] + before + text[s..e] + after + text[e..]` and a caret
/// at `s + len(before) + (e - s) + len(after)`. Offsets are characters; a
/// selection reaching past the end is clamped to the buffer.
pub fn insert(text: &str, selection: Selection, before: &str, after: &str) -> Insertion {
    let (start, end) = clamp_char_range(text, selection.start, selection.end);
    let start_byte = char_to_byte_index(text, start);
    let end_byte = char_to_byte_index(text, end);

    let mut new_text = String::with_capacity(text.len() + before.len() + after.len());
    new_text.push_str(&text[..start_byte]);
    new_text.push_str(before);
    new_text.push_str(&text[start_byte..end_byte]);
    new_text.push_str(after);
    new_text.push_str(&text[end_byte..]);

    let cursor = start + char_len(before) + (end - start) + char_len(after);

    Insertion {
        text: new_text,
        cursor,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Document
// ─────────────────────────────────────────────────────────────────────────────

/// The markdown buffer being edited, with undo history.
#[derive(Debug, Clone)]
pub struct Document {
    /// Markdown source. Edited in place by the editor widget.
    pub content: String,
    /// Undo history stack
    undo_stack: Vec<String>,
    /// Redo history stack
    redo_stack: Vec<String>,
    /// Maximum undo history size
    max_undo_size: usize,
    /// Incremented on every change, so views can cheaply tell the buffer moved on
    content_version: u64,
    /// Caret the editor should restore once it has laid out the new content
    pending_cursor: Option<usize>,
}

impl Document {
    /// Create a document holding `content`.
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            max_undo_size: MAX_UNDO_SIZE,
            content_version: 0,
            pending_cursor: None,
        }
    }

    /// Document shown on first launch.
    pub fn welcome() -> Self {
        Self::new(WELCOME_DOCUMENT)
    }

    /// Splice `before`/`after` around `selection`.
    ///
    /// `selection` is `None` when no editing surface is mounted; the call is
    /// then a no-op. Returns `true` if the buffer was changed.
    pub fn insert(&mut self, selection: Option<Selection>, before: &str, after: &str) -> bool {
        let Some(selection) = selection else {
            debug!("Insert ignored: no editing surface mounted");
            return false;
        };

        let result = insert(&self.content, selection, before, after);
        self.set_content(result.text);
        self.pending_cursor = Some(result.cursor);
        true
    }

    /// Insert the table skeleton at the selection.
    pub fn insert_table(&mut self, selection: Option<Selection>) -> bool {
        self.insert(selection, TABLE_TEMPLATE, "")
    }

    /// Replace the content and push the current one to the undo stack.
    pub fn set_content(&mut self, new_content: String) {
        let old = std::mem::replace(&mut self.content, new_content);
        self.push_undo(old);
    }

    /// Record an edit that was already applied to `content` (by the text widget).
    ///
    /// Pass the content as it was before the edit.
    pub fn record_edit(&mut self, old_content: String) {
        if old_content != self.content {
            self.push_undo(old_content);
        }
    }

    fn push_undo(&mut self, old: String) {
        self.undo_stack.push(old);
        if self.undo_stack.len() > self.max_undo_size {
            self.undo_stack.remove(0);
        }
        self.redo_stack.clear();
        self.bump_version();
    }

    fn bump_version(&mut self) {
        self.content_version = self.content_version.wrapping_add(1);
    }

    /// Undo the last edit. Returns `true` if undo was performed.
    pub fn undo(&mut self) -> bool {
        match self.undo_stack.pop() {
            Some(previous) => {
                let current = std::mem::replace(&mut self.content, previous);
                self.redo_stack.push(current);
                self.bump_version();
                true
            }
            None => false,
        }
    }

    /// Redo the last undone edit. Returns `true` if redo was performed.
    pub fn redo(&mut self) -> bool {
        match self.redo_stack.pop() {
            Some(next) => {
                let current = std::mem::replace(&mut self.content, next);
                self.undo_stack.push(current);
                self.bump_version();
                true
            }
            None => false,
        }
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Get the number of items in the undo stack.
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }

    /// Get the content version counter.
    pub fn content_version(&self) -> u64 {
        self.content_version
    }

    /// Caret waiting to be restored, if any.
    pub fn pending_cursor(&self) -> Option<usize> {
        self.pending_cursor
    }

    /// Hand the pending caret to the editor widget.
    ///
    /// Only call this after the widget has laid out the current content.
    pub fn take_pending_cursor(&mut self) -> Option<usize> {
        self.pending_cursor.take()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::welcome()
    }
}

const WELCOME_DOCUMENT: &str = r#"# مرحباً بك في محرر Markdown المحسّن

ابدأ الكتابة لترى المعاينة! إليك بعض الأمثلة على ما يمكنك فعله:

## تنسيق النص

يمكنك جعل النص **غامق**، *مائل*، أو ~~مشطوب~~.
يمكنك أيضًا استخدام ^نص مرتفع^ و~نص منخفض~.

## القوائم

1. عنصر القائمة المرتبة 1
2. عنصر القائمة المرتبة 2
   - نقطة متداخلة
   - نقطة متداخلة أخرى

## قوائم المهام

- [ ] مهمة للقيام بها
- [x] مهمة مكتملة

## الجداول

| الميزة | الدعم | ملاحظات |
|---------|---------|-------|
| الجداول | ✅ | مع المحاذاة |
| القوائم | ✅ | دعم التداخل |
| الكود | ✅ | مع تمييز بناء الجملة |

## الاقتباسات والكود

> هذا اقتباس
> يمكن أن يمتد على عدة أسطر

```javascript
// هذا مثال على كتلة برمجية
function مرحبا() {
  console.log("مرحباً بالعالم!");
}
```

## دعم الرياضيات

الرياضيات المضمنة: $E = mc^2$

كتلة رياضية:
$$
\frac{1}{n} \sum_{i=1}^{n} x_i
$$

---

!جرب كل هذه الميزات"#;

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    // ─────────────────────────────────────────────────────────────────────────
    // Pure insertion
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_insert_wraps_selection() {
        let result = insert("Hello world", Selection::new(6, 11), "**", "**");
        assert_eq!(result.text, "Hello **world**");
        assert_eq!(result.cursor, 15);
    }

    #[test]
    fn test_insert_prefix_only_on_caret() {
        let result = insert("Item", Selection::caret(0), "- ", "");
        assert_eq!(result.text, "- Item");
        assert_eq!(result.cursor, 2);
    }

    #[test]
    fn test_insert_pair_on_empty_selection_lands_after_both_markers() {
        let result = insert("ab", Selection::caret(1), "[", "](url)");
        assert_eq!(result.text, "a[](url)b");
        assert_eq!(result.cursor, 1 + 1 + 0 + 6);
    }

    #[test]
    fn test_insert_preserves_prefix_and_suffix() {
        let text = "prefix SELECTED suffix";
        let selection = Selection::new(7, 15);
        let result = insert(text, selection, "<<", ">>");

        assert!(result.text.starts_with("prefix "));
        assert!(result.text.ends_with(" suffix"));
        assert_eq!(result.text, "prefix <<SELECTED>> suffix");
        assert_eq!(result.cursor, 7 + 2 + 8 + 2);
    }

    #[test]
    fn test_insert_every_selection_matches_splice_formula() {
        let text = "abc مرحبا 🎉";
        let chars: Vec<char> = text.chars().collect();
        let len = chars.len();

        for s in 0..=len {
            for e in s..=len {
                let result = insert(text, Selection::new(s, e), "**", "~");
                let head: String = chars[..s].iter().collect();
                let middle: String = chars[s..e].iter().collect();
                let tail: String = chars[e..].iter().collect();

                assert_eq!(result.text, format!("{head}**{middle}~{tail}"));
                assert_eq!(result.cursor, s + 2 + (e - s) + 1);
            }
        }
    }

    #[test]
    fn test_insert_counts_markers_in_characters() {
        let result = insert("x", Selection::caret(1), "عنوان ", "");
        assert_eq!(result.text, "xعنوان ");
        assert_eq!(result.cursor, 7);
    }

    #[test]
    fn test_insert_clamps_out_of_range_selection() {
        let result = insert("abc", Selection::new(2, 50), "*", "*");
        assert_eq!(result.text, "ab*c*");
        assert_eq!(result.cursor, 5);
    }

    #[test]
    fn test_selection_new_orders_offsets() {
        let sel = Selection::new(9, 3);
        assert_eq!(sel, Selection { start: 3, end: 9 });
        assert_eq!(Selection::caret(4), Selection::new(4, 4));
    }

    #[test]
    fn test_selection_shifted_keeps_length() {
        assert_eq!(Selection::new(3, 9).shifted(2), Selection::new(5, 11));
        assert_eq!(Selection::caret(0).shifted(4), Selection::caret(4));
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Document
    // ─────────────────────────────────────────────────────────────────────────

    #[test]
    fn test_document_insert_sets_pending_cursor() {
        let mut doc = Document::new("Hello");
        assert!(doc.insert(Some(Selection::new(0, 5)), "*", "*"));
        assert_eq!(doc.content, "*Hello*");
        assert_eq!(doc.pending_cursor(), Some(7));

        assert_eq!(doc.take_pending_cursor(), Some(7));
        assert_eq!(doc.take_pending_cursor(), None);
    }

    #[test]
    fn test_document_insert_without_surface_is_noop() {
        let mut doc = Document::new("Hello");
        let version = doc.content_version();

        assert!(!doc.insert(None, "**", "**"));
        assert_eq!(doc.content, "Hello");
        assert_eq!(doc.content_version(), version);
        assert!(!doc.can_undo());
        assert_eq!(doc.pending_cursor(), None);
    }

    #[test]
    fn test_insert_table_appends_template() {
        let mut doc = Document::new("X");
        assert!(doc.insert_table(Some(Selection::caret(1))));
        assert_eq!(doc.content, format!("X{}", TABLE_TEMPLATE));
        assert_eq!(doc.pending_cursor(), Some(1 + char_len(TABLE_TEMPLATE)));
    }

    #[test]
    fn test_document_undo_redo() {
        let mut doc = Document::new("a");
        doc.insert(Some(Selection::caret(1)), "b", "");
        doc.insert(Some(Selection::caret(2)), "c", "");
        assert_eq!(doc.content, "abc");

        assert!(doc.undo());
        assert_eq!(doc.content, "ab");
        assert!(doc.undo());
        assert_eq!(doc.content, "a");
        assert!(!doc.undo());

        assert!(doc.redo());
        assert_eq!(doc.content, "ab");
        assert!(doc.can_redo());
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut doc = Document::new("a");
        doc.set_content("ab".to_string());
        doc.undo();
        assert!(doc.can_redo());

        doc.set_content("ax".to_string());
        assert!(!doc.can_redo());
    }

    #[test]
    fn test_record_edit_ignores_unchanged_content() {
        let mut doc = Document::new("same");
        let version = doc.content_version();
        doc.record_edit("same".to_string());
        assert_eq!(doc.undo_count(), 0);
        assert_eq!(doc.content_version(), version);

        doc.content.push('!');
        doc.record_edit("same".to_string());
        assert_eq!(doc.undo_count(), 1);
        assert!(doc.content_version() > version);
    }

    #[test]
    fn test_undo_history_is_bounded() {
        let mut doc = Document::new("");
        for i in 0..(MAX_UNDO_SIZE + 20) {
            doc.set_content(i.to_string());
        }
        assert_eq!(doc.undo_count(), MAX_UNDO_SIZE);
    }

    #[test]
    fn test_welcome_document_has_content() {
        let doc = Document::welcome();
        assert!(doc.content.starts_with("# "));
        assert!(doc.content.contains("$E = mc^2$"));
        assert!(!doc.can_undo());
    }
}

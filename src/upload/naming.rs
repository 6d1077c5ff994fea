//! Object names for uploaded images.

use chrono::Utc;

/// Build a unique object name for an upload of `original_name`.
///
/// The name is `{unix_millis}-{random}.{extension}`, where the extension is
/// whatever follows the last `.` of the original name, reduced to ASCII
/// letters and digits so the public URL needs no escaping. The dot is left
/// out when nothing remains.
pub fn object_name(original_name: &str) -> String {
    object_name_with(original_name, Utc::now().timestamp_millis(), fastrand::u64(..))
}

fn object_name_with(original_name: &str, millis: i64, random: u64) -> String {
    let ext = url_safe_extension(original_name);
    if ext.is_empty() {
        format!("{}-{}", millis, random)
    } else {
        format!("{}-{}.{}", millis, random, ext)
    }
}

/// Text after the last `.`; the whole name when it has no dot.
fn extension(original_name: &str) -> &str {
    original_name
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .unwrap_or(original_name)
}

fn url_safe_extension(original_name: &str) -> String {
    extension(original_name)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect()
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

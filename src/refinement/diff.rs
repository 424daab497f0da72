//! Line-based unified diffs between drafts

use diffy::create_patch;

/// Unified diff from `original` to `edited`, or an empty string when the
/// texts have no line-level differences.
pub fn unified_diff(original: &str, edited: &str) -> String {
    let patch = create_patch(original, edited);
    if patch.hunks().is_empty() {
        String::new()
    } else {
        patch.to_string()
    }
}

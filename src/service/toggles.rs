use serde::Serialize;

#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum BookmarkChange {
    Added,
    Removed,
}

/// Flips membership of `profile_id` in a bookmark set. Order is not significant.
pub fn toggle_bookmark(bookmarks: &[String], profile_id: &str) -> (Vec<String>, BookmarkChange) {
    if bookmarks.iter().any(|id| id == profile_id) {
        let remaining = bookmarks
            .iter()
            .filter(|id| id.as_str() != profile_id)
            .cloned()
            .collect();
        (remaining, BookmarkChange::Removed)
    } else {
        let mut updated = bookmarks.to_vec();
        updated.push(profile_id.to_string());
        (updated, BookmarkChange::Added)
    }
}

//! Pure edits on the allow-list document.
//!
//! The gateway composes its writes with these before handing the whole
//! document back to the store.

use crate::Entry;

/// Whether an upsert appended or replaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertKind {
    /// Entry was appended at the end
    Added,
    /// Entry replaced an existing one at the same position
    Updated,
}

/// Find the entry for `uid`.
pub fn find_entry<'a>(entries: &'a [Entry], uid: &str) -> Option<&'a Entry> {
    entries.iter().find(|entry| entry.matches_uid(uid))
}

/// Replace the entry with the same uid in place, or append it.
pub fn upsert_entry(entries: &mut Vec<Entry>, entry: Entry) -> UpsertKind {
    match entries.iter().position(|existing| existing.matches_uid(&entry.uid)) {
        Some(index) => {
            entries[index] = entry;
            UpsertKind::Updated
        }
        None => {
            entries.push(entry);
            UpsertKind::Added
        }
    }
}

/// Drop every entry matching `uid`, returning the first one removed.
pub fn remove_entry(entries: &mut Vec<Entry>, uid: &str) -> Option<Entry> {
    let index = entries.iter().position(|entry| entry.matches_uid(uid))?;
    let removed = entries.remove(index);
    entries.retain(|entry| !entry.matches_uid(uid));
    Some(removed)
}

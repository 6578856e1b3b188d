use crate::domain::DiaryEntry;
use std::cmp::Reverse;

/// Newest first: year, then month, then day, all descending.
pub fn sort_newest_first(entries: &mut [DiaryEntry]) {
    entries.sort_by_key(|entry| Reverse(entry.key()));
}

/// Entries whose display date or text contains `query`, ignoring case.
pub fn filter_entries<'a, I>(entries: I, query: &str) -> Vec<DiaryEntry>
where
    I: IntoIterator<Item = &'a DiaryEntry>,
{
    let query = query.trim();
    entries
        .into_iter()
        .filter(|entry| entry.matches(query))
        .cloned()
        .collect()
}

/// What the view screen shows for a search box value.
pub fn list_view(mut entries: Vec<DiaryEntry>, query: &str) -> Vec<DiaryEntry> {
    sort_newest_first(&mut entries);
    filter_entries(&entries, query)
}

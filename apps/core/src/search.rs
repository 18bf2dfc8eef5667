use std::collections::HashSet;

use crate::command_registry::CommandRegistry;
use crate::model::{normalize_for_search, CommandEntry};

/// Every entry whose name contains `query`, ignoring case, in input order.
pub fn filter<'a>(entries: &'a [CommandEntry], query: &str) -> Vec<&'a CommandEntry> {
    let normalized_query = normalize_for_search(query);
    entries
        .iter()
        .filter(|entry| matches_normalized(entry, &normalized_query))
        .collect()
}

/// History names mapped through the registry, most recent first.
///
/// Names the registry no longer knows (renamed or removed commands) are skipped,
/// and a command reached through several stored spellings appears once, at its
/// most recent position.
pub fn filter_history<'a>(
    history: &[String],
    registry: &'a CommandRegistry,
) -> Vec<&'a CommandEntry> {
    let mut seen: HashSet<&'a str> = HashSet::new();
    history
        .iter()
        .filter_map(|name| match registry.resolve_history_name(name) {
            None => {
                log::debug!("history entry '{name}' no longer in registry; omitted");
                None
            }
            Some(entry) if !seen.insert(entry.name.as_str()) => None,
            Some(entry) => Some(entry),
        })
        .collect()
}

/// History candidates narrowed by the same substring rule as [`filter`].
pub fn filter_history_query<'a>(
    history: &[String],
    registry: &'a CommandRegistry,
    query: &str,
) -> Vec<&'a CommandEntry> {
    let normalized_query = normalize_for_search(query);
    filter_history(history, registry)
        .into_iter()
        .filter(|entry| matches_normalized(entry, &normalized_query))
        .collect()
}

fn matches_normalized(entry: &CommandEntry, normalized_query: &str) -> bool {
    normalized_query.is_empty() || entry.normalized_name().contains(normalized_query)
}

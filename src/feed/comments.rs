use std::collections::{HashMap, HashSet};

use crate::store::CommentStore;

/// Comment count per commit id. Duplicate ids are looked up once; every id is
/// present in the result, with 0 for no comments or a failed lookup.
pub fn get_comment_counts<S: AsRef<str>>(
    store: &dyn CommentStore,
    ids: &[S],
) -> HashMap<String, usize> {
    let unique: HashSet<&str> = ids.iter().map(|id| AsRef::<str>::as_ref(id)).collect();

    unique
        .into_iter()
        .map(|id| {
            let count = store.count_for(id).unwrap_or_else(|e| {
                tracing::error!("Failed to count comments for {}: {}", id, e);
                0
            });
            (id.to_string(), count)
        })
        .collect()
}

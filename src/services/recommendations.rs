use std::collections::HashSet;

use crate::models::{Destination, Recommendation};

/// Number of recommendations served per request
pub const DEFAULT_TOP_N: usize = 10;

/// Ranks destinations by how many of their categories the user prefers
///
/// Each destination scores one point per category that appears in
/// `preferences`; repeated preferences count once. Destinations scoring zero
/// are dropped, the rest are ordered by score descending and cut to `top_n`.
/// The sort is stable, so equal scores keep catalog order.
pub fn recommend<S: AsRef<str>>(
    preferences: &[S],
    destinations: &[Destination],
    top_n: usize,
) -> Vec<Recommendation> {
    let wanted: HashSet<&str> = preferences.iter().map(|p| p.as_ref()).collect();
    if wanted.is_empty() || top_n == 0 {
        return Vec::new();
    }

    let mut scored: Vec<Recommendation> = destinations
        .iter()
        .filter_map(|destination| {
            let matched: Vec<String> = destination
                .categories
                .iter()
                .filter(|category| wanted.contains(category.as_str()))
                .cloned()
                .collect();

            (!matched.is_empty()).then(|| Recommendation {
                name: destination.name.clone(),
                iata: destination.iata.clone(),
                categories: matched,
            })
        })
        .collect();

    scored.sort_by(|a, b| b.match_score().cmp(&a.match_score()));
    scored.truncate(top_n);

    tracing::debug!(
        preferences = wanted.len(),
        candidates = destinations.len(),
        returned = scored.len(),
        "Scored destinations"
    );

    scored
}

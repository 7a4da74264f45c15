/// Aggregation of list-valued fields (keywords, industries).
///
/// Sources are unioned rather than arbitrated: every source's terms
/// contribute, deduplicated case-insensitively with first-seen order
/// preserved, then truncated to the display cap. The cap is enforced here
/// so the cached profile already carries the bounded list and callers never
/// re-truncate at render time.

/// Display cap for the `keywords` field.
pub const KEYWORD_CAP: usize = 8;

/// Display cap for the `industries` field.
pub const INDUSTRY_CAP: usize = 6;

/// Union term lists in priority order, dedup case-insensitively, cap.
pub fn aggregate_terms(lists: &[Vec<String>], cap: usize) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    let mut result: Vec<String> = Vec::new();

    for list in lists {
        for term in list {
            let trimmed = term.trim();
            if trimmed.is_empty() {
                continue;
            }
            let key = trimmed.to_lowercase();
            if seen.contains(&key) {
                continue;
            }
            seen.push(key);
            result.push(trimmed.to_string());
            if result.len() == cap {
                return result;
            }
        }
    }

    result
}

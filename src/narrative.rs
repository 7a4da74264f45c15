/// Free-text reconciliation.
///
/// Up to three candidates describe the same company (user-edited overview,
/// enrichment short description, previously generated AI summary). They are
/// split into sentence-like units, compared pairwise by token overlap, and
/// units from lower-priority candidates that restate something already kept
/// are dropped. A near-duplicate that carries a novel trailing clause
/// contributes only that clause, spliced onto the unit it duplicates, so the
/// overlap is never repeated verbatim.
///
/// The merge runs to a fixpoint, which makes it idempotent: re-running it on
/// its own output returns the output unchanged.
use crate::models::InsightSections;
use regex::Regex;
use std::collections::HashSet;

/// Token-overlap ratio above which two units are considered the same claim.
const SIMILARITY_THRESHOLD: f64 = 0.7;

/// A novel trailing clause must carry at least this many tokens to be worth
/// splicing; shorter remainders are discarded with their unit.
const MIN_NOVEL_TOKENS: usize = 2;

/// Display cap per insight section, applied after cross-section dedup.
pub const SECTION_BULLET_CAP: usize = 3;

/// Merge free-text candidates, highest priority first.
///
/// Returns `None` when no candidate contains any usable text.
pub fn merge_narratives(candidates: &[&str]) -> Option<String> {
    let mut units: Vec<String> = Vec::new();
    for candidate in candidates {
        units.extend(split_units(candidate));
    }
    if units.is_empty() {
        return None;
    }

    // Iterate to a fixpoint. Each pass either drops a unit or leaves the
    // text unchanged, so this converges in about `units.len()` passes; the
    // cap is a hard bound, not an expected exit.
    let max_passes = units.len() + 1;
    let mut merged = dedupe_units(units);
    for _ in 0..max_passes {
        let again = dedupe_units(split_units(&merged.join(" ")));
        if again == merged {
            break;
        }
        merged = again;
    }

    if merged.is_empty() {
        return None;
    }
    Some(merged.join(" "))
}

/// Deduplicate AI insight bullets across display sections.
///
/// The insights section outranks strengths: a strengths bullet that
/// restates a kept insight is dropped. Each section is capped at
/// [`SECTION_BULLET_CAP`] only after cross-section duplicates are removed.
/// Also returns the flat deduplicated bullet list, uncapped, insights first.
pub fn dedupe_insight_sections(
    insights: &[String],
    strengths: &[String],
) -> (InsightSections, Vec<String>) {
    let mut kept: Vec<(usize, String)> = Vec::new();

    for (section, bullets) in [(0usize, insights), (1usize, strengths)] {
        for bullet in bullets {
            let text = normalize_whitespace(bullet);
            if text.is_empty() {
                continue;
            }
            let tokens = token_set(&text);
            let duplicate = kept
                .iter()
                .any(|(_, existing)| similarity(&token_set(existing), &tokens) >= SIMILARITY_THRESHOLD);
            if !duplicate {
                kept.push((section, text));
            }
        }
    }

    let flat: Vec<String> = kept.iter().map(|(_, text)| text.clone()).collect();
    let sections = InsightSections {
        insights: kept
            .iter()
            .filter(|(s, _)| *s == 0)
            .take(SECTION_BULLET_CAP)
            .map(|(_, text)| text.clone())
            .collect(),
        strengths: kept
            .iter()
            .filter(|(s, _)| *s == 1)
            .take(SECTION_BULLET_CAP)
            .map(|(_, text)| text.clone())
            .collect(),
    };

    (sections, flat)
}

// ============ Unit handling ============

/// Split text into sentence-like units, whitespace-normalized.
fn split_units(text: &str) -> Vec<String> {
    let sentence_re = Regex::new(r"[^.!?]+[.!?]*").unwrap();
    sentence_re
        .find_iter(text)
        .map(|m| normalize_whitespace(m.as_str()))
        .filter(|unit| !unit.is_empty())
        .collect()
}

/// One left-to-right dedup pass over units, in priority order.
fn dedupe_units(units: Vec<String>) -> Vec<String> {
    let mut kept: Vec<String> = Vec::new();

    'units: for unit in units {
        let unit_tokens = token_list(&unit);
        if unit_tokens.is_empty() {
            continue;
        }
        let unit_set: HashSet<&str> = unit_tokens.iter().map(|t| t.token.as_str()).collect();

        for existing in kept.iter_mut() {
            let existing_tokens = token_list(existing);
            let existing_set: HashSet<&str> =
                existing_tokens.iter().map(|t| t.token.as_str()).collect();

            if similarity_sets(&existing_set, &unit_set) < SIMILARITY_THRESHOLD {
                continue;
            }

            // Near-duplicate. Keep only the clause past the longest common
            // leading run, if it is substantial; otherwise drop the unit.
            let overlap = common_leading_run(&unit_tokens, &existing_tokens);
            if overlap > 0 && unit_tokens.len() - overlap >= MIN_NOVEL_TOKENS {
                let split_at = unit_tokens[overlap].word_index;
                let novel: Vec<&str> = unit
                    .split_whitespace()
                    .skip(split_at)
                    .collect();
                let trimmed = existing.trim_end_matches(['.', '!', '?']).to_string();
                *existing = format!("{} {}", trimmed, novel.join(" "));
            }
            continue 'units;
        }

        kept.push(unit);
    }

    kept
}

// ============ Tokenization & similarity ============

struct UnitToken {
    /// Lowercased alphanumeric form used for comparison.
    token: String,
    /// Index of the originating whitespace-split word, for reconstruction.
    word_index: usize,
}

/// Lowercased alphanumeric tokens of a unit, word-aligned.
fn token_list(text: &str) -> Vec<UnitToken> {
    text.split_whitespace()
        .enumerate()
        .filter_map(|(word_index, word)| {
            let token: String = word
                .chars()
                .filter(|c| c.is_alphanumeric())
                .collect::<String>()
                .to_lowercase();
            (!token.is_empty()).then_some(UnitToken { token, word_index })
        })
        .collect()
}

fn token_set(text: &str) -> HashSet<String> {
    token_list(text).into_iter().map(|t| t.token).collect()
}

/// Overlap coefficient: |A ∩ B| / min(|A|, |B|).
fn similarity(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    let a_refs: HashSet<&str> = a.iter().map(String::as_str).collect();
    let b_refs: HashSet<&str> = b.iter().map(String::as_str).collect();
    similarity_sets(&a_refs, &b_refs)
}

fn similarity_sets(a: &HashSet<&str>, b: &HashSet<&str>) -> f64 {
    let smaller = a.len().min(b.len());
    if smaller == 0 {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    intersection as f64 / smaller as f64
}

/// Length of the longest run of `unit`'s leading tokens that appears as a
/// contiguous window anywhere in `existing`.
fn common_leading_run(unit: &[UnitToken], existing: &[UnitToken]) -> usize {
    let mut best = 0;
    for start in 0..existing.len() {
        let mut run = 0;
        while run < unit.len()
            && start + run < existing.len()
            && unit[run].token == existing[start + run].token
        {
            run += 1;
        }
        best = best.max(run);
    }
    best
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

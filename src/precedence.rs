/// Per-field source precedence.
///
/// For each canonical field an ordered priority list of origins is walked
/// and the first tier with a candidate wins. Total function: never panics,
/// never concatenates two conflicting candidates.
use crate::models::{Candidate, CandidateMap, Field, Origin};
use serde_json::Value;

/// Default order: user-edited extraction data beats enrichment, which beats
/// the questionnaire, which beats raw extraction output.
const DEFAULT_PRIORITY: [Origin; 4] = [
    Origin::ExtractionEdited,
    Origin::Enrichment,
    Origin::Questionnaire,
    Origin::ExtractionRaw,
];

/// Fields with no user-editable counterpart resolve from enrichment first,
/// falling back to the questionnaire and then extraction.
const ENRICHMENT_FIRST_PRIORITY: [Origin; 4] = [
    Origin::Enrichment,
    Origin::Questionnaire,
    Origin::ExtractionEdited,
    Origin::ExtractionRaw,
];

/// Priority order for one canonical field.
pub fn priority_for(field: Field) -> &'static [Origin] {
    match field {
        Field::LinkedinUrl
        | Field::LogoUrl
        | Field::TotalFunding
        | Field::OrganizationRevenue
        | Field::EstimatedNumEmployees
        | Field::Phone => &ENRICHMENT_FIRST_PRIORITY,
        _ => &DEFAULT_PRIORITY,
    }
}

/// Pick the winning candidate value for a field, or `None` when no source
/// supplied one.
pub fn resolve(map: &CandidateMap, field: Field) -> Option<&Value> {
    let candidates = map.get(&field)?;
    resolve_candidates(candidates, priority_for(field))
}

fn resolve_candidates<'a>(candidates: &'a [Candidate], priority: &[Origin]) -> Option<&'a Value> {
    for origin in priority {
        if let Some(candidate) = candidates.iter().find(|c| c.origin == *origin) {
            return Some(&candidate.value);
        }
    }
    None
}

/// Winning string value for a field.
pub fn resolve_text(map: &CandidateMap, field: Field) -> Option<String> {
    resolve(map, field)
        .and_then(|v| v.as_str())
        .map(str::to_string)
}

/// Winning integer value for a field.
pub fn resolve_int(map: &CandidateMap, field: Field) -> Option<i64> {
    resolve(map, field).and_then(|v| v.as_i64())
}

/// All candidate lists for a list-valued field, in priority order. Used by
/// the aggregator, which unions rather than picks.
pub fn lists_in_priority_order(map: &CandidateMap, field: Field) -> Vec<Vec<String>> {
    let Some(candidates) = map.get(&field) else {
        return Vec::new();
    };

    let mut lists = Vec::new();
    for origin in priority_for(field) {
        for candidate in candidates.iter().filter(|c| c.origin == *origin) {
            if let Some(items) = candidate.value.as_array() {
                lists.push(
                    items
                        .iter()
                        .filter_map(|v| v.as_str().map(str::to_string))
                        .collect(),
                );
            }
        }
    }
    lists
}

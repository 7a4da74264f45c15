/// Per-source adapters from raw snapshot shapes to tagged candidates.
///
/// Each upstream keeps its own ad hoc schema (nested phone objects, split
/// city/state/country triples, printed money strings), so all shape
/// knowledge lives here. Downstream code only ever sees the uniform
/// `Candidate` model. A malformed or unexpected shape for one field never
/// aborts normalization of the rest: the extractors below return `None`
/// and that field is simply absent for that source.
use crate::models::{Candidate, CandidateMap, Field, Origin, RawSourceBundle};
use serde_json::{json, Value};

/// Fields whose `0`/`"0.00"` values mean "no data" by upstream convention.
/// The sentinel rule applies to the revenue family only; other numerics
/// (e.g. `founded_year`) have no such convention and pass through untouched.
const REVENUE_FIELDS: &[Field] = &[Field::OrganizationRevenue];

/// Collect candidates from every present source in the bundle.
pub fn normalize_bundle(bundle: &RawSourceBundle) -> CandidateMap {
    let mut map = CandidateMap::new();

    if let Some(ref extraction) = bundle.extraction {
        normalize_extraction(extraction, &mut map);
    }
    if let Some(ref enrichment) = bundle.enrichment {
        normalize_enrichment(enrichment, &mut map);
    }
    if let Some(ref questionnaire) = bundle.questionnaire {
        normalize_questionnaire(questionnaire, &mut map);
    }

    map
}

/// Extraction snapshot: `details` holds the user-editable curated fields,
/// `raw` the untouched extraction output, `ai` previously generated prose.
pub fn normalize_extraction(snapshot: &Value, map: &mut CandidateMap) {
    if let Some(details) = snapshot.get("details") {
        push_text(map, Field::CompanyName, details.get("company_name"), Origin::ExtractionEdited);
        push_text(map, Field::WebsiteUrl, details.get("website_url"), Origin::ExtractionEdited);
        push_year(map, Field::FoundedYear, details.get("founded_year"), Origin::ExtractionEdited);
        push_text(map, Field::Industry, details.get("industry"), Origin::ExtractionEdited);
        push_text(map, Field::PrimarySector, details.get("primary_sector"), Origin::ExtractionEdited);
        push_text(map, Field::Overview, details.get("overview"), Origin::ExtractionEdited);
        push_text(map, Field::Problem, details.get("problem"), Origin::ExtractionEdited);
        push_text(map, Field::Solution, details.get("solution"), Origin::ExtractionEdited);
        push_text(
            map,
            Field::UniqueValueProposition,
            details.get("unique_value_proposition"),
            Origin::ExtractionEdited,
        );
        push_text(map, Field::WhyNow, details.get("why_now"), Origin::ExtractionEdited);
        push_text(map, Field::Traction, details.get("traction"), Origin::ExtractionEdited);
        push_list(map, Field::Keywords, details.get("keywords"), Origin::ExtractionEdited);
        push_list(map, Field::Industries, details.get("industries"), Origin::ExtractionEdited);
    }

    if let Some(raw) = snapshot.get("raw") {
        push_text(map, Field::CompanyName, raw.get("company_name"), Origin::ExtractionRaw);
        push_text(map, Field::WebsiteUrl, raw.get("website_url"), Origin::ExtractionRaw);
        push_text(map, Field::RawAddress, raw.get("address"), Origin::ExtractionRaw);
        push_text(map, Field::Phone, raw.get("phone"), Origin::ExtractionRaw);
        push_list(map, Field::Keywords, raw.get("keywords"), Origin::ExtractionRaw);
    }

    if let Some(ai) = snapshot.get("ai") {
        push_text(map, Field::AiSummary, ai.get("summary"), Origin::ExtractionRaw);
        push_list(map, Field::AiInsights, ai.get("insights"), Origin::ExtractionRaw);
        push_list(map, Field::AiStrengths, ai.get("strengths"), Origin::ExtractionRaw);
    }
}

/// Enrichment snapshot: flat organization record from the third-party
/// provider. Money fields arrive either printed (`"12.5M"`) or numeric;
/// the phone is a nested `{number}` object with a flat `sanitized_phone`
/// sibling, and the nested number wins when both are present.
pub fn normalize_enrichment(snapshot: &Value, map: &mut CandidateMap) {
    push_text(map, Field::CompanyName, snapshot.get("name"), Origin::Enrichment);
    push_text(map, Field::LogoUrl, snapshot.get("logo_url"), Origin::Enrichment);
    push_text(map, Field::LinkedinUrl, snapshot.get("linkedin_url"), Origin::Enrichment);
    push_text(map, Field::WebsiteUrl, snapshot.get("website_url"), Origin::Enrichment);
    push_year(map, Field::FoundedYear, snapshot.get("founded_year"), Origin::Enrichment);
    push_text(map, Field::Industry, snapshot.get("industry"), Origin::Enrichment);
    push_text(map, Field::ShortDescription, snapshot.get("short_description"), Origin::Enrichment);
    push_list(map, Field::Keywords, snapshot.get("keywords"), Origin::Enrichment);
    push_list(map, Field::Industries, snapshot.get("industries"), Origin::Enrichment);

    // City/state/country triple joined with ", ", skipping absent parts
    let location = join_location(snapshot);
    if let Some(loc) = location {
        push(map, Field::LocationDisplay, json!(loc), Origin::Enrichment);
    }
    push_text(map, Field::RawAddress, snapshot.get("raw_address"), Origin::Enrichment);

    // Nested phone object's inner number beats the flat sanitized string
    let phone = snapshot
        .get("phone")
        .and_then(|p| {
            p.get("number")
                .and_then(non_blank_str)
                .or_else(|| non_blank_str(p))
        })
        .or_else(|| snapshot.get("sanitized_phone").and_then(non_blank_str));
    if let Some(number) = phone {
        push(map, Field::Phone, json!(number), Origin::Enrichment);
    }

    push_money(map, Field::TotalFunding, snapshot, "total_funding", Origin::Enrichment);
    push_money(
        map,
        Field::OrganizationRevenue,
        snapshot,
        "organization_revenue",
        Origin::Enrichment,
    );
    push_count(
        map,
        Field::EstimatedNumEmployees,
        snapshot.get("estimated_num_employees"),
        Origin::Enrichment,
    );
}

/// Questionnaire snapshot: flat answers as the founder typed them. The
/// location arrives pre-joined as a single string and is accepted as an
/// alternative `location_display` candidate.
pub fn normalize_questionnaire(snapshot: &Value, map: &mut CandidateMap) {
    push_text(map, Field::CompanyName, snapshot.get("company_name"), Origin::Questionnaire);
    push_text(map, Field::WebsiteUrl, snapshot.get("website_url"), Origin::Questionnaire);
    push_year(map, Field::FoundedYear, snapshot.get("founded_year"), Origin::Questionnaire);
    push_text(map, Field::Industry, snapshot.get("industry"), Origin::Questionnaire);
    push_text(map, Field::PrimarySector, snapshot.get("primary_sector"), Origin::Questionnaire);
    push_text(map, Field::LocationDisplay, snapshot.get("location"), Origin::Questionnaire);
    push_text(map, Field::Phone, snapshot.get("phone"), Origin::Questionnaire);
    push_text(map, Field::ShortDescription, snapshot.get("description"), Origin::Questionnaire);
    push_text(map, Field::Problem, snapshot.get("problem"), Origin::Questionnaire);
    push_text(map, Field::Solution, snapshot.get("solution"), Origin::Questionnaire);
    push_list(map, Field::Keywords, snapshot.get("keywords"), Origin::Questionnaire);
    push_list(map, Field::Industries, snapshot.get("industries"), Origin::Questionnaire);
}

// ============ Extraction helpers ============

/// Non-empty trimmed string, or `None` for anything else.
fn non_blank_str(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}

fn push(map: &mut CandidateMap, field: Field, value: Value, origin: Origin) {
    map.entry(field).or_default().push(Candidate { value, origin });
}

fn push_text(map: &mut CandidateMap, field: Field, value: Option<&Value>, origin: Origin) {
    if let Some(text) = value.and_then(non_blank_str) {
        push(map, field, json!(text), origin);
    }
}

/// Year fields accept a JSON number or a numeric string. Anything that does
/// not parse is treated as absent for that source; there is no zero-sentinel
/// convention for years, so a literal `0` passes through.
fn push_year(map: &mut CandidateMap, field: Field, value: Option<&Value>, origin: Origin) {
    let year = value.and_then(|v| {
        v.as_i64()
            .or_else(|| non_blank_str(v).and_then(|s| s.parse::<i64>().ok()))
    });
    if let Some(y) = year {
        push(map, field, json!(y), origin);
    }
}

/// Employee-count style integers: number or numeric string.
fn push_count(map: &mut CandidateMap, field: Field, value: Option<&Value>, origin: Origin) {
    let count = value.and_then(|v| {
        v.as_i64()
            .or_else(|| non_blank_str(v).and_then(|s| s.parse::<i64>().ok()))
    });
    if let Some(c) = count {
        push(map, field, json!(c), origin);
    }
}

/// Monetary fields: prefer the provider's printed form (`"$12.5M"`), fall
/// back to the numeric form rendered as a string. Revenue-family fields
/// drop the `0`/`"0.00"` sentinel entirely.
fn push_money(map: &mut CandidateMap, field: Field, snapshot: &Value, key: &str, origin: Origin) {
    let printed_key = format!("{}_printed", key);
    let value = snapshot
        .get(printed_key.as_str())
        .or_else(|| snapshot.get(key));

    let text = match value {
        Some(v) => match non_blank_str(v) {
            Some(s) => Some(s.to_string()),
            None => v.as_f64().map(|n| n.to_string()),
        },
        None => None,
    };

    let Some(text) = text else { return };
    if REVENUE_FIELDS.contains(&field) && is_revenue_sentinel(&text) {
        return;
    }
    push(map, field, json!(text), origin);
}

/// `""`, `"0"`, `"0.00"` and numeric zero all mean "no data" for revenue.
fn is_revenue_sentinel(text: &str) -> bool {
    let trimmed = text.trim();
    trimmed.is_empty() || trimmed.parse::<f64>().map(|n| n == 0.0).unwrap_or(false)
}

/// List-shaped candidates: filter falsy/blank entries, coerce the rest to
/// strings. A non-array value is a malformed shape and yields no candidate.
fn push_list(map: &mut CandidateMap, field: Field, value: Option<&Value>, origin: Origin) {
    let Some(items) = value.and_then(|v| v.as_array()) else {
        return;
    };

    let cleaned: Vec<String> = items
        .iter()
        .filter_map(|item| match item {
            Value::String(s) => {
                let trimmed = s.trim();
                (!trimmed.is_empty()).then(|| trimmed.to_string())
            }
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        })
        .collect();

    if !cleaned.is_empty() {
        push(map, field, json!(cleaned), origin);
    }
}

/// Join city/state/country with ", ", skipping absent parts.
fn join_location(snapshot: &Value) -> Option<String> {
    let parts: Vec<&str> = ["city", "state", "country"]
        .iter()
        .filter_map(|key| snapshot.get(*key).and_then(non_blank_str))
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts.join(", "))
    }
}

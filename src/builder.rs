/// Profile assembly.
///
/// `build_profile` is the pure orchestrator for the whole resolution
/// pipeline: normalize every present source, resolve each canonical field
/// via precedence, reconcile the narrative and insight fields, aggregate
/// the list fields, and assemble the flat read-model. It tolerates any
/// subset of the three sources being absent, never mutates its inputs, and
/// degrades field by field instead of failing as a whole.
use crate::keywords::{aggregate_terms, INDUSTRY_CAP, KEYWORD_CAP};
use crate::models::{CanonicalCompanyProfile, CandidateMap, Field, RawSourceBundle};
use crate::narrative::{dedupe_insight_sections, merge_narratives};
use crate::normalizer::normalize_bundle;
use crate::precedence::{lists_in_priority_order, resolve_int, resolve_text};

/// Resolve a bundle into the canonical profile.
///
/// Deterministic: byte-identical bundles always produce byte-identical
/// profiles, and entity identity never enters the computation.
pub fn build_profile(bundle: &RawSourceBundle) -> CanonicalCompanyProfile {
    let candidates = normalize_bundle(bundle);

    let overview_deduped = merge_overview(&candidates);
    let (ai_insights_structured, ai_insights_deduped) = merge_insights(&candidates);

    CanonicalCompanyProfile {
        company_name: resolve_text(&candidates, Field::CompanyName),
        logo_url: resolve_text(&candidates, Field::LogoUrl),
        linkedin_url: resolve_text(&candidates, Field::LinkedinUrl),
        website_url: resolve_text(&candidates, Field::WebsiteUrl),
        founded_year: resolve_int(&candidates, Field::FoundedYear),
        industry: resolve_text(&candidates, Field::Industry),
        primary_sector: resolve_text(&candidates, Field::PrimarySector),

        location_display: resolve_text(&candidates, Field::LocationDisplay),
        raw_address: resolve_text(&candidates, Field::RawAddress),
        phone: resolve_text(&candidates, Field::Phone),

        total_funding: resolve_text(&candidates, Field::TotalFunding),
        organization_revenue: resolve_text(&candidates, Field::OrganizationRevenue),
        estimated_num_employees: resolve_int(&candidates, Field::EstimatedNumEmployees),

        overview_deduped,
        short_description: resolve_text(&candidates, Field::ShortDescription),
        problem: resolve_text(&candidates, Field::Problem),
        solution: resolve_text(&candidates, Field::Solution),
        unique_value_proposition: resolve_text(&candidates, Field::UniqueValueProposition),
        why_now: resolve_text(&candidates, Field::WhyNow),
        traction: resolve_text(&candidates, Field::Traction),
        ai_summary: resolve_text(&candidates, Field::AiSummary),
        ai_insights_structured,
        ai_insights_deduped,

        keywords: aggregate_terms(
            &lists_in_priority_order(&candidates, Field::Keywords),
            KEYWORD_CAP,
        ),
        industries: aggregate_terms(
            &lists_in_priority_order(&candidates, Field::Industries),
            INDUSTRY_CAP,
        ),
    }
}

/// Merge the three overview-shaped texts: user-edited overview first, then
/// the enrichment short description, then the previously generated AI
/// summary. Lower-priority text only contributes what the higher-priority
/// text does not already say.
fn merge_overview(candidates: &CandidateMap) -> Option<String> {
    let overview = resolve_text(candidates, Field::Overview);
    let short_description = resolve_text(candidates, Field::ShortDescription);
    let ai_summary = resolve_text(candidates, Field::AiSummary);

    let texts: Vec<&str> = [&overview, &short_description, &ai_summary]
        .into_iter()
        .filter_map(|t| t.as_deref())
        .collect();

    merge_narratives(&texts)
}

fn merge_insights(
    candidates: &CandidateMap,
) -> (Option<crate::models::InsightSections>, Vec<String>) {
    let insights = first_list(candidates, Field::AiInsights);
    let strengths = first_list(candidates, Field::AiStrengths);

    if insights.is_empty() && strengths.is_empty() {
        return (None, Vec::new());
    }

    let (sections, flat) = dedupe_insight_sections(&insights, &strengths);
    let structured = (!sections.is_empty()).then_some(sections);
    (structured, flat)
}

fn first_list(candidates: &CandidateMap, field: Field) -> Vec<String> {
    lists_in_priority_order(candidates, field)
        .into_iter()
        .next()
        .unwrap_or_default()
}

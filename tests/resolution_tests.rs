/// Unit tests for profile resolution
/// Tests source normalization, precedence, narrative dedup, and list capping
use canonical_profile_api::builder::build_profile;
use canonical_profile_api::models::RawSourceBundle;
use serde_json::{json, Value};

fn bundle(extraction: Option<Value>, enrichment: Option<Value>, questionnaire: Option<Value>) -> RawSourceBundle {
    RawSourceBundle {
        extraction,
        enrichment,
        questionnaire,
    }
}

#[cfg(test)]
mod precedence_tests {
    use super::*;

    #[test]
    fn test_edited_extraction_beats_enrichment() {
        let b = bundle(
            Some(json!({ "details": { "website_url": "neuralpay.com" } })),
            Some(json!({ "website_url": "neuralpay.io" })),
            None,
        );

        let profile = build_profile(&b);
        assert_eq!(profile.website_url.as_deref(), Some("neuralpay.com"));
    }

    #[test]
    fn test_enrichment_beats_questionnaire_by_default() {
        let b = bundle(
            None,
            Some(json!({ "industry": "Financial Services" })),
            Some(json!({ "industry": "Fintech" })),
        );

        let profile = build_profile(&b);
        assert_eq!(profile.industry.as_deref(), Some("Financial Services"));
    }

    #[test]
    fn test_questionnaire_fallback_when_others_absent() {
        let b = bundle(None, None, Some(json!({ "company_name": "NeuralPay" })));

        let profile = build_profile(&b);
        assert_eq!(profile.company_name.as_deref(), Some("NeuralPay"));
    }

    #[test]
    fn test_raw_extraction_is_last_resort() {
        let b = bundle(
            Some(json!({
                "details": { "company_name": "NeuralPay" },
                "raw": { "company_name": "neuralpay inc (ocr)" }
            })),
            None,
            None,
        );

        let profile = build_profile(&b);
        assert_eq!(profile.company_name.as_deref(), Some("NeuralPay"));

        // With no edited value, the raw extraction candidate wins
        let b = bundle(
            Some(json!({ "raw": { "company_name": "neuralpay inc (ocr)" } })),
            None,
            None,
        );
        let profile = build_profile(&b);
        assert_eq!(profile.company_name.as_deref(), Some("neuralpay inc (ocr)"));
    }

    #[test]
    fn test_enrichment_first_fields() {
        // linkedin_url has no user-editable counterpart: enrichment wins
        // even when extraction data is present
        let b = bundle(
            Some(json!({ "details": { "company_name": "NeuralPay" } })),
            Some(json!({
                "linkedin_url": "linkedin.com/company/neuralpay",
                "estimated_num_employees": 42
            })),
            None,
        );

        let profile = build_profile(&b);
        assert_eq!(
            profile.linkedin_url.as_deref(),
            Some("linkedin.com/company/neuralpay")
        );
        assert_eq!(profile.estimated_num_employees, Some(42));
    }

    #[test]
    fn test_conflicting_candidates_never_concatenated() {
        let b = bundle(
            Some(json!({ "details": { "website_url": "a.com" } })),
            Some(json!({ "website_url": "b.com" })),
            Some(json!({ "website_url": "c.com" })),
        );

        let profile = build_profile(&b);
        assert_eq!(profile.website_url.as_deref(), Some("a.com"));
    }
}

#[cfg(test)]
mod sentinel_tests {
    use super::*;

    #[test]
    fn test_zero_revenue_string_is_absent() {
        let b = bundle(None, Some(json!({ "organization_revenue": "0.00" })), None);

        let profile = build_profile(&b);
        assert_eq!(profile.organization_revenue, None);
    }

    #[test]
    fn test_zero_revenue_number_is_absent() {
        let b = bundle(None, Some(json!({ "organization_revenue": 0 })), None);

        let profile = build_profile(&b);
        assert_eq!(profile.organization_revenue, None);
    }

    #[test]
    fn test_empty_string_revenue_is_absent() {
        let b = bundle(None, Some(json!({ "organization_revenue": "" })), None);

        let profile = build_profile(&b);
        assert_eq!(profile.organization_revenue, None);
    }

    #[test]
    fn test_real_revenue_survives() {
        let b = bundle(
            None,
            Some(json!({ "organization_revenue_printed": "12.5M" })),
            None,
        );

        let profile = build_profile(&b);
        assert_eq!(profile.organization_revenue.as_deref(), Some("12.5M"));
    }

    #[test]
    fn test_sentinel_rule_does_not_apply_to_other_numerics() {
        // No zero-sentinel convention exists for founded_year
        let b = bundle(None, Some(json!({ "founded_year": 0 })), None);

        let profile = build_profile(&b);
        assert_eq!(profile.founded_year, Some(0));
    }
}

#[cfg(test)]
mod normalizer_tests {
    use super::*;

    #[test]
    fn test_location_triple_joined() {
        let b = bundle(
            None,
            Some(json!({ "city": "Austin", "state": "TX", "country": "US" })),
            None,
        );

        let profile = build_profile(&b);
        assert_eq!(profile.location_display.as_deref(), Some("Austin, TX, US"));
    }

    #[test]
    fn test_location_join_skips_absent_parts() {
        let b = bundle(None, Some(json!({ "city": "Austin", "country": "US" })), None);

        let profile = build_profile(&b);
        assert_eq!(profile.location_display.as_deref(), Some("Austin, US"));
    }

    #[test]
    fn test_prejoined_location_accepted_from_questionnaire() {
        let b = bundle(None, None, Some(json!({ "location": "Austin, Texas" })));

        let profile = build_profile(&b);
        assert_eq!(profile.location_display.as_deref(), Some("Austin, Texas"));
    }

    #[test]
    fn test_nested_phone_number_preferred() {
        let b = bundle(
            None,
            Some(json!({
                "phone": { "number": "+1 512-555-0100" },
                "sanitized_phone": "15125550100"
            })),
            None,
        );

        let profile = build_profile(&b);
        assert_eq!(profile.phone.as_deref(), Some("+1 512-555-0100"));
    }

    #[test]
    fn test_sanitized_phone_fallback() {
        let b = bundle(None, Some(json!({ "sanitized_phone": "15125550100" })), None);

        let profile = build_profile(&b);
        assert_eq!(profile.phone.as_deref(), Some("15125550100"));
    }

    #[test]
    fn test_founded_year_numeric_string_coerced() {
        let b = bundle(None, Some(json!({ "founded_year": "2019" })), None);

        let profile = build_profile(&b);
        assert_eq!(profile.founded_year, Some(2019));
    }

    #[test]
    fn test_malformed_field_does_not_abort_the_rest() {
        // keywords is an object instead of an array; name is a number;
        // everything else still resolves
        let b = bundle(
            None,
            Some(json!({
                "name": 12345,
                "keywords": { "unexpected": "shape" },
                "website_url": "neuralpay.io",
                "founded_year": "not-a-year"
            })),
            None,
        );

        let profile = build_profile(&b);
        assert_eq!(profile.company_name, None);
        assert_eq!(profile.founded_year, None);
        assert!(profile.keywords.is_empty());
        assert_eq!(profile.website_url.as_deref(), Some("neuralpay.io"));
    }

    #[test]
    fn test_blank_strings_are_absent_not_empty() {
        let b = bundle(
            None,
            Some(json!({ "name": "   ", "website_url": "neuralpay.io" })),
            None,
        );

        let profile = build_profile(&b);
        assert_eq!(profile.company_name, None);
        assert_eq!(profile.website_url.as_deref(), Some("neuralpay.io"));
    }

    #[test]
    fn test_list_entries_filtered_and_coerced() {
        let b = bundle(
            None,
            Some(json!({ "keywords": ["payments", "", null, 42, "  ", "fraud"] })),
            None,
        );

        let profile = build_profile(&b);
        assert_eq!(profile.keywords, vec!["payments", "42", "fraud"]);
    }
}

#[cfg(test)]
mod list_capping_tests {
    use super::*;

    #[test]
    fn test_keywords_capped_at_eight_in_original_order() {
        let b = bundle(
            None,
            Some(json!({
                "keywords": ["k1", "k2", "k3", "k4", "k5", "k6", "k7", "k8", "k9", "k10"]
            })),
            None,
        );

        let profile = build_profile(&b);
        assert_eq!(
            profile.keywords,
            vec!["k1", "k2", "k3", "k4", "k5", "k6", "k7", "k8"]
        );
    }

    #[test]
    fn test_industries_capped_at_six() {
        let b = bundle(
            None,
            Some(json!({
                "industries": ["i1", "i2", "i3", "i4", "i5", "i6", "i7"]
            })),
            None,
        );

        let profile = build_profile(&b);
        assert_eq!(profile.industries.len(), 6);
        assert_eq!(profile.industries[0], "i1");
    }

    #[test]
    fn test_keywords_unioned_across_sources_case_insensitive() {
        let b = bundle(
            Some(json!({ "details": { "keywords": ["Payments", "Fraud"] } })),
            Some(json!({ "keywords": ["payments", "Risk"] })),
            None,
        );

        let profile = build_profile(&b);
        // First-seen casing wins; "payments" from enrichment is a duplicate
        assert_eq!(profile.keywords, vec!["Payments", "Fraud", "Risk"]);
    }
}

#[cfg(test)]
mod narrative_tests {
    use super::*;
    use canonical_profile_api::narrative::merge_narratives;

    #[test]
    fn test_overlapping_sentences_merge_with_novel_clause() {
        let merged = merge_narratives(&[
            "We are a leading fintech platform for payments.",
            "A leading fintech platform for payments that helps merchants.",
        ])
        .unwrap();

        assert_eq!(
            merged,
            "We are a leading fintech platform for payments that helps merchants."
        );
        // The overlapping phrase appears exactly once
        assert_eq!(merged.matches("leading fintech platform").count(), 1);
    }

    #[test]
    fn test_distinct_sentences_both_kept_in_priority_order() {
        let merged = merge_narratives(&[
            "We build payment infrastructure.",
            "The team is based in Austin.",
        ])
        .unwrap();

        assert_eq!(
            merged,
            "We build payment infrastructure. The team is based in Austin."
        );
    }

    #[test]
    fn test_exact_duplicate_dropped() {
        let merged = merge_narratives(&[
            "We build payment infrastructure.",
            "We build payment infrastructure.",
        ])
        .unwrap();

        assert_eq!(merged, "We build payment infrastructure.");
    }

    #[test]
    fn test_merge_is_idempotent() {
        let first = merge_narratives(&[
            "We are a leading fintech platform for payments.",
            "A leading fintech platform for payments that helps merchants.",
            "The company sells to mid-market retailers.",
        ])
        .unwrap();

        let second = merge_narratives(&[first.as_str()]).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_no_usable_text_yields_absent() {
        assert_eq!(merge_narratives(&[]), None);
        assert_eq!(merge_narratives(&["", "   "]), None);
    }

    #[test]
    fn test_overview_deduped_in_profile() {
        let b = bundle(
            Some(json!({ "details": { "overview": "We are a leading fintech platform for payments." } })),
            Some(json!({ "short_description": "A leading fintech platform for payments that helps merchants." })),
            None,
        );

        let profile = build_profile(&b);
        assert_eq!(
            profile.overview_deduped.as_deref(),
            Some("We are a leading fintech platform for payments that helps merchants.")
        );
        // The raw winning short_description is still resolved on its own
        assert!(profile.short_description.is_some());
    }
}

#[cfg(test)]
mod insight_tests {
    use super::*;
    use canonical_profile_api::narrative::dedupe_insight_sections;

    #[test]
    fn test_cross_section_duplicates_removed() {
        let insights = vec![
            "Strong recurring revenue growth".to_string(),
            "Expanding into Europe".to_string(),
        ];
        let strengths = vec![
            "Strong growth in recurring revenue".to_string(),
            "Experienced founding team".to_string(),
        ];

        let (sections, flat) = dedupe_insight_sections(&insights, &strengths);

        assert_eq!(sections.insights.len(), 2);
        // The restated revenue claim is gone from strengths
        assert_eq!(sections.strengths, vec!["Experienced founding team"]);
        assert_eq!(flat.len(), 3);
    }

    #[test]
    fn test_cap_applied_after_dedup_not_before() {
        // The first strengths bullet duplicates a kept insight. Capping
        // before dedup would leave only two survivors; capping after the
        // duplicate is removed leaves a full section of three.
        let insights = vec!["Strong recurring revenue growth".to_string()];
        let strengths = vec![
            "Strong growth in recurring revenue".to_string(),
            "s1".to_string(),
            "s2 unique value".to_string(),
            "s3 another point".to_string(),
            "s4 dropped by cap".to_string(),
        ];

        let (sections, _) = dedupe_insight_sections(&insights, &strengths);
        assert_eq!(sections.strengths.len(), 3);
        assert!(!sections.strengths.contains(&"Strong growth in recurring revenue".to_string()));
        assert!(!sections.strengths.contains(&"s4 dropped by cap".to_string()));
    }

    #[test]
    fn test_insights_resolved_from_extraction_ai() {
        let b = bundle(
            Some(json!({
                "ai": {
                    "summary": "NeuralPay automates payment reconciliation.",
                    "insights": ["Growing 20% month over month", "Low churn"],
                    "strengths": ["Growing 20% every month", "Strong team"]
                }
            })),
            None,
            None,
        );

        let profile = build_profile(&b);
        let sections = profile.ai_insights_structured.unwrap();
        assert_eq!(sections.insights.len(), 2);
        assert_eq!(sections.strengths, vec!["Strong team"]);
        assert_eq!(profile.ai_insights_deduped.len(), 3);
        assert_eq!(
            profile.ai_summary.as_deref(),
            Some("NeuralPay automates payment reconciliation.")
        );
    }
}

#[cfg(test)]
mod error_handling_tests {
    use canonical_profile_api::errors::{AppError, ResultExt};

    #[test]
    fn test_app_error_display() {
        let error = AppError::NotFound("No cached profile for company x".to_string());
        let display = format!("{}", error);
        assert!(display.contains("Not found"));
        assert!(display.contains("No cached profile"));

        let error = AppError::BadRequest("Company id must not be the nil UUID".to_string());
        let display = format!("{}", error);
        assert!(display.contains("Bad request"));
    }

    #[test]
    fn test_error_context_chain() {
        let result: Result<(), AppError> =
            Err(AppError::InternalError("serialization failed".to_string()));
        let with_context = result.context("storing cache entry");

        let display = format!("{}", with_context.unwrap_err());
        assert!(display.contains("storing cache entry"));
        assert!(display.contains("serialization failed"));
    }
}

#[cfg(test)]
mod builder_tests {
    use super::*;

    #[test]
    fn test_all_sources_absent_is_valid_input() {
        let profile = build_profile(&RawSourceBundle::default());
        assert_eq!(profile, Default::default());
        assert_eq!(profile.company_name, None);
        assert!(profile.keywords.is_empty());
    }

    #[test]
    fn test_absence_propagation_for_founded_year() {
        let b = bundle(
            Some(json!({ "details": { "company_name": "NeuralPay" } })),
            Some(json!({ "website_url": "neuralpay.io" })),
            None,
        );

        let profile = build_profile(&b);
        assert_eq!(profile.founded_year, None);
    }

    #[test]
    fn test_resolution_is_deterministic() {
        let b = bundle(
            Some(json!({
                "details": {
                    "company_name": "NeuralPay",
                    "overview": "We are a leading fintech platform for payments.",
                    "keywords": ["payments", "fraud", "risk"]
                },
                "ai": { "summary": "NeuralPay is a payments platform." }
            })),
            Some(json!({
                "name": "NeuralPay Inc",
                "city": "Austin",
                "state": "TX",
                "keywords": ["Payments", "ml"],
                "estimated_num_employees": 42
            })),
            Some(json!({ "founded_year": 2019 })),
        );

        let first = build_profile(&b);
        let second = build_profile(&b);
        assert_eq!(first, second);
    }

    #[test]
    fn test_builder_does_not_mutate_inputs() {
        let b = bundle(
            Some(json!({ "details": { "company_name": "NeuralPay" } })),
            Some(json!({ "keywords": ["a", "", "b"] })),
            None,
        );
        let before = serde_json::to_string(&b).unwrap();

        let _ = build_profile(&b);

        assert_eq!(serde_json::to_string(&b).unwrap(), before);
    }

    #[test]
    fn test_full_bundle_resolves_every_section() {
        let b = bundle(
            Some(json!({
                "details": {
                    "company_name": "NeuralPay",
                    "website_url": "neuralpay.com",
                    "overview": "We are a leading fintech platform for payments.",
                    "problem": "Reconciliation is manual.",
                    "solution": "We automate it.",
                    "unique_value_proposition": "Only real-time engine.",
                    "why_now": "Instant payment rails just launched.",
                    "traction": "120 customers.",
                    "keywords": ["payments"]
                },
                "raw": { "address": "600 Congress Ave, Austin TX", "phone": "512 555 0100" },
                "ai": { "summary": "A payments automation platform.", "insights": ["Fast growth"] }
            })),
            Some(json!({
                "name": "NeuralPay Inc",
                "logo_url": "cdn.example.com/np.png",
                "linkedin_url": "linkedin.com/company/neuralpay",
                "website_url": "neuralpay.io",
                "founded_year": 2019,
                "industry": "Financial Services",
                "city": "Austin",
                "state": "TX",
                "country": "US",
                "phone": { "number": "+1 512-555-0100" },
                "total_funding_printed": "4.2M",
                "organization_revenue_printed": "1.1M",
                "estimated_num_employees": 42,
                "short_description": "A fintech platform for payment operations.",
                "keywords": ["fraud", "risk"]
            })),
            Some(json!({ "primary_sector": "B2B SaaS" })),
        );

        let profile = build_profile(&b);

        assert_eq!(profile.company_name.as_deref(), Some("NeuralPay"));
        assert_eq!(profile.logo_url.as_deref(), Some("cdn.example.com/np.png"));
        assert_eq!(profile.website_url.as_deref(), Some("neuralpay.com"));
        assert_eq!(profile.founded_year, Some(2019));
        assert_eq!(profile.primary_sector.as_deref(), Some("B2B SaaS"));
        assert_eq!(profile.location_display.as_deref(), Some("Austin, TX, US"));
        assert_eq!(
            profile.raw_address.as_deref(),
            Some("600 Congress Ave, Austin TX")
        );
        assert_eq!(profile.phone.as_deref(), Some("+1 512-555-0100"));
        assert_eq!(profile.total_funding.as_deref(), Some("4.2M"));
        assert_eq!(profile.organization_revenue.as_deref(), Some("1.1M"));
        assert_eq!(profile.estimated_num_employees, Some(42));
        assert_eq!(profile.problem.as_deref(), Some("Reconciliation is manual."));
        assert_eq!(profile.traction.as_deref(), Some("120 customers."));
        assert!(profile.overview_deduped.is_some());
        assert_eq!(profile.keywords, vec!["payments", "fraud", "risk"]);
        assert!(profile.ai_insights_structured.is_some());
    }
}

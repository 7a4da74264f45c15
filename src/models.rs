use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

// ============ Source Model ============

/// The three upstream systems a company description can come from.
///
/// Each snapshot is an independently-versioned, semi-structured record with
/// no shared schema across sources, so they are carried as raw JSON and only
/// the per-source adapters in `normalizer` know their shapes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawSourceBundle {
    /// Document/extraction pipeline snapshot (pitch deck extraction).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extraction: Option<Value>,
    /// Third-party enrichment service snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enrichment: Option<Value>,
    /// User-filled onboarding questionnaire snapshot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub questionnaire: Option<Value>,
}

impl RawSourceBundle {
    /// True when no source supplied any data. Still valid input: the
    /// resolved profile simply has every field absent.
    pub fn is_empty(&self) -> bool {
        self.extraction.is_none() && self.enrichment.is_none() && self.questionnaire.is_none()
    }
}

/// Where a candidate value came from, in decreasing default trustworthiness.
///
/// A value the user has explicitly edited must never be silently clobbered
/// by a less-trustworthy automated source, so user-edited extraction fields
/// outrank everything else by default. Raw extraction output sits last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Origin {
    /// User-editable extraction fields (curated by the founder).
    ExtractionEdited,
    /// Third-party enrichment data.
    Enrichment,
    /// Onboarding questionnaire answers.
    Questionnaire,
    /// Extraction-derived raw fields, never touched by a user.
    ExtractionRaw,
}

/// Canonical field names the resolver knows about.
///
/// One variant per scalar or list field that participates in precedence
/// resolution. Derived narrative fields (`overview_deduped`,
/// `ai_insights_deduped`) are produced by the deduplicator, not resolved
/// through candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    CompanyName,
    LogoUrl,
    LinkedinUrl,
    WebsiteUrl,
    FoundedYear,
    Industry,
    PrimarySector,
    LocationDisplay,
    RawAddress,
    Phone,
    TotalFunding,
    OrganizationRevenue,
    EstimatedNumEmployees,
    Overview,
    ShortDescription,
    Problem,
    Solution,
    UniqueValueProposition,
    WhyNow,
    Traction,
    AiSummary,
    AiInsights,
    AiStrengths,
    Keywords,
    Industries,
}

/// One source's value for one canonical field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    /// The normalized value (string, number, or array of strings).
    pub value: Value,
    /// Which source tier produced it.
    pub origin: Origin,
}

/// Sparse map from canonical field to the candidates collected for it,
/// at most one per field per source tier.
pub type CandidateMap = BTreeMap<Field, Vec<Candidate>>;

// ============ Resolved Profile ============

/// AI-generated insight bullets split by display section.
///
/// Sections are deduplicated against each other (the same claim never
/// appears in both) and capped after that dedup, so callers render them
/// as-is without re-truncating.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightSections {
    /// "Key insights" section bullets, at most 3.
    pub insights: Vec<String>,
    /// "Strengths" section bullets, at most 3.
    pub strengths: Vec<String>,
}

impl InsightSections {
    pub fn is_empty(&self) -> bool {
        self.insights.is_empty() && self.strengths.is_empty()
    }
}

/// The single merged, deduplicated view of a company.
///
/// Pure render data: derived from the three sources on demand, cached, and
/// never written back to any system of record. Absence is a first-class
/// value; no field ever carries an empty string standing in for "unknown".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CanonicalCompanyProfile {
    // Identity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub linkedin_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub founded_year: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub industry: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_sector: Option<String>,

    // Location
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_display: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    // Financial
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_funding: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_revenue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_num_employees: Option<i64>,

    // Narrative
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overview_deduped: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub short_description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub solution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unique_value_proposition: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub why_now: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub traction: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_summary: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_insights_structured: Option<InsightSections>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub ai_insights_deduped: Vec<String>,

    // List fields: ordered, deduplicated, already capped for display
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub keywords: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub industries: Vec<String>,
}

// ============ Cache Model ============

/// One cached resolution, a single slot per entity.
///
/// Valid only while the bundle fingerprint still matches and the entry is
/// younger than the TTL; either condition failing is a miss, and the slot is
/// overwritten by the next `put`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    /// Deterministic content fingerprint of the bundle that produced this.
    pub fingerprint: String,
    /// The resolved profile.
    pub profile: CanonicalCompanyProfile,
    /// Creation time; TTL is measured from here and never slides on read.
    pub created_at: DateTime<Utc>,
}

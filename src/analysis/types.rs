//! Wire records for the analysis pipeline.
//!
//! These types ARE the response contract: field names match the JSON the
//! model is instructed to produce and the JSON callers receive. Presence
//! and defaulting rules live in the schema (`#[serde(default)]`,
//! `skip_serializing_if`) rather than in scattered field checks. Model-
//! supplied free-text fields (severity, who_benefits, priority, ...) stay
//! strings; only the two closed verdict vocabularies get enum treatment,
//! with passthrough for values outside the vocabulary.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Overall recommendation for the analyzed contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Recommendation {
    Sign,
    Negotiate,
    Avoid,
    ReviewManually,
    Review,
    /// Anything else the model produced; serialized back verbatim.
    Other(String),
}

impl Recommendation {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Sign => "SIGN",
            Self::Negotiate => "NEGOTIATE",
            Self::Avoid => "AVOID",
            Self::ReviewManually => "REVIEW MANUALLY",
            Self::Review => "REVIEW",
            Self::Other(s) => s,
        }
    }
}

impl Default for Recommendation {
    fn default() -> Self {
        Self::Review
    }
}

impl From<String> for Recommendation {
    fn from(s: String) -> Self {
        match s.as_str() {
            "SIGN" => Self::Sign,
            "NEGOTIATE" => Self::Negotiate,
            "AVOID" => Self::Avoid,
            "REVIEW MANUALLY" => Self::ReviewManually,
            "REVIEW" => Self::Review,
            _ => Self::Other(s),
        }
    }
}

impl From<Recommendation> for String {
    fn from(r: Recommendation) -> String {
        r.as_str().to_string()
    }
}

/// Verdict on a revised contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Verdict {
    Accept,
    NegotiateMore,
    Reject,
    /// Anything else the model produced; serialized back verbatim.
    Other(String),
}

impl Verdict {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Accept => "ACCEPT",
            Self::NegotiateMore => "NEGOTIATE_MORE",
            Self::Reject => "REJECT",
            Self::Other(s) => s,
        }
    }
}

impl Default for Verdict {
    fn default() -> Self {
        Self::NegotiateMore
    }
}

impl From<String> for Verdict {
    fn from(s: String) -> Self {
        match s.as_str() {
            "ACCEPT" => Self::Accept,
            "NEGOTIATE_MORE" => Self::NegotiateMore,
            "REJECT" => Self::Reject,
            _ => Self::Other(s),
        }
    }
}

impl From<Verdict> for String {
    fn from(v: Verdict) -> String {
        v.as_str().to_string()
    }
}

/// Full result of analyzing one contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    /// Set only on the parse-failure fallback record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub risk_score: u8,
    pub recommendation: Recommendation,
    pub overall_summary: String,
    #[serde(default)]
    pub contract_type_detected: String,
    #[serde(default)]
    pub red_flags: Vec<RedFlag>,
    #[serde(default)]
    pub yellow_flags: Vec<YellowFlag>,
    #[serde(default)]
    pub missing_protections: Vec<String>,
    #[serde(default)]
    pub positive_aspects: Vec<String>,
    #[serde(default)]
    pub key_questions_before_signing: Vec<String>,
    #[serde(default)]
    pub negotiation_tips: Vec<String>,
    /// Absent on the fallback record, attached after every successful parse.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analysis_metadata: Option<AnalysisMetadata>,
    #[serde(default)]
    pub community_enhanced: bool,
    /// Truncated sample of the unparseable model output, fallback only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

/// A critical clause identified as high-risk to the analyzed party.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RedFlag {
    #[serde(default)]
    pub category: String,
    /// Model-supplied (HIGH/MEDIUM/CRITICAL/LOW); not validated.
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub clause_text: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub impact: String,
    #[serde(default)]
    pub questions_to_ask: Vec<String>,
    /// Attached by enrichment when the category has community data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_insights: Option<CommunityInsights>,
}

/// A moderate-concern clause, less severe than a red flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct YellowFlag {
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub severity: String,
    #[serde(default)]
    pub clause_text: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub suggestion: String,
}

/// Community statistics attached to a red flag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommunityInsights {
    pub reports: u64,
    pub severity: String,
    pub avg_financial_impact: f64,
    pub success_rate_negotiating: f64,
    pub avg_time_to_resolve_days: u32,
    pub user_outcomes: BTreeMap<String, u64>,
    pub tips: Vec<String>,
    /// First two stories only.
    pub success_stories: Vec<String>,
    pub warning_message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    pub model: String,
    /// UTC, ISO-8601 with trailing "Z".
    pub timestamp: String,
    pub total_flags: usize,
}

/// Result of comparing an original and a revised contract.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub total_changes: u32,
    #[serde(default)]
    pub changes_favoring_user: u32,
    #[serde(default)]
    pub changes_favoring_other: u32,
    #[serde(default)]
    pub neutral_changes: u32,
    #[serde(default)]
    pub overall_verdict: Verdict,
    #[serde(default)]
    pub verdict_explanation: String,
    #[serde(default)]
    pub changes: Vec<ContractChange>,
    #[serde(default)]
    pub addressed_concerns: Vec<String>,
    #[serde(default)]
    pub ignored_concerns: Vec<String>,
    #[serde(default)]
    pub new_issues: Vec<String>,
    #[serde(default)]
    pub recommendation: String,
    #[serde(default)]
    pub next_steps: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comparison_metadata: Option<ComparisonMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

/// One changed clause between contract versions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContractChange {
    #[serde(default)]
    pub section: String,
    #[serde(default)]
    pub change_type: String,
    #[serde(default)]
    pub original_text: String,
    #[serde(default)]
    pub revised_text: String,
    #[serde(default)]
    pub who_benefits: String,
    #[serde(default)]
    pub benefit_level: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub impact: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComparisonMetadata {
    pub user_side: String,
    pub timestamp: String,
}

/// Negotiation package generated from an analysis's worst red flags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CounterProposal {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default)]
    pub revised_clauses: Vec<RevisedClause>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email_template: Option<EmailTemplate>,
    #[serde(default)]
    pub talking_points: Vec<TalkingPoint>,
    #[serde(default)]
    pub compromise_options: Vec<CompromiseOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub negotiation_strategy: Option<NegotiationStrategy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_probability: Option<SuccessProbability>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proposal_metadata: Option<ProposalMetadata>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_response: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RevisedClause {
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub original_clause: String,
    #[serde(default)]
    pub revised_clause: String,
    #[serde(default)]
    pub justification: String,
    #[serde(default)]
    pub legal_basis: String,
    #[serde(default)]
    pub priority: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmailTemplate {
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub greeting: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tone: String,
    #[serde(default)]
    pub estimated_response_time: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TalkingPoint {
    #[serde(default)]
    pub issue: String,
    #[serde(default)]
    pub your_position: String,
    #[serde(default)]
    pub key_argument: String,
    #[serde(default)]
    pub supporting_evidence: String,
    #[serde(default)]
    pub response_to_objections: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompromiseOption {
    #[serde(default)]
    pub if_they_say: String,
    #[serde(default)]
    pub you_respond: String,
    #[serde(default)]
    pub middle_ground: String,
    #[serde(default)]
    pub likelihood_of_success: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NegotiationStrategy {
    #[serde(default)]
    pub approach: String,
    #[serde(default)]
    pub key_principles: Vec<String>,
    #[serde(default)]
    pub things_to_avoid: Vec<String>,
    #[serde(default)]
    pub timeline: String,
    #[serde(default)]
    pub when_to_walk_away: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SuccessProbability {
    #[serde(default)]
    pub overall_estimate: String,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub factors_in_your_favor: Vec<String>,
    #[serde(default)]
    pub challenges: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProposalMetadata {
    pub generated_for: String,
    pub timestamp: String,
    pub red_flags_addressed: usize,
}

/// Caller-supplied identity for counter-proposal personalization.
/// Absent fields get defaults when the proposal is generated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(default)]
    pub user_name: Option<String>,
    #[serde(default)]
    pub other_party_name: Option<String>,
    #[serde(default)]
    pub user_role: Option<String>,
    #[serde(default)]
    pub contract_type: Option<String>,
}

impl UserInfo {
    /// Fill defaults and resolve the contract type against the analysis.
    pub(crate) fn resolved(&self, analysis: &AnalysisReport) -> ResolvedUserInfo {
        let contract_type = self
            .contract_type
            .clone()
            .or_else(|| {
                (!analysis.contract_type_detected.is_empty())
                    .then(|| analysis.contract_type_detected.clone())
            })
            .unwrap_or_else(|| "contract".to_string());

        ResolvedUserInfo {
            user_name: self
                .user_name
                .clone()
                .unwrap_or_else(|| "Your Name".to_string()),
            other_party_name: self
                .other_party_name
                .clone()
                .unwrap_or_else(|| "Other Party".to_string()),
            user_role: self
                .user_role
                .clone()
                .unwrap_or_else(|| "tenant".to_string()),
            contract_type,
        }
    }
}

/// [`UserInfo`] with every field defaulted.
pub(crate) struct ResolvedUserInfo {
    pub user_name: String,
    pub other_party_name: String,
    pub user_role: String,
    pub contract_type: String,
}

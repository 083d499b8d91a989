//! Model-response parsing — fence stripping, schema repair, fallbacks.
//!
//! The `parse_*` functions never fail. Output that cannot be parsed as a
//! JSON object (or does not fit the schema) becomes a fallback record
//! carrying an error marker and a truncated sample of the raw text; an
//! analysis missing a required field gets that field defaulted with a
//! warning. Transport problems are the client's concern — by the time
//! text reaches this module the only failure mode is shape.

use chrono::{SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde_json::{json, Map, Value};
use tracing::{error, warn};

use super::types::{
    AnalysisMetadata, AnalysisReport, ComparisonReport, CounterProposal, Recommendation,
};

/// How much of an unparseable response is kept on the fallback record.
const RAW_SAMPLE_CHARS: usize = 1000;
/// Sample length used in error logs.
const LOG_SAMPLE_CHARS: usize = 200;

/// Error marker set on every fallback record.
pub(crate) const PARSE_FAILURE: &str = "Failed to parse analysis";

/// Summary used when no analysis could be produced at all.
pub(crate) const FALLBACK_SUMMARY: &str =
    "Unable to complete automated analysis. Please review this contract with a legal professional.";

/// Summary injected when the model omitted `overall_summary`.
pub(crate) const DEFAULT_SUMMARY: &str = "Analysis incomplete. Please review manually.";

/// Parse a raw analysis response into a usable report. Never fails.
pub fn parse_analysis(raw: &str, model: &str) -> AnalysisReport {
    let Some(mut fields) = parse_object(raw) else {
        return analysis_fallback(raw);
    };

    repair_required_fields(&mut fields);

    let mut report: AnalysisReport = match serde_json::from_value(Value::Object(fields)) {
        Ok(report) => report,
        Err(e) => {
            error!("model response does not fit the analysis schema: {}", e);
            return analysis_fallback(raw);
        }
    };

    let total_flags = report.red_flags.len() + report.yellow_flags.len();
    report.analysis_metadata = Some(AnalysisMetadata {
        model: model.to_string(),
        timestamp: utc_timestamp(),
        total_flags,
    });
    report
}

/// Parse a raw comparison response. Never fails.
pub fn parse_comparison(raw: &str) -> ComparisonReport {
    parse_payload(raw, "comparison").unwrap_or_else(|| ComparisonReport {
        error: Some(PARSE_FAILURE.to_string()),
        summary: FALLBACK_SUMMARY.to_string(),
        raw_response: Some(truncate_chars(raw, RAW_SAMPLE_CHARS)),
        ..ComparisonReport::default()
    })
}

/// Parse a raw counter-proposal response. Never fails.
pub fn parse_counter_proposal(raw: &str) -> CounterProposal {
    parse_payload(raw, "counter-proposal").unwrap_or_else(|| CounterProposal {
        error: Some(PARSE_FAILURE.to_string()),
        raw_response: Some(truncate_chars(raw, RAW_SAMPLE_CHARS)),
        ..CounterProposal::default()
    })
}

/// Current UTC time, ISO-8601 with a trailing "Z".
pub(crate) fn utc_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Shared happy path for the shapes without required-field repair.
fn parse_payload<T: DeserializeOwned>(raw: &str, what: &str) -> Option<T> {
    let fields = parse_object(raw)?;
    match serde_json::from_value(Value::Object(fields)) {
        Ok(payload) => Some(payload),
        Err(e) => {
            error!("model response does not fit the {} schema: {}", what, e);
            None
        }
    }
}

/// Strip the raw text down to a JSON object, or log why it couldn't be.
fn parse_object(raw: &str) -> Option<Map<String, Value>> {
    let text = strip_code_fences(raw);
    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(fields)) => Some(fields),
        Ok(_) => {
            error!(
                "model response is valid JSON but not an object; sample: {:?}",
                truncate_chars(raw, LOG_SAMPLE_CHARS)
            );
            None
        }
        Err(e) => {
            error!(
                "failed to parse model response as JSON: {}; sample: {:?}",
                e,
                truncate_chars(raw, LOG_SAMPLE_CHARS)
            );
            None
        }
    }
}

/// Remove a leading ```json / ``` fence and a trailing ``` fence.
///
/// Exact prefix/suffix stripping only — not markdown parsing.
fn strip_code_fences(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```json") {
        text = rest;
    } else if let Some(rest) = text.strip_prefix("```") {
        text = rest;
    }
    if let Some(rest) = text.strip_suffix("```") {
        text = rest;
    }
    text.trim()
}

/// Inject documented defaults for required analysis fields the model
/// omitted, warning per field. Non-fatal by design.
fn repair_required_fields(fields: &mut Map<String, Value>) {
    if !fields.contains_key("risk_score") {
        warn!("model response missing required field: risk_score");
        fields.insert("risk_score".to_string(), json!(5));
    }
    if !fields.contains_key("recommendation") {
        warn!("model response missing required field: recommendation");
        fields.insert(
            "recommendation".to_string(),
            json!(Recommendation::Review.as_str()),
        );
    }
    if !fields.contains_key("overall_summary") {
        warn!("model response missing required field: overall_summary");
        fields.insert("overall_summary".to_string(), json!(DEFAULT_SUMMARY));
    }
}

fn analysis_fallback(raw: &str) -> AnalysisReport {
    AnalysisReport {
        error: Some(PARSE_FAILURE.to_string()),
        risk_score: 5,
        recommendation: Recommendation::ReviewManually,
        overall_summary: FALLBACK_SUMMARY.to_string(),
        raw_response: Some(truncate_chars(raw, RAW_SAMPLE_CHARS)),
        ..AnalysisReport::default()
    }
}

/// First `limit` characters of `text` (character-based, not bytes).
fn truncate_chars(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::types::Verdict;

    const FULL_ANALYSIS: &str = r#"{
        "risk_score": 7,
        "recommendation": "NEGOTIATE",
        "overall_summary": "Several one-sided clauses.",
        "contract_type_detected": "rental",
        "red_flags": [
            {
                "category": "Hidden Fees",
                "severity": "HIGH",
                "clause_text": "Tenant shall pay all fees as determined by Landlord.",
                "location": "Section 4",
                "explanation": "Fees are open-ended.",
                "impact": "Unbounded costs.",
                "questions_to_ask": ["What fees exactly?"]
            }
        ],
        "yellow_flags": [
            {
                "category": "Vague Language",
                "severity": "MEDIUM",
                "clause_text": "Reasonable wear and tear excepted.",
                "location": "Section 9",
                "explanation": "Undefined standard.",
                "suggestion": "Define wear and tear."
            }
        ],
        "missing_protections": ["No grace period"],
        "positive_aspects": ["Deposit is refundable"],
        "key_questions_before_signing": ["Who pays utilities?"],
        "negotiation_tips": ["Cap the fees"]
    }"#;

    #[test]
    fn fenced_and_unfenced_responses_parse_identically() {
        let fenced = format!("```json\n{}\n```", FULL_ANALYSIS);
        let plain = parse_analysis(FULL_ANALYSIS, "test-model");
        let stripped = parse_analysis(&fenced, "test-model");

        // Metadata timestamps differ; everything else must match.
        assert_eq!(plain.risk_score, stripped.risk_score);
        assert_eq!(plain.recommendation, stripped.recommendation);
        assert_eq!(plain.overall_summary, stripped.overall_summary);
        assert_eq!(plain.red_flags, stripped.red_flags);
        assert_eq!(plain.yellow_flags, stripped.yellow_flags);
    }

    #[test]
    fn bare_fence_without_language_tag_is_stripped() {
        let fenced = format!("```\n{}\n```", FULL_ANALYSIS);
        let report = parse_analysis(&fenced, "test-model");
        assert_eq!(report.risk_score, 7);
        assert_eq!(report.recommendation, Recommendation::Negotiate);
        assert!(report.error.is_none());
    }

    #[test]
    fn full_response_parses_with_metadata() {
        let report = parse_analysis(FULL_ANALYSIS, "gemini-2.0-flash-exp");
        assert_eq!(report.risk_score, 7);
        assert_eq!(report.contract_type_detected, "rental");
        assert_eq!(report.red_flags.len(), 1);
        assert_eq!(report.red_flags[0].category, "Hidden Fees");
        assert_eq!(report.yellow_flags.len(), 1);

        let metadata = report.analysis_metadata.expect("metadata attached");
        assert_eq!(metadata.model, "gemini-2.0-flash-exp");
        assert_eq!(metadata.total_flags, 2);
        assert!(metadata.timestamp.ends_with('Z'));
    }

    #[test]
    fn invalid_json_returns_fallback() {
        let report = parse_analysis("I'm sorry, I can't analyze that contract.", "test-model");
        assert_eq!(report.error.as_deref(), Some(PARSE_FAILURE));
        assert_eq!(report.risk_score, 5);
        assert_eq!(report.recommendation, Recommendation::ReviewManually);
        assert_eq!(report.overall_summary, FALLBACK_SUMMARY);
        assert!(report.red_flags.is_empty());
        assert!(report.yellow_flags.is_empty());
        assert!(report.analysis_metadata.is_none());
        assert_eq!(
            report.raw_response.as_deref(),
            Some("I'm sorry, I can't analyze that contract.")
        );
    }

    #[test]
    fn fallback_truncates_raw_response_to_1000_chars() {
        let raw = "x".repeat(1500);
        let report = parse_analysis(&raw, "test-model");
        assert_eq!(report.raw_response.as_deref().map(str::len), Some(1000));
    }

    #[test]
    fn non_object_json_returns_fallback() {
        for raw in ["[1, 2, 3]", "42", "\"just a string\""] {
            let report = parse_analysis(raw, "test-model");
            assert_eq!(report.recommendation, Recommendation::ReviewManually);
            assert_eq!(report.error.as_deref(), Some(PARSE_FAILURE));
        }
    }

    #[test]
    fn schema_mismatch_returns_fallback() {
        // risk_score as a string does not fit the schema.
        let raw = r#"{"risk_score": "seven", "recommendation": "SIGN", "overall_summary": "ok"}"#;
        let report = parse_analysis(raw, "test-model");
        assert_eq!(report.error.as_deref(), Some(PARSE_FAILURE));
        assert_eq!(report.risk_score, 5);
    }

    #[test]
    fn missing_overall_summary_gets_documented_default() {
        let raw = r#"{"risk_score": 4, "recommendation": "SIGN"}"#;
        let report = parse_analysis(raw, "test-model");
        assert_eq!(report.overall_summary, DEFAULT_SUMMARY);
        assert_eq!(report.risk_score, 4);
        assert_eq!(report.recommendation, Recommendation::Sign);
        assert!(report.error.is_none(), "defaulting is not a failure");
    }

    #[test]
    fn all_required_fields_defaulted_when_missing() {
        let report = parse_analysis("{}", "test-model");
        assert_eq!(report.risk_score, 5);
        assert_eq!(report.recommendation, Recommendation::Review);
        assert_eq!(report.overall_summary, DEFAULT_SUMMARY);
        assert!(report.red_flags.is_empty());
        assert!(report.yellow_flags.is_empty());

        let metadata = report.analysis_metadata.expect("metadata still attached");
        assert_eq!(metadata.total_flags, 0);
    }

    #[test]
    fn flag_arrays_default_to_empty_without_warning_path() {
        let raw = r#"{"risk_score": 2, "recommendation": "SIGN", "overall_summary": "Fine."}"#;
        let report = parse_analysis(raw, "test-model");
        assert!(report.red_flags.is_empty());
        assert!(report.yellow_flags.is_empty());
    }

    #[test]
    fn unvalidated_severity_passes_through() {
        let raw = r#"{
            "risk_score": 9,
            "recommendation": "AVOID",
            "overall_summary": "Bad.",
            "red_flags": [{"category": "Penalties", "severity": "EXTREME"}]
        }"#;
        let report = parse_analysis(raw, "test-model");
        assert_eq!(report.red_flags[0].severity, "EXTREME");
    }

    #[test]
    fn comparison_parses_and_verdict_maps() {
        let raw = r#"```json
        {
            "summary": "Two changes, one favoring you.",
            "total_changes": 2,
            "changes_favoring_user": 1,
            "changes_favoring_other": 1,
            "neutral_changes": 0,
            "overall_verdict": "NEGOTIATE_MORE",
            "verdict_explanation": "The late fee is still high.",
            "changes": [
                {
                    "section": "Section 5 - Late Fees",
                    "change_type": "modified",
                    "original_text": "$150 late fee",
                    "revised_text": "$100 late fee",
                    "who_benefits": "tenant",
                    "benefit_level": "minor",
                    "explanation": "Fee reduced but still above market.",
                    "impact": "positive"
                }
            ],
            "addressed_concerns": ["Late fee reduced"],
            "ignored_concerns": ["Automatic renewal still present"],
            "new_issues": [],
            "recommendation": "Push once more on the late fee.",
            "next_steps": ["Ask for $50 cap"]
        }
        ```"#;
        let comparison = parse_comparison(raw);
        assert!(comparison.error.is_none());
        assert_eq!(comparison.total_changes, 2);
        assert_eq!(comparison.overall_verdict, Verdict::NegotiateMore);
        assert_eq!(comparison.changes.len(), 1);
        assert_eq!(comparison.changes[0].who_benefits, "tenant");
        assert!(comparison.comparison_metadata.is_none(), "attached later");
    }

    #[test]
    fn malformed_comparison_returns_fallback() {
        let comparison = parse_comparison("not json at all");
        assert_eq!(comparison.error.as_deref(), Some(PARSE_FAILURE));
        assert_eq!(comparison.summary, FALLBACK_SUMMARY);
        assert_eq!(comparison.raw_response.as_deref(), Some("not json at all"));
        assert!(comparison.changes.is_empty());
    }

    #[test]
    fn counter_proposal_parses() {
        let raw = r#"{
            "revised_clauses": [
                {
                    "issue": "Security Deposit",
                    "original_clause": "Deposit is non-refundable.",
                    "revised_clause": "Deposit refundable within 30 days.",
                    "justification": "Standard practice.",
                    "legal_basis": "State tenant law.",
                    "priority": "high"
                }
            ],
            "email_template": {
                "subject": "Contract Review - Proposed Amendments",
                "greeting": "Dear [Other Party Name],",
                "body": "Dear [Other Party Name], I am writing...",
                "tone": "professional_friendly",
                "estimated_response_time": "2-5 business days"
            },
            "talking_points": [],
            "compromise_options": []
        }"#;
        let proposal = parse_counter_proposal(raw);
        assert!(proposal.error.is_none());
        assert_eq!(proposal.revised_clauses.len(), 1);
        let email = proposal.email_template.expect("template present");
        assert_eq!(email.tone, "professional_friendly");
        assert!(proposal.proposal_metadata.is_none(), "attached later");
    }

    #[test]
    fn malformed_counter_proposal_returns_fallback() {
        let proposal = parse_counter_proposal("```json\n{broken\n```");
        assert_eq!(proposal.error.as_deref(), Some(PARSE_FAILURE));
        assert!(proposal.email_template.is_none());
        assert_eq!(proposal.raw_response.as_deref(), Some("```json\n{broken\n```"));
    }

    #[test]
    fn fence_stripping_is_exact_prefix_suffix() {
        assert_eq!(strip_code_fences("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("```\n{}\n```"), "{}");
        assert_eq!(strip_code_fences("  {}  "), "{}");
        // A fence in the middle is not stripped.
        assert_eq!(
            strip_code_fences("prefix ```json\n{}\n```"),
            "prefix ```json\n{}"
        );
    }
}

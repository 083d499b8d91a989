//! Top-level contract analysis pipeline.
//!
//! Each entry point runs the same sequential shape: build prompt, call
//! the injected model client, parse the raw text, then post-process
//! (enrichment or metadata). Client errors propagate unchanged — no
//! retry, no caller-side timeout. Calls are independent and stateless
//! apart from the shared read-only community store, so concurrent
//! requests need no coordination.

use std::sync::Arc;

use tracing::info;

use super::enrich::CommunityEnricher;
use super::parser;
use super::prompt;
use super::types::{
    AnalysisReport, ComparisonMetadata, ComparisonReport, CounterProposal, ProposalMetadata,
    UserInfo,
};
use crate::community::CommunityStore;
use crate::llm::{LlmClient, LlmError};

/// Contract analyzer: the model client plus the community dataset.
pub struct ContractAnalyzer {
    client: Arc<dyn LlmClient>,
    enricher: CommunityEnricher,
}

impl ContractAnalyzer {
    /// Analyzer over the built-in community dataset.
    pub fn new(client: Arc<dyn LlmClient>) -> Self {
        Self::with_store(client, CommunityStore::builtin())
    }

    /// Analyzer with a caller-supplied community dataset.
    pub fn with_store(client: Arc<dyn LlmClient>, store: Arc<CommunityStore>) -> Self {
        Self {
            client,
            enricher: CommunityEnricher::new(store),
        }
    }

    /// Analyze a contract: model call, schema repair, community enrichment.
    pub async fn analyze(
        &self,
        contract_text: &str,
        contract_type: Option<&str>,
    ) -> Result<AnalysisReport, LlmError> {
        info!(
            "analyzing contract ({} chars, type hint: {})",
            contract_text.chars().count(),
            contract_type.unwrap_or("none"),
        );

        let prompt = prompt::analysis_prompt(contract_text, contract_type);
        let raw = self.client.generate(&prompt).await?;
        let report = parser::parse_analysis(&raw, self.client.model_id());
        Ok(self.enricher.enrich(report))
    }

    /// Compare two contract versions from the given side's perspective.
    pub async fn compare(
        &self,
        original: &str,
        revised: &str,
        user_side: &str,
    ) -> Result<ComparisonReport, LlmError> {
        info!("comparing contracts for {}", user_side);

        let prompt = prompt::comparison_prompt(original, revised, user_side);
        let raw = self.client.generate(&prompt).await?;
        let mut comparison = parser::parse_comparison(&raw);
        comparison.comparison_metadata = Some(ComparisonMetadata {
            user_side: user_side.to_string(),
            timestamp: parser::utc_timestamp(),
        });
        Ok(comparison)
    }

    /// Generate a negotiation package for the analysis's worst red flags.
    ///
    /// user_info gaps are filled with defaults before the prompt is built;
    /// placeholder substitution runs on the parsed email body afterwards.
    pub async fn counter_propose(
        &self,
        analysis: &AnalysisReport,
        user_info: &UserInfo,
    ) -> Result<CounterProposal, LlmError> {
        let user = user_info.resolved(analysis);
        let flags_addressed = analysis
            .red_flags
            .len()
            .min(prompt::COUNTER_PROPOSAL_FLAG_LIMIT);

        info!(
            "generating counter-proposal for {} addressing {} red flags",
            user.user_role, flags_addressed,
        );

        let prompt = prompt::counter_proposal_prompt(
            &analysis.red_flags,
            &user.contract_type,
            &user.user_role,
        );
        let raw = self.client.generate(&prompt).await?;
        let mut proposal = parser::parse_counter_proposal(&raw);

        if let Some(email) = proposal.email_template.as_mut() {
            // [Other Party Name] before [Other Party]: the shorter token is
            // a prefix of the longer one.
            email.body = email
                .body
                .replace("[Your Name]", &user.user_name)
                .replace("[Other Party Name]", &user.other_party_name)
                .replace("[Other Party]", &user.other_party_name);
        }

        proposal.proposal_metadata = Some(ProposalMetadata {
            generated_for: user.user_name,
            timestamp: parser::utc_timestamp(),
            red_flags_addressed: flags_addressed,
        });
        Ok(proposal)
    }
}

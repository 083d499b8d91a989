//! Contract analysis pipeline.
//!
//! Everything between raw contract text and the structured report a
//! caller receives:
//!
//! - **prompt**: deterministic prompt construction for the three model
//!   operations (analyze / compare / counter-propose)
//! - **parser**: fence stripping, schema repair, and fallback records for
//!   malformed model output — parsing never fails
//! - **enrich**: merges community statistics into flagged issues
//! - **orchestrator**: `ContractAnalyzer`, the entry point sequencing
//!   prompt → model call → parse → enrich
//!
//! The model itself is an injected [`crate::llm::LlmClient`]; swap in
//! [`crate::llm::MockClient`] to drive the pipeline in tests.

mod enrich;
mod orchestrator;
mod parser;
mod prompt;
mod types;

pub use enrich::CommunityEnricher;
pub use orchestrator::ContractAnalyzer;
pub use parser::{parse_analysis, parse_comparison, parse_counter_proposal};
pub use prompt::{analysis_prompt, comparison_prompt, counter_proposal_prompt};
pub use types::{
    AnalysisMetadata, AnalysisReport, CommunityInsights, ComparisonMetadata, ComparisonReport,
    CompromiseOption, ContractChange, CounterProposal, EmailTemplate, NegotiationStrategy,
    ProposalMetadata, Recommendation, RedFlag, RevisedClause, SuccessProbability, TalkingPoint,
    UserInfo, Verdict, YellowFlag,
};

//! Clauseguard: contract risk analysis engine.
//!
//! Extracts legal risk from contract text via an LLM under a strict JSON
//! response contract, repairs or falls back on malformed model output,
//! and enriches flagged clauses with a static community-statistics
//! dataset.
//!
//! # Core Concepts
//!
//! - **Red / yellow flags**: high-risk and moderate-concern clauses the
//!   model quotes verbatim and explains
//! - **Fallback record**: the safe structured result returned when model
//!   output cannot be parsed — parsing never fails
//! - **Community insights**: historical negotiation outcomes per clause
//!   category, merged in deterministically after the model call
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use clauseguard::{ContractAnalyzer, MockClient};
//!
//! # tokio_test::block_on(async {
//! let client = Arc::new(MockClient::replying(
//!     r#"{"risk_score": 2, "recommendation": "SIGN", "overall_summary": "Fair."}"#,
//! ));
//! let analyzer = ContractAnalyzer::new(client);
//! let report = analyzer.analyze("THE PARTIES AGREE...", None).await.unwrap();
//! assert_eq!(report.risk_score, 2);
//! # });
//! ```

pub mod analysis;
pub mod community;
pub mod gemini;
pub mod llm;

pub use analysis::{
    AnalysisReport, ComparisonReport, ContractAnalyzer, CounterProposal, Recommendation, RedFlag,
    UserInfo, Verdict, YellowFlag,
};
pub use community::{CommunityEntry, CommunityStats, CommunityStore};
pub use gemini::GeminiClient;
pub use llm::{LlmClient, LlmError, MockClient};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

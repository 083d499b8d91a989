//! Community enrichment — merges dataset statistics into flagged issues.
//!
//! A pure transform over the report: red flags whose category matches a
//! dataset entry get a `community_insights` record attached; the rest are
//! left untouched. The store itself is never mutated.

use std::sync::Arc;

use super::types::{AnalysisReport, CommunityInsights};
use crate::community::{CommunityEntry, CommunityStore};

/// Number of success stories surfaced per flag.
const STORY_LIMIT: usize = 2;

/// Attaches community statistics to red flags by category lookup.
pub struct CommunityEnricher {
    store: Arc<CommunityStore>,
}

impl CommunityEnricher {
    pub fn new(store: Arc<CommunityStore>) -> Self {
        Self { store }
    }

    /// Enrich every red flag with a known category.
    ///
    /// Flag order is preserved. The report is marked community-enhanced
    /// even when nothing matched.
    pub fn enrich(&self, mut report: AnalysisReport) -> AnalysisReport {
        for flag in &mut report.red_flags {
            if let Some(entry) = self.store.lookup(&flag.category) {
                flag.community_insights = Some(insights_for(entry));
            }
        }
        report.community_enhanced = true;
        report
    }
}

fn insights_for(entry: &CommunityEntry) -> CommunityInsights {
    CommunityInsights {
        reports: entry.reports,
        severity: entry.severity.clone(),
        avg_financial_impact: entry.avg_financial_impact,
        success_rate_negotiating: entry.success_rate_negotiating,
        avg_time_to_resolve_days: entry.avg_time_to_resolve_days,
        user_outcomes: entry.user_outcomes.clone(),
        tips: entry.tips.clone(),
        success_stories: entry
            .success_stories
            .iter()
            .take(STORY_LIMIT)
            .cloned()
            .collect(),
        warning_message: entry.warning_message(),
    }
}

//! Community-reported clause statistics.
//!
//! A static reference dataset mapping red-flag categories to aggregated
//! negotiation outcomes, embedded at compile time and parsed once per
//! process. Entries are held in definition order — lookup precedence
//! depends on it.
//!
//! Matching is deliberately loose and unscored: exact key match, then one
//! substring pass over all keys, then one keyword pass. The first
//! structurally matching entry wins, not the best match. Callers depend on
//! this precedence; do not replace it with a scored matcher.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock};

const DATASET: &str = include_str!("../data/community.json");

/// Fixed values carried on the stats surface. These were never derived
/// from the dataset; they describe the reporting population itself.
const ACTIVE_USERS: u64 = 14523;
const AVG_RESPONSE_TIME_HOURS: f64 = 0.5;

/// How many entries the stats surface ranks.
const TOP_ISSUE_COUNT: usize = 5;

/// One dataset entry: a clause category with its reported outcomes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommunityEntry {
    /// Lowercase category key; also the source of fuzzy-match keywords.
    pub key: String,
    pub reports: u64,
    pub severity: String,
    pub avg_financial_impact: f64,
    pub success_rate_negotiating: f64,
    pub common_in: Vec<String>,
    pub user_outcomes: BTreeMap<String, u64>,
    pub avg_time_to_resolve_days: u32,
    pub tips: Vec<String>,
    pub success_stories: Vec<String>,
}

impl CommunityEntry {
    /// Reported count of successful negotiations, 0 when the outcome is
    /// absent for this entry.
    pub fn negotiated_successfully(&self) -> u64 {
        self.user_outcomes
            .get("negotiated_successfully")
            .copied()
            .unwrap_or(0)
    }

    /// Single-line warning derived from this entry's statistics.
    ///
    /// Severity picks the prefix (CRITICAL ALERT / HIGH RISK / CAUTION);
    /// the impact clause is appended only when avg_financial_impact > 0.
    pub fn warning_message(&self) -> String {
        let level = match self.severity.as_str() {
            "CRITICAL" => "CRITICAL ALERT",
            "HIGH" => "HIGH RISK",
            _ => "CAUTION",
        };
        let success_pct = (self.success_rate_negotiating * 100.0).round() as i64;

        let mut warning = format!(
            "{}: {} users reported similar issues. {}% successfully negotiated this clause.",
            level,
            format_thousands(self.reports),
            success_pct,
        );
        if self.avg_financial_impact > 0.0 {
            warning.push_str(&format!(
                " Average impact: ${}.",
                format_thousands(self.avg_financial_impact as u64)
            ));
        }
        warning
    }
}

/// Aggregated statistics over the whole dataset.
#[derive(Debug, Clone, Serialize)]
pub struct CommunityStats {
    pub total_contracts_analyzed: u64,
    pub total_successful_negotiations: u64,
    pub total_money_saved: i64,
    pub overall_success_rate: f64,
    pub top_issues: Vec<TopIssue>,
    pub active_users: u64,
    pub avg_response_time_hours: f64,
}

/// One ranked entry in [`CommunityStats::top_issues`].
#[derive(Debug, Clone, Serialize)]
pub struct TopIssue {
    pub issue: String,
    pub reports: u64,
    pub severity: String,
    pub avg_impact: f64,
    pub success_rate: f64,
}

/// Read-only store of community entries.
pub struct CommunityStore {
    entries: Vec<CommunityEntry>,
}

impl CommunityStore {
    /// The built-in dataset, parsed once per process and shared.
    pub fn builtin() -> Arc<CommunityStore> {
        static STORE: OnceLock<Arc<CommunityStore>> = OnceLock::new();
        STORE
            .get_or_init(|| {
                let entries: Vec<CommunityEntry> = serde_json::from_str(DATASET)
                    .expect("embedded community dataset should be valid JSON");
                Arc::new(CommunityStore { entries })
            })
            .clone()
    }

    /// A store over a caller-supplied dataset. Iteration (and therefore
    /// lookup precedence) follows the order of `entries`.
    pub fn new(entries: Vec<CommunityEntry>) -> Self {
        Self { entries }
    }

    /// All entries in dataset order.
    pub fn entries(&self) -> &[CommunityEntry] {
        &self.entries
    }

    /// Find the entry for a red-flag category.
    ///
    /// In order, first hit wins:
    /// 1. exact match of the lowercased category against keys
    /// 2. substring containment in either direction, keys in dataset order
    /// 3. any whitespace-split keyword of a key contained in the category
    pub fn lookup(&self, category: &str) -> Option<&CommunityEntry> {
        let category = category.to_lowercase();

        if let Some(entry) = self.entries.iter().find(|e| e.key == category) {
            return Some(entry);
        }

        if let Some(entry) = self
            .entries
            .iter()
            .find(|e| category.contains(&e.key) || e.key.contains(&category))
        {
            return Some(entry);
        }

        self.entries
            .iter()
            .find(|e| e.key.split_whitespace().any(|kw| category.contains(kw)))
    }

    /// Aggregate the dataset into overall statistics.
    pub fn aggregate(&self) -> CommunityStats {
        let total_reports: u64 = self.entries.iter().map(|e| e.reports).sum();
        let total_successful: u64 = self
            .entries
            .iter()
            .map(|e| e.negotiated_successfully())
            .sum();
        let total_money_saved: f64 = self
            .entries
            .iter()
            .map(|e| e.reports as f64 * e.avg_financial_impact * e.success_rate_negotiating)
            .sum();

        let overall_success_rate = if total_reports == 0 {
            0.0
        } else {
            round2(total_successful as f64 / total_reports as f64)
        };

        let mut ranked: Vec<&CommunityEntry> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.reports.cmp(&a.reports));
        let top_issues = ranked
            .into_iter()
            .take(TOP_ISSUE_COUNT)
            .map(|e| TopIssue {
                issue: title_case(&e.key.replace('_', " ")),
                reports: e.reports,
                severity: e.severity.clone(),
                avg_impact: e.avg_financial_impact,
                success_rate: e.success_rate_negotiating,
            })
            .collect();

        CommunityStats {
            total_contracts_analyzed: total_reports,
            total_successful_negotiations: total_successful,
            total_money_saved: total_money_saved as i64,
            overall_success_rate,
            top_issues,
            active_users: ACTIVE_USERS,
            avg_response_time_hours: AVG_RESPONSE_TIME_HOURS,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Group digits with commas: 4156 → "4,156".
fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

/// Uppercase the first letter of every word, lowercase the rest.
/// A word starts after any non-alphabetic character.
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut boundary = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if boundary {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            boundary = false;
        } else {
            boundary = true;
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_lookup_returns_entry() {
        let store = CommunityStore::builtin();
        let entry = store
            .lookup("non-refundable security deposit")
            .expect("exact key should match");
        assert_eq!(entry.reports, 2847);
        assert_eq!(entry.severity, "HIGH");
    }

    #[test]
    fn exact_lookup_is_case_insensitive() {
        let store = CommunityStore::builtin();
        let entry = store
            .lookup("Waiver Of Legal Rights")
            .expect("mixed case should match");
        assert_eq!(entry.key, "waiver of legal rights");
    }

    #[test]
    fn substring_match_finds_entry_with_extra_words() {
        let store = CommunityStore::builtin();
        let entry = store
            .lookup("Automatic Renewal Policy")
            .expect("category containing a key should match");
        assert_eq!(entry.key, "automatic renewal");
        assert_eq!(entry.reports, 3421);
    }

    #[test]
    fn keyword_match_falls_back_to_split_keys() {
        // No key is a substring of "landlord entry rights", but the
        // "unlimited landlord entry" keywords are.
        let store = CommunityStore::builtin();
        let entry = store
            .lookup("Landlord Entry Rights")
            .expect("keyword should match");
        assert_eq!(entry.key, "unlimited landlord entry");
        assert_eq!(entry.reports, 1923);
    }

    #[test]
    fn lookup_miss_returns_none() {
        let store = CommunityStore::builtin();
        assert!(store.lookup("payment schedule").is_none());
    }

    #[test]
    fn lookup_precedence_follows_dataset_order() {
        // Both "late" keys would keyword-match; the earlier entry wins.
        let entries = vec![
            entry_with_key("excessive late fees", 10),
            entry_with_key("late payment penalty", 20),
        ];
        let store = CommunityStore::new(entries);
        let hit = store.lookup("late delivery").expect("keyword match");
        assert_eq!(hit.key, "excessive late fees");
    }

    #[test]
    fn aggregate_pins_dataset_totals() {
        let stats = CommunityStore::builtin().aggregate();
        assert_eq!(stats.total_contracts_analyzed, 20578);
        assert_eq!(stats.total_successful_negotiations, 12638);
        assert_eq!(stats.overall_success_rate, 0.61);
        assert_eq!(stats.total_money_saved, 16_490_840);
    }

    #[test]
    fn aggregate_ranks_top_issues_by_reports() {
        let stats = CommunityStore::builtin().aggregate();
        assert_eq!(stats.top_issues.len(), 5);

        let reports: Vec<u64> = stats.top_issues.iter().map(|i| i.reports).collect();
        assert_eq!(reports, vec![4156, 3421, 2847, 2567, 2134]);

        let top = &stats.top_issues[0];
        assert_eq!(top.issue, "Waiver Of Legal Rights");
        assert_eq!(top.severity, "CRITICAL");
        assert_eq!(top.avg_impact, 2500.0);
        assert_eq!(top.success_rate, 0.42);
    }

    #[test]
    fn aggregate_carries_population_constants() {
        let stats = CommunityStore::builtin().aggregate();
        assert_eq!(stats.active_users, 14523);
        assert_eq!(stats.avg_response_time_hours, 0.5);
    }

    #[test]
    fn warning_message_critical_includes_impact() {
        let store = CommunityStore::builtin();
        let entry = store.lookup("waiver of legal rights").unwrap();
        let warning = entry.warning_message();
        assert!(warning.starts_with("CRITICAL ALERT"), "got: {}", warning);
        assert_eq!(
            warning,
            "CRITICAL ALERT: 4,156 users reported similar issues. \
             42% successfully negotiated this clause. Average impact: $2,500."
        );
    }

    #[test]
    fn warning_message_omits_zero_impact() {
        let store = CommunityStore::builtin();
        let entry = store.lookup("unlimited landlord entry").unwrap();
        let warning = entry.warning_message();
        assert!(warning.starts_with("HIGH RISK"));
        assert!(warning.contains("1,923 users"));
        assert!(warning.contains("81% successfully"));
        assert!(!warning.contains("Average impact"));
    }

    #[test]
    fn warning_message_medium_severity_is_caution() {
        let store = CommunityStore::builtin();
        let entry = store.lookup("excessive late fees").unwrap();
        let warning = entry.warning_message();
        assert!(warning.starts_with("CAUTION"));
        assert!(warning.contains("69% successfully"));
    }

    #[test]
    fn thousands_formatting() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(950), "950");
        assert_eq!(format_thousands(2500), "2,500");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }

    #[test]
    fn title_case_capitalizes_after_separators() {
        assert_eq!(title_case("waiver of legal rights"), "Waiver Of Legal Rights");
        assert_eq!(
            title_case("non-refundable security deposit"),
            "Non-Refundable Security Deposit"
        );
    }

    fn entry_with_key(key: &str, reports: u64) -> CommunityEntry {
        CommunityEntry {
            key: key.to_string(),
            reports,
            severity: "MEDIUM".to_string(),
            avg_financial_impact: 0.0,
            success_rate_negotiating: 0.5,
            common_in: Vec::new(),
            user_outcomes: BTreeMap::new(),
            avg_time_to_resolve_days: 1,
            tips: Vec::new(),
            success_stories: Vec::new(),
        }
    }
}

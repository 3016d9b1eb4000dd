//! Batch run report.

use serde::{Deserialize, Serialize};

use pivot_core::types::Timeframe;

/// Outcome of one (symbol, timeframe) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PairStatus {
    /// Scan completed and rows reached the sink
    Succeeded { rows: usize },
    /// No series, or a series with zero bars
    SkippedNoData,
    /// The batch was cancelled before this pair started
    Cancelled,
    /// Unexpected per-pair failure; the batch continued
    Failed { error: String },
}

/// Per-pair result entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairOutcome {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub status: PairStatus,
}

/// Final report of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchReport {
    pub total: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub cancelled: usize,
    pub failed: usize,
    pub rows_written: usize,
    pub outcomes: Vec<PairOutcome>,
}

impl BatchReport {
    /// Aggregate the per-pair outcomes into a report.
    pub fn from_outcomes(mut outcomes: Vec<PairOutcome>) -> Self {
        outcomes.sort_by(|a, b| (&a.symbol, a.timeframe).cmp(&(&b.symbol, b.timeframe)));

        let mut report = Self {
            total: outcomes.len(),
            succeeded: 0,
            skipped: 0,
            cancelled: 0,
            failed: 0,
            rows_written: 0,
            outcomes,
        };
        for outcome in &report.outcomes {
            match &outcome.status {
                PairStatus::Succeeded { rows } => {
                    report.succeeded += 1;
                    report.rows_written += rows;
                }
                PairStatus::SkippedNoData => report.skipped += 1,
                PairStatus::Cancelled => report.cancelled += 1,
                PairStatus::Failed { .. } => report.failed += 1,
            }
        }
        report
    }

    /// True if no pair failed with an unexpected error.
    pub fn is_clean(&self) -> bool {
        self.failed == 0
    }

    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str("                    SIGNAL BATCH REPORT                     \n");
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str("PAIRS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Total:               {}\n", self.total));
        s.push_str(&format!("  Succeeded:           {}\n", self.succeeded));
        s.push_str(&format!("  Skipped (no data):   {}\n", self.skipped));
        s.push_str(&format!("  Cancelled:           {}\n", self.cancelled));
        s.push_str(&format!("  Failed:              {}\n", self.failed));
        s.push('\n');

        s.push_str("OUTPUT\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Rows written:        {}\n", self.rows_written));
        s.push('\n');

        let failures: Vec<&PairOutcome> = self
            .outcomes
            .iter()
            .filter(|o| matches!(o.status, PairStatus::Failed { .. }))
            .collect();
        if !failures.is_empty() {
            s.push_str("FAILURES\n");
            s.push_str("───────────────────────────────────────────────────────────\n");
            for outcome in failures {
                if let PairStatus::Failed { error } = &outcome.status {
                    s.push_str(&format!(
                        "  {} {}: {}\n",
                        outcome.symbol, outcome.timeframe, error
                    ));
                }
            }
            s.push('\n');
        }

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(symbol: &str, status: PairStatus) -> PairOutcome {
        PairOutcome {
            symbol: symbol.to_string(),
            timeframe: Timeframe::Daily,
            status,
        }
    }

    #[test]
    fn test_counts() {
        let report = BatchReport::from_outcomes(vec![
            outcome("AAPL", PairStatus::Succeeded { rows: 10 }),
            outcome("MSFT", PairStatus::Succeeded { rows: 5 }),
            outcome("QQQ", PairStatus::SkippedNoData),
            outcome(
                "SPY",
                PairStatus::Failed {
                    error: "boom".to_string(),
                },
            ),
        ]);

        assert_eq!(report.total, 4);
        assert_eq!(report.succeeded, 2);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.failed, 1);
        assert_eq!(report.rows_written, 15);
        assert!(!report.is_clean());
    }

    #[test]
    fn test_summary_lists_failures() {
        let report = BatchReport::from_outcomes(vec![outcome(
            "SPY",
            PairStatus::Failed {
                error: "bar 3 (2024-01-02) is not after its predecessor (2024-01-05)".to_string(),
            },
        )]);

        let summary = report.summary();
        assert!(summary.contains("Failed:              1"));
        assert!(summary.contains("SPY 1d"));
    }

    #[test]
    fn test_outcomes_sorted_for_stable_output() {
        let report = BatchReport::from_outcomes(vec![
            outcome("MSFT", PairStatus::SkippedNoData),
            outcome("AAPL", PairStatus::SkippedNoData),
        ]);
        assert_eq!(report.outcomes[0].symbol, "AAPL");
        assert_eq!(report.outcomes[1].symbol, "MSFT");
    }
}

use crate::model::Recommendation;

/// Sink for analysis output.
pub trait Reporter: Send + Sync {
    /// Render one instrument's recommendation with its justification.
    fn ticker_analysis(&self, symbol: &str, recommendation: &Recommendation);

    /// Render the overall table after the batch completes.
    fn summary(&self, rows: &[(String, Recommendation)]);
}

pub struct TerminalReporter;

impl Reporter for TerminalReporter {
    fn ticker_analysis(&self, symbol: &str, recommendation: &Recommendation) {
        println!("\n=== Analysis for {symbol} ===");
        println!("Recommendation: {}", recommendation.action);
        println!("{}", recommendation.justification);
    }

    fn summary(&self, rows: &[(String, Recommendation)]) {
        println!("\n=== Overall Summary ===");
        for line in summary_lines(rows) {
            println!("{line}");
        }
    }
}

/// Aligned `Ticker | Recommendation` table rows, header first.
fn summary_lines(rows: &[(String, Recommendation)]) -> Vec<String> {
    let width = rows
        .iter()
        .map(|(symbol, _)| symbol.len())
        .chain(std::iter::once("Ticker".len()))
        .max()
        .unwrap_or(0);

    let mut lines = vec![format!("{:<width$}  Recommendation", "Ticker")];
    for (symbol, recommendation) in rows {
        lines.push(format!("{symbol:<width$}  {}", recommendation.action));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Action;

    #[test]
    fn summary_lines_align_to_longest_symbol() {
        let rows = vec![
            (
                "AAPL".to_owned(),
                Recommendation {
                    action: Action::Buy,
                    justification: "momentum".into(),
                },
            ),
            ("BRK-B.LONG".to_owned(), Recommendation::error("no data")),
        ];
        let lines = summary_lines(&rows);
        assert_eq!(lines[0], "Ticker      Recommendation");
        assert_eq!(lines[1], "AAPL        Buy");
        assert_eq!(lines[2], "BRK-B.LONG  Error");
    }

    #[test]
    fn summary_lines_empty_batch_has_header_only() {
        let lines = summary_lines(&[]);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn terminal_reporter_does_not_panic() {
        let reporter = TerminalReporter;
        let rec = Recommendation {
            action: Action::Hold,
            justification: "sideways".into(),
        };
        reporter.ticker_analysis("AAPL", &rec);
        reporter.summary(&[("AAPL".to_owned(), rec)]);
    }
}

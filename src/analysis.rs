use derive_more::{Display, Error};
use error_stack::{Report, ResultExt};
use serde::Deserialize;
use tracing::warn;

use crate::llm::TextGenerator;
use crate::model::{Action, IndicatorResult, Recommendation};

/// Failure modes of turning a free-text model response into a
/// `Recommendation`. Never leaves this module: every variant collapses into
/// the `Error`-sentinel result.
#[derive(Debug, Display, Error)]
pub enum ExtractError {
    #[display("no valid JSON object found in the response")]
    NoJsonObject,
    #[display("failed to decode the JSON slice")]
    Decode,
    #[display("decoded JSON does not have string keys 'action' and 'justification'")]
    Schema,
    #[display("action {label:?} is not one of the recommendation labels")]
    InvalidAction { label: String },
}

/// Build the analysis prompt for one instrument.
pub fn build_prompt(symbol: &str, indicators: &IndicatorResult) -> String {
    format!(
        "You are a Stock Trader specializing in Technical Analysis at a top financial \
         institution. Here is the summary of technical indicators for {symbol}:\n\n\
         {summary}\n\n\
         Provide a detailed justification of your analysis, explaining what patterns, \
         signals, and trends you observe. Then, based on the analysis results, provide a \
         recommendation from the following options: 'Strong Buy', 'Buy', 'Weak Buy', \
         'Hold', 'Weak Sell', 'Sell', or 'Strong Sell'. Return your output as a JSON \
         object with two keys: 'action' and 'justification'.",
        summary = indicators.to_json(),
    )
}

/// Ask the text-generation service for a recommendation on `symbol`.
///
/// Always returns a well-formed `Recommendation`. Every failure mode
/// (transport, missing braces, malformed JSON, unknown action label) becomes
/// the `Error` sentinel with a diagnostic justification, so a multi-ticker
/// batch never aborts on one instrument.
pub async fn recommend(
    generator: &dyn TextGenerator,
    symbol: &str,
    indicators: &IndicatorResult,
) -> Recommendation {
    let prompt = build_prompt(symbol, indicators);

    let response = match generator.generate(&prompt).await {
        Ok(text) => text,
        Err(report) => {
            warn!(symbol, error = ?report, "text generation failed");
            return Recommendation::error(format!(
                "text generation failed: {}",
                report.current_context()
            ));
        }
    };

    match extract_recommendation(&response) {
        Ok(recommendation) => recommendation,
        Err(report) => {
            warn!(symbol, error = ?report, "recommendation extraction failed");
            Recommendation::error(format!(
                "{}. Raw response text: {response}",
                report.current_context()
            ))
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawRecommendation {
    action: String,
    justification: String,
}

/// Slice the response between its first `{` and last `}` and decode that.
///
/// The model is instructed to answer with a JSON object but routinely wraps
/// it in prose; the brace scan tolerates that without trusting anything else
/// about the text.
fn extract_recommendation(text: &str) -> Result<Recommendation, Report<ExtractError>> {
    let start = text.find('{').ok_or(ExtractError::NoJsonObject)?;
    let end = text
        .rfind('}')
        .filter(|&end| end > start)
        .ok_or(ExtractError::NoJsonObject)?;
    let slice = &text[start..=end];

    let value: serde_json::Value =
        serde_json::from_str(slice).change_context(ExtractError::Decode)?;
    let raw: RawRecommendation =
        serde_json::from_value(value).change_context(ExtractError::Schema)?;

    let action = Action::from_label(&raw.action).ok_or_else(|| {
        Report::new(ExtractError::InvalidAction {
            label: raw.action.clone(),
        })
    })?;

    Ok(Recommendation {
        action,
        justification: raw.justification,
    })
}

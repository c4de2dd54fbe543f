//! Extraction results

use serde::{Deserialize, Serialize};

/// Result of extracting one file: either its text or an inline marker
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionOutcome {
    pub filename: String,
    pub text: String,
}

/// Combined result of a batch, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchExtractionResult {
    /// Per-file texts joined with the page separator
    pub combined_text: String,
    /// Original filenames, same order as the input batch
    pub filenames: Vec<String>,
}

impl BatchExtractionResult {
    /// Join ordered outcomes with `separator`
    pub fn from_outcomes(outcomes: Vec<ExtractionOutcome>, separator: &str) -> Self {
        let mut texts = Vec::with_capacity(outcomes.len());
        let mut filenames = Vec::with_capacity(outcomes.len());

        for outcome in outcomes {
            texts.push(outcome.text);
            filenames.push(outcome.filename);
        }

        Self {
            combined_text: texts.join(separator),
            filenames,
        }
    }
}

//! Load quote batches from JSON files.
//!
//! Records are decoded one at a time so a single bad row (missing field,
//! non-numeric price) is reported instead of failing the whole batch.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::{debug, instrument};

use super::types::{Quote, RejectedQuote};
use crate::error::{AppError, QuoteError, Result};

/// Quotes decoded from a batch, plus the records that failed to decode.
#[derive(Debug, Clone, Default)]
pub struct LoadedQuotes {
    /// Successfully decoded quotes, in file order.
    pub quotes: Vec<Quote>,
    /// Records that could not be decoded.
    pub rejected: Vec<RejectedQuote>,
    /// File record index of each entry in `quotes`.
    pub positions: Vec<usize>,
}

impl LoadedQuotes {
    /// File record index of the quote at `quote_index` in [`Self::quotes`].
    pub fn record_index(&self, quote_index: usize) -> Option<usize> {
        self.positions.get(quote_index).copied()
    }

    /// Rewrite indices into [`Self::quotes`] (as reported by the detector)
    /// into file record indices, so they line up with decode rejections.
    pub fn remap_rejected(&self, rejected: &mut [RejectedQuote]) {
        for entry in rejected {
            if let Some(record) = self.record_index(entry.index) {
                entry.index = record;
            }
        }
    }
}

/// Read and decode a JSON array of quote objects from disk.
#[instrument]
pub fn load_quotes(path: &Path) -> Result<LoadedQuotes> {
    let raw = fs::read_to_string(path)?;
    let loaded = parse_quotes(&raw)?;
    debug!(
        quotes = loaded.quotes.len(),
        rejected = loaded.rejected.len(),
        "Loaded quote batch"
    );
    Ok(loaded)
}

/// Decode a JSON array of quote objects.
///
/// A document that is not an array is a hard error; individual elements that
/// fail to decode end up in [`LoadedQuotes::rejected`].
pub fn parse_quotes(raw: &str) -> Result<LoadedQuotes> {
    let document: Value = serde_json::from_str(raw)?;
    let Value::Array(records) = document else {
        return Err(AppError::Quote(QuoteError::Malformed {
            reason: "expected a JSON array of quotes".to_string(),
        }));
    };

    let mut loaded = LoadedQuotes::default();
    for (index, record) in records.into_iter().enumerate() {
        match serde_json::from_value::<Quote>(record) {
            Ok(quote) => {
                loaded.quotes.push(quote);
                loaded.positions.push(index);
            }
            Err(e) => loaded.rejected.push(RejectedQuote {
                index,
                error: QuoteError::Malformed {
                    reason: e.to_string(),
                },
            }),
        }
    }

    Ok(loaded)
}

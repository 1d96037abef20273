use thiserror::Error;

/// Errors that can occur while ingesting or processing an invoice feed.
///
/// The analysis core itself has no fatal path: blocked tax allocation,
/// unparseable dates and missing primary lines are all first-class states
/// on the result types, not errors. What remains here is feed ingestion.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum BillfoldError {
    /// Feed payload could not be parsed as JSON.
    #[error("feed error: {0}")]
    Feed(String),

    /// A feed record was structurally unusable (wrong field types).
    #[error("record error: {0}")]
    Record(String),
}

//! Error types for the mining core

use thiserror::Error;

/// Errors raised by the itemset miner and rule generator.
///
/// Empty results are never errors: a table with no frequent itemsets or an
/// itemset collection with no qualifying rules yields an empty collection.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MineError {
    /// A caller-supplied parameter is out of its accepted domain
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        reason: String,
    },

    /// A subset required during rule generation is missing from the mined
    /// collection, meaning the collection is not downward closed.
    #[error("inconsistent itemset collection: support of {itemset} is not available")]
    InconsistentItemsetSet { itemset: String },
}

impl MineError {
    pub(crate) fn invalid(
        name: &'static str,
        value: impl ToString,
        reason: impl Into<String>,
    ) -> Self {
        MineError::InvalidParameter {
            name,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

/// Result alias for mining operations
pub type MineResult<T> = std::result::Result<T, MineError>;

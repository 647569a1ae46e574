//! BasketForge: market basket analysis with the Apriori algorithm
//!
//! The mining core discovers frequent itemsets level by level under a minimum
//! support threshold and derives association rules scored by support,
//! confidence, lift, leverage and conviction. Loading invoice CSVs, console
//! reporting and CSV export sit around that core.

pub mod apriori;
pub mod cli;
pub mod data;
pub mod error;
pub mod export;
pub mod itemset;
pub mod logging;
pub mod rank;
pub mod report;
pub mod rules;
pub mod support;
pub mod table;

// Re-export public items for easier access
pub use apriori::{mine, mine_with, MinerConfig};
pub use cli::Args;
pub use data::{load_transactions, IngestOptions};
pub use error::{MineError, MineResult};
pub use itemset::{FrequentItemset, FrequentItemsets, ItemId, Itemset};
pub use logging::init_tracing;
pub use rank::{rank, top};
pub use rules::{generate_rules, generate_rules_with_default_metric, Metric, Rule};
pub use support::{support, support_scan, CountingStrategy};
pub use table::TransactionTable;

/// Common result type used by the application layers
pub type Result<T> = anyhow::Result<T>;

//! Level-wise Apriori frequent itemset miner

use std::collections::HashSet;

use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{MineError, MineResult};
use crate::itemset::{FrequentItemset, FrequentItemsets, ItemId, Itemset};
use crate::support::CountingStrategy;
use crate::table::TransactionTable;

/// Parameters for a mining run
#[derive(Debug, Clone, PartialEq)]
pub struct MinerConfig {
    /// Minimum support in (0, 1]; values above 1 produce an empty result
    pub min_support: f64,
    /// Largest itemset size to mine, unbounded when `None`
    pub max_len: Option<usize>,
    /// Support counting strategy
    pub counting: CountingStrategy,
    /// Count each level's candidates on the rayon pool
    pub parallel: bool,
}

impl MinerConfig {
    pub fn new(min_support: f64) -> Self {
        Self {
            min_support,
            max_len: None,
            counting: CountingStrategy::default(),
            parallel: true,
        }
    }

    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = Some(max_len);
        self
    }

    pub fn with_counting(mut self, counting: CountingStrategy) -> Self {
        self.counting = counting;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    fn validate(&self) -> MineResult<()> {
        if self.min_support.is_nan() || self.min_support <= 0.0 {
            return Err(MineError::invalid(
                "min_support",
                self.min_support,
                "must be greater than 0",
            ));
        }
        if self.max_len == Some(0) {
            return Err(MineError::invalid(
                "max_len",
                0,
                "must be at least 1 when set",
            ));
        }
        Ok(())
    }
}

/// Mine every itemset whose support is at least `min_support`
///
/// # Arguments
/// * `table` - Basket table, read-only for the whole run
/// * `min_support` - Support threshold in (0, 1]
///
/// # Returns
/// * All frequent itemsets with their supports
pub fn mine(table: &TransactionTable, min_support: f64) -> MineResult<FrequentItemsets> {
    mine_with(table, &MinerConfig::new(min_support))
}

/// Mine with explicit configuration
pub fn mine_with(table: &TransactionTable, config: &MinerConfig) -> MineResult<FrequentItemsets> {
    config.validate()?;

    let mut result = FrequentItemsets::new(table.transaction_count());
    if table.is_empty() || config.min_support > 1.0 {
        debug!(
            transactions = table.transaction_count(),
            min_support = config.min_support,
            "nothing to mine"
        );
        return Ok(result);
    }

    let max_len = config.max_len.unwrap_or(usize::MAX);
    let mut candidates: Vec<Itemset> = table.item_ids().map(Itemset::singleton).collect();
    let mut k = 1;

    while !candidates.is_empty() && k <= max_len {
        let generated = candidates.len();
        let frequent = count_and_filter(table, candidates, config);
        debug!(
            level = k,
            candidates = generated,
            frequent = frequent.len(),
            "apriori level complete"
        );
        if frequent.is_empty() {
            break;
        }

        let level: Vec<Itemset> = frequent.iter().map(|f| f.itemset.clone()).collect();
        for itemset in frequent {
            result.insert(itemset);
        }

        if k == max_len {
            break;
        }
        candidates = generate_candidates(&level);
        k += 1;
    }

    info!(
        itemsets = result.len(),
        max_len = result.max_len(),
        min_support = config.min_support,
        "mining finished"
    );
    Ok(result)
}

/// Count supports for one level and keep those meeting the threshold.
/// Output order follows input order in both the sequential and parallel paths.
fn count_and_filter(
    table: &TransactionTable,
    candidates: Vec<Itemset>,
    config: &MinerConfig,
) -> Vec<FrequentItemset> {
    let counting = config.counting;
    let score = |itemset: Itemset| {
        let support = counting.support(itemset.items(), table);
        FrequentItemset { itemset, support }
    };

    let scored: Vec<FrequentItemset> = if config.parallel {
        candidates.into_par_iter().map(score).collect()
    } else {
        candidates.into_iter().map(score).collect()
    };

    scored
        .into_iter()
        .filter(|f| f.support >= config.min_support)
        .collect()
}

/// Join frequent (k-1)-itemsets sharing their first k-2 items, then drop any
/// candidate with an infrequent (k-1)-subset.
///
/// `level` must be in canonical order; each candidate is produced once.
fn generate_candidates(level: &[Itemset]) -> Vec<Itemset> {
    let known: HashSet<&Itemset> = level.iter().collect();
    let mut candidates = Vec::new();
    let mut pruned = 0usize;

    for (i, left) in level.iter().enumerate() {
        let prefix_len = left.len() - 1;
        let prefix = &left.items()[..prefix_len];

        for right in &level[i + 1..] {
            if &right.items()[..prefix_len] != prefix {
                // sorted order: no later itemset shares this prefix
                break;
            }
            let mut items: Vec<ItemId> = left.items().to_vec();
            items.push(right.items()[prefix_len]);
            let candidate = Itemset::from_sorted(items);

            if candidate.subsets_without_one().all(|s| known.contains(&s)) {
                candidates.push(candidate);
            } else {
                pruned += 1;
            }
        }
    }

    debug!(candidates = candidates.len(), pruned, "generated next level");
    candidates
}

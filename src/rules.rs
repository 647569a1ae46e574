//! Association rule generation and interest metrics

use std::fmt;
use std::str::FromStr;

use tracing::debug;

use crate::error::{MineError, MineResult};
use crate::itemset::{FrequentItemsets, ItemId, Itemset};
use crate::table::TransactionTable;

/// Largest itemset whose antecedent/consequent splits can be enumerated
const MAX_SPLIT_LEN: usize = 63;

/// Interest measure used to filter rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Metric {
    Support,
    Confidence,
    #[default]
    Lift,
    Leverage,
    Conviction,
}

impl Metric {
    pub fn name(self) -> &'static str {
        match self {
            Metric::Support => "support",
            Metric::Confidence => "confidence",
            Metric::Lift => "lift",
            Metric::Leverage => "leverage",
            Metric::Conviction => "conviction",
        }
    }

    pub fn value(self, rule: &Rule) -> f64 {
        match self {
            Metric::Support => rule.support,
            Metric::Confidence => rule.confidence,
            Metric::Lift => rule.lift,
            Metric::Leverage => rule.leverage,
            Metric::Conviction => rule.conviction,
        }
    }
}

impl FromStr for Metric {
    type Err = MineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "support" => Ok(Metric::Support),
            "confidence" => Ok(Metric::Confidence),
            "lift" => Ok(Metric::Lift),
            "leverage" => Ok(Metric::Leverage),
            "conviction" => Ok(Metric::Conviction),
            _ => Err(MineError::invalid(
                "metric",
                s,
                "expected one of support, confidence, lift, leverage, conviction",
            )),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Antecedent => consequent, with the metrics derived from itemset supports
#[derive(Debug, Clone, PartialEq)]
pub struct Rule {
    pub antecedent: Itemset,
    pub consequent: Itemset,
    pub antecedent_support: f64,
    pub consequent_support: f64,
    /// Support of antecedent ∪ consequent
    pub support: f64,
    pub confidence: f64,
    pub lift: f64,
    pub leverage: f64,
    /// `f64::INFINITY` when confidence is 1
    pub conviction: f64,
}

impl Rule {
    fn from_supports(
        antecedent: Itemset,
        consequent: Itemset,
        support: f64,
        antecedent_support: f64,
        consequent_support: f64,
    ) -> Self {
        let confidence = support / antecedent_support;
        let lift = confidence / consequent_support;
        let leverage = support - antecedent_support * consequent_support;
        let conviction = if confidence >= 1.0 {
            f64::INFINITY
        } else {
            (1.0 - consequent_support) / (1.0 - confidence)
        };

        Self {
            antecedent,
            consequent,
            antecedent_support,
            consequent_support,
            support,
            confidence,
            lift,
            leverage,
            conviction,
        }
    }

    /// "a, b => c" using item names
    pub fn render(&self, table: &TransactionTable) -> String {
        format!(
            "{} => {}",
            self.antecedent.render(table),
            self.consequent.render(table)
        )
    }
}

/// Generate every rule from `itemsets` whose `metric` is at least `min_threshold`
///
/// # Arguments
/// * `itemsets` - Downward-closed frequent itemsets, as produced by the miner
/// * `metric` - Measure compared against the threshold
/// * `min_threshold` - Lower bound on the metric (inclusive)
///
/// # Returns
/// * Qualifying rules, grouped by source itemset in collection order
pub fn generate_rules(
    itemsets: &FrequentItemsets,
    metric: Metric,
    min_threshold: f64,
) -> MineResult<Vec<Rule>> {
    if min_threshold.is_nan() {
        return Err(MineError::invalid(
            "min_threshold",
            min_threshold,
            "must be a number",
        ));
    }

    let mut rules = Vec::new();
    let mut considered = 0usize;

    for frequent in itemsets.iter().filter(|f| f.len() >= 2) {
        let members = frequent.itemset.items();
        if members.len() > MAX_SPLIT_LEN {
            return Err(MineError::invalid(
                "itemset",
                &frequent.itemset,
                format!("rule generation supports at most {MAX_SPLIT_LEN} items per itemset"),
            ));
        }

        let full: u64 = (1u64 << members.len()) - 1;
        for mask in 1..full {
            let antecedent = select(members, mask);
            let consequent = select(members, full & !mask);
            let antecedent_support = lookup(itemsets, &antecedent)?;
            let consequent_support = lookup(itemsets, &consequent)?;

            let rule = Rule::from_supports(
                antecedent,
                consequent,
                frequent.support,
                antecedent_support,
                consequent_support,
            );
            considered += 1;
            if metric.value(&rule) >= min_threshold {
                rules.push(rule);
            }
        }
    }

    debug!(
        considered,
        retained = rules.len(),
        %metric,
        min_threshold,
        "rule generation finished"
    );
    Ok(rules)
}

/// [`generate_rules`] filtered by lift
pub fn generate_rules_with_default_metric(
    itemsets: &FrequentItemsets,
    min_threshold: f64,
) -> MineResult<Vec<Rule>> {
    generate_rules(itemsets, Metric::default(), min_threshold)
}

/// Members of `items` whose bit is set in `mask`; mask is non-zero
fn select(items: &[ItemId], mask: u64) -> Itemset {
    let picked = items
        .iter()
        .enumerate()
        .filter(|(i, _)| mask & (1u64 << i) != 0)
        .map(|(_, &item)| item)
        .collect();
    Itemset::from_sorted(picked)
}

fn lookup(itemsets: &FrequentItemsets, itemset: &Itemset) -> MineResult<f64> {
    itemsets
        .support_of(itemset)
        .ok_or_else(|| MineError::InconsistentItemsetSet {
            itemset: itemset.to_string(),
        })
}

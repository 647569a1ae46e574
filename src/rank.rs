//! Total ordering of rule sets for presentation

use std::cmp::Ordering;

use crate::rules::Rule;
use crate::table::TransactionTable;

/// Rule paired with its rendered antecedent and consequent
struct Keyed {
    antecedent: String,
    consequent: String,
    rule: Rule,
}

/// Sort rules by lift descending, then confidence descending, then by the
/// rendered antecedent and consequent text, giving a reproducible total order.
pub fn rank(rules: Vec<Rule>, table: &TransactionTable) -> Vec<Rule> {
    let mut keyed: Vec<Keyed> = rules
        .into_iter()
        .map(|rule| Keyed {
            antecedent: rule.antecedent.render(table),
            consequent: rule.consequent.render(table),
            rule,
        })
        .collect();
    keyed.sort_by(compare);
    keyed.into_iter().map(|k| k.rule).collect()
}

/// The first `n` rules of an already ranked slice, or all of them if fewer
pub fn top(rules: &[Rule], n: usize) -> &[Rule] {
    &rules[..n.min(rules.len())]
}

fn compare(a: &Keyed, b: &Keyed) -> Ordering {
    b.rule
        .lift
        .total_cmp(&a.rule.lift)
        .then_with(|| b.rule.confidence.total_cmp(&a.rule.confidence))
        .then_with(|| a.antecedent.cmp(&b.antecedent))
        .then_with(|| a.consequent.cmp(&b.consequent))
}

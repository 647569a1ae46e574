//! Console presentation of mining results

use crate::itemset::FrequentItemsets;
use crate::rank::top;
use crate::rules::Rule;
use crate::table::TransactionTable;

/// Render the first `n` ranked rules as a fixed-width table
pub fn format_rules(rules: &[Rule], table: &TransactionTable, n: usize) -> String {
    let shown = top(rules, n);
    let mut out = String::new();
    out.push_str(&format!(
        "  {:<40} | {:<40} | {:>8} | {:>10} | {:>6}\n",
        "antecedents", "consequents", "support", "confidence", "lift"
    ));
    out.push_str(&format!("  {}\n", "-".repeat(116)));
    for rule in shown {
        out.push_str(&format!(
            "  {:<40} | {:<40} | {:>8.4} | {:>10.4} | {:>6.2}\n",
            truncate(&rule.antecedent.render(table), 40),
            truncate(&rule.consequent.render(table), 40),
            rule.support,
            rule.confidence,
            rule.lift
        ));
    }
    out
}

/// Print the top rules to stdout
pub fn print_rules(rules: &[Rule], table: &TransactionTable, n: usize) {
    println!("\n=== Top {} Rules (of {}) ===", n.min(rules.len()), rules.len());
    if rules.is_empty() {
        println!("  No rules met the threshold");
        return;
    }
    print!("{}", format_rules(rules, table, n));
}

/// Print frequent itemset counts per size
pub fn print_itemset_summary(itemsets: &FrequentItemsets) {
    println!("\n=== Frequent Itemsets ===");
    println!("Transactions: {}", itemsets.transaction_count());
    println!("Total itemsets: {}", itemsets.len());
    for k in 1..=itemsets.max_len() {
        println!("  Size {}: {} itemsets", k, itemsets.level(k).count());
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(3)).collect();
        cut.push_str("...");
        cut
    }
}

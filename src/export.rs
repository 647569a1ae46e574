//! CSV persistence of mining results using Polars

use std::fs::File;

use polars::prelude::*;
use tracing::info;

use crate::itemset::FrequentItemsets;
use crate::rules::Rule;
use crate::table::TransactionTable;

/// Build a DataFrame of rules in the given order
pub fn rules_frame(rules: &[Rule], table: &TransactionTable) -> crate::Result<DataFrame> {
    let antecedents: Vec<String> = rules.iter().map(|r| r.antecedent.render(table)).collect();
    let consequents: Vec<String> = rules.iter().map(|r| r.consequent.render(table)).collect();
    let column = |f: fn(&Rule) -> f64| rules.iter().map(f).collect::<Vec<f64>>();

    let df = df!(
        "antecedents" => antecedents,
        "consequents" => consequents,
        "antecedent support" => column(|r| r.antecedent_support),
        "consequent support" => column(|r| r.consequent_support),
        "support" => column(|r| r.support),
        "confidence" => column(|r| r.confidence),
        "lift" => column(|r| r.lift),
        "leverage" => column(|r| r.leverage),
        "conviction" => column(|r| r.conviction)
    )?;
    Ok(df)
}

/// Build a DataFrame of frequent itemsets in collection order
pub fn itemsets_frame(itemsets: &FrequentItemsets, table: &TransactionTable) -> crate::Result<DataFrame> {
    let supports: Vec<f64> = itemsets.iter().map(|f| f.support).collect();
    let names: Vec<String> = itemsets.iter().map(|f| f.itemset.render(table)).collect();
    let lengths: Vec<u32> = itemsets.iter().map(|f| f.len() as u32).collect();

    let df = df!(
        "support" => supports,
        "itemsets" => names,
        "length" => lengths
    )?;
    Ok(df)
}

/// Write ranked rules to `output_path`
pub fn write_rules_csv(rules: &[Rule], table: &TransactionTable, output_path: &str) -> crate::Result<()> {
    let mut df = rules_frame(rules, table)?;
    write_csv(&mut df, output_path)?;
    info!(rules = rules.len(), path = output_path, "rules written");
    Ok(())
}

/// Write frequent itemsets to `output_path`
pub fn write_itemsets_csv(
    itemsets: &FrequentItemsets,
    table: &TransactionTable,
    output_path: &str,
) -> crate::Result<()> {
    let mut df = itemsets_frame(itemsets, table)?;
    write_csv(&mut df, output_path)?;
    info!(itemsets = itemsets.len(), path = output_path, "itemsets written");
    Ok(())
}

fn write_csv(df: &mut DataFrame, output_path: &str) -> crate::Result<()> {
    let mut file = File::create(output_path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}

//! BasketForge: market basket analysis CLI
//!
//! Loads invoice lines, mines frequent itemsets with Apriori, derives and
//! ranks association rules, prints the strongest and writes both result sets
//! to CSV.

use anyhow::Result;
use basketforge::{
    export, generate_rules, init_tracing, load_transactions, mine_with, rank, report, Args,
};
use clap::Parser;
use std::time::Instant;

fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    if args.verbose {
        println!("BasketForge - Market Basket Analysis with Apriori");
        println!("=================================================\n");
    }

    let metric = args.parse_metric()?;
    let config = args.miner_config();
    let start_time = Instant::now();

    // Step 1: Load and build baskets
    if args.verbose {
        println!("Step 1: Loading invoice lines");
        println!("  Input file: {}", args.input);
    }
    let load_start = Instant::now();
    let table = load_transactions(&args.input, &args.ingest_options())?;
    println!(
        "✓ Data loaded: {} transactions, {} products",
        table.transaction_count(),
        table.item_count()
    );
    if args.verbose {
        println!("  Processing time: {:.2}s", load_start.elapsed().as_secs_f64());
    }

    // Step 2: Mine frequent itemsets
    if args.verbose {
        println!("\nStep 2: Mining frequent itemsets");
        println!("  Minimum support: {}", config.min_support);
        if let Some(max_len) = config.max_len {
            println!("  Maximum itemset size: {}", max_len);
        }
    }
    let mine_start = Instant::now();
    let itemsets = mine_with(&table, &config)?;
    println!("✓ Frequent itemsets found: {}", itemsets.len());
    if args.verbose {
        println!("  Mining time: {:.2}s", mine_start.elapsed().as_secs_f64());
    }

    // Step 3: Generate and rank rules
    if args.verbose {
        println!("\nStep 3: Generating association rules");
        println!("  Metric: {} >= {}", metric, args.min_threshold);
    }
    let rules_start = Instant::now();
    let rules = rank(generate_rules(&itemsets, metric, args.min_threshold)?, &table);
    println!("✓ Rules generated: {}", rules.len());
    if args.verbose {
        println!("  Rule generation time: {:.2}s", rules_start.elapsed().as_secs_f64());
    }

    report::print_itemset_summary(&itemsets);
    report::print_rules(&rules, &table, args.show);

    // Step 4: Persist results
    export::write_rules_csv(&rules, &table, &args.rules_out)?;
    export::write_itemsets_csv(&itemsets, &table, &args.itemsets_out)?;

    println!("\n=== Pipeline Complete ===");
    println!("Total processing time: {:.2}s", start_time.elapsed().as_secs_f64());
    println!("Rules saved to: {}", args.rules_out);
    println!("Frequent itemsets saved to: {}", args.itemsets_out);

    Ok(())
}

//! Command-line interface definitions and argument parsing

use clap::Parser;

use crate::apriori::MinerConfig;
use crate::data::IngestOptions;
use crate::rules::Metric;
use crate::support::CountingStrategy;

/// Market basket analysis: frequent itemsets and association rules via Apriori
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input CSV file of invoice lines
    #[arg(short, long, default_value = "market_basket.csv")]
    pub input: String,

    /// Minimum support for frequent itemsets, in (0, 1]
    #[arg(short = 's', long, default_value = "0.005")]
    pub min_support: f64,

    /// Rule filter metric: support, confidence, lift, leverage or conviction
    #[arg(short, long, default_value = "lift")]
    pub metric: String,

    /// Minimum value of the rule metric
    #[arg(short = 't', long, default_value = "1.0")]
    pub min_threshold: f64,

    /// Keep only the N most frequent products (0 keeps all)
    #[arg(long, default_value = "100")]
    pub top_items: usize,

    /// Largest itemset size to mine
    #[arg(long)]
    pub max_len: Option<usize>,

    /// Number of top rules to print
    #[arg(short = 'n', long, default_value = "10")]
    pub show: usize,

    /// Output path for the ranked rules CSV
    #[arg(long, default_value = "association_rules.csv")]
    pub rules_out: String,

    /// Output path for the frequent itemsets CSV
    #[arg(long, default_value = "frequent_itemsets.csv")]
    pub itemsets_out: String,

    /// Count support by scanning rows instead of intersecting bitmaps
    #[arg(long)]
    pub scan: bool,

    /// Count candidates on a single thread
    #[arg(long)]
    pub sequential: bool,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

impl Args {
    /// Parse the rule metric name
    pub fn parse_metric(&self) -> crate::Result<Metric> {
        Ok(self.metric.parse::<Metric>()?)
    }

    pub fn miner_config(&self) -> MinerConfig {
        let counting = if self.scan {
            CountingStrategy::Scan
        } else {
            CountingStrategy::Indexed
        };
        MinerConfig {
            min_support: self.min_support,
            max_len: self.max_len,
            counting,
            parallel: !self.sequential,
        }
    }

    pub fn ingest_options(&self) -> IngestOptions {
        IngestOptions {
            top_items: (self.top_items > 0).then_some(self.top_items),
            ..IngestOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["basketforge"]);
        assert_eq!(args.input, "market_basket.csv");
        assert_eq!(args.min_support, 0.005);
        assert_eq!(args.parse_metric().unwrap(), Metric::Lift);
        assert_eq!(args.min_threshold, 1.0);
        assert_eq!(args.ingest_options().top_items, Some(100));
        assert_eq!(args.show, 10);

        let config = args.miner_config();
        assert_eq!(config.counting, CountingStrategy::Indexed);
        assert!(config.parallel);
        assert_eq!(config.max_len, None);
    }

    #[test]
    fn test_parse_metric() {
        let mut args = Args::parse_from(["basketforge", "--metric", "confidence"]);
        assert_eq!(args.parse_metric().unwrap(), Metric::Confidence);

        args.metric = "invalid".to_string();
        assert!(args.parse_metric().is_err());
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "basketforge",
            "--scan",
            "--sequential",
            "--max-len",
            "3",
            "--top-items",
            "0",
        ]);
        let config = args.miner_config();
        assert_eq!(config.counting, CountingStrategy::Scan);
        assert!(!config.parallel);
        assert_eq!(config.max_len, Some(3));
        assert_eq!(args.ingest_options().top_items, None);
    }
}

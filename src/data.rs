//! Transaction loading and basket construction using Polars

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use polars::prelude::*;
use tracing::{debug, info, warn};

use crate::table::TransactionTable;

/// Name of the per-line flag column added during cleaning
const HAS_CUSTOMER: &str = "__has_customer";

/// Column names and cleaning policy for the raw invoice CSV
#[derive(Debug, Clone)]
pub struct IngestOptions {
    pub invoice_column: String,
    pub description_column: String,
    pub quantity_column: String,
    /// Only checked for missing values; optional in the input
    pub customer_column: String,
    /// Keep only the most frequent descriptions; `None` keeps all
    pub top_items: Option<usize>,
}

/// One cleaned invoice line
#[derive(Debug, Clone, PartialEq)]
struct InvoiceLine {
    invoice: String,
    description: String,
    has_customer: bool,
}

impl Default for IngestOptions {
    fn default() -> Self {
        Self {
            invoice_column: "Invoice".to_string(),
            description_column: "Description".to_string(),
            quantity_column: "Quantity".to_string(),
            customer_column: "Customer ID".to_string(),
            top_items: Some(100),
        }
    }
}

/// Load invoice lines from CSV and build the basket table
///
/// # Arguments
/// * `file_path` - Path to the CSV file
/// * `options` - Column names and vocabulary cap
///
/// # Returns
/// * `TransactionTable` with one row per invoice
pub fn load_transactions(file_path: &str, options: &IngestOptions) -> crate::Result<TransactionTable> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(PathBuf::from(file_path)))?
        .finish()?;

    debug!(rows = df.height(), path = file_path, "read invoice lines");

    for required in [
        &options.invoice_column,
        &options.description_column,
        &options.quantity_column,
    ] {
        if df.column(required).is_err() {
            anyhow::bail!("Input is missing required column '{}'", required);
        }
    }

    let lines = clean_lines(df, options)?;
    if lines.is_empty() {
        anyhow::bail!("No valid invoice lines found after filtering");
    }

    let lines = keep_top_items(lines, options.top_items);
    let missing = lines.iter().filter(|line| !line.has_customer).count();
    if missing > 0 {
        warn!(missing, "rows without a customer id");
    }
    let table = TransactionTable::from_transactions(group_by_invoice(lines));

    info!(
        transactions = table.transaction_count(),
        items = table.item_count(),
        "basket table built"
    );
    Ok(table)
}

/// Drop cancelled, non-positive and undescribed lines, then normalise descriptions
fn clean_lines(df: DataFrame, options: &IngestOptions) -> crate::Result<Vec<InvoiceLine>> {
    let invoice = options.invoice_column.as_str();
    let description = options.description_column.as_str();
    let quantity = options.quantity_column.as_str();

    // a missing customer column counts as every line having one
    let has_customer = if df.column(&options.customer_column).is_ok() {
        col(options.customer_column.as_str()).is_not_null()
    } else {
        lit(true)
    };

    let cleaned = df
        .lazy()
        .select([
            col(invoice).cast(DataType::String),
            col(description).cast(DataType::String),
            col(quantity).cast(DataType::Float64),
            has_customer.alias(HAS_CUSTOMER),
        ])
        .filter(
            col(description)
                .is_not_null()
                .and(col(quantity).gt(lit(0.0)))
                .and(col(invoice).str().starts_with(lit("C")).not()),
        )
        .collect()?;

    let invoices = cleaned.column(invoice)?.str()?;
    let descriptions = cleaned.column(description)?.str()?;
    let customers = cleaned.column(HAS_CUSTOMER)?.bool()?;

    let lines = invoices
        .into_iter()
        .zip(descriptions.into_iter())
        .zip(customers.into_iter())
        .filter_map(|((inv, desc), has_customer)| {
            let desc = normalize_description(desc?);
            if desc.is_empty() {
                None
            } else {
                Some(InvoiceLine {
                    invoice: inv?.to_string(),
                    description: desc,
                    has_customer: has_customer.unwrap_or(false),
                })
            }
        })
        .collect::<Vec<_>>();

    debug!(lines = lines.len(), "invoice lines after cleaning");
    Ok(lines)
}

fn normalize_description(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Restrict lines to the `limit` most frequent descriptions, ties by name
fn keep_top_items(lines: Vec<InvoiceLine>, limit: Option<usize>) -> Vec<InvoiceLine> {
    let Some(limit) = limit else {
        return lines;
    };

    let mut counts: HashMap<&str, usize> = HashMap::new();
    for line in &lines {
        *counts.entry(line.description.as_str()).or_insert(0) += 1;
    }
    if counts.len() <= limit {
        return lines;
    }

    let mut ranked: Vec<(&str, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    let keep: HashSet<String> = ranked
        .into_iter()
        .take(limit)
        .map(|(desc, _)| desc.to_string())
        .collect();

    debug!(kept = keep.len(), "vocabulary capped");
    lines
        .into_iter()
        .filter(|line| keep.contains(&line.description))
        .collect()
}

/// Group lines into baskets, preserving first-seen invoice order
fn group_by_invoice(lines: Vec<InvoiceLine>) -> Vec<(String, Vec<String>)> {
    let mut order: Vec<String> = Vec::new();
    let mut baskets: HashMap<String, Vec<String>> = HashMap::new();
    for InvoiceLine {
        invoice,
        description,
        ..
    } in lines
    {
        let basket = baskets.entry(invoice.clone()).or_insert_with(|| {
            order.push(invoice);
            Vec::new()
        });
        basket.push(description);
    }
    order
        .into_iter()
        .filter_map(|invoice| baskets.remove(&invoice).map(|basket| (invoice, basket)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};
    use tempfile::NamedTempFile;

    /// Collects formatted log output for assertions
    struct LogCapture {
        logs: Arc<Mutex<Vec<String>>>,
    }

    impl Write for LogCapture {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.logs
                .lock()
                .unwrap()
                .push(String::from_utf8_lossy(buf).to_string());
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Run `f` with a subscriber that records WARN output, returning what was logged
    fn capture_warnings(f: impl FnOnce()) -> String {
        let logs = Arc::new(Mutex::new(Vec::new()));
        let sink = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::WARN)
            .with_writer(move || LogCapture { logs: sink.clone() })
            .finish();
        {
            let _guard = tracing::subscriber::set_default(subscriber);
            f();
        }
        let captured = logs.lock().unwrap().concat();
        captured
    }

    fn line(invoice: &str, description: &str) -> InvoiceLine {
        InvoiceLine {
            invoice: invoice.to_string(),
            description: description.to_string(),
            has_customer: true,
        }
    }

    fn create_test_csv() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Invoice,StockCode,Description,Quantity,InvoiceDate,Price,Customer ID,Country").unwrap();
        writeln!(file, "489434,85048,15CM CHRISTMAS GLASS BALL 20 LIGHTS,12,2009-12-01 07:45:00,6.95,13085,United Kingdom").unwrap();
        writeln!(file, "489434,79323P,PINK CHERRY LIGHTS,12,2009-12-01 07:45:00,6.75,13085,United Kingdom").unwrap();
        writeln!(file, "489435,22350,CAT BOWL ,12,2009-12-01 07:46:00,2.55,,United Kingdom").unwrap();
        writeln!(file, "489435,79323P,pink cherry lights,6,2009-12-01 07:46:00,6.75,,United Kingdom").unwrap();
        writeln!(file, "C489449,22087,PAPER BUNTING WHITE LACE,-12,2009-12-01 10:33:00,2.95,16321,Australia").unwrap();
        writeln!(file, "489436,21232,STRAWBERRY CERAMIC TRINKET BOX,0,2009-12-01 09:06:00,1.25,13078,United Kingdom").unwrap();
        writeln!(file, "489437,21232,,4,2009-12-01 09:08:00,1.25,13078,United Kingdom").unwrap();
        file
    }

    #[test]
    fn test_load_transactions() {
        let test_file = create_test_csv();
        let file_path = test_file.path().to_str().unwrap();

        let table = load_transactions(file_path, &IngestOptions::default()).unwrap();

        // cancelled, zero-quantity and undescribed lines are gone
        assert_eq!(table.transaction_count(), 2);
        assert_eq!(table.transaction_ids(), &["489434".to_string(), "489435".to_string()]);
        assert_eq!(table.item_count(), 3);
        assert!(table.item_id("pink cherry lights").is_some());
        assert!(table.item_id("cat bowl").is_some());
        assert!(table.item_id("paper bunting white lace").is_none());
    }

    #[test]
    fn test_top_items_cap() {
        let test_file = create_test_csv();
        let file_path = test_file.path().to_str().unwrap();

        let options = IngestOptions {
            top_items: Some(1),
            ..IngestOptions::default()
        };
        let table = load_transactions(file_path, &options).unwrap();
        assert_eq!(table.item_count(), 1);
        assert_eq!(table.item_id("pink cherry lights"), table.item_ids().next());
        assert_eq!(table.transaction_count(), 2);
    }

    #[test]
    fn test_missing_column_is_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Invoice,Quantity").unwrap();
        writeln!(file, "1,2").unwrap();
        let result = load_transactions(file.path().to_str().unwrap(), &IngestOptions::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_keep_top_items_ties_by_name() {
        let lines = vec![line("1", "b"), line("1", "a"), line("2", "c"), line("2", "c")];
        let kept = keep_top_items(lines, Some(2));
        let descs: Vec<&str> = kept.iter().map(|l| l.description.as_str()).collect();
        assert_eq!(descs, vec!["a", "c", "c"]);
    }

    #[test]
    fn test_group_by_invoice_preserves_order() {
        let lines = vec![line("9", "x"), line("3", "y"), line("9", "z")];
        let grouped = group_by_invoice(lines);
        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0, "9");
        assert_eq!(grouped[0].1, vec!["x".to_string(), "z".to_string()]);
        assert_eq!(grouped[1].0, "3");
    }

    #[test]
    fn test_missing_customer_warning_counts_kept_lines() {
        let test_file = create_test_csv();
        let file_path = test_file.path().to_str().unwrap();

        // both 489435 lines survive cleaning without a customer id
        let logs = capture_warnings(|| {
            load_transactions(file_path, &IngestOptions::default()).unwrap();
        });
        assert!(logs.contains("rows without a customer id"));
        assert!(logs.contains("missing=2"));
    }

    #[test]
    fn test_dropped_lines_do_not_count_as_missing_customer() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "Invoice,Description,Quantity,Customer ID").unwrap();
        writeln!(file, "1,mug,2,100").unwrap();
        writeln!(file, "C2,mug,-1,").unwrap();
        writeln!(file, "3,mug,0,").unwrap();
        let file_path = file.path().to_str().unwrap();

        let logs = capture_warnings(|| {
            let table = load_transactions(file_path, &IngestOptions::default()).unwrap();
            assert_eq!(table.transaction_count(), 1);
        });
        assert!(!logs.contains("rows without a customer id"));
    }

    #[test]
    fn test_capped_items_do_not_count_as_missing_customer() {
        let test_file = create_test_csv();
        let file_path = test_file.path().to_str().unwrap();

        // only "pink cherry lights" survives; one of its two lines lacks a customer
        let options = IngestOptions {
            top_items: Some(1),
            ..IngestOptions::default()
        };
        let logs = capture_warnings(|| {
            load_transactions(file_path, &options).unwrap();
        });
        assert!(logs.contains("missing=1"));
    }
}

//! Support counting over a transaction table

use roaring::RoaringBitmap;

use crate::itemset::ItemId;
use crate::table::TransactionTable;

/// How candidate supports are counted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CountingStrategy {
    /// Intersect the per-item transaction bitmaps
    #[default]
    Indexed,
    /// Scan every row of the incidence matrix
    Scan,
}

impl CountingStrategy {
    pub fn support(self, items: &[ItemId], table: &TransactionTable) -> f64 {
        match self {
            CountingStrategy::Indexed => support(items, table),
            CountingStrategy::Scan => support_scan(items, table),
        }
    }
}

/// Fraction of transactions containing every item in `items`.
///
/// The empty item list has support 1.0; any list over an empty table has 0.0.
pub fn support(items: &[ItemId], table: &TransactionTable) -> f64 {
    if items.is_empty() {
        return 1.0;
    }
    let total = table.transaction_count();
    if total == 0 {
        return 0.0;
    }
    count_indexed(items, table) as f64 / total as f64
}

/// Same contract as [`support`], computed by a row scan of the incidence matrix
pub fn support_scan(items: &[ItemId], table: &TransactionTable) -> f64 {
    if items.is_empty() {
        return 1.0;
    }
    let total = table.transaction_count();
    if total == 0 {
        return 0.0;
    }
    let hits = table
        .incidence()
        .outer_iter()
        .filter(|row| items.iter().all(|item| row[item.index()]))
        .count();
    hits as f64 / total as f64
}

fn count_indexed(items: &[ItemId], table: &TransactionTable) -> u64 {
    let mut bitmaps: Vec<&RoaringBitmap> = items.iter().map(|&item| table.tids(item)).collect();
    bitmaps.sort_by_key(|bitmap| bitmap.len());

    let (first, rest) = match bitmaps.split_first() {
        Some(split) => split,
        None => return 0,
    };
    if rest.is_empty() {
        return first.len();
    }
    let mut acc = (*first).clone();
    for bitmap in rest {
        acc &= *bitmap;
        if acc.is_empty() {
            return 0;
        }
    }
    acc.len()
}

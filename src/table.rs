//! Boolean transaction-by-item incidence table with a per-item transaction index

use std::collections::{BTreeSet, HashMap};

use ndarray::Array2;
use roaring::RoaringBitmap;

use crate::itemset::ItemId;

/// Read-only basket table shared by every stage of a mining run.
///
/// Rows are transactions, columns are items. Alongside the incidence matrix
/// the table keeps, for each item, the bitmap of row indices containing it,
/// so support counting is a bitmap intersection rather than a full scan.
#[derive(Debug, Clone)]
pub struct TransactionTable {
    /// Item names sorted ascending; position is the item's id
    items: Vec<String>,
    /// Transaction identifiers in first-seen order; position is the row index
    transaction_ids: Vec<String>,
    /// Incidence matrix (n_transactions, n_items)
    incidence: Array2<bool>,
    /// Row indices containing each item, indexed by item id
    tids: Vec<RoaringBitmap>,
}

impl TransactionTable {
    /// Build a table from `(transaction id, items)` pairs.
    ///
    /// Repeated items within a transaction collapse, repeated transaction ids
    /// merge, and transactions without any item are dropped.
    pub fn from_transactions<I, T, J, S>(transactions: I) -> Self
    where
        I: IntoIterator<Item = (T, J)>,
        T: Into<String>,
        J: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut rows: Vec<(String, BTreeSet<String>)> = Vec::new();
        let mut row_of: HashMap<String, usize> = HashMap::new();

        for (tid, basket) in transactions {
            let tid = tid.into();
            let basket: BTreeSet<String> =
                basket.into_iter().map(|s| s.as_ref().to_string()).collect();
            if basket.is_empty() {
                continue;
            }
            match row_of.get(&tid) {
                Some(&row) => rows[row].1.extend(basket),
                None => {
                    row_of.insert(tid.clone(), rows.len());
                    rows.push((tid, basket));
                }
            }
        }

        let items: Vec<String> = rows
            .iter()
            .flat_map(|(_, basket)| basket.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut incidence = Array2::from_elem((rows.len(), items.len()), false);
        let mut tids = vec![RoaringBitmap::new(); items.len()];
        let mut transaction_ids = Vec::with_capacity(rows.len());

        for (row, (tid, basket)) in rows.into_iter().enumerate() {
            for name in &basket {
                // every basket item is in the vocabulary by construction
                if let Ok(col) = items.binary_search(name) {
                    incidence[[row, col]] = true;
                    tids[col].insert(row as u32);
                }
            }
            transaction_ids.push(tid);
        }

        Self {
            items,
            transaction_ids,
            incidence,
            tids,
        }
    }

    pub fn transaction_count(&self) -> usize {
        self.transaction_ids.len()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transaction_ids.is_empty()
    }

    /// All item ids in canonical order
    pub fn item_ids(&self) -> impl Iterator<Item = ItemId> {
        (0..self.items.len() as u32).map(ItemId)
    }

    pub fn item_name(&self, id: ItemId) -> &str {
        &self.items[id.index()]
    }

    pub fn item_id(&self, name: &str) -> Option<ItemId> {
        self.items
            .binary_search_by(|known| known.as_str().cmp(name))
            .ok()
            .map(|pos| ItemId(pos as u32))
    }

    pub fn transaction_ids(&self) -> &[String] {
        &self.transaction_ids
    }

    /// Rows containing `item`
    pub fn tids(&self, item: ItemId) -> &RoaringBitmap {
        &self.tids[item.index()]
    }

    pub fn contains(&self, row: usize, item: ItemId) -> bool {
        self.incidence[[row, item.index()]]
    }

    pub fn incidence(&self) -> &Array2<bool> {
        &self.incidence
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_table() -> TransactionTable {
        TransactionTable::from_transactions(vec![
            ("T1", vec!["b", "a"]),
            ("T2", vec!["a", "b", "c"]),
            ("T3", vec!["a"]),
            ("T4", vec!["b", "c"]),
        ])
    }

    #[test]
    fn test_vocabulary_is_sorted() {
        let table = sample_table();
        assert_eq!(table.item_count(), 3);
        assert_eq!(table.transaction_count(), 4);
        let names: Vec<&str> = table.item_ids().map(|id| table.item_name(id)).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(table.item_id("c"), Some(ItemId(2)));
        assert_eq!(table.item_id("zzz"), None);
    }

    #[test]
    fn test_incidence_and_index_agree() {
        let table = sample_table();
        assert_eq!(table.incidence().shape(), &[4, 3]);
        for item in table.item_ids() {
            for row in 0..table.transaction_count() {
                assert_eq!(
                    table.contains(row, item),
                    table.tids(item).contains(row as u32)
                );
            }
        }
        let a = table.item_id("a").unwrap();
        assert_eq!(table.tids(a).len(), 3);
    }

    #[test]
    fn test_duplicates_merge_and_empty_rows_drop() {
        let table = TransactionTable::from_transactions(vec![
            ("T1", vec!["milk", "milk"]),
            ("T2", vec![]),
            ("T1", vec!["bread"]),
        ]);
        assert_eq!(table.transaction_count(), 1);
        assert_eq!(table.transaction_ids(), &["T1".to_string()]);
        assert_eq!(table.item_count(), 2);
        let milk = table.item_id("milk").unwrap();
        assert_eq!(table.tids(milk).len(), 1);
    }

    #[test]
    fn test_empty_table() {
        let table = TransactionTable::from_transactions(Vec::<(&str, Vec<&str>)>::new());
        assert!(table.is_empty());
        assert_eq!(table.item_count(), 0);
        assert_eq!(table.incidence().shape(), &[0, 0]);
    }
}

//! Item identifiers, itemsets and the frequent-itemset collection

use std::collections::HashMap;
use std::fmt;

use crate::error::{MineError, MineResult};
use crate::table::TransactionTable;

/// Interned item identifier.
///
/// Ids are assigned in ascending order of item name when a
/// [`TransactionTable`] is built, so ordering ids orders names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ItemId(pub(crate) u32);

impl ItemId {
    /// Position of the item in the table's vocabulary
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Non-empty, duplicate-free set of items kept in canonical (ascending id) order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Itemset {
    items: Vec<ItemId>,
}

impl Itemset {
    /// Build an itemset from any collection of ids; order and duplicates are ignored
    pub fn new(items: impl IntoIterator<Item = ItemId>) -> MineResult<Self> {
        let mut items: Vec<ItemId> = items.into_iter().collect();
        if items.is_empty() {
            return Err(MineError::invalid(
                "itemset",
                "{}",
                "an itemset must contain at least one item",
            ));
        }
        items.sort_unstable();
        items.dedup();
        Ok(Self { items })
    }

    /// Caller guarantees `items` is non-empty, sorted and duplicate-free
    pub(crate) fn from_sorted(items: Vec<ItemId>) -> Self {
        debug_assert!(!items.is_empty());
        debug_assert!(items.windows(2).all(|w| w[0] < w[1]));
        Self { items }
    }

    pub fn singleton(item: ItemId) -> Self {
        Self { items: vec![item] }
    }

    pub fn items(&self) -> &[ItemId] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item: ItemId) -> bool {
        self.items.binary_search(&item).is_ok()
    }

    pub fn is_subset_of(&self, other: &Itemset) -> bool {
        self.items.iter().all(|&item| other.contains(item))
    }

    pub fn is_disjoint(&self, other: &Itemset) -> bool {
        !self.items.iter().any(|&item| other.contains(item))
    }

    /// Every subset obtained by dropping exactly one member.
    /// Empty for singletons.
    pub fn subsets_without_one(&self) -> impl Iterator<Item = Itemset> + '_ {
        let n = if self.items.len() > 1 { self.items.len() } else { 0 };
        (0..n).map(move |skip| {
            let items = self
                .items
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != skip)
                .map(|(_, &item)| item)
                .collect();
            Itemset::from_sorted(items)
        })
    }

    /// Render the members by name, comma separated
    pub fn render(&self, table: &TransactionTable) -> String {
        self.items
            .iter()
            .map(|&id| table.item_name(id))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for Itemset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, item) in self.items.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "#{}", item.0)?;
        }
        write!(f, "}}")
    }
}

/// An itemset whose support met the mining threshold
#[derive(Debug, Clone, PartialEq)]
pub struct FrequentItemset {
    pub itemset: Itemset,
    /// Fraction of transactions containing every member, in (0, 1]
    pub support: f64,
}

impl FrequentItemset {
    pub fn len(&self) -> usize {
        self.itemset.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itemset.is_empty()
    }
}

/// Result of a mining run: frequent itemsets of every size plus a support lookup
#[derive(Debug, Clone, Default)]
pub struct FrequentItemsets {
    itemsets: Vec<FrequentItemset>,
    supports: HashMap<Itemset, f64>,
    transaction_count: usize,
}

impl FrequentItemsets {
    pub fn new(transaction_count: usize) -> Self {
        Self {
            transaction_count,
            ..Self::default()
        }
    }

    /// Build a collection from arbitrary (itemset, support) pairs.
    /// Every support must lie in (0, 1]. No closure check is made here;
    /// rule generation reports gaps.
    pub fn from_pairs(
        transaction_count: usize,
        pairs: impl IntoIterator<Item = (Itemset, f64)>,
    ) -> MineResult<Self> {
        let mut collection = Self::new(transaction_count);
        for (itemset, support) in pairs {
            if !(support > 0.0 && support <= 1.0) {
                return Err(MineError::invalid(
                    "support",
                    support,
                    format!("support of {itemset} must be in (0, 1]"),
                ));
            }
            collection.insert(FrequentItemset { itemset, support });
        }
        Ok(collection)
    }

    pub(crate) fn insert(&mut self, frequent: FrequentItemset) {
        if self
            .supports
            .insert(frequent.itemset.clone(), frequent.support)
            .is_none()
        {
            self.itemsets.push(frequent);
        }
    }

    pub fn support_of(&self, itemset: &Itemset) -> Option<f64> {
        self.supports.get(itemset).copied()
    }

    pub fn contains(&self, itemset: &Itemset) -> bool {
        self.supports.contains_key(itemset)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FrequentItemset> {
        self.itemsets.iter()
    }

    /// Frequent itemsets with exactly `k` members
    pub fn level(&self, k: usize) -> impl Iterator<Item = &FrequentItemset> {
        self.itemsets.iter().filter(move |f| f.len() == k)
    }

    /// Size of the largest frequent itemset, 0 when empty
    pub fn max_len(&self) -> usize {
        self.itemsets.iter().map(FrequentItemset::len).max().unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.itemsets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.itemsets.is_empty()
    }

    /// Number of transactions in the table the collection was mined from
    pub fn transaction_count(&self) -> usize {
        self.transaction_count
    }
}

impl<'a> IntoIterator for &'a FrequentItemsets {
    type Item = &'a FrequentItemset;
    type IntoIter = std::slice::Iter<'a, FrequentItemset>;

    fn into_iter(self) -> Self::IntoIter {
        self.itemsets.iter()
    }
}

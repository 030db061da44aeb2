//! Minimal add/remove diff between a product's current tag associations and
//! a desired tag list.
//!
//! This is the pure half of tag reconciliation: it decides *what* must change
//! and leaves dispatching the inserts and deletes to the caller.
//!
//! # Rules
//!
//! - A desired tag that no current row carries is added, in the order it was
//!   requested. Repeated tag ids in the request are added once.
//! - A current row whose tag is not desired is removed.
//! - A current row whose tag *is* desired is kept. If several rows carry the
//!   same tag, the first is kept and the rest are removed, so every
//!   `(product, tag)` pair ends up with exactly one row.

use std::collections::HashSet;

use crate::types::{ProductTag, ProductTagId, TagId};

/// The inserts and deletes needed to bring a product's tags in line with a
/// desired list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagDiff {
    /// Tag ids that need a new association row, in request order.
    pub to_add: Vec<TagId>,
    /// Association rows that must be deleted.
    pub to_remove: Vec<ProductTagId>,
}

impl TagDiff {
    /// Compute the diff between `current` rows and the `desired` tag ids.
    #[must_use]
    pub fn compute(current: &[ProductTag], desired: &[TagId]) -> Self {
        let desired_set: HashSet<TagId> = desired.iter().copied().collect();

        let mut kept: HashSet<TagId> = HashSet::with_capacity(current.len());
        let mut to_remove = Vec::new();
        for row in current {
            if desired_set.contains(&row.tag_id) && kept.insert(row.tag_id) {
                continue;
            }
            to_remove.push(row.id);
        }

        let mut seen: HashSet<TagId> = HashSet::with_capacity(desired.len());
        let to_add = desired
            .iter()
            .copied()
            .filter(|tag_id| !kept.contains(tag_id) && seen.insert(*tag_id))
            .collect();

        Self { to_add, to_remove }
    }

    /// Returns `true` when the current rows already match the desired list.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductId;

    fn row(id: i32, tag_id: i32) -> ProductTag {
        ProductTag {
            id: ProductTagId::new(id),
            product_id: ProductId::new(1),
            tag_id: TagId::new(tag_id),
        }
    }

    fn tags(ids: &[i32]) -> Vec<TagId> {
        ids.iter().copied().map(TagId::new).collect()
    }

    #[test]
    fn test_swaps_one_tag_and_keeps_the_shared_one() {
        // Product carries tags {1, 2}; client asks for [2, 3].
        let current = [row(10, 1), row(11, 2)];
        let diff = TagDiff::compute(&current, &tags(&[2, 3]));

        assert_eq!(diff.to_add, tags(&[3]));
        assert_eq!(diff.to_remove, vec![ProductTagId::new(10)]);
    }

    #[test]
    fn test_empty_desired_removes_everything() {
        let current = [row(10, 1), row(11, 2), row(12, 5)];
        let diff = TagDiff::compute(&current, &[]);

        assert!(diff.to_add.is_empty());
        assert_eq!(
            diff.to_remove,
            vec![
                ProductTagId::new(10),
                ProductTagId::new(11),
                ProductTagId::new(12)
            ]
        );
    }

    #[test]
    fn test_no_current_rows_adds_in_request_order() {
        let diff = TagDiff::compute(&[], &tags(&[4, 1, 3]));
        assert_eq!(diff.to_add, tags(&[4, 1, 3]));
        assert!(diff.to_remove.is_empty());
    }

    #[test]
    fn test_matching_set_is_a_no_op() {
        let current = [row(10, 1), row(11, 2)];
        let diff = TagDiff::compute(&current, &tags(&[2, 1]));
        assert!(diff.is_empty());
    }

    #[test]
    fn test_repeated_desired_ids_are_added_once() {
        let diff = TagDiff::compute(&[row(10, 1)], &tags(&[3, 1, 3, 2, 2]));
        assert_eq!(diff.to_add, tags(&[3, 2]));
        assert!(diff.to_remove.is_empty());
    }

    #[test]
    fn test_duplicate_current_rows_are_collapsed() {
        let current = [row(10, 2), row(11, 2), row(12, 4)];
        let diff = TagDiff::compute(&current, &tags(&[2]));

        assert!(diff.to_add.is_empty());
        assert_eq!(
            diff.to_remove,
            vec![ProductTagId::new(11), ProductTagId::new(12)]
        );
    }
}

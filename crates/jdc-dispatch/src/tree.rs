//! `DecisionTreeNode` (§3, §4.8): a binary discriminator tree over parameter
//! type ids, used as an alternative to linear/binary scan once a family has
//! enough entries to make the tree's depth pay for itself.

use jdc_types::TypeId;

/// `{discriminator_type_index, discriminator_type_id, left, right, terminal?}` (§3).
///
/// An internal node tests whether the call's argument type at
/// `discriminator_type_index` equals `discriminator_type_id`, recursing into
/// `left` on match and `right` otherwise. A node with `terminal = Some(_)` is
/// a leaf naming the winning entry's index. A node with neither a
/// discriminator nor a `terminal` (possible only when the depth cap is hit
/// before a partition shrinks to one entry) is a degenerate leaf:
/// `fallback_indices` names the entries still in that partition, and the
/// caller linear-scans them by full type signature.
#[repr(align(64))]
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecisionTreeNode {
    pub discriminator_type_index: Option<usize>,
    pub discriminator_type_id: Option<TypeId>,
    pub left: Option<Box<DecisionTreeNode>>,
    pub right: Option<Box<DecisionTreeNode>>,
    pub terminal: Option<u32>,
    pub fallback_indices: Vec<u32>,
}

impl DecisionTreeNode {
    #[must_use]
    pub fn leaf(entry_index: u32) -> Self {
        Self {
            discriminator_type_index: None,
            discriminator_type_id: None,
            left: None,
            right: None,
            terminal: Some(entry_index),
            fallback_indices: Vec::new(),
        }
    }

    #[must_use]
    pub fn degenerate(fallback_indices: Vec<u32>) -> Self {
        Self {
            discriminator_type_index: None,
            discriminator_type_id: None,
            left: None,
            right: None,
            terminal: None,
            fallback_indices,
        }
    }

    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }

    /// Depth of the deepest leaf, used by tests and the builder's depth-cap
    /// assertion.
    #[must_use]
    pub fn depth(&self) -> usize {
        match (&self.left, &self.right) {
            (None, None) => 1,
            (left, right) => {
                let l = left.as_ref().map_or(0, |n| n.depth());
                let r = right.as_ref().map_or(0, |n| n.depth());
                1 + l.max(r)
            }
        }
    }
}

//! Regression tree in structure-of-arrays layout.
//!
//! Nodes live in flat arrays indexed by node id, root at 0. Split nodes
//! are numeric (`value < threshold` goes left) or categorical (category id
//! in the node's set goes right). A NaN feature value follows the node's
//! default direction.

use super::schema::TreeSchema;

/// Node index within a tree.
pub type NodeId = u32;

/// Type of split in a decision tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitType {
    #[default]
    Numeric,
    Categorical,
}

// =============================================================================
// Categorical bitsets
// =============================================================================

/// Packed category bitsets for the categorical split nodes of one tree.
///
/// Bit `c` of a node's bitset is set when category `c` goes right.
#[derive(Debug, Clone, Default)]
pub struct CategoriesStorage {
    words: Box<[u32]>,
    /// Per node `(start, len)` into `words`; `(0, 0)` for non-categorical nodes.
    segments: Box<[(u32, u32)]>,
}

impl CategoriesStorage {
    #[inline]
    pub fn category_goes_right(&self, node: NodeId, category: u32) -> bool {
        let Some(&(start, len)) = self.segments.get(node as usize) else {
            return false;
        };
        let word = category >> 5;
        if word >= len {
            return false;
        }
        (self.words[(start + word) as usize] >> (category & 31)) & 1 != 0
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Exclusive upper bound on category ids in a split set.
///
/// Bounds the bitset at 2048 words per node.
pub const MAX_CATEGORY: u32 = 1 << 16;

/// Pack category ids into `u32` words, 32 categories per word.
pub fn categories_to_bitset(categories: &[u32]) -> Vec<u32> {
    let Some(max_cat) = categories.iter().copied().max() else {
        return Vec::new();
    };
    let mut bitset = vec![0u32; (max_cat >> 5) as usize + 1];
    for &cat in categories {
        bitset[(cat >> 5) as usize] |= 1 << (cat & 31);
    }
    bitset
}

/// Convert an encoded feature value to a category id.
///
/// Negative or fractional values do not name a category and map to `None`.
#[inline]
fn float_to_category(value: f32) -> Option<u32> {
    if value >= 0.0 && value == value.trunc() {
        Some(value as u32)
    } else {
        None
    }
}

// =============================================================================
// Validation
// =============================================================================

/// Structural validation errors for [`Tree`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeValidationError {
    #[error("tree has no nodes")]
    EmptyTree,
    #[error("array {array} has length {len}, expected {n_nodes}")]
    LengthMismatch {
        array: &'static str,
        len: usize,
        n_nodes: usize,
    },
    #[error("node {node} {side} child {child} out of bounds ({n_nodes} nodes)")]
    ChildOutOfBounds {
        node: NodeId,
        side: &'static str,
        child: NodeId,
        n_nodes: usize,
    },
    #[error("node {node} has only one child")]
    HalfLeaf { node: NodeId },
    #[error("node {node} reached more than once")]
    DuplicateVisit { node: NodeId },
    #[error("node {node} unreachable from root")]
    UnreachableNode { node: NodeId },
    #[error("node {node} splits on feature {feature}, model has {n_features}")]
    FeatureOutOfRange {
        node: NodeId,
        feature: u32,
        n_features: usize,
    },
    #[error("categories reference node {node}, which is not a split node")]
    InvalidCategoryNode { node: NodeId },
    #[error("node {node} lists category {category}, limit is {max}")]
    CategoryOutOfRange { node: NodeId, category: u32, max: u32 },
}

// =============================================================================
// Tree
// =============================================================================

/// Immutable regression tree with scalar leaves.
#[derive(Debug, Clone)]
pub struct Tree {
    split_indices: Box<[u32]>,
    split_thresholds: Box<[f32]>,
    left_children: Box<[u32]>,
    right_children: Box<[u32]>,
    default_left: Box<[bool]>,
    is_leaf: Box<[bool]>,
    leaf_values: Box<[f64]>,
    split_types: Box<[SplitType]>,
    categories: CategoriesStorage,
}

impl Tree {
    /// Build and validate a tree from its serialized form.
    ///
    /// `n_features` is the encoded width; split indices must be below it.
    pub fn from_schema(schema: &TreeSchema, n_features: usize) -> Result<Self, TreeValidationError> {
        let n_nodes = schema.children_left.len();
        if n_nodes == 0 {
            return Err(TreeValidationError::EmptyTree);
        }
        let lengths = [
            ("split_indices", schema.split_indices.len()),
            ("thresholds", schema.thresholds.len()),
            ("children_right", schema.children_right.len()),
            ("default_left", schema.default_left.len()),
            ("leaf_values", schema.leaf_values.len()),
        ];
        for (array, len) in lengths {
            if len != n_nodes {
                return Err(TreeValidationError::LengthMismatch {
                    array,
                    len,
                    n_nodes,
                });
            }
        }
        if schema.categories.category_sets.len() != schema.categories.node_indices.len() {
            return Err(TreeValidationError::LengthMismatch {
                array: "category_sets",
                len: schema.categories.category_sets.len(),
                n_nodes: schema.categories.node_indices.len(),
            });
        }

        let is_leaf: Vec<bool> = schema.children_left.iter().map(|&c| c == 0).collect();

        let mut split_types = vec![SplitType::Numeric; n_nodes];
        let mut words = Vec::new();
        let mut segments = vec![(0u32, 0u32); n_nodes];
        for (&node, set) in schema
            .categories
            .node_indices
            .iter()
            .zip(&schema.categories.category_sets)
        {
            if node as usize >= n_nodes || is_leaf[node as usize] {
                return Err(TreeValidationError::InvalidCategoryNode { node });
            }
            if let Some(&category) = set.iter().find(|&&c| c >= MAX_CATEGORY) {
                return Err(TreeValidationError::CategoryOutOfRange {
                    node,
                    category,
                    max: MAX_CATEGORY,
                });
            }
            let bitset = categories_to_bitset(set);
            segments[node as usize] = (words.len() as u32, bitset.len() as u32);
            split_types[node as usize] = SplitType::Categorical;
            words.extend(bitset);
        }

        let tree = Self {
            split_indices: schema.split_indices.clone().into_boxed_slice(),
            split_thresholds: schema.thresholds.iter().map(|&t| t as f32).collect(),
            left_children: schema.children_left.clone().into_boxed_slice(),
            right_children: schema.children_right.clone().into_boxed_slice(),
            default_left: schema.default_left.clone().into_boxed_slice(),
            is_leaf: is_leaf.into_boxed_slice(),
            leaf_values: schema.leaf_values.clone().into_boxed_slice(),
            split_types: split_types.into_boxed_slice(),
            categories: CategoriesStorage {
                words: words.into_boxed_slice(),
                segments: segments.into_boxed_slice(),
            },
        };
        tree.validate(n_features)?;
        Ok(tree)
    }

    /// Check child pointers, reachability and feature indices.
    ///
    /// Every node must be reached exactly once from the root, which rules
    /// out cycles and shared subtrees.
    pub fn validate(&self, n_features: usize) -> Result<(), TreeValidationError> {
        let n_nodes = self.n_nodes();
        let mut visited = vec![false; n_nodes];
        let mut stack: Vec<NodeId> = vec![0];

        while let Some(node) = stack.pop() {
            let idx = node as usize;
            if visited[idx] {
                return Err(TreeValidationError::DuplicateVisit { node });
            }
            visited[idx] = true;
            if self.is_leaf[idx] {
                continue;
            }

            let right = self.right_children[idx];
            if right == 0 {
                return Err(TreeValidationError::HalfLeaf { node });
            }
            for (side, child) in [("left", self.left_children[idx]), ("right", right)] {
                if child as usize >= n_nodes {
                    return Err(TreeValidationError::ChildOutOfBounds {
                        node,
                        side,
                        child,
                        n_nodes,
                    });
                }
                stack.push(child);
            }

            let feature = self.split_indices[idx];
            if feature as usize >= n_features {
                return Err(TreeValidationError::FeatureOutOfRange {
                    node,
                    feature,
                    n_features,
                });
            }
        }

        if let Some(node) = visited.iter().position(|&v| !v) {
            return Err(TreeValidationError::UnreachableNode { node: node as NodeId });
        }
        Ok(())
    }

    #[inline]
    pub fn n_nodes(&self) -> usize {
        self.is_leaf.len()
    }

    pub fn n_leaves(&self) -> usize {
        self.is_leaf.iter().filter(|&&l| l).count()
    }

    pub fn has_categorical(&self) -> bool {
        !self.categories.is_empty()
    }

    /// Walk from the root to the leaf reached by `features`.
    #[inline]
    pub fn traverse_to_leaf(&self, features: &[f32]) -> NodeId {
        let mut node: NodeId = 0;
        while !self.is_leaf[node as usize] {
            let idx = node as usize;
            let value = features[self.split_indices[idx] as usize];

            let go_left = if value.is_nan() {
                self.default_left[idx]
            } else {
                match self.split_types[idx] {
                    SplitType::Numeric => value < self.split_thresholds[idx],
                    SplitType::Categorical => !float_to_category(value)
                        .is_some_and(|c| self.categories.category_goes_right(node, c)),
                }
            };

            node = if go_left {
                self.left_children[idx]
            } else {
                self.right_children[idx]
            };
        }
        node
    }

    /// Leaf value reached by `features`.
    #[inline]
    pub fn predict_row(&self, features: &[f32]) -> f64 {
        self.leaf_values[self.traverse_to_leaf(features) as usize]
    }
}

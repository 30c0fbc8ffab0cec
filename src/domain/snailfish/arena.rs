//! Arena storage for snailfish numbers.
//!
//! Nodes live in a generational arena and refer to each other by `Index`.
//! Parent handles are plain indices, so the child -> parent back-links never
//! form ownership cycles.

use std::fmt;

use generational_arena::{Arena, Index};
use termtree::Tree;
use tracing::instrument;

use crate::domain::error::{DomainError, DomainResult};

/// Payload of a node: a regular number or a pair of child handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Regular(u64),
    Pair { left: Index, right: Index },
}

/// Node in the arena-based snailfish tree.
#[derive(Debug, Clone)]
pub struct SnailNode {
    /// Regular value or child handles
    pub kind: NodeKind,
    /// Index of the enclosing pair, None for the root
    pub parent: Option<Index>,
}

/// Arena-independent shape of a snailfish number, produced by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Element {
    Regular(u64),
    Pair(Box<Element>, Box<Element>),
}

/// A snailfish number: one arena plus the handle of its root node.
///
/// Every number owns its arena. Combining two numbers copies both into a
/// fresh arena, so operands are never mutated by `add`.
#[derive(Debug, Clone)]
pub struct SnailNumber {
    pub(super) arena: Arena<SnailNode>,
    pub(super) root: Index,
}

impl SnailNumber {
    /// A number consisting of a single regular value.
    pub fn regular(value: u64) -> Self {
        let mut arena = Arena::new();
        let root = arena.insert(SnailNode {
            kind: NodeKind::Regular(value),
            parent: None,
        });
        Self { arena, root }
    }

    #[instrument(level = "trace")]
    pub fn from_element(element: &Element) -> Self {
        let mut arena = Arena::new();
        let root = place(&mut arena, element, None);
        Self { arena, root }
    }

    /// Wrap deep copies of `left` and `right` under a new pair root. No reduction.
    #[instrument(level = "trace", skip_all)]
    pub fn join(left: &SnailNumber, right: &SnailNumber) -> Self {
        let mut arena = Arena::with_capacity(left.len() + right.len() + 1);
        let root = arena.insert(SnailNode {
            kind: NodeKind::Regular(0),
            parent: None,
        });
        let left_idx = graft(&mut arena, left, left.root, Some(root));
        let right_idx = graft(&mut arena, right, right.root, Some(root));
        arena[root].kind = NodeKind::Pair {
            left: left_idx,
            right: right_idx,
        };
        Self { arena, root }
    }

    pub fn root(&self) -> Index {
        self.root
    }

    pub fn node(&self, idx: Index) -> &SnailNode {
        &self.arena[idx]
    }

    pub(super) fn node_mut(&mut self, idx: Index) -> &mut SnailNode {
        &mut self.arena[idx]
    }

    /// Number of live nodes (regulars and pairs).
    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn is_regular(&self) -> bool {
        matches!(self.node(self.root).kind, NodeKind::Regular(_))
    }

    /// Value of `idx` if it is a regular node.
    pub fn regular_value(&self, idx: Index) -> Option<u64> {
        match self.node(idx).kind {
            NodeKind::Regular(value) => Some(value),
            NodeKind::Pair { .. } => None,
        }
    }

    /// Left-to-right pre-order walk yielding `(index, depth, node)`; the root has depth 0.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder::new(self)
    }

    /// Regular values in left-to-right order.
    pub fn regulars(&self) -> Vec<u64> {
        self.iter()
            .filter_map(|(_, _, node)| match node.kind {
                NodeKind::Regular(value) => Some(value),
                NodeKind::Pair { .. } => None,
            })
            .collect()
    }

    /// Nesting depth of the deepest pair; a lone regular has depth 0.
    pub fn depth(&self) -> usize {
        self.iter()
            .filter(|(_, _, node)| matches!(node.kind, NodeKind::Pair { .. }))
            .map(|(_, depth, _)| depth + 1)
            .max()
            .unwrap_or(0)
    }

    /// Regular -> its value; pair -> `3 * left + 2 * right`.
    ///
    /// Unreduced numbers can be deep enough for this to leave `u64`; that is
    /// reported as `DomainError::Overflow`.
    #[instrument(level = "debug", skip(self))]
    pub fn magnitude(&self) -> DomainResult<u64> {
        self.magnitude_of(self.root)
            .ok_or_else(|| DomainError::Overflow(format!("magnitude of {}", self)))
    }

    fn magnitude_of(&self, idx: Index) -> Option<u64> {
        match self.node(idx).kind {
            NodeKind::Regular(value) => Some(value),
            NodeKind::Pair { left, right } => self
                .magnitude_of(left)?
                .checked_mul(3)?
                .checked_add(self.magnitude_of(right)?.checked_mul(2)?),
        }
    }

    /// Arena-independent copy of the tree shape.
    pub fn to_element(&self) -> Element {
        self.element_of(self.root)
    }

    fn element_of(&self, idx: Index) -> Element {
        match self.node(idx).kind {
            NodeKind::Regular(value) => Element::Regular(value),
            NodeKind::Pair { left, right } => Element::Pair(
                Box::new(self.element_of(left)),
                Box::new(self.element_of(right)),
            ),
        }
    }

    /// Render the number as an indented tree, pairs labelled by their magnitude.
    pub fn to_tree_string(&self) -> Tree<String> {
        self.tree_of(self.root)
    }

    fn tree_of(&self, idx: Index) -> Tree<String> {
        match self.node(idx).kind {
            NodeKind::Regular(value) => Tree::new(value.to_string()),
            NodeKind::Pair { left, right } => {
                let label = match self.magnitude_of(idx) {
                    Some(m) => format!("pair (magnitude {})", m),
                    None => "pair (magnitude overflows)".to_string(),
                };
                Tree::new(label)
                    .with_leaves([self.tree_of(left), self.tree_of(right)])
            }
        }
    }

    fn write_node(&self, f: &mut fmt::Formatter<'_>, idx: Index) -> fmt::Result {
        match self.node(idx).kind {
            NodeKind::Regular(value) => write!(f, "{}", value),
            NodeKind::Pair { left, right } => {
                write!(f, "[")?;
                self.write_node(f, left)?;
                write!(f, ",")?;
                self.write_node(f, right)?;
                write!(f, "]")
            }
        }
    }
}

impl fmt::Display for SnailNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_node(f, self.root)
    }
}

/// Structural equality; arena layout and handles are ignored.
impl PartialEq for SnailNumber {
    fn eq(&self, other: &Self) -> bool {
        self.to_element() == other.to_element()
    }
}

impl Eq for SnailNumber {}

fn place(arena: &mut Arena<SnailNode>, element: &Element, parent: Option<Index>) -> Index {
    match element {
        Element::Regular(value) => arena.insert(SnailNode {
            kind: NodeKind::Regular(*value),
            parent,
        }),
        Element::Pair(left, right) => {
            let idx = arena.insert(SnailNode {
                kind: NodeKind::Regular(0),
                parent,
            });
            let left = place(arena, left, Some(idx));
            let right = place(arena, right, Some(idx));
            arena[idx].kind = NodeKind::Pair { left, right };
            idx
        }
    }
}

// Copy the subtree at `idx` of `source` into `arena` below `parent`.
fn graft(
    arena: &mut Arena<SnailNode>,
    source: &SnailNumber,
    idx: Index,
    parent: Option<Index>,
) -> Index {
    match source.node(idx).kind {
        NodeKind::Regular(value) => arena.insert(SnailNode {
            kind: NodeKind::Regular(value),
            parent,
        }),
        NodeKind::Pair { left, right } => {
            let copy = arena.insert(SnailNode {
                kind: NodeKind::Regular(0),
                parent,
            });
            let left = graft(arena, source, left, Some(copy));
            let right = graft(arena, source, right, Some(copy));
            arena[copy].kind = NodeKind::Pair { left, right };
            copy
        }
    }
}

pub struct PreOrder<'a> {
    number: &'a SnailNumber,
    stack: Vec<(Index, usize)>,
}

impl<'a> PreOrder<'a> {
    fn new(number: &'a SnailNumber) -> Self {
        Self {
            number,
            stack: vec![(number.root, 0)],
        }
    }
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (Index, usize, &'a SnailNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (idx, depth) = self.stack.pop()?;
        let node = self.number.node(idx);
        if let NodeKind::Pair { left, right } = node.kind {
            // Right first so the left child is popped next
            self.stack.push((right, depth + 1));
            self.stack.push((left, depth + 1));
        }
        Some((idx, depth, node))
    }
}

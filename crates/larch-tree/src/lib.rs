//! Arena-backed CSS syntax tree for the larch parser.
//!
//! # Design
//!
//! All nodes of one parse live in a single [`Arena`]: a contiguous store of
//! fixed-size records addressed by [`NodeId`] (a 32-bit index, with 0
//! reserved as "null"). Parent/child/sibling relationships are integer
//! indices rather than owning pointers, so the tree is cheap to build, cache
//! friendly to traverse, and free of borrow-checker cycles.
//!
//! Nodes never store text. Every textual attribute — the node's own source
//! text, an at-rule name, a declaration property, a prelude — is a byte range
//! into the original source, resolved lazily by the [`Node`] handle. Slicing
//! is zero-copy.
//!
//! The tree is append-only while a parse is running and read-only afterward;
//! [`SyntaxTree`] bundles the finished arena with the source it indexes into.
//!
//! Traversal lives in [`walk`]: pre-order [`walk()`](walk::walk) with a
//! single visitor, [`traverse()`](walk::traverse) with enter/leave
//! callbacks, and [`traverse_with_context()`](walk::traverse_with_context)
//! which additionally tracks the closest ancestor rule, at-rule,
//! declaration, value, and selector list.

/// The node arena: records, ids, and child linkage.
pub mod arena;
/// Node kind tags, node flags, and attribute-selector operator codes.
pub mod kind;
/// The borrowing node handle and child iteration.
pub mod node;
/// Tree traversal: `walk`, `traverse`, and ancestor-context tracking.
pub mod walk;

pub use arena::{Arena, NodeData, NodeId};
pub use kind::{flags, AttrCase, AttrOperator, NodeKind};
pub use node::{Children, Node};
pub use walk::{
    traverse, traverse_with_context, walk, ContextTraverser, Traverser, Visit, WalkContext,
};

/// A finished parse: the node arena plus the source text it indexes into.
///
/// The tree owns the arena and borrows the source. [`Node`] handles obtained
/// from it borrow both and are `Copy`; they must not outlive the tree.
#[derive(Debug)]
pub struct SyntaxTree<'src> {
    arena: Arena,
    source: &'src str,
    root: NodeId,
}

impl<'src> SyntaxTree<'src> {
    /// Bundle an arena with the source it was built from.
    #[must_use]
    pub const fn new(arena: Arena, source: &'src str, root: NodeId) -> Self {
        Self {
            arena,
            source,
            root,
        }
    }

    /// The root node of the tree.
    ///
    /// # Panics
    /// Panics if the tree was constructed with a root id that is not in the
    /// arena; trees built by the parser always have a valid root.
    #[must_use]
    pub fn root(&self) -> Node<'_> {
        Node::new(&self.arena, self.source, self.root)
            .expect("syntax tree root must be a valid arena index")
    }

    /// Look up an arbitrary node by id.
    #[must_use]
    pub fn node(&self, id: NodeId) -> Option<Node<'_>> {
        Node::new(&self.arena, self.source, id)
    }

    /// The underlying arena.
    #[must_use]
    pub const fn arena(&self) -> &Arena {
        &self.arena
    }

    /// The source text this tree indexes into.
    #[must_use]
    pub const fn source(&self) -> &'src str {
        self.source
    }
}

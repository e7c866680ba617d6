//! The node arena: a flat, index-addressed store of all AST nodes for one
//! parse.
//!
//! Nodes are fixed-size records in one contiguous `Vec`, addressed by
//! [`NodeId`]. Index 0 is reserved as "null" and holds an inert sentinel
//! record, so `first_child == NodeId::NULL` reads as "no children" without
//! an `Option` per link. The arena is append-only: ids handed out by
//! [`Arena::create_node`] stay valid for the arena's lifetime.

use crate::kind::NodeKind;

/// A 32-bit index into the arena. 0 is the reserved null id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The reserved null id: "no node".
    pub const NULL: Self = Self(0);

    /// Whether this is the null id.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// The raw index value.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self.0
    }

    /// Rebuild an id from a raw index previously obtained via
    /// [`NodeId::as_u32`].
    #[must_use]
    pub const fn from_u32(raw: u32) -> Self {
        Self(raw)
    }

    const fn index(self) -> usize {
        self.0 as usize
    }
}

/// One node record. Every field is fixed-size; text is always a byte range
/// into the parse source, never stored here.
#[derive(Debug, Clone, Copy)]
pub struct NodeData {
    /// Node kind tag.
    pub kind: NodeKind,
    /// Byte offset of the node's first byte in the source.
    pub start: u32,
    /// Byte length of the node's span; `start + length` is half-open.
    pub length: u32,
    /// 1-based line of the node's first byte.
    pub line: u32,
    /// 1-based byte column of the node's first byte.
    pub column: u32,
    /// Offset of the inner "name" range, relative to `start`.
    pub content_delta: u32,
    /// Byte length of the inner "name" range; 0 means no name.
    pub content_length: u32,
    /// Offset of the inner "value" range, relative to `start`.
    pub value_delta: u32,
    /// Byte length of the inner "value" range; 0 means no value.
    pub value_length: u32,
    /// Boolean facts and packed attribute-operator codes; see
    /// [`crate::kind::flags`].
    pub flags: u16,
    /// First child, or null.
    pub first_child: NodeId,
    /// Next sibling in source order, or null.
    pub next_sibling: NodeId,
    /// Parent, or null for the root.
    pub parent: NodeId,
}

impl NodeData {
    const fn sentinel() -> Self {
        Self {
            kind: NodeKind::Stylesheet,
            start: 0,
            length: 0,
            line: 0,
            column: 0,
            content_delta: 0,
            content_length: 0,
            value_delta: 0,
            value_length: 0,
            flags: 0,
            first_child: NodeId::NULL,
            next_sibling: NodeId::NULL,
            parent: NodeId::NULL,
        }
    }
}

/// The append-only node store for one parse session.
#[derive(Debug, Clone)]
pub struct Arena {
    nodes: Vec<NodeData>,
}

impl Arena {
    /// Create an empty arena containing only the null sentinel.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(1)
    }

    /// Create an empty arena pre-sized for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity.max(1));
        nodes.push(NodeData::sentinel());
        Self { nodes }
    }

    /// Create an arena pre-sized for a source of `source_len` bytes.
    #[must_use]
    pub fn for_source(source_len: usize) -> Self {
        Self::with_capacity(Self::capacity_for_source(source_len))
    }

    /// Initial node capacity for a source of the given byte length.
    ///
    /// Typical stylesheets produce roughly one node per 12–16 bytes of
    /// input; the arena grows on demand past this estimate.
    #[must_use]
    pub const fn capacity_for_source(source_len: usize) -> usize {
        source_len / 14 + 8
    }

    /// Number of records in the arena, including the null sentinel.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no real nodes (only the sentinel).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.len() <= 1
    }

    /// Append a new unlinked node and return its id.
    ///
    /// `start`/`length` are byte offsets into the source; `line`/`column`
    /// are 1-based. The node's links and inner ranges start out empty.
    pub fn create_node(
        &mut self,
        kind: NodeKind,
        start: usize,
        length: usize,
        line: u32,
        column: u32,
    ) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(NodeData {
            kind,
            start: start as u32,
            length: length as u32,
            line,
            column,
            ..NodeData::sentinel()
        });
        id
    }

    /// Look up a node record.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&NodeData> {
        if id.is_null() {
            return None;
        }
        self.nodes.get(id.index())
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut NodeData> {
        if id.is_null() {
            return None;
        }
        self.nodes.get_mut(id.index())
    }

    /// Update a node's span length, in bytes.
    pub fn set_length(&mut self, id: NodeId, length: usize) {
        if let Some(node) = self.get_mut(id) {
            node.length = length as u32;
        }
    }

    /// Set one or more flag bits on a node (existing bits are kept).
    pub fn set_flag(&mut self, id: NodeId, bits: u16) {
        if let Some(node) = self.get_mut(id) {
            node.flags |= bits;
        }
    }

    /// Set the start of the inner "name" range, relative to the node start.
    pub fn set_content_delta(&mut self, id: NodeId, delta: usize) {
        if let Some(node) = self.get_mut(id) {
            node.content_delta = delta as u32;
        }
    }

    /// Set the byte length of the inner "name" range.
    pub fn set_content_length(&mut self, id: NodeId, length: usize) {
        if let Some(node) = self.get_mut(id) {
            node.content_length = length as u32;
        }
    }

    /// Set the start of the inner "value" range, relative to the node start.
    pub fn set_value_delta(&mut self, id: NodeId, delta: usize) {
        if let Some(node) = self.get_mut(id) {
            node.value_delta = delta as u32;
        }
    }

    /// Set the byte length of the inner "value" range.
    pub fn set_value_length(&mut self, id: NodeId, length: usize) {
        if let Some(node) = self.get_mut(id) {
            node.value_length = length as u32;
        }
    }

    /// Link `children` under `parent`, in order.
    ///
    /// Sets each child's `parent`, threads `next_sibling` through the list,
    /// and attaches the first child to the parent — either as
    /// `first_child` or after the tail of an already-linked child list.
    /// Nothing already linked is overwritten.
    pub fn append_children(&mut self, parent: NodeId, children: &[NodeId]) {
        let Some(&first) = children.first() else {
            return;
        };

        for window in children.windows(2) {
            if let Some(node) = self.get_mut(window[0]) {
                node.next_sibling = window[1];
            }
        }
        for &child in children {
            if let Some(node) = self.get_mut(child) {
                node.parent = parent;
            }
        }

        match self.last_child(parent) {
            Some(tail) => {
                if let Some(node) = self.get_mut(tail) {
                    node.next_sibling = first;
                }
            }
            None => {
                if let Some(node) = self.get_mut(parent) {
                    node.first_child = first;
                }
            }
        }
    }

    fn last_child(&self, parent: NodeId) -> Option<NodeId> {
        let mut current = self.get(parent)?.first_child;
        if current.is_null() {
            return None;
        }
        while let Some(node) = self.get(current) {
            if node.next_sibling.is_null() {
                return Some(current);
            }
            current = node.next_sibling;
        }
        None
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::new()
    }
}

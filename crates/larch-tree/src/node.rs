//! The borrowing node handle.
//!
//! A [`Node`] is `{ arena, source, id }` — cheap to copy on every navigation
//! step. All text accessors slice the original source with the byte ranges
//! stored in the arena; nothing is ever re-allocated or unescaped here.

use crate::arena::{Arena, NodeData, NodeId};
use crate::kind::{flags, AttrCase, AttrOperator, NodeKind};

/// A read-only handle to one node of a [`crate::SyntaxTree`].
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    arena: &'a Arena,
    source: &'a str,
    id: NodeId,
}

impl<'a> Node<'a> {
    /// Build a handle for `id`, if it names a real node in `arena`.
    #[must_use]
    pub fn new(arena: &'a Arena, source: &'a str, id: NodeId) -> Option<Self> {
        let _ = arena.get(id)?;
        Some(Self { arena, source, id })
    }

    fn data(&self) -> &'a NodeData {
        self.arena
            .get(self.id)
            .expect("node handles are only built for valid ids")
    }

    fn handle(&self, id: NodeId) -> Option<Self> {
        Self::new(self.arena, self.source, id)
    }

    /// This node's arena id.
    #[must_use]
    pub const fn id(&self) -> NodeId {
        self.id
    }

    /// The node kind tag.
    #[must_use]
    pub fn kind(&self) -> NodeKind {
        self.data().kind
    }

    /// Byte offset of the node's first byte in the source.
    #[must_use]
    pub fn start(&self) -> usize {
        self.data().start as usize
    }

    /// Half-open byte offset just past the node's span.
    #[must_use]
    pub fn end(&self) -> usize {
        let data = self.data();
        (data.start + data.length) as usize
    }

    /// 1-based line of the node's first byte.
    #[must_use]
    pub fn line(&self) -> u32 {
        self.data().line
    }

    /// 1-based byte column of the node's first byte.
    #[must_use]
    pub fn column(&self) -> u32 {
        self.data().column
    }

    /// The node's source text, sliced zero-copy from the original input.
    #[must_use]
    pub fn text(&self) -> &'a str {
        self.source.get(self.start()..self.end()).unwrap_or("")
    }

    /// The inner "name" text, when the node has one: the at-rule name
    /// without `@`, the declaration property, a function name, an attribute
    /// name, a class/id name.
    #[must_use]
    pub fn name(&self) -> Option<&'a str> {
        let data = self.data();
        if data.content_length == 0 {
            return None;
        }
        let start = (data.start + data.content_delta) as usize;
        self.source
            .get(start..start + data.content_length as usize)
    }

    /// The inner "value" text, when the node has one: the at-rule prelude,
    /// the declaration value, an attribute-selector value.
    #[must_use]
    pub fn value(&self) -> Option<&'a str> {
        let data = self.data();
        if data.value_length == 0 {
            return None;
        }
        let start = (data.start + data.value_delta) as usize;
        self.source.get(start..start + data.value_length as usize)
    }

    /// The raw 16-bit flag word.
    #[must_use]
    pub fn flags(&self) -> u16 {
        self.data().flags
    }

    /// Whether all of the given flag bits are set.
    #[must_use]
    pub fn has_flag(&self, bits: u16) -> bool {
        self.data().flags & bits == bits
    }

    /// Whether this rule or at-rule owns a `{ … }` block.
    #[must_use]
    pub fn has_block(&self) -> bool {
        self.has_flag(flags::HAS_BLOCK)
    }

    /// Whether this declaration carries `!important`.
    #[must_use]
    pub fn important(&self) -> bool {
        self.has_flag(flags::IMPORTANT)
    }

    /// Whether this declaration's property starts with `--`.
    #[must_use]
    pub fn is_custom_property(&self) -> bool {
        self.has_flag(flags::CUSTOM_PROPERTY)
    }

    /// Whether this declaration's property starts with `-vendor-`.
    #[must_use]
    pub fn is_vendor_prefixed(&self) -> bool {
        self.has_flag(flags::VENDOR_PREFIX)
    }

    /// The attribute-selector operator, when this node is an
    /// [`NodeKind::AttributeSelector`].
    #[must_use]
    pub fn attr_operator(&self) -> Option<AttrOperator> {
        if self.kind() != NodeKind::AttributeSelector {
            return None;
        }
        Some(AttrOperator::from_flags(self.flags()))
    }

    /// The attribute-selector case flag, when this node is an
    /// [`NodeKind::AttributeSelector`].
    #[must_use]
    pub fn attr_case(&self) -> Option<AttrCase> {
        if self.kind() != NodeKind::AttributeSelector {
            return None;
        }
        Some(AttrCase::from_flags(self.flags()))
    }

    /// First child, or `None` for a leaf.
    #[must_use]
    pub fn first_child(&self) -> Option<Self> {
        self.handle(self.data().first_child)
    }

    /// Next sibling in source order.
    #[must_use]
    pub fn next_sibling(&self) -> Option<Self> {
        self.handle(self.data().next_sibling)
    }

    /// Parent node, or `None` for the root.
    #[must_use]
    pub fn parent(&self) -> Option<Self> {
        self.handle(self.data().parent)
    }

    /// Whether the node has no children.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data().first_child.is_null()
    }

    /// Iterate over the node's children in source order.
    #[must_use]
    pub fn children(&self) -> Children<'a> {
        Children {
            next: self.first_child(),
        }
    }
}

/// Iterator over a node's children, in source order.
#[derive(Debug, Clone)]
pub struct Children<'a> {
    next: Option<Node<'a>>,
}

impl<'a> Iterator for Children<'a> {
    type Item = Node<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.next_sibling();
        Some(current)
    }
}

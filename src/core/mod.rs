pub mod async_impl;
pub mod sync_impl;

use async_impl::async_node::{AsyncExecNode, AsyncTraversableNode};
use sync_impl::node::{CarrierRef, ExecNode, Node, NodeHash, TraversableNode};

/// The General Executable Enum: any unit a flow can own and drive.
///
/// The four variants cover the capability grid, sync or async crossed with
/// plain or traversable. Which variant a node lands in is decided by the
/// trait it implements, so a sequence can never smuggle the wrong shape
/// past its driver.
pub enum Executable {
    Exec(Box<dyn ExecNode>),
    Traversable(Box<dyn TraversableNode>),
    AsyncExec(Box<dyn AsyncExecNode>),
    AsyncTraversable(Box<dyn AsyncTraversableNode>),
}

impl Executable {
    /// Whether the inner node yields a usable value.
    pub fn is_returning_val(&self) -> bool {
        match self {
            Executable::Exec(node) => node.is_returning_val(),
            Executable::Traversable(node) => node.is_returning_val(),
            Executable::AsyncExec(node) => node.is_returning_val(),
            Executable::AsyncTraversable(node) => node.is_returning_val(),
        }
    }

    /// Whether the inner node expands into a sub-sequence.
    pub fn is_traversable(&self) -> bool {
        matches!(
            self,
            Executable::Traversable(_) | Executable::AsyncTraversable(_)
        )
    }

    /// Binds the inner node (and, for aggregates, its children) to `flow`.
    pub fn set_carrier(&mut self, flow: &CarrierRef) {
        match self {
            Executable::Exec(node) => node.set_carrier(flow),
            Executable::Traversable(node) => node.set_carrier(flow),
            Executable::AsyncExec(node) => node.set_carrier(flow),
            Executable::AsyncTraversable(node) => node.set_carrier(flow),
        }
    }

    /// The inner node's carrier-assigned token, if any.
    pub fn node_hash(&self) -> Option<&NodeHash> {
        match self {
            Executable::Exec(node) => node.node_hash(),
            Executable::Traversable(node) => node.node_hash(),
            Executable::AsyncExec(node) => node.node_hash(),
            Executable::AsyncTraversable(node) => node.node_hash(),
        }
    }
}

use crate::core::sync_impl::{NodeValue, Traversal};
use crate::error::FlowResult;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// The identity token a carrier assigns to a node.
///
/// Opaque to everything except the carrier that minted it; stable for as
/// long as the node stays attached to that carrier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NodeHash(String);

impl NodeHash {
    pub fn new(token: impl Into<String>) -> Self {
        NodeHash(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The identity authority a flow exposes to the nodes it owns.
///
/// Nodes never hold their carrier's node collection, only this authority,
/// so attaching a node to a flow creates no ownership cycle.
pub trait Carrier: Send + Sync {
    /// Stable identity of the carrier itself.
    fn carrier_id(&self) -> Uuid;

    /// Computes the token `node` receives under this carrier.
    ///
    /// Pure in (carrier id, node id): the same node attached to the same
    /// carrier always gets the same token, while a different carrier
    /// always mints a fresh one.
    fn object_hash(&self, node: &NodeCore) -> NodeHash {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::{Hash, Hasher};

        let mut hasher = DefaultHasher::new();
        self.carrier_id().hash(&mut hasher);
        node.id().hash(&mut hasher);
        NodeHash(format!("{:016x}", hasher.finish()))
    }
}

/// Shared handle to a carrier's identity authority.
pub type CarrierRef = Arc<dyn Carrier>;

/// Internal data every node carries.
///
/// The intrinsic id is fixed at construction; carrier binding and token
/// change together on every attachment.
#[derive(Clone)]
pub struct NodeCore {
    id: Uuid,
    carrier: Option<CarrierRef>,
    node_hash: Option<NodeHash>,
}

impl NodeCore {
    pub fn new() -> Self {
        NodeCore {
            id: Uuid::new_v4(),
            carrier: None,
            node_hash: None,
        }
    }

    /// Intrinsic identity, independent of any carrier.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The carrier this node is currently bound to, if any.
    pub fn carrier(&self) -> Option<&CarrierRef> {
        self.carrier.as_ref()
    }

    /// The token assigned by the current carrier, if any.
    pub fn node_hash(&self) -> Option<&NodeHash> {
        self.node_hash.as_ref()
    }

    /// Records a carrier binding together with the token minted for it.
    /// Normally reached through [`Node::set_carrier`]; custom nodes that
    /// override the cascade call this at the end of their own version.
    pub fn attach(&mut self, carrier: CarrierRef, hash: NodeHash) {
        if let Some(previous) = &self.carrier {
            if previous.carrier_id() != carrier.carrier_id() {
                log::debug!(
                    "node {} moves from carrier {} to {}",
                    self.id,
                    previous.carrier_id(),
                    carrier.carrier_id()
                );
            }
        }
        self.carrier = Some(carrier);
        self.node_hash = Some(hash);
    }

    pub(crate) fn store_hash(&mut self, hash: NodeHash) {
        self.node_hash = Some(hash);
    }
}

impl Default for NodeCore {
    fn default() -> Self {
        Self::new()
    }
}

/// The base contract every node satisfies: capability flags, identity,
/// carrier binding.
///
/// Both capability flags are fixed at construction and only ever queried,
/// never computed, by the traversal machinery.
pub trait Node: Send + Sync {
    /// Internal node data.
    fn data(&self) -> &NodeCore;

    /// Mutable access to the internal node data.
    fn data_mut(&mut self) -> &mut NodeCore;

    /// Whether invoking this node yields a usable value.
    fn is_returning_val(&self) -> bool;

    /// Whether this node expands into a sub-sequence instead of a single
    /// result.
    fn is_traversable(&self) -> bool;

    /// Binds this node to `flow`, recomputing its identity token under the
    /// new carrier.
    ///
    /// Re-attachment is always permitted; nothing of the previous carrier
    /// survives.
    fn set_carrier(&mut self, flow: &CarrierRef) {
        let hash = flow.object_hash(self.data());
        self.data_mut().attach(Arc::clone(flow), hash);
    }

    /// Records a precomputed token for this node only, without touching any
    /// children it may have.
    fn set_node_hash(&mut self, hash: NodeHash) {
        self.data_mut().store_hash(hash);
    }

    /// The token assigned by the current carrier, if any.
    fn node_hash(&self) -> Option<&NodeHash> {
        self.data().node_hash()
    }
}

/// A plain node: one parameter in, one outcome out.
pub trait ExecNode: Node {
    fn exec(&self, param: NodeValue) -> FlowResult<NodeValue>;
}

/// A node that expands into a lazy sequence of values.
pub trait TraversableNode: Node {
    /// Starts a fresh walk fed with `param`.
    ///
    /// Every call opens its own scope; nothing carries over between walks.
    /// The walk is advanced only as far as the consumer pulls, so an
    /// unbounded sequence is fine as long as somebody eventually stops.
    fn traverse(&self, param: NodeValue) -> Traversal<'_>;
}

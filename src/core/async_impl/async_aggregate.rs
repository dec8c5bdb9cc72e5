use crate::core::async_impl::async_node::{AsyncTraversal, AsyncTraversableNode};
use crate::core::sync_impl::NodeValue;
use crate::core::sync_impl::node::{Carrier, CarrierRef, Node, NodeCore};
use futures::StreamExt;
use futures::stream;

/// The async twin of [`AggregateNode`](crate::core::sync_impl::aggregate::AggregateNode):
/// an ordered sequence of async traversables exposed as one async
/// traversable node.
///
/// Value threading is identical to the sync side: returning children emit
/// their values and hand the last one to the next child, non-returning
/// children pass the running parameter through once per sub-step, empty
/// sub-sequences leave the parameter untouched, failures travel through
/// unmodified.
pub struct AsyncAggregateNode {
    data: NodeCore,
    returning: bool,
    node_collection: Vec<Box<dyn AsyncTraversableNode>>,
}

impl AsyncAggregateNode {
    pub fn new(is_returning_val: bool) -> Self {
        AsyncAggregateNode {
            data: NodeCore::new(),
            returning: is_returning_val,
            node_collection: Vec::new(),
        }
    }

    /// Appends `node` to the child sequence, binding it to this aggregate's
    /// carrier right away if there is one.
    pub fn add_traversable(&mut self, mut node: Box<dyn AsyncTraversableNode>) -> &mut Self {
        if let Some(carrier) = self.data.carrier().cloned() {
            node.set_carrier(&carrier);
        }
        self.node_collection.push(node);
        self
    }

    /// Read-only view of the child sequence, in traversal order.
    pub fn node_collection(&self) -> &[Box<dyn AsyncTraversableNode>] {
        &self.node_collection
    }
}

impl Node for AsyncAggregateNode {
    fn data(&self) -> &NodeCore {
        &self.data
    }

    fn data_mut(&mut self) -> &mut NodeCore {
        &mut self.data
    }

    fn is_returning_val(&self) -> bool {
        self.returning
    }

    fn is_traversable(&self) -> bool {
        true
    }

    fn set_carrier(&mut self, flow: &CarrierRef) {
        // maintain the carrier among aggregated nodes
        for node in &mut self.node_collection {
            node.set_carrier(flow);
        }
        let hash = flow.object_hash(&self.data);
        self.data.attach(std::sync::Arc::clone(flow), hash);
    }
}

struct WalkState<'a> {
    children: std::slice::Iter<'a, Box<dyn AsyncTraversableNode>>,
    current: Option<ChildWalk<'a>>,
    param: NodeValue,
}

struct ChildWalk<'a> {
    walk: AsyncTraversal<'a>,
    returning: bool,
    last: Option<NodeValue>,
}

impl AsyncTraversableNode for AsyncAggregateNode {
    fn traverse(&self, param: NodeValue) -> AsyncTraversal<'_> {
        let state = WalkState {
            children: self.node_collection.iter(),
            current: None,
            param,
        };

        // same fold as the sync walk, unrolled into an unfold state machine
        // so each poll resumes exactly where the previous value left off
        stream::unfold(state, |mut state| async move {
            loop {
                if let Some(child) = state.current.as_mut() {
                    match child.walk.next().await {
                        Some(Ok(value)) => {
                            let item = if child.returning {
                                child.last = Some(value.clone());
                                value
                            } else {
                                state.param.clone()
                            };
                            return Some((Ok(item), state));
                        }
                        Some(Err(err)) => return Some((Err(err), state)),
                        None => {
                            if child.returning {
                                if let Some(last) = child.last.take() {
                                    state.param = last;
                                }
                            }
                            state.current = None;
                        }
                    }
                } else {
                    let node = state.children.next()?;
                    state.current = Some(ChildWalk {
                        returning: node.is_returning_val(),
                        walk: node.traverse(state.param.clone()),
                        last: None,
                    });
                }
            }
        })
        .boxed()
    }
}

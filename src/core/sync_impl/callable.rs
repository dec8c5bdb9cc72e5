use crate::core::sync_impl::node::{ExecNode, Node, NodeCore, TraversableNode};
use crate::core::sync_impl::{NodeValue, Traversal};
use crate::error::FlowResult;

/// ------- CallableNode ----------------------------------------------------
/// A plain node backed by a closure. The closure is the whole payload;
/// whether its outcome feeds the next stage is declared up front and fixed
/// for the node's lifetime.
pub struct CallableNode<F>
where
    F: Fn(NodeValue) -> FlowResult<NodeValue> + Send + Sync + 'static,
{
    data: NodeCore,
    returning: bool,
    payload: F,
}

impl<F> CallableNode<F>
where
    F: Fn(NodeValue) -> FlowResult<NodeValue> + Send + Sync + 'static,
{
    pub fn new(is_returning_val: bool, payload: F) -> Self {
        CallableNode {
            data: NodeCore::new(),
            returning: is_returning_val,
            payload,
        }
    }
}

impl<F> Node for CallableNode<F>
where
    F: Fn(NodeValue) -> FlowResult<NodeValue> + Send + Sync + 'static,
{
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
        false
    }
}

impl<F> ExecNode for CallableNode<F>
where
    F: Fn(NodeValue) -> FlowResult<NodeValue> + Send + Sync + 'static,
{
    fn exec(&self, param: NodeValue) -> FlowResult<NodeValue> {
        (self.payload)(param)
    }
}

/// ------- GeneratorNode ---------------------------------------------------
/// A traversable leaf backed by a closure that opens a fresh iterator per
/// walk. The closest thing to handing the engine a generator: the iterator
/// is only advanced as far as the consumer pulls, so it may be unbounded.
pub struct GeneratorNode<F, I>
where
    F: Fn(NodeValue) -> I + Send + Sync + 'static,
    I: Iterator<Item = FlowResult<NodeValue>> + Send + 'static,
{
    data: NodeCore,
    returning: bool,
    payload: F,
}

impl<F, I> GeneratorNode<F, I>
where
    F: Fn(NodeValue) -> I + Send + Sync + 'static,
    I: Iterator<Item = FlowResult<NodeValue>> + Send + 'static,
{
    pub fn new(is_returning_val: bool, payload: F) -> Self {
        GeneratorNode {
            data: NodeCore::new(),
            returning: is_returning_val,
            payload,
        }
    }
}

impl<F, I> Node for GeneratorNode<F, I>
where
    F: Fn(NodeValue) -> I + Send + Sync + 'static,
    I: Iterator<Item = FlowResult<NodeValue>> + Send + 'static,
{
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
}

impl<F, I> TraversableNode for GeneratorNode<F, I>
where
    F: Fn(NodeValue) -> I + Send + Sync + 'static,
    I: Iterator<Item = FlowResult<NodeValue>> + Send + 'static,
{
    fn traverse(&self, param: NodeValue) -> Traversal<'_> {
        Box::new((self.payload)(param))
    }
}

use crate::core::sync_impl::NodeValue;
use crate::core::sync_impl::node::{Node, NodeCore};
use crate::error::FlowResult;
use async_trait::async_trait;
use futures::stream::BoxStream;
use std::future::Future;

/// A lazily-evaluated asynchronous walk, the stream analogue of
/// [`Traversal`](crate::core::sync_impl::Traversal). Suspension happens at
/// every produced value; nothing runs until the consumer polls.
pub type AsyncTraversal<'a> = BoxStream<'a, FlowResult<NodeValue>>;

/// A plain async node: one parameter in, one awaited outcome out.
///
/// Identity and capability flags come from the same [`Node`] base contract
/// as the synchronous side; only the payload seam is async.
#[async_trait]
pub trait AsyncExecNode: Node {
    async fn exec(&self, param: NodeValue) -> FlowResult<NodeValue>;
}

/// An async node that expands into a lazy stream of values.
pub trait AsyncTraversableNode: Node {
    /// Starts a fresh walk fed with `param`. Every call opens its own
    /// scope; nothing carries over between walks.
    fn traverse(&self, param: NodeValue) -> AsyncTraversal<'_>;
}

/// ------- AsyncCallableNode -----------------------------------------------
/// The async twin of `CallableNode`: a plain node backed by an async
/// closure.
pub struct AsyncCallableNode<F, Fut>
where
    F: Fn(NodeValue) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = FlowResult<NodeValue>> + Send + 'static,
{
    data: NodeCore,
    returning: bool,
    payload: F,
}

impl<F, Fut> AsyncCallableNode<F, Fut>
where
    F: Fn(NodeValue) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = FlowResult<NodeValue>> + Send + 'static,
{
    pub fn new(is_returning_val: bool, payload: F) -> Self {
        AsyncCallableNode {
            data: NodeCore::new(),
            returning: is_returning_val,
            payload,
        }
    }
}

impl<F, Fut> Node for AsyncCallableNode<F, Fut>
where
    F: Fn(NodeValue) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = FlowResult<NodeValue>> + Send + 'static,
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

#[async_trait]
impl<F, Fut> AsyncExecNode for AsyncCallableNode<F, Fut>
where
    F: Fn(NodeValue) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = FlowResult<NodeValue>> + Send + 'static,
{
    async fn exec(&self, param: NodeValue) -> FlowResult<NodeValue> {
        (self.payload)(param).await
    }
}

/// ------- AsyncGeneratorNode ----------------------------------------------
/// The async twin of `GeneratorNode`: a traversable leaf whose closure
/// opens a fresh stream per walk.
pub struct AsyncGeneratorNode<F>
where
    F: Fn(NodeValue) -> AsyncTraversal<'static> + Send + Sync + 'static,
{
    data: NodeCore,
    returning: bool,
    payload: F,
}

impl<F> AsyncGeneratorNode<F>
where
    F: Fn(NodeValue) -> AsyncTraversal<'static> + Send + Sync + 'static,
{
    pub fn new(is_returning_val: bool, payload: F) -> Self {
        AsyncGeneratorNode {
            data: NodeCore::new(),
            returning: is_returning_val,
            payload,
        }
    }
}

impl<F> Node for AsyncGeneratorNode<F>
where
    F: Fn(NodeValue) -> AsyncTraversal<'static> + Send + Sync + 'static,
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

impl<F> AsyncTraversableNode for AsyncGeneratorNode<F>
where
    F: Fn(NodeValue) -> AsyncTraversal<'static> + Send + Sync + 'static,
{
    fn traverse(&self, param: NodeValue) -> AsyncTraversal<'_> {
        (self.payload)(param)
    }
}

//! Asynchronous implementation of the rill traversal engine.
//!
//! Mirrors the synchronous side construct for construct:
//! - [`AsyncExecNode`](async_node::AsyncExecNode) and
//!   [`AsyncTraversableNode`](async_node::AsyncTraversableNode) for the
//!   capability model over streams
//! - [`AsyncCallableNode`](async_node::AsyncCallableNode) and
//!   [`AsyncGeneratorNode`](async_node::AsyncGeneratorNode) for
//!   closure-backed leaves
//! - [`AsyncAggregateNode`](async_aggregate::AsyncAggregateNode) for
//!   composing async traversables
//! - [`AsyncFlow`](async_flow::AsyncFlow) for driving mixed sync/async
//!   sequences

pub mod async_aggregate;
pub mod async_flow;
pub mod async_node;

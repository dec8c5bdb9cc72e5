//! Synchronous implementation of the rill traversal engine.
//!
//! This module contains all synchronous types and traits for building
//! and driving flows:
//! - [`Node`](node::Node), [`ExecNode`](node::ExecNode) and
//!   [`TraversableNode`](node::TraversableNode) for the capability model
//! - [`AggregateNode`](aggregate::AggregateNode) for composing traversables
//! - [`CallableNode`](callable::CallableNode) and
//!   [`GeneratorNode`](callable::GeneratorNode) for closure-backed leaves
//! - [`Flow`](flow::Flow) for owning and driving a node sequence
//! - [`NodeValue`] and [`Traversal`] aliases used throughout

pub mod aggregate;
pub mod callable;
pub mod flow;
pub mod node;

use crate::error::FlowResult;

/// The Alias for serde_json::Value since it is the one payload type
/// threaded through every traversal.
pub type NodeValue = serde_json::Value;

/// A lazily-evaluated walk: each pull produces the next value or the
/// failure that ended it. Nothing is computed until the consumer pulls.
/// `Send` so an async driver can hold an in-flight walk across awaits.
pub type Traversal<'a> = Box<dyn Iterator<Item = FlowResult<NodeValue>> + Send + 'a>;

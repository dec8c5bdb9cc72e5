//! # Rill
//!
//! A composable node-flow library: chain units of work, nest them, and let
//! values stream through lazily.
//!
//! ## Features
//!
//! - **Lazy by construction**: traversals are pull-based iterators and
//!   streams, advanced only as far as the consumer asks, so unbounded
//!   producers are first-class citizens
//! - **Composable Design**: an aggregate of nodes is itself a node, so
//!   pipelines nest to any depth without the parent knowing
//! - **Sync & Async Support**: every construct exists in both flavors, and
//!   async flows drive mixed sequences
//! - **Honest capability model**: whether a node returns a value and
//!   whether it expands into sub-steps are fixed at construction, and the
//!   wrong shape in the wrong place is a compile error
//!
//! ## Quick Start
//!
//! ```rust
//! use rill::prelude::*;
//! use serde_json::json;
//!
//! // A traversable leaf that fans numbers out...
//! let numbers = GeneratorNode::new(true, |_param| {
//!     (1..=3).map(|i| Ok(json!(i)))
//! });
//!
//! // ...and a plain node that squares whatever reaches it.
//! let square = CallableNode::new(true, |param| {
//!     let n = param.as_i64().unwrap_or(0);
//!     Ok(json!(n * n))
//! });
//!
//! let mut flow = Flow::new();
//! flow.add(Executable::Traversable(Box::new(numbers)))
//!     .add(Executable::Exec(Box::new(square)));
//!
//! let last = flow.run(json!(null))?;
//! assert_eq!(last, json!(3));
//! # Ok::<(), rill::FlowError>(())
//! ```
//!
//! ## Module Organization
//!
//! - [`sync_impl`](crate::sync_prelude): synchronous nodes, aggregates and flows
//! - [`async_impl`](crate::async_prelude): their asynchronous twins
//! - [`prelude`]: everything at once (import with `use rill::prelude::*`)
//! - [`sync_prelude`] / [`async_prelude`]: one flavor at a time

// ============================================================================
// Core Module
// ============================================================================

mod core;
mod error;

// ============================================================================
// Public Re-exports - Granular Imports
// ============================================================================

// Core types
pub use crate::core::Executable;
pub use error::{FlowError, FlowResult};

// Synchronous implementations
pub use crate::core::sync_impl::aggregate::AggregateNode;
pub use crate::core::sync_impl::callable::{CallableNode, GeneratorNode};
pub use crate::core::sync_impl::flow::Flow;
pub use crate::core::sync_impl::node::{
    Carrier, CarrierRef, ExecNode, Node, NodeCore, NodeHash, TraversableNode,
};
pub use crate::core::sync_impl::{NodeValue, Traversal};

// Asynchronous implementations
pub use crate::core::async_impl::async_aggregate::AsyncAggregateNode;
pub use crate::core::async_impl::async_flow::AsyncFlow;
pub use crate::core::async_impl::async_node::{
    AsyncCallableNode, AsyncExecNode, AsyncGeneratorNode, AsyncTraversableNode, AsyncTraversal,
};

// ============================================================================
// Prelude Modules - Convenient Bulk Imports
// ============================================================================

/// The main prelude: imports everything you need for both sync and async
/// flows.
///
/// # Example
/// ```rust
/// use rill::prelude::*;
/// ```
pub mod prelude {
    pub use super::{
        AggregateNode,
        AsyncAggregateNode,
        AsyncCallableNode,
        AsyncExecNode,
        // Async
        AsyncFlow,
        AsyncGeneratorNode,
        AsyncTraversableNode,
        AsyncTraversal,
        CallableNode,
        Carrier,
        CarrierRef,
        ExecNode,
        // Core
        Executable,
        Flow,
        FlowError,
        FlowResult,
        GeneratorNode,
        // Sync
        Node,
        NodeCore,
        NodeHash,
        NodeValue,
        Traversal,
        TraversableNode,
    };
}

/// Prelude for synchronous-only flows.
///
/// Use this when you only need pull-based iterators and want to avoid
/// importing async types.
///
/// # Example
/// ```rust
/// use rill::sync_prelude::*;
/// ```
pub mod sync_prelude {
    pub use super::{
        AggregateNode, CallableNode, Carrier, CarrierRef, ExecNode, Executable, Flow, FlowError,
        FlowResult, GeneratorNode, Node, NodeCore, NodeHash, NodeValue, Traversal,
        TraversableNode,
    };
}

/// Prelude for asynchronous-only flows.
///
/// Use this when you only need stream-backed traversal and want to avoid
/// importing sync leaves.
///
/// # Example
/// ```rust
/// use rill::async_prelude::*;
/// ```
pub mod async_prelude {
    pub use super::{
        AsyncAggregateNode, AsyncCallableNode, AsyncExecNode, AsyncFlow, AsyncGeneratorNode,
        AsyncTraversableNode, AsyncTraversal, Carrier, CarrierRef, Executable, FlowError,
        FlowResult, Node, NodeCore, NodeHash, NodeValue,
    };
}

// ============================================================================
// Re-export commonly used external types for convenience
// ============================================================================

pub use serde_json::Value as JsonValue;

// ============================================================================
// Library Metadata
// ============================================================================

/// The version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The name of this crate.
pub const NAME: &str = env!("CARGO_PKG_NAME");

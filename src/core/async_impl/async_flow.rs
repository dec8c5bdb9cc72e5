use crate::core::Executable;
use crate::core::async_impl::async_node::{AsyncExecNode, AsyncTraversableNode};
use crate::core::sync_impl::NodeValue;
use crate::core::sync_impl::node::{Carrier, CarrierRef, ExecNode, Node, TraversableNode};
use crate::error::FlowResult;
use futures::StreamExt;
use futures::future::BoxFuture;
use std::sync::Arc;
use uuid::Uuid;

struct FlowIdentity {
    id: Uuid,
}

impl Carrier for FlowIdentity {
    fn carrier_id(&self) -> Uuid {
        self.id
    }
}

/// The async twin of [`Flow`](crate::core::sync_impl::flow::Flow).
///
/// Owns and drives a mixed sequence: sync units run inline, async units are
/// awaited. Threading and fan-out semantics match the sync driver exactly.
pub struct AsyncFlow {
    identity: CarrierRef,
    nodes: Vec<Executable>,
}

impl AsyncFlow {
    pub fn new() -> AsyncFlow {
        AsyncFlow {
            identity: Arc::new(FlowIdentity { id: Uuid::new_v4() }),
            nodes: Vec::new(),
        }
    }

    /// The identity authority handed to nodes on attachment.
    pub fn identity(&self) -> &CarrierRef {
        &self.identity
    }

    /// Appends `node`, binding it to this flow immediately.
    pub fn add(&mut self, mut node: Executable) -> &mut Self {
        node.set_carrier(&self.identity);
        self.nodes.push(node);
        self
    }

    /// Read-only view of the owned sequence, in execution order.
    pub fn nodes(&self) -> &[Executable] {
        &self.nodes
    }

    /// Drives the sequence to completion with `param` as the initial
    /// parameter, returning the final running parameter.
    pub async fn run(&self, param: NodeValue) -> FlowResult<NodeValue> {
        self.drive(param, 0).await
    }

    // boxed so the traversable arms can recurse into the tail of the
    // sequence from inside an async body
    fn drive(&self, param: NodeValue, start: usize) -> BoxFuture<'_, FlowResult<NodeValue>> {
        Box::pin(async move {
            let mut param = param;
            let mut idx = start;
            while let Some(node) = self.nodes.get(idx) {
                match node {
                    Executable::Exec(exec) => {
                        let value = exec.exec(param.clone())?;
                        if exec.is_returning_val() {
                            param = value;
                        }
                        idx += 1;
                    }
                    Executable::AsyncExec(exec) => {
                        let value = exec.exec(param.clone()).await?;
                        if exec.is_returning_val() {
                            param = value;
                        }
                        idx += 1;
                    }
                    Executable::Traversable(traversable) => {
                        for value in traversable.traverse(param.clone()) {
                            let value = value?;
                            if traversable.is_returning_val() {
                                param = value;
                            }
                            self.drive(param.clone(), idx + 1).await?;
                        }
                        return Ok(param);
                    }
                    Executable::AsyncTraversable(traversable) => {
                        let mut walk = traversable.traverse(param.clone());
                        while let Some(value) = walk.next().await {
                            let value = value?;
                            if traversable.is_returning_val() {
                                param = value;
                            }
                            self.drive(param.clone(), idx + 1).await?;
                        }
                        return Ok(param);
                    }
                }
            }
            Ok(param)
        })
    }
}

impl Default for AsyncFlow {
    fn default() -> Self {
        Self::new()
    }
}

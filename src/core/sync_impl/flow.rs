use crate::core::Executable;
use crate::core::sync_impl::NodeValue;
use crate::core::sync_impl::node::{Carrier, CarrierRef, ExecNode, Node, TraversableNode};
use crate::error::{FlowError, FlowResult};
use std::sync::Arc;
use uuid::Uuid;

/// The carrier's identity authority, split off from the flow itself so
/// nodes can hold a cheap handle to it without owning the flow back.
struct FlowIdentity {
    id: Uuid,
}

impl Carrier for FlowIdentity {
    fn carrier_id(&self) -> Uuid {
        self.id
    }
}

/// A flow owns an ordered sequence of executables, hands each of them an
/// identity under its own authority, and drives the whole thing to
/// completion.
///
/// Exec nodes run once per visit; traversable nodes fan out, driving the
/// remainder of the sequence once per yielded value. Returning nodes
/// replace the running parameter, non-returning ones leave it alone.
pub struct Flow {
    identity: CarrierRef,
    nodes: Vec<Executable>,
}

impl Flow {
    pub fn new() -> Flow {
        Flow {
            identity: Arc::new(FlowIdentity { id: Uuid::new_v4() }),
            nodes: Vec::new(),
        }
    }

    /// The identity authority handed to nodes on attachment.
    pub fn identity(&self) -> &CarrierRef {
        &self.identity
    }

    /// Appends `node`, binding it to this flow immediately. Aggregates
    /// cascade the binding to their children.
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
    ///
    /// The first unrecovered failure aborts the run; whatever was consumed
    /// before it stays consumed.
    pub fn run(&self, param: NodeValue) -> FlowResult<NodeValue> {
        self.drive(param, 0)
    }

    fn drive(&self, mut param: NodeValue, start: usize) -> FlowResult<NodeValue> {
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
                Executable::Traversable(traversable) => {
                    // fan out: every yielded value drives the rest of the
                    // sequence once
                    for value in traversable.traverse(param.clone()) {
                        let value = value?;
                        if traversable.is_returning_val() {
                            param = value;
                        }
                        self.drive(param.clone(), idx + 1)?;
                    }
                    return Ok(param);
                }
                Executable::AsyncExec(_) | Executable::AsyncTraversable(_) => {
                    log::error!("Flow cannot drive async nodes, use AsyncFlow instead.");
                    return Err(FlowError::UnsupportedExecutable(
                        "Flow cannot drive async nodes, use AsyncFlow instead".into(),
                    ));
                }
            }
        }
        Ok(param)
    }
}

impl Default for Flow {
    fn default() -> Self {
        Self::new()
    }
}

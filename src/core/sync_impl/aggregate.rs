use crate::core::sync_impl::node::{Carrier, CarrierRef, Node, NodeCore, TraversableNode};
use crate::core::sync_impl::{NodeValue, Traversal};
use crate::error::FlowResult;

/// An ordered sequence of traversable nodes, itself exposed as a single
/// traversable node.
///
/// Children are walked in insertion order. A returning child's values are
/// emitted as-is and its last value becomes the parameter fed to the next
/// child; a non-returning child still drives as many sub-steps as it wants,
/// and the aggregate re-emits the current running parameter once per step.
/// A child that yields nothing leaves the running parameter untouched.
///
/// The `returning` flag given at construction describes what the aggregate
/// itself reports to its own parent, which keeps a nested aggregate's
/// internal threading decoupled from the sequence it sits in.
///
/// The child sequence is configuration: mutate it through
/// [`add_traversable`](AggregateNode::add_traversable) before starting a
/// walk, not while one is being pulled.
pub struct AggregateNode {
    data: NodeCore,
    returning: bool,
    node_collection: Vec<Box<dyn TraversableNode>>,
}

impl AggregateNode {
    pub fn new(is_returning_val: bool) -> Self {
        AggregateNode {
            data: NodeCore::new(),
            returning: is_returning_val,
            node_collection: Vec::new(),
        }
    }

    /// Appends `node` to the child sequence.
    ///
    /// If the aggregate is already bound to a carrier the child is bound to
    /// it immediately; otherwise it stays carrier-less until the aggregate
    /// itself is attached. Duplicates are allowed, order is traversal order.
    pub fn add_traversable(&mut self, mut node: Box<dyn TraversableNode>) -> &mut Self {
        if let Some(carrier) = self.data.carrier().cloned() {
            node.set_carrier(&carrier);
        }
        self.node_collection.push(node);
        self
    }

    /// Read-only view of the child sequence, in traversal order.
    pub fn node_collection(&self) -> &[Box<dyn TraversableNode>] {
        &self.node_collection
    }
}

impl Node for AggregateNode {
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
        // maintain the carrier among aggregated nodes; nested aggregates
        // cascade to their own children in turn
        for node in &mut self.node_collection {
            node.set_carrier(flow);
        }
        let hash = flow.object_hash(&self.data);
        self.data.attach(std::sync::Arc::clone(flow), hash);
    }
}

impl TraversableNode for AggregateNode {
    fn traverse(&self, param: NodeValue) -> Traversal<'_> {
        Box::new(AggregateWalk {
            children: self.node_collection.iter(),
            current: None,
            param,
        })
    }
}

/// One in-flight walk over an aggregate's children.
///
/// A single-pass fold carrying two pieces of state: the running parameter
/// and the current child's last produced value. Suspension happens at every
/// produced value, which is what `Iterator::next` gives us for free.
struct AggregateWalk<'a> {
    children: std::slice::Iter<'a, Box<dyn TraversableNode>>,
    current: Option<ChildWalk<'a>>,
    param: NodeValue,
}

struct ChildWalk<'a> {
    walk: Traversal<'a>,
    returning: bool,
    last: Option<NodeValue>,
}

impl Iterator for AggregateWalk<'_> {
    type Item = FlowResult<NodeValue>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(child) = self.current.as_mut() {
                match child.walk.next() {
                    Some(Ok(value)) => {
                        if child.returning {
                            child.last = Some(value.clone());
                            return Some(Ok(value));
                        }
                        // pass-through: one emission per sub-step, value
                        // untouched
                        return Some(Ok(self.param.clone()));
                    }
                    Some(Err(err)) => return Some(Err(err)),
                    None => {
                        // a returning child that produced something hands
                        // its last value to the next child; zero yields
                        // leave the parameter as it was
                        if child.returning {
                            if let Some(last) = child.last.take() {
                                self.param = last;
                            }
                        }
                        self.current = None;
                    }
                }
            } else {
                let node = self.children.next()?;
                self.current = Some(ChildWalk {
                    returning: node.is_returning_val(),
                    walk: node.traverse(self.param.clone()),
                    last: None,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::sync_impl::callable::GeneratorNode;
    use crate::core::sync_impl::flow::Flow;
    use crate::error::FlowError;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    fn yields(returning: bool, values: Vec<NodeValue>) -> Box<dyn TraversableNode> {
        Box::new(GeneratorNode::new(returning, move |_param| {
            values.clone().into_iter().map(Ok)
        }))
    }

    /// Non-returning child that pulses `count` times per walk.
    fn pulses(count: usize) -> Box<dyn TraversableNode> {
        Box::new(GeneratorNode::new(false, move |_param| {
            std::iter::repeat_with(|| Ok(NodeValue::Null)).take(count)
        }))
    }

    /// Non-returning child that records the parameter it was walked with
    /// and yields nothing.
    fn probe(seen: Arc<Mutex<Vec<NodeValue>>>) -> Box<dyn TraversableNode> {
        Box::new(GeneratorNode::new(false, move |param| {
            seen.lock().unwrap().push(param);
            std::iter::empty()
        }))
    }

    fn collect(aggregate: &AggregateNode, param: NodeValue) -> Vec<NodeValue> {
        aggregate
            .traverse(param)
            .collect::<FlowResult<Vec<_>>>()
            .unwrap()
    }

    #[test]
    fn empty_aggregate_emits_nothing() {
        let aggregate = AggregateNode::new(true);
        assert!(collect(&aggregate, json!("seed")).is_empty());
    }

    #[test]
    fn non_returning_children_pass_the_parameter_through() {
        let mut aggregate = AggregateNode::new(false);
        aggregate
            .add_traversable(pulses(2))
            .add_traversable(pulses(2))
            .add_traversable(pulses(2));

        let emitted = collect(&aggregate, json!("seed"));
        assert_eq!(emitted.len(), 6);
        assert!(emitted.iter().all(|value| value == &json!("seed")));
    }

    #[test]
    fn returning_child_emits_its_values_and_threads_the_last_one() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut aggregate = AggregateNode::new(true);
        aggregate
            .add_traversable(yields(true, vec![json!(1), json!(2), json!(3)]))
            .add_traversable(probe(Arc::clone(&seen)));

        let emitted = collect(&aggregate, json!("seed"));
        assert_eq!(emitted, vec![json!(1), json!(2), json!(3)]);
        assert_eq!(seen.lock().unwrap().as_slice(), &[json!(3)]);
    }

    #[test]
    fn pass_through_tracks_the_running_parameter() {
        // once a returning child has produced, later pass-throughs re-emit
        // its last value rather than the original input
        let mut aggregate = AggregateNode::new(true);
        aggregate
            .add_traversable(yields(true, vec![json!("fresh")]))
            .add_traversable(pulses(2));

        let emitted = collect(&aggregate, json!("seed"));
        assert_eq!(
            emitted,
            vec![json!("fresh"), json!("fresh"), json!("fresh")]
        );
    }

    #[test]
    fn zero_yield_returning_child_leaves_the_parameter_alone() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut aggregate = AggregateNode::new(true);
        aggregate
            .add_traversable(yields(true, vec![]))
            .add_traversable(probe(Arc::clone(&seen)));

        let emitted = collect(&aggregate, json!("seed"));
        assert!(emitted.is_empty());
        // the parameter never moved off the original input
        assert_eq!(seen.lock().unwrap().as_slice(), &[json!("seed")]);
    }

    #[test]
    fn zero_yield_returning_child_keeps_an_earlier_value() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut aggregate = AggregateNode::new(true);
        aggregate
            .add_traversable(yields(true, vec![json!("kept")]))
            .add_traversable(yields(true, vec![]))
            .add_traversable(probe(Arc::clone(&seen)));

        collect(&aggregate, json!("seed"));
        assert_eq!(seen.lock().unwrap().as_slice(), &[json!("kept")]);
    }

    #[test]
    fn nested_non_returning_aggregate_stays_opaque() {
        // inner aggregate declares itself non-returning, so whatever it
        // threads internally never leaks into the outer walk
        let mut inner = AggregateNode::new(false);
        inner.add_traversable(yields(true, vec![json!("a"), json!("b")]));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut outer = AggregateNode::new(true);
        outer
            .add_traversable(Box::new(inner))
            .add_traversable(probe(Arc::clone(&seen)));

        let emitted = collect(&outer, json!("p"));
        assert_eq!(emitted, vec![json!("p"), json!("p")]);
        // the outer running parameter never moved either
        assert_eq!(seen.lock().unwrap().as_slice(), &[json!("p")]);
    }

    #[test]
    fn nested_returning_aggregate_threads_like_any_child() {
        let mut inner = AggregateNode::new(true);
        inner.add_traversable(yields(true, vec![json!("a"), json!("b")]));

        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut outer = AggregateNode::new(true);
        outer
            .add_traversable(Box::new(inner))
            .add_traversable(probe(Arc::clone(&seen)));

        let emitted = collect(&outer, json!("p"));
        assert_eq!(emitted, vec![json!("a"), json!("b")]);
        assert_eq!(seen.lock().unwrap().as_slice(), &[json!("b")]);
    }

    #[test]
    fn walks_are_lazy_and_survive_unbounded_children() {
        let mut aggregate = AggregateNode::new(true);
        aggregate.add_traversable(Box::new(GeneratorNode::new(true, |_param| {
            (0..).map(|i| Ok(json!(i)))
        })));

        let emitted: Vec<_> = aggregate
            .traverse(json!(null))
            .take(5)
            .collect::<FlowResult<Vec<_>>>()
            .unwrap();
        assert_eq!(emitted, vec![json!(0), json!(1), json!(2), json!(3), json!(4)]);
    }

    #[test]
    fn separate_walks_do_not_share_state() {
        let mut aggregate = AggregateNode::new(true);
        aggregate
            .add_traversable(yields(true, vec![json!(1)]))
            .add_traversable(pulses(1));

        let first = collect(&aggregate, json!("x"));
        let second = collect(&aggregate, json!("x"));
        assert_eq!(first, second);
    }

    #[test]
    fn child_failures_propagate_verbatim() {
        let mut aggregate = AggregateNode::new(true);
        aggregate.add_traversable(Box::new(GeneratorNode::new(true, |_param| {
            vec![
                Ok(json!(1)),
                Err(FlowError::Node("boom".into())),
                Ok(json!(2)),
            ]
            .into_iter()
        })));

        let mut walk = aggregate.traverse(json!(null));
        assert_eq!(walk.next().unwrap().unwrap(), json!(1));
        match walk.next().unwrap() {
            Err(FlowError::Node(message)) => assert_eq!(message, "boom"),
            other => panic!("expected a node failure, got {other:?}"),
        }
    }

    #[test]
    fn node_collection_is_untouched_by_walks() {
        let mut aggregate = AggregateNode::new(true);
        aggregate
            .add_traversable(yields(true, vec![json!(1)]))
            .add_traversable(pulses(2));

        let ids_before: Vec<_> = aggregate
            .node_collection()
            .iter()
            .map(|node| node.data().id())
            .collect();

        collect(&aggregate, json!(null));

        let ids_after: Vec<_> = aggregate
            .node_collection()
            .iter()
            .map(|node| node.data().id())
            .collect();
        assert_eq!(ids_before, ids_after);
    }

    #[test]
    fn attaching_a_carrier_cascades_to_every_child() {
        let mut inner = AggregateNode::new(false);
        inner.add_traversable(pulses(1));

        let mut aggregate = AggregateNode::new(true);
        aggregate
            .add_traversable(pulses(1))
            .add_traversable(Box::new(inner));

        let flow = Flow::new();
        let carrier = flow.identity().clone();
        aggregate.set_carrier(&carrier);

        assert_eq!(
            aggregate.node_hash(),
            Some(&carrier.object_hash(aggregate.data()))
        );
        for child in aggregate.node_collection() {
            assert_eq!(
                child.node_hash(),
                Some(&carrier.object_hash(child.data()))
            );
        }
    }

    #[test]
    fn late_children_are_attached_immediately() {
        let flow = Flow::new();
        let carrier = flow.identity().clone();

        let mut aggregate = AggregateNode::new(true);
        aggregate.set_carrier(&carrier);
        aggregate.add_traversable(pulses(1));

        let child = &aggregate.node_collection()[0];
        assert_eq!(
            child.node_hash(),
            Some(&carrier.object_hash(child.data()))
        );
    }

    #[test]
    fn reattachment_rebinds_the_whole_tree() {
        let mut aggregate = AggregateNode::new(true);
        aggregate.add_traversable(pulses(1));

        let a = Flow::new().identity().clone();
        let b = Flow::new().identity().clone();

        aggregate.set_carrier(&a);
        let child_under_a = aggregate.node_collection()[0].node_hash().cloned();

        aggregate.set_carrier(&b);
        let child = &aggregate.node_collection()[0];
        assert_ne!(child.node_hash().cloned(), child_under_a);
        assert_eq!(
            child.node_hash(),
            Some(&b.object_hash(child.data()))
        );
        assert_eq!(
            child.data().carrier().unwrap().carrier_id(),
            b.carrier_id()
        );
    }
}

//! End-to-end traversal and identity scenarios, driving the public API the
//! way an embedding application would.

use rill::prelude::*;
use serde_json::json;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

/// Traversable leaf that records every carrier it is attached to, so deep
/// cascades can be observed from the outside.
struct SpyNode {
    data: NodeCore,
    attachments: Arc<Mutex<Vec<Uuid>>>,
}

impl SpyNode {
    fn new(attachments: Arc<Mutex<Vec<Uuid>>>) -> Self {
        SpyNode {
            data: NodeCore::new(),
            attachments,
        }
    }
}

impl Node for SpyNode {
    fn data(&self) -> &NodeCore {
        &self.data
    }

    fn data_mut(&mut self) -> &mut NodeCore {
        &mut self.data
    }

    fn is_returning_val(&self) -> bool {
        false
    }

    fn is_traversable(&self) -> bool {
        true
    }

    fn set_carrier(&mut self, flow: &CarrierRef) {
        self.attachments.lock().unwrap().push(flow.carrier_id());
        let hash = flow.object_hash(self.data());
        self.data_mut().attach(Arc::clone(flow), hash);
    }
}

impl TraversableNode for SpyNode {
    fn traverse(&self, _param: NodeValue) -> Traversal<'_> {
        Box::new(std::iter::empty())
    }
}

#[test]
fn carrier_attachment_cascades_through_nested_aggregates() {
    let attachments = Arc::new(Mutex::new(Vec::new()));

    let mut inner = AggregateNode::new(false);
    inner.add_traversable(Box::new(SpyNode::new(Arc::clone(&attachments))));

    let mut outer = AggregateNode::new(true);
    outer.add_traversable(Box::new(inner));

    let mut flow = Flow::new();
    let carrier_id = flow.identity().carrier_id();
    flow.add(Executable::Traversable(Box::new(outer)));

    // the spy sits two levels down and still saw the attachment
    assert_eq!(attachments.lock().unwrap().as_slice(), &[carrier_id]);
}

#[test]
fn reattachment_leaves_nothing_of_the_old_carrier() {
    let attachments = Arc::new(Mutex::new(Vec::new()));

    let mut aggregate = AggregateNode::new(true);
    aggregate.add_traversable(Box::new(SpyNode::new(Arc::clone(&attachments))));

    let a = Flow::new();
    let b = Flow::new();

    aggregate.set_carrier(a.identity());
    aggregate.set_carrier(b.identity());

    assert_eq!(
        attachments.lock().unwrap().as_slice(),
        &[a.identity().carrier_id(), b.identity().carrier_id()]
    );
    assert_eq!(
        aggregate.data().carrier().unwrap().carrier_id(),
        b.identity().carrier_id()
    );
    assert_eq!(
        aggregate.node_hash(),
        Some(&b.identity().object_hash(aggregate.data()))
    );
}

#[test]
fn a_small_etl_pipeline_end_to_end() {
    // extract: fan out raw records; transform: uppercase each; load: collect
    let loaded = Arc::new(Mutex::new(Vec::new()));

    let extract = GeneratorNode::new(true, |_param| {
        ["ada", "grace", "edsger"]
            .into_iter()
            .map(|name| Ok(json!({ "name": name })))
    });

    let transform = CallableNode::new(true, |record| {
        let name = record["name"].as_str().unwrap_or_default();
        Ok(json!({ "name": name.to_uppercase() }))
    });

    let load = {
        let loaded = Arc::clone(&loaded);
        CallableNode::new(false, move |record| {
            loaded.lock().unwrap().push(record.clone());
            Ok(NodeValue::Null)
        })
    };

    let mut flow = Flow::new();
    flow.add(Executable::Traversable(Box::new(extract)))
        .add(Executable::Exec(Box::new(transform)))
        .add(Executable::Exec(Box::new(load)));

    flow.run(json!(null)).unwrap();

    assert_eq!(
        loaded.lock().unwrap().as_slice(),
        &[
            json!({ "name": "ADA" }),
            json!({ "name": "GRACE" }),
            json!({ "name": "EDSGER" }),
        ]
    );
}

#[test]
fn aggregates_batch_stages_behind_one_node() {
    // the same pipeline, with extract and a renumbering stage folded into
    // one aggregate the flow sees as a single traversable
    let mut stage = AggregateNode::new(true);
    stage
        .add_traversable(Box::new(GeneratorNode::new(true, |_param| {
            (1..=3).map(|i| Ok(json!(i)))
        })))
        .add_traversable(Box::new(GeneratorNode::new(true, |param| {
            let last = param.as_i64().unwrap_or(0);
            (0..2).map(move |i| Ok(json!(last * 10 + i)))
        })));

    let emitted: Vec<_> = stage
        .traverse(json!(null))
        .collect::<FlowResult<Vec<_>>>()
        .unwrap();

    // first child counts, second child starts from the first child's last
    // value
    assert_eq!(
        emitted,
        vec![json!(1), json!(2), json!(3), json!(30), json!(31)]
    );
}

#[tokio::test]
async fn the_async_side_mirrors_the_sync_semantics() {
    use futures::StreamExt;
    use futures::stream;

    let mut inner = AsyncAggregateNode::new(false);
    inner.add_traversable(Box::new(AsyncGeneratorNode::new(true, |_param| {
        stream::iter(["a", "b"].map(|s| Ok(json!(s)))).boxed()
    })));

    let mut outer = AsyncAggregateNode::new(true);
    outer.add_traversable(Box::new(inner));

    let emitted: Vec<_> = outer
        .traverse(json!("p"))
        .collect::<Vec<_>>()
        .await
        .into_iter()
        .collect::<FlowResult<Vec<_>>>()
        .unwrap();

    assert_eq!(emitted, vec![json!("p"), json!("p")]);
}

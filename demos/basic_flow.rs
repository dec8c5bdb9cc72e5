//! A small tour of rill: closure-backed leaves, an aggregate stage, and a
//! flow that drives the whole thing.
//!
//! Run with: `cargo run --example basic_flow`

use rill::prelude::*;
use serde_json::json;
use std::sync::{Arc, Mutex};

fn main() -> FlowResult<()> {
    // A traversable leaf fanning out a batch of readings.
    let readings = GeneratorNode::new(true, |_param| {
        [12.0, 18.5, 21.3, 16.8]
            .into_iter()
            .map(|celsius| Ok(json!({ "celsius": celsius })))
    });

    // A second traversable that re-emits the last reading a few times, fed
    // by the aggregate with the first child's final value.
    let echo_last = GeneratorNode::new(true, |param| {
        (0..2).map(move |_| Ok(param.clone()))
    });

    // Fold both into one stage; the flow only ever sees a single node.
    let mut sensor_stage = AggregateNode::new(true);
    sensor_stage
        .add_traversable(Box::new(readings))
        .add_traversable(Box::new(echo_last));

    // A plain node converting whatever reaches it.
    let to_fahrenheit = CallableNode::new(true, |reading| {
        let celsius = reading["celsius"].as_f64().unwrap_or(0.0);
        Ok(json!({ "fahrenheit": celsius * 9.0 / 5.0 + 32.0 }))
    });

    // A sink that keeps everything it sees.
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = {
        let seen = Arc::clone(&seen);
        CallableNode::new(false, move |value| {
            seen.lock().unwrap().push(value.clone());
            Ok(NodeValue::Null)
        })
    };

    let mut flow = Flow::new();
    flow.add(Executable::Traversable(Box::new(sensor_stage)))
        .add(Executable::Exec(Box::new(to_fahrenheit)))
        .add(Executable::Exec(Box::new(sink)));

    let last = flow.run(json!(null))?;

    println!("last parameter: {last}");
    for value in seen.lock().unwrap().iter() {
        println!("converted: {value}");
    }

    Ok(())
}

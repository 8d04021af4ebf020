//! Invariants that hold for arbitrary interface trees and query parameters

use proptest::prelude::*;
use proptest::test_runner::TestRunner;
use serde_json::{json, Map, Value};
use shear::schema::{SchemaDocument, SchemaMap};
use shear::tree::builder::TreeBuilder;
use shear::tree::Node;
use shear::{ContentType, Pruner, PrunerOptions, QueryParams};
use std::collections::BTreeSet;
use std::sync::Arc;

const INTERFACES: &str = "/openconfig-interfaces:interfaces";

const FIELD_POOL: [&str; 5] = [
    "interface/config",
    "interface/config/mtu",
    "interface/state/counters",
    "interface/subinterfaces/subinterface/state",
    "interface/name",
];

const KEYS: [&str; 2] = ["name", "index"];

fn schema() -> SchemaMap {
    let document: SchemaDocument = serde_json::from_value(json!({"modules": [{
        "name": "openconfig-interfaces",
        "nodes": [{"name": "interfaces", "kind": "container", "children": [{
            "name": "interface", "kind": "list", "keys": ["name"], "children": [
                {"name": "name", "kind": "leaf"},
                {"name": "config", "kind": "container", "children": [
                    {"name": "name", "kind": "leaf"},
                    {"name": "mtu", "kind": "leaf"},
                    {"name": "enabled", "kind": "leaf"}
                ]},
                {"name": "state", "kind": "container", "config": false, "children": [
                    {"name": "name", "kind": "leaf"},
                    {"name": "mtu", "kind": "leaf"},
                    {"name": "oper-status", "kind": "leaf"},
                    {"name": "counters", "kind": "container", "children": [
                        {"name": "in-octets", "kind": "leaf"}
                    ]}
                ]},
                {"name": "subinterfaces", "kind": "container", "children": [{
                    "name": "subinterface", "kind": "list", "keys": ["index"], "children": [
                        {"name": "index", "kind": "leaf"},
                        {"name": "config", "kind": "container", "children": [
                            {"name": "index", "kind": "leaf"}
                        ]},
                        {"name": "state", "kind": "container", "config": false, "children": [
                            {"name": "index", "kind": "leaf"},
                            {"name": "oper-status", "kind": "leaf"}
                        ]}
                    ]
                }]}
            ]
        }]}]
    }]}))
    .unwrap();
    SchemaMap::from_document(&document).unwrap()
}

fn interface_body() -> impl Strategy<Value = (u32, bool, bool, bool, BTreeSet<u8>)> {
    (
        1000u32..9200,
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        prop::collection::btree_set(0u8..4, 0..3),
    )
}

fn payload_strategy() -> impl Strategy<Value = Value> {
    prop::collection::btree_map(0u8..16, interface_body(), 0..5).prop_map(|interfaces| {
        let items: Vec<Value> = interfaces
            .into_iter()
            .map(|(id, (mtu, with_config, with_state, up, subs))| {
                let name = format!("Ethernet{}", id);
                let mut item = Map::new();
                item.insert("name".into(), json!(name));
                if with_config {
                    item.insert("config".into(), json!({"name": name, "mtu": mtu, "enabled": up}));
                }
                if with_state {
                    item.insert(
                        "state".into(),
                        json!({
                            "name": name,
                            "mtu": mtu,
                            "oper-status": if up { "UP" } else { "DOWN" },
                            "counters": {"in-octets": mtu * 10}
                        }),
                    );
                }
                if !subs.is_empty() {
                    let subinterfaces: Vec<Value> = subs
                        .into_iter()
                        .map(|index| {
                            json!({
                                "index": index,
                                "config": {"index": index},
                                "state": {"index": index, "oper-status": "UP"}
                            })
                        })
                        .collect();
                    item.insert("subinterfaces".into(), json!({"subinterface": subinterfaces}));
                }
                Value::Object(item)
            })
            .collect();
        json!({"openconfig-interfaces:interfaces": {"interface": items}})
    })
}

fn content_strategy() -> impl Strategy<Value = ContentType> {
    prop_oneof![
        Just(ContentType::All),
        Just(ContentType::Config),
        Just(ContentType::NonConfig),
        Just(ContentType::Operational),
    ]
}

fn params_strategy() -> impl Strategy<Value = QueryParams> {
    (
        0u32..7,
        content_strategy(),
        prop::collection::vec(0usize..FIELD_POOL.len(), 0..3),
    )
        .prop_map(|(depth, content, fields)| {
            QueryParams::new()
                .with_depth(depth)
                .with_content(content)
                .with_fields(fields.into_iter().map(|i| FIELD_POOL[i]))
        })
}

fn pruner() -> Pruner<SchemaMap> {
    Pruner::new(Arc::new(schema())).with_options(PrunerOptions {
        record_stats: false,
        log_totals: false,
    })
}

fn build(pruner: &Pruner<SchemaMap>, payload: &Value) -> Node {
    TreeBuilder::new(pruner.schema().as_ref())
        .build_root(payload)
        .unwrap()
}

fn prune(pruner: &Pruner<SchemaMap>, payload: &Value, params: &QueryParams) -> Value {
    let mut root = build(pruner, payload);
    pruner.prune(&mut root, INTERFACES, INTERFACES, params).unwrap();
    root.to_json()
}

fn list_elements<'v>(doc: &'v Value, list: &str) -> Vec<&'v Value> {
    let mut out = Vec::new();
    collect_elements(doc, list, &mut out);
    out
}

fn collect_elements<'v>(value: &'v Value, list: &str, out: &mut Vec<&'v Value>) {
    match value {
        Value::Object(members) => {
            for (name, child) in members {
                if name == list {
                    if let Value::Array(items) = child {
                        out.extend(items.iter());
                    }
                }
                collect_elements(child, list, out);
            }
        }
        Value::Array(items) => items.iter().for_each(|item| collect_elements(item, list, out)),
        _ => {}
    }
}

/// `smaller` keeps a subset of `larger`'s members, lists survive whole
fn is_subdocument(smaller: &Value, larger: &Value) -> bool {
    match (smaller, larger) {
        (Value::Object(a), Value::Object(b)) => a
            .iter()
            .all(|(name, child)| b.get(name).map_or(false, |other| is_subdocument(child, other))),
        (Value::Array(a), Value::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| is_subdocument(x, y))
        }
        (a, b) => a == b,
    }
}

/// Non-key leaf paths, with list positions replaced by key values
fn leaf_paths(value: &Value, prefix: String, in_element: bool, out: &mut BTreeSet<String>) {
    match value {
        Value::Object(members) => {
            for (name, child) in members {
                match child {
                    Value::Array(items) => {
                        for item in items {
                            let key = KEYS
                                .iter()
                                .find_map(|k| item.get(*k))
                                .map(Value::to_string)
                                .unwrap_or_default();
                            leaf_paths(item, format!("{}/{}[{}]", prefix, name, key), true, out);
                        }
                    }
                    Value::Object(_) => leaf_paths(child, format!("{}/{}", prefix, name), false, out),
                    _ if in_element && KEYS.contains(&name.as_str()) => {}
                    _ => {
                        out.insert(format!("{}/{}", prefix, name));
                    }
                }
            }
        }
        _ => {}
    }
}

#[test]
fn test_identity_params_preserve_tree() {
    let pruner = pruner();
    let mut runner = TestRunner::default();

    runner
        .run(&payload_strategy(), |payload| {
            let mut root = build(&pruner, &payload);
            let before = root.clone();
            pruner
                .prune(&mut root, INTERFACES, INTERFACES, &QueryParams::new())
                .unwrap();
            prop_assert_eq!(root, before);
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_surviving_elements_keep_their_keys() {
    let pruner = pruner();
    let mut runner = TestRunner::default();

    runner
        .run(&(payload_strategy(), params_strategy()), |(payload, params)| {
            let pruned = prune(&pruner, &payload, &params);
            for element in list_elements(&pruned, "interface") {
                prop_assert!(element.get("name").is_some(), "interface lost its key: {}", element);
            }
            for element in list_elements(&pruned, "subinterface") {
                prop_assert!(element.get("index").is_some(), "subinterface lost its key: {}", element);
            }
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_depth_limit_is_monotonic() {
    let pruner = pruner();
    let mut runner = TestRunner::default();

    runner
        .run(&(payload_strategy(), 1u32..7, content_strategy()), |(payload, depth, content)| {
            let shallow = QueryParams::new().with_depth(depth).with_content(content);
            let deeper = QueryParams::new().with_depth(depth + 1).with_content(content);
            let unlimited = QueryParams::new().with_content(content);

            let a = prune(&pruner, &payload, &shallow);
            let b = prune(&pruner, &payload, &deeper);
            let c = prune(&pruner, &payload, &unlimited);
            prop_assert!(is_subdocument(&a, &b), "depth {} not within depth {}", depth, depth + 1);
            prop_assert!(is_subdocument(&b, &c));
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_pruning_is_idempotent() {
    let pruner = pruner();
    let mut runner = TestRunner::default();

    runner
        .run(&(payload_strategy(), params_strategy()), |(payload, params)| {
            let mut root = build(&pruner, &payload);
            pruner.prune(&mut root, INTERFACES, INTERFACES, &params).unwrap();
            let once = root.clone();
            pruner.prune(&mut root, INTERFACES, INTERFACES, &params).unwrap();
            prop_assert_eq!(root, once);
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_config_and_nonconfig_are_disjoint() {
    let pruner = pruner();
    let mut runner = TestRunner::default();

    runner
        .run(&payload_strategy(), |payload| {
            let config = prune(&pruner, &payload, &QueryParams::new().with_content(ContentType::Config));
            let state = prune(&pruner, &payload, &QueryParams::new().with_content(ContentType::NonConfig));

            let mut config_leaves = BTreeSet::new();
            let mut state_leaves = BTreeSet::new();
            leaf_paths(&config, String::new(), false, &mut config_leaves);
            leaf_paths(&state, String::new(), false, &mut state_leaves);

            let shared: Vec<_> = config_leaves.intersection(&state_leaves).collect();
            prop_assert!(shared.is_empty(), "leaves in both partitions: {:?}", shared);
            Ok(())
        })
        .unwrap();
}

#[test]
fn test_depth_only_never_leaves_key_only_elements() {
    let pruner = pruner();
    let mut runner = TestRunner::default();

    runner
        .run(&(payload_strategy(), 1u32..7), |(payload, depth)| {
            let full = prune(&pruner, &payload, &QueryParams::new());
            let pruned = prune(&pruner, &payload, &QueryParams::new().with_depth(depth));

            for list in ["interface", "subinterface"] {
                let originals = list_elements(&full, list);
                for element in list_elements(&pruned, list) {
                    let original = originals
                        .iter()
                        .find(|o| KEYS.iter().all(|k| o.get(*k) == element.get(*k)))
                        .unwrap();
                    let members = |v: &Value| {
                        v.as_object()
                            .map(|m| m.keys().cloned().collect::<BTreeSet<_>>())
                            .unwrap_or_default()
                    };
                    prop_assert_eq!(members(element), members(*original));
                }
            }
            Ok(())
        })
        .unwrap();
}

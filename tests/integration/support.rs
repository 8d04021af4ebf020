//! Shared fixtures: schema documents and read responses for the ACL,
//! interfaces and RADIUS models.

use serde_json::{json, Value};
use shear::schema::{SchemaDocument, SchemaMap};
use shear::tree::builder::TreeBuilder;
use shear::tree::Node;
use shear::{Pruner, PrunerOptions};
use std::sync::Arc;

pub const ACL_SETS: &str = "/openconfig-acl:acl/acl-sets";
pub const ACL1: &str = "/openconfig-acl:acl/acl-sets/acl-set[name=MyACL1][type=ACL_IPV4]";
pub const INTERFACES: &str = "/openconfig-interfaces:interfaces";
pub const ETH0: &str = "/openconfig-interfaces:interfaces/interface[name=Ethernet0]";
pub const RADIUS_GROUP: &str = "/openconfig-system:system/aaa/server-groups/server-group[name=RADIUS]";

fn leaf(name: &str) -> Value {
    json!({"name": name, "kind": "leaf"})
}

fn container(name: &str, children: Vec<Value>) -> Value {
    json!({"name": name, "kind": "container", "children": children})
}

fn state(children: Vec<Value>) -> Value {
    json!({"name": "state", "kind": "container", "config": false, "children": children})
}

fn list(name: &str, keys: &[&str], children: Vec<Value>) -> Value {
    json!({"name": name, "kind": "list", "keys": keys, "children": children})
}

fn leaves(names: &[&str]) -> Vec<Value> {
    names.iter().map(|n| leaf(n)).collect()
}

pub fn schema() -> SchemaMap {
    let acl_entry = list(
        "acl-entry",
        &["sequence-id"],
        vec![
            leaf("sequence-id"),
            container("config", leaves(&["sequence-id", "description"])),
            state(leaves(&["sequence-id", "description", "matched-packets"])),
        ],
    );
    let acl_set = list(
        "acl-set",
        &["name", "type"],
        vec![
            leaf("name"),
            leaf("type"),
            container("config", leaves(&["name", "type", "description"])),
            state(leaves(&["name", "type", "description"])),
            container("acl-entries", vec![acl_entry]),
        ],
    );
    let acl = container("acl", vec![container("acl-sets", vec![acl_set])]);

    let subinterface = list(
        "subinterface",
        &["index"],
        vec![
            leaf("index"),
            container("config", leaves(&["index"])),
            state(leaves(&["index", "oper-status"])),
        ],
    );
    let interface = list(
        "interface",
        &["name"],
        vec![
            leaf("name"),
            container("config", leaves(&["name", "mtu", "enabled", "description"])),
            state(vec![
                leaf("name"),
                leaf("mtu"),
                leaf("enabled"),
                leaf("oper-status"),
                container("counters", leaves(&["in-octets", "out-octets"])),
            ]),
            container("subinterfaces", vec![subinterface]),
        ],
    );
    let interfaces = container("interfaces", vec![interface]);

    let radius = container(
        "radius",
        vec![
            container("config", leaves(&["auth-port", "secret-key"])),
            state(vec![
                leaf("auth-port"),
                container("counters", leaves(&["access-accepts", "access-rejects"])),
            ]),
        ],
    );
    let server = list(
        "server",
        &["address"],
        vec![
            leaf("address"),
            container("config", leaves(&["address", "name", "timeout"])),
            state(leaves(&["address", "name", "timeout", "connection-opens"])),
            radius,
        ],
    );
    let server_group = list(
        "server-group",
        &["name"],
        vec![
            leaf("name"),
            container("config", leaves(&["name", "type"])),
            state(leaves(&["name", "type"])),
            container("servers", vec![server]),
        ],
    );
    let system = container(
        "system",
        vec![container("aaa", vec![container("server-groups", vec![server_group])])],
    );

    let document: SchemaDocument = serde_json::from_value(json!({"modules": [
        {"name": "openconfig-acl", "nodes": [acl]},
        {"name": "openconfig-interfaces", "nodes": [interfaces]},
        {"name": "openconfig-system", "nodes": [system]}
    ]}))
    .unwrap();
    SchemaMap::from_document(&document).unwrap()
}

pub fn acl_set(name: &str, description: &str) -> Value {
    json!({
        "name": name,
        "type": "ACL_IPV4",
        "config": {"name": name, "type": "ACL_IPV4", "description": description},
        "state": {"name": name, "type": "ACL_IPV4", "description": description},
        "acl-entries": {"acl-entry": [{
            "sequence-id": 1,
            "config": {"sequence-id": 1, "description": "permit all"},
            "state": {"sequence-id": 1, "description": "permit all", "matched-packets": "42"}
        }]}
    })
}

pub fn acl_payload() -> Value {
    json!({"openconfig-acl:acl": {"acl-sets": {"acl-set": [
        acl_set("MyACL1", "Description for MyACL1"),
        acl_set("MyACL2", "Description for MyACL2")
    ]}}})
}

pub fn interface(name: &str, description: &str) -> Value {
    json!({
        "name": name,
        "config": {"name": name, "mtu": 9100, "enabled": true, "description": description},
        "state": {
            "name": name,
            "mtu": 9100,
            "enabled": true,
            "oper-status": "UP",
            "counters": {"in-octets": "100", "out-octets": "200"}
        },
        "subinterfaces": {"subinterface": [{
            "index": 0,
            "config": {"index": 0},
            "state": {"index": 0, "oper-status": "UP"}
        }]}
    })
}

pub fn interfaces_payload() -> Value {
    json!({"openconfig-interfaces:interfaces": {"interface": [
        interface("Ethernet0", "uplink"),
        interface("Ethernet4", "downlink")
    ]}})
}

pub fn server(address: &str) -> Value {
    json!({
        "address": address,
        "config": {"address": address, "name": "radius-1", "timeout": 5},
        "state": {"address": address, "name": "radius-1", "timeout": 5, "connection-opens": "7"},
        "radius": {
            "config": {"auth-port": 1812, "secret-key": "s3cr3t"},
            "state": {"auth-port": 1812, "counters": {"access-accepts": "3", "access-rejects": "1"}}
        }
    })
}

pub fn radius_payload() -> Value {
    json!({"openconfig-system:system": {"aaa": {"server-groups": {"server-group": [{
        "name": "RADIUS",
        "config": {"name": "RADIUS", "type": "RADIUS"},
        "state": {"name": "RADIUS", "type": "RADIUS"},
        "servers": {"server": [server("10.0.0.1"), server("10.0.0.2")]}
    }]}}}})
}

pub fn build(schema: &SchemaMap, payload: &Value) -> Node {
    TreeBuilder::new(schema).build_root(payload).unwrap()
}

pub fn pruner() -> Pruner<SchemaMap> {
    Pruner::new(Arc::new(schema())).with_options(PrunerOptions {
        record_stats: true,
        log_totals: false,
    })
}

/// Materialize `payload`, prune it and return the surviving JSON
pub fn prune(
    pruner: &Pruner<SchemaMap>,
    payload: &Value,
    absolute_path: &str,
    request_path: &str,
    params: &shear::QueryParams,
) -> Value {
    let mut root = build(pruner.schema(), payload);
    pruner
        .prune(&mut root, absolute_path, request_path, params)
        .unwrap();
    root.to_json()
}

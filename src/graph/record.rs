//! Input adapters over the wire shapes of graph query results.
//!
//! Two shapes are accepted and hydrate to the same graph:
//!
//! | Shape | Root | Relationships |
//! |-------|------|---------------|
//! | [`TripleRecord`] | `nodes[0]` | `[start, label, end]` triples with a parallel `rel_props` list |
//! | [`SerializedRecord`] | `root` | `{start, end, label, properties}` objects |
//!
//! [`WireRecord`] reads either from JSON.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

use super::node::node_id;

static NULL: Value = Value::Null;

/// One relationship borrowed from a record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Relationship<'a> {
    pub start: &'a Value,
    pub label: &'a str,
    pub end: &'a Value,
    /// Edge property map, or `null` when the edge has none.
    pub properties: &'a Value,
}

/// A flattened subgraph returned by one query row.
pub trait QueryRecord {
    /// The node the query was anchored on.
    fn root(&self) -> Option<&Value>;

    /// Relationships in query order.
    fn relationships(&self) -> Vec<Relationship<'_>>;
}

/// `nodes` / `node_types` / `relationships` / `rel_props` result rows.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TripleRecord {
    pub nodes: Vec<Value>,
    #[serde(default)]
    pub node_types: Vec<Vec<String>>,
    pub relationships: Vec<(Value, String, Value)>,
    #[serde(default)]
    pub rel_props: Vec<Value>,
}

impl TripleRecord {
    /// Node from `nodes` with the same id as `endpoint`, or the endpoint
    /// itself when it is not listed.
    fn resolve<'a>(&'a self, by_id: &HashMap<String, &'a Value>, endpoint: &'a Value) -> &'a Value {
        node_id(endpoint)
            .and_then(|id| by_id.get(&id).copied())
            .unwrap_or(endpoint)
    }
}

impl QueryRecord for TripleRecord {
    fn root(&self) -> Option<&Value> {
        self.nodes.first()
    }

    fn relationships(&self) -> Vec<Relationship<'_>> {
        let by_id: HashMap<String, &Value> = self
            .nodes
            .iter()
            .filter_map(|node| node_id(node).map(|id| (id, node)))
            .collect();
        self.relationships
            .iter()
            .enumerate()
            .map(|(idx, (start, label, end))| Relationship {
                start: self.resolve(&by_id, start),
                label,
                end: self.resolve(&by_id, end),
                properties: self.rel_props.get(idx).unwrap_or(&NULL),
            })
            .collect()
    }
}

/// A relationship serialized as an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedRelationship {
    pub start: Value,
    pub end: Value,
    #[serde(alias = "type")]
    pub label: String,
    #[serde(default)]
    pub properties: Value,
}

/// `root` / `relationships` result rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializedRecord {
    pub root: Value,
    pub relationships: Vec<SerializedRelationship>,
}

impl QueryRecord for SerializedRecord {
    fn root(&self) -> Option<&Value> {
        if self.root.is_null() {
            None
        } else {
            Some(&self.root)
        }
    }

    fn relationships(&self) -> Vec<Relationship<'_>> {
        self.relationships
            .iter()
            .map(|rel| Relationship {
                start: &rel.start,
                label: &rel.label,
                end: &rel.end,
                properties: &rel.properties,
            })
            .collect()
    }
}

/// Either wire shape, as read from JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireRecord {
    Triple(TripleRecord),
    Serialized(SerializedRecord),
}

impl QueryRecord for WireRecord {
    fn root(&self) -> Option<&Value> {
        match self {
            WireRecord::Triple(record) => record.root(),
            WireRecord::Serialized(record) => record.root(),
        }
    }

    fn relationships(&self) -> Vec<Relationship<'_>> {
        match self {
            WireRecord::Triple(record) => record.relationships(),
            WireRecord::Serialized(record) => record.relationships(),
        }
    }
}

impl<R: QueryRecord + ?Sized> QueryRecord for &R {
    fn root(&self) -> Option<&Value> {
        (**self).root()
    }

    fn relationships(&self) -> Vec<Relationship<'_>> {
        (**self).relationships()
    }
}

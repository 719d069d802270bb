use super::layout::Position;
use crate::catalog::NodeRole;
use crate::resolver::NodeSpec;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// A node spec with an id and a place on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedNode {
    pub id: String,
    pub position: Position,
    #[serde(flatten)]
    pub spec: NodeSpec,
}

impl PlacedNode {
    pub fn name(&self) -> &str {
        &self.spec.name
    }

    pub fn node_type(&self) -> &str {
        &self.spec.node_type
    }

    pub fn role(&self) -> NodeRole {
        self.spec.role
    }

    pub fn is_executable(&self) -> bool {
        self.spec.role.is_executable()
    }
}

/// One edge end: the target node and the input it lands on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionTarget {
    pub node: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub index: u32,
}

/// Outgoing edges of one node, grouped by output index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeConnections {
    pub main: Vec<Vec<ConnectionTarget>>,
}

/// A flattened edge, convenient for checks and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edge<'a> {
    pub source: &'a str,
    pub output: u32,
    pub target: &'a str,
    pub input: u32,
}

/// Source node id -> outgoing edges.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Connections(pub BTreeMap<String, NodeConnections>);

impl Connections {
    pub fn connect(&mut self, source: &str, output: u32, target: &str, input: u32) {
        let outputs = &mut self.0.entry(source.to_string()).or_default().main;
        let slot = output as usize;
        if outputs.len() <= slot {
            outputs.resize_with(slot + 1, Vec::new);
        }
        outputs[slot].push(ConnectionTarget {
            node: target.to_string(),
            kind: "main".to_string(),
            index: input,
        });
    }

    /// Targets wired to one output of a node.
    pub fn targets(&self, source: &str, output: u32) -> &[ConnectionTarget] {
        self.0
            .get(source)
            .and_then(|c| c.main.get(output as usize))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn edges(&self) -> impl Iterator<Item = Edge<'_>> {
        self.0.iter().flat_map(|(source, conns)| {
            conns.main.iter().enumerate().flat_map(move |(output, targets)| {
                targets.iter().map(move |t| Edge {
                    source: source.as_str(),
                    output: output as u32,
                    target: t.node.as_str(),
                    input: t.index,
                })
            })
        })
    }

    pub fn inbound_count(&self, target: &str) -> usize {
        self.edges().filter(|e| e.target == target).count()
    }

    pub fn outgoing(&self, source: &str) -> impl Iterator<Item = Edge<'_>> {
        self.edges().filter(move |e| e.source == source)
    }

    pub fn remove_node(&mut self, id: &str) {
        self.0.remove(id);
        for conns in self.0.values_mut() {
            for targets in conns.main.iter_mut() {
                targets.retain(|t| t.node != id);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.edges().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowSettings {
    pub execution_order: String,
}

/// The emitted workflow. Field order is the serialized property order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowGraph {
    pub name: String,
    pub nodes: Vec<PlacedNode>,
    pub connections: Connections,
    #[serde(default)]
    pub active: bool,
    pub settings: WorkflowSettings,
    #[serde(default)]
    pub tags: BTreeSet<String>,
}

impl WorkflowGraph {
    pub fn node(&self, id: &str) -> Option<&PlacedNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn node_mut(&mut self, id: &str) -> Option<&mut PlacedNode> {
        self.nodes.iter_mut().find(|n| n.id == id)
    }

    pub fn node_by_name(&self, name: &str) -> Option<&PlacedNode> {
        self.nodes.iter().find(|n| n.spec.name == name)
    }

    pub fn nodes_with_role(&self, role: NodeRole) -> impl Iterator<Item = &PlacedNode> {
        self.nodes.iter().filter(move |n| n.spec.role == role)
    }

    /// Every node except annotations.
    pub fn executable_nodes(&self) -> impl Iterator<Item = &PlacedNode> {
        self.nodes.iter().filter(|n| n.is_executable())
    }

    pub fn executable_count(&self) -> usize {
        self.executable_nodes().count()
    }

    pub fn annotation_count(&self) -> usize {
        self.nodes.len() - self.executable_count()
    }

    pub fn trigger(&self) -> Option<&PlacedNode> {
        self.nodes_with_role(NodeRole::Trigger).next()
    }
}

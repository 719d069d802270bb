use super::id::IdGenerator;
use super::layout::Position;
use super::model::{Connections, PlacedNode, WorkflowGraph, WorkflowSettings};
use crate::catalog::{NodeCatalogEntry, NodeRole};
use crate::config::GeneratorConfig;
use crate::docs::Documentation;
use crate::resolver::NodeSpec;
use ahash::{AHashMap, AHashSet};
use serde_json::json;
use tracing::{debug, warn};

const NO_OP_TYPE: &str = "n8n-nodes-base.noOp";
const STICKY_NOTE_TYPE: &str = "n8n-nodes-base.stickyNote";
/// Draws before a colliding generator is given up on and the id is suffixed.
const MAX_ID_DRAWS: usize = 1024;

/// Places resolved specs on a grid and wires them together.
///
/// The builder is the only component that assigns ids and positions. Ids are
/// drawn once per node from the injected generator and never regenerated.
pub struct GraphBuilder<'a> {
    config: &'a GeneratorConfig,
    ids: &'a dyn IdGenerator,
}

/// Mutable state for one build.
struct Draft<'a> {
    graph: WorkflowGraph,
    config: &'a GeneratorConfig,
    ids: &'a dyn IdGenerator,
    names: AHashSet<String>,
    occupied: AHashSet<(usize, i64)>,
    stages: AHashMap<String, usize>,
}

impl<'a> Draft<'a> {
    fn unique_name(&mut self, name: &str) -> String {
        let mut candidate = name.to_string();
        let mut n = 2;
        while self.names.contains(&candidate) {
            candidate = format!("{} {}", name, n);
            n += 1;
        }
        self.names.insert(candidate.clone());
        candidate
    }

    /// Lowest free lane below the main row at `stage`.
    fn next_lane(&self, stage: usize) -> i64 {
        let mut lane = 1;
        while self.occupied.contains(&(stage, lane)) {
            lane += 1;
        }
        lane
    }

    fn place(&mut self, mut spec: NodeSpec, stage: usize, lane: i64) -> String {
        spec.name = self.unique_name(&spec.name);
        let id = self.ids.next_id();
        self.occupied.insert((stage, lane));
        self.stages.insert(id.clone(), stage);
        self.graph.nodes.push(PlacedNode {
            id: id.clone(),
            position: self.config.layout().position(stage, lane),
            spec,
        });
        id
    }

    fn connect(&mut self, source: &str, output: u32, target: &str) {
        self.graph.connections.connect(source, output, target, 0);
    }

    /// Hangs a pass-through leaf off one output of a branching node.
    fn add_leaf(&mut self, source: &str, source_name: &str, output: u32, outputs: u32, lane: i64) {
        let label = match (outputs, output) {
            (2, 0) => format!("{} Met", source_name),
            (2, _) => format!("{} Not Met", source_name),
            _ => format!("{} Output {}", source_name, output + 1),
        };
        let mut leaf = NodeSpec::from_entry(
            "branch_end",
            &NodeCatalogEntry::new(NO_OP_TYPE, &label, NodeRole::Action),
        );
        leaf.intent = format!("continue when {} takes output {}", source_name, output);
        let stage = self.stages.get(source).copied().unwrap_or_default() + 1;
        let id = self.place(leaf, stage, lane);
        self.connect(source, output, &id);
    }
}

/// A node at the end of the main chain so far.
struct Tail {
    id: String,
    name: String,
    outputs: u32,
    branching: bool,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(config: &'a GeneratorConfig, ids: &'a dyn IdGenerator) -> Self {
        Self { config, ids }
    }

    pub fn empty_graph(&self, name: &str) -> WorkflowGraph {
        let workflow = self.config.workflow();
        WorkflowGraph {
            name: name.to_string(),
            nodes: Vec::new(),
            connections: Connections::default(),
            active: workflow.active,
            settings: WorkflowSettings {
                execution_order: workflow.execution_order.clone(),
            },
            tags: workflow.tags.clone(),
        }
    }

    /// Lays the specs out left to right and connects them.
    ///
    /// The main chain runs trigger, first action, in-line data operations and
    /// single-output conditions, branching conditions, then the remaining
    /// actions. Every edge points forward, so the result is acyclic.
    pub fn build(&self, name: &str, specs: Vec<NodeSpec>) -> WorkflowGraph {
        let total = specs.len();
        let mut triggers = Vec::new();
        let mut actions = Vec::new();
        let mut inline = Vec::new();
        let mut branching = Vec::new();
        let mut handlers = Vec::new();
        for (index, spec) in specs.into_iter().enumerate() {
            match spec.role {
                NodeRole::Trigger => triggers.push((index, spec)),
                NodeRole::Action => actions.push((index, spec)),
                NodeRole::Condition if spec.outputs > 1 => branching.push((index, spec)),
                NodeRole::Condition | NodeRole::DataOp => inline.push((index, spec)),
                NodeRole::ErrorHandler => handlers.push((index, spec)),
                NodeRole::Annotation => {
                    debug!(name = %spec.name, "annotation spec ignored by the builder");
                }
            }
        }

        let mut chain = Vec::with_capacity(total);
        let mut extra_triggers = Vec::new();
        let mut triggers = triggers.into_iter();
        chain.extend(triggers.next());
        extra_triggers.extend(triggers);
        let mut actions = actions.into_iter();
        chain.extend(actions.next());
        chain.extend(inline);
        chain.extend(branching);
        chain.extend(actions);

        let mut draft = Draft {
            graph: self.empty_graph(name),
            config: self.config,
            ids: self.ids,
            names: AHashSet::new(),
            occupied: AHashSet::new(),
            stages: AHashMap::new(),
        };
        let mut placed: Vec<Option<String>> = vec![None; total];

        let mut tail: Option<Tail> = None;
        let mut second: Option<String> = None;
        for (stage, (index, spec)) in chain.into_iter().enumerate() {
            let outputs = spec.outputs;
            let is_branching = spec.role == NodeRole::Condition && outputs > 1;
            let id = draft.place(spec, stage, 0);
            let node_name = draft.graph.nodes[draft.graph.nodes.len() - 1].spec.name.clone();
            placed[index] = Some(id.clone());
            if stage == 1 {
                second = Some(id.clone());
            }

            if let Some(prev) = &tail {
                draft.connect(&prev.id, 0, &id);
            }
            if is_branching {
                for output in 1..outputs {
                    let lane = draft.next_lane(stage + 1);
                    draft.add_leaf(&id, &node_name, output, outputs, lane);
                }
            }
            tail = Some(Tail {
                id,
                name: node_name,
                outputs,
                branching: is_branching,
            });
        }

        if let Some(last) = &tail {
            if last.branching {
                draft.add_leaf(&last.id, &last.name, 0, last.outputs, 0);
            }
        }

        for (index, spec) in extra_triggers {
            let lane = draft.next_lane(0);
            let id = draft.place(spec, 0, lane);
            if let Some(target) = &second {
                draft.connect(&id, 0, target);
            }
            placed[index] = Some(id);
        }

        let mode = self.config.error_handling().error_output_mode.clone();
        for (index, spec) in handlers {
            let guarded = spec
                .guards
                .and_then(|g| placed.get(g).cloned().flatten())
                .or_else(|| tail.as_ref().map(|t| t.id.clone()));
            let Some(guarded) = guarded else {
                let lane = draft.next_lane(0);
                placed[index] = Some(draft.place(spec, 0, lane));
                continue;
            };

            let stage = draft.stages.get(&guarded).copied().unwrap_or_default() + 1;
            let lane = draft.next_lane(stage);
            let handler = draft.place(spec, stage, lane);

            let route = draft
                .graph
                .node_mut(&guarded)
                .filter(|node| node.spec.error_output && !mode.is_empty())
                .map(|node| {
                    node.spec.on_error = Some(mode.clone());
                    node.spec.outputs
                });
            draft.connect(&guarded, route.unwrap_or(0), &handler);
            placed[index] = Some(handler);
        }

        debug!(
            nodes = draft.graph.nodes.len(),
            edges = draft.graph.connections.len(),
            "built workflow graph"
        );
        draft.graph
    }

    /// Replaces the graph's annotation nodes with the given notes.
    ///
    /// Executable nodes and connections are left untouched, so annotating the
    /// same graph repeatedly only ever swaps the note set.
    pub fn attach_documentation(&self, graph: &mut WorkflowGraph, documentation: &Documentation) {
        let stale: Vec<String> = graph
            .nodes
            .iter()
            .filter(|n| !n.is_executable())
            .map(|n| n.id.clone())
            .collect();
        for id in &stale {
            graph.connections.remove_node(id);
        }
        graph.nodes.retain(PlacedNode::is_executable);

        let layout = self.config.layout();
        let settings = self.config.documentation();
        let mut taken: AHashSet<String> = graph.nodes.iter().map(|n| n.id.clone()).collect();
        let mut names: AHashSet<String> = graph.nodes.iter().map(|n| n.spec.name.clone()).collect();
        let mut stacked: AHashMap<i64, i64> = AHashMap::new();
        let top = graph
            .nodes
            .iter()
            .map(|n| n.position.y())
            .min()
            .unwrap_or(layout.origin[1])
            .min(layout.origin[1]);

        for note in &documentation.notes {
            let x = note
                .anchor
                .as_deref()
                .and_then(|id| graph.node(id))
                .map(|n| n.position.x())
                .unwrap_or(layout.origin[0] - layout.horizontal_spacing);
            let level = stacked.entry(x).or_insert(0);
            *level += 1;
            let position = Position(x, top - *level * layout.vertical_spacing);

            let mut name = "Sticky Note".to_string();
            let mut n = 2;
            while names.contains(&name) {
                name = format!("Sticky Note {}", n);
                n += 1;
            }
            names.insert(name.clone());

            let mut spec = NodeSpec::from_entry(
                "annotation",
                &NodeCatalogEntry::new(STICKY_NOTE_TYPE, &name, NodeRole::Annotation),
            );
            spec.intent = note.category.key().to_string();
            spec.parameters.insert("content".to_string(), json!(note.content));
            spec.parameters.insert("height".to_string(), json!(settings.note_height));
            spec.parameters.insert("width".to_string(), json!(settings.note_width));
            spec.parameters.insert("color".to_string(), json!(note.color));

            graph.nodes.push(PlacedNode {
                id: self.fresh_id(&mut taken),
                position,
                spec,
            });
        }
    }

    /// Draws ids until one is not yet used in the graph.
    ///
    /// A graph loaded from disk may already hold ids the generator will hand
    /// out again, e.g. a fresh sequential generator starting at `node-0001`.
    fn fresh_id(&self, taken: &mut AHashSet<String>) -> String {
        let mut id = self.ids.next_id();
        let mut draws = 1;
        while taken.contains(&id) {
            if draws == MAX_ID_DRAWS {
                let base = id.clone();
                let mut n = 2;
                while taken.contains(&id) {
                    id = format!("{}-{}", base, n);
                    n += 1;
                }
                warn!(%base, %id, "id generator keeps colliding, suffixed the id");
                break;
            }
            id = self.ids.next_id();
            draws += 1;
        }
        taken.insert(id.clone());
        id
    }
}

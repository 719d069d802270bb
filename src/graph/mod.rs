//! The emitted workflow graph and the builder that produces it.

mod builder;
mod id;
mod io;
mod layout;
mod model;

pub use builder::GraphBuilder;
pub use id::{IdGenerator, SequentialIdGenerator, UuidGenerator};
pub use layout::{LayoutConfig, Position};
pub use model::{
    ConnectionTarget, Connections, Edge, NodeConnections, PlacedNode, WorkflowGraph,
    WorkflowSettings,
};

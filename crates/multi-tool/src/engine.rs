pub mod base;
pub mod utils;
pub mod vertex;

pub use base::{
    AgentEngine, DeployRequest, DeployedResource, EventStream, Query, ResourceName, Session,
};
pub use vertex::VertexAgentEngine;

pub mod aggregate;

pub use aggregate::{Agent, AgentDto, AgentStatus};

//! HTTP benchmark operations against a DFS agent.
mod client;
mod ops;


pub use client::build_client;
pub use ops::{ReadOperation, WriteOperation};

#[cfg(test)]
pub(crate) use ops::agent_url;

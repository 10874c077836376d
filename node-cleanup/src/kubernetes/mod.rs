//! Kubernetes integration
//!
//! Connection handling and the node operations used by the cleanup pipeline.

pub mod client;
pub mod error;
pub mod nodes;
pub mod types;

pub use client::K8sClient;
pub use error::{K8sError, K8sResult};
pub use nodes::NodeApi;
pub use types::{NodeCondition, NodeInfo, NodeStatus};

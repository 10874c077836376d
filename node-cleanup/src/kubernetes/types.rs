//! Simplified Kubernetes node types
//!
//! Flattened views of `k8s_openapi` objects carrying only what the cleanup
//! pipeline and its report need.

/// Condition type the kubelet uses to report node health
pub const READY_CONDITION: &str = "Ready";

/// Simplified node information
#[derive(Debug, Clone)]
pub struct NodeInfo {
    pub name: String,
    /// `None` when the node reports no `Ready` condition
    pub status: Option<NodeStatus>,
    pub roles: Vec<String>,
    pub internal_ip: Option<String>,
    pub kubelet_version: String,
    pub conditions: Vec<NodeCondition>,
    pub created_at: Option<String>,
}

impl NodeInfo {
    /// Build a node descriptor, deriving its status from the conditions
    pub fn new(name: impl Into<String>, conditions: Vec<NodeCondition>) -> Self {
        Self {
            name: name.into(),
            status: NodeStatus::from_conditions(&conditions),
            roles: Vec::new(),
            internal_ip: None,
            kubelet_version: String::new(),
            conditions,
            created_at: None,
        }
    }
}

/// Node status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeStatus {
    Ready,
    NotReady,
    Unknown,
}

impl NodeStatus {
    /// Derive status from the first `Ready` condition.
    ///
    /// Returns `None` when the node reports no `Ready` condition at all.
    pub fn from_conditions(conditions: &[NodeCondition]) -> Option<Self> {
        conditions
            .iter()
            .find(|c| c.condition_type == READY_CONDITION)
            .map(|c| match c.status.as_str() {
                "True" => NodeStatus::Ready,
                "Unknown" => NodeStatus::Unknown,
                _ => NodeStatus::NotReady,
            })
    }
}

impl std::fmt::Display for NodeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NodeStatus::Ready => write!(f, "Ready"),
            NodeStatus::NotReady => write!(f, "NotReady"),
            NodeStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Node condition
#[derive(Debug, Clone)]
pub struct NodeCondition {
    pub condition_type: String,
    pub status: String,
    pub reason: Option<String>,
    pub message: Option<String>,
}

impl std::fmt::Display for NodeCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.condition_type, self.status)?;
        if let Some(reason) = &self.reason {
            write!(f, " ({})", reason)?;
        }
        Ok(())
    }
}

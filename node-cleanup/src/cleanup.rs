//! Node cleanup pipeline
//!
//! Lists the cluster's nodes, selects those that are not Ready and deletes
//! them one at a time.

use crate::kubernetes::{K8sError, K8sResult, NodeApi, NodeInfo, NodeStatus};

/// Options for a single cleanup pass
#[derive(Debug, Clone, Default)]
pub struct CleanupOptions {
    /// Only report what would have been deleted
    pub dry_run: bool,
    /// Label selector applied when listing nodes
    pub label_selector: Option<String>,
}

/// Outcome of a cleanup pass
#[derive(Debug, Default)]
pub struct CleanupReport {
    pub dry_run: bool,
    /// Nodes selected for deletion, in listing order
    pub candidates: Vec<String>,
    pub deleted: Vec<String>,
    pub failed: Vec<(String, K8sError)>,
}

impl CleanupReport {
    /// True when no deletion failed
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Whether a node counts as healthy.
///
/// Only a `Ready=True` condition is healthy; both `Ready=False` and
/// `Ready=Unknown` make the node a deletion candidate. A node without any
/// `Ready` condition is reported and treated as ready so it is never deleted
/// on incomplete information.
pub fn is_node_ready(node: &NodeInfo) -> bool {
    match node.status {
        Some(NodeStatus::Ready) => true,
        Some(NodeStatus::NotReady) | Some(NodeStatus::Unknown) => false,
        None => {
            let conditions: Vec<String> = node.conditions.iter().map(|c| c.to_string()).collect();
            tracing::error!(
                node = %node.name,
                conditions = ?conditions,
                "no KubeletReady condition found for node {}",
                node.name
            );
            true
        }
    }
}

/// Select the nodes that should be removed, preserving order
pub fn nodes_for_cleanup(nodes: &[NodeInfo]) -> Vec<NodeInfo> {
    nodes
        .iter()
        .filter(|node| !is_node_ready(node))
        .cloned()
        .collect()
}

/// Delete each named node in turn.
///
/// A failed deletion is recorded and does not stop the remaining ones.
pub async fn terminate_nodes<A: NodeApi + ?Sized>(
    api: &A,
    names: &[String],
) -> (Vec<String>, Vec<(String, K8sError)>) {
    let mut success = Vec::new();
    let mut errors = Vec::new();

    for name in names {
        match api.delete_node(name).await {
            Ok(()) => success.push(name.clone()),
            Err(e) => {
                tracing::debug!(node = %name, error = %e, "Node deletion failed");
                errors.push((name.clone(), e));
            }
        }
    }

    (success, errors)
}

/// Run one cleanup pass against the cluster
pub async fn run<A: NodeApi + ?Sized>(api: &A, options: &CleanupOptions) -> K8sResult<CleanupReport> {
    let all_nodes = api.list_nodes(options.label_selector.as_deref()).await?;
    tracing::debug!(
        "found nodes in cluster {:?}",
        all_nodes.iter().map(|n| n.name.as_str()).collect::<Vec<_>>()
    );

    let candidates: Vec<String> = nodes_for_cleanup(&all_nodes)
        .into_iter()
        .map(|n| n.name)
        .collect();
    tracing::debug!("nodes to be deleted: {:?}", candidates);

    let (deleted, failed) = if options.dry_run {
        tracing::info!("dry run mode detected: not deleting nodes");
        (Vec::new(), Vec::new())
    } else {
        terminate_nodes(api, &candidates).await
    };

    for name in &deleted {
        tracing::info!("successfully deleted node {}", name);
    }

    for (name, error) in &failed {
        tracing::error!("error deleting node: {}: {}", name, error);
    }

    Ok(CleanupReport {
        dry_run: options.dry_run,
        candidates,
        deleted,
        failed,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kubernetes::NodeCondition;

    fn node(name: &str, ready: Option<&str>) -> NodeInfo {
        let conditions = ready
            .map(|status| {
                vec![NodeCondition {
                    condition_type: "Ready".to_string(),
                    status: status.to_string(),
                    reason: None,
                    message: None,
                }]
            })
            .unwrap_or_default();
        NodeInfo::new(name, conditions)
    }

    #[test]
    fn test_ready_node_is_ready() {
        assert!(is_node_ready(&node("a", Some("True"))));
    }

    #[test]
    fn test_false_node_is_not_ready() {
        assert!(!is_node_ready(&node("a", Some("False"))));
    }

    #[test]
    fn test_unknown_node_is_not_ready() {
        assert!(!is_node_ready(&node("a", Some("Unknown"))));
    }

    #[test]
    fn test_node_without_ready_condition_is_kept() {
        assert!(is_node_ready(&node("a", None)));
    }

    #[test]
    fn test_nodes_for_cleanup_preserves_order() {
        let nodes = vec![
            node("n1", Some("Unknown")),
            node("n2", Some("True")),
            node("n3", None),
            node("n4", Some("False")),
        ];
        let names: Vec<String> = nodes_for_cleanup(&nodes).into_iter().map(|n| n.name).collect();
        assert_eq!(names, vec!["n1".to_string(), "n4".to_string()]);
    }

    #[test]
    fn test_nodes_for_cleanup_empty() {
        assert!(nodes_for_cleanup(&[]).is_empty());
    }

    #[test]
    fn test_report_success() {
        let mut report = CleanupReport::default();
        assert!(report.is_success());
        report
            .failed
            .push(("n1".to_string(), K8sError::Internal("boom".to_string())));
        assert!(!report.is_success());
    }
}

//! Node operations
//!
//! List nodes and delete them.

use async_trait::async_trait;
use k8s_openapi::api::core::v1::Node;
use kube::api::{Api, DeleteParams, ListParams};

use crate::kubernetes::client::K8sClient;
use crate::kubernetes::error::{K8sError, K8sResult};
use crate::kubernetes::types::{NodeCondition, NodeInfo, NodeStatus};

/// Node operations the cleanup pipeline depends on
#[async_trait]
pub trait NodeApi: Send + Sync {
    /// List all nodes, optionally restricted by a label selector
    async fn list_nodes(&self, label_selector: Option<&str>) -> K8sResult<Vec<NodeInfo>>;

    /// Delete a node
    async fn delete_node(&self, name: &str) -> K8sResult<()>;
}

#[async_trait]
impl NodeApi for K8sClient {
    async fn list_nodes(&self, label_selector: Option<&str>) -> K8sResult<Vec<NodeInfo>> {
        list_nodes(self, label_selector).await
    }

    async fn delete_node(&self, name: &str) -> K8sResult<()> {
        delete_node(self, name).await
    }
}

/// List all nodes
pub async fn list_nodes(
    client: &K8sClient,
    label_selector: Option<&str>,
) -> K8sResult<Vec<NodeInfo>> {
    let nodes: Api<Node> = Api::all(client.inner().clone());

    let mut params = ListParams::default();
    if let Some(selector) = label_selector {
        params = params.labels(selector);
    }

    let list = nodes.list(&params).await?;

    Ok(list.items.into_iter().map(node_to_info).collect())
}

/// Delete a node, removing its dependents first (foreground propagation)
pub async fn delete_node(client: &K8sClient, name: &str) -> K8sResult<()> {
    let nodes: Api<Node> = Api::all(client.inner().clone());

    nodes
        .delete(name, &DeleteParams::foreground())
        .await
        .map_err(|e| K8sError::from(e).for_node(name))?;

    Ok(())
}

pub(crate) fn node_to_info(node: Node) -> NodeInfo {
    let metadata = node.metadata;
    let status = node.status.unwrap_or_default();

    let conditions: Vec<NodeCondition> = status
        .conditions
        .unwrap_or_default()
        .into_iter()
        .map(|c| NodeCondition {
            condition_type: c.type_,
            status: c.status,
            reason: c.reason,
            message: c.message,
        })
        .collect();

    // Get roles from labels
    let labels = metadata.labels.unwrap_or_default();
    let roles: Vec<String> = labels
        .keys()
        .filter(|k| k.starts_with("node-role.kubernetes.io/"))
        .map(|k| k.trim_start_matches("node-role.kubernetes.io/").to_string())
        .collect();

    let internal_ip = status
        .addresses
        .unwrap_or_default()
        .into_iter()
        .find(|a| a.type_ == "InternalIP")
        .map(|a| a.address);

    let kubelet_version = status
        .node_info
        .map(|info| info.kubelet_version)
        .unwrap_or_default();

    NodeInfo {
        name: metadata.name.unwrap_or_default(),
        status: NodeStatus::from_conditions(&conditions),
        roles,
        internal_ip,
        kubelet_version,
        conditions,
        created_at: metadata.creation_timestamp.map(|t| t.0.to_rfc3339()),
    }
}

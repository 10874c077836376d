//! Kubernetes error types
//!
//! Maps kube-rs errors onto the few cases the cleanup pipeline distinguishes.

use thiserror::Error;

/// Kubernetes-specific errors
#[derive(Debug, Error)]
pub enum K8sError {
    /// Error from kube-rs client
    #[error("Kubernetes API error: {0}")]
    KubeError(kube::Error),

    /// Invalid kubeconfig
    #[error("Invalid kubeconfig: {0}")]
    InvalidKubeconfig(String),

    /// Node does not exist (already removed)
    #[error("Node not found: {0}")]
    NodeNotFound(String),

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Internal system error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<kube::Error> for K8sError {
    fn from(err: kube::Error) -> Self {
        if let kube::Error::Api(response) = &err {
            match response.code {
                403 => return K8sError::Forbidden(response.message.clone()),
                404 => return K8sError::NodeNotFound(response.message.clone()),
                _ => {}
            }
        }
        K8sError::KubeError(err)
    }
}

impl K8sError {
    /// Attach the node name to a not-found error coming from the API server
    pub(crate) fn for_node(self, name: &str) -> Self {
        match self {
            K8sError::NodeNotFound(_) => K8sError::NodeNotFound(name.to_string()),
            other => other,
        }
    }
}

/// Result type alias for Kubernetes operations
pub type K8sResult<T> = std::result::Result<T, K8sError>;

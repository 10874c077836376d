//! Kubernetes client wrapper
//!
//! Wraps the kube-rs Client with the API server and context it was built from.

use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::path::Path;

use super::error::{K8sError, K8sResult};

/// Wrapper around kube-rs Client with cluster context
#[derive(Clone)]
pub struct K8sClient {
    inner: Client,
    context: Option<String>,
    api_server: String,
}

impl K8sClient {
    /// Create client from a kubeconfig file with optional context.
    ///
    /// Relative credential paths (`tokenFile`, `certificate-authority`,
    /// `client-certificate`, `client-key`) resolve against the file's directory.
    pub async fn from_kubeconfig_file(path: &Path, context: Option<&str>) -> K8sResult<Self> {
        let kubeconfig = Kubeconfig::read_from(path).map_err(|e| {
            K8sError::InvalidKubeconfig(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_parsed_kubeconfig(kubeconfig, context).await
    }

    /// Create client from kubeconfig YAML with optional context
    pub async fn from_kubeconfig(kubeconfig_yaml: &str, context: Option<&str>) -> K8sResult<Self> {
        let kubeconfig = Kubeconfig::from_yaml(kubeconfig_yaml).map_err(|e| {
            K8sError::InvalidKubeconfig(format!("Failed to parse kubeconfig: {}", e))
        })?;

        Self::from_parsed_kubeconfig(kubeconfig, context).await
    }

    async fn from_parsed_kubeconfig(
        kubeconfig: Kubeconfig,
        context: Option<&str>,
    ) -> K8sResult<Self> {
        let (context_name, api_server) = Self::resolve_context(&kubeconfig, context)?;

        let config = Config::from_custom_kubeconfig(
            kubeconfig,
            &KubeConfigOptions {
                context: Some(context_name.clone()),
                ..Default::default()
            },
        )
        .await
        .map_err(|e| K8sError::InvalidKubeconfig(format!("Failed to create config: {}", e)))?;

        let client = Client::try_from(config)
            .map_err(|e| K8sError::InvalidKubeconfig(format!("Failed to create client: {}", e)))?;

        Ok(Self {
            inner: client,
            context: Some(context_name),
            api_server,
        })
    }

    /// Create client from in-cluster configuration (for running inside K8s)
    pub async fn from_incluster() -> K8sResult<Self> {
        let config = Config::incluster().map_err(|e| {
            K8sError::InvalidKubeconfig(format!("Failed to get in-cluster config: {}", e))
        })?;

        Self::from_config(config, None)
    }

    /// Create client from an explicit kubeconfig path, or let kube infer one
    /// (`KUBECONFIG`, `~/.kube/config`, then in-cluster)
    pub async fn infer(kubeconfig: Option<&Path>, context: Option<&str>) -> K8sResult<Self> {
        if let Some(path) = kubeconfig {
            return Self::from_kubeconfig_file(path, context).await;
        }

        if context.is_some() {
            let options = KubeConfigOptions {
                context: context.map(String::from),
                ..Default::default()
            };
            let config = Config::from_kubeconfig(&options).await.map_err(|e| {
                K8sError::InvalidKubeconfig(format!("Failed to load kubeconfig: {}", e))
            })?;
            return Self::from_config(config, context.map(String::from));
        }

        let config = Config::infer().await.map_err(|e| {
            K8sError::InvalidKubeconfig(format!("Failed to infer config: {}", e))
        })?;

        Self::from_config(config, None)
    }

    fn from_config(config: Config, context: Option<String>) -> K8sResult<Self> {
        let api_server = config.cluster_url.to_string();

        let client = Client::try_from(config)
            .map_err(|e| K8sError::InvalidKubeconfig(format!("Failed to create client: {}", e)))?;

        Ok(Self {
            inner: client,
            context,
            api_server,
        })
    }

    /// Find the context to use and the API server URL it points at
    fn resolve_context(
        kubeconfig: &Kubeconfig,
        context_name: Option<&str>,
    ) -> K8sResult<(String, String)> {
        let context_name = context_name
            .map(String::from)
            .or_else(|| kubeconfig.current_context.clone())
            .ok_or_else(|| {
                K8sError::InvalidKubeconfig("No context specified and no current-context".into())
            })?;

        let context = kubeconfig
            .contexts
            .iter()
            .find(|c| c.name == context_name)
            .ok_or_else(|| {
                K8sError::InvalidKubeconfig(format!("Context '{}' not found", context_name))
            })?;

        let cluster_name = context
            .context
            .as_ref()
            .map(|c| c.cluster.as_str())
            .ok_or_else(|| {
                K8sError::InvalidKubeconfig("Context has no cluster reference".into())
            })?;

        let cluster = kubeconfig
            .clusters
            .iter()
            .find(|c| c.name == cluster_name)
            .ok_or_else(|| {
                K8sError::InvalidKubeconfig(format!("Cluster '{}' not found", cluster_name))
            })?;

        let api_server = cluster
            .cluster
            .as_ref()
            .and_then(|c| c.server.clone())
            .ok_or_else(|| K8sError::InvalidKubeconfig("Cluster has no server URL".into()))?;

        Ok((context_name, api_server))
    }

    /// Get the inner kube-rs Client
    pub fn inner(&self) -> &Client {
        &self.inner
    }

    /// Get the kubeconfig context, if one was selected
    pub fn context(&self) -> Option<&str> {
        self.context.as_deref()
    }

    /// Get API server URL
    pub fn api_server(&self) -> &str {
        &self.api_server
    }
}

impl std::fmt::Debug for K8sClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("K8sClient")
            .field("context", &self.context)
            .field("api_server", &self.api_server)
            .finish()
    }
}

//! Cluster API.

use std::sync::Arc;

use reqwest::Method;

use crate::error::Result;
use crate::transport::Transport;
use crate::types::ClusterInfo;

/// Cluster API client.
#[derive(Debug, Clone)]
pub struct ClustersApi {
    transport: Arc<Transport>,
}

impl ClustersApi {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// Get worker version and Kafka cluster id from the API root.
    pub async fn get(&self) -> Result<ClusterInfo> {
        self.transport.execute(Method::GET, "", None::<&()>).await
    }
}

//! Connectors API.

use std::sync::Arc;

use reqwest::Method;

use crate::error::Result;
use crate::transport::Transport;
use crate::types::{Connector, ConnectorConfig, CreateConnectorRequest};

/// Connectors API client.
///
/// Every method is a single request through the shared transport; nothing is
/// cached between calls.
#[derive(Debug, Clone)]
pub struct ConnectorsApi {
    transport: Arc<Transport>,
}

impl ConnectorsApi {
    pub(crate) fn new(transport: Arc<Transport>) -> Self {
        Self { transport }
    }

    /// List the names of all connectors.
    pub async fn list(&self) -> Result<Vec<String>> {
        self.transport
            .execute(Method::GET, "connectors", None::<&()>)
            .await
    }

    /// Get a connector by name.
    ///
    /// An unknown name surfaces as the worker's 404 `Error::Api`.
    pub async fn get(&self, name: &str) -> Result<Connector> {
        self.transport
            .execute(Method::GET, &format!("connectors/{}", name), None::<&()>)
            .await
    }

    /// Get only the configuration of a connector.
    pub async fn config(&self, name: &str) -> Result<ConnectorConfig> {
        self.transport
            .execute(
                Method::GET,
                &format!("connectors/{}/config", name),
                None::<&()>,
            )
            .await
    }

    /// Create a connector.
    ///
    /// `config` is passed through as-is; the returned connector is the
    /// worker's view, including any fields it added.
    pub async fn create(&self, name: &str, config: &ConnectorConfig) -> Result<Connector> {
        let request = CreateConnectorRequest { name, config };
        self.transport
            .execute(Method::POST, "connectors", Some(&request))
            .await
    }

    /// Replace the configuration of a connector, creating it if needed.
    ///
    /// The body is the config map alone; the name travels in the path.
    pub async fn update(&self, name: &str, config: &ConnectorConfig) -> Result<Connector> {
        self.transport
            .execute(
                Method::PUT,
                &format!("connectors/{}/config", name),
                Some(config),
            )
            .await
    }

    /// Delete a connector.
    pub async fn delete(&self, name: &str) -> Result<()> {
        self.transport
            .execute_empty(Method::DELETE, &format!("connectors/{}/", name), None::<&()>)
            .await
    }
}

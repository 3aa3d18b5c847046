//! HTTP client SDK for the Kafka Connect REST API.
//!
//! This crate provides a typed client for administering connectors on a
//! Kafka Connect cluster.
//!
//! # Example
//!
//! ```no_run
//! use kconnect_client::{ConnectClient, ConnectorConfig, Result};
//! use serde_json::json;
//!
//! # async fn example() -> Result<()> {
//! let client = ConnectClient::builder()
//!     .base_url("http://localhost:8083/")
//!     .basic_auth("admin", Some("secret".to_string()))
//!     .build()?;
//!
//! let cluster = client.clusters().get().await?;
//! println!("Connect {} on cluster {}", cluster.version, cluster.id);
//!
//! let mut config = ConnectorConfig::new();
//! config.insert(
//!     "connector.class".to_string(),
//!     json!("io.confluent.kafka.connect.datagen.DatagenConnector"),
//! );
//! config.insert("kafka.topic".to_string(), json!("datagen.users"));
//!
//! let connector = client.connectors().create("datagen-users", &config).await?;
//! println!("Created {} with {} tasks", connector.name, connector.tasks.len());
//!
//! client.connectors().delete("datagen-users").await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Retries
//!
//! All operations go through one shared [`Transport`]. By default a request
//! answered with 409 Conflict (the worker is rebalancing) is retried up to 5
//! times, waiting 500ms and doubling up to 5s. Other failures are returned on
//! the first attempt; see [`RetryCondition`] to widen that.
//!
//! # Errors
//!
//! Any response with status 400 or above becomes [`Error::Api`] carrying the
//! raw status and body. There is no separate not-found variant; use
//! [`Error::is_not_found`].

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod retry;
pub mod transport;
pub mod types;

pub use api::{ClustersApi, ConnectorsApi};
pub use client::{ClientBuilder, ConnectClient};
pub use config::{BasicAuth, RetryConfig, TransportConfig};
pub use error::{Error, ErrorResponse, Result};
pub use retry::{AttemptOutcome, RetryCondition, RetryPolicy, TransportFailure};
pub use transport::Transport;
pub use types::*;

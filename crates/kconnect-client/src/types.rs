//! Request and response types for the Connect REST API.
//!
//! Connector configuration is schema-less from the client's point of view and
//! stays an open map of JSON values.

use std::collections::HashMap;

use serde::{Deserialize, Deserializer, Serialize};

/// Connector configuration: property name to arbitrary JSON value.
pub type ConnectorConfig = HashMap<String, serde_json::Value>;

// ─────────────────────────────────────────────────────────────────────────────
// Connectors
// ─────────────────────────────────────────────────────────────────────────────

/// A connector as returned by the worker.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Connector {
    /// Connector name, unique within the cluster.
    pub name: String,
    /// Connector configuration.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "HashMap::is_empty"
    )]
    pub config: ConnectorConfig,
    /// Tasks currently assigned to the connector.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub tasks: Vec<TaskId>,
}

/// Identifies one task of a connector.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId {
    /// Owning connector.
    pub connector: String,
    /// Task number within the connector.
    pub task: i64,
}

/// Body of a create request.
#[derive(Debug, Serialize)]
pub(crate) struct CreateConnectorRequest<'a> {
    pub name: &'a str,
    #[serde(skip_serializing_if = "is_empty_config")]
    pub config: &'a ConnectorConfig,
}

fn is_empty_config(config: &&ConnectorConfig) -> bool {
    config.is_empty()
}

// ─────────────────────────────────────────────────────────────────────────────
// Cluster
// ─────────────────────────────────────────────────────────────────────────────

/// Worker and cluster information served at the API root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterInfo {
    /// Connect worker version.
    pub version: String,
    /// Git commit of the worker build.
    pub commit: String,
    /// Kafka cluster identifier.
    #[serde(rename = "kafka_cluster_id")]
    pub id: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FULL_CONNECTOR: &str = r#"{
        "name": "somename",
        "config": {
            "someparamone": "somevalone",
            "someparamtwo": "somevaltwo"
        },
        "tasks": [
            { "connector": "somename", "task": 1 },
            { "connector": "somename", "task": 2 }
        ]
    }"#;

    #[test]
    fn test_connector_deserializes() {
        let connector: Connector = serde_json::from_str(FULL_CONNECTOR).unwrap();
        assert_eq!(connector.name, "somename");
        assert_eq!(connector.config.len(), 2);
        assert_eq!(connector.config["someparamone"], "somevalone");
        assert!(connector.config.get("foo").is_none());
        assert_eq!(connector.tasks.len(), 2);
        assert_eq!(connector.tasks[0].task, 1);
        assert_eq!(connector.tasks[1].connector, "somename");
    }

    #[test]
    fn test_connector_tolerates_missing_and_null_fields() {
        let connector: Connector = serde_json::from_str(r#"{"name":"a"}"#).unwrap();
        assert!(connector.config.is_empty());
        assert!(connector.tasks.is_empty());

        let connector: Connector =
            serde_json::from_str(r#"{"name":"a","config":null,"tasks":null}"#).unwrap();
        assert!(connector.config.is_empty());
        assert!(connector.tasks.is_empty());
    }

    #[test]
    fn test_empty_fields_are_omitted_on_the_wire() {
        let connector = Connector {
            name: "a".to_string(),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&connector).unwrap(), json!({"name": "a"}));
    }

    #[test]
    fn test_create_request_shape() {
        let mut config = ConnectorConfig::new();
        config.insert("tasks.max".to_string(), json!("1"));
        config.insert("value.converter.schemas.enable".to_string(), json!(false));

        let request = CreateConnectorRequest {
            name: "datagen",
            config: &config,
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "name": "datagen",
                "config": {"tasks.max": "1", "value.converter.schemas.enable": false}
            })
        );

        let empty = ConnectorConfig::new();
        let request = CreateConnectorRequest {
            name: "bare",
            config: &empty,
        };
        assert_eq!(serde_json::to_value(&request).unwrap(), json!({"name": "bare"}));
    }

    #[test]
    fn test_cluster_info_field_names() {
        let info: ClusterInfo =
            serde_json::from_str(r#"{"version":"v","commit":"c","kafka_cluster_id":"kci"}"#)
                .unwrap();
        assert_eq!(
            info,
            ClusterInfo {
                version: "v".to_string(),
                commit: "c".to_string(),
                id: "kci".to_string(),
            }
        );
    }
}

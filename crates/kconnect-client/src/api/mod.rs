//! API endpoint implementations.

mod clusters;
mod connectors;

pub use clusters::ClustersApi;
pub use connectors::ConnectorsApi;

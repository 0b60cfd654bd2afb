//! Resource and request types for the DigitalOcean v2 API
//!
//! Response types default every field so that fields the API adds or omits do
//! not break decoding. Request types serialize only what the caller set.

use serde::{Deserialize, Deserializer, Serialize};

/// Reads an explicit `null` as the type's default
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Option::unwrap_or_default)
}

/// A region reference embedded in droplets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Region {
    pub slug: String,
    pub name: String,
}

/// An image reference embedded in droplets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub id: u64,
    pub slug: Option<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub distribution: String,
}

/// One network interface address of a droplet
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkV4 {
    pub ip_address: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Networks {
    pub v4: Vec<NetworkV4>,
}

/// A droplet (virtual machine)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Droplet {
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    /// Memory in MiB
    pub memory: u64,
    pub vcpus: u32,
    /// Disk in GiB
    pub disk: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
    pub region: Region,
    pub image: Image,
    #[serde(deserialize_with = "null_as_default")]
    pub size_slug: String,
    pub networks: Networks,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    pub vpc_uuid: Option<String>,
}

impl Droplet {
    /// Returns the first public IPv4 address, if any
    pub fn public_ipv4(&self) -> Option<&str> {
        self.networks
            .v4
            .iter()
            .find(|net| net.kind == "public")
            .map(|net| net.ip_address.as_str())
    }
}

/// A virtual private cloud network
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vpc {
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub urn: String,
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    pub region: String,
    #[serde(deserialize_with = "null_as_default")]
    pub ip_range: String,
    pub default: bool,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterStatus {
    pub state: String,
    pub message: Option<String>,
}

/// A node pool belonging to a Kubernetes cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodePool {
    pub id: String,
    pub name: String,
    pub size: String,
    pub count: u32,
}

/// A managed Kubernetes cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KubernetesCluster {
    pub id: String,
    pub name: String,
    pub region: String,
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub endpoint: String,
    pub status: ClusterStatus,
    #[serde(deserialize_with = "null_as_default")]
    pub node_pools: Vec<NodePool>,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
}

impl KubernetesCluster {
    /// Total node count across all pools
    pub fn node_count(&self) -> u32 {
        self.node_pools.iter().map(|pool| pool.count).sum()
    }
}

/// A managed database cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Database {
    pub id: String,
    pub name: String,
    pub engine: String,
    #[serde(deserialize_with = "null_as_default")]
    pub version: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    pub region: String,
    #[serde(deserialize_with = "null_as_default")]
    pub size: String,
    pub num_nodes: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub created_at: String,
}

/// A DNS zone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Domain {
    pub name: String,
    pub ttl: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub zone_file: String,
}

/// One DNS record of a domain
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainRecord {
    pub id: u64,
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub data: String,
    pub priority: Option<u32>,
    pub port: Option<u32>,
    pub ttl: u32,
    pub weight: Option<u32>,
}

/// Account balance; the API reports amounts as decimal strings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Balance {
    #[serde(deserialize_with = "null_as_default")]
    pub month_to_date_balance: String,
    #[serde(deserialize_with = "null_as_default")]
    pub account_balance: String,
    #[serde(deserialize_with = "null_as_default")]
    pub month_to_date_usage: String,
    #[serde(deserialize_with = "null_as_default")]
    pub generated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropletCreateRequest {
    pub name: String,
    pub region: String,
    pub size: String,
    /// Image slug, e.g. `ubuntu-20-04-x64`
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VpcCreateRequest {
    pub name: String,
    pub region: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodePoolCreateRequest {
    pub name: String,
    pub size: String,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KubernetesClusterCreateRequest {
    pub name: String,
    pub region: String,
    pub version: String,
    pub node_pools: Vec<NodePoolCreateRequest>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatabaseCreateRequest {
    pub name: String,
    pub engine: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    pub size: String,
    pub region: String,
    pub num_nodes: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainCreateRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DomainRecordRequest {
    #[serde(rename = "type")]
    pub record_type: String,
    pub name: String,
    pub data: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
}

//! `docli kubernetes` handlers

use tracing::info;

use super::Context;
use crate::api::{KubernetesCluster, KubernetesClusterCreateRequest, NodePoolCreateRequest};
use crate::cli::KubernetesCommand;
use crate::error::AppError;
use crate::output::{render_list, render_one, Tabular};

/// Name given to the worker pool of new clusters
const DEFAULT_POOL_NAME: &str = "worker-pool";

impl Tabular for KubernetesCluster {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "NAME", "REGION", "VERSION", "STATUS", "NODES"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.region.clone(),
            self.version.clone(),
            self.status.state.clone(),
            self.node_count().to_string(),
        ]
    }
}

pub async fn run(ctx: &Context, command: KubernetesCommand) -> Result<String, AppError> {
    match command {
        KubernetesCommand::List => {
            let clusters = ctx
                .cached("kubernetes:clusters:list", || {
                    ctx.client().list_kubernetes_clusters()
                })
                .await?;
            Ok(render_list(&clusters, ctx.format())?)
        }
        KubernetesCommand::Create {
            name,
            region,
            version,
            nodes,
            node_size,
        } => {
            let request = KubernetesClusterCreateRequest {
                name,
                region,
                version,
                node_pools: vec![NodePoolCreateRequest {
                    name: DEFAULT_POOL_NAME.to_string(),
                    size: node_size,
                    count: nodes,
                }],
            };
            let cluster = ctx.client().create_kubernetes_cluster(&request).await?;
            info!(id = %cluster.id, name = %cluster.name, "Kubernetes cluster created");
            Ok(render_one(&cluster, ctx.format())?)
        }
        KubernetesCommand::Delete { cluster_id } => {
            ctx.client().delete_kubernetes_cluster(&cluster_id).await?;
            info!(id = %cluster_id, "Kubernetes cluster deleted");
            Ok(format!("Kubernetes cluster {} deleted\n", cluster_id))
        }
    }
}

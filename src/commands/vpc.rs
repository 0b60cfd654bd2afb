//! `docli vpc` handlers

use tracing::info;

use super::Context;
use crate::api::{Vpc, VpcCreateRequest};
use crate::cli::VpcCommand;
use crate::error::AppError;
use crate::output::{render_list, render_one, Tabular};

impl Tabular for Vpc {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "NAME", "REGION", "IP RANGE", "DEFAULT"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.region.clone(),
            self.ip_range.clone(),
            self.default.to_string(),
        ]
    }
}

pub async fn run(ctx: &Context, command: VpcCommand) -> Result<String, AppError> {
    match command {
        VpcCommand::List => {
            let vpcs = ctx
                .cached("vpcs:list", || ctx.client().list_vpcs())
                .await?;
            Ok(render_list(&vpcs, ctx.format())?)
        }
        VpcCommand::Create {
            name,
            region,
            ip_range,
            description,
        } => {
            let request = VpcCreateRequest {
                name,
                region,
                ip_range,
                description: Some(description).filter(|d| !d.is_empty()),
            };
            let vpc = ctx.client().create_vpc(&request).await?;
            info!(id = %vpc.id, name = %vpc.name, "VPC created");
            Ok(render_one(&vpc, ctx.format())?)
        }
        VpcCommand::Delete { vpc_id } => {
            ctx.client().delete_vpc(&vpc_id).await?;
            info!(id = %vpc_id, "VPC deleted");
            Ok(format!("VPC {} deleted\n", vpc_id))
        }
    }
}

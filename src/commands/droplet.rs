//! `docli droplet` handlers

use tracing::info;

use super::Context;
use crate::api::{Droplet, DropletCreateRequest};
use crate::cli::DropletCommand;
use crate::error::AppError;
use crate::output::{render_list, render_one, Tabular};

impl Tabular for Droplet {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "NAME", "STATUS", "REGION", "SIZE", "PUBLIC IPV4"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.name.clone(),
            self.status.clone(),
            self.region.slug.clone(),
            self.size_slug.clone(),
            self.public_ipv4().unwrap_or("-").to_string(),
        ]
    }
}

pub async fn run(ctx: &Context, command: DropletCommand) -> Result<String, AppError> {
    match command {
        DropletCommand::List => {
            let droplets = ctx
                .cached("droplets:list", || ctx.client().list_droplets())
                .await?;
            Ok(render_list(&droplets, ctx.format())?)
        }
        DropletCommand::Create {
            name,
            region,
            size,
            image,
        } => {
            let request = DropletCreateRequest {
                name,
                region,
                size,
                image,
            };
            let droplet = ctx.client().create_droplet(&request).await?;
            info!(id = droplet.id, name = %droplet.name, "Droplet created");
            Ok(render_one(&droplet, ctx.format())?)
        }
        DropletCommand::Delete { droplet_id } => {
            ctx.client().delete_droplet(droplet_id).await?;
            info!(id = droplet_id, "Droplet deleted");
            Ok(format!("Droplet {} deleted\n", droplet_id))
        }
    }
}

//! `docli database` handlers

use tracing::info;

use super::Context;
use crate::api::{Database, DatabaseCreateRequest};
use crate::cli::DatabaseCommand;
use crate::error::AppError;
use crate::output::{render_list, render_one, Tabular};

impl Tabular for Database {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "NAME", "ENGINE", "VERSION", "STATUS", "REGION", "NODES"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            self.engine.clone(),
            self.version.clone(),
            self.status.clone(),
            self.region.clone(),
            self.num_nodes.to_string(),
        ]
    }
}

pub async fn run(ctx: &Context, command: DatabaseCommand) -> Result<String, AppError> {
    match command {
        DatabaseCommand::List => {
            let databases = ctx
                .cached("databases:list", || ctx.client().list_databases())
                .await?;
            Ok(render_list(&databases, ctx.format())?)
        }
        DatabaseCommand::Create {
            name,
            engine,
            region,
            version,
            size,
            nodes,
        } => {
            let request = DatabaseCreateRequest {
                name,
                engine,
                version,
                size,
                region,
                num_nodes: nodes,
            };
            let database = ctx.client().create_database(&request).await?;
            info!(id = %database.id, name = %database.name, "Database created");
            Ok(render_one(&database, ctx.format())?)
        }
        DatabaseCommand::Delete { database_id } => {
            ctx.client().delete_database(&database_id).await?;
            info!(id = %database_id, "Database deleted");
            Ok(format!("Database {} deleted\n", database_id))
        }
    }
}

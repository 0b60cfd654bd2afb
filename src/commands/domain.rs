//! `docli domain` handlers

use tracing::info;

use super::Context;
use crate::api::{Domain, DomainCreateRequest, DomainRecord, DomainRecordRequest};
use crate::cli::DomainCommand;
use crate::error::AppError;
use crate::output::{render_list, render_one, Tabular};

impl Tabular for Domain {
    fn headers() -> Vec<&'static str> {
        vec!["NAME", "TTL"]
    }

    fn row(&self) -> Vec<String> {
        vec![self.name.clone(), self.ttl.to_string()]
    }
}

impl Tabular for DomainRecord {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "TYPE", "NAME", "DATA", "PRIORITY", "TTL"]
    }

    fn row(&self) -> Vec<String> {
        vec![
            self.id.to_string(),
            self.record_type.clone(),
            self.name.clone(),
            self.data.clone(),
            self.priority
                .map_or_else(|| "-".to_string(), |p| p.to_string()),
            self.ttl.to_string(),
        ]
    }
}

/// Cache resource name for the records of one domain
fn records_resource(domain: &str) -> String {
    format!("domains:{}:records", domain.to_ascii_lowercase())
}

pub async fn run(ctx: &Context, command: DomainCommand) -> Result<String, AppError> {
    match command {
        DomainCommand::List => {
            let domains = ctx
                .cached("domains:list", || ctx.client().list_domains())
                .await?;
            Ok(render_list(&domains, ctx.format())?)
        }
        DomainCommand::Create { name, ip_address } => {
            let request = DomainCreateRequest { name, ip_address };
            let domain = ctx.client().create_domain(&request).await?;
            info!(name = %domain.name, "Domain created");
            Ok(render_one(&domain, ctx.format())?)
        }
        DomainCommand::Delete { domain_name } => {
            ctx.client().delete_domain(&domain_name).await?;
            info!(name = %domain_name, "Domain deleted");
            Ok(format!("Domain {} deleted\n", domain_name))
        }
        DomainCommand::ListRecords { domain_name } => {
            let records = ctx
                .cached(&records_resource(&domain_name), || {
                    ctx.client().list_domain_records(&domain_name)
                })
                .await?;
            Ok(render_list(&records, ctx.format())?)
        }
        DomainCommand::CreateRecord {
            domain_name,
            record_type,
            name,
            data,
            priority,
            ttl,
        } => {
            let request = DomainRecordRequest {
                record_type,
                name,
                data,
                priority,
                ttl,
            };
            let record = ctx
                .client()
                .create_domain_record(&domain_name, &request)
                .await?;
            info!(domain = %domain_name, id = record.id, "Domain record created");
            Ok(render_one(&record, ctx.format())?)
        }
        DomainCommand::DeleteRecord {
            domain_name,
            record_id,
        } => {
            ctx.client()
                .delete_domain_record(&domain_name, record_id)
                .await?;
            info!(domain = %domain_name, id = record_id, "Domain record deleted");
            Ok(format!(
                "Record {} deleted from domain {}\n",
                record_id, domain_name
            ))
        }
    }
}

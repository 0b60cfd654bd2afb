//! Command-line interface parsing for docli
//!
//! Global options control authentication, output and caching; each resource
//! type gets its own subcommand group.

use std::path::PathBuf;

use clap::builder::NonEmptyStringValueParser;
use clap::{ArgAction, Parser, Subcommand};

use crate::api::DIGITALOCEAN_API_BASE;
use crate::output::OutputFormat;

/// docli - Manage DigitalOcean resources from the command line
#[derive(Parser, Debug)]
#[command(name = "docli")]
#[command(about = "Manage DigitalOcean droplets, VPCs, Kubernetes clusters, databases, domains and billing")]
#[command(version)]
pub struct Cli {
    /// API token
    #[arg(long, env = "DO_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// API base URL
    #[arg(long, env = "DOCLI_API_URL", global = true, default_value = DIGITALOCEAN_API_BASE)]
    pub api_url: String,

    /// Output format
    #[arg(short, long, value_enum, global = true, default_value_t = OutputFormat::Table)]
    pub output: OutputFormat,

    /// Directory for cached API responses
    #[arg(long, env = "DOCLI_CACHE_DIR", global = true, value_name = "DIR")]
    pub cache_dir: Option<PathBuf>,

    /// How long cached list results stay fresh
    #[arg(
        long,
        env = "DOCLI_CACHE_TTL",
        global = true,
        value_name = "SECONDS",
        default_value_t = 300
    )]
    pub cache_ttl: u64,

    /// Neither read nor write the response cache
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Ignore cached results but store the fresh ones
    #[arg(long, global = true, conflicts_with = "no_cache")]
    pub refresh: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Manage droplets
    #[command(subcommand)]
    Droplet(DropletCommand),

    /// Manage VPCs
    #[command(subcommand)]
    Vpc(VpcCommand),

    /// Manage Kubernetes clusters
    #[command(subcommand)]
    Kubernetes(KubernetesCommand),

    /// Manage managed databases
    #[command(subcommand)]
    Database(DatabaseCommand),

    /// Manage domains and DNS records
    #[command(subcommand)]
    Domain(DomainCommand),

    /// Show billing information
    Billing,
}

#[derive(Subcommand, Debug)]
pub enum DropletCommand {
    /// List all droplets
    List,

    /// Create a new droplet
    Create {
        /// Droplet name
        #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
        name: String,

        /// Droplet region
        #[arg(short, long, default_value = "nyc1")]
        region: String,

        /// Droplet size
        #[arg(short, long, default_value = "s-1vcpu-1gb")]
        size: String,

        /// Droplet image
        #[arg(short, long, default_value = "ubuntu-20-04-x64")]
        image: String,
    },

    /// Delete a droplet
    Delete {
        /// Droplet ID
        droplet_id: u64,
    },
}

#[derive(Subcommand, Debug)]
pub enum VpcCommand {
    /// List all VPCs
    List,

    /// Create a new VPC
    Create {
        /// VPC name
        #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
        name: String,

        /// VPC region
        #[arg(short, long, value_parser = NonEmptyStringValueParser::new())]
        region: String,

        /// VPC IP range in CIDR notation
        #[arg(short, long)]
        ip_range: Option<String>,

        /// Free-form description
        #[arg(long, default_value = "Created via docli")]
        description: String,
    },

    /// Delete a VPC
    Delete {
        /// VPC ID
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        vpc_id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum KubernetesCommand {
    /// List all Kubernetes clusters
    List,

    /// Create a new Kubernetes cluster
    Create {
        /// Name of the Kubernetes cluster
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        name: String,

        /// Region for the Kubernetes cluster
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        region: String,

        /// Kubernetes version slug
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        version: String,

        /// Number of nodes in the worker pool
        #[arg(long, default_value_t = 3)]
        nodes: u32,

        /// Droplet size of each worker node
        #[arg(long, default_value = "s-2vcpu-2gb")]
        node_size: String,
    },

    /// Delete a Kubernetes cluster
    Delete {
        /// Cluster ID
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        cluster_id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum DatabaseCommand {
    /// List all managed databases
    List,

    /// Create a new managed database
    Create {
        /// Database cluster name
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        name: String,

        /// Database engine (e.g., pg, mysql)
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        engine: String,

        /// Database region
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        region: String,

        /// Engine version
        #[arg(long)]
        version: Option<String>,

        /// Database size
        #[arg(long, default_value = "db-s-1vcpu-1gb")]
        size: String,

        /// Number of nodes
        #[arg(long, default_value_t = 1)]
        nodes: u32,
    },

    /// Delete a managed database
    Delete {
        /// Database cluster ID
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        database_id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum DomainCommand {
    /// List all domains
    List,

    /// Create a new domain
    Create {
        /// Domain name
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        name: String,

        /// Create an A record for the apex pointing at this address
        #[arg(long)]
        ip_address: Option<String>,
    },

    /// Delete a domain
    Delete {
        /// Domain name
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        domain_name: String,
    },

    /// List all DNS records for a domain
    ListRecords {
        /// Domain name
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        domain_name: String,
    },

    /// Create a new DNS record
    CreateRecord {
        /// Domain name
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        domain_name: String,

        /// Record type (e.g., A, CNAME, MX)
        #[arg(long = "type", value_name = "TYPE", value_parser = NonEmptyStringValueParser::new())]
        record_type: String,

        /// Record name
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        name: String,

        /// Record data
        #[arg(long, value_parser = NonEmptyStringValueParser::new())]
        data: String,

        /// Record priority (MX and SRV records)
        #[arg(long)]
        priority: Option<u32>,

        /// Record TTL in seconds
        #[arg(long)]
        ttl: Option<u32>,
    },

    /// Delete a DNS record
    DeleteRecord {
        /// Domain name
        #[arg(value_parser = NonEmptyStringValueParser::new())]
        domain_name: String,

        /// Record ID
        record_id: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_droplet_list_defaults() {
        let cli = Cli::parse_from(["docli", "droplet", "list"]);

        assert!(matches!(cli.command, Command::Droplet(DropletCommand::List)));
        assert_eq!(cli.output, OutputFormat::Table);
        assert!(!cli.no_cache);
        assert!(!cli.refresh);
        assert_eq!(cli.verbose, 0);
    }

    #[test]
    fn test_parse_droplet_create_defaults() {
        let cli = Cli::parse_from(["docli", "droplet", "create", "--name", "web-1"]);

        match cli.command {
            Command::Droplet(DropletCommand::Create {
                name,
                region,
                size,
                image,
            }) => {
                assert_eq!(name, "web-1");
                assert_eq!(region, "nyc1");
                assert_eq!(size, "s-1vcpu-1gb");
                assert_eq!(image, "ubuntu-20-04-x64");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_droplet_create_requires_name() {
        let result = Cli::try_parse_from(["docli", "droplet", "create"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_droplet_delete_requires_numeric_id() {
        assert!(Cli::try_parse_from(["docli", "droplet", "delete", "abc"]).is_err());

        let cli = Cli::parse_from(["docli", "droplet", "delete", "42"]);
        assert!(matches!(
            cli.command,
            Command::Droplet(DropletCommand::Delete { droplet_id: 42 })
        ));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["docli", "vpc", "list", "-o", "yaml", "--refresh", "-vv"]);

        assert_eq!(cli.output, OutputFormat::Yaml);
        assert!(cli.refresh);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_refresh_conflicts_with_no_cache() {
        let result = Cli::try_parse_from(["docli", "billing", "--refresh", "--no-cache"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_create_record_uses_type_flag() {
        let cli = Cli::parse_from([
            "docli",
            "domain",
            "create-record",
            "example.com",
            "--type",
            "MX",
            "--name",
            "@",
            "--data",
            "mail.example.com.",
            "--priority",
            "10",
        ]);

        match cli.command {
            Command::Domain(DomainCommand::CreateRecord {
                domain_name,
                record_type,
                priority,
                ttl,
                ..
            }) => {
                assert_eq!(domain_name, "example.com");
                assert_eq!(record_type, "MX");
                assert_eq!(priority, Some(10));
                assert!(ttl.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_empty_identifiers_are_rejected() {
        assert!(Cli::try_parse_from(["docli", "vpc", "delete", ""]).is_err());
        assert!(Cli::try_parse_from(["docli", "domain", "list-records", ""]).is_err());
    }

    #[test]
    fn test_kubernetes_create_node_defaults() {
        let cli = Cli::parse_from([
            "docli",
            "kubernetes",
            "create",
            "--name",
            "k8s-1",
            "--region",
            "nyc1",
            "--version",
            "1.29.1-do.0",
        ]);

        match cli.command {
            Command::Kubernetes(KubernetesCommand::Create {
                nodes, node_size, ..
            }) => {
                assert_eq!(nodes, 3);
                assert_eq!(node_size, "s-2vcpu-2gb");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}

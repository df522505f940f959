//! Promote command handler.

use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use colored::Colorize;
use tracing::info;

use crate::config::PromotionConfig;
use crate::pipeline::PromotionPipeline;
use crate::publisher::{CommitAuthor, GitPublisher};
use crate::registry::HttpRegistry;
use crate::storage::HttpObjectStore;

/// Arguments for `promover promote`
#[derive(Debug, Args)]
pub struct PromoteArgs {
    /// Experiment whose latest run is promoted
    #[arg(long)]
    pub experiment: String,

    /// Model name (storage path becomes models/<model>/<run_id>)
    #[arg(long)]
    pub model: String,

    /// Destination object storage bucket
    #[arg(long, env = "S3_BUCKET_NAME")]
    pub bucket: String,

    /// Tracking server base URL
    #[arg(long, env = "MLFLOW_TRACKING_URI", default_value = "http://127.0.0.1:5000")]
    pub registry_url: String,

    /// Bearer token for the tracking server
    #[arg(long, env = "MLFLOW_TRACKING_TOKEN")]
    pub registry_token: Option<String>,

    /// Object storage endpoint URL
    #[arg(long, env = "S3_ENDPOINT_URL", default_value = "http://127.0.0.1:9000")]
    pub storage_url: String,

    /// Bearer token for object storage
    #[arg(long, env = "S3_ACCESS_TOKEN")]
    pub storage_token: Option<String>,

    /// GitOps configuration repository URL
    #[arg(long, env = "GITOPS_REPO_URL")]
    pub repo: String,

    /// Access token for the GitOps repository
    #[arg(long, env = "GITOPS_PAT")]
    pub token: Option<String>,

    /// Manifest path inside the repository (default: <model>-deployment.yaml)
    #[arg(long)]
    pub manifest: Option<String>,

    /// Predictor framework key in the manifest
    #[arg(long, default_value = "sklearn")]
    pub framework: String,

    /// Commit author name for promotion commits
    #[arg(long, default_value = "github-actions")]
    pub author_name: String,

    /// Commit author email for promotion commits
    #[arg(long, default_value = "github-actions@github.com")]
    pub author_email: String,

    /// Timeout in seconds for each external call
    #[arg(long, default_value_t = 60)]
    pub timeout: u64,

    /// Resolve the latest run and stop without staging or publishing
    #[arg(long)]
    pub dry_run: bool,
}

pub fn cmd_promote(args: PromoteArgs) -> anyhow::Result<()> {
    println!("{}", "Promote Model".bright_cyan().bold());
    println!("Experiment: {}", args.experiment.cyan());
    println!("Model:      {}", args.model.cyan());
    println!("Bucket:     {}", args.bucket.cyan());
    println!();

    let timeout = Duration::from_secs(args.timeout);

    let mut registry = HttpRegistry::with_timeout(&args.registry_url, timeout)?;
    if let Some(token) = &args.registry_token {
        registry = registry.with_token(token);
    }

    let mut store = HttpObjectStore::with_timeout(&args.storage_url, timeout)?;
    if let Some(token) = &args.storage_token {
        store = store.with_token(token);
    }

    let mut publisher = GitPublisher::new(&args.repo)
        .with_author(CommitAuthor {
            name: args.author_name.clone(),
            email: args.author_email.clone(),
        })
        .with_timeout(timeout);
    if let Some(token) = &args.token {
        publisher = publisher.with_token(token);
    }

    let mut config = PromotionConfig::new(&args.experiment, &args.model, &args.bucket)
        .with_framework(&args.framework);
    if let Some(manifest) = &args.manifest {
        config = config.with_manifest_path(manifest);
    }

    let pipeline = PromotionPipeline::new(
        Arc::new(registry),
        Arc::new(store),
        Arc::new(publisher),
        config,
    );

    if args.dry_run {
        let run = pipeline.resolve()?;
        println!("{}", "Dry run - nothing staged or published".yellow());
        println!("Would promote run: {}", run.run_id.cyan());
        println!("Run started:       {}", run.start_time);
        return Ok(());
    }

    info!(experiment = %args.experiment, "running promotion pipeline");
    let result = pipeline.run()?;

    println!("{}", "Promotion complete".bright_green().bold());
    println!("Run ID:   {}", result.run_id.cyan());
    println!("Storage:  {}", result.storage_location.uri().cyan());
    println!("Commit:   {}", result.commit_id.to_string().cyan());
    Ok(())
}

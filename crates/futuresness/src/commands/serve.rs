//! Serve command: run the MCP server on stdio.

use anyhow::Context;
use camino::Utf8PathBuf;
use clap::Args;
use rmcp::ServiceExt;
use tracing::{info, instrument};

use futuresness_core::config::Config;

use crate::server::FuturesServer;

/// Arguments for the `serve` subcommand.
#[derive(Args, Debug, Default)]
pub struct ServeArgs {
    /// Vocabulary file replacing the configured one.
    #[arg(long, value_name = "FILE")]
    pub vocabulary: Option<Utf8PathBuf>,
}

/// Serve MCP requests on stdin/stdout until the client disconnects.
#[instrument(name = "cmd_serve", skip_all)]
pub async fn cmd_serve(args: ServeArgs, config: Config) -> anyhow::Result<()> {
    let analyzer = super::load_analyzer(args.vocabulary.as_deref(), &config)?;
    let server = FuturesServer::new(analyzer, &config);

    info!("starting MCP server on stdio");
    let service = server
        .serve(rmcp::transport::stdio())
        .await
        .context("failed to start MCP server")?;
    service.waiting().await.context("MCP server failed")?;
    info!("MCP server stopped");
    Ok(())
}

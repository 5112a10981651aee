//! One-shot terminal front end: ask a question, or sync a repository first.

use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use diesel::PgConnection;
use projects_analytics::{
    agents::{code_writer::CodeWriter, executor::ExecutionLimits},
    config::AppConfig,
    context::AppContext,
    db::{ensure_tables, run_blocking, EnsureTablesError, RunBlockingError},
    endpoints::github::repo_data::sync::index::{is_valid_segment, sync_repo_data},
    pipeline::answer_question,
};

#[derive(Debug, Parser)]
#[command(name = "ask", about = "Ask a question about synced GitHub repository data")]
struct Cli {
    /// Natural-language question
    #[arg(required_unless_present = "sync")]
    question: Option<String>,

    /// Write the chart (if any) to this SVG file
    #[arg(long)]
    chart: Option<PathBuf>,

    /// Fetch recent data for owner/name before answering
    #[arg(long, value_name = "OWNER/NAME")]
    sync: Option<String>,
}

#[derive(Debug, thiserror::Error)]
enum PrepareError {
    #[error(transparent)]
    EnsureTables(#[from] EnsureTablesError),
    #[error(transparent)]
    RunBlocking(#[from] RunBlockingError),
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let config = AppConfig::from_env().context("loading configuration")?;
    utils_trace::init(&config.log_level).context("initialising tracing")?;

    let ctx = AppContext::new(config);
    run_blocking(&ctx.pool, |conn: &mut PgConnection| {
        Ok::<_, PrepareError>(ensure_tables(conn)?)
    })
    .await
    .context("creating tables")?;

    if let Some(repository) = &cli.sync {
        let (owner, name) = repository
            .split_once('/')
            .filter(|(owner, name)| is_valid_segment(owner) && is_valid_segment(name))
            .ok_or_else(|| anyhow!("--sync expects OWNER/NAME, got `{repository}`"))?;
        let token = ctx
            .config
            .github_token
            .as_deref()
            .context("GITHUB_TOKEN not found in environment variables")?;

        let report = sync_repo_data(
            &ctx.github,
            &ctx.pool,
            token,
            owner,
            name,
            ctx.config.sync_since_days,
            ctx.config.github_max_pages,
        )
        .await
        .with_context(|| format!("syncing {repository}"))?;
        println!("{}", serde_json::to_string_pretty(&report)?);
    }

    let Some(question) = cli.question else {
        return Ok(());
    };
    if question.trim().is_empty() {
        bail!("question is empty");
    }

    let writer = CodeWriter::from_config(&ctx.config)?;
    let limits = ExecutionLimits::from(ctx.config.as_ref());
    let outcome = answer_question(&ctx.pool, &writer, limits, &question).await?;

    println!("Table: {} ({})", outcome.table, outcome.summary);
    println!("\nGenerated SQL:\n{}\n", outcome.code);
    println!("{}", outcome.output);

    match (cli.chart, outcome.chart_svg) {
        (Some(path), Some(svg)) => {
            std::fs::write(&path, svg).with_context(|| format!("writing {}", path.display()))?;
            println!("\nChart written to {}", path.display());
        }
        (Some(_), None) => println!("\nResult is not chartable; no chart written."),
        _ => {}
    }

    Ok(())
}

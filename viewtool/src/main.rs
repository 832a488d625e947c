use std::{path::PathBuf, process::ExitCode};

use clap::{Parser, Subcommand};
use colored::Colorize;
use log::LevelFilter;
use serde::Serialize;
use viewtool::{commands, ctx::AppContext};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Workspace directory; defaults to the current directory.
    #[arg(short, long)]
    workspace: Option<PathBuf>,
    /// Engine configuration file; defaults to `viewmap.toml` in the workspace.
    #[arg(short, long)]
    config: Option<String>,
    #[command(subcommand)]
    command: SubCommands,
}

#[derive(Subcommand, Debug)]
enum SubCommands {
    /// Validate a view configuration.
    Lint {
        view: String,
        /// Fail on warnings too.
        #[arg(long)]
        deny_warnings: bool,
    },
    /// Print a view with its language placeholder substituted.
    Substitute {
        view: String,
        #[arg(long)]
        domain: String,
        /// Language code; defaults to the configured language.
        #[arg(long)]
        lang: Option<String>,
    },
    /// Print a view enhanced with schema metadata.
    Enhance {
        view: String,
        /// Resolved OpenAPI document.
        #[arg(long)]
        schema: String,
        #[arg(long)]
        domain: String,
        /// Collection path of the dataset, e.g. `/persons`.
        #[arg(long)]
        dataset: String,
    },
    /// Print the render props of one field for a record.
    Build {
        view: String,
        #[arg(long)]
        record: String,
        /// Title of the property to build.
        #[arg(long)]
        field: String,
    },
    /// Write the JSON schema of the engine configuration.
    ConfigSchema,
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::builder()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {e:?}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let workspace = match cli.workspace {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };
    let ctx = AppContext::new(workspace, cli.config.as_deref())?;

    match cli.command {
        SubCommands::Lint {
            view,
            deny_warnings,
        } => {
            let report = commands::lint(&ctx, &ctx.resolve_path(&view)).await?;
            report.print();
            if report.is_failure(deny_warnings) {
                return Ok(ExitCode::FAILURE);
            }
        }
        SubCommands::Substitute { view, domain, lang } => {
            let view =
                commands::substitute(&ctx, &ctx.resolve_path(&view), &domain, lang.as_deref())
                    .await?;
            print_json(&view)?;
        }
        SubCommands::Enhance {
            view,
            schema,
            domain,
            dataset,
        } => {
            let view = commands::enhance(
                &ctx,
                &ctx.resolve_path(&view),
                &ctx.resolve_path(&schema),
                &domain,
                &dataset,
            )
            .await?;
            print_json(&view)?;
        }
        SubCommands::Build {
            view,
            record,
            field,
        } => {
            let props = commands::build(
                &ctx,
                &ctx.resolve_path(&view),
                &ctx.resolve_path(&record),
                &field,
            )
            .await?;
            print_json(&props)?;
        }
        SubCommands::ConfigSchema => {
            let path = commands::config_schema(&ctx).await?;
            println!("{}", format!("Schema written to {}", path.display()).green());
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

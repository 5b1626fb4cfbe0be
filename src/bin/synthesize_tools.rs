//! synthesize-tools: 从工具清单生成工具定义 JSON 的命令行工具
//!
//! Usage:
//!   synthesize-tools <manifest> [--config <path>] [--compact]
//!
//! Prints the `tools` array a request would carry for the tools declared in
//! the manifest (YAML or JSON).

use ai_lib_tools::toolset::ToolManifest;
use ai_lib_tools::ToolsConfig;
use anyhow::{bail, Context};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut manifest_path = None;
    let mut config_path = None;
    let mut compact = false;

    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" => {
                let path = iter.next().context("--config requires a path")?;
                config_path = Some(path.clone());
            }
            "--compact" => compact = true,
            "help" | "--help" | "-h" => {
                print_usage();
                return Ok(());
            }
            "version" | "--version" | "-V" => {
                println!("synthesize-tools {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            other if other.starts_with('-') => bail!("unknown option: {other}"),
            other => {
                if manifest_path.replace(other.to_string()).is_some() {
                    bail!("only one manifest may be given");
                }
            }
        }
    }

    let Some(manifest_path) = manifest_path else {
        print_usage();
        std::process::exit(1);
    };

    let config = match config_path {
        Some(path) => ToolsConfig::from_file(&path)
            .with_context(|| format!("failed to load config {path}"))?,
        None => ToolsConfig::default(),
    }
    .with_env_overrides()?;

    let manifest = ToolManifest::from_file(&manifest_path)
        .with_context(|| format!("failed to load manifest {manifest_path}"))?;
    let toolset = manifest
        .into_toolset(config)
        .context("failed to describe tools")?;
    tracing::info!(tools = toolset.len(), "synthesized tool definitions");

    let tools = toolset.definitions_json();
    let out = if compact {
        serde_json::to_string(&tools)?
    } else {
        serde_json::to_string_pretty(&tools)?
    };
    println!("{out}");
    Ok(())
}

fn print_usage() {
    println!(
        r#"synthesize-tools: 工具定义生成

USAGE:
    synthesize-tools <MANIFEST> [OPTIONS]

OPTIONS:
    --config <path>             Tools config (YAML or JSON)
    --compact                   Print single-line JSON
    --version                   Show version information
    --help                      Show this help message

ENVIRONMENT:
    AI_LIB_TOOLS_MAX_SCHEMA_DEPTH   Override schema.max_depth
    AI_LIB_TOOLS_MAX_CONCURRENCY    Override max_concurrency
    RUST_LOG                        Log filter (default: warn)"#
    );
}

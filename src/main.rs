//! Docweave CLI
//!
//! Usage:
//!   docweave [OPTIONS] <TEMPLATE_ID>
//!
//! Options:
//!   -n, --namespace <NS>       Tenant namespace (defaults to common-templates)
//!   -t, --templates-dir <DIR>  Root directory of the template store
//!   -c, --config <FILE>        Engine configuration (TOML)
//!   -d, --data <FILE>          Runtime data as JSON (reads stdin if "-")
//!   -o, --output <FORMAT>      Output format: yaml or json
//!       --warm                 Warm configured templates before resolving

use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, ValueEnum};

use docweave::config::EngineConfig;
use docweave::namespace::COMMON_NAMESPACE;
use docweave::store::{BundledStore, ChainStore, DirStore};
use docweave::warm::warm_caches;
use docweave::{RuntimeData, TemplateResolver};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Yaml,
    Json,
}

#[derive(Parser)]
#[command(name = "docweave")]
#[command(about = "Multi-tenant document template resolution")]
struct Cli {
    /// Template id relative to {namespace}/templates/
    template_id: String,

    /// Tenant namespace
    #[arg(short, long, default_value = COMMON_NAMESPACE)]
    namespace: String,

    /// Root directory of the template store
    #[arg(short, long)]
    templates_dir: Option<PathBuf>,

    /// Engine configuration file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Runtime data as a JSON object ("-" reads stdin)
    #[arg(short, long)]
    data: Option<String>,

    /// Output format for the resolved template
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Yaml)]
    output: OutputFormat,

    /// Warm configured preload templates before resolving
    #[arg(long)]
    warm: bool,

    /// Verbose logging (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "docweave=warn",
        1 => "docweave=info",
        _ => "docweave=debug",
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .try_init();

    let mut config = match &cli.config {
        Some(path) => match EngineConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => EngineConfig::default(),
    };
    if let Some(dir) = &cli.templates_dir {
        config = config.with_templates_dir(dir);
    }

    let mut chain = ChainStore::new().with_backend(Arc::new(BundledStore::new()));
    if let Some(dir) = &config.templates_dir {
        chain = chain.with_backend(Arc::new(DirStore::new(dir)));
    }

    let resolver = TemplateResolver::with_cache_config(Arc::new(chain), config.cache_config());

    if cli.warm {
        warm_caches(&resolver, &config.preload);
    }

    let data = match read_runtime_data(&cli.data) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Error reading runtime data: {e}");
            return ExitCode::FAILURE;
        }
    };

    let resolved = match resolver.resolve(&cli.namespace, &cli.template_id, &data) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let rendered = match cli.output {
        OutputFormat::Yaml => serde_yaml::to_string(&resolved)
            .unwrap_or_else(|e| format!("serialization error: {e}")),
        OutputFormat::Json => serde_json::to_string_pretty(&resolved)
            .unwrap_or_else(|e| format!("serialization error: {e}")),
    };
    println!("{rendered}");

    ExitCode::SUCCESS
}

/// Read runtime data from a file, stdin ("-"), or default to empty
fn read_runtime_data(source: &Option<String>) -> Result<RuntimeData, String> {
    let content = match source.as_deref() {
        None => return Ok(RuntimeData::new()),
        Some("-") => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| e.to_string())?;
            buffer
        }
        Some(path) => std::fs::read_to_string(path).map_err(|e| e.to_string())?,
    };

    serde_json::from_str(&content).map_err(|e| format!("invalid JSON object: {e}"))
}

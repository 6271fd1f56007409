use anyhow::{bail, Context};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tilekit::settings::default_config_path;
use tilekit::{build_layout, init_logging, report, Config, LayoutError, LayoutRequest};

#[derive(Debug, Parser)]
#[command(
    name = "tilekit",
    about = "Plan a tile layout and print its summary as JSON",
    version
)]
struct Cli {
    /// Layout request (.json or .toml)
    #[arg(required_unless_present = "list_patterns")]
    request: Option<PathBuf>,

    /// Engine configuration file; the platform default is used when omitted
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the registered pattern ids and exit
    #[arg(long)]
    list_patterns: bool,

    /// Language for pattern names
    #[arg(long, default_value = "en")]
    locale: String,
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    match path {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => {
            let path = default_config_path()?;
            Config::load_or_default(&path)
                .with_context(|| format!("failed to load config {}", path.display()))
        }
    }
}

fn load_request(path: &Path) -> anyhow::Result<LayoutRequest> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let request = match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => serde_json::from_str(&content)
            .with_context(|| format!("invalid JSON request {}", path.display()))?,
        Some("toml") => toml::from_str(&content)
            .with_context(|| format!("invalid TOML request {}", path.display()))?,
        _ => bail!("unsupported request format: {}", path.display()),
    };
    Ok(request)
}

fn list_patterns(locale: &str) {
    for pattern in tilekit::PatternRegistry::new().list() {
        println!("{:<28} {}", pattern.id, pattern.names.for_locale(locale));
    }
}

fn main() -> anyhow::Result<ExitCode> {
    init_logging()?;
    let cli = Cli::parse();

    if cli.list_patterns {
        list_patterns(&cli.locale);
        return Ok(ExitCode::SUCCESS);
    }
    let Some(request_path) = cli.request.as_deref() else {
        bail!("no request file given");
    };

    let config = load_config(cli.config.as_deref())?;
    let request = load_request(request_path)?;
    tracing::debug!("TileKit {} ({})", tilekit::VERSION, tilekit::BUILD_DATE);

    match build_layout(&request, &config) {
        Ok(layout) => {
            let json = serde_json::to_string_pretty(&report(&layout))?;
            println!("{json}");
            Ok(ExitCode::SUCCESS)
        }
        Err(LayoutError::Validation(errors)) => {
            for error in errors.iter() {
                eprintln!("{}: {} ({})", error.field, error.message, error.code.as_str());
            }
            Ok(ExitCode::from(2))
        }
        Err(err) => Err(err).context("layout generation failed"),
    }
}

use crate::{
    capture::{self, DirectorySource, ImageSource},
    config::Config,
    credentials::Credentials,
    pages::PageInventory,
    pipeline::{ExitStatus, Pipeline},
    report::{render_summary, RunReport},
    resolver::ProviderResolver,
    util::{ensure_dir, now_rfc3339},
    verdict,
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

#[derive(Parser, Debug)]
#[command(name = "visual-verdict")]
#[command(about = "AI vision pass/fail judge for rendered page screenshots")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./visual-verdict.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Show the provider plan and routes without calling any backend.
    Doctor {},
    /// Capture every configured route, then judge each screenshot.
    Run {},
    /// Judge screenshots captured earlier (`<slug>.png` per route).
    Evaluate {
        #[arg(long)]
        dir: PathBuf,
    },
    /// Parse a saved model response (`-` for stdin) and print the verdict.
    Parse {
        #[arg(long)]
        input: PathBuf,
    },
}

pub fn dispatch(args: Args) -> Result<ExitStatus> {
    let cfg = match resolve_config_path(args.config.as_deref()) {
        Some(path) => match Config::load(&path) {
            Ok(cfg) => cfg,
            Err(err) => {
                // Default logging so the caller can still report the failure.
                let _guard = init_logging(&args, &Config::default()).ok().flatten();
                return Err(err);
            }
        },
        None => Config::default(),
    };
    let _guard = init_logging(&args, &cfg)?;

    match &args.cmd {
        Command::Doctor {} => doctor(&cfg),
        Command::Run {} => evaluate_routes(&cfg, None),
        Command::Evaluate { dir } => evaluate_routes(&cfg, Some(dir.as_path())),
        Command::Parse { input } => parse(input),
    }
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    let default = PathBuf::from("visual-verdict.toml");
    default.exists().then_some(default)
}

fn init_logging(args: &Args, cfg: &Config) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries the results; logs go to stderr.
    let stderr_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if cfg.logging.write_to_file && !cfg.logging.file_path.is_empty() {
        let path = Path::new(&cfg.logging.file_path);
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    // A subscriber installed by an embedding caller stays in place.
    if let Err(e) = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(file_layer)
        .try_init()
    {
        debug!("logging already initialised: {e}");
    }

    Ok(guard)
}

fn doctor(cfg: &Config) -> Result<ExitStatus> {
    let creds = Credentials::load(cfg)?;
    let pages = PageInventory::from_config(cfg)?;
    let resolver = ProviderResolver::from_config(cfg, &creds)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&serde_json::json!({
            "primary_configured": creds.primary_api_key.is_some(),
            "secondary_configured": creds.secondary_api_key.is_some(),
            "pinned_model": creds.pinned_model,
            "candidates": resolver.plan(),
            "capture_mode": cfg.capture.mode,
            "base_url": pages.base_url,
            "routes": pages.routes(),
        }))?
    );
    Ok(ExitStatus::Pass)
}

fn parse(input: &Path) -> Result<ExitStatus> {
    let text = if input == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .with_context(|| "reading stdin")?;
        buf
    } else {
        std::fs::read_to_string(input)
            .with_context(|| format!("reading response: {}", input.display()))?
    };
    let parsed = verdict::parse(&text);
    println!("{}", serde_json::to_string_pretty(&parsed)?);
    Ok(parsed.outcome.into())
}

fn evaluate_routes(cfg: &Config, dir: Option<&Path>) -> Result<ExitStatus> {
    // Credentials are checked before any capture or network activity.
    let creds = Credentials::load(cfg)?;
    let resolver = ProviderResolver::from_config(cfg, &creds)?;

    let pages = PageInventory::from_config(cfg)?;
    let routes = pages.routes();
    if routes.is_empty() {
        return Err(anyhow!("no routes configured"));
    }

    let plan = resolver
        .plan()
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    info!("provider plan: {plan}");
    info!("evaluating {} page(s) from {}", routes.len(), pages.base_url);

    let source: Box<dyn ImageSource> = match dir {
        Some(d) => Box::new(DirectorySource::new(d.to_path_buf())),
        None => capture::from_config(cfg, &pages)?,
    };
    let targets = capture::capture_all(source.as_ref(), &routes)?;

    let started = now_rfc3339();
    let result = Pipeline::new(resolver).run(targets)?;
    let report = RunReport::new(&result, started, now_rfc3339());

    if cfg.output.write_report_json {
        let path = Path::new(&cfg.output.report_path);
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            ensure_dir(parent)?;
        }
        std::fs::write(path, serde_json::to_string_pretty(&report)?)
            .with_context(|| format!("writing report: {}", path.display()))?;
        info!("report written to {}", path.display());
    }

    if cfg.output.print_summary {
        println!("{}", render_summary(&result));
    }

    Ok(result.exit_status())
}

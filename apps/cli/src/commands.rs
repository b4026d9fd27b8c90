//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr, eyre};
use indicatif::{ProgressBar, ProgressStyle};
use launchkit_core::{IntakeRequest, Pipeline, ProgressReporter};
use launchkit_shared::{
    AppConfig, Confidence, PipelineConfig, PipelineResult, StageId, StageOutcome, Variant,
    init_config, load_config, load_config_from, validate_config,
};
use tracing::{info, warn};

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// LaunchKit: from a one-line idea to a reviewable launch kit.
#[derive(Parser)]
#[command(
    name = "launchkit",
    version,
    about = "Generate market research, branding, pricing, a launch plan, and a static site from a startup idea.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Config file to use instead of ~/.launchkit/launchkit.toml.
    #[arg(long, global = true, env = "LAUNCHKIT_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Run the pipeline for an idea and emit the result document.
    Run(RunArgs),

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Arguments for `launchkit run`.
#[derive(clap::Args, Debug, Default)]
pub(crate) struct RunArgs {
    /// The startup idea, in plain words.
    pub idea: String,

    /// Language code for generated copy.
    #[arg(long)]
    pub language: Option<String>,

    /// Tone override (e.g. friendly, playful).
    #[arg(long)]
    pub tone: Option<String>,

    /// Content strategy: legacy, fusion, or required.
    #[arg(long)]
    pub variant: Option<Variant>,

    /// Write the result document here instead of stdout.
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Write the static site into this directory.
    #[arg(long)]
    pub site_dir: Option<PathBuf>,

    /// Write the full deliverables bundle into this directory (needs --approve).
    #[arg(long)]
    pub export_dir: Option<PathBuf>,

    /// Confirm the bundle has been reviewed and may be exported.
    #[arg(long)]
    pub approve: bool,
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags. Logs go to stderr so stdout stays
/// a clean JSON document.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "launchkit=info",
        1 => "launchkit=debug",
        _ => "launchkit=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config;
    match cli.command {
        Command::Run(args) => cmd_run(config_path.as_deref(), args).await,
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init().await,
            ConfigAction::Show => cmd_config_show(config_path.as_deref()).await,
        },
    }
}

fn resolve_config(path: Option<&Path>) -> Result<AppConfig> {
    match path {
        Some(path) => {
            if !path.exists() {
                return Err(eyre!("config file '{}' does not exist", path.display()));
            }
            Ok(load_config_from(path)?)
        }
        None => Ok(load_config()?),
    }
}

/// Layer CLI flags over the loaded config.
fn apply_overrides(
    mut config: AppConfig,
    args: &RunArgs,
) -> Result<(PipelineConfig, IntakeRequest)> {
    if let Some(variant) = args.variant {
        config.defaults.variant = variant;
    }
    if let Some(language) = &args.language {
        config.defaults.language = language.clone();
    }
    if let Some(tone) = &args.tone {
        config.defaults.tone = Some(tone.clone());
    }
    validate_config(&config)?;

    let mut request =
        IntakeRequest::new(args.idea.as_str()).language(config.defaults.language.as_str());
    if let Some(tone) = &config.defaults.tone {
        request = request.tone(tone.as_str());
    }

    Ok((PipelineConfig::from(&config), request))
}

async fn cmd_run(config_path: Option<&Path>, args: RunArgs) -> Result<()> {
    if args.approve && args.export_dir.is_none() {
        return Err(eyre!("--approve given without --export-dir"));
    }

    let config = resolve_config(config_path)?;
    let (pipeline_config, request) = apply_overrides(config, &args)?;

    info!(
        variant = %pipeline_config.variant,
        workers = pipeline_config.workers,
        "generating launch kit"
    );

    let reporter = CliProgress::new();
    let pipeline = Pipeline::new(pipeline_config);
    let result = pipeline.run(&request, &reporter).await;

    let document = serde_json::to_string_pretty(&result)?;
    match &args.out {
        Some(path) => {
            std::fs::write(path, format!("{document}\n"))
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
            println!("{}", path.display());
        }
        None => println!("{document}"),
    }

    if let Some(dir) = &args.site_dir {
        export_site(dir, &result)?;
    }

    if let Some(dir) = &args.export_dir {
        if args.approve {
            let report = launchkit_export::write_full_export(
                dir,
                &result.deliverables,
                result.website.ready(),
            )?;
            info!(
                dir = %report.root.display(),
                files = report.files.len(),
                "full export written"
            );
        } else {
            warn!(
                dir = %dir.display(),
                "full export skipped: pass --approve once the bundle has been reviewed"
            );
        }
    }

    for flag in &result.deliverables.needs_review {
        warn!(stage = %flag.stage, reason = %flag.reason, "needs review");
    }

    Ok(())
}

fn export_site(dir: &Path, result: &PipelineResult) -> Result<()> {
    match &result.website {
        StageOutcome::Ready(site) => {
            let report = launchkit_export::write_site(dir, site)?;
            info!(
                dir = %report.root.display(),
                files = report.files.len(),
                "site written"
            );
        }
        StageOutcome::Fallback(fallback) => {
            warn!(
                dir = %dir.display(),
                reason = ?fallback.reason,
                "site export skipped: website stage produced no output"
            );
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// Stage progress on an indicatif spinner (stderr).
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]);
        spinner.set_style(style);
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn stage_started(&self, stage: StageId) {
        self.spinner.set_message(format!("{stage}..."));
    }

    fn stage_finished(&self, stage: StageId, status: &str, confidence: Option<Confidence>) {
        let line = match confidence {
            Some(c) => format!("{stage}: {status} ({:.2})", c.value()),
            None => format!("{stage}: {status}"),
        };
        self.spinner.println(line);
    }

    fn done(&self, result: &PipelineResult) {
        self.spinner.finish_and_clear();
        let flagged = result.deliverables.needs_review.len();
        if flagged > 0 {
            eprintln!("{flagged} stage(s) need review");
        }
    }
}

async fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

async fn cmd_config_show(path: Option<&Path>) -> Result<()> {
    let config = resolve_config(path)?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use launchkit_core::SilentProgress;
    use launchkit_shared::StageError;

    fn temp_dir(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!("lk-cli-{label}-{}", uuid::Uuid::now_v7()))
    }

    async fn milk_result() -> PipelineResult {
        Pipeline::new(PipelineConfig::default())
            .run(
                &IntakeRequest::new("A subscription milk delivery app for college students"),
                &SilentProgress,
            )
            .await
    }

    fn args(idea: &str) -> RunArgs {
        RunArgs {
            idea: idea.to_string(),
            ..RunArgs::default()
        }
    }

    #[test]
    fn flags_override_config_file() {
        let mut config = AppConfig::default();
        config.defaults.variant = Variant::Legacy;
        config.defaults.tone = Some("formal".into());

        let mut run = args("milk delivery");
        run.variant = Some(Variant::Required);
        run.tone = Some("playful".into());

        let (pipeline, request) = apply_overrides(config, &run).unwrap();
        assert_eq!(pipeline.variant, Variant::Required);
        assert_eq!(request.tone.as_deref(), Some("playful"));
        assert_eq!(request.language, "en");
    }

    #[test]
    fn config_file_fills_missing_flags() {
        let mut config = AppConfig::default();
        config.defaults.language = "de".into();
        config.pipeline.workers = 2;

        let (pipeline, request) = apply_overrides(config, &args("milk delivery")).unwrap();
        assert_eq!(pipeline.variant, Variant::Fusion);
        assert_eq!(pipeline.workers, 2);
        assert_eq!(request.language, "de");
        assert!(request.tone.is_none());
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = AppConfig::default();
        config.review.confidence_threshold = 2.0;
        assert!(apply_overrides(config, &args("x")).is_err());
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let path = std::env::temp_dir().join(format!("lk-missing-{}.toml", uuid::Uuid::now_v7()));
        let err = resolve_config(Some(&path)).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn run_arguments_parse() {
        let cli = Cli::try_parse_from([
            "launchkit",
            "-vv",
            "run",
            "milk delivery for students",
            "--variant",
            "required",
            "--site-dir",
            "site",
            "--export-dir",
            "out",
            "--approve",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        let Command::Run(run) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(run.variant, Some(Variant::Required));
        assert!(run.approve);
        assert_eq!(run.site_dir.as_deref(), Some(Path::new("site")));
    }

    #[test]
    fn unknown_variant_is_rejected() {
        let parsed = Cli::try_parse_from(["launchkit", "run", "idea", "--variant", "bogus"]);
        assert!(parsed.is_err());
    }

    #[tokio::test]
    async fn site_export_writes_ready_website() {
        let dir = temp_dir("site");
        let result = milk_result().await;

        export_site(&dir, &result).unwrap();
        assert!(dir.join("index.html").exists());
        assert!(dir.join("assets/PLACEHOLDERS.txt").exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn site_export_skips_fallen_back_website() {
        let dir = temp_dir("skip");
        let mut result = milk_result().await;
        result.website = StageOutcome::from_result(Err(StageError::Panicked {
            stage: StageId::Website,
        }));

        export_site(&dir, &result).unwrap();
        assert!(!dir.exists());
    }
}

//! surveyrank: ranked summaries for survey results

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use surveyrank::analyzer::SurveyAnalyzer;
use surveyrank::config::{build_ignore_set, is_ignored, load_config, Config, CONFIG_FILENAME};
use surveyrank::reporter::{ConsoleReporter, JsonReporter};
use surveyrank::survey::{is_survey_file, load_survey, Survey, SURVEY_SUFFIX};
use surveyrank::watcher::SurveyWatcher;
use surveyrank::{catalogue, SurveyReport};
use walkdir::WalkDir;

/// surveyrank: weighted-rank scoring and ranked summaries for survey results
#[derive(Parser, Debug)]
#[command(name = "surveyrank")]
#[command(author, version, about, long_about = None)]
#[command(args_conflicts_with_subcommands = true)]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Survey file or directory of survey files
    path: Option<PathBuf>,

    /// Analyze a built-in survey (repeatable; see `surveyrank list`)
    #[arg(long, short, value_name = "SLUG")]
    builtin: Vec<String>,

    /// Analyze every built-in survey
    #[arg(long)]
    all: bool,

    /// Output format as JSON
    #[arg(long, short)]
    json: bool,

    /// Quiet mode (top entry per survey)
    #[arg(long, short)]
    quiet: bool,

    /// Verbose output (weights, contributions, debug logging)
    #[arg(long, short)]
    verbose: bool,

    /// Exit 1 when any data-quality warning is found
    #[arg(long)]
    strict: bool,

    /// Path to config file (default: search .surveyrankrc.json in current dir and parents)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Watch for survey file changes and re-analyze
    #[arg(long)]
    watch: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List built-in surveys
    List,

    /// Create .surveyrankrc.json with sensible defaults
    Init {
        /// Also write an example survey file: ranking or categorical
        #[arg(long, value_name = "KIND")]
        sample: Option<String>,

        /// Directory in which to create files (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,
    },
}

/// Something to analyze: a catalogue slug or a survey file
#[derive(Debug, Clone)]
enum Target {
    Builtin(String),
    File(PathBuf),
}

impl Target {
    fn describe(&self) -> String {
        match self {
            Target::Builtin(slug) => slug.clone(),
            Target::File(path) => path.display().to_string(),
        }
    }
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();
    init_logging(args.verbose);

    if args.no_color {
        colored::control::set_override(false);
    }

    if let Some(cmd) = args.command {
        return match cmd {
            Commands::List => run_list(),
            Commands::Init { sample, dir } => run_init(sample.as_deref(), dir.as_deref()),
        };
    }

    if args.path.is_none() && args.builtin.is_empty() && !args.all {
        anyhow::bail!("Nothing to analyze: pass a survey path, --builtin <SLUG> or --all");
    }

    let work_dir = match args.path {
        Some(ref path) if path.is_file() => path.parent().unwrap_or(Path::new(".")).to_path_buf(),
        Some(ref path) => path.clone(),
        None => std::env::current_dir().context("Failed to get current directory")?,
    };

    // Load config (CLI flags override config file)
    let config = load_config(&work_dir, args.config.as_deref())?.merge_with_cli(args.strict);

    if args.watch {
        let Some(ref path) = args.path else {
            anyhow::bail!("--watch needs a survey path to watch");
        };
        return run_watch(&args, &config, path);
    }

    let targets = collect_targets(&args, &config)?;
    if targets.is_empty() {
        eprintln!("{}: No survey files found", "Warning".yellow());
        return Ok(ExitCode::from(2));
    }

    let mut reports = Vec::new();
    let mut had_errors = false;
    let mut strict_failures = 0;

    for target in &targets {
        match analyze_target(target, &config) {
            Ok((report, strict)) => {
                if strict && report.warnings() > 0 {
                    strict_failures += 1;
                }
                reports.push(report);
            }
            Err(e) => {
                eprintln!("{}: {}: {:#}", "Error".red(), target.describe(), e);
                had_errors = true;
            }
        }
    }

    if reports.is_empty() {
        eprintln!("{}: All surveys failed to analyze", "Error".red());
        return Ok(ExitCode::from(2));
    }

    let stats = SurveyAnalyzer::aggregate_stats(&reports);

    if args.json {
        let reporter = JsonReporter::new().pretty();
        if reports.len() == 1 {
            println!("{}", reporter.report(&reports[0]));
        } else {
            println!("{}", reporter.report_with_summary(&reports, &stats));
        }
    } else {
        let reporter = console_reporter(&args);
        if args.quiet {
            for report in &reports {
                reporter.report_quiet(report);
            }
        } else if reports.len() == 1 {
            reporter.report(&reports[0]);
        } else {
            reporter.report_many(&reports, &stats);
        }
    }

    if strict_failures > 0 {
        if !args.quiet && !args.json {
            eprintln!(
                "\n{}: {} survey(s) have data-quality warnings (strict mode)",
                "Failed".red().bold(),
                strict_failures
            );
        }
        return Ok(ExitCode::from(1));
    }

    if had_errors {
        Ok(ExitCode::from(2))
    } else {
        Ok(ExitCode::SUCCESS)
    }
}

fn init_logging(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .format_timestamp(None)
        .init();
}

fn console_reporter(args: &Args) -> ConsoleReporter {
    let mut reporter = ConsoleReporter::new();
    if args.verbose {
        reporter = reporter.verbose();
    }
    if args.no_color {
        reporter = reporter.without_colors();
    }
    reporter
}

/// Load (or build) the survey, then analyze it with the config that applies to it.
/// Returns the report and whether strict mode applies to it.
fn analyze_target(target: &Target, config: &Config) -> Result<(SurveyReport, bool)> {
    let (survey, source, effective): (Survey, Option<&Path>, _) = match target {
        Target::Builtin(slug) => (catalogue::builtin(slug)?, None, config.effective_default()),
        Target::File(path) => (
            load_survey(path)?,
            Some(path.as_path()),
            config.effective_for_file(path),
        ),
    };

    let analyzer = SurveyAnalyzer::new().with_tolerances(effective.tolerances);
    let report = analyzer.analyze(&survey, source)?;
    Ok((report, effective.strict))
}

fn collect_targets(args: &Args, config: &Config) -> Result<Vec<Target>> {
    let mut targets = Vec::new();

    if args.all {
        targets.extend(
            catalogue::ENTRIES
                .iter()
                .map(|entry| Target::Builtin(entry.slug.to_string())),
        );
    } else {
        targets.extend(args.builtin.iter().cloned().map(Target::Builtin));
    }

    if let Some(ref path) = args.path {
        let ignore_set = if config.ignore.is_empty() {
            None
        } else {
            Some(build_ignore_set(&config.ignore)?)
        };
        let files = collect_survey_files(path, ignore_set.as_ref(), &config.get_survey_patterns())?;
        targets.extend(files.into_iter().map(Target::File));
    }

    Ok(targets)
}

fn collect_survey_files(
    path: &Path,
    ignore_set: Option<&globset::GlobSet>,
    patterns: &[&str],
) -> Result<Vec<PathBuf>> {
    if path.is_file() {
        if let Some(set) = ignore_set {
            if is_ignored(path, set) {
                return Ok(vec![]);
            }
        }
        return Ok(vec![path.to_path_buf()]);
    }

    if !path.is_dir() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    let mut files = Vec::new();
    for entry in WalkDir::new(path)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let file_path = entry.path();
        if !entry.file_type().is_file() || !is_survey_file(file_path, patterns) {
            continue;
        }
        if let Some(set) = ignore_set {
            if is_ignored(file_path, set) {
                continue;
            }
        }
        files.push(file_path.to_path_buf());
    }

    // Sort for consistent output
    files.sort();
    Ok(files)
}

fn run_list() -> Result<ExitCode> {
    println!("{}", "Built-in surveys:".bold());
    for entry in catalogue::ENTRIES {
        println!(
            "   {:<22} {:<12} {}",
            entry.slug.bold(),
            entry.kind.to_string().dimmed(),
            entry.title
        );
    }
    Ok(ExitCode::SUCCESS)
}

const CONFIG_TEMPLATE: &str = r#"{
  "sumTolerance": 0.02,
  "percentTolerance": 3,
  "strict": false,
  "ignore": [
    "**/drafts/**"
  ],
  "surveyPatterns": [".survey.json"],
  "overrides": [
    {
      "files": ["**/legacy/**"],
      "sumTolerance": 0.05
    }
  ]
}
"#;

const RANKING_SAMPLE: &str = r#"{
  "kind": "ranking",
  "title": "Most Important Platform Features",
  "scoreLabel": "Priority Score",
  "labelThreshold": 5,
  "weights": {"1": 3, "2": 2, "3": 1},
  "items": [
    {"label": "Ease of use", "distribution": {"1": 0.50, "2": 0.30, "3": 0.20}},
    {"label": "Video quality", "distribution": {"1": 0.30, "2": 0.40, "3": 0.30}},
    {"label": "Integrations", "distribution": {"1": 0.20, "2": 0.30, "3": 0.50}}
  ]
}
"#;

const CATEGORICAL_SAMPLE: &str = r#"{
  "kind": "categorical",
  "title": "Current Platform Challenges",
  "categories": [
    {"label": "Technical issues", "count": 42, "percent": 43},
    {"label": "Limited UI/navigation", "count": 18, "percent": 19},
    {"label": "Lack of specific tools", "count": 16, "percent": 16},
    {"label": "Scheduling difficulties", "count": 14, "percent": 14},
    {"label": "Privacy concerns", "count": 7, "percent": 7}
  ]
}
"#;

fn run_init(sample: Option<&str>, dir: Option<&Path>) -> Result<ExitCode> {
    let cwd = std::env::current_dir().context("Failed to get current directory")?;
    let dir = dir.unwrap_or(&cwd);

    let sample_content = match sample.map(str::to_lowercase).as_deref() {
        None => None,
        Some("ranking") => Some(RANKING_SAMPLE),
        Some("categorical") => Some(CATEGORICAL_SAMPLE),
        Some(other) => anyhow::bail!(
            "Unknown sample kind '{}' (expected ranking or categorical)",
            other
        ),
    };

    let config_path = dir.join(CONFIG_FILENAME);
    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
    } else {
        std::fs::write(&config_path, CONFIG_TEMPLATE).with_context(|| {
            format!("Failed to write config to {}", config_path.display())
        })?;
        println!(
            "{}: Created {}",
            "Done".green().bold(),
            config_path.display()
        );
    }

    if let Some(content) = sample_content {
        let sample_path = dir.join(format!("example{}", SURVEY_SUFFIX));
        if sample_path.exists() {
            eprintln!(
                "{}: {} already exists; leaving it untouched",
                "Warning".yellow(),
                sample_path.display()
            );
        } else {
            std::fs::write(&sample_path, content).with_context(|| {
                format!("Failed to write sample survey to {}", sample_path.display())
            })?;
            println!(
                "{}: Created {}",
                "Done".green().bold(),
                sample_path.display()
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn run_watch(args: &Args, config: &Config, path: &Path) -> Result<ExitCode> {
    let ignore_set = if config.ignore.is_empty() {
        None
    } else {
        Some(build_ignore_set(&config.ignore)?)
    };
    let patterns = config.get_survey_patterns();
    let reporter = console_reporter(args);

    let show = |target: &Target| match analyze_target(target, config) {
        Ok((report, _)) => {
            if args.json {
                println!("{}", JsonReporter::new().report(&report));
            } else if args.quiet {
                reporter.report_quiet(&report);
            } else {
                reporter.report(&report);
            }
        }
        Err(e) => {
            eprintln!("{}: {}: {:#}", "Error".red(), target.describe(), e);
        }
    };

    for file in collect_survey_files(path, ignore_set.as_ref(), &patterns)? {
        show(&Target::File(file));
    }

    let watcher =
        SurveyWatcher::watch_with_patterns(path, &patterns).context("Failed to create file watcher")?;
    eprintln!("{}: Watching for changes... (Ctrl+C to stop)", "Info".blue());

    loop {
        let changed = watcher.next_changes();
        for file in changed {
            if ignore_set
                .as_ref()
                .map(|set| is_ignored(&file, set))
                .unwrap_or(false)
            {
                continue;
            }
            show(&Target::File(file));
        }
    }
}

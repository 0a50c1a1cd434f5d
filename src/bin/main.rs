use branch_compare::report::{ConsoleReporter, ReportContext, ReportFormat};
use branch_compare::{
    self, BranchPair, ColorMode, CompareConfig, DetailLevel, Error, Outcome, RepositoryOutcome,
};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, level_filters::LevelFilter, warn};
use tracing_subscriber::{fmt, EnvFilter};

fn parse_branch(s: &str) -> std::result::Result<String, String> {
    if s.trim().is_empty() {
        Err("Branch name cannot be empty".to_string())
    } else {
        Ok(s.trim().to_string())
    }
}

fn parse_jobs(s: &str) -> std::result::Result<usize, String> {
    match s.parse::<usize>() {
        Ok(0) => Err("jobs must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Base branch, looked up as origin/<BASE>
    #[arg(value_parser = parse_branch)]
    base: String,

    /// Feature branch, looked up as origin/<FEATURE>
    #[arg(value_parser = parse_branch)]
    feature: String,

    /// Repository directories to compare (defaults to the current directory)
    repos: Vec<PathBuf>,

    /// Report format
    #[arg(short, long, value_enum, default_value = "text")]
    format: ReportFormat,

    /// How much per-file detail to collect
    #[arg(short, long, value_enum, default_value = "diffs")]
    detail: DetailLevel,

    /// Report file name without extension
    #[arg(short, long, default_value = branch_compare::DEFAULT_REPORT_BASE)]
    report_base: PathBuf,

    /// When to use colours
    #[arg(long, value_enum, default_value = "auto")]
    color: ColorMode,

    /// Number of repositories compared at the same time
    #[arg(short, long, default_value = "1", value_parser = parse_jobs)]
    jobs: usize,

    /// Embed names and diff text in the HTML report without escaping
    #[arg(long)]
    raw_html: bool,

    /// List the commits unique to each branch
    #[arg(long)]
    commits: bool,

    /// Only print to the console, do not write a report file
    #[arg(long)]
    no_report: bool,

    /// Also print the full report to the console
    #[arg(long)]
    print_report: bool,

    /// Log level
    #[arg(global = true, short, long, default_value = "error")]
    log: LevelFilter,
}

impl Cli {
    fn config(&self) -> CompareConfig {
        let mut config = CompareConfig::new(BranchPair::new(&self.base, &self.feature));
        config.detail = self.detail;
        config.format = self.format;
        config.report_base.clone_from(&self.report_base);
        config.color = self.color;
        config.jobs = self.jobs;
        config.escape_html = !self.raw_html;
        config.commits = self.commits;
        config.console_only = self.no_report;
        config.print_report = self.print_report;
        config
    }

    fn repo_paths(&self) -> Vec<PathBuf> {
        if self.repos.is_empty() {
            vec![std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))]
        } else {
            self.repos.clone()
        }
    }
}

fn console_result(result: io::Result<()>) {
    if let Err(e) = result {
        warn!(error = %e, "Failed to write console output");
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    // Initialize logging
    let env_filter = EnvFilter::from_default_env().add_directive(cli.log.into());

    fmt()
        .with_env_filter(env_filter)
        .with_file(true)
        .with_line_number(true)
        .with_ansi(true)
        .with_writer(io::stderr)
        .pretty()
        .init();

    let config = cli.config();
    config.color.apply();
    debug!(config = ?config, "Configuration resolved");

    let paths = cli.repo_paths();
    let single_repository = paths.len() == 1;
    let engine = Arc::new(branch_compare::new(&config));
    let mut console =
        ConsoleReporter::new(io::stdout(), config.branches.clone(), config.color.console());

    let on_outcome = |outcome: &RepositoryOutcome| console_result(console.report_outcome(outcome));
    let batch = if config.jobs > 1 {
        Arc::clone(&engine)
            .compare_concurrently(paths, config.jobs, on_outcome)
            .await
    } else {
        engine.compare_all(&paths, on_outcome)
    };

    if let Some(total) = batch.cumulative() {
        console_result(console.report_cumulative(&total));
    }
    if batch.compared_count() == 0 {
        console_result(console.report_nothing_compared());
    }

    if !config.console_only || config.print_report {
        let context = ReportContext::now(config.branches.clone());
        match branch_compare::render_report(&config, &context, &batch) {
            Ok(report) => {
                if config.print_report {
                    console_result(console.report_contents(&report));
                }
                if !config.console_only {
                    match report.write(&config.report_base) {
                        Ok(path) => console_result(console.report_saved(&path)),
                        Err(e) => {
                            warn!(error = %e, "Report not written");
                            console_result(console.report_write_error(&e));
                        }
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Report not rendered");
                console_result(console.report_write_error(&e));
            }
        }
    }
    console_result(console.into_inner().flush());

    let not_a_repository = batch.outcomes().iter().any(|o| {
        matches!(o.outcome, Outcome::Skipped(Error::NotARepository { .. }))
    });
    if single_repository && not_a_repository {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

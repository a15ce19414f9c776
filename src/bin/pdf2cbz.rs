//! CLI binary for pdf2cbz.
//!
//! A thin shim over the library crate that maps CLI flags and environment
//! variables to `BatchConfig`, prints one status line per file and a final
//! tally, and turns the report into an exit code.

use anyhow::{Context, Result};
use clap::builder::BoolishValueParser;
use clap::{ArgAction, CommandFactory, Parser};
use indicatif::{ProgressBar, ProgressStyle};
use pdf2cbz::{
    convert_input, BatchConfig, BatchReport, ConversionProgressCallback, ConversionResult,
    InputKind, Outcome, PageFormat, ResolvedInput, SkipReason,
};
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI status reporter ──────────────────────────────────────────────────────

/// Prints a coloured status line per file and the final tally. When a
/// visible `bar` is set, lines go through it so they stack above the live
/// progress bar. With `failures_only` (`--quiet`) only failed files are
/// reported and there is no bar or tally.
struct CliReporter {
    bar: Option<ProgressBar>,
    failures_only: bool,
}

impl CliReporter {
    fn new(show_progress: bool, failures_only: bool) -> Arc<Self> {
        // indicatif hides the bar (and drops its println output) off a terminal.
        let show_bar = show_progress && !failures_only && io::stderr().is_terminal();
        let bar = show_bar.then(|| {
            let bar = ProgressBar::new(0);
            let style = ProgressStyle::with_template(
                "{spinner:.cyan} {prefix:.bold}  \
                 [{bar:42.green/238}] {pos:>3}/{len} files  \
                 ⏱ {elapsed_precise}  {msg}",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▉▊▋▌▍▎▏  ")
            .tick_strings(TICKS);
            bar.set_style(style);
            bar.set_prefix("Converting");
            bar.enable_steady_tick(Duration::from_millis(80));
            bar
        });
        Arc::new(Self { bar, failures_only })
    }

    /// The bar to print through, if it is actually drawn.
    fn visible_bar(&self) -> Option<&ProgressBar> {
        self.bar.as_ref().filter(|bar| !bar.is_hidden())
    }

    fn line(&self, msg: String) {
        match self.visible_bar() {
            Some(bar) => bar.println(msg),
            None => eprintln!("{msg}"),
        }
    }

    fn wants_line(&self, result: &ConversionResult) -> bool {
        !self.failures_only || matches!(result.outcome, Outcome::Failed(_))
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// One coloured status line for a finished file.
fn status_line(result: &ConversionResult) -> String {
    let name = file_name(&result.source);
    let secs = dim(&format!("{:.1}s", result.duration_ms as f64 / 1000.0));
    match result.outcome {
        Outcome::Converted => format!(
            "  {} {}  →  {}  {}  {}",
            green("✓"),
            name,
            bold(&file_name(&result.output)),
            dim(&format!("{} pages", result.pages)),
            secs,
        ),
        Outcome::Skipped(SkipReason::AlreadyConverted) => format!(
            "  {} {}  {}",
            cyan("↷"),
            name,
            dim("already converted (use --force to redo)"),
        ),
        Outcome::Skipped(SkipReason::NotAPdf) => {
            format!("  {} {}  {}", yellow("⚠"), name, yellow("not a PDF, skipped"))
        }
        Outcome::Failed(ref e) => {
            format!("  {} {}  {}", red("✗"), name, red(&e.to_string()))
        }
    }
}

impl ConversionProgressCallback for CliReporter {
    fn on_batch_start(&self, total_files: usize) {
        if let Some(ref bar) = self.bar {
            bar.set_length(total_files as u64);
        }
    }

    fn on_file_start(&self, _index: usize, _total: usize, source: &Path) {
        if let Some(ref bar) = self.bar {
            bar.set_message(file_name(source));
        }
    }

    fn on_file_complete(&self, _index: usize, _total: usize, result: &ConversionResult) {
        if self.wants_line(result) {
            self.line(status_line(result));
        }
        if let Some(ref bar) = self.bar {
            bar.inc(1);
        }
    }

    fn on_batch_complete(&self, report: &BatchReport) {
        if let Some(ref bar) = self.bar {
            bar.finish_and_clear();
        }
        if report.is_empty() || self.failures_only {
            return;
        }

        let failed = report.failed();
        let mark = if failed == 0 {
            green("✔")
        } else if report.succeeded() == 0 && report.skipped() == 0 {
            red("✘")
        } else {
            yellow("⚠")
        };
        eprintln!(
            "{} {} converted, {} skipped, {} failed  {}",
            mark,
            bold(&report.succeeded().to_string()),
            report.skipped(),
            if failed == 0 {
                failed.to_string()
            } else {
                red(&failed.to_string())
            },
            dim(&format!(
                "({} files, {:.1}s)",
                report.attempted(),
                report.duration_ms as f64 / 1000.0
            )),
        );
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Convert one file (writes book.cbz next to it)
  pdf2cbz book.pdf

  # Convert every PDF directly inside a directory
  pdf2cbz ~/comics

  # Convert files matching a glob (quote it so the shell doesn't expand it)
  pdf2cbz 'scans/vol-*.pdf'

  # Higher resolution, redo files that were already converted
  DPI=300 FORCE=1 pdf2cbz ~/comics

EXIT STATUS:
  Single file:         0 when converted or skipped, 1 when it failed.
  Directory or glob:   0 even if some files failed (see the tally),
                       including when nothing matched.
  Unresolvable input:  1 (missing directory, invalid glob pattern).

ENVIRONMENT VARIABLES:
  DPI                    Rendering resolution (default 150)
  FORCE                  true/1/yes/on to overwrite existing .cbz files
  PDF2CBZ_FORMAT         Page image format: jpeg (default) or png
  PDF2CBZ_SCRATCH_DIR    Parent directory for temporary page images
  PDFIUM_LIB_PATH        Path to libpdfium (file or containing directory)
  RUST_LOG               Override the log filter (e.g. pdf2cbz=debug)
"#;

/// Convert PDF documents into CBZ comic archives.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2cbz",
    version,
    about = "Convert PDF documents into CBZ comic archives",
    long_about = "Rasterise every page of a PDF and pack the images into a CBZ (zip) \
archive next to the source. Accepts a single file, a directory (non-recursive) or a glob \
pattern. Existing .cbz files are left alone unless --force is given.",
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file, directory, or quoted glob pattern.
    input: Option<String>,

    /// Rendering DPI.
    #[arg(long, env = "DPI", default_value_t = pdf2cbz::DEFAULT_DPI,
          value_parser = clap::value_parser!(u32).range(1..))]
    dpi: u32,

    /// Re-convert even if the .cbz already exists.
    #[arg(short, long, env = "FORCE", action = ArgAction::SetTrue,
          value_parser = BoolishValueParser::new())]
    force: bool,

    /// Page image format inside the archive.
    #[arg(long, env = "PDF2CBZ_FORMAT", value_enum, default_value = "jpeg")]
    format: FormatArg,

    /// Directory for temporary page images (default: system temp dir).
    #[arg(long, env = "PDF2CBZ_SCRATCH_DIR")]
    scratch_dir: Option<PathBuf>,

    /// Print the batch report as JSON on stdout.
    #[arg(long, env = "PDF2CBZ_JSON", action = ArgAction::SetTrue,
          value_parser = BoolishValueParser::new())]
    json: bool,

    /// Disable progress bar.
    #[arg(long, env = "PDF2CBZ_NO_PROGRESS", action = ArgAction::SetTrue,
          value_parser = BoolishValueParser::new())]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2CBZ_VERBOSE", action = ArgAction::SetTrue,
          value_parser = BoolishValueParser::new())]
    verbose: bool,

    /// Only report files that failed, and fatal errors.
    #[arg(short, long, env = "PDF2CBZ_QUIET", action = ArgAction::SetTrue,
          value_parser = BoolishValueParser::new())]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Jpeg,
    Png,
}

impl From<FormatArg> for PageFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Jpeg => PageFormat::Jpeg,
            FormatArg::Png => PageFormat::Png,
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let Some(ref input) = cli.input else {
        Cli::command().print_help().context("Failed to print help")?;
        println!();
        return Ok(ExitCode::SUCCESS);
    };

    // ── Logging setup ────────────────────────────────────────────────────
    // Status lines already report every file; library logs only add noise
    // unless the user asks for them.
    let show_status = !cli.quiet && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if show_status || cli.quiet {
        "error"
    } else {
        "warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let reporter =
        (!cli.json).then(|| CliReporter::new(!cli.no_progress && !cli.verbose, cli.quiet));
    let config = build_config(&cli, reporter)?;

    // ── Resolve and run ──────────────────────────────────────────────────
    let (resolved, report) = convert_input(input, &config)
        .await
        .with_context(|| format!("Cannot resolve input '{input}'"))?;

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialise report")?
        );
    }

    if report.is_empty() && !cli.quiet {
        match resolved.kind {
            InputKind::Directory(ref dir) => {
                eprintln!("{} no input files found in {}", cyan("◆"), dir.display())
            }
            InputKind::Glob(ref pattern) => {
                eprintln!("{} no matches for '{}'", cyan("◆"), pattern)
            }
            InputKind::SingleFile(_) => {}
        }
    }

    Ok(ExitCode::from(exit_status(&resolved, &report)))
}

/// A lone file's failure is the command's failure; in a batch the tally
/// carries that signal instead.
fn exit_status(resolved: &ResolvedInput, report: &BatchReport) -> u8 {
    if !resolved.is_batch() && report.failed() > 0 {
        1
    } else {
        0
    }
}

/// Map CLI args to `BatchConfig`.
fn build_config(cli: &Cli, reporter: Option<Arc<CliReporter>>) -> Result<BatchConfig> {
    let mut builder = BatchConfig::builder()
        .dpi(cli.dpi)
        .force(cli.force)
        .page_format(cli.format.into());

    if let Some(ref dir) = cli.scratch_dir {
        builder = builder.scratch_root(dir);
    }
    if let Some(reporter) = reporter {
        builder = builder.progress_callback(reporter);
    }

    builder.build().context("Invalid configuration")
}

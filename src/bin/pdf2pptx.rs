//! CLI binary for pdf2pptx.
//!
//! A thin shim over the library crate that maps CLI flags
//! to `ConversionConfig` and prints results.

use anyhow::{Context, Result};
use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use pdf2pptx::{
    convert_to_file, inspect, output_path_for, CancelHandle, ConversionConfig,
    ConversionProgressCallback, DocumentMetadata, ErrorKind, Pdf2PptxError, PngCompression,
    ProgressCallback,
};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

// ── CLI progress callback using indicatif ────────────────────────────────────

/// Terminal progress callback: a live bar plus one log line per slide.
struct CliProgressCallback {
    bar: ProgressBar,
    /// Start of the page currently being rendered. Pages run one at a time.
    page_started: Mutex<Option<Instant>>,
}

impl CliProgressCallback {
    /// Spinner until `on_conversion_start` reports the page count.
    fn new_dynamic() -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);

        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.set_message("Opening PDF…");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            page_started: Mutex::new(None),
        })
    }

    /// The bar length is 100: the pipeline reports percentages, not counts.
    fn activate_bar(&self) {
        let progress_style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}%  {msg}  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(100);
        self.bar.set_style(progress_style);
        self.bar.set_prefix("Converting");
        self.bar.reset_eta();
    }
}

impl ConversionProgressCallback for CliProgressCallback {
    fn on_conversion_start(&self, total_pages: usize) {
        self.activate_bar();
        self.bar.println(format!(
            "{} {}",
            bold("◆"),
            bold(&format!("Converting {total_pages} pages into slides…"))
        ));
    }

    fn on_page_start(&self, page_num: usize, total: usize) {
        *self.page_started.lock().unwrap() = Some(Instant::now());
        self.bar.set_message(format!("page {page_num}/{total}"));
    }

    fn on_progress(&self, percent: u8) {
        self.bar.set_position(percent as u64);
    }

    fn on_page_complete(&self, page_num: usize, total: usize) {
        let elapsed_ms = self
            .page_started
            .lock()
            .unwrap()
            .take()
            .map(|t| t.elapsed().as_millis())
            .unwrap_or(0);

        self.bar.println(format!(
            "  {} Slide {:>3}/{:<3}  {}",
            green("✓"),
            page_num,
            total,
            dim(&format!("{:.1}s", elapsed_ms as f64 / 1000.0)),
        ));
    }

    fn on_conversion_complete(&self, total_slides: usize, deck_bytes: usize) {
        self.bar.finish_and_clear();
        eprintln!(
            "{} {} slides  {}",
            green("✔"),
            bold(&total_slides.to_string()),
            dim(&format!("{:.1} MiB", deck_bytes as f64 / (1024.0 * 1024.0)))
        );
    }

    fn on_conversion_failed(&self, error: &Pdf2PptxError) {
        self.bar.abandon();
        eprintln!("{} {}", red("✘"), red(&error.kind().to_string()));
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic conversion (writes slides.pptx next to the input)
  pdf2pptx slides.pdf

  # Explicit output and deck title
  pdf2pptx report.pdf -o out/report.pptx --title "Q3 report"

  # Encrypted document
  pdf2pptx --password s3cret locked.pdf

  # Smallest deck, slower encoding
  pdf2pptx --compression best scan.pdf

  # Inspect PDF metadata (no rendering)
  pdf2pptx --inspect-only document.pdf --json

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to an existing libpdfium
  RUST_LOG          Log filter, e.g. pdf2pptx=debug

Every page becomes one slide holding a picture of the page rendered at 2x.
The slide size is taken from the first page. Press Ctrl-C to stop between
pages; no partial deck is written.
"#;

/// Convert PDF files to image-backed PowerPoint decks.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2pptx",
    version,
    about = "Convert PDF files to PowerPoint decks, one slide per page",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local PDF file path.
    input: PathBuf,

    /// Write the deck here instead of next to the input.
    #[arg(short, long, env = "PDF2PPTX_OUTPUT")]
    output: Option<PathBuf>,

    /// PDF user password for encrypted documents.
    #[arg(long, env = "PDF2PPTX_PASSWORD")]
    password: Option<String>,

    /// Deck title (default: the PDF's own title, if any).
    #[arg(long)]
    title: Option<String>,

    /// Deck author (default: the PDF's own author, if any).
    #[arg(long)]
    author: Option<String>,

    /// PNG compression effort for slide images.
    #[arg(long, env = "PDF2PPTX_COMPRESSION", value_enum, default_value = "default")]
    compression: CompressionArg,

    /// Path to the pdfium shared library.
    #[arg(long, env = "PDFIUM_LIB_PATH")]
    pdfium_lib: Option<PathBuf>,

    /// Print PDF metadata only, no conversion.
    #[arg(long)]
    inspect_only: bool,

    /// Print a JSON summary instead of human-readable text.
    #[arg(long, env = "PDF2PPTX_JSON")]
    json: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "PDF2PPTX_QUIET")]
    quiet: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "PDF2PPTX_VERBOSE")]
    verbose: bool,
}

#[derive(clap::ValueEnum, Clone, Debug)]
enum CompressionArg {
    Fast,
    Default,
    Best,
}

impl From<CompressionArg> for PngCompression {
    fn from(v: CompressionArg) -> Self {
        match v {
            CompressionArg::Fast => PngCompression::Fast,
            CompressionArg::Default => PngCompression::Default,
            CompressionArg::Best => PngCompression::Best,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The progress bar replaces INFO logs unless -v was given.
    let show_progress = !cli.quiet && !cli.json;
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Inspect-only mode ────────────────────────────────────────────────
    if cli.inspect_only {
        let meta = inspect_file(&cli.input, cli.password.clone(), cli.pdfium_lib.clone())
            .await
            .context("Failed to inspect PDF")?;

        if cli.json {
            println!(
                "{}",
                serde_json::to_string_pretty(&meta).context("Failed to serialize metadata")?
            );
        } else {
            print_metadata(&cli.input, &meta);
        }
        return Ok(());
    }

    // ── Build config ─────────────────────────────────────────────────────
    let progress_cb: Option<ProgressCallback> = if show_progress {
        let cb = CliProgressCallback::new_dynamic();
        Some(cb as Arc<dyn ConversionProgressCallback>)
    } else {
        None
    };

    let cancel = CancelHandle::new();
    let config = build_config(&cli, progress_cb, cancel.clone())?;

    // Ctrl-C asks the pipeline to stop before the next page.
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    // ── Run conversion ───────────────────────────────────────────────────
    let output_path = cli
        .output
        .clone()
        .unwrap_or_else(|| output_path_for(&cli.input));

    let stats = match convert_to_file(&cli.input, &output_path, &config).await {
        Ok(stats) => stats,
        Err(e) if e.kind() == ErrorKind::Cancelled => {
            if !cli.quiet {
                eprintln!("{} {}", red("✘"), e);
            }
            std::process::exit(130);
        }
        Err(e) => return Err(e).context("Conversion failed"),
    };

    if cli.json {
        let summary = serde_json::json!({
            "input": cli.input,
            "output": output_path,
            "stats": stats,
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("Failed to serialise summary")?
        );
    } else if !cli.quiet {
        eprintln!(
            "{}  {} slides  {}ms  →  {}",
            green("✔"),
            stats.total_pages,
            stats.total_duration_ms,
            bold(&output_path.display().to_string()),
        );
    }

    Ok(())
}

/// Map CLI args to `ConversionConfig`.
fn build_config(
    cli: &Cli,
    progress: Option<ProgressCallback>,
    cancel: CancelHandle,
) -> Result<ConversionConfig> {
    let mut builder = ConversionConfig::builder()
        .png_compression(cli.compression.clone().into())
        .cancel_handle(cancel);

    if let Some(ref pwd) = cli.password {
        builder = builder.password(pwd);
    }
    if let Some(ref title) = cli.title {
        builder = builder.title(title);
    }
    if let Some(ref author) = cli.author {
        builder = builder.author(author);
    }
    if let Some(ref lib) = cli.pdfium_lib {
        builder = builder.pdfium_lib_path(lib);
    }
    if let Some(cb) = progress {
        builder = builder.progress_callback(cb);
    }

    builder.build().context("Invalid configuration")
}

async fn inspect_file(
    path: &Path,
    password: Option<String>,
    pdfium_lib: Option<PathBuf>,
) -> Result<DocumentMetadata> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(inspect(bytes, password, pdfium_lib).await?)
}

fn print_metadata(path: &Path, meta: &DocumentMetadata) {
    println!("File:         {}", path.display());
    if let Some(ref t) = meta.title {
        println!("Title:        {}", t);
    }
    if let Some(ref a) = meta.author {
        println!("Author:       {}", a);
    }
    if let Some(ref s) = meta.subject {
        println!("Subject:      {}", s);
    }
    println!("Pages:        {}", meta.page_count);
    println!("PDF Version:  {}", meta.pdf_version);
    if let Some(ref p) = meta.producer {
        println!("Producer:     {}", p);
    }
    if let Some(ref c) = meta.creator {
        println!("Creator:      {}", c);
    }
}

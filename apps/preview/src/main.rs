mod config;
mod content;
mod errors;
mod layout;
mod models;
mod preview;
mod render;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::content::document_blocks;
use crate::errors::AppError;
use crate::layout::measure::StyleProfile;
use crate::layout::{MetricMeasurer, Paginator};
use crate::models::{sample_document, DocumentInput, DocumentKind};
use crate::preview::{spawn_preview, PreviewSource, PreviewStatus};
use crate::render::{preview_document_html, PrintJob};

/// How often `watch` checks the input file for changes.
const WATCH_POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Parser)]
#[command(name = "preview", version, about = "Resume and cover-letter pagination preview")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct DocumentArgs {
    /// Which document to lay out.
    #[arg(long, value_enum)]
    kind: DocumentKind,

    /// `{ formData, coverLetterData }` JSON; the built-in sample when omitted.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Letter date (YYYY-MM-DD); today when omitted.
    #[arg(long)]
    date: Option<NaiveDate>,
}

impl DocumentArgs {
    fn load(&self) -> Result<DocumentInput> {
        match &self.input {
            Some(path) => read_document(path),
            None => Ok(sample_document()),
        }
    }

    fn date(&self) -> NaiveDate {
        self.date.unwrap_or_else(|| Local::now().date_naive())
    }
}

#[derive(Subcommand)]
enum Command {
    /// Estimate page breaks and print the pages as JSON.
    Paginate(DocumentArgs),

    /// Write the print document handed to the PDF engine.
    PrintHtml {
        #[command(flatten)]
        document: DocumentArgs,

        /// Stylesheet to inject; defaults to PRINT_CSS_PATH.
        #[arg(long)]
        css: Option<PathBuf>,

        /// Inline preview job instead of a named download.
        #[arg(long)]
        preview: bool,

        #[arg(long)]
        out: PathBuf,
    },

    /// Write the paginated on-screen preview as HTML.
    PreviewHtml {
        #[command(flatten)]
        document: DocumentArgs,

        #[arg(long)]
        css: Option<PathBuf>,

        #[arg(long)]
        out: PathBuf,
    },

    /// Print the sample document as JSON.
    Sample,

    /// Re-paginate whenever the input file changes.
    Watch {
        #[arg(long, value_enum)]
        kind: DocumentKind,

        #[arg(long)]
        input: PathBuf,

        #[arg(long)]
        date: Option<NaiveDate>,

        /// Turn auto preview off; re-paginate only when Enter is pressed.
        #[arg(long)]
        manual: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries JSON output
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    debug!("Starting resume preview v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    if let Err(e) = run(cli.command, &config).await {
        match e.downcast_ref::<AppError>() {
            Some(app) => error!(code = app.code(), "{e:#}"),
            None => error!("{e:#}"),
        }
        return Err(e);
    }
    Ok(())
}

async fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Paginate(document) => {
            let input = document.load()?;
            let blocks = document_blocks(document.kind, &input, document.date());
            let pages = Paginator::new(&MetricMeasurer)
                .with_profile(StyleProfile::for_kind(document.kind))
                .compute_pages(&blocks);
            println!("{}", serde_json::to_string_pretty(&pages)?);
        }

        Command::PrintHtml {
            document,
            css,
            preview,
            out,
        } => {
            let input = document.load()?;
            let css = config.load_css(css.as_deref())?;
            let job = if preview {
                PrintJob::preview(document.kind, &input, &css, document.date())
            } else {
                PrintJob::download(document.kind, &input, &css, document.date())?
            };
            write_output(&out, &job.html)?;
            let options = serde_json::to_string(&job.options)?;
            info!(
                file_name = %job.file_name,
                content_disposition = %job.content_disposition(),
                cache_control = ?job.cache_control,
                %options,
                out = %out.display(),
                "Print document written"
            );
        }

        Command::PreviewHtml { document, css, out } => {
            let input = document.load()?;
            let css = config.load_css(css.as_deref())?;
            let blocks = document_blocks(document.kind, &input, document.date());
            let pages = Paginator::new(&MetricMeasurer)
                .with_profile(StyleProfile::for_kind(document.kind))
                .compute_pages(&blocks);
            write_output(
                &out,
                &preview_document_html(document.kind, &input, &pages, &css),
            )?;
            info!(pages = pages.len(), out = %out.display(), "Preview written");
        }

        Command::Sample => {
            println!("{}", serde_json::to_string_pretty(&sample_document())?);
        }

        Command::Watch {
            kind,
            input,
            date,
            manual,
        } => {
            watch_file(config, kind, &input, date, manual).await?;
        }
    }
    Ok(())
}

fn read_document(path: &Path) -> Result<DocumentInput> {
    DocumentInput::from_path(path)
        .with_context(|| format!("Failed to load document '{}'", path.display()))
}

fn write_output(path: &Path, contents: &str) -> Result<()> {
    std::fs::write(path, contents)
        .with_context(|| format!("Failed to write '{}'", path.display()))
}

/// Feeds every change of `input` to the preview driver until Ctrl-C. In
/// manual mode a line on stdin triggers the refresh.
async fn watch_file(
    config: &Config,
    kind: DocumentKind,
    input: &Path,
    date: Option<NaiveDate>,
    manual: bool,
) -> Result<()> {
    let (handle, mut snapshots) = spawn_preview(Arc::new(MetricMeasurer), config.debounce);
    let mut ticker = tokio::time::interval(WATCH_POLL_INTERVAL);
    let mut last_seen: Option<String> = None;
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = manual;

    if manual {
        handle.set_auto_preview(false).await?;
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    info!(input = %input.display(), ?kind, "Watching for changes");

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                let raw = match tokio::fs::read_to_string(input).await {
                    Ok(raw) => raw,
                    Err(e) => {
                        warn!(error = %e, "Cannot read watched file");
                        continue;
                    }
                };
                if last_seen.as_deref() == Some(raw.as_str()) {
                    continue;
                }
                match serde_json::from_str::<DocumentInput>(&raw) {
                    Ok(document) => {
                        let source = PreviewSource {
                            kind,
                            input: document,
                            date: date.unwrap_or_else(|| Local::now().date_naive()),
                        };
                        let generation = handle.submit(source).await?;
                        debug!(
                            generation,
                            outdated = handle.is_outdated(),
                            "Change submitted to preview"
                        );
                        if manual {
                            info!(generation, "Change pending; press Enter to refresh");
                        }
                    }
                    Err(e) => warn!(error = %e, "Ignoring change that is not a valid document"),
                }
                last_seen = Some(raw);
            }
            changed = snapshots.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = snapshots.borrow_and_update().clone();
                if let PreviewStatus::Failed(reason) = &snapshot.status {
                    warn!(generation = snapshot.generation, %reason, "Preview failed");
                    continue;
                }
                let heights: Vec<f32> = snapshot.pages.iter().map(|p| p.used_height.round()).collect();
                info!(
                    generation = snapshot.generation,
                    status = ?snapshot.status,
                    pages = snapshot.pages.len(),
                    ?heights,
                    "Preview snapshot"
                );
            }
            line = stdin.next_line(), if stdin_open => match line {
                Ok(Some(_)) => {
                    debug!("Manual refresh requested");
                    handle.refresh().await?;
                }
                Ok(None) => {
                    warn!("Stdin closed; manual refresh is no longer available");
                    stdin_open = false;
                }
                Err(e) => {
                    warn!(error = %e, "Cannot read stdin");
                    stdin_open = false;
                }
            },
            _ = &mut ctrl_c => {
                info!("Stopping watch");
                break;
            }
        }
    }
    Ok(())
}

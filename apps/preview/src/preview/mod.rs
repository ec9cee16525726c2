//! Debounced auto-preview driver.
//!
//! The paginator is a pure function; this module decides when to call it.
//! One tokio task receives form submissions over an `mpsc` channel, waits for
//! a quiet period, paginates the latest submission in `spawn_blocking`, and
//! publishes the result on a `watch` channel. A newer submission simply
//! supersedes a pending one.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use chrono::NaiveDate;
use tokio::sync::{mpsc, watch};
use tokio::time::{self, Instant};
use tracing::{debug, error, info};

use crate::content::document_blocks;
use crate::errors::{AppError, AppResult};
use crate::layout::block::Page;
use crate::layout::measure::{Measurer, StyleProfile};
use crate::layout::paginator::Paginator;
use crate::models::document::{DocumentInput, DocumentKind};

const COMMAND_BUFFER: usize = 32;

/// What to preview: the form, which document, and the letter date.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewSource {
    pub kind: DocumentKind,
    pub input: DocumentInput,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewStatus {
    /// Nothing submitted yet.
    Idle,
    /// The form has no name; preview is withheld until it does.
    AwaitingName,
    Ready,
    Failed(String),
}

/// Latest rendered preview. `generation` is the submission it reflects.
#[derive(Debug, Clone, PartialEq)]
pub struct PreviewSnapshot {
    pub generation: u64,
    pub status: PreviewStatus,
    pub pages: Vec<Page>,
}

impl PreviewSnapshot {
    fn idle() -> Self {
        Self {
            generation: 0,
            status: PreviewStatus::Idle,
            pages: Vec::new(),
        }
    }
}

enum Command {
    Submit { generation: u64, source: PreviewSource },
    Refresh,
    SetAutoPreview(bool),
}

/// Control side of a running preview driver.
#[derive(Clone)]
pub struct PreviewHandle {
    commands: mpsc::Sender<Command>,
    submitted: Arc<AtomicU64>,
    snapshots: watch::Receiver<PreviewSnapshot>,
}

impl PreviewHandle {
    /// Queues a new version of the form and returns its generation.
    pub async fn submit(&self, source: PreviewSource) -> AppResult<u64> {
        let generation = self.submitted.fetch_add(1, Ordering::SeqCst) + 1;
        self.send(Command::Submit { generation, source }).await?;
        Ok(generation)
    }

    /// Renders the latest submission now, regardless of the debounce.
    pub async fn refresh(&self) -> AppResult<()> {
        self.send(Command::Refresh).await
    }

    /// Turning auto preview back on renders immediately if anything changed.
    pub async fn set_auto_preview(&self, enabled: bool) -> AppResult<()> {
        self.send(Command::SetAutoPreview(enabled)).await
    }

    /// True while a submission has not been rendered yet.
    pub fn is_outdated(&self) -> bool {
        self.submitted.load(Ordering::SeqCst) > self.snapshots.borrow().generation
    }

    async fn send(&self, command: Command) -> AppResult<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| AppError::Internal(anyhow!("Preview driver has stopped")))
    }
}

/// Starts the driver task. It runs until every handle is dropped.
pub fn spawn_preview<M>(
    measurer: Arc<M>,
    debounce: Duration,
) -> (PreviewHandle, watch::Receiver<PreviewSnapshot>)
where
    M: Measurer + Send + Sync + 'static,
{
    let (commands, rx) = mpsc::channel(COMMAND_BUFFER);
    let (snapshots_tx, snapshots) = watch::channel(PreviewSnapshot::idle());

    tokio::spawn(run(measurer, debounce, rx, snapshots_tx));

    let handle = PreviewHandle {
        commands,
        submitted: Arc::new(AtomicU64::new(0)),
        snapshots: snapshots.clone(),
    };
    (handle, snapshots)
}

async fn run<M>(
    measurer: Arc<M>,
    debounce: Duration,
    mut commands: mpsc::Receiver<Command>,
    snapshots: watch::Sender<PreviewSnapshot>,
) where
    M: Measurer + Send + Sync + 'static,
{
    let mut latest: Option<(u64, PreviewSource)> = None;
    let mut rendered: u64 = 0;
    let mut auto_preview = true;
    let mut deadline: Option<Instant> = None;

    info!(debounce_ms = debounce.as_millis() as u64, "Preview driver started");

    loop {
        let timer = async move {
            match deadline {
                Some(at) => time::sleep_until(at).await,
                None => std::future::pending::<()>().await,
            }
        };

        let render_now = tokio::select! {
            command = commands.recv() => match command {
                None => break,
                Some(Command::Submit { generation, source }) => {
                    debug!(generation, auto_preview, "Preview source submitted");
                    latest = Some((generation, source));
                    if auto_preview {
                        deadline = Some(Instant::now() + debounce);
                    }
                    false
                }
                Some(Command::Refresh) => true,
                Some(Command::SetAutoPreview(enabled)) => {
                    auto_preview = enabled;
                    let pending = latest.as_ref().is_some_and(|(g, _)| *g > rendered);
                    if !enabled {
                        deadline = None;
                    }
                    enabled && pending
                }
            },
            _ = timer => true,
        };

        if !render_now {
            continue;
        }
        deadline = None;

        if let Some((generation, source)) = latest.clone() {
            let snapshot = render(Arc::clone(&measurer), generation, source).await;
            rendered = generation;
            snapshots.send_replace(snapshot);
        }
    }

    info!("Preview driver stopped");
}

async fn render<M>(measurer: Arc<M>, generation: u64, source: PreviewSource) -> PreviewSnapshot
where
    M: Measurer + Send + Sync + 'static,
{
    if !source.input.form_data.has_name() {
        debug!(generation, "Preview withheld until a name is entered");
        return PreviewSnapshot {
            generation,
            status: PreviewStatus::AwaitingName,
            pages: Vec::new(),
        };
    }

    match paginate_blocking(measurer, source).await {
        Ok(pages) => {
            info!(generation, pages = pages.len(), "Preview updated");
            PreviewSnapshot {
                generation,
                status: PreviewStatus::Ready,
                pages,
            }
        }
        Err(e) => {
            error!(generation, error = %e, "Preview pagination failed");
            PreviewSnapshot {
                generation,
                status: PreviewStatus::Failed(e.to_string()),
                pages: Vec::new(),
            }
        }
    }
}

/// Flattens and paginates on the blocking pool; layout is CPU-bound.
async fn paginate_blocking<M>(measurer: Arc<M>, source: PreviewSource) -> AppResult<Vec<Page>>
where
    M: Measurer + Send + Sync + 'static,
{
    tokio::task::spawn_blocking(move || {
        let blocks = document_blocks(source.kind, &source.input, source.date);
        Paginator::new(measurer.as_ref())
            .with_profile(StyleProfile::for_kind(source.kind))
            .compute_pages(&blocks)
    })
    .await
    .map_err(|e| AppError::Internal(anyhow!("Pagination task failed: {e}")))
}

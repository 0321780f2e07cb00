//! Export coordinator - main orchestrator for archive exports
//!
//! This module drives a run through resolve → plan → open → append each batch
//! → finalize, and owns the cross-batch state of the run in [`RunState`].
//!
//! A run can be driven in one call with [`ExportCoordinator::run`], or step by
//! step with [`ExportCoordinator::prepare`],
//! [`ExportCoordinator::process_next_batch`] and [`ExportCoordinator::finish`]
//! when an external scheduler owns the batch loop.

use crate::adapters::storage::factory::{create_source_stores, create_state_storage, SourceStores};
use crate::adapters::storage::traits::{ConfigSource, FileRepository};
use crate::config::SitepackConfig;
use crate::core::export::archive::ArchiveWriter;
use crate::core::export::batch::BatchResult;
use crate::core::export::planner::{plan, Batch};
use crate::core::export::resolver::{SourceResolver, TypePolicy};
use crate::core::export::summary::{ExportError, ExportErrorType, ExportSummary};
use crate::core::state::{GenerationMarker, StateManager};
use crate::domain::{ExportIndex, ExportScope, Result, SitepackError};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Phase of an export run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunPhase {
    Idle,
    Resolving,
    Planning,
    /// Writing the batch with this zero-based index
    Writing(usize),
    Finalizing,
    Complete,
    Failed,
}

impl RunPhase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Failed)
    }

    /// Whether the run may move from `self` to `next`
    ///
    /// `batch_count` is the number of planned batches. With no batches the
    /// run goes straight from planning to finalizing.
    pub fn can_transition_to(self, next: RunPhase, batch_count: usize) -> bool {
        match (self, next) {
            (Self::Idle, Self::Resolving) => true,
            (Self::Resolving, Self::Planning) => true,
            (Self::Planning, Self::Writing(0)) => batch_count > 0,
            (Self::Planning, Self::Finalizing) => batch_count == 0,
            (Self::Writing(i), Self::Writing(j)) => j == i + 1 && j < batch_count,
            (Self::Writing(i), Self::Finalizing) => i + 1 == batch_count,
            (Self::Finalizing, Self::Complete) => true,
            (Self::Resolving | Self::Writing(_) | Self::Finalizing, Self::Failed) => true,
            _ => false,
        }
    }
}

impl fmt::Display for RunPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Resolving => write!(f, "resolving"),
            Self::Planning => write!(f, "planning"),
            Self::Writing(i) => write!(f, "writing batch {}", i + 1),
            Self::Finalizing => write!(f, "finalizing"),
            Self::Complete => write!(f, "complete"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Cross-batch state of one run
///
/// Owns the open archive, the accumulated index and the counters. Every run
/// gets a fresh instance.
#[derive(Debug)]
pub struct RunState {
    phase: RunPhase,
    artifact_path: PathBuf,
    batches: Vec<Batch>,
    total_entries: usize,
    writer: Option<ArchiveWriter>,
    index: ExportIndex,
    marker: Option<GenerationMarker>,
    summary: ExportSummary,
    started: Instant,
}

impl RunState {
    fn new(scope: &ExportScope, artifact_path: &Path) -> Self {
        Self {
            phase: RunPhase::Idle,
            artifact_path: artifact_path.to_path_buf(),
            batches: Vec::new(),
            total_entries: 0,
            writer: None,
            index: ExportIndex::new(),
            marker: None,
            summary: ExportSummary::new(scope.to_string()),
            started: Instant::now(),
        }
    }

    pub fn phase(&self) -> RunPhase {
        self.phase
    }

    pub fn artifact_path(&self) -> &Path {
        &self.artifact_path
    }

    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }

    pub fn total_entries(&self) -> usize {
        self.total_entries
    }

    /// Index entries accumulated so far
    pub fn index(&self) -> &ExportIndex {
        &self.index
    }

    /// Progress messages of the batches completed so far
    pub fn messages(&self) -> &[String] {
        &self.summary.messages
    }

    pub fn summary(&self) -> &ExportSummary {
        &self.summary
    }

    /// Whether batches remain to be written
    pub fn has_pending_batches(&self) -> bool {
        matches!(self.phase, RunPhase::Writing(_))
    }

    fn transition(&mut self, next: RunPhase) -> Result<()> {
        if !self.phase.can_transition_to(next, self.batches.len()) {
            return Err(SitepackError::InvalidStateTransition {
                from: self.phase.to_string(),
                to: next.to_string(),
            });
        }
        tracing::trace!(from = %self.phase, to = %next, "Run phase change");
        self.phase = next;
        Ok(())
    }

    fn absorb(&mut self, result: BatchResult) {
        self.summary.config_count += result.config_count;
        self.summary.file_count += result.file_count;
        self.summary.skipped += result.skipped;
        self.summary.messages.push(result.message);
        self.index.merge(result.index);
    }
}

/// Export coordinator
pub struct ExportCoordinator {
    source: Arc<dyn ConfigSource + Send + Sync>,
    files: Arc<dyn FileRepository + Send + Sync>,
    resolver: SourceResolver,
    state_manager: Option<Arc<StateManager>>,
    force: bool,
    shutdown_signal: Option<watch::Receiver<bool>>,
}

impl ExportCoordinator {
    /// Create a coordinator over the given source stores
    pub fn new(stores: SourceStores, policy: TypePolicy) -> Self {
        let resolver = SourceResolver::new(Arc::clone(&stores.config), stores.packages, policy);
        Self {
            source: stores.config,
            files: stores.files,
            resolver,
            state_manager: None,
            force: false,
            shutdown_signal: None,
        }
    }

    /// Create a coordinator with the stores, policy and marker store
    /// described by configuration
    pub fn from_config(config: &SitepackConfig) -> Self {
        let stores = create_source_stores(config);
        let policy = TypePolicy::new(config.export.excluded_types.iter().cloned());
        let state_manager = Arc::new(StateManager::new_with_storage(create_state_storage(config)));
        Self::new(stores, policy).with_state_manager(state_manager)
    }

    /// Track generations through a marker store
    pub fn with_state_manager(mut self, state_manager: Arc<StateManager>) -> Self {
        self.state_manager = Some(state_manager);
        self
    }

    /// Start even if the marker says another generation is in progress
    pub fn with_force(mut self, force: bool) -> Self {
        self.force = force;
        self
    }

    /// Stop between batches once the signal turns `true`
    pub fn with_shutdown_signal(mut self, shutdown_signal: watch::Receiver<bool>) -> Self {
        self.shutdown_signal = Some(shutdown_signal);
        self
    }

    pub fn resolver(&self) -> &SourceResolver {
        &self.resolver
    }

    /// Run a whole export
    ///
    /// # Returns
    ///
    /// The summary of a completed run, or of an interrupted one with
    /// `interrupted` set and no artifact.
    ///
    /// # Errors
    ///
    /// Resolution-time errors ([`SitepackError::ScopeNotFound`],
    /// [`SitepackError::InvalidChunkSize`], [`SitepackError::DeleteFailed`],
    /// [`SitepackError::GenerationInProgress`]) leave nothing behind.
    /// Batch-time errors leave an abandoned artifact without an index.
    pub async fn run(
        &self,
        scope: &ExportScope,
        destination: &Path,
        chunk_size: usize,
    ) -> Result<ExportSummary> {
        let mut state = self.prepare(scope, destination, chunk_size).await?;

        while state.has_pending_batches() {
            if self.is_shutdown_requested() {
                return self.interrupt(state).await;
            }
            self.process_next_batch(&mut state).await?;
        }

        self.finish(state).await
    }

    /// Resolve, plan and open the artifact
    ///
    /// Nothing is touched on disk until resolution and planning succeeded.
    pub async fn prepare(
        &self,
        scope: &ExportScope,
        destination: &Path,
        chunk_size: usize,
    ) -> Result<RunState> {
        let mut state = RunState::new(scope, destination);
        tracing::info!(scope = %scope, destination = %destination.display(), chunk_size, "Starting export");

        if chunk_size == 0 {
            return Err(SitepackError::InvalidChunkSize(chunk_size));
        }

        state.transition(RunPhase::Resolving)?;
        let entries = match self.resolver.resolve(scope).await {
            Ok(entries) => entries,
            Err(e) => {
                state.transition(RunPhase::Failed)?;
                return Err(e);
            }
        };
        state.total_entries = entries.len();

        state.transition(RunPhase::Planning)?;
        state.batches = plan(entries, chunk_size)?;
        state.summary.batch_count = state.batches.len();

        if let Some(manager) = &self.state_manager {
            state.marker = Some(manager.begin_generation(destination, self.force).await?);
        }

        let config_mtime = chrono::Utc::now().timestamp().max(0) as u64;
        match ArchiveWriter::open_or_reset(destination, config_mtime) {
            Ok(writer) => state.writer = Some(writer),
            Err(e) => {
                self.release_marker(&mut state, &e).await;
                return Err(e);
            }
        }

        let next = if state.batches.is_empty() {
            RunPhase::Finalizing
        } else {
            RunPhase::Writing(0)
        };
        state.transition(next)?;

        tracing::info!(
            entries = state.total_entries,
            batches = state.batches.len(),
            "Export planned"
        );

        Ok(state)
    }

    /// Write the next planned batch
    ///
    /// # Returns
    ///
    /// The batch result, or `None` if no batch is pending.
    ///
    /// # Errors
    ///
    /// A failing batch moves the run to `Failed` and abandons the artifact.
    pub async fn process_next_batch(&self, state: &mut RunState) -> Result<Option<BatchResult>> {
        let index = match state.phase {
            RunPhase::Writing(index) => index,
            _ => return Ok(None),
        };

        let batch = &state.batches[index];
        let processed_before: usize = state.batches[..index].iter().map(Batch::len).sum();
        crate::log_batch_processing!(batch.number(), state.batches.len());

        let writer = state.writer.as_mut().ok_or_else(|| {
            SitepackError::State("Archive writer missing while writing".to_string())
        })?;
        let outcome = writer
            .append_batch(
                batch,
                processed_before,
                state.total_entries,
                self.source.as_ref(),
                self.files.as_ref(),
            )
            .await;

        match outcome {
            Ok(result) => {
                tracing::info!(message = %result.message, "Batch completed");
                let returned = result.clone();
                state.absorb(result);

                let next = if index + 1 < state.batches.len() {
                    RunPhase::Writing(index + 1)
                } else {
                    RunPhase::Finalizing
                };
                state.transition(next)?;
                Ok(Some(returned))
            }
            Err(e) => {
                let context = format!("batch {}", index + 1);
                crate::log_error_with_context!(e, context.as_str());
                state
                    .summary
                    .add_error(ExportError::from(&e).with_context(context));
                self.record_failure(state, &e).await;
                Err(e)
            }
        }
    }

    /// Write the index and close the artifact
    pub async fn finish(&self, mut state: RunState) -> Result<ExportSummary> {
        if state.phase != RunPhase::Finalizing {
            return Err(SitepackError::InvalidStateTransition {
                from: state.phase.to_string(),
                to: RunPhase::Complete.to_string(),
            });
        }

        let writer = state.writer.take().ok_or_else(|| {
            SitepackError::State("Archive writer missing while finalizing".to_string())
        })?;

        let artifact = match writer.finalize(&state.index) {
            Ok(artifact) => artifact,
            Err(e) => {
                state.summary.add_error(ExportError::from(&e));
                self.record_failure(&mut state, &e).await;
                return Err(e);
            }
        };

        state.transition(RunPhase::Complete)?;

        // The artifact is complete at this point; a marker that cannot be
        // saved does not undo it.
        if let (Some(manager), Some(mut marker)) = (&self.state_manager, state.marker.take()) {
            marker.record_counts(
                state.summary.config_count,
                state.summary.file_count,
                state.summary.batch_count,
            );
            if let Err(e) = manager
                .complete_generation(&mut marker, artifact.checksum.clone(), artifact.size)
                .await
            {
                tracing::warn!(error = %e, "Failed to record completed generation");
            }
        }

        state.summary.artifact = Some(artifact);

        let summary = state.summary.with_duration(state.started.elapsed());
        crate::log_export_complete!(summary.config_count, summary.file_count, summary.duration);
        summary.log_summary();

        Ok(summary)
    }

    /// Stop a run between batches without finalizing it
    async fn interrupt(&self, mut state: RunState) -> Result<ExportSummary> {
        tracing::warn!(
            completed_batches = state.summary.messages.len(),
            batches = state.batches.len(),
            "Shutdown requested, stopping export"
        );

        let reason = SitepackError::State("interrupted by shutdown signal".to_string());
        state.summary.interrupted = true;
        state.summary.add_error(ExportError::new(
            ExportErrorType::Interrupted,
            "Export interrupted by shutdown signal".to_string(),
        ));
        self.record_failure(&mut state, &reason).await;

        let summary = state.summary.with_duration(state.started.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    /// Move a run to `Failed`, abandon its artifact and update the marker
    ///
    /// Cleanup problems are logged; the original error is what the caller
    /// reports.
    async fn record_failure(&self, state: &mut RunState, err: &SitepackError) {
        if let Err(e) = state.transition(RunPhase::Failed) {
            tracing::warn!(error = %e, "Could not mark run as failed");
        }

        if let Some(writer) = state.writer.take() {
            if let Err(e) = writer.abandon() {
                tracing::warn!(error = %e, "Failed to close abandoned archive");
            }
        }

        self.release_marker(state, err).await;
    }

    /// Record a failed generation on the marker, if one is held
    async fn release_marker(&self, state: &mut RunState, err: &SitepackError) {
        if let (Some(manager), Some(mut marker)) = (&self.state_manager, state.marker.take()) {
            marker.record_counts(
                state.summary.config_count,
                state.summary.file_count,
                state.summary.batch_count,
            );
            if let Err(e) = manager.fail_generation(&mut marker, err.to_string()).await {
                tracing::warn!(error = %e, "Failed to record failed generation");
            }
        }
    }

    fn is_shutdown_requested(&self) -> bool {
        self.shutdown_signal
            .as_ref()
            .map(|rx| *rx.borrow())
            .unwrap_or(false)
    }
}

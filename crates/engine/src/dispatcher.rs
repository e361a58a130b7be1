// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The single-goroutine-equivalent dispatcher: the one task that owns
//! the queue head, the in-flight slot, and every job-lifecycle
//! transition. Everything else (the step logger, the updater) only
//! ever talks back to it over a channel.

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use dbxd_adapters::{
    JobOutcome, LogTailer, NixManager, PupManager, PupState, PupStats, Pupdate, SourceManager,
    StateManager, SystemUpdater, TailHandle,
};
use dbxd_core::{Action, ActionProgress, Change, ChangeType, Clock, Job, JobConfig, JobId, JobRecord, JobStatus};
use dbxd_storage::JobStore;
use parking_lot::Mutex;
use serde_json::json;
use tokio::sync::mpsc;

use crate::action_logger::ActionLogger;
use crate::change_bus::ChangeBus;
use crate::handlers;
use crate::job_manager::JobManager;
use crate::queue::{Queue, QueuedJob};
use crate::EngineError;

/// A job without a progress update for this long in `queued`/`in_progress`
/// is orphaned.
const ORPHAN_THRESHOLD_MS: u64 = 30 * 60 * 1000;
const ORPHAN_SWEEP_INTERVAL: Duration = Duration::from_secs(10 * 60);
const QUEUE_TICK: Duration = Duration::from_millis(100);

/// Adapter dependencies the dispatcher is generic over.
pub struct DispatcherDeps<P, S, N, U, SM, L> {
    pub pup_manager: P,
    pub source_manager: S,
    pub nix_manager: N,
    pub system_updater: U,
    pub state_manager: SM,
    pub log_tailer: L,
}

pub struct DispatcherConfig {
    /// Directory per-job log files (`pup-{jobId}`) are written under.
    pub log_dir: PathBuf,
}

struct IngressJob {
    job_id: JobId,
    action: Action,
    logger: Arc<ActionLogger>,
}

struct InFlightMeta {
    logger: Arc<ActionLogger>,
    pup_state: Option<PupState>,
}

struct Completion {
    job_id: JobId,
    pup_id: Option<String>,
    pup_affecting: bool,
    outcome: JobOutcome,
}

/// Whether a completed action should trigger `pupManager.FastPoll` to
/// accelerate external state reconciliation.
fn is_pup_affecting(action: &Action) -> bool {
    matches!(
        action,
        Action::InstallPup { .. }
            | Action::UninstallPup { .. }
            | Action::PurgePup { .. }
            | Action::EnablePup { .. }
            | Action::DisablePup { .. }
    )
}

/// The dispatcher. Generic over every external collaborator plus the
/// clock, mirroring the shape of a hand-wired production runtime
/// without this crate ever depending on a concrete implementation of
/// any of them.
pub struct Dispatcher<P, S, N, U, SM, L, C: Clock> {
    pup_manager: P,
    source_manager: S,
    nix_manager: N,
    system_updater: U,
    state_manager: SM,
    log_tailer: L,
    clock: C,

    job_manager: Arc<JobManager<C>>,
    queue: Arc<Queue>,
    change_bus: ChangeBus,
    log_dir: PathBuf,

    in_flight: Mutex<HashMap<JobId, InFlightMeta>>,

    ingress_tx: mpsc::UnboundedSender<IngressJob>,
    ingress_rx: Mutex<Option<mpsc::UnboundedReceiver<IngressJob>>>,
    progress_tx: mpsc::UnboundedSender<ActionProgress>,
    progress_rx: Mutex<Option<mpsc::UnboundedReceiver<ActionProgress>>>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completion_rx: Mutex<Option<mpsc::UnboundedReceiver<Completion>>>,
    change_rx: Mutex<Option<mpsc::Receiver<Change>>>,
}

impl<P, S, N, U, SM, L, C> Dispatcher<P, S, N, U, SM, L, C>
where
    P: PupManager,
    S: SourceManager,
    N: NixManager,
    U: SystemUpdater,
    SM: StateManager,
    L: LogTailer,
    C: Clock,
{
    pub fn new(deps: DispatcherDeps<P, S, N, U, SM, L>, clock: C, config: DispatcherConfig, store: Arc<JobStore>) -> Self {
        let (ingress_tx, ingress_rx) = mpsc::unbounded_channel();
        let (progress_tx, progress_rx) = mpsc::unbounded_channel();
        let (completion_tx, completion_rx) = mpsc::unbounded_channel();
        let (change_bus, change_rx) = ChangeBus::new();

        Self {
            pup_manager: deps.pup_manager,
            source_manager: deps.source_manager,
            nix_manager: deps.nix_manager,
            system_updater: deps.system_updater,
            state_manager: deps.state_manager,
            log_tailer: deps.log_tailer,
            job_manager: Arc::new(JobManager::new(store, clock.clone())),
            queue: Arc::new(Queue::new()),
            change_bus,
            log_dir: config.log_dir,
            clock,
            in_flight: Mutex::new(HashMap::new()),
            ingress_tx,
            ingress_rx: Mutex::new(Some(ingress_rx)),
            progress_tx,
            progress_rx: Mutex::new(Some(progress_rx)),
            completion_tx,
            completion_rx: Mutex::new(Some(completion_rx)),
            change_rx: Mutex::new(Some(change_rx)),
        }
    }

    /// Allocate a 32-hex-char id, construct the job's logger, and
    /// non-blockingly push it onto the ingress channel. Never blocks
    /// waiting for work to start.
    pub fn add_action(&self, action: Action) -> JobId {
        let job_id = JobId::random();
        let logger = ActionLogger::new(
            job_id.clone(),
            action.pup_id().map(str::to_string),
            self.log_dir.clone(),
            self.progress_tx.clone(),
        );
        let _ = self.ingress_tx.send(IngressJob {
            job_id: job_id.clone(),
            action,
            logger,
        });
        job_id
    }

    /// Take the receiving half of the change bus. Callable once.
    #[allow(clippy::expect_used)]
    pub fn get_change_stream(&self) -> mpsc::Receiver<Change> {
        self.change_rx.lock().take().expect("change stream already taken")
    }

    pub async fn get_log_channel(&self, id: &str) -> Result<TailHandle, EngineError> {
        Ok(self.log_tailer.get_channel(id).await?)
    }

    pub async fn get_job_log_channel(&self, job_id: &JobId) -> Result<TailHandle, EngineError> {
        Ok(self.log_tailer.get_channel(job_id.as_str()).await?)
    }

    /// The main select loop. Signals `started` once it begins polling;
    /// on `stop`, flushes active jobs as failed and signals `stopped`.
    #[allow(clippy::expect_used)]
    pub async fn run(
        &self,
        mut pup_updates: mpsc::Receiver<Pupdate>,
        mut pup_stats: mpsc::Receiver<PupStats>,
        started: tokio::sync::oneshot::Sender<()>,
        stopped: tokio::sync::oneshot::Sender<()>,
        mut stop: tokio::sync::oneshot::Receiver<()>,
    ) {
        if let Err(e) = self.job_manager.sync_with_active_jobs() {
            tracing::warn!(error = %e, "failed to rebuild active-job cache at startup");
        }
        self.sweep_orphans().await;

        let mut ingress_rx = self.ingress_rx.lock().take().expect("run called once");
        let mut progress_rx = self.progress_rx.lock().take().expect("run called once");
        let mut completion_rx = self.completion_rx.lock().take().expect("run called once");

        let mut queue_tick = tokio::time::interval(QUEUE_TICK);
        let mut orphan_tick = tokio::time::interval(ORPHAN_SWEEP_INTERVAL);
        orphan_tick.tick().await; // consume the immediate tick; startup sweep already ran above

        let _ = started.send(());

        loop {
            tokio::select! {
                _ = &mut stop => {
                    self.shutdown().await;
                    break;
                }
                Some(ingress) = ingress_rx.recv() => {
                    self.handle_new_job(ingress).await;
                }
                Some(completion) = completion_rx.recv() => {
                    self.handle_completion(completion).await;
                }
                Some(ap) = progress_rx.recv() => {
                    self.handle_progress(ap).await;
                }
                Some(update) = pup_updates.recv() => {
                    let id = update.state.id.clone();
                    self.emit(ChangeType::Pup, id, json!(update)).await;
                }
                Some(stats) = pup_stats.recv() => {
                    let id = stats.pup_id.clone();
                    self.emit(ChangeType::Stats, id, json!(stats)).await;
                }
                _ = queue_tick.tick() => {
                    self.pump_queue().await;
                }
                _ = orphan_tick.tick() => {
                    self.sweep_orphans().await;
                }
            }
        }

        let _ = stopped.send(());
    }

    async fn handle_new_job(&self, ingress: IngressJob) {
        let IngressJob { job_id, action, logger } = ingress;
        let started_ms = self.clock.epoch_ms();

        if action.is_tracked() {
            let pup_id = action.pup_id().map(str::to_string);
            let pup_name = match &pup_id {
                Some(id) => self.pup_manager.get(id).await.ok().map(|(state, _)| state.name),
                None => None,
            };
            match self.job_manager.create(job_id.clone(), &action, pup_id, pup_name.as_deref()) {
                Ok(record) => self.emit_job(ChangeType::JobCreated, &record).await,
                Err(e) => tracing::warn!(job_id = %job_id, error = %e, "failed to create job record"),
            }
        }

        let job = Job::new(JobConfig { id: job_id, action }, started_ms);
        self.dispatch(job, logger).await;
    }

    async fn dispatch(&self, job: Job, logger: Arc<ActionLogger>) {
        match job.action.clone() {
            Action::InstallPup { name, version, source_id, options } => {
                self.install_pup(job, logger, &name, &version, &source_id, &options).await;
            }
            Action::InstallPups(items) => {
                for (i, spec) in items.into_iter().enumerate() {
                    let child_id = job.id.child(i);
                    let child_action = Action::InstallPup {
                        name: spec.name.clone(),
                        version: spec.version.clone(),
                        source_id: spec.source_id.clone(),
                        options: spec.options.clone(),
                    };
                    let child_logger = ActionLogger::new(child_id.clone(), None, self.log_dir.clone(), self.progress_tx.clone());
                    match self.job_manager.create(child_id.clone(), &child_action, None, None) {
                        Ok(record) => self.emit_job(ChangeType::JobCreated, &record).await,
                        Err(e) => {
                            tracing::warn!(job_id = %child_id, error = %e, "failed to create child job record");
                            continue;
                        }
                    }
                    let child_job = Job::new(JobConfig { id: child_id, action: child_action }, self.clock.epoch_ms());
                    self.install_pup(child_job, child_logger, &spec.name, &spec.version, &spec.source_id, &spec.options)
                        .await;
                }
            }
            Action::UninstallPup { pup_id }
            | Action::PurgePup { pup_id }
            | Action::EnablePup { pup_id }
            | Action::DisablePup { pup_id }
            | Action::RollbackPupUpgrade { pup_id }
            | Action::UpgradePup { pup_id, .. } => {
                self.attach_pup_and_enqueue(job, &pup_id, logger).await;
            }
            Action::UpdatePupConfig { pup_id, values } => {
                let outcome = handlers::update_pup_config(&self.pup_manager, &self.nix_manager, &self.state_manager, &pup_id, values).await;
                self.complete_inline(job, outcome).await;
            }
            Action::UpdatePupProviders { pup_id, providers } => {
                let outcome =
                    handlers::update_pup_providers(&self.pup_manager, &self.nix_manager, &self.state_manager, &pup_id, providers).await;
                self.complete_inline(job, outcome).await;
            }
            Action::UpdatePupHooks { pup_id, hooks } => {
                let outcome = handlers::update_pup_hooks(&self.pup_manager, &pup_id, hooks).await;
                self.complete_inline(job, outcome).await;
            }
            Action::UpdateMetrics { pup_id, metrics } => {
                handlers::update_metrics(&self.pup_manager, &pup_id, metrics).await;
            }
            Action::ImportBlockchainData
            | Action::UpdatePendingSystemNetwork { .. }
            | Action::EnableSsh
            | Action::DisableSsh
            | Action::AddSshKey { .. }
            | Action::RemoveSshKey { .. }
            | Action::AddBinaryCache { .. }
            | Action::RemoveBinaryCache { .. }
            | Action::SystemUpdate { .. } => {
                self.enqueue(job, logger, None).await;
            }
        }
    }

    /// Resolve a manifest, adopt it as a new pup, attach its fresh
    /// snapshot, and enqueue. Shared by the single-pup and batch
    /// install paths so neither needs to recurse through `dispatch`.
    async fn install_pup(
        &self,
        mut job: Job,
        logger: Arc<ActionLogger>,
        name: &str,
        version: &str,
        source_id: &str,
        options: &HashMap<String, String>,
    ) {
        let (manifest, source) = match self.source_manager.get_source_manifest(source_id, name, version).await {
            Ok(resolved) => resolved,
            Err(e) => return self.fail_inline(job, e.to_string()).await,
        };
        let pup_id = match self.pup_manager.adopt(&manifest, &source, options).await {
            Ok(pup_id) => pup_id,
            Err(e) => return self.fail_inline(job, e.to_string()).await,
        };
        match self.pup_manager.get(&pup_id).await {
            Ok((state, _stats)) => {
                job.pup_state = Some(json!(state));
                self.enqueue(job, logger, Some(state)).await;
            }
            Err(e) => self.fail_inline(job, e.to_string()).await,
        }
    }

    async fn attach_pup_and_enqueue(&self, mut job: Job, pup_id: &str, logger: Arc<ActionLogger>) {
        match self.pup_manager.get(pup_id).await {
            Ok((state, _stats)) => {
                job.pup_state = Some(json!(state));
                self.enqueue(job, logger, Some(state)).await;
            }
            Err(e) => self.fail_inline(job, e.to_string()).await,
        }
    }

    async fn enqueue(&self, job: Job, logger: Arc<ActionLogger>, pup_state: Option<PupState>) {
        let job_id = job.id.clone();
        let pup_id = job.pup_id();
        self.in_flight.lock().insert(job_id.clone(), InFlightMeta { logger, pup_state });
        self.queue.enqueue(QueuedJob { job_id, action: job.action, pup_id });
    }

    /// An inline handler's result, emitted as the job's `action` change.
    /// Never backed by a `JobRecord` — `UpdatePupConfig`/`UpdatePupProviders`/
    /// `UpdatePupHooks` are untracked.
    async fn complete_inline(&self, job: Job, outcome: JobOutcome) {
        let error = outcome.error.is_some();
        let update = json!({
            "jobId": job.id,
            "pupId": job.pup_id(),
            "error": outcome.error,
            "success": outcome.pup_state,
        });
        self.emit_with_error(ChangeType::Action, job.id.to_string(), update, error).await;
    }

    /// Fail a *tracked* job before it ever reaches the queue (resolution
    /// or adoption failure).
    async fn fail_inline(&self, job: Job, err: String) {
        if job.action.is_tracked() {
            if let Ok(Some(record)) = self.job_manager.complete(&job.id, Some(&err)) {
                self.emit_job(ChangeType::JobFailed, &record).await;
            }
        }
        let update = json!({ "jobId": job.id, "pupId": job.pup_id(), "error": err });
        self.emit_with_error(ChangeType::Action, job.id.to_string(), update, true).await;
    }

    async fn handle_progress(&self, ap: ActionProgress) {
        match self.job_manager.update_progress(&ap) {
            Ok(record) => self.emit_job(ChangeType::JobUpdated, &record).await,
            Err(e) => tracing::debug!(job_id = %ap.action_id, error = %e, "progress for unknown job"),
        }
    }

    /// If the in-flight slot is free and the queue is non-empty, pop the
    /// head and hand it to the updater on a spawned task so the select
    /// loop is never blocked on it.
    async fn pump_queue(&self) {
        let Some(queued) = self.queue.pump() else {
            return;
        };
        let QueuedJob { job_id, action, pup_id } = queued;

        let meta = self.in_flight.lock().get(&job_id).map(|m| (Arc::clone(&m.logger), m.pup_state.clone()));
        let Some((logger, pup_state)) = meta else {
            // Dispatched without going through `enqueue` (shouldn't
            // happen); release the slot rather than wedge the queue.
            self.queue.release();
            return;
        };
        logger.step("queue").log("dequeued, starting update");

        let updater = self.system_updater.clone();
        let completion_tx = self.completion_tx.clone();
        let pup_affecting = is_pup_affecting(&action);

        tokio::spawn(async move {
            let outcome = updater.run(&action, pup_state.as_ref()).await;
            let _ = completion_tx.send(Completion {
                job_id,
                pup_id,
                pup_affecting,
                outcome,
            });
        });
    }

    async fn handle_completion(&self, completion: Completion) {
        self.queue.release();
        let Completion { job_id, pup_id, pup_affecting, outcome } = completion;
        self.in_flight.lock().remove(&job_id);

        if outcome.error.is_none() && pup_affecting {
            if let Some(pup_id) = &pup_id {
                self.pup_manager.fast_poll(pup_id).await;
            }
        }

        match self.job_manager.complete(&job_id, outcome.error.as_deref()) {
            Ok(Some(record)) => {
                let change_type = match record.status {
                    JobStatus::Completed => ChangeType::JobCompleted,
                    _ => ChangeType::JobFailed,
                };
                self.emit_job(change_type, &record).await;
            }
            Ok(None) => {} // already terminal (e.g. raced with a Cancel)
            Err(e) => tracing::warn!(job_id = %job_id, error = %e, "failed to persist job completion"),
        }

        let error = outcome.error.is_some();
        let update = json!({ "jobId": job_id, "pupId": pup_id, "error": outcome.error, "success": outcome.pup_state });
        self.emit_with_error(ChangeType::Action, job_id.to_string(), update, error).await;
    }

    /// Flush every still-active job as failed. Called once on the stop
    /// signal; the in-flight updater task (if any) is not awaited —
    /// this is the "advisory cancellation" semantics §5 describes.
    async fn shutdown(&self) {
        let message = dbxd_core::CoreError::Shutdown.to_string();
        let active = self.job_manager.get_active().unwrap_or_default();
        for record in active {
            if let Ok(Some(updated)) = self.job_manager.complete(&record.id, Some(&message)) {
                self.emit_job(ChangeType::JobFailed, &updated).await;
            }
        }
        self.queue.release();
    }

    async fn sweep_orphans(&self) {
        let touched = match self.job_manager.clear_orphaned(ORPHAN_THRESHOLD_MS) {
            Ok(touched) => touched,
            Err(e) => {
                tracing::warn!(error = %e, "orphan sweep failed");
                return;
            }
        };
        for job_id in touched {
            self.in_flight.lock().remove(&job_id);
            if let Ok(Some(record)) = self.job_manager.get(&job_id) {
                self.emit_job(ChangeType::JobFailed, &record).await;
            }
        }
    }

    async fn emit_job(&self, change_type: ChangeType, record: &JobRecord) {
        self.emit(change_type, record.id.to_string(), json!(record)).await;
    }

    async fn emit(&self, change_type: ChangeType, id: impl Into<String>, update: serde_json::Value) {
        self.change_bus.emit(&self.clock, Change::new(id, change_type, update)).await;
    }

    async fn emit_with_error(&self, change_type: ChangeType, id: impl Into<String>, update: serde_json::Value, error: bool) {
        self.change_bus
            .emit(&self.clock, Change::new(id, change_type, update).with_error(error))
            .await;
    }

    pub fn job_manager(&self) -> &Arc<JobManager<C>> {
        &self.job_manager
    }
}

#[cfg(test)]
#[path = "dispatcher_tests.rs"]
mod tests;

//! Engine - background execution of toolchain work
//!
//! The Engine owns the toolchain and runner and moves each long-running job
//! (build, compile, setup) onto a tokio task, so callers stay responsive and
//! receive progress as a stream of [`Fragment`]s.
//!
//! At most one job runs at a time. Build runs also hold the cross-process
//! [`UploadLock`].

use std::future::Future;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use robotarium_core::prelude::*;
use robotarium_core::{BuildReport, CommandResult, Device, Fragment, ProjectPath, ReportSink};
use robotarium_toolchain::{
    BuildUploadPipeline, CliRunner, DeviceLocator, DeviceSelection, ProcessRunner, RunOptions,
    StepOutcome, Toolchain, ToolchainInitializer,
};

use crate::config::Settings;
use crate::upload_lock::UploadLock;

/// A job running in the background.
pub struct EngineRun<T> {
    /// Progress, in order. Closes when the job ends.
    pub fragments: mpsc::UnboundedReceiver<Fragment>,

    pub handle: JoinHandle<Result<T>>,
}

impl<T> EngineRun<T> {
    /// Feed every fragment to `sink` as it arrives, then return the job's result.
    pub async fn forward<S: ReportSink>(mut self, sink: &mut S) -> Result<T> {
        while let Some(fragment) = self.fragments.recv().await {
            sink.report(fragment);
        }
        self.handle
            .await
            .map_err(|e| Error::task_failed(e.to_string()))?
    }
}

/// Clears the busy flag when the job ends, however it ends.
struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl BusyGuard {
    fn claim(busy: &Arc<AtomicBool>) -> Result<Self> {
        busy.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| Error::PipelineBusy)?;
        Ok(Self {
            busy: Arc::clone(busy),
        })
    }
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Everything a job holds until it finishes
struct Claim {
    _busy: BusyGuard,
    _upload_lock: Option<UploadLock>,
}

/// Orchestration engine for Robotarium.
pub struct Engine<R = CliRunner> {
    runner: Arc<R>,
    toolchain: Arc<Toolchain>,
    selection: DeviceSelection,

    /// Cross-process lock taken by build runs. None disables it.
    lock_path: Option<PathBuf>,

    busy: Arc<AtomicBool>,

    /// Send `true` to abort the in-flight command.
    cancel_tx: watch::Sender<bool>,
}

impl Engine<CliRunner> {
    /// Engine for the toolchain described by `settings`, with the default
    /// upload lock.
    pub fn new(settings: &Settings) -> Self {
        Self::with_toolchain(settings.toolchain(), settings.run_options())
            .with_upload_lock(UploadLock::default_path())
    }

    /// Engine running real processes, wired for [`Engine::cancel`].
    pub fn with_toolchain(toolchain: Toolchain, options: RunOptions) -> Self {
        let (cancel_tx, cancel_rx) = watch::channel(false);
        let runner = CliRunner::with_options(options).with_cancellation(cancel_rx);
        Self::assemble(runner, toolchain, cancel_tx)
    }
}

impl<R> Engine<R>
where
    R: ProcessRunner + Send + Sync + 'static,
{
    /// Engine around a custom runner. [`Engine::cancel`] does not interrupt
    /// a command the runner is already executing; use
    /// [`Engine::with_toolchain`] for a cancellable [`CliRunner`].
    pub fn with_runner(runner: R, toolchain: Toolchain) -> Self {
        let (cancel_tx, _) = watch::channel(false);
        Self::assemble(runner, toolchain, cancel_tx)
    }

    fn assemble(runner: R, toolchain: Toolchain, cancel_tx: watch::Sender<bool>) -> Self {
        Self {
            runner: Arc::new(runner),
            toolchain: Arc::new(toolchain),
            selection: DeviceSelection::default(),
            lock_path: None,
            busy: Arc::new(AtomicBool::new(false)),
            cancel_tx,
        }
    }

    pub fn with_selection(mut self, selection: DeviceSelection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_upload_lock(mut self, path: impl Into<PathBuf>) -> Self {
        self.lock_path = Some(path.into());
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    /// Whether a job is currently running
    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Abort the command currently running, if any.
    pub fn cancel(&self) {
        if self.is_busy() {
            info!("Cancelling running job");
        }
        self.cancel_tx.send_replace(true);
    }

    fn claim(&self, upload: bool) -> Result<Claim> {
        let busy = BusyGuard::claim(&self.busy)?;
        let upload_lock = match (&self.lock_path, upload) {
            (Some(path), true) => Some(UploadLock::acquire(path)?),
            _ => None,
        };
        self.cancel_tx.send_replace(false);
        Ok(Claim {
            _busy: busy,
            _upload_lock: upload_lock,
        })
    }

    fn launch<T, F, Fut>(&self, claim: Claim, job: F) -> EngineRun<T>
    where
        T: Send + 'static,
        F: FnOnce(Arc<R>, Arc<Toolchain>, mpsc::UnboundedSender<Fragment>) -> Fut,
        Fut: Future<Output = Result<T>> + Send + 'static,
    {
        let (tx, fragments) = mpsc::unbounded_channel();
        let work = job(Arc::clone(&self.runner), Arc::clone(&self.toolchain), tx);
        let handle = tokio::spawn(async move {
            let _claim = claim;
            work.await
        });
        EngineRun { fragments, handle }
    }

    /// Compile, locate and upload `project` in the background.
    ///
    /// Fails immediately with [`Error::PipelineBusy`] when another job is
    /// running here or another process holds the upload lock.
    pub fn spawn_build(&self, project: ProjectPath) -> Result<EngineRun<BuildReport>> {
        let claim = self.claim(true)?;
        let selection = self.selection.clone();
        info!("Starting build of {}", project.name());

        Ok(self.launch(claim, move |runner, toolchain, mut tx| async move {
            BuildUploadPipeline::new(runner.as_ref(), toolchain.as_ref())
                .with_selection(selection)
                .run(&project, &mut tx)
                .await
        }))
    }

    /// Compile `project` without uploading.
    pub fn spawn_compile(&self, project: ProjectPath) -> Result<EngineRun<CommandResult>> {
        let claim = self.claim(false)?;
        info!("Starting compile of {}", project.name());

        Ok(self.launch(claim, move |runner, toolchain, mut tx| async move {
            BuildUploadPipeline::new(runner.as_ref(), toolchain.as_ref())
                .compile(&project, &mut tx)
                .await
        }))
    }

    /// Run the three setup steps in the background.
    pub fn spawn_initialize(&self) -> Result<EngineRun<Vec<StepOutcome>>> {
        let claim = self.claim(false)?;
        info!("Starting toolchain setup");

        Ok(self.launch(claim, move |runner, toolchain, mut tx| async move {
            ToolchainInitializer::new(runner.as_ref(), toolchain.as_ref())
                .run_all(&mut tx)
                .await
        }))
    }

    /// Every attached serial board. Runs inline; not subject to the busy flag.
    pub async fn list_devices(&self) -> Result<Vec<Device>> {
        DeviceLocator::new(self.runner.as_ref(), self.toolchain.as_ref())
            .list()
            .await
    }
}

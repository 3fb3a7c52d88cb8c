//! Compile → locate → upload
//!
//! ```text
//! Compiling ──fail──────────────────────────────▶ Done (compile only)
//!     │ ok
//!     ▼
//! LocatingDevice ──none─────────────────────────▶ Done (no device)
//!     │ found
//!     ▼
//! Uploading ──ok / fail─────────────────────────▶ Done (full report)
//! ```
//!
//! Phases are strictly sequential: upload needs the compiled artifacts, and
//! the device lookup must reflect hardware attached *after* compiling.
//! Nothing is retried.

use chrono::Local;

use robotarium_core::prelude::*;
use robotarium_core::{BuildReport, CommandResult, Fragment, PipelinePhase, ProjectPath, ReportSink};

use super::commands::Toolchain;
use super::devices::{DeviceLocator, DeviceSelection};
use super::process::ProcessRunner;

pub const MSG_HEADER: &str = "COMPILING AND RUNNING";
pub const MSG_COMPILE_SUCCESS: &str = "COMPILE SUCCESS";
pub const MSG_COMPILE_FAILED: &str = "COMPILE FAILED, check above errors!";
pub const MSG_DEVICE_FOUND: &str = "DEVICE FOUND";
pub const MSG_DEVICE_NOT_CONNECTED: &str = "DEVICE NOT CONNECTED!";
pub const MSG_UPLOAD_SUCCESS: &str = "RAN SUCCESSFULLY";
pub const MSG_UPLOAD_FAILED: &str = "FAILED TO RUN, check above errors!";

/// Builds a sketch and flashes it onto the attached board.
pub struct BuildUploadPipeline<'a, R> {
    runner: &'a R,
    toolchain: &'a Toolchain,
    selection: DeviceSelection,
}

impl<'a, R: ProcessRunner + Sync> BuildUploadPipeline<'a, R> {
    pub fn new(runner: &'a R, toolchain: &'a Toolchain) -> Self {
        Self {
            runner,
            toolchain,
            selection: DeviceSelection::default(),
        }
    }

    pub fn with_selection(mut self, selection: DeviceSelection) -> Self {
        self.selection = selection;
        self
    }

    /// Run the full pipeline for `project`.
    ///
    /// Compile failure and a missing board are reported in the returned
    /// [`BuildReport`], not as errors. `Err` means a toolchain process could
    /// not be run at all.
    #[instrument(skip_all, fields(project = %project.name()))]
    pub async fn run<S: ReportSink>(
        &self,
        project: &ProjectPath,
        sink: &mut S,
    ) -> Result<BuildReport> {
        sink.report(Fragment::info(format!(
            "[{}] {}",
            Local::now().format("%Y/%m/%d %H:%M:%S"),
            MSG_HEADER
        )));

        let compile = self.compile(project, sink).await?;
        if !compile.success() {
            enter(PipelinePhase::Done);
            return Ok(BuildReport::compile_failed(compile));
        }

        enter(PipelinePhase::LocatingDevice);
        let device = DeviceLocator::new(self.runner, self.toolchain)
            .with_selection(self.selection.clone())
            .locate()
            .await?;

        let Some(device) = device else {
            sink.report(Fragment::info(MSG_DEVICE_NOT_CONNECTED));
            enter(PipelinePhase::Done);
            return Ok(BuildReport::device_not_found(compile));
        };
        sink.report(Fragment::success(format!(
            "{} : {}",
            MSG_DEVICE_FOUND, device.identifier
        )));

        enter(PipelinePhase::Uploading);
        let upload = self
            .runner
            .run(&self.toolchain.upload(&device.identifier, project.dir()))
            .await?;

        sink.report(Fragment::info(upload.output.clone()));
        if upload.success() {
            sink.report(Fragment::success(MSG_UPLOAD_SUCCESS));
        } else {
            warn!("Upload to {} failed with code {}", device, upload.exit_code);
            sink.report(Fragment::failure(MSG_UPLOAD_FAILED));
        }

        enter(PipelinePhase::Done);
        Ok(BuildReport::uploaded(compile, device, upload))
    }

    /// Compile phase alone.
    pub async fn compile<S: ReportSink>(
        &self,
        project: &ProjectPath,
        sink: &mut S,
    ) -> Result<CommandResult> {
        enter(PipelinePhase::Compiling);
        let compile = self
            .runner
            .run(&self.toolchain.compile(project.dir()))
            .await?;

        sink.report(Fragment::info(compile.output.clone()));
        if compile.success() {
            sink.report(Fragment::success(MSG_COMPILE_SUCCESS));
        } else {
            warn!("Compile failed with code {}", compile.exit_code);
            sink.report(Fragment::failure(MSG_COMPILE_FAILED));
        }
        Ok(compile)
    }
}

fn enter(phase: PipelinePhase) {
    debug!(?phase, "pipeline phase");
}

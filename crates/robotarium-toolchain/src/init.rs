//! One-time toolchain setup
//!
//! Three steps in a fixed order, each relying on the state the previous one
//! left behind: write a default config, refresh the package index, install
//! the target core. Steps are run only when the caller asks for the next one
//! so progress can be shown as it happens.

use futures_util::stream::{self, Stream};
use serde::Serialize;

use robotarium_core::prelude::*;
use robotarium_core::{CommandResult, Fragment, ReportSink};

use super::commands::{Invocation, Toolchain};
use super::process::ProcessRunner;

/// A single setup step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InitStep {
    ConfigInit,
    UpdateIndex,
    CoreInstall,
}

impl InitStep {
    /// Execution order
    pub const ALL: [InitStep; 3] = [
        InitStep::ConfigInit,
        InitStep::UpdateIndex,
        InitStep::CoreInstall,
    ];

    pub fn invocation(&self, toolchain: &Toolchain) -> Invocation {
        match self {
            InitStep::ConfigInit => toolchain.config_init(),
            InitStep::UpdateIndex => toolchain.update_index(),
            InitStep::CoreInstall => toolchain.core_install(),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            InitStep::ConfigInit => "Initializing toolchain configuration",
            InitStep::UpdateIndex => "Updating package index",
            InitStep::CoreInstall => "Installing board core",
        }
    }
}

/// Result of one executed step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepOutcome {
    pub step: InitStep,
    pub result: CommandResult,
}

/// Entry point for toolchain setup.
pub struct ToolchainInitializer<'a, R> {
    runner: &'a R,
    toolchain: &'a Toolchain,
}

impl<'a, R: ProcessRunner + Sync> ToolchainInitializer<'a, R> {
    pub fn new(runner: &'a R, toolchain: &'a Toolchain) -> Self {
        Self { runner, toolchain }
    }

    /// A fresh cursor over the setup steps. Nothing runs until
    /// [`InitSequence::next_step`] is awaited.
    pub fn steps(&self) -> InitSequence<'a, R> {
        InitSequence {
            runner: self.runner,
            toolchain: self.toolchain,
            position: 0,
        }
    }

    /// Run all steps, reporting each as it finishes.
    ///
    /// A failing step does not stop the later ones; a spawn failure does,
    /// since the remaining steps would fail the same way.
    pub async fn run_all<S: ReportSink>(&self, sink: &mut S) -> Result<Vec<StepOutcome>> {
        let mut steps = self.steps();
        let mut outcomes = Vec::with_capacity(InitStep::ALL.len());

        while let Some(next) = steps.next_step().await {
            let outcome = next?;
            report_step(sink, &outcome);
            outcomes.push(outcome);
        }

        Ok(outcomes)
    }
}

fn report_step<S: ReportSink>(sink: &mut S, outcome: &StepOutcome) {
    let description = outcome.step.description();
    sink.report(Fragment::info(outcome.result.output.clone()));
    if outcome.result.success() {
        sink.report(Fragment::success(format!("{}: done", description)));
    } else {
        sink.report(Fragment::failure(format!(
            "{}: failed with exit code {}",
            description, outcome.result.exit_code
        )));
    }
}

/// Caller-driven cursor over [`InitStep::ALL`].
pub struct InitSequence<'a, R> {
    runner: &'a R,
    toolchain: &'a Toolchain,
    position: usize,
}

impl<'a, R: ProcessRunner + Sync> InitSequence<'a, R> {
    /// Run the next step, or `None` once all steps have been yielded.
    ///
    /// A spawn error is yielded for its step; the cursor still advances.
    pub async fn next_step(&mut self) -> Option<Result<StepOutcome>> {
        let step = *InitStep::ALL.get(self.position)?;
        self.position += 1;

        info!("Toolchain setup step {}/3: {:?}", self.position, step);
        let result = self.runner.run(&step.invocation(self.toolchain)).await;
        Some(result.map(|result| StepOutcome { step, result }))
    }

    /// Steps not yet run
    pub fn remaining(&self) -> usize {
        InitStep::ALL.len() - self.position
    }

    /// Adapt the cursor into a stream; each poll for an item runs one step.
    pub fn into_stream(self) -> impl Stream<Item = Result<StepOutcome>> + 'a
    where
        R: 'a,
    {
        stream::unfold(self, |mut seq| async move {
            let item = seq.next_step().await?;
            Some((item, seq))
        })
    }
}

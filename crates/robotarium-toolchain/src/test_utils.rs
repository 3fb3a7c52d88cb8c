//! Test utilities for toolchain orchestration
//!
//! Provides [`ScriptedRunner`], a [`ProcessRunner`] that answers each
//! toolchain subcommand from a script and records every invocation.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use robotarium_core::{CommandResult, Error, Result};

use super::commands::{Invocation, ToolchainCommand};
use super::process::ProcessRunner;

#[derive(Debug, Clone)]
enum Scripted {
    Output(CommandResult),
    SpawnFailure,
}

/// A fake runner with canned responses per [`ToolchainCommand`].
///
/// Responses queued for a command are returned in order; the last one keeps
/// repeating. Unscripted commands succeed with empty output.
#[derive(Debug, Default)]
pub struct ScriptedRunner {
    script: Mutex<HashMap<ToolchainCommand, VecDeque<Scripted>>>,
    calls: Mutex<Vec<Invocation>>,
}

impl ScriptedRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response for `command`.
    pub fn respond(self, command: ToolchainCommand, output: &str, exit_code: i32) -> Self {
        self.push(
            command,
            Scripted::Output(CommandResult::new(output, exit_code)),
        );
        self
    }

    /// Make `command` fail as if the executable could not be started.
    pub fn fail_spawn(self, command: ToolchainCommand) -> Self {
        self.push(command, Scripted::SpawnFailure);
        self
    }

    fn push(&self, command: ToolchainCommand, response: Scripted) {
        self.script
            .lock()
            .expect("script lock")
            .entry(command)
            .or_default()
            .push_back(response);
    }

    /// Every invocation received, in order
    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.lock().expect("calls lock").clone()
    }

    /// Subcommands received, in order
    pub fn commands(&self) -> Vec<ToolchainCommand> {
        self.calls().iter().filter_map(|c| c.command).collect()
    }

    /// Number of times `command` was invoked
    pub fn count(&self, command: ToolchainCommand) -> usize {
        self.commands().iter().filter(|c| **c == command).count()
    }

    fn answer(&self, invocation: &Invocation) -> Result<CommandResult> {
        self.calls.lock().expect("calls lock").push(invocation.clone());

        let Some(command) = invocation.command else {
            return Ok(CommandResult::new("", 0));
        };

        let mut script = self.script.lock().expect("script lock");
        let response = match script.get_mut(&command) {
            Some(queue) if queue.len() > 1 => queue.pop_front(),
            Some(queue) => queue.front().cloned(),
            None => None,
        };

        match response {
            Some(Scripted::Output(result)) => Ok(result),
            Some(Scripted::SpawnFailure) => Err(Error::ToolchainNotFound {
                program: invocation.program.to_string_lossy().into_owned(),
            }),
            None => Ok(CommandResult::new("", 0)),
        }
    }
}

impl ProcessRunner for ScriptedRunner {
    async fn run(&self, invocation: &Invocation) -> Result<CommandResult> {
        self.answer(invocation)
    }
}

//! Command dispatch

use std::path::Path;

use robotarium_app::{
    default_settings_path, load_settings_with_status, update_setting, Engine, EngineRun,
    LoadStatus, Settings,
};
use robotarium_core::prelude::*;
use robotarium_core::ProjectPath;
use robotarium_toolchain::{DeviceSelection, ToolAvailability};

use crate::cli::{Args, Command};
use crate::output::Output;

/// Run one command. `Ok(false)` means the command ran but did not succeed
/// (compile failed, no board, toolchain missing, ...).
///
/// In headless mode errors are emitted as events and reported as
/// `Ok(false)`; otherwise they are returned.
pub async fn run(args: Args) -> Result<bool> {
    let settings_path = args.settings.clone().unwrap_or_else(default_settings_path);
    let (mut settings, status) = load_settings_with_status(&settings_path);
    let store = SettingsStore {
        path: &settings_path,
        status,
    };
    let output = Output::new(args.headless);

    info!("Running {} with settings {:?}", args.command.name(), settings_path);
    output.started(args.command.name(), &settings.display());

    match dispatch(&args.command, store, &mut settings, output).await {
        Ok(succeeded) => Ok(succeeded),
        Err(e) if output.is_headless() => {
            error!("{} failed: {}", args.command.name(), e);
            output.error(&e);
            Ok(false)
        }
        Err(e) => Err(e),
    }
}

/// Where settings came from, and whether they may be saved back there.
#[derive(Debug, Clone, Copy)]
struct SettingsStore<'a> {
    path: &'a Path,
    status: LoadStatus,
}

async fn dispatch(
    command: &Command,
    store: SettingsStore<'_>,
    settings: &mut Settings,
    mut output: Output,
) -> Result<bool> {
    match command {
        Command::Init => {
            let engine = Engine::new(settings);
            let outcomes = drive(&engine, engine.spawn_initialize()?, &mut output).await?;
            for outcome in &outcomes {
                output.step_finished(outcome);
            }
            Ok(outcomes.iter().all(|o| o.result.success()))
        }

        Command::Compile { path } => {
            let project = resolve_project(path.as_deref(), store, settings)?;
            let engine = Engine::new(settings);
            let result = drive(&engine, engine.spawn_compile(project)?, &mut output).await?;
            output.compile_finished(&result);
            Ok(result.success())
        }

        Command::Run { path, port } => {
            let project = resolve_project(path.as_deref(), store, settings)?;
            let selection = match port {
                Some(port) => DeviceSelection::Port(port.clone()),
                None => DeviceSelection::FirstSerial,
            };
            let engine = Engine::new(settings).with_selection(selection);
            let report = drive(&engine, engine.spawn_build(project)?, &mut output).await?;
            output.build_finished(&report);
            Ok(report.succeeded())
        }

        Command::Devices => {
            let engine = Engine::new(settings);
            let devices = engine.list_devices().await?;
            output.devices(&devices);
            Ok(true)
        }

        Command::Check => {
            let availability = ToolAvailability::check(settings.toolchain().executable());
            output.availability(&availability);
            Ok(availability.available)
        }

        Command::Set { key, value } => {
            if !store.status.can_write_back() {
                return Err(Error::config(format!(
                    "{:?} could not be fully read; fix it before changing settings",
                    store.path
                )));
            }
            let value = parse_value(value);
            update_setting(store.path, settings, key, value.clone())?;
            output.setting_updated(key, &value);
            Ok(true)
        }
    }
}

/// Forward a job's fragments to `output` until it ends. Ctrl-C cancels the
/// running command instead of killing Robotarium mid-upload.
async fn drive<T>(engine: &Engine, run: EngineRun<T>, output: &mut Output) -> Result<T> {
    let forward = run.forward(output);
    tokio::pin!(forward);

    tokio::select! {
        result = &mut forward => result,
        Ok(()) = tokio::signal::ctrl_c() => {
            warn!("Interrupted, cancelling");
            engine.cancel();
            forward.await
        }
    }
}

/// Explicit path, else the last project, else the current directory.
///
/// A project opened from an explicit path is remembered in settings, unless
/// the settings file could not be fully read.
fn resolve_project(
    path: Option<&Path>,
    store: SettingsStore<'_>,
    settings: &mut Settings,
) -> Result<ProjectPath> {
    let Some(path) = path else {
        let dir = match &settings.project {
            Some(dir) => dir.clone(),
            None => std::env::current_dir()?,
        };
        return ProjectPath::open(dir);
    };

    let project = ProjectPath::open(path)?;
    if settings.project.as_deref() == Some(project.dir()) {
        return Ok(project);
    }
    if !store.status.can_write_back() {
        warn!("Not remembering project {:?}: settings file is invalid", project.dir());
        return Ok(project);
    }

    let remembered = serde_json::to_value(project.dir())
        .map_err(Error::from)
        .and_then(|value| update_setting(store.path, settings, "project", value));
    if let Err(e) = remembered {
        warn!("Failed to remember project {:?}: {}", project.dir(), e);
    }
    Ok(project)
}

/// JSON if it parses, otherwise the raw text as a string.
fn parse_value(raw: &str) -> serde_json::Value {
    serde_json::from_str(raw).unwrap_or_else(|_| serde_json::Value::String(raw.to_string()))
}

//! `arduino-cli` command shapes
//!
//! Commands are built as argument vectors and executed without a shell, so a
//! project path or port name containing spaces, quotes or `;` reaches the
//! toolchain as a single literal argument. Flag names and order match what
//! `arduino-cli` expects.

use std::ffi::{OsStr, OsString};
use std::path::Path;

/// Default toolchain executable
pub const DEFAULT_EXECUTABLE: &str = "arduino-cli";

/// Default fully qualified board name passed to compile/upload
pub const DEFAULT_FQBN: &str = "arduino:avr:uno";

/// Default core package installed during initialization
pub const DEFAULT_PLATFORM: &str = "arduino:avr";

/// Which toolchain subcommand an [`Invocation`] runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolchainCommand {
    ConfigInit,
    UpdateIndex,
    CoreInstall,
    Compile,
    BoardList,
    Upload,
}

impl ToolchainCommand {
    pub fn label(&self) -> &'static str {
        match self {
            ToolchainCommand::ConfigInit => "config init",
            ToolchainCommand::UpdateIndex => "core update-index",
            ToolchainCommand::CoreInstall => "core install",
            ToolchainCommand::Compile => "compile",
            ToolchainCommand::BoardList => "board list",
            ToolchainCommand::Upload => "upload",
        }
    }
}

/// A program plus discrete arguments, ready to spawn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: OsString,
    pub args: Vec<OsString>,
    /// Set for invocations built by [`Toolchain`]
    pub command: Option<ToolchainCommand>,
}

impl Invocation {
    pub fn new(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            command: None,
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    fn tagged(mut self, command: ToolchainCommand) -> Self {
        self.command = Some(command);
        self
    }
}

impl std::fmt::Display for Invocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program.to_string_lossy())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Toolchain executable plus the board/platform it targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toolchain {
    pub executable: OsString,
    /// Fully qualified board name, e.g. `arduino:avr:uno`
    pub fqbn: String,
    /// Core package, e.g. `arduino:avr`
    pub platform: String,
    /// Placed before every subcommand (e.g. `--config-file <path>`)
    pub global_args: Vec<OsString>,
}

impl Default for Toolchain {
    fn default() -> Self {
        Self {
            executable: DEFAULT_EXECUTABLE.into(),
            fqbn: DEFAULT_FQBN.to_string(),
            platform: DEFAULT_PLATFORM.to_string(),
            global_args: Vec::new(),
        }
    }
}

impl Toolchain {
    pub fn new(executable: impl Into<OsString>) -> Self {
        Self {
            executable: executable.into(),
            ..Self::default()
        }
    }

    pub fn with_fqbn(mut self, fqbn: impl Into<String>) -> Self {
        self.fqbn = fqbn.into();
        self
    }

    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    pub fn with_global_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.global_args = args.into_iter().map(Into::into).collect();
        self
    }

    fn base(&self) -> Invocation {
        Invocation::new(&self.executable).args(self.global_args.iter().cloned())
    }

    /// `config init`
    pub fn config_init(&self) -> Invocation {
        self.base()
            .args(["config", "init"])
            .tagged(ToolchainCommand::ConfigInit)
    }

    /// `core update-index`
    pub fn update_index(&self) -> Invocation {
        self.base()
            .args(["core", "update-index"])
            .tagged(ToolchainCommand::UpdateIndex)
    }

    /// `core install <platform-id>`
    pub fn core_install(&self) -> Invocation {
        self.base()
            .args(["core", "install"])
            .arg(&self.platform)
            .tagged(ToolchainCommand::CoreInstall)
    }

    /// `compile --fqbn <board-id> <project-path>`
    pub fn compile(&self, project: &Path) -> Invocation {
        self.base()
            .args(["compile", "--fqbn"])
            .arg(&self.fqbn)
            .arg(project.as_os_str())
            .tagged(ToolchainCommand::Compile)
    }

    /// `board list`
    pub fn board_list(&self) -> Invocation {
        self.base()
            .args(["board", "list"])
            .tagged(ToolchainCommand::BoardList)
    }

    /// `upload -p <device-id> --fqbn <board-id> <project-path>`
    pub fn upload(&self, port: &str, project: &Path) -> Invocation {
        self.base()
            .args(["upload", "-p"])
            .arg(port)
            .arg("--fqbn")
            .arg(&self.fqbn)
            .arg(project.as_os_str())
            .tagged(ToolchainCommand::Upload)
    }

    pub fn executable(&self) -> &OsStr {
        &self.executable
    }
}

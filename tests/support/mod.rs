//! Shell-script stand-in for arduino-cli
//!
//! The script records every invocation to `calls.log`, prints plausible
//! output for each subcommand, and fails on request:
//! - `compile` fails (with colored stderr) when the sketch contains `BROKEN`
//! - `board list` prints whatever was last passed to [`FakeToolchain::set_boards`]
//! - `upload` fails for port `/dev/ttyBROKEN`

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use robotarium_app::Settings;
use robotarium_toolchain::Toolchain;

pub const UNO_ON_ACM0: &str = "\
Port         Protocol Type              Board Name  FQBN            Core
/dev/ttyACM0 serial   Serial Port (USB) Arduino Uno arduino:avr:uno arduino:avr
";

pub struct FakeToolchain {
    pub dir: TempDir,
    script: PathBuf,
}

impl FakeToolchain {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("arduino-cli.sh");
        let root = dir.path().display().to_string();

        let body = format!(
            r#"echo "$@" >> '{root}/calls.log'
case "$1" in
  config) echo "Config file written to: {root}/arduino-cli.yaml" ;;
  core)
    case "$2" in
      update-index) echo "Downloading index: package_index.tar.bz2 downloaded" ;;
      install) echo "Platform $3 installed" ;;
    esac ;;
  compile)
    if grep -q BROKEN "$4/$(basename "$4").ino"; then
      printf '\033[1;31merror:\033[0m expected semicolon\n' >&2
      exit 1
    fi
    echo "Sketch uses 924 bytes (2%) of program storage space." ;;
  board) cat '{root}/boards.txt' ;;
  upload)
    if [ "$3" = "/dev/ttyBROKEN" ]; then
      echo "avrdude: ser_open(): can't open device $3" >&2
      exit 1
    fi
    echo "Uploaded to $3" ;;
  *) echo "unknown command $1" >&2; exit 2 ;;
esac
"#
        );
        fs::write(&script, body).unwrap();

        let fake = Self { dir, script };
        fake.set_boards("No boards found.\n");
        fake
    }

    /// Run through `sh` so the script never needs the executable bit
    pub fn toolchain(&self) -> Toolchain {
        Toolchain::new("sh").with_global_args([self.script.as_os_str()])
    }

    pub fn settings(&self) -> Settings {
        Settings {
            executable: "sh".to_string(),
            global_args: vec![self.script.display().to_string()],
            ..Settings::default()
        }
    }

    pub fn set_boards(&self, listing: &str) {
        fs::write(self.dir.path().join("boards.txt"), listing).unwrap();
    }

    /// Argument lists received so far, one per invocation
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.dir.path().join("calls.log"))
            .map(|log| log.lines().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Create `<dir>/<name>/<name>.ino`
    pub fn sketch(&self, name: &str, source: &str) -> PathBuf {
        let dir = self.dir.path().join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{}.ino", name)), source).unwrap();
        dir
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

pub fn canonical(path: &Path) -> PathBuf {
    fs::canonicalize(path).unwrap()
}

//! Sketch project layout
//!
//! A project is a directory whose primary source file is
//! `<dir>/<basename-of-dir>.ino`, the layout `arduino-cli` expects.

use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// File extension of the primary sketch file
pub const SKETCH_EXTENSION: &str = "ino";

/// A validated sketch directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectPath {
    dir: PathBuf,
    name: String,
}

impl ProjectPath {
    /// Validate `dir` as a sketch project.
    ///
    /// Fails with [`Error::NoProject`] when `dir` is not a directory and with
    /// [`Error::MissingSketch`] when `<dir>/<name>.ino` does not exist.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(Error::no_project(dir));
        }

        // dunce avoids `\\?\` prefixes on Windows, which arduino-cli rejects
        let dir = dunce::canonicalize(dir)?;
        let name = dir
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .ok_or_else(|| Error::no_project(&dir))?;

        let project = Self { dir, name };
        let sketch = project.sketch_file();
        if !sketch.is_file() {
            return Err(Error::missing_sketch(sketch));
        }

        tracing::debug!("Opened sketch project {:?}", project.dir);
        Ok(project)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Sketch name (directory basename)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Path of the primary sketch file
    pub fn sketch_file(&self) -> PathBuf {
        self.dir.join(format!("{}.{}", self.name, SKETCH_EXTENSION))
    }

    /// Read the sketch source for display.
    ///
    /// A single trailing blank line is dropped so editors don't show a
    /// phantom empty last line.
    pub fn read_source(&self) -> Result<String> {
        let content = std::fs::read_to_string(self.sketch_file())?;
        Ok(normalize_source(&content))
    }
}

fn normalize_source(content: &str) -> String {
    let mut lines: Vec<&str> = content.split('\n').collect();
    if lines.len() > 1 && lines.last().is_some_and(|l| l.trim().is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_sketch(root: &Path, name: &str, body: &str) -> PathBuf {
        let dir = root.join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join(format!("{}.ino", name)), body).unwrap();
        dir
    }

    #[test]
    fn test_open_valid_project() {
        let temp = TempDir::new().unwrap();
        let dir = create_sketch(temp.path(), "Blink", "void setup() {}\n");

        let project = ProjectPath::open(&dir).unwrap();
        assert_eq!(project.name(), "Blink");
        assert!(project.sketch_file().ends_with("Blink/Blink.ino"));
    }

    #[test]
    fn test_open_missing_sketch() {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("Blink");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("Other.ino"), "").unwrap();

        let err = ProjectPath::open(&dir).unwrap_err();
        assert!(matches!(err, Error::MissingSketch { .. }));
        assert!(err.to_string().contains("Blink.ino"));
    }

    #[test]
    fn test_open_not_a_directory() {
        let temp = TempDir::new().unwrap();
        let err = ProjectPath::open(temp.path().join("absent")).unwrap_err();
        assert!(matches!(err, Error::NoProject { .. }));
    }

    #[test]
    fn test_read_source_drops_one_trailing_blank_line() {
        let temp = TempDir::new().unwrap();
        let dir = create_sketch(temp.path(), "Blink", "void setup() {}\nvoid loop() {}\n");

        let project = ProjectPath::open(&dir).unwrap();
        assert_eq!(
            project.read_source().unwrap(),
            "void setup() {}\nvoid loop() {}"
        );
    }

    #[test]
    fn test_normalize_source() {
        assert_eq!(normalize_source("a\nb"), "a\nb");
        assert_eq!(normalize_source("a\n  \n"), "a\n  ");
        assert_eq!(normalize_source(""), "");
        assert_eq!(normalize_source("\n"), "");
    }
}

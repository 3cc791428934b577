//! Discovery and loading of backport target files on disk.
//!
//! Each target lives in `<root>/<name>.yaml`; the file name without the
//! extension is the target name.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Result, UcaError};
use crate::obs;
use crate::schema::TargetFile;

/// Suffix stripped from file names to obtain target names.
pub const TARGET_FILE_SUFFIX: &str = ".yaml";

/// Directory used when none is configured.
pub const DEFAULT_BACKPORTS_DIR: &str = "backports";

/// A directory of backport target files.
#[derive(Debug, Clone)]
pub struct TargetDir {
    root: PathBuf,
}

impl TargetDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Paths of all target files, sorted. Subdirectories are not searched.
    pub fn files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let path = entry?.path();
            if path.is_file() && target_name(&path).is_some() {
                files.push(path);
            }
        }
        files.sort();
        Ok(files)
    }

    /// Names of all targets, sorted.
    pub fn names(&self) -> Result<Vec<String>> {
        Ok(self
            .files()?
            .iter()
            .filter_map(|path| target_name(path))
            .collect())
    }

    /// Path of the file backing `name`.
    ///
    /// # Errors
    ///
    /// `UcaError::TargetNotFound` if there is no such file, or if `name`
    /// is not a plain file name.
    pub fn path_for(&self, name: &str) -> Result<PathBuf> {
        let plain = !name.is_empty()
            && !name.contains(['/', '\\'])
            && name != "."
            && name != "..";
        let path = self.root.join(format!("{name}{TARGET_FILE_SUFFIX}"));
        if plain && path.is_file() {
            Ok(path)
        } else {
            Err(UcaError::TargetNotFound(name.to_string()))
        }
    }

    /// Load and validate the target called `name`.
    pub fn load(&self, name: &str) -> Result<TargetFile> {
        load_target_file(&self.path_for(name)?)
    }

    /// Load every target in the directory, stopping at the first failure.
    pub fn load_all(&self) -> Result<Vec<TargetFile>> {
        self.files()?
            .iter()
            .map(|path| load_target_file(path))
            .collect()
    }
}

/// Target name for a file path, if it carries the target suffix.
pub fn target_name(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?.strip_suffix(TARGET_FILE_SUFFIX)?;
    (!name.is_empty()).then(|| name.to_string())
}

/// Read and validate one target file. The target name is the file name
/// without its suffix.
pub fn load_target_file(path: &Path) -> Result<TargetFile> {
    let name = target_name(path).unwrap_or_else(|| {
        path.file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    });
    let text = fs::read_to_string(path)?;

    match TargetFile::parse(&name, &text) {
        Ok(target) => {
            obs::emit_target_loaded(&name, target.len());
            Ok(target.with_path(path))
        }
        Err(source) => {
            obs::emit_target_invalid(&name, &source);
            Err(UcaError::Schema {
                target: name,
                source,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_name_strips_suffix() {
        assert_eq!(
            target_name(Path::new("/x/jammy-caracal.yaml")),
            Some("jammy-caracal".to_string())
        );
        assert_eq!(target_name(Path::new("/x/README.md")), None);
        assert_eq!(target_name(Path::new("/x/.yaml")), None);
        assert_eq!(target_name(Path::new("/x/notes.yml")), None);
    }

    #[test]
    fn test_path_for_rejects_traversal() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("ok.yaml"), "[]").unwrap();
        let targets = TargetDir::new(dir.path());

        assert!(targets.path_for("ok").is_ok());
        for name in ["", "..", "../ok", "sub/ok"] {
            assert!(
                matches!(targets.path_for(name), Err(UcaError::TargetNotFound(_))),
                "{name:?} should not resolve"
            );
        }
    }
}

// ABOUTME: Locates the cf executable and inspects build output directories.
// ABOUTME: An explicit path from config wins over a PATH search.

use std::path::{Path, PathBuf};

/// Finds files the CLI-driven deployment depends on.
pub trait FileLocator: Send + Sync {
    /// Full path to the `cf` executable, if one can be found.
    fn cf_executable(&self) -> Option<PathBuf>;

    fn directory_contains_files(&self, dir: &Path) -> bool;
}

#[cfg(windows)]
const CF_EXECUTABLE: &str = "cf.exe";
#[cfg(not(windows))]
const CF_EXECUTABLE: &str = "cf";

/// Looks up `cf` on `PATH` unless an explicit location is configured.
#[derive(Debug, Clone, Default)]
pub struct PathLocator {
    explicit: Option<PathBuf>,
}

impl PathLocator {
    pub fn new(explicit: Option<PathBuf>) -> Self {
        Self { explicit }
    }
}

impl FileLocator for PathLocator {
    fn cf_executable(&self) -> Option<PathBuf> {
        if let Some(ref path) = self.explicit {
            return path.is_file().then(|| path.clone());
        }

        let search_path = std::env::var_os("PATH")?;
        std::env::split_paths(&search_path)
            .map(|dir| dir.join(CF_EXECUTABLE))
            .find(|candidate| candidate.is_file())
    }

    fn directory_contains_files(&self, dir: &Path) -> bool {
        crate::archive::directory_contains_files(dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn explicit_path_must_exist() {
        let locator = PathLocator::new(Some(PathBuf::from("/no/such/cf")));
        assert!(locator.cf_executable().is_none());
    }

    #[test]
    fn explicit_path_is_used_as_is() {
        let dir = TempDir::new().unwrap();
        let cf = dir.path().join("cf-custom");
        std::fs::write(&cf, "").unwrap();

        let locator = PathLocator::new(Some(cf.clone()));
        assert_eq!(locator.cf_executable(), Some(cf));
    }

    #[test]
    fn path_search_finds_executable() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CF_EXECUTABLE), "").unwrap();

        let found = temp_env::with_var("PATH", Some(dir.path()), || {
            PathLocator::default().cf_executable()
        });
        assert_eq!(found, Some(dir.path().join(CF_EXECUTABLE)));
    }
}

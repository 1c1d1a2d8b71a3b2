use std::{
    env, io,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

pub const APPLICATION_NAME: &str = "study-planner";

/// Name of the record file inside the application directory.
pub const RECORD_FILE_NAME: &str = "study_data.csv";

cfg_if::cfg_if! {
    if #[cfg(windows)] {
        fn state_home() -> Result<PathBuf> {
            env::var("APPDATA")
                .map(PathBuf::from)
                .context("APPDATA should be present on Windows")
        }
    } else {
        fn state_home() -> Result<PathBuf> {
            env::var("XDG_STATE_HOME")
                .map(PathBuf::from)
                .or_else(|_| env::var("HOME").map(|home| PathBuf::from(home).join(".local/state")))
                .context("Couldn't find neither XDG_STATE_HOME nor HOME")
        }
    }
}

pub fn create_application_default_path() -> Result<PathBuf> {
    let path = state_home()?.join(APPLICATION_NAME);
    create_application_path(path)
}

/// Makes sure the application directory exists.
pub fn create_application_path(path: PathBuf) -> Result<PathBuf> {
    match std::fs::create_dir_all(&path) {
        Ok(_) => Ok(path),
        Err(v) if v.kind() == io::ErrorKind::AlreadyExists => Ok(path),
        Err(v) => Err(v.into()),
    }
}

pub fn record_file_path(application_dir: &Path) -> PathBuf {
    application_dir.join(RECORD_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use super::{create_application_path, record_file_path};

    #[test]
    fn test_create_application_path() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("study-planner");

        assert_eq!(create_application_path(path.clone())?, path);
        assert!(path.is_dir());
        // Second call finds the directory in place.
        assert_eq!(create_application_path(path.clone())?, path);
        assert_eq!(record_file_path(&path), path.join("study_data.csv"));
        Ok(())
    }
}

use std::{
    env,
    path::{
        Path,
        PathBuf,
    },
};

use super::{
    FrontendMode,
    LaunchError,
};

#[derive(Debug, Clone)]
pub struct Runtimes {
    pub python: PathBuf,
    pub node: Option<PathBuf>,
    pub yarn: Option<PathBuf>,
}

impl Runtimes {
    pub fn detect(mode: FrontendMode) -> Result<Self, LaunchError> {
        let search: Vec<PathBuf> =
            env::var_os("PATH").map(|p| env::split_paths(&p).collect()).unwrap_or_default();
        Self::detect_in(&search, mode)
    }

    /// Python is always required; node and yarn only for the web frontend.
    pub fn detect_in(search: &[PathBuf], mode: FrontendMode) -> Result<Self, LaunchError> {
        let python = find_executable(search, &["python3", "python"]).ok_or_else(|| {
            LaunchError::MissingRuntime {
                name: "Python".to_string(),
                hint: "Install Python 3 from https://www.python.org/downloads/".to_string(),
            }
        })?;

        let (node, yarn) = match mode {
            FrontendMode::Native => (None, None),
            FrontendMode::Web => {
                let node = find_executable(search, &["node"]).ok_or_else(|| {
                    LaunchError::MissingRuntime {
                        name: "Node.js".to_string(),
                        hint: "Install Node.js from https://nodejs.org/".to_string(),
                    }
                })?;
                let yarn = find_executable(search, &["yarn"]).ok_or_else(|| {
                    LaunchError::MissingRuntime {
                        name: "Yarn".to_string(),
                        hint: "Install it with: npm install -g yarn".to_string(),
                    }
                })?;
                (Some(node), Some(yarn))
            }
        };

        Ok(Self { python, node, yarn })
    }
}

/// First match for any of `names`, trying them in order across `search`.
pub fn find_executable(search: &[PathBuf], names: &[&str]) -> Option<PathBuf> {
    names.iter().find_map(|name| {
        search.iter().find_map(|dir| {
            candidates(dir, name).into_iter().find(|path| is_executable(path))
        })
    })
}

#[cfg(windows)]
fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    ["exe", "cmd", "bat"].iter().map(|ext| dir.join(format!("{name}.{ext}"))).collect()
}

#[cfg(not(windows))]
fn candidates(dir: &Path, name: &str) -> Vec<PathBuf> {
    vec![dir.join(name)]
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata().map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0).unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

#[cfg(all(test, unix))]
mod tests {
    use std::{
        fs,
        os::unix::fs::PermissionsExt,
    };

    use super::*;

    fn fake_tool(dir: &Path, name: &str, executable: bool) {
        let path = dir.join(name);
        fs::write(&path, "#!/bin/sh\n").unwrap();
        let mode = if executable { 0o755 } else { 0o644 };
        fs::set_permissions(&path, fs::Permissions::from_mode(mode)).unwrap();
    }

    #[test]
    fn prefers_python3_over_python() {
        let dir = tempfile::tempdir().unwrap();
        fake_tool(dir.path(), "python", true);
        fake_tool(dir.path(), "python3", true);

        let runtimes = Runtimes::detect_in(&[dir.path().to_path_buf()], FrontendMode::Native).unwrap();
        assert_eq!(runtimes.python, dir.path().join("python3"));
        assert!(runtimes.node.is_none());
    }

    #[test]
    fn falls_back_to_python_and_skips_non_executables() {
        let dir = tempfile::tempdir().unwrap();
        fake_tool(dir.path(), "python3", false);
        fake_tool(dir.path(), "python", true);

        let found = find_executable(&[dir.path().to_path_buf()], &["python3", "python"]);
        assert_eq!(found, Some(dir.path().join("python")));
    }

    #[test]
    fn missing_python_exits_with_one() {
        let dir = tempfile::tempdir().unwrap();
        let err = Runtimes::detect_in(&[dir.path().to_path_buf()], FrontendMode::Native).unwrap_err();
        assert!(matches!(&err, LaunchError::MissingRuntime { name, .. } if name == "Python"));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn web_mode_needs_node_and_yarn() {
        let dir = tempfile::tempdir().unwrap();
        fake_tool(dir.path(), "python3", true);
        fake_tool(dir.path(), "node", true);
        let search = [dir.path().to_path_buf()];

        let err = Runtimes::detect_in(&search, FrontendMode::Web).unwrap_err();
        assert!(matches!(&err, LaunchError::MissingRuntime { name, .. } if name == "Yarn"));

        fake_tool(dir.path(), "yarn", true);
        let runtimes = Runtimes::detect_in(&search, FrontendMode::Web).unwrap();
        assert_eq!(runtimes.yarn, Some(dir.path().join("yarn")));
    }
}

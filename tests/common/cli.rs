use assert_cmd::Command;
use std::ffi::OsStr;
use std::fs;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tempfile::TempDir;

/// Environment variables that would leak outer configuration into a run.
const ISOLATED_VARS: &[&str] = &[
    "RUST_LOG",
    "DECTEST_DIALECT",
    "DECTEST_INTERNAL_PRECISION",
    "DECTEST_PRECISION",
    "DECTEST_ROUNDING",
];

#[derive(Debug)]
pub struct DectestRun {
    pub stdout: String,
    pub stderr: String,
    pub status: std::process::ExitStatus,
    pub duration: Duration,
    pub log_path: PathBuf,
}

impl DectestRun {
    pub fn code(&self) -> Option<i32> {
        self.status.code()
    }
}

/// A scratch directory holding test scripts and per-run logs.
pub struct Workspace {
    pub temp_dir: TempDir,
    pub root: PathBuf,
    pub log_dir: PathBuf,
}

impl Workspace {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("temp dir");
        let root = temp_dir.path().to_path_buf();
        let log_dir = root.join("logs");
        fs::create_dir_all(&log_dir).expect("log dir");
        Self {
            temp_dir,
            root,
            log_dir,
        }
    }

    /// Write `contents` to `name` inside the workspace and return its path.
    pub fn script(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.root.join(name);
        fs::write(&path, contents).expect("write script");
        path
    }
}

pub fn run_dectest<I, S>(workspace: &Workspace, args: I, label: &str) -> DectestRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    run_dectest_with_env(
        workspace,
        args,
        std::iter::empty::<(String, String)>(),
        label,
    )
}

pub fn run_dectest_with_env<I, S, E, K, V>(
    workspace: &Workspace,
    args: I,
    env_vars: E,
    label: &str,
) -> DectestRun
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
    E: IntoIterator<Item = (K, V)>,
    K: AsRef<OsStr>,
    V: AsRef<OsStr>,
{
    let args: Vec<_> = args
        .into_iter()
        .map(|arg| arg.as_ref().to_os_string())
        .collect();

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dectest"));
    cmd.current_dir(&workspace.root);
    for var in ISOLATED_VARS {
        cmd.env_remove(var);
    }
    cmd.args(&args);
    cmd.envs(env_vars);
    cmd.env("NO_COLOR", "1");

    let start = Instant::now();
    let output = cmd.output().expect("run dectest");
    let duration = start.elapsed();

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    let log_path = workspace.log_dir.join(format!("{label}.log"));
    let log_body = format!(
        "label: {label}\nduration: {duration:?}\nstatus: {}\nargs: {args:?}\ncwd: {}\n\nstdout:\n{stdout}\n\nstderr:\n{stderr}\n",
        output.status,
        workspace.root.display(),
    );
    fs::write(&log_path, log_body).expect("write log");

    DectestRun {
        stdout,
        stderr,
        status: output.status,
        duration,
        log_path,
    }
}

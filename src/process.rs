use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::debug;
use crate::error::{InstallRunError, Result};

#[cfg(windows)]
const TOOL_LOCATOR: &str = "where";
#[cfg(not(windows))]
const TOOL_LOCATOR: &str = "which";

/// How the child's standard streams are wired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdioMode {
    /// stdin is closed, stdout and stderr are captured.
    Captured,
    /// All three streams are shared with this process.
    Inherited,
}

/// A single external command to run to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub cwd: PathBuf,
    pub stdio: StdioMode,
}

impl Invocation {
    pub fn new<P: Into<PathBuf>, C: Into<PathBuf>>(program: P, cwd: C, stdio: StdioMode) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
            stdio,
        }
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

/// Outcome of a finished child process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completion {
    /// Exit code, or `None` if the child was terminated by a signal.
    pub status: Option<i32>,
    /// Captured stdout; always empty for [`StdioMode::Inherited`].
    pub stdout: String,
}

impl Completion {
    pub fn success(&self) -> bool {
        self.status == Some(0)
    }

    /// Exit code rendered for diagnostics (`null` when there is none).
    pub fn status_display(&self) -> String {
        match self.status {
            Some(code) => code.to_string(),
            None => "null".to_string(),
        }
    }
}

/// Capability to run an external executable and wait for it.
///
/// Every call blocks until the child exits; there is no timeout.
pub trait ProcessRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<Completion>;
}

/// [`ProcessRunner`] backed by [`std::process::Command`]. The child inherits this
/// process's environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<Completion> {
        debug!(program = %invocation.program.display(), args = ?invocation.args, cwd = %invocation.cwd.display(), "spawning");
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args).current_dir(&invocation.cwd);
        match invocation.stdio {
            StdioMode::Captured => {
                let output = command
                    .stdin(Stdio::null())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped())
                    .output()?;
                Ok(Completion {
                    status: output.status.code(),
                    stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
                })
            }
            StdioMode::Inherited => {
                let status = command.status()?;
                Ok(Completion {
                    status: status.code(),
                    stdout: String::new(),
                })
            }
        }
    }
}

/// Finds the absolute path of `tool` on the host using `which` (or `where` on Windows).
///
/// On Windows the last reported match is used, since that is where the `.cmd`
/// launcher shows up.
pub fn locate_tool<R: ProcessRunner + ?Sized>(runner: &R, tool: &str, cwd: &Path) -> Result<PathBuf> {
    let not_found = |reason: String| InstallRunError::ToolNotFound {
        tool: tool.to_string(),
        reason,
    };
    let invocation = Invocation::new(TOOL_LOCATOR, cwd, StdioMode::Captured).args([tool]);
    let completion = runner
        .run(&invocation)
        .map_err(|e| not_found(e.to_string()))?;
    if !completion.success() {
        return Err(not_found(format!(
            "\"{} {}\" returned error code {}",
            TOOL_LOCATOR,
            tool,
            completion.status_display()
        )));
    }

    let mut lines = completion.stdout.lines().map(str::trim).filter(|line| !line.is_empty());
    #[cfg(windows)]
    let found = lines.next_back();
    #[cfg(not(windows))]
    let found = lines.next();

    let path = found
        .map(PathBuf::from)
        .ok_or_else(|| not_found(format!("\"{} {}\" printed nothing", TOOL_LOCATOR, tool)))?;
    if !path.exists() {
        return Err(not_found(format!("the executable {} does not exist", path.display())));
    }
    debug!(tool, path = %path.display(), "located tool");
    Ok(path)
}

/// Asks the JavaScript runtime at `node` for its version (e.g. `v18.17.1`).
pub fn query_runtime_identity<R: ProcessRunner + ?Sized>(runner: &R, node: &Path, cwd: &Path) -> Result<String> {
    let invocation = Invocation::new(node, cwd, StdioMode::Captured).args(["--version"]);
    let completion = runner
        .run(&invocation)
        .map_err(|e| InstallRunError::RuntimeIdentity(e.to_string()))?;
    if !completion.success() {
        return Err(InstallRunError::RuntimeIdentity(format!(
            "\"{} --version\" returned error code {}",
            node.display(),
            completion.status_display()
        )));
    }
    let identity = completion.stdout.trim();
    if identity.is_empty() {
        return Err(InstallRunError::RuntimeIdentity(format!(
            "\"{} --version\" printed nothing",
            node.display()
        )));
    }
    Ok(identity.to_string())
}

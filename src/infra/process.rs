//! Child process execution and completion tracking
//!
//! [`Invocation`] describes a command, [`Invocation::spawn`] starts it and
//! [`await_completion`] turns the running process into a single
//! success-or-failure outcome, optionally accumulating its output.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Stdio};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;

use crate::error::ProcessError;

const READ_CHUNK_SIZE: usize = 8192;

/// How long readers may keep draining once the process has exited
const PIPE_DRAIN_GRACE: Duration = Duration::from_millis(200);

/// How the child's standard streams are wired
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StdioMode {
    /// Share the parent's streams
    #[default]
    Inherit,
    /// Pipe stdout/stderr back to the parent
    Piped,
    /// Discard all output
    Null,
}

/// A command line plus the process options it runs with
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: PathBuf,
    args: Vec<OsString>,
    cwd: Option<PathBuf>,
    envs: Vec<(OsString, OsString)>,
    stdio: StdioMode,
    kill_on_drop: bool,
}

impl Invocation {
    /// Create an invocation of `program` with no arguments
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            envs: Vec::new(),
            stdio: StdioMode::default(),
            kill_on_drop: false,
        }
    }

    /// Append one argument
    #[must_use]
    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    /// Append several arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_os_string()));
        self
    }

    /// Run in `dir` instead of the parent's working directory
    #[must_use]
    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    /// Override one environment variable; the rest is inherited
    #[must_use]
    pub fn env(mut self, key: impl AsRef<OsStr>, value: impl AsRef<OsStr>) -> Self {
        self.envs
            .push((key.as_ref().to_os_string(), value.as_ref().to_os_string()));
        self
    }

    /// Choose how standard streams are wired
    #[must_use]
    pub fn stdio(mut self, stdio: StdioMode) -> Self {
        self.stdio = stdio;
        self
    }

    /// Kill the child if its handle is dropped before it exits
    #[must_use]
    pub fn kill_on_drop(mut self, kill: bool) -> Self {
        self.kill_on_drop = kill;
        self
    }

    /// Program to execute
    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Arguments passed to the program
    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Environment overrides
    pub fn get_envs(&self) -> &[(OsString, OsString)] {
        &self.envs
    }

    /// Value of an environment override, if set
    pub fn get_env(&self, key: &str) -> Option<&OsStr> {
        self.envs
            .iter()
            .rev()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_os_str())
    }

    /// Working directory override
    pub fn get_current_dir(&self) -> Option<&Path> {
        self.cwd.as_deref()
    }

    /// Stream wiring
    pub fn stdio_mode(&self) -> StdioMode {
        self.stdio
    }

    /// Program and arguments joined by spaces, for diagnostics
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(self.args.iter().map(OsString::as_os_str))
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ")
    }

    fn to_command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args);
        cmd.envs(self.envs.iter().map(|(k, v)| (k, v)));
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }
        match self.stdio {
            StdioMode::Inherit => {
                cmd.stdin(Stdio::inherit())
                    .stdout(Stdio::inherit())
                    .stderr(Stdio::inherit());
            }
            StdioMode::Piped => {
                cmd.stdin(Stdio::null())
                    .stdout(Stdio::piped())
                    .stderr(Stdio::piped());
            }
            StdioMode::Null => {
                cmd.stdin(Stdio::null())
                    .stdout(Stdio::null())
                    .stderr(Stdio::null());
            }
        }
        cmd.kill_on_drop(self.kill_on_drop);
        cmd
    }

    /// Start the process
    ///
    /// Spawning never fails here; a spawn error is carried by the handle and
    /// reported by [`await_completion`].
    pub fn spawn(&self) -> ProcessHandle {
        let child = self.to_command().spawn();
        if let Err(e) = &child {
            tracing::debug!("Failed to spawn '{}': {}", self.program.display(), e);
        }
        ProcessHandle {
            invocation: self.clone(),
            child,
        }
    }

    /// Spawn the process and wait for it to finish
    pub async fn run(&self, options: CompletionOptions) -> Result<(), ProcessError> {
        await_completion(self.spawn(), options).await
    }
}

/// An already-started child process
#[derive(Debug)]
pub struct ProcessHandle {
    invocation: Invocation,
    child: std::io::Result<Child>,
}

impl ProcessHandle {
    /// The invocation that started this process
    pub fn invocation(&self) -> &Invocation {
        &self.invocation
    }

    /// OS process id, if the process started and has not been reaped
    pub fn id(&self) -> Option<u32> {
        self.child.as_ref().ok().and_then(Child::id)
    }

    /// Whether the spawn itself failed
    pub fn spawn_failed(&self) -> bool {
        self.child.is_err()
    }
}

/// Output accumulated from a running process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CapturedOutput {
    /// Decoded standard output so far
    pub stdout: String,
    /// Decoded standard error so far
    pub stderr: String,
}

/// Output accumulator shared between the waiter and the caller
pub type SharedOutput = Arc<Mutex<CapturedOutput>>;

/// Create an empty shared output accumulator
pub fn shared_output() -> SharedOutput {
    Arc::new(Mutex::new(CapturedOutput::default()))
}

/// Options for [`await_completion`]
#[derive(Debug, Clone, Default)]
pub struct CompletionOptions {
    /// Append every stdout/stderr chunk here as it arrives
    pub capture: Option<SharedOutput>,
}

impl CompletionOptions {
    /// Capture output into `output`
    pub fn capture(output: SharedOutput) -> Self {
        Self {
            capture: Some(output),
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum StreamKind {
    Stdout,
    Stderr,
}

/// Wait for a process to finish
///
/// Resolves with `Ok(())` on exit code 0. Any other exit, including death
/// by signal, yields [`ProcessError::NonZeroExit`] naming the full command
/// line. A failed spawn yields [`ProcessError::Spawn`] without waiting.
///
/// Piped streams are always drained so the child cannot block on a full
/// pipe; with `options.capture` set their text is also appended to the
/// accumulator, which the caller may read while the process is running.
///
/// Completion follows the exit of the process, not the closing of its
/// pipes. A background process that inherited the pipes gets a short grace
/// period to flush, after which the readers are detached.
pub async fn await_completion(
    handle: ProcessHandle,
    options: CompletionOptions,
) -> Result<(), ProcessError> {
    let ProcessHandle { invocation, child } = handle;
    let mut child = child.map_err(|source| ProcessError::Spawn {
        program: invocation.program.clone(),
        source,
    })?;

    let io_error = |source| ProcessError::Io {
        invocation: invocation.command_line(),
        source,
    };

    let readers = vec![
        tokio::spawn(pump(
            child.stdout.take(),
            options.capture.clone(),
            StreamKind::Stdout,
        )),
        tokio::spawn(pump(
            child.stderr.take(),
            options.capture,
            StreamKind::Stderr,
        )),
    ];

    let status = child.wait().await;
    let drained = finish_readers(readers).await;
    let status = status.map_err(io_error)?;
    drained.map_err(io_error)?;
    check_status(status, &invocation)
}

async fn finish_readers(
    mut readers: Vec<JoinHandle<std::io::Result<()>>>,
) -> std::io::Result<()> {
    let joined = tokio::time::timeout(PIPE_DRAIN_GRACE, async {
        for reader in &mut readers {
            reader.await.map_err(std::io::Error::other)??;
        }
        Ok::<(), std::io::Error>(())
    })
    .await;

    match joined {
        Ok(result) => result,
        Err(_) => {
            tracing::debug!("Output pipes still open after exit, detaching readers");
            for reader in &readers {
                reader.abort();
            }
            Ok(())
        }
    }
}

fn check_status(status: ExitStatus, invocation: &Invocation) -> Result<(), ProcessError> {
    if status.success() {
        return Ok(());
    }
    Err(ProcessError::NonZeroExit {
        code: status.code(),
        signal: exit_signal(status),
        invocation: invocation.command_line(),
    })
}

#[cfg(unix)]
fn exit_signal(status: ExitStatus) -> Option<i32> {
    use std::os::unix::process::ExitStatusExt;
    status.signal()
}

#[cfg(not(unix))]
fn exit_signal(_status: ExitStatus) -> Option<i32> {
    None
}

async fn pump<R>(
    reader: Option<R>,
    sink: Option<SharedOutput>,
    kind: StreamKind,
) -> std::io::Result<()>
where
    R: AsyncRead + Unpin,
{
    let Some(mut reader) = reader else {
        return Ok(());
    };
    let mut decoder = Utf8ChunkDecoder::default();
    let mut buf = vec![0u8; READ_CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            break;
        }
        if let Some(sink) = &sink {
            append(sink, kind, &decoder.decode(&buf[..n]));
        }
    }
    if let Some(sink) = &sink {
        append(sink, kind, &decoder.finish());
    }
    Ok(())
}

fn append(sink: &SharedOutput, kind: StreamKind, text: &str) {
    if text.is_empty() {
        return;
    }
    let mut output = sink.lock().unwrap_or_else(PoisonError::into_inner);
    match kind {
        StreamKind::Stdout => output.stdout.push_str(text),
        StreamKind::Stderr => output.stderr.push_str(text),
    }
}

/// Incremental UTF-8 decoder for chunked process output
///
/// A multibyte sequence split across chunks is held back until it is
/// complete. Invalid bytes decode to U+FFFD, so the concatenation of all
/// decoded chunks equals `String::from_utf8_lossy` of the whole stream.
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    /// Decode as much of `chunk` (plus any held-back bytes) as possible
    pub fn decode(&mut self, chunk: &[u8]) -> String {
        self.pending.extend_from_slice(chunk);
        let mut out = String::new();
        loop {
            let (valid, invalid) = match std::str::from_utf8(&self.pending) {
                Ok(_) => (self.pending.len(), None),
                Err(e) => (e.valid_up_to(), Some(e.error_len())),
            };
            out.push_str(std::str::from_utf8(&self.pending[..valid]).unwrap_or_default());
            match invalid {
                None => {
                    self.pending.clear();
                    return out;
                }
                Some(Some(len)) => {
                    out.push(char::REPLACEMENT_CHARACTER);
                    self.pending.drain(..valid + len);
                }
                // incomplete sequence at the end; wait for the next chunk
                Some(None) => {
                    self.pending.drain(..valid);
                    return out;
                }
            }
        }
    }

    /// Flush held-back bytes at end of stream
    pub fn finish(&mut self) -> String {
        let rest = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        rest
    }
}

//! Runs the external linter as a subprocess under a wall-clock deadline.

use std::io::{self, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use thiserror::Error;
use tracing::{debug, warn};

use super::LinterConfig;

/// actionlint's `-format` template reproducing its default line layout.
pub const FORMAT_TEMPLATE: &str =
    "{{range $err := .}}{{$err.Filepath}}:{{$err.Line}}:{{$err.Column}}: {{$err.Message}} [{{$err.Kind}}]\n{{end}}";

const POLL_INTERVAL: Duration = Duration::from_millis(20);

#[derive(Debug, Error)]
pub enum ToolError {
    #[error("linter '{program}' was not found")]
    NotFound { program: String },

    #[error("failed to start linter '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("linter '{program}' timed out after {timeout_ms} ms")]
    Timeout { program: String, timeout_ms: u64 },

    #[error("linter I/O failed: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug)]
pub struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Feed `yaml` on stdin and collect the linter's output. The whole run,
/// including draining stdout and stderr, is bounded by `config.timeout_ms`.
pub fn run_linter(yaml: &str, config: &LinterConfig) -> Result<ToolOutput, ToolError> {
    let mut child = Command::new(&config.program)
        .args(&config.args)
        .args(["-format", FORMAT_TEMPLATE, "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|source| match source.kind() {
            io::ErrorKind::NotFound => ToolError::NotFound {
                program: config.program.clone(),
            },
            _ => ToolError::Spawn {
                program: config.program.clone(),
                source,
            },
        })?;
    debug!(program = %config.program, timeout_ms = config.timeout_ms, "spawned linter");
    let deadline = Instant::now() + Duration::from_millis(config.timeout_ms);

    let stdout = drain(child.stdout.take());
    let stderr = drain(child.stderr.take());

    if let Some(mut stdin) = child.stdin.take() {
        let yaml = yaml.to_string();
        // Detached: a linter that never reads stdin must not stall the deadline.
        thread::spawn(move || {
            if let Err(e) = stdin.write_all(yaml.as_bytes()) {
                // A linter that exits early closes the pipe; its output still counts.
                if e.kind() != io::ErrorKind::BrokenPipe {
                    warn!(error = %e, "failed to write workflow to linter");
                }
            }
        });
    }

    let timed_out = || {
        warn!(program = %config.program, timeout_ms = config.timeout_ms, "linter timed out");
        ToolError::Timeout {
            program: config.program.clone(),
            timeout_ms: config.timeout_ms,
        }
    };

    let Some(status) = wait_until(&mut child, deadline)? else {
        kill(&mut child);
        return Err(timed_out());
    };

    // A background descendant can keep the pipes open after the linter exits.
    let stdout = collect(stdout, deadline).ok_or_else(timed_out)??;
    let stderr = collect(stderr, deadline).ok_or_else(timed_out)??;

    Ok(ToolOutput {
        status,
        stdout,
        stderr,
    })
}

fn wait_until(child: &mut Child, deadline: Instant) -> io::Result<Option<ExitStatus>> {
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

type Drained = Receiver<io::Result<String>>;

/// Read a pipe to EOF on its own thread; the result arrives on the channel.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<Drained> {
    pipe.map(|mut pipe| {
        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let mut buf = Vec::new();
            let result = pipe
                .read_to_end(&mut buf)
                .map(|_| String::from_utf8_lossy(&buf).into_owned());
            let _ = tx.send(result);
        });
        rx
    })
}

/// `None` once the deadline passes without the pipe reaching EOF.
fn collect(pipe: Option<Drained>, deadline: Instant) -> Option<io::Result<String>> {
    let Some(rx) = pipe else {
        return Some(Ok(String::new()));
    };
    match rx.recv_timeout(deadline.saturating_duration_since(Instant::now())) {
        Ok(result) => Some(result),
        Err(RecvTimeoutError::Timeout) => None,
        Err(RecvTimeoutError::Disconnected) => Some(Err(io::Error::other("output reader panicked"))),
    }
}

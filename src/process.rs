//! External compiler invocation
//!
//! Builds the `lessc` command line from [`CompilationOptions`], runs it
//! through a [`ProcessRunner`], and classifies the result.
//!
//! ## Command layout
//!
//! ```text
//! ["<interpreter>"] "<compiler>" [--strict-imports] [--compress|--yui-compress]
//!     [-O<level>] [--rootpath <path>] [--relative-urls] "<source>" "<destination>"
//! ```

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::sync::{Arc, Mutex, OnceLock};
use std::thread;
use std::time::{Duration, Instant};

use regex::Regex;
use tracing::debug;

use crate::config::CompilationOptions;
use crate::error::BuildError;

/// How often a running child is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Build the flag list for `options`, in the fixed order `lessc` expects.
pub fn compiler_flags(options: &CompilationOptions) -> Vec<String> {
    let mut flags = Vec::new();

    if options.strict_imports {
        flags.push("--strict-imports".to_string());
    }

    if let Some(flag) = options.compression.flag() {
        flags.push(flag.to_string());
    }

    if let Some(level) = options.optimization {
        flags.push(level.flag());
    }

    if let Some(root_path) = &options.root_path {
        flags.push("--rootpath".to_string());
        flags.push(root_path.clone());
    }

    if options.relative_urls {
        flags.push("--relative-urls".to_string());
    }

    flags
}

/// A fully resolved compiler invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandLine {
    pub interpreter: Option<PathBuf>,
    pub compiler: PathBuf,
    pub flags: Vec<String>,
    pub source: PathBuf,
    pub destination: PathBuf,
}

impl CommandLine {
    pub fn new(source: &Path, destination: &Path, options: &CompilationOptions) -> Self {
        Self {
            interpreter: options.interpreter.clone(),
            compiler: options.compiler_path.clone(),
            flags: compiler_flags(options),
            source: source.to_path_buf(),
            destination: destination.to_path_buf(),
        }
    }

    /// Executable actually spawned.
    pub fn program(&self) -> &Path {
        self.interpreter.as_deref().unwrap_or(&self.compiler)
    }

    /// Arguments passed to [`Self::program`].
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.flags.len() + 3);
        if self.interpreter.is_some() {
            args.push(self.compiler.display().to_string());
        }
        args.extend(self.flags.iter().cloned());
        args.push(self.source.display().to_string());
        args.push(self.destination.display().to_string());
        args
    }

    pub fn to_command(&self) -> Command {
        let mut cmd = Command::new(self.program());
        if self.interpreter.is_some() {
            cmd.arg(&self.compiler);
        }
        cmd.args(&self.flags).arg(&self.source).arg(&self.destination);
        cmd
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(interpreter) = &self.interpreter {
            write!(f, "\"{}\" ", interpreter.display())?;
        }
        write!(f, "\"{}\"", self.compiler.display())?;
        for flag in &self.flags {
            write!(f, " {}", flag)?;
        }
        write!(
            f,
            " \"{}\" \"{}\"",
            self.source.display(),
            self.destination.display()
        )
    }
}

/// How a child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessExit {
    Code(i32),
    /// Terminated by a signal without an exit code
    Signal,
    /// Killed after exceeding the timeout
    TimedOut,
}

/// Exit status plus combined stdout/stderr.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit: ProcessExit,
    pub output: String,
}

/// Executes a command line and reports how it ended.
///
/// Implementations:
/// - `SystemRunner` - spawns a real child process
/// - scripted runners in tests
pub trait ProcessRunner {
    fn run(&self, command: &CommandLine, timeout: Option<Duration>) -> std::io::Result<ProcessOutput>;
}

/// Spawns the compiler as a child process.
///
/// Stdout and stderr share one pipe so diagnostics keep their relative
/// ordering; stdin is closed.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, command: &CommandLine, timeout: Option<Duration>) -> std::io::Result<ProcessOutput> {
        let (mut reader, writer) = os_pipe::pipe()?;

        // The Command holds the write ends; it must be dropped right after
        // spawning or the reader never sees EOF.
        let mut child = {
            let mut cmd = command.to_command();
            cmd.stdin(Stdio::null())
                .stdout(writer.try_clone()?)
                .stderr(writer);
            cmd.spawn()?
        };

        // Grandchildren inherit the write end, so EOF can arrive long after
        // the child exits. The buffer is shared to keep what was read so far.
        let collected = Arc::new(Mutex::new(Vec::new()));
        let (done_tx, done_rx) = mpsc::channel::<()>();
        {
            let collected = Arc::clone(&collected);
            thread::spawn(move || {
                let mut chunk = [0u8; 4096];
                loop {
                    match reader.read(&mut chunk) {
                        Ok(0) | Err(_) => break,
                        Ok(n) => match collected.lock() {
                            Ok(mut buf) => buf.extend_from_slice(&chunk[..n]),
                            Err(_) => break,
                        },
                    }
                }
                let _ = done_tx.send(());
            });
        }

        let started = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait()? {
                break Some(status);
            }
            if timeout.is_some_and(|limit| started.elapsed() >= limit) {
                let _ = child.kill();
                let _ = child.wait();
                break None;
            }
            thread::sleep(POLL_INTERVAL);
        };

        let Some(status) = status else {
            // Grandchildren may still hold the pipe open; don't wait on the
            // collector.
            return Ok(ProcessOutput {
                exit: ProcessExit::TimedOut,
                output: String::new(),
            });
        };

        let drained = match timeout {
            Some(limit) => done_rx
                .recv_timeout(limit.saturating_sub(started.elapsed()))
                .is_ok(),
            None => done_rx.recv().is_ok(),
        };
        if !drained {
            debug!(command = %command, "compiler exited with its output pipe still open");
        }

        let bytes = match collected.lock() {
            Ok(buf) => buf.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        };
        let exit = match status.code() {
            Some(code) => ProcessExit::Code(code),
            None => ProcessExit::Signal,
        };

        Ok(ProcessOutput {
            exit,
            output: String::from_utf8_lossy(&bytes).into_owned(),
        })
    }
}

/// Remove terminal color codes from compiler output.
///
/// Handles real escape sequences as well as bare `[31m` remnants left when
/// the ESC byte was already dropped somewhere upstream.
pub fn sanitize_output(output: &str) -> String {
    static BARE_SGR: OnceLock<Regex> = OnceLock::new();
    let bare = BARE_SGR.get_or_init(|| Regex::new(r"\[[0-9;]*m").expect("SGR pattern is valid"));

    let stripped = strip_ansi_escapes::strip_str(output);
    bare.replace_all(&stripped, "").trim_end().to_string()
}

/// Map a finished process onto a per-file result.
pub fn classify(
    command: &CommandLine,
    result: std::io::Result<ProcessOutput>,
    timeout: Option<Duration>,
) -> Result<(), BuildError> {
    let output = match result {
        Ok(output) => output,
        Err(source) => {
            return Err(BuildError::Spawn {
                command: command.to_string(),
                source,
            })
        }
    };

    match output.exit {
        ProcessExit::Code(0) => Ok(()),
        ProcessExit::TimedOut => Err(BuildError::Timeout {
            source_path: command.source.clone(),
            command: command.to_string(),
            timeout: timeout.unwrap_or_default(),
        }),
        ProcessExit::Code(_) | ProcessExit::Signal => Err(BuildError::CompilerProcess {
            source_path: command.source.clone(),
            command: command.to_string(),
            output: sanitize_output(&output.output),
        }),
    }
}

/// Compile one file with the external compiler.
pub fn compile_file<R: ProcessRunner + ?Sized>(
    runner: &R,
    source: &Path,
    destination: &Path,
    options: &CompilationOptions,
) -> Result<(), BuildError> {
    let command = CommandLine::new(source, destination, options);
    debug!(command = %command, "invoking compiler");

    let result = runner.run(&command, options.timeout);
    classify(&command, result, options.timeout)
}

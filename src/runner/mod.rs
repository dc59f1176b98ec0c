//! External tool invocation.
//!
//! The toolchain is driven through one capability — `run(stdin bytes, args)
//! -> stdout bytes` — with three concrete behaviours:
//!
//!   * `Exec`       – spawn the program, feed stdin, capture stdout/stderr.
//!   * `OutputFile` – run the inner runner, then read a fixed path the tool
//!                    is known to write (`ld -o rom.out` style).
//!   * `Mapped`     – stage in-memory byte streams to temp files, substitute
//!                    their paths for matching argument tokens, run, then
//!                    read the output-argument path back.
//!
//! The set is closed on purpose; each variant holds its delegate explicitly.

pub mod stage;

pub use stage::Stager;

use std::collections::HashMap;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("could not spawn `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` failed ({status}): {stderr}")]
    Exec {
        program: String,
        status: ExitStatus,
        stderr: String,
    },

    /// The tool exited 0 but the artifact it was supposed to write is not
    /// there. A toolchain contract violation, not a normal failure.
    #[error("`{program}` succeeded but its output {path:?} is unreadable: {source}")]
    MissingOutput {
        program: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Clone)]
pub enum CommandRunner<'a> {
    Exec(ExecRunner),
    OutputFile {
        inner: Box<CommandRunner<'a>>,
        path: PathBuf,
    },
    Mapped {
        inner: Box<CommandRunner<'a>>,
        stager: &'a Stager,
        inputs: HashMap<String, Vec<u8>>,
        output_arg: String,
    },
}

impl<'a> CommandRunner<'a> {
    pub fn exec(program: impl Into<String>) -> Self {
        CommandRunner::Exec(ExecRunner::new(program))
    }

    /// Ignore the inner runner's stdout and return the contents of `path`
    /// once it has finished.
    pub fn with_output_file(self, path: impl Into<PathBuf>) -> Self {
        CommandRunner::OutputFile {
            inner: Box::new(self),
            path: path.into(),
        }
    }

    /// Substitute staged temp-file paths for the argument tokens in
    /// `inputs`, and read `output_arg` back as the result after the run.
    pub fn with_mapped_args(
        self,
        stager: &'a Stager,
        inputs: HashMap<String, Vec<u8>>,
        output_arg: impl Into<String>,
    ) -> Self {
        CommandRunner::Mapped {
            inner: Box::new(self),
            stager,
            inputs,
            output_arg: output_arg.into(),
        }
    }

    pub fn program(&self) -> &str {
        match self {
            CommandRunner::Exec(e) => &e.program,
            CommandRunner::OutputFile { inner, .. } | CommandRunner::Mapped { inner, .. } => {
                inner.program()
            }
        }
    }

    pub fn run(&self, input: &[u8], args: &[String]) -> Result<Vec<u8>, RunnerError> {
        match self {
            CommandRunner::Exec(e) => e.run(input, args),

            CommandRunner::OutputFile { inner, path } => {
                inner.run(input, args)?;
                std::fs::read(path).map_err(|source| RunnerError::MissingOutput {
                    program: self.program().to_string(),
                    path: path.clone(),
                    source,
                })
            }

            CommandRunner::Mapped {
                inner,
                stager,
                inputs,
                output_arg,
            } => {
                let new_args = substitute(stager, inputs, args)?;
                inner.run(input, &new_args)?;
                // The output argument is a literal path, never re-resolved
                // through the input map.
                Ok(std::fs::read(output_arg)?)
            }
        }
    }
}

/// Rewrite `args`, replacing each token that names an entry of `inputs` with
/// the absolute path of a staged copy of those bytes. Order is preserved and
/// every other token passes through untouched. Each mapped stream is staged
/// at most once; repeated tokens share the same file.
fn substitute(
    stager: &Stager,
    inputs: &HashMap<String, Vec<u8>>,
    args: &[String],
) -> Result<Vec<String>, RunnerError> {
    let mut staged: HashMap<&str, PathBuf> = HashMap::new();
    let mut new_args = Vec::with_capacity(args.len());
    for arg in args {
        match inputs.get_key_value(arg.as_str()) {
            Some((token, bytes)) => {
                let token = token.as_str();
                if !staged.contains_key(token) {
                    staged.insert(token, stager.stage(bytes, token)?);
                }
                new_args.push(staged[token].display().to_string());
            }
            None => new_args.push(arg.clone()),
        }
    }
    Ok(new_args)
}

#[derive(Clone)]
pub struct ExecRunner {
    program: String,
}

impl ExecRunner {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn run(&self, input: &[u8], args: &[String]) -> Result<Vec<u8>, RunnerError> {
        log::info!("Running {}", shell_join(&self.program, args));

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RunnerError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        // Feed stdin from a helper thread; writing inline can deadlock once
        // the tool fills its stdout pipe while we are still writing.
        let writer = child.stdin.take().map(|mut stdin| {
            let input = input.to_vec();
            thread::spawn(move || {
                // tools may exit without draining stdin; ignore the broken pipe
                let _ = stdin.write_all(&input);
            })
        });

        let output = child.wait_with_output()?;
        if let Some(handle) = writer {
            let _ = handle.join();
        }

        log::debug!("stdout: {}", String::from_utf8_lossy(&output.stdout));
        if !output.status.success() {
            return Err(RunnerError::Exec {
                program: self.program.clone(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            });
        }
        Ok(output.stdout)
    }
}

fn shell_join(program: &str, args: &[String]) -> String {
    let mut parts = vec![shell_quote(program)];
    parts.extend(args.iter().map(|a| shell_quote(a)));
    parts.join(" ")
}

fn shell_quote(s: &str) -> String {
    let safe = |c: char| c.is_ascii_alphanumeric() || "_-./=+:@%^,".contains(c);
    if !s.is_empty() && s.chars().all(safe) {
        s.to_string()
    } else {
        format!("'{}'", s.replace('\'', r"'\''"))
    }
}

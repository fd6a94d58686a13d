use log::{debug, warn};

use super::{
    runner::{CommandRunner, SystemRunner},
    ProbeResult,
};
use crate::{
    error::{ExecError, ProbeError, Result},
    redact::{redact_target, redact_text},
};

pub const DEFAULT_PROGRAM: &str = "ffprobe";

/// Runs ffprobe through a [`CommandRunner`] and decodes what it prints.
#[derive(Debug, Clone)]
pub struct Prober<R = SystemRunner> {
    runner: R,
    program: String,
}

impl Prober<SystemRunner> {
    pub fn new() -> Self {
        Self::with_runner(SystemRunner)
    }
}

impl Default for Prober<SystemRunner> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: CommandRunner> Prober<R> {
    pub fn with_runner(runner: R) -> Self {
        Self {
            runner,
            program: DEFAULT_PROGRAM.to_string(),
        }
    }

    /// Use a different ffprobe executable.
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Probes a file path or stream URL. The target is handed to ffprobe as is.
    pub fn probe(&self, target: &str) -> Result<ProbeResult> {
        let args = [
            "-v",
            "error",
            "-print_format",
            "json",
            "-show_format",
            "-show_streams",
            target,
        ];
        debug!(
            "running {} {} {}",
            self.program,
            args[..args.len() - 1].join(" "),
            redact_target(target)
        );

        let output = self
            .runner
            .run(&self.program, &args)
            .map_err(|e| ProbeError::Invocation {
                source: ExecError::Spawn(e),
                stderr: String::new(),
            })?;

        if !output.success() {
            let source = match output.exit_code {
                Some(code) => ExecError::Exit(code),
                None => ExecError::Signal,
            };
            return Err(ProbeError::Invocation {
                source,
                stderr: output.stderr,
            });
        }

        if !output.stderr.trim().is_empty() {
            warn!("{}", stderr_warning(target, &output.stderr));
        }

        ProbeResult::from_json(&output.stdout)
    }
}

// Only the log line is masked; `ProbeError::Invocation` keeps stderr verbatim.
fn stderr_warning(target: &str, stderr: &str) -> String {
    format!(
        "ffprobe reported errors for {}: {}",
        redact_target(target),
        redact_text(stderr.trim())
    )
}

/// Probes `target` with the `ffprobe` found on `PATH`.
pub fn probe(target: &str) -> Result<ProbeResult> {
    Prober::new().probe(target)
}

use std::process::Command;

use crate::error::StageError;

/// Runs a helper tool and hands back its standard output.
pub trait CommandRunner: Send + Sync {
    fn run(&self, program: &str, args: &[&str]) -> Result<String, StageError>;
}

/// Spawns real processes.
pub struct SystemCommandRunner;

impl CommandRunner for SystemCommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<String, StageError> {
        log::debug!("Running {} {}", program, args.join(" "));
        let output = Command::new(program).args(args).output().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                StageError::unavailable(format!("{} is not installed", program))
            } else {
                StageError::Io(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            log::warn!("{} {} failed: {}", program, args.join(" "), stderr);
            return Err(StageError::CommandFailed {
                program: program.to_string(),
                status: output.status.to_string(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

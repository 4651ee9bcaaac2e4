//! Subprocess execution behind a trait seam so rules that shell out to
//! external tooling stay testable.
use color_eyre::eyre::eyre;
use log::*;
use std::path::Path;
use std::process::Command;

use crate::result::Result;

/// Runs external programs on behalf of promotion rules.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    /// Runs `program` with `args` inside `dir`, returning captured stdout.
    fn run(&self, dir: &Path, program: &str, args: &[String]) -> Result<String>;
}

/// Runner that spawns real processes.
#[derive(Debug, Default)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, dir: &Path, program: &str, args: &[String]) -> Result<String> {
        debug!(
            "running {} {} in {}",
            program,
            args.join(" "),
            dir.display()
        );

        let output = Command::new(program)
            .args(args)
            .current_dir(dir)
            .output()?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(eyre!(
                "command {} {} failed with {}: {}",
                program,
                args.join(" "),
                output.status,
                stderr.trim()
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

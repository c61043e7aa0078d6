//! # External engine invocation
//!
//! The statistical work (coverage-bias model fitting, CNV posterior
//! inference) is done by external Python scripts. This module assembles
//! their argument list and runs the chosen script exactly once,
//! synchronously. The script names, output suffixes, and argument keys
//! below are part of the external contract and must not change.
use std::{
    path::{Path, PathBuf},
    process::Command,
};

use anyhow::{Context, Result};
use log::info;

use crate::config::{ModeConfig, RunConfig};

pub const COHORT_DENOISING_CALLING_SCRIPT: &str = "cohort_denoising_calling.py";
pub const CASE_SAMPLE_CALLING_SCRIPT: &str = "case_denoising_calling.py";

pub const MODEL_PATH_SUFFIX: &str = "-model";
pub const CALLS_PATH_SUFFIX: &str = "-calls";

/// Marker argument preceding the ordered list of subsetted sample files.
pub const READ_COUNT_FILES_ARG: &str = "--read_count_tsv_files";

/// One fully assembled engine run: the entry-point script, its `--key=value`
/// configuration arguments, and the prepared per-sample table paths.
#[derive(Debug, Clone)]
pub struct EngineInvocation {
    pub script: &'static str,
    pub arguments: Vec<String>,
    pub read_count_files: Vec<PathBuf>,
}

impl EngineInvocation {
    pub fn new(
        config: &RunConfig,
        intervals_file: &Path,
        read_count_files: Vec<PathBuf>,
    ) -> EngineInvocation {
        let calls_dir = config
            .output_dir
            .join(format!("{}{CALLS_PATH_SUFFIX}", config.output_prefix));
        let mut arguments = vec![
            format!("--ploidy_calls_path={}", config.ploidy_calls_dir.display()),
            format!("--output_calls_path={}", calls_dir.display()),
        ];
        if let Some(model_dir) = config.model_dir() {
            arguments.push(format!("--input_model_path={}", model_dir.display()));
        }

        let script = match &config.mode {
            ModeConfig::Cohort { .. } => {
                let model_dir = config
                    .output_dir
                    .join(format!("{}{MODEL_PATH_SUFFIX}", config.output_prefix));
                arguments.push(format!("--modeling_interval_list={}", intervals_file.display()));
                arguments.push(format!("--output_model_path={}", model_dir.display()));
                let flag = if config.explicit_gc_bias_enabled() == Some(true) {
                    "True"
                } else {
                    "False"
                };
                arguments.push(format!("--enable_explicit_gc_bias_modeling={flag}"));
                COHORT_DENOISING_CALLING_SCRIPT
            }
            // explicit GC bias modeling is set by the model in CASE mode
            ModeConfig::Case { .. } => CASE_SAMPLE_CALLING_SCRIPT,
        };

        EngineInvocation {
            script,
            arguments,
            read_count_files,
        }
    }

    /// The flat argument list passed to the script: configuration arguments,
    /// then the sample-file marker, then the sample files in order.
    pub fn command_line(&self) -> Vec<String> {
        let mut args = self.arguments.clone();
        args.push(String::from(READ_COUNT_FILES_ARG));
        args.extend(
            self.read_count_files
                .iter()
                .map(|file| file.display().to_string()),
        );
        args
    }
}

/// The seam between orchestration and the numerical engine. One blocking
/// call; `Ok(false)` means the engine ran and reported failure.
pub trait Engine {
    fn execute(&self, invocation: &EngineInvocation) -> Result<bool>;
}

/// Runs the engine scripts with a Python interpreter, inheriting stdout and
/// stderr so the engine's own progress output reaches the user.
pub struct PythonEngine {
    interpreter: PathBuf,
    script_dir: Option<PathBuf>,
}

impl PythonEngine {
    pub fn new(interpreter: PathBuf, script_dir: Option<PathBuf>) -> PythonEngine {
        PythonEngine {
            interpreter,
            script_dir,
        }
    }
}

impl Engine for PythonEngine {
    fn execute(&self, invocation: &EngineInvocation) -> Result<bool> {
        let script = match &self.script_dir {
            Some(dir) => dir.join(invocation.script),
            None => PathBuf::from(invocation.script),
        };
        info!("Launching engine script {}...", script.display());

        // May run for hours; we block until the engine completes
        let status = Command::new(&self.interpreter)
            .arg(&script)
            .args(invocation.command_line())
            .status()
            .with_context(|| {
                format!(
                    "Could not launch engine interpreter {}",
                    self.interpreter.display()
                )
            })?;
        Ok(status.success())
    }
}

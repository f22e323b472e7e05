//! Runs compiled invocations with tokio.
//!
//! A failing toolchain run is fatal for its task; nothing is retried.

use crate::error::BuildError;
use crate::invocation::{Invocation, InvocationCompiler};
use crate::registry::BuildTask;
use crate::staging::prepare_output_dir;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::process::Command;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info};

/// Outcome of a successful task.
#[derive(Debug, Clone)]
pub struct BuildReport {
    /// Task name
    pub task: String,
    /// Directory holding the artifact
    pub output_dir: PathBuf,
    /// Invocation that was run
    pub invocation: Invocation,
    /// Wall-clock build time
    pub duration: Duration,
}

/// Stages, compiles and runs build tasks.
#[derive(Debug, Clone)]
pub struct Launcher {
    compiler: InvocationCompiler,
    ambient: BTreeMap<String, String>,
}

impl Launcher {
    /// Create a launcher with an explicit ambient environment.
    pub fn new(compiler: InvocationCompiler, ambient: BTreeMap<String, String>) -> Self {
        Self { compiler, ambient }
    }

    /// Create a launcher that snapshots the current process environment.
    pub fn from_process_env(compiler: InvocationCompiler) -> Self {
        Self::new(compiler, std::env::vars().collect())
    }

    /// Compiler used to plan tasks.
    pub fn compiler(&self) -> &InvocationCompiler {
        &self.compiler
    }

    /// Compile a task without running it.
    ///
    /// # Errors
    ///
    /// `BuildError::Config` if the variant can not be compiled.
    pub fn plan(&self, task: &BuildTask) -> Result<Invocation, BuildError> {
        self.compiler
            .compile(&task.variant, &self.ambient, &task.output_dir)
            .map_err(BuildError::from)
    }

    /// Build one task: compile, clear the output directory, run the toolchain
    /// in the module directory.
    ///
    /// Compilation happens first so a misconfigured variant leaves its
    /// previous output untouched.
    ///
    /// # Errors
    ///
    /// Configuration, staging, spawn and toolchain failures, see [`BuildError`].
    pub async fn run(&self, task: &BuildTask) -> Result<BuildReport, BuildError> {
        let start = Instant::now();
        let invocation = self.plan(task)?;

        prepare_output_dir(&task.output_dir).await?;

        info!("{}: {}", task.name, invocation.args.join(" "));
        debug!("{} environment overrides: {:?}", task.name, invocation.overrides);

        let program = invocation.program().to_string();
        let status = Command::new(&program)
            .args(invocation.arguments())
            .envs(&invocation.env)
            .current_dir(&task.module_dir)
            .status()
            .await
            .map_err(|source| BuildError::Spawn {
                program: program.clone(),
                source,
            })?;

        if !status.success() {
            error!("{} failed: {}", task.name, status);
            return Err(BuildError::ToolchainFailed {
                task: task.name.clone(),
                status,
            });
        }

        let duration = start.elapsed();
        info!("{} finished in {:.2}s", task.name, duration.as_secs_f64());

        Ok(BuildReport {
            task: task.name.clone(),
            output_dir: task.output_dir.clone(),
            invocation,
            duration,
        })
    }

    /// Build tasks concurrently, at most `jobs` at a time.
    ///
    /// Every started task runs to completion; the error of the earliest
    /// failing task (in the given order) is returned afterwards.
    pub async fn run_all(
        &self,
        tasks: Vec<BuildTask>,
        jobs: usize,
    ) -> Result<Vec<BuildReport>, BuildError> {
        let permits = Arc::new(Semaphore::new(jobs.max(1)));
        let mut set = JoinSet::new();

        for (index, task) in tasks.into_iter().enumerate() {
            let launcher = self.clone();
            let permits = Arc::clone(&permits);
            let _ = set.spawn(async move {
                let result = launcher.run_permitted(&task, permits).await;
                (index, result)
            });
        }

        let mut reports = Vec::new();
        let mut failures = Vec::new();

        while let Some(joined) = set.join_next().await {
            match joined {
                Ok((index, Ok(report))) => reports.push((index, report)),
                Ok((index, Err(e))) => failures.push((index, e)),
                Err(e) => failures.push((usize::MAX, BuildError::Join(e.to_string()))),
            }
        }

        failures.sort_by_key(|(index, _)| *index);
        if let Some((_, e)) = failures.into_iter().next() {
            return Err(e);
        }

        reports.sort_by_key(|(index, _)| *index);
        Ok(reports.into_iter().map(|(_, report)| report).collect())
    }

    /// Run `task` once a build slot is free.
    async fn run_permitted(
        &self,
        task: &BuildTask,
        permits: Arc<Semaphore>,
    ) -> Result<BuildReport, BuildError> {
        let _permit = permits
            .acquire_owned()
            .await
            .map_err(|e| BuildError::Join(format!("{}: {}", task.name, e)))?;
        self.run(task).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::VariantSet;
    use crate::variant::Variant;

    #[tokio::test]
    async fn test_closed_build_slots_abort_task() {
        let mut set = VariantSet::new("/src", "/build");
        let _ = set.register(Variant::new("release")).unwrap();
        let task = set.task("release").unwrap();

        let permits = Arc::new(Semaphore::new(1));
        permits.close();

        let launcher = Launcher::new(InvocationCompiler::default(), BTreeMap::new());
        let err = launcher.run_permitted(&task, permits).await.unwrap_err();
        match err {
            BuildError::Join(message) => assert!(message.starts_with("compileGolangRelease")),
            other => panic!("unexpected error: {other}"),
        }
    }
}

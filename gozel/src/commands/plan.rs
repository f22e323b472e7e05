//! Dry-run view of a variant's toolchain invocation

use super::{CommandResult, PlanFormat, load_project};
use convenient_golang::{ConfigError, Invocation, Launcher};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Write;
use std::path::Path;

#[derive(Debug, Serialize)]
struct Plan<'a> {
    task: &'a str,
    working_directory: &'a Path,
    output_directory: &'a Path,
    environment: &'a BTreeMap<String, String>,
    command: &'a [String],
}

/// Print the environment overrides and command line for `variant`.
pub async fn execute(config: &Path, variant: &str, format: PlanFormat) -> CommandResult<()> {
    let (project, set) = load_project(config).await?;
    let task = set
        .task(variant)
        .ok_or_else(|| ConfigError::UnknownVariant(variant.to_string()))?;

    let launcher = Launcher::from_process_env(project.compiler());
    let invocation = launcher.plan(&task)?;

    let output = match format {
        PlanFormat::Text => render_text(&task.name, &task.module_dir, &invocation),
        PlanFormat::Json => {
            let plan = Plan {
                task: &task.name,
                working_directory: &task.module_dir,
                output_directory: &task.output_dir,
                environment: &invocation.overrides,
                command: &invocation.args,
            };
            serde_json::to_string_pretty(&plan)? + "\n"
        }
    };
    print!("{}", output);
    Ok(())
}

fn render_text(task: &str, module_dir: &Path, invocation: &Invocation) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Task: {}", task);
    let _ = writeln!(out, "Working directory: {}", module_dir.display());
    let _ = writeln!(out, "Environment:");
    for (key, value) in &invocation.overrides {
        let _ = writeln!(out, "  {}={}", key, value);
    }
    let _ = writeln!(out, "Command:");
    let command: Vec<String> = invocation.args.iter().map(String::as_str).map(quote).collect();
    let _ = writeln!(out, "  {}", command.join(" "));
    out
}

/// Quote an argument for display when it would otherwise be ambiguous.
fn quote(arg: &str) -> String {
    if !arg.is_empty() && !arg.contains(|c: char| c.is_whitespace() || c == '"' || c == '\'') {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

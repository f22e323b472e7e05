//! Variant listing

use super::{CommandResult, load_project};
use convenient_golang::VariantSet;
use std::fmt::Write;
use std::path::Path;

/// Print every variant with its task name and output directory.
pub async fn execute(config: &Path) -> CommandResult<()> {
    let (_, set) = load_project(config).await?;
    print!("{}", render(&set));
    Ok(())
}

fn render(set: &VariantSet) -> String {
    let mut out = String::new();
    if set.is_empty() {
        out.push_str("No variants configured\n");
        return out;
    }

    for task in set.tasks() {
        let variant = &task.variant;
        let mode = variant
            .build_mode()
            .map(|m| m.to_string())
            .unwrap_or_else(|| "<unset>".to_string());
        let _ = writeln!(
            out,
            "{:<24} {}/{} {:<30} {}",
            variant.name(),
            variant.os().goos(),
            variant.arch().goarch(),
            mode,
            task.name
        );
        let _ = writeln!(out, "{:<24} -> {}", "", task.output_dir.display());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use convenient_golang::{Arch, BuildMode, Os, Variant};

    #[test]
    fn test_render_lists_tasks() {
        let mut set = VariantSet::new("/src", "/build");
        let _ = set
            .register(
                Variant::new("release")
                    .with_os(Os::Windows)
                    .with_arch(Arch::X86_32)
                    .with_build_mode(BuildMode::Executable),
            )
            .unwrap();

        let text = render(&set);
        assert!(text.contains("windows/386"));
        assert!(text.contains("compileGolangRelease"));
    }

    #[test]
    fn test_render_empty() {
        let set = VariantSet::new("/src", "/build");
        assert_eq!(render(&set), "No variants configured\n");
    }
}

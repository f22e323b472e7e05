//! Variant → toolchain invocation compiler.
//!
//! Turns a [`Variant`] into the environment and argument list for one
//! `go build` run. Compilation is pure: it reads only its inputs and
//! allocates fresh output, so the same variant and ambient snapshot always
//! produce the same [`Invocation`].

use crate::error::{ConfigError, ConfigResult};
use crate::variant::Variant;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;

/// Target operating system variable.
pub const ENV_GOOS: &str = "GOOS";
/// Target architecture variable.
pub const ENV_GOARCH: &str = "GOARCH";
/// ARM revision variable, 32-bit ARM only.
pub const ENV_GOARM: &str = "GOARM";
/// Interop enablement variable.
pub const ENV_CGO_ENABLED: &str = "CGO_ENABLED";
/// Native compiler variable.
pub const ENV_CC: &str = "CC";
/// Native compiler flags variable.
pub const ENV_CFLAGS: &str = "CFLAGS";

/// Default toolchain program.
pub const DEFAULT_TOOLCHAIN: &str = "go";

/// Linker values requesting symbol table and DWARF stripping.
const STRIP_LDFLAGS: &str = "-s -w";

/// Flags whose value is collected and re-emitted as a single argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Asm,
    Gc,
    Ld,
}

impl Marker {
    /// Emission order.
    const ALL: [Marker; 3] = [Marker::Asm, Marker::Gc, Marker::Ld];

    fn parse(token: &str) -> Option<Self> {
        match token {
            "-asmflags" => Some(Marker::Asm),
            "-gcflags" => Some(Marker::Gc),
            "-ldflags" => Some(Marker::Ld),
            _ => None,
        }
    }

    fn flag(self) -> &'static str {
        match self {
            Marker::Asm => "-asmflags",
            Marker::Gc => "-gcflags",
            Marker::Ld => "-ldflags",
        }
    }

    fn index(self) -> usize {
        match self {
            Marker::Asm => 0,
            Marker::Gc => 1,
            Marker::Ld => 2,
        }
    }
}

/// Result of splitting raw flags into pass-through tokens and grouped
/// marker values.
#[derive(Debug, Default, PartialEq, Eq)]
struct ClassifiedFlags {
    passthrough: Vec<String>,
    grouped: [Vec<String>; 3],
}

impl ClassifiedFlags {
    fn push(&mut self, marker: Marker, value: impl Into<String>) {
        self.grouped[marker.index()].push(value.into());
    }

    /// Pass-through tokens in original order, then one flag per non-empty
    /// marker group with its values joined by a space.
    fn into_args(self) -> Vec<String> {
        let mut args = self.passthrough;
        for marker in Marker::ALL {
            let values = &self.grouped[marker.index()];
            if !values.is_empty() {
                args.push(marker.flag().to_string());
                args.push(values.join(" "));
            }
        }
        args
    }
}

/// Split `flags` into pass-through tokens and marker groups.
///
/// # Errors
///
/// `ConfigError::MissingFlagValue` if a marker is the last token.
fn classify_flags(flags: &[String], classified: &mut ClassifiedFlags) -> ConfigResult<()> {
    let mut tokens = flags.iter();
    while let Some(token) = tokens.next() {
        match Marker::parse(token) {
            Some(marker) => {
                let value = tokens
                    .next()
                    .ok_or_else(|| ConfigError::MissingFlagValue(token.clone()))?;
                classified.push(marker, value.as_str());
            }
            None => classified.passthrough.push(token.clone()),
        }
    }
    Ok(())
}

/// Environment variables a variant sets, in a fixed order.
pub fn environment_overrides(variant: &Variant) -> Vec<(&'static str, String)> {
    let mut overrides = vec![
        (ENV_GOOS, variant.os().goos().to_string()),
        (ENV_GOARCH, variant.arch().goarch().to_string()),
    ];
    if let Some(goarm) = variant.arch().goarm() {
        overrides.push((ENV_GOARM, goarm.to_string()));
    }

    match variant.cgo() {
        Some(cgo) => {
            overrides.push((ENV_CGO_ENABLED, "1".to_string()));
            overrides.push((ENV_CC, cgo.cc().to_string()));
            if let Some(cflags) = cgo.cflags() {
                overrides.push((ENV_CFLAGS, cflags.to_string()));
            }
        }
        None => overrides.push((ENV_CGO_ENABLED, "0".to_string())),
    }
    overrides
}

/// Value of the `-o` flag: the file inside `output_dir`, or the directory
/// with a trailing separator so the toolchain picks the name.
pub fn output_path(output_dir: &Path, file_name: Option<&str>) -> String {
    match file_name {
        Some(name) => output_dir.join(name).display().to_string(),
        None => {
            let dir = output_dir.display().to_string();
            if dir.ends_with(std::path::MAIN_SEPARATOR) {
                dir
            } else {
                format!("{}{}", dir, std::path::MAIN_SEPARATOR)
            }
        }
    }
}

/// A compiled toolchain invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Invocation {
    /// Full environment: the ambient snapshot with overrides applied
    pub env: BTreeMap<String, String>,
    /// Only the variables set by the compiler
    pub overrides: BTreeMap<String, String>,
    /// Command line; the first element is the program
    pub args: Vec<String>,
}

impl Invocation {
    /// Program to run.
    pub fn program(&self) -> &str {
        self.args.first().map(String::as_str).unwrap_or_default()
    }

    /// Arguments after the program.
    pub fn arguments(&self) -> &[String] {
        self.args.get(1..).unwrap_or_default()
    }
}

/// Compiles variants into invocations of a Go toolchain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationCompiler {
    toolchain: String,
}

impl Default for InvocationCompiler {
    fn default() -> Self {
        Self::new(DEFAULT_TOOLCHAIN)
    }
}

impl InvocationCompiler {
    /// Create a compiler invoking `toolchain`.
    pub fn new(toolchain: impl Into<String>) -> Self {
        Self {
            toolchain: toolchain.into(),
        }
    }

    /// Toolchain program name.
    pub fn toolchain(&self) -> &str {
        &self.toolchain
    }

    /// Compile `variant` against an ambient environment snapshot.
    ///
    /// `output_dir` is used as given; callers pass an absolute path.
    ///
    /// # Errors
    ///
    /// - `ConfigError::UnsupportedBuildMode` if the build mode is unset or unknown
    /// - `ConfigError::MissingFlagValue` if a marker flag has no value
    pub fn compile<K, V, I>(
        &self,
        variant: &Variant,
        ambient: I,
        output_dir: &Path,
    ) -> ConfigResult<Invocation>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let args = self.arguments(variant, output_dir)?;

        let overrides: BTreeMap<String, String> = environment_overrides(variant)
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect();

        let mut env: BTreeMap<String, String> = ambient
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        env.extend(overrides.clone());

        Ok(Invocation {
            env,
            overrides,
            args,
        })
    }

    /// Build the ordered argument list for `variant`.
    ///
    /// # Errors
    ///
    /// `ConfigError::UnsupportedBuildMode` for an unset or unknown build mode,
    /// `ConfigError::MissingFlagValue` for a marker flag without a value.
    pub fn arguments(&self, variant: &Variant, output_dir: &Path) -> ConfigResult<Vec<String>> {
        let mut args = vec![
            self.toolchain.clone(),
            "build".to_string(),
            "-trimpath".to_string(),
            "-o".to_string(),
            output_path(output_dir, variant.file_name()),
        ];

        let mode = match variant.build_mode() {
            Some(mode) => mode
                .flag_value()
                .ok_or_else(|| ConfigError::UnsupportedBuildMode(mode.to_string()))?,
            None => return Err(ConfigError::UnsupportedBuildMode("unset".to_string())),
        };
        args.push("-buildmode".to_string());
        args.push(mode.to_string());

        if !variant.tags().is_empty() {
            args.push("-tags".to_string());
            args.push(variant.tags().join(","));
        }

        let mut classified = ClassifiedFlags::default();
        if variant.strip() {
            classified.push(Marker::Ld, STRIP_LDFLAGS);
        }
        classify_flags(variant.flags(), &mut classified)?;
        args.extend(classified.into_args());

        args.push(variant.package().to_string());
        Ok(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_classify_groups_markers() {
        let mut classified = ClassifiedFlags::default();
        classify_flags(
            &tokens(&["-ldflags", "-s", "-v", "-gcflags", "all=-N", "-ldflags", "-w"]),
            &mut classified,
        )
        .unwrap();

        assert_eq!(classified.passthrough, tokens(&["-v"]));
        assert_eq!(
            classified.into_args(),
            tokens(&["-v", "-gcflags", "all=-N", "-ldflags", "-s -w"])
        );
    }

    #[test]
    fn test_classify_marker_value_may_look_like_marker() {
        let mut classified = ClassifiedFlags::default();
        classify_flags(&tokens(&["-asmflags", "-ldflags"]), &mut classified).unwrap();
        assert_eq!(classified.into_args(), tokens(&["-asmflags", "-ldflags"]));
    }

    #[test]
    fn test_classify_trailing_marker_fails() {
        let mut classified = ClassifiedFlags::default();
        let err = classify_flags(&tokens(&["-x", "-gcflags"]), &mut classified).unwrap_err();
        assert_eq!(err, ConfigError::MissingFlagValue("-gcflags".to_string()));
    }

    #[cfg(unix)]
    #[test]
    fn test_output_path() {
        assert_eq!(output_path(Path::new("/out"), Some("app")), "/out/app");
        assert_eq!(output_path(Path::new("/out"), None), "/out/");
        assert_eq!(output_path(Path::new("/out/"), None), "/out/");
    }
}

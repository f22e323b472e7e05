//! Build variants: one named build target each.

use crate::error::ConfigResult;
use crate::ndk::NdkToolchain;
use crate::platform::{Arch, Os};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Compiler flags exported alongside a cgo compiler unless overridden.
pub const DEFAULT_CFLAGS: &str = "-O3 -Werror";

/// Kind of artifact produced by a build.
///
/// Unrecognised configuration values are kept as [`BuildMode::Unknown`] so a
/// variant can be configured partially and rejected only when compiled.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum BuildMode {
    /// Plain executable (`exe`)
    Executable,
    /// Position independent executable (`pie`)
    PositionIndependentExecutable,
    /// C shared library (`c-shared`)
    SharedLibrary,
    /// C static archive (`c-archive`)
    StaticArchive,
    /// Any other value
    Unknown(String),
}

impl BuildMode {
    /// Value passed to `-buildmode`, `None` for unknown modes.
    pub fn flag_value(&self) -> Option<&'static str> {
        match self {
            BuildMode::Executable => Some("exe"),
            BuildMode::PositionIndependentExecutable => Some("pie"),
            BuildMode::SharedLibrary => Some("c-shared"),
            BuildMode::StaticArchive => Some("c-archive"),
            BuildMode::Unknown(_) => None,
        }
    }
}

impl From<&str> for BuildMode {
    fn from(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "exe" | "executable" => BuildMode::Executable,
            "pie" | "position-independent-executable" => BuildMode::PositionIndependentExecutable,
            "c-shared" | "shared" | "shared-library" => BuildMode::SharedLibrary,
            "c-archive" | "archive" | "static-archive" => BuildMode::StaticArchive,
            _ => BuildMode::Unknown(value.to_string()),
        }
    }
}

impl From<String> for BuildMode {
    fn from(value: String) -> Self {
        BuildMode::from(value.as_str())
    }
}

impl From<BuildMode> for String {
    fn from(mode: BuildMode) -> Self {
        match mode {
            BuildMode::Unknown(value) => value,
            known => known.flag_value().unwrap_or_default().to_string(),
        }
    }
}

impl fmt::Display for BuildMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BuildMode::Executable => f.write_str("Executable"),
            BuildMode::PositionIndependentExecutable => f.write_str("PositionIndependentExecutable"),
            BuildMode::SharedLibrary => f.write_str("SharedLibrary"),
            BuildMode::StaticArchive => f.write_str("StaticArchive"),
            BuildMode::Unknown(value) => write!(f, "{value:?}"),
        }
    }
}

/// Native compiler binding that enables cgo.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cgo {
    cc: String,
    cflags: Option<String>,
}

impl Cgo {
    /// Bind a literal compiler command with the default compiler flags.
    pub fn new(cc: impl Into<String>) -> Self {
        Self {
            cc: cc.into(),
            cflags: Some(DEFAULT_CFLAGS.to_string()),
        }
    }

    /// Bind a literal compiler command without exporting compiler flags.
    pub fn without_cflags(cc: impl Into<String>) -> Self {
        Self {
            cc: cc.into(),
            cflags: None,
        }
    }

    /// Bind the NDK clang for `arch`, as seen from `host`.
    ///
    /// # Errors
    ///
    /// See [`NdkToolchain::resolve`].
    pub fn from_ndk(ndk: &NdkToolchain, host: Os, arch: Arch) -> ConfigResult<Self> {
        Ok(Self::new(ndk.resolve(host, arch)?))
    }

    /// Replace the exported compiler flags.
    pub fn with_cflags(mut self, cflags: Option<String>) -> Self {
        self.cflags = cflags;
        self
    }

    /// Compiler command exported as `CC`.
    pub fn cc(&self) -> &str {
        &self.cc
    }

    /// Compiler flags exported as `CFLAGS`.
    pub fn cflags(&self) -> Option<&str> {
        self.cflags.as_deref()
    }
}

/// A named build target.
///
/// Only the name is required. Architecture and operating system default to
/// the host; the build mode stays unset until configured and is validated
/// when the variant is compiled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Variant {
    name: String,
    file_name: Option<String>,
    build_mode: Option<BuildMode>,
    architecture: Arch,
    operating_system: Os,
    package_name: String,
    tags: Vec<String>,
    flags: Vec<String>,
    cgo: Option<Cgo>,
    strip: bool,
}

impl Variant {
    /// Create a variant targeting the host platform.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            file_name: None,
            build_mode: None,
            architecture: Arch::host(),
            operating_system: Os::host(),
            package_name: String::new(),
            tags: Vec::new(),
            flags: Vec::new(),
            cgo: None,
            strip: false,
        }
    }

    /// Set the output file name.
    pub fn with_file_name(mut self, file_name: impl Into<String>) -> Self {
        self.file_name = Some(file_name.into());
        self
    }

    /// Set the build mode.
    pub fn with_build_mode(mut self, mode: BuildMode) -> Self {
        self.build_mode = Some(mode);
        self
    }

    /// Set the target architecture.
    pub fn with_arch(mut self, arch: Arch) -> Self {
        self.architecture = arch;
        self
    }

    /// Set the target operating system.
    pub fn with_os(mut self, os: Os) -> Self {
        self.operating_system = os;
        self
    }

    /// Set the package path to build.
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package_name = package.into();
        self
    }

    /// Add build tags.
    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for tag in tags {
            self.add_tag(tag);
        }
        self
    }

    /// Append raw flag tokens.
    pub fn with_flags<I, S>(mut self, flags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.flags.extend(flags.into_iter().map(Into::into));
        self
    }

    /// Enable cgo with the given binding.
    pub fn with_cgo(mut self, cgo: Cgo) -> Self {
        self.cgo = Some(cgo);
        self
    }

    /// Request stripping of symbols and DWARF data.
    pub fn with_strip(mut self, strip: bool) -> Self {
        self.strip = strip;
        self
    }

    /// Replace the output file name.
    pub fn set_file_name(&mut self, file_name: Option<String>) {
        self.file_name = file_name;
    }

    /// Replace the build mode.
    pub fn set_build_mode(&mut self, mode: Option<BuildMode>) {
        self.build_mode = mode;
    }

    /// Replace the target architecture.
    pub fn set_arch(&mut self, arch: Arch) {
        self.architecture = arch;
    }

    /// Replace the target operating system.
    pub fn set_os(&mut self, os: Os) {
        self.operating_system = os;
    }

    /// Replace the package path.
    pub fn set_package(&mut self, package: impl Into<String>) {
        self.package_name = package.into();
    }

    /// Enable or disable cgo.
    pub fn set_cgo(&mut self, cgo: Option<Cgo>) {
        self.cgo = cgo;
    }

    /// Toggle stripping.
    pub fn set_strip(&mut self, strip: bool) {
        self.strip = strip;
    }

    /// Add a build tag; duplicates are ignored so first-seen order is kept.
    pub fn add_tag(&mut self, tag: impl Into<String>) {
        let tag = tag.into();
        if !self.tags.contains(&tag) {
            self.tags.push(tag);
        }
    }

    /// Append one raw flag token.
    pub fn push_flag(&mut self, flag: impl Into<String>) {
        self.flags.push(flag.into());
    }

    /// Unique variant name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Output file name, if any.
    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    /// Build mode, `None` until configured.
    pub fn build_mode(&self) -> Option<&BuildMode> {
        self.build_mode.as_ref()
    }

    /// Target architecture.
    pub fn arch(&self) -> Arch {
        self.architecture
    }

    /// Target operating system.
    pub fn os(&self) -> Os {
        self.operating_system
    }

    /// Package path passed last to the toolchain.
    pub fn package(&self) -> &str {
        &self.package_name
    }

    /// Build tags in first-seen order.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    /// Raw flag tokens in insertion order.
    pub fn flags(&self) -> &[String] {
        &self.flags
    }

    /// Cgo binding, `None` when cgo is disabled.
    pub fn cgo(&self) -> Option<&Cgo> {
        self.cgo.as_ref()
    }

    /// Whether symbols and DWARF data are stripped.
    pub fn strip(&self) -> bool {
        self.strip
    }
}

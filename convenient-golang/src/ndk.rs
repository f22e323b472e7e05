//! Android NDK clang resolution.
//!
//! The NDK ships one clang wrapper per target triple and API level under
//! `toolchains/llvm/prebuilt/<host>/bin`. Locating the wrapper is pure path
//! arithmetic; discovering where the NDK is installed is left to the caller.

use crate::error::{ConfigError, ConfigResult};
use crate::platform::{Arch, Os};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prebuilt toolchain directory for a host system.
///
/// # Errors
///
/// `ConfigError::UnsupportedHostPlatform` for hosts without prebuilt NDK
/// toolchains.
pub fn host_triplet(host: Os) -> ConfigResult<&'static str> {
    match host {
        Os::Windows => Ok("windows-x86_64"),
        Os::Linux => Ok("linux-x86_64"),
        Os::Darwin => Ok("darwin-x86_64"),
        Os::Android => Err(ConfigError::UnsupportedHostPlatform(host.to_string())),
    }
}

/// Clang wrapper prefix for a target architecture.
pub fn compiler_prefix(arch: Arch) -> &'static str {
    match arch {
        Arch::Arm64v8 => "aarch64-linux-android",
        Arch::Arm32v7 => "armv7a-linux-androideabi",
        Arch::X86_32 => "i686-linux-android",
        Arch::X86_64 => "x86_64-linux-android",
    }
}

/// Path of the clang wrapper inside an NDK.
///
/// # Errors
///
/// - `ConfigError::MissingMinPlatform` if no platform level is given
/// - `ConfigError::UnsupportedHostPlatform` for hosts without a prebuilt toolchain
pub fn compiler_path(
    ndk_root: &Path,
    host: Os,
    arch: Arch,
    min_platform: Option<u32>,
) -> ConfigResult<PathBuf> {
    let level = min_platform.ok_or(ConfigError::MissingMinPlatform)?;

    Ok(ndk_root
        .join("toolchains")
        .join("llvm")
        .join("prebuilt")
        .join(host_triplet(host)?)
        .join("bin")
        .join(format!("{}{}-clang", compiler_prefix(arch), level)))
}

/// Command string for the clang wrapper: the quoted path, followed by
/// `extra_flags` when non-empty.
pub fn resolve_compiler(
    ndk_root: &Path,
    host: Os,
    arch: Arch,
    min_platform: Option<u32>,
    extra_flags: Option<&str>,
) -> ConfigResult<String> {
    let path = compiler_path(ndk_root, host, arch, min_platform)?;
    let mut command = format!("\"{}\"", path.display());

    if let Some(flags) = extra_flags.map(str::trim).filter(|f| !f.is_empty()) {
        command.push(' ');
        command.push_str(flags);
    }

    debug!("Resolved NDK compiler for {}: {}", arch, command);
    Ok(command)
}

/// NDK location and settings shared by every Android variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdkToolchain {
    /// NDK installation root
    pub root: PathBuf,
    /// Minimum Android API level
    pub min_platform: Option<u32>,
    /// Extra compiler flags appended to the command
    pub flags: Option<String>,
}

impl NdkToolchain {
    /// Create a toolchain description without extra flags.
    pub fn new(root: impl Into<PathBuf>, min_platform: Option<u32>) -> Self {
        Self {
            root: root.into(),
            min_platform,
            flags: None,
        }
    }

    /// Set the extra compiler flags.
    pub fn with_flags(mut self, flags: impl Into<String>) -> Self {
        self.flags = Some(flags.into());
        self
    }

    /// Resolve the compiler command for `arch` as seen from `host`.
    ///
    /// # Errors
    ///
    /// See [`resolve_compiler`].
    pub fn resolve(&self, host: Os, arch: Arch) -> ConfigResult<String> {
        resolve_compiler(
            &self.root,
            host,
            arch,
            self.min_platform,
            self.flags.as_deref(),
        )
    }
}

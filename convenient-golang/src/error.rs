//! Error types for variant compilation and builds.

use std::path::PathBuf;
use std::process::ExitStatus;

/// Configuration errors. None of these are retryable; they are reported
/// before any toolchain process is spawned.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    /// Build mode is unset or not one of the supported kinds
    #[error("Unsupported build mode {0}")]
    UnsupportedBuildMode(String),

    /// Host platform has no prebuilt NDK toolchain
    #[error("Unsupported platform: {0}")]
    UnsupportedHostPlatform(String),

    /// Minimum platform level was not configured
    #[error("minSdk required")]
    MissingMinPlatform,

    /// Marker flag at the end of the flag list
    #[error("Flag {0} requires a value")]
    MissingFlagValue(String),

    /// Two variants registered under the same name
    #[error("Variant {0} already registered")]
    DuplicateVariant(String),

    /// Registered variants can not be removed
    #[error("Remove variant {0} may cause tasks dependency issues")]
    VariantRemoval(String),

    /// No variant with this name
    #[error("Variant {0} not found")]
    UnknownVariant(String),

    /// An Android cgo binding was requested without an NDK location
    #[error("Android NDK directory not configured (set android.ndk or ANDROID_NDK_HOME)")]
    MissingNdkRoot,

    /// File system I/O error
    #[error("IO error reading {0}: {1}")]
    Io(PathBuf, String),

    /// YAML parsing error
    #[error("Parse error in {0}: {1}")]
    Parse(PathBuf, String),
}

/// Errors raised while building a variant.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// The variant could not be compiled into an invocation
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The output directory could not be created
    #[error("Failed to prepare output directory {0}: {1}")]
    Staging(PathBuf, String),

    /// The toolchain process could not be started
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        /// Program that failed to start
        program: String,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The toolchain exited unsuccessfully
    #[error("Task {task} failed: toolchain exited with {status}")]
    ToolchainFailed {
        /// Task name
        task: String,
        /// Exit status reported by the process
        status: ExitStatus,
    },

    /// A concurrently running build panicked, was cancelled, or could not
    /// obtain a build slot
    #[error("Build task aborted: {0}")]
    Join(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

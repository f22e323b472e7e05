//! Go cross-compilation variants for convenient builds.
//!
//! This crate turns a declarative build variant (target OS, architecture,
//! build mode, tags, flags and an optional cgo compiler) into the exact
//! environment and command line for `go build`:
//!
//! - [`Variant`]: one named build target
//! - [`InvocationCompiler`]: pure variant → [`Invocation`] translation
//! - [`ndk`]: Android NDK clang resolution for cgo
//! - [`VariantSet`]: unique-name registry binding variants to build tasks
//! - [`Launcher`]: stages output directories and runs the toolchain
//! - [`ProjectConfig`]: YAML project file
//!
//! # Example
//!
//! ```
//! use convenient_golang::{Arch, BuildMode, InvocationCompiler, Os, Variant};
//! use std::collections::BTreeMap;
//! use std::path::Path;
//!
//! let variant = Variant::new("release")
//!     .with_os(Os::Linux)
//!     .with_arch(Arch::X86_64)
//!     .with_build_mode(BuildMode::Executable)
//!     .with_tags(["prod"])
//!     .with_package("./cmd/app");
//!
//! let invocation = InvocationCompiler::default()
//!     .compile(&variant, BTreeMap::<String, String>::new(), Path::new("/out"))
//!     .unwrap();
//!
//! assert_eq!(invocation.env["GOOS"], "linux");
//! assert_eq!(invocation.args.last().map(String::as_str), Some("./cmd/app"));
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod error;
pub mod invocation;
pub mod launcher;
pub mod ndk;
pub mod platform;
pub mod registry;
pub mod staging;
pub mod variant;

pub use config::ProjectConfig;
pub use error::{BuildError, ConfigError, ConfigResult};
pub use invocation::{Invocation, InvocationCompiler};
pub use launcher::{BuildReport, Launcher};
pub use ndk::{NdkToolchain, resolve_compiler};
pub use platform::{Arch, Os};
pub use registry::{BuildTask, VariantSet, task_name};
pub use staging::prepare_output_dir;
pub use variant::{BuildMode, Cgo, Variant};

//! YAML project configuration.
//!
//! A project file names the Go module, where outputs go, and the variants to
//! build:
//!
//! ```yaml
//! module_directory: go
//! android:
//!   ndk: /opt/android-ndk
//!   min_sdk: 21
//! variants:
//!   - name: release
//!     build_mode: exe
//!     os: linux
//!     arch: amd64
//!     package: ./cmd/app
//!     tags: [prod]
//!   - name: androidArm64
//!     build_mode: c-shared
//!     os: android
//!     arch: arm64
//!     cgo:
//!       android:
//!         flags: -fPIC
//! ```
//!
//! Relative paths are resolved against the directory holding the file.

use crate::error::{ConfigError, ConfigResult};
use crate::invocation::InvocationCompiler;
use crate::ndk::NdkToolchain;
use crate::platform::{Arch, Os};
use crate::registry::VariantSet;
use crate::variant::{BuildMode, Cgo, Variant};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variables consulted, in order, when `android.ndk` is unset.
pub const NDK_ENV_VARS: [&str; 2] = ["ANDROID_NDK_HOME", "ANDROID_NDK_ROOT"];

/// Default project file name.
pub const DEFAULT_CONFIG_FILE: &str = "golang.yml";

/// Top-level project file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProjectConfig {
    /// Go module directory
    pub module_directory: PathBuf,
    /// Build directory (default: `build`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_directory: Option<PathBuf>,
    /// Toolchain program (default: `go`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub toolchain: Option<String>,
    /// NDK settings for `cgo.android` bindings
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android: Option<AndroidConfig>,
    /// Variants in registration order
    #[serde(default)]
    pub variants: Vec<VariantConfig>,
    #[serde(skip)]
    source: PathBuf,
}

/// NDK settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AndroidConfig {
    /// NDK installation root
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ndk: Option<PathBuf>,
    /// Minimum Android API level
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_sdk: Option<u32>,
}

/// One variant entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VariantConfig {
    /// Unique variant name
    pub name: String,
    /// Output file name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    /// Build mode, e.g. `exe` or `c-shared`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub build_mode: Option<BuildMode>,
    /// Target architecture (default: host)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arch: Option<Arch>,
    /// Target operating system (default: host)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub os: Option<Os>,
    /// Package path to build
    #[serde(default, alias = "package_name")]
    pub package: String,
    /// Build tags
    #[serde(default)]
    pub tags: Vec<String>,
    /// Raw flag tokens
    #[serde(default)]
    pub flags: Vec<String>,
    /// Strip symbols and DWARF data
    #[serde(default)]
    pub strip: bool,
    /// Cgo binding; cgo is disabled when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cgo: Option<CgoConfig>,
}

/// Native compiler binding: a literal `cc`, or an NDK clang.
///
/// `cflags` replaces the default compiler flags; an empty string exports none.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CgoConfig {
    /// Literal compiler command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cc: Option<String>,
    /// Compiler flags exported as `CFLAGS`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cflags: Option<String>,
    /// Resolve the compiler from the NDK instead of `cc`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub android: Option<AndroidCgoConfig>,
}

/// NDK clang binding.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct AndroidCgoConfig {
    /// Extra flags appended to the compiler command
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<String>,
}

impl ProjectConfig {
    /// Load and parse a project file.
    ///
    /// # Errors
    ///
    /// `ConfigError::Io` if the file can not be read, `ConfigError::Parse`
    /// if it is not a valid project file.
    pub async fn load(path: impl AsRef<Path>) -> ConfigResult<Self> {
        let path = path.as_ref();
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e.to_string()))?;

        let config = Self::parse(&content, path)?;
        info!(
            "Loaded {} variant(s) from {}",
            config.variants.len(),
            path.display()
        );
        Ok(config)
    }

    /// Parse project file `content` that was read from `path`.
    ///
    /// # Errors
    ///
    /// `ConfigError::Parse` for invalid YAML.
    pub fn parse(content: &str, path: &Path) -> ConfigResult<Self> {
        let mut config: ProjectConfig = serde_yaml::from_str(content)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e.to_string()))?;
        config.source = path.to_path_buf();
        Ok(config)
    }

    /// Path the configuration was read from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Directory relative paths are resolved against.
    pub fn base_dir(&self) -> PathBuf {
        let parent = self
            .source
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        std::path::absolute(parent).unwrap_or_else(|_| parent.to_path_buf())
    }

    /// Absolute module directory.
    pub fn module_dir(&self) -> PathBuf {
        self.base_dir().join(&self.module_directory)
    }

    /// Absolute build directory.
    pub fn build_dir(&self) -> PathBuf {
        let build = self
            .build_directory
            .clone()
            .unwrap_or_else(|| PathBuf::from("build"));
        self.base_dir().join(build)
    }

    /// Invocation compiler for the configured toolchain.
    pub fn compiler(&self) -> InvocationCompiler {
        match &self.toolchain {
            Some(toolchain) => InvocationCompiler::new(toolchain.clone()),
            None => InvocationCompiler::default(),
        }
    }

    /// Register every variant for the current host, looking up the NDK in the
    /// process environment if needed.
    ///
    /// # Errors
    ///
    /// See [`ProjectConfig::variant_set_with`].
    pub fn variant_set(&self) -> ConfigResult<VariantSet> {
        self.variant_set_with(Os::host(), |key| std::env::var(key).ok())
    }

    /// Register every variant as seen from `host`, using `env` for NDK
    /// lookups.
    ///
    /// # Errors
    ///
    /// - `ConfigError::DuplicateVariant` for a repeated name
    /// - `ConfigError::MissingNdkRoot` / `ConfigError::MissingMinPlatform` for
    ///   Android bindings without NDK settings
    /// - `ConfigError::Parse` for a `cgo` entry with neither `cc` nor `android`
    pub fn variant_set_with<F>(&self, host: Os, env: F) -> ConfigResult<VariantSet>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut set = VariantSet::new(self.module_dir(), self.build_dir());

        for entry in &self.variants {
            let variant = self.variant(entry, host, &env)?;
            let _ = set.register(variant)?;
        }

        debug!("Registered variants: {:?}", set.names());
        Ok(set)
    }

    fn variant<F>(&self, entry: &VariantConfig, host: Os, env: &F) -> ConfigResult<Variant>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut variant = Variant::new(entry.name.clone())
            .with_package(entry.package.clone())
            .with_tags(entry.tags.iter().cloned())
            .with_flags(entry.flags.iter().cloned())
            .with_strip(entry.strip);

        variant.set_file_name(entry.file_name.clone());
        variant.set_build_mode(entry.build_mode.clone());
        if let Some(arch) = entry.arch {
            variant.set_arch(arch);
        }
        if let Some(os) = entry.os {
            variant.set_os(os);
        }

        if let Some(cgo) = &entry.cgo {
            variant.set_cgo(Some(self.cgo(entry, cgo, variant.arch(), host, env)?));
        }
        Ok(variant)
    }

    fn cgo<F>(
        &self,
        entry: &VariantConfig,
        cgo: &CgoConfig,
        arch: Arch,
        host: Os,
        env: &F,
    ) -> ConfigResult<Cgo>
    where
        F: Fn(&str) -> Option<String>,
    {
        let binding = match (&cgo.cc, &cgo.android) {
            (Some(cc), _) => Cgo::new(cc.clone()),
            (None, Some(android)) => {
                let mut ndk = self.ndk(env)?;
                ndk.flags = android.flags.clone();
                Cgo::from_ndk(&ndk, host, arch)?
            }
            (None, None) => {
                return Err(ConfigError::Parse(
                    self.source.clone(),
                    format!("variant {}: cgo requires `cc` or `android`", entry.name),
                ));
            }
        };

        Ok(match &cgo.cflags {
            Some(cflags) if cflags.trim().is_empty() => binding.with_cflags(None),
            Some(cflags) => binding.with_cflags(Some(cflags.clone())),
            None => binding,
        })
    }

    fn ndk<F>(&self, env: &F) -> ConfigResult<NdkToolchain>
    where
        F: Fn(&str) -> Option<String>,
    {
        let android = self.android.clone().unwrap_or_default();

        let root = match android.ndk {
            Some(root) => self.base_dir().join(root),
            None => NDK_ENV_VARS
                .iter()
                .find_map(|key| env(*key).filter(|v| !v.is_empty()))
                .map(PathBuf::from)
                .ok_or(ConfigError::MissingNdkRoot)?,
        };

        Ok(NdkToolchain::new(root, android.min_sdk))
    }
}

//! Named variant container and per-variant build task binding.

use crate::error::{ConfigError, ConfigResult};
use crate::variant::Variant;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix of every generated build task name.
pub const TASK_PREFIX: &str = "compileGolang";

/// Task name for a variant: `compileGolang` followed by the variant name with
/// its first character upper-cased.
pub fn task_name(variant_name: &str) -> String {
    let mut chars = variant_name.chars();
    match chars.next() {
        Some(first) => format!("{}{}{}", TASK_PREFIX, first.to_uppercase(), chars.as_str()),
        None => TASK_PREFIX.to_string(),
    }
}

/// A variant bound to the directories its build runs in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildTask {
    /// Task name (e.g., "compileGolangRelease")
    pub name: String,
    /// Variant to build
    pub variant: Variant,
    /// Go module directory, used as working directory
    pub module_dir: PathBuf,
    /// Directory receiving the build output
    pub output_dir: PathBuf,
}

/// Registered variants of one project.
///
/// Names are unique and a registered variant can never be removed: each one
/// has a task and an output directory bound to its name. Variants may still
/// be mutated after registration.
#[derive(Debug, Clone)]
pub struct VariantSet {
    module_dir: PathBuf,
    build_dir: PathBuf,
    variants: Vec<Variant>,
}

impl VariantSet {
    /// Create an empty set for the module in `module_dir`, writing outputs
    /// under `build_dir`.
    pub fn new(module_dir: impl Into<PathBuf>, build_dir: impl Into<PathBuf>) -> Self {
        Self {
            module_dir: module_dir.into(),
            build_dir: build_dir.into(),
            variants: Vec::new(),
        }
    }

    /// Go module directory tasks run in.
    pub fn module_dir(&self) -> &Path {
        &self.module_dir
    }

    /// Root of the build directory.
    pub fn build_dir(&self) -> &Path {
        &self.build_dir
    }

    /// Output directory bound to a variant name.
    pub fn output_dir(&self, variant_name: &str) -> PathBuf {
        self.build_dir
            .join("outputs")
            .join("golang")
            .join(variant_name)
    }

    /// Register a variant.
    ///
    /// # Errors
    ///
    /// `ConfigError::DuplicateVariant` if the name is taken.
    pub fn register(&mut self, variant: Variant) -> ConfigResult<&mut Variant> {
        if self.contains(variant.name()) {
            return Err(ConfigError::DuplicateVariant(variant.name().to_string()));
        }

        debug!(
            "Registered variant {} as {}",
            variant.name(),
            task_name(variant.name())
        );
        let index = self.variants.len();
        self.variants.push(variant);
        Ok(&mut self.variants[index])
    }

    /// Removal is always rejected; the set is left unchanged.
    ///
    /// # Errors
    ///
    /// `ConfigError::VariantRemoval` for a registered name,
    /// `ConfigError::UnknownVariant` otherwise.
    pub fn remove(&mut self, name: &str) -> ConfigResult<()> {
        if self.contains(name) {
            Err(ConfigError::VariantRemoval(name.to_string()))
        } else {
            Err(ConfigError::UnknownVariant(name.to_string()))
        }
    }

    /// Whether a variant with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Look up a variant by name.
    pub fn get(&self, name: &str) -> Option<&Variant> {
        self.variants.iter().find(|v| v.name() == name)
    }

    /// Look up a variant by name for mutation.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut Variant> {
        self.variants.iter_mut().find(|v| v.name() == name)
    }

    /// Variants in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Variant> {
        self.variants.iter()
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.variants.iter().map(Variant::name).collect()
    }

    /// Number of registered variants.
    pub fn len(&self) -> usize {
        self.variants.len()
    }

    /// Whether no variant is registered.
    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    /// Build task for a registered variant.
    pub fn task(&self, name: &str) -> Option<BuildTask> {
        self.get(name).map(|variant| self.bind(variant))
    }

    /// Build tasks for every variant, in registration order.
    pub fn tasks(&self) -> Vec<BuildTask> {
        self.variants.iter().map(|v| self.bind(v)).collect()
    }

    /// Build tasks for the named variants, or all of them if `names` is empty.
    ///
    /// Repeated names yield a single task, at the position of their first
    /// occurrence, so no two tasks share an output directory.
    ///
    /// # Errors
    ///
    /// `ConfigError::UnknownVariant` for the first name that is not registered.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> ConfigResult<Vec<BuildTask>> {
        if names.is_empty() {
            return Ok(self.tasks());
        }

        let mut seen = HashSet::new();
        let mut tasks = Vec::with_capacity(names.len());
        for name in names.iter().map(AsRef::as_ref) {
            let task = self
                .task(name)
                .ok_or_else(|| ConfigError::UnknownVariant(name.to_string()))?;
            if seen.insert(name) {
                tasks.push(task);
            } else {
                debug!("Variant {} selected more than once", name);
            }
        }
        Ok(tasks)
    }

    fn bind(&self, variant: &Variant) -> BuildTask {
        BuildTask {
            name: task_name(variant.name()),
            variant: variant.clone(),
            module_dir: self.module_dir.clone(),
            output_dir: self.output_dir(variant.name()),
        }
    }
}

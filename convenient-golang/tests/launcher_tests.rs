//! Launcher tests driving `sh` as a stand-in toolchain.
//!
//! With `sh` as the program the compiled command line becomes
//! `sh build -trimpath -o <out> ...`, so a `build` script in the module
//! directory plays the toolchain.

#![cfg(unix)]

use convenient_golang::{
    Arch, BuildError, BuildMode, ConfigError, InvocationCompiler, Launcher, Os, Variant,
    VariantSet,
};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use tracing_test::traced_test;

fn write_toolchain(module_dir: &Path, script: &str) {
    fs::create_dir_all(module_dir).unwrap();
    fs::write(module_dir.join("build"), script).unwrap();
}

fn launcher() -> Launcher {
    let mut ambient = BTreeMap::new();
    let _ = ambient.insert("PATH".to_string(), "/usr/bin:/bin".to_string());
    Launcher::new(InvocationCompiler::new("sh"), ambient)
}

fn variant(name: &str) -> Variant {
    Variant::new(name)
        .with_os(Os::Android)
        .with_arch(Arch::Arm32v7)
        .with_build_mode(BuildMode::SharedLibrary)
        .with_file_name("libapp.so")
        .with_package("./lib")
}

#[tokio::test]
#[traced_test]
async fn test_run_builds_in_module_dir_with_environment() {
    let temp = TempDir::new().unwrap();
    let module = temp.path().join("go");
    // $3 is the -o value
    write_toolchain(
        &module,
        "printf '%s %s %s %s' \"$GOOS\" \"$GOARCH\" \"$GOARM\" \"$CGO_ENABLED\" > \"$3\"\n",
    );

    let mut set = VariantSet::new(&module, temp.path().join("build"));
    let _ = set.register(variant("release")).unwrap();
    let task = set.task("release").unwrap();

    let report = launcher().run(&task).await.unwrap();

    assert_eq!(report.task, "compileGolangRelease");
    let artifact = fs::read_to_string(task.output_dir.join("libapp.so")).unwrap();
    assert_eq!(artifact, "android arm 7 0");
}

#[tokio::test]
async fn test_run_clears_stale_outputs() {
    let temp = TempDir::new().unwrap();
    let module = temp.path().join("go");
    write_toolchain(&module, "touch \"$3\"\n");

    let mut set = VariantSet::new(&module, temp.path().join("build"));
    let _ = set.register(variant("release")).unwrap();
    let task = set.task("release").unwrap();

    fs::create_dir_all(&task.output_dir).unwrap();
    fs::write(task.output_dir.join("stale.h"), b"old").unwrap();

    let _ = launcher().run(&task).await.unwrap();

    assert!(!task.output_dir.join("stale.h").exists());
    assert!(task.output_dir.join("libapp.so").exists());
}

#[tokio::test]
async fn test_nonzero_exit_is_fatal() {
    let temp = TempDir::new().unwrap();
    let module = temp.path().join("go");
    write_toolchain(&module, "exit 3\n");

    let mut set = VariantSet::new(&module, temp.path().join("build"));
    let _ = set.register(variant("broken")).unwrap();
    let task = set.task("broken").unwrap();

    let err = launcher().run(&task).await.unwrap_err();
    match err {
        BuildError::ToolchainFailed { task, status } => {
            assert_eq!(task, "compileGolangBroken");
            assert_eq!(status.code(), Some(3));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_config_error_happens_before_staging() {
    let temp = TempDir::new().unwrap();
    let module = temp.path().join("go");
    write_toolchain(&module, "exit 0\n");

    let mut set = VariantSet::new(&module, temp.path().join("build"));
    let _ = set.register(Variant::new("unset")).unwrap();
    let task = set.task("unset").unwrap();

    fs::create_dir_all(&task.output_dir).unwrap();
    fs::write(task.output_dir.join("previous.so"), b"keep").unwrap();

    let err = launcher().run(&task).await.unwrap_err();
    assert!(matches!(
        err,
        BuildError::Config(ConfigError::UnsupportedBuildMode(_))
    ));
    assert!(task.output_dir.join("previous.so").exists());
}

#[tokio::test]
async fn test_missing_toolchain_is_spawn_error() {
    let temp = TempDir::new().unwrap();
    let module = temp.path().join("go");
    fs::create_dir_all(&module).unwrap();

    let mut set = VariantSet::new(&module, temp.path().join("build"));
    let _ = set.register(variant("release")).unwrap();
    let task = set.task("release").unwrap();

    let launcher = Launcher::new(
        InvocationCompiler::new("/nonexistent/toolchain/go"),
        BTreeMap::new(),
    );
    let err = launcher.run(&task).await.unwrap_err();
    assert!(matches!(err, BuildError::Spawn { .. }));
}

#[tokio::test]
async fn test_run_all_reports_in_task_order() {
    let temp = TempDir::new().unwrap();
    let module = temp.path().join("go");
    write_toolchain(&module, "touch \"$3\"\n");

    let mut set = VariantSet::new(&module, temp.path().join("build"));
    for name in ["a", "b", "c"] {
        let _ = set.register(variant(name)).unwrap();
    }

    let reports = launcher().run_all(set.tasks(), 2).await.unwrap();
    let names: Vec<_> = reports.iter().map(|r| r.task.as_str()).collect();
    assert_eq!(names, vec!["compileGolangA", "compileGolangB", "compileGolangC"]);
}

#[tokio::test]
async fn test_run_all_returns_earliest_failure() {
    let temp = TempDir::new().unwrap();
    let module = temp.path().join("go");
    write_toolchain(&module, "touch \"$3\"\n");

    let mut set = VariantSet::new(&module, temp.path().join("build"));
    let _ = set.register(variant("ok")).unwrap();
    let _ = set.register(Variant::new("bad")).unwrap();

    let err = launcher().run_all(set.tasks(), 4).await.unwrap_err();
    assert!(matches!(err, BuildError::Config(_)));
    // The healthy task still ran.
    assert!(set.output_dir("ok").join("libapp.so").exists());
}

//! Project file loading tests

use convenient_golang::invocation::{ENV_CC, ENV_CFLAGS};
use convenient_golang::{Arch, BuildMode, ConfigError, Launcher, Os, ProjectConfig};
use std::collections::BTreeMap;
use tempfile::TempDir;
use tokio::fs;

const PROJECT: &str = r#"
module_directory: go
build_directory: out
toolchain: go1.22
android:
  ndk: sdk/ndk/26.1
  min_sdk: 21
variants:
  - name: release
    file_name: app
    build_mode: exe
    os: linux
    arch: amd64
    package: ./cmd/app
    tags: [prod, netgo]
    flags: ["-ldflags", "-X main.version=1.0"]
    strip: true
  - name: androidArm64
    build_mode: c-shared
    file_name: libclash.so
    os: android
    arch: arm64
    package: ./lib
    cgo:
      android:
        flags: -fPIC
  - name: hostCgo
    build_mode: c-archive
    cgo:
      cc: clang
      cflags: ""
"#;

async fn write_project(content: &str) -> (TempDir, std::path::PathBuf) {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("golang.yml");
    fs::write(&path, content).await.unwrap();
    (temp, path)
}

#[tokio::test]
async fn test_load_project() {
    let (temp, path) = write_project(PROJECT).await;

    let config = ProjectConfig::load(&path).await.unwrap();
    let set = config.variant_set_with(Os::Linux, |_| None).unwrap();

    assert_eq!(set.names(), vec!["release", "androidArm64", "hostCgo"]);
    assert_eq!(set.module_dir(), temp.path().join("go"));
    assert_eq!(
        set.output_dir("release"),
        temp.path().join("out").join("outputs").join("golang").join("release")
    );
    assert_eq!(config.compiler().toolchain(), "go1.22");

    let release = set.get("release").unwrap();
    assert_eq!(release.build_mode(), Some(&BuildMode::Executable));
    assert_eq!(release.arch(), Arch::X86_64);
    assert_eq!(release.tags(), &["prod", "netgo"]);
    assert!(release.strip());
}

#[tokio::test]
async fn test_android_binding_resolves_ndk_clang() {
    let (temp, path) = write_project(PROJECT).await;

    let config = ProjectConfig::load(&path).await.unwrap();
    let set = config.variant_set_with(Os::Linux, |_| None).unwrap();

    let cc = set.get("androidArm64").and_then(|v| v.cgo()).unwrap().cc();
    let expected_path = temp
        .path()
        .join("sdk/ndk/26.1")
        .join("toolchains/llvm/prebuilt/linux-x86_64/bin/aarch64-linux-android21-clang");
    assert_eq!(cc, format!("\"{}\" -fPIC", expected_path.display()));
}

#[tokio::test]
async fn test_plan_uses_loaded_settings() {
    let (_temp, path) = write_project(PROJECT).await;

    let config = ProjectConfig::load(&path).await.unwrap();
    let set = config.variant_set_with(Os::Darwin, |_| None).unwrap();
    let launcher = Launcher::new(config.compiler(), BTreeMap::new());

    let release = launcher.plan(&set.task("release").unwrap()).unwrap();
    assert_eq!(release.program(), "go1.22");
    assert_eq!(
        &release.args[release.args.len() - 5..],
        &[
            "-tags".to_string(),
            "prod,netgo".to_string(),
            "-ldflags".to_string(),
            "-s -w -X main.version=1.0".to_string(),
            "./cmd/app".to_string(),
        ][..]
    );

    let host = launcher.plan(&set.task("hostCgo").unwrap()).unwrap();
    assert_eq!(host.overrides[ENV_CC], "clang");
    assert!(!host.overrides.contains_key(ENV_CFLAGS));
}

#[tokio::test]
async fn test_missing_min_sdk() {
    let (_temp, path) = write_project(
        r#"
module_directory: .
android:
  ndk: /opt/ndk
variants:
  - name: android
    os: android
    cgo:
      android: {}
"#,
    )
    .await;

    let config = ProjectConfig::load(&path).await.unwrap();
    let err = config.variant_set_with(Os::Linux, |_| None).unwrap_err();
    assert_eq!(err, ConfigError::MissingMinPlatform);
}

#[tokio::test]
async fn test_android_host_is_unsupported() {
    let (_temp, path) = write_project(PROJECT).await;

    let config = ProjectConfig::load(&path).await.unwrap();
    let err = config.variant_set_with(Os::Android, |_| None).unwrap_err();
    assert_eq!(err, ConfigError::UnsupportedHostPlatform("Android".to_string()));
}

#[tokio::test]
async fn test_duplicate_names_rejected() {
    let (_temp, path) = write_project(
        r#"
module_directory: .
variants:
  - name: release
  - name: release
"#,
    )
    .await;

    let config = ProjectConfig::load(&path).await.unwrap();
    let err = config.variant_set_with(Os::Linux, |_| None).unwrap_err();
    assert_eq!(err, ConfigError::DuplicateVariant("release".to_string()));
}

#[tokio::test]
async fn test_missing_file() {
    let temp = TempDir::new().unwrap();
    let err = ProjectConfig::load(temp.path().join("absent.yml"))
        .await
        .unwrap_err();
    assert!(matches!(err, ConfigError::Io(_, _)));
}

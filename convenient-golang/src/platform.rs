//! Target platforms and their toolchain spellings.
//!
//! Every mapping from an enum variant to a toolchain value lives in one
//! `match` so the tables can be read (and tested) on their own.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Target (or host) operating system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Os {
    /// Android
    Android,
    /// Windows
    Windows,
    /// Linux
    Linux,
    /// macOS
    #[serde(alias = "macos", alias = "osx")]
    Darwin,
}

impl Os {
    /// All operating systems, in declaration order.
    pub const ALL: [Os; 4] = [Os::Android, Os::Windows, Os::Linux, Os::Darwin];

    /// Detect the operating system this process runs on.
    ///
    /// Unknown systems fall back to Linux.
    pub fn host() -> Self {
        Self::from_rust_os(std::env::consts::OS)
    }

    /// Map a `std::env::consts::OS` value.
    pub fn from_rust_os(os: &str) -> Self {
        match os {
            "windows" => Os::Windows,
            "macos" | "ios" => Os::Darwin,
            "android" => Os::Android,
            _ => Os::Linux,
        }
    }

    /// Value of `GOOS` for this system.
    pub fn goos(self) -> &'static str {
        match self {
            Os::Android => "android",
            Os::Windows => "windows",
            Os::Linux => "linux",
            Os::Darwin => "darwin",
        }
    }
}

impl fmt::Display for Os {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Os::Android => "Android",
            Os::Windows => "Windows",
            Os::Linux => "Linux",
            Os::Darwin => "Darwin",
        };
        f.write_str(name)
    }
}

/// Target CPU architecture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Arch {
    /// 32-bit ARM, revision 7
    #[serde(rename = "armv7", alias = "arm7", alias = "arm")]
    Arm32v7,
    /// 64-bit ARM
    #[serde(rename = "arm64", alias = "arm8", alias = "armv8", alias = "aarch64")]
    Arm64v8,
    /// 32-bit x86
    #[serde(rename = "386", alias = "i386", alias = "x86", alias = "i686")]
    X86_32,
    /// 64-bit x86
    #[serde(rename = "amd64", alias = "x86_64")]
    X86_64,
}

impl Arch {
    /// All architectures, in declaration order.
    pub const ALL: [Arch; 4] = [Arch::Arm32v7, Arch::Arm64v8, Arch::X86_32, Arch::X86_64];

    /// Detect the architecture this process runs on.
    ///
    /// Unknown architectures fall back to x86-64.
    pub fn host() -> Self {
        Self::from_rust_arch(std::env::consts::ARCH)
    }

    /// Map a `std::env::consts::ARCH` value.
    pub fn from_rust_arch(arch: &str) -> Self {
        match arch {
            "x86_64" => Arch::X86_64,
            "x86" => Arch::X86_32,
            "aarch64" => Arch::Arm64v8,
            "arm" => Arch::Arm32v7,
            _ => Arch::X86_64,
        }
    }

    /// Value of `GOARCH` for this architecture.
    pub fn goarch(self) -> &'static str {
        match self {
            Arch::Arm32v7 => "arm",
            Arch::Arm64v8 => "arm64",
            Arch::X86_32 => "386",
            Arch::X86_64 => "amd64",
        }
    }

    /// Value of `GOARM`, only set for 32-bit ARM.
    pub fn goarm(self) -> Option<&'static str> {
        match self {
            Arch::Arm32v7 => Some("7"),
            Arch::Arm64v8 | Arch::X86_32 | Arch::X86_64 => None,
        }
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Arch::Arm32v7 => "Arm32v7",
            Arch::Arm64v8 => "Arm64v8",
            Arch::X86_32 => "X86_32",
            Arch::X86_64 => "X86_64",
        };
        f.write_str(name)
    }
}

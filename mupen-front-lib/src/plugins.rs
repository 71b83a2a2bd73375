//! Presence check for the native emulator libraries.
//!
//! The front-end never loads these itself; it only verifies that the files
//! the emulator core needs are installed before launching it.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// A native library the emulator may load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NativeLib {
    pub file_name: &'static str,
    pub role: &'static str,
    pub required: bool,
}

const fn lib(file_name: &'static str, role: &'static str, required: bool) -> NativeLib {
    NativeLib {
        file_name,
        role,
        required,
    }
}

pub const NATIVE_LIBS: &[NativeLib] = &[
    lib("libmupen64plus-core.so", "core", true),
    lib("libmupen64plus-rsp-hle.so", "rsp", true),
    lib("libmupen64plus-input-android.so", "input", true),
    lib("libmupen64plus-audio-sles.so", "audio", true),
    lib("libmupen64plus-video-gliden64.so", "video", false),
    lib("libmupen64plus-video-glide64mk2.so", "video", false),
    lib("libmupen64plus-video-rice.so", "video", false),
    lib("libmupen64plus-video-gln64.so", "video", false),
    lib("libae-bridge.so", "bridge", true),
];

#[derive(Debug, Clone, Serialize)]
pub struct LibStatus {
    pub file_name: &'static str,
    pub role: &'static str,
    pub required: bool,
    pub path: PathBuf,
    pub present: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct PluginReport {
    pub dir: PathBuf,
    pub libs: Vec<LibStatus>,
}

impl PluginReport {
    /// All required libraries are present.
    pub fn is_valid(&self) -> bool {
        self.libs.iter().all(|l| l.present || !l.required)
    }

    pub fn missing_required(&self) -> impl Iterator<Item = &LibStatus> {
        self.libs.iter().filter(|l| l.required && !l.present)
    }

    /// Video plugins found in the directory.
    pub fn video_plugins(&self) -> impl Iterator<Item = &LibStatus> {
        self.libs.iter().filter(|l| l.role == "video" && l.present)
    }
}

/// Check which native libraries exist in `dir`, by file name.
pub fn check_native_libs(dir: &Path) -> PluginReport {
    let libs = NATIVE_LIBS
        .iter()
        .map(|l| {
            let path = dir.join(l.file_name);
            LibStatus {
                file_name: l.file_name,
                role: l.role,
                required: l.required,
                present: path.is_file(),
                path,
            }
        })
        .collect();
    PluginReport {
        dir: dir.to_path_buf(),
        libs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_dir_is_invalid() {
        let dir = tempfile::tempdir().unwrap();
        let report = check_native_libs(dir.path());
        assert!(!report.is_valid());
        assert_eq!(report.missing_required().count(), 5);
        assert_eq!(report.video_plugins().count(), 0);
    }

    #[test]
    fn test_required_set_is_enough() {
        let dir = tempfile::tempdir().unwrap();
        for l in NATIVE_LIBS.iter().filter(|l| l.required) {
            std::fs::write(dir.path().join(l.file_name), b"").unwrap();
        }
        let report = check_native_libs(dir.path());
        assert!(report.is_valid());

        std::fs::write(dir.path().join("libmupen64plus-video-rice.so"), b"").unwrap();
        let report = check_native_libs(dir.path());
        let video: Vec<_> = report.video_plugins().map(|l| l.file_name).collect();
        assert_eq!(video, vec!["libmupen64plus-video-rice.so"]);
    }
}

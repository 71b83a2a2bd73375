use std::path::PathBuf;

/// Progress update sent while scanning a ROM library.
///
/// These updates are sent via MPSC channel so a frontend can display
/// progress while files are hashed and identified.
#[derive(Debug, Clone)]
pub enum ScanProgress {
    /// The scan has enumerated its input
    Started {
        /// Number of candidate files found under the search root
        total_files: usize,
    },

    /// A file is being examined
    Examining {
        /// Zero-based index of the file
        index: usize,
        /// Path relative to the search root
        path: PathBuf,
    },

    /// A zip entry is being extracted for identification
    Extracting {
        /// Archive containing the entry
        archive: PathBuf,
        /// Name of the entry inside the archive
        entry: String,
    },

    /// A ROM was identified and written to the cache
    Identified {
        /// MD5 of the ROM (cache section name)
        md5: String,
        /// Display name that was recorded
        good_name: String,
    },

    /// A file was skipped or failed
    Skipped {
        path: PathBuf,
        reason: String,
    },

    /// The scan finished
    Completed {
        /// Number of ROMs written to the cache
        identified: usize,
    },
}

impl ScanProgress {
    pub fn started(total_files: usize) -> Self {
        Self::Started { total_files }
    }

    pub fn examining(index: usize, path: impl Into<PathBuf>) -> Self {
        Self::Examining {
            index,
            path: path.into(),
        }
    }

    pub fn identified(md5: impl Into<String>, good_name: impl Into<String>) -> Self {
        Self::Identified {
            md5: md5.into(),
            good_name: good_name.into(),
        }
    }

    pub fn skipped(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Skipped {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

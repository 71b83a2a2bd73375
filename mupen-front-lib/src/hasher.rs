//! Whole-file MD5, the primary key of the ROM database.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::error::LibError;
use crate::worker_pool::WorkerPool;

const CHUNK_SIZE: usize = 64 * 1024; // 64 KB

/// Stream `reader` through MD5 and return uppercase hex.
pub fn compute_md5(reader: &mut dyn Read) -> Result<String, LibError> {
    let mut ctx = md5::Context::new();
    let mut buf = vec![0u8; CHUNK_SIZE];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            break;
        }
        ctx.consume(&buf[..n]);
    }
    Ok(format!("{:X}", ctx.compute()))
}

pub fn compute_md5_file(path: &Path) -> Result<String, LibError> {
    let mut file = File::open(path)?;
    compute_md5(&mut file)
}

/// Hash many files on a worker pool. Results arrive in completion order.
pub async fn hash_files(
    paths: Vec<PathBuf>,
    workers: usize,
) -> Vec<(PathBuf, Result<String, LibError>)> {
    let pool = WorkerPool::start(workers, paths, |path: PathBuf| async move {
        let hashed = path.clone();
        let result = tokio::task::spawn_blocking(move || compute_md5_file(&hashed))
            .await
            .unwrap_or_else(|e| Err(LibError::other(format!("Hash task failed: {e}"))));
        (path, result)
    });
    pool.collect().await
}

#[cfg(test)]
#[path = "tests/hasher_tests.rs"]
mod tests;

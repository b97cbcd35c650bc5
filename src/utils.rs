use crate::cache::error::CacheError;
use log::info;
use std::io;
use std::path::{Path, PathBuf};

const CACHE_DIR_NAME: &str = "tempdist_cache";

/// Default location of the response cache, e.g. `~/.cache/tempdist_cache` on Linux.
pub fn get_cache_dir() -> Option<PathBuf> {
    dirs::cache_dir().map(|p| p.join(CACHE_DIR_NAME))
}

pub fn ensure_cache_dir_exists(path: &Path) -> Result<(), CacheError> {
    match std::fs::metadata(path) {
        Ok(metadata) => {
            if !metadata.is_dir() {
                return Err(CacheError::NotADirectory(path.to_path_buf()));
            }
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            info!("Creating cache directory: {}", path.display());
            std::fs::create_dir_all(path)
                .map_err(|e| CacheError::DirCreation(path.to_path_buf(), e))
        }
        Err(e) => Err(CacheError::Read(path.to_path_buf(), e)),
    }
}

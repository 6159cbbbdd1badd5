//! Persisted type-environment artifacts.
//!
//! An environment is stored as a small versioned cache file (bincode payload)
//! keyed by an [`ArtifactId`] under a cache directory. Loads are best-effort:
//! a missing file, a version mismatch and a corrupt payload all come back as
//! `None`, so callers see every failure as "environment not available".
//!
//! The distinguished [`ArtifactId::global`] identity is memoized process-wide
//! on first load and never re-read within the same process, even after later
//! [`store`]s to the same identity.

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

use lyra_types::TypeEnv;
use serde::{Deserialize, Serialize};
use thiserror::Error;

const FORMAT_VERSION: u32 = 1;

const GLOBAL_KEY: &str = "global";

static TMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Identity of one stored environment.
///
/// Identities are opaque string keys; the artifact file name is derived from
/// the key's hash, so any string is a legal identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactId(String);

impl ArtifactId {
    pub fn new(key: impl Into<String>) -> Self {
        ArtifactId(key.into())
    }

    /// The identity of the process-global environment.
    pub fn global() -> Self {
        ArtifactId(GLOBAL_KEY.to_owned())
    }

    #[must_use]
    pub fn is_global(&self) -> bool {
        self.0 == GLOBAL_KEY
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("encode failed: {0}")]
    Encode(#[from] bincode::Error),
}

#[derive(Serialize, Deserialize)]
struct ArtifactFile {
    version: u32,
    env: TypeEnv,
}

/// Serialize the full contents of `env` to `id` under `cache_dir`,
/// overwriting any prior artifact for that identity.
pub fn store(cache_dir: &Path, id: &ArtifactId, env: &TypeEnv) -> Result<(), StoreError> {
    fs::create_dir_all(cache_dir)?;

    let file = ArtifactFile {
        version: FORMAT_VERSION,
        env: env.clone(),
    };
    let bytes = bincode::serialize(&file)?;

    let path = artifact_path(cache_dir, id);
    write_atomic(&path, &bytes)?;

    tracing::debug!(
        target: "lyra.storage",
        id = id.as_str(),
        bytes = bytes.len(),
        "stored type environment"
    );
    Ok(())
}

/// Load the environment stored under `id`, if a compatible artifact exists.
///
/// The global identity is computed at most once per process; later calls see
/// the memoized result (including a memoized miss) even if the artifact on
/// disk changes. There is no invalidation short of restarting the process.
pub fn load(cache_dir: &Path, id: &ArtifactId) -> Option<Arc<TypeEnv>> {
    if id.is_global() {
        static GLOBAL_ENV: OnceLock<Option<Arc<TypeEnv>>> = OnceLock::new();
        return GLOBAL_ENV
            .get_or_init(|| read_artifact(cache_dir, id).map(Arc::new))
            .clone();
    }

    read_artifact(cache_dir, id).map(Arc::new)
}

/// Cache directory for environment artifacts.
///
/// Honors `LYRA_CACHE_DIR` when set and non-empty; otherwise a `lyra`
/// subdirectory of the system temp directory.
pub fn default_cache_dir() -> PathBuf {
    match std::env::var_os("LYRA_CACHE_DIR") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => std::env::temp_dir().join("lyra"),
    }
}

fn read_artifact(cache_dir: &Path, id: &ArtifactId) -> Option<TypeEnv> {
    let path = artifact_path(cache_dir, id);

    let bytes = match fs::read(&path) {
        Ok(bytes) => bytes,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
        Err(err) => {
            tracing::warn!(
                target: "lyra.storage",
                path = %path.display(),
                error = %err,
                "failed to read type environment artifact"
            );
            return None;
        }
    };

    let file: ArtifactFile = match bincode::deserialize(&bytes) {
        Ok(file) => file,
        Err(err) => {
            warn_corrupt_once(&path, &err);
            return None;
        }
    };

    if file.version != FORMAT_VERSION {
        tracing::debug!(
            target: "lyra.storage",
            found = file.version,
            expected = FORMAT_VERSION,
            "ignoring type environment artifact with incompatible version"
        );
        return None;
    }

    Some(file.env)
}

fn warn_corrupt_once(path: &Path, err: &bincode::Error) {
    // A corrupt artifact keeps failing on every load until something
    // overwrites it; report at most once.
    static REPORTED: OnceLock<()> = OnceLock::new();
    if REPORTED.set(()).is_ok() {
        tracing::warn!(
            target: "lyra.storage",
            path = %path.display(),
            error = %err,
            "discarding corrupt type environment artifact"
        );
    }
}

fn artifact_path(cache_dir: &Path, id: &ArtifactId) -> PathBuf {
    let mut hasher = DefaultHasher::new();
    id.as_str().hash(&mut hasher);
    let key = hasher.finish();
    cache_dir.join(format!("tenv-{key:016x}.bin"))
}

fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| io::Error::other("artifact path has no parent directory"))?;

    let (tmp_path, mut file) = open_unique_tmp_file(path, parent)?;

    let result = (|| -> io::Result<()> {
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);
        rename_overwrite(&tmp_path, path)
    })();

    if let Err(err) = result {
        let _ = fs::remove_file(&tmp_path);
        return Err(err);
    }
    Ok(())
}

fn rename_overwrite(tmp_path: &Path, dest: &Path) -> io::Result<()> {
    match fs::rename(tmp_path, dest) {
        Ok(()) => Ok(()),
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists || dest.exists() => {
            // `rename` does not overwrite on Windows.
            let _ = fs::remove_file(dest);
            fs::rename(tmp_path, dest)
        }
        Err(err) => Err(err),
    }
}

fn open_unique_tmp_file(dest: &Path, parent: &Path) -> io::Result<(PathBuf, fs::File)> {
    let file_name = dest
        .file_name()
        .ok_or_else(|| io::Error::other("artifact path has no file name"))?;
    let pid = std::process::id();

    loop {
        let counter = TMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let mut tmp_name = file_name.to_os_string();
        tmp_name.push(format!(".tmp.{pid}.{counter}"));
        let tmp_path = parent.join(tmp_name);

        match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)
        {
            Ok(file) => return Ok((tmp_path, file)),
            Err(err) if err.kind() == io::ErrorKind::AlreadyExists => continue,
            Err(err) => return Err(err),
        }
    }
}

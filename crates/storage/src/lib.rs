use anyhow::{anyhow, Context, Result};
use std::{
    collections::{BTreeMap, HashMap},
    fs,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use shared::domain::{Post, Theme};

pub const POSTS_KEY: &str = "darkconverse-posts";
pub const THEME_KEY: &str = "theme";

/// String key-value persistence in the shape of browser local storage.
pub trait KeyValueStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
}

#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// All keys live in a single JSON object file. Every write rewrites the whole
/// file through a sibling temp file and a rename.
pub struct FileStore {
    path: PathBuf,
    entries: Mutex<BTreeMap<String, String>>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        ensure_parent_dir_exists(&path)?;

        let entries = match fs::read_to_string(&path) {
            Ok(raw) if raw.trim().is_empty() => BTreeMap::new(),
            Ok(raw) => serde_json::from_str(&raw).with_context(|| {
                format!("store file '{}' is not a JSON object of strings", path.display())
            })?,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("failed to read store file '{}'", path.display()))
            }
        };

        Ok(Self {
            path,
            entries: Mutex::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let encoded = serde_json::to_string_pretty(entries).context("failed to encode store")?;
        let tmp_path = self.path.with_extension("tmp");
        fs::write(&tmp_path, encoded)
            .with_context(|| format!("failed to write '{}'", tmp_path.display()))?;
        fs::rename(&tmp_path, &self.path).with_context(|| {
            format!(
                "failed to move '{}' over '{}'",
                tmp_path.display(),
                self.path.display()
            )
        })?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("file store lock poisoned"))?;
        Ok(entries.get(key).cloned())
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|_| anyhow!("file store lock poisoned"))?;
        let mut staged = entries.clone();
        staged.insert(key.to_string(), value.to_string());
        self.flush(&staged)?;
        *entries = staged;
        Ok(())
    }
}

/// Outcome of reading the posts key.
#[derive(Debug)]
pub enum LoadedPosts {
    /// Nothing persisted yet.
    Fresh,
    Restored(Vec<Post>),
    /// The persisted value exists but does not decode as a post list.
    Corrupt(serde_json::Error),
}

/// Typed access to the two logical keys.
#[derive(Clone)]
pub struct Storage {
    store: Arc<dyn KeyValueStore>,
}

impl Storage {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    pub fn open_file(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self::new(FileStore::open(path)?))
    }

    pub fn load_posts(&self) -> Result<LoadedPosts> {
        let Some(raw) = self
            .store
            .read(POSTS_KEY)
            .context("failed to read posts")?
        else {
            return Ok(LoadedPosts::Fresh);
        };

        Ok(match serde_json::from_str::<Vec<Post>>(&raw) {
            Ok(posts) => LoadedPosts::Restored(posts),
            Err(err) => LoadedPosts::Corrupt(err),
        })
    }

    pub fn save_posts(&self, posts: &[Post]) -> Result<()> {
        let encoded = serde_json::to_string(posts).context("failed to encode posts")?;
        self.store
            .write(POSTS_KEY, &encoded)
            .context("failed to persist posts")
    }

    /// Raw theme name; validation is up to the caller.
    pub fn load_theme(&self) -> Result<Option<String>> {
        self.store.read(THEME_KEY).context("failed to read theme")
    }

    pub fn save_theme(&self, theme: Theme) -> Result<()> {
        self.store
            .write(THEME_KEY, theme.as_str())
            .context("failed to persist theme")
    }
}

fn ensure_parent_dir_exists(path: &Path) -> Result<()> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for store file '{}'",
            parent.display(),
            path.display()
        )
    })?;

    Ok(())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

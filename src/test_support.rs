use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

static NEXT_STORE: AtomicUsize = AtomicUsize::new(0);

/// A store file path in the system temp directory, removed on drop
pub struct TempStore {
    path: PathBuf,
}

impl TempStore {
    /// A unique path with no file behind it
    pub fn missing() -> Self {
        let n = NEXT_STORE.fetch_add(1, Ordering::SeqCst);
        let dir = std::env::temp_dir().join(format!("job-board-{}-{}", std::process::id(), n));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        Self {
            path: dir.join("jobs.json"),
        }
    }

    pub fn with_contents(contents: &str) -> Self {
        let store = Self::missing();
        std::fs::write(&store.path, contents).expect("write temp store");
        store
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn read_json(&self) -> serde_json::Value {
        let data = std::fs::read_to_string(&self.path).expect("read temp store");
        serde_json::from_str(&data).expect("temp store holds JSON")
    }
}

impl Drop for TempStore {
    fn drop(&mut self) {
        if let Some(dir) = self.path.parent() {
            let _ = std::fs::remove_dir_all(dir);
        }
    }
}

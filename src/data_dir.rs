use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    /// Resolve the data directory from, in order of priority:
    /// 1. An explicit path (from --data-dir)
    /// 2. The MEMEDEX_DATA_DIR environment variable
    /// 3. The XDG data directory (~/.local/share/memedex/)
    ///
    /// The directory is created if missing. It holds the `memes.db` database
    /// and the `images/` directory of stored copies.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let root = if let Some(path) = explicit {
            path.to_path_buf()
        } else if let Ok(val) = std::env::var("MEMEDEX_DATA_DIR") {
            PathBuf::from(val)
        } else {
            xdg::BaseDirectories::with_prefix("memedex")
                .get_data_home()
                .ok_or_else(|| {
                    Error::Config(
                        "could not determine XDG data home directory".into(),
                    )
                })?
        };

        std::fs::create_dir_all(&root)
            .map_err(|_| Error::DataDir(root.clone()))?;

        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn database(&self) -> PathBuf {
        self.root.join("memes.db")
    }

    /// Directory holding the stored image copies, created on demand.
    pub fn images_dir(&self) -> Result<PathBuf> {
        let path = self.root.join("images");
        std::fs::create_dir_all(&path)
            .map_err(|_| Error::DataDir(path.clone()))?;
        Ok(path)
    }

    /// Absolute path of a stored image given its entry label.
    pub fn image_path(&self, label: &str) -> PathBuf {
        self.root.join("images").join(label)
    }
}

//! Loading a content directory and selecting documents from it

use crate::core::{Document, Selection};
use crate::error::{Result, SiteMatterError};
use crate::io::fs::is_content_file;
use log::{debug, info, warn};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// All documents with front matter found directly inside a content directory
#[derive(Debug, Clone)]
pub struct Collection {
    dir: PathBuf,
    documents: Vec<Document>,
}

/// Outcome of applying a [`Selection`] to a [`Collection`]
#[derive(Debug, Clone, Default)]
pub struct Selected {
    pub documents: Vec<Document>,
    /// Requested paths that matched no loaded document
    pub unmatched: Vec<PathBuf>,
}

impl Collection {
    /// Load every `.md` file directly under `dir`
    ///
    /// Subdirectories are not descended into. Files without a metadata block
    /// are left out, as are files that cannot be read.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(SiteMatterError::content_dir_not_found(dir));
        }

        let mut documents = Vec::new();
        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name();

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry in {}: {}", dir.display(), e);
                    continue;
                }
            };
            if !entry.file_type().is_file() || !is_content_file(entry.path()) {
                continue;
            }

            match Document::read(entry.path()) {
                Ok(doc) if doc.has_front_matter() => documents.push(doc),
                Ok(_) => debug!("No front matter in {}", entry.path().display()),
                Err(e) => warn!("Failed to read {}: {}", entry.path().display(), e),
            }
        }

        info!("Loaded {} posts from {}", documents.len(), dir.display());

        Ok(Self {
            dir: dir.to_path_buf(),
            documents,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Pick the documents `selection` asks for
    ///
    /// An explicit path list overrides every other criterion; paths are
    /// compared after canonicalization so relative and absolute spellings of
    /// the same file agree.
    pub fn select(self, selection: &Selection) -> Result<Selected> {
        selection.validate()?;

        if selection.all {
            return Ok(Selected {
                documents: self.documents,
                unmatched: Vec::new(),
            });
        }

        if !selection.paths.is_empty() {
            return Ok(self.select_paths(&selection.paths));
        }

        let documents = self
            .documents
            .into_iter()
            .filter(|doc| selection.matches(doc))
            .collect();

        Ok(Selected {
            documents,
            unmatched: Vec::new(),
        })
    }

    fn select_paths(mut self, paths: &[PathBuf]) -> Selected {
        let canonical: Vec<PathBuf> = self
            .documents
            .iter()
            .map(|doc| canonical_path(doc.path()))
            .collect();

        let mut picked = Vec::new();
        let mut unmatched = Vec::new();
        for requested in paths {
            let wanted = canonical_path(requested);
            match canonical.iter().position(|p| *p == wanted) {
                Some(index) if !picked.contains(&index) => picked.push(index),
                Some(_) => debug!("Path given twice: {}", requested.display()),
                None => {
                    warn!(
                        "Path not found or no frontmatter: {}",
                        requested.display()
                    );
                    unmatched.push(requested.clone());
                }
            }
        }

        let mut slots: Vec<Option<Document>> = self.documents.drain(..).map(Some).collect();
        let documents = picked
            .into_iter()
            .filter_map(|index| slots[index].take())
            .collect();

        Selected {
            documents,
            unmatched,
        }
    }
}

fn canonical_path(path: &Path) -> PathBuf {
    path.canonicalize().unwrap_or_else(|_| {
        std::env::current_dir()
            .map(|cwd| cwd.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    })
}

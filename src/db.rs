use crate::error::StoreError;
use crate::model::Book;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// The whole JSON document. Keys other than `books` are carried through
/// rewrites with their values untouched, but are written after `books`.
/// Every `books` entry must be a JSON object.
#[derive(Debug, Default, Serialize, Deserialize)]
struct Document {
    #[serde(default, deserialize_with = "null_as_empty")]
    books: Vec<Book>,
    #[serde(flatten)]
    other: Map<String, Value>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Book>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Book>>::deserialize(deserializer)?.unwrap_or_default())
}

pub struct Database {
    path: Option<PathBuf>,
    doc: Mutex<Document>,
}

impl Database {
    /// Loads the document at `path`, creating it with `{"books": []}` when the
    /// file is missing or blank.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let doc = match tokio::fs::read_to_string(&path).await {
            Ok(raw) if raw.trim().is_empty() => None,
            Ok(raw) => Some(Self::parse(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => return Err(e.into()),
        };

        let db = match doc {
            Some(doc) => {
                tracing::info!(path = ?path, books = doc.books.len(), "[db] loaded document");
                Database {
                    path: Some(path),
                    doc: Mutex::new(doc),
                }
            }
            None => {
                tracing::info!(path = ?path, "[db] no document found, writing defaults");
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    tokio::fs::create_dir_all(parent).await?;
                }
                let db = Database {
                    path: Some(path),
                    doc: Mutex::new(Document::default()),
                };
                {
                    let doc = db.doc.lock().await;
                    db.write(&doc).await?;
                }
                db
            }
        };

        Ok(db)
    }

    /// A store that never touches the filesystem.
    pub fn in_memory() -> Self {
        tracing::info!("[db] running in memory, nothing will be persisted");
        Database {
            path: None,
            doc: Mutex::new(Document::default()),
        }
    }

    fn parse(raw: &str) -> Result<Document, StoreError> {
        let value: Value = serde_json::from_str(raw)?;
        if !value.is_object() {
            return Err(StoreError::InvalidDocument(
                "expected a JSON object at the top level".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub async fn all(&self) -> Vec<Book> {
        self.doc.lock().await.books.clone()
    }

    pub async fn find(&self, id: &str) -> Option<Book> {
        let doc = self.doc.lock().await;
        doc.books.iter().find(|b| b.has_id(id)).cloned()
    }

    pub async fn push(&self, book: Book) -> Result<Book, StoreError> {
        let mut doc = self.doc.lock().await;
        doc.books.push(book.clone());
        self.write(&doc).await?;

        tracing::debug!(id = ?book.id(), "[db] pushed book");
        Ok(book)
    }

    /// Shallow-merges `patch` into the first book with `id` and persists.
    /// Returns false, without writing, when nothing matches.
    pub async fn assign(&self, id: &str, patch: &Map<String, Value>) -> Result<bool, StoreError> {
        let mut doc = self.doc.lock().await;
        let Some(position) = doc.books.iter().position(|b| b.has_id(id)) else {
            tracing::debug!(id, "[db] assign matched nothing");
            return Ok(false);
        };

        let merged = doc.books[position].merge(patch);
        doc.books[position] = merged;
        self.write(&doc).await?;

        tracing::debug!(id, "[db] assigned book");
        Ok(true)
    }

    /// Drops every book with `id` and persists. Returns how many went.
    pub async fn remove(&self, id: &str) -> Result<usize, StoreError> {
        let mut doc = self.doc.lock().await;
        let before = doc.books.len();
        doc.books.retain(|b| !b.has_id(id));
        let removed = before - doc.books.len();
        self.write(&doc).await?;

        tracing::debug!(id, removed, "[db] removed books");
        Ok(removed)
    }

    // Callers hold the document lock, so rewrites never interleave.
    async fn write(&self, doc: &Document) -> Result<(), StoreError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let body = serde_json::to_string_pretty(doc)?;
        let mut tmp = path.clone().into_os_string();
        tmp.push(".tmp");

        tokio::fs::write(&tmp, body).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

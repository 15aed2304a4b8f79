//! Versioned on-disk response store
//!
//! Layout: `<root>/<generation-tag>/<sha256-prefix>.entry`. Each entry file
//! holds one line of JSON metadata followed by the raw body bytes, and is
//! published with a rename so a reader never sees a partial entry.
//! A `.generation` marker records when a generation was first opened, so
//! generations can be ordered by age rather than by tag.

use crate::error::{MediError, MediResult};
use crate::request::{RequestKey, Response, ResponseSource};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

const ENTRY_EXTENSION: &str = "entry";
const GENERATION_MARKER: &str = ".generation";

/// Contents of a generation's marker file
#[derive(Debug, Serialize, Deserialize)]
struct GenerationMarker {
    created_at: DateTime<Utc>,
}

/// Immutable snapshot of a response
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredResponse {
    pub request_key: RequestKey,
    pub status: u16,
    pub content_type: Option<String>,
    pub captured_at: DateTime<Utc>,
    #[serde(skip)]
    pub body: Vec<u8>,
}

impl StoredResponse {
    /// Capture a response now
    pub fn new(
        request_key: RequestKey,
        status: u16,
        content_type: Option<String>,
        body: Vec<u8>,
    ) -> Self {
        Self {
            request_key,
            status,
            content_type,
            captured_at: Utc::now(),
            body,
        }
    }

    /// Convert into a response served from the cache
    pub fn into_response(self, source: ResponseSource) -> Response {
        Response {
            status: self.status,
            content_type: self.content_type,
            body: self.body,
            source,
        }
    }

    fn encode(&self) -> MediResult<Vec<u8>> {
        let mut out = serde_json::to_vec(self)?;
        out.push(b'\n');
        out.extend_from_slice(&self.body);
        Ok(out)
    }

    fn decode(bytes: &[u8]) -> Result<Self, String> {
        let newline = bytes
            .iter()
            .position(|b| *b == b'\n')
            .ok_or_else(|| "missing metadata line".to_string())?;
        let mut stored: StoredResponse =
            serde_json::from_slice(&bytes[..newline]).map_err(|e| e.to_string())?;
        stored.body = bytes[newline + 1..].to_vec();
        Ok(stored)
    }
}

/// An opened cache generation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheHandle {
    tag: String,
    dir: PathBuf,
}

impl CacheHandle {
    /// The generation's version tag
    pub fn tag(&self) -> &str {
        &self.tag
    }

    fn entry_path(&self, key: &RequestKey) -> PathBuf {
        self.dir
            .join(format!("{}.{}", key.storage_name(), ENTRY_EXTENSION))
    }
}

/// Entry count and size of one generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerationStats {
    pub entries: usize,
    pub total_bytes: u64,
}

/// Check that a generation tag is usable as a directory name
pub fn validate_tag(tag: &str) -> MediResult<()> {
    let valid = !tag.is_empty()
        && tag != "."
        && tag != ".."
        && tag
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(MediError::InvalidGenerationTag(tag.to_string()))
    }
}

/// Process-wide response store, one directory per generation
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    /// Create a store rooted at a directory (created lazily)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory of the store
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Open a generation, creating it if absent
    pub async fn open(&self, tag: &str) -> MediResult<CacheHandle> {
        validate_tag(tag)?;
        let dir = self.root.join(tag);
        fs::create_dir_all(&dir)
            .await
            .map_err(|e| MediError::storage(format!("creating generation {}", tag), e))?;

        let marker = dir.join(GENERATION_MARKER);
        if fs::metadata(&marker).await.is_err() {
            let bytes = serde_json::to_vec(&GenerationMarker {
                created_at: Utc::now(),
            })?;
            fs::write(&marker, bytes)
                .await
                .map_err(|e| MediError::storage(format!("marking generation {}", tag), e))?;
        }

        Ok(CacheHandle {
            tag: tag.to_string(),
            dir,
        })
    }

    /// Whether a generation exists on disk
    pub async fn has_generation(&self, tag: &str) -> bool {
        validate_tag(tag).is_ok() && fs::metadata(self.root.join(tag)).await.is_ok_and(|m| m.is_dir())
    }

    /// Store or replace an entry in a generation
    pub async fn put(&self, handle: &CacheHandle, response: &StoredResponse) -> MediResult<()> {
        let path = handle.entry_path(&response.request_key);
        let tmp = handle
            .dir
            .join(format!(".{}.tmp", Uuid::new_v4()));
        let bytes = response.encode()?;

        fs::write(&tmp, &bytes)
            .await
            .map_err(|e| MediError::storage(format!("writing {}", tmp.display()), e))?;

        if let Err(e) = fs::rename(&tmp, &path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(MediError::storage(
                format!("publishing entry {}", response.request_key),
                e,
            ));
        }

        debug!(
            "Cached {} in {} ({} bytes)",
            response.request_key,
            handle.tag,
            response.body.len()
        );
        Ok(())
    }

    /// Look up a key in a single generation
    ///
    /// Unreadable or corrupt entries are logged and read as a miss.
    pub async fn get(&self, handle: &CacheHandle, key: &RequestKey) -> Option<StoredResponse> {
        let path = handle.entry_path(key);
        let bytes = match fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!("Cache read failed for {} in {}: {}", key, handle.tag, e);
                return None;
            }
        };

        match StoredResponse::decode(&bytes) {
            // Different keys may share a hash prefix; only an exact key is a hit
            Ok(stored) if stored.request_key == *key => Some(stored),
            Ok(_) => None,
            Err(reason) => {
                warn!("Corrupt cache entry for {} in {}: {}", key, handle.tag, reason);
                None
            }
        }
    }

    /// Look up a key across all generations
    pub async fn match_request(&self, key: &RequestKey) -> Option<StoredResponse> {
        self.match_across(None, key).await
    }

    /// Look up a key in `current` first, then in every other generation
    pub async fn match_in(&self, current: &CacheHandle, key: &RequestKey) -> Option<StoredResponse> {
        self.match_across(Some(current), key).await
    }

    async fn match_across(
        &self,
        current: Option<&CacheHandle>,
        key: &RequestKey,
    ) -> Option<StoredResponse> {
        if let Some(current) = current {
            if let Some(stored) = self.get(current, key).await {
                return Some(stored);
            }
        }

        let generations = match self.generations_by_age().await {
            Ok(generations) => generations,
            Err(e) => {
                warn!("Listing cache generations failed: {}", e);
                return None;
            }
        };

        for tag in generations {
            if current.is_some_and(|c| c.tag == tag) {
                continue;
            }
            let handle = CacheHandle {
                dir: self.root.join(&tag),
                tag,
            };
            if let Some(stored) = self.get(&handle, key).await {
                return Some(stored);
            }
        }

        None
    }

    /// List all generation tags
    pub async fn list_generations(&self) -> MediResult<BTreeSet<String>> {
        let mut tags = BTreeSet::new();

        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(tags),
            Err(e) => return Err(MediError::storage("reading cache root", e)),
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| MediError::storage("reading cache root entry", e))?
        {
            let is_dir = entry.file_type().await.is_ok_and(|t| t.is_dir());
            if let Some(name) = entry.file_name().to_str() {
                if is_dir && validate_tag(name).is_ok() {
                    tags.insert(name.to_string());
                }
            }
        }

        Ok(tags)
    }

    /// List generation tags, oldest first
    ///
    /// Age comes from the generation marker, falling back to the directory
    /// mtime for generations without one. Ties are broken by tag.
    pub async fn generations_by_age(&self) -> MediResult<Vec<String>> {
        let mut aged = Vec::new();
        for tag in self.list_generations().await? {
            aged.push((self.created_at(&tag).await, tag));
        }
        aged.sort();
        Ok(aged.into_iter().map(|(_, tag)| tag).collect())
    }

    async fn created_at(&self, tag: &str) -> Option<DateTime<Utc>> {
        let dir = self.root.join(tag);
        if let Ok(bytes) = fs::read(dir.join(GENERATION_MARKER)).await {
            match serde_json::from_slice::<GenerationMarker>(&bytes) {
                Ok(marker) => return Some(marker.created_at),
                Err(e) => warn!("Unreadable marker for generation {}: {}", tag, e),
            }
        }

        fs::metadata(&dir)
            .await
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from)
    }

    /// Delete a generation; returns whether it existed
    pub async fn delete(&self, tag: &str) -> MediResult<bool> {
        validate_tag(tag)?;
        let dir = self.root.join(tag);

        match fs::remove_dir_all(&dir).await {
            Ok(()) => {
                debug!("Deleted cache generation {}", tag);
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(MediError::storage(format!("deleting generation {}", tag), e)),
        }
    }

    /// Delete every generation; returns how many were removed
    pub async fn clear(&self) -> MediResult<usize> {
        let mut removed = 0;
        for tag in self.list_generations().await? {
            if self.delete(&tag).await? {
                removed += 1;
            }
        }
        Ok(removed)
    }

    /// Count entries and bytes in a generation
    pub async fn generation_stats(&self, tag: &str) -> MediResult<GenerationStats> {
        validate_tag(tag)?;
        let mut stats = GenerationStats::default();

        let mut entries = match fs::read_dir(self.root.join(tag)).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(stats),
            Err(e) => return Err(MediError::storage(format!("reading generation {}", tag), e)),
        };

        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| MediError::storage("reading generation entry", e))?
        {
            if entry.path().extension().is_some_and(|ext| ext == ENTRY_EXTENSION) {
                stats.entries += 1;
                stats.total_bytes += entry.metadata().await.map(|m| m.len()).unwrap_or(0);
            }
        }

        Ok(stats)
    }
}

/// Format bytes as human-readable size (e.g., "1.5 MB")
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if bytes >= GB {
        format!("{:.1} GB", bytes as f64 / GB as f64)
    } else if bytes >= MB {
        format!("{:.1} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.1} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

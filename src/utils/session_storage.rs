// src/utils/session_storage.rs
use crate::models::{ServiceError, Session, Team, Vote};
use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, MutexGuard};
use tokio::task;

const SNAPSHOT_FILE: &str = "icebreaker.json";

// Every record the service keeps. Vecs keep insertion order, which ranking
// relies on for stable tie-breaks.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct StoreData {
    pub sessions: Vec<Session>,
    pub teams: Vec<Team>,
    pub votes: Vec<Vote>,
}

impl StoreData {
    pub fn session(&self, session_id: &str) -> Option<&Session> {
        self.sessions.iter().find(|s| s.id == session_id)
    }

    pub fn session_mut(&mut self, session_id: &str) -> Option<&mut Session> {
        self.sessions.iter_mut().find(|s| s.id == session_id)
    }

    pub fn active_session(&self) -> Option<&Session> {
        self.sessions.iter().find(|s| s.is_active)
    }

    pub fn teams_for_session(&self, session_id: &str) -> Vec<Team> {
        self.teams
            .iter()
            .filter(|t| t.session_id == session_id)
            .cloned()
            .collect()
    }

    pub fn team_in_session_mut(&mut self, session_id: &str, team_id: &str) -> Option<&mut Team> {
        self.teams
            .iter_mut()
            .find(|t| t.session_id == session_id && t.id == team_id)
    }

    pub fn votes_for_session(&self, session_id: &str) -> usize {
        self.votes.iter().filter(|v| v.session_id == session_id).count()
    }
}

// Destination for store snapshots. Called from a blocking task, so
// implementations may do synchronous I/O.
pub trait SnapshotWriter: Send + Sync {
    fn write_snapshot(&self, bytes: &[u8]) -> io::Result<()>;
}

// Snapshot file on local disk, replaced atomically via a temp file
pub struct FileSnapshot {
    path: PathBuf,
}

impl FileSnapshot {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SnapshotWriter for FileSnapshot {
    fn write_snapshot(&self, bytes: &[u8]) -> io::Result<()> {
        // Write then rename so readers never see a half-written snapshot
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, bytes)?;
        fs::rename(&tmp_path, &self.path)?;
        debug!("Saved store snapshot to {:?}", self.path);
        Ok(())
    }
}

// The single synchronization point for sessions, teams and votes.
// Each `update` is one read-modify-write under the lock, persisted before the
// lock is released.
#[derive(Clone)]
pub struct SessionStore {
    data: Arc<Mutex<StoreData>>,
    writer: Option<Arc<dyn SnapshotWriter>>,
    lock_timeout: Duration,
}

impl SessionStore {
    // Store without a backing file, used by tests
    pub fn in_memory(lock_timeout: Duration) -> Self {
        Self {
            data: Arc::new(Mutex::new(StoreData::default())),
            writer: None,
            lock_timeout,
        }
    }

    pub fn with_writer(data: StoreData, writer: Arc<dyn SnapshotWriter>, lock_timeout: Duration) -> Self {
        Self {
            data: Arc::new(Mutex::new(data)),
            writer: Some(writer),
            lock_timeout,
        }
    }

    // Open (or create) the store under the given storage directory
    pub fn open(storage_dir: impl AsRef<Path>, lock_timeout: Duration) -> Result<Self, ServiceError> {
        let dir = storage_dir.as_ref();
        if !dir.exists() {
            info!("Creating storage directory: {:?}", dir);
            fs::create_dir_all(dir).map_err(|e| {
                error!("Failed to create storage directory: {:?}", e);
                ServiceError::InternalServerError
            })?;
        }

        let snapshot_path = dir.join(SNAPSHOT_FILE);
        let data = if snapshot_path.exists() {
            let content = fs::read(&snapshot_path).map_err(|e| {
                error!("Failed to read store snapshot: {:?}", e);
                ServiceError::InternalServerError
            })?;
            serde_json::from_slice::<StoreData>(&content).map_err(|e| {
                error!("Failed to parse store snapshot: {:?}", e);
                ServiceError::InternalServerError
            })?
        } else {
            StoreData::default()
        };

        info!(
            "✅ Loaded store: {} sessions, {} teams, {} votes",
            data.sessions.len(),
            data.teams.len(),
            data.votes.len()
        );

        Ok(Self::with_writer(
            data,
            Arc::new(FileSnapshot::new(snapshot_path)),
            lock_timeout,
        ))
    }

    async fn lock(&self) -> Result<MutexGuard<'_, StoreData>, ServiceError> {
        tokio::time::timeout(self.lock_timeout, self.data.lock())
            .await
            .map_err(|_| {
                warn!("Store lock not acquired within {:?}", self.lock_timeout);
                ServiceError::StoreUnavailable
            })
    }

    // Run a read-only query against the current data
    pub async fn read<T, F>(&self, query: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&StoreData) -> T,
    {
        let guard = self.lock().await?;
        Ok(query(&guard))
    }

    // Apply a mutation atomically. The mutation runs against a staged copy, so
    // a rejected mutation or a failed snapshot write leaves the store untouched.
    pub async fn update<T, F>(&self, mutation: F) -> Result<T, ServiceError>
    where
        F: FnOnce(&mut StoreData) -> Result<T, ServiceError>,
    {
        let mut guard = self.lock().await?;
        let mut staged = guard.clone();
        let outcome = mutation(&mut staged)?;
        self.persist(&staged).await?;
        *guard = staged;
        Ok(outcome)
    }

    // Write the snapshot off the async workers, bounded by the store timeout.
    // Disk failures are reported as retryable; the caller may simply try again.
    async fn persist(&self, data: &StoreData) -> Result<(), ServiceError> {
        let Some(writer) = self.writer.clone() else {
            return Ok(());
        };

        let bytes = serde_json::to_vec(data).map_err(|e| {
            error!("Failed to serialize store snapshot: {:?}", e);
            ServiceError::InternalServerError
        })?;

        let write = task::spawn_blocking(move || writer.write_snapshot(&bytes));
        match tokio::time::timeout(self.lock_timeout, write).await {
            Ok(Ok(Ok(()))) => Ok(()),
            Ok(Ok(Err(e))) => {
                error!("Failed to write store snapshot: {:?}", e);
                Err(ServiceError::StoreUnavailable)
            }
            Ok(Err(e)) => {
                error!("Snapshot task failed: {:?}", e);
                Err(ServiceError::InternalServerError)
            }
            Err(_) => {
                warn!("Snapshot write did not finish within {:?}", self.lock_timeout);
                Err(ServiceError::StoreUnavailable)
            }
        }
    }
}

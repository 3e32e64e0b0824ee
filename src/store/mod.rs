//! Snapshot-backed transaction store with a single persistence worker.
//!
//! All mutations funnel through one background task: `register` generates a
//! unique id under the store lock, releases it, and hands the entry to the
//! worker over a bounded queue. The worker commits the entry to the shared
//! map and rewrites the full JSON snapshot, so snapshot writes are totally
//! ordered. A successful `register` therefore guarantees the entry has been
//! accepted for processing, not that it has reached disk yet; callers that
//! need the durability point await [`TransactionStore::flush`].

use crate::core::IdentifiedTransaction;
use crate::core::transaction::{Transaction, generate_uid};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, error, warn};

type TransactionMap = HashMap<String, IdentifiedTransaction>;

#[derive(Debug, Error)]
pub enum StoreError {
    /// Normal outcome of a query for an unknown id.
    #[error("transaction not found: {0}")]
    NotFound(String),
    /// A generated id was already present at insert time. Unreachable while
    /// the pre-insert uniqueness check holds; seeing it means the store's
    /// invariant is broken and the worker refuses further writes.
    #[error("transaction {0} already existed at insert time")]
    UniquenessViolation(String),
    #[error("could not serialize the transaction snapshot: {0}")]
    SnapshotEncode(#[from] serde_json::Error),
    #[error("could not write the transaction snapshot: {0}")]
    SnapshotWrite(#[from] std::io::Error),
    /// The persistence worker has stopped after a fatal store error; the
    /// store keeps serving queries but accepts no new registrations.
    #[error("the persistence worker is no longer running")]
    WorkerStopped,
}

enum Job {
    Commit(IdentifiedTransaction),
    Flush(oneshot::Sender<()>),
}

pub struct TransactionStore {
    transactions: Arc<Mutex<TransactionMap>>,
    queue: mpsc::Sender<Job>,
    worker: JoinHandle<()>,
}

impl TransactionStore {
    /// Opens the store backed by the snapshot file at `path`.
    ///
    /// Loading is best-effort: a missing or unreadable snapshot logs a
    /// warning and the store starts empty. Spawns the one worker that owns
    /// all snapshot writes; must be called within a tokio runtime.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let transactions = Arc::new(Mutex::new(load_snapshot(&path)));

        let (queue, receiver) = mpsc::channel(1);
        let worker = tokio::spawn(run_worker(Arc::clone(&transactions), path, receiver));

        TransactionStore {
            transactions,
            queue,
            worker,
        }
    }

    /// Records a transaction and returns its assigned id.
    ///
    /// The id is generated until unique under the store lock; the lock is
    /// released before the blocking hand-off to the worker, so the worker is
    /// never contending with its own producer.
    pub async fn register(&self, transaction: Transaction) -> Result<String, StoreError> {
        let uid = {
            let transactions = self.transactions.lock().await;
            loop {
                let candidate = generate_uid();
                if !transactions.contains_key(&candidate) {
                    break candidate;
                }
            }
        };

        let entry = IdentifiedTransaction {
            transaction,
            uid: uid.clone(),
        };
        self.queue
            .send(Job::Commit(entry))
            .await
            .map_err(|_| StoreError::WorkerStopped)?;
        Ok(uid)
    }

    /// Looks up a transaction by id. Never blocks on I/O.
    pub async fn query(&self, uid: &str) -> Result<IdentifiedTransaction, StoreError> {
        let transactions = self.transactions.lock().await;
        transactions
            .get(uid)
            .cloned()
            .ok_or_else(|| StoreError::NotFound(uid.to_string()))
    }

    /// Waits until every registration handed off so far has been committed
    /// and written to the snapshot.
    pub async fn flush(&self) -> Result<(), StoreError> {
        let (ack, done) = oneshot::channel();
        self.queue
            .send(Job::Flush(ack))
            .await
            .map_err(|_| StoreError::WorkerStopped)?;
        done.await.map_err(|_| StoreError::WorkerStopped)
    }

    /// Drains the queue and joins the worker.
    pub async fn shutdown(self) {
        drop(self.queue);
        if let Err(e) = self.worker.await {
            error!(error = %e, "Persistence worker panicked");
        }
    }
}

fn load_snapshot(path: &Path) -> TransactionMap {
    let content = match std::fs::read(path) {
        Ok(content) => content,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Snapshot not readable, starting empty");
            return TransactionMap::new();
        }
    };
    match serde_json::from_slice::<TransactionMap>(&content) {
        Ok(transactions) => {
            debug!(path = %path.display(), entries = transactions.len(), "Loaded snapshot");
            transactions
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Snapshot not parseable, starting empty");
            TransactionMap::new()
        }
    }
}

async fn run_worker(
    transactions: Arc<Mutex<TransactionMap>>,
    path: PathBuf,
    mut receiver: mpsc::Receiver<Job>,
) {
    while let Some(job) = receiver.recv().await {
        match job {
            Job::Commit(entry) => {
                if let Err(e) = commit(&transactions, &path, entry).await {
                    // memory and disk can no longer be trusted to agree;
                    // stop taking writes instead of diverging silently
                    error!(error = %e, "Persistence worker stopping");
                    return;
                }
            }
            Job::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
}

async fn commit(
    transactions: &Mutex<TransactionMap>,
    path: &Path,
    entry: IdentifiedTransaction,
) -> Result<(), StoreError> {
    {
        let mut transactions = transactions.lock().await;
        if transactions.contains_key(&entry.uid) {
            return Err(StoreError::UniquenessViolation(entry.uid));
        }
        transactions.insert(entry.uid.clone(), entry);
    }
    persist(transactions, path).await
}

/// Rewrites the full snapshot. The lock is held across serialize + write so
/// a concurrent commit cannot interleave with the pass.
async fn persist(transactions: &Mutex<TransactionMap>, path: &Path) -> Result<(), StoreError> {
    let transactions = transactions.lock().await;
    let content = serde_json::to_vec(&*transactions)?;
    std::fs::write(path, content)?;
    debug!(path = %path.display(), entries = transactions.len(), "Snapshot written");
    Ok(())
}

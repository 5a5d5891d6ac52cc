use chrono::Utc;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{error, info, warn};

use crate::api::job::Job;
use crate::store::{JobRepository, StoreDocument, StoreError};

type Reply = oneshot::Sender<Result<Job, StoreError>>;

/// A mutation queued for the store writer
pub enum StoreCommand {
    Create { job: Job, reply: Reply },
    Update { id: String, job: Job, reply: Reply },
}

/// Cloneable sender side of the store writer queue
#[derive(Clone)]
pub struct StoreHandle {
    sender: mpsc::Sender<StoreCommand>,
}

impl StoreHandle {
    /// Append `job` to the store under a freshly generated id
    pub async fn create(&self, job: Job) -> Result<Job, StoreError> {
        let (reply, response) = oneshot::channel();
        self.submit(StoreCommand::Create { job, reply }, response).await
    }

    /// Replace the job stored under `id` with `job`
    pub async fn update(&self, id: String, job: Job) -> Result<Job, StoreError> {
        let (reply, response) = oneshot::channel();
        self.submit(StoreCommand::Update { id, job, reply }, response)
            .await
    }

    async fn submit(
        &self,
        command: StoreCommand,
        response: oneshot::Receiver<Result<Job, StoreError>>,
    ) -> Result<Job, StoreError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| StoreError::Unavailable)?;
        response.await.map_err(|_| StoreError::Unavailable)?
    }
}

/// Single task that owns every write to the job store
///
/// # Concurrency Model
/// - Handlers enqueue commands through a [`StoreHandle`]
/// - The writer runs one load/mutate/save cycle at a time, so no update is lost
/// - On shutdown it stops accepting commands and drains the ones already queued
pub struct StoreWriter {
    repository: JobRepository,
    receiver: mpsc::Receiver<StoreCommand>,
    last_id: i64,
}

/// Create a store writer and the handle used to reach it
pub fn channel(repository: JobRepository, capacity: usize) -> (StoreWriter, StoreHandle) {
    let (sender, receiver) = mpsc::channel(capacity);
    let writer = StoreWriter {
        repository,
        receiver,
        last_id: 0,
    };
    (writer, StoreHandle { sender })
}

impl StoreWriter {
    /// Process commands until shutdown is signalled or every handle is dropped
    pub async fn run(mut self, mut shutdown_rx: watch::Receiver<bool>) {
        info!("Store writer started for {}", self.repository.path().display());

        loop {
            tokio::select! {
                command = self.receiver.recv() => match command {
                    Some(command) => self.handle(command).await,
                    None => {
                        info!("All store handles dropped, store writer stopping");
                        return;
                    }
                },
                changed = shutdown_rx.changed() => {
                    if changed.is_err() || *shutdown_rx.borrow() {
                        info!("Store writer received shutdown signal");
                        break;
                    }
                }
            }
        }

        self.receiver.close();
        let mut drained = 0;
        while let Some(command) = self.receiver.recv().await {
            self.handle(command).await;
            drained += 1;
        }
        info!("Store writer stopped after draining {} queued writes", drained);
    }

    async fn handle(&mut self, command: StoreCommand) {
        let (result, reply) = match command {
            StoreCommand::Create { job, reply } => (self.create(job).await, reply),
            StoreCommand::Update { id, job, reply } => (self.update(id, job).await, reply),
        };

        if let Err(e) = &result {
            match e {
                StoreError::NotFound(id) => warn!("Store writer: no job with id={}", id),
                e => error!("Store writer: write failed: {}", e),
            }
        }

        if reply.send(result).is_err() {
            warn!("Store writer: caller went away before the write completed");
        }
    }

    async fn create(&mut self, job: Job) -> Result<Job, StoreError> {
        let mut document = self.repository.load().await?;

        let id = next_id(Utc::now().timestamp_millis(), self.last_id, &document);
        let job = job.with_id(id.to_string());
        document.jobs_mut().push(job.clone());

        self.repository.save(&document).await?;
        self.last_id = id;
        info!("Store writer: created job id={}", id);
        Ok(job)
    }

    async fn update(&mut self, id: String, job: Job) -> Result<Job, StoreError> {
        let mut document = self.repository.load().await?;

        let index = document
            .position(&id)
            .ok_or_else(|| StoreError::NotFound(id.clone()))?;
        let job = job.with_id(id);
        document.jobs_mut()[index] = job.clone();

        self.repository.save(&document).await?;
        info!("Store writer: updated job id={}", job.id().unwrap_or_default());
        Ok(job)
    }
}

/// Millisecond timestamp id, bumped past the last issued id and any id already stored
fn next_id(now_millis: i64, last_id: i64, document: &StoreDocument) -> i64 {
    let mut candidate = now_millis.max(last_id + 1);
    while document.position(&candidate.to_string()).is_some() {
        candidate += 1;
    }
    candidate
}

//! Job worker: concurrent poll loops plus an optional periodic producer.

use std::{fmt, sync::Arc, time::Duration};

use async_trait::async_trait;
use rustc_hash::FxHashMap;
use serde_json::Value;
use tokio::{sync::watch, task::JoinSet, time};
use tracing::{debug, error, info, warn};

use crate::{
    domain::StoreError,
    jobs::{
        JobError, JobRecord, JobState, Queue, TaskQueue,
        aggregation::{aggregation_job, today},
    },
};

/// Something that can run jobs of one kind.
#[async_trait]
pub trait JobHandler: Send + Sync {
    /// Kind string this handler accepts.
    fn kind(&self) -> &'static str;

    /// Run one job. Must tolerate being called more than once for the same payload.
    async fn handle(&self, payload: &Value) -> Result<(), JobError>;
}

#[derive(Clone, Default)]
pub struct JobHandlers {
    handlers: FxHashMap<&'static str, Arc<dyn JobHandler>>,
}

impl JobHandlers {
    #[must_use]
    pub fn register(mut self, handler: Arc<dyn JobHandler>) -> Self {
        self.handlers.insert(handler.kind(), handler);
        self
    }

    #[must_use]
    pub fn get(&self, kind: &str) -> Option<&Arc<dyn JobHandler>> {
        self.handlers.get(kind)
    }
}

impl fmt::Debug for JobHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.handlers.keys()).finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkerConfig {
    /// Number of concurrent poll loops.
    pub concurrency: usize,
    pub poll_interval: Duration,
    /// Running jobs locked for longer than this are reclaimed.
    pub lock_timeout: Duration,
    /// Enqueue an aggregation job for today at this interval.
    pub schedule_interval: Option<Duration>,
}

impl WorkerConfig {
    /// Scheduler period; a zero interval disables scheduling.
    #[must_use]
    pub fn schedule_every(&self) -> Option<Duration> {
        self.schedule_interval.filter(|every| !every.is_zero())
    }
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            poll_interval: Duration::from_secs(1),
            lock_timeout: Duration::from_secs(300),
            schedule_interval: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobOutcome {
    Idle,
    Completed,
    Retrying,
    Failed,
}

pub struct Worker {
    queue: Arc<dyn TaskQueue>,
    handlers: JobHandlers,
    config: WorkerConfig,
}

impl Worker {
    #[must_use]
    pub fn new(queue: Arc<dyn TaskQueue>, handlers: JobHandlers, config: WorkerConfig) -> Self {
        Self {
            queue,
            handlers,
            config,
        }
    }

    /// Run until `shutdown` flips to `true` or its sender is dropped.
    pub async fn run(self: Arc<Self>, shutdown: watch::Receiver<bool>) {
        let mut tasks = JoinSet::new();

        info!(
            concurrency = self.config.concurrency,
            handlers = ?self.handlers,
            "job worker starting"
        );

        for slot in 0..self.config.concurrency.max(1) {
            let worker = Arc::clone(&self);
            let shutdown = shutdown.clone();

            tasks.spawn(async move { worker.poll_loop(slot, shutdown).await });
        }

        if self.config.schedule_interval.is_some_and(|every| every.is_zero()) {
            warn!("schedule interval of zero ignored, aggregation will not be scheduled");
        }

        if let Some(every) = self.config.schedule_every() {
            let worker = Arc::clone(&self);
            let shutdown = shutdown.clone();

            tasks.spawn(async move { worker.schedule_loop(every, shutdown).await });
        }

        while let Some(joined) = tasks.join_next().await {
            if let Err(error) = joined {
                error!(%error, "job worker task aborted");
            }
        }

        info!("job worker stopped");
    }

    async fn poll_loop(&self, slot: usize, mut shutdown: watch::Receiver<bool>) {
        loop {
            if *shutdown.borrow() {
                break;
            }

            match self.run_once().await {
                Ok(JobOutcome::Idle) => {}
                Ok(outcome) => {
                    debug!(slot, ?outcome, "job processed");
                    continue;
                }
                Err(error) => error!(slot, %error, "failed to process job queue"),
            }

            tokio::select! {
                () = time::sleep(self.config.poll_interval) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
    }

    async fn schedule_loop(&self, every: Duration, mut shutdown: watch::Receiver<bool>) {
        let mut ticker = time::interval(every);

        loop {
            tokio::select! {
                _ = ticker.tick() => {}
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                    continue;
                }
            }

            if *shutdown.borrow() {
                break;
            }

            let date = today();

            match aggregation_job(date, Queue::Default) {
                Ok(job) => match self.queue.enqueue(job).await {
                    Ok(record) => info!(job = %record.id, %date, "scheduled aggregation"),
                    Err(error) => warn!(%error, "failed to schedule aggregation"),
                },
                Err(error) => warn!(%error, "failed to build aggregation job"),
            }
        }
    }

    /// Claim and run at most one job.
    ///
    /// # Errors
    ///
    /// Returns an error when the queue itself cannot be reached.
    pub async fn run_once(&self) -> Result<JobOutcome, StoreError> {
        let Some(job) = self.queue.claim(self.config.lock_timeout).await? else {
            return Ok(JobOutcome::Idle);
        };

        match self.dispatch(&job).await {
            Ok(()) => {
                self.queue.complete(job.id).await?;

                Ok(JobOutcome::Completed)
            }
            Err(error) => {
                warn!(job = %job.id, kind = %job.kind, attempt = job.attempts, %error, "job failed");

                let state = self.queue.fail(job.id, &error.to_string()).await?;

                if state == JobState::Failed {
                    error!(job = %job.id, kind = %job.kind, "job exhausted its attempts");

                    Ok(JobOutcome::Failed)
                } else {
                    Ok(JobOutcome::Retrying)
                }
            }
        }
    }

    async fn dispatch(&self, job: &JobRecord) -> Result<(), JobError> {
        let handler = self
            .handlers
            .get(&job.kind)
            .ok_or_else(|| JobError::UnknownKind(job.kind.clone()))?;

        handler.handle(&job.payload).await
    }
}

impl fmt::Debug for Worker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Worker")
            .field("handlers", &self.handlers)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use jiff::Timestamp;
    use serde_json::json;
    use testresult::TestResult;

    use crate::jobs::{JobId, MockTaskQueue};

    use super::*;

    struct Counting {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    #[async_trait]
    impl JobHandler for Counting {
        fn kind(&self) -> &'static str {
            "test:count"
        }

        async fn handle(&self, _payload: &Value) -> Result<(), JobError> {
            self.calls.fetch_add(1, Ordering::SeqCst);

            if self.fail {
                Err(JobError::UnknownKind("forced".to_string()))
            } else {
                Ok(())
            }
        }
    }

    fn job(kind: &str) -> JobRecord {
        JobRecord {
            id: JobId::from_i64(1),
            kind: kind.to_string(),
            queue: "default".to_string(),
            payload: json!(null),
            state: JobState::Running,
            attempts: 1,
            max_attempts: 5,
            run_at: Timestamp::UNIX_EPOCH,
            created_at: Timestamp::UNIX_EPOCH,
        }
    }

    fn worker(queue: MockTaskQueue, calls: &Arc<AtomicUsize>, fail: bool) -> Worker {
        let handlers = JobHandlers::default().register(Arc::new(Counting {
            calls: Arc::clone(calls),
            fail,
        }));

        Worker::new(Arc::new(queue), handlers, WorkerConfig::default())
    }

    #[tokio::test]
    async fn empty_queue_is_idle() -> TestResult {
        let mut queue = MockTaskQueue::new();
        queue.expect_claim().once().return_once(|_| Ok(None));
        queue.expect_complete().never();

        let calls = Arc::new(AtomicUsize::new(0));

        assert_eq!(worker(queue, &calls, false).run_once().await?, JobOutcome::Idle);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        Ok(())
    }

    #[tokio::test]
    async fn successful_job_is_completed() -> TestResult {
        let mut queue = MockTaskQueue::new();
        queue
            .expect_claim()
            .once()
            .return_once(|_| Ok(Some(job("test:count"))));
        queue
            .expect_complete()
            .once()
            .withf(|id| *id == JobId::from_i64(1))
            .return_once(|_| Ok(()));
        queue.expect_fail().never();

        let calls = Arc::new(AtomicUsize::new(0));

        assert_eq!(
            worker(queue, &calls, false).run_once().await?,
            JobOutcome::Completed
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        Ok(())
    }

    #[tokio::test]
    async fn failing_job_is_rescheduled() -> TestResult {
        let mut queue = MockTaskQueue::new();
        queue
            .expect_claim()
            .once()
            .return_once(|_| Ok(Some(job("test:count"))));
        queue.expect_complete().never();
        queue
            .expect_fail()
            .once()
            .return_once(|_, _| Ok(JobState::Pending));

        let calls = Arc::new(AtomicUsize::new(0));

        assert_eq!(
            worker(queue, &calls, true).run_once().await?,
            JobOutcome::Retrying
        );

        Ok(())
    }

    #[tokio::test]
    async fn unknown_kind_is_failed_without_running_handlers() -> TestResult {
        let mut queue = MockTaskQueue::new();
        queue
            .expect_claim()
            .once()
            .return_once(|_| Ok(Some(job("mystery"))));
        queue
            .expect_fail()
            .once()
            .withf(|_, error| error.contains("mystery"))
            .return_once(|_, _| Ok(JobState::Failed));

        let calls = Arc::new(AtomicUsize::new(0));

        assert_eq!(
            worker(queue, &calls, false).run_once().await?,
            JobOutcome::Failed
        );
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        Ok(())
    }

    #[tokio::test]
    async fn run_stops_when_shutdown_is_signalled() -> TestResult {
        let mut queue = MockTaskQueue::new();
        queue.expect_claim().returning(|_| Ok(None));

        let calls = Arc::new(AtomicUsize::new(0));
        let worker = Arc::new(Worker::new(
            Arc::new(queue),
            JobHandlers::default(),
            WorkerConfig {
                concurrency: 2,
                poll_interval: Duration::from_millis(10),
                ..WorkerConfig::default()
            },
        ));

        let (stop, shutdown) = watch::channel(false);
        let running = tokio::spawn(worker.run(shutdown));

        time::sleep(Duration::from_millis(30)).await;
        stop.send(true)?;

        time::timeout(Duration::from_secs(5), running).await??;
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        Ok(())
    }

    #[test]
    fn zero_schedule_interval_disables_scheduling() {
        let zero = WorkerConfig {
            schedule_interval: Some(Duration::ZERO),
            ..WorkerConfig::default()
        };
        let minute = WorkerConfig {
            schedule_interval: Some(Duration::from_secs(60)),
            ..WorkerConfig::default()
        };

        assert_eq!(zero.schedule_every(), None);
        assert_eq!(minute.schedule_every(), Some(Duration::from_secs(60)));
        assert_eq!(WorkerConfig::default().schedule_every(), None);
    }

    #[tokio::test]
    async fn zero_schedule_interval_runs_without_scheduler() -> TestResult {
        let mut queue = MockTaskQueue::new();
        queue.expect_claim().returning(|_| Ok(None));
        queue.expect_enqueue().never();

        let worker = Arc::new(Worker::new(
            Arc::new(queue),
            JobHandlers::default(),
            WorkerConfig {
                concurrency: 1,
                poll_interval: Duration::from_millis(10),
                schedule_interval: Some(Duration::ZERO),
                ..WorkerConfig::default()
            },
        ));

        let (stop, shutdown) = watch::channel(false);
        let running = tokio::spawn(worker.run(shutdown));

        time::sleep(Duration::from_millis(30)).await;
        stop.send(true)?;

        time::timeout(Duration::from_secs(5), running).await??;

        Ok(())
    }
}

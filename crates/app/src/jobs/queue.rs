//! Durable job queue.

use std::{fmt, str::FromStr, time::Duration};

use async_trait::async_trait;
use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use mockall::automock;
use serde_json::Value;
use sqlx::{FromRow, Postgres, Row, postgres::PgRow, query, query_as, query_scalar, types::Json};
use tracing::warn;

use crate::{database::Db, domain::StoreError, ids::TypedId};

const ENQUEUE_JOB_SQL: &str = include_str!("sql/enqueue_job.sql");
const CLAIM_JOB_SQL: &str = include_str!("sql/claim_job.sql");
const COMPLETE_JOB_SQL: &str = include_str!("sql/complete_job.sql");
const FAIL_JOB_SQL: &str = include_str!("sql/fail_job.sql");
const FAIL_STALE_JOBS_SQL: &str = include_str!("sql/fail_stale_jobs.sql");

/// Attempts before a job is parked as failed.
pub const DEFAULT_MAX_ATTEMPTS: i32 = 5;

/// Job Id
pub type JobId = TypedId<JobRecord>;

/// Named queue; higher weight is claimed first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Queue {
    Critical,
    #[default]
    Default,
    Low,
}

impl Queue {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Critical => "critical",
            Self::Default => "default",
            Self::Low => "low",
        }
    }

    #[must_use]
    pub const fn priority(self) -> i16 {
        match self {
            Self::Critical => 6,
            Self::Default => 3,
            Self::Low => 1,
        }
    }
}

impl fmt::Display for Queue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Queue {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "critical" => Ok(Self::Critical),
            "default" => Ok(Self::Default),
            "low" => Ok(Self::Low),
            other => Err(format!("unknown queue `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Pending,
    Running,
    Completed,
    Failed,
}

impl FromStr for JobState {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(Self::Pending),
            "running" => Ok(Self::Running),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown job state `{other}`")),
        }
    }
}

/// Job to be enqueued.
#[derive(Debug, Clone, PartialEq)]
pub struct NewJob {
    pub kind: String,
    pub queue: Queue,
    pub payload: Value,
    pub max_attempts: i32,
}

impl NewJob {
    #[must_use]
    pub fn new(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            kind: kind.into(),
            queue: Queue::default(),
            payload,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    #[must_use]
    pub fn on_queue(mut self, queue: Queue) -> Self {
        self.queue = queue;
        self
    }
}

/// Job Record
#[derive(Debug, Clone, PartialEq)]
pub struct JobRecord {
    pub id: JobId,
    pub kind: String,
    pub queue: String,
    pub payload: Value,
    pub state: JobState,
    pub attempts: i32,
    pub max_attempts: i32,
    pub run_at: Timestamp,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone)]
pub struct PgTaskQueue {
    db: Db,
}

impl PgTaskQueue {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TaskQueue for PgTaskQueue {
    async fn enqueue(&self, job: NewJob) -> Result<JobRecord, StoreError> {
        if job.kind.trim().is_empty() {
            return Err(StoreError::InvalidInput("job kind is required"));
        }

        let mut tx = self.db.begin().await?;

        let record = query_as::<Postgres, JobRecord>(ENQUEUE_JOB_SQL)
            .bind(&job.kind)
            .bind(job.queue.as_str())
            .bind(job.queue.priority())
            .bind(Json(&job.payload))
            .bind(job.max_attempts.max(1))
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn claim(&self, lock_timeout: Duration) -> Result<Option<JobRecord>, StoreError> {
        let mut tx = self.db.begin().await?;

        let abandoned = query(FAIL_STALE_JOBS_SQL)
            .bind(lock_timeout.as_secs_f64())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if abandoned > 0 {
            warn!(abandoned, "failed jobs whose lock expired on their final attempt");
        }

        let record = query_as::<Postgres, JobRecord>(CLAIM_JOB_SQL)
            .bind(lock_timeout.as_secs_f64())
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(record)
    }

    async fn complete(&self, job: JobId) -> Result<(), StoreError> {
        let mut tx = self.db.begin().await?;

        let rows_affected = query(COMPLETE_JOB_SQL)
            .bind(job.into_i64())
            .execute(&mut *tx)
            .await?
            .rows_affected();

        if rows_affected == 0 {
            return Err(StoreError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    async fn fail(&self, job: JobId, error: &str) -> Result<JobState, StoreError> {
        let mut tx = self.db.begin().await?;

        let state = query_scalar::<Postgres, String>(FAIL_JOB_SQL)
            .bind(job.into_i64())
            .bind(error)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        state
            .parse()
            .map_err(|message: String| StoreError::Internal(sqlx::Error::Decode(message.into())))
    }
}

/// Queue operations used by producers and the worker.
#[automock]
#[async_trait]
pub trait TaskQueue: Send + Sync {
    /// Persist a job so a worker can pick it up.
    async fn enqueue(&self, job: NewJob) -> Result<JobRecord, StoreError>;

    /// Lock the most urgent runnable job, including running jobs whose lock expired.
    /// Expired jobs with no attempts left are parked as failed instead.
    async fn claim(&self, lock_timeout: Duration) -> Result<Option<JobRecord>, StoreError>;

    /// Mark a claimed job as done.
    async fn complete(&self, job: JobId) -> Result<(), StoreError>;

    /// Record a failure and schedule a retry, or park the job once attempts run out.
    async fn fail(&self, job: JobId, error: &str) -> Result<JobState, StoreError>;
}

impl<'r> FromRow<'r, PgRow> for JobRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let state: String = row.try_get("state")?;

        let state = state.parse().map_err(|message: String| sqlx::Error::ColumnDecode {
            index: "state".to_string(),
            source: message.into(),
        })?;

        Ok(Self {
            id: JobId::from_i64(row.try_get("id")?),
            kind: row.try_get("kind")?,
            queue: row.try_get("queue")?,
            payload: row.try_get::<Json<Value>, _>("payload")?.0,
            state,
            attempts: row.try_get("attempts")?,
            max_attempts: row.try_get("max_attempts")?,
            run_at: row.try_get::<SqlxTimestamp, _>("run_at")?.to_jiff(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
        })
    }
}

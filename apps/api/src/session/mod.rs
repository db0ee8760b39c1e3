// Multi-resume sessions.
// A session owns its resume records and the job description they are scored against.
// Nothing is persisted: sessions live in memory until deleted or the process exits.

pub mod handlers;

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::evaluation::arms::{Arm, ArmSet};
use crate::evaluation::models::EvaluationResult;

pub type ResumeId = u32;

/// The distinguished first resume. It can never be removed.
pub const FIRST_RESUME_ID: ResumeId = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error("Session {0} not found")]
    SessionNotFound(Uuid),

    #[error("Resume {0} not found")]
    ResumeNotFound(ResumeId),

    #[error("Resume {0} has not completed all four evaluation arms")]
    NotFullyEvaluated(ResumeId),
}

/// One candidate's resume and its evaluation progress.
#[derive(Debug, Clone, Serialize)]
pub struct ResumeRecord {
    pub id: ResumeId,
    pub label: String,
    pub raw_text: String,
    pub file_name: String,
    pub completed_arms: ArmSet,
    pub arm_scores: BTreeMap<Arm, f64>,
    pub arm_results: BTreeMap<Arm, EvaluationResult>,
}

impl ResumeRecord {
    pub fn new(id: ResumeId, label: String) -> Self {
        Self {
            id,
            label,
            raw_text: String::new(),
            file_name: String::new(),
            completed_arms: ArmSet::new(),
            arm_scores: BTreeMap::new(),
            arm_results: BTreeMap::new(),
        }
    }
}

fn default_label(id: ResumeId) -> String {
    format!("Resume {id}")
}

/// Per-user session state. Always holds at least one resume, and exactly one is active.
#[derive(Debug, Clone)]
pub struct SessionState {
    resumes: BTreeMap<ResumeId, ResumeRecord>,
    active_resume_id: ResumeId,
    resume_counter: u32,
    job_description: String,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    /// Starts with the first resume record, active.
    pub fn new() -> Self {
        let first = ResumeRecord::new(FIRST_RESUME_ID, default_label(FIRST_RESUME_ID));
        Self {
            resumes: BTreeMap::from([(FIRST_RESUME_ID, first)]),
            active_resume_id: FIRST_RESUME_ID,
            resume_counter: FIRST_RESUME_ID,
            job_description: String::new(),
        }
    }

    /// Creates an empty resume and makes it active.
    pub fn add_resume(&mut self) -> ResumeId {
        self.resume_counter += 1;
        let id = self.resume_counter;
        self.resumes
            .insert(id, ResumeRecord::new(id, default_label(id)));
        self.active_resume_id = id;
        id
    }

    /// Removes `id`. No-op (returns `false`) for the first resume, the last remaining
    /// resume, or an unknown id. Removing the active resume re-activates the first one.
    pub fn remove_resume(&mut self, id: ResumeId) -> bool {
        if id == FIRST_RESUME_ID || self.resumes.len() <= 1 {
            return false;
        }
        if self.resumes.remove(&id).is_none() {
            return false;
        }
        if self.active_resume_id == id {
            self.active_resume_id = FIRST_RESUME_ID;
        }
        true
    }

    pub fn select_active(&mut self, id: ResumeId) -> Result<(), SessionError> {
        self.resume(id)?;
        self.active_resume_id = id;
        Ok(())
    }

    pub fn set_text(&mut self, id: ResumeId, text: String) -> Result<(), SessionError> {
        self.resume_mut(id)?.raw_text = text;
        Ok(())
    }

    pub fn set_label(&mut self, id: ResumeId, label: String) -> Result<(), SessionError> {
        self.resume_mut(id)?.label = label;
        Ok(())
    }

    /// Stores text extracted from an uploaded document.
    pub fn set_document(
        &mut self,
        id: ResumeId,
        file_name: String,
        text: String,
    ) -> Result<(), SessionError> {
        let resume = self.resume_mut(id)?;
        resume.file_name = file_name;
        resume.raw_text = text;
        Ok(())
    }

    pub fn set_job_description(&mut self, text: String) {
        self.job_description = text;
    }

    pub fn job_description(&self) -> &str {
        &self.job_description
    }

    pub fn active_resume_id(&self) -> ResumeId {
        self.active_resume_id
    }

    pub fn resume_counter(&self) -> u32 {
        self.resume_counter
    }

    pub fn active(&self) -> &ResumeRecord {
        // The active id always refers to a live record; the first resume is never removed.
        &self.resumes[&self.active_resume_id]
    }

    pub fn resume(&self, id: ResumeId) -> Result<&ResumeRecord, SessionError> {
        self.resumes.get(&id).ok_or(SessionError::ResumeNotFound(id))
    }

    pub fn resume_mut(&mut self, id: ResumeId) -> Result<&mut ResumeRecord, SessionError> {
        self.resumes
            .get_mut(&id)
            .ok_or(SessionError::ResumeNotFound(id))
    }

    /// Records in id order.
    pub fn resumes(&self) -> impl Iterator<Item = &ResumeRecord> {
        self.resumes.values()
    }

    pub fn len(&self) -> usize {
        self.resumes.len()
    }
}

/// In-memory registry of live sessions, shared across handlers.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<Mutex<HashMap<Uuid, SessionState>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session initialized with one resume record.
    pub async fn create(&self) -> Uuid {
        let id = Uuid::new_v4();
        self.inner.lock().await.insert(id, SessionState::new());
        id
    }

    /// Runs `f` against the session while holding the store lock.
    /// Keep `f` synchronous and short: never hold it across a model call.
    pub async fn with<R>(
        &self,
        id: Uuid,
        f: impl FnOnce(&mut SessionState) -> R,
    ) -> Result<R, SessionError> {
        let mut sessions = self.inner.lock().await;
        let session = sessions
            .get_mut(&id)
            .ok_or(SessionError::SessionNotFound(id))?;
        Ok(f(session))
    }

    /// Tears the session down. Returns `false` if it did not exist.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.lock().await.remove(&id).is_some()
    }
}

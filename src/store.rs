use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use thiserror::Error;

use crate::models::SubmissionRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("an application already exists for this user")]
    AlreadySubmitted,

    #[error("store backend failed: {0}")]
    Backend(String),
}

#[async_trait]
pub trait SubmissionStore: Send + Sync {
    // insert unless the user already has one
    async fn create(&self, user_email: &str, record: SubmissionRecord) -> Result<(), StoreError>;

    async fn exists(&self, user_email: &str) -> Result<bool, StoreError>;
}

// In-process store keyed by user email
#[derive(Default)]
pub struct MemoryStore {
    submissions: DashMap<String, SubmissionRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, user_email: &str) -> Option<SubmissionRecord> {
        self.submissions.get(user_email).map(|entry| entry.clone())
    }

    pub fn len(&self) -> usize {
        self.submissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.submissions.is_empty()
    }
}

#[async_trait]
impl SubmissionStore for MemoryStore {
    async fn create(&self, user_email: &str, record: SubmissionRecord) -> Result<(), StoreError> {
        match self.submissions.entry(user_email.to_owned()) {
            Entry::Occupied(_) => Err(StoreError::AlreadySubmitted),
            Entry::Vacant(slot) => {
                slot.insert(record);
                Ok(())
            }
        }
    }

    async fn exists(&self, user_email: &str) -> Result<bool, StoreError> {
        Ok(self.submissions.contains_key(user_email))
    }
}

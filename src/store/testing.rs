//! Store doubles for exercising the router.

use anyhow::{bail, Result};
use async_trait::async_trait;
use std::sync::Mutex;

use super::{KvStore, MemoryStore};

/// Wraps a [`MemoryStore`] and records every call in order
#[derive(Default)]
pub struct RecordingStore {
    inner: MemoryStore,
    calls: Mutex<Vec<String>>,
}

impl RecordingStore {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl KvStore for RecordingStore {
    async fn put(&self, key: &str, value: &str) -> Result<()> {
        self.calls.lock().unwrap().push(format!("put {}={}", key, value));
        self.inner.put(key, value).await
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        self.calls.lock().unwrap().push(format!("get {}", key));
        self.inner.get(key).await
    }
}

/// Which operation a [`FailingStore`] rejects
#[derive(Clone, Copy)]
pub enum FailOn {
    Put,
    Get,
}

pub struct FailingStore {
    pub fail_on: FailOn,
}

#[async_trait]
impl KvStore for FailingStore {
    async fn put(&self, _key: &str, _value: &str) -> Result<()> {
        match self.fail_on {
            FailOn::Put => bail!("simulated put failure"),
            FailOn::Get => Ok(()),
        }
    }

    async fn get(&self, _key: &str) -> Result<Option<String>> {
        match self.fail_on {
            FailOn::Get => bail!("simulated get failure"),
            FailOn::Put => Ok(None),
        }
    }
}

/// Accepts writes but never returns them
pub struct ForgetfulStore;

#[async_trait]
impl KvStore for ForgetfulStore {
    async fn put(&self, _key: &str, _value: &str) -> Result<()> {
        Ok(())
    }

    async fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

//! Common test infrastructure: a recording stub transport and an
//! in-memory cache store.
#![allow(dead_code)]

use herald_client::{ApiClient, CacheStore};
use herald_core::{HeraldError, HeraldResult};
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

/// One call observed by [`StubApiClient`].
#[derive(Debug, Clone, PartialEq)]
pub enum RecordedCall {
    Get {
        path: String,
        params: Vec<(String, String)>,
    },
    Post {
        path: String,
        body: Value,
    },
    Put {
        path: String,
        body: Value,
    },
    Delete {
        path: String,
    },
}

/// Stub transport returning a canned envelope for every call.
pub struct StubApiClient {
    envelope: Value,
    fail_status: Option<u16>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl StubApiClient {
    /// A stub answering every request with `envelope`.
    pub fn returning(envelope: Value) -> Self {
        Self {
            envelope,
            fail_status: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// A stub failing every request with the given status.
    pub fn failing(status: u16) -> Self {
        Self {
            envelope: Value::Null,
            fail_status: Some(status),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn respond(&self) -> HeraldResult<Value> {
        match self.fail_status {
            Some(status) => Err(HeraldError::remote_api(status, "stubbed failure")),
            None => Ok(self.envelope.clone()),
        }
    }
}

#[async_trait]
impl ApiClient for StubApiClient {
    async fn get(&self, path: &str, params: &[(&str, String)]) -> HeraldResult<Value> {
        self.calls.lock().unwrap().push(RecordedCall::Get {
            path: path.to_string(),
            params: params
                .iter()
                .map(|(name, value)| ((*name).to_string(), value.clone()))
                .collect(),
        });
        self.respond()
    }

    async fn post(&self, path: &str, body: &Value) -> HeraldResult<Value> {
        self.calls.lock().unwrap().push(RecordedCall::Post {
            path: path.to_string(),
            body: body.clone(),
        });
        self.respond()
    }

    async fn put(&self, path: &str, body: &Value) -> HeraldResult<Value> {
        self.calls.lock().unwrap().push(RecordedCall::Put {
            path: path.to_string(),
            body: body.clone(),
        });
        self.respond()
    }

    async fn delete(&self, path: &str) -> HeraldResult<Value> {
        self.calls.lock().unwrap().push(RecordedCall::Delete {
            path: path.to_string(),
        });
        self.respond()
    }
}

/// One operation observed by [`MemoryCacheStore`].
#[derive(Debug, Clone, PartialEq)]
pub enum CacheOp {
    Get(String),
    Set {
        key: String,
        value: String,
        ttl_secs: u64,
    },
    Delete(Vec<String>),
    DeletePattern(String),
}

/// In-memory cache store recording every operation.
#[derive(Default)]
pub struct MemoryCacheStore {
    entries: Mutex<HashMap<String, String>>,
    ops: Mutex<Vec<CacheOp>>,
    fail: bool,
}

impl MemoryCacheStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-populated with one entry.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::default();
        store
            .entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        store
    }

    /// A store whose every operation fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn entry(&self, key: &str) -> Option<String> {
        self.entries.lock().unwrap().get(key).cloned()
    }

    pub fn ops(&self) -> Vec<CacheOp> {
        self.ops.lock().unwrap().clone()
    }

    pub fn sets(&self) -> Vec<(String, String, u64)> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                CacheOp::Set {
                    key,
                    value,
                    ttl_secs,
                } => Some((key, value, ttl_secs)),
                _ => None,
            })
            .collect()
    }

    pub fn deletes(&self) -> Vec<Vec<String>> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                CacheOp::Delete(keys) => Some(keys),
                _ => None,
            })
            .collect()
    }

    pub fn pattern_deletes(&self) -> Vec<String> {
        self.ops()
            .into_iter()
            .filter_map(|op| match op {
                CacheOp::DeletePattern(pattern) => Some(pattern),
                _ => None,
            })
            .collect()
    }

    fn check(&self) -> HeraldResult<()> {
        if self.fail {
            Err(HeraldError::cache("store offline"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CacheStore for MemoryCacheStore {
    async fn get_raw(&self, key: &str) -> HeraldResult<Option<String>> {
        self.check()?;
        self.ops.lock().unwrap().push(CacheOp::Get(key.to_string()));
        Ok(self.entries.lock().unwrap().get(key).cloned())
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> HeraldResult<()> {
        self.check()?;
        self.ops.lock().unwrap().push(CacheOp::Set {
            key: key.to_string(),
            value: value.to_string(),
            ttl_secs: ttl.as_secs(),
        });
        self.entries
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> HeraldResult<u64> {
        self.check()?;
        self.ops
            .lock()
            .unwrap()
            .push(CacheOp::Delete(keys.to_vec()));
        let mut entries = self.entries.lock().unwrap();
        Ok(keys
            .iter()
            .filter(|key| entries.remove(*key).is_some())
            .count() as u64)
    }

    async fn delete_pattern(&self, pattern: &str) -> HeraldResult<u64> {
        self.check()?;
        self.ops
            .lock()
            .unwrap()
            .push(CacheOp::DeletePattern(pattern.to_string()));
        let prefix = pattern.trim_end_matches('*');
        let mut entries = self.entries.lock().unwrap();
        let matching: Vec<String> = entries
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();
        for key in &matching {
            entries.remove(key);
        }
        Ok(matching.len() as u64)
    }

    fn is_enabled(&self) -> bool {
        true
    }
}

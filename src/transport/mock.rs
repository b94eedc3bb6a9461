//! In-memory transport for tests

use crate::transport::traits::MessageTransport;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use edge_shared::Message;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Records every delivered message; optionally starts failing after `n` sends
#[derive(Default, Clone)]
pub struct MockTransport {
    sent: Arc<Mutex<Vec<(Message, String)>>>,
    attempts: Arc<AtomicUsize>,
    fail_after: Option<usize>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `n` messages, then fail every later send
    pub fn failing_after(n: usize) -> Self {
        Self {
            fail_after: Some(n),
            ..Self::default()
        }
    }

    pub fn messages(&self) -> Vec<Message> {
        self.sent.lock().unwrap().iter().map(|(m, _)| m.clone()).collect()
    }

    pub fn authorizations(&self) -> Vec<String> {
        self.sent.lock().unwrap().iter().map(|(_, a)| a.clone()).collect()
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl MessageTransport for MockTransport {
    async fn send(&self, message: &Message, authorization: &str) -> Result<()> {
        let attempt = self.attempts.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_after.is_some_and(|n| attempt > n) {
            return Err(anyhow!("connection reset"));
        }

        self.sent
            .lock()
            .unwrap()
            .push((message.clone(), authorization.to_string()));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "Mock"
    }
}

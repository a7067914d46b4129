//! In-memory transport fake shared by the resolver and emitter tests.

#![allow(clippy::unwrap_used)]

use std::sync::{
    Mutex,
    atomic::{AtomicUsize, Ordering},
};

use {async_trait::async_trait, serenity::all::ChannelId, url::Url};

use crate::{
    error::Error,
    record::LogRecord,
    transport::{AuditTransport, ThreadInfo},
};

pub(crate) struct FakeTransport {
    pub threads: Mutex<Vec<ThreadInfo>>,
    pub creates: AtomicUsize,
    pub fail_list: bool,
    pub fail_create: bool,
    pub fail_thread_send: bool,
    pub fail_webhook_send: bool,
    pub thread_posts: Mutex<Vec<(ChannelId, String)>>,
    pub webhook_posts: Mutex<Vec<(String, String)>>,
    next_id: AtomicUsize,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self {
            threads: Mutex::new(Vec::new()),
            creates: AtomicUsize::new(0),
            fail_list: false,
            fail_create: false,
            fail_thread_send: false,
            fail_webhook_send: false,
            thread_posts: Mutex::new(Vec::new()),
            webhook_posts: Mutex::new(Vec::new()),
            next_id: AtomicUsize::new(100),
        }
    }

    pub fn with_thread(self, id: u64, name: &str) -> Self {
        self.threads.lock().unwrap().push(ThreadInfo {
            id: ChannelId::new(id),
            name: name.to_string(),
        });
        self
    }
}

#[async_trait]
impl AuditTransport for FakeTransport {
    async fn active_threads(&self) -> Result<Vec<ThreadInfo>, Error> {
        if self.fail_list {
            return Err(Error::Channel("channel deleted".into()));
        }
        Ok(self.threads.lock().unwrap().clone())
    }

    async fn create_thread(&self, name: &str) -> Result<ChannelId, Error> {
        if self.fail_create {
            return Err(Error::Channel("missing permission".into()));
        }
        self.creates.fetch_add(1, Ordering::SeqCst);
        let id = ChannelId::new(self.next_id.fetch_add(1, Ordering::SeqCst) as u64);
        self.threads.lock().unwrap().push(ThreadInfo {
            id,
            name: name.to_string(),
        });
        Ok(id)
    }

    async fn send_to_thread(&self, thread: ChannelId, record: &LogRecord) -> Result<(), Error> {
        if self.fail_thread_send {
            return Err(Error::Send("rate limited".into()));
        }
        self.thread_posts
            .lock()
            .unwrap()
            .push((thread, record.title().to_string()));
        Ok(())
    }

    async fn send_to_webhook(&self, url: &Url, record: &LogRecord) -> Result<(), Error> {
        if self.fail_webhook_send {
            return Err(Error::Send("webhook gone".into()));
        }
        self.webhook_posts
            .lock()
            .unwrap()
            .push((url.to_string(), record.title().to_string()));
        Ok(())
    }
}

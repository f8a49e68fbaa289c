//! Scripted sessions and a recording default handler for handler tests.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use super::{DownloadHandler, HandlerError, Spider};
use crate::client::{RawResponse, Session, SessionFactory, TransportError, TransportErrorKind};
use crate::http::{Headers, Request, Response, ResponseKind};
use crate::options::{CallOptions, ClientOptions};

#[derive(Debug, Clone)]
pub(crate) enum Script {
    Reply(RawResponse),
    Fail(String),
    /// Fails with a timeout-kind transport error.
    TimedOut,
    /// Never completes; used to exercise cancellation.
    Hang,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Counters {
    opened: Arc<AtomicUsize>,
    closed: Arc<AtomicUsize>,
    calls: Arc<Mutex<Vec<(ClientOptions, CallOptions)>>>,
}

impl Counters {
    pub fn opened(&self) -> usize {
        self.opened.load(Ordering::SeqCst)
    }

    pub fn closed(&self) -> usize {
        self.closed.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<(ClientOptions, CallOptions)> {
        self.calls.lock().unwrap().clone()
    }
}

pub(crate) struct MockFactory {
    script: Script,
    pub counters: Counters,
}

impl MockFactory {
    pub fn new(script: Script) -> Self {
        Self {
            script,
            counters: Counters::default(),
        }
    }
}

impl SessionFactory for MockFactory {
    type Session = MockSession;

    fn open(&self, options: &ClientOptions) -> MockSession {
        self.counters.opened.fetch_add(1, Ordering::SeqCst);
        MockSession {
            script: self.script.clone(),
            options: options.clone(),
            counters: self.counters.clone(),
        }
    }
}

pub(crate) struct MockSession {
    script: Script,
    options: ClientOptions,
    counters: Counters,
}

impl Drop for MockSession {
    fn drop(&mut self) {
        self.counters.closed.fetch_add(1, Ordering::SeqCst);
    }
}

#[async_trait]
impl Session for MockSession {
    async fn request(&mut self, call: &CallOptions) -> Result<RawResponse, TransportError> {
        self.counters
            .calls
            .lock()
            .unwrap()
            .push((self.options.clone(), call.clone()));
        match &self.script {
            Script::Reply(raw) => Ok(raw.clone()),
            Script::Fail(message) => Err(TransportError::new(TransportErrorKind::Other, message.clone())),
            Script::TimedOut => Err(TransportError::new(
                TransportErrorKind::Timeout,
                "Operation timed out after 500 milliseconds with 0 bytes received",
            )),
            Script::Hang => std::future::pending().await,
        }
    }
}

/// Default handler stand-in that records what it was given.
#[derive(Default)]
pub(crate) struct RecordingHandler {
    pub seen: Mutex<Vec<Arc<Request>>>,
}

#[async_trait]
impl DownloadHandler for RecordingHandler {
    async fn download_request(
        &self,
        request: Arc<Request>,
        _spider: &Spider,
    ) -> Result<Response, HandlerError> {
        self.seen.lock().unwrap().push(Arc::clone(&request));
        Ok(Response::new(
            request.url.clone(),
            200,
            Headers::new(),
            b"default".to_vec(),
            ResponseKind::Text,
        )
        .with_request(request))
    }
}

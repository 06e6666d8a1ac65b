// src/runtime/http_workers.rs
//! Asynchronous HTTP request workers
//!
//! A small fixed pool of threads pulls queued requests, runs them through a
//! [`Transport`], and hands each result back to the dispatch thread as a
//! [`PendingHttpResponse`] on the response queue. Workers never touch script
//! state.
//!
//! ```text
//! handler ─▶ HttpRequester ─▶ [channel] ─▶ worker 1..N ─▶ Transport
//!                                               │
//!                                               ▼
//!                     EventQueue<PendingHttpResponse> ─▶ drained per tick
//! ```

use crate::dispatch::hooks::ResponseCall;
use crate::runtime::event_queue::EventQueue;
use crate::utils::errors::{EngineError, Result, ScriptError};
use crossbeam_channel::{unbounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};
use ulid::Ulid;

/// Header mapping
pub type Headers = BTreeMap<String, String>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
}

/// Request submitted by a handler
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpRequest {
    pub method: Method,

    /// Scheme and authority, e.g. `https://example.com`
    pub scheme: String,

    pub path: String,
    pub headers: Headers,
    pub body: Option<String>,
    pub content_type: Option<String>,
}

impl HttpRequest {
    pub fn get(scheme: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            scheme: scheme.into(),
            path: path.into(),
            headers: Headers::new(),
            body: None,
            content_type: None,
        }
    }

    pub fn post(
        scheme: impl Into<String>,
        path: impl Into<String>,
        body: impl Into<String>,
        content_type: impl Into<String>,
    ) -> Self {
        Self {
            method: Method::Post,
            scheme: scheme.into(),
            path: path.into(),
            headers: Headers::new(),
            body: Some(body.into()),
            content_type: Some(content_type.into()),
        }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }
}

/// Completed response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
    pub headers: Headers,
}

/// Script callback receiving the response, or `None` on failure/timeout.
/// Runs on the dispatch thread with access to script state.
pub type ResponseCallback = Box<
    dyn FnOnce(&mut ResponseCall<'_>, Option<HttpResponse>) -> std::result::Result<(), ScriptError>
        + Send,
>;

/// A completed request waiting for delivery on the dispatch thread
pub struct PendingHttpResponse {
    pub id: Ulid,

    /// Environment generation that issued the request
    pub generation: u64,

    pub response: Option<HttpResponse>,
    callback: ResponseCallback,
}

impl PendingHttpResponse {
    pub fn new(
        id: Ulid,
        generation: u64,
        response: Option<HttpResponse>,
        callback: ResponseCallback,
    ) -> Self {
        Self {
            id,
            generation,
            response,
            callback,
        }
    }

    pub fn responded(&self) -> bool {
        self.response.is_some()
    }

    /// Invoke the callback, consuming the record
    pub fn deliver(self, call: &mut ResponseCall<'_>) -> std::result::Result<(), ScriptError> {
        (self.callback)(call, self.response)
    }
}

impl fmt::Debug for PendingHttpResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingHttpResponse")
            .field("id", &self.id)
            .field("generation", &self.generation)
            .field("response", &self.response)
            .finish_non_exhaustive()
    }
}

/// Performs the actual network I/O on a worker thread
pub trait Transport: Send + Sync + 'static {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

/// Transport that fails every request
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineTransport;

impl Transport for OfflineTransport {
    fn send(&self, request: &HttpRequest) -> Result<HttpResponse> {
        Err(EngineError::Transport(format!(
            "offline, dropping {:?} {}{}",
            request.method, request.scheme, request.path
        )))
    }
}

struct HttpJob {
    id: Ulid,
    generation: u64,
    request: HttpRequest,
    callback: ResponseCallback,
}

/// Handle for submitting requests to the pool
#[derive(Clone)]
pub struct HttpRequester {
    sender: Sender<HttpJob>,
}

impl HttpRequester {
    /// Queue a request; the callback runs on the dispatch thread later
    pub fn submit(
        &self,
        generation: u64,
        request: HttpRequest,
        callback: ResponseCallback,
    ) -> Result<Ulid> {
        let id = Ulid::new();
        debug!("Queueing request {} {:?} {}{}", id, request.method, request.scheme, request.path);
        self.sender
            .send(HttpJob {
                id,
                generation,
                request,
                callback,
            })
            .map_err(|_| EngineError::ChannelClosed)?;
        Ok(id)
    }
}

/// Fixed pool of request workers
pub struct HttpWorkerPool {
    sender: Option<Sender<HttpJob>>,
    workers: Vec<JoinHandle<()>>,
}

impl HttpWorkerPool {
    /// Spawn `threads` workers feeding `responses`
    pub fn start(
        threads: usize,
        transport: Arc<dyn Transport>,
        responses: Arc<EventQueue<PendingHttpResponse>>,
    ) -> Result<Self> {
        let (sender, receiver) = unbounded::<HttpJob>();
        let mut workers = Vec::with_capacity(threads);

        for worker_id in 0..threads {
            let receiver = receiver.clone();
            let transport = Arc::clone(&transport);
            let responses = Arc::clone(&responses);
            let handle = thread::Builder::new()
                .name(format!("http-worker-{}", worker_id))
                .spawn(move || Self::run_worker(worker_id, receiver, transport, responses))?;
            workers.push(handle);
        }

        info!("Started {} HTTP worker threads", threads);
        Ok(Self {
            sender: Some(sender),
            workers,
        })
    }

    fn run_worker(
        worker_id: usize,
        receiver: Receiver<HttpJob>,
        transport: Arc<dyn Transport>,
        responses: Arc<EventQueue<PendingHttpResponse>>,
    ) {
        for job in receiver.iter() {
            let response = match transport.send(&job.request) {
                Ok(response) => Some(response),
                Err(e) => {
                    warn!("Request {} failed on worker {}: {}", job.id, worker_id, e);
                    None
                }
            };
            responses.enqueue(PendingHttpResponse::new(
                job.id,
                job.generation,
                response,
                job.callback,
            ));
        }
        debug!("HTTP worker {} exiting", worker_id);
    }

    pub fn requester(&self) -> Option<HttpRequester> {
        self.sender.as_ref().map(|sender| HttpRequester {
            sender: sender.clone(),
        })
    }

    pub fn worker_count(&self) -> usize {
        self.workers.len()
    }

    /// Stop accepting requests and join the workers once the backlog is done
    pub fn shutdown(&mut self) {
        // Workers exit once every sender is gone
        self.sender.take();
        for handle in self.workers.drain(..) {
            if handle.join().is_err() {
                warn!("HTTP worker panicked during shutdown");
            }
        }
    }
}

impl Drop for HttpWorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}

// Test doubles shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::rc::Rc;
use std::task::Poll;

use async_trait::async_trait;
use futures::channel::oneshot;

use crate::error::ApiError;
use crate::routes::{Navigator, Route};
use crate::services::http::{HttpResponse, Transport};
use crate::utils::ids::IdGenerator;

type Reply = Result<HttpResponse, ApiError>;

enum Scripted {
    Ready(Reply),
    Gated(oneshot::Receiver<Reply>),
}

#[derive(Clone, Debug, PartialEq)]
pub struct RecordedRequest {
    pub method: &'static str,
    pub url: String,
    pub body: Option<serde_json::Value>,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl RecordedRequest {
    /// Path part after the test base URL.
    pub fn path(&self) -> &str {
        self.url
            .find("/dev")
            .map(|i| &self.url[i + 4..])
            .unwrap_or(&self.url)
    }
}

/// Replies from a script, in order, and records everything it was sent.
#[derive(Clone, Default)]
pub struct FakeTransport {
    script: Rc<RefCell<VecDeque<Scripted>>>,
    requests: Rc<RefCell<Vec<RecordedRequest>>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, status: u16, body: &str) {
        self.script
            .borrow_mut()
            .push_back(Scripted::Ready(Ok(HttpResponse::new(status, body))));
    }

    pub fn respond_json(&self, status: u16, body: serde_json::Value) {
        self.respond(status, &body.to_string());
    }

    pub fn fail(&self, reason: &str) {
        self.script
            .borrow_mut()
            .push_back(Scripted::Ready(Err(ApiError::Network(reason.to_string()))));
    }

    /// Next request stays pending until the returned sender fires.
    pub fn respond_later(&self) -> oneshot::Sender<Reply> {
        let (tx, rx) = oneshot::channel();
        self.script.borrow_mut().push_back(Scripted::Gated(rx));
        tx
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }

    async fn reply(&self, request: RecordedRequest) -> Reply {
        self.requests.borrow_mut().push(request);
        let next = self.script.borrow_mut().pop_front();
        match next {
            Some(Scripted::Ready(reply)) => reply,
            Some(Scripted::Gated(rx)) => rx
                .await
                .unwrap_or_else(|_| Err(ApiError::Network("gate dropped".to_string()))),
            None => Err(ApiError::Network("no scripted response".to_string())),
        }
    }
}

#[async_trait(?Send)]
impl Transport for FakeTransport {
    async fn post_json(&self, url: &str, body: &serde_json::Value) -> Reply {
        self.reply(RecordedRequest {
            method: "POST",
            url: url.to_string(),
            body: Some(body.clone()),
            content_type: Some("application/json".to_string()),
            bytes: Vec::new(),
        })
        .await
    }

    async fn put_bytes(&self, url: &str, content_type: &str, bytes: &[u8]) -> Reply {
        self.reply(RecordedRequest {
            method: "PUT",
            url: url.to_string(),
            body: None,
            content_type: Some(content_type.to_string()),
            bytes: bytes.to_vec(),
        })
        .await
    }
}

/// `id-1`, `id-2`, ...
#[derive(Default)]
pub struct SequentialIds {
    next: Cell<u32>,
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.get() + 1;
        self.next.set(n);
        format!("id-{}", n)
    }
}

#[derive(Clone, Default)]
pub struct RecordingNavigator {
    visits: Rc<RefCell<Vec<(Route, bool)>>>,
}

impl RecordingNavigator {
    /// `(route, replaced)` in call order.
    pub fn visits(&self) -> Vec<(Route, bool)> {
        self.visits.borrow().clone()
    }

    pub fn last(&self) -> Option<(Route, bool)> {
        self.visits.borrow().last().cloned()
    }
}

impl Navigator for RecordingNavigator {
    fn push(&self, route: Route) {
        self.visits.borrow_mut().push((route, false));
    }

    fn replace(&self, route: Route) {
        self.visits.borrow_mut().push((route, true));
    }
}

/// Gives other joined futures one poll.
pub fn yield_now() -> impl Future<Output = ()> {
    let mut yielded = false;
    futures::future::poll_fn(move |cx| {
        if yielded {
            Poll::Ready(())
        } else {
            yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    })
}

pub const TEST_BASE_URL: &str = "https://api.test/dev";
pub const TEST_PHARMACY: &str = "PN1853278176";

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use time::{Duration, OffsetDateTime};

use crate::domain::exchange::{Exchange, TransportRequest};
use crate::domain::navigation::Navigation;
use crate::domain::ports::{Clock, Navigator, Transport};

// Shared time source for deterministic tests; clones observe the same instant.
#[derive(Clone)]
pub(crate) struct SteppingClock {
    now: Arc<Mutex<OffsetDateTime>>,
}

impl SteppingClock {
    pub(crate) fn new(start: OffsetDateTime) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub(crate) fn advance(&self, by: Duration) {
        let mut guard = self.now.lock().expect("clock mutex poisoned");
        *guard += by;
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> OffsetDateTime {
        *self.now.lock().expect("clock mutex poisoned")
    }
}

// Transport that replays queued exchanges and records every request.
// An empty queue answers with an unclassified failure.
#[derive(Default)]
pub(crate) struct ScriptedTransport {
    replies: Mutex<VecDeque<Exchange>>,
    requests: Mutex<Vec<TransportRequest>>,
}

impl ScriptedTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&self, exchange: Exchange) {
        let mut guard = self.replies.lock().expect("replies mutex poisoned");
        guard.push_back(exchange);
    }

    pub(crate) fn requests(&self) -> Vec<TransportRequest> {
        self.requests
            .lock()
            .expect("requests mutex poisoned")
            .clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn exchange(&self, request: TransportRequest) -> Exchange {
        self.requests
            .lock()
            .expect("requests mutex poisoned")
            .push(request);
        self.replies
            .lock()
            .expect("replies mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| Exchange::failed(None))
    }
}

// Navigator that only remembers where it was sent.
#[derive(Default)]
pub(crate) struct RecordingNavigator {
    navigations: Mutex<Vec<Navigation>>,
}

impl RecordingNavigator {
    pub(crate) fn recorded(&self) -> Vec<Navigation> {
        self.navigations
            .lock()
            .expect("navigations mutex poisoned")
            .clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, navigation: &Navigation) {
        self.navigations
            .lock()
            .expect("navigations mutex poisoned")
            .push(navigation.clone());
    }
}

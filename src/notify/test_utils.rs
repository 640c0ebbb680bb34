//! Shared test utilities for the `notify` module.

use std::collections::VecDeque;
use std::future::Future;
use std::io;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use anyhow::Result;

use super::{ChatClient, ChatMessage, PostedMessage};

/// Mock chat client with a pre-programmed queue of responses.
///
/// Responses are returned in FIFO order. When the queue is exhausted,
/// subsequent calls return `Err("no more mock responses")`. Every message
/// passed to [`post_message`](ChatClient::post_message) is recorded; use
/// [`sent_handle`](Self::sent_handle) to read them after the client has been
/// moved into a [`Notifier`](super::Notifier).
pub(crate) struct MockChatClient {
    responses: Mutex<VecDeque<Result<PostedMessage>>>,
    sent: Arc<Mutex<Vec<ChatMessage>>>,
}

impl MockChatClient {
    /// Creates a mock that answers with the given responses in order.
    pub(crate) fn new(responses: Vec<Result<PostedMessage>>) -> Self {
        Self {
            responses: Mutex::new(VecDeque::from(responses)),
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Returns a shared handle to the recorded messages.
    pub(crate) fn sent_handle(&self) -> Arc<Mutex<Vec<ChatMessage>>> {
        Arc::clone(&self.sent)
    }
}

impl ChatClient for MockChatClient {
    fn post_message<'a>(
        &'a self,
        message: &'a ChatMessage,
    ) -> Pin<Box<dyn Future<Output = Result<PostedMessage>> + Send + 'a>> {
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(message.clone());
        }
        let next = self
            .responses
            .lock()
            .ok()
            .and_then(|mut queue| queue.pop_front())
            .unwrap_or_else(|| Err(anyhow::anyhow!("no more mock responses")));
        Box::pin(async move { next })
    }
}

/// Log output captured by [`capture_logs`].
#[derive(Clone, Default)]
pub(crate) struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    /// Everything written so far, lossily decoded.
    pub(crate) fn contents(&self) -> String {
        self.0
            .lock()
            .map(|buf| String::from_utf8_lossy(&buf).into_owned())
            .unwrap_or_default()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, bytes: &[u8]) -> io::Result<usize> {
        if let Ok(mut buf) = self.0.lock() {
            buf.extend_from_slice(bytes);
        }
        Ok(bytes.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Routes this thread's `tracing` events into a buffer until the guard drops.
pub(crate) fn capture_logs() -> (tracing::subscriber::DefaultGuard, CapturedLogs) {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .without_time()
        .finish();
    (tracing::subscriber::set_default(subscriber), logs)
}

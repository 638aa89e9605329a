//! Shared test doubles: an in-memory transport that records every call
//! and can be told to fail specific operations.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::config::RenderConfig;
use crate::policy::SendFileMode;
use crate::transport::{ChatHandle, MessageHandle, Transport, TransportError};

#[derive(Default)]
pub(crate) struct MockTransport {
    state: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    messages: HashMap<i64, String>,
    next_id: i64,
    calls: Vec<String>,
    fail_edit_of: Option<i64>,
    fail_reply: bool,
    fail_delete: bool,
    yield_in_delete: bool,
}

impl MockTransport {
    pub fn new() -> Self {
        let mock = Self::default();
        mock.state.lock().unwrap().next_id = 100;
        mock
    }

    /// Pre-seed a message, e.g. the anchor the caller created.
    pub fn seed(&self, handle: MessageHandle, text: &str) {
        self.state
            .lock()
            .unwrap()
            .messages
            .insert(handle.0, text.to_string());
    }

    pub fn text_of(&self, handle: MessageHandle) -> Option<String> {
        self.state.lock().unwrap().messages.get(&handle.0).cloned()
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn message_count(&self) -> usize {
        self.state.lock().unwrap().messages.len()
    }

    pub fn fail_edit_of(&self, handle: MessageHandle) {
        self.state.lock().unwrap().fail_edit_of = Some(handle.0);
    }

    pub fn fail_replies(&self, fail: bool) {
        self.state.lock().unwrap().fail_reply = fail;
    }

    pub fn fail_deletes(&self, fail: bool) {
        self.state.lock().unwrap().fail_delete = fail;
    }

    /// Make `delete` suspend mid-call, so other tasks can queue up on the
    /// same chain while the deleting render still holds its lock.
    pub fn yield_in_delete(&self, pause: bool) {
        self.state.lock().unwrap().yield_in_delete = pause;
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn edit(&self, handle: MessageHandle, text: &str) -> Result<(), TransportError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("edit {}", handle.0));
        if state.fail_edit_of == Some(handle.0) {
            return Err(TransportError::Network("edit refused".into()));
        }
        match state.messages.get(&handle.0) {
            Some(current) if current == text => Err(TransportError::NotModified),
            Some(_) => {
                state.messages.insert(handle.0, text.to_string());
                Ok(())
            }
            None => Err(TransportError::Api("no such message".into())),
        }
    }

    async fn reply(
        &self,
        parent: MessageHandle,
        text: &str,
    ) -> Result<MessageHandle, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("reply {}", parent.0));
        if state.fail_reply {
            return Err(TransportError::RateLimited);
        }
        state.next_id += 1;
        let id = state.next_id;
        state.messages.insert(id, text.to_string());
        Ok(MessageHandle(id))
    }

    async fn delete(&self, handle: MessageHandle) -> Result<(), TransportError> {
        let pause = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(format!("delete {}", handle.0));
            if state.fail_delete {
                return Err(TransportError::Network("delete refused".into()));
            }
            state.yield_in_delete
        };
        if pause {
            // Twice, so a task spawned after the first wakeup still gets
            // to run before the delete completes.
            tokio::task::yield_now().await;
            tokio::task::yield_now().await;
        }
        self.state.lock().unwrap().messages.remove(&handle.0);
        Ok(())
    }

    async fn send_file(
        &self,
        chat: ChatHandle,
        _bytes: &[u8],
        filename: &str,
        _caption: &str,
    ) -> Result<MessageHandle, TransportError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(format!("send_file {} {}", chat.0, filename));
        state.next_id += 1;
        let id = state.next_id;
        state.messages.insert(id, format!("<file {}>", filename));
        Ok(MessageHandle(id))
    }
}

pub(crate) fn test_config(max_chunk_len: usize, look_back: usize) -> RenderConfig {
    RenderConfig {
        max_chunk_len,
        look_back_window: look_back,
        file_length_threshold: 1000,
        file_only_threshold: 10_000,
        send_file_mode: SendFileMode::Never,
        append_separator: "\n\n".to_string(),
        cleared_placeholder: "\u{2026}".to_string(),
    }
}

//! Recording notifier for unit tests.

use std::sync::Mutex;

use async_trait::async_trait;
use celebrations_core::error::{CelebrationsError, Result};
use celebrations_core::traits::Notifier;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Channel { channel: String, text: String },
    Direct { member_id: String, text: String },
    Reminder { member_id: String, time: String, text: String },
}

impl Call {
    pub fn channel(channel: &str, text: &str) -> Self {
        Call::Channel { channel: channel.into(), text: text.into() }
    }

    pub fn direct(member_id: &str, text: &str) -> Self {
        Call::Direct { member_id: member_id.into(), text: text.into() }
    }

    pub fn reminder(member_id: &str, time: &str, text: &str) -> Self {
        Call::Reminder { member_id: member_id.into(), time: time.into(), text: text.into() }
    }
}

/// Records every call. Calls whose sequence number is listed in `failing`
/// are recorded and then fail.
#[derive(Default)]
pub struct RecordingNotifier {
    calls: Mutex<Vec<Call>>,
    failing: Vec<usize>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(failing: &[usize]) -> Self {
        Self { calls: Mutex::new(Vec::new()), failing: failing.to_vec() }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn push(&self, call: Call) -> Result<()> {
        let mut calls = self.calls.lock().unwrap();
        let seq = calls.len();
        calls.push(call);
        if self.failing.contains(&seq) {
            return Err(CelebrationsError::channel(format!("call {seq} failed")));
        }
        Ok(())
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    fn name(&self) -> &str { "recording" }

    async fn send_channel_message(&self, channel: &str, text: &str) -> Result<()> {
        self.push(Call::channel(channel, text))
    }

    async fn send_direct_message(&self, member_id: &str, text: &str) -> Result<()> {
        self.push(Call::direct(member_id, text))
    }

    async fn set_personal_reminder(&self, member_id: &str, time: &str, text: &str) -> Result<()> {
        self.push(Call::reminder(member_id, time, text))
    }
}

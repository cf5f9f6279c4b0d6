// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Recording Command Sink
//!
//! In-memory [`CommandSink`] that logs and keeps every command instead of
//! sending it. Backs the CLI `--dry-run` mode and the controller tests.

use crate::domain::command::{CommandError, CommandSink, MotionCommand};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashSet;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCommand {
    pub address: String,
    pub command: MotionCommand,
}

#[derive(Default)]
pub struct RecordingCommandSink {
    sent: Mutex<Vec<RecordedCommand>>,
    unreachable: Mutex<HashSet<String>>,
}

impl RecordingCommandSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every later send to `address` fails with a transport error and is not recorded
    pub fn mark_unreachable(&self, address: impl Into<String>) {
        self.unreachable.lock().insert(address.into());
    }

    pub fn mark_reachable(&self, address: &str) {
        self.unreachable.lock().remove(address);
    }

    /// Snapshot of all delivered commands, in send order
    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.sent.lock().clone()
    }

    /// Delivered commands addressed to `address`
    pub fn commands_for(&self, address: &str) -> Vec<MotionCommand> {
        self.sent
            .lock()
            .iter()
            .filter(|r| r.address == address)
            .map(|r| r.command)
            .collect()
    }

    pub fn clear(&self) {
        self.sent.lock().clear();
    }
}

#[async_trait]
impl CommandSink for RecordingCommandSink {
    async fn send(&self, address: &str, command: MotionCommand) -> Result<(), CommandError> {
        if self.unreachable.lock().contains(address) {
            return Err(CommandError::Transport {
                address: address.to_string(),
                message: "address marked unreachable".to_string(),
            });
        }

        info!("[dry-run] {} -> {}", command, address);
        self.sent.lock().push(RecordedCommand {
            address: address.to_string(),
            command,
        });
        Ok(())
    }
}

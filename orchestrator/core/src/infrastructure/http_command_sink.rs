// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// HTTP Command Sink Adapter
//
// Anti-Corruption Layer for the robots' on-board web server.
// Each command is one GET request to the robot's root path carrying a single
// query pair; the response body and status are not interpreted.

use crate::domain::command::{CommandError, CommandSink, MotionCommand};
use crate::domain::swarm_config::CommandConfig;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

pub struct HttpCommandSink {
    client: reqwest::Client,
    user_agent: String,
}

impl HttpCommandSink {
    pub fn new(user_agent: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            user_agent: user_agent.into(),
        }
    }

    pub fn from_config(config: &CommandConfig) -> Result<Self, CommandError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout_ms) = config.request_timeout_ms {
            builder = builder.timeout(Duration::from_millis(timeout_ms));
        }

        let client = builder.build().map_err(|e| CommandError::Transport {
            address: "<client>".to_string(),
            message: e.to_string(),
        })?;

        Ok(Self {
            client,
            user_agent: config.user_agent.clone(),
        })
    }

    /// `host[:port]` becomes `http://host[:port]/`; explicit schemes are kept
    fn endpoint(address: &str) -> Result<String, CommandError> {
        let address = address.trim();
        if address.is_empty() || address.chars().any(char::is_whitespace) {
            return Err(CommandError::InvalidAddress(address.to_string()));
        }

        let url = if address.starts_with("http://") || address.starts_with("https://") {
            address.to_string()
        } else {
            format!("http://{}", address)
        };

        if url.ends_with('/') {
            Ok(url)
        } else {
            Ok(format!("{}/", url))
        }
    }
}

#[async_trait]
impl CommandSink for HttpCommandSink {
    async fn send(&self, address: &str, command: MotionCommand) -> Result<(), CommandError> {
        let url = Self::endpoint(address)?;
        let (key, value) = command.query_pair();

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::USER_AGENT, &self.user_agent)
            .query(&[(key, value.as_str())])
            .send()
            .await
            .map_err(|e| CommandError::Transport {
                address: address.to_string(),
                message: e.to_string(),
            })?;

        debug!("{} -> {} answered HTTP {}", command, address, response.status());
        Ok(())
    }
}

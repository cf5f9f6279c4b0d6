// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

pub mod roster_parser;
pub mod http_command_sink;
pub mod recording_command_sink;
pub mod positioning;

pub use http_command_sink::HttpCommandSink;
pub use recording_command_sink::{RecordedCommand, RecordingCommandSink};
pub use roster_parser::RosterParser;

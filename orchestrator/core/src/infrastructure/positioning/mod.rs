// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

// Positioning Infrastructure - PositionSource adapters
//
// hedge:  live beacon network over a serial byte stream
// replay: recorded fix sequences for bench runs and tests

pub mod hedge;
pub mod replay;

pub use hedge::{crc16_modbus, HedgeDecoder, HedgePositionSource};
pub use replay::ReplayPositionSource;

use crate::domain::position::PositionSource;
use crate::domain::swarm_config::{PositioningConfig, PositioningSourceKind};
use std::sync::Arc;

/// Build the position source selected by configuration
pub fn from_config(config: &PositioningConfig) -> anyhow::Result<Arc<dyn PositionSource>> {
    match config.source {
        PositioningSourceKind::Hedge => Ok(Arc::new(
            HedgePositionSource::new(config.device.clone()).with_baud_rate(config.baud_rate),
        )),
        PositioningSourceKind::Replay => {
            let path = config
                .replay_file
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("positioning.replay_file is required for the replay source"))?;
            Ok(Arc::new(ReplayPositionSource::from_file(path)?))
        }
    }
}

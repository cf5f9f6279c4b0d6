// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! Beacon Hedge Position Source
//!
//! Reads the binary stream emitted by the mobile beacon ("hedge") modem of an
//! ultrasonic indoor positioning system and keeps the latest fix per beacon
//! address. Robots carry a beacon whose address equals their roster id.
//!
//! # Architecture
//!
//! - **Layer:** Infrastructure
//! - **Purpose:** Serial byte stream → `PositionFix` table
//! - **Concurrency:** one reader thread is the only writer of the table
//!
//! # Frame Layout
//!
//! ```text
//! 0xFF 0x47 | code: u16 LE | len: u8 | payload[len] | crc16: u16 LE
//! ```
//!
//! The CRC is CRC-16/MODBUS over everything before it. Position payloads:
//!
//! | Code | Len | Layout | Units |
//! |------|-----|--------|-------|
//! | `0x0001` | 16 | `u32 ts, i16 x, i16 y, i16 z, u8 flags, u8 addr, u16 orient, u16 dt` | cm |
//! | `0x0011` | 22 | `u32 ts, i32 x, i32 y, i32 z, u8 flags, u8 addr, u16 orient, u16 dt` | mm |
//!
//! Fixes are stored in metres. Any other code is skipped.

use crate::domain::position::{PositionError, PositionFix, PositionSource};
use crate::domain::robot::RobotId;
use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use serialport::{DataBits, FlowControl, Parity, StopBits};
use std::collections::HashMap;
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const HEADER: [u8; 2] = [0xFF, 0x47];
const PREAMBLE_LEN: usize = 5;
const CRC_LEN: usize = 2;

pub const CODE_POSITION_CM: u16 = 0x0001;
pub const CODE_POSITION_MM: u16 = 0x0011;

/// CRC-16/MODBUS (poly 0xA001 reflected, init 0xFFFF)
pub fn crc16_modbus(data: &[u8]) -> u16 {
    let mut crc: u16 = 0xFFFF;
    for &byte in data {
        crc ^= u16::from(byte);
        for _ in 0..8 {
            crc = if crc & 1 != 0 { (crc >> 1) ^ 0xA001 } else { crc >> 1 };
        }
    }
    crc
}

// ============================================================================
// Stream Decoder
// ============================================================================

/// Incremental frame decoder; bytes may arrive in arbitrary chunks.
#[derive(Debug, Default)]
pub struct HedgeDecoder {
    buffer: Vec<u8>,
    rejected_frames: u64,
}

impl HedgeDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Frames dropped for a bad checksum so far
    pub fn rejected_frames(&self) -> u64 {
        self.rejected_frames
    }

    /// Feed raw bytes, returning every position fix completed by them
    pub fn push(&mut self, bytes: &[u8]) -> Vec<PositionFix> {
        self.buffer.extend_from_slice(bytes);
        let mut fixes = Vec::new();

        loop {
            let Some(start) = self.buffer.windows(2).position(|w| w == HEADER) else {
                // a trailing 0xFF may be the first half of the next header
                let keep_tail = self.buffer.last() == Some(&HEADER[0]);
                self.buffer.clear();
                if keep_tail {
                    self.buffer.push(HEADER[0]);
                }
                break;
            };
            self.buffer.drain(..start);

            if self.buffer.len() < PREAMBLE_LEN {
                break;
            }

            let code = u16::from_le_bytes([self.buffer[2], self.buffer[3]]);
            let payload_len = self.buffer[4] as usize;
            let frame_len = PREAMBLE_LEN + payload_len + CRC_LEN;
            if self.buffer.len() < frame_len {
                break;
            }

            if crc16_modbus(&self.buffer[..frame_len]) != 0 {
                self.rejected_frames += 1;
                warn!("Dropping hedge frame 0x{:04x} with bad CRC", code);
                // resync on the next header candidate
                self.buffer.drain(..1);
                continue;
            }

            let payload = &self.buffer[PREAMBLE_LEN..PREAMBLE_LEN + payload_len];
            match decode_position(code, payload) {
                Some(fix) => fixes.push(fix),
                None => debug!("Skipping hedge frame 0x{:04x} ({} bytes)", code, payload_len),
            }
            self.buffer.drain(..frame_len);
        }

        fixes
    }
}

fn decode_position(code: u16, payload: &[u8]) -> Option<PositionFix> {
    let u32_at = |i: usize| u32::from_le_bytes([payload[i], payload[i + 1], payload[i + 2], payload[i + 3]]);

    match code {
        CODE_POSITION_CM if payload.len() >= 16 => {
            let i16_at = |i: usize| f64::from(i16::from_le_bytes([payload[i], payload[i + 1]]));
            Some(PositionFix {
                robot: RobotId(u32::from(payload[11])),
                x: i16_at(4) / 100.0,
                y: i16_at(6) / 100.0,
                z: i16_at(8) / 100.0,
                timestamp: u64::from(u32_at(0)),
            })
        }
        CODE_POSITION_MM if payload.len() >= 22 => {
            let i32_at = |i: usize| f64::from(u32_at(i) as i32);
            Some(PositionFix {
                robot: RobotId(u32::from(payload[17])),
                x: i32_at(4) / 1000.0,
                y: i32_at(8) / 1000.0,
                z: i32_at(12) / 1000.0,
                timestamp: u64::from(u32_at(0)),
            })
        }
        _ => None,
    }
}

// ============================================================================
// Position Source
// ============================================================================

pub const DEFAULT_BAUD_RATE: u32 = 9600;

/// Upper bound on how long the reader blocks before rechecking for shutdown
const READ_TIMEOUT: Duration = Duration::from_millis(100);

pub struct HedgePositionSource {
    device: PathBuf,
    baud_rate: u32,
    latest: Arc<RwLock<HashMap<RobotId, PositionFix>>>,
    /// Set by the reader thread when the stream ends or fails
    closed: Arc<AtomicBool>,
    shutdown: Arc<AtomicBool>,
    reader: Mutex<Option<JoinHandle<()>>>,
}

impl HedgePositionSource {
    pub fn new(device: impl Into<PathBuf>) -> Self {
        Self {
            device: device.into(),
            baud_rate: DEFAULT_BAUD_RATE,
            latest: Arc::new(RwLock::new(HashMap::new())),
            closed: Arc::new(AtomicBool::new(false)),
            shutdown: Arc::new(AtomicBool::new(false)),
            reader: Mutex::new(None),
        }
    }

    pub fn with_baud_rate(mut self, baud_rate: u32) -> Self {
        self.baud_rate = baud_rate;
        self
    }

    pub fn device(&self) -> &Path {
        &self.device
    }

    pub fn baud_rate(&self) -> u32 {
        self.baud_rate
    }

    /// Start decoding `stream` on a dedicated reader thread.
    ///
    /// `start` calls this with the opened serial port; tests feed in-memory
    /// readers. Read timeouts are treated as an idle line.
    pub fn spawn_reader<R>(&self, mut stream: R) -> std::io::Result<()>
    where
        R: Read + Send + 'static,
    {
        let latest = Arc::clone(&self.latest);
        let closed = Arc::clone(&self.closed);
        let shutdown = Arc::clone(&self.shutdown);
        let device = self.device.clone();

        let handle = std::thread::Builder::new()
            .name("hedge-reader".to_string())
            .spawn(move || {
                let mut decoder = HedgeDecoder::new();
                let mut buf = [0u8; 256];

                while !shutdown.load(Ordering::Acquire) {
                    match stream.read(&mut buf) {
                        Ok(0) => {
                            warn!("Hedge stream {:?} closed", device);
                            break;
                        }
                        Ok(n) => {
                            let fixes = decoder.push(&buf[..n]);
                            if !fixes.is_empty() {
                                let mut table = latest.write();
                                for fix in fixes {
                                    table.insert(fix.robot, fix);
                                }
                            }
                        }
                        Err(e)
                            if matches!(
                                e.kind(),
                                ErrorKind::TimedOut | ErrorKind::WouldBlock | ErrorKind::Interrupted
                            ) => {}
                        Err(e) => {
                            error!("Hedge stream {:?} read failed: {}", device, e);
                            break;
                        }
                    }
                }

                closed.store(true, Ordering::Release);
            })?;

        *self.reader.lock() = Some(handle);
        Ok(())
    }

    /// True once a reader runs and its stream has not ended
    pub fn is_streaming(&self) -> bool {
        self.reader.lock().is_some() && !self.closed.load(Ordering::Acquire)
    }

    /// Number of beacon addresses seen so far
    pub fn known_robots(&self) -> usize {
        self.latest.read().len()
    }
}

#[async_trait]
impl PositionSource for HedgePositionSource {
    /// Opens the device as a raw 8N1 serial line.
    async fn start(&self) -> Result<(), PositionError> {
        if self.reader.lock().is_some() {
            return Ok(());
        }

        let port = serialport::new(self.device.to_string_lossy(), self.baud_rate)
            .data_bits(DataBits::Eight)
            .parity(Parity::None)
            .stop_bits(StopBits::One)
            .flow_control(FlowControl::None)
            .timeout(READ_TIMEOUT)
            .open()
            .map_err(|e| PositionError::Io(std::io::Error::from(e)))?;

        info!(
            "Reading beacon fixes from {:?} at {} baud",
            self.device, self.baud_rate
        );
        self.spawn_reader(port)?;
        Ok(())
    }

    async fn fix(&self, robot: RobotId) -> Result<PositionFix, PositionError> {
        if self.closed.load(Ordering::Acquire) {
            return Err(PositionError::Unavailable(format!(
                "hedge stream {:?} has ended",
                self.device
            )));
        }

        self.latest
            .read()
            .get(&robot)
            .copied()
            .ok_or(PositionError::NoFix(robot))
    }
}

impl Drop for HedgePositionSource {
    fn drop(&mut self) {
        // the reader notices within one read timeout
        self.shutdown.store(true, Ordering::Release);
    }
}

// ============================================================================
// Tests
// ============================================================================

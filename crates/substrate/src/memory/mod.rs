//! In-memory substrates
//!
//! [`MemoryLog`] and [`MemoryKv`] implement the substrate contracts inside
//! the process. They report failures with the same API codes a broker
//! would, enforce a maximum payload, and can be switched offline to
//! exercise connection failures.

mod kv;
mod log;

pub use kv::{MemoryBucket, MemoryKv};
pub use log::MemoryLog;

use crate::error::{Result, SubstrateError};
use std::sync::atomic::{AtomicBool, Ordering};

/// Default maximum payload: 1 MiB
pub const DEFAULT_MAX_PAYLOAD: usize = 1024 * 1024;

/// Connection state shared by a substrate and its handles
#[derive(Debug)]
pub(crate) struct Link {
    online: AtomicBool,
    max_payload: usize,
}

impl Link {
    pub(crate) fn new(max_payload: usize) -> Self {
        Link {
            online: AtomicBool::new(true),
            max_payload,
        }
    }

    pub(crate) fn set_online(&self, online: bool) {
        self.online.store(online, Ordering::SeqCst);
    }

    pub(crate) fn max_payload(&self) -> usize {
        self.max_payload
    }

    pub(crate) fn check(&self) -> Result<()> {
        if self.online.load(Ordering::SeqCst) {
            Ok(())
        } else {
            Err(SubstrateError::ConnectionRefused(
                "in-memory substrate is offline".to_string(),
            ))
        }
    }

    pub(crate) fn check_payload(&self, size: usize) -> Result<()> {
        if size > self.max_payload {
            return Err(SubstrateError::MaxPayload {
                size,
                max: self.max_payload,
            });
        }
        Ok(())
    }
}

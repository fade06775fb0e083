//! Device I/O channel.
//!
//! Capture and input are blocking and serialized: every method takes
//! `&mut self`, so a second command cannot be issued before the first
//! returns.

pub mod adb;

pub use adb::AdbDevice;

use crate::error::Result;
use crate::geometry::Point;
use image::GrayImage;
use std::sync::Arc;

/// A captured screen. `seq` increases by one per capture.
#[derive(Debug, Clone)]
pub struct Frame {
    pub seq: u64,
    pub image: Arc<GrayImage>,
}

pub trait Device: Send {
    fn capture_frame(&mut self) -> Result<GrayImage>;
    fn tap(&mut self, at: Point, hold_ms: u32) -> Result<()>;
    fn swipe(&mut self, from: Point, to: Point, duration_ms: u32) -> Result<()>;
}

//! Session context passed to every component: device channel, vision bound
//! to the latest frame, pacing, configuration and counters.

use crate::config::Config;
use crate::device::{Device, Frame};
use crate::error::Result;
use crate::geometry::{Point, Region};
use crate::pacing::Pacer;
use crate::stats::Stats;
use crate::vision::{Recognizer, Vision};
use std::sync::Arc;

pub struct Session {
    pub config: Arc<Config>,
    pub vision: Vision,
    pub pacer: Pacer,
    pub stats: Stats,
    device: Box<dyn Device>,
    captures: u64,
}

impl Session {
    pub fn new(config: Arc<Config>, device: Box<dyn Device>, recognizer: Arc<dyn Recognizer>) -> Self {
        let pacer = Pacer::new(&config.pacing);
        Self {
            config,
            vision: Vision::new(recognizer),
            pacer,
            stats: Stats::new(),
            device,
            captures: 0,
        }
    }

    /// Capture a fresh frame and make it the target of every predicate.
    pub fn refresh(&mut self) -> Result<()> {
        let image = self.device.capture_frame()?;
        self.captures += 1;
        self.vision.set_frame(Frame {
            seq: self.captures,
            image: Arc::new(image),
        });
        Ok(())
    }

    /// Pause for the default short band, then capture.
    pub fn wait_refresh(&mut self) -> Result<()> {
        self.pacer.tick();
        self.refresh()
    }

    /// Touch an exact coordinate.
    pub fn touch(&mut self, at: Point) -> Result<()> {
        let hold = self.pacer.touch_hold_ms();
        self.device.tap(at, hold)?;
        self.pacer.tick();
        Ok(())
    }

    /// Touch a random point inside a UI region.
    pub fn touch_region(&mut self, region: Region) -> Result<()> {
        let at = self.pacer.jitter(&region);
        self.touch(at)
    }

    /// Touch the asset if it is visible on the current frame.
    pub fn find_and_touch(&mut self, asset: &str, similarity: f32) -> Result<bool> {
        match self.vision.find(asset, similarity) {
            Some(region) => {
                self.touch_region(region)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Swipe and capture the resulting view.
    pub fn swipe(&mut self, from: Point, to: Point, duration_ms: u32) -> Result<()> {
        self.device.swipe(from, to, duration_ms)?;
        self.pacer.tick();
        self.refresh()
    }

    pub fn captures(&self) -> u64 {
        self.captures
    }
}

//! # Visual Predicate Evaluator
//!
//! [`Recognizer`] is the capability seam over the image-recognition
//! service; [`Vision`] binds it to the most recently captured frame and
//! exposes named predicates with a similarity threshold per call.
//!
//! A negative result is a valid answer, never an error. Callers request a
//! fresh capture (see [`crate::session::Session::refresh`]) between
//! semantically distinct checks.

pub mod assets;
pub mod image_matching;

pub use image_matching::TemplateRecognizer;

use crate::device::Frame;
use crate::geometry::{Point, Region};
use rayon::prelude::*;
use std::sync::Arc;

/// Default similarity for single-asset checks.
pub const DEFAULT_SIMILARITY: f32 = 0.95;

pub trait Recognizer: Send + Sync {
    /// Best match above `similarity`, if any.
    fn detect(&self, frame: &Frame, asset: &str, similarity: f32) -> Option<Region>;

    /// Top-left corners of every match above `similarity`. `use_mask`
    /// switches to the silhouette-exact comparison with the asset's mask.
    fn detect_all(&self, frame: &Frame, asset: &str, similarity: f32, use_mask: bool) -> Vec<Point>;

    /// Like [`Recognizer::detect`], retried across template scales in
    /// `[scale_low, scale_high]` when the default scale misses.
    fn detect_scaled(
        &self,
        frame: &Frame,
        asset: &str,
        similarity: f32,
        scale_low: f32,
        scale_high: f32,
    ) -> Option<Region>;
}

pub struct Vision {
    recognizer: Arc<dyn Recognizer>,
    frame: Option<Frame>,
}

impl Vision {
    pub fn new(recognizer: Arc<dyn Recognizer>) -> Self {
        Self {
            recognizer,
            frame: None,
        }
    }

    pub fn set_frame(&mut self, frame: Frame) {
        log::trace!("Frame {} ({}x{})", frame.seq, frame.image.width(), frame.image.height());
        self.frame = Some(frame);
    }

    pub fn find(&self, asset: &str, similarity: f32) -> Option<Region> {
        let frame = self.current()?;
        self.recognizer.detect(frame, asset, similarity)
    }

    pub fn visible(&self, asset: &str) -> bool {
        self.find(asset, DEFAULT_SIMILARITY).is_some()
    }

    pub fn visible_at(&self, asset: &str, similarity: f32) -> bool {
        self.find(asset, similarity).is_some()
    }

    pub fn find_all(&self, asset: &str, similarity: f32, use_mask: bool) -> Vec<Point> {
        match self.current() {
            Some(frame) => self.recognizer.detect_all(frame, asset, similarity, use_mask),
            None => Vec::new(),
        }
    }

    pub fn find_scaled(&self, asset: &str, similarity: f32, low: f32, high: f32) -> Option<Region> {
        let frame = self.current()?;
        self.recognizer.detect_scaled(frame, asset, similarity, low, high)
    }

    /// Evaluate independent predicates against the current frame in
    /// parallel and join before returning. Output order matches `checks`.
    pub fn evaluate_all(&self, checks: &[(&str, f32)]) -> Vec<bool> {
        let Some(frame) = self.current() else {
            return vec![false; checks.len()];
        };
        let recognizer = &self.recognizer;
        checks
            .par_iter()
            .map(|(asset, similarity)| recognizer.detect(frame, asset, *similarity).is_some())
            .collect()
    }

    fn current(&self) -> Option<&Frame> {
        if self.frame.is_none() {
            log::debug!("Predicate evaluated before the first capture");
        }
        self.frame.as_ref()
    }
}

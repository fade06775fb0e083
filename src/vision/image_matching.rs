//! # Template Matching
//!
//! [`TemplateRecognizer`] implements [`Recognizer`] with normalized
//! cross-correlation over grayscale captures.
//!
//! ## Asset layout
//! - Template: `<root>/<pack>/<category>/<name>.png`
//! - Optional mask for silhouette-exact matching: `<name>_mask.png`
//!
//! ## Scale tolerance
//! When the default scale misses, the template is resized across the
//! requested range, stepping 0.02 inward from both ends, and every scale is
//! matched in parallel. The first hit in scan order wins.

use super::Recognizer;
use crate::config::AssetConfig;
use crate::device::Frame;
use crate::error::{EngineError, Result};
use crate::geometry::{Point, Region, dedup_points};
use image::imageops::FilterType;
use image::{GrayImage, ImageBuffer, Luma};
use imageproc::template_matching::{
    MatchTemplateMethod, find_extremes, match_template, match_template_parallel,
    match_template_with_mask,
};
use rayon::prelude::*;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

const SCALE_STEP: f32 = 0.02;

/// Scale band retried by `detect_all` when nothing matches at 1.0.
const FIND_ALL_SCALES: (f32, f32) = (0.80, 1.20);

struct Template {
    image: GrayImage,
    mask: Option<GrayImage>,
}

pub struct TemplateRecognizer {
    dir: PathBuf,
    cache: RwLock<HashMap<String, Arc<Template>>>,
}

impl TemplateRecognizer {
    pub fn open(config: &AssetConfig) -> Result<Self> {
        let dir = config.root.join(&config.pack);
        if !dir.is_dir() {
            return Err(EngineError::Asset {
                asset: config.pack.clone(),
                message: format!("asset pack directory {} not found", dir.display()),
            });
        }
        Ok(Self {
            dir,
            cache: RwLock::new(HashMap::new()),
        })
    }

    /// Load every listed asset up front so a broken pack fails at startup.
    pub fn verify(&self, assets: &[&str]) -> Result<()> {
        for asset in assets {
            self.template(asset)?;
        }
        Ok(())
    }

    fn template(&self, asset: &str) -> Result<Arc<Template>> {
        if let Ok(cache) = self.cache.read() {
            if let Some(t) = cache.get(asset) {
                return Ok(t.clone());
            }
        }

        let path = self.dir.join(format!("{}.png", asset));
        let image = image::open(&path)
            .map_err(|e| EngineError::Asset {
                asset: asset.to_string(),
                message: e.to_string(),
            })?
            .to_luma8();
        let mask_path = self.dir.join(format!("{}_mask.png", asset));
        let mask = image::open(&mask_path).ok().map(|m| m.to_luma8());

        let template = Arc::new(Template { image, mask });
        if let Ok(mut cache) = self.cache.write() {
            cache.insert(asset.to_string(), template.clone());
        }
        Ok(template)
    }

    fn load_or_log(&self, asset: &str) -> Option<Arc<Template>> {
        match self.template(asset) {
            Ok(t) => Some(t),
            Err(e) => {
                log::warn!("{}", e);
                None
            }
        }
    }
}

impl Recognizer for TemplateRecognizer {
    fn detect(&self, frame: &Frame, asset: &str, similarity: f32) -> Option<Region> {
        let template = self.load_or_log(asset)?;
        best_match(&frame.image, &template.image, similarity, true)
    }

    fn detect_all(&self, frame: &Frame, asset: &str, similarity: f32, use_mask: bool) -> Vec<Point> {
        let Some(template) = self.load_or_log(asset) else {
            return Vec::new();
        };
        let mask = if use_mask { template.mask.as_ref() } else { None };
        if use_mask && mask.is_none() {
            log::debug!("No mask for {}, matching without one", asset);
        }

        let radius = (template.image.width().min(template.image.height()) / 2).max(1) as f64;
        let hits = all_matches(&frame.image, &template.image, mask, similarity);
        if !hits.is_empty() {
            return dedup_points(&hits, radius);
        }

        let hits: Vec<Point> = scale_steps(FIND_ALL_SCALES.0, FIND_ALL_SCALES.1)
            .par_iter()
            .flat_map_iter(|&scale| {
                let tpl = resize(&template.image, scale);
                let msk = mask.map(|m| resize(m, scale));
                all_matches(&frame.image, &tpl, msk.as_ref(), similarity)
            })
            .collect();
        dedup_points(&hits, radius)
    }

    fn detect_scaled(
        &self,
        frame: &Frame,
        asset: &str,
        similarity: f32,
        scale_low: f32,
        scale_high: f32,
    ) -> Option<Region> {
        let template = self.load_or_log(asset)?;
        if let Some(found) = best_match(&frame.image, &template.image, similarity, true) {
            return Some(found);
        }

        let results: Vec<Option<Region>> = scale_steps(scale_low, scale_high)
            .par_iter()
            .map(|&scale| {
                let tpl = resize(&template.image, scale);
                best_match(&frame.image, &tpl, similarity, false)
            })
            .collect();
        results.into_iter().flatten().next()
    }
}

/// Scales alternating from both ends of the range toward its middle.
fn scale_steps(low: f32, high: f32) -> Vec<f32> {
    let mut steps = Vec::new();
    let (mut lo, mut hi) = (low, high);
    let limit = (((high - low) / 2.0) / SCALE_STEP).ceil() as u32 + 1;
    let mut count = 0;
    while hi > lo && count < limit {
        steps.push(lo);
        steps.push(hi);
        lo += SCALE_STEP;
        hi -= SCALE_STEP;
        count += 1;
    }
    steps
}

fn resize(image: &GrayImage, scale: f32) -> GrayImage {
    let w = ((image.width() as f32 * scale).round() as u32).max(1);
    let h = ((image.height() as f32 * scale).round() as u32).max(1);
    image::imageops::resize(image, w, h, FilterType::Triangle)
}

fn correlate(screen: &GrayImage, template: &GrayImage, parallel: bool) -> ImageBuffer<Luma<f32>, Vec<f32>> {
    let method = MatchTemplateMethod::CrossCorrelationNormalized;
    if parallel {
        match_template_parallel(screen, template, method)
    } else {
        match_template(screen, template, method)
    }
}

fn fits(screen: &GrayImage, template: &GrayImage) -> bool {
    template.width() > 0
        && template.height() > 0
        && template.width() <= screen.width()
        && template.height() <= screen.height()
}

fn best_match(screen: &GrayImage, template: &GrayImage, similarity: f32, parallel: bool) -> Option<Region> {
    if !fits(screen, template) {
        return None;
    }
    let result = correlate(screen, template, parallel);
    let extremes = find_extremes(&result);
    if extremes.max_value >= similarity {
        let (x, y) = extremes.max_value_location;
        Some(Region::new(
            x as i32,
            y as i32,
            template.width() as i32,
            template.height() as i32,
        ))
    } else {
        None
    }
}

fn all_matches(
    screen: &GrayImage,
    template: &GrayImage,
    mask: Option<&GrayImage>,
    similarity: f32,
) -> Vec<Point> {
    if !fits(screen, template) {
        return Vec::new();
    }
    let result = match mask {
        Some(mask) if mask.dimensions() == template.dimensions() => match_template_with_mask(
            screen,
            template,
            MatchTemplateMethod::CrossCorrelationNormalized,
            mask,
        ),
        _ => correlate(screen, template, true),
    };
    result
        .enumerate_pixels()
        .filter(|(_, _, v)| v.0[0] >= similarity)
        .map(|(x, y, _)| Point::new(x as i32, y as i32))
        .collect()
}

//! Fleet Locator.

use crate::config::SearchConfig;
use crate::error::{EngineError, Result};
use crate::geometry::Point;
use crate::session::Session;
use crate::vision::Vision;
use crate::vision::assets::{self, CHAPTER_ICON, CHAPTER_ICON_TOLERANCE, SCREEN_CENTER};

/// Marker-to-flagship offsets: the markers float above the ship, the
/// returned location sits at the flagship's base.
const AMMO_TO_FLAGSHIP: (i32, i32) = (140, 225);
const ARROW_TO_FLAGSHIP: (i32, i32) = (25, 320);

pub struct FleetLocator {
    attempts: u32,
    pan_after: u32,
}

impl FleetLocator {
    pub fn new(search: &SearchConfig) -> Self {
        Self {
            attempts: search.fleet_locate_attempts,
            pan_after: search.fleet_pan_after,
        }
    }

    /// Flagship base in current screen coordinates. After `pan_after` misses
    /// the camera is dragged down a growing distance, searched, and dragged
    /// back so the caller's view is unchanged.
    pub fn locate(&self, session: &mut Session) -> Result<Point> {
        for attempt in 1..=self.attempts {
            session.refresh()?;

            let pan = if attempt > self.pan_after {
                150 + attempt as i32 * 20
            } else {
                0
            };
            if pan > 0 {
                session.swipe(SCREEN_CENTER, SCREEN_CENTER.offset(0, pan), 100)?;
            }
            let found = detect_marker(&session.vision);
            if pan > 0 {
                session.swipe(SCREEN_CENTER.offset(0, pan), SCREEN_CENTER, 100)?;
            }

            if let Some(location) = found {
                let location = location.offset(0, -pan);
                log::debug!("Fleet located at ({}, {}) on attempt {}", location.x, location.y, attempt);
                return Ok(location);
            }
        }
        Err(EngineError::FleetNotFound {
            attempts: self.attempts,
        })
    }
}

fn detect_marker(vision: &Vision) -> Option<Point> {
    let candidates = [
        (assets::FLEET_AMMO, 0.8, AMMO_TO_FLAGSHIP),
        (assets::FLEET_ARROW, 0.9, ARROW_TO_FLAGSHIP),
    ];
    for (asset, similarity, (dx, dy)) in candidates {
        let Some(region) = vision.find(asset, similarity) else {
            continue;
        };
        // The chapter icon in the corner matches the marker shape.
        if region.origin().approx_eq(CHAPTER_ICON, CHAPTER_ICON_TOLERANCE) {
            log::debug!("Ignoring fleet marker match on the chapter icon");
            continue;
        }
        return Some(region.origin().offset(dx, dy));
    }
    None
}

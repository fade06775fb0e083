//! # Target Registry
//!
//! Caches enemy contacts and mystery nodes for the current view and serves
//! nearest-target queries.
//!
//! ## Progressive relaxation
//! Searches start at a strict similarity and lower it one step at a time.
//! Once the blacklist or the threshold crosses its configured limit, camera
//! pans are interleaved with the threshold steps. Both the pan budget and the
//! similarity floor are hard limits, so a screen without any marker yields
//! an empty list after a bounded number of captures.
//!
//! ## Cache lifetime
//! The returned target is removed from the cache. Both lists are dropped once
//! the blacklist grows past `rescan_after_blacklisted`, because the camera has
//! usually moved by then.

use super::blacklist::Blacklist;
use super::fleet::FleetLocator;
use super::spatial::KdTree;
use super::target::{Target, TargetKind};
use crate::config::SearchConfig;
use crate::error::Result;
use crate::geometry::{Point, dedup_points};
use crate::session::Session;
use crate::vision::Vision;
use crate::vision::assets::{self, MAP_VIEWPORT, PANS};

/// One enemy silhouette: how much looser than the search threshold it is
/// matched, and where the tile center sits relative to the match corner.
struct MarkerSpec {
    asset: &'static str,
    similarity_offset: f32,
    use_mask: bool,
    anchor: (i32, i32),
}

const ENEMY_MARKERS: [MarkerSpec; 6] = [
    MarkerSpec { asset: assets::ENEMY_LEVEL, similarity_offset: 0.025, use_mask: true, anchor: (-3, -27) },
    MarkerSpec { asset: assets::ENEMY_1_DOWN, similarity_offset: 0.02, use_mask: false, anchor: (75, 110) },
    MarkerSpec { asset: assets::ENEMY_2_DOWN, similarity_offset: 0.025, use_mask: false, anchor: (75, 90) },
    MarkerSpec { asset: assets::ENEMY_3_UP, similarity_offset: 0.035, use_mask: false, anchor: (72, 136) },
    MarkerSpec { asset: assets::ENEMY_3_DOWN, similarity_offset: 0.035, use_mask: false, anchor: (75, 125) },
    MarkerSpec { asset: assets::ENEMY_2_UP, similarity_offset: 0.025, use_mask: false, anchor: (75, 100) },
];

const MYSTERY_ANCHOR: (i32, i32) = (0, 140);

/// Boss tile center relative to the boss marker's corner.
const BOSS_ANCHOR: (i32, i32) = (50, 25);

const BOSS_SCALES: (f32, f32) = (0.8, 1.2);
const SMALL_BOSS_SCALES: (f32, f32) = (0.4, 0.6);

/// Match-corner to tile-center offset of an enemy marker asset.
pub(crate) fn marker_anchor(asset: &str) -> Option<(i32, i32)> {
    match asset {
        assets::QUESTION_MARK => Some(MYSTERY_ANCHOR),
        assets::BOSS => Some(BOSS_ANCHOR),
        _ => ENEMY_MARKERS.iter().find(|m| m.asset == asset).map(|m| m.anchor),
    }
}

pub struct TargetRegistry {
    search: SearchConfig,
    small_boss_icon: bool,
    enemies: Vec<Point>,
    mystery_nodes: Vec<Point>,
    next_pan: usize,
    blacklist_seen: usize,
}

impl TargetRegistry {
    pub fn new(search: &SearchConfig, small_boss_icon: bool) -> Self {
        Self {
            search: search.clone(),
            small_boss_icon,
            enemies: Vec::new(),
            mystery_nodes: Vec::new(),
            next_pan: 0,
            blacklist_seen: 0,
        }
    }

    /// Drop both cached lists; the next query rescans.
    pub fn invalidate(&mut self) {
        self.enemies.clear();
        self.mystery_nodes.clear();
    }

    pub fn get_enemies(&mut self, session: &mut Session, blacklist: &Blacklist) -> Result<Vec<Target>> {
        self.enemies.retain(|p| !blacklist.contains(*p));
        if self.enemies.is_empty() {
            self.enemies = self.search_enemies(session, blacklist)?;
        }
        Ok(self
            .enemies
            .iter()
            .map(|p| Target::new(*p, TargetKind::Enemy))
            .collect())
    }

    pub fn get_mystery_nodes(&mut self, session: &mut Session, blacklist: &Blacklist) -> Result<Vec<Target>> {
        self.mystery_nodes.retain(|p| !blacklist.contains(*p));
        if self.mystery_nodes.is_empty() {
            self.mystery_nodes = self.search_mystery_nodes(session, blacklist)?;
        }
        Ok(self
            .mystery_nodes
            .iter()
            .map(|p| Target::new(*p, TargetKind::MysteryNode))
            .collect())
    }

    /// Nearest candidate to `origin` (the fleet when `None`). Only enemies
    /// unless `want_mystery`; with `focus_mystery` any visible mystery node
    /// takes precedence over every enemy.
    pub fn get_closest_target(
        &mut self,
        session: &mut Session,
        locator: &FleetLocator,
        blacklist: &Blacklist,
        origin: Option<Point>,
        want_mystery: bool,
        focus_mystery: bool,
    ) -> Result<Option<Target>> {
        if blacklist.len() > self.search.rescan_after_blacklisted && blacklist.len() > self.blacklist_seen {
            log::debug!("Blacklist grew to {}, rescanning", blacklist.len());
            self.invalidate();
        }
        self.blacklist_seen = blacklist.len();

        let enemies = self.get_enemies(session, blacklist)?;
        let mystery = if want_mystery {
            self.get_mystery_nodes(session, blacklist)?
        } else {
            Vec::new()
        };
        let mut candidates = if focus_mystery && !mystery.is_empty() {
            mystery
        } else {
            let mut all = enemies;
            all.extend(mystery);
            all
        };
        candidates.retain(|t| !blacklist.contains(t.point()));
        if candidates.is_empty() {
            log::debug!("No targets left");
            return Ok(None);
        }

        // The searches may have panned; locate in the view they ended on.
        let origin = match origin {
            Some(p) => p,
            None => locator.locate(session)?,
        };
        let points: Vec<Point> = candidates.iter().map(Target::point).collect();
        let Some((index, _)) = KdTree::build(&points).nearest(origin) else {
            return Ok(None);
        };

        let chosen = candidates[index];
        self.forget(chosen);
        log::info!("Closest target: {}", chosen);
        Ok(Some(chosen))
    }

    /// Boss marker on the current frame, as a boss target.
    pub fn find_boss(&self, vision: &Vision) -> Option<Target> {
        let (low, high) = if self.small_boss_icon {
            SMALL_BOSS_SCALES
        } else {
            BOSS_SCALES
        };
        vision
            .find_scaled(assets::BOSS, self.search.boss_similarity, low, high)
            .map(|r| Target::new(r.origin().offset(BOSS_ANCHOR.0, BOSS_ANCHOR.1), TargetKind::Boss))
    }

    pub fn forget(&mut self, target: Target) {
        let p = target.point();
        match target.kind {
            TargetKind::Enemy => self.enemies.retain(|e| *e != p),
            TargetKind::MysteryNode => self.mystery_nodes.retain(|m| *m != p),
            TargetKind::Boss => {}
        }
    }

    fn search_enemies(&mut self, session: &mut Session, blacklist: &Blacklist) -> Result<Vec<Point>> {
        let s = self.search.clone();
        let steps = ((s.start_similarity - s.similarity_floor) / s.similarity_step).round() as u32;
        let mut level = 0;
        let mut pans = 0;
        let mut panned_last = false;

        loop {
            if !panned_last {
                session.refresh()?;
            }
            let similarity = s.start_similarity - level as f32 * s.similarity_step;
            let found = self.scan_enemies(&session.vision, similarity, blacklist);
            if !found.is_empty() {
                log::debug!("{} enemies at similarity {:.3} after {} pans", found.len(), similarity, pans);
                return Ok(found);
            }

            let wants_pan = blacklist.len() > s.pan_after_blacklisted
                || similarity <= s.pan_below_similarity + f32::EPSILON;
            if wants_pan && !panned_last && pans < s.max_pans {
                self.pan(session)?;
                pans += 1;
                panned_last = true;
                continue;
            }
            panned_last = false;

            if level >= steps {
                log::debug!("Enemy search exhausted at similarity {:.3} with {} pans", similarity, pans);
                return Ok(Vec::new());
            }
            level += 1;
        }
    }

    fn scan_enemies(&self, vision: &Vision, similarity: f32, blacklist: &Blacklist) -> Vec<Point> {
        let mut points = Vec::new();
        for marker in &ENEMY_MARKERS {
            let hits = vision.find_all(marker.asset, similarity - marker.similarity_offset, marker.use_mask);
            points.extend(
                hits.into_iter()
                    .map(|p| p.offset(marker.anchor.0, marker.anchor.1))
                    .filter(|p| MAP_VIEWPORT.contains(*p) && !blacklist.contains(*p)),
            );
        }
        dedup_points(&points, self.search.dedup_radius)
    }

    fn search_mystery_nodes(&mut self, session: &mut Session, blacklist: &Blacklist) -> Result<Vec<Point>> {
        let s = &self.search;
        session.refresh()?;
        if !session.vision.visible_at(assets::QUESTION_MARK, s.mystery_hint_similarity) {
            return Ok(Vec::new());
        }

        let steps = ((s.mystery_start_similarity - s.mystery_floor) / s.similarity_step).round() as u32;
        for level in 0..=steps {
            let similarity = s.mystery_start_similarity - level as f32 * s.similarity_step;
            let points: Vec<Point> = session
                .vision
                .find_all(assets::QUESTION_MARK, similarity, false)
                .into_iter()
                .map(|p| p.offset(MYSTERY_ANCHOR.0, MYSTERY_ANCHOR.1))
                .filter(|p| MAP_VIEWPORT.contains(*p) && !blacklist.contains(*p))
                .collect();
            if !points.is_empty() {
                return Ok(dedup_points(&points, s.dedup_radius));
            }
        }
        Ok(Vec::new())
    }

    /// Swipe toward the next compass direction in rotation.
    fn pan(&mut self, session: &mut Session) -> Result<()> {
        let (from, to) = PANS[self.next_pan % PANS.len()];
        self.next_pan += 1;
        log::debug!("Panning camera ({}, {}) -> ({}, {})", from.x, from.y, to.x, to.y);
        self.invalidate();
        session.swipe(from, to, 300)
    }
}

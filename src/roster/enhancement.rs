//! Enhancement of the first favorite ship with spare dock ships as fodder.

use super::Enhancer;
use crate::error::{EngineError, Result};
use crate::session::Session;
use crate::vision::assets::{self, region};

pub struct DockEnhancer {
    max_ticks: u32,
    last_clear: Option<u32>,
}

impl DockEnhancer {
    pub fn new(max_ticks: u32) -> Self {
        Self {
            max_ticks,
            last_clear: None,
        }
    }

    fn enhance_ship(&self, session: &mut Session) -> Result<bool> {
        session.touch_region(region::DOCK_FIRST_SHIP)?;
        let mut enhanced = false;

        for _ in 0..self.max_ticks {
            session.wait_refresh()?;
            let v = &session.vision;

            if v.visible_at(assets::ENHANCE_NO_ITEMS, 0.85) {
                log::warn!("Not enough ships to enhance");
                break;
            }
            if v.visible_at(assets::ENHANCE_LEVEL, 0.8) {
                enhanced = self.confirm(session)?;
                break;
            }
            if v.visible(assets::ENHANCE_MENU) {
                log::debug!("Filling enhancement slots");
                session.touch_region(region::ENHANCE_FILL)?;
                continue;
            }
            if v.visible(assets::ENHANCE_DETAILS) {
                session.touch_region(region::ENHANCE_TAB)?;
            }
        }
        session.touch_region(region::NAV_BACK)?;
        Ok(enhanced)
    }

    fn confirm(&self, session: &mut Session) -> Result<bool> {
        session.touch_region(region::ENHANCE_CONFIRM)?;
        session.wait_refresh()?;
        if !session.vision.visible_at(assets::ENHANCE_DONE, 0.85) {
            log::debug!("Enhancement was not confirmed");
            return Ok(false);
        }

        for _ in 0..self.max_ticks {
            session.wait_refresh()?;
            let v = &session.vision;

            if v.visible(assets::MENU_ALERT_INFO) {
                session.touch_region(region::CONFIRM_SELECTED_EQUIPMENT)?;
            } else if v.visible(assets::RETIRE_DISASSEMBLE) {
                session.touch_region(region::DISASSEMBLE)?;
            } else if v.visible(assets::MENU_ITEM_FOUND) {
                session.touch_region(region::TAP_TO_CONTINUE)?;
                log::info!("Finished enhancing");
                return Ok(true);
            }
        }
        Err(EngineError::Stalled {
            stage: "confirming enhancement",
            ticks: self.max_ticks,
        })
    }
}

impl Enhancer for DockEnhancer {
    fn try_free_roster_slot(&mut self, session: &mut Session, forced: bool) -> Result<bool> {
        if !forced && self.last_clear == Some(session.stats.clears_done) {
            return Ok(false);
        }
        self.last_clear = Some(session.stats.clears_done);
        log::info!("Opening dock to enhance ships");

        for _ in 0..self.max_ticks {
            session.wait_refresh()?;
            let v = &session.vision;

            if v.visible(assets::MENU_SORT) {
                session.touch_region(region::SORT_ENHANCE)?;
            } else if v.visible(assets::MENU_BATTLE) {
                session.touch_region(region::DOCK)?;
            } else if v.visible_at(assets::ENHANCE_FAVORITE, 0.99) {
                let enhanced = self.enhance_ship(session)?;
                session.touch_region(region::DOCK_FAVORITE)?;
                session.touch_region(region::NAV_BACK)?;
                return Ok(enhanced);
            } else if v.visible(assets::MENU_DOCK) {
                session.touch_region(region::DOCK_FAVORITE)?;
            }
        }
        Err(EngineError::Stalled {
            stage: "opening dock",
            ticks: self.max_ticks,
        })
    }
}

//! Quick retirement through the build menu's retire tab.

use super::Retirer;
use crate::error::{EngineError, Result};
use crate::session::Session;
use crate::vision::assets::{self, region};

pub struct QuickRetirer {
    max_ticks: u32,
    last_clear: Option<u32>,
}

impl QuickRetirer {
    pub fn new(max_ticks: u32) -> Self {
        Self {
            max_ticks,
            last_clear: None,
        }
    }

    fn due(&self, session: &Session) -> bool {
        self.last_clear != Some(session.stats.clears_done)
    }

    /// Retire every batch until the list is empty.
    fn retire_ships(&self, session: &mut Session) -> Result<bool> {
        let mut retired = false;
        for _ in 0..self.max_ticks {
            session.wait_refresh()?;
            let v = &session.vision;

            if v.visible(assets::RETIRE_EMPTY) {
                log::info!("No ships left to retire");
                return Ok(retired);
            }
            if v.visible_at(assets::RETIRE_BONUS, 0.9) {
                self.confirm_retirement(session)?;
                retired = true;
                continue;
            }
            if v.visible_at(assets::RETIRE_SELECTED_NONE, 0.9) {
                log::info!("Selecting ships for retirement");
                session.touch_region(region::BATCH_RETIRE)?;
                session.wait_refresh()?;
                if session.vision.visible_at(assets::RETIRE_NO_BATCH, 0.9) {
                    session.touch_region(region::CLOSE_BATCH_RETIRE)?;
                    return Ok(retired);
                }
            }
        }
        Err(EngineError::Stalled {
            stage: "retiring ships",
            ticks: self.max_ticks,
        })
    }

    fn confirm_retirement(&self, session: &mut Session) -> Result<()> {
        session.touch_region(region::CONFIRM_RETIRE)?;
        for _ in 0..self.max_ticks {
            session.wait_refresh()?;
            let v = &session.vision;

            if v.visible(assets::RETIRE_ALERT_BONUS) {
                session.touch_region(region::CONFIRM_SELECTED_SHIPS)?;
            } else if v.visible(assets::MENU_ITEM_FOUND) {
                session.touch_region(region::TAP_TO_CONTINUE)?;
                return Ok(());
            } else if v.visible(assets::MENU_ALERT_INFO) {
                session.touch_region(region::CONFIRM_SELECTED_EQUIPMENT)?;
            } else if v.visible(assets::RETIRE_DISASSEMBLE) {
                session.touch_region(region::DISASSEMBLE)?;
            }
        }
        Err(EngineError::Stalled {
            stage: "confirming retirement",
            ticks: self.max_ticks,
        })
    }
}

impl Retirer for QuickRetirer {
    fn try_retire_ships(&mut self, session: &mut Session, forced: bool) -> Result<bool> {
        if !forced && !self.due(session) {
            return Ok(false);
        }
        self.last_clear = Some(session.stats.clears_done);
        log::info!("Opening build menu to retire ships");

        for _ in 0..self.max_ticks {
            session.wait_refresh()?;
            let v = &session.vision;

            if v.visible(assets::MENU_SORT) {
                session.touch_region(region::SORT_RETIRE)?;
            } else if v.visible(assets::MENU_BATTLE) {
                session.touch_region(region::BUILD_MENU)?;
            } else if v.visible(assets::MENU_BUILD) {
                session.touch_region(region::RETIRE_TAB)?;
            } else if v.visible_at(assets::RETIRE_SELECTED_NONE, 0.9) {
                let retired = self.retire_ships(session)?;
                session.touch_region(region::NAV_BACK)?;
                return Ok(retired);
            }
        }
        Err(EngineError::Stalled {
            stage: "opening retirement",
            ticks: self.max_ticks,
        })
    }
}

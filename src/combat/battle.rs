//! # Battle Resolver
//!
//! Drives one engagement from the formation screen to its outcome.
//!
//! 1. Start: answer the pre-battle interstitials (roster full, low morale)
//!    and press start until the loading screen, or the paused combat HUD
//!    when loading was missed, is visible.
//! 2. Resolution: poll the result screens, dismissing continue prompts,
//!    ship drops, the lock prompt (once) and commission notices.
//! 3. Outcome: the end-of-combat confirm counts as a win. Boss fights return
//!    immediately; regular fights wait for the map so a defeat screen that
//!    follows can still be classified.

use crate::config::Config;
use crate::error::{EngineError, Result};
use crate::roster::Roster;
use crate::session::Session;
use crate::vision::Vision;
use crate::vision::assets::{self, region};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleOutcome {
    Won,
    /// The fleet was wiped but the game switched to the other fleet.
    FleetSwitched,
    /// No fleet can continue on this map.
    FleetDefeated,
    /// The roster-full alert blocked the start and nothing freed a slot.
    RosterFull,
    /// The low-morale alert blocked the start.
    MoraleTooLow,
}

impl BattleOutcome {
    pub fn is_win(self) -> bool {
        self == BattleOutcome::Won
    }
}

const COMBAT_PAUSE_SIMILARITY: f32 = 0.7;

const DROP_TIERS: [(&str, &str); 4] = [
    (assets::DROP_SSR, "SSR"),
    (assets::DROP_ELITE, "ELITE"),
    (assets::DROP_RARE, "RARE"),
    (assets::DROP_COMMON, "COMMON"),
];

pub struct BattleResolver {
    max_ticks: u32,
    ignore_morale: bool,
}

impl BattleResolver {
    pub fn new(config: &Config) -> Self {
        Self {
            max_ticks: config.search.max_ui_ticks,
            ignore_morale: config.combat.ignore_morale,
        }
    }

    pub fn resolve(&self, session: &mut Session, roster: &mut Roster, is_boss: bool) -> Result<BattleOutcome> {
        session.stats.combats_attempted += 1;
        log::info!("Starting {}battle", if is_boss { "boss " } else { "" });

        if let Some(blocked) = self.start(session, roster)? {
            return Ok(blocked);
        }
        session.pacer.sleep(4.0, 1.0);
        self.poll_result(session, is_boss)
    }

    /// Returns the outcome when an interstitial prevents the fight.
    fn start(&self, session: &mut Session, roster: &mut Roster) -> Result<Option<BattleOutcome>> {
        for _ in 0..self.max_ticks {
            session.refresh()?;
            let v = &session.vision;

            if v.visible(assets::MENU_SORT) {
                log::warn!("Roster is full");
                if roster.free_slot(session, true)? {
                    continue;
                }
                return Ok(Some(BattleOutcome::RosterFull));
            }
            if v.visible(assets::MORALE_LOW) {
                if self.ignore_morale {
                    log::warn!("Morale is low, continuing anyway");
                    if !session.find_and_touch(assets::MENU_CONFIRM, 0.9)? {
                        session.touch_region(region::ALERT_CONFIRM)?;
                    }
                    continue;
                }
                log::warn!("Morale is too low to fight");
                return Ok(Some(BattleOutcome::MoraleTooLow));
            }
            if v.visible(assets::LOADING) || v.visible_at(assets::COMBAT_PAUSE, COMBAT_PAUSE_SIMILARITY) {
                return Ok(None);
            }
            if v.visible(assets::COMMISSION_CONFIRM) {
                session.touch_region(region::COMMISSION_CONFIRM)?;
                continue;
            }
            if v.visible(assets::FORMATION) || v.visible(assets::AMBUSH_FAILED) {
                session.touch_region(region::COMBAT_START)?;
                continue;
            }
            session.pacer.tick();
        }
        Err(EngineError::Stalled {
            stage: "starting battle",
            ticks: self.max_ticks,
        })
    }

    fn poll_result(&self, session: &mut Session, is_boss: bool) -> Result<BattleOutcome> {
        let mut locked = false;
        let mut confirmed = false;
        let mut defeated = false;

        for _ in 0..self.max_ticks {
            session.refresh()?;
            let v = &session.vision;

            if defeated {
                if v.visible(assets::FLEET_CANNOT_FORM) || v.visible(assets::UNABLE_BATTLE) {
                    log::error!("No fleet left to continue");
                    return Ok(BattleOutcome::FleetDefeated);
                }
                if v.visible(assets::RETREAT_BUTTON) {
                    log::warn!("Fleet defeated, switched to the other fleet");
                    return Ok(BattleOutcome::FleetSwitched);
                }
            }
            if v.visible_at(assets::COMBAT_PAUSE, COMBAT_PAUSE_SIMILARITY) {
                session.pacer.sleep(5.0, 1.0);
                continue;
            }
            if v.visible(assets::DEFEAT_CLOSE) {
                log::warn!("Fleet was defeated");
                session.stats.fleet_defeats += 1;
                defeated = true;
                session.find_and_touch(assets::DEFEAT_CLOSE, 0.9)?;
                continue;
            }
            if v.visible(assets::TOUCH_TO_CONTINUE) || v.visible(assets::MENU_ITEM_FOUND) {
                session.touch_region(region::TAP_TO_CONTINUE)?;
                continue;
            }
            if !locked && v.visible(assets::ALERT_LOCK) {
                log::info!("Locking new ship");
                session.touch_region(region::LOCK_SHIP)?;
                locked = true;
                continue;
            }
            if let Some(tier) = drop_tier(v) {
                log::info!("Received {} ship as drop", tier);
                session.touch_region(region::DISMISS_DROP)?;
                continue;
            }
            if v.visible(assets::COMMISSION_CONFIRM) {
                log::info!("Dismissing commission notice");
                session.touch_region(region::COMMISSION_CONFIRM)?;
                continue;
            }
            if v.visible(assets::COMBAT_CONFIRM) {
                log::info!("Combat ended");
                session.touch_region(region::COMBAT_END_CONFIRM)?;
                session.stats.combats_done += 1;
                if is_boss {
                    return Ok(BattleOutcome::Won);
                }
                confirmed = true;
                continue;
            }
            if confirmed && v.visible(assets::RETREAT_BUTTON) {
                return Ok(BattleOutcome::Won);
            }
        }
        Err(EngineError::Stalled {
            stage: "resolving battle",
            ticks: self.max_ticks,
        })
    }
}

fn drop_tier(vision: &Vision) -> Option<&'static str> {
    DROP_TIERS
        .iter()
        .find(|(asset, _)| vision.visible(asset))
        .map(|(_, tier)| *tier)
}

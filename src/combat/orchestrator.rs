//! # Map Clear Orchestrator
//!
//! One [`MapClear`] drives a single clear cycle through its phases:
//!
//! ```text
//! Idle -> Scanning -> TargetAcquired -> Moving -> Fighting -> Scanning ...
//!                  \-> BossEligible  -/
//! any phase -> Retreating -> Terminated
//! ```
//!
//! Exit triggers (quota, fleet defeat alert, roster full alert, morale
//! alert) are checked before every step. The [`ExitCode`] is set exactly
//! once; later triggers in the same cycle are ignored.
//!
//! The boss is only considered once `kills >= kills_before_boss`. When its
//! tile cannot be reached, the enemies nearest to it are tried in order of
//! distance and the first reachable one is fought; the next scan retries the
//! boss. Each attempt removes a candidate, so the recovery always ends.

use super::battle::{BattleOutcome, BattleResolver};
use super::movement::{MoveOutcome, MovementController};
use super::navigator::Navigator;
use super::spatial::KdTree;
use super::target::{Target, TargetKind};
use crate::config::Config;
use crate::error::{EngineError, Result};
use crate::geometry::Point;
use crate::roster::Roster;
use crate::session::Session;
use crate::vision::assets::{self, PANS, SCREEN_CENTER, region};
use std::fmt;
use std::sync::Arc;

const UNABLE_REACH_SIMILARITY: f32 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExitCode {
    BossDefeated,
    RetreatedAfterQuota,
    MoraleTooLow,
    RosterFull,
    FleetDefeated,
}

impl fmt::Display for ExitCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            ExitCode::BossDefeated => "boss defeated",
            ExitCode::RetreatedAfterQuota => "retreated after quota",
            ExitCode::MoraleTooLow => "morale too low",
            ExitCode::RosterFull => "roster full",
            ExitCode::FleetDefeated => "fleet defeated",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Idle,
    Scanning,
    TargetAcquired,
    BossEligible,
    Moving,
    Fighting,
    Retreating,
    Terminated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: Phase,
    pub to: Phase,
    /// Kills at the moment of the transition.
    pub kills: u32,
}

pub struct MapClear {
    config: Arc<Config>,
    nav: Navigator,
    movement: MovementController,
    battle: BattleResolver,
    kills_before_boss: u32,
    phase: Phase,
    kills: u32,
    target: Option<Target>,
    ambushed: bool,
    empty_scans: u32,
    exit: Option<ExitCode>,
    trace: Vec<Transition>,
}

impl MapClear {
    pub fn new(config: Arc<Config>) -> Self {
        Self {
            nav: Navigator::new(&config),
            movement: MovementController::new(&config.search),
            battle: BattleResolver::new(&config),
            kills_before_boss: config.kills_before_boss(),
            phase: Phase::Idle,
            kills: 0,
            target: None,
            ambushed: false,
            empty_scans: 0,
            exit: None,
            trace: Vec::new(),
            config,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn trace(&self) -> &[Transition] {
        &self.trace
    }

    /// Run one full clear cycle, from the map selection screens to either
    /// the boss kill or a retreat.
    pub fn run(&mut self, session: &mut Session, roster: &mut Roster) -> Result<ExitCode> {
        self.reset();
        session.stats.clears_attempted += 1;
        log::info!(
            "Clearing map {} ({} kills before boss)",
            self.config.combat.map,
            self.kills_before_boss
        );

        self.enter_map(session)?;
        session.pacer.sleep(2.5, 0.5);
        self.transition(Phase::Scanning);

        loop {
            match self.phase {
                Phase::Terminated => break,
                Phase::Retreating => {
                    self.retreat(session)?;
                    self.transition(Phase::Terminated);
                    continue;
                }
                _ => {}
            }

            if let Some(code) = self.check_exit_triggers(session, roster)? {
                self.finish(code);
                continue;
            }

            match self.phase {
                Phase::Scanning => self.scan(session)?,
                Phase::TargetAcquired => self.acquire(session)?,
                Phase::BossEligible => self.engage_boss(session)?,
                Phase::Moving => self.advance(session)?,
                Phase::Fighting => self.fight(session, roster)?,
                Phase::Idle | Phase::Retreating | Phase::Terminated => {}
            }
        }

        let code = self.exit.ok_or(EngineError::Stalled {
            stage: "clearing map",
            ticks: 0,
        })?;
        if code == ExitCode::BossDefeated {
            self.leave_cleared_map(session)?;
            session.stats.clears_done += 1;
        }
        log::info!("Clear cycle finished: {} after {} kills", code, self.kills);
        Ok(code)
    }

    fn reset(&mut self) {
        self.nav.reset();
        self.phase = Phase::Idle;
        self.kills = 0;
        self.target = None;
        self.ambushed = false;
        self.empty_scans = 0;
        self.exit = None;
        self.trace.clear();
    }

    fn transition(&mut self, to: Phase) {
        log::debug!("Phase {:?} -> {:?} ({} kills)", self.phase, to, self.kills);
        self.trace.push(Transition {
            from: self.phase,
            to,
            kills: self.kills,
        });
        self.phase = to;
    }

    /// Record the exit code unless one is already set.
    fn finish(&mut self, code: ExitCode) {
        if let Some(existing) = self.exit {
            log::debug!("Ignoring exit {} after {}", code, existing);
            return;
        }
        self.exit = Some(code);
        let next = if code == ExitCode::BossDefeated {
            Phase::Terminated
        } else {
            Phase::Retreating
        };
        self.transition(next);
    }

    fn check_exit_triggers(&mut self, session: &mut Session, roster: &mut Roster) -> Result<Option<ExitCode>> {
        let quota = self.config.combat.retreat_after;
        if quota > 0 && self.kills >= quota {
            log::info!("Retreating after {} kills", self.kills);
            return Ok(Some(ExitCode::RetreatedAfterQuota));
        }

        session.refresh()?;
        let v = &session.vision;
        if v.visible(assets::UNABLE_BATTLE) {
            log::error!("Fleet cannot battle any more");
            return Ok(Some(ExitCode::FleetDefeated));
        }
        if v.visible(assets::MENU_SORT) {
            log::warn!("Roster is full");
            if roster.free_slot(session, true)? {
                return Ok(None);
            }
            return Ok(Some(ExitCode::RosterFull));
        }
        if v.visible(assets::MORALE_LOW) {
            if self.config.combat.ignore_morale {
                if !session.find_and_touch(assets::MENU_CONFIRM, 0.9)? {
                    session.touch_region(region::ALERT_CONFIRM)?;
                }
                return Ok(None);
            }
            log::warn!("Morale is too low");
            return Ok(Some(ExitCode::MoraleTooLow));
        }
        if v.visible(assets::COMMISSION_CONFIRM) {
            log::info!("Dismissing commission notice");
            session.touch_region(region::COMMISSION_CONFIRM)?;
            // The step after the triggers reads this frame.
            session.wait_refresh()?;
        }
        Ok(None)
    }

    fn boss_eligible(&self) -> bool {
        self.kills >= self.kills_before_boss
    }

    fn scan(&mut self, session: &mut Session) -> Result<()> {
        if self.boss_eligible() {
            if let Some(boss) = self.locate_boss(session)? {
                self.target = Some(boss);
                self.transition(Phase::BossEligible);
                return Ok(());
            }
        } else if self.nav.registry.find_boss(&session.vision).is_some() {
            log::debug!("Boss visible at {}/{} kills, not eligible yet", self.kills, self.kills_before_boss);
        }

        match self.nav.closest(session, None)? {
            Some(target) => {
                self.target = Some(target);
                self.transition(Phase::TargetAcquired);
            }
            None => {
                self.empty_scans += 1;
                log::warn!("Scan found no targets ({} in a row)", self.empty_scans);
                if self.empty_scans >= self.config.search.max_empty_scans {
                    return Err(EngineError::TargetsExhausted {
                        scans: self.empty_scans,
                    });
                }
                self.nav.reset();
            }
        }
        Ok(())
    }

    /// Boss on screen, panning through the compass directions if needed.
    /// Skips a boss already found unreachable in this pass.
    fn locate_boss(&mut self, session: &mut Session) -> Result<Option<Target>> {
        let mut boss = self.nav.registry.find_boss(&session.vision);
        for (from, to) in PANS {
            if boss.is_some() {
                break;
            }
            session.swipe(from, to, 300)?;
            self.nav.registry.invalidate();
            boss = self.nav.registry.find_boss(&session.vision);
        }
        Ok(boss.filter(|b| !self.nav.blacklist.contains(b.point())))
    }

    fn acquire(&mut self, session: &mut Session) -> Result<()> {
        let Some(target) = self.target else {
            self.transition(Phase::Scanning);
            return Ok(());
        };
        if self.reachable(session, target.point())? {
            self.transition(Phase::Moving);
        } else {
            log::warn!("Unable to reach {}", target);
            self.nav.blacklist.add(target.point());
            self.target = None;
            self.transition(Phase::Scanning);
        }
        Ok(())
    }

    /// Touch a tile and report whether the game accepted it as a destination.
    fn reachable(&mut self, session: &mut Session, at: Point) -> Result<bool> {
        session.touch(at)?;
        session.wait_refresh()?;
        Ok(!session.vision.visible_at(assets::UNABLE_REACH, UNABLE_REACH_SIMILARITY))
    }

    fn engage_boss(&mut self, session: &mut Session) -> Result<()> {
        let Some(boss) = self.center_boss(session)? else {
            log::warn!("Lost sight of the boss");
            self.target = None;
            self.transition(Phase::Scanning);
            return Ok(());
        };

        if self.reachable(session, boss.point())? {
            log::info!("Engaging {}", boss);
            self.target = Some(boss);
            self.transition(Phase::Moving);
            return Ok(());
        }

        log::warn!("Unable to reach the boss, attacking the fleet in the way");
        self.nav.blacklist.add(boss.point());
        match self.reachable_blocker(session, boss.point())? {
            Some(blocker) => {
                self.nav.registry.forget(blocker);
                self.target = Some(blocker);
                self.transition(Phase::Moving);
            }
            None => {
                self.target = None;
                self.transition(Phase::Scanning);
            }
        }
        Ok(())
    }

    /// Drag the boss toward the screen center when it sits near an edge.
    fn center_boss(&mut self, session: &mut Session) -> Result<Option<Target>> {
        session.refresh()?;
        let Some(boss) = self.nav.registry.find_boss(&session.vision) else {
            return Ok(None);
        };
        let tolerance = self.config.search.boss_center_tolerance as f64;
        if boss.point().distance(SCREEN_CENTER) <= tolerance {
            return Ok(Some(boss));
        }
        log::debug!("Centering boss at ({}, {})", boss.x, boss.y);
        session.swipe(boss.point(), SCREEN_CENTER, 500)?;
        self.nav.registry.invalidate();
        Ok(self.nav.registry.find_boss(&session.vision))
    }

    /// Enemies nearest to the boss, tried closest first until one is reachable.
    fn reachable_blocker(&mut self, session: &mut Session, boss: Point) -> Result<Option<Target>> {
        let mut candidates = self.nav.registry.get_enemies(session, &self.nav.blacklist)?;
        while !candidates.is_empty() {
            let points: Vec<Point> = candidates.iter().map(Target::point).collect();
            let Some((index, _)) = KdTree::build(&points).nearest(boss) else {
                break;
            };
            let candidate = candidates.swap_remove(index);
            if self.reachable(session, candidate.point())? {
                return Ok(Some(candidate));
            }
            log::warn!("Unable to reach {} next to the boss", candidate);
            self.nav.blacklist.add(candidate.point());
        }
        Ok(None)
    }

    fn advance(&mut self, session: &mut Session) -> Result<()> {
        let Some(target) = self.target else {
            self.transition(Phase::Scanning);
            return Ok(());
        };
        let (reached, outcome) = self.movement.move_to(session, &mut self.nav, target)?;
        match outcome {
            MoveOutcome::FightNeeded => {
                self.target = Some(reached);
                self.transition(Phase::Fighting);
            }
            MoveOutcome::Ambushed => {
                self.target = Some(reached);
                self.ambushed = true;
                self.transition(Phase::Fighting);
            }
            MoveOutcome::NoFightNeeded => {
                self.nav.blacklist.clear();
                self.target = None;
                self.empty_scans = 0;
                self.transition(Phase::Scanning);
            }
            MoveOutcome::NoTargetLeft => {
                log::warn!("No target left after {} got stuck", reached);
                self.target = None;
                self.transition(Phase::Scanning);
            }
        }
        Ok(())
    }

    fn fight(&mut self, session: &mut Session, roster: &mut Roster) -> Result<()> {
        let is_boss = !self.ambushed && self.target.is_some_and(|t| t.kind == TargetKind::Boss);
        let outcome = self.battle.resolve(session, roster, is_boss)?;
        match outcome {
            BattleOutcome::Won => {
                self.kills += 1;
                self.empty_scans = 0;
                log::info!("Battle won ({} kills)", self.kills);
                if is_boss {
                    self.finish(ExitCode::BossDefeated);
                } else if self.ambushed {
                    self.ambushed = false;
                    self.transition(Phase::TargetAcquired);
                } else {
                    self.target = None;
                    self.nav.reset();
                    session.pacer.sleep(3.0, 1.0);
                    self.transition(Phase::Scanning);
                }
            }
            BattleOutcome::FleetSwitched => {
                self.ambushed = false;
                self.target = None;
                self.nav.reset();
                self.transition(Phase::Scanning);
            }
            BattleOutcome::FleetDefeated => self.finish(ExitCode::FleetDefeated),
            BattleOutcome::RosterFull => self.finish(ExitCode::RosterFull),
            BattleOutcome::MoraleTooLow => self.finish(ExitCode::MoraleTooLow),
        }
        Ok(())
    }

    fn enter_map(&mut self, session: &mut Session) -> Result<()> {
        let tile = assets::map_tile(&self.config.combat.map);
        let max_ticks = self.config.search.max_ui_ticks;

        for _ in 0..max_ticks {
            session.wait_refresh()?;
            let v = &session.vision;

            if v.visible(assets::RETREAT_BUTTON) {
                return Ok(());
            }
            if v.visible(assets::COMMISSION_CONFIRM) {
                session.touch_region(region::COMMISSION_CONFIRM)?;
            } else if v.visible(assets::MENU_BATTLE) {
                session.touch_region(region::MENU_BATTLE)?;
            } else if v.visible(assets::FLEET_SELECT) {
                session.touch_region(region::FLEET_GO)?;
            } else if v.visible(assets::MAP_SUMMARY_GO) {
                session.touch_region(region::SUMMARY_GO)?;
            } else if session.find_and_touch(&tile, 0.99)? {
                log::info!("Found map {}", self.config.combat.map);
            }
        }
        Err(EngineError::Stalled {
            stage: "entering map",
            ticks: max_ticks,
        })
    }

    fn retreat(&mut self, session: &mut Session) -> Result<()> {
        log::info!("Retreating");
        let max_ticks = self.config.search.max_ui_ticks;

        for _ in 0..max_ticks {
            session.wait_refresh()?;
            let v = &session.vision;

            if v.visible(assets::CHAPTER_SELECT) {
                return Ok(());
            }
            if v.visible(assets::MORALE_LOW) || v.visible(assets::MENU_SORT) {
                session.touch_region(region::ALERT_CANCEL)?;
            } else if v.visible(assets::UNABLE_BATTLE) || v.visible(assets::FLEET_CANNOT_FORM) {
                session.touch_region(region::CLOSE_INFO_DIALOG)?;
            } else if v.visible(assets::FORMATION) {
                session.touch_region(region::NAV_BACK)?;
            } else if v.visible(assets::MENU_CONFIRM) {
                session.touch_region(region::ALERT_CONFIRM)?;
            } else if v.visible(assets::RETREAT_BUTTON) {
                session.touch_region(region::RETREAT)?;
            }
        }
        Err(EngineError::Stalled {
            stage: "retreating",
            ticks: max_ticks,
        })
    }

    fn leave_cleared_map(&mut self, session: &mut Session) -> Result<()> {
        let max_ticks = self.config.search.max_ui_ticks;

        for _ in 0..max_ticks {
            session.wait_refresh()?;
            let v = &session.vision;

            if v.visible(assets::CHAPTER_SELECT) {
                log::info!("Boss defeated, back on chapter select");
                return Ok(());
            }
            if v.visible(assets::COMMISSION_CONFIRM) {
                session.touch_region(region::COMMISSION_CONFIRM)?;
            } else if !session.find_and_touch(assets::MENU_CONFIRM, 0.9)? {
                session.touch_region(region::TAP_TO_CONTINUE)?;
            }
        }
        Err(EngineError::Stalled {
            stage: "leaving cleared map",
            ticks: max_ticks,
        })
    }
}

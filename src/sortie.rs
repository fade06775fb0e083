//! # Sortie Session Controller
//!
//! Repeats clear cycles until a stop condition holds. Conditions are checked
//! before every cycle, never during one: the stop handle, the clear limit,
//! the oil floor, the maintenance interval and the retire cycle.

use crate::combat::{ExitCode, MapClear};
use crate::config::Config;
use crate::error::{EngineError, Result};
use crate::roster::Roster;
use crate::session::Session;
use crate::vision::Vision;
use crate::vision::assets::{self, region};
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

const OIL_READINGS: usize = 5;

/// Readings farther than this from the last accepted value are misreads.
const OIL_MAX_JUMP: u32 = 600;

/// Reads a numeric resource off the current frame.
pub trait ResourceGauge: Send {
    fn read(&mut self, vision: &Vision) -> Option<u32>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortieEnd {
    Stopped,
    ClearLimit,
    OilLow,
    MaintenanceDue,
    RetireCycle,
    MoraleTooLow,
    FleetDefeated,
}

#[derive(Debug, Clone)]
pub struct SortieReport {
    pub end: SortieEnd,
    pub exits: Vec<ExitCode>,
}

impl SortieReport {
    pub fn clears(&self) -> usize {
        self.exits.iter().filter(|e| **e == ExitCode::BossDefeated).count()
    }
}

pub struct SortieController {
    config: Arc<Config>,
    clear: MapClear,
    roster: Roster,
    gauge: Option<Box<dyn ResourceGauge>>,
    stop: Arc<AtomicBool>,
    last_maintenance: Instant,
    last_oil: Option<u32>,
}

impl SortieController {
    pub fn new(config: Arc<Config>, roster: Roster) -> Self {
        Self {
            clear: MapClear::new(config.clone()),
            config,
            roster,
            gauge: None,
            stop: Arc::new(AtomicBool::new(false)),
            last_maintenance: Instant::now(),
            last_oil: None,
        }
    }

    pub fn with_gauge(mut self, gauge: Box<dyn ResourceGauge>) -> Self {
        self.gauge = Some(gauge);
        self
    }

    /// Raise to stop after the running cycle completes.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    pub fn map_clear(&self) -> &MapClear {
        &self.clear
    }

    pub fn run(&mut self, session: &mut Session) -> Result<SortieReport> {
        let mut exits = Vec::new();
        let mut clears = 0;
        let mut defeats = 0;

        loop {
            if let Some(end) = self.gate(session, clears)? {
                log::info!("Sortie ended: {:?}", end);
                return Ok(SortieReport { end, exits });
            }

            let code = self.clear.run(session, &mut self.roster)?;
            exits.push(code);
            match code {
                ExitCode::BossDefeated => {
                    clears += 1;
                    defeats = 0;
                }
                ExitCode::RetreatedAfterQuota => defeats = 0,
                ExitCode::MoraleTooLow => {
                    return Ok(SortieReport {
                        end: SortieEnd::MoraleTooLow,
                        exits,
                    });
                }
                ExitCode::RosterFull => {
                    self.return_to_menu(session)?;
                    if !self.roster.free_slot(session, true)? {
                        log::error!("Roster is full and nothing could free a slot");
                        return Err(EngineError::RosterFull);
                    }
                }
                ExitCode::FleetDefeated => {
                    defeats += 1;
                    if defeats >= self.config.combat.max_consecutive_defeats {
                        return Ok(SortieReport {
                            end: SortieEnd::FleetDefeated,
                            exits,
                        });
                    }
                }
            }
            log::info!("{}", session.stats.summary());
        }
    }

    /// Unforced roster pass from the main menu; restarts the maintenance timer.
    pub fn maintain(&mut self, session: &mut Session) -> Result<()> {
        if self.roster.is_configured() {
            self.return_to_menu(session)?;
            self.roster.maintain(session)?;
        }
        self.last_maintenance = Instant::now();
        Ok(())
    }

    fn gate(&mut self, session: &mut Session, clears: u32) -> Result<Option<SortieEnd>> {
        let config = self.config.clone();
        let combat = &config.combat;
        if self.stop.load(Ordering::SeqCst) {
            return Ok(Some(SortieEnd::Stopped));
        }
        if combat.max_clears > 0 && session.stats.clears_done >= combat.max_clears {
            return Ok(Some(SortieEnd::ClearLimit));
        }
        if combat.retire_cycle > 0 && clears >= combat.retire_cycle {
            return Ok(Some(SortieEnd::RetireCycle));
        }
        let interval = Duration::from_secs(combat.maintenance_interval_minutes * 60);
        if combat.maintenance_interval_minutes > 0 && self.last_maintenance.elapsed() >= interval {
            return Ok(Some(SortieEnd::MaintenanceDue));
        }
        if combat.oil_limit > 0 {
            if let Some(oil) = self.read_oil(session)? {
                if oil < combat.oil_limit {
                    log::warn!("Oil {} is below the limit of {}", oil, combat.oil_limit);
                    return Ok(Some(SortieEnd::OilLow));
                }
            }
        }
        Ok(None)
    }

    fn read_oil(&mut self, session: &mut Session) -> Result<Option<u32>> {
        let Some(gauge) = self.gauge.as_mut() else {
            return Ok(None);
        };
        let mut readings = Vec::with_capacity(OIL_READINGS);
        for _ in 0..OIL_READINGS {
            session.refresh()?;
            if let Some(value) = gauge.read(&session.vision) {
                readings.push(value);
            }
        }
        let oil = consensus(&readings, self.last_oil);
        if oil.is_some() {
            self.last_oil = oil;
        }
        log::debug!("Oil readings {:?} -> {:?}", readings, oil);
        Ok(oil)
    }

    fn return_to_menu(&self, session: &mut Session) -> Result<()> {
        let max_ticks = self.config.search.max_ui_ticks;
        for _ in 0..max_ticks {
            session.wait_refresh()?;
            if session.vision.visible(assets::MENU_BATTLE) {
                return Ok(());
            }
            session.touch_region(region::NAV_BACK)?;
        }
        Err(EngineError::Stalled {
            stage: "returning to menu",
            ticks: max_ticks,
        })
    }
}

/// Most frequent plausible reading. Readings more than [`OIL_MAX_JUMP`] away
/// from `last` are dropped; ties go to the earliest value.
pub fn consensus(readings: &[u32], last: Option<u32>) -> Option<u32> {
    let plausible: Vec<u32> = readings
        .iter()
        .copied()
        .filter(|r| last.is_none_or(|l| r.abs_diff(l) <= OIL_MAX_JUMP))
        .collect();

    let mut counts: HashMap<u32, usize> = HashMap::new();
    for r in &plausible {
        *counts.entry(*r).or_default() += 1;
    }
    let best = counts.values().copied().max()?;
    plausible.into_iter().find(|r| counts[r] == best)
}

//! # Roster Maintenance
//!
//! Two optional collaborators free dock space: [`Enhancer`] feeds spare
//! ships into a favorite, [`Retirer`] retires them. The engine calls them
//! with `forced = true` when the "roster full" alert interrupts a battle;
//! otherwise each runs at most once per completed clear.

pub mod enhancement;
pub mod retirement;

pub use enhancement::DockEnhancer;
pub use retirement::QuickRetirer;

use crate::config::Config;
use crate::error::Result;
use crate::session::Session;

pub trait Enhancer: Send {
    /// Returns true when at least one slot was freed.
    fn try_free_roster_slot(&mut self, session: &mut Session, forced: bool) -> Result<bool>;
}

pub trait Retirer: Send {
    /// Returns true when at least one ship was retired.
    fn try_retire_ships(&mut self, session: &mut Session, forced: bool) -> Result<bool>;
}

#[derive(Default)]
pub struct Roster {
    enhancer: Option<Box<dyn Enhancer>>,
    retirer: Option<Box<dyn Retirer>>,
}

impl Roster {
    pub fn new(enhancer: Option<Box<dyn Enhancer>>, retirer: Option<Box<dyn Retirer>>) -> Self {
        Self { enhancer, retirer }
    }

    pub fn from_config(config: &Config) -> Self {
        let enhancer: Option<Box<dyn Enhancer>> = if config.enhancement.enabled {
            Some(Box::new(DockEnhancer::new(config.search.max_ui_ticks)))
        } else {
            None
        };
        let retirer: Option<Box<dyn Retirer>> = if config.retirement.enabled {
            Some(Box::new(QuickRetirer::new(config.search.max_ui_ticks)))
        } else {
            None
        };
        Self::new(enhancer, retirer)
    }

    pub fn is_configured(&self) -> bool {
        self.enhancer.is_some() || self.retirer.is_some()
    }

    /// Enhancement first, then retirement. False when neither is
    /// configured or neither freed anything.
    pub fn free_slot(&mut self, session: &mut Session, forced: bool) -> Result<bool> {
        if let Some(enhancer) = self.enhancer.as_mut() {
            if enhancer.try_free_roster_slot(session, forced)? {
                session.stats.roster_slots_freed += 1;
                return Ok(true);
            }
        }
        if let Some(retirer) = self.retirer.as_mut() {
            if retirer.try_retire_ships(session, forced)? {
                session.stats.roster_slots_freed += 1;
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Unforced pass after a clear.
    pub fn maintain(&mut self, session: &mut Session) -> Result<()> {
        self.free_slot(session, false).map(|_| ())
    }
}

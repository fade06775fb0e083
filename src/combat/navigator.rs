//! Target selection state shared by movement and the orchestrator.

use super::blacklist::Blacklist;
use super::fleet::FleetLocator;
use super::registry::TargetRegistry;
use super::target::Target;
use crate::config::Config;
use crate::error::Result;
use crate::geometry::Point;
use crate::session::Session;

pub struct Navigator {
    pub registry: TargetRegistry,
    pub locator: FleetLocator,
    pub blacklist: Blacklist,
    want_mystery: bool,
    focus_mystery: bool,
}

impl Navigator {
    pub fn new(config: &Config) -> Self {
        Self {
            registry: TargetRegistry::new(&config.search, config.combat.small_boss_icon),
            locator: FleetLocator::new(&config.search),
            blacklist: Blacklist::new(config.search.blacklist_tolerance),
            want_mystery: !config.combat.ignore_mystery_nodes,
            focus_mystery: config.combat.focus_on_mystery_nodes,
        }
    }

    /// Nearest eligible target to `origin`, or to the fleet when `None`.
    pub fn closest(&mut self, session: &mut Session, origin: Option<Point>) -> Result<Option<Target>> {
        self.registry.get_closest_target(
            session,
            &self.locator,
            &self.blacklist,
            origin,
            self.want_mystery,
            self.focus_mystery,
        )
    }

    /// Forget every rejection and cached detection.
    pub fn reset(&mut self) {
        self.blacklist.clear();
        self.registry.invalidate();
    }
}

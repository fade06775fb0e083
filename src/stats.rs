//! Plain counters exposed to the caller. No persistence, no wire format.

use chrono::{DateTime, Local};

#[derive(Debug, Clone)]
pub struct Stats {
    pub started: DateTime<Local>,
    pub combats_attempted: u32,
    pub combats_done: u32,
    pub clears_attempted: u32,
    pub clears_done: u32,
    pub fleet_defeats: u32,
    pub roster_slots_freed: u32,
}

impl Default for Stats {
    fn default() -> Self {
        Self {
            started: Local::now(),
            combats_attempted: 0,
            combats_done: 0,
            clears_attempted: 0,
            clears_done: 0,
            fleet_defeats: 0,
            roster_slots_freed: 0,
        }
    }
}

impl Stats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn summary(&self) -> String {
        self.summary_at(Local::now())
    }

    pub fn summary_at(&self, now: DateTime<Local>) -> String {
        let elapsed = now - self.started;
        let hours = elapsed.num_seconds() as f64 / 3600.0;
        format!(
            "Combats done: {} / attempted: {} | Clears done: {} / attempted: {} | Defeats: {} | Running for {}h {}m (started {})",
            per_hour(self.combats_done, hours),
            per_hour(self.combats_attempted, hours),
            per_hour(self.clears_done, hours),
            per_hour(self.clears_attempted, hours),
            self.fleet_defeats,
            elapsed.num_hours(),
            elapsed.num_minutes() % 60,
            self.started.format("%Y-%m-%d %H:%M:%S"),
        )
    }
}

/// Count with a per-hour rate once at least an hour has passed.
fn per_hour(count: u32, hours: f64) -> String {
    if hours < 1.0 || count == 0 {
        count.to_string()
    } else {
        format!("{} ({:.2}/hr)", count, count as f64 / hours)
    }
}

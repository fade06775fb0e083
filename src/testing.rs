//! Deterministic game doubles for tests.
//!
//! [`SimGame`] is a small model of the game: screens, a scrollable map with
//! enemies, a boss and mystery nodes, battles that follow a script. It
//! implements both [`Device`] and [`Recognizer`], so a [`Session`] built on
//! it runs the real engine end to end.
//!
//! [`ScriptedScreens`] replays a fixed list of visible assets, one entry per
//! capture, for testing individual polling loops.
//!
//! Every capture records the visible assets and returns a tiny image that
//! encodes the record index, so detections always answer for the frame the
//! engine captured, not for the live state. Each visible asset carries the
//! best score a matcher would give it; a query only sees it once its
//! similarity threshold is at or below that score.

use crate::combat::registry::marker_anchor;
use crate::config::Config;
use crate::device::{Device, Frame};
use crate::error::Result;
use crate::geometry::{Point, Region};
use crate::session::Session;
use crate::vision::Recognizer;
use crate::vision::assets::{self, CHAPTER_ICON, region};
use image::{GrayImage, Luma};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

/// Captures needed for a reachable move to arrive.
const MOVE_TICKS: u32 = 2;
/// Combat ticks shown as paused before the result screen.
const BATTLE_TICKS: u32 = 2;
/// Tap distance that counts as touching a tile.
const TILE_RADIUS: i32 = 40;

const HUD: Region = Region::new(40, 40, 200, 60);
const MAP_TILE: Region = Region::new(800, 400, 200, 100);
const DEFEAT_CLOSE_BUTTON: Region = Region::new(1500, 100, 60, 60);

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.combat.map = "3-4".to_string();
    config.combat.oil_limit = 0;
    config.combat.retire_cycle = 0;
    config.pacing.scale = 0.0;
    config.pacing.seed = Some(7);
    config
}

#[derive(Debug, Clone)]
struct Visible {
    asset: String,
    region: Region,
    score: f32,
}

impl Visible {
    fn new(asset: &str, region: Region) -> Self {
        Self {
            asset: asset.to_string(),
            region,
            score: 1.0,
        }
    }

    fn scored(mut self, score: f32) -> Self {
        self.score = score;
        self
    }
}

fn encode_frame(index: usize) -> GrayImage {
    let bytes = (index as u64).to_le_bytes();
    GrayImage::from_fn(8, 1, |x, _| Luma([bytes[x as usize]]))
}

fn decode_frame(frame: &Frame) -> usize {
    let mut bytes = [0u8; 8];
    for (x, b) in bytes.iter_mut().enumerate() {
        *b = frame.image.get_pixel(x as u32, 0).0[0];
    }
    u64::from_le_bytes(bytes) as usize
}

fn matches<'a>(
    frames: &'a [Vec<Visible>],
    frame: &Frame,
    asset: &'a str,
    similarity: f32,
) -> impl Iterator<Item = &'a Visible> {
    frames
        .get(decode_frame(frame))
        .into_iter()
        .flatten()
        .filter(move |v| v.asset == asset && similarity <= v.score)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    MainMenu,
    ChapterSelect,
    MapSummary,
    FleetSelect,
    Map,
    Formation,
    MoraleAlert,
    SortAlert,
    Loading,
    Battle,
    TouchToContinue,
    Drop,
    CombatConfirm,
    Defeat,
    StageClear,
    RetreatConfirm,
    ItemFound,
    AmbushPrompt,
    AmbushFailed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    /// Shown for exactly one capture.
    UnableReach,
    /// Stays until tapped away.
    UnableBattle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattleScript {
    Win,
    WinWithDrop,
    DefeatSwitch,
    DefeatTotal,
}

#[derive(Debug, Clone)]
pub struct SimEnemy {
    pub at: Point,
    pub reachable: bool,
    pub arrives: bool,
    pub alive: bool,
    /// Best template score of the enemy's marker.
    pub score: f32,
}

impl SimEnemy {
    pub fn at(x: i32, y: i32) -> Self {
        Self {
            at: Point::new(x, y),
            reachable: true,
            arrives: true,
            alive: true,
            score: 1.0,
        }
    }

    /// Marker only matched at `score` or below.
    pub fn faint(mut self, score: f32) -> Self {
        self.score = score;
        self
    }

    pub fn unreachable(mut self) -> Self {
        self.reachable = false;
        self
    }

    pub fn never_arrives(mut self) -> Self {
        self.arrives = false;
        self
    }
}

#[derive(Debug, Clone)]
pub struct SimBoss {
    pub at: Point,
    /// Enemy index whose fleet blocks every path to the boss while alive.
    pub blocked_by: Option<usize>,
    pub alive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Dest {
    Enemy(usize),
    Boss,
    Mystery(usize),
}

#[derive(Debug, Clone)]
struct Layout {
    fleet: Point,
    enemies: Vec<SimEnemy>,
    boss: Option<SimBoss>,
    mystery: Vec<Point>,
}

pub struct SimState {
    pub screen: Screen,
    pub overlay: Option<Overlay>,
    pub map: String,
    pub enemies: Vec<SimEnemy>,
    pub boss: Option<SimBoss>,
    /// Mystery node positions and whether each was collected.
    pub mystery: Vec<(Point, bool)>,
    pub fleet: Point,
    /// Screen position = world position + camera.
    pub camera: Point,
    pub morale_low: bool,
    pub roster_full: bool,
    /// Commission notice covering the map until confirmed.
    pub commission: bool,
    /// Chapter icon rendered as a fleet ammo match ahead of the real one.
    pub ammo_on_chapter_icon: bool,
    /// Ambush on the next move; `true` when evasion succeeds.
    pub ambush: Option<bool>,
    pub battles: VecDeque<BattleScript>,
    pub kills: u32,
    pub taps: Vec<Point>,
    pub swipes: Vec<(Point, Point)>,
    layout: Layout,
    moving: Option<(Dest, Option<u32>)>,
    fight: Option<Dest>,
    script: BattleScript,
    battle_ticks: u32,
    evades: bool,
    frames: Vec<Vec<Visible>>,
}

impl SimState {
    fn to_screen(&self, world: Point) -> Point {
        world.offset(self.camera.x, self.camera.y)
    }

    fn reset_map(&mut self) {
        self.fleet = self.layout.fleet;
        self.enemies = self.layout.enemies.clone();
        self.boss = self.layout.boss.clone();
        self.mystery = self.layout.mystery.iter().map(|p| (*p, false)).collect();
        self.camera = Point::new(0, 0);
        self.overlay = None;
        self.moving = None;
        self.fight = None;
        self.kills = 0;
    }

    fn render(&self) -> Vec<Visible> {
        let mut v = Vec::new();
        match self.screen {
            Screen::MainMenu => v.push(Visible::new(assets::MENU_BATTLE, region::MENU_BATTLE)),
            Screen::ChapterSelect => {
                v.push(Visible::new(assets::CHAPTER_SELECT, HUD));
                v.push(Visible::new(&assets::map_tile(&self.map), MAP_TILE));
            }
            Screen::MapSummary => v.push(Visible::new(assets::MAP_SUMMARY_GO, region::SUMMARY_GO)),
            Screen::FleetSelect => v.push(Visible::new(assets::FLEET_SELECT, region::FLEET_GO)),
            Screen::Map => self.render_map(&mut v),
            Screen::Formation => v.push(Visible::new(assets::FORMATION, HUD)),
            Screen::MoraleAlert => {
                v.push(Visible::new(assets::MORALE_LOW, HUD));
                v.push(Visible::new(assets::MENU_CONFIRM, region::ALERT_CONFIRM));
            }
            Screen::SortAlert => v.push(Visible::new(assets::MENU_SORT, HUD)),
            Screen::Loading => v.push(Visible::new(assets::LOADING, HUD)),
            Screen::Battle => v.push(Visible::new(assets::COMBAT_PAUSE, HUD)),
            Screen::TouchToContinue => v.push(Visible::new(assets::TOUCH_TO_CONTINUE, HUD)),
            Screen::Drop => v.push(Visible::new(assets::DROP_SSR, HUD)),
            Screen::CombatConfirm => v.push(Visible::new(assets::COMBAT_CONFIRM, region::COMBAT_END_CONFIRM)),
            Screen::Defeat => v.push(Visible::new(assets::DEFEAT_CLOSE, DEFEAT_CLOSE_BUTTON)),
            Screen::StageClear | Screen::RetreatConfirm => {
                v.push(Visible::new(assets::MENU_CONFIRM, region::ALERT_CONFIRM))
            }
            Screen::ItemFound => v.push(Visible::new(assets::MENU_ITEM_FOUND, HUD)),
            Screen::AmbushPrompt => v.push(Visible::new(assets::AMBUSH_EVADE, region::AMBUSH_EVADE)),
            Screen::AmbushFailed => v.push(Visible::new(assets::AMBUSH_FAILED, HUD)),
        }
        v
    }

    fn render_map(&self, v: &mut Vec<Visible>) {
        v.push(Visible::new(assets::RETREAT_BUTTON, region::RETREAT));
        if self.commission {
            v.push(Visible::new(assets::COMMISSION_CONFIRM, region::COMMISSION_CONFIRM));
            return;
        }

        if self.ammo_on_chapter_icon {
            v.push(Visible::new(
                assets::FLEET_AMMO,
                Region::new(CHAPTER_ICON.x, CHAPTER_ICON.y, 60, 60),
            ));
        }
        let ship = self.to_screen(self.fleet);
        let ammo = ship.offset(-140, -225);
        v.push(Visible::new(assets::FLEET_AMMO, Region::new(ammo.x, ammo.y, 60, 60)));
        let arrow = ship.offset(-25, -320);
        v.push(Visible::new(assets::FLEET_ARROW, Region::new(arrow.x, arrow.y, 50, 50)));

        let (ex, ey) = marker_anchor(assets::ENEMY_1_DOWN).unwrap_or((0, 0));
        for enemy in self.enemies.iter().filter(|e| e.alive) {
            let p = self.to_screen(enemy.at).offset(-ex, -ey);
            v.push(Visible::new(assets::ENEMY_1_DOWN, Region::new(p.x, p.y, 60, 60)).scored(enemy.score));
        }
        if let Some(boss) = self.boss.as_ref().filter(|b| b.alive) {
            let (bx, by) = marker_anchor(assets::BOSS).unwrap_or((0, 0));
            let p = self.to_screen(boss.at).offset(-bx, -by);
            v.push(Visible::new(assets::BOSS, Region::new(p.x, p.y, 100, 50)));
        }
        let (mx, my) = marker_anchor(assets::QUESTION_MARK).unwrap_or((0, 0));
        for (at, _) in self.mystery.iter().filter(|(_, collected)| !collected) {
            let p = self.to_screen(*at).offset(-mx, -my);
            v.push(Visible::new(assets::QUESTION_MARK, Region::new(p.x, p.y, 40, 40)));
        }
        match self.overlay {
            Some(Overlay::UnableReach) => v.push(Visible::new(assets::UNABLE_REACH, HUD)),
            Some(Overlay::UnableBattle) => v.push(Visible::new(assets::UNABLE_BATTLE, HUD)),
            None => {}
        }
    }

    /// Time passes by one capture.
    fn advance(&mut self) {
        match self.screen {
            Screen::Map => {
                if self.overlay == Some(Overlay::UnableReach) {
                    self.overlay = None;
                }
                if let Some((dest, Some(left))) = self.moving {
                    if left <= 1 {
                        self.arrive(dest);
                    } else {
                        self.moving = Some((dest, Some(left - 1)));
                    }
                }
            }
            Screen::Loading => {
                self.screen = Screen::Battle;
                self.battle_ticks = BATTLE_TICKS;
            }
            Screen::Battle => {
                if self.battle_ticks <= 1 {
                    self.screen = match self.script {
                        BattleScript::DefeatSwitch | BattleScript::DefeatTotal => Screen::Defeat,
                        BattleScript::Win | BattleScript::WinWithDrop => Screen::TouchToContinue,
                    };
                } else {
                    self.battle_ticks -= 1;
                }
            }
            _ => {}
        }
    }

    fn arrive(&mut self, dest: Dest) {
        self.moving = None;
        match dest {
            Dest::Enemy(_) | Dest::Boss => {
                self.fight = Some(dest);
                self.screen = Screen::Formation;
            }
            Dest::Mystery(i) => {
                self.mystery[i].1 = true;
                self.fleet = self.mystery[i].0;
                self.screen = Screen::ItemFound;
            }
        }
    }

    fn on_tap(&mut self, at: Point) {
        match self.screen {
            Screen::MainMenu => {
                if region::MENU_BATTLE.contains(at) {
                    self.screen = Screen::ChapterSelect;
                }
            }
            Screen::ChapterSelect => {
                if MAP_TILE.contains(at) {
                    self.screen = Screen::MapSummary;
                } else if region::NAV_BACK.contains(at) {
                    self.screen = Screen::MainMenu;
                }
            }
            Screen::MapSummary => {
                if region::SUMMARY_GO.contains(at) {
                    self.screen = Screen::FleetSelect;
                }
            }
            Screen::FleetSelect => {
                if region::FLEET_GO.contains(at) {
                    self.reset_map();
                    self.screen = Screen::Map;
                }
            }
            Screen::Map => self.tap_map(at),
            Screen::Formation => {
                if region::COMBAT_START.contains(at) {
                    self.start_battle();
                } else if region::NAV_BACK.contains(at) {
                    self.fight = None;
                    self.screen = Screen::Map;
                }
            }
            Screen::MoraleAlert => {
                if region::ALERT_CANCEL.contains(at) {
                    self.screen = Screen::Formation;
                } else if region::ALERT_CONFIRM.contains(at) {
                    self.begin_battle();
                }
            }
            Screen::SortAlert => {
                if region::ALERT_CANCEL.contains(at) {
                    self.screen = Screen::Formation;
                }
            }
            Screen::TouchToContinue => {
                self.screen = if self.script == BattleScript::WinWithDrop {
                    Screen::Drop
                } else {
                    Screen::CombatConfirm
                };
            }
            Screen::Drop => self.screen = Screen::CombatConfirm,
            Screen::CombatConfirm => {
                if region::COMBAT_END_CONFIRM.contains(at) {
                    self.win();
                }
            }
            Screen::Defeat => self.defeat(),
            Screen::StageClear => self.screen = Screen::ChapterSelect,
            Screen::RetreatConfirm => {
                self.screen = if region::ALERT_CONFIRM.contains(at) {
                    Screen::ChapterSelect
                } else {
                    Screen::Map
                };
            }
            Screen::ItemFound => self.screen = Screen::Map,
            Screen::AmbushPrompt => {
                if region::AMBUSH_EVADE.contains(at) {
                    self.screen = if self.evades { Screen::Map } else { Screen::AmbushFailed };
                }
            }
            Screen::AmbushFailed => {
                if region::COMBAT_START.contains(at) {
                    self.moving = None;
                    self.fight = None;
                    self.begin_battle();
                }
            }
            Screen::Loading | Screen::Battle => {}
        }
    }

    fn tap_map(&mut self, at: Point) {
        if self.commission {
            if region::COMMISSION_CONFIRM.contains(at) {
                self.commission = false;
            }
            return;
        }
        if self.overlay == Some(Overlay::UnableBattle) {
            self.overlay = None;
            return;
        }
        if region::RETREAT.contains(at) {
            self.screen = Screen::RetreatConfirm;
            return;
        }

        let Some(dest) = self.dest_at(at) else {
            return;
        };
        if !self.reachable(dest) {
            self.overlay = Some(Overlay::UnableReach);
            return;
        }
        if matches!(self.moving, Some((current, _)) if current == dest) {
            return;
        }
        let ticks = match dest {
            Dest::Enemy(i) if !self.enemies[i].arrives => None,
            _ => Some(MOVE_TICKS),
        };
        self.moving = Some((dest, ticks));
        if let Some(evades) = self.ambush.take() {
            self.evades = evades;
            self.screen = Screen::AmbushPrompt;
        }
    }

    fn dest_at(&self, at: Point) -> Option<Dest> {
        let near = |world: Point| self.to_screen(world).approx_eq(at, TILE_RADIUS);
        if let Some(i) = self.enemies.iter().position(|e| e.alive && near(e.at)) {
            return Some(Dest::Enemy(i));
        }
        if self.boss.as_ref().is_some_and(|b| b.alive && near(b.at)) {
            return Some(Dest::Boss);
        }
        self.mystery
            .iter()
            .position(|(p, collected)| !collected && near(*p))
            .map(Dest::Mystery)
    }

    fn reachable(&self, dest: Dest) -> bool {
        match dest {
            Dest::Enemy(i) => self.enemies[i].reachable,
            Dest::Boss => match self.boss.as_ref().and_then(|b| b.blocked_by) {
                Some(blocker) => !self.enemies[blocker].alive,
                None => true,
            },
            Dest::Mystery(_) => true,
        }
    }

    fn start_battle(&mut self) {
        if self.roster_full {
            self.screen = Screen::SortAlert;
        } else if self.morale_low {
            self.screen = Screen::MoraleAlert;
        } else {
            self.begin_battle();
        }
    }

    fn begin_battle(&mut self) {
        self.script = self.battles.pop_front().unwrap_or(BattleScript::Win);
        self.screen = Screen::Loading;
    }

    fn win(&mut self) {
        self.kills += 1;
        self.screen = Screen::Map;
        match self.fight.take() {
            Some(Dest::Enemy(i)) => {
                self.enemies[i].alive = false;
                self.fleet = self.enemies[i].at;
            }
            Some(Dest::Boss) => {
                if let Some(boss) = self.boss.as_mut() {
                    boss.alive = false;
                    self.fleet = boss.at;
                }
                self.screen = Screen::StageClear;
            }
            Some(Dest::Mystery(_)) | None => {}
        }
    }

    fn defeat(&mut self) {
        self.fight = None;
        self.moving = None;
        self.screen = Screen::Map;
        if self.script == BattleScript::DefeatTotal {
            self.overlay = Some(Overlay::UnableBattle);
        }
    }
}

#[derive(Clone)]
pub struct SimGame {
    state: Arc<Mutex<SimState>>,
}

impl SimGame {
    /// Map 3-4 with three enemies between the fleet and a boss near the
    /// screen center. Starts on the main menu.
    pub fn new() -> Self {
        let layout = Layout {
            fleet: Point::new(400, 800),
            enemies: vec![
                SimEnemy::at(700, 500),
                SimEnemy::at(1100, 700),
                SimEnemy::at(1500, 400),
            ],
            boss: Some(SimBoss {
                at: Point::new(1150, 420),
                blocked_by: None,
                alive: true,
            }),
            mystery: Vec::new(),
        };
        let mut state = SimState {
            screen: Screen::MainMenu,
            overlay: None,
            map: "3-4".to_string(),
            enemies: Vec::new(),
            boss: None,
            mystery: Vec::new(),
            fleet: layout.fleet,
            camera: Point::new(0, 0),
            morale_low: false,
            roster_full: false,
            commission: false,
            ammo_on_chapter_icon: false,
            ambush: None,
            battles: VecDeque::new(),
            kills: 0,
            taps: Vec::new(),
            swipes: Vec::new(),
            layout,
            moving: None,
            fight: None,
            script: BattleScript::Win,
            battle_ticks: 0,
            evades: true,
            frames: Vec::new(),
        };
        state.reset_map();
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    pub fn with_enemies(self, enemies: Vec<SimEnemy>) -> Self {
        self.edit_layout(|l| l.enemies = enemies);
        self
    }

    pub fn with_boss(self, boss: Option<SimBoss>) -> Self {
        self.edit_layout(|l| l.boss = boss);
        self
    }

    pub fn with_mystery(self, nodes: Vec<Point>) -> Self {
        self.edit_layout(|l| l.mystery = nodes);
        self
    }

    pub fn with_battles(self, battles: Vec<BattleScript>) -> Self {
        self.state().battles = battles.into();
        self
    }

    /// Skip map entry: start on the freshly entered map.
    pub fn on_map(self) -> Self {
        {
            let mut state = self.state();
            state.reset_map();
            state.screen = Screen::Map;
        }
        self
    }

    pub fn state(&self) -> MutexGuard<'_, SimState> {
        match self.state.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn session(&self, config: Config) -> Session {
        Session::new(Arc::new(config), Box::new(self.clone()), Arc::new(self.clone()))
    }

    /// Taps that landed on a world position in the current camera frame.
    pub fn taps_near(&self, world: Point) -> usize {
        let state = self.state();
        let screen = state.to_screen(world);
        state
            .taps
            .iter()
            .filter(|t| t.approx_eq(screen, TILE_RADIUS))
            .count()
    }

    fn edit_layout(&self, edit: impl FnOnce(&mut Layout)) {
        let mut state = self.state();
        edit(&mut state.layout);
        state.reset_map();
    }
}

impl Device for SimGame {
    fn capture_frame(&mut self) -> Result<GrayImage> {
        let mut state = self.state();
        let visible = state.render();
        state.frames.push(visible);
        let index = state.frames.len() - 1;
        state.advance();
        Ok(encode_frame(index))
    }

    fn tap(&mut self, at: Point, _hold_ms: u32) -> Result<()> {
        let mut state = self.state();
        state.taps.push(at);
        state.on_tap(at);
        Ok(())
    }

    fn swipe(&mut self, from: Point, to: Point, _duration_ms: u32) -> Result<()> {
        let mut state = self.state();
        state.swipes.push((from, to));
        state.camera = state.camera.offset(to.x - from.x, to.y - from.y);
        Ok(())
    }
}

impl Recognizer for SimGame {
    fn detect(&self, frame: &Frame, asset: &str, similarity: f32) -> Option<Region> {
        let state = self.state();
        matches(&state.frames, frame, asset, similarity).map(|v| v.region).next()
    }

    fn detect_all(&self, frame: &Frame, asset: &str, similarity: f32, _use_mask: bool) -> Vec<Point> {
        let state = self.state();
        matches(&state.frames, frame, asset, similarity)
            .map(|v| v.region.origin())
            .collect()
    }

    fn detect_scaled(&self, frame: &Frame, asset: &str, similarity: f32, _low: f32, _high: f32) -> Option<Region> {
        self.detect(frame, asset, similarity)
    }
}

struct Script {
    pending: VecDeque<Vec<&'static str>>,
    last: Vec<&'static str>,
    frames: Vec<Vec<Visible>>,
    taps: Vec<Point>,
}

/// Replays one list of visible assets per capture; the last list repeats.
/// Every asset sits in the same HUD region.
#[derive(Clone)]
pub struct ScriptedScreens {
    script: Arc<Mutex<Script>>,
}

impl ScriptedScreens {
    pub fn new(screens: Vec<Vec<&'static str>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(Script {
                pending: screens.into(),
                last: Vec::new(),
                frames: Vec::new(),
                taps: Vec::new(),
            })),
        }
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        match self.script.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    pub fn session(&self, config: Config) -> Session {
        Session::new(Arc::new(config), Box::new(self.clone()), Arc::new(self.clone()))
    }

    pub fn taps(&self) -> Vec<Point> {
        self.script().taps.clone()
    }

    pub fn taps_in(&self, region: Region) -> usize {
        self.script().taps.iter().filter(|t| region.contains(**t)).count()
    }

    pub fn captures(&self) -> usize {
        self.script().frames.len()
    }
}

impl Device for ScriptedScreens {
    fn capture_frame(&mut self) -> Result<GrayImage> {
        let mut script = self.script();
        if let Some(next) = script.pending.pop_front() {
            script.last = next;
        }
        let visible = script.last.iter().map(|a| Visible::new(a, HUD)).collect();
        script.frames.push(visible);
        Ok(encode_frame(script.frames.len() - 1))
    }

    fn tap(&mut self, at: Point, _hold_ms: u32) -> Result<()> {
        self.script().taps.push(at);
        Ok(())
    }

    fn swipe(&mut self, _from: Point, _to: Point, _duration_ms: u32) -> Result<()> {
        Ok(())
    }
}

impl Recognizer for ScriptedScreens {
    fn detect(&self, frame: &Frame, asset: &str, similarity: f32) -> Option<Region> {
        let script = self.script();
        matches(&script.frames, frame, asset, similarity).map(|v| v.region).next()
    }

    fn detect_all(&self, frame: &Frame, asset: &str, similarity: f32, _use_mask: bool) -> Vec<Point> {
        let script = self.script();
        matches(&script.frames, frame, asset, similarity)
            .map(|v| v.region.origin())
            .collect()
    }

    fn detect_scaled(&self, frame: &Frame, asset: &str, similarity: f32, _low: f32, _high: f32) -> Option<Region> {
        self.detect(frame, asset, similarity)
    }
}

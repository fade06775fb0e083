//! Asset identifiers and fixed UI regions (1920x1080 layout).
//!
//! Asset ids are `category/name`; the recognizer resolves them against the
//! configured asset pack.

use crate::geometry::{Point, Region};

// Main menu and map entry
pub const MENU_BATTLE: &str = "menu/button_battle";
pub const MENU_SORT: &str = "menu/button_sort";
pub const MENU_ALERT_INFO: &str = "menu/alert_info";
pub const MENU_ALERT_CLOSE: &str = "menu/alert_close";
pub const MENU_ITEM_FOUND: &str = "menu/item_found";
pub const MENU_CONFIRM: &str = "menu/button_confirm";
pub const CHAPTER_SELECT: &str = "maps/chapter_select";
pub const FLEET_SELECT: &str = "combat/menu_select_fleet";
pub const MAP_SUMMARY_GO: &str = "combat/button_go";
pub const COMMISSION_CONFIRM: &str = "commission/button_confirm";

// Ship drops, by rarity tier
pub const DROP_SSR: &str = "menu/drop_ssr";
pub const DROP_ELITE: &str = "menu/drop_elite";
pub const DROP_RARE: &str = "menu/drop_rare";
pub const DROP_COMMON: &str = "menu/drop_common";

// On the map
pub const RETREAT_BUTTON: &str = "combat/button_retreat";
pub const UNABLE_REACH: &str = "combat/alert_unable_reach";
pub const AMBUSH_EVADE: &str = "combat/button_evade";
pub const AMBUSH_FAILED: &str = "combat/alert_failed_evade";
pub const FORMATION: &str = "combat/menu_formation";
pub const LOADING: &str = "combat/menu_loading";
pub const FLEET_AMMO: &str = "combat/fleet_ammo";
pub const FLEET_ARROW: &str = "combat/fleet_arrow";
pub const QUESTION_MARK: &str = "combat/question_mark";
pub const MORALE_LOW: &str = "combat/alert_morale_low";
pub const UNABLE_BATTLE: &str = "combat/alert_unable_battle";

// Battle resolution
pub const COMBAT_PAUSE: &str = "combat/combat_pause";
pub const TOUCH_TO_CONTINUE: &str = "combat/menu_touch2continue";
pub const ALERT_LOCK: &str = "combat/alert_lock";
pub const COMBAT_CONFIRM: &str = "combat/button_confirm";
pub const DEFEAT_CLOSE: &str = "combat/defeat_close_button";
pub const FLEET_CANNOT_FORM: &str = "combat/alert_fleet_cannot_be_formed";

// Enemy markers
pub const ENEMY_LEVEL: &str = "enemy/fleet_level";
pub const ENEMY_1_DOWN: &str = "enemy/fleet_1_down";
pub const ENEMY_2_DOWN: &str = "enemy/fleet_2_down";
pub const ENEMY_2_UP: &str = "enemy/fleet_2_up";
pub const ENEMY_3_UP: &str = "enemy/fleet_3_up";
pub const ENEMY_3_DOWN: &str = "enemy/fleet_3_down";
pub const BOSS: &str = "enemy/fleet_boss";

// Roster maintenance
pub const MENU_BUILD: &str = "menu/build";
pub const MENU_DOCK: &str = "menu/dock";
pub const RETIRE_SELECTED_NONE: &str = "retirement/selected_none";
pub const RETIRE_EMPTY: &str = "retirement/empty";
pub const RETIRE_BONUS: &str = "retirement/bonus";
pub const RETIRE_ALERT_BONUS: &str = "retirement/alert_bonus";
pub const RETIRE_NO_BATCH: &str = "retirement/no_batch";
pub const RETIRE_DISASSEMBLE: &str = "retirement/button_disassemble";
pub const ENHANCE_FAVORITE: &str = "enhancement/button_favorite";
pub const ENHANCE_DETAILS: &str = "enhancement/menu_details";
pub const ENHANCE_MENU: &str = "enhancement/menu_enhance";
pub const ENHANCE_NO_ITEMS: &str = "enhancement/alert_no_items";
pub const ENHANCE_LEVEL: &str = "enhancement/menu_level";
pub const ENHANCE_DONE: &str = "enhancement/alert_enhanced";

/// Map tile for a chapter level, e.g. `maps/map_3-4`.
pub fn map_tile(map: &str) -> String {
    format!("maps/map_{}", map)
}

pub const SCREEN_CENTER: Point = Point::new(960, 540);

/// Part of the screen where map tiles can be targeted.
pub const MAP_VIEWPORT: Region = Region::new(180, 80, 1740, 897);

/// The static chapter icon in the top-left corner resembles the fleet marker.
pub const CHAPTER_ICON: Point = Point::new(160, 142);
pub const CHAPTER_ICON_TOLERANCE: i32 = 30;

pub mod region {
    use crate::geometry::Region;

    pub const MENU_BATTLE: Region = Region::new(1517, 442, 209, 206);
    pub const FLEET_GO: Region = Region::new(1485, 872, 270, 74);
    pub const SUMMARY_GO: Region = Region::new(1289, 743, 280, 79);
    pub const AMBUSH_EVADE: Region = Region::new(1493, 682, 208, 56);
    pub const COMMISSION_CONFIRM: Region = Region::new(848, 740, 224, 56);
    pub const COMBAT_END_CONFIRM: Region = Region::new(1520, 963, 216, 58);
    pub const COMBAT_START: Region = Region::new(1578, 921, 270, 70);
    pub const NAV_BACK: Region = Region::new(54, 57, 67, 67);
    pub const TAP_TO_CONTINUE: Region = Region::new(661, 840, 598, 203);
    pub const DISMISS_DROP: Region = Region::new(1228, 103, 692, 735);
    pub const LOCK_SHIP: Region = Region::new(1086, 739, 200, 55);
    pub const CLOSE_INFO_DIALOG: Region = Region::new(1319, 217, 47, 47);
    pub const RETREAT: Region = Region::new(1130, 985, 243, 60);
    pub const ALERT_CONFIRM: Region = Region::new(1065, 732, 235, 68);
    pub const ALERT_CANCEL: Region = Region::new(613, 731, 241, 69);

    pub const SORT_RETIRE: Region = Region::new(550, 750, 215, 64);
    pub const SORT_ENHANCE: Region = Region::new(1155, 750, 215, 64);
    pub const BUILD_MENU: Region = Region::new(1452, 1007, 198, 52);
    pub const RETIRE_TAB: Region = Region::new(20, 661, 115, 99);
    pub const BATCH_RETIRE: Region = Region::new(960, 965, 255, 80);
    pub const CLOSE_BATCH_RETIRE: Region = Region::new(1090, 930, 240, 75);
    pub const CONFIRM_RETIRE: Region = Region::new(1725, 978, 80, 54);
    pub const CONFIRM_SELECTED_SHIPS: Region = Region::new(1412, 938, 218, 61);
    pub const CONFIRM_SELECTED_EQUIPMENT: Region = Region::new(1320, 785, 232, 62);
    pub const DISASSEMBLE: Region = Region::new(1099, 827, 225, 58);
    pub const DOCK: Region = Region::new(297, 1015, 155, 40);
    pub const DOCK_FAVORITE: Region = Region::new(1014, 19, 170, 42);
    pub const DOCK_FIRST_SHIP: Region = Region::new(209, 209, 80, 120);
    pub const ENHANCE_TAB: Region = Region::new(31, 188, 91, 91);
    pub const ENHANCE_FILL: Region = Region::new(1467, 917, 140, 38);
    pub const ENHANCE_CONFIRM: Region = Region::new(1705, 916, 167, 40);
}

/// Camera pans, cycled in order: reveal north, east, south, west.
pub const PANS: [(Point, Point); 4] = [
    (Point::new(960, 240), Point::new(960, 940)),
    (Point::new(1560, 540), Point::new(260, 540)),
    (Point::new(960, 940), Point::new(960, 240)),
    (Point::new(260, 540), Point::new(1560, 540)),
];

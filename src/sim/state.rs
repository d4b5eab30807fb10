//! Scene state and core data model
//!
//! Everything the scene decides on lives in `SceneState`. Visibility of
//! every entity is derived from the location and the ledger flags, never
//! stored next to them.

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::ledger::Ledger;
use super::timers::Timers;
use crate::config::SceneConfig;
use crate::error::SceneError;

/// Store identity (the number in "Store 2")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StoreId(pub u8);

impl fmt::Display for StoreId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One of the fixed set of rooms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomKey {
    #[serde(rename = "room1")]
    Room1,
    #[serde(rename = "room2")]
    Room2,
    #[serde(rename = "room3")]
    Room3,
}

impl RoomKey {
    pub const ALL: [RoomKey; 3] = [RoomKey::Room1, RoomKey::Room2, RoomKey::Room3];

    /// Asset key of the room background
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomKey::Room1 => "room1",
            RoomKey::Room2 => "room2",
            RoomKey::Room3 => "room3",
        }
    }
}

impl fmt::Display for RoomKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where the player is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Location {
    Hub,
    InRoom { room: RoomKey, store: StoreId },
}

impl Location {
    pub fn room(&self) -> Option<RoomKey> {
        match self {
            Location::Hub => None,
            Location::InRoom { room, .. } => Some(*room),
        }
    }

    pub fn is_hub(&self) -> bool {
        matches!(self, Location::Hub)
    }
}

/// A store in the hub. Immutable after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Store {
    pub id: StoreId,
    pub name: String,
    pub pos: Vec2,
    pub half_extents: Vec2,
    pub entry_point: Vec2,
    pub room: RoomKey,
}

/// Index of a collectible in the ledger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CollectibleId(pub u32);

/// A collectible bound to one room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Collectible {
    pub id: CollectibleId,
    pub name: String,
    pub room: RoomKey,
    pub pos: Vec2,
    /// Monotonic: only a reset clears it
    pub collected: bool,
    /// Pickup detection is live (set by the arming timer)
    pub armed: bool,
}

/// Monster encounter phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MonsterState {
    /// Not shown in any room
    #[default]
    Dormant,
    /// Visible in its room, obstructs the player
    Blocking,
    /// Terminal for the session
    Defeated,
}

/// The monster slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Monster {
    pub room: RoomKey,
    pub pos: Vec2,
    pub radius: f32,
    pub state: MonsterState,
}

impl Monster {
    pub fn is_blocking(&self) -> bool {
        self.state == MonsterState::Blocking
    }

    pub fn is_defeated(&self) -> bool {
        self.state == MonsterState::Defeated
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProjectileId(pub u32);

/// A fired shot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: ProjectileId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub spawned_ms: u64,
    pub ttl_ms: u64,
}

impl Projectile {
    pub fn expired(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.spawned_ms) >= self.ttl_ms
    }
}

/// The player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// `None` until the first shot
    pub last_shot_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub u32);

/// Transient HUD message content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MessageKind {
    Collected { name: String },
    MonsterWarning,
    MonsterDefeated,
}

impl MessageKind {
    pub fn text(&self) -> String {
        match self {
            MessageKind::Collected { name } => format!("Collected {}!", name),
            MessageKind::MonsterWarning => "A monster blocks the way! Press F to shoot".to_string(),
            MessageKind::MonsterDefeated => "Monster defeated!".to_string(),
        }
    }
}

/// A transient message currently on screen
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub kind: MessageKind,
}

/// Per-store hub highlight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StoreHighlight {
    #[default]
    None,
    /// Within the highlight radius
    Near,
    /// Pressed against the store body
    Touching,
}

/// Hub interaction hint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hint {
    Teleport,
    EnterStore,
}

impl Hint {
    pub fn text(&self) -> &'static str {
        match self {
            Hint::Teleport => "Press SPACE to teleport to room",
            Hint::EnterStore => "Press SPACE to enter store",
        }
    }
}

/// Complete scene state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneState {
    pub hub_spawn: Vec2,
    pub room_entry: Vec2,
    pub entry_radius: f32,
    pub highlight_radius: f32,
    /// Stores, sorted by id
    pub stores: Vec<Store>,
    pub location: Location,
    pub player: Player,
    pub ledger: Ledger,
    pub monster: Option<Monster>,
    /// Live projectiles, sorted by id
    pub projectiles: Vec<Projectile>,
    /// On-screen transient messages
    pub messages: Vec<Message>,
    pub timers: Timers,
    /// Store border currently flashed
    pub border: Option<StoreId>,
    /// Parallel to `stores`
    pub highlights: Vec<StoreHighlight>,
    pub hint: Option<Hint>,
    /// Confirm key was held last frame
    pub confirm_latch: bool,
    /// Shoot key was held last frame
    pub shoot_latch: bool,
    /// Incremented on every room entry; stale timers compare against it
    pub visit: u32,
    /// Timestamp of the previous frame
    pub last_frame_ms: Option<u64>,
    next_id: u32,
}

impl SceneState {
    /// Build the initial state: player in the hub, nothing collected
    pub fn new(config: &SceneConfig) -> Result<Self, SceneError> {
        config.validate()?;

        let mut stores: Vec<Store> = config
            .stores
            .iter()
            .map(|s| Store {
                id: s.id,
                name: s.name.clone(),
                pos: s.position,
                half_extents: s.half_extents,
                entry_point: s.entry_point,
                room: s.room,
            })
            .collect();
        stores.sort_by_key(|s| s.id);

        let monster = config.monster.as_ref().map(|m| Monster {
            room: m.room,
            pos: m.position,
            radius: m.radius,
            state: MonsterState::Dormant,
        });

        let highlights = vec![StoreHighlight::None; stores.len()];

        Ok(Self {
            hub_spawn: config.hub_spawn,
            room_entry: config.room_entry,
            entry_radius: config.entry_radius,
            highlight_radius: config.highlight_radius,
            stores,
            location: Location::Hub,
            player: Player {
                pos: config.hub_spawn,
                last_shot_ms: None,
            },
            ledger: Ledger::from_config(config),
            monster,
            projectiles: Vec::new(),
            messages: Vec::new(),
            timers: Timers::default(),
            border: None,
            highlights,
            hint: None,
            confirm_latch: false,
            shoot_latch: false,
            visit: 0,
            last_frame_ms: None,
            next_id: 1,
        })
    }

    /// Allocate a new entity ID (projectiles, messages)
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub fn store(&self, id: StoreId) -> Option<&Store> {
        self.stores.iter().find(|s| s.id == id)
    }

    /// Whether hub-only visuals (stores, labels, title, instructions) show
    pub fn hub_visible(&self) -> bool {
        self.location.is_hub()
    }

    /// Whether the monster should currently be on screen
    pub fn monster_visible(&self) -> bool {
        self.monster.as_ref().is_some_and(|m| {
            m.is_blocking() && self.location.room() == Some(m.room)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = SceneState::new(&SceneConfig::default()).unwrap();
        assert_eq!(state.location, Location::Hub);
        assert_eq!(state.player.pos, Vec2::new(400.0, 400.0));
        assert_eq!(state.ledger.collected_count(), 0);
        assert_eq!(state.ledger.total(), 3);
        assert!(state.hub_visible());
        assert!(!state.monster_visible());
        assert_eq!(
            state.monster.as_ref().map(|m| m.state),
            Some(MonsterState::Dormant)
        );
    }

    #[test]
    fn test_stores_sorted_by_id() {
        let mut config = SceneConfig::default();
        config.stores.reverse();
        let state = SceneState::new(&config).unwrap();
        let ids: Vec<_> = state.stores.iter().map(|s| s.id.0).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_room_key_serializes_lowercase() {
        let json = serde_json::to_string(&RoomKey::Room2).unwrap();
        assert_eq!(json, "\"room2\"");
    }

    #[test]
    fn test_projectile_expiry() {
        let p = Projectile {
            id: ProjectileId(1),
            pos: Vec2::ZERO,
            vel: Vec2::X,
            spawned_ms: 1000,
            ttl_ms: 2000,
        };
        assert!(!p.expired(2999));
        assert!(p.expired(3000));
    }
}

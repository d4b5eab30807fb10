//! Scene layout configuration
//!
//! Stores, rooms, collectibles and the monster slot. The defaults reproduce
//! the shipped mall; a JSON file can override any part of it.

use std::collections::HashSet;
use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::error::SceneError;
use crate::sim::{RoomKey, StoreId};

/// A store in the hub and the room it leads to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    pub id: StoreId,
    /// Label text shown under the store
    pub name: String,
    /// Sprite centre in the hub
    pub position: Vec2,
    /// Half-size of the immovable obstacle body
    pub half_extents: Vec2,
    /// Proximity entry coordinate
    pub entry_point: Vec2,
    pub room: RoomKey,
}

/// The collectible placed in a room
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectibleConfig {
    pub name: String,
    /// Position inside the room
    pub position: Vec2,
}

/// Static per-room configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    pub key: RoomKey,
    pub collectible: Option<CollectibleConfig>,
}

/// The monster encounter slot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonsterConfig {
    pub room: RoomKey,
    pub position: Vec2,
    pub radius: f32,
}

/// Complete scene configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Where the player stands in the hub at start and after leaving a room
    pub hub_spawn: Vec2,
    /// Where the player lands when entering any room
    pub room_entry: Vec2,
    /// Distance from a store's entry point that allows proximity entry
    pub entry_radius: f32,
    /// Distance from a store's centre at which it is highlighted
    pub highlight_radius: f32,
    pub stores: Vec<StoreConfig>,
    pub rooms: Vec<RoomConfig>,
    pub monster: Option<MonsterConfig>,
}

impl Default for SceneConfig {
    fn default() -> Self {
        let store = |id: u8, x: f32, room: RoomKey| StoreConfig {
            id: StoreId(id),
            name: format!("Store {}", id),
            position: Vec2::new(x, 200.0),
            half_extents: Vec2::new(40.0, 30.0),
            entry_point: Vec2::new(x, 280.0),
            room,
        };
        let room = |key: RoomKey, name: &str, x: f32, y: f32| RoomConfig {
            key,
            collectible: Some(CollectibleConfig {
                name: name.to_string(),
                position: Vec2::new(x, y),
            }),
        };

        Self {
            hub_spawn: Vec2::new(400.0, 400.0),
            room_entry: Vec2::new(400.0, 350.0),
            entry_radius: 80.0,
            highlight_radius: 200.0,
            stores: vec![
                store(1, 80.0, RoomKey::Room1),
                store(2, 400.0, RoomKey::Room2),
                store(3, 720.0, RoomKey::Room3),
            ],
            rooms: vec![
                room(RoomKey::Room1, "collectable1", 150.0, 200.0),
                room(RoomKey::Room2, "collectable2", 650.0, 250.0),
                room(RoomKey::Room3, "collectable3", 200.0, 450.0),
            ],
            monster: Some(MonsterConfig {
                room: RoomKey::Room2,
                position: Vec2::new(560.0, 350.0),
                radius: 40.0,
            }),
        }
    }
}

impl SceneConfig {
    /// Parse and validate a JSON config
    pub fn from_json(json: &str) -> Result<Self, SceneError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a JSON file, or the built-in layout when `path` is `None`
    pub fn load(path: Option<&Path>) -> Result<Self, SceneError> {
        match path {
            Some(path) => {
                let json = std::fs::read_to_string(path)?;
                let config = Self::from_json(&json)?;
                log::info!("Loaded scene config from {}", path.display());
                Ok(config)
            }
            None => {
                log::info!("Using default scene config");
                Ok(Self::default())
            }
        }
    }

    /// Check that the store→room table is consistent and exhaustive
    pub fn validate(&self) -> Result<(), SceneError> {
        self.check()
            .inspect_err(|e| log::warn!("Rejected scene config: {}", e))
    }

    fn check(&self) -> Result<(), SceneError> {
        let mut store_ids = HashSet::new();
        for store in &self.stores {
            if !store_ids.insert(store.id) {
                return Err(SceneError::InvalidConfig(format!(
                    "duplicate store id {}",
                    store.id
                )));
            }
        }

        let mut room_keys = HashSet::new();
        for room in &self.rooms {
            if !room_keys.insert(room.key) {
                return Err(SceneError::InvalidConfig(format!(
                    "room {} configured twice",
                    room.key
                )));
            }
        }

        for store in &self.stores {
            if !room_keys.contains(&store.room) {
                return Err(SceneError::InvalidConfig(format!(
                    "{} leads to unconfigured room {}",
                    store.name, store.room
                )));
            }
        }

        let mut names = HashSet::new();
        for collectible in self.rooms.iter().filter_map(|r| r.collectible.as_ref()) {
            if !names.insert(collectible.name.as_str()) {
                return Err(SceneError::InvalidConfig(format!(
                    "duplicate collectible {}",
                    collectible.name
                )));
            }
        }

        if let Some(monster) = &self.monster {
            if !self.stores.iter().any(|s| s.room == monster.room) {
                return Err(SceneError::InvalidConfig(format!(
                    "monster room {} is not reachable from any store",
                    monster.room
                )));
            }
            if monster.radius <= 0.0 {
                return Err(SceneError::InvalidConfig(
                    "monster radius must be positive".to_string(),
                ));
            }
        }

        Ok(())
    }

    /// Number of collectibles across all rooms
    pub fn collectible_count(&self) -> usize {
        self.rooms.iter().filter(|r| r.collectible.is_some()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = SceneConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.stores.len(), 3);
        assert_eq!(config.collectible_count(), 3);
        assert_eq!(config.monster.as_ref().map(|m| m.room), Some(RoomKey::Room2));
    }

    #[test]
    fn test_json_round_trip_keeps_layout() {
        let json = serde_json::to_string(&SceneConfig::default()).unwrap();
        let config = SceneConfig::from_json(&json).unwrap();
        assert_eq!(config.stores[1].position, Vec2::new(400.0, 200.0));
        assert_eq!(config.stores[1].room, RoomKey::Room2);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = SceneConfig::from_json(r#"{ "entry_radius": 50.0 }"#).unwrap();
        assert_eq!(config.entry_radius, 50.0);
        assert_eq!(config.hub_spawn, Vec2::new(400.0, 400.0));
    }

    #[test]
    fn test_rejects_duplicate_store_ids() {
        let mut config = SceneConfig::default();
        config.stores[2].id = StoreId(1);
        assert!(matches!(config.validate(), Err(SceneError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_store_with_unconfigured_room() {
        let mut config = SceneConfig::default();
        config.rooms.retain(|r| r.key != RoomKey::Room3);
        assert!(matches!(config.validate(), Err(SceneError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_unreachable_monster() {
        let mut config = SceneConfig::default();
        config.stores.retain(|s| s.room != RoomKey::Room2);
        config.rooms.retain(|r| r.key != RoomKey::Room2);
        assert!(matches!(config.validate(), Err(SceneError::InvalidConfig(_))));
    }

    #[test]
    fn test_malformed_json_is_parse_error() {
        assert!(matches!(
            SceneConfig::from_json("{ not json"),
            Err(SceneError::ConfigParse(_))
        ));
    }
}

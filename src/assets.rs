//! Asset manifest
//!
//! Every texture the scene declares in `preload`, plus the placeholder the
//! engine should generate when a load fails.

use crate::sim::RoomKey;

/// Colors for placeholder textures
pub mod colors {
    pub const PLAYER: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
    pub const PLAYER_EDGE: [f32; 4] = [0.0, 0.8, 0.0, 1.0];
    pub const STORE: [f32; 4] = [1.0, 0.4, 0.0, 1.0];
    pub const STORE_EDGE: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const COLLECTIBLE: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const COLLECTIBLE_EDGE: [f32; 4] = [1.0, 0.67, 0.0, 1.0];
    pub const ROOM: [f32; 4] = [0.35, 0.35, 0.4, 1.0];
    pub const MONSTER: [f32; 4] = [0.85, 0.1, 0.1, 1.0];
    pub const PROJECTILE: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const FLOOR: [f32; 4] = [0.88, 0.88, 0.88, 1.0];
    pub const FLOOR_EDGE: [f32; 4] = [0.8, 0.8, 0.8, 1.0];
}

/// A filled rectangle with an optional outline, generated in place of a texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaceholderSpec {
    pub width: u32,
    pub height: u32,
    pub fill: [f32; 4],
    pub stroke: Option<[f32; 4]>,
}

/// A texture to load
#[derive(Debug, Clone, PartialEq)]
pub struct AssetDecl {
    pub key: String,
    /// `None` for textures that are always generated (the floor tile)
    pub path: Option<String>,
    pub placeholder: PlaceholderSpec,
}

fn decl(key: &str, path: Option<&str>, placeholder: PlaceholderSpec) -> AssetDecl {
    AssetDecl {
        key: key.to_string(),
        path: path.map(str::to_string),
        placeholder,
    }
}

const PLAYER_PLACEHOLDER: PlaceholderSpec = PlaceholderSpec {
    width: 32,
    height: 32,
    fill: colors::PLAYER,
    stroke: Some(colors::PLAYER_EDGE),
};

const STORE_PLACEHOLDER: PlaceholderSpec = PlaceholderSpec {
    width: 64,
    height: 48,
    fill: colors::STORE,
    stroke: Some(colors::STORE_EDGE),
};

const COLLECTIBLE_PLACEHOLDER: PlaceholderSpec = PlaceholderSpec {
    width: 32,
    height: 32,
    fill: colors::COLLECTIBLE,
    stroke: Some(colors::COLLECTIBLE_EDGE),
};

const ROOM_PLACEHOLDER: PlaceholderSpec = PlaceholderSpec {
    width: 800,
    height: 600,
    fill: colors::ROOM,
    stroke: None,
};

/// Texture key for a store sprite
pub fn store_key(id: crate::sim::StoreId) -> String {
    format!("store{}", id.0)
}

/// Everything the scene loads, in declaration order
pub fn manifest(config: &crate::config::SceneConfig) -> Vec<AssetDecl> {
    let mut assets = vec![
        decl(
            "floor",
            None,
            PlaceholderSpec {
                width: 32,
                height: 32,
                fill: colors::FLOOR,
                stroke: Some(colors::FLOOR_EDGE),
            },
        ),
        decl("player", Some("images/characters/player.png"), PLAYER_PLACEHOLDER),
    ];

    for store in &config.stores {
        let path = format!("images/stores/Store{}.png", store.id.0);
        assets.push(decl(&store_key(store.id), Some(&path), STORE_PLACEHOLDER));
    }

    for room in RoomKey::ALL {
        if config.rooms.iter().any(|r| r.key == room) {
            let path = format!("images/rooms/{}.jpg", capitalize(room.as_str()));
            assets.push(decl(room.as_str(), Some(&path), ROOM_PLACEHOLDER));
        }
    }

    for (i, c) in config
        .rooms
        .iter()
        .filter_map(|r| r.collectible.as_ref())
        .enumerate()
    {
        let path = format!("images/collectables/Collectable{}.png", i + 1);
        assets.push(decl(&c.name, Some(&path), COLLECTIBLE_PLACEHOLDER));
    }

    if config.monster.is_some() {
        assets.push(decl(
            "monster",
            Some("images/characters/monster.png"),
            PlaceholderSpec {
                width: 64,
                height: 64,
                fill: colors::MONSTER,
                stroke: None,
            },
        ));
        assets.push(decl(
            "projectile",
            None,
            PlaceholderSpec {
                width: 8,
                height: 8,
                fill: colors::PROJECTILE,
                stroke: None,
            },
        ));
    }

    assets
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;

    #[test]
    fn test_default_manifest() {
        let assets = manifest(&SceneConfig::default());
        let keys: Vec<&str> = assets.iter().map(|a| a.key.as_str()).collect();
        assert_eq!(
            keys,
            vec![
                "floor",
                "player",
                "store1",
                "store2",
                "store3",
                "room1",
                "room2",
                "room3",
                "collectable1",
                "collectable2",
                "collectable3",
                "monster",
                "projectile",
            ]
        );
    }

    #[test]
    fn test_paths_follow_asset_layout() {
        let assets = manifest(&SceneConfig::default());
        let find = |key: &str| assets.iter().find(|a| a.key == key).unwrap().path.clone();
        assert_eq!(find("room2").as_deref(), Some("images/rooms/Room2.jpg"));
        assert_eq!(find("store3").as_deref(), Some("images/stores/Store3.png"));
        assert_eq!(
            find("collectable1").as_deref(),
            Some("images/collectables/Collectable1.png")
        );
        assert_eq!(find("floor"), None);
    }

    #[test]
    fn test_no_monster_assets_without_monster() {
        let mut config = SceneConfig::default();
        config.monster = None;
        assert!(!manifest(&config).iter().any(|a| a.key == "monster"));
    }
}

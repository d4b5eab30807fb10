//! Intents emitted by the scene logic
//!
//! The sim never touches the engine. Each transition returns a list of
//! intents that an engine adapter turns into sprite, text and timer calls.
//! Continuous positions (player, projectiles) are read straight from the
//! state every frame; intents only carry discrete changes.

use glam::Vec2;

use super::state::{
    CollectibleId, Hint, MessageId, MessageKind, ProjectileId, RoomKey, StoreHighlight, StoreId,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Intent {
    /// Show or hide hub-only visuals: stores, labels, title, instructions
    SetHubVisible(bool),
    ShowRoomBackground(RoomKey),
    DestroyRoomBackground,
    /// Teleport the player sprite
    PlacePlayer(Vec2),
    ShowCollectible { id: CollectibleId, pos: Vec2 },
    HideCollectible(CollectibleId),
    /// Picked up; remove from the scene
    DestroyCollectible(CollectibleId),
    ShowMonster { pos: Vec2, radius: f32 },
    HideMonster,
    DestroyMonster,
    SpawnProjectile { id: ProjectileId, pos: Vec2, vel: Vec2 },
    DestroyProjectile(ProjectileId),
    ShowMessage { id: MessageId, kind: MessageKind },
    DismissMessage(MessageId),
    /// "Collectibles: n/total"
    SetCounter { collected: usize, total: usize },
    SetStoreHighlight { store: StoreId, highlight: StoreHighlight },
    SetHint(Option<Hint>),
    ShowStoreBorder(StoreId),
    ClearStoreBorder,
}

/// HUD counter text
pub fn counter_text(collected: usize, total: usize) -> String {
    format!("Collectibles: {}/{}", collected, total)
}

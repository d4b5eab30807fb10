//! Platform abstraction layer
//!
//! The scene asks the engine for a small set of capabilities:
//! - Asset loading, with a generated placeholder when a load fails
//! - Applying intents (sprite visibility, teleports, HUD text)
//!
//! `HeadlessEngine` implements them without any graphics runtime. It keeps
//! an inspectable `SceneView` of what a real engine would show.

use std::collections::{BTreeMap, HashMap, HashSet};

use glam::Vec2;
use thiserror::Error;

use crate::assets::{AssetDecl, PlaceholderSpec};
use crate::sim::{
    CollectibleId, Intent, MessageId, ProjectileId, RoomKey, SceneState, StoreHighlight, StoreId,
    counter_text,
};

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to load {key} from {path}")]
    LoadFailed { key: String, path: String },
    #[error("{0} has no source file")]
    NoSource(String),
}

/// Engine services the scene consumes
pub trait Engine {
    /// Load a texture; an error is never fatal to the scene
    fn load_asset(&mut self, asset: &AssetDecl) -> Result<(), AssetError>;
    /// Generate a texture procedurally under `key`
    fn generate_placeholder(&mut self, key: &str, spec: &PlaceholderSpec);
    /// Carry out one intent
    fn apply(&mut self, intent: &Intent);
    /// Where the player sprite is drawn this frame
    fn sync_player(&mut self, pos: Vec2);
}

/// Where a texture came from
#[derive(Debug, Clone, PartialEq)]
pub enum TextureSource {
    File(String),
    Placeholder(PlaceholderSpec),
}

/// What a renderer would currently show
#[derive(Debug, Clone, Default)]
pub struct SceneView {
    pub hub_visible: bool,
    pub room_background: Option<RoomKey>,
    pub player_pos: Vec2,
    /// Visible collectibles and where
    pub collectibles: HashMap<CollectibleId, Vec2>,
    /// Collectibles removed from the scene for good
    pub destroyed: HashSet<CollectibleId>,
    pub monster: Option<Vec2>,
    pub projectiles: HashSet<ProjectileId>,
    pub messages: HashMap<MessageId, String>,
    pub counter: String,
    pub highlights: BTreeMap<StoreId, StoreHighlight>,
    pub hint: Option<String>,
    pub border: Option<StoreId>,
}

impl SceneView {
    /// Differences between this view and what the state says should show
    pub fn drift_from(&self, state: &SceneState) -> Vec<String> {
        let mut drift = Vec::new();

        if self.hub_visible != state.hub_visible() {
            drift.push(format!("hub visible: view {} state {}", self.hub_visible, state.hub_visible()));
        }
        if self.room_background != state.location.room() {
            drift.push(format!(
                "room background: view {:?} state {:?}",
                self.room_background,
                state.location.room()
            ));
        }
        for c in state.ledger.iter() {
            let shown = self.collectibles.contains_key(&c.id);
            if shown != state.collectible_visible(c.id) {
                drift.push(format!("{} visible: view {}", c.name, shown));
            }
        }
        if self.monster.is_some() != state.monster_visible() {
            drift.push(format!("monster visible: view {}", self.monster.is_some()));
        }
        let live: HashSet<ProjectileId> = state.projectiles.iter().map(|p| p.id).collect();
        if self.projectiles != live {
            drift.push(format!(
                "projectiles: view {} state {}",
                self.projectiles.len(),
                live.len()
            ));
        }
        if self.messages.len() != state.messages.len() {
            drift.push(format!(
                "messages: view {} state {}",
                self.messages.len(),
                state.messages.len()
            ));
        }
        let counter = counter_text(state.ledger.collected_count(), state.ledger.total());
        if self.counter != counter {
            drift.push(format!("counter: view {:?} state {:?}", self.counter, counter));
        }
        for (store, highlight) in state.stores.iter().zip(&state.highlights) {
            let shown = self.highlights.get(&store.id).copied().unwrap_or_default();
            if shown != *highlight {
                drift.push(format!("store {} highlight: view {:?} state {:?}", store.id, shown, highlight));
            }
        }
        let hint = state.hint.map(|h| h.text().to_string());
        if self.hint != hint {
            drift.push(format!("hint: view {:?} state {:?}", self.hint, hint));
        }
        if self.border != state.border {
            drift.push(format!("border: view {:?} state {:?}", self.border, state.border));
        }
        drift
    }
}

/// Engine adapter with no graphics runtime
#[derive(Debug, Default)]
pub struct HeadlessEngine {
    pub textures: HashMap<String, TextureSource>,
    /// Keys whose load should fail
    missing: HashSet<String>,
    pub view: SceneView,
    /// Count of intents applied so far
    pub applied: usize,
}

impl HeadlessEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make loads of these keys fail, as if the files were absent
    pub fn with_missing(keys: &[&str]) -> Self {
        Self {
            missing: keys.iter().map(|k| k.to_string()).collect(),
            ..Self::default()
        }
    }
}

impl Engine for HeadlessEngine {
    fn load_asset(&mut self, asset: &AssetDecl) -> Result<(), AssetError> {
        let Some(path) = &asset.path else {
            return Err(AssetError::NoSource(asset.key.clone()));
        };
        if self.missing.contains(&asset.key) {
            return Err(AssetError::LoadFailed {
                key: asset.key.clone(),
                path: path.clone(),
            });
        }
        self.textures
            .insert(asset.key.clone(), TextureSource::File(path.clone()));
        Ok(())
    }

    fn generate_placeholder(&mut self, key: &str, spec: &PlaceholderSpec) {
        self.textures
            .insert(key.to_string(), TextureSource::Placeholder(*spec));
    }

    fn apply(&mut self, intent: &Intent) {
        self.applied += 1;
        let view = &mut self.view;
        match intent {
            Intent::SetHubVisible(visible) => view.hub_visible = *visible,
            Intent::ShowRoomBackground(room) => view.room_background = Some(*room),
            Intent::DestroyRoomBackground => view.room_background = None,
            Intent::PlacePlayer(pos) => view.player_pos = *pos,
            Intent::ShowCollectible { id, pos } => {
                // A reset brings destroyed collectibles back
                view.destroyed.remove(id);
                view.collectibles.insert(*id, *pos);
            }
            Intent::HideCollectible(id) => {
                view.collectibles.remove(id);
            }
            Intent::DestroyCollectible(id) => {
                view.collectibles.remove(id);
                view.destroyed.insert(*id);
            }
            Intent::ShowMonster { pos, .. } => view.monster = Some(*pos),
            Intent::HideMonster | Intent::DestroyMonster => view.monster = None,
            Intent::SpawnProjectile { id, .. } => {
                view.projectiles.insert(*id);
            }
            Intent::DestroyProjectile(id) => {
                view.projectiles.remove(id);
            }
            Intent::ShowMessage { id, kind } => {
                view.messages.insert(*id, kind.text());
            }
            Intent::DismissMessage(id) => {
                view.messages.remove(id);
            }
            Intent::SetCounter { collected, total } => {
                view.counter = counter_text(*collected, *total);
            }
            Intent::SetStoreHighlight { store, highlight } => {
                view.highlights.insert(*store, *highlight);
            }
            Intent::SetHint(hint) => view.hint = hint.map(|h| h.text().to_string()),
            Intent::ShowStoreBorder(store) => view.border = Some(*store),
            Intent::ClearStoreBorder => view.border = None,
        }
    }

    fn sync_player(&mut self, pos: Vec2) {
        self.view.player_pos = pos;
    }
}

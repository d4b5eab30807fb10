//! Collectible ledger
//!
//! The `collected` flags here are the single source of truth. Whether a
//! collectible is on screen follows from them plus the player's location:
//! visible iff the player is in its room and it is not collected.

use serde::{Deserialize, Serialize};

use super::collision::circles_overlap;
use super::intent::Intent;
use super::messages::show_message;
use super::state::{Collectible, CollectibleId, MessageKind, RoomKey, SceneState};
use super::timers::TimerAction;
use crate::config::SceneConfig;
use crate::consts::{COLLECTIBLE_RADIUS, PICKUP_ARM_DELAY_MS, PLAYER_RADIUS};

/// Outcome of a pickup attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickupOutcome {
    Collected,
    /// Idempotent no-op
    AlreadyCollected,
    /// Visible but the arming delay has not elapsed
    NotArmed,
    /// Not in the current room
    NotPresent,
}

/// Collected flags for every collectible, indexed by `CollectibleId`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    entries: Vec<Collectible>,
}

impl Ledger {
    pub fn from_config(config: &SceneConfig) -> Self {
        let entries = config
            .rooms
            .iter()
            .filter_map(|room| room.collectible.as_ref().map(|c| (room.key, c)))
            .enumerate()
            .map(|(i, (room, c))| Collectible {
                id: CollectibleId(i as u32),
                name: c.name.clone(),
                room,
                pos: c.position,
                collected: false,
                armed: false,
            })
            .collect();
        Self { entries }
    }

    pub fn total(&self) -> usize {
        self.entries.len()
    }

    /// Always recomputed from the flags
    pub fn collected_count(&self) -> usize {
        self.entries.iter().filter(|c| c.collected).count()
    }

    pub fn get(&self, id: CollectibleId) -> Option<&Collectible> {
        self.entries.get(id.0 as usize)
    }

    fn get_mut(&mut self, id: CollectibleId) -> Option<&mut Collectible> {
        self.entries.get_mut(id.0 as usize)
    }

    pub fn by_name(&self, name: &str) -> Option<&Collectible> {
        self.entries.iter().find(|c| c.name == name)
    }

    pub fn for_room(&self, room: RoomKey) -> impl Iterator<Item = &Collectible> {
        self.entries.iter().filter(move |c| c.room == room)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Collectible> {
        self.entries.iter()
    }

    pub fn is_collected(&self, id: CollectibleId) -> bool {
        self.get(id).is_some_and(|c| c.collected)
    }
}

impl SceneState {
    /// Whether a collectible should be on screen right now
    pub fn collectible_visible(&self, id: CollectibleId) -> bool {
        self.ledger
            .get(id)
            .is_some_and(|c| !c.collected && self.location.room() == Some(c.room))
    }
}

/// Counter HUD update, derived from the ledger
pub fn counter_intent(state: &SceneState) -> Intent {
    Intent::SetCounter {
        collected: state.ledger.collected_count(),
        total: state.ledger.total(),
    }
}

/// Show the room's uncollected collectible and schedule pickup arming
pub fn on_room_entered(state: &mut SceneState, room: RoomKey, now_ms: u64, intents: &mut Vec<Intent>) {
    let visit = state.visit;
    let shown: Vec<(CollectibleId, glam::Vec2)> = state
        .ledger
        .for_room(room)
        .filter(|c| !c.collected)
        .map(|c| (c.id, c.pos))
        .collect();

    if shown.is_empty() {
        log::debug!("No collectible to show in {}", room);
    }

    for (id, pos) in shown {
        if let Some(c) = state.ledger.get_mut(id) {
            c.armed = false;
        }
        state.timers.schedule(
            now_ms,
            PICKUP_ARM_DELAY_MS,
            TimerAction::ArmPickup { collectible: id, visit },
        );
        intents.push(Intent::ShowCollectible { id, pos });
        log::debug!("Showing collectible {:?} in {} at {}", id, room, pos);
    }
}

/// Arming timer fired: only valid for the same visit and a still-visible item
pub fn arm_pickup(state: &mut SceneState, id: CollectibleId, visit: u32) -> bool {
    if visit != state.visit || !state.collectible_visible(id) {
        log::debug!("Dropping stale arming for {:?}", id);
        return false;
    }
    match state.ledger.get_mut(id) {
        Some(c) => {
            c.armed = true;
            log::debug!("Pickup armed for {}", c.name);
            true
        }
        None => false,
    }
}

/// Try to pick up a collectible
pub fn attempt_pickup(
    state: &mut SceneState,
    id: CollectibleId,
    now_ms: u64,
    intents: &mut Vec<Intent>,
) -> PickupOutcome {
    let Some(c) = state.ledger.get(id) else {
        return PickupOutcome::NotPresent;
    };
    if c.collected {
        log::debug!("{} already collected", c.name);
        return PickupOutcome::AlreadyCollected;
    }
    if !state.collectible_visible(id) {
        return PickupOutcome::NotPresent;
    }
    if !c.armed {
        return PickupOutcome::NotArmed;
    }

    let name = c.name.clone();
    if let Some(c) = state.ledger.get_mut(id) {
        c.collected = true;
        c.armed = false;
    }
    intents.push(Intent::DestroyCollectible(id));
    show_message(state, MessageKind::Collected { name: name.clone() }, now_ms, intents);
    intents.push(counter_intent(state));
    log::info!(
        "Collected {} ({}/{})",
        name,
        state.ledger.collected_count(),
        state.ledger.total()
    );
    PickupOutcome::Collected
}

/// Pick up any armed collectible the player overlaps
pub fn check_pickups(state: &mut SceneState, now_ms: u64, intents: &mut Vec<Intent>) {
    let Some(room) = state.location.room() else {
        return;
    };
    let player = state.player.pos;
    let touching: Vec<CollectibleId> = state
        .ledger
        .for_room(room)
        .filter(|c| c.armed && !c.collected)
        .filter(|c| circles_overlap(player, PLAYER_RADIUS, c.pos, COLLECTIBLE_RADIUS))
        .map(|c| c.id)
        .collect();
    for id in touching {
        match attempt_pickup(state, id, now_ms, intents) {
            PickupOutcome::Collected => {}
            outcome => log::debug!("Pickup of {:?} skipped: {:?}", id, outcome),
        }
    }
}

/// Hide and disarm every collectible
pub fn on_room_exited(state: &mut SceneState, intents: &mut Vec<Intent>) {
    state
        .timers
        .cancel_where(|a| matches!(a, TimerAction::ArmPickup { .. }));
    for c in state.ledger.entries.iter_mut() {
        c.armed = false;
        if !c.collected {
            intents.push(Intent::HideCollectible(c.id));
        }
    }
}

/// Clear every collected flag. The current room's collectible comes back
/// and re-arms after the usual delay.
pub fn reset_collectibles(state: &mut SceneState, now_ms: u64, intents: &mut Vec<Intent>) {
    state
        .timers
        .cancel_where(|a| matches!(a, TimerAction::ArmPickup { .. }));
    for c in state.ledger.entries.iter_mut() {
        c.collected = false;
        c.armed = false;
    }
    if let Some(room) = state.location.room() {
        on_room_entered(state, room, now_ms, intents);
    }
    intents.push(counter_intent(state));
    log::info!("Collectibles reset to 0/{}", state.ledger.total());
}

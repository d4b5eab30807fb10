//! Hub/room location state machine
//!
//! `Hub` → `InRoom` through `enter_room` (proximity + confirm, or a click on
//! the store sprite), `InRoom` → `Hub` through `exit_room`. Every other
//! combination is rejected as a no-op.

use glam::Vec2;

use super::collision::circle_box_collision;
use super::intent::Intent;
use super::state::{Hint, Location, RoomKey, SceneState, Store, StoreHighlight, StoreId};
use super::timers::TimerAction;
use super::{encounter, ledger};
use crate::consts::{PLAYER_RADIUS, STORE_BORDER_DURATION_MS};
use crate::error::SceneError;

/// Slack added to the player radius when deciding it is touching a store
const TOUCH_SLACK: f32 = 1.0;

/// Look up the room a store leads to
pub fn room_for_store(state: &SceneState, store: StoreId) -> Result<RoomKey, SceneError> {
    state
        .store(store)
        .map(|s| s.room)
        .ok_or(SceneError::UnmappedStore(store))
}

/// Whether the player is pressed against the store body (any face)
fn is_touching(player: Vec2, store: &Store) -> bool {
    circle_box_collision(player, PLAYER_RADIUS + TOUCH_SLACK, store.pos, store.half_extents).hit
}

/// Store that SPACE would enter: one the player is touching, otherwise the
/// nearest store whose entry point is within the entry radius
pub fn store_in_entry_range(state: &SceneState) -> Option<StoreId> {
    let player = state.player.pos;
    if let Some(store) = state.stores.iter().find(|s| is_touching(player, s)) {
        return Some(store.id);
    }
    state
        .stores
        .iter()
        .map(|s| (s.id, s.entry_point.distance(player)))
        .filter(|(_, dist)| *dist <= state.entry_radius)
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

/// Enter the room behind `store`. Returns `Ok(false)` when not in the hub.
pub fn enter_room(
    state: &mut SceneState,
    store: StoreId,
    now_ms: u64,
    intents: &mut Vec<Intent>,
) -> Result<bool, SceneError> {
    if !state.location.is_hub() {
        log::debug!("Ignoring entry to store {} while in a room", store);
        return Ok(false);
    }
    let room = room_for_store(state, store)?;

    state.visit += 1;
    state.location = Location::InRoom { room, store };

    intents.push(Intent::SetHubVisible(false));
    clear_hub_highlights(state, intents);
    intents.push(Intent::ShowRoomBackground(room));

    state.player.pos = state.room_entry;
    intents.push(Intent::PlacePlayer(state.room_entry));

    state.border = Some(store);
    intents.push(Intent::ShowStoreBorder(store));
    state.timers.schedule(
        now_ms,
        STORE_BORDER_DURATION_MS,
        TimerAction::ClearStoreBorder { visit: state.visit },
    );

    ledger::on_room_entered(state, room, now_ms, intents);
    encounter::on_room_entered(state, room, intents);

    log::info!("Entered {} from store {}", room, store);
    Ok(true)
}

/// Return to the hub. Returns false when already there.
pub fn exit_room(state: &mut SceneState, intents: &mut Vec<Intent>) -> bool {
    let Location::InRoom { room, store } = state.location else {
        log::debug!("Ignoring exit while in the hub");
        return false;
    };

    intents.push(Intent::DestroyRoomBackground);
    state.location = Location::Hub;
    intents.push(Intent::SetHubVisible(true));

    state.player.pos = state.hub_spawn;
    intents.push(Intent::PlacePlayer(state.hub_spawn));

    ledger::on_room_exited(state, intents);
    encounter::on_room_exited(state, intents);

    log::info!("Left {} (store {}) for the hub", room, store);
    true
}

/// Border timer fired: only clears the border drawn for the same visit
pub fn clear_store_border(state: &mut SceneState, visit: u32, intents: &mut Vec<Intent>) -> bool {
    if visit != state.visit || state.border.is_none() {
        return false;
    }
    state.border = None;
    intents.push(Intent::ClearStoreBorder);
    true
}

/// Recompute store highlights and the interaction hint (hub only)
pub fn update_hub_highlights(state: &mut SceneState, intents: &mut Vec<Intent>) {
    if !state.location.is_hub() {
        return;
    }
    let player = state.player.pos;
    let radius = state.highlight_radius;
    let next: Vec<StoreHighlight> = state
        .stores
        .iter()
        .map(|s| {
            if is_touching(player, s) {
                StoreHighlight::Touching
            } else if s.pos.distance(player) < radius {
                StoreHighlight::Near
            } else {
                StoreHighlight::None
            }
        })
        .collect();

    for (i, highlight) in next.iter().enumerate() {
        if state.highlights[i] != *highlight {
            intents.push(Intent::SetStoreHighlight {
                store: state.stores[i].id,
                highlight: *highlight,
            });
        }
    }
    state.highlights = next;

    let hint = if state.highlights.contains(&StoreHighlight::Touching) {
        Some(Hint::EnterStore)
    } else if state.highlights.contains(&StoreHighlight::Near) {
        Some(Hint::Teleport)
    } else {
        None
    };
    if hint != state.hint {
        state.hint = hint;
        intents.push(Intent::SetHint(hint));
    }
}

fn clear_hub_highlights(state: &mut SceneState, intents: &mut Vec<Intent>) {
    for (i, highlight) in state.highlights.iter_mut().enumerate() {
        if *highlight != StoreHighlight::None {
            *highlight = StoreHighlight::None;
            intents.push(Intent::SetStoreHighlight {
                store: state.stores[i].id,
                highlight: StoreHighlight::None,
            });
        }
    }
    if state.hint.take().is_some() {
        intents.push(Intent::SetHint(None));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SceneConfig;
    use glam::Vec2;

    fn new_state() -> SceneState {
        SceneState::new(&SceneConfig::default()).unwrap()
    }

    #[test]
    fn test_store_room_table() {
        let state = new_state();
        assert_eq!(room_for_store(&state, StoreId(1)).unwrap(), RoomKey::Room1);
        assert_eq!(room_for_store(&state, StoreId(2)).unwrap(), RoomKey::Room2);
        assert_eq!(room_for_store(&state, StoreId(3)).unwrap(), RoomKey::Room3);
    }

    #[test]
    fn test_unmapped_store_is_an_error() {
        let mut state = new_state();
        let mut intents = Vec::new();
        let result = enter_room(&mut state, StoreId(9), 0, &mut intents);
        assert!(matches!(result, Err(SceneError::UnmappedStore(StoreId(9)))));
        assert_eq!(state.location, Location::Hub);
        assert!(intents.is_empty());
    }

    #[test]
    fn test_enter_room_effects() {
        let mut state = new_state();
        let mut intents = Vec::new();
        assert!(enter_room(&mut state, StoreId(3), 0, &mut intents).unwrap());

        assert_eq!(
            state.location,
            Location::InRoom {
                room: RoomKey::Room3,
                store: StoreId(3)
            }
        );
        assert_eq!(state.player.pos, Vec2::new(400.0, 350.0));
        assert!(intents.contains(&Intent::SetHubVisible(false)));
        assert!(intents.contains(&Intent::ShowRoomBackground(RoomKey::Room3)));
        assert!(intents.contains(&Intent::PlacePlayer(Vec2::new(400.0, 350.0))));
        // No monster in room3
        assert!(!intents.iter().any(|i| matches!(i, Intent::ShowMonster { .. })));
    }

    #[test]
    fn test_enter_then_exit_restores_hub() {
        let mut state = new_state();
        let mut intents = Vec::new();
        enter_room(&mut state, StoreId(1), 0, &mut intents).unwrap();
        intents.clear();
        assert!(exit_room(&mut state, &mut intents));

        assert_eq!(state.location, Location::Hub);
        assert_eq!(state.player.pos, Vec2::new(400.0, 400.0));
        assert!(state.hub_visible());
        assert!(intents.contains(&Intent::SetHubVisible(true)));
        assert!(intents.contains(&Intent::DestroyRoomBackground));
    }

    #[test]
    fn test_invalid_transitions_are_no_ops() {
        let mut state = new_state();
        let mut intents = Vec::new();
        assert!(!exit_room(&mut state, &mut intents));
        enter_room(&mut state, StoreId(1), 0, &mut intents).unwrap();
        intents.clear();
        assert!(!enter_room(&mut state, StoreId(2), 10, &mut intents).unwrap());
        assert!(intents.is_empty());
    }

    #[test]
    fn test_entry_range_picks_nearest_store() {
        let mut state = new_state();
        assert_eq!(store_in_entry_range(&state), None);
        state.player.pos = Vec2::new(390.0, 250.0);
        assert_eq!(store_in_entry_range(&state), Some(StoreId(2)));
        state.player.pos = Vec2::new(100.0, 260.0);
        assert_eq!(store_in_entry_range(&state), Some(StoreId(1)));
    }

    #[test]
    fn test_touching_any_face_allows_entry() {
        let mut state = new_state();
        let mut intents = Vec::new();
        // Right face of store 1 (box spans x 40..120), far from its entry point
        state.player.pos = Vec2::new(136.0, 200.0);
        assert_eq!(store_in_entry_range(&state), Some(StoreId(1)));

        update_hub_highlights(&mut state, &mut intents);
        assert_eq!(state.highlights[0], StoreHighlight::Touching);
        assert_eq!(state.hint, Some(Hint::EnterStore));

        // Top face of store 2
        state.player.pos = Vec2::new(400.0, 154.0);
        assert_eq!(store_in_entry_range(&state), Some(StoreId(2)));
    }

    #[test]
    fn test_highlight_and_hint() {
        let mut state = new_state();
        let mut intents = Vec::new();

        // Spawn is exactly 200 from store 2: not strictly inside
        update_hub_highlights(&mut state, &mut intents);
        assert!(intents.is_empty());

        state.player.pos = Vec2::new(400.0, 300.0);
        update_hub_highlights(&mut state, &mut intents);
        assert!(intents.contains(&Intent::SetStoreHighlight {
            store: StoreId(2),
            highlight: StoreHighlight::Near
        }));
        assert_eq!(state.hint, Some(Hint::Teleport));

        intents.clear();
        state.player.pos = Vec2::new(400.0, 246.0);
        update_hub_highlights(&mut state, &mut intents);
        assert_eq!(state.highlights[1], StoreHighlight::Touching);
        assert_eq!(intents.last(), Some(&Intent::SetHint(Some(Hint::EnterStore))));

        // Unchanged frame emits nothing
        intents.clear();
        update_hub_highlights(&mut state, &mut intents);
        assert!(intents.is_empty());
    }

    #[test]
    fn test_border_timer_checks_visit() {
        let mut state = new_state();
        let mut intents = Vec::new();
        enter_room(&mut state, StoreId(1), 0, &mut intents).unwrap();
        exit_room(&mut state, &mut intents);
        enter_room(&mut state, StoreId(2), 100, &mut intents).unwrap();

        intents.clear();
        assert!(!clear_store_border(&mut state, 1, &mut intents));
        assert_eq!(state.border, Some(StoreId(2)));
        assert!(clear_store_border(&mut state, 2, &mut intents));
        assert_eq!(intents, vec![Intent::ClearStoreBorder]);
    }
}

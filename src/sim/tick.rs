//! Per-frame scene update
//!
//! `tick` is the only entry point the host calls each frame. It takes the
//! raw held-key snapshot, derives edges from the latches kept in the state,
//! fires due timers, and returns the intents produced this frame.

use glam::Vec2;

use super::collision::{circle_box_collision, push_out};
use super::intent::Intent;
use super::state::{Location, MonsterState, SceneState, StoreHighlight, StoreId};
use super::timers::TimerAction;
use super::{encounter, ledger, location, messages};
use crate::consts::*;
use crate::error::SceneError;
use crate::{clamp_to_canvas, held_direction};

/// Input snapshot for a single frame
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    pub down: bool,
    /// Confirm/teleport key held (SPACE)
    pub confirm: bool,
    /// Shoot key held (F)
    pub shoot: bool,
    /// Store sprite clicked this frame
    pub clicked_store: Option<StoreId>,
}

impl FrameInput {
    /// Aim derived from the held directional keys
    pub fn aim(&self) -> Option<Vec2> {
        held_direction(self.left, self.right, self.up, self.down)
    }
}

/// Advance the scene by one frame at time `now_ms`
pub fn tick(
    state: &mut SceneState,
    input: &FrameInput,
    now_ms: u64,
) -> Result<Vec<Intent>, SceneError> {
    // Reject a bad click before anything mutates, so an error leaves the frame unapplied
    if let Some(store) = input.clicked_store {
        if state.location.is_hub() {
            location::room_for_store(state, store)?;
        }
    }

    let mut intents = Vec::new();

    let dt_ms = state
        .last_frame_ms
        .map_or(0, |last| now_ms.saturating_sub(last).min(MAX_FRAME_DELTA_MS));
    state.last_frame_ms = Some(now_ms);
    let dt = dt_ms as f32 / 1000.0;

    fire_timers(state, now_ms, &mut intents);

    // Edge detection: act on the frame a key goes down, never while held
    let confirm_pressed = input.confirm && !state.confirm_latch;
    let shoot_pressed = input.shoot && !state.shoot_latch;
    state.confirm_latch = input.confirm;
    state.shoot_latch = input.shoot;

    let mut transitioned = false;
    if let Some(store) = input.clicked_store {
        if state.location.is_hub() {
            transitioned = location::enter_room(state, store, now_ms, &mut intents)?;
        }
    }
    if confirm_pressed && !transitioned {
        match state.location {
            Location::InRoom { .. } => {
                location::exit_room(state, &mut intents);
            }
            Location::Hub => match location::store_in_entry_range(state) {
                Some(store) => {
                    location::enter_room(state, store, now_ms, &mut intents)?;
                }
                None => log::debug!("Not near any store, cannot teleport"),
            },
        }
    }

    move_player(state, input, dt, now_ms, &mut intents);

    if shoot_pressed {
        match encounter::try_shoot(state, input.aim(), now_ms, &mut intents) {
            encounter::ShotOutcome::Fired(_) => {}
            outcome => log::debug!("Shot not fired: {:?}", outcome),
        }
    }
    encounter::advance_projectiles(state, dt, now_ms, &mut intents);
    ledger::check_pickups(state, now_ms, &mut intents);
    location::update_hub_highlights(state, &mut intents);

    Ok(intents)
}

fn fire_timers(state: &mut SceneState, now_ms: u64, intents: &mut Vec<Intent>) {
    for action in state.timers.take_due(now_ms) {
        match action {
            TimerAction::ArmPickup { collectible, visit } => {
                ledger::arm_pickup(state, collectible, visit);
            }
            TimerAction::DismissMessage(id) => {
                messages::dismiss_message(state, id, intents);
            }
            TimerAction::ClearStoreBorder { visit } => {
                location::clear_store_border(state, visit, intents);
            }
        }
    }
}

/// Integrate held-key velocity, keep inside the canvas, resolve obstacles
fn move_player(
    state: &mut SceneState,
    input: &FrameInput,
    dt: f32,
    now_ms: u64,
    intents: &mut Vec<Intent>,
) {
    // Axes are independent: a diagonal moves at full speed on both
    let vx = if input.left {
        -PLAYER_SPEED
    } else if input.right {
        PLAYER_SPEED
    } else {
        0.0
    };
    let vy = if input.up {
        -PLAYER_SPEED
    } else if input.down {
        PLAYER_SPEED
    } else {
        0.0
    };
    let pos = state.player.pos + Vec2::new(vx, vy) * dt;
    state.player.pos = clamp_to_canvas(pos, PLAYER_RADIUS);

    if state.location.is_hub() {
        // A couple of passes settles corners between adjacent bodies
        for _ in 0..3 {
            let mut pushed = false;
            for store in &state.stores {
                let result =
                    circle_box_collision(state.player.pos, PLAYER_RADIUS, store.pos, store.half_extents);
                if result.hit {
                    state.player.pos = push_out(state.player.pos, &result);
                    pushed = true;
                }
            }
            if !pushed {
                break;
            }
        }
    } else {
        encounter::resolve_player_contact(state, now_ms, intents);
    }
}

/// Put the whole scene back to its initial state
///
/// Pending timers are left in place; each one finds its target gone and
/// does nothing when it fires.
pub fn reset_game(state: &mut SceneState, now_ms: u64) -> Vec<Intent> {
    let mut intents = Vec::new();

    location::exit_room(state, &mut intents);
    messages::clear_messages(state, &mut intents);
    for p in state.projectiles.drain(..) {
        intents.push(Intent::DestroyProjectile(p.id));
    }
    if let Some(monster) = state.monster.as_mut() {
        monster.state = MonsterState::Dormant;
    }
    if state.border.take().is_some() {
        intents.push(Intent::ClearStoreBorder);
    }

    ledger::reset_collectibles(state, now_ms, &mut intents);

    state.player.pos = state.hub_spawn;
    state.player.last_shot_ms = None;
    intents.push(Intent::PlacePlayer(state.hub_spawn));

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

    log::info!("Game reset");
    intents
}

/// One-line summary of location and ledger, also logged at debug level
pub fn debug_summary(state: &SceneState) -> String {
    let items: Vec<String> = state
        .ledger
        .iter()
        .map(|c| {
            format!(
                "{}@{}:{}",
                c.name,
                c.room,
                if c.collected { "collected" } else { "open" }
            )
        })
        .collect();
    let monster = state
        .monster
        .as_ref()
        .map_or("none".to_string(), |m| format!("{:?}", m.state));
    let summary = format!(
        "location={:?} player=({:.0},{:.0}) collected={}/{} [{}] monster={} projectiles={}",
        state.location,
        state.player.pos.x,
        state.player.pos.y,
        state.ledger.collected_count(),
        state.ledger.total(),
        items.join(", "),
        monster,
        state.projectiles.len()
    );
    log::debug!("{}", summary);
    summary
}

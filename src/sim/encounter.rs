//! Monster encounter and projectiles
//!
//! Monster: `Dormant` → `Blocking` on entering its room, back to `Dormant`
//! on leaving, `Blocking` → `Defeated` when a projectile reaches it.
//! `Defeated` is terminal for the session.

use glam::Vec2;

use super::collision::{circle_circle_collision, circles_overlap, push_out};
use super::intent::Intent;
use super::messages::{is_showing, show_message};
use super::state::{MessageKind, MonsterState, Projectile, ProjectileId, RoomKey, SceneState};
use crate::consts::{
    PLAYER_RADIUS, PROJECTILE_RADIUS, PROJECTILE_SPEED, PROJECTILE_TTL_MS, SHOT_COOLDOWN_MS,
};

/// Outcome of a shoot action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShotOutcome {
    Fired(ProjectileId),
    /// Shooting is only allowed inside rooms
    NotInRoom,
    CoolingDown,
}

/// Show the monster if this is its room and it is still undefeated
pub fn on_room_entered(state: &mut SceneState, room: RoomKey, intents: &mut Vec<Intent>) {
    let Some(monster) = state.monster.as_mut() else {
        return;
    };
    if monster.room != room {
        return;
    }
    match monster.state {
        MonsterState::Dormant => {
            monster.state = MonsterState::Blocking;
            intents.push(Intent::ShowMonster {
                pos: monster.pos,
                radius: monster.radius,
            });
            log::info!("Monster blocks {}", room);
        }
        MonsterState::Blocking => {}
        MonsterState::Defeated => log::debug!("Monster in {} already defeated", room),
    }
}

/// Hide an undefeated monster and drop every projectile
pub fn on_room_exited(state: &mut SceneState, intents: &mut Vec<Intent>) {
    if let Some(monster) = state.monster.as_mut() {
        if monster.state == MonsterState::Blocking {
            monster.state = MonsterState::Dormant;
            intents.push(Intent::HideMonster);
        }
    }
    for p in state.projectiles.drain(..) {
        intents.push(Intent::DestroyProjectile(p.id));
    }
}

/// Fire a projectile in `aim` (or rightward when no direction is held)
pub fn try_shoot(
    state: &mut SceneState,
    aim: Option<Vec2>,
    now_ms: u64,
    intents: &mut Vec<Intent>,
) -> ShotOutcome {
    if state.location.is_hub() {
        return ShotOutcome::NotInRoom;
    }
    if let Some(last) = state.player.last_shot_ms {
        // A host clock that steps backwards counts as no time elapsed
        let since = now_ms.saturating_sub(last);
        if since < SHOT_COOLDOWN_MS {
            log::debug!("Shot rejected, {}ms since last", since);
            return ShotOutcome::CoolingDown;
        }
    }

    let dir = aim.unwrap_or(Vec2::X);
    let id = ProjectileId(state.next_entity_id());
    let pos = state.player.pos + dir * (PLAYER_RADIUS + PROJECTILE_RADIUS);
    let vel = dir * PROJECTILE_SPEED;

    state.projectiles.push(Projectile {
        id,
        pos,
        vel,
        spawned_ms: now_ms,
        ttl_ms: PROJECTILE_TTL_MS,
    });
    state.player.last_shot_ms = Some(now_ms);
    intents.push(Intent::SpawnProjectile { id, pos, vel });
    log::debug!("Fired {:?} toward {}", id, dir);
    ShotOutcome::Fired(id)
}

/// Move projectiles, expire them, and resolve hits on the monster
pub fn advance_projectiles(state: &mut SceneState, dt: f32, now_ms: u64, intents: &mut Vec<Intent>) {
    let target = state
        .monster
        .as_ref()
        .filter(|m| m.is_blocking() && state.location.room() == Some(m.room))
        .map(|m| (m.pos, m.radius));

    let mut hit = None;
    let mut survivors = Vec::with_capacity(state.projectiles.len());
    for mut p in state.projectiles.drain(..) {
        p.pos += p.vel * dt;
        if p.expired(now_ms) {
            intents.push(Intent::DestroyProjectile(p.id));
            continue;
        }
        if hit.is_none() {
            if let Some((pos, radius)) = target {
                if circles_overlap(p.pos, PROJECTILE_RADIUS, pos, radius) {
                    hit = Some(p.id);
                    intents.push(Intent::DestroyProjectile(p.id));
                    continue;
                }
            }
        }
        survivors.push(p);
    }
    state.projectiles = survivors;

    if let Some(projectile) = hit {
        defeat_monster(state, now_ms, intents);
        log::debug!("{:?} hit the monster", projectile);
    }
}

fn defeat_monster(state: &mut SceneState, now_ms: u64, intents: &mut Vec<Intent>) {
    let Some(monster) = state.monster.as_mut() else {
        return;
    };
    monster.state = MonsterState::Defeated;
    let room = monster.room;
    intents.push(Intent::DestroyMonster);
    show_message(state, MessageKind::MonsterDefeated, now_ms, intents);
    log::info!("Monster in {} defeated", room);
}

/// Keep the player out of a blocking monster; warn on contact
pub fn resolve_player_contact(state: &mut SceneState, now_ms: u64, intents: &mut Vec<Intent>) {
    if !state.monster_visible() {
        return;
    }
    let Some((pos, radius)) = state.monster.as_ref().map(|m| (m.pos, m.radius)) else {
        return;
    };
    let result = circle_circle_collision(state.player.pos, PLAYER_RADIUS, pos, radius);
    if !result.hit {
        return;
    }
    state.player.pos = push_out(state.player.pos, &result);
    if !is_showing(state, &MessageKind::MonsterWarning) {
        show_message(state, MessageKind::MonsterWarning, now_ms, intents);
    }
}

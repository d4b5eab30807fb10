//! Transient HUD messages

use super::intent::Intent;
use super::state::{Message, MessageId, MessageKind, SceneState};
use super::timers::TimerAction;
use crate::consts::MESSAGE_DURATION_MS;

/// Put a message on screen and schedule its removal
pub fn show_message(
    state: &mut SceneState,
    kind: MessageKind,
    now_ms: u64,
    intents: &mut Vec<Intent>,
) -> MessageId {
    let id = MessageId(state.next_entity_id());
    log::debug!("Message {:?}: {}", id, kind.text());
    state.messages.push(Message {
        id,
        kind: kind.clone(),
    });
    state
        .timers
        .schedule(now_ms, MESSAGE_DURATION_MS, TimerAction::DismissMessage(id));
    intents.push(Intent::ShowMessage { id, kind });
    id
}

/// Remove a message if it is still on screen; returns whether it was
pub fn dismiss_message(state: &mut SceneState, id: MessageId, intents: &mut Vec<Intent>) -> bool {
    let before = state.messages.len();
    state.messages.retain(|m| m.id != id);
    if state.messages.len() == before {
        log::debug!("Message {:?} already gone", id);
        return false;
    }
    intents.push(Intent::DismissMessage(id));
    true
}

/// Whether a message of this kind is currently shown
pub fn is_showing(state: &SceneState, kind: &MessageKind) -> bool {
    state.messages.iter().any(|m| &m.kind == kind)
}

/// Drop every message at once (full reset)
pub fn clear_messages(state: &mut SceneState, intents: &mut Vec<Intent>) {
    for message in state.messages.drain(..) {
        intents.push(Intent::DismissMessage(message.id));
    }
}

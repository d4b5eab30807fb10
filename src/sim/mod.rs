//! Deterministic scene logic
//!
//! All gameplay decisions live here. This module must stay pure:
//! - Time only arrives as the `now_ms` passed to `tick`
//! - Stable iteration order (stores by id, entities by allocation)
//! - No engine, rendering or platform dependencies

pub mod collision;
pub mod encounter;
pub mod intent;
pub mod ledger;
pub mod location;
pub mod messages;
pub mod state;
pub mod tick;
pub mod timers;

pub use collision::{CollisionResult, circle_box_collision, circle_circle_collision, circles_overlap};
pub use encounter::{ShotOutcome, try_shoot};
pub use intent::{Intent, counter_text};
pub use ledger::{Ledger, PickupOutcome, attempt_pickup, reset_collectibles};
pub use location::{enter_room, exit_room, room_for_store};
pub use state::{
    Collectible, CollectibleId, Hint, Location, Message, MessageId, MessageKind, Monster,
    MonsterState, Player, Projectile, ProjectileId, RoomKey, SceneState, Store, StoreHighlight,
    StoreId,
};
pub use tick::{FrameInput, debug_summary, reset_game, tick};
pub use timers::{TimerAction, TimerId, Timers};

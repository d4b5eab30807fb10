//! Host-facing scene lifecycle
//!
//! `MallScene` glues configuration, the pure `sim` core and an `Engine`
//! together. The host calls `preload` once, `create` once, then `update`
//! every frame with the current input snapshot.

use crate::assets::manifest;
use crate::config::SceneConfig;
use crate::error::SceneError;
use crate::platform::Engine;
use crate::sim::{FrameInput, Intent, SceneState, debug_summary, reset_collectibles, reset_game, tick};

pub struct MallScene<E: Engine> {
    config: SceneConfig,
    state: SceneState,
    engine: E,
}

impl<E: Engine> MallScene<E> {
    /// Validate the configuration and build the initial state
    pub fn new(config: SceneConfig, engine: E) -> Result<Self, SceneError> {
        let state = SceneState::new(&config)?;
        Ok(Self {
            config,
            state,
            engine,
        })
    }

    /// Declare every asset; failed loads get a generated placeholder.
    /// Returns how many placeholders were generated.
    pub fn preload(&mut self) -> usize {
        let mut placeholders = 0;
        for asset in manifest(&self.config) {
            if let Err(e) = self.engine.load_asset(&asset) {
                if asset.path.is_some() {
                    log::warn!("{}, using placeholder", e);
                }
                self.engine.generate_placeholder(&asset.key, &asset.placeholder);
                placeholders += 1;
            }
        }
        log::info!("Preload done, {} placeholder textures", placeholders);
        placeholders
    }

    /// Start the session: fresh state, hub on screen, counter at zero
    pub fn create(&mut self) -> Result<(), SceneError> {
        self.state = SceneState::new(&self.config)?;
        let intents = [
            Intent::SetHubVisible(true),
            Intent::PlacePlayer(self.state.player.pos),
            Intent::SetCounter {
                collected: 0,
                total: self.state.ledger.total(),
            },
        ];
        self.apply(&intents);
        log::info!(
            "Scene created: {} stores, {} collectibles",
            self.state.stores.len(),
            self.state.ledger.total()
        );
        Ok(())
    }

    /// Advance one frame
    pub fn update(&mut self, input: &FrameInput, now_ms: u64) -> Result<(), SceneError> {
        let intents = tick(&mut self.state, input, now_ms)?;
        self.apply(&intents);
        self.engine.sync_player(self.state.player.pos);
        Ok(())
    }

    /// Debug hook: forget what has been collected
    pub fn reset_collectibles(&mut self, now_ms: u64) {
        let mut intents = Vec::new();
        reset_collectibles(&mut self.state, now_ms, &mut intents);
        self.apply(&intents);
    }

    /// Debug hook: back to the state right after `create`
    pub fn reset_game(&mut self, now_ms: u64) {
        let intents = reset_game(&mut self.state, now_ms);
        self.apply(&intents);
    }

    pub fn debug_summary(&self) -> String {
        debug_summary(&self.state)
    }

    pub fn state(&self) -> &SceneState {
        &self.state
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    fn apply(&mut self, intents: &[Intent]) {
        for intent in intents {
            self.engine.apply(intent);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::{HeadlessEngine, TextureSource};
    use crate::sim::{Location, MonsterState, RoomKey, StoreId};
    use glam::Vec2;
    use proptest::prelude::*;

    const FRAME_MS: u64 = 16;

    fn new_scene() -> MallScene<HeadlessEngine> {
        let mut scene = MallScene::new(SceneConfig::default(), HeadlessEngine::new()).unwrap();
        scene.preload();
        scene.create().unwrap();
        scene
    }

    fn assert_no_drift(scene: &MallScene<HeadlessEngine>) {
        let drift = scene.engine().view.drift_from(scene.state());
        assert!(drift.is_empty(), "view drifted: {:?}", drift);
    }

    /// Run `frames` frames of `input`, checking the view after each one
    fn run(scene: &mut MallScene<HeadlessEngine>, input: &FrameInput, mut now: u64, frames: u32) -> u64 {
        for _ in 0..frames {
            now += FRAME_MS;
            scene.update(input, now).unwrap();
            assert_no_drift(scene);
        }
        now
    }

    #[test]
    fn test_missing_assets_get_placeholders() {
        let engine = HeadlessEngine::with_missing(&["room2", "monster"]);
        let mut scene = MallScene::new(SceneConfig::default(), engine).unwrap();
        // floor and projectile are always generated
        assert_eq!(scene.preload(), 4);

        let textures = &scene.engine().textures;
        assert!(matches!(textures.get("room2"), Some(TextureSource::Placeholder(_))));
        assert!(matches!(textures.get("room1"), Some(TextureSource::File(_))));
        assert!(matches!(textures.get("floor"), Some(TextureSource::Placeholder(_))));
        assert_eq!(textures.len(), manifest(&SceneConfig::default()).len());
    }

    #[test]
    fn test_create_shows_hub() {
        let scene = new_scene();
        let view = &scene.engine().view;
        assert!(view.hub_visible);
        assert_eq!(view.counter, "Collectibles: 0/3");
        assert_eq!(view.player_pos, Vec2::new(400.0, 400.0));
        assert_no_drift(&scene);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = SceneConfig::default();
        config.stores[1].id = StoreId(1);
        assert!(matches!(
            MallScene::new(config, HeadlessEngine::new()),
            Err(SceneError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_full_session() {
        let mut scene = new_scene();
        let mut now = 0;

        // Walk up to store 2 and teleport
        let up = FrameInput {
            up: true,
            ..Default::default()
        };
        now = run(&mut scene, &up, now, 50);
        let confirm = FrameInput {
            confirm: true,
            ..Default::default()
        };
        now = run(&mut scene, &confirm, now, 1);
        assert_eq!(
            scene.state().location,
            Location::InRoom {
                room: RoomKey::Room2,
                store: StoreId(2)
            }
        );
        assert_eq!(scene.engine().view.room_background, Some(RoomKey::Room2));
        assert!(scene.engine().view.monster.is_some());
        assert_eq!(scene.engine().view.border, Some(StoreId(2)));
        now = run(&mut scene, &FrameInput::default(), now, 1);

        // Shoot the monster (default aim is right)
        let shoot = FrameInput {
            shoot: true,
            ..Default::default()
        };
        now = run(&mut scene, &shoot, now, 1);
        now = run(&mut scene, &FrameInput::default(), now, 30);
        assert_eq!(
            scene.state().monster.as_ref().map(|m| m.state),
            Some(MonsterState::Defeated)
        );
        assert!(scene.engine().view.monster.is_none());
        assert!(
            scene
                .engine()
                .view
                .messages
                .values()
                .any(|m| m == "Monster defeated!")
        );

        // Up, then right across the collectible
        now = run(&mut scene, &up, now, 32);
        let right = FrameInput {
            right: true,
            ..Default::default()
        };
        now = run(&mut scene, &right, now, 90);
        assert_eq!(scene.state().ledger.collected_count(), 1);
        assert_eq!(scene.engine().view.counter, "Collectibles: 1/3");

        // Back to the hub
        now = run(&mut scene, &confirm, now, 1);
        assert!(scene.engine().view.hub_visible);
        assert_eq!(scene.engine().view.room_background, None);
        assert_eq!(scene.engine().view.player_pos, Vec2::new(400.0, 400.0));

        // Messages and the border run out on their own
        run(&mut scene, &FrameInput::default(), now, 200);
        assert!(scene.engine().view.messages.is_empty());
        assert_eq!(scene.engine().view.border, None);
    }

    #[test]
    fn test_reset_game_through_scene() {
        let mut scene = new_scene();
        let click = FrameInput {
            clicked_store: Some(StoreId(1)),
            ..Default::default()
        };
        let now = run(&mut scene, &click, 0, 1);
        scene.reset_game(now);
        assert_no_drift(&scene);
        assert!(scene.engine().view.hub_visible);
        assert!(scene.engine().view.collectibles.is_empty());
        assert_eq!(scene.engine().view.counter, "Collectibles: 0/3");

        // Timers left over from the visit fire as no-ops
        run(&mut scene, &FrameInput::default(), now, 200);
        assert!(scene.debug_summary().contains("collected=0/3"));
    }

    #[test]
    fn test_unmapped_click_leaves_view_intact() {
        let mut scene = new_scene();
        let now = run(&mut scene, &FrameInput::default(), 0, 1);
        let click = FrameInput {
            clicked_store: Some(StoreId(9)),
            ..Default::default()
        };
        assert!(matches!(
            scene.update(&click, now + FRAME_MS),
            Err(SceneError::UnmappedStore(StoreId(9)))
        ));
        assert_no_drift(&scene);
    }

    fn arb_input() -> impl Strategy<Value = FrameInput> {
        (
            any::<[bool; 6]>(),
            prop::option::weighted(0.05, 1u8..=3),
        )
            .prop_map(|(keys, click)| FrameInput {
                left: keys[0],
                right: keys[1],
                up: keys[2],
                down: keys[3],
                confirm: keys[4],
                shoot: keys[5],
                clicked_store: click.map(StoreId),
            })
    }

    proptest! {
        #[test]
        fn prop_view_never_drifts(
            frames in prop::collection::vec((arb_input(), 1u64..120), 1..300),
            reset_at in prop::option::of(0usize..300),
        ) {
            let mut scene = new_scene();
            let mut now = 0;
            let mut collected = 0;
            for (i, (input, dt)) in frames.iter().enumerate() {
                now += dt;
                if reset_at == Some(i) {
                    scene.reset_game(now);
                    collected = 0;
                }
                scene.update(input, now).unwrap();

                let drift = scene.engine().view.drift_from(scene.state());
                prop_assert!(drift.is_empty(), "view drifted: {:?}", drift);
                let count = scene.state().ledger.collected_count();
                prop_assert!(count >= collected);
                collected = count;
            }
        }
    }
}

//! Mall Crawl entry point
//!
//! Runs a scripted session against the headless engine and logs what
//! happened. Usage: `mall-crawl [config.json]` (filter output with RUST_LOG).

use std::path::PathBuf;
use std::process::ExitCode;

use mall_crawl::platform::HeadlessEngine;
use mall_crawl::sim::FrameInput;
use mall_crawl::{MallScene, SceneConfig, SceneError};

const FRAME_MS: u64 = 16;

/// One step of the scripted session: hold `input` for `frames` frames
struct Step {
    label: &'static str,
    input: FrameInput,
    frames: u32,
}

fn script() -> Vec<Step> {
    let idle = FrameInput::default();
    let step = |label, input, frames| Step {
        label,
        input,
        frames,
    };
    vec![
        step(
            "walk to store 2",
            FrameInput {
                up: true,
                ..Default::default()
            },
            50,
        ),
        step(
            "teleport",
            FrameInput {
                confirm: true,
                ..Default::default()
            },
            1,
        ),
        step("wait", idle.clone(), 1),
        step(
            "shoot the monster",
            FrameInput {
                shoot: true,
                ..Default::default()
            },
            1,
        ),
        step("wait", idle.clone(), 30),
        step(
            "walk up",
            FrameInput {
                up: true,
                ..Default::default()
            },
            32,
        ),
        step(
            "walk right",
            FrameInput {
                right: true,
                ..Default::default()
            },
            90,
        ),
        step(
            "back to the hub",
            FrameInput {
                confirm: true,
                ..Default::default()
            },
            1,
        ),
        step("wait", idle, 150),
    ]
}

fn run(config: SceneConfig) -> Result<(), SceneError> {
    let mut scene = MallScene::new(config, HeadlessEngine::new())?;
    scene.preload();
    scene.create()?;

    let mut now = 0;
    for step in script() {
        log::info!("{} ({} frames)", step.label, step.frames);
        for _ in 0..step.frames {
            now += FRAME_MS;
            scene.update(&step.input, now)?;
        }
    }

    let drift = scene.engine().view.drift_from(scene.state());
    if !drift.is_empty() {
        log::warn!("View drifted from state: {:?}", drift);
    }
    log::info!("{}", scene.debug_summary());
    log::info!(
        "{} intents applied over {} ms",
        scene.engine().applied,
        now
    );
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Mall Crawl (headless) starting...");

    let path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = match SceneConfig::load(path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("Session aborted: {}", e);
            ExitCode::FAILURE
        }
    }
}

//! Camera-following sprite demo.

mod game;

use anyhow::Result;
use context_engine::{init_logging, Engine, EngineConfig, LoggingConfig, Rng};

use game::{GameScene, WORLD_HEIGHT, WORLD_WIDTH};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = EngineConfig::default()
        .title("Context Engine Demo")
        .size(WORLD_WIDTH as u32, WORLD_HEIGHT as u32)
        .with_env_overrides();

    let mut engine = Engine::new(config);
    engine.add_scene(GameScene::new(&mut Rng::new()));
    engine.run()
}

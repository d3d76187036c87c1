//! Typing-speed test.

mod scene;
mod typing;

use anyhow::Result;
use context_engine::{init_logging, Engine, EngineConfig, LoggingConfig, Rng};

use scene::{font_path_from_env, TypingScene};

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let config = EngineConfig::default()
        .title("Typing Speed Test")
        .size(1200, 700)
        .with_env_overrides();

    let mut engine = Engine::new(config);
    engine.add_scene(TypingScene::new(Rng::new(), font_path_from_env()));
    engine.run()
}

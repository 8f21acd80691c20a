use macroquad::prelude::*;
use one_room::input::InputAdapter;
use one_room::render::{draw_hud, textures::TileTextures, Renderer};
use one_room::{Game, GameConfig, TileGrid};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn window_conf() -> Conf {
    Conf {
        window_title: "One Room".into(),
        window_width: 1280,
        window_height: 720,
        ..Default::default()
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}

#[macroquad::main(window_conf)]
async fn main() {
    init_tracing();
    if let Err(err) = run().await {
        error!("{err:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = GameConfig::from_env()?;
    info!(map = %config.map_path.display(), debug = config.debug, "starting");

    let grid = TileGrid::load(&config.map_path)?;
    let textures = TileTextures::load(&grid).await?;
    let mut renderer = Renderer::new(textures, config.debug);
    let mut game = Game::new(grid, &config)?;
    let mut input = InputAdapter::new();

    // World is drawn at the logical resolution and scaled to the window.
    let viewport = config.screen_size();
    let logical = Camera2D::from_display_rect(Rect::new(0.0, 0.0, viewport.x, viewport.y));

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        if is_key_pressed(KeyCode::F1) {
            renderer.debug = !renderer.debug;
        }

        let snapshot = input.poll();
        game.update(&snapshot, get_frame_time());

        set_camera(&logical);
        renderer.render(
            &game.grid,
            &game.actors,
            game.camera.position,
            viewport,
            &mut game.samples,
        );
        draw_hud(game.treasure, viewport);

        next_frame().await;
    }

    info!(treasure = game.treasure, "quitting");
    Ok(())
}

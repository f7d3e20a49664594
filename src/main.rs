use anyhow::Result;
use clap::Parser;
use log::{error, info};
use std::path::PathBuf;
use std::sync::Arc;
use winit::{
    event::{Event, WindowEvent},
    event_loop::EventLoop,
    window::WindowBuilder,
};

mod core;
mod engine;
mod game;

use engine::assets::AssetLoader;
use engine::game_loop::FrameClock;
use engine::renderer::Renderer;
use game::characters::{AnimationMode, MovementStats, LINK_SHEET};
use game::config::{DisplayConfig, OverworldConfig};
use game::Game;

/// Walk around the overworld
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// Directory holding the sprite sheets
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// World-to-display scale factor
    #[arg(long, default_value_t = 2.5)]
    scale: f32,

    /// Only turn the character in place instead of walking
    #[arg(long)]
    facing_only: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logger
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    info!("Starting Overworld...");

    let display = DisplayConfig::default().with_scale(args.scale);
    let mode = if args.facing_only {
        AnimationMode::FacingOnly
    } else {
        AnimationMode::Stepping
    };

    let mut game = Game::new(
        Arc::new(AssetLoader::new(&args.assets)),
        display.clone(),
        OverworldConfig::default(),
        &LINK_SHEET,
        MovementStats::default().with_mode(mode),
    )?;

    // Create event loop and window
    let event_loop = EventLoop::new()?;
    let window = Arc::new(
        WindowBuilder::new()
            .with_title(display.title)
            .with_inner_size(winit::dpi::LogicalSize::new(
                display.window_size.0,
                display.window_size.1,
            ))
            .with_resizable(true)
            .build(&event_loop)?,
    );

    info!("Window created successfully");

    let mut renderer = pollster::block_on(Renderer::new(window.clone(), display.clear_color()))?;
    let mut clock = FrameClock::new();

    // Main event loop
    event_loop
        .run(move |event, elwt| match event {
            Event::WindowEvent {
                event: WindowEvent::CloseRequested,
                ..
            } => {
                info!("Close requested, shutting down...");
                elwt.exit();
            }
            Event::WindowEvent {
                event: WindowEvent::Resized(physical_size),
                ..
            } => {
                renderer.resize(physical_size);
            }
            Event::WindowEvent {
                event: WindowEvent::KeyboardInput { event, .. },
                ..
            } => {
                game.input_mut().process_keyboard_event(&event);
            }
            Event::WindowEvent {
                event: WindowEvent::MouseWheel { delta, .. },
                ..
            } => {
                game.input_mut().process_mouse_wheel(delta);
            }
            Event::WindowEvent {
                event: WindowEvent::Focused(false),
                ..
            } => {
                game.input_mut().reset();
            }
            Event::WindowEvent {
                event: WindowEvent::RedrawRequested,
                ..
            } => {
                if game.quit_requested() {
                    info!("Quit requested, shutting down...");
                    elwt.exit();
                    return;
                }

                let dt = clock.begin_frame();
                game.update(dt);
                game.update_camera(renderer.camera_mut());

                if let Err(e) = renderer.render(|target| game.draw(target)) {
                    error!("Render failed: {:#}", e);
                    elwt.exit();
                    return;
                }
                game.end_frame();

                if clock.fps_updated() {
                    window.set_title(&format!("{} | FPS: {}", display.title, clock.fps()));
                }
            }
            Event::AboutToWait => {
                // Request redraw on next frame
                window.request_redraw();
            }
            _ => {}
        })
        .map_err(|e| anyhow::anyhow!("Event loop error: {}", e))?;

    Ok(())
}

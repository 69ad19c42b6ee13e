#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that boots the Maze Chase experience.

mod layout_transfer;
mod settings;
mod simulation;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use maze_chase_rendering::{Color, Presentation, RenderingBackend};
use maze_chase_rendering_macroquad::MacroquadBackend;
use maze_chase_world::query;

use crate::{
    settings::{CliArgs, Settings},
    simulation::Simulation,
};

const WINDOW_TITLE: &str = "Maze Chase";
const CLEAR_COLOR: Color = Color::from_rgb_u8(24, 26, 33);

/// Entry point for the Maze Chase command-line interface.
fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let settings = Settings::from_args(CliArgs::parse()).context("invalid settings")?;
    let mut simulation = Simulation::new(&settings)?;
    info!("{}", query::welcome_banner(simulation.world()));

    let scene = simulation
        .build_scene()
        .context("failed to build the initial scene")?;
    let presentation = Presentation::new(WINDOW_TITLE, CLEAR_COLOR, scene);
    let backend = MacroquadBackend::new()
        .with_vsync(settings.vsync)
        .with_show_fps(settings.show_fps);

    backend.run(presentation, move |dt, input, scene| {
        simulation.frame(dt, input, scene)
    })
}

//! Componentry demo driver.
//!
//! Builds one entity from a procedurally drawn frame strip, ticks it for a
//! configurable number of steps while driving its animation through messages,
//! and writes the final composed frame to a PNG file.
//!
//! # Running
//!
//! ```sh
//! RUST_LOG=debug cargo run -- --config config.ini --ticks 60 --output frame.png
//! ```

use std::any::Any;
use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use log::info;

use componentry::component::{Component, Role};
use componentry::components::animation::{
    Animation, HOLD_FRAME, HoldTarget, PAUSE_ANIMATION, RESUME_ANIMATION,
};
use componentry::components::graphic::FLIP_GRAPHIC;
use componentry::entity::{Entity, Host};
use componentry::error::ComponentError;
use componentry::events::message::Message;
use componentry::graphics::{Axis, Rect, Surface};
use componentry::resources::gameconfig::GameConfig;

const CANVAS_WIDTH: u32 = 160;
const CANVAS_HEIGHT: u32 = 120;
const BACKGROUND: [u8; 4] = [24, 24, 32, 255];

/// Componentry headless demo
#[derive(Parser)]
#[command(version, about = "Ticks an animated entity and saves the composed frame as PNG.")]
struct Cli {
    /// INI configuration file. Defaults apply when it is missing.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Number of update steps, overriding the configuration.
    #[arg(long)]
    ticks: Option<u32>,

    /// Output PNG path, overriding the configuration.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

/// Logs every message the entity broadcasts.
struct Chronicle {
    heard: usize,
}

impl Component for Chronicle {
    fn role(&self) -> Role {
        Role::Custom("chronicle")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn receive_message(&mut self, host: &Host, message: &Message) -> Result<(), ComponentError> {
        self.heard += 1;
        info!(
            "Entity {} at ({}, {}) heard '{}' {:?}",
            host.id, host.position.x, host.position.y, message.kind, message.details
        );
        Ok(())
    }
}

/// One solid color band per frame with a marker in the top-left corner, so
/// frame order and mirroring are visible in the output.
fn frame_strip(config: &GameConfig) -> Surface {
    let frames = config.frame_durations.len() as u32;
    let (width, height) = (config.frame_width, config.frame_height);
    let mut strip = Surface::new(width * frames, height);
    for frame in 0..frames {
        let shade = (64 + frame * 191 / frames.max(1)) as u8;
        let x = (frame * width) as i32;
        strip.fill_rect(Rect::new(x, 0, width, height), [shade, 96, 255 - shade, 255]);
        strip.fill_rect(Rect::new(x, 0, (width / 4).max(1), (height / 4).max(1)), [255, 255, 255, 255]);
    }
    strip
}

fn run(cli: Cli) -> Result<(), Box<dyn Error>> {
    let mut config = match cli.config {
        Some(path) => GameConfig::with_path(path),
        None => GameConfig::new(),
    };
    if let Err(e) = config.load_from_file() {
        info!("{e}; using defaults");
    }
    if let Some(ticks) = cli.ticks {
        config.ticks = ticks;
    }
    if let Some(output) = cli.output {
        config.output_path = output;
    }

    let mut animation = Animation::with_frame_width(
        frame_strip(&config),
        0,
        0,
        config.frame_width,
        config.frame_durations.clone(),
    )?;
    if config.backwards {
        animation = animation.backwards();
    }
    if config.hold_last {
        animation = animation.holding(HoldTarget::Last)?;
    }

    let mut entity = Entity::with_components(
        0,
        0,
        [
            Box::new(animation) as Box<dyn Component>,
            Box::new(Chronicle { heard: 0 }),
        ],
    )?;
    let screen = Rect::new(0, 0, CANVAS_WIDTH, CANVAS_HEIGHT);
    entity.center_graphic(Axis::Both, &screen);
    info!("Entity {} ready with roles {:?}", entity.id(), entity.roles().collect::<Vec<_>>());

    let midpoint = config.ticks / 2;
    let settle = config.ticks * 3 / 4;
    for tick in 0..config.ticks {
        if tick == midpoint {
            entity.send_message(FLIP_GRAPHIC, [Axis::Horizontal.bits()])?;
            entity.broadcast(&Message::signal(PAUSE_ANIMATION))?;
            entity.broadcast(&Message::signal(RESUME_ANIMATION))?;
        }
        if tick == settle && !config.hold_last {
            entity.send_message(HOLD_FRAME, [0])?;
        }
        entity.update(config.delta);
    }

    if let Some(animation) = entity.get::<Animation>(Role::Graphic) {
        info!(
            "After {} ticks: frame {} of {}, {:?}",
            config.ticks,
            animation.frame_index(),
            animation.frame_count(),
            animation.state()
        );
    }
    if let Some(chronicle) = entity.get::<Chronicle>(Role::Custom("chronicle")) {
        info!("Chronicle heard {} messages", chronicle.heard);
    }

    let mut canvas = Surface::filled(CANVAS_WIDTH, CANVAS_HEIGHT, BACKGROUND);
    if let Some(drawn) = entity.draw(&mut canvas) {
        info!("Drew graphic into {:?}", drawn);
    }
    canvas.save_png(&config.output_path)?;
    info!("Saved frame to {:?}", config.output_path);
    Ok(())
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

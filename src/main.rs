//! Flit Engine demo entry point.
//!
//! A small educational 2D game scaffold written in Rust using:
//! - **raylib** for windowing and graphics
//! - a fixed-idle loop driver separating update from draw
//! - sprites, cyclic frame animations, and a shallow creature hierarchy
//!
//! Running it opens a window with a swarm of animated flies; closing the
//! window (or waiting until the last fly is swatted) stops the loop and
//! tears the screen down.
//!
//! # Running
//!
//! ```sh
//! cargo run --release
//! ```

// Do not create console on Windows
#![cfg_attr(target_os = "windows", windows_subsystem = "windows")]

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use flitengine::core::GameLoop;
use flitengine::game::FlyDemo;
use flitengine::resources::gameconfig::GameConfig;
use flitengine::resources::screen::Screen;

/// Flit Engine 2D demo
#[derive(Parser)]
#[command(version, about = "A tiny 2D game scaffold: flies, sprites, and a fixed-idle loop")]
struct Cli {
    /// Path to the INI configuration file.
    #[arg(long, value_name = "PATH", default_value = "./config.ini")]
    config: PathBuf,

    /// Number of flies to spawn.
    #[arg(long, default_value_t = 12)]
    flies: u32,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = GameConfig::with_path(cli.config);
    if let Err(e) = config.load_from_file() {
        log::warn!("{e}; using defaults");
    }

    let mut screen = match Screen::open(&config) {
        Ok(screen) => screen,
        Err(e) => {
            log::error!("failed to open screen: {e}");
            std::process::exit(1);
        }
    };

    let mut demo = match FlyDemo::new(&mut screen, cli.flies) {
        Ok(demo) => demo,
        Err(e) => {
            log::error!("failed to build demo: {e}");
            std::process::exit(1);
        }
    };

    let mut driver = GameLoop::new().with_idle(Duration::from_millis(config.idle_ms));
    let result = driver.init(screen).and_then(|()| driver.run(&mut demo));
    if let Err(e) = result {
        log::error!("game loop exited with a fault: {e}");
        std::process::exit(1);
    }
}

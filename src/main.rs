use std::env;
use std::time::{Duration, Instant};

use tracing_subscriber::EnvFilter;

use collide_core::cli::{command_for_key, toggle_pause, Command};
use collide_core::config::SimConfig;
use collide_core::error::SimResult;
use collide_core::renderer::{InputSource, NullRenderer, Renderer};
use collide_core::save::SimDocument;
use collide_core::scheduler::Scheduler;

const DEFAULT_CONFIG_PATH: &str = "assets/simulation.toml";
const SAVE_PATH: &str = "save.toml";

fn init_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();
}

/// Builds a fresh scheduler from the configuration at `path`.
fn load_scheduler(path: &str) -> SimResult<Scheduler> {
    let mut rng = rand::thread_rng();
    let config = SimConfig::load(path)?;
    let (particles, walls) = config.build(&mut rng)?;
    Ok(Scheduler::with_worker_count(particles, walls, config.worker_count))
}

fn run(mut scheduler: Scheduler, mut renderer: impl Renderer + InputSource, config_path: &str) {
    let mut last_frame = Instant::now();

    loop {
        let now = Instant::now();
        let elapsed = now.duration_since(last_frame).as_secs_f32();
        last_frame = now;

        if let Some(key) = renderer.poll_key() {
            if toggle_pause(key, &mut scheduler) {
                last_frame = Instant::now();
            }
            match command_for_key(key) {
                Some(Command::Exit) => {
                    tracing::info!("exiting on user command");
                    break;
                }
                Some(Command::Restart) => match load_scheduler(config_path) {
                    Ok(fresh) => {
                        tracing::info!("restarting simulation");
                        scheduler = fresh;
                    }
                    Err(err) => tracing::warn!(%err, "restart failed, continuing current run"),
                },
                Some(Command::New) => match load_scheduler(config_path) {
                    Ok(fresh) => {
                        tracing::info!("starting new simulation");
                        scheduler = fresh;
                    }
                    Err(err) => tracing::warn!(%err, "new-run load failed, continuing current run"),
                },
                None => {}
            }
        }

        scheduler.advance(elapsed);

        renderer.clear();
        renderer.draw(scheduler.particles(), scheduler.walls(), scheduler.sim_time());

        std::thread::sleep(Duration::from_millis(1));

        if env::var("COLLIDE_CORE_HEADLESS_STEPS").is_ok() {
            break;
        }
    }
}

fn main() {
    init_logging();

    let config_path = env::var("COLLIDE_CORE_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());

    let scheduler = if let Ok(save_path) = env::var("COLLIDE_CORE_RESUME") {
        match SimDocument::load(&save_path).and_then(|doc| doc.restore()) {
            Ok((particles, walls, sim_time)) => {
                tracing::info!(path = %save_path, %sim_time, "resuming from save document");
                Scheduler::new(particles, walls)
            }
            Err(err) => {
                tracing::error!(%err, "failed to resume from save document, loading config instead");
                match load_scheduler(&config_path) {
                    Ok(s) => s,
                    Err(err) => {
                        tracing::error!(%err, "failed to load configuration");
                        std::process::exit(1);
                    }
                }
            }
        }
    } else {
        match load_scheduler(&config_path) {
            Ok(s) => s,
            Err(err) => {
                tracing::error!(%err, path = %config_path, "failed to load configuration");
                std::process::exit(1);
            }
        }
    };

    run(scheduler, NullRenderer, &config_path);
}

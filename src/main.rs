//! Dirt Dash entry point
//!
//! Native builds run a headless race with an autopilot driving the player's
//! bike and print the results. Browser front ends link the library directly.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::Path;

    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    use dirt_dash::consts::*;
    use dirt_dash::persistence::FileStore;
    use dirt_dash::sim::{BotController, Personality, RaceEvent, RacePhase};
    use dirt_dash::{DEFAULT_PLAYER_NAME, Difficulty, FrameInput, RaceConfig, RaceController, format_race_time};

    env_logger::init();
    log::info!("Dirt Dash (native) starting...");

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => RaceConfig::load(Path::new(&path)).unwrap_or_else(|e| {
            log::warn!("Could not load config from {}: {}; using defaults", path, e);
            RaceConfig::default()
        }),
        None => RaceConfig::default(),
    };
    let name = args.next().unwrap_or_else(|| DEFAULT_PLAYER_NAME.to_string());
    let config = match args.next() {
        Some(level) => match Difficulty::from_str(&level) {
            Some(difficulty) => config.with_difficulty(difficulty),
            None => {
                log::warn!("Unknown difficulty {}, keeping {}", level, config.difficulty.as_str());
                config
            }
        },
        None => config,
    };

    let seed: u64 = rand::random();
    log::info!("Session seed: {}", seed);
    let mut controller = RaceController::new(config, seed, Box::new(FileStore::default()));
    if let Some(best) = controller.best_time() {
        log::info!("Best time so far: {}", format_race_time(best.as_secs_f32()));
    }

    // Drives the player the way a fast, jump-happy bot would
    let autopilot = BotController::new(Personality {
        target_speed_fraction: 0.95,
        jump_bias: 1.0,
    });
    let mut autopilot_rng = Pcg32::seed_from_u64(seed);
    let mut was_jumping = false;

    controller.start(&name);
    let max_frames = ((controller.state().config.time_limit_secs
        + controller.state().config.countdown_secs)
        / SIM_DT) as u64
        + 60;
    let mut frames = 0;
    while controller.phase() != RacePhase::Results && frames < max_frames {
        let state = controller.state();
        let controls = autopilot.decide(&state.player().vehicle, &state.field, &mut autopilot_rng);
        let input = FrameInput {
            throttle: controls.throttle,
            brake: controls.brake,
            jump: controls.jump && !was_jumping,
            engine_on: true,
        };
        was_jumping = controls.jump;
        controller.update(SIM_DT, &input);

        for event in controller.drain_events() {
            match event {
                RaceEvent::CountdownBeep { last: false } => log::info!("Beep"),
                RaceEvent::CountdownBeep { last: true } => log::info!("GO!"),
                RaceEvent::Finished { racer, time } => {
                    log::debug!("Racer {} crossed the line at {}", racer, format_race_time(time))
                }
                RaceEvent::NewBestTime { time } => {
                    println!("New best time: {}", format_race_time(time))
                }
                _ => {}
            }
        }
        frames += 1;
    }

    println!("Results");
    for (place, entry) in controller.state().ranking.iter().enumerate() {
        let time = if entry.is_dnf() {
            "DNF".to_string()
        } else {
            format_race_time(entry.time)
        };
        let marker = if entry.is_player { " (you)" } else { "" };
        println!("{:>2}. {:<12} {}{}", place + 1, entry.name, time, marker);
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Web front ends drive RaceController from their own frame loop
}

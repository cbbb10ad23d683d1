use dirt_dash::consts::*;
use dirt_dash::sim::{
    Obstacle, ObstacleField, ObstacleKind, RaceEvent, RacePhase, RaceState, TickInput, Vehicle,
    resolve_obstacles, terrain, tick,
};
use dirt_dash::{FrameInput, MemoryStore, RaceConfig, RaceController};

fn start(config: RaceConfig, dt: f32) -> RaceState {
    let mut state = RaceState::new(config, 42);
    assert!(state.start("Player"));
    while state.phase == RacePhase::Countdown {
        tick(&mut state, &TickInput::default(), dt);
    }
    assert_eq!(state.phase, RacePhase::Running);
    state
}

fn full_throttle() -> TickInput {
    TickInput {
        throttle: true,
        engine_on: true,
        ..Default::default()
    }
}

#[test]
fn test_solo_sprint_with_one_second_ticks() {
    let track = 1000.0;
    let mut state = start(
        RaceConfig {
            track_length: track,
            bot_count: 0,
            obstacles: false,
            ..Default::default()
        },
        1.0,
    );

    // Acceleration ramp plus the distance at top speed
    let bound = (MAX_SPEED / ACCEL).ceil() as u32 + (track / MAX_SPEED).ceil() as u32;
    let mut ticks = 0;
    while !state.player().vehicle.finished && ticks < bound {
        tick(&mut state, &full_throttle(), 1.0);
        ticks += 1;
    }

    let player = &state.player().vehicle;
    assert!(player.finished, "not finished after {} ticks", ticks);
    assert!(player.position >= track);
    assert!(player.finish_time.is_some());
    assert_eq!(state.phase, RacePhase::Results);
    assert!(state.player_won());
}

/// Player input that reproduces the bot's governor exactly
fn mimic(state: &RaceState, target: f32) -> TickInput {
    TickInput {
        throttle: state.player().vehicle.speed < target,
        engine_on: true,
        ..Default::default()
    }
}

fn bot_target(state: &RaceState) -> f32 {
    match &state.racers[1].driver {
        dirt_dash::sim::Driver::Bot(bot) => bot.target_speed(),
        dirt_dash::sim::Driver::Player => unreachable!("racer 1 is a bot"),
    }
}

fn run_out(state: &mut RaceState, target: f32) {
    let mut ticks = 0;
    while state.phase == RacePhase::Running && ticks < 60 * 120 {
        let input = mimic(state, target);
        tick(state, &input, SIM_DT);
        ticks += 1;
    }
    assert_eq!(state.phase, RacePhase::Results);
}

#[test]
fn test_identical_racers_tie_goes_to_player() {
    let mut state = start(
        RaceConfig {
            bot_count: 1,
            obstacles: false,
            course_seed: Some(5),
            ..Default::default()
        },
        SIM_DT,
    );
    let target = bot_target(&state);
    run_out(&mut state, target);

    let player = state.racers[0].vehicle.finish_time;
    let bot = state.racers[1].vehicle.finish_time;
    assert!(player.is_some());
    assert_eq!(player, bot);
    assert_eq!(state.player_place(), Some(1));
    assert!(state.player_won());
    assert_eq!(state.ranking[1].racer, 1);
}

#[test]
fn test_head_start_wins_with_identical_driving() {
    let mut state = RaceState::new(
        RaceConfig {
            bot_count: 1,
            obstacles: false,
            course_seed: Some(5),
            ..Default::default()
        },
        42,
    );
    state.start("Player");
    state.racers[1].vehicle = Vehicle::at(START_POSITION + 100.0);
    while state.phase == RacePhase::Countdown {
        tick(&mut state, &TickInput::default(), SIM_DT);
    }
    let target = bot_target(&state);
    run_out(&mut state, target);

    assert_eq!(state.player_place(), Some(2));
    assert!(!state.player_won());
    assert!(state.racers[1].vehicle.finish_time < state.racers[0].vehicle.finish_time);
}

#[test]
fn test_rock_ahead_bumps_and_slows() {
    let field = ObstacleField::from_obstacles(vec![Obstacle::new(ObstacleKind::Rock, 510.0)]);
    let mut vehicle = Vehicle::at(500.0);
    vehicle.speed = 600.0;
    let speed_before = vehicle.speed;

    let mut hit = None;
    for _ in 0..5 {
        vehicle.step(Default::default(), SIM_DT, TRACK_LENGTH);
        if let Some(impact) = resolve_obstacles(&mut vehicle, &field) {
            hit = Some(impact);
            break;
        }
    }

    assert!(hit.is_some());
    assert!(!vehicle.grounded);
    assert!(vehicle.speed < speed_before);
    assert!(vehicle.y < terrain::height(vehicle.position));
}

#[test]
fn test_pause_freezes_race_clock() {
    let mut controller = RaceController::new(
        RaceConfig {
            course_seed: Some(3),
            ..Default::default()
        },
        9,
        Box::new(MemoryStore::new()),
    );
    controller.start("Player");
    let drive = FrameInput {
        throttle: true,
        engine_on: true,
        ..Default::default()
    };
    while controller.phase() != RacePhase::Running {
        controller.update(SIM_DT, &drive);
    }
    for _ in 0..60 {
        controller.update(SIM_DT, &drive);
    }

    assert!(controller.toggle_pause());
    let paused = controller.snapshot();
    for _ in 0..120 {
        controller.update(SIM_DT, &drive);
    }
    let still = controller.snapshot();
    assert_eq!(still.race_time, paused.race_time);
    assert_eq!(still.racers, paused.racers);

    assert!(controller.toggle_pause());
    controller.update(SIM_DT, &drive);
    let resumed = controller.snapshot();
    // One fixed step, no catch-up for the paused period
    assert!(resumed.race_time > paused.race_time);
    assert!(resumed.race_time - paused.race_time <= SIM_DT * 2.0 + 1e-5);
}

#[test]
fn test_full_race_through_controller() {
    let mut controller = RaceController::new(
        RaceConfig {
            bot_count: 3,
            course_seed: Some(21),
            ..Default::default()
        },
        4,
        Box::new(MemoryStore::new()),
    );
    assert_eq!(controller.phase(), RacePhase::Home);
    controller.start("  Rider  ");
    assert_eq!(controller.state().player().name, "Rider");

    let drive = FrameInput {
        throttle: true,
        engine_on: true,
        ..Default::default()
    };
    let mut events = Vec::new();
    let mut frames = 0;
    while controller.phase() != RacePhase::Results && frames < 60 * 400 {
        controller.update(SIM_DT, &drive);
        events.extend(controller.drain_events());
        frames += 1;
    }

    assert_eq!(controller.phase(), RacePhase::Results);
    assert!(events.contains(&RaceEvent::RaceStarted));
    assert_eq!(
        events
            .iter()
            .filter(|e| matches!(e, RaceEvent::RaceOver { .. }))
            .count(),
        1
    );
    let ranking = controller.snapshot().ranking.unwrap();
    assert_eq!(ranking.len(), 4);
    for pair in ranking.windows(2) {
        assert!(pair[0].time <= pair[1].time);
    }
}

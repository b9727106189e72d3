//! Headless demo runner
//!
//! Simulates a full run without any frontend: fixed 60 Hz ticks, the first
//! offered upgrade auto-picked at every level, final state printed as JSON.
//!
//!     nightswarm [seed] [character] [duration-seconds]

use glam::Vec2;
use nightswarm::sim::state::Snapshot;
use nightswarm::sim::{CharacterId, GameEvent, Phase, SimState};
use nightswarm::{tick, TickInput};

const DT: f32 = 1.0 / 60.0;

fn main() {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed = args.next().unwrap_or_else(|| "nightswarm".to_owned());
    let character = CharacterId::parse(&args.next().unwrap_or_default());
    let duration: f32 = args
        .next()
        .and_then(|s| s.parse().ok())
        .unwrap_or(120.0);

    log::info!("run: seed={seed} character={character:?} duration={duration}s");
    let mut state = SimState::new(character, &seed);

    // Wander in a slow circle so movement-gated abilities get exercised
    let mut angle: f32 = 0.0;
    let input = |angle: f32| TickInput {
        move_dir: Vec2::from_angle(angle),
        pause: false,
    };

    while state.game_time < duration && state.phase != Phase::GameOver {
        angle += DT * 0.3;
        tick(&mut state, &input(angle), DT);

        for event in std::mem::take(&mut state.events) {
            match event {
                GameEvent::LevelUp { level } => {
                    let choices = state.get_random_upgrades(3);
                    if let Some(choice) = choices.first() {
                        log::info!("level {level}: picked {}", choice.name());
                        state.apply_upgrade(*choice);
                    } else {
                        state.apply_upgrade(nightswarm::sim::UpgradeChoice::Passive(
                            nightswarm::sim::PassiveId::HoningStone,
                        ));
                    }
                }
                GameEvent::GameOver => {
                    log::info!("run over at t={:.1}s", state.game_time);
                }
            }
        }
    }

    let snapshot: Snapshot = state.snapshot();
    match serde_json::to_string_pretty(&snapshot) {
        Ok(json) => println!("{json}"),
        Err(err) => eprintln!("snapshot serialization failed: {err}"),
    }
}

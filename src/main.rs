//! Umbraked entry point
//!
//! Runs the simulation headless under the demo-mode autopilot. Useful for
//! soak runs, balance checks and reproducing a seed.
//!
//! Usage: `umbraked [--seed N] [--ticks N] [--runs N] [--realtime] [--toggle-music] [--toggle-sfx]`

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::path::Path;

    use clap::Parser;

    use umbraked::audio::{AudioManager, LogSink};
    use umbraked::consts::TICK_RATE;
    use umbraked::highscores::BEST_SCORE_FILE;
    use umbraked::platform::{Clock, FramePacer, ManualClock, SystemClock};
    use umbraked::renderer::build_frame;
    use umbraked::settings::SETTINGS_FILE;
    use umbraked::sim::{GameEvent, GameState, TickInput, tick};
    use umbraked::tuning::TUNING_FILE;
    use umbraked::{BestScore, Settings, Tuning};

    /// Command line options
    #[derive(Parser, Debug)]
    #[command(name = "umbraked")]
    #[command(about = "Run the platformer headless under the autopilot")]
    struct Options {
        /// World seed
        #[arg(long, default_value_t = 0x5eed)]
        seed: u64,
        /// Per-run tick limit
        #[arg(long, default_value_t = u64::from(TICK_RATE) * 120)]
        ticks: u64,
        #[arg(long, default_value_t = 1)]
        runs: u32,
        /// Pace ticks against the wall clock
        #[arg(long)]
        realtime: bool,
        /// Flip background music on/off and save the setting
        #[arg(long)]
        toggle_music: bool,
        /// Flip sound effects on/off and save the setting
        #[arg(long)]
        toggle_sfx: bool,
    }

    /// Wall-clock paced or as fast as possible
    enum Timing {
        Realtime(SystemClock, FramePacer),
        Simulated(ManualClock),
    }

    impl Timing {
        fn now_ms(&self) -> u64 {
            match self {
                Timing::Realtime(clock, _) => clock.now_ms(),
                Timing::Simulated(clock) => clock.now_ms(),
            }
        }

        fn end_frame(&mut self) {
            match self {
                Timing::Realtime(_, pacer) => pacer.wait(),
                Timing::Simulated(clock) => clock.advance(1000 / u64::from(TICK_RATE)),
            }
        }
    }

    pub fn run() {
        env_logger::init();

        let opts = Options::parse();
        log::info!("Umbraked (headless) starting: {:?}", opts);

        let settings_path = Path::new(SETTINGS_FILE);
        let mut settings = Settings::load_or_default(settings_path);
        let tuning = Tuning::load_or_default(Path::new(TUNING_FILE));
        let best_path = Path::new(BEST_SCORE_FILE);
        let mut best = BestScore::load_or_default(best_path);

        let mut audio = AudioManager::new(LogSink, &settings);
        if opts.toggle_music || opts.toggle_sfx {
            if opts.toggle_music {
                settings.toggle_music();
            }
            if opts.toggle_sfx {
                settings.toggle_sfx();
            }
            if let Err(e) = settings.save_to(settings_path) {
                log::warn!("Could not save settings: {e}");
            }
            audio.apply_settings(&settings);
        }
        let mut timing = if opts.realtime {
            Timing::Realtime(SystemClock::new(), FramePacer::new())
        } else {
            Timing::Simulated(ManualClock::default())
        };

        let mut state = GameState::with_tuning(opts.seed, tuning).with_best_score(best.score);

        for run in 1..=opts.runs {
            if run > 1 {
                state.reset(timing.now_ms());
            }

            while state.time_ticks < opts.ticks && !state.is_game_over() {
                let input = TickInput::autopilot(&state);
                tick(&mut state, &input, timing.now_ms());

                let events = state.drain_events();
                audio.handle_events(&events);
                for event in &events {
                    if let GameEvent::GameOver {
                        score,
                        new_best: true,
                    } = *event
                    {
                        best.record(score);
                        if let Err(e) = best.save_to(best_path) {
                            log::warn!("Could not save best score: {e}");
                        }
                    }
                }

                if state.time_ticks % u64::from(TICK_RATE) == 0 {
                    let frame = build_frame(&state, timing.now_ms());
                    log::debug!(
                        "t={} camera={:.0} score={} lives={} draws={}",
                        state.time_ticks,
                        state.camera_x,
                        frame.hud.score,
                        frame.hud.lives,
                        frame.commands.len()
                    );
                }

                timing.end_frame();
            }

            log::info!(
                "Run {}/{} finished after {} ticks: score {} (best {}), lives {}",
                run,
                opts.runs,
                state.time_ticks,
                state.score,
                state.best_score,
                state.player.lives
            );
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    native::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // No browser shell; the library is the deliverable on this target
}

//! Property-based tests for progress tracking
//!
//! Uses proptest to verify the persistence invariants across random
//! listening sessions.

use proptest::prelude::*;
use reprise_core::{position_to_save, ImportedFile, ManualClock, PlayerConfig};
use reprise_playback::simulated::{ManualTimer, SimulatedEngine};
use reprise_playback::{HiddenList, PlaybackController, TrackRegistry};
use reprise_storage::ProgressStore;

// ===== Helpers =====

#[derive(Debug, Clone)]
enum Step {
    Play(u32),
    Wait(u32),
    Pause,
    Resume,
    Seek(f64),
    Tick,
    Switch(usize),
}

fn arbitrary_step() -> impl Strategy<Value = Step> {
    prop_oneof![
        (1u32..120).prop_map(Step::Play),
        (1u32..600).prop_map(Step::Wait),
        Just(Step::Pause),
        Just(Step::Resume),
        (-50.0f64..700.0).prop_map(Step::Seek),
        Just(Step::Tick),
        (0usize..3).prop_map(Step::Switch),
    ]
}

struct Rig {
    controller: PlaybackController,
    store: ProgressStore,
    engine: SimulatedEngine,
    timer: ManualTimer,
    clock: ManualClock,
}

fn rig(duration: f64) -> Rig {
    let names = ["a", "b", "c"];
    let registry = TrackRegistry::import(
        names
            .iter()
            .map(|n| ImportedFile::new(format!("{}.mp3", n), format!("blob:{}", n))),
    )
    .unwrap();

    let engine = SimulatedEngine::new();
    for n in names {
        engine.register(format!("blob:{}", n), duration);
    }
    let store = ProgressStore::in_memory();
    let timer = ManualTimer::new();
    let clock = ManualClock::new(1_000_000);

    let controller = PlaybackController::new(
        registry,
        store.clone(),
        engine.clone(),
        PlayerConfig::default(),
    )
    .with_clock(clock.clone())
    .with_timer(timer.clone());

    Rig {
        controller,
        store,
        engine,
        timer,
        clock,
    }
}

fn total(store: &ProgressStore, name: &str) -> f64 {
    store
        .get(name)
        .map_or(0.0, |r| r.total_listening_time_or_zero())
}

// ===== Property Tests =====

proptest! {
    /// Property: committed positions stay within [0, duration]
    #[test]
    fn saved_position_is_clamped(
        current in -1_000.0f64..10_000.0,
        duration in 1.0f64..5_000.0,
        threshold in 0.0f64..120.0,
    ) {
        let saved = position_to_save(current, duration, threshold).unwrap();
        prop_assert!((0.0..=duration).contains(&saved));
    }

    /// Property: anything within the threshold of the end, inclusive, is stored as 0
    #[test]
    fn near_end_is_completion(
        duration in 61.0f64..5_000.0,
        remaining in 0.0f64..=30.0,
    ) {
        prop_assert_eq!(position_to_save(duration - remaining, duration, 30.0), Some(0.0));
        prop_assert_eq!(position_to_save(duration - remaining, duration, 60.0), Some(0.0));
    }

    /// Property: listening totals never decrease and every record stays valid
    #[test]
    fn random_sessions_keep_invariants(
        steps in prop::collection::vec(arbitrary_step(), 1..60),
    ) {
        let duration = 600.0;
        let mut rig = rig(duration);
        rig.controller.activate(0).unwrap();

        let mut totals = [0.0f64; 3];
        let mut first = [None; 3];

        for step in steps {
            match step {
                Step::Play(secs) => {
                    rig.clock.advance_secs(secs as f64);
                    if rig.engine.advance(secs as f64) {
                        rig.controller.on_track_ended();
                    }
                }
                Step::Wait(secs) => rig.clock.advance_secs(secs as f64),
                Step::Pause => rig.controller.pause(),
                Step::Resume => {
                    let _ = rig.controller.resume();
                }
                Step::Seek(target) => rig.controller.seek(target),
                Step::Tick => {
                    if let Some(token) = rig.timer.token() {
                        rig.controller.on_autosave_tick(token);
                    }
                }
                Step::Switch(ordinal) => rig.controller.activate(ordinal).unwrap(),
            }

            for (i, name) in ["a", "b", "c"].iter().enumerate() {
                let now = total(&rig.store, name);
                prop_assert!(now >= totals[i], "total for {} went down", name);
                totals[i] = now;

                if let Some(record) = rig.store.get(name) {
                    if let Some(current) = record.current_time {
                        prop_assert!((0.0..=duration).contains(&current));
                    }
                    if first[i].is_some() {
                        prop_assert_eq!(record.first_listened, first[i]);
                    }
                    first[i] = record.first_listened;
                }
            }
        }
    }

    /// Property: listening total equals the wall-clock time spent playing
    #[test]
    fn listening_total_matches_played_time(
        chunks in prop::collection::vec((1u32..60, 0u32..300), 1..20),
    ) {
        let mut rig = rig(100_000.0);
        rig.controller.activate(0).unwrap();
        rig.controller.pause();

        let mut played = 0.0;
        for (play, idle) in chunks {
            rig.controller.resume().unwrap();
            rig.clock.advance_secs(play as f64);
            rig.engine.advance(play as f64);
            rig.controller.pause();
            played += play as f64;

            rig.clock.advance_secs(idle as f64);
        }

        prop_assert!((total(&rig.store, "a") - played).abs() < 1e-6);
    }

    /// Property: hide/unhide are idempotent
    #[test]
    fn hide_unhide_idempotent(
        name in "[A-Za-z0-9 ]{1,20}",
        repeats in 1usize..5,
    ) {
        let store = ProgressStore::in_memory();
        let mut hidden = HiddenList::load(store.clone());

        for _ in 0..repeats {
            hidden.hide(&name);
        }
        prop_assert!(hidden.is_hidden(&name));
        prop_assert_eq!(store.hidden_tracks().len(), 1);

        for _ in 0..repeats {
            hidden.unhide(&name);
        }
        prop_assert!(!hidden.is_hidden(&name));
        prop_assert!(store.hidden_tracks().is_empty());
    }
}

//! Breathing exercise engine.
//!
//! The engine is a wall-clock deadline machine. It does not use internal
//! threads - the host is responsible for calling `tick()` periodically
//! (every 25-50ms is plenty; the countdown cadence is 100ms).
//!
//! ## State machine
//!
//! States are the tuple (phase, set, breath) with breath cycling
//! inhale -> hold -> exhale within each set. Every hold lasts a fixed
//! 3 seconds regardless of phase configuration. After the exhale of the
//! final set of the final phase the engine stops and `on_complete` fires
//! exactly once.
//!
//! ## Timing
//!
//! Only the step-advance deadline moves the state machine. The ~100ms
//! countdown notifications and the hold speech cues are advisory: they read
//! remaining time but never mutate state. `pause()` folds the elapsed
//! wall-clock delta into the step's accumulator and suspends every deadline;
//! `resume()` recomputes deadlines from live remaining time.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = BreathingEngine::new(&program, Box::new(listener));
//! engine.start();
//! while engine.running() {
//!     engine.tick();
//!     std::thread::sleep(std::time::Duration::from_millis(25));
//! }
//! ```

use crate::clock::{Clock, SystemClock};
use crate::types::{BreathState, ExerciseProgram, PhaseSpec};

/// Fixed hold length between inhale and exhale, in seconds
pub const HOLD_DURATION_SECS: u32 = 3;

/// Cadence of the advisory countdown notifications, in milliseconds
pub const TICK_INTERVAL_MS: u64 = 100;

/// Callback surface between the engine and its host.
///
/// All methods default to no-ops; implementers override what they render.
/// The engine invokes these synchronously from `start()` and `tick()`.
pub trait ExerciseListener {
    /// Entering an inhale/hold/exhale step of `duration_secs`
    fn on_breath_change(&mut self, _state: BreathState, _duration_secs: u32) {}

    /// Starting a new set (`current_set` is 1-based within the phase)
    fn on_set_change(
        &mut self,
        _current_set: u32,
        _sets_in_phase: u32,
        _completed_sets: u32,
        _total_sets: u32,
    ) {
    }

    /// Starting a new phase (`current_phase` is 1-based)
    fn on_phase_change(&mut self, _current_phase: u32, _total_phases: u32) {}

    /// A hold countdown word ("hold", "two", "one") is due
    fn on_hold_speak(&mut self, _word: &str) {}

    /// Advisory countdown, ~10x/second while running and unpaused
    fn on_tick(&mut self, _seconds_left: u32) {}

    /// The final exhale of the final phase finished
    fn on_complete(&mut self) {}
}

/// A hold speech cue, stored as a remaining-time threshold.
///
/// Thresholds are relative to remaining step time, so a pause (which freezes
/// remaining time) suspends them and a resume reschedules exactly the cues
/// whose trigger point is still in the future.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct HoldCue {
    word: &'static str,
    at_remaining_ms: u64,
}

/// Plan the hold cues for a hold step of `duration_ms`.
///
/// "hold" fires on entry, "two" at the 2s-remaining mark, "one" at the
/// 1s-remaining mark. Cues that do not fit the step are skipped.
fn plan_hold_cues(duration_ms: u64) -> Vec<HoldCue> {
    let candidates = [
        HoldCue {
            word: "hold",
            at_remaining_ms: duration_ms,
        },
        HoldCue {
            word: "two",
            at_remaining_ms: 2000,
        },
        HoldCue {
            word: "one",
            at_remaining_ms: 1000,
        },
    ];

    candidates
        .into_iter()
        .filter(|cue| cue.at_remaining_ms <= duration_ms)
        .collect()
}

/// Drives one breathing exercise from a program definition.
///
/// Owns all timing decisions and emits events through the supplied listener.
/// Instances are independent; a host keeps at most one active at a time.
pub struct BreathingEngine {
    phases: [PhaseSpec; 2],
    listener: Box<dyn ExerciseListener>,
    clock: Box<dyn Clock>,

    phase_index: usize,
    set_index: u32,
    breath: BreathState,
    running: bool,
    paused: bool,

    /// Milliseconds accumulated in the current step across pauses
    elapsed_ms: u64,
    /// Clock stamp at which the current unpaused interval began
    step_started_ms: u64,
    /// Deadline for the next advisory countdown notification
    next_tick_ms: u64,
    /// Hold cues not yet fired for the current step
    pending_cues: Vec<HoldCue>,
}

impl BreathingEngine {
    /// Create an engine over the system clock
    pub fn new(program: &ExerciseProgram, listener: Box<dyn ExerciseListener>) -> Self {
        Self::with_clock(program, listener, Box::new(SystemClock::new()))
    }

    /// Create an engine over an explicit clock (tests use `ManualClock`)
    pub fn with_clock(
        program: &ExerciseProgram,
        listener: Box<dyn ExerciseListener>,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            phases: [program.phase1.clone(), program.phase2.clone()],
            listener,
            clock,
            phase_index: 0,
            set_index: 0,
            breath: BreathState::Inhale,
            running: false,
            paused: false,
            elapsed_ms: 0,
            step_started_ms: 0,
            next_tick_ms: 0,
            pending_cues: Vec::new(),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn running(&self) -> bool {
        self.running
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn breath(&self) -> BreathState {
        self.breath
    }

    /// Sum of both phases' set counts
    pub fn total_sets(&self) -> u32 {
        self.phases.iter().map(|p| p.sets).sum()
    }

    /// Sets fully finished across phases plus current-phase completed sets
    pub fn completed_sets(&self) -> u32 {
        let prior: u32 = self.phases[..self.phase_index.min(self.phases.len())]
            .iter()
            .map(|p| p.sets)
            .sum();
        prior + self.set_index
    }

    /// Milliseconds left in the current breath step (0 when not running)
    pub fn remaining_ms(&self) -> u64 {
        if !self.running {
            return 0;
        }
        let duration = self.step_duration_ms();
        duration.saturating_sub(self.total_elapsed_ms())
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin the exercise from the top.
    ///
    /// Re-entrant: starting a running engine restarts it; deadlines from the
    /// previous run are superseded by the reset.
    pub fn start(&mut self) {
        self.running = true;
        self.paused = false;
        self.phase_index = 0;
        self.set_index = 0;
        self.breath = BreathState::Inhale;
        self.elapsed_ms = 0;
        self.pending_cues.clear();

        tracing::info!(
            "Starting exercise: {} sets across {} phases",
            self.total_sets(),
            self.phases.len()
        );

        self.notify_phase();
        self.notify_set();
        self.begin_step();
    }

    /// Freeze the countdown; no-op unless running and unpaused
    pub fn pause(&mut self) {
        if !self.running || self.paused {
            return;
        }
        let now = self.clock.now_ms();
        self.elapsed_ms += now.saturating_sub(self.step_started_ms);
        self.paused = true;
        tracing::debug!("Paused with {}ms elapsed in step", self.elapsed_ms);
    }

    /// Continue from where `pause()` left off; no-op unless paused.
    ///
    /// Remaining time is recomputed from the elapsed accumulator; the tick
    /// cadence restarts, and only hold cues whose trigger point still lies
    /// within the remaining time can fire.
    pub fn resume(&mut self) {
        if !self.running || !self.paused {
            return;
        }
        let now = self.clock.now_ms();
        self.step_started_ms = now;
        self.next_tick_ms = now + TICK_INTERVAL_MS;
        self.paused = false;
        tracing::debug!("Resumed with {}ms remaining in step", self.remaining_ms());
    }

    /// Halt unconditionally and drop every pending deadline. Idempotent.
    pub fn stop(&mut self) {
        self.running = false;
        self.paused = false;
        self.pending_cues.clear();
    }

    /// Host pump. No-op while stopped or paused.
    ///
    /// Fires due hold cues, emits the advisory countdown, and advances the
    /// state machine once the step duration has elapsed.
    pub fn tick(&mut self) {
        if !self.running || self.paused {
            return;
        }

        let now = self.clock.now_ms();
        let duration = self.step_duration_ms();
        let total = self.total_elapsed_ms();
        let remaining = duration.saturating_sub(total);

        while self
            .pending_cues
            .first()
            .is_some_and(|cue| remaining <= cue.at_remaining_ms)
        {
            let cue = self.pending_cues.remove(0);
            self.listener.on_hold_speak(cue.word);
        }

        if total < duration && now >= self.next_tick_ms {
            let seconds_left = remaining.div_ceil(1000) as u32;
            self.listener.on_tick(seconds_left);
            self.next_tick_ms = now + TICK_INTERVAL_MS;
        }

        if total >= duration {
            self.advance();
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn current_phase(&self) -> &PhaseSpec {
        &self.phases[self.phase_index]
    }

    fn step_duration_secs(&self) -> u32 {
        match self.breath {
            BreathState::Inhale => self.current_phase().inhale_duration,
            BreathState::Hold => HOLD_DURATION_SECS,
            BreathState::Exhale => self.current_phase().exhale_duration,
        }
    }

    fn step_duration_ms(&self) -> u64 {
        u64::from(self.step_duration_secs()) * 1000
    }

    fn total_elapsed_ms(&self) -> u64 {
        if self.paused {
            self.elapsed_ms
        } else {
            let now = self.clock.now_ms();
            self.elapsed_ms + now.saturating_sub(self.step_started_ms)
        }
    }

    /// Enter the current (phase, set, breath) step: reset the accumulator,
    /// stamp the clock, announce the step, and plan hold cues if holding.
    fn begin_step(&mut self) {
        let now = self.clock.now_ms();
        self.elapsed_ms = 0;
        self.step_started_ms = now;
        self.next_tick_ms = now + TICK_INTERVAL_MS;
        self.pending_cues.clear();

        let state = self.breath;
        let duration_secs = self.step_duration_secs();
        self.listener.on_breath_change(state, duration_secs);

        if state == BreathState::Hold {
            self.pending_cues = plan_hold_cues(u64::from(duration_secs) * 1000);
        }

        tracing::debug!(
            "Step {} for {}s (phase {}, set {})",
            state,
            duration_secs,
            self.phase_index + 1,
            self.set_index + 1
        );
    }

    /// Authoritative step-advance: the only place state transitions happen
    fn advance(&mut self) {
        match self.breath {
            BreathState::Inhale => {
                self.breath = BreathState::Hold;
                self.begin_step();
            }
            BreathState::Hold => {
                self.breath = BreathState::Exhale;
                self.begin_step();
            }
            BreathState::Exhale => {
                // Exhale done - finished one set
                self.breath = BreathState::Inhale;
                self.set_index += 1;

                if self.set_index >= self.current_phase().sets {
                    self.phase_index += 1;
                    self.set_index = 0;

                    if self.phase_index >= self.phases.len() {
                        self.running = false;
                        self.pending_cues.clear();
                        tracing::info!("Exercise complete");
                        self.listener.on_complete();
                        return;
                    }

                    self.notify_phase();
                }

                self.notify_set();
                self.begin_step();
            }
        }
    }

    fn notify_phase(&mut self) {
        let current = (self.phase_index + 1) as u32;
        let total = self.phases.len() as u32;
        self.listener.on_phase_change(current, total);
    }

    fn notify_set(&mut self) {
        let current = self.set_index + 1;
        let in_phase = self.current_phase().sets;
        let completed = self.completed_sets();
        let total = self.total_sets();
        self.listener.on_set_change(current, in_phase, completed, total);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone, Debug, PartialEq)]
    enum Ev {
        Breath(BreathState, u32),
        Set(u32, u32, u32, u32),
        Phase(u32, u32),
        Speak(String),
        Tick(u32),
        Complete,
    }

    struct Recorder {
        events: Rc<RefCell<Vec<Ev>>>,
    }

    impl ExerciseListener for Recorder {
        fn on_breath_change(&mut self, state: BreathState, duration_secs: u32) {
            self.events.borrow_mut().push(Ev::Breath(state, duration_secs));
        }
        fn on_set_change(
            &mut self,
            current_set: u32,
            sets_in_phase: u32,
            completed_sets: u32,
            total_sets: u32,
        ) {
            self.events.borrow_mut().push(Ev::Set(
                current_set,
                sets_in_phase,
                completed_sets,
                total_sets,
            ));
        }
        fn on_phase_change(&mut self, current_phase: u32, total_phases: u32) {
            self.events
                .borrow_mut()
                .push(Ev::Phase(current_phase, total_phases));
        }
        fn on_hold_speak(&mut self, word: &str) {
            self.events.borrow_mut().push(Ev::Speak(word.to_string()));
        }
        fn on_tick(&mut self, seconds_left: u32) {
            self.events.borrow_mut().push(Ev::Tick(seconds_left));
        }
        fn on_complete(&mut self) {
            self.events.borrow_mut().push(Ev::Complete);
        }
    }

    fn program(p1: (u32, u32, u32), p2: (u32, u32, u32)) -> ExerciseProgram {
        ExerciseProgram {
            id: None,
            name: "test".into(),
            phase1: PhaseSpec {
                sets: p1.0,
                inhale_duration: p1.1,
                exhale_duration: p1.2,
            },
            phase2: PhaseSpec {
                sets: p2.0,
                inhale_duration: p2.1,
                exhale_duration: p2.2,
            },
        }
    }

    fn engine_for(
        program: &ExerciseProgram,
    ) -> (BreathingEngine, ManualClock, Rc<RefCell<Vec<Ev>>>) {
        let events = Rc::new(RefCell::new(Vec::new()));
        let clock = ManualClock::new();
        let engine = BreathingEngine::with_clock(
            program,
            Box::new(Recorder {
                events: events.clone(),
            }),
            Box::new(clock.clone()),
        );
        (engine, clock, events)
    }

    /// Pump in 50ms increments until the engine halts
    fn run_to_completion(engine: &mut BreathingEngine, clock: &ManualClock) {
        for _ in 0..100_000 {
            if !engine.running() {
                return;
            }
            clock.advance(50);
            engine.tick();
        }
        panic!("engine never completed");
    }

    fn without_ticks(events: &[Ev]) -> Vec<Ev> {
        events
            .iter()
            .filter(|e| !matches!(e, Ev::Tick(_)))
            .cloned()
            .collect()
    }

    #[test]
    fn test_canonical_event_order() {
        let program = program((1, 2, 2), (1, 1, 1));
        let (mut engine, clock, events) = engine_for(&program);

        engine.start();
        run_to_completion(&mut engine, &clock);

        let expected = vec![
            Ev::Phase(1, 2),
            Ev::Set(1, 1, 0, 2),
            Ev::Breath(BreathState::Inhale, 2),
            Ev::Breath(BreathState::Hold, 3),
            Ev::Speak("hold".into()),
            Ev::Speak("two".into()),
            Ev::Speak("one".into()),
            Ev::Breath(BreathState::Exhale, 2),
            Ev::Phase(2, 2),
            Ev::Set(1, 1, 1, 2),
            Ev::Breath(BreathState::Inhale, 1),
            Ev::Breath(BreathState::Hold, 3),
            Ev::Speak("hold".into()),
            Ev::Speak("two".into()),
            Ev::Speak("one".into()),
            Ev::Breath(BreathState::Exhale, 1),
            Ev::Complete,
        ];
        assert_eq!(without_ticks(&events.borrow()), expected);
    }

    #[test]
    fn test_total_and_completed_sets() {
        let program = program((2, 1, 1), (3, 1, 1));
        let (mut engine, clock, events) = engine_for(&program);

        assert_eq!(engine.total_sets(), 5);

        engine.start();
        run_to_completion(&mut engine, &clock);

        // completed_sets increments by exactly one per started set
        let completed: Vec<u32> = events
            .borrow()
            .iter()
            .filter_map(|e| match e {
                Ev::Set(_, _, completed, _) => Some(*completed),
                _ => None,
            })
            .collect();
        assert_eq!(completed, vec![0, 1, 2, 3, 4]);

        // ...and reaches the total at the moment on_complete fires
        assert_eq!(engine.completed_sets(), 5);
        assert_eq!(*events.borrow().last().unwrap(), Ev::Complete);
    }

    #[test]
    fn test_complete_fires_once() {
        let program = program((1, 1, 1), (1, 1, 1));
        let (mut engine, clock, events) = engine_for(&program);

        engine.start();
        run_to_completion(&mut engine, &clock);

        // Extra pumping after the terminal state produces nothing
        clock.advance(10_000);
        engine.tick();
        engine.tick();

        let completions = events
            .borrow()
            .iter()
            .filter(|e| matches!(e, Ev::Complete))
            .count();
        assert_eq!(completions, 1);
        assert!(!engine.running());
        assert!(!engine.paused());
    }

    #[test]
    fn test_pause_preserves_remaining_time() {
        let program = program((1, 4, 4), (1, 1, 1));
        let (mut engine, clock, _events) = engine_for(&program);

        engine.start();
        clock.advance(1500);
        engine.tick();
        engine.pause();

        assert_eq!(engine.remaining_ms(), 2500);

        // Wall-clock time during a pause does not count
        clock.advance(60_000);
        engine.tick();
        assert_eq!(engine.remaining_ms(), 2500);
        assert_eq!(engine.breath(), BreathState::Inhale);

        engine.resume();
        assert_eq!(engine.remaining_ms(), 2500);

        // The step finishes exactly 2500ms of live time later
        clock.advance(2450);
        engine.tick();
        assert_eq!(engine.breath(), BreathState::Inhale);
        clock.advance(50);
        engine.tick();
        assert_eq!(engine.breath(), BreathState::Hold);
    }

    #[test]
    fn test_repeated_pause_cycles_accumulate_correctly() {
        let program = program((1, 6, 1), (1, 1, 1));
        let (mut engine, clock, _events) = engine_for(&program);

        engine.start();

        // Three 1s bursts of live time separated by long pauses
        for _ in 0..3 {
            clock.advance(1000);
            engine.tick();
            engine.pause();
            clock.advance(30_000);
            engine.resume();
        }

        assert_eq!(engine.remaining_ms(), 3000);
        assert_eq!(engine.breath(), BreathState::Inhale);
    }

    #[test]
    fn test_pause_and_stop_are_idempotent() {
        let program = program((1, 2, 2), (1, 1, 1));
        let (mut engine, clock, events) = engine_for(&program);

        engine.start();
        clock.advance(500);
        engine.tick();

        engine.pause();
        let remaining = engine.remaining_ms();
        engine.pause(); // no-op
        assert_eq!(engine.remaining_ms(), remaining);

        engine.stop();
        let count = events.borrow().len();
        engine.stop(); // no-op
        clock.advance(5000);
        engine.tick();

        assert_eq!(events.borrow().len(), count);
        assert!(!engine.running());
        assert!(!engine.paused());
    }

    #[test]
    fn test_pause_before_start_and_resume_unpaused_are_noops() {
        let program = program((1, 2, 2), (1, 1, 1));
        let (mut engine, _clock, events) = engine_for(&program);

        engine.pause();
        engine.resume();
        assert!(events.borrow().is_empty());

        engine.start();
        engine.resume(); // not paused
        assert!(engine.running());
        assert!(!engine.paused());
    }

    #[test]
    fn test_restart_supersedes_previous_run() {
        let program = program((2, 1, 1), (1, 1, 1));
        let (mut engine, clock, events) = engine_for(&program);

        engine.start();
        clock.advance(1000);
        engine.tick(); // into the first hold
        assert_eq!(engine.breath(), BreathState::Hold);

        engine.start();
        assert_eq!(engine.breath(), BreathState::Inhale);
        assert_eq!(engine.completed_sets(), 0);

        // Fresh run emits the initial phase/set/breath announcements again
        let tail: Vec<Ev> = without_ticks(&events.borrow())
            .into_iter()
            .rev()
            .take(3)
            .collect();
        assert_eq!(
            tail,
            vec![
                Ev::Breath(BreathState::Inhale, 1),
                Ev::Set(1, 2, 0, 3),
                Ev::Phase(1, 2),
            ]
        );

        run_to_completion(&mut engine, &clock);
        assert_eq!(engine.completed_sets(), 3);
    }

    #[test]
    fn test_tick_cadence_and_countdown_values() {
        let program = program((1, 2, 2), (1, 1, 1));
        let (mut engine, clock, events) = engine_for(&program);

        engine.start();

        // No countdown before the first 100ms boundary
        clock.advance(50);
        engine.tick();
        assert!(events
            .borrow()
            .iter()
            .all(|e| !matches!(e, Ev::Tick(_))));

        // 1900ms remaining -> 2 seconds left
        clock.advance(50);
        engine.tick();
        assert_eq!(*events.borrow().last().unwrap(), Ev::Tick(2));

        // A second call inside the same 100ms window stays silent
        engine.tick();
        assert_eq!(
            events
                .borrow()
                .iter()
                .filter(|e| matches!(e, Ev::Tick(_)))
                .count(),
            1
        );

        // 950ms remaining -> 1 second left
        clock.advance(950);
        engine.tick();
        assert_eq!(*events.borrow().last().unwrap(), Ev::Tick(1));
    }

    #[test]
    fn test_no_events_while_paused() {
        let program = program((1, 4, 4), (1, 1, 1));
        let (mut engine, clock, events) = engine_for(&program);

        engine.start();
        clock.advance(200);
        engine.tick();
        engine.pause();

        let count = events.borrow().len();
        for _ in 0..20 {
            clock.advance(500);
            engine.tick();
        }
        assert_eq!(events.borrow().len(), count);
    }

    #[test]
    fn test_hold_cue_planning_skips_cues_that_do_not_fit() {
        let full: Vec<&str> = plan_hold_cues(3000).iter().map(|c| c.word).collect();
        assert_eq!(full, vec!["hold", "two", "one"]);

        // Hypothetical shorter holds drop the cues that fall outside the step
        let short: Vec<&str> = plan_hold_cues(1500).iter().map(|c| c.word).collect();
        assert_eq!(short, vec!["hold", "one"]);

        let tiny: Vec<&str> = plan_hold_cues(500).iter().map(|c| c.word).collect();
        assert_eq!(tiny, vec!["hold"]);
    }

    #[test]
    fn test_resume_mid_hold_fires_only_future_cues() {
        let program = program((1, 1, 1), (1, 1, 1));
        let (mut engine, clock, events) = engine_for(&program);

        engine.start();
        clock.advance(1000);
        engine.tick(); // inhale done -> hold begins
        assert_eq!(engine.breath(), BreathState::Hold);

        // 1100ms into the hold: "hold" and "two" have fired
        clock.advance(50);
        engine.tick();
        clock.advance(1050);
        engine.tick();
        let spoken_before: Vec<Ev> = events
            .borrow()
            .iter()
            .filter(|e| matches!(e, Ev::Speak(_)))
            .cloned()
            .collect();
        assert_eq!(
            spoken_before,
            vec![Ev::Speak("hold".into()), Ev::Speak("two".into())]
        );

        engine.pause();
        clock.advance(45_000);
        engine.resume();

        // 1900ms remaining: "one" is still in the future
        clock.advance(100);
        engine.tick();
        let speak_count = events
            .borrow()
            .iter()
            .filter(|e| matches!(e, Ev::Speak(_)))
            .count();
        assert_eq!(speak_count, 2);

        // ...and fires exactly once at the 1s-remaining mark
        clock.advance(900);
        engine.tick();
        let spoken_after: Vec<Ev> = events
            .borrow()
            .iter()
            .filter(|e| matches!(e, Ev::Speak(_)))
            .cloned()
            .collect();
        assert_eq!(
            spoken_after,
            vec![
                Ev::Speak("hold".into()),
                Ev::Speak("two".into()),
                Ev::Speak("one".into()),
            ]
        );
    }

    #[test]
    fn test_breath_change_precedes_ticks_within_each_step() {
        let program = program((1, 1, 1), (1, 1, 1));
        let (mut engine, clock, events) = engine_for(&program);

        engine.start();
        run_to_completion(&mut engine, &clock);

        // Walk the log: every tick must belong to the breath step announced
        // most recently before it, and each step announces before ticking.
        let mut saw_breath = false;
        for ev in events.borrow().iter() {
            match ev {
                Ev::Breath(..) => saw_breath = true,
                Ev::Tick(_) => assert!(saw_breath, "tick before any breath announcement"),
                _ => {}
            }
        }
    }

    #[test]
    fn test_remaining_is_zero_when_stopped() {
        let program = program((1, 2, 2), (1, 1, 1));
        let (mut engine, clock, _events) = engine_for(&program);

        assert_eq!(engine.remaining_ms(), 0);
        engine.start();
        clock.advance(500);
        assert_eq!(engine.remaining_ms(), 1500);
        engine.stop();
        assert_eq!(engine.remaining_ms(), 0);
    }
}

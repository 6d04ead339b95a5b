use airway_core::*;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::Duration;

/// Pump interval for the exercise loop; well under the engine's 100ms
/// countdown cadence.
const PUMP_INTERVAL: Duration = Duration::from_millis(25);

#[derive(Parser)]
#[command(name = "airway")]
#[command(about = "Guided breathing exercise trainer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Override data directory
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored breathing programs (default)
    List,

    /// Add a new program
    Add {
        /// Program name
        #[arg(long)]
        name: String,

        /// Phase 1 set count
        #[arg(long)]
        p1_sets: u32,

        /// Phase 1 inhale seconds
        #[arg(long)]
        p1_inhale: u32,

        /// Phase 1 exhale seconds
        #[arg(long)]
        p1_exhale: u32,

        /// Phase 2 set count
        #[arg(long)]
        p2_sets: u32,

        /// Phase 2 inhale seconds
        #[arg(long)]
        p2_inhale: u32,

        /// Phase 2 exhale seconds
        #[arg(long)]
        p2_exhale: u32,
    },

    /// Edit fields of an existing program
    Edit {
        /// Program id
        id: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        p1_sets: Option<u32>,

        #[arg(long)]
        p1_inhale: Option<u32>,

        #[arg(long)]
        p1_exhale: Option<u32>,

        #[arg(long)]
        p2_sets: Option<u32>,

        #[arg(long)]
        p2_inhale: Option<u32>,

        #[arg(long)]
        p2_exhale: Option<u32>,
    },

    /// Remove a program
    Remove {
        /// Program id
        id: String,
    },

    /// Run a breathing exercise
    Start {
        /// Program id
        id: String,

        /// Skip speech narration
        #[arg(long)]
        no_audio: bool,
    },
}

fn main() -> Result<()> {
    airway_core::logging::init();

    let cli = Cli::parse();

    let config = Config::load()?;
    let data_dir = cli.data_dir.unwrap_or_else(|| config.data.data_dir.clone());
    tracing::debug!("Using data directory {:?}", data_dir);

    let repo = ProgramRepository::new(data_dir.join("programs.json"));

    match cli.command {
        Some(Commands::Add {
            name,
            p1_sets,
            p1_inhale,
            p1_exhale,
            p2_sets,
            p2_inhale,
            p2_exhale,
        }) => cmd_add(
            &repo,
            name,
            (p1_sets, p1_inhale, p1_exhale),
            (p2_sets, p2_inhale, p2_exhale),
        ),
        Some(Commands::Edit {
            id,
            name,
            p1_sets,
            p1_inhale,
            p1_exhale,
            p2_sets,
            p2_inhale,
            p2_exhale,
        }) => cmd_edit(
            &repo,
            &id,
            name,
            [p1_sets, p1_inhale, p1_exhale, p2_sets, p2_inhale, p2_exhale],
        ),
        Some(Commands::Remove { id }) => cmd_remove(&repo, &id),
        Some(Commands::Start { id, no_audio }) => cmd_start(&repo, &config, &id, no_audio),
        Some(Commands::List) | None => cmd_list(&repo),
    }
}

fn cmd_list(repo: &ProgramRepository) -> Result<()> {
    let programs = repo.list_all()?;

    println!("╭─────────────────────────────────────────╮");
    println!("│  BREATHING PROGRAMS");
    println!("╰─────────────────────────────────────────╯");

    for program in &programs {
        println!();
        println!(
            "  {}  [{}]",
            program.name,
            program.id.as_deref().unwrap_or("-")
        );
        println!(
            "    P1: {} sets ({}s in / {}s out) · P2: {} sets ({}s in / {}s out)",
            program.phase1.sets,
            program.phase1.inhale_duration,
            program.phase1.exhale_duration,
            program.phase2.sets,
            program.phase2.inhale_duration,
            program.phase2.exhale_duration,
        );
    }

    println!();
    Ok(())
}

fn cmd_add(
    repo: &ProgramRepository,
    name: String,
    p1: (u32, u32, u32),
    p2: (u32, u32, u32),
) -> Result<()> {
    let program = ExerciseProgram {
        id: None,
        name,
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
    };

    let saved = repo.save(program)?;
    println!(
        "✓ Saved '{}' [{}]",
        saved.name,
        saved.id.as_deref().unwrap_or("-")
    );
    Ok(())
}

fn cmd_edit(
    repo: &ProgramRepository,
    id: &str,
    name: Option<String>,
    fields: [Option<u32>; 6],
) -> Result<()> {
    let mut program = repo
        .get_by_id(id)?
        .ok_or_else(|| Error::Other(format!("No program with id '{}'", id)))?;

    if let Some(name) = name {
        program.name = name;
    }
    let [p1_sets, p1_inhale, p1_exhale, p2_sets, p2_inhale, p2_exhale] = fields;
    if let Some(v) = p1_sets {
        program.phase1.sets = v;
    }
    if let Some(v) = p1_inhale {
        program.phase1.inhale_duration = v;
    }
    if let Some(v) = p1_exhale {
        program.phase1.exhale_duration = v;
    }
    if let Some(v) = p2_sets {
        program.phase2.sets = v;
    }
    if let Some(v) = p2_inhale {
        program.phase2.inhale_duration = v;
    }
    if let Some(v) = p2_exhale {
        program.phase2.exhale_duration = v;
    }

    let saved = repo.save(program)?;
    println!("✓ Updated '{}'", saved.name);
    Ok(())
}

fn cmd_remove(repo: &ProgramRepository, id: &str) -> Result<()> {
    if repo.get_by_id(id)?.is_none() {
        println!("Nothing to remove: no program with id '{}'", id);
        return Ok(());
    }
    repo.remove(id)?;
    println!("✓ Removed {}", id);
    Ok(())
}

fn cmd_start(repo: &ProgramRepository, config: &Config, id: &str, no_audio: bool) -> Result<()> {
    let program = repo
        .get_by_id(id)?
        .ok_or_else(|| Error::Other(format!("No program with id '{}'", id)))?;

    let narrator: Box<dyn Narrator> = if no_audio || !config.audio.enabled {
        Box::new(NullNarrator)
    } else {
        let mut narrator = match &config.audio.command {
            Some(command) => SpeechNarrator::with_command(command),
            None => SpeechNarrator::new(),
        };
        // Prepare up front so the backend is ready before the first cue
        narrator.prepare();
        Box::new(narrator)
    };

    println!("╭─────────────────────────────────────────╮");
    println!("│  {}", program.name);
    println!("╰─────────────────────────────────────────╯");
    println!("  Controls: 'p' pause · 'r' resume · 'q' stop (then Enter)");

    let listener = TerminalListener { narrator };
    let mut engine = BreathingEngine::new(&program, Box::new(listener));
    let commands = spawn_stdin_reader();

    engine.start();
    while engine.running() {
        engine.tick();

        match commands.try_recv() {
            Ok(line) => match line.trim() {
                "p" => {
                    engine.pause();
                    clear_line();
                    println!("[paused; 'r' to resume]");
                }
                "r" => engine.resume(),
                "q" => {
                    engine.stop();
                    clear_line();
                    println!("[stopped]");
                }
                _ => {}
            },
            Err(TryRecvError::Empty) => {}
            // stdin closed (e.g. piped input ran out); keep exercising
            Err(TryRecvError::Disconnected) => {}
        }

        thread::sleep(PUMP_INTERVAL);
    }

    // Dropping the narrator cancels in-flight speech; give the completion
    // cue time to play out first.
    if engine.completed_sets() == engine.total_sets() {
        thread::sleep(Duration::from_secs(2));
    }

    Ok(())
}

/// Forward stdin lines over a channel so the pump loop never blocks
fn spawn_stdin_reader() -> Receiver<String> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(_) => break,
            }
        }
    });
    rx
}

fn clear_line() {
    print!("\r\x1b[2K");
    let _ = io::stdout().flush();
}

/// Renders engine events on the terminal and narrates the cue texts
struct TerminalListener {
    narrator: Box<dyn Narrator>,
}

impl ExerciseListener for TerminalListener {
    fn on_phase_change(&mut self, current_phase: u32, total_phases: u32) {
        clear_line();
        println!("Phase {} of {}", current_phase, total_phases);
        if current_phase > 1 {
            self.narrator.speak(&format!("Phase {}", current_phase));
        }
    }

    fn on_set_change(
        &mut self,
        current_set: u32,
        sets_in_phase: u32,
        completed_sets: u32,
        total_sets: u32,
    ) {
        clear_line();
        println!(
            "Set {} / {}   ({} of {} overall)",
            current_set, sets_in_phase, completed_sets, total_sets
        );
    }

    fn on_breath_change(&mut self, state: BreathState, duration_secs: u32) {
        clear_line();
        match state {
            BreathState::Inhale => {
                self.narrator.speak("breathe in");
                println!("  Breathe in ({}s)", duration_secs);
            }
            BreathState::Hold => {
                // Spoken through on_hold_speak
                println!("  Hold ({}s)", duration_secs);
            }
            BreathState::Exhale => {
                self.narrator.speak("breathe out");
                println!("  Breathe out ({}s)", duration_secs);
            }
        }
    }

    fn on_hold_speak(&mut self, word: &str) {
        self.narrator.speak(word);
    }

    fn on_tick(&mut self, seconds_left: u32) {
        if seconds_left > 0 {
            print!("\r      {:>2} ", seconds_left);
            let _ = io::stdout().flush();
        } else {
            clear_line();
        }
    }

    fn on_complete(&mut self) {
        clear_line();
        println!("\n✓ Exercise complete. Well done.");
        self.narrator.speak("Exercise complete. Well done.");
    }
}

mod input;

use std::fs::File;
use std::io::BufRead;
use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam_channel::RecvTimeoutError;

use duet_audio::{DuetFeedback, DuetHandle, LogBackend};
use duet_core::config::Config;

use input::{parse_line, Input, HELP};

/// How long to keep listening after stdin closes: the longest pass.
const LINGER: Duration = Duration::from_millis(1500);
const POLL_INTERVAL: Duration = Duration::from_millis(10);

fn init_logging(verbose: bool) {
    use simplelog::*;

    let log_level = if verbose { LevelFilter::Debug } else { LevelFilter::Warn };

    let log_path = dirs::config_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("piano-duet")
        .join("piano-duet.log");

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = match File::create(&log_path) {
        Ok(file) => file,
        Err(_) => match File::create(std::env::temp_dir().join("piano-duet.log")) {
            Ok(file) => file,
            Err(e) => {
                eprintln!("logging disabled: {}", e);
                return;
            }
        },
    };

    if let Err(e) = WriteLogger::init(log_level, simplelog::Config::default(), log_file) {
        eprintln!("logging disabled: {}", e);
        return;
    }

    log::info!("piano-duet starting (log level: {:?})", log_level);
}

fn print_feedback(feedback: &DuetFeedback, json: bool) {
    if json {
        match serde_json::to_string(feedback) {
            Ok(line) => println!("{}", line),
            Err(e) => log::warn!("feedback not serializable: {}", e),
        }
        return;
    }
    match feedback {
        DuetFeedback::Highlight { note, active } => {
            println!("  {} {}", if *active { "+" } else { "-" }, note);
        }
        DuetFeedback::Harmony {
            played,
            key,
            chord,
            style,
            events,
        } => println!("{} in {}: {} ({}, {} notes)", played, key, chord, style, events),
        DuetFeedback::Error { message } => eprintln!("error: {}", message),
    }
}

fn main() -> std::io::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let verbose = args.iter().any(|a| a == "--verbose" || a == "-v");
    init_logging(verbose);

    let json = args.iter().any(|a| a == "--json");
    let config_path = args
        .iter()
        .position(|a| a == "--config")
        .and_then(|i| args.get(i + 1).cloned());

    let config = match config_path {
        Some(path) => Config::load_from(Path::new(&path)),
        None => Config::load(),
    };
    let settings = match config.settings() {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("config error: {}", e);
            std::process::exit(1);
        }
    };

    let mut handle = DuetHandle::spawn(LogBackend, settings);

    let (line_tx, line_rx) = crossbeam_channel::unbounded();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log::warn!("stdin: {}", e);
                    break;
                }
            }
        }
    });

    loop {
        match line_rx.recv_timeout(POLL_INTERVAL) {
            Ok(line) => match parse_line(&line) {
                Ok(Input::Notes(notes)) => {
                    for note in &notes {
                        handle.play_note(note);
                    }
                }
                Ok(Input::Command(cmd)) => {
                    if let Err(e) = handle.send_cmd(cmd) {
                        eprintln!("{}", e);
                        break;
                    }
                }
                Ok(Input::Help) => println!("{}", HELP),
                Ok(Input::Quit) => break,
                Ok(Input::Empty) => {}
                Err(message) => eprintln!("{}", message),
            },
            Err(RecvTimeoutError::Timeout) => {}
            Err(RecvTimeoutError::Disconnected) => {
                // stdin closed: let the last pass play out.
                let deadline = Instant::now() + LINGER;
                while Instant::now() < deadline {
                    for feedback in handle.drain_feedback() {
                        print_feedback(&feedback, json);
                    }
                    thread::sleep(POLL_INTERVAL);
                }
                break;
            }
        }

        for feedback in handle.drain_feedback() {
            print_feedback(&feedback, json);
        }
    }

    handle.shutdown();
    for feedback in handle.drain_feedback() {
        print_feedback(&feedback, json);
    }
    Ok(())
}

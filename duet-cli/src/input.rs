//! One line of terminal input → what to do with it.

use duet_audio::DuetCmd;
use duet_core::{AccompanimentStyle, PitchClass, Tuning};

pub const HELP: &str = "\
notes:    C4 E4 G4 ...        (each token is played in turn)
commands: :on | :off          start / end an accompaniment session
          :style <chords|arpeggio|bass|counterpoint>
          :tuning <equal|just>
          :key <root>         tonic for just intonation, e.g. D or F#
          :volume <0..1>
          :stop <note>        release a held note
          :panic              silence everything
          :help | :quit";

#[derive(Debug, Clone, PartialEq)]
pub enum Input {
    Notes(Vec<String>),
    Command(DuetCmd),
    Help,
    Quit,
    Empty,
}

pub fn parse_line(line: &str) -> Result<Input, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Input::Empty);
    }
    let Some(command) = line.strip_prefix(':') else {
        return Ok(Input::Notes(line.split_whitespace().map(str::to_string).collect()));
    };

    let mut words = command.split_whitespace();
    let name = words.next().unwrap_or("");
    let arg = words.next();

    let cmd = match (name, arg) {
        ("on", None) => DuetCmd::Enable,
        ("off", None) => DuetCmd::Disable,
        ("panic", None) => DuetCmd::Panic,
        ("help", None) => return Ok(Input::Help),
        ("quit" | "q", None) => return Ok(Input::Quit),
        ("style", Some(style)) => {
            DuetCmd::SetStyle(style.parse::<AccompanimentStyle>().map_err(|e| e.to_string())?)
        }
        ("tuning", Some(tuning)) => {
            DuetCmd::SetTuning(tuning.parse::<Tuning>().map_err(|e| e.to_string())?)
        }
        ("key", Some(root)) => {
            DuetCmd::SetKeyRoot(root.parse::<PitchClass>().map_err(|e| e.to_string())?)
        }
        ("volume", Some(volume)) => {
            let volume: f32 = volume
                .parse()
                .map_err(|_| format!("volume must be a number, got {:?}", volume))?;
            DuetCmd::SetVolume(volume)
        }
        ("stop", Some(note)) => DuetCmd::StopNote {
            note: note.to_string(),
        },
        _ => return Err(format!("unknown command {:?} (try :help)", line)),
    };
    Ok(Input::Command(cmd))
}

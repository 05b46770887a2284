use std::path::{Path, PathBuf};

use serde::Deserialize;

use duet_types::{AccompanimentStyle, DuetError, PitchClass, Tuning, TuningContext};

use crate::history::DEFAULT_HISTORY_SIZE;

const DEFAULT_CONFIG: &str = include_str!("../config.toml");

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    accompaniment: AccompanimentConfig,
    #[serde(default)]
    tuning: TuningConfig,
    #[serde(default)]
    audio: AudioConfig,
}

#[derive(Deserialize, Default)]
struct AccompanimentConfig {
    enabled: Option<bool>,
    style: Option<String>,
    history_size: Option<usize>,
}

#[derive(Deserialize, Default)]
struct TuningConfig {
    system: Option<String>,
    key_root: Option<String>,
    a4: Option<f64>,
}

#[derive(Deserialize, Default)]
struct AudioConfig {
    volume: Option<f32>,
    user_velocity: Option<f32>,
    accompaniment_gain: Option<f32>,
}

/// Settings consumed by `AccompanimentEngine`.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineSettings {
    pub enabled: bool,
    pub style: AccompanimentStyle,
    pub history_size: usize,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            style: AccompanimentStyle::default(),
            history_size: DEFAULT_HISTORY_SIZE,
        }
    }
}

/// Settings consumed by the tone renderer.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioSettings {
    pub tuning: TuningContext,
    pub volume: f32,
    pub user_velocity: f32,
    pub accompaniment_gain: f32,
}

impl Default for AudioSettings {
    fn default() -> Self {
        Self {
            tuning: TuningContext::default(),
            volume: 0.7,
            user_velocity: 0.8,
            accompaniment_gain: 0.6,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Settings {
    pub engine: EngineSettings,
    pub audio: AudioSettings,
}

pub struct Config {
    accompaniment: AccompanimentConfig,
    tuning: TuningConfig,
    audio: AudioConfig,
}

impl Config {
    /// Embedded defaults merged with `~/.config/piano-duet/config.toml` if present.
    pub fn load() -> Self {
        match user_config_path() {
            Some(path) => Self::load_from(&path),
            None => Self::embedded(),
        }
    }

    /// Embedded defaults merged with the file at `path`. A missing, unreadable
    /// or malformed file is logged and leaves the defaults untouched.
    pub fn load_from(path: &Path) -> Self {
        let mut base = Self::embedded();

        if path.exists() {
            match std::fs::read_to_string(path) {
                Ok(contents) => match toml::from_str::<ConfigFile>(&contents) {
                    Ok(user) => base.merge(user),
                    Err(e) => {
                        log::warn!(target: "config", "ignoring malformed config {}: {}", path.display(), e)
                    }
                },
                Err(e) => {
                    log::warn!(target: "config", "could not read config {}: {}", path.display(), e)
                }
            }
        }

        base
    }

    fn embedded() -> Self {
        let file: ConfigFile =
            toml::from_str(DEFAULT_CONFIG).expect("Failed to parse embedded config.toml");
        Config {
            accompaniment: file.accompaniment,
            tuning: file.tuning,
            audio: file.audio,
        }
    }

    fn merge(&mut self, user: ConfigFile) {
        merge_accompaniment(&mut self.accompaniment, user.accompaniment);
        merge_tuning(&mut self.tuning, user.tuning);
        merge_audio(&mut self.audio, user.audio);
    }

    /// Resolve names into typed settings. Unknown style, tuning or key names
    /// are rejected here rather than at trigger time.
    pub fn settings(&self) -> Result<Settings, DuetError> {
        Ok(Settings {
            engine: self.engine_settings()?,
            audio: self.audio_settings()?,
        })
    }

    pub fn engine_settings(&self) -> Result<EngineSettings, DuetError> {
        let fallback = EngineSettings::default();
        let style = match self.accompaniment.style.as_deref() {
            Some(name) => name.parse()?,
            None => fallback.style,
        };
        Ok(EngineSettings {
            enabled: self.accompaniment.enabled.unwrap_or(fallback.enabled),
            style,
            history_size: self
                .accompaniment
                .history_size
                .unwrap_or(fallback.history_size)
                .max(1),
        })
    }

    pub fn audio_settings(&self) -> Result<AudioSettings, DuetError> {
        let fallback = AudioSettings::default();
        let tuning = match self.tuning.system.as_deref() {
            Some(name) => name.parse::<Tuning>()?,
            None => fallback.tuning.tuning,
        };
        let key_root = match self.tuning.key_root.as_deref() {
            Some(name) => name.parse::<PitchClass>()?,
            None => fallback.tuning.key_root,
        };
        Ok(AudioSettings {
            tuning: TuningContext {
                tuning,
                key_root,
                tuning_a4: self.tuning.a4.unwrap_or(fallback.tuning.tuning_a4),
            },
            volume: self.audio.volume.unwrap_or(fallback.volume).clamp(0.0, 1.0),
            user_velocity: self
                .audio
                .user_velocity
                .unwrap_or(fallback.user_velocity)
                .clamp(0.0, 1.0),
            accompaniment_gain: self
                .audio
                .accompaniment_gain
                .unwrap_or(fallback.accompaniment_gain)
                .clamp(0.0, 1.0),
        })
    }
}

pub fn user_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("piano-duet").join("config.toml"))
}

fn merge_accompaniment(base: &mut AccompanimentConfig, user: AccompanimentConfig) {
    if user.enabled.is_some() {
        base.enabled = user.enabled;
    }
    if user.style.is_some() {
        base.style = user.style;
    }
    if user.history_size.is_some() {
        base.history_size = user.history_size;
    }
}

fn merge_tuning(base: &mut TuningConfig, user: TuningConfig) {
    if user.system.is_some() {
        base.system = user.system;
    }
    if user.key_root.is_some() {
        base.key_root = user.key_root;
    }
    if user.a4.is_some() {
        base.a4 = user.a4;
    }
}

fn merge_audio(base: &mut AudioConfig, user: AudioConfig) {
    if user.volume.is_some() {
        base.volume = user.volume;
    }
    if user.user_velocity.is_some() {
        base.user_velocity = user.user_velocity;
    }
    if user.accompaniment_gain.is_some() {
        base.accompaniment_gain = user.accompaniment_gain;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_embedded_config() {
        let settings = Config::embedded().settings().unwrap();
        assert!(!settings.engine.enabled);
        assert_eq!(settings.engine.style, AccompanimentStyle::Chords);
        assert_eq!(settings.engine.history_size, 8);
        assert_eq!(settings.audio.tuning.tuning, Tuning::EqualTemperament);
        assert_eq!(settings.audio.tuning.key_root, PitchClass::C);
        assert!((settings.audio.tuning.tuning_a4 - 440.0).abs() < f64::EPSILON);
        assert!((settings.audio.volume - 0.7).abs() < f32::EPSILON);
        assert!((settings.audio.accompaniment_gain - 0.6).abs() < f32::EPSILON);
    }

    #[test]
    fn test_user_file_overrides_only_set_keys() {
        let file = write_config(
            r#"
            [accompaniment]
            style = "bass"

            [tuning]
            system = "just"
            key_root = "F#"
            "#,
        );
        let settings = Config::load_from(file.path()).settings().unwrap();
        assert_eq!(settings.engine.style, AccompanimentStyle::Bass);
        assert_eq!(settings.engine.history_size, 8);
        assert_eq!(settings.audio.tuning.tuning, Tuning::JustIntonation);
        assert_eq!(settings.audio.tuning.key_root, PitchClass::Fs);
        assert!((settings.audio.user_velocity - 0.8).abs() < f32::EPSILON);
    }

    #[test]
    fn test_unknown_style_fails_fast() {
        let file = write_config("[accompaniment]\nstyle = \"polka\"\n");
        let err = Config::load_from(file.path()).settings().unwrap_err();
        assert_eq!(err, DuetError::UnknownStyle("polka".to_string()));
    }

    #[test]
    fn test_unknown_tuning_and_key_rejected() {
        let file = write_config("[tuning]\nsystem = \"meantone\"\n");
        assert!(matches!(
            Config::load_from(file.path()).settings(),
            Err(DuetError::UnknownTuning(_))
        ));

        let file = write_config("[tuning]\nkey_root = \"H\"\n");
        assert!(matches!(
            Config::load_from(file.path()).settings(),
            Err(DuetError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_malformed_file_keeps_defaults() {
        let file = write_config("this is [not toml");
        let settings = Config::load_from(file.path()).settings().unwrap();
        assert_eq!(settings, Config::embedded().settings().unwrap());
    }

    #[test]
    fn test_missing_file_keeps_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Config::load_from(&dir.path().join("absent.toml"))
            .settings()
            .unwrap();
        assert_eq!(settings.engine, EngineSettings::default());
    }

    #[test]
    fn test_values_are_clamped() {
        let file = write_config("[accompaniment]\nhistory_size = 0\n[audio]\nvolume = 3.0\n");
        let settings = Config::load_from(file.path()).settings().unwrap();
        assert_eq!(settings.engine.history_size, 1);
        assert!((settings.audio.volume - 1.0).abs() < f32::EPSILON);
    }
}

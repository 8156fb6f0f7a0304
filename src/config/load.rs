use std::io;
use std::path::{Path, PathBuf};
use std::{env, fs};

use toml::{Table, Value};

use crate::error::{PlayerError, Result};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` reads an optional config file, then environment variables
/// (prefix `REAGANPLAYER__`) and falls back to struct defaults.
/// Quitting writes back only a `Session`, never the merged settings.
impl Settings {
    /// Load settings from the optional config file and the environment.
    pub fn load() -> Result<Self> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("REAGANPLAYER")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.ui.page_size == 0 {
            return Err("ui.page_size must be >= 1".to_string());
        }
        if self.playback.volume > 100 {
            return Err("playback.volume must be within 0..=100".to_string());
        }
        if self.playback.volume_step == 0 || self.playback.volume_step > 100 {
            return Err("playback.volume_step must be within 1..=100".to_string());
        }
        Ok(())
    }
}

/// What a session hands back to the config file on quit.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub music_folder: PathBuf,
    pub volume: u8,
    pub shuffle: bool,
}

impl Session {
    /// Merge the session into the resolved config file.
    pub fn save(&self) -> Result<PathBuf> {
        let path = resolve_config_path()
            .ok_or_else(|| PlayerError::ConfigSave("no config directory available".to_string()))?;
        self.save_to(&path)?;
        Ok(path)
    }

    /// Merge the session into the file at `path`. Only the session keys are
    /// written; everything else in the file is kept as is. A file that is not
    /// valid TOML is left untouched.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        let mut doc = match fs::read_to_string(path) {
            Ok(text) => text.parse::<Table>().map_err(|e| {
                PlayerError::ConfigSave(format!("{} is not valid TOML: {e}", path.display()))
            })?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => Table::new(),
            Err(source) => {
                return Err(PlayerError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let library = section(&mut doc, "library")?;
        library.insert(
            "music_folder".to_string(),
            Value::String(self.music_folder.to_string_lossy().into_owned()),
        );
        let playback = section(&mut doc, "playback")?;
        playback.insert("volume".to_string(), Value::Integer(i64::from(self.volume)));
        playback.insert("shuffle".to_string(), Value::Boolean(self.shuffle));

        let text = toml::to_string_pretty(&doc).map_err(|e| PlayerError::ConfigSave(e.to_string()))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|source| PlayerError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::write(path, text).map_err(|source| PlayerError::Io {
            path: path.to_path_buf(),
            source,
        })
    }
}

fn section<'a>(doc: &'a mut Table, name: &str) -> Result<&'a mut Table> {
    doc.entry(name)
        .or_insert_with(|| Value::Table(Table::new()))
        .as_table_mut()
        .ok_or_else(|| PlayerError::ConfigSave(format!("`{name}` is not a table")))
}

/// Resolve the config path from `REAGANPLAYER_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("REAGANPLAYER_CONFIG_PATH") {
        return Some(PathBuf::from(p));
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/reaganplayer/config.toml`
/// or `~/.config/reaganplayer/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    let config_home = if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".config"))
    };

    config_home.map(|d| d.join("reaganplayer").join("config.toml"))
}

/// Default log file under `$XDG_STATE_HOME/reaganplayer/` or `~/.local/state/reaganplayer/`.
pub fn default_log_path() -> Option<PathBuf> {
    let state_home = if let Some(xdg) = env::var_os("XDG_STATE_HOME") {
        Some(PathBuf::from(xdg))
    } else {
        env::var_os("HOME").map(|home| PathBuf::from(home).join(".local").join("state"))
    };

    state_home.map(|d| d.join("reaganplayer").join("reaganplayer.log"))
}

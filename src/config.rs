//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/advent/advent.toml`
//! 3. Local config: `<input_dir>/.advent.toml`
//! 4. Environment variables: `ADVENT_*` prefix, `__` for nesting
//! 5. `--input-dir` on the command line (input_dir only)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::application::ApplicationError;
use crate::domain::expand_env_vars;

/// Risk-map tiling for the chiton puzzle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ChitonConfig {
    /// Tile repeats for part 2 (part 1 always uses 1)
    pub repeats: usize,
}

impl Default for ChitonConfig {
    fn default() -> Self {
        Self { repeats: 5 }
    }
}

/// Insertion rounds for the polymer puzzle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PolymerConfig {
    pub short_steps: u32,
    pub long_steps: u32,
}

impl Default for PolymerConfig {
    fn default() -> Self {
        Self {
            short_steps: 10,
            long_steps: 40,
        }
    }
}

/// Glyphs used to render the folded origami sheet.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OrigamiConfig {
    pub ink: char,
    pub paper: char,
}

impl Default for OrigamiConfig {
    fn default() -> Self {
        Self {
            ink: '#',
            paper: '.',
        }
    }
}

/// Enhancement rounds for the trench-map image puzzle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ImageConfig {
    pub short_steps: usize,
    pub long_steps: usize,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            short_steps: 2,
            long_steps: 50,
        }
    }
}

/// Raw settings for intermediate parsing (all fields optional to detect "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub input_dir: Option<PathBuf>,
    pub input_file: Option<String>,
    pub chiton: RawChitonConfig,
    pub polymer: RawPolymerConfig,
    pub origami: RawOrigamiConfig,
    pub image: RawImageConfig,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawChitonConfig {
    pub repeats: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawPolymerConfig {
    pub short_steps: Option<u32>,
    pub long_steps: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawOrigamiConfig {
    pub ink: Option<char>,
    pub paper: Option<char>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawImageConfig {
    pub short_steps: Option<usize>,
    pub long_steps: Option<usize>,
}

/// Unified configuration for advent.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Directory holding puzzle inputs (default: cwd)
    pub input_dir: PathBuf,
    /// Input file name looked up inside `input_dir` (default: input.txt)
    pub input_file: String,
    pub chiton: ChitonConfig,
    pub polymer: PolymerConfig,
    pub origami: OrigamiConfig,
    pub image: ImageConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            input_file: "input.txt".into(),
            chiton: ChitonConfig::default(),
            polymer: PolymerConfig::default(),
            origami: OrigamiConfig::default(),
            image: ImageConfig::default(),
        }
    }
}

/// Get the XDG config directory for advent.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "advent").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("advent.toml"))
}

/// Get the path to the local config file in an input directory.
pub fn local_config_path(input_dir: &Path) -> PathBuf {
    input_dir.join(".advent.toml")
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

fn invalid(key: &str, value: &str, reason: impl std::fmt::Display) -> ApplicationError {
    ApplicationError::Config {
        message: format!("ADVENT_{}={:?}: {}", key.to_uppercase().replace('.', "__"), value, reason),
    }
}

fn single_char(key: &str, value: &str) -> Result<char, ApplicationError> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(invalid(key, value, "expected exactly one character")),
    }
}

impl Settings {
    /// Expand shell variables and tilde in path-like fields.
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.input_dir.to_string_lossy().as_ref());
        self.input_dir = PathBuf::from(expanded);
    }

    /// Overlay wins where it specifies a value.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            input_dir: overlay
                .input_dir
                .clone()
                .unwrap_or_else(|| self.input_dir.clone()),
            input_file: overlay
                .input_file
                .clone()
                .unwrap_or_else(|| self.input_file.clone()),
            chiton: ChitonConfig {
                repeats: overlay.chiton.repeats.unwrap_or(self.chiton.repeats),
            },
            polymer: PolymerConfig {
                short_steps: overlay.polymer.short_steps.unwrap_or(self.polymer.short_steps),
                long_steps: overlay.polymer.long_steps.unwrap_or(self.polymer.long_steps),
            },
            origami: OrigamiConfig {
                ink: overlay.origami.ink.unwrap_or(self.origami.ink),
                paper: overlay.origami.paper.unwrap_or(self.origami.paper),
            },
            image: ImageConfig {
                short_steps: overlay.image.short_steps.unwrap_or(self.image.short_steps),
                long_steps: overlay.image.long_steps.unwrap_or(self.image.long_steps),
            },
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `input_dir` - Optional input directory from the command line; it
    ///   selects the local config file and overrides `input_dir` itself
    pub fn load(input_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        Self::load_with(global_config_path().as_deref(), input_dir)
    }

    /// Same as [`Settings::load`] with an explicit global config location.
    #[instrument(level = "debug")]
    pub fn load_with(
        global_path: Option<&Path>,
        input_dir: Option<&Path>,
    ) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_path {
            if global_path.exists() {
                debug!("global config: {}", global_path.display());
                let raw = load_raw_settings(global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config next to the inputs
        let local_dir = input_dir
            .map(Path::to_path_buf)
            .unwrap_or_else(|| current.input_dir.clone());
        let local_dir = PathBuf::from(expand_env_vars(local_dir.to_string_lossy().as_ref()));
        let local_path = local_config_path(&local_dir);
        if local_path.exists() {
            debug!("local config: {}", local_path.display());
            let raw = load_raw_settings(&local_path)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables
        current = Self::apply_env_overrides(current)?;

        // 5. Command line
        if let Some(dir) = input_dir {
            current.input_dir = dir.to_path_buf();
        }

        current.expand_paths();
        current.validate()?;
        Ok(current)
    }

    /// Apply ADVENT_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("ADVENT")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("input_dir") {
            settings.input_dir = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("input_file") {
            settings.input_file = val;
        }
        if let Ok(val) = config.get_string("chiton.repeats") {
            settings.chiton.repeats = val.parse().map_err(|e| invalid("chiton.repeats", &val, e))?;
        }
        if let Ok(val) = config.get_string("polymer.short_steps") {
            settings.polymer.short_steps =
                val.parse().map_err(|e| invalid("polymer.short_steps", &val, e))?;
        }
        if let Ok(val) = config.get_string("polymer.long_steps") {
            settings.polymer.long_steps =
                val.parse().map_err(|e| invalid("polymer.long_steps", &val, e))?;
        }
        if let Ok(val) = config.get_string("origami.ink") {
            settings.origami.ink = single_char("origami.ink", &val)?;
        }
        if let Ok(val) = config.get_string("origami.paper") {
            settings.origami.paper = single_char("origami.paper", &val)?;
        }
        if let Ok(val) = config.get_string("image.short_steps") {
            settings.image.short_steps =
                val.parse().map_err(|e| invalid("image.short_steps", &val, e))?;
        }
        if let Ok(val) = config.get_string("image.long_steps") {
            settings.image.long_steps =
                val.parse().map_err(|e| invalid("image.long_steps", &val, e))?;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.chiton.repeats == 0 {
            return Err(ApplicationError::Config {
                message: "chiton.repeats must be at least 1".into(),
            });
        }
        if self.input_file.trim().is_empty() {
            return Err(ApplicationError::Config {
                message: "input_file must not be empty".into(),
            });
        }
        Ok(())
    }

    /// Render the effective settings as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize settings: {}", e),
        })
    }

    /// Commented template written by `config init`.
    pub fn template() -> String {
        let defaults = Self::default();
        format!(
            r#"# advent configuration
# Precedence: defaults < global < local (.advent.toml next to inputs) < ADVENT_* env vars

# Directory holding puzzle inputs; ~ and $VAR are expanded
# input_dir = "{input_dir}"

# File name looked up in <input_dir>/<puzzle>/ and then <input_dir>/
# input_file = "{input_file}"

[chiton]
# Tile repeats for part 2
# repeats = {repeats}

[polymer]
# short_steps = {short_steps}
# long_steps = {long_steps}

[origami]
# ink = "{ink}"
# paper = "{paper}"

[image]
# Enhancement rounds for the trench map
# short_steps = {image_short_steps}
# long_steps = {image_long_steps}
"#,
            input_dir = defaults.input_dir.display(),
            input_file = defaults.input_file,
            repeats = defaults.chiton.repeats,
            short_steps = defaults.polymer.short_steps,
            long_steps = defaults.polymer.long_steps,
            ink = defaults.origami.ink,
            paper = defaults.origami.paper,
            image_short_steps = defaults.image.short_steps,
            image_long_steps = defaults.image.long_steps,
        )
    }
}

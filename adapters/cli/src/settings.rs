//! Command-line flags, the optional TOML settings file and their resolution.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use clap::Parser;
use maze_chase_core::{DimensionsError, GeometryError, MazeDimensions, MazeGeometry};
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_COLUMNS: u32 = 15;
const DEFAULT_ROWS: u32 = 15;
const DEFAULT_CELL_LENGTH: f32 = 50.0;
const DEFAULT_WALL_THICKNESS: f32 = 16.0;
const DEFAULT_AVATAR_SPEED: f32 = 256.0;
const DEFAULT_ENEMY_SPEED: f32 = 64.0;
const DEFAULT_ENEMY_STEP_INTERVAL_MS: u64 = 50;

/// Command-line arguments accepted by the Maze Chase binary.
#[derive(Debug, Parser)]
#[command(author, version, about = "Find the goal before the clock (or the enemy) gets you")]
pub(crate) struct CliArgs {
    /// Number of maze columns.
    #[arg(long)]
    columns: Option<u32>,
    /// Number of maze rows.
    #[arg(long)]
    rows: Option<u32>,
    /// Side length of a cell in world units.
    #[arg(long)]
    cell_length: Option<f32>,
    /// Thickness of the walls in world units.
    #[arg(long)]
    wall_thickness: Option<f32>,
    /// Avatar speed in world units per second.
    #[arg(long)]
    avatar_speed: Option<f32>,
    /// Adds an enemy that chases the avatar (`--enemy false` disables it).
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    enemy: Option<bool>,
    /// Enemy speed in world units per second.
    #[arg(long)]
    enemy_speed: Option<f32>,
    /// Seed for maze generation and actor placement.
    #[arg(long)]
    seed: Option<u64>,
    /// Path to a TOML settings file.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Layout string produced by --print-layout to replay as the first round.
    #[arg(long, value_name = "CODE")]
    layout: Option<String>,
    /// Logs the layout string of every round.
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    print_layout: Option<bool>,
    /// Enables or disables vertical sync.
    #[arg(long, value_name = "BOOL")]
    vsync: Option<bool>,
    /// Logs frames per second once per second.
    #[arg(long, value_name = "BOOL", num_args = 0..=1, default_missing_value = "true")]
    show_fps: Option<bool>,
}

/// Contents of the optional TOML settings file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileSettings {
    columns: Option<u32>,
    rows: Option<u32>,
    cell_length: Option<f32>,
    wall_thickness: Option<f32>,
    avatar_speed: Option<f32>,
    enemy: Option<bool>,
    enemy_speed: Option<f32>,
    enemy_step_interval_ms: Option<u64>,
    seed: Option<u64>,
    layout: Option<String>,
    print_layout: Option<bool>,
    vsync: Option<bool>,
    show_fps: Option<bool>,
}

impl FileSettings {
    fn load(path: &Path) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&contents).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    fn parse(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(contents)
    }
}

/// Fully resolved settings used to boot the game.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) dimensions: MazeDimensions,
    pub(crate) geometry: MazeGeometry,
    pub(crate) avatar_speed: f32,
    pub(crate) enemy_speed: Option<f32>,
    pub(crate) enemy_step_interval: Duration,
    pub(crate) seed: Option<u64>,
    pub(crate) layout: Option<String>,
    pub(crate) print_layout: bool,
    pub(crate) vsync: bool,
    pub(crate) show_fps: bool,
}

impl Settings {
    /// Resolves the settings, reading the TOML file named by `--config`.
    pub(crate) fn from_args(args: CliArgs) -> Result<Self, SettingsError> {
        let file = match &args.config {
            Some(path) => FileSettings::load(path)?,
            None => FileSettings::default(),
        };
        Self::resolve(args, file)
    }

    fn resolve(args: CliArgs, file: FileSettings) -> Result<Self, SettingsError> {
        let dimensions = MazeDimensions::new(
            args.columns.or(file.columns).unwrap_or(DEFAULT_COLUMNS),
            args.rows.or(file.rows).unwrap_or(DEFAULT_ROWS),
        )?;
        let geometry = MazeGeometry::new(
            args.cell_length
                .or(file.cell_length)
                .unwrap_or(DEFAULT_CELL_LENGTH),
            args.wall_thickness
                .or(file.wall_thickness)
                .unwrap_or(DEFAULT_WALL_THICKNESS),
        )?;

        let avatar_speed = validate_speed(
            "avatar",
            args.avatar_speed
                .or(file.avatar_speed)
                .unwrap_or(DEFAULT_AVATAR_SPEED),
        )?;
        let enemy_enabled = args.enemy.or(file.enemy).unwrap_or(false);
        let enemy_speed = if enemy_enabled {
            Some(validate_speed(
                "enemy",
                args.enemy_speed
                    .or(file.enemy_speed)
                    .unwrap_or(DEFAULT_ENEMY_SPEED),
            )?)
        } else {
            None
        };

        let interval_ms = file
            .enemy_step_interval_ms
            .unwrap_or(DEFAULT_ENEMY_STEP_INTERVAL_MS);
        if interval_ms == 0 {
            return Err(SettingsError::ZeroStepInterval);
        }

        Ok(Self {
            dimensions,
            geometry,
            avatar_speed,
            enemy_speed,
            enemy_step_interval: Duration::from_millis(interval_ms),
            seed: args.seed.or(file.seed),
            layout: args.layout.or(file.layout),
            print_layout: args.print_layout.or(file.print_layout).unwrap_or(false),
            vsync: args.vsync.or(file.vsync).unwrap_or(true),
            show_fps: args.show_fps.or(file.show_fps).unwrap_or(false),
        })
    }
}

fn validate_speed(actor: &'static str, value: f32) -> Result<f32, SettingsError> {
    if value.is_finite() && value >= 0.0 {
        Ok(value)
    } else {
        Err(SettingsError::InvalidSpeed { actor, value })
    }
}

/// Errors raised while resolving settings.
#[derive(Debug, Error)]
pub(crate) enum SettingsError {
    /// The settings file could not be read.
    #[error("could not read settings file {}", path.display())]
    Read {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The settings file is not valid TOML or contains unknown keys.
    #[error("could not parse settings file {}", path.display())]
    Parse {
        /// Path of the malformed file.
        path: PathBuf,
        /// Underlying parse failure.
        #[source]
        source: toml::de::Error,
    },
    /// The maze dimensions were rejected.
    #[error(transparent)]
    Dimensions(#[from] DimensionsError),
    /// The maze geometry was rejected.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
    /// A speed was negative or not finite.
    #[error("{actor} speed must be finite and non-negative (received {value})")]
    InvalidSpeed {
        /// Actor the speed belongs to.
        actor: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// The enemy would never move.
    #[error("enemy step interval must be at least one millisecond")]
    ZeroStepInterval,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(flags: &[&str]) -> CliArgs {
        CliArgs::try_parse_from(std::iter::once("maze-chase").chain(flags.iter().copied()))
            .expect("flags parse")
    }

    fn file(contents: &str) -> FileSettings {
        FileSettings::parse(contents).expect("settings file parses")
    }

    #[test]
    fn defaults_apply_without_flags_or_file() {
        let settings = Settings::resolve(args(&[]), FileSettings::default()).expect("defaults");

        assert_eq!(settings.dimensions, MazeDimensions::default());
        assert_eq!(settings.geometry, MazeGeometry::default());
        assert_eq!(settings.avatar_speed, 256.0);
        assert_eq!(settings.enemy_speed, None);
        assert_eq!(settings.enemy_step_interval, Duration::from_millis(50));
        assert_eq!(settings.seed, None);
        assert!(settings.vsync);
        assert!(!settings.show_fps);
        assert!(!settings.print_layout);
    }

    #[test]
    fn flags_override_file_which_overrides_defaults() {
        let settings = Settings::resolve(
            args(&["--columns", "9", "--enemy-speed", "80", "--vsync", "false"]),
            file(
                "columns = 4\nrows = 6\nenemy = true\nenemy_speed = 32.0\n\
                 enemy_step_interval_ms = 20\nseed = 99\n",
            ),
        )
        .expect("settings resolve");

        assert_eq!(settings.dimensions.columns(), 9);
        assert_eq!(settings.dimensions.rows(), 6);
        assert_eq!(settings.enemy_speed, Some(80.0));
        assert_eq!(settings.enemy_step_interval, Duration::from_millis(20));
        assert_eq!(settings.seed, Some(99));
        assert!(!settings.vsync);
    }

    #[test]
    fn switch_flags_override_the_file_in_both_directions() {
        let file_on = || file("enemy = true\nshow_fps = true\nprint_layout = true\n");

        let disabled = Settings::resolve(
            args(&["--enemy", "false", "--show-fps=false", "--print-layout", "false"]),
            file_on(),
        )
        .expect("settings resolve");
        assert_eq!(disabled.enemy_speed, None);
        assert!(!disabled.show_fps);
        assert!(!disabled.print_layout);

        let inherited = Settings::resolve(args(&[]), file_on()).expect("settings resolve");
        assert_eq!(inherited.enemy_speed, Some(64.0));
        assert!(inherited.show_fps);

        let bare = Settings::resolve(
            args(&["--enemy", "--show-fps", "--rows", "3"]),
            FileSettings::default(),
        )
        .expect("settings resolve");
        assert_eq!(bare.enemy_speed, Some(64.0));
        assert!(bare.show_fps);
        assert_eq!(bare.dimensions.rows(), 3);
    }

    #[test]
    fn enemy_speed_alone_does_not_enable_the_enemy() {
        let settings =
            Settings::resolve(args(&["--enemy-speed", "80"]), FileSettings::default())
                .expect("settings resolve");

        assert_eq!(settings.enemy_speed, None);
    }

    #[test]
    fn invalid_values_are_reported() {
        assert!(matches!(
            Settings::resolve(args(&["--rows", "0"]), FileSettings::default()),
            Err(SettingsError::Dimensions(_))
        ));
        assert!(matches!(
            Settings::resolve(
                args(&["--cell-length", "10", "--wall-thickness", "12"]),
                FileSettings::default()
            ),
            Err(SettingsError::Geometry(_))
        ));
        assert!(matches!(
            Settings::resolve(args(&["--avatar-speed=-1"]), FileSettings::default()),
            Err(SettingsError::InvalidSpeed { actor: "avatar", .. })
        ));
        assert!(matches!(
            Settings::resolve(args(&[]), file("enemy_step_interval_ms = 0")),
            Err(SettingsError::ZeroStepInterval)
        ));
    }

    #[test]
    fn unknown_file_keys_are_rejected() {
        assert!(FileSettings::parse("colums = 3").is_err());
    }

    #[test]
    fn missing_settings_file_is_a_read_error() {
        let error = Settings::from_args(args(&["--config", "/nonexistent/maze-chase.toml"]))
            .expect_err("file is missing");

        assert!(matches!(error, SettingsError::Read { .. }));
    }
}

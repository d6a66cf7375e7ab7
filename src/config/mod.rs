use std::{
    env,
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use chrono::FixedOffset;
use chrono_tz::Tz;
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::BudgetError;
use crate::ledger::{LocalZone, SystemZone};

const DEFAULT_DIR_NAME: &str = ".budget_schedule";
const HOME_ENV: &str = "BUDGET_SCHEDULE_HOME";
const CONFIG_FILE: &str = "config.json";
const TMP_SUFFIX: &str = "tmp";

/// Which wall clock defines calendar dates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TimeZoneSetting {
    #[default]
    System,
    Fixed {
        offset_minutes: i32,
    },
    Named {
        name: String,
    },
}

impl TimeZoneSetting {
    pub fn local_zone(&self) -> Box<dyn LocalZone> {
        match self {
            TimeZoneSetting::System => Box::new(SystemZone),
            TimeZoneSetting::Fixed { offset_minutes } => {
                match offset_minutes
                    .checked_mul(60)
                    .and_then(FixedOffset::east_opt)
                {
                    Some(offset) => Box::new(offset),
                    None => {
                        warn!(
                            offset_minutes,
                            "configured offset out of range; using system time zone"
                        );
                        Box::new(SystemZone)
                    }
                }
            }
            TimeZoneSetting::Named { name } => match name.parse::<Tz>() {
                Ok(zone) => Box::new(zone),
                Err(_) => {
                    warn!(zone = %name, "unknown time zone name; using system time zone");
                    Box::new(SystemZone)
                }
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub time_zone: TimeZoneSetting,
    #[serde(default = "Config::default_ui_color_enabled")]
    pub ui_color_enabled: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            time_zone: TimeZoneSetting::default(),
            ui_color_enabled: Self::default_ui_color_enabled(),
        }
    }
}

impl Config {
    pub fn default_ui_color_enabled() -> bool {
        true
    }

    pub fn local_zone(&self) -> Box<dyn LocalZone> {
        self.time_zone.local_zone()
    }
}

/// Returns the application data directory, defaulting to `~/.budget_schedule`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os(HOME_ENV) {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self, BudgetError> {
        Self::with_base_dir(app_data_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, BudgetError> {
        fs::create_dir_all(&base)?;
        Ok(Self {
            path: base.join(CONFIG_FILE),
        })
    }

    /// Loads the stored configuration, or defaults when none was saved yet.
    pub fn load(&self) -> Result<Config, BudgetError> {
        if self.path.exists() {
            let data = fs::read_to_string(&self.path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<(), BudgetError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(config)?;
        let tmp = tmp_path(&self.path);
        write_atomic(&tmp, &json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), BudgetError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}

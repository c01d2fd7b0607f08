use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use crate::calendar::WeekStart;
use crate::error::Result;
use crate::navigator::DAY_VIEW_PATH;
use crate::slots::SlotSpec;
use crate::tz::Tz;

const CONFIG_PATH_ENV_VAR: &str = "CLINIC_CALENDAR_CONFIG";

pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let config_env = env::var(CONFIG_PATH_ENV_VAR).ok().map(PathBuf::from);

    let config_xdg = dirs::config_dir().map(|dir| dir.join("clinic-calendar").join("config.toml"));

    let home_config = dirs::home_dir().map(|home| home.join(".clinic-calendar.toml"));

    config_env
        .into_iter()
        .chain(config_xdg)
        .chain(home_config)
        .collect()
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub week_start: WeekStart,
    pub timezone: Tz,
    pub day_view_path: String,
    pub appointments: Option<PathBuf>,
    pub slots: SlotSpec,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            week_start: WeekStart::default(),
            timezone: Tz::default(),
            day_view_path: DAY_VIEW_PATH.to_owned(),
            appointments: None,
            slots: SlotSpec::default(),
        }
    }
}

impl Config {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let mut config = Self::from_toml_str(&fs::read_to_string(path)?)?;

        // Relative appointment files are relative to the config file
        let resolved = match (&config.appointments, path.parent()) {
            (Some(appointments), Some(dir)) if appointments.is_relative() => {
                Some(dir.join(appointments))
            }
            _ => None,
        };
        if resolved.is_some() {
            config.appointments = resolved;
        }

        Ok(config)
    }
}

/// Loads the config at `path` if given, otherwise the first existing file of
/// the usual locations. Without any config file the defaults are used.
pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        log::info!("Using config file '{}'", path.display());
        return Config::from_file(path);
    }

    match find_configfile_locations().into_iter().find(|p| p.is_file()) {
        Some(path) => {
            log::info!("Using config file '{}'", path.display());
            Config::from_file(&path)
        }
        None => {
            log::info!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn empty_config_is_default() {
        let config = Config::from_toml_str("").unwrap();

        assert_eq!(config.week_start, WeekStart::Monday);
        assert_eq!(config.timezone, Tz::Local);
        assert_eq!(config.day_view_path, "/agendamentos");
        assert!(config.appointments.is_none());
        assert_eq!(config.slots.step_minutes, 30);
    }

    #[test]
    fn full_config() {
        let config = Config::from_toml_str(
            r#"
            week_start = "sunday"
            timezone = "America/Sao_Paulo"
            day_view_path = "/agenda"
            appointments = "/var/lib/clinic/appointments.toml"

            [slots]
            first = "07:00"
            last = "12:00"
            step_minutes = 20
            "#,
        )
        .unwrap();

        assert_eq!(config.week_start, WeekStart::Sunday);
        assert_eq!(config.timezone.to_string(), "America/Sao_Paulo");
        assert_eq!(config.day_view_path, "/agenda");
        assert_eq!(
            config.appointments,
            Some(PathBuf::from("/var/lib/clinic/appointments.toml"))
        );
        assert_eq!(config.slots.first.to_string(), "07:00");
        assert_eq!(config.slots.slots().len(), 16);
    }

    #[test]
    fn invalid_values_are_rejected() {
        for content in &[
            "week_start = \"wednesday\"",
            "timezone = \"Middle/Earth\"",
            "[slots]\nfirst = \"25:00\"",
        ] {
            let err = Config::from_toml_str(content).unwrap_err();
            assert!(matches!(err.kind, ErrorKind::ConfigParse), "{}", content);
        }
    }

    #[test]
    fn relative_appointments_follow_the_config_file() {
        let dir = env::temp_dir().join(format!("clinic-calendar-config-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        fs::write(&path, "appointments = \"appointments.toml\"\n").unwrap();

        let config = load_suitable_config(Some(&path)).unwrap();
        assert_eq!(config.appointments, Some(dir.join("appointments.toml")));

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn search_order_starts_with_the_environment() {
        let dir = env::temp_dir().join(format!("clinic-calendar-search-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let env_path = dir.join("env.toml");
        fs::write(&env_path, "week_start = \"sunday\"\n").unwrap();
        let explicit = dir.join("explicit.toml");
        fs::write(&explicit, "day_view_path = \"/explicit\"\n").unwrap();

        env::set_var(CONFIG_PATH_ENV_VAR, &env_path);
        let locations = find_configfile_locations();
        let from_env = load_suitable_config(None);
        let from_arg = load_suitable_config(Some(&explicit));
        env::remove_var(CONFIG_PATH_ENV_VAR);

        assert_eq!(locations.first(), Some(&env_path));

        let position = |path: Option<PathBuf>| path.and_then(|p| locations.iter().position(|l| *l == p));
        let xdg = position(dirs::config_dir().map(|d| d.join("clinic-calendar").join("config.toml")));
        let home = position(dirs::home_dir().map(|h| h.join(".clinic-calendar.toml")));
        if let (Some(xdg), Some(home)) = (xdg, home) {
            assert!(0 < xdg && xdg < home);
        }

        assert_eq!(from_env.unwrap().week_start, WeekStart::Sunday);

        let from_arg = from_arg.unwrap();
        assert_eq!(from_arg.week_start, WeekStart::Monday);
        assert_eq!(from_arg.day_view_path, "/explicit");

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let path = env::temp_dir().join("clinic-calendar-does-not-exist.toml");
        assert!(load_suitable_config(Some(&path)).is_err());
    }
}

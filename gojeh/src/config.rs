use anyhow::{Context, Result};
use directories::ProjectDirs;
use gojeh_ipc::SOCKET_PATH;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub socket_path: PathBuf,
    pub phases: PhasesConfig,
    pub notification: NotificationConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PhasesConfig {
    pub work: PhaseConfig,
    #[serde(rename = "break")]
    pub rest: PhaseConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct PhaseConfig {
    pub label: String,
    #[serde(deserialize_with = "human_duration")]
    pub duration: Duration,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct NotificationConfig {
    pub title: String,
    pub body: String,
    /// Keep the notification on screen until dismissed.
    pub persistent: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(SOCKET_PATH),
            phases: PhasesConfig::default(),
            notification: NotificationConfig::default(),
        }
    }
}

impl Default for PhasesConfig {
    fn default() -> Self {
        Self {
            work: PhaseConfig {
                label: "🍅".to_string(),
                duration: Duration::from_secs(25 * 60),
            },
            rest: PhaseConfig {
                label: "☕".to_string(),
                duration: Duration::from_secs(3 * 60),
            },
        }
    }
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            title: "Pomodoro".to_string(),
            body: "Timer reached zero".to_string(),
            persistent: true,
        }
    }
}

fn human_duration<'de, D>(deserializer: D) -> Result<Duration, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = serde::Deserialize::deserialize(deserializer)?;
    humantime::parse_duration(&s).map_err(serde::de::Error::custom)
}

fn parse(config_str: &str, path: &Path) -> Result<Config> {
    toml::from_str(config_str)
        .with_context(|| format!("Failed to parse config file at {:?}", path))
}

/// Load the config from `explicit` if given, otherwise from the platform
/// config directory. Only the implicit location may be absent.
pub fn load_config(explicit: Option<&Path>) -> Result<Config> {
    if let Some(path) = explicit {
        let config_str = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file at {:?}", path))?;
        return parse(&config_str, path);
    }

    match ProjectDirs::from("com", "gojeh", "gojeh") {
        Some(proj_dirs) => {
            let path = proj_dirs.config_dir().join("gojeh.toml");
            if path.exists() {
                let config_str = fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read config file at {:?}", path))?;
                parse(&config_str, &path)
            } else {
                Ok(Config::default())
            }
        }
        None => Ok(Config::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = parse("", Path::new("gojeh.toml")).unwrap();
        assert_eq!(config.socket_path, PathBuf::from(SOCKET_PATH));
        assert_eq!(config.phases.work.duration, Duration::from_secs(1500));
        assert_eq!(config.phases.rest.label, "☕");
        assert_eq!(config.notification.title, "Pomodoro");
        assert!(config.notification.persistent);
    }

    #[test]
    fn reads_phases_with_human_durations() {
        let config = parse(
            r#"
            socket_path = "/run/user/1000/gojeh.sock"

            [phases.work]
            label = "W"
            duration = "50m"

            [phases.break]
            label = "B"
            duration = "10m 30s"
            "#,
            Path::new("gojeh.toml"),
        )
        .unwrap();
        assert_eq!(config.socket_path, PathBuf::from("/run/user/1000/gojeh.sock"));
        assert_eq!(config.phases.work.label, "W");
        assert_eq!(config.phases.work.duration, Duration::from_secs(3000));
        assert_eq!(config.phases.rest.duration, Duration::from_secs(630));
    }

    #[test]
    fn bad_duration_names_the_file() {
        let err = parse(
            "[phases.work]\nlabel = \"W\"\nduration = \"soon\"\n",
            Path::new("/etc/gojeh.toml"),
        )
        .unwrap_err();
        assert!(format!("{err:#}").contains("/etc/gojeh.toml"));
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn explicit_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gojeh.toml");
        fs::write(&path, "[notification]\ntitle = \"Focus\"\npersistent = false\n").unwrap();
        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.notification.title, "Focus");
        assert_eq!(config.notification.body, "Timer reached zero");
        assert!(!config.notification.persistent);
    }
}

#![forbid(unsafe_code)]

use anyhow::{Context, Result};
use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
};

pub const DEFAULT_ENV_PATH: &str = ".env";
pub const DEFAULT_MOCK_FILE_PATH: &str = "mock/mock-youtube-api.json";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_HOST: &str = "127.0.0.1";

pub const MOCK_FILE_PATH_KEY: &str = "MOCK_YOUTUBE_FILE_PATH";
pub const PORT_KEY: &str = "PORT";
pub const HOST_KEY: &str = "HOST";

#[derive(Debug, Clone)]
pub struct RuntimeSettings {
    /// Always absolute once resolved.
    pub mock_file_path: PathBuf,
    pub port: u16,
    pub host: String,
}

#[derive(Debug, Clone, Default)]
pub struct RuntimeOverrides {
    pub mock_file_path: Option<PathBuf>,
    pub port: Option<u16>,
    pub host: Option<String>,
    pub env_path: Option<PathBuf>,
}

pub fn resolve_runtime_settings(overrides: RuntimeOverrides) -> Result<RuntimeSettings> {
    let env_path = overrides
        .env_path
        .as_deref()
        .unwrap_or_else(|| Path::new(DEFAULT_ENV_PATH));
    let file_vars = read_env_file(env_path)?;
    let cwd = env::current_dir().context("Resolving the working directory")?;
    Ok(build_runtime_settings(
        &file_vars,
        env_var_string,
        &cwd,
        overrides,
    ))
}

fn build_runtime_settings(
    file_vars: &HashMap<String, String>,
    env_lookup: impl Fn(&str) -> Option<String>,
    cwd: &Path,
    overrides: RuntimeOverrides,
) -> RuntimeSettings {
    let mock_file_path = overrides
        .mock_file_path
        .or_else(|| lookup_value(MOCK_FILE_PATH_KEY, file_vars, &env_lookup).map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MOCK_FILE_PATH));
    let port = overrides
        .port
        .or_else(|| {
            lookup_value(PORT_KEY, file_vars, &env_lookup)
                .and_then(|value| value.parse::<u16>().ok())
        })
        .unwrap_or(DEFAULT_PORT);
    let host = overrides
        .host
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
        .or_else(|| lookup_value(HOST_KEY, file_vars, &env_lookup))
        .filter(|value| !value.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_HOST.to_string());
    RuntimeSettings {
        mock_file_path: resolve_against(cwd, &mock_file_path),
        port,
        host,
    }
}

/// Absolute paths are kept verbatim; relative ones hang off `base`.
pub fn resolve_against(base: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

fn env_var_string(key: &str) -> Option<String> {
    env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn lookup_value(
    key: &str,
    file_vars: &HashMap<String, String>,
    env_lookup: &impl Fn(&str) -> Option<String>,
) -> Option<String> {
    env_lookup(key).or_else(|| file_vars.get(key).cloned())
}

pub fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let mut vars = HashMap::new();
    if !path.exists() {
        return Ok(vars);
    }
    let content =
        fs::read_to_string(path).with_context(|| format!("Reading {}", path.display()))?;
    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let line = trimmed.strip_prefix("export ").unwrap_or(trimmed);
        let Some((key, value_raw)) = line.split_once('=') else {
            continue;
        };
        let key = key.trim();
        if key.is_empty() {
            continue;
        }
        let value = value_raw.trim();
        let value = value
            .strip_prefix('"')
            .and_then(|value| value.strip_suffix('"'))
            .or_else(|| {
                value
                    .strip_prefix('\'')
                    .and_then(|value| value.strip_suffix('\''))
            })
            .unwrap_or(value);
        vars.insert(key.to_string(), value.to_string());
    }
    Ok(vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn make_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", contents).unwrap();
        file
    }

    fn settings_from(contents: &str) -> RuntimeSettings {
        let cfg = make_config(contents);
        let vars = read_env_file(cfg.path()).unwrap();
        build_runtime_settings(
            &vars,
            |_| None,
            Path::new("/srv/rankup"),
            RuntimeOverrides::default(),
        )
    }

    #[test]
    fn defaults_when_nothing_is_configured() {
        let settings = settings_from("");
        assert_eq!(
            settings.mock_file_path,
            PathBuf::from("/srv/rankup/mock/mock-youtube-api.json")
        );
        assert_eq!(settings.port, DEFAULT_PORT);
        assert_eq!(settings.host, DEFAULT_HOST);
    }

    #[test]
    fn relative_mock_path_resolves_against_cwd() {
        let settings = settings_from("MOCK_YOUTUBE_FILE_PATH=\"data/videos.json\"\n");
        assert_eq!(
            settings.mock_file_path,
            PathBuf::from("/srv/rankup/data/videos.json")
        );
    }

    #[test]
    fn absolute_mock_path_is_used_verbatim() {
        let settings = settings_from("MOCK_YOUTUBE_FILE_PATH=/var/lib/rankup/videos.json\n");
        assert_eq!(
            settings.mock_file_path,
            PathBuf::from("/var/lib/rankup/videos.json")
        );
    }

    #[test]
    fn reads_port_and_host() {
        let settings = settings_from("PORT=\"4242\"\nHOST=\"0.0.0.0\"\n");
        assert_eq!(settings.port, 4242);
        assert_eq!(settings.host, "0.0.0.0");
    }

    #[test]
    fn invalid_port_defaults() {
        let settings = settings_from("PORT=\"nope\"\n");
        assert_eq!(settings.port, DEFAULT_PORT);
    }

    #[test]
    fn env_wins_over_file() {
        let vars = read_env_file(make_config("PORT=\"7000\"\n").path()).unwrap();
        let settings = build_runtime_settings(
            &vars,
            |key| (key == PORT_KEY).then(|| "8000".to_string()),
            Path::new("/"),
            RuntimeOverrides::default(),
        );
        assert_eq!(settings.port, 8000);
    }

    #[test]
    fn overrides_win_over_env_and_file() {
        let mut vars = HashMap::new();
        vars.insert(MOCK_FILE_PATH_KEY.to_string(), "file.json".to_string());
        vars.insert(HOST_KEY.to_string(), "file-host".to_string());

        let settings = build_runtime_settings(
            &vars,
            |key| (key == PORT_KEY).then(|| "8000".to_string()),
            Path::new("/work"),
            RuntimeOverrides {
                mock_file_path: Some(PathBuf::from("override.json")),
                port: Some(9000),
                host: Some("override-host".into()),
                env_path: None,
            },
        );

        assert_eq!(settings.mock_file_path, PathBuf::from("/work/override.json"));
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.host, "override-host");
    }

    #[test]
    fn blank_host_override_is_ignored() {
        let settings = build_runtime_settings(
            &HashMap::new(),
            |_| None,
            Path::new("/"),
            RuntimeOverrides {
                host: Some("   ".into()),
                ..RuntimeOverrides::default()
            },
        );
        assert_eq!(settings.host, DEFAULT_HOST);
    }

    #[test]
    fn read_env_file_handles_export_and_quotes() {
        let cfg = make_config(
            r#"
            export MOCK_YOUTUBE_FILE_PATH="/data/mock.json"
            HOST='0.0.0.0'
            PORT =  "9090"
            # comment
            INVALID_LINE
            "#,
        );
        let vars = read_env_file(cfg.path()).unwrap();
        assert_eq!(vars.get(MOCK_FILE_PATH_KEY).unwrap(), "/data/mock.json");
        assert_eq!(vars.get(HOST_KEY).unwrap(), "0.0.0.0");
        assert_eq!(vars.get(PORT_KEY).unwrap(), "9090");
        assert!(!vars.contains_key("INVALID_LINE"));
    }

    #[test]
    fn env_path_override_points_at_alternate_dotenv() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = dir.path().join("rankup.env");
        std::fs::write(
            &env_path,
            "MOCK_YOUTUBE_FILE_PATH=\"/opt/rankup/alternate.json\"\n",
        )
        .unwrap();

        let settings = resolve_runtime_settings(RuntimeOverrides {
            env_path: Some(env_path),
            ..RuntimeOverrides::default()
        })
        .unwrap();
        assert_eq!(
            settings.mock_file_path,
            PathBuf::from("/opt/rankup/alternate.json")
        );
    }

    #[test]
    fn missing_dotenv_falls_back_to_default_mock_under_cwd() {
        let dir = tempfile::tempdir().unwrap();
        let settings = resolve_runtime_settings(RuntimeOverrides {
            env_path: Some(dir.path().join("absent.env")),
            ..RuntimeOverrides::default()
        })
        .unwrap();
        assert!(settings.mock_file_path.is_absolute());
        assert!(settings.mock_file_path.ends_with(DEFAULT_MOCK_FILE_PATH));
    }
}

use std::{collections::HashMap, env, fs, path::Path};
use serde::Deserialize;
use crate::middleware::config::{MiddlewareConfig, MiddlewareType};

mod error;
pub mod logging;
mod server;

pub use error::SettingsError;
pub use logging::{LogFormat, LogSettings};
pub use server::ServerSettings;

pub type Result<T> = std::result::Result<T, SettingsError>;
pub use server::parse_env_var;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    // 서버 설정
    #[serde(default)]
    pub server: ServerSettings,

    // 로깅 설정
    #[serde(default)]
    pub logging: LogSettings,

    /// 미들웨어 설정
    #[serde(default)]
    pub middleware: HashMap<String, MiddlewareConfig>,
}

impl Settings {
    pub async fn load() -> Result<Self> {
        if let Ok(config_path) = env::var("COMPRESS_CONFIG_FILE") {
            Self::from_toml_file(&config_path).await
        } else {
            Self::from_env().await
        }
    }

    pub async fn from_toml_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).map_err(|e| SettingsError::FileError {
            path: path.as_ref().to_string_lossy().to_string(),
            error: e,
        })?;

        let settings: Self = toml::from_str(&content)
            .map_err(|e| SettingsError::ParseError { source: e })?;

        settings.validate()?;
        Ok(settings)
    }

    pub async fn from_env() -> Result<Self> {
        let settings = Self {
            server: ServerSettings::from_env()?,
            logging: LogSettings::from_env()?,
            middleware: HashMap::new(),
        };

        // 설정 생성 시점에 바로 검증
        settings.validate()?;
        Ok(settings)
    }

    /// 설정 유효성 검증
    ///
    /// 미들웨어 생성 시점이 아닌 로드 시점에 잘못된 값을 드러냅니다.
    pub fn validate(&self) -> Result<()> {
        for (name, middleware) in &self.middleware {
            if !middleware.enabled {
                continue;
            }

            match middleware.middleware_type {
                MiddlewareType::Compress => {
                    let settings = middleware.string_settings();

                    if let Some(level) = settings.get("compress.level") {
                        match level.parse::<u32>() {
                            Ok(level) if (1..=9).contains(&level) => {}
                            _ => {
                                return Err(SettingsError::InvalidConfig(format!(
                                    "{}: 압축 레벨은 1-9 범위여야 합니다: {}",
                                    name, level
                                )));
                            }
                        }
                    }

                    if let Some(min_size) = settings.get("compress.minSize") {
                        if min_size.parse::<usize>().is_err() {
                            return Err(SettingsError::InvalidConfig(format!(
                                "{}: 잘못된 최소 크기: {}",
                                name, min_size
                            )));
                        }
                    }

                    if let Some(workers) = settings.get("compress.workers") {
                        match workers.parse::<usize>() {
                            Ok(workers) if workers >= 1 => {}
                            _ => {
                                return Err(SettingsError::InvalidConfig(format!(
                                    "{}: 워커 수는 1 이상이어야 합니다: {}",
                                    name, workers
                                )));
                            }
                        }
                    }

                    if let Some(mime_types) = settings.get("compress.mimeTypes") {
                        let has_valid_entry = mime_types
                            .split(',')
                            .map(str::trim)
                            .any(|mime| mime.contains('/'));
                        if !has_valid_entry {
                            return Err(SettingsError::InvalidConfig(format!(
                                "{}: 잘못된 MIME 타입 목록: {}",
                                name, mime_types
                            )));
                        }
                    }
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_from_toml() {
        let toml_content = r#"
            [server]
            http_port = 8080

            [logging]
            format = "json"
            level = "info"

            [middleware.compress]
            middleware_type = "compress"
            enabled = true
            order = 1

            [middleware.compress.settings]
            "compress.level" = "9"
        "#;

        let settings: Settings = toml::from_str(toml_content).unwrap();
        assert_eq!(settings.server.http_port, 8080);
        assert_eq!(settings.middleware.len(), 1);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_level() {
        let toml_content = r#"
            [middleware.compress]
            middleware_type = "compress"

            [middleware.compress.settings]
            "compress.level" = "10"
        "#;

        let settings: Settings = toml::from_str(toml_content).unwrap();
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_validate_ignores_disabled_middleware() {
        let toml_content = r#"
            [middleware.compress]
            middleware_type = "compress"
            enabled = false

            [middleware.compress.settings]
            "compress.level" = "10"
        "#;

        let settings: Settings = toml::from_str(toml_content).unwrap();
        assert!(settings.validate().is_ok());
    }
}

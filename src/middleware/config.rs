use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 미들웨어 설정을 위한 공통 인터페이스
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum MiddlewareType {
    Compress,
    // 추후 추가될 미들웨어 타입들...
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MiddlewareConfig {
    /// 미들웨어 타입
    pub middleware_type: MiddlewareType,

    /// 미들웨어 활성화 여부
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// 실행 순서 (낮은 숫자가 먼저 실행)
    #[serde(default)]
    pub order: i32,

    /// 미들웨어별 설정
    #[serde(default)]
    pub settings: HashMap<String, serde_json::Value>,
}

fn default_enabled() -> bool {
    true
}

impl MiddlewareConfig {
    /// TOML 설정에서 미들웨어 설정을 파싱합니다.
    pub fn from_toml(config: &str) -> Result<HashMap<String, Self>, toml::de::Error> {
        #[derive(Deserialize)]
        struct Config {
            middlewares: HashMap<String, MiddlewareConfig>,
        }

        let config: Config = toml::from_str(config)?;
        Ok(config.middlewares)
    }

    /// 문자열 값으로 변환한 설정 맵을 반환합니다.
    pub fn string_settings(&self) -> HashMap<String, String> {
        self.settings
            .iter()
            .map(|(k, v)| {
                let string_value = v
                    .as_str()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| v.to_string());
                (k.clone(), string_value)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_toml_config() {
        let toml_str = r#"
            [middlewares.compress]
            middleware_type = "compress"
            enabled = true
            order = 1

            [middlewares.compress.settings]
            "compress.level" = "9"
            "compress.minSize" = "1024"
        "#;

        let configs = MiddlewareConfig::from_toml(toml_str).unwrap();
        assert_eq!(configs.len(), 1);

        let config = configs.get("compress").unwrap();
        assert_eq!(config.middleware_type, MiddlewareType::Compress);
        assert!(config.enabled);
        assert_eq!(config.order, 1);
        assert!(config.settings.contains_key("compress.level"));
    }

    #[test]
    fn test_string_settings_converts_values() {
        let toml_str = r#"
            [middlewares.compress]
            middleware_type = "compress"

            [middlewares.compress.settings]
            "compress.level" = "3"
        "#;

        let configs = MiddlewareConfig::from_toml(toml_str).unwrap();
        let settings = configs.get("compress").unwrap().string_settings();
        assert_eq!(settings.get("compress.level").map(String::as_str), Some("3"));
    }
}

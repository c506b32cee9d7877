use response_compress::settings::Settings;
use std::sync::Once;

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;  // 테스트 격리를 위해 추가

    static INIT: Once = Once::new();

    fn setup() {
        INIT.call_once(|| {
            cleanup_env();
        });
    }

    fn teardown() {
        cleanup_env();
    }

    // 테스트 전후 환경변수 초기화를 위한 헬퍼 함수
    fn cleanup_env() {
        std::env::remove_var("COMPRESS_HTTP_PORT");
        std::env::remove_var("COMPRESS_LOG_LEVEL");
        std::env::remove_var("COMPRESS_LOG_FORMAT");
        std::env::remove_var("COMPRESS_CONFIG_FILE");
    }

    // 테스트용 임시 TOML 파일 생성 헬퍼
    fn create_test_toml(content: &str) -> (String, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let file_path = dir.path().join("test_config.toml");
        std::fs::write(&file_path, content).unwrap();
        (file_path.to_str().unwrap().to_string(), dir)
    }

    #[tokio::test]
    #[serial]
    async fn test_settings_defaults_from_env() {
        setup();

        let settings = Settings::from_env().await.unwrap();
        assert_eq!(settings.server.http_port, 8000);
        assert!(settings.middleware.is_empty());

        teardown();
    }

    #[tokio::test]
    #[serial]
    async fn test_settings_env_overrides() {
        setup();

        std::env::set_var("COMPRESS_HTTP_PORT", "8081");
        std::env::set_var("COMPRESS_LOG_LEVEL", "debug");
        let settings = Settings::from_env().await.unwrap();
        assert_eq!(settings.server.http_port, 8081);
        assert_eq!(settings.logging.level, tracing::Level::DEBUG);

        teardown();
    }

    #[tokio::test]
    #[serial]
    async fn test_settings_validation() {
        setup();

        // 1. 잘못된 포트 번호
        std::env::set_var("COMPRESS_HTTP_PORT", "99999");
        let result = Settings::from_env().await;
        assert!(result.is_err());
        teardown();

        // 2. 잘못된 로그 레벨
        std::env::set_var("COMPRESS_LOG_LEVEL", "invalid_level");
        let result = Settings::from_env().await;
        assert!(result.is_err());
        teardown();
    }

    #[tokio::test]
    #[serial]
    async fn test_settings_from_toml_file() {
        setup();

        let toml_content = r#"
            [server]
            http_port = 9090

            [logging]
            format = "json"
            level = "warn"

            [middleware.compress]
            middleware_type = "compress"
            enabled = true

            [middleware.compress.settings]
            "compress.level" = "4"
            "compress.minSize" = "256"
        "#;

        let (path, _dir) = create_test_toml(toml_content);
        let settings = Settings::from_toml_file(&path).await.unwrap();

        assert_eq!(settings.server.http_port, 9090);
        assert_eq!(settings.logging.level, tracing::Level::WARN);
        assert_eq!(settings.middleware.len(), 1);

        let compress = settings.middleware.get("compress").unwrap();
        assert!(compress.enabled);
        assert_eq!(
            compress.string_settings().get("compress.level").map(String::as_str),
            Some("4")
        );

        teardown();
    }

    #[tokio::test]
    #[serial]
    async fn test_settings_from_toml_file_rejects_bad_level() {
        setup();

        let toml_content = r#"
            [middleware.compress]
            middleware_type = "compress"

            [middleware.compress.settings]
            "compress.level" = "0"
        "#;

        let (path, _dir) = create_test_toml(toml_content);
        let result = Settings::from_toml_file(&path).await;
        assert!(result.is_err());

        teardown();
    }

    #[tokio::test]
    #[serial]
    async fn test_load_prefers_config_file() {
        setup();

        let toml_content = r#"
            [server]
            http_port = 9191
        "#;

        let (path, _dir) = create_test_toml(toml_content);
        std::env::set_var("COMPRESS_CONFIG_FILE", &path);
        std::env::set_var("COMPRESS_HTTP_PORT", "8081");

        let settings = Settings::load().await.unwrap();
        assert_eq!(settings.server.http_port, 9191);

        teardown();
    }

    #[tokio::test]
    #[serial]
    async fn test_load_missing_config_file_fails() {
        setup();

        std::env::set_var("COMPRESS_CONFIG_FILE", "/nonexistent/config.toml");
        let result = Settings::load().await;
        assert!(result.is_err());

        teardown();
    }
}

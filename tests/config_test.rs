//! Configuration loading tests
//!
//! These mutate process environment variables, so they run serially.

use std::io::Write;

use fullslack::client::config::CONFIG_PATH_ENV;
use fullslack::client::Config;
use serial_test::serial;

const CLIENT_VARS: [&str; 4] = [
    CONFIG_PATH_ENV,
    "FULLSLACK_SERVER_URL",
    "FULLSLACK_CHAT_BASE_URL",
    "FULLSLACK_CHAT_API_KEY",
];

fn clear(vars: &[&str]) {
    for var in vars {
        std::env::remove_var(var);
    }
}

#[test]
#[serial]
fn test_client_config_from_file_with_env_override() {
    clear(&CLIENT_VARS);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        r#"
server_url = "http://file.example:3000"
chat_base_url = "https://chat.file.example"
chat_api_key = "file-key"
"#
    )
    .unwrap();

    std::env::set_var(CONFIG_PATH_ENV, file.path());
    std::env::set_var("FULLSLACK_CHAT_API_KEY", "env-key");

    let config = Config::load().unwrap();
    assert_eq!(config.server_url(), "http://file.example:3000");
    assert_eq!(config.chat_base_url().unwrap(), "https://chat.file.example");
    assert_eq!(config.chat_api_key().unwrap(), "env-key");

    clear(&CLIENT_VARS);
}

#[test]
#[serial]
fn test_client_config_rejects_bad_file() {
    clear(&CLIENT_VARS);

    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "server_url = [not toml").unwrap();
    std::env::set_var(CONFIG_PATH_ENV, file.path());

    assert!(Config::load().is_err());

    clear(&CLIENT_VARS);
}

#[test]
#[serial]
fn test_client_config_missing_file_uses_env() {
    clear(&CLIENT_VARS);
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var(CONFIG_PATH_ENV, dir.path().join("absent.toml"));
    std::env::set_var("FULLSLACK_SERVER_URL", "http://env.example:4000");

    let config = Config::load().unwrap();
    assert_eq!(config.server_url(), "http://env.example:4000");
    assert!(config.chat_base_url().is_err());

    clear(&CLIENT_VARS);
}

#[cfg(feature = "ssr")]
mod server {
    use super::*;
    use fullslack::backend::server::ServerConfig;
    use fullslack::shared::ConfigError;

    const SERVER_VARS: [&str; 6] = [
        "SERVER_PORT",
        "STREAM_API_KEY",
        "STREAM_API_SECRET",
        "IDENTITY_JWT_KEY",
        "IDENTITY_JWT_SECRET",
        "DATABASE_URL",
    ];

    #[test]
    #[serial]
    fn test_server_config_from_env() {
        clear(&SERVER_VARS);
        std::env::set_var("SERVER_PORT", "4100");
        std::env::set_var("STREAM_API_KEY", "key");
        std::env::set_var("STREAM_API_SECRET", "secret");
        std::env::set_var("IDENTITY_JWT_SECRET", "idp");
        std::env::set_var("DATABASE_URL", "sqlite::memory:");

        let config = ServerConfig::from_env().unwrap();
        assert_eq!(config.port, 4100);
        assert_eq!(config.stream.api_key, "key");
        assert_eq!(config.database_url.as_deref(), Some("sqlite::memory:"));

        clear(&SERVER_VARS);
    }

    #[test]
    #[serial]
    fn test_server_config_requires_stream_credentials() {
        clear(&SERVER_VARS);
        std::env::set_var("IDENTITY_JWT_SECRET", "idp");

        assert!(matches!(
            ServerConfig::from_env(),
            Err(ConfigError::MissingValue("STREAM_API_KEY"))
        ));

        clear(&SERVER_VARS);
    }
}

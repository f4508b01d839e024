//! Tests for db::factory and db::repo_config - repository selection and
//! profile-based configuration.

mod support;

use std::io::Write;
use std::str::FromStr;

use blog_backend::db::factory::{RepositoryFactory, RepositoryType};
use blog_backend::db::repo_config::{active_profile, RepositoryConfig, DEFAULT_PROFILE};
use blog_backend::db::repository::RepositoryError;
use blog_backend::models::NewPost;

const PROFILES: &str = r#"
[development]
type = "local"

[test]
type = "memory"

[production]
type = "postgres"
use_env_variable = "BLOG_TEST_PRODUCTION_URL"
max_connections = 20
"#;

fn write_config(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn block_on<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .unwrap()
        .block_on(future)
}

#[test]
fn test_repository_type_from_str_postgres() {
    assert_eq!(
        RepositoryType::from_str("POSTGRES").unwrap(),
        RepositoryType::Postgres
    );
    assert_eq!(
        RepositoryType::from_str("pg").unwrap(),
        RepositoryType::Postgres
    );
}

#[test]
fn test_repository_type_from_str_local() {
    assert_eq!(
        RepositoryType::from_str("LOCAL").unwrap(),
        RepositoryType::Local
    );
    assert_eq!(
        RepositoryType::from_str("memory").unwrap(),
        RepositoryType::Local
    );
}

#[test]
fn test_repository_type_from_str_invalid() {
    let result = RepositoryType::from_str("sqlite");
    assert!(result.unwrap_err().contains("Unknown repository type"));
}

#[test]
fn test_repository_type_from_env_default() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("DATABASE_URL", None),
            ("PG_DATABASE_URL", None),
        ],
        || assert_eq!(RepositoryType::from_env().unwrap(), RepositoryType::Local),
    );
}

#[test]
fn test_repository_type_from_env_with_database_url() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("DATABASE_URL", Some("postgres://localhost/blog")),
        ],
        || assert_eq!(RepositoryType::from_env().unwrap(), RepositoryType::Postgres),
    );
}

#[test]
fn test_repository_type_explicit_override_wins() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("local")),
            ("DATABASE_URL", Some("postgres://localhost/blog")),
        ],
        || assert_eq!(RepositoryType::from_env().unwrap(), RepositoryType::Local),
    );
}

#[test]
fn test_repository_type_typo_is_configuration_error() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("postgress")),
            ("DATABASE_URL", Some("postgres://localhost/blog")),
        ],
        || {
            let err = RepositoryType::from_env().unwrap_err();
            assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
            assert!(err.to_string().contains("postgress"));
        },
    );
}

#[test]
fn test_from_environment_refuses_unknown_repository_type() {
    support::with_scoped_env(
        &[
            ("BLOG_CONFIG", None),
            ("REPOSITORY_TYPE", Some("postgress")),
            ("DATABASE_URL", Some("postgres://localhost/blog")),
        ],
        || match block_on(RepositoryFactory::from_environment()) {
            Ok(_) => panic!("expected unknown repository type to fail"),
            Err(e) => assert!(matches!(e, RepositoryError::ConfigurationError { .. })),
        },
    );
}

#[test]
fn test_active_profile_defaults_to_development() {
    support::with_scoped_env(&[("APP_ENV", None)], || {
        assert_eq!(active_profile(), DEFAULT_PROFILE);
    });
    support::with_scoped_env(&[("APP_ENV", Some("production"))], || {
        assert_eq!(active_profile(), "production");
    });
}

#[test]
fn test_from_environment_uses_profile_from_app_env() {
    let file = write_config(PROFILES);
    let path = file.path().to_string_lossy().to_string();

    support::with_scoped_env(
        &[("BLOG_CONFIG", Some(path.as_str())), ("APP_ENV", Some("test"))],
        || {
            block_on(async {
                let repo = RepositoryFactory::from_environment().await.unwrap();
                assert!(repo.health_check().await.unwrap());
                repo.create_post(&NewPost::new("a", "b", "c")).await.unwrap();
                assert_eq!(repo.list_posts().await.unwrap().len(), 1);
            })
        },
    );
}

#[test]
fn test_from_environment_unknown_profile_is_configuration_error() {
    let file = write_config(PROFILES);
    let path = file.path().to_string_lossy().to_string();

    support::with_scoped_env(
        &[
            ("BLOG_CONFIG", Some(path.as_str())),
            ("APP_ENV", Some("staging")),
        ],
        || {
            let err = match block_on(RepositoryFactory::from_environment()) {
                Ok(_) => panic!("expected missing profile to fail"),
                Err(e) => e,
            };
            assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
            assert!(err.to_string().contains("staging"));
        },
    );
}

#[test]
fn test_postgres_profile_with_unset_env_variable_fails() {
    let file = write_config(PROFILES);

    support::with_scoped_env(&[("BLOG_TEST_PRODUCTION_URL", None)], || {
        let result = block_on(RepositoryFactory::from_config_file(
            file.path(),
            "production",
        ));
        let err = match result {
            Ok(_) => panic!("expected production profile to fail"),
            Err(e) => e,
        };
        assert!(matches!(err, RepositoryError::ConfigurationError { .. }));
    });
}

#[test]
fn test_missing_config_file_is_configuration_error() {
    let result = block_on(RepositoryFactory::from_config_file(
        "/nonexistent/repository.toml",
        "development",
    ));
    match result {
        Ok(_) => panic!("expected missing file to fail"),
        Err(e) => assert!(e.to_string().contains("Failed to read config file")),
    }
}

#[test]
fn test_config_file_round_trips_profile_settings() {
    let file = write_config(PROFILES);
    let config = RepositoryConfig::from_file(file.path()).unwrap();

    let production = config.profile("production").unwrap();
    assert_eq!(production.repository_type().unwrap(), RepositoryType::Postgres);
    assert_eq!(production.max_connections, 20);
    assert_eq!(production.max_retries, 0);
    assert_eq!(
        production.use_env_variable.as_deref(),
        Some("BLOG_TEST_PRODUCTION_URL")
    );

    support::with_scoped_env(
        &[("BLOG_TEST_PRODUCTION_URL", Some("postgres://db/blog"))],
        || {
            assert_eq!(
                production.resolve_database_url().unwrap(),
                "postgres://db/blog"
            );
        },
    );
}

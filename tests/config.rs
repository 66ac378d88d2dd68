// ABOUTME: Integration tests for configuration parsing and validation.
// ABOUTME: Tests YAML parsing, defaults, env-backed secrets, discovery, and init.

use cfkit::config::*;
use cfkit::deploy::DeployStrategy;
use cfkit::error::Error;
use std::time::Duration;

mod parsing {
    use super::*;

    #[test]
    fn parse_minimal_config() {
        let yaml = r#"
target: https://api.sys.example.com
username: admin
"#;
        let config = Config::from_yaml(yaml).unwrap();
        assert_eq!(config.target, "https://api.sys.example.com");
        assert_eq!(config.username, "admin");
        assert!(config.password.is_none());
        assert!(config.app.is_none());
    }

    #[test]
    fn defaults_are_secure_and_documented() {
        let config = Config::from_yaml("target: https://api.example.com\nusername: u\n").unwrap();

        assert!(!config.transport.skip_ssl_validation);
        assert_eq!(config.transport.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.transport.request_timeout, Duration::from_secs(60));
        assert_eq!(config.auth.client_id, "cf");
        assert_eq!(config.auth.client_secret, "");
        assert_eq!(config.deploy.strategy, DeployStrategy::Rest);
        assert_eq!(config.deploy.build_poll_interval, Duration::from_secs(2));
        assert_eq!(config.deploy.build_poll_attempts, 150);
        assert_eq!(config.deploy.step_timeout, Duration::from_secs(300));
        assert_eq!(config.deploy.cf_path, None);
    }

    #[test]
    fn parse_full_config() {
        let yaml = r#"
target: https://api.sys.example.com
username: admin
password: hunter2
instance_name: prod
transport:
  skip_ssl_validation: true
  request_timeout: 2m
auth:
  client_id: ops
  client_secret: s3
deploy:
  strategy: cli
  build_poll_interval: 500ms
  build_poll_attempts: 20
  step_timeout: 90s
  cf_path: /opt/cf/bin/cf
app:
  name: web
  path: ./dist
  org: acme
  space: dev
  route:
    domain_guid: 8e0a4b34-0000-4000-8000-000000000001
    host: Web-App
    port: 1024
"#;
        let config = Config::from_yaml(yaml).unwrap();

        assert_eq!(config.instance_name(), "prod");
        assert!(config.transport.skip_ssl_validation);
        assert_eq!(config.transport.request_timeout, Duration::from_secs(120));
        assert_eq!(config.auth.client_id, "ops");
        assert_eq!(config.deploy.strategy, DeployStrategy::Cli);
        assert_eq!(config.deploy.build_poll_interval, Duration::from_millis(500));
        assert_eq!(config.deploy.build_poll_attempts, 20);
        assert_eq!(config.deploy.step_timeout, Duration::from_secs(90));
        assert_eq!(config.password().unwrap(), "hunter2");

        let app = config.app.unwrap();
        assert_eq!(app.name, "web");
        assert_eq!(app.org, "acme");
        assert_eq!(app.space, "dev");

        let route = app.route.unwrap().to_spec();
        assert_eq!(route.host.as_str(), "web-app");
        assert_eq!(route.port, Some(1024));
        assert_eq!(route.process_type, "web");
        assert_eq!(route.destination_port, Some(8080));
        assert_eq!(route.path, "");
    }

    #[test]
    fn instance_name_defaults_to_target_host() {
        let config =
            Config::from_yaml("target: https://api.sys.example.com:8443\nusername: u\n").unwrap();
        assert_eq!(config.instance_name(), "api.sys.example.com");
    }
}

mod validation {
    use super::*;

    #[test]
    fn rejects_malformed_target() {
        let err = Config::from_yaml("target: not-a-url\nusername: u\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn rejects_empty_username() {
        let err = Config::from_yaml("target: https://api.example.com\nusername: ''\n").unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
    }

    #[test]
    fn rejects_zero_poll_attempts() {
        let yaml = "target: https://api.example.com\nusername: u\ndeploy:\n  build_poll_attempts: 0\n";
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(err.to_string().contains("build_poll_attempts"));
    }

    #[test]
    fn rejects_invalid_route_host() {
        let yaml = r#"
target: https://api.example.com
username: u
app:
  name: web
  org: acme
  space: dev
  route:
    domain_guid: d1
    host: -bad
"#;
        let err = Config::from_yaml(yaml).unwrap_err();
        assert!(matches!(err, Error::Yaml(_)));
    }

    #[test]
    fn rejects_unknown_strategy() {
        let yaml = "target: https://api.example.com\nusername: u\ndeploy:\n  strategy: blue-green\n";
        assert!(matches!(Config::from_yaml(yaml), Err(Error::Yaml(_))));
    }

    #[test]
    fn missing_password_is_reported_on_use() {
        let config = Config::from_yaml("target: https://api.example.com\nusername: u\n").unwrap();
        assert!(matches!(config.password(), Err(Error::InvalidConfig(_))));
    }
}

mod secrets {
    use super::*;

    const YAML: &str = r#"
target: https://api.example.com
username: admin
password:
  env: CFKIT_TEST_PASSWORD
"#;

    #[test]
    fn password_is_read_from_environment() {
        let config = Config::from_yaml(YAML).unwrap();
        let password = temp_env::with_var("CFKIT_TEST_PASSWORD", Some("from-env"), || {
            config.password()
        });
        assert_eq!(password.unwrap(), "from-env");
    }

    #[test]
    fn unset_variable_is_an_error() {
        let config = Config::from_yaml(YAML).unwrap();
        let password = temp_env::with_var_unset("CFKIT_TEST_PASSWORD", || config.password());
        assert!(matches!(password, Err(Error::MissingEnvVar(ref v)) if v == "CFKIT_TEST_PASSWORD"));
    }

    #[test]
    fn debug_output_hides_literal_password() {
        let config =
            Config::from_yaml("target: https://api.example.com\nusername: u\npassword: hunter2\n")
                .unwrap();
        assert!(!format!("{config:?}").contains("hunter2"));
    }
}

mod discovery {
    use super::*;

    const YAML: &str = "target: https://api.example.com\nusername: u\n";

    #[test]
    fn finds_primary_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), YAML).unwrap();
        assert!(Config::discover(dir.path()).is_ok());
    }

    #[test]
    fn finds_nested_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join(".cfkit")).unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME_DIR), YAML).unwrap();
        assert!(Config::discover(dir.path()).is_ok());
    }

    #[test]
    fn reports_missing_config() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Config::discover(dir.path()),
            Err(Error::ConfigNotFound(_))
        ));
    }
}

mod init {
    use super::*;

    #[test]
    fn template_parses_back() {
        let dir = tempfile::tempdir().unwrap();
        init_config(dir.path(), Some("https://api.cf.example.org"), Some("shop"), false).unwrap();

        let config = Config::discover(dir.path()).unwrap();
        assert_eq!(config.target, "https://api.cf.example.org");
        assert_eq!(config.app.unwrap().name, "shop");
        assert!(matches!(config.password, Some(EnvValue::FromEnv { ref var, .. }) if var == "CF_PASSWORD"));
    }

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILENAME), "existing").unwrap();

        let err = init_config(dir.path(), None, None, false).unwrap_err();
        assert!(matches!(err, Error::AlreadyExists(_)));

        init_config(dir.path(), None, None, true).unwrap();
        assert!(Config::discover(dir.path()).is_ok());
    }

    #[test]
    fn rejects_malformed_target() {
        let dir = tempfile::tempdir().unwrap();
        let err = init_config(dir.path(), Some("ftp://nope"), None, false).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig(_)));
        assert!(!dir.path().join(CONFIG_FILENAME).exists());
    }
}

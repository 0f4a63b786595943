mod common;

use std::fs;
use std::time::Duration;

use tributary::{Client, ClientConfig, LogLevel, ProducerOptions, SaslMechanism};

use crate::common::folder_to_use;

#[test]
fn test_client_from_config_file() {
    let dir = folder_to_use();
    let path = dir.path().join("client.toml");
    fs::write(
        &path,
        r#"
brokers = ["kafka-1:9092", "kafka-2:9092"]
client_id = "ingest"
request_timeout_ms = 5000
enforce_request_timeout = true
log_level = "warn"

[retry]
retries = 3
max_retry_time_ms = 1000

[ssl]
ca_path = "/etc/ssl/ca.pem"
reject_unauthorized = true
"#,
    )
    .expect("write config");

    let config = ClientConfig::load_or_default(Some(&path)).expect("load config");
    assert_eq!(config.request_timeout, Duration::from_millis(5000));
    assert!(config.enforce_request_timeout);
    assert_eq!(config.log_level, LogLevel::Warn);
    assert!(config.ssl.as_ref().is_some_and(|ssl| ssl.reject_unauthorized));

    let client = Client::new(config).expect("client");
    let producer = client.producer(ProducerOptions::default()).unwrap();
    let pool = producer.cluster().config();
    assert_eq!(pool.identity.client_id, "ingest");
    assert_eq!(pool.retry.retries, 3);
    assert_eq!(pool.retry.max_retry_time, Duration::from_millis(1000));
    assert_eq!(client.logger().level(), LogLevel::Warn);
}

#[test]
fn test_missing_file_is_a_configuration_error() {
    let dir = folder_to_use();
    let err = ClientConfig::load_or_default(Some(dir.path().join("absent.toml"))).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_file_without_brokers_fails_at_client_construction() {
    let dir = folder_to_use();
    let path = dir.path().join("client.toml");
    fs::write(&path, "client_id = \"lonely\"\n").expect("write config");

    let config = ClientConfig::load_or_default(Some(&path)).expect("parses fine");
    assert!(Client::new(config).unwrap_err().is_configuration());
}

#[test]
fn test_malformed_toml_is_a_configuration_error() {
    let dir = folder_to_use();
    let path = dir.path().join("client.toml");
    fs::write(&path, "brokers = [\"unterminated\"\n").expect("write config");

    assert!(ClientConfig::load_or_default(Some(&path))
        .unwrap_err()
        .is_configuration());
}

#[test]
fn test_sasl_section_uses_standard_mechanism_names() {
    let dir = folder_to_use();
    let path = dir.path().join("client.toml");

    for (name, expected) in [
        ("plain", SaslMechanism::Plain),
        ("scram-sha-256", SaslMechanism::ScramSha256),
        ("scram-sha-512", SaslMechanism::ScramSha512),
        ("oauthbearer", SaslMechanism::OauthBearer),
        ("aws", SaslMechanism::Aws),
    ] {
        fs::write(
            &path,
            format!(
                "brokers = [\"kafka-1:9093\"]\n\n[sasl]\nmechanism = \"{name}\"\nusername = \"svc\"\npassword = \"s3cret\"\n"
            ),
        )
        .expect("write config");

        let config = ClientConfig::load_or_default(Some(&path)).expect("load config");
        let sasl = config.sasl.expect("sasl section");
        assert_eq!(sasl.mechanism, expected, "mechanism {name}");
        assert_eq!(sasl.username, "svc");
    }

    fs::write(
        &path,
        "brokers = [\"kafka-1:9093\"]\n\n[sasl]\nmechanism = \"scram-sha512\"\nusername = \"svc\"\npassword = \"s3cret\"\n",
    )
    .expect("write config");
    assert!(ClientConfig::load_or_default(Some(&path))
        .unwrap_err()
        .is_configuration());
}

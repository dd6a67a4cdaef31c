use crate::actions::NATIVE_ASSET_ID;
use crate::merge::MergeSettings;
use crate::rpc::{ClientCert, RpcConfig};
use anyhow::{anyhow, Context};
use reqwest::Method;
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct Config {
    pub endpoint: String,
    pub http_verb: String,
    pub http_user: Option<String>,
    pub http_pass: Option<String>,
    pub https_cert: Option<PathBuf>,
    pub https_key: Option<PathBuf>,
    pub https_ca: Option<PathBuf>,
    pub no_verify: bool,
    pub rebuild_delay_ms: u64,
    pub ttl: u64,
    pub asset_id: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: "http://127.0.0.1:9888".to_string(),
            http_verb: "POST".to_string(),
            http_user: None,
            http_pass: None,
            https_cert: None,
            https_key: None,
            https_ca: None,
            no_verify: false,
            rebuild_delay_ms: 1000,
            ttl: 1,
            asset_id: NATIVE_ASSET_ID.to_string(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let file = File::open(path).with_context(|| {
            format!("Cannot read config file {path}", path = path.display())
        })?;
        serde_yaml::from_reader(file).with_context(|| {
            format!("Cannot parse config file {path}", path = path.display())
        })
    }

    pub fn rpc_config(&self) -> anyhow::Result<RpcConfig> {
        let http_verb = Method::from_bytes(self.http_verb.to_ascii_uppercase().as_bytes())
            .map_err(|_| anyhow!("invalid HTTP verb {:?}", self.http_verb))?;

        let basic_auth = match (&self.http_user, &self.http_pass) {
            (Some(user), Some(pass)) if !user.is_empty() && !pass.is_empty() => {
                Some((user.clone(), pass.clone()))
            }
            _ => None,
        };

        Ok(RpcConfig {
            endpoint: self.endpoint.clone(),
            http_verb,
            basic_auth,
            client_cert: self.https_cert.clone().map(|cert| ClientCert {
                cert,
                key: self.https_key.clone(),
            }),
            ca_bundle: self.https_ca.clone(),
            verify_server: !self.no_verify,
        })
    }

    pub fn merge_settings(&self) -> MergeSettings {
        MergeSettings {
            rebuild_delay: Duration::from_millis(self.rebuild_delay_ms),
            ttl: self.ttl,
            asset_id: self.asset_id.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::Config;
    use reqwest::Method;
    use std::path::PathBuf;
    use std::time::Duration;

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config, Config::default());

        let rpc = config.rpc_config().unwrap();
        assert_eq!(rpc.endpoint, "http://127.0.0.1:9888");
        assert_eq!(rpc.http_verb, Method::POST);
        assert!(rpc.basic_auth.is_none());
        assert!(rpc.client_cert.is_none());
        assert!(rpc.verify_server);

        let settings = config.merge_settings();
        assert_eq!(settings.rebuild_delay, Duration::from_secs(1));
        assert_eq!(settings.ttl, 1);
        assert_eq!(settings.asset_id.len(), 64);
    }

    #[test]
    fn yaml_fields() {
        let config: Config = serde_yaml::from_str(
            "
endpoint: https://node.local:9888
http_verb: put
http_user: alice
http_pass: hunter2
https_cert: /etc/merge/client.pem
https_key: /etc/merge/client.key
no_verify: true
rebuild_delay_ms: 2500
",
        )
        .unwrap();
        let rpc = config.rpc_config().unwrap();
        assert_eq!(rpc.http_verb, Method::PUT);
        assert_eq!(
            rpc.basic_auth,
            Some(("alice".to_string(), "hunter2".to_string()))
        );
        let cert = rpc.client_cert.unwrap();
        assert_eq!(cert.cert, PathBuf::from("/etc/merge/client.pem"));
        assert_eq!(cert.key, Some(PathBuf::from("/etc/merge/client.key")));
        assert!(!rpc.verify_server);
        assert_eq!(
            config.merge_settings().rebuild_delay,
            Duration::from_millis(2500)
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(serde_yaml::from_str::<Config>("endpoint: x\nretries: 3\n").is_err());
    }

    #[test]
    fn auth_needs_user_and_password() {
        let config = Config {
            http_user: Some("alice".to_string()),
            ..Default::default()
        };
        assert!(config.rpc_config().unwrap().basic_auth.is_none());
    }

    #[test]
    fn bad_verb_is_an_error() {
        let config = Config {
            http_verb: "GE T".to_string(),
            ..Default::default()
        };
        assert!(config.rpc_config().is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = Config::load(&PathBuf::from("/nonexistent/merge.yaml")).unwrap_err();
        assert!(err.to_string().contains("Cannot read config file"));
    }
}

use crate::client_error::ClientError;
use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Modules a client works with when the configuration does not list any.
pub const DEFAULT_MODULES: &[&str] = &["Accounts", "Contacts", "Leads", "Potentials"];

/// Contents of the YAML configuration file.
///
/// ```yaml
/// auth_token: 62cedfe9427caef8afb9ea3b5bf68154
/// modules:
///   - Contacts
///   - Leads
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub auth_token: String,

    #[serde(default = "default_modules")]
    pub modules: Vec<String>,

    /// Overrides `https://crm.zoho.com/crm/private/xml`.
    #[serde(default)]
    pub base_url: Option<String>,
}

fn default_modules() -> Vec<String> {
    DEFAULT_MODULES.iter().map(|module| module.to_string()).collect()
}

impl Config {
    /// Read the configuration file. A missing file is reported as
    /// `ClientError::ConfigurationNotFound`.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Config, ClientError> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(ClientError::ConfigurationNotFound(path.to_path_buf()));
        }

        let raw = fs::read_to_string(path)
            .map_err(|err| ClientError::Configuration(format!("{}: {}", path.display(), err)))?;

        Config::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Config, ClientError> {
        let config: Config = serde_yaml::from_str(raw)?;

        if config.auth_token.trim().is_empty() {
            return Err(ClientError::Configuration(String::from("auth_token is empty")));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "auth_token: abc123\nmodules:\n  - Contacts\n  - Tasks").unwrap();

        let config = Config::load(file.path()).unwrap();

        assert_eq!(config.auth_token, "abc123");
        assert_eq!(config.modules, vec!["Contacts", "Tasks"]);
        assert_eq!(config.base_url, None);
    }

    #[test]
    fn modules_default() {
        let config = Config::from_yaml("auth_token: abc123").unwrap();

        assert_eq!(config.modules, vec!["Accounts", "Contacts", "Leads", "Potentials"]);
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zoho_api_configuration.yaml");

        match Config::load(&path) {
            Err(ClientError::ConfigurationNotFound(missing)) => assert_eq!(missing, path),
            other => panic!("expected ConfigurationNotFound, got {:?}", other),
        }
    }

    #[test]
    fn missing_token() {
        match Config::from_yaml("modules: [Contacts]") {
            Err(ClientError::Configuration(_)) => {}
            other => panic!("expected a configuration error, got {:?}", other),
        }
    }

    #[test]
    fn empty_token() {
        assert!(Config::from_yaml("auth_token: ''").is_err());
    }
}

use serde::Deserialize;
use std::fmt;
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

/// The environment the application runs in.
///
/// Production hides error details from responses and quiets logging.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum Environment {
  Production,
  Development,
  Test,
  Custom(String),
}

impl Environment {
  pub fn is_production(&self) -> bool {
    *self == Environment::Production
  }
}

impl Default for Environment {
  fn default() -> Self {
    Environment::Development
  }
}

impl From<&str> for Environment {
  fn from(s: &str) -> Self {
    match s.to_ascii_lowercase().as_str() {
      "prod" | "production" => Environment::Production,
      "dev" | "development" => Environment::Development,
      "test" | "testing" => Environment::Test,
      _ => Environment::Custom(s.to_owned()),
    }
  }
}

impl From<String> for Environment {
  fn from(s: String) -> Self {
    Environment::from(s.as_str())
  }
}

impl fmt::Display for Environment {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Environment::Production => f.write_str("production"),
      Environment::Development => f.write_str("development"),
      Environment::Test => f.write_str("test"),
      Environment::Custom(name) => f.write_str(name),
    }
  }
}

/// Errors loading a [`Config`] from disk.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
  #[error("failed to read config: {0}")]
  Io(#[from] std::io::Error),

  #[error("failed to parse config: {0}")]
  Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
  pub(crate) address: IpAddr,
  pub(crate) port: u16,
  pub(crate) keep_alive: Option<u64>,
  pub(crate) environment: Environment,
  pub(crate) work_dir: PathBuf,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      address: Ipv4Addr::new(127, 0, 0, 1).into(),
      port: 8000,
      keep_alive: Some(5),
      environment: Environment::default(),
      work_dir: PathBuf::from("./"),
    }
  }
}

impl Config {
  pub fn builder() -> Self {
    Self::default()
  }

  /// Parses a TOML document. Missing keys keep their defaults.
  /// ```
  /// use switchboard::{Config, Environment};
  ///
  /// let config = Config::from_toml("port = 8080\nenvironment = \"production\"").unwrap();
  /// assert_eq!(config.get_port(), 8080);
  /// assert_eq!(config.get_environment(), &Environment::Production);
  /// ```
  pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
    Ok(toml::from_str(content)?)
  }

  pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
    let content = fs::read_to_string(path)?;
    Self::from_toml(&content)
  }

  /// Sets the keepalive timeout (default is 5)
  pub fn keep_alive(mut self, seconds: impl Into<Option<u64>>) -> Self {
    self.keep_alive = seconds.into();
    self
  }

  /// Sets the port to serve on
  pub fn port(mut self, port: u16) -> Self {
    self.port = port;
    self
  }
  /// Sets the IP address to serve on
  pub fn address(mut self, addr: impl Into<IpAddr>) -> Self {
    self.address = addr.into();
    self
  }

  pub fn environment(mut self, environment: impl Into<Environment>) -> Self {
    self.environment = environment.into();
    self
  }

  /// Sets the directory holding the `Public` folder (default is `./`)
  pub fn work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
    self.work_dir = dir.into();
    self
  }

  pub fn get_port(&self) -> u16 {
    self.port
  }

  pub fn get_address(&self) -> IpAddr {
    self.address
  }

  pub fn get_environment(&self) -> &Environment {
    &self.environment
  }

  /// Where static files are served from.
  pub fn public_dir(&self) -> PathBuf {
    self.work_dir.join("Public")
  }

  /// Whether the configured environment is any of `environments`.
  pub fn in_environment(&self, environments: &[Environment]) -> bool {
    environments.contains(&self.environment)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Write;

  #[test]
  fn environments_parse_loosely() {
    assert_eq!(Environment::from("PROD"), Environment::Production);
    assert_eq!(Environment::from("production"), Environment::Production);
    assert_eq!(Environment::from("dev"), Environment::Development);
    assert_eq!(Environment::from("Testing"), Environment::Test);
    assert_eq!(
      Environment::from("staging"),
      Environment::Custom("staging".into())
    );
    assert_eq!(Environment::Custom("staging".into()).to_string(), "staging");
  }

  #[test]
  fn defaults() {
    let config = Config::default();
    assert_eq!(config.get_port(), 8000);
    assert_eq!(config.keep_alive, Some(5));
    assert_eq!(config.get_environment(), &Environment::Development);
    assert_eq!(config.public_dir(), PathBuf::from("./Public"));
  }

  #[test]
  fn builder_overrides() {
    let config = Config::builder()
      .port(3000)
      .keep_alive(None)
      .address([0, 0, 0, 0])
      .environment("production")
      .work_dir("/srv/app");

    assert_eq!(config.get_port(), 3000);
    assert_eq!(config.keep_alive, None);
    assert_eq!(config.get_address(), IpAddr::from([0, 0, 0, 0]));
    assert!(config.get_environment().is_production());
    assert_eq!(config.public_dir(), PathBuf::from("/srv/app/Public"));
  }

  #[test]
  fn loads_partial_toml() {
    let config = Config::from_toml(
      r#"
        address = "0.0.0.0"
        environment = "staging"
        work_dir = "/var/www"
      "#,
    )
    .unwrap();

    assert_eq!(config.get_port(), 8000);
    assert_eq!(config.get_address(), IpAddr::from([0, 0, 0, 0]));
    assert_eq!(
      config.get_environment(),
      &Environment::Custom("staging".into())
    );
    assert!(config.in_environment(&[
      Environment::Production,
      Environment::Custom("staging".into())
    ]));
    assert!(!config.in_environment(&[Environment::Production]));
  }

  #[test]
  fn reports_bad_toml() {
    let err = Config::from_toml("port = \"not a number\"").unwrap_err();
    assert!(matches!(err, ConfigError::Parse(_)));
  }

  #[test]
  fn loads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "port = 9090").unwrap();

    let config = Config::from_file(file.path()).unwrap();
    assert_eq!(config.get_port(), 9090);

    let err = Config::from_file(file.path().with_extension("missing")).unwrap_err();
    assert!(matches!(err, ConfigError::Io(_)));
  }
}

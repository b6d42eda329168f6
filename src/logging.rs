use crate::config::Environment;
use tracing_subscriber::EnvFilter;

/// Installs a global `tracing` subscriber writing to stdout.
///
/// `RUST_LOG` wins when set. Otherwise production logs warnings and errors
/// only, and every other environment logs at `info`. Returns `false` if a
/// subscriber was already installed.
pub fn init(environment: &Environment) -> bool {
  let filter = EnvFilter::try_from_default_env()
    .unwrap_or_else(|_| EnvFilter::new(default_directive(environment)));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .try_init()
    .is_ok()
}

fn default_directive(environment: &Environment) -> &'static str {
  if environment.is_production() {
    "warn"
  } else {
    "info"
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn production_is_quiet() {
    assert_eq!(default_directive(&Environment::Production), "warn");
    assert_eq!(default_directive(&Environment::Development), "info");
    assert_eq!(default_directive(&Environment::Custom("qa".into())), "info");
  }

  #[test]
  fn init_is_idempotent() {
    init(&Environment::Test);
    assert!(!init(&Environment::Test));
  }
}

//! Initialisation du système de logs.
//!
//! Le niveau minimum vient de la configuration (`logger.min_level`) ;
//! la variable `RUST_LOG`, si elle est définie, a priorité.

use rokuconfig::Config;
use tracing::Level;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Options d'initialisation du système de logging
#[derive(Debug, Clone)]
pub struct LoggingOptions {
    /// Niveau minimum (ERROR, WARN, INFO, DEBUG, TRACE)
    pub min_level: String,
    /// Activer la sortie console
    pub enable_console: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            min_level: "INFO".to_string(),
            enable_console: true,
        }
    }
}

impl LoggingOptions {
    /// Lit les options depuis la section `logger` de la configuration
    pub fn from_config(config: &Config) -> Self {
        Self {
            min_level: config.get_log_min_level(),
            enable_console: config.get_log_enable_console(),
        }
    }

    fn level(&self) -> Level {
        string_to_level(&self.min_level).unwrap_or(Level::INFO)
    }
}

/// Initialise le subscriber global
///
/// # Retourne
/// `false` si un subscriber global était déjà installé (cas des tests).
///
/// # Exemple
/// ```rust,no_run
/// use rokuserver::logs::{init_logging, LoggingOptions};
///
/// init_logging(&LoggingOptions {
///     min_level: "DEBUG".to_string(),
///     enable_console: true,
/// });
/// ```
pub fn init_logging(options: &LoggingOptions) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(options.level().as_str().to_lowercase()));

    let registry = tracing_subscriber::registry().with(filter);

    let installed = if options.enable_console {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_ansi(true),
            )
            .try_init()
            .is_ok()
    } else {
        registry.try_init().is_ok()
    };

    if installed && string_to_level(&options.min_level).is_none() {
        tracing::warn!(
            "Invalid log level '{}'. Must be one of: ERROR, WARN, INFO, DEBUG, TRACE",
            options.min_level
        );
    }

    installed
}

fn string_to_level(s: &str) -> Option<Level> {
    match s.trim().to_uppercase().as_str() {
        "ERROR" => Some(Level::ERROR),
        "WARN" => Some(Level::WARN),
        "INFO" => Some(Level::INFO),
        "DEBUG" => Some(Level::DEBUG),
        "TRACE" => Some(Level::TRACE),
        _ => None,
    }
}

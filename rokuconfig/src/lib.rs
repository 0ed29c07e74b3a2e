//! # RokuBridge Configuration Module
//!
//! This module provides configuration management for RokuBridge, including:
//! - Locating the configuration file (explicit path, local file, system file)
//! - Merging it with the embedded default configuration
//! - Environment variable overrides
//! - Typed getters for configuration values
//!
//! The file is a flat or nested YAML key/value document:
//!
//! ```yaml
//! apps: Netflix Hulu YouTube
//! mqtt_broker: 192.168.1.10:1883
//! host:
//!   http_port: 8060
//! ```
//!
//! Older INI files (`apps = Netflix Hulu YouTube`, optional `[host]`
//! sections) are read as well.
//!
//! ## Usage
//!
//! ```no_run
//! use rokuconfig::Config;
//!
//! let config = Config::load()?;
//! let apps = config.get_apps()?;
//! let port = config.get_http_port();
//! # Ok::<(), rokuconfig::ConfigError>(())
//! ```

use serde_yaml::{Mapping, Value};
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

// Configuration par défaut intégrée
const DEFAULT_CONFIG: &str = include_str!("roku_bridge.yaml");

/// Fichier de configuration local (répertoire courant)
pub const LOCAL_CONFIG_LOCATION: &str = "./roku_bridge.conf";

/// Fichier de configuration système
pub const SYSTEM_CONFIG_LOCATION: &str = "/etc/roku_bridge.conf";

const ENV_CONFIG_FILE: &str = "ROKU_BRIDGE_CONFIG";
const ENV_PREFIX: &str = "ROKU_BRIDGE__";

// Default values for configuration
const DEFAULT_HTTP_PORT: u16 = 8060;
const DEFAULT_NAMESPACE: &str = "Roku";
const DEFAULT_CLIENT_ID: &str = "roku-bridge";
const DEFAULT_SERIAL_NUMBER: &str = "RKBRIDGE0001";
const DEFAULT_MODEL_NAME: &str = "3930X";
const DEFAULT_FRIENDLY_NAME: &str = "Roku Bridge";
const DEFAULT_LOG_MIN_LEVEL: &str = "INFO";
const DEFAULT_LOG_ENABLE_CONSOLE: bool = true;

/// Erreurs de chargement ou de lecture de la configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Aucun fichier de configuration trouvé
    #[error("Config file is not accessible. Search locations: {local}, {system}")]
    NotFound { local: String, system: String },

    /// Fichier présent mais illisible
    #[error("Failed to read config file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    /// Fichier YAML invalide
    #[error("Invalid config file {path}: {source}")]
    Parse {
        path: String,
        source: serde_yaml::Error,
    },

    /// Fichier lisible mais dont le contenu n'est pas un ensemble clé/valeur
    #[error("Invalid config file {path}: {message}")]
    Format { path: String, message: String },

    /// Clé obligatoire absente ou vide
    #[error("Missing configuration key '{0}'")]
    MissingKey(String),

    /// Un nœud intermédiaire du chemin n'est pas une map
    #[error("Path {0} is not a mapping")]
    NotAMapping(String),
}

/// Configuration manager for RokuBridge
///
/// The configuration is read once at startup and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    path: PathBuf,
    data: Value,
}

impl Config {
    /// Loads the configuration from the first existing location.
    ///
    /// The file is searched in the following order:
    /// 1. The `ROKU_BRIDGE_CONFIG` environment variable
    /// 2. `./roku_bridge.conf`
    /// 3. `/etc/roku_bridge.conf`
    ///
    /// `ROKU_BRIDGE__*` environment variables are applied on top of the file.
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = env::var_os(ENV_CONFIG_FILE).map(PathBuf::from);
        let path = find_config_file(
            explicit,
            Path::new(LOCAL_CONFIG_LOCATION),
            Path::new(SYSTEM_CONFIG_LOCATION),
        )?;

        let mut config = Self::load_from_path(&path)?;
        apply_env_overrides(&mut config.data, env::vars());
        Ok(config)
    }

    /// Loads the configuration from an explicit file, without env overrides.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let source = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        info!(config_file = %path.display(), "Loaded config file");

        let data = parse_with_defaults(&path.display().to_string(), &source)?;

        Ok(Self {
            path: path.to_path_buf(),
            data,
        })
    }

    /// Chemin du fichier effectivement chargé
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a configuration value at the specified path
    ///
    /// # Arguments
    ///
    /// * `path` - Array of keys representing the path (e.g., `&["host", "http_port"]`)
    pub fn get_value(&self, path: &[&str]) -> Option<&Value> {
        let mut current = &self.data;
        for key in path {
            match current {
                Value::Mapping(map) => {
                    current = map.get(&Value::String(key.to_lowercase()))?;
                }
                _ => return None,
            }
        }
        Some(current)
    }

    fn get_string(&self, path: &[&str]) -> Option<String> {
        self.get_value(path)
            .and_then(scalar_to_string)
            .filter(|s| !s.trim().is_empty())
    }

    fn get_string_or(&self, path: &[&str], default: &str) -> String {
        self.get_string(path).unwrap_or_else(|| default.to_string())
    }

    /// Liste des applications, séparées par des espaces
    ///
    /// Une séquence YAML est acceptée et jointe avec des espaces.
    pub fn get_apps(&self) -> Result<String, ConfigError> {
        let apps = match self.get_value(&["apps"]) {
            Some(Value::Sequence(seq)) => seq
                .iter()
                .filter_map(scalar_to_string)
                .collect::<Vec<_>>()
                .join(" "),
            Some(other) => scalar_to_string(other).unwrap_or_default(),
            None => String::new(),
        };

        if apps.trim().is_empty() {
            return Err(ConfigError::MissingKey("apps".to_string()));
        }
        Ok(apps)
    }

    /// Adresse du broker MQTT (`host` ou `host:port`)
    pub fn get_mqtt_broker(&self) -> Result<String, ConfigError> {
        self.get_string(&["mqtt_broker"])
            .ok_or_else(|| ConfigError::MissingKey("mqtt_broker".to_string()))
    }

    /// Préfixe des topics publiés
    pub fn get_mqtt_namespace(&self) -> String {
        self.get_string_or(&["mqtt", "namespace"], DEFAULT_NAMESPACE)
    }

    pub fn get_mqtt_client_id(&self) -> String {
        self.get_string_or(&["mqtt", "client_id"], DEFAULT_CLIENT_ID)
    }

    /// Gets the HTTP port from configuration
    ///
    /// Returns the configured HTTP port, or the default port (8060) if not configured or invalid.
    pub fn get_http_port(&self) -> u16 {
        match self.get_value(&["host", "http_port"]) {
            Some(Value::Number(n)) => match n.as_u64().and_then(|p| u16::try_from(p).ok()) {
                Some(port) => port,
                None => {
                    warn!("Invalid HTTP port '{}', using default {}", n, DEFAULT_HTTP_PORT);
                    DEFAULT_HTTP_PORT
                }
            },
            Some(Value::String(s)) => s.trim().parse::<u16>().unwrap_or_else(|_| {
                warn!("Invalid HTTP port '{}', using default {}", s, DEFAULT_HTTP_PORT);
                DEFAULT_HTTP_PORT
            }),
            _ => DEFAULT_HTTP_PORT,
        }
    }

    /// Hôte annoncé explicitement, s'il est configuré
    ///
    /// Sans valeur, l'adresse est détectée au démarrage.
    pub fn get_base_url(&self) -> Option<String> {
        self.get_string(&["host", "base_url"])
    }

    pub fn get_serial_number(&self) -> String {
        self.get_string_or(&["device", "serial_number"], DEFAULT_SERIAL_NUMBER)
    }

    pub fn get_model_name(&self) -> String {
        self.get_string_or(&["device", "model_name"], DEFAULT_MODEL_NAME)
    }

    pub fn get_friendly_name(&self) -> String {
        self.get_string_or(&["device", "friendly_name"], DEFAULT_FRIENDLY_NAME)
    }

    /// Gets the UDN (Unique Device Name) of the emulated device
    ///
    /// Without an explicit `device.udn`, the UDN is derived from the serial
    /// number (UUID v5) so that it stays stable across restarts.
    pub fn get_device_udn(&self) -> String {
        match self.get_string(&["device", "udn"]) {
            Some(udn) => {
                let udn = udn.trim();
                udn.strip_prefix("uuid:").unwrap_or(udn).to_string()
            }
            None => Uuid::new_v5(&Uuid::NAMESPACE_OID, self.get_serial_number().as_bytes())
                .to_string(),
        }
    }

    /// Récupère le niveau de log minimum depuis la configuration
    pub fn get_log_min_level(&self) -> String {
        self.get_string_or(&["logger", "min_level"], DEFAULT_LOG_MIN_LEVEL)
    }

    pub fn get_log_enable_console(&self) -> bool {
        match self.get_value(&["logger", "enable_console"]) {
            Some(Value::Bool(b)) => *b,
            _ => DEFAULT_LOG_ENABLE_CONSOLE,
        }
    }
}

/// Détermine le fichier de configuration à utiliser
///
/// Un chemin explicite est prioritaire et doit exister ; sinon le fichier
/// local puis le fichier système sont essayés.
pub fn find_config_file(
    explicit: Option<PathBuf>,
    local: &Path,
    system: &Path,
) -> Result<PathBuf, ConfigError> {
    if let Some(path) = explicit {
        info!(env_var = ENV_CONFIG_FILE, path = %path.display(), "Trying to load config from env");
        if path.is_file() {
            return Ok(path);
        }
        warn!(path = %path.display(), "Config file from env does not exist");
    }

    [local, system]
        .into_iter()
        .find(|p| p.is_file())
        .map(Path::to_path_buf)
        .ok_or_else(|| ConfigError::NotFound {
            local: local.display().to_string(),
            system: system.display().to_string(),
        })
}

fn parse_with_defaults(path: &str, source: &str) -> Result<Value, ConfigError> {
    let parse_error = |source: serde_yaml::Error| ConfigError::Parse {
        path: path.to_string(),
        source,
    };
    let format_error = |message: String| ConfigError::Format {
        path: path.to_string(),
        message,
    };

    let mut default_value: Value = serde_yaml::from_str(DEFAULT_CONFIG).map_err(parse_error)?;
    let external_value: Value = if looks_like_ini(source) {
        parse_ini(source).map_err(format_error)?
    } else {
        serde_yaml::from_str(source).map_err(parse_error)?
    };

    match external_value {
        Value::Mapping(_) => merge_yaml(&mut default_value, &lower_keys_value(external_value)),
        // Un fichier vide se lit comme Null : seules les valeurs par défaut restent
        Value::Null => {}
        _ => {
            return Err(format_error(
                "expected key/value pairs at top level".to_string(),
            ));
        }
    }
    Ok(lower_keys_value(default_value))
}

/// Détecte l'ancien format INI (`key = value`, sections `[name]`)
///
/// Seule la première ligne significative est examinée : un `=` placé avant
/// tout `:` désigne une ligne INI.
fn looks_like_ini(source: &str) -> bool {
    source
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty() && !is_ini_comment(line) && *line != "---")
        .is_some_and(|line| {
            (line.starts_with('[') && line.ends_with(']'))
                || match (line.find('='), line.find(':')) {
                    (Some(eq), Some(colon)) => eq < colon,
                    (Some(_), None) => true,
                    _ => false,
                }
        })
}

fn is_ini_comment(line: &str) -> bool {
    line.starts_with('#') || line.starts_with(';')
}

/// Convertit un fichier INI en arbre YAML ; `[mqtt]` puis `namespace = x`
/// donne le chemin `mqtt.namespace`
fn parse_ini(source: &str) -> Result<Value, String> {
    let mut root = Value::Mapping(Mapping::new());
    let mut section: Option<String> = None;

    for (n, raw) in source.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || is_ini_comment(line) {
            continue;
        }

        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            section = Some(name.trim().to_lowercase());
            continue;
        }

        let (key, value) = line
            .split_once('=')
            .ok_or_else(|| format!("line {}: expected 'key = value'", n + 1))?;
        let key = key.trim().to_lowercase();
        if key.is_empty() {
            return Err(format!("line {}: empty key", n + 1));
        }

        let path: Vec<&str> = section
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(key.as_str()))
            .collect();
        set_value_internal(&mut root, &path, ini_scalar(value.trim()))
            .map_err(|e| format!("line {}: {}", n + 1, e))?;
    }

    Ok(root)
}

/// Les valeurs INI restent des scalaires (nombre, booléen ou chaîne)
fn ini_scalar(value: &str) -> Value {
    match convert_env_value(value) {
        scalar @ (Value::Bool(_) | Value::Number(_) | Value::String(_)) => scalar,
        _ => Value::String(value.to_string()),
    }
}

fn apply_env_overrides<I>(config: &mut Value, vars: I)
where
    I: IntoIterator<Item = (String, String)>,
{
    for (key, value) in vars {
        if let Some(stripped) = key.strip_prefix(ENV_PREFIX) {
            let key_path = stripped.split("__").collect::<Vec<_>>();
            if let Err(e) = set_value_internal(config, &key_path, convert_env_value(&value)) {
                warn!(env_var=%key, "Ignoring config override: {}", e);
            }
        }
    }
}

fn set_value_internal(data: &mut Value, path: &[&str], value: Value) -> Result<(), ConfigError> {
    if path.is_empty() {
        *data = value;
        return Ok(());
    }
    if let Value::Mapping(map) = data {
        let key_value = Value::String(path[0].to_lowercase());
        if path.len() == 1 {
            map.insert(key_value, value);
        } else {
            let entry = map
                .entry(key_value)
                .or_insert(Value::Mapping(Mapping::new()));
            set_value_internal(entry, &path[1..], value)?;
        }
        Ok(())
    } else {
        Err(ConfigError::NotAMapping(path.join(".")))
    }
}

fn convert_env_value(value: &str) -> Value {
    serde_yaml::from_str::<Value>(value).unwrap_or_else(|_| Value::String(value.to_string()))
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn lower_keys_value(value: Value) -> Value {
    match value {
        Value::Mapping(map) => {
            let mut new_map = Mapping::new();
            for (k, v) in map {
                let new_key = match k {
                    Value::String(s) => Value::String(s.to_lowercase()),
                    other => other,
                };
                new_map.insert(new_key, lower_keys_value(v));
            }
            Value::Mapping(new_map)
        }
        Value::Sequence(seq) => Value::Sequence(seq.into_iter().map(lower_keys_value).collect()),
        _ => value,
    }
}

/// Merges external YAML configuration into default configuration
///
/// - For mappings, keys from external are merged into default recursively
/// - For scalars and sequences, external values replace default values
fn merge_yaml(default: &mut Value, external: &Value) {
    match (default, external) {
        (Value::Mapping(dmap), Value::Mapping(emap)) => {
            for (k, v) in emap {
                match dmap.get_mut(k) {
                    Some(dv) => merge_yaml(dv, v),
                    None => {
                        dmap.insert(k.clone(), v.clone());
                    }
                }
            }
        }
        (d, e) => *d = e.clone(),
    }
}

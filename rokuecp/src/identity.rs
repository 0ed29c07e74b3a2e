use rokuconfig::Config;

/// Identité du device émulé, figée au démarrage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceIdentity {
    /// UUID du device, sans préfixe `uuid:`
    pub udn: String,
    pub serial_number: String,
    pub model_name: String,
    pub friendly_name: String,
    pub vendor_name: String,
    pub software_version: String,
    /// Adresse annoncée
    pub host: String,
    pub http_port: u16,
    pub power_mode: String,
}

impl DeviceIdentity {
    pub fn new(udn: impl Into<String>, host: impl Into<String>, http_port: u16) -> Self {
        Self {
            udn: udn.into(),
            serial_number: "RKBRIDGE0001".to_string(),
            model_name: "3930X".to_string(),
            friendly_name: "Roku Bridge".to_string(),
            vendor_name: "Roku".to_string(),
            software_version: env!("CARGO_PKG_VERSION").to_string(),
            host: host.into(),
            http_port,
            power_mode: "PowerOn".to_string(),
        }
    }

    /// Lit la section `device` et le port HTTP de la configuration
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration chargée
    /// * `host` - Adresse réseau retenue au démarrage
    pub fn from_config(config: &Config, host: impl Into<String>) -> Self {
        Self {
            serial_number: config.get_serial_number(),
            model_name: config.get_model_name(),
            friendly_name: config.get_friendly_name(),
            ..Self::new(config.get_device_udn(), host, config.get_http_port())
        }
    }

    /// URL de base annoncée par SSDP (`http://<host>:<port>/`)
    pub fn location(&self) -> String {
        format!("http://{}:{}/", self.host, self.http_port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_location() {
        let identity = DeviceIdentity::new("abcd", "192.168.1.20", 8060);
        assert_eq!(identity.location(), "http://192.168.1.20:8060/");
        assert_eq!(identity.power_mode, "PowerOn");
    }

    #[test]
    fn test_from_config() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "apps: Netflix\nmqtt_broker: localhost\nhost:\n  http_port: 9000\ndevice:\n  udn: uuid:1234\n  friendly_name: Salon"
        )
        .unwrap();

        let config = Config::load_from_path(file.path()).unwrap();
        let identity = DeviceIdentity::from_config(&config, "10.0.0.5");
        assert_eq!(identity.udn, "1234");
        assert_eq!(identity.friendly_name, "Salon");
        assert_eq!(identity.location(), "http://10.0.0.5:9000/");
    }
}

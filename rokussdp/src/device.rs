//! Représentation d'un device SSDP

/// Device SSDP avec ses métadonnées pour les annonces
#[derive(Debug, Clone)]
pub struct SsdpDevice {
    /// UUID du device (sans le préfixe "uuid:")
    pub uuid: String,

    /// Type du device (ex: "roku:ecp")
    pub device_type: String,

    /// URL de base annoncée (ex: "http://192.168.1.42:8060/")
    pub location: String,

    /// Identifiant du serveur (ex: "Linux/6.5 UPnP/1.0 RokuBridge/0.1.0")
    pub server: String,

    /// Types de notification (NT) annoncés : [uuid:xxx, device_type, ...]
    pub notification_types: Vec<String>,
}

impl SsdpDevice {
    /// Crée un nouveau device SSDP
    pub fn new(uuid: String, device_type: String, location: String, server: String) -> Self {
        let uuid = uuid.strip_prefix("uuid:").unwrap_or(&uuid).to_string();
        let notification_types = vec![format!("uuid:{}", uuid), device_type.clone()];

        Self {
            uuid,
            device_type,
            location,
            server,
            notification_types,
        }
    }

    /// Ajoute un type de notification
    pub fn add_notification_type(&mut self, nt: String) {
        if !self.notification_types.contains(&nt) {
            self.notification_types.push(nt);
        }
    }

    /// Retourne la liste des types de notification
    pub fn get_notification_types(&self) -> &[String] {
        &self.notification_types
    }

    /// USN associé à un type de notification
    pub fn usn(&self, nt: &str) -> String {
        if nt.starts_with("uuid:") {
            nt.to_string()
        } else {
            format!("uuid:{}::{}", self.uuid, nt)
        }
    }

    /// Types à annoncer en réponse à une recherche `st`
    pub fn matching_types(&self, st: &str) -> Vec<&str> {
        if st == "ssdp:all" {
            return self.notification_types.iter().map(String::as_str).collect();
        }
        self.notification_types
            .iter()
            .filter(|nt| nt.eq_ignore_ascii_case(st))
            .map(String::as_str)
            .collect()
    }
}

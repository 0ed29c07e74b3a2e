//! Documents XML servis par l'API ECP
//!
//! Sérialisés avec `quick_xml::se` : les champs `@x` deviennent des
//! attributs, `$text` le contenu texte de l'élément.

use serde::Serialize;

use crate::{AppRegistry, DeviceIdentity, EcpError};

/// `<app id="N">Nom</app>`
#[derive(Debug, Clone, Serialize)]
pub struct AppEntry {
    #[serde(rename = "@id")]
    pub id: i64,

    #[serde(rename = "$text")]
    pub name: String,
}

/// Racine de `GET /query/apps`
#[derive(Debug, Clone, Serialize)]
#[serde(rename = "apps")]
pub struct AppsDocument {
    #[serde(rename = "app")]
    pub apps: Vec<AppEntry>,
}

impl AppsDocument {
    pub fn from_registry(registry: &AppRegistry) -> Self {
        Self {
            apps: registry
                .list()
                .into_iter()
                .map(|app| AppEntry {
                    id: app.index as i64,
                    name: app.name,
                })
                .collect(),
        }
    }
}

/// Racine de `GET /query/active-app`
#[derive(Debug, Clone, Serialize)]
#[serde(rename = "active-app")]
pub struct ActiveAppDocument {
    pub app: AppEntry,
}

/// Racine de `GET /query/device-info`
#[derive(Debug, Clone, Serialize)]
#[serde(rename = "device-info", rename_all = "kebab-case")]
pub struct DeviceInfoDocument {
    pub udn: String,
    pub serial_number: String,
    pub device_id: String,
    pub vendor_name: String,
    pub model_name: String,
    pub model_number: String,
    pub friendly_device_name: String,
    pub software_version: String,
    pub network_type: String,
    pub power_mode: String,
    pub is_tv: bool,
    pub supports_find_remote: bool,
}

impl From<&DeviceIdentity> for DeviceInfoDocument {
    fn from(identity: &DeviceIdentity) -> Self {
        Self {
            udn: identity.udn.clone(),
            serial_number: identity.serial_number.clone(),
            device_id: identity.serial_number.clone(),
            vendor_name: identity.vendor_name.clone(),
            model_name: identity.model_name.clone(),
            model_number: identity.model_name.clone(),
            friendly_device_name: identity.friendly_name.clone(),
            software_version: identity.software_version.clone(),
            network_type: "ethernet".to_string(),
            power_mode: identity.power_mode.clone(),
            is_tv: false,
            supports_find_remote: false,
        }
    }
}

/// Enveloppe d'erreur
#[derive(Debug, Clone, Serialize)]
#[serde(rename = "error")]
pub struct ErrorDocument {
    pub status: u16,
    pub message: String,
}

pub fn to_xml<T: Serialize>(document: &T) -> Result<String, EcpError> {
    quick_xml::se::to_string(document)
        .map_err(|e| EcpError::Internal(format!("Failed to serialize XML: {}", e)))
}

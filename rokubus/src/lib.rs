//! # rokubus - Client du bus de commandes
//!
//! Les touches reçues par l'émulateur ECP sont republiées sur un bus
//! pub/sub local (MQTT). Cette crate fournit :
//!
//! - [`CommandBus`] : contrat de publication `(topic, payload)`, best effort
//! - [`CommandEvent`] : une commande destinée à l'application active
//! - [`MqttBus`] : implémentation MQTT basée sur `rumqttc`
//!
//! ## Exemple
//!
//! ```rust,no_run
//! use rokubus::{CommandBus, CommandEvent, MqttBus};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), rokubus::BusError> {
//! let bus = MqttBus::new("192.168.1.10", "roku-bridge")?;
//! bus.on_connect(|| println!("connected"));
//! bus.start();
//!
//! let event = CommandEvent::new("YouTube", "Select");
//! event.publish_on(&bus, "Roku");
//! # Ok(())
//! # }
//! ```

mod error;
mod mqtt;

pub use error::BusError;
pub use mqtt::{BrokerAddress, DEFAULT_MQTT_PORT, MqttBus};

/// Publication best effort sur un bus pub/sub
///
/// Une implémentation ne doit jamais bloquer l'appelant sur la livraison
/// et ne remonte aucune erreur : un bus indisponible ignore le message.
pub trait CommandBus: Send + Sync {
    fn publish(&self, topic: &str, payload: &str);
}

/// Commande destinée à une application
///
/// Valeur éphémère construite pour chaque touche pressée.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEvent {
    pub app_name: String,
    pub command: String,
}

impl CommandEvent {
    pub fn new(app_name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            app_name: app_name.into(),
            command: command.into(),
        }
    }

    /// Topic `<namespace>/<app>`
    pub fn topic(&self, namespace: &str) -> String {
        format!("{}/{}", namespace, self.app_name)
    }

    /// Publie la commande sur le bus, le payload étant le nom de la touche
    pub fn publish_on(&self, bus: &dyn CommandBus, namespace: &str) {
        bus.publish(&self.topic(namespace), &self.command);
    }
}

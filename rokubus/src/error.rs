//! Erreurs du client de bus.

use thiserror::Error;

/// Erreurs de configuration du bus
///
/// Les erreurs de transport ne sont jamais remontées : elles sont
/// journalisées par la boucle d'événements.
#[derive(Error, Debug)]
pub enum BusError {
    /// Adresse de broker invalide
    #[error("Invalid MQTT broker address '{0}'")]
    InvalidBroker(String),
}

//! Erreurs du serveur SSDP.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SsdpError {
    /// Socket de découverte impossible à ouvrir
    #[error("SSDP socket error: {0}")]
    Io(#[from] std::io::Error),

    /// `start()` appelé sur un serveur déjà démarré
    #[error("SSDP server is already running")]
    AlreadyRunning,
}

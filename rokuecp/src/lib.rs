//! # rokuecp - Émulation de l'External Control Protocol Roku
//!
//! Surface HTTP pilotée par les applications de télécommande :
//!
//! - [`AppRegistry`] : applications configurées, plus l'entrée factice 999
//! - [`SelectionState`] : index de l'application active
//! - [`DeviceIdentity`] : identité annoncée (`/query/device-info`, SSDP)
//! - [`ecp_router`] : router Axum des routes `/query/*`, `/keypress/*`,
//!   `/launch/*`...
//!
//! Chaque touche pressée est republiée sur un [`rokubus::CommandBus`].
//!
//! ## Exemple
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use rokubus::MqttBus;
//! use rokuecp::{AppRegistry, DeviceIdentity, EcpContext, ecp_router};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = AppRegistry::from_config_str("Netflix Hulu YouTube")?;
//! let bus = Arc::new(MqttBus::new("localhost", "roku-bridge")?);
//! let identity = DeviceIdentity::new("2f9c7d0e-0000-5000-8000-000000000000", "192.168.1.20", 8060);
//!
//! let router = ecp_router(EcpContext::new(registry, bus, identity, "Roku"));
//! # Ok(())
//! # }
//! ```

mod context;
mod error;
pub mod handlers;
mod identity;
mod registry;
mod router;
mod selection;
pub mod xml;

pub use context::EcpContext;
pub use error::{EcpError, error_envelope};
pub use identity::DeviceIdentity;
pub use registry::{AppRegistry, Application, SENTINEL_APP_ID, SENTINEL_APP_NAME};
pub use router::ecp_router;
pub use selection::{NO_APP_NAME, SelectionState};

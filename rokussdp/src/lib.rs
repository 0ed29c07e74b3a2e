//! # Module SSDP - Simple Service Discovery Protocol
//!
//! Annonce du device émulé sur le réseau local, pour que les applications
//! de télécommande le découvrent sans configuration.
//!
//! ## Fonctionnalités
//!
//! - ✅ Envoi de NOTIFY alive/byebye en multicast
//! - ✅ Réponse aux M-SEARCH en unicast
//! - ✅ Annonces périodiques automatiques
//! - ✅ Arrêt propre avec byebye
//! - ✅ Hooks synchrones sur chaque émission
//!
//! ## Architecture
//!
//! - [`SsdpServer`] : Serveur SSDP principal gérant les devices
//! - [`SsdpDevice`] : Représentation d'un device pour SSDP
//!
//! ## Constants SSDP
//!
//! - **Multicast Address**: 239.255.255.250:1900
//! - **Max-Age**: 1800 secondes (30 minutes)
//! - **Announcement Period**: 900 secondes (15 minutes, Max-Age/2)

mod device;
mod error;
pub mod message;
mod server;

pub use device::SsdpDevice;
pub use error::SsdpError;
pub use server::{SsdpEvent, SsdpOptions, SsdpServer, SsdpState};

use std::net::Ipv4Addr;

/// Adresse multicast SSDP
pub const SSDP_MULTICAST_ADDR: Ipv4Addr = Ipv4Addr::new(239, 255, 255, 250);

/// Port SSDP
pub const SSDP_PORT: u16 = 1900;

/// Durée de validité des annonces (en secondes)
pub const MAX_AGE: u32 = 1800;

/// Cible de recherche des devices Roku ECP
pub const ROKU_ECP_ST: &str = "roku:ecp";

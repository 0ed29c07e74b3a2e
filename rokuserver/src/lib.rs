//! # rokuserver - Serveur web haut niveau basé sur Axum
//!
//! Cette crate fournit une abstraction simple pour héberger le protocole ECP
//! de RokuBridge avec Axum.
//!
//! ## Fonctionnalités
//!
//! - 🚀 **API de haut niveau** : construction du serveur avec [`ServerBuilder`]
//! - 🔀 **Composition de routers** : montage de sous-routers avec `add_router()`
//! - 📡 **Traçage HTTP** : chaque requête est tracée via `tower-http`
//! - ⚡ **Arrêt gracieux** : arrêt propre sur Ctrl+C ou sur demande
//!
//! ## Architecture
//!
//! - [`server`] : Implémentation du serveur principal et du builder
//! - [`logs`] : Initialisation du système de logs `tracing`
//!
//! ## Exemple d'utilisation
//!
//! ```rust,no_run
//! use axum::{Router, routing::get};
//! use rokuserver::{ServerBuilder, logs::{LoggingOptions, init_logging}};
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     init_logging(&LoggingOptions::default());
//!
//!     let mut server = ServerBuilder::new("MyServer", "192.168.1.42", 8060).build();
//!     server
//!         .add_router("/", Router::new().route("/", get(|| async { "hello" })))
//!         .await;
//!
//!     server.start().await?;
//!     server.wait().await;
//!     Ok(())
//! }
//! ```

pub mod logs;
pub mod server;

pub use server::{Server, ServerBuilder};

//! # Module Server - API de haut niveau pour Axum
//!
//! Ce module cache la mise en place du listener TCP, du traçage des requêtes
//! et de l'arrêt gracieux.
//!
//! ## Fonctionnalités
//!
//! - 🔀 **Sous-routers** : montez des routers Axum avec `add_router()`
//! - 📡 **Traçage** : `TraceLayer` ajouté automatiquement au démarrage
//! - ⚡ **Gestion gracieuse** : arrêt propre sur Ctrl+C ou via `shutdown()`

use axum::Router;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::{
    net::TcpListener,
    signal,
    sync::{Notify, RwLock},
    task::JoinHandle,
};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

/// Serveur principal
pub struct Server {
    name: String,
    base_url: String,
    http_port: u16,
    router: Arc<RwLock<Router>>,
    join_handle: Option<JoinHandle<()>>,
    local_addr: Option<SocketAddr>,
    stop: Arc<Notify>,
}

impl Server {
    /// Crée une nouvelle instance de serveur
    ///
    /// # Arguments
    ///
    /// * `name` - Nom du serveur (pour les logs)
    /// * `base_url` - Hôte annoncé (ex: "192.168.1.42")
    /// * `http_port` - Port HTTP à écouter (0 pour un port éphémère)
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            http_port,
            router: Arc::new(RwLock::new(Router::new())),
            join_handle: None,
            local_addr: None,
            stop: Arc::new(Notify::new()),
        }
    }

    /// Ajoute un sous-router au serveur
    ///
    /// - Si `path` est "/", merge directement au router principal
    /// - Sinon, nest le router sous le chemin donné
    pub async fn add_router(&mut self, path: &str, sub_router: Router) {
        let mut r = self.router.write().await;

        *r = if path == "/" {
            std::mem::take(&mut *r).merge(sub_router)
        } else {
            let normalized = format!("/{}", path.trim_start_matches('/'));
            std::mem::take(&mut *r).nest(&normalized, sub_router)
        };
    }

    /// Démarre le serveur HTTP
    ///
    /// Le port est réservé avant le retour : une erreur de bind remonte à
    /// l'appelant. Le service tourne ensuite en tâche de fond jusqu'à Ctrl+C
    /// ou un appel à [`Server::shutdown`].
    ///
    /// # Returns
    ///
    /// L'adresse effectivement écoutée.
    pub async fn start(&mut self) -> std::io::Result<SocketAddr> {
        let addr = SocketAddr::from(([0, 0, 0, 0], self.http_port));
        let listener = TcpListener::bind(addr).await?;
        let local_addr = listener.local_addr()?;
        self.local_addr = Some(local_addr);

        info!(
            "Server {} running at http://{}:{}/",
            self.name,
            self.base_url,
            local_addr.port()
        );

        let router = self
            .router
            .read()
            .await
            .clone()
            .layer(TraceLayer::new_for_http());
        let stop = self.stop.clone();
        let name = self.name.clone();

        self.join_handle = Some(tokio::spawn(async move {
            let shutdown = async move {
                tokio::select! {
                    res = signal::ctrl_c() => {
                        if let Err(e) = res {
                            error!("❌ Failed to listen for Ctrl+C: {}", e);
                            // Sans signal disponible, seul shutdown() peut arrêter le serveur
                            stop.notified().await;
                        } else {
                            info!("Ctrl+C reçu, arrêt gracieux");
                        }
                    }
                    _ = stop.notified() => {
                        info!("Arrêt demandé, arrêt gracieux");
                    }
                }
            };

            if let Err(e) = axum::serve(listener, router.into_make_service())
                .with_graceful_shutdown(shutdown)
                .await
            {
                error!("❌ Server {} stopped with error: {}", name, e);
            }
        }));

        Ok(local_addr)
    }

    /// Demande l'arrêt gracieux du serveur
    pub fn shutdown(&self) {
        self.stop.notify_one();
    }

    /// Attend la fin du serveur
    pub async fn wait(&mut self) {
        if let Some(h) = self.join_handle.take() {
            let _ = h.await;
        }
    }

    /// Adresse écoutée, disponible après `start()`
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr
    }
}

/// Builder pattern
pub struct ServerBuilder {
    name: String,
    base_url: String,
    http_port: u16,
}

impl ServerBuilder {
    /// Crée un nouveau builder
    ///
    /// # Arguments
    ///
    /// * `name` - Nom du serveur
    /// * `base_url` - Hôte annoncé
    /// * `http_port` - Port HTTP
    pub fn new(name: impl Into<String>, base_url: impl Into<String>, http_port: u16) -> Self {
        Self {
            name: name.into(),
            base_url: base_url.into(),
            http_port,
        }
    }

    /// Construit le serveur
    pub fn build(self) -> Server {
        Server::new(self.name, self.base_url, self.http_port)
    }
}

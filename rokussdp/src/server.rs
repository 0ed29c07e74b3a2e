//! Serveur SSDP

use super::message::{notify_alive, notify_byebye, parse_msearch, search_response};
use super::{MAX_AGE, SSDP_MULTICAST_ADDR, SSDP_PORT, SsdpDevice, SsdpError};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TryRecvError};
use parking_lot::RwLock;
use socket2::{Domain, Protocol, Socket, Type};
use std::collections::HashMap;
use std::io::ErrorKind;
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;
use tracing::{debug, info, warn};

const READ_TIMEOUT: Duration = Duration::from_millis(250);

/// Événement émis à chaque message SSDP envoyé
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SsdpEvent {
    /// NOTIFY ssdp:alive envoyé
    Alive { usn: String, nt: String },
    /// Réponse unicast à un M-SEARCH
    SearchResponse {
        usn: String,
        st: String,
        to: SocketAddr,
    },
    /// NOTIFY ssdp:byebye envoyé
    ByeBye { usn: String, nt: String },
}

/// État du serveur
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SsdpState {
    Stopped,
    Running,
}

/// Options réseau du serveur SSDP
#[derive(Debug, Clone)]
pub struct SsdpOptions {
    /// Adresse d'écoute des M-SEARCH
    pub bind_addr: SocketAddr,
    /// Destination des NOTIFY (groupe multicast en production)
    pub announce_addr: SocketAddr,
    /// Période des annonces alive
    pub announce_interval: Duration,
    /// Rejoindre le groupe multicast SSDP
    pub join_multicast: bool,
}

impl Default for SsdpOptions {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::V4(SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, SSDP_PORT)),
            announce_addr: SocketAddr::V4(SocketAddrV4::new(SSDP_MULTICAST_ADDR, SSDP_PORT)),
            announce_interval: Duration::from_secs((MAX_AGE / 2) as u64),
            join_multicast: true,
        }
    }
}

type EventHandler = Arc<dyn Fn(&SsdpEvent) + Send + Sync>;

/// Données partagées avec les threads d'annonce et d'écoute
#[derive(Default)]
struct Shared {
    /// Devices enregistrés (UUID -> Device)
    devices: RwLock<HashMap<String, SsdpDevice>>,
    handlers: RwLock<Vec<EventHandler>>,
}

impl Shared {
    fn emit(&self, event: SsdpEvent) {
        let handlers: Vec<EventHandler> = self.handlers.read().clone();
        for handler in handlers {
            handler(&event);
        }
    }

    fn send_alive(&self, socket: &UdpSocket, target: SocketAddr, device: &SsdpDevice, nt: &str) {
        let usn = device.usn(nt);
        match socket.send_to(notify_alive(device, nt).as_bytes(), target) {
            Ok(_) => {
                debug!("✅ NOTIFY alive: {} (NT={})", usn, nt);
                self.emit(SsdpEvent::Alive {
                    usn,
                    nt: nt.to_string(),
                });
            }
            Err(e) => warn!("❌ Failed to send NOTIFY alive for {}: {}", usn, e),
        }
    }

    fn send_byebye(&self, socket: &UdpSocket, target: SocketAddr, device: &SsdpDevice, nt: &str) {
        let usn = device.usn(nt);
        match socket.send_to(notify_byebye(device, nt).as_bytes(), target) {
            Ok(_) => {
                info!("👋 NOTIFY byebye: {} (NT={})", usn, nt);
                self.emit(SsdpEvent::ByeBye {
                    usn,
                    nt: nt.to_string(),
                });
            }
            Err(e) => warn!("❌ Failed to send NOTIFY byebye for {}: {}", usn, e),
        }
    }

    fn announce_all(&self, socket: &UdpSocket, target: SocketAddr) {
        let devices = self.devices.read().clone();
        for device in devices.values() {
            for nt in device.get_notification_types() {
                self.send_alive(socket, target, device, nt);
            }
        }
    }

    fn withdraw_all(&self, socket: &UdpSocket, target: SocketAddr) {
        let devices = self.devices.read().clone();
        for device in devices.values() {
            for nt in device.get_notification_types() {
                self.send_byebye(socket, target, device, nt);
            }
        }
    }

    /// Répond à un M-SEARCH
    fn handle_msearch(&self, socket: &UdpSocket, src: SocketAddr, st: &str) {
        let devices = self.devices.read().clone();
        for device in devices.values() {
            for nt in device.matching_types(st) {
                let usn = device.usn(nt);
                match socket.send_to(search_response(device, nt).as_bytes(), src) {
                    Ok(_) => {
                        info!("📡 M-SEARCH response sent to {} with ST={}", src, nt);
                        self.emit(SsdpEvent::SearchResponse {
                            usn,
                            st: nt.to_string(),
                            to: src,
                        });
                    }
                    Err(e) => warn!("❌ Failed to send M-SEARCH response to {}: {}", src, e),
                }
            }
        }
    }
}

/// Ressources actives pendant l'état `Running`
struct Running {
    socket: Arc<UdpSocket>,
    shutdown: Sender<()>,
    threads: Vec<JoinHandle<()>>,
}

/// Serveur SSDP gérant les annonces et découvertes
pub struct SsdpServer {
    options: SsdpOptions,
    shared: Arc<Shared>,
    running: Option<Running>,
}

impl SsdpServer {
    /// Crée un nouveau serveur SSDP sur le port standard
    pub fn new() -> Self {
        Self::with_options(SsdpOptions::default())
    }

    pub fn with_options(options: SsdpOptions) -> Self {
        Self {
            options,
            shared: Arc::new(Shared::default()),
            running: None,
        }
    }

    pub fn state(&self) -> SsdpState {
        if self.running.is_some() {
            SsdpState::Running
        } else {
            SsdpState::Stopped
        }
    }

    /// Adresse locale du socket, disponible quand le serveur tourne
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.running
            .as_ref()
            .and_then(|r| r.socket.local_addr().ok())
    }

    /// Enregistre un hook appelé de façon synchrone pour chaque message émis
    pub fn on_event<F>(&self, handler: F)
    where
        F: Fn(&SsdpEvent) + Send + Sync + 'static,
    {
        self.shared.handlers.write().push(Arc::new(handler));
    }

    /// Démarre le serveur SSDP
    ///
    /// Ouvre le socket, envoie un alive initial pour chaque type enregistré
    /// puis lance les threads d'annonce périodique et d'écoute M-SEARCH.
    pub fn start(&mut self) -> Result<(), SsdpError> {
        if self.running.is_some() {
            return Err(SsdpError::AlreadyRunning);
        }

        let socket = Arc::new(self.open_socket()?);
        info!(
            "✅ SSDP server started on {}",
            socket.local_addr().unwrap_or(self.options.bind_addr)
        );

        self.shared.announce_all(&socket, self.options.announce_addr);

        let (shutdown, shutdown_rx) = crossbeam_channel::bounded::<()>(0);
        let threads = vec![
            self.start_periodic_announcements(socket.clone(), shutdown_rx.clone())?,
            self.start_msearch_listener(socket.clone(), shutdown_rx)?,
        ];

        self.running = Some(Running {
            socket,
            shutdown,
            threads,
        });
        Ok(())
    }

    /// Arrête le serveur : threads arrêtés, puis byebye pour tous les devices
    ///
    /// Sans effet si le serveur est déjà arrêté.
    pub fn stop(&mut self) {
        let Some(running) = self.running.take() else {
            return;
        };

        info!("✅ Shutting down SSDP server, sending byebye for all devices");

        // La fermeture du canal réveille les deux threads
        drop(running.shutdown);
        for thread in running.threads {
            if thread.join().is_err() {
                warn!("❌ SSDP thread panicked");
            }
        }

        self.shared
            .withdraw_all(&running.socket, self.options.announce_addr);
    }

    /// Ajoute un device et envoie un alive initial si le serveur tourne
    pub fn add_device(&self, device: SsdpDevice) {
        self.shared
            .devices
            .write()
            .insert(device.uuid.clone(), device.clone());

        if let Some(running) = &self.running {
            for nt in device.get_notification_types() {
                self.shared
                    .send_alive(&running.socket, self.options.announce_addr, &device, nt);
            }
        }
    }

    /// Supprime un device et envoie un byebye si le serveur tourne
    pub fn remove_device(&self, uuid: &str) {
        let removed = self.shared.devices.write().remove(uuid);

        if let (Some(device), Some(running)) = (removed, &self.running) {
            for nt in device.get_notification_types() {
                self.shared
                    .send_byebye(&running.socket, self.options.announce_addr, &device, nt);
            }
        }
    }

    fn open_socket(&self) -> std::io::Result<UdpSocket> {
        let socket2 = Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP))?;
        socket2.set_reuse_address(true)?;
        socket2.bind(&self.options.bind_addr.into())?;

        let socket: UdpSocket = socket2.into();
        socket.set_read_timeout(Some(READ_TIMEOUT))?;

        if self.options.join_multicast {
            // Rejoindre le groupe multicast
            match socket.join_multicast_v4(&SSDP_MULTICAST_ADDR, &Ipv4Addr::UNSPECIFIED) {
                Ok(()) => debug!("SSDP: joined {}", SSDP_MULTICAST_ADDR),
                Err(e) => warn!("SSDP: failed to join {}: {}", SSDP_MULTICAST_ADDR, e),
            }
            if let Err(e) = socket.set_multicast_loop_v4(false) {
                warn!("SSDP: failed to disable multicast loop: {}", e);
            }
        }

        Ok(socket)
    }

    /// Démarre les annonces périodiques
    fn start_periodic_announcements(
        &self,
        socket: Arc<UdpSocket>,
        shutdown: Receiver<()>,
    ) -> std::io::Result<JoinHandle<()>> {
        let shared = Arc::clone(&self.shared);
        let period = self.options.announce_interval;
        let target = self.options.announce_addr;

        std::thread::Builder::new()
            .name("ssdp-announce".to_string())
            .spawn(move || {
                loop {
                    match shutdown.recv_timeout(period) {
                        Err(RecvTimeoutError::Timeout) => shared.announce_all(&socket, target),
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
            })
    }

    /// Démarre l'écoute des M-SEARCH
    fn start_msearch_listener(
        &self,
        socket: Arc<UdpSocket>,
        shutdown: Receiver<()>,
    ) -> std::io::Result<JoinHandle<()>> {
        let shared = Arc::clone(&self.shared);

        std::thread::Builder::new()
            .name("ssdp-listener".to_string())
            .spawn(move || {
                let mut buf = [0u8; 8192];
                loop {
                    if !matches!(shutdown.try_recv(), Err(TryRecvError::Empty)) {
                        break;
                    }

                    match socket.recv_from(&mut buf) {
                        Ok((n, src)) => {
                            let data = String::from_utf8_lossy(&buf[..n]);
                            if let Some(st) = parse_msearch(&data) {
                                debug!("M-SEARCH received from {} with ST={}", src, st);
                                shared.handle_msearch(&socket, src, st);
                            }
                        }
                        Err(e) => {
                            if let Some(pause) = read_error_pause(e.kind()) {
                                warn!("❌ SSDP read error: {}", e);
                                std::thread::sleep(pause);
                            }
                        }
                    }
                }
            })
    }
}

/// Pause après une erreur de lecture, `None` pour un simple délai expiré
fn read_error_pause(kind: ErrorKind) -> Option<Duration> {
    match kind {
        ErrorKind::WouldBlock | ErrorKind::TimedOut => None,
        _ => Some(READ_TIMEOUT),
    }
}

impl Default for SsdpServer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for SsdpServer {
    fn drop(&mut self) {
        self.stop();
    }
}

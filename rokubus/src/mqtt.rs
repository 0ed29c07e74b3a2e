//! Client MQTT du bus de commandes.
//!
//! La connexion est établie une seule fois ; `rumqttc` se reconnecte de
//! lui-même à chaque itération de la boucle d'événements après une erreur.
//! Tant que la connexion n'est pas établie, les publications sont ignorées.

use crate::{BusError, CommandBus};
use parking_lot::{Mutex, RwLock};
use rumqttc::{AsyncClient, ConnectReturnCode, Event, EventLoop, MqttOptions, Packet, QoS};
use std::fmt;
use std::net::Ipv6Addr;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Port MQTT par défaut
pub const DEFAULT_MQTT_PORT: u16 = 1883;

const KEEP_ALIVE: Duration = Duration::from_secs(30);
const RECONNECT_DELAY: Duration = Duration::from_secs(2);
const REQUEST_CAPACITY: usize = 64;

type ConnectHandler = Arc<dyn Fn() + Send + Sync>;

/// Adresse d'un broker MQTT
///
/// Formes acceptées : `host`, `host:port`, `mqtt://host[:port]`.
/// Une adresse IPv6 s'écrit `[::1]:1883`, ou nue (`::1`) sans port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrokerAddress {
    pub host: String,
    pub port: u16,
}

impl FromStr for BrokerAddress {
    type Err = BusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BusError::InvalidBroker(s.to_string());

        let trimmed = s.trim();
        let without_scheme = trimmed
            .strip_prefix("mqtt://")
            .or_else(|| trimmed.strip_prefix("tcp://"))
            .unwrap_or(trimmed)
            .trim_end_matches('/');

        let parse_port = |port: &str| port.parse::<u16>().map_err(|_| invalid());

        let (host, port) = if let Some(rest) = without_scheme.strip_prefix('[') {
            let (host, after) = rest.split_once(']').ok_or_else(invalid)?;
            if host.parse::<Ipv6Addr>().is_err() {
                return Err(invalid());
            }
            let port = match after {
                "" => DEFAULT_MQTT_PORT,
                _ => parse_port(after.strip_prefix(':').ok_or_else(invalid)?)?,
            };
            (host, port)
        } else if without_scheme.matches(':').count() > 1 {
            if without_scheme.parse::<Ipv6Addr>().is_err() {
                return Err(invalid());
            }
            (without_scheme, DEFAULT_MQTT_PORT)
        } else {
            match without_scheme.rsplit_once(':') {
                Some((host, port)) => (host, parse_port(port)?),
                None => (without_scheme, DEFAULT_MQTT_PORT),
            }
        };

        if host.is_empty() || host.contains('/') {
            return Err(invalid());
        }

        Ok(Self {
            host: host.to_string(),
            port,
        })
    }
}

impl fmt::Display for BrokerAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.host.contains(':') {
            write!(f, "[{}]:{}", self.host, self.port)
        } else {
            write!(f, "{}:{}", self.host, self.port)
        }
    }
}

/// Bus de commandes MQTT
///
/// Les hooks enregistrés avec [`MqttBus::on_connect`] sont appelés de façon
/// synchrone depuis la boucle d'événements à chaque connexion réussie.
pub struct MqttBus {
    broker: BrokerAddress,
    client: AsyncClient,
    event_loop: Mutex<Option<EventLoop>>,
    task: Mutex<Option<JoinHandle<()>>>,
    connected: Arc<AtomicBool>,
    handlers: Arc<RwLock<Vec<ConnectHandler>>>,
}

impl MqttBus {
    /// Prépare le client sans ouvrir de connexion
    ///
    /// # Arguments
    ///
    /// * `broker` - Adresse du broker (voir [`BrokerAddress`])
    /// * `client_id` - Identifiant du client MQTT
    pub fn new(broker: &str, client_id: &str) -> Result<Self, BusError> {
        let broker: BrokerAddress = broker.parse()?;

        let mut options = MqttOptions::new(client_id, broker.host.clone(), broker.port);
        options.set_keep_alive(KEEP_ALIVE);

        let (client, event_loop) = AsyncClient::new(options, REQUEST_CAPACITY);

        Ok(Self {
            broker,
            client,
            event_loop: Mutex::new(Some(event_loop)),
            task: Mutex::new(None),
            connected: Arc::new(AtomicBool::new(false)),
            handlers: Arc::new(RwLock::new(Vec::new())),
        })
    }

    /// Enregistre un hook appelé à chaque connexion au broker
    pub fn on_connect<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.handlers.write().push(Arc::new(handler));
    }

    /// Lance la boucle d'événements MQTT en tâche de fond
    ///
    /// Doit être appelé depuis un runtime tokio. Les appels suivants sont sans effet.
    pub fn start(&self) {
        let Some(event_loop) = self.event_loop.lock().take() else {
            return;
        };

        info!("📡 Connecting to MQTT broker {}", self.broker);
        let handle = tokio::spawn(drive(
            event_loop,
            self.broker.clone(),
            self.connected.clone(),
            self.handlers.clone(),
        ));
        *self.task.lock() = Some(handle);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

impl CommandBus for MqttBus {
    fn publish(&self, topic: &str, payload: &str) {
        if !self.is_connected() {
            debug!("MQTT not connected, dropping {} {}", topic, payload);
            return;
        }

        match self
            .client
            .try_publish(topic, QoS::AtMostOnce, false, payload.as_bytes().to_vec())
        {
            Ok(()) => debug!("📤 MQTT publish {} {}", topic, payload),
            Err(e) => warn!("❌ Failed to publish {} on MQTT: {}", topic, e),
        }
    }
}

impl Drop for MqttBus {
    fn drop(&mut self) {
        if let Some(task) = self.task.lock().take() {
            task.abort();
        }
    }
}

async fn drive(
    mut event_loop: EventLoop,
    broker: BrokerAddress,
    connected: Arc<AtomicBool>,
    handlers: Arc<RwLock<Vec<ConnectHandler>>>,
) {
    loop {
        match event_loop.poll().await {
            Ok(Event::Incoming(Packet::ConnAck(ack))) => {
                if ack.code == ConnectReturnCode::Success {
                    connected.store(true, Ordering::SeqCst);
                    info!("✅ MQTT connected to {}", broker);
                    // Copie pour ne pas garder le verrou pendant les hooks
                    let hooks: Vec<ConnectHandler> = handlers.read().clone();
                    for hook in hooks {
                        hook();
                    }
                } else {
                    warn!("❌ MQTT broker {} refused connection: {:?}", broker, ack.code);
                }
            }
            Ok(Event::Incoming(Packet::Disconnect)) => {
                connected.store(false, Ordering::SeqCst);
                warn!("MQTT broker {} sent disconnect", broker);
            }
            Ok(_) => {}
            Err(e) => {
                if connected.swap(false, Ordering::SeqCst) {
                    warn!("❌ MQTT connection to {} lost: {}", broker, e);
                } else {
                    debug!("MQTT broker {} unavailable: {}", broker, e);
                }
                tokio::time::sleep(RECONNECT_DELAY).await;
            }
        }
    }
}

use anyhow::Context;
use rokubus::MqttBus;
use rokuconfig::Config;
use rokuecp::{AppRegistry, DeviceIdentity, EcpContext, ecp_router};
use rokuserver::ServerBuilder;
use rokuserver::logs::{LoggingOptions, init_logging};
use rokussdp::{ROKU_ECP_ST, SsdpDevice, SsdpEvent, SsdpServer};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::{debug, error, info};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("❌ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    // ========== PHASE 1 : Configuration ==========
    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            init_logging(&LoggingOptions::default());
            return Err(e).context("Config file is not accessible");
        }
    };
    init_logging(&LoggingOptions::from_config(&config));
    info!("📄 Configuration loaded from {}", config.path().display());

    let registry = AppRegistry::from_config_str(&config.get_apps()?)?;
    info!("Defined apps: {}", registry.names().join(" "));

    let host = match config.get_base_url() {
        Some(host) => host,
        None => rokuutils::local_network_ip()
            .context("No non-loopback network address available")?
            .to_string(),
    };
    for (iface, ips) in rokuutils::list_all_ips() {
        debug!("Interface {}: {:?}", iface, ips);
    }

    let identity = DeviceIdentity::from_config(&config, host);
    let namespace = config.get_mqtt_namespace();

    // ========== PHASE 2 : Bus de commandes ==========
    let bus = Arc::new(
        MqttBus::new(&config.get_mqtt_broker()?, &config.get_mqtt_client_id())
            .context("Invalid MQTT broker address")?,
    );
    bus.on_connect(|| info!("MQTT connected"));
    bus.start();

    // ========== PHASE 3 : Serveur HTTP ECP ==========
    let location = identity.location();
    let udn = identity.udn.clone();

    let mut server =
        ServerBuilder::new("RokuBridge", identity.host.clone(), identity.http_port).build();
    server
        .add_router("/", ecp_router(EcpContext::new(registry, bus, identity, namespace)))
        .await;

    info!("🌐 Starting HTTP server...");
    server
        .start()
        .await
        .context("Failed to bind the HTTP port")?;

    // ========== PHASE 4 : Découverte SSDP ==========
    let server_header = format!(
        "{} UPnP/1.0 RokuBridge/{}",
        rokuutils::get_os_string(),
        env!("CARGO_PKG_VERSION")
    );

    let mut ssdp = SsdpServer::new();
    ssdp.add_device(SsdpDevice::new(
        udn,
        ROKU_ECP_ST.to_string(),
        location.clone(),
        server_header,
    ));
    ssdp.on_event(|event| {
        if let SsdpEvent::SearchResponse { to, .. } = event {
            debug!("Discovered by {}", to);
        }
    });
    if let Err(e) = ssdp.start() {
        server.shutdown();
        server.wait().await;
        return Err(e).context("Failed to start SSDP announcer");
    }

    info!("✅ RokuBridge is ready at {}", location);
    info!("Press Ctrl+C to stop...");
    server.wait().await;

    ssdp.stop();
    info!("👋 RokuBridge stopped");
    Ok(())
}

use std::sync::Arc;

use rokubus::CommandBus;

use crate::{AppRegistry, DeviceIdentity, SelectionState};

/// État partagé par les handlers ECP (via `State`)
#[derive(Clone)]
pub struct EcpContext {
    pub registry: Arc<AppRegistry>,
    pub selection: Arc<SelectionState>,
    pub bus: Arc<dyn CommandBus>,
    pub identity: Arc<DeviceIdentity>,
    /// Préfixe des topics publiés
    pub namespace: Arc<str>,
}

impl EcpContext {
    /// Crée le contexte, la première application étant sélectionnée
    pub fn new(
        registry: AppRegistry,
        bus: Arc<dyn CommandBus>,
        identity: DeviceIdentity,
        namespace: impl Into<String>,
    ) -> Self {
        Self {
            registry: Arc::new(registry),
            selection: Arc::new(SelectionState::default()),
            bus,
            identity: Arc::new(identity),
            namespace: Arc::from(namespace.into()),
        }
    }
}

use std::sync::atomic::{AtomicI64, Ordering};

use crate::AppRegistry;

/// Nom rapporté quand l'index actif ne désigne aucune application
pub const NO_APP_NAME: &str = "None";

/// Index de l'application active
///
/// Toute valeur est acceptée, y compris hors limites : la lecture du nom
/// retombe alors sur `"None"`.
#[derive(Debug, Default)]
pub struct SelectionState {
    active: AtomicI64,
}

impl SelectionState {
    pub fn get(&self) -> i64 {
        self.active.load(Ordering::SeqCst)
    }

    pub fn set(&self, index: i64) {
        self.active.store(index, Ordering::SeqCst);
    }

    pub fn resolve_name(&self, registry: &AppRegistry) -> String {
        registry
            .get(self.get())
            .map(|app| app.name.clone())
            .unwrap_or_else(|| NO_APP_NAME.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_selects_first_app() {
        let registry = AppRegistry::from_config_str("Netflix Hulu").unwrap();
        let state = SelectionState::default();
        assert_eq!(state.get(), 0);
        assert_eq!(state.resolve_name(&registry), "Netflix");
    }

    #[test]
    fn test_out_of_range_resolves_to_none() {
        let registry = AppRegistry::from_config_str("Netflix Hulu").unwrap();
        let state = SelectionState::default();

        state.set(7);
        assert_eq!(state.get(), 7);
        assert_eq!(state.resolve_name(&registry), NO_APP_NAME);

        state.set(-3);
        assert_eq!(state.resolve_name(&registry), NO_APP_NAME);

        state.set(1);
        assert_eq!(state.resolve_name(&registry), "Hulu");
    }
}

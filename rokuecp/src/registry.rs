use crate::EcpError;

/// Identifiant de l'application factice ajoutée à la liste
pub const SENTINEL_APP_ID: usize = 999;

/// Nom de l'application factice
pub const SENTINEL_APP_NAME: &str = "Dummy";

/// Application pilotable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    /// Position dans la configuration (stable)
    pub index: usize,
    pub name: String,
}

/// Liste ordonnée et immuable des applications
#[derive(Debug, Clone)]
pub struct AppRegistry {
    apps: Vec<Application>,
}

impl AppRegistry {
    /// Construit le registre depuis la chaîne `apps` de la configuration
    ///
    /// Les noms sont séparés par des blancs ; l'index de chaque application
    /// est sa position. Une liste vide est une erreur.
    pub fn from_config_str(apps: &str) -> Result<Self, EcpError> {
        let apps: Vec<Application> = apps
            .split_whitespace()
            .enumerate()
            .map(|(index, name)| Application {
                index,
                name: name.to_string(),
            })
            .collect();

        if apps.is_empty() {
            return Err(EcpError::EmptyAppList);
        }

        Ok(Self { apps })
    }

    /// Applications configurées suivies de l'application factice
    pub fn list(&self) -> Vec<Application> {
        let mut list = self.apps.clone();
        list.push(Application {
            index: SENTINEL_APP_ID,
            name: SENTINEL_APP_NAME.to_string(),
        });
        list
    }

    /// Nombre d'applications configurées (sans l'application factice)
    pub fn count(&self) -> usize {
        self.apps.len()
    }

    /// Application configurée à `index`, `None` hors de `0..count()`
    pub fn get(&self, index: i64) -> Option<&Application> {
        usize::try_from(index).ok().and_then(|i| self.apps.get(i))
    }

    pub fn names(&self) -> Vec<&str> {
        self.apps.iter().map(|app| app.name.as_str()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_follow_configuration_order() {
        let registry = AppRegistry::from_config_str("Netflix  Hulu\tYouTube").unwrap();
        assert_eq!(registry.count(), 3);
        assert_eq!(registry.names(), vec!["Netflix", "Hulu", "YouTube"]);
        assert_eq!(registry.get(2).unwrap().name, "YouTube");
    }

    #[test]
    fn test_list_ends_with_sentinel() {
        let registry = AppRegistry::from_config_str("Netflix").unwrap();
        let list = registry.list();
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].index, SENTINEL_APP_ID);
        assert_eq!(list[1].name, SENTINEL_APP_NAME);
    }

    #[test]
    fn test_get_out_of_range() {
        let registry = AppRegistry::from_config_str("Netflix Hulu").unwrap();
        assert!(registry.get(-1).is_none());
        assert!(registry.get(2).is_none());
        // L'application factice n'est pas sélectionnable
        assert!(registry.get(SENTINEL_APP_ID as i64).is_none());
    }

    #[test]
    fn test_empty_list_is_rejected() {
        assert!(matches!(
            AppRegistry::from_config_str("   "),
            Err(EcpError::EmptyAppList)
        ));
    }
}

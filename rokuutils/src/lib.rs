/// Utilitaires réseau et système pour RokuBridge.
///
/// # Fonctions principales
///
/// - [`local_network_ip`] : Adresse IPv4 non-loopback utilisable pour les annonces
/// - [`list_all_ips`] : Adresses IPv4 non-loopback par interface
///
/// # Examples
///
/// ```
/// use rokuutils::local_network_ip;
///
/// if let Some(ip) = local_network_ip() {
///     println!("Adresse annoncée: {}", ip);
/// }
/// ```
mod ip_utils;

pub use ip_utils::{list_all_ips, local_network_ip};

/// Retourne une chaîne décrivant le système d'exploitation et sa version.
///
/// Sert de préfixe à l'en-tête `SERVER` des messages SSDP.
///
/// # Format
/// - macOS: "macOS/15.1" ou "Mac OS/10.15.7"
/// - Linux: "Linux/6.5.0" ou "Ubuntu/22.04"
/// - Windows: "Windows/10.0.19045"
/// - Autre: "{OS}/Unknown"
///
/// # Exemples
///
/// ```
/// use rokuutils::get_os_string;
///
/// let os = get_os_string();
/// println!("OS: {}", os); // Ex: "Linux/6.5.0"
/// ```
pub fn get_os_string() -> String {
    let info = os_info::get();
    let os_type = format!("{:?}", info.os_type());

    let version = info.version();
    if version != &os_info::Version::Unknown {
        format!("{}/{}", os_type, version)
    } else {
        format!("{}/Unknown", os_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_os_string_has_separator() {
        let os = get_os_string();
        assert!(os.contains('/'), "OS string should be 'name/version': {}", os);
    }
}

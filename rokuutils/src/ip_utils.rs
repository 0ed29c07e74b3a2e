use get_if_addrs::get_if_addrs;
use std::collections::BTreeMap;
use std::net::{IpAddr, Ipv4Addr, UdpSocket};

/// Adresse locale choisie par le système pour la route par défaut.
///
/// Un socket UDP "connecté" vers 8.8.8.8 suffit : aucun paquet n'est émis.
fn routed_ipv4() -> Option<Ipv4Addr> {
    let socket = UdpSocket::bind("0.0.0.0:0").ok()?;
    socket.connect("8.8.8.8:80").ok()?;
    match socket.local_addr().ok()?.ip() {
        IpAddr::V4(ip) => Some(ip),
        IpAddr::V6(_) => None,
    }
}

/// Retourne une adresse IPv4 non-loopback sur laquelle le device peut être annoncé.
///
/// L'interface de la route par défaut est préférée ; à défaut, la première
/// adresse non-loopback trouvée sur les interfaces locales est utilisée.
///
/// # Returns
///
/// `None` si la machine n'a aucune adresse réseau utilisable.
pub fn local_network_ip() -> Option<Ipv4Addr> {
    if let Some(ip) = routed_ipv4().filter(|ip| !ip.is_loopback() && !ip.is_unspecified()) {
        return Some(ip);
    }

    list_all_ips().into_values().flatten().next()
}

/// Liste toutes les adresses IPv4 non-loopback des interfaces réseau.
///
/// # Returns
///
/// Une `BTreeMap` où :
/// - **Clé** : nom de l'interface réseau (ex: `"eth0"`, `"wlan0"`, `"en0"`)
/// - **Valeur** : adresses IPv4 associées à cette interface
///
/// En cas d'erreur lors de la récupération des interfaces, la map est vide.
///
/// # Note
///
/// - Seules les adresses IPv4 sont retournées
/// - Les adresses de loopback (127.x.x.x) sont filtrées
pub fn list_all_ips() -> BTreeMap<String, Vec<Ipv4Addr>> {
    let mut result = BTreeMap::new();

    if let Ok(interfaces) = get_if_addrs() {
        for iface in interfaces {
            if let IpAddr::V4(ip) = iface.ip() {
                if ip.is_loopback() {
                    continue;
                }
                let addrs: &mut Vec<Ipv4Addr> = result.entry(iface.name).or_default();
                if !addrs.contains(&ip) {
                    addrs.push(ip);
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_network_ip_is_never_loopback() {
        if let Some(ip) = local_network_ip() {
            assert!(!ip.is_loopback());
            assert!(!ip.is_unspecified());
        }
    }

    #[test]
    fn test_list_all_ips_no_loopback() {
        for (_, addresses) in list_all_ips() {
            for addr in addresses {
                assert!(!addr.is_loopback(), "Loopback addresses should be filtered out");
            }
        }
    }

    #[test]
    fn test_list_all_ips_no_duplicate_ips_per_interface() {
        for (iface_name, addresses) in list_all_ips() {
            assert!(!iface_name.is_empty(), "Interface names should not be empty");
            let unique: std::collections::HashSet<_> = addresses.iter().collect();
            assert_eq!(
                addresses.len(),
                unique.len(),
                "No duplicate IPs should exist for interface {}",
                iface_name
            );
        }
    }
}

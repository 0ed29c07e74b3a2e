//! Construction et analyse des messages SSDP (HTTPU)

use super::{MAX_AGE, SSDP_MULTICAST_ADDR, SSDP_PORT, SsdpDevice};

/// Construit un NOTIFY alive pour un type de notification
pub fn notify_alive(device: &SsdpDevice, nt: &str) -> String {
    format!(
        "NOTIFY * HTTP/1.1\r\n\
         HOST: {}:{}\r\n\
         CACHE-CONTROL: max-age={}\r\n\
         LOCATION: {}\r\n\
         NT: {}\r\n\
         NTS: ssdp:alive\r\n\
         SERVER: {}\r\n\
         USN: {}\r\n\
         \r\n",
        SSDP_MULTICAST_ADDR,
        SSDP_PORT,
        MAX_AGE,
        device.location,
        nt,
        device.server,
        device.usn(nt)
    )
}

/// Construit un NOTIFY byebye pour un type de notification
pub fn notify_byebye(device: &SsdpDevice, nt: &str) -> String {
    format!(
        "NOTIFY * HTTP/1.1\r\n\
         HOST: {}:{}\r\n\
         NT: {}\r\n\
         NTS: ssdp:byebye\r\n\
         USN: {}\r\n\
         \r\n",
        SSDP_MULTICAST_ADDR,
        SSDP_PORT,
        nt,
        device.usn(nt)
    )
}

/// Construit la réponse unicast à un M-SEARCH
pub fn search_response(device: &SsdpDevice, st: &str) -> String {
    let date = chrono::Utc::now().format("%a, %d %b %Y %H:%M:%S GMT");

    format!(
        "HTTP/1.1 200 OK\r\n\
         CACHE-CONTROL: max-age={}\r\n\
         DATE: {}\r\n\
         EXT:\r\n\
         LOCATION: {}\r\n\
         SERVER: {}\r\n\
         ST: {}\r\n\
         USN: {}\r\n\
         \r\n",
        MAX_AGE,
        date,
        device.location,
        device.server,
        st,
        device.usn(st)
    )
}

/// Retourne la valeur d'un en-tête (nom insensible à la casse)
pub fn header<'a>(message: &'a str, name: &str) -> Option<&'a str> {
    message.lines().skip(1).find_map(|line| {
        let (key, value) = line.split_once(':')?;
        key.trim()
            .eq_ignore_ascii_case(name)
            .then(|| value.trim())
    })
}

/// Extrait le champ ST d'un M-SEARCH
///
/// Retourne `None` si le message n'est pas un M-SEARCH ou n'a pas de ST.
pub fn parse_msearch(message: &str) -> Option<&str> {
    let request_line = message.lines().next()?;
    if !request_line.trim_start().starts_with("M-SEARCH") {
        return None;
    }
    header(message, "ST").filter(|st| !st.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn device() -> SsdpDevice {
        SsdpDevice::new(
            "abcd".to_string(),
            "roku:ecp".to_string(),
            "http://10.0.0.2:8060/".to_string(),
            "Linux/6.5 UPnP/1.0 RokuBridge/0.1.0".to_string(),
        )
    }

    #[test]
    fn test_parse_msearch() {
        let msg = "M-SEARCH * HTTP/1.1\r\nHost: 239.255.255.250:1900\r\nMan: \"ssdp:discover\"\r\nst: roku:ecp\r\nMX: 3\r\n\r\n";
        assert_eq!(parse_msearch(msg), Some("roku:ecp"));
        assert_eq!(header(msg, "mx"), Some("3"));
    }

    #[test]
    fn test_parse_msearch_rejects_other_messages() {
        let notify = notify_alive(&device(), "roku:ecp");
        assert_eq!(parse_msearch(&notify), None);
        assert_eq!(parse_msearch("M-SEARCH * HTTP/1.1\r\nMX: 1\r\n\r\n"), None);
        assert_eq!(parse_msearch(""), None);
    }

    #[test]
    fn test_alive_headers() {
        let msg = notify_alive(&device(), "roku:ecp");
        assert!(msg.starts_with("NOTIFY * HTTP/1.1\r\n"));
        assert!(msg.ends_with("\r\n\r\n"));
        assert_eq!(header(&msg, "NTS"), Some("ssdp:alive"));
        assert_eq!(header(&msg, "LOCATION"), Some("http://10.0.0.2:8060/"));
        assert_eq!(header(&msg, "USN"), Some("uuid:abcd::roku:ecp"));
        assert_eq!(header(&msg, "CACHE-CONTROL"), Some("max-age=1800"));
    }

    #[test]
    fn test_byebye_headers() {
        let msg = notify_byebye(&device(), "uuid:abcd");
        assert_eq!(header(&msg, "NTS"), Some("ssdp:byebye"));
        assert_eq!(header(&msg, "USN"), Some("uuid:abcd"));
        assert_eq!(header(&msg, "LOCATION"), None);
    }

    #[test]
    fn test_search_response_headers() {
        let msg = search_response(&device(), "roku:ecp");
        assert!(msg.starts_with("HTTP/1.1 200 OK\r\n"));
        assert_eq!(header(&msg, "ST"), Some("roku:ecp"));
        assert_eq!(header(&msg, "LOCATION"), Some("http://10.0.0.2:8060/"));
        assert_eq!(header(&msg, "EXT"), Some(""));
        assert!(header(&msg, "DATE").unwrap().ends_with("GMT"));
    }
}

//! Well-known TCP service names.
//!
//! Used when a probe report lists a port without a service column.

/// Look up the conventional service name for a TCP port.
pub fn service_name(port: u16) -> Option<&'static str> {
    let name = match port {
        21 => "ftp",
        22 => "ssh",
        23 => "telnet",
        25 => "smtp",
        53 => "domain",
        80 => "http",
        110 => "pop3",
        111 => "rpcbind",
        135 => "msrpc",
        139 => "netbios-ssn",
        143 => "imap",
        389 => "ldap",
        443 => "https",
        445 => "microsoft-ds",
        465 => "smtps",
        587 => "submission",
        636 => "ldapssl",
        993 => "imaps",
        995 => "pop3s",
        1433 => "ms-sql-s",
        1723 => "pptp",
        3306 => "mysql",
        3389 => "ms-wbt-server",
        5432 => "postgresql",
        5900 => "vnc",
        6379 => "redis",
        8000 => "http-alt",
        8080 => "http-proxy",
        8443 => "https-alt",
        9200 => "wap-wsp",
        27017 => "mongod",
        _ => return None,
    };
    Some(name)
}

/// Service name for a port, or `"unknown"`.
pub fn service_description(port: u16) -> &'static str {
    service_name(port).unwrap_or("unknown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_common_ports() {
        assert_eq!(service_name(22), Some("ssh"));
        assert_eq!(service_name(80), Some("http"));
        assert_eq!(service_name(3306), Some("mysql"));
    }

    #[test]
    fn test_unknown_port() {
        assert_eq!(service_name(12345), None);
        assert_eq!(service_description(12345), "unknown");
    }
}

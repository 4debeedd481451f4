//! nmap text report parser.
//!
//! A single pass over the report lines. Each line is classified as a host
//! header, a TCP port line, or noise; headers and port lines drive a small
//! state machine that emits `PortRecord`s and inserts a sentinel for every
//! host that reported no ports.
//!
//! A header naming a host without an IPv4 address still closes the previous
//! host's section, but the port lines under it are dropped: records are keyed
//! by address.

use crate::scanner::traits::{PortRecord, PortState};
use crate::services::service_description;
use crate::types::{HostTarget, Port};
use std::net::Ipv4Addr;

const HOST_HEADER: &str = "Nmap scan report for ";

/// Classification of a single report line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReportLine<'a> {
    /// `Nmap scan report for 10.0.0.1` or `... for name (10.0.0.1)`;
    /// `None` when the header carries no IPv4 address.
    HostHeader(Option<HostTarget>),
    /// `22/tcp open ssh`; the service column may be missing.
    Port {
        port: Port,
        state: PortState,
        service: Option<&'a str>,
    },
    Other,
}

impl<'a> ReportLine<'a> {
    /// Classify one line of probe output.
    pub fn classify(line: &'a str) -> Self {
        let line = line.trim();

        if let Some(rest) = line.strip_prefix(HOST_HEADER) {
            return Self::HostHeader(parse_host_address(rest));
        }

        parse_port_line(line).unwrap_or(Self::Other)
    }
}

fn parse_host_address(rest: &str) -> Option<HostTarget> {
    let rest = rest.trim();

    // With reverse DNS the address is in parentheses after the name.
    let addr = match (rest.rfind('('), rest.strip_suffix(')')) {
        (Some(open), Some(inner)) => &inner[open + 1..],
        _ => rest,
    };

    addr.parse::<Ipv4Addr>().ok().map(HostTarget::new)
}

fn parse_port_line(line: &str) -> Option<ReportLine<'_>> {
    let mut fields = line.split_whitespace();

    let (number, protocol) = fields.next()?.split_once('/')?;
    if protocol != "tcp" {
        return None;
    }
    let port = number.parse::<Port>().ok()?;
    let state = fields.next()?.parse::<PortState>().ok()?;

    Some(ReportLine::Port {
        port,
        state,
        service: fields.next(),
    })
}

/// Incremental parser state for one probe report.
#[derive(Debug, Default)]
pub struct ReportParser {
    current_host: Option<HostTarget>,
    saw_port: bool,
    records: Vec<PortRecord>,
}

impl ReportParser {
    /// Create a parser with no current host.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one line of output.
    pub fn feed(&mut self, line: &str) {
        match ReportLine::classify(line) {
            ReportLine::HostHeader(host) => {
                self.flush_sentinel();
                self.current_host = host;
                self.saw_port = false;
            }
            ReportLine::Port {
                port,
                state,
                service,
            } => {
                // Port lines outside a host section have no owner.
                let Some(host) = self.current_host else {
                    return;
                };
                let service = service.unwrap_or_else(|| service_description(port.as_u16()));
                self.records.push(PortRecord::new(host, port, state, service));
                self.saw_port = true;
            }
            ReportLine::Other => {}
        }
    }

    /// Finish parsing and return the records in line order.
    pub fn finish(mut self) -> Vec<PortRecord> {
        self.flush_sentinel();
        self.records
    }

    fn flush_sentinel(&mut self) {
        if let Some(host) = self.current_host {
            if !self.saw_port {
                self.records.push(PortRecord::unreachable(host));
            }
        }
    }
}

/// Parse one complete probe report.
pub fn parse_report(raw: &str) -> Vec<PortRecord> {
    let mut parser = ReportParser::new();
    for line in raw.lines() {
        parser.feed(line);
    }
    parser.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    const THREE_PORTS: &str = "\
Starting Nmap 7.94 ( https://nmap.org ) at 2024-05-01 10:00 UTC
Nmap scan report for 10.0.0.1
Host is up (0.00042s latency).
Not shown: 997 filtered tcp ports (no-response)
PORT    STATE  SERVICE
22/tcp  open   ssh
80/tcp  open   http
443/tcp closed https

Nmap done: 1 IP address (1 host up) scanned in 4.12 seconds
";

    fn host(last: u8) -> HostTarget {
        HostTarget::new(Ipv4Addr::new(10, 0, 0, last))
    }

    #[test]
    fn test_three_port_lines_in_order() {
        let records = parse_report(THREE_PORTS);
        assert_eq!(records.len(), 3);
        assert!(records.iter().all(|r| !r.is_sentinel()));
        assert!(records.iter().all(|r| r.host == host(1)));

        let rows: Vec<(&str, PortState, &str)> = records
            .iter()
            .map(|r| (r.port.as_str(), r.state, r.service.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("22", PortState::Open, "ssh"),
                ("80", PortState::Open, "http"),
                ("443", PortState::Closed, "https"),
            ]
        );
    }

    #[test]
    fn test_header_without_ports_yields_one_sentinel() {
        let raw = "Nmap scan report for 10.0.0.7\nHost is up (0.0010s latency).\nAll 1000 scanned ports on 10.0.0.7 are in ignored states.\n";
        let records = parse_report(raw);
        assert_eq!(records, vec![PortRecord::unreachable(host(7))]);
    }

    #[test]
    fn test_sentinel_flushed_when_next_host_starts() {
        let raw = "Nmap scan report for 10.0.0.2\nNmap scan report for 10.0.0.3\n8080/tcp open http-proxy\n";
        let records = parse_report(raw);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], PortRecord::unreachable(host(2)));
        assert_eq!(records[1].host, host(3));
        assert_eq!(records[1].port, "8080");
    }

    #[test]
    fn test_reverse_dns_header() {
        let raw = "Nmap scan report for router.lan (10.0.0.254)\n53/tcp open domain\n";
        let records = parse_report(raw);
        assert_eq!(records[0].host, host(254));
    }

    #[test]
    fn test_unaddressed_header_closes_previous_host() {
        let raw = "\
Nmap scan report for 10.0.0.4
Nmap scan report for printer.lan
631/tcp open ipp
Nmap scan report for 10.0.0.6
22/tcp open ssh
";
        let records = parse_report(raw);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0], PortRecord::unreachable(host(4)));
        assert_eq!(records[1].host, host(6));
        assert_eq!(records[1].port, "22");
    }

    #[test]
    fn test_missing_service_falls_back() {
        let records = parse_report("Nmap scan report for 10.0.0.1\n3306/tcp filtered\n9/tcp open\n");
        assert_eq!(records[0].service, "mysql");
        assert_eq!(records[0].state, PortState::Filtered);
        assert_eq!(records[1].service, "unknown");
    }

    #[test]
    fn test_noise_is_ignored() {
        let raw = "\
22/tcp open ssh
Nmap scan report for 10.0.0.1
PORT   STATE SERVICE
53/udp open domain
25/tcp open|filtered smtp
Device type: general purpose
";
        // Port line before any header, UDP and ambiguous states are dropped.
        assert_eq!(parse_report(raw), vec![PortRecord::unreachable(host(1))]);
    }

    #[test]
    fn test_empty_output_has_no_records() {
        assert!(parse_report("").is_empty());
        assert!(parse_report("Note: Host seems down.\n").is_empty());
    }

    #[test]
    fn test_classify() {
        assert_eq!(
            ReportLine::classify("Nmap scan report for 10.0.0.5"),
            ReportLine::HostHeader(Some(host(5)))
        );
        assert_eq!(
            ReportLine::classify("Nmap scan report for example.com"),
            ReportLine::HostHeader(None)
        );
        assert_eq!(ReportLine::classify("Nmap done: 1 IP address"), ReportLine::Other);
        assert_eq!(ReportLine::classify("0/tcp open x"), ReportLine::Other);
    }
}

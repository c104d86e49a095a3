//! Parsers for the text produced by the shell tools the collectors call.
//!
//! Each parser takes raw command output and returns typed values, so a
//! change in a tool's format shows up as a per-field error rather than a
//! garbled display.

use once_cell::sync::Lazy;
use regex::Regex;

static MAC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"link/\w+\s+([0-9a-fA-F]{2}(?::[0-9a-fA-F]{2}){5})").expect("valid regex")
});
static INET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\binet\s+(\d{1,3}(?:\.\d{1,3}){3})").expect("valid regex"));
static IFACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d+:\s+([^:@\s]+)").expect("valid regex"));
static ESSID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"ESSID:"([^"]*)""#).expect("valid regex"));
static SIGNAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Signal level[=:]\s*(-?\d+(?:\.\d+)?\s*dBm)").expect("valid regex")
});
static QUALITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Link Quality[=:]\s*(\d+)/(\d+)").expect("valid regex"));

/// Hardware address from `ip addr show <iface>`.
pub fn parse_mac_address(output: &str) -> Option<String> {
    MAC_RE
        .captures(output)
        .map(|caps| caps[1].to_lowercase())
}

/// First IPv4 address from `ip -4 addr show <iface>`.
pub fn parse_ipv4(output: &str) -> Option<String> {
    INET_RE.captures(output).map(|caps| caps[1].to_string())
}

/// Interface names from `ip -4 addr`; only interfaces carrying an IPv4
/// address are listed by that command.
pub fn parse_interfaces(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| !line.starts_with(char::is_whitespace))
        .filter_map(|line| IFACE_RE.captures(line).map(|caps| caps[1].to_string()))
        .collect()
}

/// Number of upgradable packages in `apt list --upgradable` output.
///
/// The header ("Listing...") and apt's notes and warnings are skipped.
pub fn count_upgradable(output: &str) -> usize {
    output
        .lines()
        .filter(|line| !line.is_empty())
        .filter(|line| !line.starts_with(['N', 'W', 'L']))
        .count()
}

/// Fields extracted from `speedtest-cli` output. Missing lines stay `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpeedtestResult {
    pub download: Option<String>,
    pub upload: Option<String>,
    pub ping: Option<String>,
}

pub fn parse_speedtest(output: &str) -> SpeedtestResult {
    let mut result = SpeedtestResult::default();
    for line in output.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix("Download:") {
            result.download = Some(rest.trim().to_string());
        } else if let Some(rest) = line.strip_prefix("Upload:") {
            result.upload = Some(rest.trim().to_string());
        } else if line.starts_with("Hosted by") {
            // "Hosted by ISP (City) [1.23 km]: 12.345 ms"
            result.ping = line
                .rsplit_once(':')
                .map(|(_, ping)| ping.trim().to_string())
                .filter(|ping| !ping.is_empty());
        }
    }
    result
}

/// Wireless link details from `iwconfig <iface>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WifiLink {
    pub essid: Option<String>,
    pub signal_level: Option<String>,
    pub quality_percent: Option<u32>,
}

pub fn parse_iwconfig(output: &str) -> WifiLink {
    let essid = ESSID_RE
        .captures(output)
        .map(|caps| caps[1].to_string());
    let signal_level = SIGNAL_RE
        .captures(output)
        .map(|caps| caps[1].split_whitespace().collect::<Vec<_>>().join(" "));
    let quality_percent = QUALITY_RE
        .captures(output)
        .and_then(|caps| {
            let value: f64 = caps[1].parse().ok()?;
            let max: f64 = caps[2].parse().ok()?;
            (max > 0.0).then(|| (value * 100.0 / max).round() as u32)
        });
    WifiLink {
        essid,
        signal_level,
        quality_percent,
    }
}

/// Degrees Celsius, one decimal, from a sysfs thermal zone reading
/// (millidegrees).
pub fn parse_thermal_millidegrees(raw: &str) -> Option<f64> {
    let millis: i64 = raw.trim().parse().ok()?;
    Some((millis as f64 / 100.0).round() / 10.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_compile() {
        let patterns: [(&Lazy<Regex>, usize); 6] = [
            (&MAC_RE, 1),
            (&INET_RE, 1),
            (&IFACE_RE, 1),
            (&ESSID_RE, 1),
            (&SIGNAL_RE, 1),
            (&QUALITY_RE, 2),
        ];
        for (re, groups) in patterns {
            assert_eq!(re.captures_len(), groups + 1, "{}", re.as_str());
        }
    }

    const IP_ADDR_ETH0: &str = "\
2: eth0: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500 qdisc mq state UP group default qlen 1000
    link/ether b8:27:EB:12:34:56 brd ff:ff:ff:ff:ff:ff
    inet 192.168.178.23/24 brd 192.168.178.255 scope global dynamic eth0
       valid_lft 85530sec preferred_lft 85530sec
";

    #[test]
    fn test_parse_mac_address() {
        assert_eq!(
            parse_mac_address(IP_ADDR_ETH0),
            Some("b8:27:eb:12:34:56".to_string())
        );
        assert_eq!(parse_mac_address("Device \"wlan0\" does not exist."), None);
    }

    #[test]
    fn test_parse_ipv4_any_length() {
        assert_eq!(parse_ipv4(IP_ADDR_ETH0), Some("192.168.178.23".to_string()));
        assert_eq!(
            parse_ipv4("    inet 10.0.0.2/8 scope global wlan0"),
            Some("10.0.0.2".to_string())
        );
        assert_eq!(parse_ipv4(""), None);
    }

    #[test]
    fn test_parse_interfaces() {
        let output = "\
1: lo: <LOOPBACK,UP,LOWER_UP> mtu 65536 qdisc noqueue state UNKNOWN group default qlen 1000
    inet 127.0.0.1/8 scope host lo
       valid_lft forever preferred_lft forever
3: wlan0: <BROADCAST,MULTICAST,UP,LOWER_UP> mtu 1500 qdisc pfifo_fast state UP group default qlen 1000
    inet 192.168.178.49/24 brd 192.168.178.255 scope global wlan0
5: veth1@if4: <BROADCAST> mtu 1500
";
        assert_eq!(parse_interfaces(output), vec!["lo", "wlan0", "veth1"]);
    }

    #[test]
    fn test_count_upgradable() {
        let output = "\
Listing...
WARNING: apt does not have a stable CLI interface. Use with caution in scripts.

N: There is 1 additional version.
libc6/stable 2.28-10+rpi1 armhf [upgradable from: 2.28-10]
openssl/stable 1.1.1d-0+deb10u3 armhf [upgradable from: 1.1.1c-1]
";
        assert_eq!(count_upgradable(output), 2);
        assert_eq!(count_upgradable("Listing...\n"), 0);
    }

    #[test]
    fn test_parse_speedtest() {
        let output = "\
Retrieving speedtest.net configuration...
Testing from Ziggo (84.1.2.3)...
Hosted by KPN (Amsterdam) [12.34 km]: 15.678 ms
Testing download speed................................................................................
Download: 93.41 Mbit/s
Testing upload speed......................................................................................................
Upload: 19.87 Mbit/s
";
        let result = parse_speedtest(output);
        assert_eq!(result.download.as_deref(), Some("93.41 Mbit/s"));
        assert_eq!(result.upload.as_deref(), Some("19.87 Mbit/s"));
        assert_eq!(result.ping.as_deref(), Some("15.678 ms"));
    }

    #[test]
    fn test_parse_speedtest_partial() {
        let result = parse_speedtest("Cannot retrieve speedtest configuration\n");
        assert_eq!(result, SpeedtestResult::default());
    }

    #[test]
    fn test_parse_iwconfig() {
        let output = r#"wlan0     IEEE 802.11  ESSID:"HomeNet 5G"
          Mode:Managed  Frequency:2.437 GHz  Access Point: 00:11:22:33:44:55
          Bit Rate=72.2 Mb/s   Tx-Power=31 dBm
          Retry short limit:7   RTS thr:off   Fragment thr:off
          Power Management:on
          Link Quality=56/70  Signal level=-54 dBm
"#;
        let link = parse_iwconfig(output);
        assert_eq!(link.essid.as_deref(), Some("HomeNet 5G"));
        assert_eq!(link.signal_level.as_deref(), Some("-54 dBm"));
        assert_eq!(link.quality_percent, Some(80));
    }

    #[test]
    fn test_parse_iwconfig_unassociated() {
        let link = parse_iwconfig("wlan0     IEEE 802.11  ESSID:off/any\n");
        assert_eq!(link, WifiLink::default());
    }

    #[test]
    fn test_parse_thermal() {
        assert_eq!(parse_thermal_millidegrees("48312\n"), Some(48.3));
        assert_eq!(parse_thermal_millidegrees("65000"), Some(65.0));
        assert_eq!(parse_thermal_millidegrees("hot"), None);
    }
}

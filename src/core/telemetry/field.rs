use serde::{Deserialize, Serialize};

use crate::core::scheduler::Tier;

/// Every value the dashboard can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    // Static
    Hostname,
    Kernel,
    LanMac,
    WifiMac,
    // Daily
    UpdateCount,
    // Semi-Often
    LanIp,
    WlanIp,
    InternetAccess,
    SpeedDown,
    SpeedUp,
    Ping,
    WorldInfected,
    WorldDead,
    /// Infected count for the configured region at this index
    RegionInfected(usize),
    /// Death count for the configured region at this index
    RegionDead(usize),
    // Often
    Time,
    Uptime,
    Processes,
    CpuTemp,
    MemUsed,
    MemTotal,
    Essid,
    SignalLevel,
    SignalQuality,
}

impl Field {
    /// The tier whose collector owns this field.
    pub fn tier(self) -> Tier {
        match self {
            Field::Hostname | Field::Kernel | Field::LanMac | Field::WifiMac => Tier::Static,
            Field::UpdateCount => Tier::Daily,
            Field::LanIp
            | Field::WlanIp
            | Field::InternetAccess
            | Field::SpeedDown
            | Field::SpeedUp
            | Field::Ping
            | Field::WorldInfected
            | Field::WorldDead
            | Field::RegionInfected(_)
            | Field::RegionDead(_) => Tier::SemiOften,
            Field::Time
            | Field::Uptime
            | Field::Processes
            | Field::CpuTemp
            | Field::MemUsed
            | Field::MemTotal
            | Field::Essid
            | Field::SignalLevel
            | Field::SignalQuality => Tier::Often,
        }
    }

    /// Every field, in tier order, with `regions` outbreak regions.
    pub fn all(regions: usize) -> Vec<Field> {
        let mut fields = vec![
            Field::Hostname,
            Field::Kernel,
            Field::LanMac,
            Field::WifiMac,
            Field::UpdateCount,
            Field::LanIp,
            Field::WlanIp,
            Field::InternetAccess,
            Field::SpeedDown,
            Field::SpeedUp,
            Field::Ping,
            Field::WorldInfected,
            Field::WorldDead,
        ];
        for i in 0..regions {
            fields.push(Field::RegionInfected(i));
            fields.push(Field::RegionDead(i));
        }
        fields.extend([
            Field::Time,
            Field::Uptime,
            Field::Processes,
            Field::CpuTemp,
            Field::MemUsed,
            Field::MemTotal,
            Field::Essid,
            Field::SignalLevel,
            Field::SignalQuality,
        ]);
        fields
    }

    /// Stable name used in the raw info dump.
    pub fn key(self) -> String {
        match self {
            Field::Hostname => "hostname".into(),
            Field::Kernel => "kernel".into(),
            Field::LanMac => "lan_mac".into(),
            Field::WifiMac => "wifi_mac".into(),
            Field::UpdateCount => "update_count".into(),
            Field::LanIp => "lan_ip".into(),
            Field::WlanIp => "wlan_ip".into(),
            Field::InternetAccess => "internet_access".into(),
            Field::SpeedDown => "speed_down".into(),
            Field::SpeedUp => "speed_up".into(),
            Field::Ping => "ping".into(),
            Field::WorldInfected => "world_infected".into(),
            Field::WorldDead => "world_dead".into(),
            Field::RegionInfected(i) => format!("region{}_infected", i),
            Field::RegionDead(i) => format!("region{}_dead", i),
            Field::Time => "time".into(),
            Field::Uptime => "uptime".into(),
            Field::Processes => "processes".into(),
            Field::CpuTemp => "cpu_temp".into(),
            Field::MemUsed => "mem_used".into(),
            Field::MemTotal => "mem_total".into(),
            Field::Essid => "essid".into(),
            Field::SignalLevel => "signal_level".into(),
            Field::SignalQuality => "signal_quality".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_fields_belong_to_semi_often() {
        assert_eq!(Field::RegionInfected(2).tier(), Tier::SemiOften);
        assert_eq!(Field::RegionDead(0).key(), "region0_dead");
    }

    #[test]
    fn test_all_fields_are_tier_ordered() {
        let fields = Field::all(2);
        assert_eq!(fields.len(), 26);
        assert!(fields.windows(2).all(|w| w[0].tier() <= w[1].tier()));
    }
}

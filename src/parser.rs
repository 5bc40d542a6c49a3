use crate::error::ScrapeError;
use crate::extract::Page;

pub const SYSINFO_PATH: &str = "/cgi-bin/sysinfo.ha";
pub const BROADBAND_PATH: &str = "/cgi-bin/broadbandstatistics.ha";

const MODEL_NUMBER: &str = "Model Number";
const SERIAL_NUMBER: &str = "Serial Number";
const SOFTWARE_VERSION: &str = "Software Version";
const UPTIME: &str = "Time Since Last Reboot";
const BROADBAND_CONNECTION: &str = "Broadband Connection";
const BROADBAND_IPV4_ADDRESS: &str = "Broadband IPv4 Address";

/// Identity and uptime read from the system information page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    pub model_number: String,
    pub serial_number: String,
    pub software_version: String,
    pub uptime_seconds: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Up,
    Other(String),
}

/// WAN link state and IPv4 traffic totals read from the broadband statistics page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BroadbandStatus {
    pub connection_state: ConnectionState,
    pub ip_address: String,
    pub receive_bytes: u64,
    pub receive_packets: u64,
    pub transmit_bytes: u64,
    pub transmit_packets: u64,
}

/// A cumulative traffic total exposed as a counter.
#[derive(Debug, PartialEq, Eq)]
pub struct TrafficCounter {
    pub label: &'static str,
    pub metric: &'static str,
    pub help: &'static str,
}

/// Row order matches the field order of [`BroadbandStatus`].
pub static TRAFFIC_COUNTERS: [TrafficCounter; 4] = [
    TrafficCounter {
        label: "Receive Bytes",
        metric: "receive_bytes_total",
        help: "Received bytes",
    },
    TrafficCounter {
        label: "Receive Packets",
        metric: "receive_packets_total",
        help: "Received packets",
    },
    TrafficCounter {
        label: "Transmit Bytes",
        metric: "transmit_bytes_total",
        help: "Transmitted bytes",
    },
    TrafficCounter {
        label: "Transmit Packets",
        metric: "transmit_packets_total",
        help: "Transmitted packets",
    },
];

impl DeviceInfo {
    pub fn from_markup(markup: &str) -> Result<Self, ScrapeError> {
        let page = Page::parse(markup);
        Ok(Self {
            model_number: page.value(MODEL_NUMBER)?,
            serial_number: page.value(SERIAL_NUMBER)?,
            software_version: page.value(SOFTWARE_VERSION)?,
            uptime_seconds: parse_uptime(&page.value(UPTIME)?)?,
        })
    }
}

impl ConnectionState {
    pub fn from_raw(raw: &str) -> Self {
        if raw == "Up" {
            Self::Up
        } else {
            Self::Other(raw.to_string())
        }
    }

    pub fn is_up(&self) -> bool {
        matches!(self, Self::Up)
    }
}

impl BroadbandStatus {
    pub fn from_markup(markup: &str) -> Result<Self, ScrapeError> {
        let page = Page::parse(markup);
        let connection_state = ConnectionState::from_raw(&page.value(BROADBAND_CONNECTION)?);
        let ip_address = page.value(BROADBAND_IPV4_ADDRESS)?;

        let mut totals = [0u64; 4];
        for (slot, counter) in totals.iter_mut().zip(TRAFFIC_COUNTERS.iter()) {
            *slot = page.counter(counter.label)?;
        }
        let [receive_bytes, receive_packets, transmit_bytes, transmit_packets] = totals;

        Ok(Self {
            connection_state,
            ip_address,
            receive_bytes,
            receive_packets,
            transmit_bytes,
            transmit_packets,
        })
    }

    /// Pairs each row of [`TRAFFIC_COUNTERS`] with its value.
    pub fn counters(&self) -> [(&'static TrafficCounter, u64); 4] {
        let totals = [
            self.receive_bytes,
            self.receive_packets,
            self.transmit_bytes,
            self.transmit_packets,
        ];
        std::array::from_fn(|i| (&TRAFFIC_COUNTERS[i], totals[i]))
    }
}

/// Converts the gateway's `days:hours:minutes:seconds` uptime into seconds.
///
/// Segments are not range checked: `0:30:90:00` is accepted as-is.
pub fn parse_uptime(raw: &str) -> Result<u64, ScrapeError> {
    let malformed = |reason: String| ScrapeError::MalformedDuration {
        input: raw.to_string(),
        reason,
    };

    let segments: Vec<&str> = raw.trim().split(':').collect();
    if segments.len() != 4 {
        return Err(malformed(format!(
            "expected 4 colon-separated segments, got {}",
            segments.len()
        )));
    }

    let mut total: u64 = 0;
    for (segment, unit) in segments.iter().zip([86_400u64, 3_600, 60, 1]) {
        let value: u64 = segment
            .trim()
            .parse()
            .map_err(|_| malformed(format!("segment '{segment}' is not a non-negative integer")))?;
        total = value
            .checked_mul(unit)
            .and_then(|seconds| total.checked_add(seconds))
            .ok_or_else(|| malformed("duration overflows u64 seconds".to_string()))?;
    }
    Ok(total)
}

use anyhow::{Context, Result};
use prometheus::{core::Collector, Encoder, IntCounter, IntGaugeVec, Opts, TextEncoder};

use crate::parser::{BroadbandStatus, DeviceInfo};

pub const BROADBAND_LABELS: [&str; 4] = [
    "model_number",
    "serial_number",
    "software_version",
    "ip_address",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
    Counter,
}

/// One metric ready for exposition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricSample {
    pub name: &'static str,
    pub help: &'static str,
    pub kind: MetricKind,
    pub labels: Vec<(&'static str, String)>,
    pub value: u64,
}

impl MetricSample {
    fn counter(name: &'static str, help: &'static str, value: u64) -> Self {
        Self {
            name,
            help,
            kind: MetricKind::Counter,
            labels: Vec::new(),
            value,
        }
    }
}

/// Builds the fixed metric set for one collection cycle.
pub fn assemble(device: &DeviceInfo, broadband: &BroadbandStatus) -> Vec<MetricSample> {
    let label_values = [
        device.model_number.clone(),
        device.serial_number.clone(),
        device.software_version.clone(),
        broadband.ip_address.clone(),
    ];

    let mut samples = Vec::with_capacity(6);
    samples.push(MetricSample {
        name: "broadband_up",
        help: "Broadband is up",
        kind: MetricKind::Gauge,
        labels: BROADBAND_LABELS.into_iter().zip(label_values).collect(),
        value: u64::from(broadband.connection_state.is_up()),
    });
    samples.push(MetricSample::counter(
        "uptime_total",
        "Uptime in seconds",
        device.uptime_seconds,
    ));
    samples.extend(
        broadband
            .counters()
            .into_iter()
            .map(|(counter, value)| MetricSample::counter(counter.metric, counter.help, value)),
    );
    samples
}

/// Renders samples in the Prometheus text format, keeping the order of `samples`.
///
/// Metrics are built per call and never registered globally. The text format carries
/// values as floats, so counters above 2^53 lose precision in the output.
pub fn render(samples: &[MetricSample]) -> Result<String> {
    let mut families = Vec::with_capacity(samples.len());
    for sample in samples {
        let opts = Opts::new(sample.name, sample.help);
        match sample.kind {
            MetricKind::Counter => {
                let counter = IntCounter::with_opts(opts)
                    .with_context(|| format!("build counter {}", sample.name))?;
                counter.inc_by(sample.value);
                families.extend(counter.collect());
            }
            MetricKind::Gauge => {
                let names: Vec<&str> = sample.labels.iter().map(|(name, _)| *name).collect();
                let values: Vec<&str> = sample.labels.iter().map(|(_, value)| value.as_str()).collect();
                let gauge = IntGaugeVec::new(opts, &names)
                    .with_context(|| format!("build gauge {}", sample.name))?;
                let value = i64::try_from(sample.value)
                    .with_context(|| format!("gauge {} out of range", sample.name))?;
                gauge.with_label_values(values.as_slice()).set(value);
                families.extend(gauge.collect());
            }
        }
    }

    let mut buffer = Vec::new();
    TextEncoder::new()
        .encode(&families, &mut buffer)
        .context("encode metrics")?;
    String::from_utf8(buffer).context("metrics output is not utf-8")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::ConnectionState;

    fn device() -> DeviceInfo {
        DeviceInfo {
            model_number: "BGW320-500".into(),
            serial_number: "S123".into(),
            software_version: "4.27.7".into(),
            uptime_seconds: 183_845,
        }
    }

    fn broadband(state: ConnectionState) -> BroadbandStatus {
        BroadbandStatus {
            connection_state: state,
            ip_address: "99.1.2.3".into(),
            receive_bytes: 123_456,
            receive_packets: 42,
            transmit_bytes: 8000,
            transmit_packets: 7,
        }
    }

    #[test]
    fn assembles_fixed_ordered_set() {
        let samples = assemble(&device(), &broadband(ConnectionState::Up));
        let names: Vec<_> = samples.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "broadband_up",
                "uptime_total",
                "receive_bytes_total",
                "receive_packets_total",
                "transmit_bytes_total",
                "transmit_packets_total",
            ]
        );

        let up = &samples[0];
        assert_eq!(up.kind, MetricKind::Gauge);
        assert_eq!(up.value, 1);
        assert_eq!(
            up.labels,
            vec![
                ("model_number", "BGW320-500".to_string()),
                ("serial_number", "S123".to_string()),
                ("software_version", "4.27.7".to_string()),
                ("ip_address", "99.1.2.3".to_string()),
            ]
        );
        assert!(samples[1..]
            .iter()
            .all(|s| s.kind == MetricKind::Counter && s.labels.is_empty()));
        assert_eq!(samples[1].value, 183_845);
        assert_eq!(samples[2].value, 123_456);
        assert_eq!(samples[3].value, 42);
    }

    #[test]
    fn gauge_is_zero_when_not_up() {
        let samples = assemble(&device(), &broadband(ConnectionState::Other("Down".into())));
        assert_eq!(samples[0].value, 0);
    }

    #[test]
    fn renders_text_exposition() {
        let text = render(&assemble(&device(), &broadband(ConnectionState::Up))).unwrap();
        assert!(text.contains("# HELP broadband_up Broadband is up"));
        assert!(text.contains("# TYPE broadband_up gauge"));
        let up_line = text
            .lines()
            .find(|line| line.starts_with("broadband_up{"))
            .expect("broadband_up sample");
        assert!(up_line.ends_with("} 1"));
        for pair in [
            r#"model_number="BGW320-500""#,
            r#"serial_number="S123""#,
            r#"software_version="4.27.7""#,
            r#"ip_address="99.1.2.3""#,
        ] {
            assert!(up_line.contains(pair), "{pair} missing from {up_line}");
        }
        assert!(text.contains("# TYPE uptime_total counter"));
        assert!(text.contains("uptime_total 183845"));
        assert!(text.contains("receive_bytes_total 123456"));
        assert!(text.contains("receive_packets_total 42"));
        assert!(text.contains("transmit_bytes_total 8000"));
        assert!(text.contains("transmit_packets_total 7"));
    }

    #[test]
    fn renders_in_assembled_order() {
        let text = render(&assemble(&device(), &broadband(ConnectionState::Up))).unwrap();
        let types: Vec<&str> = text
            .lines()
            .filter_map(|line| line.strip_prefix("# TYPE "))
            .collect();
        assert_eq!(
            types,
            vec![
                "broadband_up gauge",
                "uptime_total counter",
                "receive_bytes_total counter",
                "receive_packets_total counter",
                "transmit_bytes_total counter",
                "transmit_packets_total counter",
            ]
        );
    }

    #[test]
    fn counters_are_exact_up_to_float_precision() {
        let mut status = broadband(ConnectionState::Up);
        status.receive_bytes = 1 << 53;
        let text = render(&assemble(&device(), &status)).unwrap();
        assert!(text.contains("receive_bytes_total 9007199254740992"));
    }

    #[test]
    fn render_of_nothing_is_empty() {
        assert_eq!(render(&[]).unwrap(), "");
    }
}

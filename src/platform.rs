#[cfg(windows)]
const TEMPLATE: &str = r#"sc.exe create bgw-exporter binPath= "C:\bgw-exporter\bgw-exporter.exe --config C:\bgw-exporter\bgw-exporter.toml" start= auto
"#;

#[cfg(not(windows))]
const TEMPLATE: &str = r#"[Unit]
Description=BGW320 gateway Prometheus exporter
Wants=network-online.target
After=network-online.target

[Service]
ExecStart=/usr/local/bin/bgw-exporter --config /etc/bgw-exporter/bgw-exporter.toml
EnvironmentFile=-/etc/default/bgw-exporter
DynamicUser=yes
Restart=on-failure

[Install]
WantedBy=multi-user.target
"#;

pub fn platform_template() -> &'static str {
    TEMPLATE
}

pub fn log_platform_guidance() {
    tracing::debug!(
        template = platform_template(),
        "platform-specific service descriptor available"
    );
}

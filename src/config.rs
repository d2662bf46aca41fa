use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_port")]
    pub port: u16,
    /// Honour the `x-test-now-ms` request header.
    #[serde(default)]
    pub test_mode: bool,
    /// 0 disables the background sweeper.
    #[serde(default)]
    pub sweep_interval_secs: u64,
}
fn default_port() -> u16 { 3000 }

impl Default for Config {
    fn default() -> Self {
        Self { port: default_port(), test_mode: false, sweep_interval_secs: 0 }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let port = match std::env::var("PORT") {
            Ok(v) => v.parse().map_err(|e| anyhow::anyhow!("PORT={v:?} is not a port: {e}"))?,
            Err(_) => default_port(),
        };
        let test_mode = std::env::var("TEST_MODE").map(|v| v == "1").unwrap_or(false);
        let sweep_interval_secs = std::env::var("SWEEP_INTERVAL_SECS")
            .ok().and_then(|v| v.parse().ok()).unwrap_or(0);
        Ok(Self { port, test_mode, sweep_interval_secs })
    }
}

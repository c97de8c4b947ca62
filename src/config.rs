use clap::Parser;
use std::net::SocketAddr;
use std::path::Path;

/// Head-to-head match probability and fair odds engine
#[derive(Parser, Debug, Clone)]
#[command(name = "h2h-predictor", version, about)]
pub struct Config {
    /// API listen address
    #[arg(long, env = "API_ADDR", default_value = "0.0.0.0:8080")]
    pub api_addr: String,

    /// Fixed seed for the goal simulation (reproducible results); fresh
    /// entropy per request when unset
    #[arg(long, env = "SIM_SEED")]
    pub seed: Option<u64>,

    /// Analyze a JSON file of match records once and print the result
    /// instead of serving the API
    #[arg(long, env = "INPUT_PATH")]
    pub input: Option<String>,

    /// Host team label for one-shot mode
    #[arg(long, env = "HOST_TEAM")]
    pub host_team: Option<String>,

    /// Guest team label for one-shot mode
    #[arg(long, env = "GUEST_TEAM")]
    pub guest_team: Option<String>,

    /// Pretty-print JSON output in one-shot mode
    #[arg(long, env = "PRETTY", default_value = "false")]
    pub pretty: bool,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.api_addr.parse::<SocketAddr>().is_err() {
            anyhow::bail!("api_addr '{}' is not a valid socket address", self.api_addr);
        }
        if let Some(path) = &self.input {
            if !Path::new(path).is_file() {
                anyhow::bail!("input file '{}' does not exist", path);
            }
        }
        if self.input.is_none() && (self.host_team.is_some() || self.guest_team.is_some()) {
            anyhow::bail!("--host-team/--guest-team only apply together with --input");
        }
        Ok(())
    }
}

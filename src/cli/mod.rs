pub mod commands;

use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(name = "faas-netes")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Kubernetes function provider for a FaaS gateway", long_about = None)]
pub struct Cli {
    #[arg(short, long, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0", help = "Address to listen on")]
    pub bind: IpAddr,

    #[arg(short, long, env = "PORT", default_value_t = 8080, help = "Port to listen on")]
    pub port: u16,

    #[arg(
        short,
        long,
        env = "FUNCTION_NAMESPACE",
        default_value = "default",
        help = "Kubernetes namespace functions are deployed to"
    )]
    pub namespace: String,

    #[arg(
        long,
        env = "REQUEST_TIMEOUT_SECS",
        default_value_t = 10,
        help = "Timeout in seconds for each Kubernetes API call"
    )]
    pub request_timeout: u64,

    #[arg(long, env = "KUBECONFIG", help = "Path to a kubeconfig file")]
    pub kubeconfig: Option<PathBuf>,
}

/// Runtime settings derived from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    pub namespace: String,
    pub request_timeout: Duration,
    pub kubeconfig: Option<PathBuf>,
}

impl TryFrom<&Cli> for ServerConfig {
    type Error = crate::FaasError;

    fn try_from(cli: &Cli) -> crate::Result<Self> {
        if cli.namespace.trim().is_empty() {
            return Err(crate::FaasError::ConfigError(
                "namespace must not be empty".to_string(),
            ));
        }
        if cli.request_timeout == 0 {
            return Err(crate::FaasError::ConfigError(
                "request timeout must be at least one second".to_string(),
            ));
        }

        Ok(Self {
            addr: SocketAddr::new(cli.bind, cli.port),
            namespace: cli.namespace.clone(),
            request_timeout: Duration::from_secs(cli.request_timeout),
            kubeconfig: cli.kubeconfig.clone(),
        })
    }
}

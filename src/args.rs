use std::{net::SocketAddr, path::PathBuf};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(
    name = "github-hooks",
    about = "Receive webhooks for a GitHub App and answer pings"
)]
pub struct Args {
    /// The listen address and port
    ///
    /// The port and address where the server should listen to receive webhooks.
    /// Ignored when running inside AWS Lambda.
    #[structopt(short, long, default_value = "127.0.0.1:8000")]
    pub address: SocketAddr,

    /// The configuration file location
    ///
    /// Where the configuration file should be loaded from. When omitted, the
    /// configuration is read from the GITHUB_APP_ID, PRIVATE_KEY_SECRET_ARN and
    /// WEBHOOK_SECRET environment variables. The environment variable
    /// GITHUB_HOOKS_CONFIG can also be used.
    #[structopt(short, long, env = "GITHUB_HOOKS_CONFIG")]
    pub config: Option<PathBuf>,

    /// The minimum level to log at
    ///
    /// The minimum log level specification, supports the rust log format. The
    /// environment variable RUST_LOG can also be used.
    #[structopt(short, long, env = "RUST_LOG")]
    pub log_level: Option<String>,

    /// Set by the Lambda execution environment
    #[structopt(long, env = "AWS_LAMBDA_RUNTIME_API", hidden = true)]
    pub lambda_runtime_api: Option<String>,
}

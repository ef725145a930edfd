use anyhow::{anyhow, Context, Result};
use sentry::{
    integrations::{anyhow::capture_anyhow, tracing as sentry_tracing},
    ClientOptions, IntoDsn,
};
use std::{future::Future, net::SocketAddr, sync::Arc};
use structopt::StructOpt;
use tokio::signal::unix::{signal, SignalKind};
use tracing::info;
use tracing_subscriber::{
    fmt::format::FmtSpan, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};
use warp::Filter;

use args::Args;

mod args;
mod config;
mod github;
mod handlers;
mod http;
mod secrets;
mod webhooks;

use config::Config;
use github::{GitHub, Minter};
use handlers::PingHandler;
use webhooks::{Dispatcher, EventKind};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse the cli
    let cli = Args::from_args();

    // Get the configuration
    let configuration = match &cli.config {
        Some(path) => config::parse(path).await,
        None => config::from_env(),
    }
    .context("Failed to load configuration")?;
    let log_filter = cli
        .log_level
        .clone()
        .unwrap_or_else(|| configuration.log.clone());

    // Setup logging
    init_tracing(log_filter);

    // Initialize sentry
    let _guard = sentry::init(sentry_config(&configuration.sentry)?);

    match run(&cli, &configuration).await {
        Ok(()) => Ok(()),
        Err(e) => {
            capture_anyhow(&e);
            Err(e)
        }
    }
}

/// Connect to the services and start receiving webhooks
async fn run(cli: &Args, configuration: &Config) -> Result<()> {
    let dispatcher = Arc::new(build_dispatcher(configuration).await?);

    match &cli.lambda_runtime_api {
        Some(runtime) => {
            info!(%runtime, "running inside AWS Lambda");
            http::lambda::run(dispatcher).await.map_err(|e| anyhow!(e))
        }
        None => run_server(cli.address, dispatcher).await,
    }
}

/// Wire the event handlers to their dependencies
async fn build_dispatcher(configuration: &Config) -> Result<Dispatcher> {
    let secrets = secrets::from_config(&configuration.secrets).await;
    let issuer = GitHub::new(configuration.github.api_url.clone())
        .context("failed to build GitHub client")?;

    let minter = Minter::new(
        configuration.github.app_id.as_str(),
        configuration.secrets.private_key.as_str(),
        secrets,
        Arc::new(issuer),
    );

    Ok(Dispatcher::new(configuration.webhooks.secret.as_str())
        .register(EventKind::IssueComment, PingHandler::new(minter)))
}

/// Serve webhooks over HTTP until a shutdown signal is received
async fn run_server(address: SocketAddr, dispatcher: Arc<Dispatcher>) -> Result<()> {
    // Setup the routes
    let routes = http::routes(dispatcher).recover(http::recover);

    // Listen for shutdown before accepting any requests
    let shutdown = exit_signal().context("failed to install signal handlers")?;

    // Bind the server
    let (addr, server) = warp::serve(routes)
        .try_bind_with_graceful_shutdown(address, shutdown)
        .with_context(|| format!("failed to bind to {}", address))?;
    info!("listening on {}", addr);

    server.await;

    info!("successfully shutdown, good bye!");
    Ok(())
}

/// Install the SIGINT and SIGTERM handlers, the returned future resolves once
/// either signal is received
fn exit_signal() -> Result<impl Future<Output = ()>> {
    let mut int = signal(SignalKind::interrupt())?;
    let mut term = signal(SignalKind::terminate())?;

    Ok(async move {
        tokio::select! {
            _ = int.recv() => (),
            _ = term.recv() => (),
        }
        info!("signal received, shutting down...");
    })
}

/// Generate a registry for tracing
fn init_tracing<E: Into<EnvFilter>>(filter: E) {
    let sentry = sentry_tracing::layer();
    let fmt = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .finish();

    fmt.with(sentry).init();
}

/// Generate configuration for Sentry
fn sentry_config(url: &Option<String>) -> Result<ClientOptions> {
    let dsn = url
        .as_ref()
        .map(String::as_str)
        .map(IntoDsn::into_dsn)
        .transpose()
        .context("failed to parse Sentry DSN")?
        .flatten();

    let options = ClientOptions {
        dsn,
        release: sentry::release_name!(),
        attach_stacktrace: true,
        ..Default::default()
    };

    Ok(options)
}

#[cfg(test)]
mod tests {
    use super::exit_signal;
    use std::time::Duration;
    use tokio::time::timeout;

    #[tokio::test]
    async fn exit_signal_waits_for_a_signal() {
        let shutdown = exit_signal().expect("failed to install signal handlers");

        assert!(timeout(Duration::from_millis(50), shutdown).await.is_err());
    }
}

//! Webservice CLI
//!
//! The composition root: every dependency (config, HTTP client, transport,
//! activity log, surfaces, agencies) is built here and passed down.

#![allow(clippy::print_stdout, clippy::print_stderr)]

use anyhow::{anyhow, Context};
use console::style;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use webservice_framework::assets::AssetService;
use webservice_framework::cli::{Approach, Cli, Commands};
use webservice_framework::client::create_transport;
use webservice_framework::executor::{BlackBoxExecutor, ListenerFns, WhiteBoxExecutor};
use webservice_framework::house::{
    House, HouseOwnerDetails, NewsAgency, NewspaperAgent, TightlyCoupledHouse,
};
use webservice_framework::log::ActivityLog;
use webservice_framework::surface::{ConsoleSurface, ErrorSurface};
use webservice_framework::transport::{Payload, Transport};
use webservice_framework::{Config, FrameworkError};

#[tokio::main]
async fn main() {
    let exit_code = run().await;
    std::process::exit(exit_code);
}

/// Main application entry point
async fn run() -> i32 {
    let cli = Cli::parse_args();

    match execute(cli).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{} {err:#}", style("Error:").red().bold());
            err.downcast_ref::<FrameworkError>()
                .map_or(1, FrameworkError::exit_code)
        }
    }
}

/// Dependencies shared by the network commands
struct App {
    config: Config,
    transport: Arc<dyn Transport>,
    log: ActivityLog,
}

impl App {
    /// Build the object graph from the config file and command-line overrides
    fn compose(cli: &Cli) -> anyhow::Result<Self> {
        let mut config = match &cli.config {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        config.merge(&cli.overrides());
        config.validate()?;

        let transport: Arc<dyn Transport> =
            Arc::new(create_transport(&config).context("Failed to set up HTTP transport")?);
        let log = config
            .log_file
            .as_ref()
            .map_or_else(ActivityLog::disabled, |path| ActivityLog::to_file(path))
            .with_echo(config.verbose);

        Ok(Self {
            config,
            transport,
            log,
        })
    }

    fn white_box(&self) -> WhiteBoxExecutor {
        WhiteBoxExecutor::new(self.config.base_url.as_str(), Arc::clone(&self.transport))
            .with_log(self.log.clone())
    }
}

/// Execute the requested command
async fn execute(cli: Cli) -> anyhow::Result<()> {
    if cli.verbose {
        println!("Webservice v{}", env!("CARGO_PKG_VERSION"));
        println!("Verbose output enabled");
    }

    match &cli.command {
        Commands::Version => {
            println!("Webservice v{}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
        Commands::House {
            owner,
            agency,
            agents,
            coupled,
        } => handle_house(owner, agency, agents, *coupled),
        Commands::Config { save } => {
            let app = App::compose(&cli)?;
            print!("{}", toml::to_string_pretty(&app.config)?);
            if *save {
                let path = match &cli.config {
                    Some(path) => path.clone(),
                    None => Config::config_path()?,
                };
                app.config.save_to(&path)?;
                println!("{} Saved to {}", style("✓").green(), path.display());
            }
            Ok(())
        }
        Commands::Fetch { path, approach } => {
            let app = App::compose(&cli)?;
            match approach {
                Approach::WhiteBox => handle_fetch_white_box(&app, path).await,
                Approach::BlackBox => handle_fetch_black_box(&app, path).await,
            }
        }
        Commands::Assets { limit } => {
            let app = App::compose(&cli)?;
            handle_assets(&app, *limit).await
        }
    }
}

/// Caller-driven fetch: this function decides how the error is shown
async fn handle_fetch_white_box(app: &App, path: &str) -> anyhow::Result<()> {
    let executor = app.white_box();

    let (tx, rx) = oneshot::channel();
    let _handle = executor.perform_request(path, move |outcome| {
        let _ = tx.send(outcome);
    })?;
    let outcome = rx
        .await
        .context("Request finished without reporting an outcome")?;

    match outcome {
        Ok(payload) => {
            print_payload(&payload, app.config.verbose);
            Ok(())
        }
        Err(error) => {
            let surface = ConsoleSurface::new();
            executor.present_error(&error, &surface).wait().await;
            executor.acknowledge_error(&surface);
            Err(error.into())
        }
    }
}

/// Framework-driven fetch: the executor shows the error on its own
async fn handle_fetch_black_box(app: &App, path: &str) -> anyhow::Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel();
    let listener = ListenerFns::new(
        move |payload: Option<Payload>| {
            let _ = tx.send(payload);
        },
        || -> Arc<dyn ErrorSurface> { Arc::new(ConsoleSurface::new()) },
    );

    let executor = BlackBoxExecutor::new(app.config.base_url.as_str(), Arc::clone(&app.transport))
        .with_log(app.log.clone())
        .bind(listener);

    let mut handle = executor.perform_request(path)?;
    let state = handle.settled().await;

    match rx.try_recv().ok().flatten() {
        Some(payload) => print_payload(&payload, app.config.verbose),
        None => println!(
            "{} Request {} {} without a payload",
            style("·").dim(),
            handle.id(),
            state
        ),
    }
    Ok(())
}

/// List assets through a service that was handed its executor
async fn handle_assets(app: &App, limit: usize) -> anyhow::Result<()> {
    let service = AssetService::new(app.white_box());

    let (tx, rx) = oneshot::channel();
    let _handle = service.fetch_assets(move |result| {
        let _ = tx.send(result);
    })?;
    let assets = rx
        .await
        .context("Request finished without reporting an outcome")??;

    for asset in assets.data.iter().take(limit) {
        println!(
            "{:<8} {:<24} ${}",
            style(&asset.symbol).bold(),
            asset.name,
            asset.price_usd
        );
    }
    println!(
        "{} Showing {} of {} assets",
        style("✓").green(),
        assets.data.len().min(limit),
        assets.data.len()
    );
    Ok(())
}

/// Wire a house to its paper, either through an agency or to one agent
fn handle_house(owner: &str, agency: &str, agents: &[String], coupled: bool) -> anyhow::Result<()> {
    let owner = HouseOwnerDetails::new(owner);

    let paper = if coupled {
        let agent = agents
            .first()
            .map(|name| NewspaperAgent::new(name.as_str()))
            .ok_or_else(|| anyhow!("--coupled needs at least one --agent"))?;
        TightlyCoupledHouse::new(owner, agent).start_morning_activities()
    } else {
        let agency = agents.iter().fold(NewsAgency::new(agency), |agency, name| {
            agency.with_agent(NewspaperAgent::new(name.as_str()))
        });
        House::new(owner, Arc::new(agency)).start_morning_activities()?
    };

    println!(
        "{} {} received the paper from {}",
        style("✓").green(),
        style(&paper.owner).bold(),
        paper.delivered_by
    );
    Ok(())
}

/// Print a response body
fn print_payload(payload: &[u8], verbose: bool) {
    if verbose {
        println!("{} Received {} bytes", style("✓").green(), payload.len());
    }
    println!("{}", String::from_utf8_lossy(payload));
}

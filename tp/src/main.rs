//! Travel Planner - CLI entry point
//!
//! `tp serve` runs the itinerary gateway; `tp plan` drives the planner flows
//! against it from the terminal.

use std::sync::Arc;

use clap::Parser;
use colored::Colorize;
use eyre::{Context, Result, eyre};
use tracing::{debug, info, warn};

use travelplanner::cli::{Cli, Command, TripArgs};
use travelplanner::client::{
    HttpGateway, ItineraryView, LoadingFlow, LoadingOutcome, Orchestrator, PlannerForm, Route, SessionStorage,
};
use travelplanner::config::Config;
use travelplanner::gateway::{ItineraryParams, serve};
use travelplanner::llm::create_client;
use travelplanner::prompts::{PromptContext, PromptLoader};
use travelplanner::render;

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level) {
        Some(s) => match s.to_uppercase().as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .try_init()
        .map_err(|e| eyre!("Failed to install subscriber: {}", e))?;

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());

    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    info!("Travel planner loaded config: model={}", config.llm.model);

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Serve { host, port } => {
            debug!(?host, ?port, "main: matched Serve command");
            cmd_serve(config, host, port).await
        }
        Command::Plan { trip, api_url, modal } => {
            debug!(?api_url, modal, "main: matched Plan command");
            cmd_plan(&config, &trip, api_url, modal).await
        }
        Command::Prompt { trip } => {
            debug!("main: matched Prompt command");
            cmd_prompt(&config, &trip)
        }
    }
}

/// Run the gateway in the foreground
async fn cmd_serve(mut config: Config, host: Option<String>, port: Option<u16>) -> Result<()> {
    debug!("cmd_serve: called");
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let llm = create_client(&config.llm).context("Failed to create LLM client")?;
    serve(&config, llm).await
}

/// Walk the form, run the loading flow, then show the itinerary
async fn cmd_plan(config: &Config, trip: &TripArgs, api_url: Option<String>, modal: bool) -> Result<()> {
    debug!(destination = %trip.destination, modal, "cmd_plan: called");
    let storage = SessionStorage::new();
    let mut orchestrator = Orchestrator::new(storage.clone());
    if modal {
        orchestrator.open_generator();
    } else {
        orchestrator.navigate(Route::Generator);
    }
    println!("{}", render::heading(title(&orchestrator, "Plan Your Trip")));

    let mut form = PlannerForm::new();
    form.set_destination(&trip.destination);
    form.set_start_date(&trip.start);
    form.set_end_date(&trip.end);
    form.set_interests(&trip.interests);
    form.set_budget(trip.budget);
    form.set_pace(trip.pace);
    while form.next() {}
    if !form.can_continue() {
        println!("{}", render::form_steps(&form));
        return Err(eyre!("Missing input for step '{}'", form.step().label()));
    }
    println!("{}", render::form_steps(&form));

    let request = form.build_request().context("Invalid trip details")?;
    orchestrator
        .submit_form(&request)
        .context("Failed to store trip request")?;
    println!("{}", render::heading(title(&orchestrator, "Creating Your Itinerary")));

    let url = api_url.unwrap_or_else(|| config.client.api_url.clone());
    let flow = LoadingFlow::new(storage.clone(), Arc::new(HttpGateway::new(url)));
    let cancel = flow.cancel_token();
    let mut progress = flow.subscribe();
    let printer = tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            let line = render::progress_line(&progress.borrow_and_update());
            eprint!("\r{}", line);
        }
        eprintln!();
    });

    let outcome = tokio::select! {
        outcome = flow.run() => outcome,
        _ = tokio::signal::ctrl_c() => {
            warn!("Interrupted, cancelling generation");
            cancel.cancel();
            LoadingOutcome::Cancelled
        }
    };
    if let Err(e) = printer.await {
        debug!(error = %e, "cmd_plan: progress printer failed");
    }

    match outcome {
        LoadingOutcome::Complete { id } => {
            orchestrator.loading_complete(&id);
            println!("{}", render::heading(title(&orchestrator, "Your Travel Itinerary")));
            let view = ItineraryView::load(storage, id);
            let today = chrono::Local::now().date_naive();
            println!("{}", render::itinerary(&view, today));
            Ok(())
        }
        LoadingOutcome::Failed(err) => {
            eprintln!("{} {}", "✗".red(), err.to_string().red());
            eprintln!("  [{}]", err.recovery().label());
            Err(eyre!(err))
        }
        LoadingOutcome::Cancelled => {
            println!("Cancelled");
            Ok(())
        }
    }
}

/// Overlay title when the overlay is open, page title otherwise
fn title<'a>(orchestrator: &Orchestrator, page_title: &'a str) -> &'a str {
    orchestrator.overlay_title().unwrap_or(page_title)
}

/// Print the rendered prompts for a trip
fn cmd_prompt(config: &Config, trip: &TripArgs) -> Result<()> {
    debug!(destination = %trip.destination, "cmd_prompt: called");
    let params = ItineraryParams {
        destination: trip.destination.clone(),
        start_date: trip.start.clone(),
        end_date: trip.end.clone(),
        interests: trip
            .interests
            .split(',')
            .map(|i| i.trim().to_string())
            .filter(|i| !i.is_empty())
            .collect(),
        budget: trip.budget.to_string(),
        pace: trip.pace.to_string(),
    };

    let loader = PromptLoader::new(config.prompts.dir.as_deref());
    let system = loader.system_prompt().context("Failed to render system prompt")?;
    let prompt = loader
        .itinerary_prompt(&PromptContext::from(&params))
        .context("Failed to render itinerary prompt")?;

    println!("{}\n{}\n", "System:".bold(), system);
    println!("{}\n{}", "User:".bold(), prompt);
    Ok(())
}

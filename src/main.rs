use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use booking_agent::config::{self, Config};
use booking_agent::models::booking::Booking;
use booking_agent::store::sqlite::SqliteStore;
use booking_agent::{api, AppState};

mod cli;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;

    let cfg = config::load()?;
    let args = cli::Cli::parse();

    let result = match args.command {
        Some(cli::Commands::Serve { port }) => {
            let port = port.unwrap_or(cfg.port);
            run_server(cfg, port).await
        }
        Some(cli::Commands::Migrate) => {
            let db = connect(&cfg).await?;
            db.migrate().await?;
            println!("Schema is up to date ({}).", cfg.database_url);
            Ok(())
        }
        Some(cli::Commands::Bookings { command }) => {
            let db = connect(&cfg).await?;
            db.migrate().await?;
            handle_bookings_command(&db, command).await
        }
        None => {
            let port = cfg.port;
            run_server(cfg, port).await
        }
    };

    if let Err(ref e) = result {
        eprintln!("Error: {:?}", e);
    }
    result
}

/// Console logging filtered by RUST_LOG, plus OTLP export when
/// OTEL_EXPORTER_OTLP_ENDPOINT is set.
fn init_tracing() -> anyhow::Result<()> {
    use opentelemetry::KeyValue;
    use opentelemetry_sdk::{trace as sdktrace, Resource};

    let telemetry_layer = if std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT").is_ok() {
        let tracer = opentelemetry_otlp::new_pipeline()
            .tracing()
            .with_exporter(opentelemetry_otlp::new_exporter().tonic())
            .with_trace_config(sdktrace::config().with_resource(Resource::new(vec![
                KeyValue::new("service.name", "booking-agent"),
            ])))
            .install_batch(opentelemetry_sdk::runtime::Tokio)?;
        Some(tracing_opentelemetry::layer().with_tracer(tracer))
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "booking_agent=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .with(telemetry_layer)
        .init();

    Ok(())
}

async fn connect(cfg: &Config) -> anyhow::Result<SqliteStore> {
    tracing::info!("Connecting to database {}...", cfg.database_url);
    Ok(SqliteStore::connect(&cfg.database_url, cfg.max_connections).await?)
}

async fn run_server(cfg: Config, port: u16) -> anyhow::Result<()> {
    let db = connect(&cfg).await?;

    tracing::info!("Running migrations...");
    db.migrate().await?;

    let state = Arc::new(AppState { db, config: cfg });
    let app = api::router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("booking agent listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

async fn handle_bookings_command(
    db: &SqliteStore,
    cmd: cli::BookingCommands,
) -> anyhow::Result<()> {
    let bookings = match cmd {
        cli::BookingCommands::List { limit } => db.list_bookings(limit).await?,
        cli::BookingCommands::Find { reference } => db.find_by_reference(&reference).await?,
    };

    if bookings.is_empty() {
        println!("No bookings found.");
        return Ok(());
    }

    print_bookings(&bookings);
    Ok(())
}

fn print_bookings(bookings: &[Booking]) {
    println!(
        "{:<38} {:<16} {:<20} {:<16} {:<12} {:<8} {:<6} BOOKED AT",
        "ID", "REFERENCE", "PROVIDER", "SERVICE", "DATE", "SLOT", "SPOTS"
    );
    for b in bookings {
        let spots = b
            .available_spots
            .map(|s| s.to_string())
            .unwrap_or_else(|| "-".into());
        println!(
            "{:<38} {:<16} {:<20} {:<16} {:<12} {:<8} {:<6} {}",
            b.id,
            b.booking_reference,
            b.provider_name,
            b.service_type,
            b.date,
            b.time_slot,
            spots,
            b.booked_at.format("%Y-%m-%d %H:%M:%S")
        );
    }
}

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use serde_json::json;
use tracing_subscriber::EnvFilter;

use cinematch::{
    api::{create_router, AppState},
    cli::{self, Cli},
    config::Config,
    data,
    services::{Recommender, TmdbClient},
};

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => return startup_failure(e.to_string()),
    };

    let recommender = match data::build_recommender(&config).await {
        Ok(recommender) => recommender,
        Err(e) => return startup_failure(e.to_string()),
    };
    let recommender = match cli.top_n {
        Some(top_n) => recommender.with_default_top_n(top_n as usize),
        None => recommender,
    };

    if cli.serve {
        if let Err(e) = serve(recommender, &config).await {
            tracing::error!(error = %e, "Server stopped");
            return ExitCode::FAILURE;
        }
        return ExitCode::SUCCESS;
    }

    if let Some(query) = cli.query() {
        println!("{}", cli::single_shot(&recommender, &query));
        return ExitCode::SUCCESS;
    }

    let recommender = Arc::new(recommender);
    let session = tokio::task::spawn_blocking(move || {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        cli::run_interactive(&recommender, stdin.lock(), stdout.lock())
    })
    .await;

    match session {
        Ok(Ok(())) => ExitCode::SUCCESS,
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Interactive session failed");
            ExitCode::FAILURE
        }
        Err(e) => {
            tracing::error!(error = %e, "Interactive session aborted");
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; stdout carries only results
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("cinematch=info,tower_http=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn startup_failure(cause: String) -> ExitCode {
    tracing::error!(error = %cause, "Startup failed");
    println!("{}", json!({ "error": format!("Failed to load data: {}", cause) }));
    ExitCode::from(1)
}

async fn serve(recommender: Recommender, config: &Config) -> anyhow::Result<()> {
    let mut state = AppState::new(recommender);
    match config.tmdb_key() {
        Some(key) => {
            let client = TmdbClient::new(key.to_string(), config.tmdb_api_url.clone());
            state = state.with_movie_db(Arc::new(client));
            tracing::info!(api_url = %config.tmdb_api_url, "TMDB provider enabled");
        }
        None => tracing::warn!("TMDB_API_KEY not set; posters and TMDB routes disabled"),
    }
    let app = create_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server running");
    axum::serve(listener, app).await?;
    Ok(())
}

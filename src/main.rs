use std::process::ExitCode;

use dotenvy::dotenv;

use threeb::{create_router, AppState, Config};

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let addr = format!("0.0.0.0:{}", config.port);
    log::info!("using API at {} (assignments at {})", config.api_base_url, config.assignment_api_url);

    let state = match AppState::new(config) {
        Ok(state) => state,
        Err(e) => {
            log::error!("failed to build API client: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let app = create_router(state);

    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            log::error!("failed to bind {}: {}", addr, e);
            return ExitCode::FAILURE;
        }
    };
    log::info!("dashboard listening on http://{}", addr);

    if let Err(e) = axum::serve(listener, app).await {
        log::error!("server error: {}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

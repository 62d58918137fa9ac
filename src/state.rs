use std::sync::Arc;

use crate::{api::ApiClient, config::Config, error::ApiError, scanner::Scanner, vehicles::VehicleCache};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub api: ApiClient,
    pub scanner: Scanner,
    pub vehicles: VehicleCache,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self, ApiError> {
        let api = ApiClient::new(&config)?;
        let scanner = Scanner::new(config.scan_idle);

        Ok(Self {
            config: Arc::new(config),
            api,
            scanner,
            vehicles: VehicleCache::new(),
        })
    }
}

pub mod config;
pub mod db;
pub mod dtos;
pub mod error;
pub mod handler;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod search;
pub mod service;
pub mod utils;

use std::sync::Arc;

use config::Config;
use db::db::DBClient;
use middleware::rate_limit::RateLimiter;
use search::VariationTable;
use service::{
    chat_service::ChatService, lead_service::LeadService, listing_service::ListingService,
    notification_service::NotificationService,
};

#[derive(Debug, Clone)]
pub struct AppState {
    pub env: Config,
    pub db_client: Arc<DBClient>,
    pub variations: Arc<VariationTable>,
    // Services
    pub listing_service: Arc<ListingService>,
    pub notification_service: Arc<NotificationService>,
    pub chat_service: Arc<ChatService>,
    pub lead_service: Arc<LeadService>,
    pub lead_limiter: Arc<RateLimiter>,
}

impl AppState {
    pub fn new(db_client: DBClient, config: Config, variations: VariationTable) -> Self {
        let db_client_arc = Arc::new(db_client);
        let variations = Arc::new(variations);

        let listing_service = Arc::new(ListingService::new(db_client_arc.clone(), variations.clone()));
        let notification_service = Arc::new(NotificationService::new(db_client_arc.clone()));
        let chat_service = Arc::new(ChatService::new(db_client_arc.clone(), notification_service.clone()));
        let lead_service = Arc::new(LeadService::new(db_client_arc.clone(), notification_service.clone()));
        let lead_limiter = Arc::new(RateLimiter::per_minute(config.lead_rate_limit));

        Self {
            env: config,
            db_client: db_client_arc,
            variations,
            listing_service,
            notification_service,
            chat_service,
            lead_service,
            lead_limiter,
        }
    }
}

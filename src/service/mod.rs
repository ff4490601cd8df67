pub mod background_jobs;
pub mod chat_service;
pub mod error;
pub mod lead_service;
pub mod listing_service;
pub mod notification_service;

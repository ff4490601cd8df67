// service/background_jobs.rs
use std::sync::Arc;

use chrono::Utc;
use tokio::time::{interval, Duration};

use crate::{db::propertydb::PropertyExt, AppState};

/// Publish drafts whose scheduled publish time has passed. Runs every minute.
pub async fn start_scheduled_publish_job(app_state: Arc<AppState>) {
    let mut interval = interval(Duration::from_secs(60));

    loop {
        interval.tick().await;

        match app_state.db_client.publish_due_properties(Utc::now()).await {
            Ok(published) if published.is_empty() => {}
            Ok(published) => {
                for property in &published {
                    tracing::info!("Scheduled listing {} ({}) is now published", property.id, property.slug);
                }
            }
            Err(e) => tracing::error!("Scheduled publish job failed: {}", e),
        }
    }
}

pub mod buyersearchdb;
pub mod chatdb;
pub mod db;
pub mod messagedb;
pub mod notificationdb;
pub mod propertydb;

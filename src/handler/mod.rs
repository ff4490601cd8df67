pub mod buyer_searches;
pub mod chat;
pub mod messages;
pub mod notifications;
pub mod properties;

pub mod decimal;
pub mod slug;

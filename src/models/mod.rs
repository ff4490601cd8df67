pub mod buyersearchmodel;
pub mod chatmodels;
pub mod messagemodel;
pub mod notificationmodel;
pub mod propertymodel;

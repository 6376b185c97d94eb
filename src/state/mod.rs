pub mod app_settings;
pub mod app_state;
pub mod dialog;
pub mod messages;
pub mod network;

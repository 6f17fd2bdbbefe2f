//! HTTP handlers.

mod config;
mod notify;
mod proxy;
mod update;

pub use config::{config_handler, reload_handler};
pub use notify::notify_check_handler;
pub use proxy::proxy_handler;
pub use update::{update_handler, update_types_handler};

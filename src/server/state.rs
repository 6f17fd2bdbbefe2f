//! Shared handler state.

use std::sync::Arc;

use crate::dispatch::Dispatcher;
use crate::notify::StalenessNotifier;
use crate::proxy::Proxy;
use crate::settings::SettingsResolver;

/// State shared by every handler.
///
/// The dispatcher and the notifier go through the same relay as `/proxy`.
#[derive(Clone)]
pub struct AppState {
    /// Settings shared with the dispatcher and notifier
    pub settings: Arc<SettingsResolver>,
    /// Relay behind `/proxy`
    pub proxy: Arc<Proxy>,
    /// Category fan-out behind `/update`
    pub dispatcher: Arc<Dispatcher<Arc<Proxy>>>,
    /// Staleness checks behind `/notify/check`
    pub notifier: Arc<StalenessNotifier<Arc<Proxy>>>,
}

impl AppState {
    /// Wires the dispatcher and notifier to one shared relay.
    pub fn new(settings: Arc<SettingsResolver>, proxy: Proxy) -> Self {
        let proxy = Arc::new(proxy);
        Self {
            dispatcher: Arc::new(Dispatcher::new(Arc::clone(&settings), Arc::clone(&proxy))),
            notifier: Arc::new(StalenessNotifier::new(
                Arc::clone(&settings),
                Arc::clone(&proxy),
            )),
            settings,
            proxy,
        }
    }
}

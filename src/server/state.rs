use crate::server::model::config::StreamConfig;
use crate::server::store::bus::EventBus;
use crate::server::store::Store;
use tokio_util::sync::CancellationToken;

/// Shared by every worker. Built once in `main`.
pub(crate) struct AppState {
    store: Store,
    stream_config: StreamConfig,
    shutdown: CancellationToken,
}

impl AppState {
    pub fn new(stream_config: StreamConfig, shutdown: CancellationToken) -> Self {
        Self {
            store: Store::new(EventBus::new(stream_config.buffer_size)),
            stream_config,
            shutdown,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn stream_config(&self) -> StreamConfig {
        self.stream_config
    }

    /// cancelled once the server starts shutting down
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn app_state() {
        let token = CancellationToken::new();
        let state = AppState::new(StreamConfig::default(), token.clone());
        assert!(state.store().list_hotels().is_empty());
        assert_eq!(state.stream_config().buffer_size, StreamConfig::default().buffer_size);
        token.cancel();
        assert!(state.shutdown_token().is_cancelled());
    }
}

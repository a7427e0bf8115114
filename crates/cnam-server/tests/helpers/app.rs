//! Router wired to an in-memory store and a scripted provider.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use cnam_cache::{CacheBackend, CacheStore, MemoryBackend, MonitorConfig};
use cnam_core::{CanonicalKey, LookupResult, normalize};
use cnam_server::metrics::detached_handle;
use cnam_server::{AppState, CnamProvider, ProviderError, create_router};

use super::client::TestClient;

/// Parsea un numero que se sabe valido.
pub fn key(number: &str) -> CanonicalKey {
    normalize(number).unwrap()
}

/// Provider que responde siempre el mismo nombre, o falla.
pub struct StubProvider {
    name: Mutex<String>,
    failing: AtomicBool,
    calls: AtomicUsize,
    correlation_ids: Mutex<Vec<String>>,
}

impl StubProvider {
    pub fn new(name: &str) -> Self {
        Self {
            name: Mutex::new(name.to_string()),
            failing: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            correlation_ids: Mutex::new(Vec::new()),
        }
    }

    pub fn set_name(&self, name: &str) {
        *self.name.lock().unwrap() = name.to_string();
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn correlation_ids(&self) -> Vec<String> {
        self.correlation_ids.lock().unwrap().clone()
    }
}

#[async_trait]
impl CnamProvider for StubProvider {
    async fn lookup(
        &self,
        key: &CanonicalKey,
        correlation_id: &str,
    ) -> Result<LookupResult, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.correlation_ids
            .lock()
            .unwrap()
            .push(correlation_id.to_string());

        if self.failing.load(Ordering::SeqCst) {
            return Err(ProviderError::Status {
                status: 503,
                body: "provider down".to_string(),
            });
        }

        let name = self.name.lock().unwrap().clone();
        Ok(LookupResult::new(name, Some(key.clone())))
    }

    fn name(&self) -> &str {
        "stub"
    }
}

/// Aplicacion completa para tests de integracion.
pub struct TestApp {
    pub backend: Arc<MemoryBackend>,
    pub store: Arc<CacheStore>,
    pub provider: Arc<StubProvider>,
    pub client: TestClient,
}

impl TestApp {
    /// Store alcanzable y ya verificado por el monitor.
    pub async fn healthy() -> Self {
        let app = Self::build();
        assert!(app.store.monitor().probe().await);
        app
    }

    /// Store que el monitor nunca pudo verificar.
    pub fn degraded() -> Self {
        Self::build()
    }

    fn build() -> Self {
        let backend = Arc::new(MemoryBackend::new());
        let store = Arc::new(CacheStore::connect(
            backend.clone() as Arc<dyn CacheBackend>,
            MonitorConfig::default(),
        ));
        let provider = Arc::new(StubProvider::new("SAMPLE"));

        let state = AppState::from_parts(store.clone(), provider.clone());
        let client = TestClient::new(create_router(state, detached_handle()));

        Self {
            backend,
            store,
            provider,
            client,
        }
    }

    /// Lee el backend directamente, sin pasar por el store.
    pub async fn stored(&self, key: &CanonicalKey) -> Option<LookupResult> {
        self.backend
            .find(key)
            .await
            .unwrap()
            .map(|record| record.decode().unwrap())
    }

    /// Espera a que la escritura en segundo plano llegue al backend.
    pub async fn wait_until_stored(&self, key: &CanonicalKey) -> LookupResult {
        for _ in 0..100 {
            if let Some(result) = self.stored(key).await {
                return result;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("Result for {key} was never cached");
    }

    /// Da tiempo a que una escritura en segundo plano ocurra, si la hubiera.
    pub async fn settle(&self) {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}

use crate::domain::radar::{Nation, RadarData};
use crate::time::month::Month;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Process-lifetime cache of computed radar payloads, keyed by
/// `(month, nation)`. Unbounded; concurrent writers for the same key simply
/// overwrite each other with equivalent data.
#[derive(Debug, Default, Clone)]
pub struct RadarCache {
    inner: Arc<RwLock<HashMap<(Month, Nation), Arc<RadarData>>>>,
}

impl RadarCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn get(&self, month: Month, nation: Nation) -> Option<Arc<RadarData>> {
        self.inner.read().await.get(&(month, nation)).cloned()
    }

    pub async fn insert(&self, data: RadarData) -> Arc<RadarData> {
        let data = Arc::new(data);
        self.inner
            .write()
            .await
            .insert((data.month, data.nation), Arc::clone(&data));
        data
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }

    pub async fn clear(&self) {
        self.inner.write().await.clear();
    }
}

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared by reference with every pool spawned from one client.
pub type SharedOffsetCache = Arc<RwLock<OffsetCache>>;

/// Last observed offset per (topic, partition).
///
/// Entries are only inserted or overwritten, never removed.
#[derive(Debug, Default)]
pub struct OffsetCache {
    store: HashMap<String, HashMap<u32, u64>>, // topic -> partition -> offset
}

impl OffsetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn shared() -> SharedOffsetCache {
        Arc::new(RwLock::new(Self::new()))
    }

    /// Last writer wins.
    pub fn update(&mut self, topic: &str, partition: u32, offset: u64) {
        self.store
            .entry(topic.to_string())
            .or_default()
            .insert(partition, offset);
    }

    pub fn fetch(&self, topic: &str, partition: u32) -> Option<u64> {
        self.store
            .get(topic)
            .and_then(|m| m.get(&partition))
            .copied()
    }

    /// Partition offsets for one topic, ordered by partition.
    pub fn topic_offsets(&self, topic: &str) -> Vec<(u32, u64)> {
        let mut offsets: Vec<(u32, u64)> = self
            .store
            .get(topic)
            .map(|m| m.iter().map(|(p, o)| (*p, *o)).collect())
            .unwrap_or_default();
        offsets.sort_unstable_by_key(|(p, _)| *p);
        offsets
    }

    pub fn len(&self) -> usize {
        self.store.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

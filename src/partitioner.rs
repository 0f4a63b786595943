use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use xxhash_rust::xxh3::xxh3_64;

pub struct PartitionerArgs<'a> {
    pub topic: &'a str,
    pub key: Option<&'a [u8]>,
    pub partition_count: u32,
}

/// Picks the partition a record is written to.
pub trait Partitioner: Send + Sync {
    fn partition(&self, args: &PartitionerArgs<'_>) -> u32;
}

/// Builds one partitioner per producer.
pub type CreatePartitioner = Arc<dyn Fn() -> Box<dyn Partitioner> + Send + Sync>;

/// Keyed records hash to a fixed partition, unkeyed ones rotate.
#[derive(Debug, Default)]
pub struct DefaultPartitioner {
    next_partition: AtomicU32,
}

impl DefaultPartitioner {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Partitioner for DefaultPartitioner {
    fn partition(&self, args: &PartitionerArgs<'_>) -> u32 {
        if args.partition_count == 0 {
            return 0;
        }
        match args.key {
            Some(key) => hash_key_to_partition(key, args.partition_count),
            None => self.next_partition.fetch_add(1, Ordering::Relaxed) % args.partition_count,
        }
    }
}

/// Ignores keys entirely.
#[derive(Debug, Default)]
pub struct RoundRobinPartitioner {
    next_partition: AtomicU32,
}

impl Partitioner for RoundRobinPartitioner {
    fn partition(&self, args: &PartitionerArgs<'_>) -> u32 {
        if args.partition_count == 0 {
            return 0;
        }
        self.next_partition.fetch_add(1, Ordering::Relaxed) % args.partition_count
    }
}

pub fn hash_key_to_partition(key: &[u8], partition_count: u32) -> u32 {
    let hash = xxh3_64(key);
    (hash as u32) % partition_count
}

pub fn default_partitioner() -> CreatePartitioner {
    Arc::new(|| Box::new(DefaultPartitioner::new()) as Box<dyn Partitioner>)
}

pub fn round_robin_partitioner() -> CreatePartitioner {
    Arc::new(|| Box::new(RoundRobinPartitioner::default()) as Box<dyn Partitioner>)
}

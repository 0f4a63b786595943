mod common;

use std::time::Duration;

use tributary::{
    AdminOptions, AssignerProtocol, ClientError, ClusterError, ConsumerOptions, ProducerOptions,
    TopicPartitionOffset,
};

use crate::common::{client_with_sink, closed_port, local_broker, test_client};

#[tokio::test]
async fn test_connect_emits_events_on_the_pool_channel_only() {
    let (_listener, addr) = local_broker().await;
    let (client, _sink) = client_with_sink([addr.clone()]);

    let producer = client.producer(ProducerOptions::default()).unwrap();
    let other = client.producer(ProducerOptions::default()).unwrap();
    let mut rx = producer.events().subscribe();
    let mut other_rx = other.events().subscribe();

    producer.connect().await.expect("connect to local broker");
    assert!(producer.cluster().is_connected().await);
    assert_eq!(producer.cluster().connected_broker().await, Some(addr.clone()));
    assert!(producer.cluster().peer_addr().await.is_some());

    let network = rx.recv().await.expect("network event");
    assert_eq!(network.kind, "network.connect");
    assert_eq!(network.payload["broker"], addr.as_str());
    let role = rx.recv().await.expect("producer event");
    assert_eq!(role.kind, "producer.connect");

    assert!(other_rx.try_recv().is_err());
    assert!(!other.cluster().is_connected().await);

    producer.disconnect().await;
    assert!(!producer.cluster().is_connected().await);
    assert_eq!(rx.recv().await.unwrap().kind, "network.disconnect");
    assert_eq!(rx.recv().await.unwrap().kind, "producer.disconnect");
}

#[tokio::test]
async fn test_connect_skips_unreachable_seed_brokers() {
    let dead = closed_port().await;
    let (_listener, live) = local_broker().await;
    let (client, sink) = client_with_sink([dead.clone(), live.clone()]);

    let admin = client.admin(AdminOptions::default()).unwrap();
    admin.connect().await.expect("second broker is reachable");

    assert_eq!(admin.cluster().connected_broker().await, Some(live));
    assert!(sink
        .messages()
        .iter()
        .any(|m| m == "Failed to connect to seed broker"));
}

#[tokio::test]
async fn test_connect_failure_passes_through_cluster_error() {
    let first = closed_port().await;
    let second = closed_port().await;
    let (client, _sink) = client_with_sink([first.clone(), second.clone()]);

    let consumer = client.consumer(ConsumerOptions::new("g")).unwrap();
    let err = consumer.connect().await.unwrap_err();

    match err {
        ClientError::Cluster(ClusterError::NoBrokersReachable { attempted }) => {
            assert_eq!(attempted, vec![first, second]);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!consumer.cluster().is_connected().await);
}

#[tokio::test]
async fn test_pool_never_regresses_its_own_offsets() {
    let client = test_client();
    let consumer = client.consumer(ConsumerOptions::new("g")).unwrap();

    assert!(consumer.cluster().observe_offset("events", 0, 10).await);
    assert!(!consumer.cluster().observe_offset("events", 0, 7).await);
    assert_eq!(consumer.committed("events", 0).await, Some(10));

    assert!(consumer.cluster().observe_offset("events", 0, 10).await);
    assert!(consumer.cluster().observe_offset("events", 0, 12).await);
    assert_eq!(consumer.committed("events", 0).await, Some(12));
}

#[tokio::test]
async fn test_last_writer_wins_across_pools() {
    let client = test_client();
    let ahead = client.consumer(ConsumerOptions::new("a")).unwrap();
    let behind = client.consumer(ConsumerOptions::new("b")).unwrap();

    ahead.commit_offsets(&[TopicPartitionOffset::new("events", 1, 50)]).await;
    // a different pool has not seen 50, so its older write still lands
    behind.commit_offsets(&[TopicPartitionOffset::new("events", 1, 20)]).await;

    assert_eq!(ahead.committed("events", 1).await, Some(20));
    assert_eq!(client.offsets().read().await.fetch("events", 1), Some(20));
}

#[tokio::test]
async fn test_commit_offsets_reports_applied_count() {
    let client = test_client();
    let consumer = client.consumer(ConsumerOptions::new("g")).unwrap();

    let applied = consumer
        .commit_offsets(&[
            TopicPartitionOffset::new("events", 0, 5),
            TopicPartitionOffset::new("events", 1, 9),
        ])
        .await;
    assert_eq!(applied, 2);

    let applied = consumer
        .commit_offsets(&[
            TopicPartitionOffset::new("events", 0, 3),
            TopicPartitionOffset::new("events", 1, 10),
        ])
        .await;
    assert_eq!(applied, 1);
    assert_eq!(consumer.committed("events", 0).await, Some(5));
    assert_eq!(consumer.committed("events", 1).await, Some(10));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_pools_write_the_same_cache() {
    let client = test_client();

    let mut handles = Vec::new();
    for partition in 0..8u32 {
        let consumer = client
            .consumer(ConsumerOptions::new(format!("group-{partition}")))
            .unwrap();
        handles.push(tokio::spawn(async move {
            for offset in 0..100u64 {
                consumer.cluster().observe_offset("load", partition, offset).await;
            }
        }));
    }
    for handle in handles {
        handle.await.expect("writer task panicked");
    }

    let cache = client.offsets();
    let cache = cache.read().await;
    for partition in 0..8u32 {
        assert_eq!(cache.fetch("load", partition), Some(99));
    }
    assert_eq!(cache.len(), 8);
}

#[tokio::test]
async fn test_connect_is_idempotent_while_connected() {
    let (_listener, addr) = local_broker().await;
    let (client, _sink) = client_with_sink([addr]);
    let admin = client.admin(AdminOptions::default()).unwrap();

    admin.connect().await.unwrap();
    let mut rx = admin.events().subscribe();
    admin.connect().await.unwrap();

    // only the role event, no second network.connect
    let event = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("event in time")
        .unwrap();
    assert_eq!(event.kind, "admin.connect");
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_consumer_connect_event_names_its_assigners() {
    let (_listener, addr) = local_broker().await;
    let (client, _sink) = client_with_sink([addr]);
    let consumer = client
        .consumer(ConsumerOptions::new("billing").partition_assigners(vec![
            AssignerProtocol::Custom("sticky".into()),
            AssignerProtocol::RoundRobin,
        ]))
        .unwrap();
    let mut rx = consumer.events().subscribe();

    consumer.connect().await.unwrap();
    assert_eq!(rx.recv().await.unwrap().kind, "network.connect");
    let event = rx.recv().await.unwrap();
    assert_eq!(event.kind, "consumer.connect");
    assert_eq!(event.payload["group_id"], "billing");
    assert_eq!(
        event.payload["partition_assigners"],
        serde_json::json!(["sticky", "RoundRobinAssigner"])
    );
}

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use handoff::{AsyncSingleSlotChannel, ErrorKind, Message, SingleSlotChannel};
use rand::Rng;

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn jitter(rng: &mut impl Rng) {
    match rng.random_range(0..4) {
        0 => thread::yield_now(),
        1 => thread::sleep(Duration::from_micros(rng.random_range(1..50))),
        _ => {}
    }
}

#[test]
fn test_reads_match_writes_in_order() {
    init_logger();
    let channel = Arc::new(SingleSlotChannel::<u64>::new());
    let sent: Vec<u64> = (0..1_000).map(|i| i * 7 % 13).collect();

    let producer = {
        let channel = Arc::clone(&channel);
        let sent = sent.clone();
        thread::spawn(move || {
            for value in sent {
                channel.send(value, "producer").unwrap();
            }
        })
    };

    let received: Vec<u64> = (0..sent.len())
        .map(|_| channel.read("consumer").into_payload().unwrap())
        .collect();
    producer.join().unwrap();

    assert_eq!(received, sent);
}

#[test]
fn test_slot_empty_after_matching_reads() {
    let channel = SingleSlotChannel::new();
    for value in 0..10u32 {
        channel.send(value, "producer").unwrap();
        assert_eq!(channel.read("consumer"), Message::Payload(value));
    }

    // Nothing left to read, and the producer holds the turn again.
    let err = channel
        .read_timeout("consumer", Duration::from_millis(10))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Timeout);
    channel
        .write_timeout(Message::Payload(99), "producer", Duration::from_millis(10))
        .unwrap();
}

#[test]
fn test_consumer_loop_terminates_after_sentinel() {
    init_logger();
    const K: usize = 25;
    let channel = Arc::new(SingleSlotChannel::<usize>::new());

    let producer = {
        let channel = Arc::clone(&channel);
        thread::spawn(move || {
            for value in 0..K {
                channel.send(value, "producer").unwrap();
            }
            channel.close("producer").unwrap();
        })
    };

    let mut reads = 0;
    let mut processed = Vec::new();
    loop {
        let message = channel.read("consumer");
        reads += 1;
        match message {
            Message::Payload(value) => processed.push(value),
            Message::EndOfStream => break,
        }
    }
    producer.join().unwrap();

    assert_eq!(reads, K + 1);
    assert_eq!(processed, (0..K).collect::<Vec<_>>());
    assert!(channel.is_closed());
}

#[test]
fn test_read_blocks_until_write() {
    let channel = Arc::new(SingleSlotChannel::<u32>::new());
    let progressed = Arc::new(AtomicBool::new(false));

    let consumer = {
        let channel = Arc::clone(&channel);
        let progressed = Arc::clone(&progressed);
        thread::spawn(move || {
            let message = channel.read("consumer");
            progressed.store(true, Ordering::SeqCst);
            message
        })
    };

    thread::sleep(Duration::from_millis(50));
    assert!(!progressed.load(Ordering::SeqCst));

    channel.send(11u32, "producer").unwrap();
    assert_eq!(consumer.join().unwrap(), Message::Payload(11));
    assert!(progressed.load(Ordering::SeqCst));
}

#[test]
fn test_write_blocks_until_read() {
    let channel = Arc::new(SingleSlotChannel::new());
    channel.send(1u32, "producer").unwrap();
    let writes = Arc::new(AtomicUsize::new(0));

    let producer = {
        let channel = Arc::clone(&channel);
        let writes = Arc::clone(&writes);
        thread::spawn(move || {
            channel.send(2, "producer").unwrap();
            writes.fetch_add(1, Ordering::SeqCst);
        })
    };

    thread::sleep(Duration::from_millis(50));
    assert_eq!(writes.load(Ordering::SeqCst), 0);

    assert_eq!(channel.read("consumer"), Message::Payload(1));
    producer.join().unwrap();
    assert_eq!(writes.load(Ordering::SeqCst), 1);
    assert_eq!(channel.read("consumer"), Message::Payload(2));
}

#[test]
fn test_scenario_three_values() {
    init_logger();
    let channel = Arc::new(SingleSlotChannel::<i32>::new());

    let producer = {
        let channel = Arc::clone(&channel);
        thread::spawn(move || {
            for value in [5, 42, 7] {
                channel.send(value, "Producer").unwrap();
            }
            channel.close("Producer").unwrap();
        })
    };

    let processed: Vec<i32> = channel.iter("Consumer").collect();
    producer.join().unwrap();

    assert_eq!(processed, vec![5, 42, 7]);
    // Terminated: further reads do not block.
    assert_eq!(channel.read("Consumer"), Message::EndOfStream);
}

#[test]
fn test_random_stress_no_loss_no_duplicates() {
    init_logger();
    let mut rng = rand::rng();

    for _ in 0..200 {
        let sent: Vec<u32> = (0..100).map(|_| rng.random_range(1..=101)).collect();
        let channel = Arc::new(SingleSlotChannel::<u32>::new());

        let producer = {
            let channel = Arc::clone(&channel);
            let sent = sent.clone();
            thread::spawn(move || {
                let mut rng = rand::rng();
                for value in sent {
                    jitter(&mut rng);
                    channel.send(value, "producer").unwrap();
                }
                channel.close("producer").unwrap();
            })
        };

        let mut received = Vec::with_capacity(sent.len());
        for value in channel.iter("consumer") {
            jitter(&mut rng);
            received.push(value);
        }
        producer.join().unwrap();

        assert_eq!(received, sent);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_async_random_stress() {
    init_logger();

    for trial in 0..50u32 {
        let sent: Vec<u32> = (0..100).map(|i| (i * 31 + trial) % 101 + 1).collect();
        let channel = Arc::new(AsyncSingleSlotChannel::<u32>::new());

        let producer = {
            let channel = Arc::clone(&channel);
            let sent = sent.clone();
            tokio::spawn(async move {
                for (i, value) in sent.into_iter().enumerate() {
                    if i % 3 == 0 {
                        tokio::task::yield_now().await;
                    }
                    channel.send(value, "producer").await.unwrap();
                }
                channel.close("producer").await.unwrap();
            })
        };

        let consumer = {
            let channel = Arc::clone(&channel);
            tokio::spawn(async move {
                let mut received = Vec::new();
                loop {
                    match channel.read("consumer").await {
                        Message::Payload(value) => received.push(value),
                        Message::EndOfStream => break received,
                    }
                }
            })
        };

        producer.await.unwrap();
        assert_eq!(consumer.await.unwrap(), sent);
    }
}

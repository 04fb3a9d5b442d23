//! Concurrent registration and routing on a shared node.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use waypoint::workers::{Echoer, Hop};
use waypoint::{async_trait, from_fn, Context, Message, Node, Route, RoutingError, Worker};

use crate::common::observe;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_registration_then_routing() {
    const N: usize = 64;
    let node = Node::new();
    let counts: Vec<Arc<AtomicUsize>> = (0..N).map(|_| Arc::new(AtomicUsize::new(0))).collect();

    let mut tasks = Vec::new();
    for (i, count) in counts.iter().enumerate() {
        let node = node.clone();
        let count = count.clone();
        tasks.push(tokio::spawn(async move {
            node.start_worker(
                format!("w{i}"),
                from_fn(move |_ctx, _msg| {
                    count.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                }),
            )
        }));
    }
    for task in tasks {
        task.await.expect("join").expect("distinct addresses register");
    }
    assert_eq!(node.stats().workers, N);

    let mut tasks = Vec::new();
    for i in 0..N {
        let node = node.clone();
        tasks.push(tokio::spawn(async move {
            node.send([format!("w{i}")], "ping").await
        }));
    }
    for task in tasks {
        task.await.expect("join").expect("route succeeds");
    }

    for count in &counts {
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_duplicate_registration_race_has_one_winner() {
    let node = Node::new();
    let mut tasks = Vec::new();
    for _ in 0..16 {
        let node = node.clone();
        tasks.push(tokio::spawn(async move { node.start_worker("contested", Hop) }));
    }

    let mut winners = 0;
    for task in tasks {
        if task.await.expect("join").is_ok() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_echo_chains() {
    let node = Node::new();
    for hop in ["h1", "h2"] {
        node.start_worker(hop, Hop).expect("register hop");
    }
    node.start_worker("echoer", Echoer).expect("register echoer");
    let mut app = observe(&node, "app");

    let mut tasks = Vec::new();
    for i in 0..100 {
        let node = node.clone();
        tasks.push(tokio::spawn(async move {
            node.route(Message::new(
                ["h1", "h2", "echoer"],
                ["app"],
                format!("m{i}"),
            ))
            .await
        }));
    }
    for task in tasks {
        task.await.expect("join").expect("route");
    }

    let mut seen = Vec::new();
    while let Ok(msg) = app.try_recv() {
        assert_eq!(msg.return_route, Route::from(["h1", "h2", "echoer"]));
        seen.push(msg.payload_text().expect("text").to_owned());
    }
    seen.sort();
    let mut expected: Vec<String> = (0..100).map(|i| format!("m{i}")).collect();
    expected.sort();
    assert_eq!(seen, expected);
}

/// Worker that parks for a while before absorbing the message.
struct Slow;

#[async_trait]
impl Worker for Slow {
    async fn handle_message(&mut self, _ctx: &mut Context, _msg: Message) -> Result<(), RoutingError> {
        tokio::time::sleep(Duration::from_millis(500)).await;
        Ok(())
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_slow_worker_does_not_stall_other_chains() {
    let node = Node::new();
    node.start_worker("slow", Slow).expect("register slow");
    let mut fast = observe(&node, "fast");

    let slow_node = node.clone();
    let slow = tokio::spawn(async move { slow_node.send(["slow"], "zzz").await });

    // Give the slow handler time to start
    tokio::time::sleep(Duration::from_millis(50)).await;

    // Registration and routing proceed while "slow" is mid-handler
    node.start_worker("h1", Hop).expect("register while routing");
    tokio::time::timeout(Duration::from_millis(250), node.send(["h1", "fast"], "quick"))
        .await
        .expect("not blocked by the slow worker")
        .expect("route");
    assert!(fast.recv().await.is_some());

    slow.await.expect("join").expect("slow route");
}

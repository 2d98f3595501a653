//! Round-trip benchmark over the in-memory transport.
//!
//! Measures request/response latency through the correlation engine with
//! a host task answering every request:
//! - Concurrency: 1, 16, 128 outstanding requests
//!
//! Run with: cargo bench --bench round_trip
//! Results saved to: target/criterion/

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use serde_json::json;
use tokio::runtime::Runtime;

use framepost::{Client, Context, RequestType, transport};

// ============================================================================
// Benchmark Parameters
// ============================================================================

const CONCURRENCY: &[usize] = &[1, 16, 128];

// ============================================================================
// Helper Functions
// ============================================================================

/// Builds a client whose host echoes every request payload.
fn echo_client(rt: &Runtime) -> Client {
    let (child, mut host) = transport::channel();
    host.send_init(Context::with_features(["modals"]));

    rt.spawn(async move {
        while let Some((id, _, payload)) = host.next_request().await {
            host.respond(id, payload);
        }
    });

    Client::builder()
        .transport(child)
        .build()
        .expect("client")
}

// ============================================================================
// Benchmark: Request Round Trip
// ============================================================================

fn bench_round_trip(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let client = echo_client(&rt);

    let mut group = c.benchmark_group("round_trip");

    for &concurrency in CONCURRENCY {
        group.bench_with_input(
            BenchmarkId::new("requests", concurrency),
            &concurrency,
            |b, &outstanding| {
                b.to_async(&rt).iter(|| async {
                    let calls: Vec<_> = (0..outstanding)
                        .map(|i| {
                            client
                                .connection()
                                .request(RequestType::OpenModal, json!({ "key": i }))
                        })
                        .collect();
                    futures_util::future::try_join_all(calls)
                        .await
                        .expect("responses")
                });
            },
        );
    }

    group.finish();
}

// ============================================================================
// Benchmark: Modal Open
// ============================================================================

fn bench_modal_open(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let client = echo_client(&rt);

    c.bench_function("modal_open", |b| {
        b.to_async(&rt)
            .iter(|| async { client.modal().open("bench-modal").await.expect("open") });
    });
}

criterion_group!(benches, bench_round_trip, bench_modal_open);
criterion_main!(benches);

//! Performance benchmarks for the payroll run engine.
//!
//! This benchmark suite verifies that the engine meets performance targets:
//! - Draft aggregation over 100 employees: < 1ms mean
//! - Draft aggregation over 1000 employees: < 10ms mean
//! - Full lifecycle (create through lock and payslips) over HTTP: < 5ms mean
//!
//! Run with: `cargo bench`
//! HTML reports are generated in `target/criterion/`

use std::str::FromStr;
use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use axum::{body::Body, http::Request};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tower::ServiceExt;

use payroll_run_engine::api::{create_router, AppState};
use payroll_run_engine::config::EnginePolicy;
use payroll_run_engine::engine::compute_draft;
use payroll_run_engine::models::{
    BankDetails, PayPeriod, Role, RoleDirectory, RosterEmployee,
};
use payroll_run_engine::roster::InMemoryRoster;
use uuid::Uuid;

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn make_employee(index: usize) -> RosterEmployee {
    RosterEmployee {
        id: format!("emp_{index:05}"),
        name: format!("Employee {index}"),
        base_salary: dec("5200.00"),
        allowances: dec("300.00"),
        deductions: dec("410.00"),
        // Every 50th employee is missing bank details to exercise the
        // exception path at a realistic rate.
        bank_details: if index % 50 == 0 {
            None
        } else {
            Some(BankDetails {
                routing_number: "083-004".to_string(),
                account_number: format!("{index:08}"),
            })
        },
    }
}

fn make_roster(size: usize) -> Vec<RosterEmployee> {
    (0..size).map(make_employee).collect()
}

fn bench_state(roster_size: usize) -> AppState {
    let roster = InMemoryRoster::new();
    for index in 0..roster_size {
        roster.add_employee("entity_bench", make_employee(index));
    }
    let mut roles = RoleDirectory::new();
    roles.assign("spec_bench", Role::PayrollSpecialist);
    roles.assign("mgr_bench", Role::PayrollManager);
    roles.assign("fin_bench", Role::FinanceStaff);
    AppState::new(Arc::new(roster), roles, EnginePolicy::default())
}

async fn post(router: &axum::Router, uri: &str, actor: &str, body: &str) {
    let response = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header("Content-Type", "application/json")
                .header("x-actor-id", actor)
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    black_box(response);
}

/// Benchmark: pure draft aggregation across roster sizes.
fn bench_draft_aggregation(c: &mut Criterion) {
    let period = PayPeriod::new(
        "entity_bench",
        NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
    );
    let run_id = Uuid::new_v4();

    let mut group = c.benchmark_group("draft_aggregation");
    for size in [10usize, 100, 1000] {
        let roster = make_roster(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &roster, |b, roster| {
            b.iter(|| black_box(compute_draft(run_id, &period, roster, &[])))
        });
    }
    group.finish();
}

/// Benchmark: full lifecycle from creation through lock and payslip
/// generation, driven over the HTTP surface.
fn bench_full_lifecycle(c: &mut Criterion) {
    let rt = tokio::runtime::Runtime::new().unwrap();

    c.bench_function("full_lifecycle_100_employees", |b| {
        b.to_async(&rt).iter(|| async {
            // Fresh state per iteration: a run is single-use once locked.
            let router = create_router(bench_state(100));

            let response = router
                .clone()
                .oneshot(
                    Request::builder()
                        .method("POST")
                        .uri("/payroll-runs")
                        .header("Content-Type", "application/json")
                        .header("x-actor-id", "spec_bench")
                        .body(Body::from(
                            r#"{"entity": "entity_bench", "period_end": "2025-03-31"}"#,
                        ))
                        .unwrap(),
                )
                .await
                .unwrap();
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            let run: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
            let run_id = run["id"].as_str().unwrap();

            for (step, actor) in [
                ("validate-phase0", "spec_bench"),
                ("approve-period", "spec_bench"),
                ("start-initiation", "spec_bench"),
                ("generate-draft", "spec_bench"),
                ("send-for-approval", "spec_bench"),
                ("manager-approve", "mgr_bench"),
                ("finance-approve", "fin_bench"),
                ("lock", "mgr_bench"),
                ("generate-payslips", "spec_bench"),
            ] {
                post(&router, &format!("/payroll-runs/{run_id}/{step}"), actor, "{}").await;
            }
        })
    });
}

criterion_group!(benches, bench_draft_aggregation, bench_full_lifecycle);
criterion_main!(benches);

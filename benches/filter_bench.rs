//! Filter engine benchmarks.
//!
//! The decisions list is re-evaluated on every keystroke in the query bar,
//! so `evaluate` and `highlight` must stay well under a frame.
//!
//! # Groups
//!
//! | Group | What it measures |
//! |-------|-----------------|
//! | `evaluate` | Paged, filtered and searched renders over the store |
//! | `highlight` | First-match search in short and long titles |
//! | `agenda_view` | Filter, sort and truncate of the agenda list |
//!
//! # Viewing results
//!
//! ```sh
//! cargo bench --bench filter_bench
//! open target/criterion/report/index.html
//! ```

use chrono::{NaiveDate, NaiveDateTime};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use kdash_core::filter::agenda::{agenda_view, AgendaFilter, AgendaQuery};
use kdash_core::filter::{evaluate, highlight, DecisionFilter, FilterAction, FilterState};
use kdash_core::{Category, Record, Store};
use std::hint::black_box;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2026, 3, 1)
        .and_then(|d| d.and_hms_opt(12, 0, 0))
        .expect("valid bench clock")
}

fn day(i: usize) -> Option<NaiveDateTime> {
    NaiveDate::from_ymd_opt(2026, (i % 12) as u32 + 1, (i % 28) as u32 + 1)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

fn store(n: usize) -> Store {
    let decisions = (0..n)
        .map(|i| {
            let title = format!("Tonttikauppa {i} Hakalahden asuinalueella");
            Record::new(Category::Decision, &title, title.clone(), "Hyväksyttiin", "Kaupunginhallitus")
                .with_date(day(i))
        })
        .collect();
    let meetings = (0..n / 2)
        .map(|i| {
            let title = format!("Kokous § {i} Kouluverkkoselvitys");
            Record::new(Category::Meeting, &title, title.clone(), "Esitys", "Sivistyslautakunta")
                .with_date(day(i))
        })
        .collect();
    let mut store = Store::default();
    store.load_at(Category::Decision, decisions, now());
    store.load_at(Category::Meeting, meetings, now());
    store
}

// ---------------------------------------------------------------------------
// Evaluate
// ---------------------------------------------------------------------------

fn evaluate_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("evaluate");
    let base = FilterState::default();
    let cases = [
        ("paged", base.clone()),
        ("decided", base.apply(FilterAction::SetFilter(DecisionFilter::Decided))),
        ("query", base.apply(FilterAction::SetQuery("kouluverkko".to_string()))),
        ("query_miss", base.apply(FilterAction::SetQuery("uimahalli".to_string()))),
    ];
    for n in [100usize, 1_000] {
        let store = store(n);
        group.throughput(Throughput::Elements(store.total_count() as u64));
        for (name, state) in &cases {
            group.bench_with_input(BenchmarkId::new(*name, n), state, |b, state| {
                b.iter(|| evaluate(store.decision_items(), black_box(state), now()).shown.len())
            });
        }
    }
    group.finish();
}

// ---------------------------------------------------------------------------
// Highlight
// ---------------------------------------------------------------------------

fn highlight_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("highlight");
    let short = "Talousarvio 2026";
    let long = "Kaupunginhallituksen esitys valtuustolle Hakalahden asuinalueen \
                asemakaavan muutoksesta ja siihen liittyvästä maankäyttösopimuksesta";
    group.bench_function("short_hit", |b| {
        b.iter(|| highlight(black_box(short), "arvio"))
    });
    group.bench_function("long_hit_late", |b| {
        b.iter(|| highlight(black_box(long), "maankäyttö"))
    });
    group.bench_function("long_miss", |b| {
        b.iter(|| highlight(black_box(long), "uimahalli"))
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// Agenda view
// ---------------------------------------------------------------------------

fn agenda_bench(c: &mut Criterion) {
    let mut group = c.benchmark_group("agenda_view");
    let records: Vec<Record> = (0..300)
        .map(|i| {
            let title = if i % 3 == 0 {
                format!("Kaupunginhallitus esityslista {i}")
            } else {
                format!("Lautakunta pöytäkirja {i}")
            };
            Record::new(Category::Agenda, &title, title.clone(), "", "Kokkola").with_date(day(i))
        })
        .collect();
    for filter in AgendaFilter::CYCLE {
        let query = AgendaQuery {
            filter,
            ..AgendaQuery::default()
        };
        group.bench_with_input(BenchmarkId::from_parameter(filter), &query, |b, q| {
            b.iter(|| agenda_view(black_box(&records), q, now()).len())
        });
    }
    group.finish();
}

criterion_group!(benches, evaluate_bench, highlight_bench, agenda_bench);
criterion_main!(benches);

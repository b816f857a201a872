//! Structured query tracing for resolution entry points.
//!
//! Events use target `tyres::query_json` and are intended to be consumed with
//! a JSON subscriber filtered to `tyres::query_json=trace`.
//!
//! Environment:
//! - `TYRES_QUERY_RUN_ID`: optional run identifier attached to every event.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{Level, trace};

static NEXT_QUERY_ID: AtomicU64 = AtomicU64::new(1);
static QUERY_RUN_ID: OnceLock<String> = OnceLock::new();

#[inline]
pub(crate) fn enabled() -> bool {
    tracing::enabled!(target: "tyres::query_json", Level::TRACE)
}

#[inline]
pub(crate) fn next_query_id() -> u64 {
    NEXT_QUERY_ID.fetch_add(1, Ordering::Relaxed)
}

/// Allocate a query id only when tracing is on.
#[inline]
pub(crate) fn begin() -> Option<u64> {
    enabled().then(next_query_id)
}

#[inline]
fn run_id() -> &'static str {
    QUERY_RUN_ID
        .get_or_init(|| std::env::var("TYRES_QUERY_RUN_ID").unwrap_or_else(|_| "default".to_string()))
        .as_str()
}

#[inline]
pub(crate) fn unary_start(query_id: u64, op: &'static str, node: u64) {
    trace!(
        target: "tyres::query_json",
        event = "query",
        phase = "start",
        run_id = run_id(),
        query_id,
        op,
        node
    );
}

#[inline]
pub(crate) fn unary_end(query_id: u64, op: &'static str, found: bool, cache_hit: bool) {
    trace!(
        target: "tyres::query_json",
        event = "query",
        phase = "end",
        run_id = run_id(),
        query_id,
        op,
        found,
        cache_hit
    );
}

#[inline]
pub(crate) fn property_start(query_id: u64, node: u64, path: &str) {
    trace!(
        target: "tyres::query_json",
        event = "query",
        phase = "start",
        run_id = run_id(),
        query_id,
        op = "property",
        node,
        path
    );
}

#[inline]
pub(crate) fn relation_start(query_id: u64, op: &'static str, source: u64, target: u64) {
    trace!(
        target: "tyres::query_json",
        event = "query",
        phase = "start",
        run_id = run_id(),
        query_id,
        op,
        source,
        target
    );
}

#[inline]
pub(crate) fn relation_end(query_id: u64, op: &'static str, result: bool) {
    trace!(
        target: "tyres::query_json",
        event = "query",
        phase = "end",
        run_id = run_id(),
        query_id,
        op,
        result
    );
}

#[cfg(test)]
#[path = "../tests/query_trace_tests.rs"]
mod tests;

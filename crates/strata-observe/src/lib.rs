//! strata-observe: vendor-neutral observability ABI.
//!
//! Index crates depend only on these traits and event types. Exporters
//! (Prometheus, OTLP, a live visualizer) implement [`Meter`] elsewhere.

pub trait Counter: Send + Sync {
    fn inc(&self, v: u64);
}
pub trait Gauge: Send + Sync {
    fn set(&self, v: i64);
}
pub trait Histogram: Send + Sync {
    fn observe(&self, v: f64);
}

/// Labels are static so that a meter can key its instruments without
/// allocating on the hot path.
pub type Labels = &'static [(&'static str, &'static str)];

pub trait Meter: Send + Sync + 'static {
    fn counter(&self, name: &'static str, labels: Labels) -> Box<dyn Counter>;
    fn gauge(&self, name: &'static str, labels: Labels) -> Box<dyn Gauge>;
    fn histo(&self, name: &'static str, buckets: &'static [f64], labels: Labels)
        -> Box<dyn Histogram>;
    fn emit(&self, evt: VizEvent);
}

/// A do-nothing meter for tests and users who don't care about telemetry.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopMeter;

struct Noop;
impl Counter for Noop {
    fn inc(&self, _v: u64) {}
}
impl Gauge for Noop {
    fn set(&self, _v: i64) {}
}
impl Histogram for Noop {
    fn observe(&self, _v: f64) {}
}

impl Meter for NoopMeter {
    fn counter(&self, _n: &'static str, _l: Labels) -> Box<dyn Counter> {
        Box::new(Noop)
    }
    fn gauge(&self, _n: &'static str, _l: Labels) -> Box<dyn Gauge> {
        Box::new(Noop)
    }
    fn histo(&self, _n: &'static str, _b: &'static [f64], _l: Labels) -> Box<dyn Histogram> {
        Box::new(Noop)
    }
    fn emit(&self, _e: VizEvent) {}
}

/// Typed events for live visualization (vector payloads never included).
#[non_exhaustive]
#[derive(Clone, Debug, PartialEq)]
pub enum VizEvent {
    Hnsw(HnswEvt),
}

#[derive(Clone, Debug, PartialEq)]
pub struct HnswEvt {
    pub kind: HnswKind,
}

#[derive(Clone, Debug, PartialEq)]
pub enum HnswKind {
    /// A node became visible in the graph.
    NodeInserted {
        node: u64,
        /// Highest layer the node occupies.
        layer: usize,
        /// Out-degree at layer 0 right after insertion.
        degree: usize,
    },
    /// An insertion reached above the previous top layer.
    EntryPointPromoted {
        node: u64,
        from_layer: usize,
        to_layer: usize,
    },
}

#[macro_export]
macro_rules! obs_count {
    ($m:expr, $name:expr, $labels:expr, $v:expr) => {{
        $m.counter($name, $labels).inc($v as u64);
    }};
}
#[macro_export]
macro_rules! obs_gauge {
    ($m:expr, $name:expr, $labels:expr, $v:expr) => {{
        $m.gauge($name, $labels).set($v as i64);
    }};
}
#[macro_export]
macro_rules! obs_hist {
    ($m:expr, $name:expr, $labels:expr, $v:expr) => {{
        $m.histo($name, &[], $labels).observe($v as f64);
    }};
}
#[macro_export]
macro_rules! obs_timed {
    ($m:expr, $name:expr, $labels:expr, $body:block) => {{
        let __t = std::time::Instant::now();
        let __ret = { $body };
        let __ms = __t.elapsed().as_secs_f64() * 1000.0;
        $m.histo($name, &[], $labels).observe(__ms);
        __ret
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    struct Shared(Arc<AtomicU64>);
    impl Counter for Shared {
        fn inc(&self, v: u64) {
            self.0.fetch_add(v, Ordering::Relaxed);
        }
    }
    impl Histogram for Shared {
        fn observe(&self, _v: f64) {
            self.0.fetch_add(1, Ordering::Relaxed);
        }
    }

    #[derive(Default)]
    struct Tally {
        hits: Arc<AtomicU64>,
    }

    impl Meter for Tally {
        fn counter(&self, _n: &'static str, _l: Labels) -> Box<dyn Counter> {
            Box::new(Shared(self.hits.clone()))
        }
        fn gauge(&self, n: &'static str, l: Labels) -> Box<dyn Gauge> {
            NoopMeter.gauge(n, l)
        }
        fn histo(&self, _n: &'static str, _b: &'static [f64], _l: Labels) -> Box<dyn Histogram> {
            Box::new(Shared(self.hits.clone()))
        }
        fn emit(&self, _e: VizEvent) {}
    }

    #[test]
    fn test_macros_route_to_meter() {
        let meter = Tally::default();
        obs_count!(meter, "hits", &[], 3);
        obs_hist!(meter, "sizes", &[("layer", "0")], 1.5);
        let out = obs_timed!(meter, "work_ms", &[], { 40 + 2 });

        assert_eq!(out, 42);
        assert_eq!(meter.hits.load(Ordering::Relaxed), 5);
    }

    #[test]
    fn test_noop_meter_accepts_everything() {
        let meter: Arc<dyn Meter> = Arc::new(NoopMeter);
        obs_count!(meter, "hnsw_inserts_total", &[], 1);
        obs_gauge!(meter, "hnsw_top_layer", &[], 3);
        meter.emit(VizEvent::Hnsw(HnswEvt {
            kind: HnswKind::EntryPointPromoted {
                node: 7,
                from_layer: 0,
                to_layer: 2,
            },
        }));
    }
}

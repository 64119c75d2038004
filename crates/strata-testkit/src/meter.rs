//! A [`Meter`] that remembers what it was told.

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;
use strata_observe::{Counter, Gauge, Histogram, Labels, Meter, VizEvent};

#[derive(Default)]
struct Recorded {
    counters: HashMap<&'static str, u64>,
    gauges: HashMap<&'static str, i64>,
    histograms: HashMap<&'static str, Vec<f64>>,
    events: Vec<VizEvent>,
}

/// Captures counters, gauges, histogram samples and events in memory.
///
/// Labels are ignored; instruments are keyed by name only. Clones share the
/// same recording.
#[derive(Clone, Default)]
pub struct RecordingMeter {
    inner: Arc<Mutex<Recorded>>,
}

impl RecordingMeter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counter_value(&self, name: &str) -> u64 {
        self.inner.lock().counters.get(name).copied().unwrap_or(0)
    }

    pub fn gauge_value(&self, name: &str) -> Option<i64> {
        self.inner.lock().gauges.get(name).copied()
    }

    pub fn histogram_samples(&self, name: &str) -> Vec<f64> {
        self.inner
            .lock()
            .histograms
            .get(name)
            .cloned()
            .unwrap_or_default()
    }

    pub fn events(&self) -> Vec<VizEvent> {
        self.inner.lock().events.clone()
    }
}

struct Instrument {
    name: &'static str,
    inner: Arc<Mutex<Recorded>>,
}

impl Counter for Instrument {
    fn inc(&self, v: u64) {
        *self.inner.lock().counters.entry(self.name).or_default() += v;
    }
}

impl Gauge for Instrument {
    fn set(&self, v: i64) {
        self.inner.lock().gauges.insert(self.name, v);
    }
}

impl Histogram for Instrument {
    fn observe(&self, v: f64) {
        self.inner
            .lock()
            .histograms
            .entry(self.name)
            .or_default()
            .push(v);
    }
}

impl RecordingMeter {
    fn instrument(&self, name: &'static str) -> Box<Instrument> {
        Box::new(Instrument {
            name,
            inner: self.inner.clone(),
        })
    }
}

impl Meter for RecordingMeter {
    fn counter(&self, name: &'static str, _labels: Labels) -> Box<dyn Counter> {
        self.instrument(name)
    }

    fn gauge(&self, name: &'static str, _labels: Labels) -> Box<dyn Gauge> {
        self.instrument(name)
    }

    fn histo(&self, name: &'static str, _buckets: &'static [f64], _labels: Labels) -> Box<dyn Histogram> {
        self.instrument(name)
    }

    fn emit(&self, evt: VizEvent) {
        self.inner.lock().events.push(evt);
    }
}

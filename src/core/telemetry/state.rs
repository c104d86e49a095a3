use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard};

use super::{Field, FieldError, FieldValue};
use crate::core::scheduler::Tier;

/// Shown for a field that no collector has produced yet.
pub const PLACEHOLDER: &str = "--";

/// The values one tier produced in one run.
///
/// Collectors fill a batch privately; it only becomes visible when applied
/// to the state as a whole.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetryBatch {
    pub tier: Tier,
    pub values: Vec<(Field, FieldValue)>,
}

impl TelemetryBatch {
    pub fn new(tier: Tier) -> Self {
        Self {
            tier,
            values: Vec::new(),
        }
    }

    pub fn push<V: Into<FieldValue>>(&mut self, field: Field, value: V) {
        debug_assert_eq!(field.tier(), self.tier, "{:?} written by wrong tier", field);
        self.values.push((field, value.into()));
    }

    /// Number of fields that failed. Fields switched off by test mode are
    /// not failures.
    pub fn fault_count(&self) -> usize {
        self.values
            .iter()
            .filter(|(_, v)| v.is_error() && *v != FieldValue::Error(FieldError::Disabled))
            .count()
    }

    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.values
            .iter()
            .rev()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v)
    }
}

/// Field name to value mapping read by the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TelemetryState {
    values: BTreeMap<Field, FieldValue>,
}

impl TelemetryState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.values.get(&field)
    }

    /// Display text for a field, or [`PLACEHOLDER`] if it was never set.
    pub fn display(&self, field: Field) -> String {
        self.values
            .get(&field)
            .map(|v| v.to_string())
            .unwrap_or_else(|| PLACEHOLDER.to_string())
    }

    pub fn apply(&mut self, batch: TelemetryBatch) {
        self.values.extend(batch.values);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Field, &FieldValue)> {
        self.values.iter()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Handle to the telemetry state owned by the main loop.
///
/// Writes take the lock once per batch, so a concurrent reader sees either
/// all of a tier's previous values or all of its new ones.
#[derive(Debug, Clone, Default)]
pub struct SharedTelemetry {
    inner: Arc<RwLock<TelemetryState>>,
}

impl SharedTelemetry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&self, batch: TelemetryBatch) {
        self.inner.write().apply(batch);
    }

    pub fn read(&self) -> RwLockReadGuard<'_, TelemetryState> {
        self.inner.read()
    }

    pub fn snapshot(&self) -> TelemetryState {
        self.inner.read().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_missing_field_uses_placeholder() {
        let state = TelemetryState::new();
        assert_eq!(state.display(Field::Hostname), PLACEHOLDER);
    }

    #[test]
    fn test_apply_replaces_only_batch_fields() {
        let mut state = TelemetryState::new();
        let mut first = TelemetryBatch::new(Tier::SemiOften);
        first.push(Field::SpeedDown, FieldValue::text("40 Mbit/s"));
        first.push(Field::LanIp, FieldValue::text("10.0.0.2"));
        state.apply(first);

        let mut second = TelemetryBatch::new(Tier::SemiOften);
        second.push(Field::LanIp, FieldValue::Error(FieldError::Failed));
        state.apply(second);

        assert_eq!(state.display(Field::SpeedDown), "40 Mbit/s");
        assert_eq!(state.display(Field::LanIp), "ERR");
    }

    #[test]
    fn test_batch_fault_count_skips_disabled() {
        let mut batch = TelemetryBatch::new(Tier::Often);
        batch.push(Field::CpuTemp, FieldValue::Error(FieldError::Malformed));
        batch.push(Field::Processes, FieldValue::Int(120));
        assert_eq!(batch.fault_count(), 1);

        let mut batch = TelemetryBatch::new(Tier::Daily);
        batch.push(Field::UpdateCount, FieldValue::Error(FieldError::Disabled));
        assert_eq!(batch.fault_count(), 0);
    }

    #[test]
    fn test_reader_never_sees_mixed_batch() {
        let shared = SharedTelemetry::new();
        let done = AtomicBool::new(false);
        let fields = [Field::Hostname, Field::Kernel, Field::LanMac, Field::WifiMac];

        thread::scope(|scope| {
            scope.spawn(|| {
                for generation in 1..=25i64 {
                    let mut batch = TelemetryBatch::new(Tier::Static);
                    for field in fields {
                        batch.push(field, FieldValue::Int(generation));
                        thread::sleep(Duration::from_micros(200));
                    }
                    shared.apply(batch);
                }
                done.store(true, Ordering::SeqCst);
            });

            scope.spawn(|| {
                let mut reads = 0usize;
                while !done.load(Ordering::SeqCst) || reads == 0 {
                    let snapshot = shared.snapshot();
                    let seen: Vec<Option<&FieldValue>> =
                        fields.iter().map(|f| snapshot.get(*f)).collect();
                    assert!(
                        seen.windows(2).all(|w| w[0] == w[1]),
                        "mixed generations: {:?}",
                        seen
                    );
                    reads += 1;
                }
            });
        });

        assert_eq!(shared.read().get(Field::WifiMac), Some(&FieldValue::Int(25)));
    }
}

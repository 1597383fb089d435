//! Alert registry and one-shot evaluation.

use indexmap::IndexMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tickstat_core::UtcDateTime;
use tracing::{debug, info, warn};

use crate::{AlertCondition, Snapshot};

/// Registered alert definition and its activation state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Alert {
    pub name: String,
    pub condition: AlertCondition,
    pub message: String,
    pub active: bool,
    pub triggered_at: Option<UtcDateTime>,
    #[serde(skip)]
    registration: u64,
}

/// Immutable record of an alert firing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriggeredAlertEvent {
    pub name: String,
    pub message: String,
    pub timestamp: UtcDateTime,
}

#[derive(Debug, Default)]
struct EngineInner {
    alerts: IndexMap<String, Alert>,
    events: Vec<TriggeredAlertEvent>,
    next_registration: u64,
}

struct PendingCheck {
    name: String,
    registration: u64,
    condition: AlertCondition,
}

/// Thread-safe alert engine.
///
/// Alerts fire at most once per activation: the first true evaluation
/// deactivates the alert until [`AlertEngine::reset`] is called.
#[derive(Debug, Default)]
pub struct AlertEngine {
    inner: RwLock<EngineInner>,
}

impl AlertEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an alert, replacing any alert with the same name.
    pub fn add(
        &self,
        name: impl Into<String>,
        condition: AlertCondition,
        message: impl Into<String>,
    ) {
        let name = name.into();
        let mut inner = self.inner.write();
        let registration = inner.next_registration;
        inner.next_registration += 1;

        inner.alerts.insert(
            name.clone(),
            Alert {
                name,
                condition,
                message: message.into(),
                active: true,
                triggered_at: None,
                registration,
            },
        );
    }

    /// Remove an alert; absent names are ignored.
    pub fn remove(&self, name: &str) {
        self.inner.write().alerts.shift_remove(name);
    }

    /// Evaluate every active alert against `snapshot` using the current time.
    pub fn check(&self, snapshot: &Snapshot) -> Vec<TriggeredAlertEvent> {
        self.check_at(snapshot, UtcDateTime::now())
    }

    /// Evaluate every active alert against `snapshot`, stamping fired alerts with `now`.
    ///
    /// The active set is captured before evaluation starts. Returns the events
    /// fired by this pass.
    pub fn check_at(&self, snapshot: &Snapshot, now: UtcDateTime) -> Vec<TriggeredAlertEvent> {
        if snapshot.is_empty() {
            return Vec::new();
        }

        let hits: Vec<PendingCheck> = self
            .pending_checks()
            .into_iter()
            .filter(|check| match check.condition.evaluate(snapshot) {
                Ok(hit) => hit,
                Err(error) => {
                    warn!(alert = %check.name, %error, "alert condition failed");
                    false
                }
            })
            .collect();

        self.commit(hits, now)
    }

    /// Active alerts as of now, in registration order.
    fn pending_checks(&self) -> Vec<PendingCheck> {
        self.inner
            .read()
            .alerts
            .values()
            .filter(|alert| alert.active)
            .map(|alert| PendingCheck {
                name: alert.name.clone(),
                registration: alert.registration,
                condition: alert.condition,
            })
            .collect()
    }

    /// Fire each hit whose alert is still the same registration and still active.
    fn commit(&self, hits: Vec<PendingCheck>, now: UtcDateTime) -> Vec<TriggeredAlertEvent> {
        if hits.is_empty() {
            return Vec::new();
        }

        let mut inner = self.inner.write();
        let mut fired = Vec::with_capacity(hits.len());
        for hit in hits {
            let Some(alert) = inner.alerts.get_mut(&hit.name) else {
                debug!(alert = %hit.name, "alert removed during check");
                continue;
            };
            if alert.registration != hit.registration || !alert.active {
                continue;
            }

            alert.active = false;
            alert.triggered_at = Some(now);
            info!(alert = %alert.name, kind = alert.condition.kind(), "alert triggered");
            fired.push(TriggeredAlertEvent {
                name: alert.name.clone(),
                message: alert.message.clone(),
                timestamp: now,
            });
        }

        inner.events.extend(fired.iter().cloned());
        fired
    }

    /// The last `limit` events in trigger order.
    pub fn get_recent(&self, limit: usize) -> Vec<TriggeredAlertEvent> {
        let inner = self.inner.read();
        let start = inner.events.len().saturating_sub(limit);
        inner.events[start..].to_vec()
    }

    /// Empty the event log. Alert activation is unchanged.
    pub fn clear(&self) {
        self.inner.write().events.clear();
    }

    /// Reactivate an alert. Returns `false` when no alert has that name.
    pub fn reset(&self, name: &str) -> bool {
        match self.inner.write().alerts.get_mut(name) {
            Some(alert) => {
                alert.active = true;
                alert.triggered_at = None;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, name: &str) -> Option<Alert> {
        self.inner.read().alerts.get(name).cloned()
    }

    /// Alert names in registration order.
    pub fn names(&self) -> Vec<String> {
        self.inner.read().alerts.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.inner.read().alerts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().alerts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(seconds: i64) -> UtcDateTime {
        UtcDateTime::from_unix_seconds(seconds).expect("timestamp")
    }

    fn zscores(values: &[f64]) -> Snapshot {
        Snapshot::new().with_zscore(values.iter().copied().map(Some).collect())
    }

    #[test]
    fn fires_once_until_reset() {
        let engine = AlertEngine::new();
        engine.add("z_high", AlertCondition::zscore_above(2.0), "spread stretched");

        assert!(engine.check_at(&zscores(&[1.0]), at(1)).is_empty());
        let fired = engine.check_at(&zscores(&[1.0, 2.1]), at(2));
        assert_eq!(fired.len(), 1);
        assert!(engine.check_at(&zscores(&[1.0, 2.1, 3.0]), at(3)).is_empty());

        let alert = engine.get("z_high").expect("registered");
        assert!(!alert.active);
        assert_eq!(alert.triggered_at, Some(at(2)));

        assert!(engine.reset("z_high"));
        let alert = engine.get("z_high").expect("registered");
        assert!(alert.active);
        assert_eq!(alert.triggered_at, None);

        assert_eq!(engine.check_at(&zscores(&[3.0]), at(4)).len(), 1);
        assert_eq!(engine.get_recent(10).len(), 2);
    }

    #[test]
    fn failing_condition_keeps_alert_active_and_others_run() {
        let engine = AlertEngine::new();
        engine.add("z_high", AlertCondition::zscore_above(0.0), "z");
        engine.add("price_high", AlertCondition::price_above(10.0), "price");

        let snapshot = Snapshot::new()
            .with_zscore(vec![Some(1.0), None])
            .with_price(vec![11.0, 12.0]);
        let fired = engine.check_at(&snapshot, at(1));

        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].name, "price_high");
        assert!(engine.get("z_high").expect("registered").active);
    }

    #[test]
    fn add_overwrites_and_reactivates() {
        let engine = AlertEngine::new();
        engine.add("p", AlertCondition::price_above(10.0), "first");
        engine.check_at(&Snapshot::new().with_price(vec![11.0]), at(1));
        assert!(!engine.get("p").expect("registered").active);

        engine.add("p", AlertCondition::price_above(20.0), "second");
        let alert = engine.get("p").expect("registered");
        assert!(alert.active);
        assert_eq!(alert.message, "second");
        assert_eq!(engine.len(), 1);
    }

    #[test]
    fn remove_and_reset_unknown_are_noops() {
        let engine = AlertEngine::new();
        engine.remove("missing");
        assert!(!engine.reset("missing"));
        assert!(engine.is_empty());
    }

    #[test]
    fn get_recent_returns_tail_in_trigger_order_and_clear_keeps_state() {
        let engine = AlertEngine::new();
        for (index, threshold) in [1.0, 2.0, 3.0].into_iter().enumerate() {
            engine.add(
                format!("above_{index}"),
                AlertCondition::price_above(threshold),
                "price",
            );
        }
        engine.check_at(&Snapshot::new().with_price(vec![5.0]), at(1));

        let recent: Vec<String> = engine.get_recent(2).into_iter().map(|e| e.name).collect();
        assert_eq!(recent, vec!["above_1", "above_2"]);
        assert_eq!(engine.names(), vec!["above_0", "above_1", "above_2"]);

        engine.clear();
        assert!(engine.get_recent(10).is_empty());
        assert!(!engine.get("above_0").expect("registered").active);
    }

    #[test]
    fn hit_for_replaced_registration_is_dropped() {
        let engine = AlertEngine::new();
        engine.add("p", AlertCondition::price_above(10.0), "first");
        let hits = engine.pending_checks();
        assert_eq!(hits.len(), 1);

        engine.add("p", AlertCondition::price_above(20.0), "second");
        let fired = engine.commit(hits, at(1));

        assert!(fired.is_empty());
        assert!(engine.get_recent(10).is_empty());
        let alert = engine.get("p").expect("registered");
        assert!(alert.active);
        assert_eq!(alert.triggered_at, None);
        assert_eq!(alert.message, "second");
    }

    #[test]
    fn stale_hit_does_not_fire_twice() {
        let engine = AlertEngine::new();
        engine.add("p", AlertCondition::price_above(10.0), "price");
        let first = engine.pending_checks();
        let second = engine.pending_checks();

        assert_eq!(engine.commit(first, at(1)).len(), 1);
        assert!(engine.commit(second, at(2)).is_empty());
        assert_eq!(engine.get_recent(10).len(), 1);
        assert_eq!(engine.get("p").expect("registered").triggered_at, Some(at(1)));
    }

    #[test]
    fn hit_for_removed_alert_is_dropped() {
        let engine = AlertEngine::new();
        engine.add("p", AlertCondition::price_above(10.0), "price");
        let hits = engine.pending_checks();

        engine.remove("p");

        assert!(engine.commit(hits, at(1)).is_empty());
        assert!(engine.get_recent(10).is_empty());
    }

    #[test]
    fn empty_snapshot_evaluates_nothing() {
        let engine = AlertEngine::new();
        engine.add("p", AlertCondition::price_below(1_000.0), "price");
        assert!(engine.check_at(&Snapshot::new(), at(1)).is_empty());
        assert!(engine.get("p").expect("registered").active);
    }
}

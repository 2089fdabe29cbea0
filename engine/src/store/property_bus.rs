//! Property Bus
//!
//! Publish/subscribe channel for parameter changes, keyed by record id and
//! field. Gizmo drags and the property panel are independent writers of the
//! same parameter slots; each publishes here after writing so the other side
//! can refresh without either owning the other.
//!
//! Subscriptions are mailboxes: `publish` queues the change on every matching
//! subscription and the subscriber drains its queue when it next runs.

use std::collections::HashMap;

use super::{MeshId, ParamField};

/// Which UI produced a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeSource {
    Gizmo,
    Panel,
}

/// A parameter value that was written to the store.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyChange {
    pub record: MeshId,
    pub field: ParamField,
    /// Value as stored (already clamped)
    pub value: f32,
    pub source: ChangeSource,
}

/// Which changes a subscription receives. `None` matches anything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyFilter {
    pub record: Option<MeshId>,
    pub field: Option<ParamField>,
}

impl PropertyFilter {
    /// Every change.
    pub fn all() -> Self {
        Self::default()
    }

    /// Every field of one record.
    pub fn record(id: MeshId) -> Self {
        Self {
            record: Some(id),
            field: None,
        }
    }

    /// One field of one record.
    pub fn field(id: MeshId, field: ParamField) -> Self {
        Self {
            record: Some(id),
            field: Some(field),
        }
    }

    pub fn matches(&self, change: &PropertyChange) -> bool {
        self.record.as_ref().is_none_or(|id| *id == change.record)
            && self.field.is_none_or(|field| field == change.field)
    }
}

/// Handle returned by `PropertyBus::subscribe`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Debug)]
struct Subscription {
    filter: PropertyFilter,
    pending: Vec<PropertyChange>,
}

/// The channel itself.
#[derive(Debug, Default)]
pub struct PropertyBus {
    subscriptions: HashMap<SubscriptionId, Subscription>,
    next_id: u64,
}

impl PropertyBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, filter: PropertyFilter) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.insert(
            id,
            Subscription {
                filter,
                pending: Vec::new(),
            },
        );
        id
    }

    /// Drop a subscription and anything still queued on it.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.remove(&id).is_some()
    }

    /// Queue `change` on every matching subscription. Returns how many
    /// subscriptions received it.
    pub fn publish(&mut self, change: PropertyChange) -> usize {
        let mut delivered = 0;
        for subscription in self.subscriptions.values_mut() {
            if subscription.filter.matches(&change) {
                subscription.pending.push(change.clone());
                delivered += 1;
            }
        }
        delivered
    }

    /// Take every queued change for a subscription, oldest first.
    pub fn drain(&mut self, id: SubscriptionId) -> Vec<PropertyChange> {
        self.subscriptions
            .get_mut(&id)
            .map(|subscription| std::mem::take(&mut subscription.pending))
            .unwrap_or_default()
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.len()
    }
}

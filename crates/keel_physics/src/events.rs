//! Physics events (resolved contacts)

use crossbeam_channel::{unbounded, Receiver, Sender};
use keel_math::Vec3;

use crate::body::BodyId;

/// A contact resolved during a collision pass
#[derive(Debug, Clone, Copy)]
pub struct ContactEvent {
    /// First body of the pair
    pub body_a: BodyId,
    /// Second body of the pair
    pub body_b: BodyId,
    /// Contact normal, pointing from body A toward body B
    pub normal: Vec3,
    /// Magnitude of the impulse applied along the normal
    pub impulse: f64,
}

/// Collects contact events for the current step and fans them out to
/// channel subscribers.
#[derive(Debug, Default)]
pub struct EventCollector {
    contacts: Vec<ContactEvent>,
    senders: Vec<Sender<ContactEvent>>,
}

impl EventCollector {
    /// Create a new event collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear events from the previous step
    pub fn clear(&mut self) {
        self.contacts.clear();
    }

    /// Contacts resolved during the last step
    pub fn contacts(&self) -> &[ContactEvent] {
        &self.contacts
    }

    /// Open a channel that receives every future contact event.
    pub fn subscribe(&mut self) -> Receiver<ContactEvent> {
        let (sender, receiver) = unbounded();
        self.senders.push(sender);
        receiver
    }

    /// Record an event and push it to live subscribers; channels whose
    /// receiver was dropped are pruned on the failed send.
    pub(crate) fn emit(&mut self, event: ContactEvent) {
        self.senders.retain(|sender| sender.send(event).is_ok());
        self.contacts.push(event);
    }
}

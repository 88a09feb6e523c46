//! Synchronous publish/subscribe bus for gameplay notifications.
//!
//! Destruction of an actor must be observable by unrelated subsystems
//! (scoring) without either side naming the other. The bus owns its
//! subscriber list explicitly: `subscribe` hands back a token, `unsubscribe`
//! removes exactly that registration, and `publish` invokes every current
//! subscriber in registration order on the calling thread before it returns.
//!
//! One bus instance per event kind — the payload type is the kind.
//!
//! # Re-entrant publication
//! A callback cannot hold `&mut` to the bus it is being invoked from, so
//! nested publication goes through a cloneable [`EventSender`] handle backed
//! by a shared queue. Events sent from inside a callback are drained by the
//! in-flight `publish` before it returns; no lock is held while a callback
//! runs, so nesting cannot deadlock. Events sent while no publish is active
//! are delivered by the frame's pump system.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use bevy::prelude::*;

/// Proof of one registration. Unsubscribing with a stale token is a no-op.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Subscription(u64);

type Callback<E> = Box<dyn FnMut(&E) + Send + Sync>;

pub struct EventBus<E> {
    next_token: u64,
    subscribers: Vec<(u64, Callback<E>)>,
    inbox: Arc<Mutex<VecDeque<E>>>,
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self {
            next_token: 0,
            subscribers: Vec::new(),
            inbox: Arc::default(),
        }
    }
}

impl<E> EventBus<E> {
    /// Register a callback. The same closure registered twice holds two
    /// tokens and fires twice per publish; there is no dedup.
    pub fn subscribe(&mut self, callback: impl FnMut(&E) + Send + Sync + 'static) -> Subscription {
        let token = self.next_token;
        self.next_token += 1;
        self.subscribers.push((token, Box::new(callback)));
        Subscription(token)
    }

    /// Remove the registration behind `token`. Returns whether anything was
    /// removed.
    pub fn unsubscribe(&mut self, token: Subscription) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(id, _)| *id != token.0);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Handle for enqueueing events without `&mut` access, including from
    /// inside a subscriber callback.
    pub fn sender(&self) -> EventSender<E> {
        EventSender(Arc::clone(&self.inbox))
    }

    /// Deliver `event` (and anything senders enqueue during dispatch) to all
    /// current subscribers before returning. With zero subscribers this is a
    /// no-op; nothing is retained for later.
    pub fn publish(&mut self, event: E) {
        self.inbox.lock().expect("event inbox poisoned").push_back(event);
        self.drain();
    }

    /// Deliver queued sender events. `publish` calls this itself; the frame
    /// pump calls it for events sent outside any publish.
    pub fn drain(&mut self) {
        loop {
            let next = self.inbox.lock().expect("event inbox poisoned").pop_front();
            let Some(event) = next else { break };
            for (_, callback) in &mut self.subscribers {
                callback(&event);
            }
        }
    }
}

/// Queue handle shared with [`EventBus`]; see the module docs for delivery
/// timing.
pub struct EventSender<E>(Arc<Mutex<VecDeque<E>>>);

impl<E> Clone for EventSender<E> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<E> EventSender<E> {
    pub fn send(&self, event: E) {
        self.0.lock().expect("event inbox poisoned").push_back(event);
    }
}

/// An enemy was destroyed and its reward should be credited.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyDestroyed {
    pub reward: i32,
}

/// Every enemy kind awards the same amount.
pub const ENEMY_DESTROYED_REWARD: i32 = 100;

#[derive(Resource, Default)]
pub struct EnemyDestroyedBus(pub EventBus<EnemyDestroyed>);

/// Deliver events that senders queued outside a `publish` call.
fn pump_deferred(mut bus: ResMut<EnemyDestroyedBus>) {
    bus.0.drain();
}

pub fn plugin(app: &mut App) {
    app.init_resource::<EnemyDestroyedBus>();
    app.add_systems(PostUpdate, pump_deferred);
}

#[cfg(test)]
mod tests;

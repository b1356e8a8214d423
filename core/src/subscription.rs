use std::cell::RefCell;
use std::rc::Rc;

use futures_util::future::LocalBoxFuture;
use futures_util::task::{LocalSpawn, LocalSpawnExt};
use sweepview_protocol::WireBoard;

use crate::SubscribeError;

/// Receives every board the push channel delivers.
pub type SnapshotSink = Rc<dyn Fn(WireBoard)>;

/// Handle to an established push subscription.
pub trait Subscription {
    fn unsubscribe(self: Box<Self>);
}

/// Ordered stream of boards sent by the engine without being asked.
pub trait PushChannel {
    /// Starts delivering boards to `sink`.
    ///
    /// The sink may already be called before the returned future resolves.
    fn subscribe(
        &self,
        sink: SnapshotSink,
    ) -> LocalBoxFuture<'static, Result<Box<dyn Subscription>, SubscribeError>>;
}

enum SubscriptionState {
    Pending,
    Active(Box<dyn Subscription>),
    Failed,
    Disposed,
}

impl core::fmt::Debug for SubscriptionState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(match self {
            Self::Pending => "Pending",
            Self::Active(_) => "Active",
            Self::Failed => "Failed",
            Self::Disposed => "Disposed",
        })
    }
}

/// Push subscription whose setup completes asynchronously.
///
/// Disposing is synchronous and idempotent. Disposing before setup completes
/// releases the handle as soon as it arrives.
#[derive(Debug)]
pub struct EventSubscriber {
    state: Rc<RefCell<SubscriptionState>>,
}

impl EventSubscriber {
    pub fn start(channel: &dyn PushChannel, sink: SnapshotSink, spawner: &dyn LocalSpawn) -> Self {
        let state = Rc::new(RefCell::new(SubscriptionState::Pending));
        let pending = channel.subscribe(sink);

        let task_state = Rc::downgrade(&state);
        let task = async move {
            let result = pending.await;
            let Some(state) = task_state.upgrade() else {
                if let Ok(handle) = result {
                    handle.unsubscribe();
                }
                return;
            };

            let disposed = matches!(*state.borrow(), SubscriptionState::Disposed);
            match result {
                Ok(handle) if disposed => {
                    log::debug!("subscription resolved after dispose, detaching");
                    handle.unsubscribe();
                }
                Ok(handle) => {
                    log::debug!("subscribed to board updates");
                    *state.borrow_mut() = SubscriptionState::Active(handle);
                }
                Err(err) => {
                    log::warn!("could not subscribe to board updates: {}", err);
                    if !disposed {
                        *state.borrow_mut() = SubscriptionState::Failed;
                    }
                }
            }
        };

        if let Err(err) = spawner.spawn_local(task) {
            log::error!("could not spawn subscription task: {:?}", err);
            *state.borrow_mut() = SubscriptionState::Failed;
        }

        Self { state }
    }

    pub fn is_active(&self) -> bool {
        matches!(*self.state.borrow(), SubscriptionState::Active(_))
    }

    pub fn is_disposed(&self) -> bool {
        matches!(*self.state.borrow(), SubscriptionState::Disposed)
    }

    /// Detaches the subscription. Returns `true` only for the call that
    /// actually released an active handle.
    pub fn dispose(&self) -> bool {
        let previous = self.state.replace(SubscriptionState::Disposed);
        match previous {
            SubscriptionState::Active(handle) => {
                handle.unsubscribe();
                true
            }
            _ => false,
        }
    }
}

impl Drop for EventSubscriber {
    fn drop(&mut self) {
        self.dispose();
    }
}

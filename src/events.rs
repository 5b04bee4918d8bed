use tokio::sync::mpsc;
use tracing::{error, info};
use uuid::Uuid;

use crate::entities::order::OrderStatus;

/// Domain events emitted after a transaction commits. Consumers must never
/// observe an event for state that was rolled back.
#[derive(Debug, Clone)]
pub enum Event {
    OrderPlaced {
        order_id: Uuid,
        order_number: String,
        customer_id: Uuid,
    },
    OrderStatusChanged {
        order_id: Uuid,
        status: OrderStatus,
    },
    CustomerRegistered {
        customer_id: Uuid,
        email: String,
    },
}

#[derive(Debug, Clone)]
pub struct EventSender {
    tx: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(tx: mpsc::Sender<Event>) -> Self {
        Self { tx }
    }

    /// Best effort: a full or closed channel is logged, never surfaced to the
    /// request path.
    pub async fn send(&self, event: Event) {
        if let Err(e) = self.tx.send(event).await {
            error!("failed to enqueue event: {}", e);
        }
    }
}

pub fn event_channel(buffer: usize) -> (EventSender, mpsc::Receiver<Event>) {
    let (tx, rx) = mpsc::channel(buffer);
    (EventSender::new(tx), rx)
}

/// Drains the event queue for the life of the process.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    while let Some(event) = rx.recv().await {
        match event {
            Event::OrderPlaced {
                order_id,
                order_number,
                customer_id,
            } => {
                info!(%order_id, %order_number, %customer_id, "order placed");
            }
            Event::OrderStatusChanged { order_id, status } => {
                info!(%order_id, status = status.as_str(), "order status changed");
            }
            Event::CustomerRegistered { customer_id, email } => {
                info!(%customer_id, %email, "customer registered");
            }
        }
    }
}

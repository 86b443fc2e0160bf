use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Handle used by services to publish domain events without blocking the
/// request path on downstream consumers.
#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously.
    pub async fn send(&self, event: Event) -> Result<(), String> {
        self.sender
            .send(event)
            .await
            .map_err(|e| format!("Failed to send event: {}", e))
    }

    /// Sends an event, logging a warning instead of failing the caller when
    /// the event channel is closed. Used where event delivery is best-effort.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!("Event dropped: {}", e);
        }
    }
}

// Domain events emitted by the service layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Event {
    // Stock events
    StockAdjusted {
        part_id: i64,
        old_quantity: Decimal,
        new_quantity: Decimal,
        reason: String,
    },

    // Stock transfer events
    TransferCreated {
        transfer_id: i64,
        transfer_number: String,
    },
    TransferCompleted {
        transfer_id: i64,
        destination_part_id: i64,
    },
    TransferCancelled(i64),

    // Purchase events
    PurchaseReceived {
        purchase_id: i64,
        invoice_number: String,
        total_amount: Decimal,
    },
    PurchaseUpdated(i64),
    PurchaseDeleted(i64),

    // Job card events
    JobCardCreated {
        job_card_id: i64,
        job_card_number: String,
        scooter_id: i64,
    },
    JobCardStatusChanged {
        job_card_id: i64,
        old_status: String,
        new_status: String,
    },
    JobCardCompleted {
        job_card_id: i64,
        total_cost: Decimal,
    },
    JobCardDeleted(i64),
    PartConsumed {
        job_card_id: i64,
        part_id: i64,
        quantity: Decimal,
    },

    // Rental events
    RentalCreated {
        rental_id: i64,
        rental_number: String,
        scooter_id: i64,
    },
    RentalReturned {
        rental_id: i64,
        scooter_id: i64,
    },
    RentalCancelled(i64),

    // Cart events
    CartItemAdded {
        session_id: String,
        product_id: i64,
    },
    CartItemRemoved {
        session_id: String,
        product_id: i64,
    },
    CartCleared(String),
}

/// Drains the event channel, logging each event. Consumers that need to react
/// to specific events (notifications, audit trail) hook in here.
pub async fn process_events(mut rx: mpsc::Receiver<Event>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        match &event {
            Event::StockAdjusted {
                part_id,
                old_quantity,
                new_quantity,
                reason,
            } => {
                info!(
                    part_id,
                    %old_quantity,
                    %new_quantity,
                    reason,
                    "stock adjusted"
                );
            }
            Event::TransferCompleted {
                transfer_id,
                destination_part_id,
            } => {
                info!(transfer_id, destination_part_id, "transfer completed");
            }
            Event::JobCardCompleted {
                job_card_id,
                total_cost,
            } => {
                info!(job_card_id, %total_cost, "job card completed");
            }
            other => {
                info!("event: {:?}", other);
            }
        }
    }

    info!("Event processing loop stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn send_delivers_event_to_receiver() {
        let (tx, mut rx) = mpsc::channel(8);
        let sender = EventSender::new(tx);
        sender
            .send(Event::TransferCancelled(42))
            .await
            .expect("send should succeed");
        match rx.recv().await {
            Some(Event::TransferCancelled(id)) => assert_eq!(id, 42),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[tokio::test]
    async fn send_or_log_swallows_closed_channel() {
        let (tx, rx) = mpsc::channel(1);
        drop(rx);
        let sender = EventSender::new(tx);
        // Must not panic or return an error to the caller.
        sender.send_or_log(Event::CartCleared("s1".into())).await;
    }
}

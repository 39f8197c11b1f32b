use std::fmt::Debug;
use std::sync::Arc;

use async_trait::async_trait;
use mockall::automock;
use time::PrimitiveDateTime;
use uuid::Uuid;

use crate::permission::Authentication;
use crate::ServiceError;

/// The slot length for a free-slot query, either given directly or derived
/// from a catalog offering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotDuration {
    Minutes(u32),
    Offering(Uuid),
}

#[automock(type Context=(); type Transaction=dao::MockTransaction;)]
#[async_trait]
pub trait SchedulingService {
    type Context: Clone + PartialEq + Eq + Debug + Send + Sync + 'static;
    type Transaction: dao::Transaction + 'static;

    /// Bookable start times for the trainer on the given calendar date.
    /// Advisory only; the authoritative check happens when the booking is
    /// created or approved.
    async fn free_slots(
        &self,
        trainer_id: Uuid,
        date: time::Date,
        duration: SlotDuration,
        context: Authentication<Self::Context>,
        tx: Option<Self::Transaction>,
    ) -> Result<Arc<[PrimitiveDateTime]>, ServiceError>;
}

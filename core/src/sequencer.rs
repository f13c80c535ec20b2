// bikeshop/src/sequencer.rs

//! Orders overlapping cart mutations on the same product.
//!
//! Each mutation takes a ticket, then the product's lock. The lock serialises
//! the refetch/apply round trips; the ticket lets a mutation notice that a newer
//! one is already queued so it can skip a reload that would immediately be
//! overwritten.
//!
//! Bookkeeping for a product lives only while a mutation of it is queued or
//! running, so the maps never outgrow the set of products being mutated.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::model::ProductId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationTicket {
  pub product_id: ProductId,
  pub seq: u64,
}

#[derive(Debug, Default)]
pub struct MutationSequencer {
  // Shared across products so a sequence number is never handed out twice.
  next_seq: AtomicU64,
  latest: Mutex<HashMap<ProductId, u64>>,
  locks: Mutex<HashMap<ProductId, Arc<AsyncMutex<()>>>>,
}

/// Held for the duration of one mutation. Dropping it releases the product's
/// lock and forgets the product once nothing else is queued for it.
#[derive(Debug)]
pub struct InFlight<'a> {
  sequencer: &'a MutationSequencer,
  ticket: MutationTicket,
  guard: Option<OwnedMutexGuard<()>>,
}

impl InFlight<'_> {
  pub fn ticket(&self) -> MutationTicket {
    self.ticket
  }
}

impl Drop for InFlight<'_> {
  fn drop(&mut self) {
    drop(self.guard.take());
    self.sequencer.release(self.ticket);
  }
}

impl MutationSequencer {
  pub fn new() -> Self {
    Self::default()
  }

  /// Issues the next ticket for `product_id`, superseding every earlier one.
  pub fn issue(&self, product_id: ProductId) -> MutationTicket {
    let seq = self.next_seq.fetch_add(1, Ordering::Relaxed) + 1;
    self.latest.lock().insert(product_id, seq);
    MutationTicket { product_id, seq }
  }

  pub fn is_current(&self, ticket: MutationTicket) -> bool {
    self.latest.lock().get(&ticket.product_id).copied() == Some(ticket.seq)
  }

  /// Waits until no other mutation of the ticket's product is in flight.
  pub async fn acquire(&self, ticket: MutationTicket) -> InFlight<'_> {
    let lock = {
      let mut locks = self.locks.lock();
      Arc::clone(locks.entry(ticket.product_id).or_default())
    };
    let guard = lock.lock_owned().await;
    InFlight {
      sequencer: self,
      ticket,
      guard: Some(guard),
    }
  }

  /// Issues a ticket for `product_id` and waits for its lock.
  pub async fn begin(&self, product_id: ProductId) -> InFlight<'_> {
    let ticket = self.issue(product_id);
    self.acquire(ticket).await
  }

  /// Number of products with a mutation queued or running.
  pub fn tracked_products(&self) -> usize {
    self.latest.lock().len().max(self.locks.lock().len())
  }

  fn release(&self, ticket: MutationTicket) {
    {
      let mut latest = self.latest.lock();
      if latest.get(&ticket.product_id) == Some(&ticket.seq) {
        latest.remove(&ticket.product_id);
      }
    }
    // Waiters hold their own clone of the lock, so a count of one means nobody is queued.
    let mut locks = self.locks.lock();
    if locks.get(&ticket.product_id).is_some_and(|lock| Arc::strong_count(lock) == 1) {
      locks.remove(&ticket.product_id);
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::time::Duration;

  #[test]
  fn newer_ticket_supersedes_older_for_same_product_only() {
    let sequencer = MutationSequencer::new();
    let first = sequencer.issue(1);
    let other_product = sequencer.issue(2);
    let second = sequencer.issue(1);

    assert!(!sequencer.is_current(first));
    assert!(sequencer.is_current(second));
    assert!(sequencer.is_current(other_product));
  }

  #[tokio::test]
  async fn acquire_serialises_mutations_per_product() {
    let sequencer = Arc::new(MutationSequencer::new());
    let held = sequencer.begin(5).await;

    let waiter = {
      let sequencer = Arc::clone(&sequencer);
      tokio::spawn(async move {
        let _in_flight = sequencer.begin(5).await;
      })
    };

    // Another product is not blocked.
    let unrelated = tokio::time::timeout(Duration::from_millis(50), sequencer.begin(6))
      .await
      .unwrap();
    drop(unrelated);

    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(!waiter.is_finished());
    drop(held);
    tokio::time::timeout(Duration::from_secs(1), waiter).await.unwrap().unwrap();
    assert_eq!(sequencer.tracked_products(), 0);
  }

  #[tokio::test]
  async fn finished_mutations_leave_nothing_behind() {
    let sequencer = MutationSequencer::new();

    for product_id in 0..10_000 {
      let in_flight = sequencer.begin(product_id).await;
      assert!(sequencer.is_current(in_flight.ticket()));
    }

    assert_eq!(sequencer.tracked_products(), 0);
  }

  #[tokio::test]
  async fn queued_mutation_keeps_its_product_tracked() {
    let sequencer = Arc::new(MutationSequencer::new());
    let older = sequencer.begin(3).await;

    let newer = {
      let sequencer = Arc::clone(&sequencer);
      tokio::spawn(async move {
        let in_flight = sequencer.begin(3).await;
        sequencer.is_current(in_flight.ticket())
      })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    assert!(!sequencer.is_current(older.ticket()));
    drop(older);
    assert_eq!(sequencer.tracked_products(), 1);

    assert!(tokio::time::timeout(Duration::from_secs(1), newer).await.unwrap().unwrap());
    assert_eq!(sequencer.tracked_products(), 0);
  }

  #[test]
  fn sequence_numbers_are_not_reused_after_release() {
    let sequencer = MutationSequencer::new();
    let first = sequencer.issue(1);
    sequencer.release(first);
    let second = sequencer.issue(1);

    assert!(second.seq > first.seq);
    assert!(!sequencer.is_current(first));
  }
}

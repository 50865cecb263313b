//! Per-slot tracking of in-flight and failed image requests.
//!
//! Requests for different slots are independent. A second request for a
//! slot that is still pending is rejected. A failed request keeps its exact
//! parameters so it can be re-issued unchanged.

use std::collections::HashMap;

use adforge_core::{AspectRatio, Slot};
use serde::Serialize;
use tokio::sync::Mutex;

use crate::adapter::GenAiClient;
use crate::backend::{GenerativeBackend, InlineImage};
use crate::error::{GenAiError, GenAiResult};

/// The parameters of one slot request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum SlotRequest {
    /// Generate a new image.
    Generate {
        /// Subject prompt, without framing.
        prompt: String,
        /// Target page format.
        aspect_ratio: AspectRatio,
        /// Reference images.
        references: Vec<InlineImage>,
    },
    /// Edit an existing image.
    Edit {
        /// Image to edit.
        source: InlineImage,
        /// Edit instruction.
        prompt: String,
    },
}

impl SlotRequest {
    /// Run the request against a client.
    ///
    /// # Errors
    ///
    /// Propagates the adapter's generation or edit failure.
    pub async fn execute<B: GenerativeBackend>(&self, client: &GenAiClient<B>) -> GenAiResult<InlineImage> {
        match self {
            Self::Generate {
                prompt,
                aspect_ratio,
                references,
            } => client.generate_image(prompt, *aspect_ratio, references).await,
            Self::Edit { source, prompt } => client.edit_image(source, prompt).await,
        }
    }
}

/// Receipt for a started request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    slot: Slot,
    seq: u64,
}

impl Ticket {
    /// The slot this ticket belongs to.
    #[must_use]
    pub fn slot(&self) -> Slot {
        self.slot
    }
}

/// The presentation state of one slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum SlotState {
    /// A request is in flight.
    Pending {
        /// The request being served.
        request: SlotRequest,
        /// Sequence number of the owning ticket.
        #[serde(skip)]
        seq: u64,
    },
    /// The last request failed.
    Failed {
        /// The request to re-issue.
        request: SlotRequest,
        /// User-facing reason.
        error: String,
    },
}

/// Slot states, keyed by slot. A slot with no entry is idle.
#[derive(Debug, Default)]
pub struct SlotRegistry {
    slots: HashMap<Slot, SlotState>,
    next_seq: u64,
}

impl SlotRegistry {
    /// An empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a slot pending.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::SlotBusy`] if the slot already has a request in flight.
    pub fn begin(&mut self, slot: Slot, request: SlotRequest) -> GenAiResult<Ticket> {
        if self.is_pending(slot) {
            return Err(GenAiError::SlotBusy(slot));
        }
        self.next_seq += 1;
        let seq = self.next_seq;
        self.slots.insert(slot, SlotState::Pending { request, seq });
        tracing::debug!(%slot, "generation started");
        Ok(Ticket { slot, seq })
    }

    /// Clear a finished request. Returns `false` for a stale ticket.
    pub fn complete(&mut self, ticket: Ticket) -> bool {
        if !self.owns(ticket) {
            return false;
        }
        self.slots.remove(&ticket.slot);
        true
    }

    /// Record a failed request. Returns `false` for a stale ticket.
    pub fn fail(&mut self, ticket: Ticket, error: &GenAiError) -> bool {
        if !self.owns(ticket) {
            return false;
        }
        if let Some(SlotState::Pending { request, .. }) = self.slots.remove(&ticket.slot) {
            tracing::warn!(slot = %ticket.slot, %error, "generation failed");
            self.slots.insert(
                ticket.slot,
                SlotState::Failed {
                    request,
                    error: error.to_string(),
                },
            );
        }
        true
    }

    /// Drop a slot's state, e.g. after its element was deleted.
    pub fn forget(&mut self, slot: Slot) {
        self.slots.remove(&slot);
    }

    /// A slot's state, `None` when idle.
    #[must_use]
    pub fn state(&self, slot: Slot) -> Option<&SlotState> {
        self.slots.get(&slot)
    }

    /// Whether a slot has a request in flight.
    #[must_use]
    pub fn is_pending(&self, slot: Slot) -> bool {
        matches!(self.slots.get(&slot), Some(SlotState::Pending { .. }))
    }

    /// The exact request of a failed slot.
    #[must_use]
    pub fn retry_request(&self, slot: Slot) -> Option<SlotRequest> {
        match self.slots.get(&slot) {
            Some(SlotState::Failed { request, .. }) => Some(request.clone()),
            _ => None,
        }
    }

    fn owns(&self, ticket: Ticket) -> bool {
        matches!(
            self.slots.get(&ticket.slot),
            Some(SlotState::Pending { seq, .. }) if *seq == ticket.seq
        )
    }
}

/// Run `request` for `slot`, holding the registry lock only while updating it.
///
/// # Errors
///
/// Returns [`GenAiError::SlotBusy`] if the slot is pending, else the
/// request's own failure, which is also recorded in the registry.
pub async fn run_slot<B: GenerativeBackend>(
    registry: &Mutex<SlotRegistry>,
    client: &GenAiClient<B>,
    slot: Slot,
    request: SlotRequest,
) -> GenAiResult<InlineImage> {
    let ticket = registry.lock().await.begin(slot, request.clone())?;
    let result = request.execute(client).await;
    let mut slots = registry.lock().await;
    match &result {
        Ok(_) => {
            slots.complete(ticket);
        }
        Err(e) => {
            slots.fail(ticket, e);
        }
    }
    result
}

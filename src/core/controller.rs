//! Autocomplete controller: fans input out to every registered provider,
//! merges their partial and final batches, and drives the update callback.
//!
//! One query cycle at a time: `start` implicitly cancels the previous cycle
//! by cancelling its token, so results from dead cycles are dropped at the
//! point of delivery rather than being tracked by generation counters.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use tokio_util::sync::CancellationToken;
use tracing::{debug, trace};

use crate::core::input::AutocompleteInput;
use crate::core::matches::{AutocompleteMatch, MatchKind};
use crate::providers::Provider;

/// Host callback invoked with the sorted, deduped match list after every
/// merge. `continuous` is true while providers are still pending.
pub type UpdateListener = dyn Fn(&[AutocompleteMatch], bool) + Send + Sync;

/// Where the controller is in the current cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControllerState {
    /// No active cycle.
    Idle,
    /// Fan-out issued, at least one provider still pending.
    Querying,
    /// Every provider has delivered its final batch for the current input.
    Settled,
}

struct MergeState {
    matches: HashMap<String, AutocompleteMatch>,
    pending: usize,
}

struct SinkInner {
    cycle: CancellationToken,
    state: Mutex<MergeState>,
    listener: Arc<UpdateListener>,
    max_results: usize,
}

/// Per-cycle delivery handle passed to providers. Cloneable; all clones
/// share the cycle's cancellation token and accumulated state.
#[derive(Clone)]
pub struct ResultSink {
    inner: Arc<SinkInner>,
}

impl ResultSink {
    fn new(listener: Arc<UpdateListener>, provider_count: usize, max_results: usize) -> Self {
        Self {
            inner: Arc::new(SinkInner {
                cycle: CancellationToken::new(),
                state: Mutex::new(MergeState {
                    matches: HashMap::new(),
                    pending: provider_count,
                }),
                listener,
                max_results,
            }),
        }
    }

    /// The cycle's cancellation token. Async providers select against this
    /// (or a child of it) so in-flight work dies with the cycle.
    pub fn cancellation(&self) -> CancellationToken {
        self.inner.cycle.clone()
    }

    /// True once the cycle this sink belongs to has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.inner.cycle.is_cancelled()
    }

    /// Merge a provider batch into the accumulated set and notify the
    /// listener. Deliveries for a cancelled cycle are silent no-ops.
    pub fn deliver(&self, provider: &'static str, batch: Vec<AutocompleteMatch>) {
        if self.is_cancelled() {
            trace!(provider, "dropping stale delivery");
            return;
        }

        let (snapshot, continuous) = {
            let mut state = self.lock_state();
            for m in batch {
                merge_match(&mut state.matches, m);
            }
            (self.snapshot_locked(&state), state.pending > 0)
        };
        trace!(provider, results = snapshot.len(), "merged batch");
        (self.inner.listener)(&snapshot, continuous);
    }

    /// Mark a provider's final batch as delivered. When the last pending
    /// provider finishes, the cycle settles and the listener fires once
    /// more with `continuous = false`.
    pub fn finish(&self, provider: &'static str) {
        if self.is_cancelled() {
            return;
        }

        let settled_snapshot = {
            let mut state = self.lock_state();
            debug_assert!(state.pending > 0, "{provider} finished twice in one cycle");
            state.pending = state.pending.saturating_sub(1);
            if state.pending == 0 {
                Some(self.snapshot_locked(&state))
            } else {
                None
            }
        };
        if let Some(snapshot) = settled_snapshot {
            debug!(provider, "cycle settled");
            (self.inner.listener)(&snapshot, false);
        }
    }

    fn cancel(&self) {
        self.inner.cycle.cancel();
    }

    fn pending(&self) -> usize {
        self.lock_state().pending
    }

    fn results(&self) -> Vec<AutocompleteMatch> {
        let state = self.lock_state();
        self.snapshot_locked(&state)
    }

    fn lock_state(&self) -> MutexGuard<'_, MergeState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn snapshot_locked(&self, state: &MergeState) -> Vec<AutocompleteMatch> {
        let mut sorted: Vec<AutocompleteMatch> = state.matches.values().cloned().collect();
        sorted.sort_by(|a, b| {
            b.relevance
                .cmp(&a.relevance)
                .then(a.kind.priority().cmp(&b.kind.priority()))
                .then(a.dedup_key.cmp(&b.dedup_key))
        });
        sorted.truncate(self.inner.max_results);
        sorted
    }
}

/// Merge one incoming match into the accumulated set.
///
/// First write wins for everything except relevance and default/inline
/// eligibility, which follow whichever candidate scores higher. A collision
/// with an open-tab match flags the cross-reference signal.
fn merge_match(accumulated: &mut HashMap<String, AutocompleteMatch>, incoming: AutocompleteMatch) {
    match accumulated.entry(incoming.dedup_key.clone()) {
        std::collections::hash_map::Entry::Vacant(slot) => {
            slot.insert(incoming);
        }
        std::collections::hash_map::Entry::Occupied(mut slot) => {
            let existing = slot.get_mut();
            if incoming.kind == MatchKind::OpenTab || existing.kind == MatchKind::OpenTab {
                existing.signals.has_open_tab_match = true;
            }
            if incoming.relevance > existing.relevance {
                existing.relevance = incoming.relevance;
                existing.allowed_to_be_default = incoming.allowed_to_be_default;
                existing.inline_completion = incoming.inline_completion;
            }
        }
    }
}

/// The coordinator for one omnibox instance.
pub struct AutocompleteController {
    providers: Vec<Arc<dyn Provider>>,
    listener: Arc<UpdateListener>,
    max_results: usize,
    cycle: Mutex<Option<ResultSink>>,
}

impl AutocompleteController {
    pub fn new(
        providers: Vec<Arc<dyn Provider>>,
        listener: impl Fn(&[AutocompleteMatch], bool) + Send + Sync + 'static,
        max_results: usize,
    ) -> Self {
        Self {
            providers,
            listener: Arc::new(listener),
            max_results,
            cycle: Mutex::new(None),
        }
    }

    /// Begin a new query cycle, implicitly stopping any in-flight one.
    ///
    /// Synchronous providers deliver before this returns, so the first
    /// listener invocation already carries their matches.
    pub fn start(&self, input: AutocompleteInput) {
        self.stop();

        debug!(text = %input.text, input_type = ?input.input_type, "starting query cycle");
        let sink = ResultSink::new(
            Arc::clone(&self.listener),
            self.providers.len(),
            self.max_results,
        );
        {
            let mut cycle = self.lock_cycle();
            *cycle = Some(sink.clone());
        }

        for provider in &self.providers {
            provider.start(&input, &sink);
        }
    }

    /// Cancel the current cycle, stop every provider, and return to idle.
    /// Safe to call repeatedly or with no cycle in flight.
    pub fn stop(&self) {
        let previous = self.lock_cycle().take();
        if let Some(sink) = previous {
            sink.cancel();
            debug!("stopped query cycle");
        }
        for provider in &self.providers {
            provider.stop();
        }
    }

    pub fn state(&self) -> ControllerState {
        match &*self.lock_cycle() {
            None => ControllerState::Idle,
            Some(sink) if sink.pending() == 0 => ControllerState::Settled,
            Some(_) => ControllerState::Querying,
        }
    }

    /// Sorted, deduped snapshot of the current cycle's results.
    pub fn results(&self) -> Vec<AutocompleteMatch> {
        let sink = self.lock_cycle().clone();
        sink.map(|s| s.results()).unwrap_or_default()
    }

    /// The highest-relevance match allowed to be default: the inline
    /// completion and Enter-key candidate.
    pub fn default_match(&self) -> Option<AutocompleteMatch> {
        self.results()
            .into_iter()
            .find(|m| m.allowed_to_be_default)
    }

    fn lock_cycle(&self) -> MutexGuard<'_, Option<ResultSink>> {
        self.cycle
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

//! Suggestion providers.
//!
//! Each provider implements the same start/stop contract: `start` may
//! deliver result batches synchronously (before returning) or
//! asynchronously from a spawned task, and `stop` must turn any later
//! delivery into a no-op. Providers never surface errors to the
//! controller; upstream failures are logged and degrade to an empty
//! delivery.

use crate::core::controller::ResultSink;
use crate::core::input::AutocompleteInput;

pub mod bookmark;
pub mod history_quick;
pub mod history_url;
pub mod open_tab;
pub mod pedal;
pub mod search;
pub mod shortcuts;
pub mod zero_suggest;

pub use bookmark::BookmarkProvider;
pub use history_quick::HistoryQuickProvider;
pub use history_url::HistoryUrlProvider;
pub use open_tab::OpenTabProvider;
pub use pedal::PedalProvider;
pub use search::SearchProvider;
pub use shortcuts::ShortcutsProvider;
pub use zero_suggest::ZeroSuggestProvider;

/// The common provider contract.
///
/// Implementations hold no state observable outside a single query cycle
/// except long-lived caches (the URL index) and in-flight cancellation
/// handles.
pub trait Provider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Begin answering `input`. Zero or more `sink.deliver` calls may
    /// happen before this returns (synchronous providers) or after it
    /// (asynchronous providers); every provider eventually calls
    /// `sink.finish` exactly once per cycle.
    fn start(&self, input: &AutocompleteInput, sink: &ResultSink);

    /// Abort any in-flight work. All future deliveries for the cycle must
    /// become no-ops. Must be idempotent.
    fn stop(&self);
}

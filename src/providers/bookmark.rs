//! Bookmark provider stub.
//!
//! The bookmark subsystem is not implemented upstream yet; this provider
//! keeps its slot in the fan-out and always settles with an empty delivery.
//! The `is_bookmarked` cross-reference signal stays false everywhere until
//! the real store lands.

use std::sync::Arc;

use tracing::trace;

use crate::core::controller::ResultSink;
use crate::core::input::AutocompleteInput;
use crate::providers::Provider;
use crate::stores::BookmarkStore;

pub const NAME: &str = "bookmark";

pub struct BookmarkProvider {
    // Held so the wiring is in place when the store grows an implementation.
    _store: Arc<dyn BookmarkStore>,
}

impl BookmarkProvider {
    pub fn new(store: Arc<dyn BookmarkStore>) -> Self {
        Self { _store: store }
    }
}

impl Provider for BookmarkProvider {
    fn name(&self) -> &'static str {
        NAME
    }

    fn start(&self, _input: &AutocompleteInput, sink: &ResultSink) {
        trace!("bookmark provider stubbed out");
        sink.finish(NAME);
    }

    fn stop(&self) {}
}

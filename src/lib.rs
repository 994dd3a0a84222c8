//! Omnibox autocomplete engine.
//!
//! Turns each keystroke in an address/search bar into a ranked list of
//! navigable suggestions: URLs from history, search queries, open tabs,
//! learned shortcuts, and built-in commands. Results from several
//! independently paced providers are merged, deduped, and re-ranked on
//! every delivery, and a new keystroke cleanly cancels the previous cycle.
//!
//! # Architecture
//!
//! The library is organized into these main modules:
//!
//! - [`classifier`] - Coarse input classification (URL vs query)
//! - [`tokenizer`] - Token splitting and term matching
//! - [`scoring`] - Frecency and relevance scoring (pure, clock-injected)
//! - [`index`] - In-memory URL index over significant history
//! - [`core`] - Input/match model and the autocomplete controller
//! - [`providers`] - Suggestion sources behind a common start/stop contract
//! - [`stores`] - Host-implemented storage and network interfaces
//! - [`omnibox`] - The facade the UI drives
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use omnibox::{Omnibox, OmniboxConfig, UrlIndex, InputTrigger};
//!
//! let config = OmniboxConfig::load();
//! let index = Arc::new(UrlIndex::new());
//! let omnibox = Omnibox::new(&config, host_services, index, |matches, continuous| {
//!     render_dropdown(matches, continuous);
//! });
//!
//! omnibox.handle_input("gith", InputTrigger::Keystroke);
//! ```

// Public modules
pub mod classifier;
pub mod config;
pub mod core;
pub mod index;
pub mod omnibox;
pub mod providers;
pub mod scoring;
pub mod stores;
pub mod tokenizer;

// Internal modules
mod error;

// Re-export commonly used types for convenience
pub use crate::core::controller::{AutocompleteController, ControllerState};
pub use crate::core::input::{AutocompleteInput, InputTrigger, InputType};
pub use crate::core::matches::{AutocompleteMatch, MatchKind, ScoringSignals};
pub use config::OmniboxConfig;
pub use error::{OmniboxError, OmniboxResult};
pub use index::UrlIndex;
pub use omnibox::{HostServices, NavigationAction, Omnibox, OpenDisposition, PedalAction};

//! Core autocomplete types: the per-cycle input, the match model, and the
//! controller that coordinates providers.

pub mod controller;
pub mod input;
pub mod matches;

//! Scoring model: frecency and provider relevance.
//!
//! Frecency combines frequency (how often) and recency (how recently) with
//! exponential decay:
//!
//! ```text
//! frecency = decay × (type_weight × ln(1 + visits) + typed_bonus)
//! decay    = e^(-λ × elapsed_ms),  λ = ln(2) / half_life_ms
//! ```
//!
//! All functions here are pure: `now_ms` is always a parameter, never read
//! from the wall clock, so identical inputs give identical scores. Counts
//! and timestamps come from untrusted persisted state and are clamped, not
//! rejected.

use crate::core::matches::{Band, ScoringSignals, SHORTCUT_BAND};
use crate::stores::VisitKind;

/// Half-life of the full frecency decay.
pub const FRECENCY_HALF_LIFE_DAYS: f64 = 30.0;
/// Half-life of the simplified fast-path variant.
pub const SIMPLE_HALF_LIFE_HOURS: f64 = 72.0;
/// Half-life of the shortcut hit decay.
pub const SHORTCUT_HALF_LIFE_DAYS: f64 = 7.0;

/// Relevance bonus for URLs the user has visited by typing.
pub const TYPED_VISIT_BONUS: i32 = 20;
/// Relevance bonus for matches eligible for inline completion.
pub const INLINE_ELIGIBLE_BONUS: i32 = 30;

const MS_PER_DAY: f64 = 86_400_000.0;
const MS_PER_HOUR: f64 = 3_600_000.0;

/// Half-saturation constant for mapping raw frecency onto [0, 1).
const FRECENCY_NORM_K: f64 = 4.0;

/// Visit-transition weight in the frecency formula.
fn type_weight(kind: VisitKind) -> f64 {
    match kind {
        VisitKind::Link => 1.0,
        VisitKind::Typed => 4.0,
        VisitKind::Bookmark => 2.0,
        VisitKind::Redirect => 0.3,
        VisitKind::Reload => 0.5,
    }
}

/// Milliseconds elapsed since `last_ms`, clamped so future timestamps count
/// as "just now" instead of producing a boost.
fn clamped_elapsed_ms(now_ms: i64, last_ms: i64) -> f64 {
    now_ms.saturating_sub(last_ms).max(0) as f64
}

fn clamp_count(count: i64) -> f64 {
    count.max(0) as f64
}

fn decay(elapsed_ms: f64, half_life_ms: f64) -> f64 {
    (-(std::f64::consts::LN_2 / half_life_ms) * elapsed_ms).exp()
}

/// Full frecency score for a history entry, 30-day half-life.
pub fn frecency(
    visit_count: i64,
    typed_count: i64,
    last_visit_ms: i64,
    last_visit_kind: VisitKind,
    now_ms: i64,
) -> f64 {
    let elapsed = clamped_elapsed_ms(now_ms, last_visit_ms);
    let typed = clamp_count(typed_count);
    let typed_bonus = if typed > 0.0 { 2.0 * typed.ln_1p() } else { 0.0 };
    decay(elapsed, FRECENCY_HALF_LIFE_DAYS * MS_PER_DAY)
        * (type_weight(last_visit_kind) * clamp_count(visit_count).ln_1p() + typed_bonus)
}

/// Simplified fast-path frecency: visit count only, 72-hour half-life.
pub fn simple_frecency(visit_count: i64, last_visit_ms: i64, now_ms: i64) -> f64 {
    let elapsed = clamped_elapsed_ms(now_ms, last_visit_ms);
    decay(elapsed, SIMPLE_HALF_LIFE_HOURS * MS_PER_HOUR) * clamp_count(visit_count).ln_1p()
}

/// Length-dependent weight of the frecency term: long inputs shift weight
/// from history toward literal match quality.
pub fn frecency_weight(input_len: usize) -> f64 {
    (0.7 - 0.02 * input_len.min(30) as f64).max(0.3)
}

fn normalize_frecency(frecency: f64) -> f64 {
    let f = frecency.max(0.0);
    f / (f + FRECENCY_NORM_K)
}

/// Map a history match's signals onto a provider band.
///
/// Blends normalized frecency with match quality, then applies the fixed
/// typed-visit and inline-eligibility bonuses, capped at the band maximum.
pub fn history_relevance(
    signals: &ScoringSignals,
    input_len: usize,
    band: Band,
    inline_eligible: bool,
) -> i32 {
    let w = frecency_weight(input_len);
    let blended = w * normalize_frecency(signals.frecency)
        + (1.0 - w) * signals.match_quality.clamp(0.0, 1.0);

    let mut relevance = band.place(blended);
    if signals.typed_count > 0 {
        relevance += TYPED_VISIT_BONUS;
    }
    if inline_eligible {
        relevance += INLINE_ELIGIBLE_BONUS;
    }
    relevance.min(band.max)
}

/// Shortcut relevance: log-scaled hit count with a 7-day half-life, plus a
/// specificity bonus for how much of the stored trigger the current input
/// covers.
pub fn shortcut_relevance(
    hit_count: i64,
    last_used_ms: i64,
    input_len: usize,
    trigger_len: usize,
    now_ms: i64,
) -> i32 {
    let elapsed = clamped_elapsed_ms(now_ms, last_used_ms);
    let hits = clamp_count(hit_count).ln_1p();
    let hit_score = hits / (hits + 1.0) * decay(elapsed, SHORTCUT_HALF_LIFE_DAYS * MS_PER_DAY);

    let coverage = if trigger_len == 0 {
        0.0
    } else {
        input_len.min(trigger_len) as f64 / trigger_len as f64
    };

    // Weighted so that a decayed-out shortcut falls below the
    // default-eligibility threshold even when the trigger is fully covered.
    SHORTCUT_BAND.place(0.6 * hit_score + 0.4 * coverage)
}

/// Current wall-clock time in milliseconds since the Unix epoch. The one
/// place the engine reads the clock; scoring functions themselves only ever
/// receive it as a parameter.
pub fn now_ms() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

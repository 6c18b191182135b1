//! Page helpers: device sniffing, geometry and deferred calls.
//!
//! This module provides helper functions used by page scripts and by the news
//! components:
//! - Mobile user-agent detection
//! - Percentage mapping of a value within a range
//! - Legacy `offsetParent` chain walks for element positions
//! - Deferring a call to the next scheduler turn
//! - Log-friendly text previews

use crate::dom::{Dom, NodeId};
use once_cell::sync::Lazy;
use std::collections::HashSet;
use regex::Regex;
use tracing::trace;

static MOBILE_AGENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)iPhone|iPad|iPod|Android|Blackberry|Nokia|Opera mini|Windows mobile|Windows phone|iemobile",
    )
    .expect("mobile agent pattern is valid")
});

/// True when the user agent names a phone or tablet platform.
///
/// The match is case-insensitive against a fixed set of device identifiers.
pub fn device_is_mobile(user_agent: &str) -> bool {
    let mobile = MOBILE_AGENT.is_match(user_agent);
    trace!(mobile, "Checked user agent");
    mobile
}

/// Map `value` within `[min, max]` onto a percentage.
///
/// `min` maps to 0 and `max` to 100; values outside the range extrapolate.
/// When `max == min` the result is non-finite rather than an error.
///
/// # Examples
///
/// ```
/// use quicknr_news::utils::range_to_percent;
/// assert_eq!(range_to_percent(15.0, 10.0, 20.0), 50.0);
/// ```
pub fn range_to_percent(value: f64, min: f64, max: f64) -> f64 {
    ((value - min) / (max - min)) * 100.0
}

/// Vertical position of `node`: `base` plus every `offsetTop` up the
/// offset-parent chain.
///
/// A node without an offset parent contributes nothing, so the result is
/// `base` unchanged. Transforms and fixed positioning are not accounted for.
/// Each node on the chain is counted once; a chain that loops back on itself
/// stops at the first repeated node.
pub fn y_pos<D: Dom + ?Sized>(dom: &D, node: NodeId, base: f64) -> f64 {
    walk_offsets(dom, node, base, |dom, n| dom.offset_top(n))
}

/// Horizontal counterpart of [`y_pos`], summing `offsetLeft`.
pub fn x_pos<D: Dom + ?Sized>(dom: &D, node: NodeId, base: f64) -> f64 {
    walk_offsets(dom, node, base, |dom, n| dom.offset_left(n))
}

fn walk_offsets<D, F>(dom: &D, node: NodeId, base: f64, offset: F) -> f64
where
    D: Dom + ?Sized,
    F: Fn(&D, NodeId) -> f64,
{
    let mut total = base;
    if dom.offset_parent(node).is_none() {
        return total;
    }
    let mut seen = HashSet::new();
    let mut current = Some(node);
    while let Some(n) = current.filter(|n| seen.insert(*n)) {
        total += offset(dom, n);
        current = dom.offset_parent(n);
    }
    total
}

/// Run `f(arg)` on a later turn of the current tokio runtime.
///
/// The call returns immediately; there is no handle, result or cancellation.
/// Must be called from within a tokio runtime.
pub fn dispatch_async<F, A>(f: F, arg: A)
where
    F: FnOnce(A) + Send + 'static,
    A: Send + 'static,
{
    tokio::spawn(async move { f(arg) });
}

/// Truncate a string for logging purposes.
///
/// Strings longer than `max` bytes are cut at the nearest char boundary at or
/// below `max` and suffixed with the number of bytes dropped.
///
/// # Examples
///
/// ```
/// use quicknr_news::utils::preview_for_log;
/// assert_eq!(preview_for_log("short", 100), "short");
/// ```
pub fn preview_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

//! # Page Break Decisions
//!
//! What happens when content meets the bottom of a page. Atomic blocks
//! either fit or move; paragraphs may split after any line. There is no
//! widow/orphan look-ahead, only the heights of the item being placed.

/// Slack for floating-point accumulation when comparing heights.
pub const EPSILON: f64 = 1e-6;

/// What to do with the item being placed.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakDecision {
    /// Place the entire item on the current page (it fits).
    Place,
    /// Finish this page and retry on a fresh one.
    MoveToNextPage,
    /// Place the first `lines_here` lines, continue on the next page.
    Split { lines_here: usize },
    /// Nothing fits even though the page is empty. The first unit is placed
    /// anyway and will overflow the page; the caller clips and reports it.
    Overflow,
}

/// Given the remaining space on a page and the heights of the units that
/// make up an item (one height for an atomic block, one per line for a
/// paragraph), decide how to break.
pub fn decide_break(
    remaining_height: f64,
    item_heights: &[f64],
    is_breakable: bool,
    page_is_empty: bool,
) -> BreakDecision {
    let fits = |h: f64| h <= remaining_height + EPSILON;
    if fits(item_heights.iter().sum()) {
        return BreakDecision::Place;
    }

    let stuck = if page_is_empty {
        BreakDecision::Overflow
    } else {
        BreakDecision::MoveToNextPage
    };
    if !is_breakable {
        return stuck;
    }

    let lines_here = item_heights
        .iter()
        .scan(0.0, |used, h| {
            *used += h;
            Some(*used)
        })
        .take_while(|used| fits(*used))
        .count();

    match lines_here {
        // An empty page that cannot take one line would loop forever.
        0 => stuck,
        n => BreakDecision::Split { lines_here: n },
    }
}

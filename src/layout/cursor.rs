//! # Flow Cursor
//!
//! Tracks the current page and vertical offset, and owns the page-break
//! policy. The cursor is the only mutable layout state during composition.
//!
//! Invariant: after every operation `top <= y <= limit`, where `top` is the
//! top margin and `limit` is the bottom of the content area (page height
//! minus bottom margin minus the reserved footer region).

use std::ops::Range;

use serde::Serialize;

use super::page_break::{decide_break, BreakDecision};
use crate::model::PageConfig;

/// Where a unit of content landed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub page_index: usize,
    /// Top edge in page coordinates (origin at the top-left corner).
    pub y: f64,
    /// The unit did not fit even on an empty page and runs past `limit`.
    pub overflow: bool,
}

/// A run of consecutive lines of one paragraph placed on one page.
#[derive(Debug, Clone, PartialEq)]
pub struct LineGroup {
    pub placement: Placement,
    pub lines: Range<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlowState {
    Placing,
    /// The current page is finished. Resolved before the call returns.
    PageBreakPending,
}

#[derive(Debug, Clone)]
pub struct Cursor {
    page_index: usize,
    y: f64,
    top: f64,
    limit: f64,
    /// Units placed on the current page.
    placed_on_page: usize,
    state: FlowState,
}

impl Cursor {
    /// A cursor at the top of the first page. `footer_reserve` is carved off
    /// the bottom of the content area.
    pub fn new(page: &PageConfig, footer_reserve: f64) -> Self {
        let (_, page_h) = page.size.dimensions();
        let top = page.margin.top;
        let limit = page_h - page.margin.bottom - footer_reserve;
        Self {
            page_index: 0,
            y: top,
            top,
            limit,
            placed_on_page: 0,
            state: FlowState::Placing,
        }
    }

    pub fn page_index(&self) -> usize {
        self.page_index
    }

    pub fn page_count(&self) -> usize {
        self.page_index + 1
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    pub fn top(&self) -> f64 {
        self.top
    }

    pub fn limit(&self) -> f64 {
        self.limit
    }

    /// Usable height of a fresh page.
    pub fn available_height(&self) -> f64 {
        self.limit - self.top
    }

    pub fn remaining_height(&self) -> f64 {
        (self.limit - self.y).max(0.0)
    }

    pub fn is_page_empty(&self) -> bool {
        self.placed_on_page == 0
    }

    /// Place an atomic unit of `height`. Moves to a fresh page when it does
    /// not fit; on an already-empty page the unit is placed anyway with
    /// `overflow` set.
    pub fn place(&mut self, height: f64) -> Placement {
        loop {
            match self.state {
                FlowState::PageBreakPending => self.open_next_page(),
                FlowState::Placing => {
                    match decide_break(
                        self.remaining_height(),
                        &[height],
                        false,
                        self.is_page_empty(),
                    ) {
                        BreakDecision::Place => return self.commit(height, false),
                        BreakDecision::Overflow => return self.commit(height, true),
                        BreakDecision::MoveToNextPage | BreakDecision::Split { .. } => {
                            self.state = FlowState::PageBreakPending;
                        }
                    }
                }
            }
        }
    }

    /// Place `count` lines of `line_height`, splitting across as many pages
    /// as needed. Each returned group lies entirely on one page.
    pub fn place_lines(&mut self, line_height: f64, count: usize) -> Vec<LineGroup> {
        let heights = vec![line_height; count];
        let mut groups = Vec::new();
        let mut start = 0;

        while start < count {
            match self.state {
                FlowState::PageBreakPending => self.open_next_page(),
                FlowState::Placing => {
                    match decide_break(
                        self.remaining_height(),
                        &heights[start..],
                        true,
                        self.is_page_empty(),
                    ) {
                        BreakDecision::Place => {
                            groups.push(self.commit_lines(start..count, line_height, false));
                            start = count;
                        }
                        BreakDecision::Split { lines_here } => {
                            let end = start + lines_here;
                            groups.push(self.commit_lines(start..end, line_height, false));
                            start = end;
                            self.state = FlowState::PageBreakPending;
                        }
                        BreakDecision::MoveToNextPage => {
                            self.state = FlowState::PageBreakPending;
                        }
                        BreakDecision::Overflow => {
                            groups.push(self.commit_lines(start..start + 1, line_height, true));
                            start += 1;
                            if start < count {
                                self.state = FlowState::PageBreakPending;
                            }
                        }
                    }
                }
            }
        }

        groups
    }

    /// Finish the current page unconditionally.
    pub fn break_page(&mut self) {
        self.state = FlowState::PageBreakPending;
        self.open_next_page();
    }

    /// Advance by `gap` without placing anything. Never moves past `limit`
    /// and never breaks a page.
    pub fn skip(&mut self, gap: f64) {
        self.y = (self.y + gap.max(0.0)).min(self.limit);
    }

    fn commit(&mut self, height: f64, overflow: bool) -> Placement {
        let placement = Placement {
            page_index: self.page_index,
            y: self.y,
            overflow,
        };
        self.y = (self.y + height).min(self.limit);
        self.placed_on_page += 1;
        placement
    }

    fn commit_lines(&mut self, lines: Range<usize>, line_height: f64, overflow: bool) -> LineGroup {
        let height = crate::text::height(lines.len(), line_height);
        LineGroup {
            placement: self.commit(height, overflow),
            lines,
        }
    }

    fn open_next_page(&mut self) {
        self.page_index += 1;
        self.y = self.top;
        self.placed_on_page = 0;
        self.state = FlowState::Placing;
        log::debug!("page break: now on page {}", self.page_index + 1);
    }
}

// ABOUTME: Access evaluator for chapter playback
// ABOUTME: Pure locked/completion-eligible decision from is_free and entitlement
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Aula Contributors

use crate::models::Chapter;

/// Access verdict for a (user, chapter) pair
///
/// A locked chapter is a non-error outcome: callers render a paywall from it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChapterAccess {
    /// Whether playback is locked behind a purchase
    pub locked: bool,
    /// Whether completion tracking applies to this viewer
    ///
    /// Only entitled users accrue tracked progress; an unentitled viewer may
    /// still watch free chapters without a progress row being written.
    pub completion_eligible: bool,
}

/// Decide access for a chapter given the caller's entitlement fact
///
/// `locked = !is_free && !has_entitlement`. Pure function of its inputs; a
/// missing chapter is the lookup layer's 404, not this function's concern.
#[must_use]
pub const fn evaluate(is_free: bool, has_entitlement: bool) -> ChapterAccess {
    ChapterAccess {
        locked: !is_free && !has_entitlement,
        completion_eligible: has_entitlement,
    }
}

/// Convenience wrapper taking the chapter record
#[must_use]
pub const fn evaluate_chapter(chapter: &Chapter, has_entitlement: bool) -> ChapterAccess {
    evaluate(chapter.is_free, has_entitlement)
}

// Copyright 2025 the Trellis Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal retained scene for chart guides.
//!
//! A chart render pass produces a flat list of [`Mark`]s, each with a stable [`MarkId`].
//! The [`Scene`] keeps the marks from the previous pass and diffs the new list against them,
//! producing [`MarkDiff::Enter`], [`MarkDiff::Update`], and [`MarkDiff::Exit`] records.
//!
//! Marks can be scoped to a [`GroupId`] (for example, one group per axis), so one producer can
//! reconcile its own marks without disturbing marks owned by another producer.
//!
//! Marks carry:
//! - a payload (rect, text, or path) in scene coordinates,
//! - class names, used by renderers and tests to find marks by role, and
//! - an optional [`Transition`] describing how a renderer should animate the change.

#![no_std]

extern crate alloc;

mod mark;
mod scene;

pub use mark::{
    GroupId, Mark, MarkBuilder, MarkClasses, MarkId, MarkKind, MarkPayload, PathMark, RectMark,
    TextAnchor, TextBaseline, TextMark, Transition, TransitionKind,
};
pub use scene::{MarkDiff, Scene};

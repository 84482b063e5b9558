//! `git-hunk` hunk engine: enumerates diff hunks from git's three views into
//! a canonical, stably-hashed model, and composes/applies patches built from
//! caller-selected hunks or hunk-relative line ranges (spec.md §§1-9).
pub mod applier;
pub mod cli;
pub mod commands;
pub mod diff_parser;
pub mod enumerator;
pub mod error;
pub mod git_view;
pub mod hasher;
pub mod line_spec;
pub mod logging;
pub mod model;
pub mod patch_builder;
pub mod renderer;
pub mod result_mapper;
pub mod selector;
pub mod untracked;

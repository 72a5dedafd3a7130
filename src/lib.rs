//! shipit - comment-driven merges for GitHub
//!
//! A trusted maintainer comments `@bot: merge +category` on a pull request.
//! shipit checks that the commenter can push to the repository, squash-merges
//! the pull request, and then labels it, deletes its branch, and records it in
//! the repository's changelog.

pub mod access;
pub mod auth;
pub mod category;
pub mod changelog;
pub mod command;
pub mod config;
pub mod error;
pub mod event;
pub mod merge;
pub mod platform;
pub mod types;

//! Merge-and-label orchestration
//!
//! Two-phase pattern:
//! 1. Plan - parse the event into a `MergeRequest` and decide the post-merge
//!    actions (pure, testable)
//! 2. Execute - authorize, merge, and fan out the post-merge actions (effectful)

mod execute;
mod plan;

pub use execute::{
    ActionReport, ActionStatus, BotContext, MergeOutcome, PostMergeAction, merge_and_label,
};
pub use plan::{
    MergeRequest, PostMergePlan, changelog_commit_message, is_deletable, merge_commit_message,
    parse_merge_request, plan_post_merge,
};

//! Shared test fixtures

#![allow(dead_code, unused_imports)]

mod mock_platform;

pub use mock_platform::{AddLabelsCall, MembershipCall, MergePrCall, MockPlatformService};

use shipit::config::BotConfig;
use shipit::event::{
    Account, Comment, EventRepository, Issue, IssueCommentEvent, MergeEvent, PullRequestLinks,
    PullRequestReviewEvent, Review, ReviewedPullRequest,
};
use shipit::merge::BotContext;
use shipit::types::{MembershipState, MergeResult, PullRequestDetails};
use std::sync::Arc;

pub const ORG: &str = "jekyll";
pub const REPO: &str = "jekyll";
pub const ORG_ID: u64 = 3083652;
pub const TEAM_ID: u64 = 1961060;

fn account(login: &str) -> Account {
    Account {
        login: login.to_string(),
    }
}

fn repository(owner: &str, name: &str) -> EventRepository {
    EventRepository {
        owner: account(owner),
        name: name.to_string(),
    }
}

/// Issue comment on a pull request in `jekyll/jekyll`
pub fn make_comment_event(number: u64, login: &str, body: &str) -> MergeEvent {
    MergeEvent::IssueComment(IssueCommentEvent {
        action: Some("created".to_string()),
        sender: Some(account(login)),
        repo: repository(ORG, REPO),
        issue: Issue {
            number,
            pull_request: Some(PullRequestLinks {
                url: Some(format!(
                    "https://api.github.com/repos/{ORG}/{REPO}/pulls/{number}"
                )),
            }),
        },
        comment: Comment {
            user: account(login),
            body: Some(body.to_string()),
        },
    })
}

/// Issue comment on a plain issue (not a pull request)
pub fn make_issue_only_event(number: u64, login: &str, body: &str) -> MergeEvent {
    let MergeEvent::IssueComment(mut event) = make_comment_event(number, login, body) else {
        unreachable!()
    };
    event.issue.pull_request = None;
    MergeEvent::IssueComment(event)
}

/// Pull request review in `jekyll/jekyll`
pub fn make_review_event(action: &str, number: u64, login: &str, body: &str) -> MergeEvent {
    MergeEvent::PullRequestReview(PullRequestReviewEvent {
        action: action.to_string(),
        repo: repository(ORG, REPO),
        pull_request: ReviewedPullRequest { number },
        review: Review {
            user: account(login),
            body: Some(body.to_string()),
        },
    })
}

/// Pull request details with a head branch in `head_owner`'s account
pub fn make_pr_details(
    number: u64,
    title: &str,
    head_ref: &str,
    head_owner: Option<&str>,
) -> PullRequestDetails {
    PullRequestDetails {
        number,
        title: title.to_string(),
        head_ref: head_ref.to_string(),
        head_owner: head_owner.map(str::to_string),
        base_ref: "master".to_string(),
        html_url: format!("https://github.com/{ORG}/{REPO}/pull/{number}"),
    }
}

/// Successful merge result
pub fn merged() -> MergeResult {
    MergeResult {
        merged: true,
        sha: Some("6dcb09b5b57875f334f61aebed695e2e4193db5e".to_string()),
        message: Some("Pull Request successfully merged".to_string()),
    }
}

/// Mock where `login` is an active member of a team with push on `jekyll/jekyll`
pub fn mock_with_maintainer(login: &str) -> MockPlatformService {
    let mock = MockPlatformService::new();
    mock.set_org(ORG, ORG_ID, &[(TEAM_ID, "maintainers")]);
    mock.set_membership(ORG_ID, TEAM_ID, login, MembershipState::Active);
    mock.set_team_repo(ORG_ID, TEAM_ID, &format!("{ORG}/{REPO}"), true, false);
    mock
}

/// Mock ready for an authorized merge of PR `number` from `feature/docs`
pub fn mock_ready_to_merge(login: &str, number: u64, title: &str) -> MockPlatformService {
    let mock = mock_with_maintainer(login);
    mock.set_merge_response(number, merged());
    mock.set_pr_details_response(make_pr_details(number, title, "feature/docs", Some(ORG)));
    mock
}

/// Context over a shared mock with default settings
pub fn bot_context(mock: &Arc<MockPlatformService>) -> BotContext {
    bot_context_with(mock, BotConfig::default())
}

/// Context over a shared mock with custom settings
pub fn bot_context_with(mock: &Arc<MockPlatformService>, config: BotConfig) -> BotContext {
    BotContext::new(mock.clone(), config).unwrap()
}

//! Publisher type tests.

#![cfg(test)]

use super::*;

#[test]
fn test_commit_id_display_and_accessor() {
    let id = CommitId::new("abc123");
    assert_eq!(id.as_str(), "abc123");
    assert_eq!(id.to_string(), "abc123");
}

#[test]
fn test_publish_states_display_in_order() {
    let states = [
        PublishState::Init,
        PublishState::Cloned,
        PublishState::Patched,
        PublishState::Staged,
        PublishState::Committed,
        PublishState::Pushed,
    ];
    let names: Vec<String> = states.iter().map(ToString::to_string).collect();
    assert_eq!(
        names,
        vec!["init", "cloned", "patched", "staged", "committed", "pushed"]
    );
}

#[test]
fn test_default_author_is_the_service_identity() {
    let author = CommitAuthor::default();
    assert_eq!(author.name, "github-actions");
    assert_eq!(author.email, "github-actions@github.com");
}

mod common;

use codequest_core::domain::{DomainError, Role, SubmissionId};
use codequest_server::access::{AccessError, SourceFileDraft, SubmissionDraft, Viewer};

use common::InMemoryStore;

fn draft(body: &str) -> SubmissionDraft {
    SubmissionDraft {
        body: body.to_string(),
        public: false,
        source_files: Vec::new(),
    }
}

#[tokio::test]
async fn student_without_submission_sees_nothing() {
    let store = InMemoryStore::new();
    let policy = InMemoryStore::policy(&store);

    let challenge = store.add_challenge("fizzbuzz");
    let viewer_id = store.add_user("alice", Role::Student);
    let peer = store.add_user("bob", Role::Student);
    store.add_submission(peer, challenge, true);
    store.add_submission(peer, challenge, true);

    let visible = policy
        .visible_submissions(
            Viewer {
                id: viewer_id,
                role: Role::Student,
            },
            challenge,
        )
        .await
        .expect("listing should succeed");

    assert!(visible.submissions.is_empty());
    assert!(visible.peers_hidden);
}

#[tokio::test]
async fn student_sees_own_submissions_only_when_peers_are_private() {
    let store = InMemoryStore::new();
    let policy = InMemoryStore::policy(&store);

    let challenge = store.add_challenge("fizzbuzz");
    let alice = store.add_user("alice", Role::Student);
    let bob = store.add_user("bob", Role::Student);

    let mine_one = store.add_submission(alice, challenge, false);
    let mine_two = store.add_submission(alice, challenge, false);
    store.add_submission(bob, challenge, false);
    store.add_submission(bob, challenge, false);

    let visible = policy
        .visible_submissions(
            Viewer {
                id: alice,
                role: Role::Student,
            },
            challenge,
        )
        .await
        .expect("listing should succeed");

    let ids: Vec<SubmissionId> = visible.submissions.iter().map(|s| s.submission.id).collect();
    assert_eq!(ids, vec![mine_one, mine_two]);
    assert!(!visible.peers_hidden);
}

#[tokio::test]
async fn student_with_submission_unlocks_public_peers() {
    let store = InMemoryStore::new();
    let policy = InMemoryStore::policy(&store);

    let challenge = store.add_challenge("fizzbuzz");
    let alice = store.add_user("alice", Role::Student);

    let mine = store.add_submission(alice, challenge, false);
    for name in ["bob", "carol", "dave"] {
        let peer = store.add_user(name, Role::Student);
        store.add_submission(peer, challenge, true);
    }
    // A private peer never shows up.
    let eve = store.add_user("eve", Role::Student);
    store.add_submission(eve, challenge, false);

    let visible = policy
        .visible_submissions(
            Viewer {
                id: alice,
                role: Role::Student,
            },
            challenge,
        )
        .await
        .expect("listing should succeed");

    assert_eq!(visible.submissions.len(), 4);
    assert_eq!(visible.submissions[0].submission.id, mine);
    assert!(visible.submissions.iter().skip(1).all(|s| s.submission.public));
    assert!(!visible.peers_hidden);
}

#[tokio::test]
async fn own_public_submission_is_not_duplicated() {
    let store = InMemoryStore::new();
    let policy = InMemoryStore::policy(&store);

    let challenge = store.add_challenge("fizzbuzz");
    let alice = store.add_user("alice", Role::Student);
    store.add_submission(alice, challenge, true);

    let visible = policy
        .visible_submissions(
            Viewer {
                id: alice,
                role: Role::Student,
            },
            challenge,
        )
        .await
        .expect("listing should succeed");

    assert_eq!(visible.submissions.len(), 1);
}

#[tokio::test]
async fn visibility_is_scoped_to_the_challenge() {
    let store = InMemoryStore::new();
    let policy = InMemoryStore::policy(&store);

    let challenge = store.add_challenge("fizzbuzz");
    let other_challenge = store.add_challenge("quicksort");
    let alice = store.add_user("alice", Role::Student);
    let bob = store.add_user("bob", Role::Student);

    store.add_submission(alice, challenge, false);
    // Public, but for a different challenge.
    store.add_submission(bob, other_challenge, true);

    let visible = policy
        .visible_submissions(
            Viewer {
                id: alice,
                role: Role::Student,
            },
            challenge,
        )
        .await
        .expect("listing should succeed");

    assert_eq!(visible.submissions.len(), 1);
}

#[tokio::test]
async fn instructor_sees_every_submission() {
    let store = InMemoryStore::new();
    let policy = InMemoryStore::policy(&store);

    let challenge = store.add_challenge("fizzbuzz");
    let instructor = store.add_user("teach", Role::Instructor);
    for name in ["alice", "bob", "carol"] {
        let student = store.add_user(name, Role::Student);
        store.add_submission(student, challenge, false);
    }

    let visible = policy
        .visible_submissions(
            Viewer {
                id: instructor,
                role: Role::Instructor,
            },
            challenge,
        )
        .await
        .expect("listing should succeed");

    assert_eq!(visible.submissions.len(), 3);
    assert!(!visible.peers_hidden);
}

#[tokio::test]
async fn admin_sees_every_submission() {
    let store = InMemoryStore::new();
    let policy = InMemoryStore::policy(&store);

    let challenge = store.add_challenge("fizzbuzz");
    let admin = store.add_user("root", Role::Admin);
    let student = store.add_user("alice", Role::Student);
    store.add_submission(student, challenge, false);

    let visible = policy
        .visible_submissions(
            Viewer {
                id: admin,
                role: Role::Admin,
            },
            challenge,
        )
        .await
        .expect("listing should succeed");

    assert_eq!(visible.submissions.len(), 1);
}

#[tokio::test]
async fn missing_and_foreign_submissions_are_indistinguishable_for_students() {
    let store = InMemoryStore::new();
    let policy = InMemoryStore::policy(&store);

    let challenge = store.add_challenge("fizzbuzz");
    let alice = store.add_user("alice", Role::Student);
    let bob = store.add_user("bob", Role::Student);
    let bobs_submission = store.add_submission(bob, challenge, false);

    let viewer = Viewer {
        id: alice,
        role: Role::Student,
    };

    let missing = policy
        .fetch_submission(viewer, SubmissionId::new())
        .await
        .expect_err("missing id should fail");
    let foreign = policy
        .fetch_submission(viewer, bobs_submission)
        .await
        .expect_err("someone else's submission should fail");

    assert!(matches!(missing, AccessError::NotFound));
    assert!(matches!(foreign, AccessError::NotFound));
    assert_eq!(missing.to_string(), foreign.to_string());
}

#[tokio::test]
async fn instructor_fetches_any_submission() {
    let store = InMemoryStore::new();
    let policy = InMemoryStore::policy(&store);

    let challenge = store.add_challenge("fizzbuzz");
    let instructor = store.add_user("teach", Role::Instructor);
    let student = store.add_user("alice", Role::Student);
    let submission = store.add_submission(student, challenge, false);

    let detail = policy
        .fetch_submission(
            Viewer {
                id: instructor,
                role: Role::Instructor,
            },
            submission,
        )
        .await
        .expect("instructor fetch should succeed");

    assert_eq!(detail.submission.id, submission);
    assert_eq!(detail.username, "alice");
}

#[tokio::test]
async fn empty_body_is_rejected() {
    let store = InMemoryStore::new();
    let policy = InMemoryStore::policy(&store);

    let challenge = store.add_challenge("fizzbuzz");
    let alice = store.add_user("alice", Role::Student);

    let err = policy
        .create_submission(
            Viewer {
                id: alice,
                role: Role::Student,
            },
            challenge,
            draft(""),
        )
        .await
        .expect_err("empty body should be rejected");

    assert!(matches!(
        err,
        AccessError::Validation(DomainError::EmptyBody)
    ));
    assert_eq!(store.submission_count(), 0);
}

#[tokio::test]
async fn valid_submission_is_owned_by_viewer_and_scoped_to_challenge() {
    let store = InMemoryStore::new();
    let policy = InMemoryStore::policy(&store);

    let challenge = store.add_challenge("fizzbuzz");
    let alice = store.add_user("alice", Role::Student);

    let submission = policy
        .create_submission(
            Viewer {
                id: alice,
                role: Role::Student,
            },
            challenge,
            draft("a = 1"),
        )
        .await
        .expect("submission should be created");

    assert_eq!(submission.user_id, alice);
    assert_eq!(submission.challenge_id, challenge);
    assert_eq!(submission.body, "a = 1");
}

#[tokio::test]
async fn creating_against_missing_challenge_is_not_found() {
    let store = InMemoryStore::new();
    let policy = InMemoryStore::policy(&store);

    let alice = store.add_user("alice", Role::Student);
    let challenge = store.add_challenge("fizzbuzz");
    // A different, never-registered challenge id.
    let missing = codequest_core::domain::ChallengeId::new();
    assert_ne!(challenge, missing);

    let err = policy
        .create_submission(
            Viewer {
                id: alice,
                role: Role::Student,
            },
            missing,
            draft("a = 1"),
        )
        .await
        .expect_err("missing challenge should fail");

    assert!(matches!(err, AccessError::NotFound));
}

#[tokio::test]
async fn source_files_come_back_ordered_by_filename() {
    let store = InMemoryStore::new();
    let policy = InMemoryStore::policy(&store);

    let challenge = store.add_challenge("fizzbuzz");
    let alice = store.add_user("alice", Role::Student);

    let submission = policy
        .create_submission(
            Viewer {
                id: alice,
                role: Role::Student,
            },
            challenge,
            SubmissionDraft {
                body: "see files".to_string(),
                public: false,
                source_files: vec![
                    SourceFileDraft {
                        filename: "foo.rb".to_string(),
                        body: "a = 1".to_string(),
                    },
                    SourceFileDraft {
                        filename: "bar.rb".to_string(),
                        body: "b = 2".to_string(),
                    },
                ],
            },
        )
        .await
        .expect("submission should be created");

    let detail = policy
        .fetch_submission(
            Viewer {
                id: alice,
                role: Role::Student,
            },
            submission.id,
        )
        .await
        .expect("fetch should succeed");

    let filenames: Vec<&str> = detail
        .source_files
        .iter()
        .map(|f| f.filename.as_str())
        .collect();
    assert_eq!(filenames, vec!["bar.rb", "foo.rb"]);
}

#[tokio::test]
async fn source_file_without_filename_is_rejected() {
    let store = InMemoryStore::new();
    let policy = InMemoryStore::policy(&store);

    let challenge = store.add_challenge("fizzbuzz");
    let alice = store.add_user("alice", Role::Student);

    let err = policy
        .create_submission(
            Viewer {
                id: alice,
                role: Role::Student,
            },
            challenge,
            SubmissionDraft {
                body: "see files".to_string(),
                public: false,
                source_files: vec![SourceFileDraft {
                    filename: "  ".to_string(),
                    body: "a = 1".to_string(),
                }],
            },
        )
        .await
        .expect_err("blank filename should be rejected");

    assert!(matches!(
        err,
        AccessError::Validation(DomainError::EmptyFilename)
    ));
}

#[tokio::test]
async fn student_cannot_comment_on_foreign_private_submission() {
    let store = InMemoryStore::new();
    let policy = InMemoryStore::policy(&store);

    let challenge = store.add_challenge("fizzbuzz");
    let alice = store.add_user("alice", Role::Student);
    let bob = store.add_user("bob", Role::Student);
    let bobs_submission = store.add_submission(bob, challenge, false);

    let err = policy
        .comment_on_submission(
            Viewer {
                id: alice,
                role: Role::Student,
            },
            bobs_submission,
            "nice".to_string(),
        )
        .await
        .expect_err("commenting on a foreign private submission should fail");

    assert!(matches!(err, AccessError::NotFound));
    assert_eq!(store.comment_count(), 0);
}

#[tokio::test]
async fn instructor_comments_on_student_submission() {
    let store = InMemoryStore::new();
    let policy = InMemoryStore::policy(&store);

    let challenge = store.add_challenge("fizzbuzz");
    let instructor = store.add_user("teach", Role::Instructor);
    let student = store.add_user("alice", Role::Student);
    let submission = store.add_submission(student, challenge, false);

    let comment = policy
        .comment_on_submission(
            Viewer {
                id: instructor,
                role: Role::Instructor,
            },
            submission,
            "well done".to_string(),
        )
        .await
        .expect("instructor comment should succeed");

    assert_eq!(comment.submission_id, submission);
    assert_eq!(comment.user_id, instructor);

    let detail = policy
        .fetch_submission(
            Viewer {
                id: student,
                role: Role::Student,
            },
            submission,
        )
        .await
        .expect("owner fetch should succeed");

    assert_eq!(detail.comments.len(), 1);
    assert_eq!(detail.comments[0].body, "well done");
}

#[tokio::test]
async fn public_listing_includes_author_usernames() {
    let store = InMemoryStore::new();
    let policy = InMemoryStore::policy(&store);

    let challenge = store.add_challenge("fizzbuzz");
    let alice = store.add_user("alice", Role::Student);
    let bob = store.add_user("boblob", Role::Student);

    store.add_submission(alice, challenge, false);
    store.add_submission(bob, challenge, true);

    let visible = policy
        .visible_submissions(
            Viewer {
                id: alice,
                role: Role::Student,
            },
            challenge,
        )
        .await
        .expect("listing should succeed");

    let usernames: Vec<&str> = visible
        .submissions
        .iter()
        .map(|s| s.username.as_str())
        .collect();
    assert_eq!(usernames, vec!["alice", "boblob"]);
}

use std::path::Path;

use git2::{Repository, Signature, Time};
use serial_test::serial;
use tempfile::TempDir;

use git_semtag::git::{Git2Backend, RepositoryBackend};
use git_semtag::SemtagError;

/// Create a working repository plus a bare "origin" it can push to.
fn setup_repo_with_origin() -> (TempDir, TempDir) {
    let work_dir = TempDir::new().expect("Could not create temp dir");
    let origin_dir = TempDir::new().expect("Could not create temp dir");

    Repository::init_bare(origin_dir.path()).expect("Could not init bare origin");

    let repo = Repository::init(work_dir.path()).expect("Could not init git repo");
    {
        let mut config = repo.config().expect("Could not get config");
        config
            .set_str("user.name", "Test User")
            .expect("Could not set user.name");
        config
            .set_str("user.email", "test@example.com")
            .expect("Could not set user.email");
    }
    repo.remote("origin", origin_dir.path().to_str().unwrap())
        .expect("Could not add origin remote");

    (work_dir, origin_dir)
}

/// Commit with an explicit commit time so tag ordering is deterministic.
fn commit_at(repo_path: &Path, time_secs: i64, message: &str) -> git2::Oid {
    let repo = Repository::open(repo_path).expect("Could not open repo");
    let sig = Signature::new("Test User", "test@example.com", &Time::new(time_secs, 0))
        .expect("Could not build signature");

    let mut index = repo.index().expect("Could not get index");
    let tree_id = index.write_tree().expect("Could not write tree");
    let tree = repo.find_tree(tree_id).expect("Could not find tree");

    let parent = repo.head().ok().and_then(|h| h.peel_to_commit().ok());
    let parents: Vec<&git2::Commit> = parent.iter().collect();

    repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
        .expect("Could not create commit")
}

fn tag_commit(repo_path: &Path, name: &str, oid: git2::Oid) {
    let repo = Repository::open(repo_path).expect("Could not open repo");
    let object = repo.find_object(oid, None).expect("Could not find object");
    repo.tag_lightweight(name, &object, false)
        .expect("Could not create tag");
}

#[test]
fn test_open_fails_outside_a_repository() {
    let empty = TempDir::new().unwrap();
    let result = Git2Backend::open(empty.path(), "origin");
    assert!(matches!(result, Err(SemtagError::NotARepository(_))));
}

#[test]
fn test_preflight_facts() {
    let (work_dir, _origin_dir) = setup_repo_with_origin();
    let backend = Git2Backend::open(work_dir.path(), "origin").unwrap();

    assert!(backend.is_working_tree().unwrap());
    assert!(backend.has_remote_origin().unwrap());
    assert!(!backend.has_any_tags().unwrap());
}

#[test]
fn test_missing_remote_is_reported_not_fatal() {
    let work_dir = TempDir::new().unwrap();
    Repository::init(work_dir.path()).unwrap();
    let backend = Git2Backend::open(work_dir.path(), "origin").unwrap();

    assert!(!backend.has_remote_origin().unwrap());
}

#[test]
fn test_bare_repository_is_not_a_working_tree() {
    let dir = TempDir::new().unwrap();
    Repository::init_bare(dir.path()).unwrap();
    let backend = Git2Backend::open(dir.path(), "origin").unwrap();

    assert!(!backend.is_working_tree().unwrap());
}

#[test]
fn test_commit_time_ordering_beats_lexicographic() {
    let (work_dir, _origin_dir) = setup_repo_with_origin();

    // v9.0.0 sorts after v10.0.0 lexicographically, but its commit is older
    let older = commit_at(work_dir.path(), 1_700_000_000, "old release");
    tag_commit(work_dir.path(), "v9.0.0", older);
    let newer = commit_at(work_dir.path(), 1_700_000_100, "new release");
    tag_commit(work_dir.path(), "v10.0.0", newer);

    let backend = Git2Backend::open(work_dir.path(), "origin").unwrap();
    assert!(backend.has_any_tags().unwrap());
    assert_eq!(
        backend.most_recent_tag_by_commit_time().unwrap().as_deref(),
        Some("v10.0.0")
    );
}

#[test]
fn test_fallback_walks_to_nearest_tag_from_head() {
    let (work_dir, _origin_dir) = setup_repo_with_origin();

    let tagged = commit_at(work_dir.path(), 1_700_000_000, "release");
    tag_commit(work_dir.path(), "v1.2.3", tagged);
    commit_at(work_dir.path(), 1_700_000_100, "untagged work");

    let backend = Git2Backend::open(work_dir.path(), "origin").unwrap();
    assert_eq!(
        backend.most_recent_tag_fallback().unwrap().as_deref(),
        Some("v1.2.3")
    );
}

#[test]
fn test_fallback_with_no_tags_returns_none() {
    let (work_dir, _origin_dir) = setup_repo_with_origin();
    commit_at(work_dir.path(), 1_700_000_000, "initial commit");

    let backend = Git2Backend::open(work_dir.path(), "origin").unwrap();
    assert_eq!(backend.most_recent_tag_fallback().unwrap(), None);
}

#[test]
fn test_create_push_and_delete_round_trip() {
    let (work_dir, origin_dir) = setup_repo_with_origin();
    commit_at(work_dir.path(), 1_700_000_000, "initial commit");

    let backend = Git2Backend::open(work_dir.path(), "origin").unwrap();

    backend.create_tag("v1.0.0").unwrap();
    assert!(backend.has_any_tags().unwrap());

    backend.push_tag("v1.0.0").unwrap();
    let origin = Repository::open_bare(origin_dir.path()).unwrap();
    assert!(origin.find_reference("refs/tags/v1.0.0").is_ok());

    backend.delete_tag_remote("v1.0.0").unwrap();
    assert!(origin.find_reference("refs/tags/v1.0.0").is_err());

    backend.delete_tag_local("v1.0.0").unwrap();
    assert!(!backend.has_any_tags().unwrap());
}

#[test]
fn test_push_of_nonexistent_tag_is_a_backend_error() {
    let (work_dir, _origin_dir) = setup_repo_with_origin();
    commit_at(work_dir.path(), 1_700_000_000, "initial commit");

    let backend = Git2Backend::open(work_dir.path(), "origin").unwrap();
    let err = backend.push_tag("v9.9.9").unwrap_err();
    assert!(err.to_string().contains("push of tag 'v9.9.9'"));
}

#[test]
#[serial]
fn test_from_current_dir_discovers_repository() {
    let (work_dir, _origin_dir) = setup_repo_with_origin();
    let original_dir = std::env::current_dir().unwrap();

    std::env::set_current_dir(work_dir.path()).expect("Could not change to temp dir");
    let backend = Git2Backend::from_current_dir("origin");
    std::env::set_current_dir(original_dir).unwrap();

    assert!(backend.is_ok());
}

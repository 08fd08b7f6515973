//! GitCliMaterializer against real local repositories.
//!
//! Requires a `git` binary on PATH; every repository is created in a temp dir.

use std::path::Path;
use std::process::Command;
use std::time::Duration;

use github::{GitCliConfig, GitCliMaterializer};
use pipeline::{MaterializeError, MaterializedTree};

fn run_git(repo_dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(repo_dir)
        .output()
        .unwrap();
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Creates a repository with two commits that change `svc/Dockerfile`.
/// Returns the repo dir and both commit SHAs, oldest first.
fn make_git_repo() -> (tempfile::TempDir, String, String) {
    let dir = tempfile::tempdir().unwrap();
    run_git(dir.path(), &["init", "--quiet"]);
    run_git(dir.path(), &["config", "user.name", "test-user"]);
    run_git(dir.path(), &["config", "user.email", "test@example.com"]);

    std::fs::create_dir_all(dir.path().join("svc")).unwrap();
    std::fs::write(dir.path().join("svc/Dockerfile"), "FROM alpine:3.18\n").unwrap();
    run_git(dir.path(), &["add", "."]);
    run_git(dir.path(), &["commit", "--quiet", "-m", "first"]);
    let first = run_git(dir.path(), &["rev-parse", "HEAD"]);

    std::fs::write(dir.path().join("svc/Dockerfile"), "FROM alpine:3.20\n").unwrap();
    run_git(dir.path(), &["commit", "--quiet", "-am", "second"]);
    let second = run_git(dir.path(), &["rev-parse", "HEAD"]);

    (dir, first, second)
}

fn materializer_in(work_dir: &Path) -> GitCliMaterializer {
    GitCliMaterializer::new(GitCliConfig {
        work_dir: Some(work_dir.to_path_buf()),
        ..GitCliConfig::default()
    })
}

#[tokio::test]
async fn checkout_materializes_tree_at_pinned_commit() {
    let (repo, first, second) = make_git_repo();
    let work = tempfile::tempdir().unwrap();
    let materializer = materializer_in(work.path());
    let url = repo.path().to_str().unwrap();

    let old = materializer.checkout(url, &first).await.unwrap();
    let content = std::fs::read_to_string(old.path().join("svc/Dockerfile")).unwrap();
    assert_eq!(content, "FROM alpine:3.18\n");

    // Abbreviated SHAs resolve too.
    let new = materializer.checkout(url, &second[..8]).await.unwrap();
    let content = std::fs::read_to_string(new.path().join("svc/Dockerfile")).unwrap();
    assert_eq!(content, "FROM alpine:3.20\n");

    assert_ne!(old.path(), new.path());
    assert!(old
        .path()
        .file_name()
        .unwrap()
        .to_string_lossy()
        .starts_with("repo-"));
}

#[tokio::test]
async fn release_removes_scratch_directory() {
    let (repo, first, _) = make_git_repo();
    let work = tempfile::tempdir().unwrap();
    let materializer = materializer_in(work.path());

    let checkout = materializer
        .checkout(repo.path().to_str().unwrap(), &first)
        .await
        .unwrap();
    let root = checkout.path().to_path_buf();
    assert!(root.exists());

    let tree: Box<dyn MaterializedTree> = Box::new(checkout);
    tree.release().unwrap();
    assert!(!root.exists());
}

#[tokio::test]
async fn dropping_checkout_removes_scratch_directory() {
    let (repo, first, _) = make_git_repo();
    let work = tempfile::tempdir().unwrap();
    let materializer = materializer_in(work.path());

    let checkout = materializer
        .checkout(repo.path().to_str().unwrap(), &first)
        .await
        .unwrap();
    let root = checkout.path().to_path_buf();
    drop(checkout);
    assert!(!root.exists());
}

#[tokio::test]
async fn unknown_commit_is_a_checkout_error_and_leaves_no_directory() {
    let (repo, _, _) = make_git_repo();
    let work = tempfile::tempdir().unwrap();
    let materializer = materializer_in(work.path());

    let err = materializer
        .checkout(repo.path().to_str().unwrap(), "deadbeefdeadbeef")
        .await
        .unwrap_err();

    assert!(matches!(err, MaterializeError::Checkout { .. }), "{err}");
    assert!(err
        .to_string()
        .starts_with("git checkout error: failed to checkout commit deadbeefdeadbeef"));
    assert_eq!(std::fs::read_dir(work.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn missing_repository_is_a_clone_error() {
    let work = tempfile::tempdir().unwrap();
    let materializer = materializer_in(work.path());
    let missing = work.path().join("does-not-exist");

    let err = materializer
        .checkout(missing.to_str().unwrap(), "abc123")
        .await
        .unwrap_err();

    assert!(matches!(err, MaterializeError::Clone { .. }), "{err}");
    assert!(err.to_string().starts_with("git clone error: failed to clone"));
    assert_eq!(std::fs::read_dir(work.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn missing_git_binary_is_a_spawn_error() {
    let work = tempfile::tempdir().unwrap();
    let materializer = GitCliMaterializer::new(GitCliConfig {
        git_program: work.path().join("no-such-git"),
        work_dir: Some(work.path().to_path_buf()),
        timeout: None,
    });

    let err = materializer.checkout("unused", "abc123").await.unwrap_err();
    assert!(matches!(err, MaterializeError::Spawn(_)), "{err}");
}

#[cfg(unix)]
#[tokio::test]
async fn slow_clone_times_out() {
    use std::os::unix::fs::PermissionsExt;

    let work = tempfile::tempdir().unwrap();
    let fake_git = work.path().join("slow-git");
    std::fs::write(&fake_git, "#!/bin/sh\nexec sleep 30\n").unwrap();
    std::fs::set_permissions(&fake_git, std::fs::Permissions::from_mode(0o755)).unwrap();

    let scratch = tempfile::tempdir().unwrap();
    let materializer = GitCliMaterializer::new(GitCliConfig {
        git_program: fake_git,
        work_dir: Some(scratch.path().to_path_buf()),
        timeout: Some(Duration::from_millis(200)),
    });

    let err = materializer
        .checkout("https://github.com/org/slow.git", "abc123")
        .await
        .unwrap_err();

    assert!(matches!(err, MaterializeError::TimedOut(_)), "{err}");
    assert_eq!(std::fs::read_dir(scratch.path()).unwrap().count(), 0);
}

// tests/integration_test.rs
use std::process::Command;

const BIN: &str = env!("CARGO_BIN_EXE_gitlab-autotag");

#[test]
fn test_gitlab_autotag_help() {
    let output = Command::new(BIN)
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("gitlab-autotag"));
    for subcommand in [
        "tag",
        "mr-template",
        "mr-info",
        "release-tags",
        "test-report",
        "label-mr",
    ] {
        assert!(stdout.contains(subcommand), "missing {} in help", subcommand);
    }
}

#[test]
fn test_gitlab_autotag_version() {
    let output = Command::new(BIN)
        .arg("--version")
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_missing_settings_exit_non_zero() {
    let dir = tempfile::TempDir::new().unwrap();

    let mut command = Command::new(BIN);
    command
        .args(["tag", "--dry-run"])
        .current_dir(dir.path())
        .env("HOME", dir.path())
        .env("XDG_CONFIG_HOME", dir.path());
    for var in ["CI_PROJECT_ID", "GITLAB_TOKEN", "CI_PRIVATE_TOKEN"] {
        command.env_remove(var);
    }
    let output = command.output().expect("Failed to execute command");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("CI_PROJECT_ID"), "got: {}", stderr);
}

#[cfg(test)]
mod git_operations_tests {
    use git2::{Oid, Repository, Signature, Time};
    use gitlab_autotag::analyzer::TagResolver;
    use gitlab_autotag::git::{Git2Repository, Repository as _};
    use gitlab_autotag::AutotagError;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const EPOCH: i64 = 1_700_000_000;

    fn signature(offset: i64) -> Signature<'static> {
        Signature::new("CI Bot", "ci@example.com", &Time::new(EPOCH + offset, 0))
            .expect("Could not create signature")
    }

    // Each commit rewrites README.md so trees differ
    fn commit(repo: &Repository, dir: &Path, message: &str, offset: i64) -> Oid {
        fs::write(dir.join("README.md"), message).expect("Could not write file");

        let mut index = repo.index().expect("Could not get index");
        index
            .add_path(Path::new("README.md"))
            .expect("Could not add file to index");
        index.write().expect("Could not write index");

        let tree_id = index.write_tree().expect("Could not write tree");
        let tree = repo.find_tree(tree_id).expect("Could not find tree");
        let parents = match repo.head() {
            Ok(head) => vec![head.peel_to_commit().unwrap()],
            Err(_) => vec![],
        };
        let parent_refs: Vec<_> = parents.iter().collect();

        let sig = signature(offset);
        repo.commit(Some("HEAD"), &sig, &sig, message, &tree, &parent_refs)
            .expect("Could not create commit")
    }

    fn lightweight_tag(repo: &Repository, name: &str, oid: Oid) {
        repo.tag_lightweight(name, &repo.find_object(oid, None).unwrap(), false)
            .expect("Could not create tag");
    }

    fn annotated_tag(repo: &Repository, name: &str, oid: Oid, offset: i64) {
        repo.tag(
            name,
            &repo.find_object(oid, None).unwrap(),
            &signature(offset),
            name,
            false,
        )
        .expect("Could not create tag");
    }

    fn short(repo: &Repository, oid: Oid) -> String {
        repo.find_object(oid, None)
            .unwrap()
            .short_id()
            .unwrap()
            .as_str()
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_describe_and_first_parent_log() {
        let dir = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(dir.path()).expect("Could not init git repo");

        let first = commit(&repo, dir.path(), "Initial commit", 0);
        lightweight_tag(&repo, "v1.0.0", first);
        let second = commit(&repo, dir.path(), "Add export", 60);
        let third = commit(&repo, dir.path(), "Fix login", 120);

        let git = Git2Repository::open(dir.path()).unwrap();

        let described = git.describe("v[0-9]*").unwrap();
        assert!(
            described.starts_with("v1.0.0-2-g"),
            "unexpected describe output: {}",
            described
        );

        let log = git.first_parent_log("v1.0.0").unwrap();
        assert_eq!(log, vec![short(&repo, third), short(&repo, second)]);
        assert_eq!(git.head_short_sha().unwrap(), short(&repo, third));
    }

    // Commit with explicit parents, reusing the first parent's tree
    fn commit_on(
        repo: &Repository,
        update_ref: &str,
        message: &str,
        parents: &[Oid],
        offset: i64,
    ) -> Oid {
        let parents: Vec<_> = parents
            .iter()
            .map(|oid| repo.find_commit(*oid).expect("Could not find parent"))
            .collect();
        let tree = parents[0].tree().expect("Could not get tree");
        let parent_refs: Vec<_> = parents.iter().collect();

        let sig = signature(offset);
        repo.commit(Some(update_ref), &sig, &sig, message, &tree, &parent_refs)
            .expect("Could not create commit")
    }

    #[test]
    fn test_first_parent_log_skips_merged_branch() {
        let dir = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(dir.path()).expect("Could not init git repo");

        let base = commit(&repo, dir.path(), "Initial commit", 0);
        lightweight_tag(&repo, "v1.0.0", base);

        let side1 = commit_on(&repo, "refs/heads/side", "Side one", &[base], 30);
        let side2 = commit_on(&repo, "refs/heads/side", "Side two", &[side1], 60);
        let main1 = commit(&repo, dir.path(), "Fix login", 90);
        let merge = commit_on(&repo, "HEAD", "Merge branch 'side'", &[main1, side2], 120);

        let git = Git2Repository::open(dir.path()).unwrap();

        let log = git.first_parent_log("v1.0.0").unwrap();
        assert_eq!(log, vec![short(&repo, merge), short(&repo, main1)]);

        let resolver = TagResolver::new(&git, "v");
        let base_tag = resolver.resolve_base_tag().unwrap();
        assert_eq!(base_tag.name, "v1.0.0");
        assert_eq!(
            resolver.commits_since(&base_tag).unwrap(),
            vec![short(&repo, main1), short(&repo, merge)]
        );
    }

    #[test]
    fn test_remotes_lists_configured_names() {
        let dir = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(dir.path()).expect("Could not init git repo");
        commit(&repo, dir.path(), "Initial commit", 0);
        repo.remote("origin", "https://gitlab.example.com/group/project.git")
            .expect("Could not add remote");
        repo.remote("upstream", "https://gitlab.example.com/upstream/project.git")
            .expect("Could not add remote");

        let git = Git2Repository::open(dir.path()).unwrap();
        assert_eq!(git.remotes().unwrap(), vec!["origin", "upstream"]);
    }

    #[test]
    fn test_describe_ignores_other_prefixes() {
        let dir = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(dir.path()).expect("Could not init git repo");

        let first = commit(&repo, dir.path(), "Initial commit", 0);
        lightweight_tag(&repo, "nightly", first);

        let git = Git2Repository::open(dir.path()).unwrap();
        assert!(matches!(
            git.describe("v[0-9]*"),
            Err(AutotagError::TagNotFound(_))
        ));
    }

    #[test]
    fn test_tag_on_head_describes_bare() {
        let dir = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(dir.path()).expect("Could not init git repo");

        let first = commit(&repo, dir.path(), "Initial commit", 0);
        annotated_tag(&repo, "2.1.0", first, 10);

        let git = Git2Repository::open(dir.path()).unwrap();
        assert_eq!(git.describe("[0-9]*").unwrap(), "2.1.0");
        assert!(git.first_parent_log("2.1.0").unwrap().is_empty());
    }

    #[test]
    fn test_tags_by_creation_date() {
        let dir = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(dir.path()).expect("Could not init git repo");

        let first = commit(&repo, dir.path(), "Initial commit", 0);
        let second = commit(&repo, dir.path(), "Second", 100);
        let third = commit(&repo, dir.path(), "Third", 200);

        // Names sort the opposite way from creation dates
        annotated_tag(&repo, "v9.0.0", first, 50);
        lightweight_tag(&repo, "v5.0.0", second);
        annotated_tag(&repo, "v1.0.0", third, 300);
        lightweight_tag(&repo, "build-7", third);

        let git = Git2Repository::open(dir.path()).unwrap();

        assert_eq!(
            git.tags_by_creation(Some("v*")).unwrap(),
            vec!["v9.0.0", "v5.0.0", "v1.0.0"]
        );
        assert_eq!(git.tags_by_creation(None).unwrap().len(), 4);
    }

    #[test]
    fn test_fetch_from_unknown_remote_fails() {
        let dir = TempDir::new().expect("Could not create temp dir");
        let repo = Repository::init(dir.path()).expect("Could not init git repo");
        commit(&repo, dir.path(), "Initial commit", 0);

        let git = Git2Repository::open(dir.path()).unwrap();
        assert!(matches!(
            git.fetch_tags("upstream"),
            Err(AutotagError::Configuration(_))
        ));
    }
}

#[cfg(test)]
mod gitlab_client_tests {
    use gitlab_autotag::gitlab::{GitLabClient, MergeRequestApi, TagRequest};
    use gitlab_autotag::AutotagError;
    use mockito::{Matcher, Server};
    use std::time::Duration;

    fn client(server: &Server, per_page: u32) -> GitLabClient {
        GitLabClient::new(
            &format!("{}/api/v4", server.url()),
            "42",
            "secret",
            Duration::from_secs(5),
            per_page,
        )
        .unwrap()
    }

    #[test]
    fn test_commit_merge_requests() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", "/api/v4/projects/42/repository/commits/1282be0/merge_requests")
            .match_header("PRIVATE-TOKEN", "secret")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"[{"iid": 5, "title": "Add export", "description": null,
                     "labels": ["version::minor"], "target_branch": "main", "state": "merged"}]"#,
            )
            .create();

        let mrs = client(&server, 100).commit_merge_requests("1282be0").unwrap();

        mock.assert();
        assert_eq!(mrs.len(), 1);
        assert_eq!(mrs[0].iid, 5);
        assert_eq!(mrs[0].labels, vec!["version::minor"]);
    }

    #[test]
    fn test_merge_request_commits_follow_pagination() {
        let mut server = Server::new();
        let page = |n: &str| {
            Matcher::AllOf(vec![
                Matcher::UrlEncoded("per_page".into(), "2".into()),
                Matcher::UrlEncoded("page".into(), n.into()),
            ])
        };

        let first = server
            .mock("GET", "/api/v4/projects/42/merge_requests/5/commits")
            .match_query(page("1"))
            .with_status(200)
            .with_header("X-Total-Pages", "2")
            .with_body(
                r#"[{"id": "a1", "short_id": "a1", "title": "PROJ-1 one", "message": "PROJ-1 one"},
                    {"id": "b2", "short_id": "b2", "title": "two", "message": "two"}]"#,
            )
            .create();
        let second = server
            .mock("GET", "/api/v4/projects/42/merge_requests/5/commits")
            .match_query(page("2"))
            .with_status(200)
            .with_header("X-Total-Pages", "2")
            .with_body(r#"[{"id": "c3", "short_id": "c3", "title": "PROJ-2", "message": "PROJ-2"}]"#)
            .create();

        let commits = client(&server, 2).merge_request_commits(5).unwrap();

        first.assert();
        second.assert();
        let ids: Vec<&str> = commits.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a1", "b2", "c3"]);
    }

    #[test]
    fn test_create_tag_sends_query() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/api/v4/projects/42/repository/tags")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("tag_name".into(), "v2.0.0".into()),
                Matcher::UrlEncoded("ref".into(), "1282be0".into()),
                Matcher::UrlEncoded("message".into(), "Drop v1 API".into()),
            ]))
            .with_status(201)
            .with_body(r#"{"name": "v2.0.0", "message": "Drop v1 API", "target": "1282be0aa"}"#)
            .create();

        let created = client(&server, 100)
            .create_tag(&TagRequest {
                tag_name: "v2.0.0".to_string(),
                target: "1282be0".to_string(),
                message: Some("Drop v1 API".to_string()),
            })
            .unwrap();

        mock.assert();
        assert_eq!(created.name, "v2.0.0");
    }

    #[test]
    fn test_add_labels() {
        let mut server = Server::new();
        let mock = server
            .mock("PUT", "/api/v4/projects/42/merge_requests/17")
            .match_query(Matcher::UrlEncoded(
                "add_labels".into(),
                "version::minor".into(),
            ))
            .with_status(200)
            .with_body(
                r#"{"iid": 17, "title": "Add export", "labels": ["backend", "version::minor"],
                    "target_branch": "main"}"#,
            )
            .create();

        let mr = client(&server, 100)
            .add_merge_request_labels(17, &["version::minor".to_string()])
            .unwrap();

        mock.assert();
        assert_eq!(mr.labels, vec!["backend", "version::minor"]);
    }

    #[test]
    fn test_error_status_is_lookup_error() {
        let mut server = Server::new();
        server
            .mock("GET", "/api/v4/projects/42/merge_requests/404")
            .with_status(404)
            .with_body(r#"{"message": "404 Not found"}"#)
            .create();

        let result = client(&server, 100).merge_request(404);

        match result {
            Err(AutotagError::Lookup(msg)) => assert!(msg.contains("404"), "got: {}", msg),
            other => panic!("expected lookup error, got {:?}", other),
        }
    }

    #[test]
    fn test_unreachable_server_is_lookup_error() {
        let client = GitLabClient::new(
            "http://127.0.0.1:9/api/v4",
            "42",
            "secret",
            Duration::from_secs(1),
            100,
        )
        .unwrap();

        assert!(matches!(
            client.commit_merge_requests("1282be0"),
            Err(AutotagError::Lookup(_))
        ));
    }
}

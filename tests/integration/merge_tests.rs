//! End-to-end merges through the real HTTP fetcher

use crate::support::{serve_list, serve_status, Workspace};
use blockmerge::pipeline::run_merge;
use blockmerge::{MergeError, SourceOutcome};
use wiremock::MockServer;

#[tokio::test]
async fn test_full_merge_writes_outputs() {
    let server = MockServer::start().await;
    let base = server.uri();
    serve_list(
        &server,
        "/hosts.txt",
        "# hosts file\n127.0.0.1 localhost.localdomain\n0.0.0.0 ads.example.com\n0.0.0.0 tracker.example.net\n",
    )
    .await;
    serve_list(&server, "/plain.txt", "example.com\nmetrics.example.org\n").await;

    let ws = Workspace::new(
        &format!("{base}/hosts.txt\n{base}/plain.txt\n"),
        None,
    );
    let outcome = run_merge(&ws.config).await.unwrap();

    assert_eq!(
        ws.blocklist_domains(),
        vec![
            "example.com",
            "localhost.localdomain",
            "metrics.example.org",
            "tracker.example.net",
        ]
    );

    let blocklist = ws.read("blocklist.txt");
    assert!(blocklist.starts_with("# Optimized Blocklist\n# Total Domains: 4\n"));

    let status = ws.read("version.txt");
    assert!(status.starts_with("Last Update: "));
    assert!(status.ends_with("Total: 4\n"));

    // Both sources contributed something new during ingestion
    assert_eq!(outcome.stats.outcome_count(SourceOutcome::Ok), 2);
    assert_eq!(ws.registry_lines().len(), 2);
}

#[tokio::test]
async fn test_mirror_source_is_pruned() {
    let server = MockServer::start().await;
    let base = server.uri();
    let body = "0.0.0.0 ads.one.test\n0.0.0.0 ads.two.test\n";
    serve_list(&server, "/a.txt", body).await;
    serve_list(&server, "/b.txt", body).await;

    let ws = Workspace::new(&format!("{base}/a.txt\n{base}/b.txt\n"), None);
    let outcome = run_merge(&ws.config).await.unwrap();

    assert_eq!(outcome.stats.outcome_count(SourceOutcome::Mirror), 1);
    assert_eq!(ws.registry_lines(), vec![format!("{base}/a.txt")]);
    assert_eq!(ws.blocklist_domains().len(), 2);
}

#[tokio::test]
async fn test_reliability_across_runs() {
    let server = MockServer::start().await;
    let base = server.uri();
    serve_list(&server, "/good.txt", "ads.good.test\n").await;
    serve_status(&server, "/flaky.txt", 503).await;
    serve_status(&server, "/master.txt", 500).await;

    let ws = Workspace::new(
        &format!("{base}/good.txt\nFAILx1|{base}/flaky.txt\nMASTER|{base}/master.txt\n"),
        None,
    );

    run_merge(&ws.config).await.unwrap();
    assert_eq!(
        ws.registry_lines(),
        vec![
            format!("MASTER|{base}/master.txt"),
            format!("FAILx2|{base}/flaky.txt"),
            format!("{base}/good.txt"),
        ]
    );

    // Third consecutive failure drops the source; the master never counts up
    run_merge(&ws.config).await.unwrap();
    assert_eq!(
        ws.registry_lines(),
        vec![format!("MASTER|{base}/master.txt"), format!("{base}/good.txt")]
    );
}

#[tokio::test]
async fn test_recovered_source_resets_counter() {
    let server = MockServer::start().await;
    let base = server.uri();
    serve_list(&server, "/back.txt", "ads.back.test\n").await;

    let ws = Workspace::new(&format!("FAILx2|{base}/back.txt\n"), None);
    run_merge(&ws.config).await.unwrap();

    assert_eq!(ws.registry_lines(), vec![format!("{base}/back.txt")]);
}

#[tokio::test]
async fn test_rerun_is_idempotent() {
    let server = MockServer::start().await;
    let base = server.uri();
    serve_list(&server, "/a.txt", "example.com\nads.example.com\nx.other.test\n").await;
    serve_list(&server, "/b.txt", "tracker.example.com\nother.test\nnew.site.test\n").await;

    let ws = Workspace::new(&format!("{base}/a.txt\n{base}/b.txt\n"), None);

    run_merge(&ws.config).await.unwrap();
    let first_registry = ws.read("sources.txt");
    let first_blocklist = ws.read("blocklist.txt");

    run_merge(&ws.config).await.unwrap();
    assert_eq!(ws.read("sources.txt"), first_registry);
    assert_eq!(ws.read("blocklist.txt"), first_blocklist);
}

#[tokio::test]
async fn test_missing_registry_leaves_outputs_untouched() {
    let ws = Workspace::new("", None);
    std::fs::remove_file(ws.path("sources.txt")).unwrap();
    std::fs::write(ws.path("blocklist.txt"), "previous\n").unwrap();

    let result = run_merge(&ws.config).await;

    assert!(matches!(result, Err(MergeError::MissingRegistry { .. })));
    assert_eq!(ws.read("blocklist.txt"), "previous\n");
    assert!(!ws.path("sources.txt").exists());
    assert!(!ws.path("version.txt").exists());
}

#[tokio::test]
async fn test_whitelist_exact_match() {
    let server = MockServer::start().await;
    let base = server.uri();
    serve_list(&server, "/a.txt", "ads.example.com\nx.ads.example.com\n").await;

    let ws = Workspace::new(&format!("{base}/a.txt\n"), Some("# allowed\nADS.example.com\n"));
    let outcome = run_merge(&ws.config).await.unwrap();

    assert_eq!(ws.blocklist_domains(), vec!["x.ads.example.com"]);
    assert_eq!(outcome.stats.whitelist_hits, 1);
}

#[tokio::test]
async fn test_wildcard_promotion_end_to_end() {
    let server = MockServer::start().await;
    let base = server.uri();
    let crowded: String = (0..12).map(|i| format!("edge{i}.cdn.example\n")).collect();
    let sparse: String = (0..8).map(|i| format!("node{i}.small.example\n")).collect();
    serve_list(&server, "/crowded.txt", &crowded).await;
    serve_list(&server, "/sparse.txt", &sparse).await;

    let ws = Workspace::new(&format!("{base}/crowded.txt\n{base}/sparse.txt\n"), None);
    let outcome = run_merge(&ws.config).await.unwrap();

    let domains = ws.blocklist_domains();
    assert_eq!(domains.len(), 9);
    assert_eq!(domains[0], "cdn.example");
    assert!(!domains.contains(&"small.example".to_string()));
    assert_eq!(outcome.stats.promoted_wildcards, 1);
}

#[tokio::test]
async fn test_protected_source_survives_outage() {
    let server = MockServer::start().await;
    let base = server.uri();
    serve_status(&server, "/trusted-list.txt", 404).await;

    let registry = format!("{base}/trusted-list.txt\n");
    let ws = Workspace::new(&registry, None);
    let outcome = run_merge(&ws.config).await.unwrap();

    assert_eq!(outcome.stats.outcome_count(SourceOutcome::OfflineKept), 1);
    assert_eq!(ws.registry_lines(), vec![format!("{base}/trusted-list.txt")]);
    assert_eq!(ws.blocklist_domains(), Vec::<String>::new());
}

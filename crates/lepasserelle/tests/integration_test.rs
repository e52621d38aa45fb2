// Integration Tests for LePasserelle
//
// These tests cover end-to-end workflows including:
// - CLI command parsing and configuration layering
// - Import, recommend and view against an on-disk database
// - Error handling

use std::path::{Path, PathBuf};
use tempfile::TempDir;

const ARTICLES_JSON: &str = r#"[
    {
        "id": "erp-trends",
        "title": "ERP trends for digital transformation",
        "category": "Industry News",
        "publishedAt": "2024-09-28T08:00:00Z",
        "summary": "Cloud ERP and AI are reshaping manufacturing.",
        "viewCount": 1500
    },
    {
        "id": "erp-selection",
        "title": "ERP selection guide for manufacturing",
        "category": "Industry News",
        "publishedAt": "2024-09-20T08:00:00Z",
        "viewCount": 620
    },
    {
        "id": "crm-release",
        "title": "CRM mobile release",
        "category": "Product Updates",
        "publishedAt": "2024-06-01T08:00:00Z",
        "viewCount": 150
    },
    {
        "id": "privacy-policy",
        "title": "Privacy policy update",
        "category": "Policy",
        "publishedAt": "2023-01-15T08:00:00Z"
    }
]"#;

fn write_articles(dir: &Path) -> PathBuf {
    let path = dir.join("articles.json");
    std::fs::write(&path, ARTICLES_JSON).unwrap();
    path
}

fn config_for(dir: &Path) -> lepasserelle::AppConfig {
    let mut config = lepasserelle::AppConfig::default();
    config.storage.db_path = dir.join("leconseil.db").display().to_string();
    config
}

// ============================================================================
// CLI WORKFLOW INTEGRATION TESTS
// ============================================================================

mod cli_workflow_tests {
    use super::*;
    use clap::Parser;
    use lepasserelle::cli::{Cli, Commands};
    use rstest::rstest;

    #[test]
    fn test_cli_import_command_parsing() {
        let cli = Cli::parse_from(["leconseil", "import", "/data/articles.json"]);

        match cli.command {
            Commands::Import { file } => {
                assert_eq!(file, PathBuf::from("/data/articles.json"));
            }
            _ => panic!("Expected Import command"),
        }
    }

    #[rstest]
    #[case(&["leconseil", "list"])]
    #[case(&["leconseil", "show", "a"])]
    #[case(&["leconseil", "recommend", "a", "--json"])]
    #[case(&["leconseil", "view", "a"])]
    #[case(&["leconseil", "delete", "a"])]
    #[case(&["leconseil", "config", "--write"])]
    fn test_every_command_parses(#[case] args: &[&str]) {
        assert!(Cli::try_parse_from(args).is_ok());
    }

    #[test]
    fn test_cli_rejects_bad_limit() {
        assert!(Cli::try_parse_from(["leconseil", "recommend", "a", "--limit", "-1"]).is_err());
        assert!(Cli::try_parse_from(["leconseil", "list", "--limit", "many"]).is_err());
    }

    #[tokio::test]
    async fn test_config_write_creates_file() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join("nested").join("config.toml");

        let cli = Cli::parse_from([
            "leconseil",
            "--config",
            config_path.to_str().unwrap(),
            "config",
            "--write",
        ]);
        cli.run().await.unwrap();

        let written = lepasserelle::AppConfig::load(&config_path).unwrap();
        assert_eq!(written.recommender.default_limit, 2);
    }

    #[tokio::test]
    async fn test_cli_import_then_recommend() {
        let dir = TempDir::new().unwrap();
        let articles = write_articles(dir.path());
        let db = dir.path().join("cli.db");
        let config_path = dir.path().join("config.toml");

        let base = |command: &[&str]| {
            let mut args = vec![
                "leconseil".to_string(),
                "--config".to_string(),
                config_path.display().to_string(),
                "--db".to_string(),
                db.display().to_string(),
            ];
            args.extend(command.iter().map(|s| s.to_string()));
            Cli::parse_from(args)
        };

        base(&["import", articles.to_str().unwrap()]).run().await.unwrap();
        base(&["recommend", "erp-trends", "--json"]).run().await.unwrap();
        base(&["view", "erp-selection"]).run().await.unwrap();

        assert!(base(&["show", "missing"]).run().await.is_err());

        let store = lestockage::ArticleStore::open(&db).unwrap();
        assert_eq!(store.count().unwrap(), 4);
        assert_eq!(store.require("erp-selection").unwrap().view_count, 621);
    }
}

// ============================================================================
// ORCHESTRATION INTEGRATION TESTS
// ============================================================================

mod conseil_tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use leconseil::{FixedClock, PoolSource};
    use lepasserelle::{ConseilError, LeConseil};

    fn clock() -> FixedClock {
        FixedClock(Utc.with_ymd_and_hms(2024, 10, 1, 0, 0, 0).unwrap())
    }

    #[tokio::test]
    async fn test_import_recommend_view_workflow() {
        let dir = TempDir::new().unwrap();
        let conseil = LeConseil::open(config_for(dir.path()))
            .unwrap()
            .with_clock(clock());

        let summary = conseil.import_file(write_articles(dir.path())).unwrap();
        assert_eq!(summary.created, 4);

        let ranked = conseil.recommend("erp-trends", Some(3)).await.unwrap();
        assert_eq!(ranked.source, PoolSource::Store);
        let ids: Vec<_> = ranked.candidates.iter().map(|c| c.item.id.as_str()).collect();
        assert_eq!(ids, vec!["erp-selection", "crm-release", "privacy-policy"]);

        // same category, shared ERP/manufacturing keywords, fresh, popular
        let top = &ranked.candidates[0].score;
        assert_eq!(top.category, 30.0);
        assert_eq!(top.recency, 15.0);
        assert_eq!(top.popularity, 7.0);
        assert!(top.keyword_overlap > 0.0);

        // a single view keeps privacy-policy in the lowest popularity band
        let ranking = |r: &leconseil::Recommendations| {
            r.candidates
                .iter()
                .map(|c| (c.rank, c.item.id.clone(), c.score))
                .collect::<Vec<_>>()
        };
        let before = ranking(&ranked);
        assert_eq!(conseil.record_view("privacy-policy").unwrap(), 1);

        let after = conseil.recommend("erp-trends", Some(3)).await.unwrap();
        assert_eq!(before, ranking(&after));
        assert_eq!(after.candidates[2].item.view_count, 1);
    }

    #[tokio::test]
    async fn test_data_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let conseil = LeConseil::open(config_for(dir.path())).unwrap();
            conseil.import_file(write_articles(dir.path())).unwrap();
            conseil.record_view("crm-release").unwrap();
            conseil.close().unwrap();
        }

        let conseil = LeConseil::open(config_for(dir.path())).unwrap();
        assert_eq!(conseil.count().unwrap(), 4);
        assert_eq!(conseil.show("crm-release").unwrap().view_count, 151);

        // re-importing never lowers an accumulated view count
        conseil.import_file(write_articles(dir.path())).unwrap();
        assert_eq!(conseil.show("crm-release").unwrap().view_count, 151);
    }

    #[tokio::test]
    async fn test_same_category_only() {
        let dir = TempDir::new().unwrap();
        let mut config = config_for(dir.path());
        config.recommender.same_category_only = true;

        let conseil = LeConseil::open(config).unwrap().with_clock(clock());
        conseil.import_file(write_articles(dir.path())).unwrap();

        let ranked = conseil.recommend("erp-trends", Some(5)).await.unwrap();
        let ids: Vec<_> = ranked.candidates.iter().map(|c| c.item.id.as_str()).collect();
        assert_eq!(ids, vec!["erp-selection"]);
    }

    #[test]
    fn test_error_handling() {
        let dir = TempDir::new().unwrap();
        let conseil = LeConseil::open(config_for(dir.path())).unwrap();

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        let err = conseil.import_file(&bad).unwrap_err();
        assert!(matches!(err, ConseilError::Serialization { .. }));
        assert!(err.suggestion().is_some());

        let err = conseil.show("nothing").unwrap_err();
        assert!(err.is_recoverable());
        assert!(matches!(err, ConseilError::NotFound { .. }));
    }
}

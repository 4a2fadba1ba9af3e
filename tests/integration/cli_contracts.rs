use scaffold::tooling::cli::{CliContext, Commands, OutputFormat};
use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use crate::integration::support::{with_xdg_env, SAMPLE_DOC};

fn workspace(temp_dir: &TempDir) -> PathBuf {
    let workspace_root = temp_dir.path().join("workspace");
    fs::create_dir_all(&workspace_root).unwrap();
    fs::write(workspace_root.join("spec.yaml"), SAMPLE_DOC).unwrap();
    workspace_root
}

fn ingest(cli: &CliContext) -> String {
    cli.execute(&Commands::Ingest {
        file: PathBuf::from("spec.yaml"),
        format: OutputFormat::Text,
    })
    .unwrap()
}

#[test]
fn ingest_json_contract_and_store_location() {
    let temp_dir = TempDir::new().unwrap();
    with_xdg_env(&temp_dir, || {
        let workspace_root = workspace(&temp_dir);
        let cli = CliContext::new(workspace_root, None).unwrap();

        let output = cli
            .execute(&Commands::Ingest {
                file: PathBuf::from("spec.yaml"),
                format: OutputFormat::Json,
            })
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        let fingerprint = parsed["fingerprint"].as_str().unwrap();
        assert_eq!(fingerprint.len(), 64);

        // Default store lives under XDG data home, not in the workspace.
        assert!(temp_dir.path().join("data").join("scaffold").exists());
        assert!(!temp_dir.path().join("workspace").join(".scaffold").exists());

        let listed = cli
            .execute(&Commands::List {
                format: OutputFormat::Json,
            })
            .unwrap();
        let listed: serde_json::Value = serde_json::from_str(&listed).unwrap();
        assert_eq!(listed["documents"][0], fingerprint);
    });
}

#[test]
fn validate_json_contract_has_required_fields() {
    let temp_dir = TempDir::new().unwrap();
    with_xdg_env(&temp_dir, || {
        let cli = CliContext::new(workspace(&temp_dir), None).unwrap();
        let fingerprint = ingest(&cli);

        let output = cli
            .execute(&Commands::Validate {
                id: fingerprint[..10].to_string(),
                format: OutputFormat::Json,
            })
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["fingerprint"], fingerprint.as_str());
        assert_eq!(parsed["project_name"], "proj");
        assert_eq!(parsed["directories"], 1);
        assert_eq!(parsed["files"], 2);
        assert!(parsed["skipped"].as_array().unwrap().is_empty());
    });
}

#[test]
fn show_subtree_as_json() {
    let temp_dir = TempDir::new().unwrap();
    with_xdg_env(&temp_dir, || {
        let cli = CliContext::new(workspace(&temp_dir), None).unwrap();
        let fingerprint = ingest(&cli);

        let output = cli
            .execute(&Commands::Show {
                id: fingerprint.clone(),
                path: Some("src".to_string()),
                format: OutputFormat::Json,
            })
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["type"], "directory");
        assert_eq!(parsed["children"][0]["name"], "main.txt");
        assert_eq!(parsed["children"][0]["content"], "hi");

        let err = cli
            .execute(&Commands::Show {
                id: fingerprint,
                path: Some("missing".to_string()),
                format: OutputFormat::Text,
            })
            .unwrap_err();
        assert_eq!(err.kind(), "validation");
    });
}

#[test]
fn build_writes_default_output_directory() {
    let temp_dir = TempDir::new().unwrap();
    with_xdg_env(&temp_dir, || {
        let workspace_root = workspace(&temp_dir);
        let cli = CliContext::new(workspace_root.clone(), None).unwrap();
        let fingerprint = ingest(&cli);

        let output = cli
            .execute(&Commands::Build {
                id: fingerprint.clone(),
                root: None,
                format: OutputFormat::Json,
            })
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        let expected_root = workspace_root.join("output").join(&fingerprint).join("proj");
        assert_eq!(parsed["root"], expected_root.to_string_lossy().as_ref());
        assert_eq!(parsed["files"].as_array().unwrap().len(), 2);
        assert_eq!(
            fs::read_to_string(expected_root.join("README.md")).unwrap(),
            "hello"
        );
    });
}

#[test]
fn dry_run_publish_reports_every_path() {
    let temp_dir = TempDir::new().unwrap();
    with_xdg_env(&temp_dir, || {
        let cli = CliContext::new(workspace(&temp_dir), None).unwrap();
        let fingerprint = ingest(&cli);

        let output = cli
            .execute(&Commands::Publish {
                id: fingerprint,
                name: None,
                private: true,
                description: None,
                base_path: String::new(),
                dry_run: true,
                format: OutputFormat::Json,
            })
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["dry_run"], true);
        assert_eq!(parsed["repository"]["name"], "proj");
        assert_eq!(parsed["created"], 2);
        assert_eq!(parsed["failed"], 0);
        let outcomes = parsed["outcomes"].as_array().unwrap();
        assert_eq!(outcomes[0]["path"], "src/main.txt");
        assert_eq!(outcomes[0]["kind"], "file");
        assert_eq!(outcomes[0]["commit_message"], "Add src/main.txt");
    });
}

#[test]
fn workspace_config_file_overrides_commit_messages() {
    let temp_dir = TempDir::new().unwrap();
    with_xdg_env(&temp_dir, || {
        let workspace_root = workspace(&temp_dir);
        fs::write(
            workspace_root.join("scaffold.toml"),
            "[remote.commit_messages]\nfile = \"Ajout de {path}\"\n",
        )
        .unwrap();
        let cli = CliContext::new(workspace_root, None).unwrap();
        let fingerprint = ingest(&cli);

        let output = cli
            .execute(&Commands::Publish {
                id: fingerprint,
                name: None,
                private: false,
                description: None,
                base_path: String::new(),
                dry_run: true,
                format: OutputFormat::Json,
            })
            .unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["outcomes"][1]["commit_message"], "Ajout de README.md");
    });
}

#[test]
fn publish_without_token_is_config_error() {
    let temp_dir = TempDir::new().unwrap();
    with_xdg_env(&temp_dir, || {
        let cli = CliContext::new(workspace(&temp_dir), None).unwrap();
        let fingerprint = ingest(&cli);

        let err = cli
            .execute(&Commands::Publish {
                id: fingerprint,
                name: None,
                private: false,
                description: None,
                base_path: String::new(),
                dry_run: false,
                format: OutputFormat::Text,
            })
            .unwrap_err();
        assert_eq!(err.kind(), "config");
    });
}

#[test]
fn partially_failed_publish_is_reported_incomplete() {
    let temp_dir = TempDir::new().unwrap();
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let server = runtime.block_on(async {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/user/repos"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "name": "proj",
                "full_name": "octo/proj",
                "html_url": "https://github.com/octo/proj",
                "owner": { "login": "octo" }
            })))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/repos/octo/proj/contents/src/main.txt"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;
        Mock::given(method("PUT"))
            .and(path("/repos/octo/proj/contents/README.md"))
            .respond_with(ResponseTemplate::new(201))
            .mount(&server)
            .await;
        server
    });

    with_xdg_env(&temp_dir, || {
        let workspace_root = workspace(&temp_dir);
        fs::write(
            workspace_root.join("scaffold.toml"),
            format!(
                "[remote]\napi_base_url = \"{}\"\ntoken = \"test-token\"\n",
                server.uri()
            ),
        )
        .unwrap();
        let cli = CliContext::new(workspace_root, None).unwrap();
        let fingerprint = ingest(&cli);

        let outcome = cli
            .run(&Commands::Publish {
                id: fingerprint,
                name: None,
                private: false,
                description: None,
                base_path: String::new(),
                dry_run: false,
                format: OutputFormat::Json,
            })
            .unwrap();
        assert!(!outcome.complete);
        let parsed: serde_json::Value = serde_json::from_str(&outcome.output).unwrap();
        assert_eq!(parsed["created"], 1);
        assert_eq!(parsed["failed"], 1);
        assert_eq!(parsed["outcomes"][0]["ok"], false);
    });
}

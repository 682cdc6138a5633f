//! End-to-end update scenarios against the in-memory doubles.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, UNIX_EPOCH};

use flinkctl_api::mock::{ApiCall, MockJobManager};
use flinkctl_api::Job;
use flinkctl_ops::fs::MemoryFilesystem;
use flinkctl_ops::{ArtifactSource, DeployerConfig, JobOperator, OpsError, UpdateSpec};

fn running_job(id: &str, name: &str) -> Job {
    Job {
        id: id.to_owned(),
        name: name.to_owned(),
        status: "RUNNING".to_owned(),
        start_time: None,
    }
}

fn update_spec(name_base: &str, savepoint_dir: &str) -> UpdateSpec {
    UpdateSpec {
        job_name_base: name_base.to_owned(),
        savepoint_dir: savepoint_dir.to_owned(),
        fallback_to_deploy: false,
        artifact: ArtifactSource::Local(PathBuf::from("wordcount-v2.jar")),
        entry_class: Some("org.example.WordCount".to_owned()),
        parallelism: 2,
        program_args: vec!["--input".to_owned(), "words.txt".to_owned()],
        allow_non_restored_state: false,
    }
}

/// The old job is snapshotted and cancelled, but the savepoint directory
/// turns out empty: the update fails with the locator's error, after the
/// cancel and before any deploy step.
#[tokio::test]
async fn update_fails_when_no_savepoint_appears() {
    let mock = Arc::new(MockJobManager::with_jobs(vec![running_job(
        "Job-A",
        "WordCount v1.0",
    )]));
    let fs = Arc::new(MemoryFilesystem::new());
    fs.add_dir("/data/flink");

    let operator = JobOperator::new(mock.clone(), fs, DeployerConfig::default());
    let error = operator
        .update(update_spec("WordCount", "/data/flink"))
        .await
        .unwrap_err();

    assert_eq!(
        error.to_string(),
        "retrieving the latest savepoint failed: No savepoints present in directory: /data/flink"
    );

    let calls = mock.calls();
    assert!(calls
        .iter()
        .any(|call| matches!(call, ApiCall::Terminate { .. })));
    assert!(!calls
        .iter()
        .any(|call| matches!(call, ApiCall::UploadJar { .. })));
    assert!(!calls.iter().any(|call| matches!(call, ApiCall::RunJar { .. })));
}

/// Happy path: snapshot, cancel, resume the new version from the savepoint
/// the coordinator just created.
#[tokio::test]
async fn update_resumes_the_new_version_from_the_latest_savepoint() {
    let mock = Arc::new(MockJobManager::with_jobs(vec![running_job(
        "Job-A",
        "WordCount v1.0",
    )]));
    let fs = Arc::new(MemoryFilesystem::new());
    fs.add_file(
        "/data/flink",
        "savepoint-aaaa",
        UNIX_EPOCH + Duration::from_secs(1_000),
    );
    fs.add_file(
        "/data/flink",
        "savepoint-bbbb",
        UNIX_EPOCH + Duration::from_secs(2_000),
    );

    let operator = JobOperator::new(mock.clone(), fs, DeployerConfig::default());
    operator
        .update(update_spec("WordCount", "/data/flink"))
        .await
        .unwrap();

    let calls = mock.calls();
    assert_eq!(calls[0], ApiCall::RetrieveJobs);
    assert_eq!(
        calls.last(),
        Some(&ApiCall::RunJar {
            jar_id: "wordcount-v2.jar".to_owned(),
            savepoint_path: Some("/data/flink/savepoint-bbbb".to_owned()),
        })
    );
}

/// A second update after a successful one sees the new version as the single
/// running instance and bounces it again: the operation is a deployment
/// command, not a reconciliation loop.
#[tokio::test]
async fn update_is_not_idempotent() {
    let mock = Arc::new(MockJobManager::with_jobs(vec![running_job(
        "Job-B",
        "WordCount v2.0",
    )]));
    let fs = Arc::new(MemoryFilesystem::new());
    fs.add_file(
        "/data/flink",
        "savepoint-cccc",
        UNIX_EPOCH + Duration::from_secs(3_000),
    );

    let operator = JobOperator::new(mock.clone(), fs, DeployerConfig::default());
    operator
        .update(update_spec("WordCount", "/data/flink"))
        .await
        .unwrap();

    let calls = mock.calls();
    assert!(calls.contains(&ApiCall::CreateSavepoint {
        job_id: "Job-B".to_owned(),
        target_directory: "/data/flink".to_owned(),
    }));
    assert!(calls.contains(&ApiCall::Terminate {
        job_id: "Job-B".to_owned(),
        mode: Some(flinkctl_api::TerminationMode::Cancel),
    }));
}

/// With fallback enabled and nothing running, update degrades to a fresh
/// deploy and never touches savepoints.
#[tokio::test]
async fn update_falls_back_to_a_fresh_deploy() {
    let mock = Arc::new(MockJobManager::new());
    let fs = Arc::new(MemoryFilesystem::new());

    let operator = JobOperator::new(mock.clone(), fs, DeployerConfig::default());
    let mut spec = update_spec("WordCount", "/data/flink");
    spec.fallback_to_deploy = true;
    operator.update(spec).await.unwrap();

    let calls = mock.calls();
    assert!(!calls
        .iter()
        .any(|call| matches!(call, ApiCall::CreateSavepoint { .. })));
    assert_eq!(
        calls.last(),
        Some(&ApiCall::RunJar {
            jar_id: "wordcount-v2.jar".to_owned(),
            savepoint_path: None,
        })
    );
}

/// A deploy failure is the update's failure, surfaced verbatim.
#[tokio::test]
async fn update_surfaces_deploy_failures() {
    let mock = Arc::new(MockJobManager::with_jobs(vec![running_job(
        "Job-A",
        "WordCount v1.0",
    )]));
    mock.fail_run(400, "bad entry class");
    let fs = Arc::new(MemoryFilesystem::new());
    fs.add_file(
        "/data/flink",
        "savepoint-dddd",
        UNIX_EPOCH + Duration::from_secs(4_000),
    );

    let operator = JobOperator::new(mock.clone(), fs, DeployerConfig::default());
    let error = operator
        .update(update_spec("WordCount", "/data/flink"))
        .await
        .unwrap_err();

    match error {
        OpsError::Api(api_error) => {
            assert!(api_error.to_string().contains("bad entry class"));
        }
        other => panic!("expected the API error verbatim, got {other}"),
    }
}

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::write;
use std::path::Path;
use tempfile::tempdir;

const VPN_FIX: &str = "Reinstall the VPN client and re-import the company certificate.";

fn write_fixture(dir: &Path) {
    write(
        dir.join("tickets.json"),
        format!(
            r#"[
  {{"id": 1, "subject": "VPN issue", "body": "VPN drops", "fix": "{VPN_FIX}", "state": "Resolved",
    "opened": "2024-01-01", "closed": "2024-01-02", "cat": null}},
  {{"id": 2, "subject": "VPN issue", "body": "VPN drops", "fix": "{VPN_FIX}", "state": "Closed",
    "opened": "2024-01-01", "closed": "2024-01-03", "cat": null}},
  {{"id": 3, "subject": "Open", "body": "Outlook slow", "fix": "", "state": "Open",
    "opened": null, "closed": null, "cat": null}}
]"#
        ),
    )
    .expect("Writing ticket export failed");
    write(dir.join("categories.json"), r#"{"network": ["vpn"]}"#)
        .expect("Writing categories failed");
    write(
        dir.join("config.yaml"),
        format!(
            "extract:\n  path: {export}\n  fields:\n    ticket_id: id\n    title: subject\n    description: body\n    resolution: fix\n    status: state\n    created_date: opened\n    resolved_date: closed\n    category: cat\nprocess:\n  categories_path: {categories}\noutput_dir: {out}\n",
            export = dir.join("tickets.json").display(),
            categories = dir.join("categories.json").display(),
            out = dir.join("kb").display(),
        ),
    )
    .expect("Writing config failed");
}

#[test]
fn run_cli_writes_processed_and_articles() {
    let dir = tempdir().unwrap();
    write_fixture(dir.path());

    let mut cmd = Command::cargo_bin("ticket-kb").expect("Binary exists");
    cmd.arg("run").arg("--config").arg(dir.path().join("config.yaml"));
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Pipeline complete"));

    let articles: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(dir.path().join("kb/articles.json")).unwrap())
            .unwrap();
    let articles = articles.as_array().unwrap();
    assert_eq!(articles.len(), 1);
    assert_eq!(articles[0]["related_tickets"], serde_json::json!(["1", "2"]));
    assert_eq!(articles[0]["category"], "network");
    assert!(dir.path().join("kb/processed.json").exists());
}

#[test]
fn generate_cli_writes_articles_from_processed_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("processed.json");
    let output = dir.path().join("articles.json");
    write(
        &input,
        r#"[
  {"ticket_id": "1", "title": "VPN issue", "description": "VPN drops",
   "resolution": "Reinstall VPN client", "category": "network", "confidence_score": 0.6},
  {"ticket_id": "2", "title": "VPN issue", "description": "VPN disconnects",
   "resolution": "Reinstall VPN client", "category": "network", "confidence_score": 0.7}
]"#,
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("ticket-kb").expect("Binary exists");
    cmd.arg("generate").arg("--input").arg(&input).arg("--output").arg(&output);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Generated 1 articles"));

    let articles: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&output).unwrap()).unwrap();
    assert_eq!(articles[0]["confidence_score"], 0.85);
}

#[test]
fn generate_cli_fails_on_missing_input() {
    let dir = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("ticket-kb").expect("Binary exists");
    cmd.arg("generate")
        .arg("--input")
        .arg(dir.path().join("missing.json"))
        .arg("--output")
        .arg(dir.path().join("articles.json"));
    cmd.assert().failure();
}

use std::sync::{Arc, Mutex};
use tracing_subscriber::prelude::*;
use tracing_subscriber::{layer::Context, Layer, Registry};

/// Custom Layer to collect emitted event messages.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        self.events.lock().unwrap().push(format!("{:?}", event));
    }
}

#[test]
fn emits_trace_initialised_event() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    use ticket_kb::cli::{run, Cli, Commands};

    let cli = Cli {
        command: Commands::Run {
            config: std::path::PathBuf::from("dummy.yaml"),
        },
    };

    assert!(run(cli).is_err());

    let event_msgs = events.lock().unwrap();
    assert!(
        event_msgs.iter().any(|msg| msg.contains("trace_initialised")),
        "Expected a 'trace_initialised' trace event, got: {:?}",
        event_msgs
    );
}

#![allow(dead_code)]

use std::io::Write;
use std::process::{Command, Output, Stdio};
use std::sync::Arc;

use issuedesk::store::IssueStore;
use issuedesk::types::{Assignee, IssuePayload, IssuePriority, IssueStatus};
use tempfile::TempDir;

pub fn issuedesk_binary() -> &'static str {
    env!("CARGO_BIN_EXE_issuedesk")
}

/// Reference server on an ephemeral port, running on its own runtime thread
/// so both sync and async tests can use it.
pub struct TestServer {
    pub url: String,
    pub store: Arc<IssueStore>,
}

impl TestServer {
    pub fn start(store: IssueStore) -> Self {
        let listener =
            std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local address");
        listener
            .set_nonblocking(true)
            .expect("Failed to make listener non-blocking");

        let store = Arc::new(store);
        let served = Arc::clone(&store);
        std::thread::spawn(move || {
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .expect("Failed to build server runtime");
            runtime.block_on(async move {
                let listener = tokio::net::TcpListener::from_std(listener)
                    .expect("Failed to adopt test listener");
                let _ = issuedesk::server::serve_on(listener, served).await;
            });
        });

        TestServer {
            url: format!("http://{addr}"),
            store,
        }
    }

    pub fn seeded() -> Self {
        Self::start(IssueStore::seeded())
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.url)
    }
}

/// A store holding `count` issues titled `Issue 1`..`Issue N`.
pub fn numbered_store(count: usize) -> IssueStore {
    let store = IssueStore::new();
    for n in 1..=count {
        store
            .create(IssuePayload {
                title: format!("Issue {n}"),
                description: format!("Description {n}"),
                status: IssueStatus::Open,
                priority: IssuePriority::Medium,
                assignee: Assignee::Bob,
            })
            .expect("Failed to seed store");
    }
    store
}

/// Helper struct to run issuedesk commands in an isolated temp directory
pub struct DeskTest {
    pub temp_dir: TempDir,
    api_url: Option<String>,
}

impl DeskTest {
    pub fn new() -> Self {
        DeskTest {
            temp_dir: TempDir::new().expect("Failed to create temp directory"),
            api_url: None,
        }
    }

    /// Commands talk to `server` through `ISSUEDESK_API_URL`.
    pub fn against(server: &TestServer) -> Self {
        DeskTest {
            api_url: Some(server.url.clone()),
            ..Self::new()
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(issuedesk_binary());
        cmd.args(args)
            .current_dir(self.temp_dir.path())
            .env_remove("RUST_LOG")
            .env_remove("ISSUEDESK_ROOT");
        match &self.api_url {
            Some(url) => cmd.env("ISSUEDESK_API_URL", url),
            None => cmd.env_remove("ISSUEDESK_API_URL"),
        };
        cmd
    }

    pub fn run(&self, args: &[&str]) -> Output {
        self.command(args)
            .output()
            .expect("Failed to execute issuedesk command")
    }

    pub fn run_with_stdin(&self, args: &[&str], input: &str) -> Output {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to spawn issuedesk command");
        child
            .stdin
            .take()
            .expect("stdin is piped")
            .write_all(input.as_bytes())
            .expect("Failed to write stdin");
        child
            .wait_with_output()
            .expect("Failed to wait for issuedesk command")
    }

    pub fn run_success(&self, args: &[&str]) -> String {
        let output = self.run(args);
        if !output.status.success() {
            panic!(
                "Command {:?} failed with status {:?}\nstdout: {}\nstderr: {}",
                args,
                output.status,
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            );
        }
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    pub fn run_failure(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            !output.status.success(),
            "Expected command {:?} to fail, but it succeeded",
            args
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    pub fn run_json(&self, args: &[&str]) -> serde_json::Value {
        let stdout = self.run_success(args);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("Command {args:?} printed invalid JSON ({e}): {stdout}"))
    }

    pub fn config_path(&self) -> std::path::PathBuf {
        self.temp_dir.path().join(".issuedesk").join("config.yaml")
    }
}

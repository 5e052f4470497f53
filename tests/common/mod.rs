//! Shared fixtures for integration tests: a fake `go` command, a fake module
//! proxy, and helpers to stand up a project directory.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use modvital::activity::proxy::info_url;
use modvital::activity::{
    ActivityResolver, HttpClient, HttpError, HttpResponse, RegistryProxyStrategy,
};
use modvital::exec::{CommandError, CommandRunner};
use modvital::{DependencyCoordinate, ScanPolicy, Scanner};
use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;

/// Proxy endpoint the fake client answers for.
pub const PROXY: &str = "https://proxy.test";

/// Root module path of every fixture project.
pub const ROOT_MODULE: &str = "example.com/app";

/// A listed dependency in a fixture project.
#[derive(Debug, Clone)]
pub struct Dep {
    pub path: String,
    pub version: String,
    pub indirect: bool,
    pub update: Option<String>,
}

impl Dep {
    pub fn direct(path: &str, version: &str) -> Self {
        Self {
            path: path.to_string(),
            version: version.to_string(),
            indirect: false,
            update: None,
        }
    }

    pub fn indirect(path: &str, version: &str) -> Self {
        Self {
            indirect: true,
            ..Self::direct(path, version)
        }
    }

    pub fn with_update(mut self, version: &str) -> Self {
        self.update = Some(version.to_string());
        self
    }

    pub fn coordinate(&self) -> DependencyCoordinate {
        DependencyCoordinate::new(self.path.clone(), self.version.clone())
    }
}

/// Render `go list -json -m all` output: the root module, then `deps`.
pub fn go_list_output(deps: &[Dep]) -> String {
    let mut out = format!("{{\n\t\"Path\": \"{ROOT_MODULE}\",\n\t\"Main\": true\n}}\n");
    for dep in deps {
        let _ = write!(
            out,
            "{{\n\t\"Path\": \"{}\",\n\t\"Version\": \"{}\"",
            dep.path, dep.version
        );
        if dep.indirect {
            out.push_str(",\n\t\"Indirect\": true");
        }
        if let Some(update) = &dep.update {
            let _ = write!(
                out,
                ",\n\t\"Update\": {{\n\t\t\"Path\": \"{}\",\n\t\t\"Version\": \"{update}\"\n\t}}",
                dep.path
            );
        }
        out.push_str("\n}\n");
    }
    out
}

/// Render `go mod graph` output in which the root requires every direct dep.
pub fn go_graph_output(deps: &[Dep]) -> String {
    let mut out = format!("{ROOT_MODULE} go@1.22\n");
    for dep in deps.iter().filter(|d| !d.indirect) {
        let _ = writeln!(out, "{ROOT_MODULE} {}@{}", dep.path, dep.version);
        for indirect in deps.iter().filter(|d| d.indirect) {
            let _ = writeln!(
                out,
                "{}@{} {}@{}",
                dep.path, dep.version, indirect.path, indirect.version
            );
        }
    }
    out
}

/// Fake `go` that answers `list` and `mod graph` from canned output.
pub struct FakeGo {
    list: std::result::Result<String, String>,
    graph: std::result::Result<String, String>,
    calls: Mutex<Vec<String>>,
}

impl FakeGo {
    pub fn new(deps: &[Dep]) -> Self {
        Self {
            list: Ok(go_list_output(deps)),
            graph: Ok(go_graph_output(deps)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn with_raw_list(mut self, output: &str) -> Self {
        self.list = Ok(output.to_string());
        self
    }

    pub fn with_failing_list(mut self, stderr: &str) -> Self {
        self.list = Err(stderr.to_string());
        self
    }

    pub fn with_failing_graph(mut self, stderr: &str) -> Self {
        self.graph = Err(stderr.to_string());
        self
    }

    /// Subcommands invoked so far, e.g. `["list", "mod"]`.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl CommandRunner for FakeGo {
    fn run(
        &self,
        _dir: Option<&Path>,
        program: &str,
        args: &[&str],
    ) -> std::result::Result<Vec<u8>, CommandError> {
        assert_eq!(program, "go", "only go is expected in scan tests");
        let sub = args.first().copied().unwrap_or_default();
        self.calls.lock().unwrap().push(sub.to_string());

        let canned = match sub {
            "list" => &self.list,
            "mod" => &self.graph,
            other => panic!("unexpected go subcommand {other}"),
        };
        canned
            .as_ref()
            .map(|out| out.as_bytes().to_vec())
            .map_err(|stderr| CommandError::NonZeroExit {
                program: "go".to_string(),
                code: Some(1),
                stderr: stderr.clone(),
            })
    }
}

/// Fake module proxy keyed by `.info` URL.
pub struct FakeProxy {
    responses: HashMap<String, (u16, Vec<u8>)>,
    latency: HashMap<String, Duration>,
    requests: AtomicUsize,
}

impl FakeProxy {
    pub fn new() -> Self {
        Self {
            responses: HashMap::new(),
            latency: HashMap::new(),
            requests: AtomicUsize::new(0),
        }
    }

    /// Serve a `.info` document with `time` for `dep`.
    pub fn with_time(mut self, dep: &Dep, time: DateTime<Utc>) -> Self {
        let body = format!(
            r#"{{"Version":"{}","Time":"{}"}}"#,
            dep.version,
            time.to_rfc3339()
        );
        self.responses
            .insert(info_url(PROXY, &dep.coordinate()), (200, body.into_bytes()));
        self
    }

    /// Serve an undecodable body with status 200 for `dep`.
    pub fn with_garbage(mut self, dep: &Dep) -> Self {
        self.responses.insert(
            info_url(PROXY, &dep.coordinate()),
            (200, b"<html>not json</html>".to_vec()),
        );
        self
    }

    /// Delay the answer for `dep`.
    pub fn with_latency(mut self, dep: &Dep, delay: Duration) -> Self {
        self.latency.insert(info_url(PROXY, &dep.coordinate()), delay);
        self
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

impl HttpClient for FakeProxy {
    fn get(&self, url: &str) -> std::result::Result<HttpResponse, HttpError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.latency.get(url) {
            std::thread::sleep(*delay);
        }
        let (status, body) = self
            .responses
            .get(url)
            .cloned()
            .unwrap_or((404, b"not found".to_vec()));
        Ok(HttpResponse { status, body })
    }
}

/// A temporary directory containing a minimal `go.mod`.
pub fn project_dir() -> TempDir {
    let dir = tempfile::tempdir().expect("create project dir");
    std::fs::write(
        dir.path().join("go.mod"),
        format!("module {ROOT_MODULE}\n\ngo 1.22\n"),
    )
    .expect("write go.mod");
    dir
}

/// Scanner over `project` backed by the fakes, without an activity cache.
pub fn scanner(
    project: &Path,
    go: Arc<FakeGo>,
    proxy: Arc<FakeProxy>,
    policy: ScanPolicy,
) -> Scanner {
    let resolver = ActivityResolver::new(vec![Box::new(RegistryProxyStrategy::new(
        vec![PROXY.to_string()],
        proxy,
    ))]);
    Scanner::new(project, policy, go, resolver)
}

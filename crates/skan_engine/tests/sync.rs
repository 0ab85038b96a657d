use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use skan_core::naming::is_standard_file;
use skan_engine::{
    write_output, LogSink, ManifestStore, ProgressSink, RunStage, SyncConfig, SyncEngine,
    SyncError, SyncEvent,
};
use tempfile::TempDir;

#[derive(Default)]
struct TestSink {
    events: Arc<Mutex<Vec<SyncEvent>>>,
}

impl TestSink {
    fn take(&self) -> Vec<SyncEvent> {
        self.events.lock().unwrap().drain(..).collect()
    }
}

impl ProgressSink for TestSink {
    fn emit(&self, event: SyncEvent) {
        self.events.lock().unwrap().push(event);
    }
}

const WIDGET_PAGE: &str = concat!(
    "<html><body><nav><a href=\"index.html\">Home</a></nav>",
    "<pre><code>const x=1;</code></pre></body></html>",
);

const INDEX_PAGE: &str = concat!(
    "<html><head><link href=\"styles/jsdoc.css\"></head><body>",
    "<a href=\"widget.js.html\">widget</a><a href=\"global.html\">global</a>",
    "</body></html>",
);

struct Fixture {
    _temp: TempDir,
    config: SyncConfig,
}

impl Fixture {
    /// Source dir with the default `docs` output dir and an empty manifest.
    fn new() -> Self {
        skan_logging::initialize_for_tests();
        let temp = TempDir::new().unwrap();
        let source = temp.path().join("out");
        fs::create_dir_all(source.join("docs")).unwrap();
        fs::write(source.join("docs/manifest.json"), r#"{"files":[]}"#).unwrap();
        let config = SyncConfig::new(source, None);
        Self {
            _temp: temp,
            config,
        }
    }

    fn source(&self, name: &str, content: &str) {
        fs::write(self.config.source_dir.join(name), content).unwrap();
    }

    fn output(&self, name: &str, content: &str) {
        fs::write(self.config.output_dir.join(name), content).unwrap();
    }

    fn read_output(&self, name: &str) -> String {
        fs::read_to_string(self.config.output_dir.join(name)).unwrap()
    }

    fn manifest(&self) -> BTreeSet<String> {
        ManifestStore::load(&self.config.output_dir)
            .unwrap()
            .files()
            .iter()
            .cloned()
            .collect()
    }

    fn engine(&self) -> SyncEngine {
        SyncEngine::new(self.config.clone())
    }
}

fn non_standard_files(dir: &Path) -> BTreeSet<String> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap())
        .filter(|e| e.file_type().unwrap().is_file())
        .map(|e| e.file_name().into_string().unwrap())
        .filter(|name| !is_standard_file(name))
        .collect()
}

fn set(names: &[&str]) -> BTreeSet<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[tokio::test]
async fn source_listing_is_converted_to_markdown() {
    let fx = Fixture::new();
    fx.source("widget.js.html", WIDGET_PAGE);

    let report = fx.engine().run(&LogSink).await.unwrap();

    assert!(report.is_clean());
    assert_eq!(report.written, vec!["widget.js.md"]);
    assert_eq!(
        fx.read_output("widget.js.md"),
        "\n## widget.js\n\n```javascript\nconst x=1;\n```\n"
    );
    assert_eq!(fx.manifest(), set(&["widget.js.md"]));
}

#[tokio::test]
async fn index_page_is_stored_as_code_index_with_rewritten_links() {
    let fx = Fixture::new();
    fx.source("index.html", INDEX_PAGE);

    fx.engine().run(&LogSink).await.unwrap();

    let index = fx.read_output("code_index.html");
    assert!(index.contains(r#"<link href="styles/jsdoc.css">"#));
    assert!(index.contains(r##"<a href="#/widget.js.md">"##));
    assert!(index.contains(r##"<a href="#/global.html">"##));
    assert!(!fx.config.output_dir.join("index.html").exists());
}

#[tokio::test]
async fn links_inside_listing_nav_are_rewritten_before_extraction() {
    let fx = Fixture::new();
    fx.source(
        "widget.js.html",
        "<nav><a href=\"index.html\">Home</a></nav><code><a href=\"index.html\">i</a></code>",
    );

    fx.engine().run(&LogSink).await.unwrap();

    assert!(fx
        .read_output("widget.js.md")
        .contains(r##"href="#/code_index.html""##));
}

#[tokio::test]
async fn non_html_sources_are_skipped() {
    let fx = Fixture::new();
    fx.source("notes.txt", "plain");
    fx.source("logo.png", "binary");
    fs::create_dir(fx.config.source_dir.join("nested.html")).unwrap();

    let report = fx.engine().run(&LogSink).await.unwrap();

    let skipped: BTreeSet<_> = report.skipped.iter().cloned().collect();
    assert_eq!(skipped, set(&["logo.png", "notes.txt"]));
    assert!(report.written.is_empty());
    assert_eq!(non_standard_files(&fx.config.output_dir), BTreeSet::new());
}

#[tokio::test]
async fn stale_manifest_entries_are_removed_before_generation() {
    let fx = Fixture::new();
    fx.output("old.md", "stale");
    fx.output("manifest.json", r#"{"files":["old.md"]}"#);

    let report = fx.engine().run(&LogSink).await.unwrap();

    assert_eq!(report.removed, vec!["old.md"]);
    assert!(!fx.config.output_dir.join("old.md").exists());
    assert_eq!(fx.manifest(), BTreeSet::new());
}

#[tokio::test]
async fn untracked_and_standard_files_survive_cleanup() {
    let fx = Fixture::new();
    fx.output("README.md", "hand written");
    fx.output("_sidebar.md", "nav");
    fx.output("mine.md", "not tracked");
    fx.output(
        "manifest.json",
        r#"{"files":["README.md","gone.md","generated.md"]}"#,
    );
    fx.output("generated.md", "old");

    let report = fx.engine().run(&LogSink).await.unwrap();

    assert_eq!(report.removed, vec!["generated.md"]);
    assert_eq!(fx.read_output("README.md"), "hand written");
    assert_eq!(fx.read_output("_sidebar.md"), "nav");
    assert_eq!(fx.read_output("mine.md"), "not tracked");
    // Entries not present on disk are dropped; surviving files stay listed.
    assert_eq!(fx.manifest(), set(&["README.md"]));
}

#[tokio::test]
async fn malformed_listing_fails_only_that_file() {
    let fx = Fixture::new();
    fx.source("broken.js.html", "<pre>nothing</pre>");
    fx.source("widget.js.html", WIDGET_PAGE);

    let report = fx.engine().run(&LogSink).await.unwrap();

    assert!(!report.is_clean());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].filename, "broken.js.html");
    assert!(matches!(
        report.failures[0].error,
        SyncError::MalformedInput(_)
    ));
    assert!(!fx.config.output_dir.join("broken.js.md").exists());
    assert_eq!(fx.manifest(), set(&["widget.js.md"]));
}

#[tokio::test]
async fn invalid_utf8_source_is_an_io_failure() {
    let fx = Fixture::new();
    fs::write(fx.config.source_dir.join("bad.html"), b"caf\xe9").unwrap();

    let report = fx.engine().run(&LogSink).await.unwrap();

    assert_eq!(report.failures.len(), 1);
    assert!(matches!(report.failures[0].error, SyncError::Io { .. }));
}

#[tokio::test]
async fn repeated_runs_converge() {
    let fx = Fixture::new();
    fx.source("index.html", INDEX_PAGE);
    fx.source("widget.js.html", WIDGET_PAGE);
    fx.source("global.html", "<a href=\"index.html\">i</a>");
    fx.output("README.md", "keep");

    fx.engine().run(&LogSink).await.unwrap();
    let first = non_standard_files(&fx.config.output_dir);
    let first_manifest = fx.manifest();

    let report = fx.engine().run(&LogSink).await.unwrap();
    let second = non_standard_files(&fx.config.output_dir);

    assert_eq!(
        first,
        set(&["code_index.html", "global.html", "widget.js.md"])
    );
    assert_eq!(first, second);
    assert_eq!(first_manifest, fx.manifest());
    assert_eq!(report.removed.len(), 3);
    assert_eq!(fx.read_output("README.md"), "keep");
}

#[tokio::test]
async fn removed_source_page_disappears_on_next_run() {
    let fx = Fixture::new();
    fx.source("a.js.html", "<code>a</code>");
    fx.source("b.js.html", "<code>b</code>");
    fx.engine().run(&LogSink).await.unwrap();

    fs::remove_file(fx.config.source_dir.join("b.js.html")).unwrap();
    fx.engine().run(&LogSink).await.unwrap();

    assert_eq!(non_standard_files(&fx.config.output_dir), set(&["a.js.md"]));
    assert_eq!(fx.manifest(), set(&["a.js.md"]));
}

#[tokio::test]
async fn missing_manifest_aborts_the_run() {
    let fx = Fixture::new();
    fs::remove_file(fx.config.output_dir.join("manifest.json")).unwrap();
    fx.source("widget.js.html", WIDGET_PAGE);

    let err = fx.engine().run(&LogSink).await.unwrap_err();

    assert!(matches!(err, SyncError::NotFound(_)));
    assert!(!fx.config.output_dir.join("widget.js.md").exists());
}

#[tokio::test]
async fn missing_source_directory_aborts_the_run() {
    let fx = Fixture::new();
    let config = SyncConfig::new(
        fx.config.source_dir.join("nope"),
        Some(fx.config.output_dir.clone()),
    );

    let err = SyncEngine::new(config).run(&LogSink).await.unwrap_err();
    assert!(matches!(err, SyncError::NotFound(_)));
}

#[tokio::test]
async fn stages_are_reported_in_order() {
    let fx = Fixture::new();
    fx.source("widget.js.html", WIDGET_PAGE);
    let sink = TestSink::default();

    fx.engine().run(&sink).await.unwrap();

    let events = sink.take();
    let stages: Vec<_> = events
        .iter()
        .filter_map(|event| match event {
            SyncEvent::StageChanged(stage) => Some(*stage),
            _ => None,
        })
        .collect();
    assert_eq!(
        stages,
        vec![
            RunStage::Init,
            RunStage::CleanupStale,
            RunStage::GenerateAndWrite,
            RunStage::Done
        ]
    );
    assert!(events.contains(&SyncEvent::FileWritten {
        source: "widget.js.html".to_string(),
        output: "widget.js.md".to_string(),
    }));
}

#[tokio::test]
async fn write_output_refuses_standard_files() {
    let temp = TempDir::new().unwrap();
    let mut manifest = ManifestStore::initialize(temp.path()).unwrap();

    let err = write_output(temp.path(), "README.md", "x".to_string())
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::ProtectedFile(ref name) if name == "README.md"));
    assert!(!err.is_fatal());
    assert!(!temp.path().join("README.md").exists());
    assert!(!manifest.contains("README.md"));
    assert!(manifest.record_file("other.md"));
}

#[tokio::test]
async fn write_output_requires_existing_directory() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("docs");

    let err = write_output(&missing, "a.js.html", "x".to_string())
        .await
        .unwrap_err();

    assert!(matches!(err, SyncError::DirectoryMissing(_)));
    assert!(!missing.exists());
}

#[tokio::test]
async fn write_output_remaps_names() {
    let temp = TempDir::new().unwrap();

    let index = write_output(temp.path(), "index.html", "i".to_string())
        .await
        .unwrap();
    let listing = write_output(temp.path(), "w.js.html", "w".to_string())
        .await
        .unwrap();

    assert_eq!(index, "code_index.html");
    assert_eq!(listing, "w.js.md");
    assert_eq!(fs::read_to_string(temp.path().join("w.js.md")).unwrap(), "w");
}

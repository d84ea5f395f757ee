//! End-to-end scenarios across manifest parsing, the registry, the
//! catalog and the directory watcher.

use std::fs::{self, File};
use std::sync::Arc;
use std::time::Duration;

use bundle_fs::{ConfigStore, NormalizedPath};
use bundle_manifest::{ArchiveInspector, BundleDescriptor, VersionConstraint};
use bundle_registry::{
    Catalog, CatalogExporter, DirectoryWatcher, EventOutcome, EventProcessor, Registry,
};
use bundle_test_utils::{BundleDir, JarBuilder};
use fs2::FileExt;
use pretty_assertions::assert_eq;
use tempfile::TempDir;

// =============================================================================
// Test Infrastructure
// =============================================================================

/// A bundle directory plus a processor writing its catalog elsewhere.
struct Deployment {
    bundles: BundleDir,
    state: TempDir,
    processor: Arc<EventProcessor>,
}

impl Deployment {
    fn new() -> Self {
        let bundles = BundleDir::new();
        let state = TempDir::new().unwrap();
        let processor = Arc::new(
            EventProcessor::new(Arc::new(Registry::new()), ArchiveInspector::new())
                .with_catalog(CatalogExporter::new(state.path().join("catalog.toml"))),
        );
        Self {
            bundles,
            state,
            processor,
        }
    }

    fn registry(&self) -> &Arc<Registry> {
        self.processor.registry()
    }

    fn key(&self, name: &str) -> NormalizedPath {
        NormalizedPath::new(self.bundles.file(name))
    }

    fn catalog(&self) -> Catalog {
        ConfigStore::new()
            .load(&NormalizedPath::new(self.state.path().join("catalog.toml")))
            .unwrap()
    }

    fn deploy(&self, name: &str, jar: &JarBuilder) -> EventOutcome {
        let path = self.bundles.write_jar(name, jar);
        self.processor.handle_change(&path)
    }

    fn undeploy(&self, name: &str) -> EventOutcome {
        self.bundles.remove(name);
        self.processor.handle_remove(&self.bundles.file(name))
    }
}

fn provider_a() -> JarBuilder {
    JarBuilder::new().export("util.io;version=\"1.0.0\"")
}

fn consumer_b() -> JarBuilder {
    JarBuilder::new().import("util.io;version=\"[1.0.0,2.0.0)\"")
}

async fn eventually(mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(25)).await;
    }
    condition()
}

// =============================================================================
// Provider lookup
// =============================================================================

#[test]
fn provider_disappears_with_its_archive() {
    let d = Deployment::new();
    assert_eq!(d.deploy("A.jar", &provider_a()), EventOutcome::Registered);
    assert_eq!(d.deploy("B.jar", &consumer_b()), EventOutcome::Registered);

    let b = d.registry().get(&d.key("B.jar")).unwrap();
    let wanted = b.import("util.io").unwrap().constraint.clone();
    assert_eq!(d.registry().find_provider("util.io", &wanted), Some(d.key("A.jar")));

    assert_eq!(d.undeploy("A.jar"), EventOutcome::Deregistered);
    assert_eq!(d.registry().find_provider("util.io", &wanted), None);
}

#[test]
fn wildcard_import_matches_any_export() {
    let d = Deployment::new();
    d.deploy("A.jar", &JarBuilder::new().export("util.io;version=\"9.9.9\""));
    d.deploy("C.jar", &JarBuilder::new().import("util.io"));

    let rows = d.registry().resolve_imports(&d.key("C.jar")).unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].provider, Some(d.key("A.jar")));
}

#[test]
fn range_bounds_decide_compatibility() {
    let d = Deployment::new();
    d.deploy("two.jar", &JarBuilder::new().export("p;version=\"2.0.0\""));
    d.deploy("one.jar", &JarBuilder::new().export("q;version=\"1.0.0\""));

    let find = |package: &str, range: &str| {
        d.registry()
            .find_provider(package, &VersionConstraint::parse(range).unwrap())
    };
    assert_eq!(find("p", "[1.0.0,2.0.0]"), Some(d.key("two.jar")));
    assert_eq!(find("p", "[1.0.0,2.0.0)"), None);
    assert_eq!(find("q", "(1.0.0,2.0.0]"), None);
    assert_eq!(find("q", "[1.0.0,2.0.0]"), Some(d.key("one.jar")));
}

#[test]
fn range_imports_never_match_range_exports() {
    let d = Deployment::new();
    d.deploy(
        "odd.jar",
        &JarBuilder::new().export("p;version=\"[1.0.0,2.0.0)\""),
    );
    let wanted = VersionConstraint::parse("[1.0.0,2.0.0)").unwrap();
    assert_eq!(d.registry().find_provider("p", &wanted), None);
}

// =============================================================================
// Catalog and idempotence
// =============================================================================

#[test]
fn catalog_tracks_every_mutation() {
    let d = Deployment::new();
    d.deploy("A.jar", &provider_a());
    d.deploy("B.jar", &consumer_b());

    let catalog = d.catalog();
    let paths: Vec<&str> = catalog.bundles.iter().map(|b| b.path.as_str()).collect();
    assert_eq!(paths, vec![d.key("A.jar").as_str(), d.key("B.jar").as_str()]);
    assert_eq!(catalog.bundles[1].imports[0].version, "[1.0.0,2.0.0)");

    d.undeploy("A.jar");
    assert_eq!(d.catalog().bundles.len(), 1);
}

#[test]
fn repeated_event_leaves_state_unchanged() {
    let d = Deployment::new();
    let path = d.bundles.write_jar("A.jar", &provider_a());
    d.processor.handle_change(&path);
    let before = (d.registry().snapshot(), d.catalog());

    d.processor.handle_change(&path);
    assert_eq!(before, (d.registry().snapshot(), d.catalog()));
}

#[test]
fn redeploy_restores_identical_descriptor() {
    let d = Deployment::new();
    d.deploy("A.jar", &provider_a());
    let first = d.registry().get(&d.key("A.jar")).unwrap();

    d.undeploy("A.jar");
    d.deploy("A.jar", &provider_a());
    let second = d.registry().get(&d.key("A.jar")).unwrap();

    assert_eq!(*first, *second);
    let built = BundleDescriptor::build(&d.bundles.file("A.jar"), &ArchiveInspector::new());
    assert_eq!(*second, built.unwrap());
}

#[test]
fn invalid_redeploy_deregisters() {
    let d = Deployment::new();
    d.deploy("A.jar", &provider_a());

    let broken = JarBuilder::new().without_manifest().entry("util/io.txt", b"x");
    assert_eq!(d.deploy("A.jar", &broken), EventOutcome::Deregistered);
    assert!(d.catalog().bundles.is_empty());
}

#[test]
fn folded_manifest_headers_are_read_whole() {
    let d = Deployment::new();
    let mut jar = JarBuilder::new();
    for i in 0..40 {
        jar = jar.export(&format!("org.example.generated.package{i};version=\"{i}.0.0\""));
    }
    d.deploy("wide.jar", &jar);

    let wanted = VersionConstraint::parse("[39.0.0,40.0.0)").unwrap();
    assert_eq!(
        d.registry().find_provider("org.example.generated.package39", &wanted),
        Some(d.key("wide.jar"))
    );
}

#[test]
fn stray_files_are_not_registered() {
    let d = Deployment::new();
    let notes = d.bundles.write_bytes("notes.jar", b"text");
    assert_eq!(d.processor.handle_change(&notes), EventOutcome::Ignored);

    // Made into a container without a fresh event: still not registered
    provider_a().write_to(&notes);
    assert!(d.registry().is_empty());
    assert!(!d.state.path().join("catalog.toml").exists());
}

// =============================================================================
// Live service
// =============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn live_service_follows_directory() {
    let d = Deployment::new();
    d.bundles.write_jar("A.jar", &provider_a());

    let handle = DirectoryWatcher::new(
        d.bundles.path(),
        Arc::clone(&d.processor),
        Duration::from_millis(100),
    )
    .spawn()
    .unwrap();
    assert!(eventually(|| d.registry().len() == 1).await);

    d.bundles.write_jar("B.jar", &consumer_b());
    let wanted = VersionConstraint::parse("[1.0.0,2.0.0)").unwrap();
    assert!(eventually(|| d.registry().get(&d.key("B.jar")).is_some()).await);
    assert_eq!(d.registry().find_provider("util.io", &wanted), Some(d.key("A.jar")));

    d.bundles.remove("A.jar");
    assert!(eventually(|| d.registry().find_provider("util.io", &wanted).is_none()).await);
    assert!(eventually(|| d.catalog().bundles.len() == 1).await);

    handle.stop().await;
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn locked_archive_joins_after_writer_finishes() {
    let d = Deployment::new();
    let path = d.bundles.write_jar("slow.jar", &provider_a());
    let writer = File::open(&path).unwrap();
    writer.lock_exclusive().unwrap();

    let handle = DirectoryWatcher::new(
        d.bundles.path(),
        Arc::clone(&d.processor),
        Duration::from_millis(50),
    )
    .spawn()
    .unwrap();

    tokio::time::sleep(Duration::from_millis(200)).await;
    assert!(d.registry().is_empty());

    writer.unlock().unwrap();
    assert!(eventually(|| d.registry().len() == 1).await);
    assert!(fs::metadata(d.state.path().join("catalog.toml")).is_ok());

    handle.stop().await;
}

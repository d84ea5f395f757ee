//! Readers querying the registry while the single writer mutates it.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use bundle_manifest::{BundleDescriptor, VersionConstraint};
use bundle_registry::Registry;

fn version_one() -> BundleDescriptor {
    BundleDescriptor::from_manifest(
        "/bundles/a.jar",
        "Export-Package: p;version=\"1.0.0\",q;version=\"1.0.0\"\n",
    )
}

fn version_two() -> BundleDescriptor {
    BundleDescriptor::from_manifest(
        "/bundles/a.jar",
        "Export-Package: p;version=\"2.0.0\",q;version=\"2.0.0\"\n",
    )
}

#[test]
fn readers_never_observe_partial_descriptors() {
    let registry = Arc::new(Registry::new());
    let stop = Arc::new(AtomicBool::new(false));
    let one = version_one();
    let two = version_two();

    let readers: Vec<_> = (0..4)
        .map(|_| {
            let registry = Arc::clone(&registry);
            let stop = Arc::clone(&stop);
            let (one, two) = (one.clone(), two.clone());
            thread::spawn(move || {
                let mut observations = 0usize;
                while !stop.load(Ordering::Relaxed) {
                    if let Some(seen) = registry.get(&"/bundles/a.jar".into()) {
                        assert!(*seen == one || *seen == two, "torn descriptor: {seen:?}");
                        observations += 1;
                    }
                }
                observations
            })
        })
        .collect();

    for round in 0..=2_000 {
        match round % 3 {
            0 => registry.upsert(version_one()),
            1 => registry.upsert(version_two()),
            _ => registry.remove(&"/bundles/a.jar".into()),
        };
    }
    stop.store(true, Ordering::Relaxed);

    for reader in readers {
        reader.join().unwrap();
    }
    assert!(registry.is_empty());
}

#[test]
fn queries_see_writes_completed_before_they_start() {
    let registry = Arc::new(Registry::new());
    let any = VersionConstraint::unversioned();

    for i in 0..100 {
        let path = format!("/bundles/b{i}.jar");
        registry.upsert(BundleDescriptor::from_manifest(
            path.as_str(),
            &format!("Export-Package: pkg{i};version=\"1.0.{i}\"\n"),
        ));
        let found = thread::scope(|s| {
            s.spawn(|| registry.find_provider(&format!("pkg{i}"), &any))
                .join()
                .unwrap()
        });
        assert_eq!(found.map(|p| p.to_string()), Some(path));
    }
}

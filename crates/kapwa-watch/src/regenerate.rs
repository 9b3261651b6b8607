//! Regenerate exports whenever the component tree changes.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;

use kapwa_exports::Generator;
use tokio::sync::mpsc::Receiver;

use crate::watcher::{TreeWatcher, WatchError, WatchEvent};

/// Run the generator once, then again after every burst of changes,
/// until `shutdown` resolves. Generation failures are logged and the
/// loop keeps going.
pub async fn watch_until<F>(
    generator: &Generator,
    debounce: Duration,
    shutdown: F,
) -> Result<usize, WatchError>
where
    F: Future<Output = ()>,
{
    let target = watch_target(generator);
    let (watcher, mut rx) = TreeWatcher::new(&[target.clone()])?;
    tracing::info!("Watching {} for changes", target.display());

    let mut runs = 0;
    regenerate(generator);
    runs += 1;

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            event = rx.recv() => {
                let Some(event) = event else { break };
                if is_generated_output(generator, event.path()) {
                    continue;
                }
                tracing::debug!("Change detected: {}", event.path().display());
                let drained = drain(&mut rx, debounce).await;
                tracing::debug!("Coalesced {} further changes", drained);
                regenerate(generator);
                runs += 1;
            }
            _ = &mut shutdown => break,
        }
    }

    drop(watcher);
    Ok(runs)
}

/// Watch until Ctrl-C.
pub async fn watch(generator: &Generator, debounce: Duration) -> Result<usize, WatchError> {
    watch_until(generator, debounce, async {
        stop_on(tokio::signal::ctrl_c()).await;
    })
    .await
}

/// Wait for `signal`. Returns `false` when the listener could not be
/// installed; the watcher stops in either case.
async fn stop_on<S>(signal: S) -> bool
where
    S: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => {
            tracing::info!("Stopping watcher");
            true
        }
        Err(e) => {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            false
        }
    }
}

/// The component root, or its closest existing ancestor while the root
/// does not exist yet.
fn watch_target(generator: &Generator) -> PathBuf {
    let paths = generator.paths();
    paths
        .components
        .ancestors()
        .take_while(|p| p.starts_with(&paths.root))
        .find(|p| p.exists())
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| paths.root.clone())
}

/// Our own writes must not trigger another run. Watcher paths are
/// absolute while the configured root may be relative, so compare suffixes.
fn is_generated_output(generator: &Generator, path: &Path) -> bool {
    let paths = generator.paths();
    path.ends_with(&paths.index_rel) || path.ends_with(&paths.manifest_rel)
}

/// Wait out the debounce window and discard the events it collected.
async fn drain(rx: &mut Receiver<WatchEvent>, debounce: Duration) -> usize {
    tokio::time::sleep(debounce).await;
    let mut drained = 0;
    while rx.try_recv().is_ok() {
        drained += 1;
    }
    drained
}

fn regenerate(generator: &Generator) {
    match generator.run() {
        Ok(result) => tracing::info!(
            "Regenerated {} exports for {} components in {}ms",
            result.summary.exports,
            result.summary.components,
            result.duration_ms
        ),
        Err(e) => tracing::error!("Generation failed: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;
    use tokio::sync::oneshot;

    #[tokio::test]
    async fn regenerates_after_new_component() {
        let temp = tempdir().unwrap();
        let root = temp.path().to_path_buf();
        fs::write(root.join("package.json"), "{}\n").unwrap();
        fs::create_dir_all(root.join("src/kapwa/button")).unwrap();
        fs::write(root.join("src/kapwa/button/index.tsx"), "").unwrap();

        let generator = Generator::from_root(&root).unwrap();
        let (stop_tx, stop_rx) = oneshot::channel::<()>();

        let handle = tokio::spawn(async move {
            watch_until(&generator, Duration::from_millis(50), async {
                let _ = stop_rx.await;
            })
            .await
        });

        tokio::time::sleep(Duration::from_millis(300)).await;
        let index = root.join("src/index.ts");
        assert!(fs::read_to_string(&index).unwrap().contains("./kapwa/button"));

        fs::create_dir_all(root.join("src/kapwa/chip")).unwrap();
        fs::write(root.join("src/kapwa/chip/index.ts"), "").unwrap();

        let mut found = false;
        for _ in 0..30 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if fs::read_to_string(&index).unwrap().contains("./kapwa/chip") {
                found = true;
                break;
            }
        }

        stop_tx.send(()).unwrap();
        let runs = handle.await.unwrap().unwrap();

        assert!(found, "index was not regenerated");
        assert!(runs >= 2);
    }

    #[test]
    fn watches_closest_existing_ancestor() {
        let temp = tempdir().unwrap();
        fs::create_dir_all(temp.path().join("src")).unwrap();

        let generator = Generator::from_root(temp.path()).unwrap();

        assert_eq!(watch_target(&generator), temp.path().join("src"));
    }

    #[tokio::test]
    async fn signal_failure_is_reported() {
        let failed = stop_on(async {
            Err(std::io::Error::other("no signal handler"))
        })
        .await;
        let received = stop_on(async { Ok(()) }).await;

        assert!(!failed);
        assert!(received);
    }

    #[test]
    fn ignores_generated_outputs_with_dotted_config() {
        let temp = tempdir().unwrap();
        let mut config = kapwa_exports::ExportsConfig::default();
        config.paths.index = "./src/index.ts".to_string();
        config.paths.manifest = "./package.json".to_string();
        let generator = Generator::new(temp.path(), config).unwrap();

        assert!(is_generated_output(&generator, &temp.path().join("src/index.ts")));
        assert!(is_generated_output(&generator, &temp.path().join("package.json")));
    }

    #[test]
    fn ignores_generated_outputs() {
        let temp = tempdir().unwrap();
        let generator = Generator::from_root(temp.path()).unwrap();

        assert!(is_generated_output(&generator, &temp.path().join("src/index.ts")));
        assert!(is_generated_output(&generator, &temp.path().join("package.json")));
        assert!(!is_generated_output(
            &generator,
            &temp.path().join("src/kapwa/chip/index.ts")
        ));
    }
}

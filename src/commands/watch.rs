//! Command: build once, then serve the project and rebuild on change.
use std::any::TypeId;
use std::collections::BTreeSet;
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context as _, Result};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};

use crate::cli::{GlobalOpts, WatchOpts};
use crate::logging::{Log as _, Logger, TaskStatus};
use crate::server::{self, ServerState, livereload::ReloadEvent};
use crate::tasks::{self, Context, Task, clean::CleanVendor, vendor::CopyVendor};
use crate::watcher::{self, Classifier, Trigger};

use super::{CommandSetup, scheduler};

/// Capacity of the changed-path channel between the watcher and the loop.
const PATH_CHANNEL_CAPACITY: usize = 256;

/// Capacity of the reload broadcast; slow browsers skip missed events.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Run the watch command.
///
/// # Errors
///
/// Returns an error if configuration loading fails, the initial clean or
/// vendor copy fails, or the server cannot bind its address.
pub fn run(global: &GlobalOpts, opts: &WatchOpts, log: &Arc<Logger>) -> Result<()> {
    log.info(&format!("assetpipe {}", super::version::version()));
    let setup = CommandSetup::init(global, log)?;
    let ctx = setup.context(global, log);

    let all_tasks = tasks::all_build_tasks();
    let initial: Vec<&dyn Task> = all_tasks.iter().map(AsRef::as_ref).collect();
    let failed = scheduler::run_tasks(&initial, &ctx, log)?;
    log.print_summary();
    if failed.contains(&TypeId::of::<CleanVendor>()) || failed.contains(&TypeId::of::<CopyVendor>())
    {
        anyhow::bail!("initial build failed; not starting the watcher");
    }
    if !failed.is_empty() {
        log.warn("initial build had failures; watching anyway");
    }

    let host = setup.config.settings.server.host.clone();
    let port = opts.port.unwrap_or(setup.config.settings.server.port);
    let classifier = Classifier::new(&setup.config)?;

    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting async runtime")?
        .block_on(async {
            let listener = TcpListener::bind((host.as_str(), port))
                .await
                .with_context(|| format!("binding {host}:{port}"))?;
            serve_and_watch(ctx, classifier, listener, log, tokio::signal::ctrl_c()).await
        })
}

/// Serve the project and rebuild on change until `shutdown` resolves.
async fn serve_and_watch<F>(
    ctx: Context,
    classifier: Classifier,
    listener: TcpListener,
    log: &Arc<Logger>,
    shutdown: F,
) -> Result<()>
where
    F: Future<Output = std::io::Result<()>>,
{
    let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
    let root = ctx.root().to_path_buf();

    let addr = listener.local_addr().context("reading bound address")?;
    let state = Arc::new(ServerState::new(root.clone(), events.clone()));
    let mut server = tokio::spawn(server::serve(listener, state));
    log.info(&format!("serving {} at http://{addr}/", root.display()));

    let (tx, mut rx) = mpsc::channel::<PathBuf>(PATH_CHANNEL_CAPACITY);
    let _watcher = watcher::spawn(&root, tx).context("starting file watcher")?;
    log.info("watching for changes (Ctrl-C to stop)");

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            res = &mut shutdown => {
                res.context("waiting for shutdown")?;
                log.info("stopping");
                server.abort();
                return Ok(());
            }
            res = &mut server => {
                return match res {
                    Ok(result) => result,
                    Err(e) => Err(e).context("server task"),
                };
            }
            Some(path) = rx.recv() => {
                let mut batch = vec![path];
                while let Ok(more) = rx.try_recv() {
                    batch.push(more);
                }
                let triggers = classifier.triggers(&batch);
                handle_triggers(&ctx, triggers, &events, log).await;
            }
        }
    }
}

/// Run each trigger's task and notify browsers when it succeeded.
async fn handle_triggers(
    ctx: &Context,
    triggers: BTreeSet<Trigger>,
    events: &broadcast::Sender<ReloadEvent>,
    log: &Arc<Logger>,
) {
    for trigger in triggers {
        if let Some(task) = trigger.task() {
            log.clear_tasks();
            let task_ctx = ctx.clone();
            let status =
                tokio::task::spawn_blocking(move || tasks::execute(task.as_ref(), &task_ctx)).await;
            match status {
                Ok(TaskStatus::Failed) => continue,
                Ok(_) => {}
                Err(e) => {
                    log.error(&format!("build task panicked: {e}"));
                    continue;
                }
            }
        } else {
            log.info("page changed");
        }
        // No receivers just means no browser is connected.
        let _ = events.send(trigger.event());
    }
}

use std::time::Duration;

use futures::channel::oneshot;

/// Timer-backed sleep. Used to pace successive ledger transfers so a single
/// signing bottleneck is not hammered within one mempool window.
pub async fn sleep(duration: Duration) {
    let (tx, rx) = oneshot::channel::<()>();
    ic_cdk_timers::set_timer(duration, move || {
        let _ = tx.send(());
    });
    let _ = rx.await;
}

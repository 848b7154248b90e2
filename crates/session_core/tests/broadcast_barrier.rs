use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use anyhow::Result;
use async_trait::async_trait;
use session_core::{
    CommandResolver, Connection, ConnectionPool, DispatchEngine, DispatchOutcome, ExecutionOutput,
    RemoteExecutor, Session,
};
use shared::{domain::ConnectionId, protocol::ControlEvent};

struct SlowHost {
    name: String,
    delay: Duration,
    finished: AtomicBool,
}

#[async_trait]
impl RemoteExecutor for SlowHost {
    async fn execute(&self, command: &str) -> ExecutionOutput {
        tokio::time::sleep(self.delay).await;
        self.finished.store(true, Ordering::SeqCst);
        ExecutionOutput::completed(format!("{} ran {command}\n", self.name))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

#[tokio::test]
async fn broadcast_waits_for_every_host_and_runs_them_together() {
    let hosts: Vec<Arc<SlowHost>> = (0..4)
        .map(|index| {
            Arc::new(SlowHost {
                name: format!("host{index}"),
                delay: Duration::from_millis(100 + 50 * index as u64),
                finished: AtomicBool::new(false),
            })
        })
        .collect();
    let pool = ConnectionPool::new(
        hosts
            .iter()
            .map(|host| {
                Connection::new(
                    format!("ops@{} ~ % ", host.name),
                    host.clone() as Arc<dyn RemoteExecutor>,
                )
            })
            .collect(),
    );
    let mut engine = DispatchEngine::new(
        Session::new(pool).expect("session"),
        CommandResolver::new(),
    );

    let started = Instant::now();
    let outcome = engine
        .handle(ControlEvent::Submit("sleep-test".into()))
        .await
        .expect("submit");
    let elapsed = started.elapsed();

    assert!(matches!(outcome, DispatchOutcome::Recorded { ref targets } if targets.len() == 4));
    assert!(hosts.iter().all(|host| host.finished.load(Ordering::SeqCst)));
    assert!(
        elapsed < Duration::from_millis(550),
        "hosts should run concurrently, took {elapsed:?}"
    );
    for index in 0..4 {
        let entries = engine
            .session()
            .transcripts()
            .get(ConnectionId(index))
            .expect("transcript");
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].output, format!("host{index} ran sleep-test\n"));
    }
}

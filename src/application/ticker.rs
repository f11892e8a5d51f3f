// Ticker - Periodic task that owns the simulation and publishes snapshots
use crate::application::signal_generator::ForcedEvent;
use crate::application::simulation_service::SimulationService;
use crate::domain::dashboard::Dashboard;
use crate::infrastructure::event_stream::SnapshotReceiver;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

const COMMAND_BUFFER: usize = 16;
const FALLBACK_PERIOD: Duration = Duration::from_millis(1800);

#[derive(Debug, Error)]
#[error("simulation ticker has stopped")]
pub struct TickerClosed;

pub enum Command {
    Force {
        event: ForcedEvent,
        reply: oneshot::Sender<Option<Arc<Dashboard>>>,
    },
}

/// Cloneable handle used by request handlers to read and poke the simulation.
#[derive(Clone)]
pub struct TickerClient {
    commands: mpsc::Sender<Command>,
    snapshots: SnapshotReceiver,
}

impl TickerClient {
    pub fn latest(&self) -> Option<Arc<Dashboard>> {
        self.snapshots.borrow().clone()
    }

    pub fn subscribe(&self) -> SnapshotReceiver {
        self.snapshots.clone()
    }

    /// Apply a demo event and return the snapshot that includes it.
    pub async fn force(&self, event: ForcedEvent) -> Result<Option<Arc<Dashboard>>, TickerClosed> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Force { event, reply })
            .await
            .map_err(|_| TickerClosed)?;
        response.await.map_err(|_| TickerClosed)
    }
}

/// Owner of the running simulation task. Dropping it aborts the task.
pub struct Ticker {
    client: TickerClient,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn spawn(service: SimulationService) -> Self {
        let (commands_tx, commands_rx) = mpsc::channel(COMMAND_BUFFER);
        let (publisher, snapshots) = watch::channel(service.snapshot(Utc::now()).map(Arc::new));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let task = tokio::spawn(run(service, publisher, commands_rx, shutdown_rx));

        Self {
            client: TickerClient {
                commands: commands_tx,
                snapshots,
            },
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }

    pub fn client(&self) -> TickerClient {
        self.client.clone()
    }

    /// Signal the task to finish and wait for it.
    pub async fn stop(mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                tracing::error!("Ticker task ended abnormally: {}", e);
            }
        }
        tracing::info!("Simulation ticker stopped");
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

async fn run(
    mut service: SimulationService,
    publisher: watch::Sender<Option<Arc<Dashboard>>>,
    mut commands: mpsc::Receiver<Command>,
    mut shutdown: oneshot::Receiver<()>,
) {
    let period = service
        .interval()
        .to_std()
        .ok()
        .filter(|p| !p.is_zero())
        .unwrap_or(FALLBACK_PERIOD);
    let mut interval = tokio::time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut was_safe = service.evaluation().map(|e| e.overall_safe);
    tracing::info!("Simulation ticker started with period {:?}", period);

    loop {
        let mut reply = None;
        tokio::select! {
            _ = &mut shutdown => break,
            _ = interval.tick() => {
                match service.tick(Utc::now()).await {
                    Ok(sample) => tracing::debug!(
                        "Tick: pH {} turbidity {} temperature {} level {}",
                        sample.ph, sample.turbidity, sample.temperature, sample.water_level_percent
                    ),
                    Err(e) => {
                        tracing::warn!("Skipping tick: {}", e);
                        continue;
                    }
                }
            }
            Some(command) = commands.recv() => match command {
                Command::Force { event, reply: sender } => {
                    service.force_event(event, Utc::now());
                    reply = Some(sender);
                }
            },
        }

        let evaluation = service.evaluation();
        let safe = evaluation.as_ref().map(|e| e.overall_safe);
        if safe != was_safe {
            match &evaluation {
                Some(e) if !e.overall_safe => {
                    tracing::warn!("Water quality needs attention: {}", e.alerts.join("; "))
                }
                Some(_) => tracing::info!("Water quality back within safe limits"),
                None => {}
            }
            was_safe = safe;
        }

        // One publication per tick or event; the caller gets the same snapshot
        let snapshot = service.snapshot(Utc::now()).map(Arc::new);
        publisher.send_replace(snapshot.clone());
        if let Some(reply) = reply {
            let _ = reply.send(snapshot);
        }
    }
}

//! Tokio task that owns a [`CarouselController`] and drives its timers.
//!
//! Everything that touches the controller goes through one task: navigation
//! commands, probe results and both deadlines are multiplexed in a single
//! `select!`, so there is exactly one event queue and no locking. Observers
//! read [`CarouselSnapshot`]s from a `watch` channel.

use std::sync::Arc;
use std::time::Duration;

use rand::Rng;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, trace};

use crate::controller::{
    ActivationTicket, CarouselController, CarouselSnapshot, DurationReport, StepDirection,
};
use crate::error::{CoreError, Result};
use crate::probe::MediaProbe;

const COMMAND_BUFFER: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CarouselCommand {
    Step(StepDirection),
    ResetTimer,
    ReportMediaDuration {
        ticket: ActivationTicket,
        length: Duration,
    },
}

/// Owner side of a running carousel. Dropping it stops the task.
#[derive(Debug)]
pub struct CarouselHandle {
    commands: mpsc::Sender<CarouselCommand>,
    snapshots: watch::Receiver<CarouselSnapshot>,
    shutdown: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl CarouselHandle {
    /// Spawn the carousel task on the current tokio runtime.
    pub fn spawn<R>(
        controller: CarouselController<R>,
        probe: Option<Arc<dyn MediaProbe>>,
    ) -> Self
    where
        R: Rng + Send + 'static,
    {
        let (commands, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (snapshot_tx, snapshots) = watch::channel(controller.snapshot());
        let shutdown = CancellationToken::new();

        let task = tokio::spawn(run(
            controller,
            command_rx,
            snapshot_tx,
            shutdown.clone(),
            probe,
        ));

        Self {
            commands,
            snapshots,
            shutdown,
            task: Some(task),
        }
    }

    pub async fn forward(&self) -> Result<()> {
        self.send(CarouselCommand::Step(StepDirection::Forward)).await
    }

    pub async fn backward(&self) -> Result<()> {
        self.send(CarouselCommand::Step(StepDirection::Backward)).await
    }

    pub async fn reset_timer(&self) -> Result<()> {
        self.send(CarouselCommand::ResetTimer).await
    }

    pub async fn report_media_duration(
        &self,
        ticket: ActivationTicket,
        length: Duration,
    ) -> Result<()> {
        self.send(CarouselCommand::ReportMediaDuration { ticket, length })
            .await
    }

    pub async fn send(&self, command: CarouselCommand) -> Result<()> {
        self.commands
            .send(command)
            .await
            .map_err(|_| CoreError::RuntimeClosed)
    }

    /// Latest published state.
    pub fn snapshot(&self) -> CarouselSnapshot {
        *self.snapshots.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<CarouselSnapshot> {
        self.snapshots.clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop the task and wait for it to exit. Pending timers die with it.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.shutdown.cancel();
        let Some(task) = self.task.take() else {
            return Ok(());
        };
        task.await
            .map_err(|err| CoreError::TaskFailed(err.to_string()))
    }
}

impl Drop for CarouselHandle {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// In-flight probe for the current activation; aborted when replaced or
/// dropped so a result can never outlive the loop.
#[derive(Debug, Default)]
struct ProbeSlot(Option<JoinHandle<()>>);

impl ProbeSlot {
    fn replace(&mut self, task: Option<JoinHandle<()>>) {
        if let Some(previous) = std::mem::replace(&mut self.0, task) {
            previous.abort();
        }
    }
}

impl Drop for ProbeSlot {
    fn drop(&mut self) {
        self.replace(None);
    }
}

fn launch_probe<R>(
    controller: &CarouselController<R>,
    probe: Option<&Arc<dyn MediaProbe>>,
    results: &mpsc::UnboundedSender<(ActivationTicket, Duration)>,
) -> Option<JoinHandle<()>> {
    let probe = Arc::clone(probe?);
    let ticket = controller.ticket();
    let catalog = Arc::clone(controller.catalog());
    if !catalog.get(ticket.index)?.has_video() {
        return None;
    }

    let results = results.clone();
    Some(tokio::spawn(async move {
        let Some(item) = catalog.get(ticket.index) else {
            return;
        };
        if let Some(length) = probe.media_length(item).await {
            trace!(index = ticket.index, epoch = ticket.epoch, "media length probed");
            let _ = results.send((ticket, length));
        }
    }))
}

async fn run<R: Rng>(
    mut controller: CarouselController<R>,
    mut commands: mpsc::Receiver<CarouselCommand>,
    snapshots: watch::Sender<CarouselSnapshot>,
    shutdown: CancellationToken,
    probe: Option<Arc<dyn MediaProbe>>,
) {
    let (probe_tx, mut probe_rx) = mpsc::unbounded_channel();
    let mut probing = ProbeSlot::default();
    let mut probed = controller.ticket();
    probing.replace(launch_probe(&controller, probe.as_ref(), &probe_tx));

    info!(
        items = controller.catalog().len(),
        active_index = controller.active_index(),
        "carousel runtime started"
    );

    loop {
        let deadline = controller.deadline();
        let transition = controller.transition_deadline();

        tokio::select! {
            biased;

            _ = shutdown.cancelled() => break,

            command = commands.recv() => {
                let Some(command) = command else {
                    debug!("carousel handle dropped");
                    break;
                };
                apply(&mut controller, command);
            }

            Some((ticket, length)) = probe_rx.recv() => {
                report(&mut controller, ticket, length);
            }

            _ = sleep_until(transition.unwrap_or(deadline)), if transition.is_some() => {
                controller.finish_transition(Instant::now());
            }

            _ = sleep_until(deadline) => {
                controller.on_deadline(Instant::now());
            }
        }

        let ticket = controller.ticket();
        if ticket != probed {
            probed = ticket;
            probing.replace(launch_probe(&controller, probe.as_ref(), &probe_tx));
        }

        let snapshot = controller.snapshot();
        snapshots.send_if_modified(|current| {
            if *current == snapshot {
                false
            } else {
                *current = snapshot;
                true
            }
        });
    }

    info!(
        rounds_built = controller.rounds_built(),
        "carousel runtime stopped"
    );
}

fn apply<R: Rng>(controller: &mut CarouselController<R>, command: CarouselCommand) {
    let now = Instant::now();
    match command {
        CarouselCommand::Step(direction) => {
            controller.step(direction, now);
        }
        CarouselCommand::ResetTimer => controller.reset_timer(now),
        CarouselCommand::ReportMediaDuration { ticket, length } => {
            report(controller, ticket, length);
        }
    }
}

fn report<R: Rng>(
    controller: &mut CarouselController<R>,
    ticket: ActivationTicket,
    length: Duration,
) {
    let outcome = controller.report_media_duration(ticket, length);
    if let DurationReport::Extended { deadline } = outcome {
        trace!(index = ticket.index, ?deadline, "auto-advance rescheduled");
    }
}

// ============================================================
// Layer 5 — Online Learner
// ============================================================
// Streaming counterpart of LinearTrainer: one SGD step per
// example, taken as examples arrive on a bounded queue.
//
//   producer thread ──[examples, cap 1000]──▶ learner thread
//   main thread     ◀──[errors,   cap 200]─── learner thread
//
// The learner stops when the example queue closes. Dropping its
// error sender then closes the error queue, which ends the main
// thread's drain loop. A bad example (wrong length, label out of
// range, diverged loss) is reported on the error queue and
// skipped; learning continues.

use anyhow::{anyhow, Result};
use burn::module::AutodiffModule;
use std::sync::mpsc::{sync_channel, Receiver, SyncSender};
use std::thread;

use crate::data::batcher::ExampleBatcher;
use crate::domain::dataset::Example;
use crate::domain::traits::StreamingTrainer;
use crate::ml::inferencer::Inferencer;
use crate::ml::model::{LinearModel, LinearModelConfig, Objective};
use crate::ml::trainer::{descend, SolverConfig, TrainBackend};

pub const EXAMPLE_QUEUE_CAPACITY: usize = 1000;
pub const ERROR_QUEUE_CAPACITY: usize = 200;

/// Streaming training driver. The feature dimension must be known
/// before the first example arrives.
#[derive(Debug, Clone)]
pub struct OnlineLearner {
    objective: Objective,
    config:    SolverConfig,
    dimension: usize,
}

impl OnlineLearner {
    /// Only `learning_rate` and `regularization` of `config` apply;
    /// epochs are the producer's business.
    pub fn new(objective: Objective, config: SolverConfig, dimension: usize) -> Self {
        Self { objective, config, dimension }
    }
}

impl StreamingTrainer for OnlineLearner {
    type Model = Inferencer;

    fn learn(
        &self,
        stream: Receiver<Example>,
        errors: SyncSender<anyhow::Error>,
    ) -> Result<Inferencer> {
        let device  = Default::default();
        let outputs = self.objective.outputs();

        let mut model: LinearModel<TrainBackend> =
            LinearModelConfig::new(self.dimension, outputs).init(&device);
        let mut optim = self
            .config
            .optimizer_config()
            .init::<TrainBackend, LinearModel<TrainBackend>>();
        let batcher = ExampleBatcher::<TrainBackend>::new(device, self.dimension, outputs);

        let mut seen = 0usize;
        for example in stream {
            seen += 1;
            let batch = match batcher.single(&example) {
                Ok(batch) => batch,
                Err(e) => {
                    // a full error queue applies backpressure; a closed one is ignored
                    let _ = errors.send(e.context(format!("example {seen}")));
                    continue;
                }
            };

            let (next, loss) =
                descend(model, &mut optim, self.config.learning_rate, batch, self.objective);
            model = next;
            if !loss.is_finite() {
                let _ = errors.send(anyhow!("example {seen}: loss is {loss}, update skipped"));
            }
        }

        tracing::debug!("Online learner consumed {} examples", seen);
        Ok(Inferencer::new(model.valid(), self.objective, self.dimension))
    }
}

/// Counts reported after a streaming run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StreamSummary {
    pub pushed:   usize,
    pub failures: usize,
}

/// Run `trainer` against examples pushed by `produce`.
///
/// `produce` runs on its own thread and returns how many examples it
/// pushed; it should stop when `send` fails. Training errors are
/// logged here as they arrive.
pub fn stream_train<T, F>(trainer: &T, produce: F) -> Result<(T::Model, StreamSummary)>
where
    T: StreamingTrainer + Sync,
    T::Model: Send,
    F: FnOnce(&SyncSender<Example>) -> usize + Send,
{
    let (example_tx, example_rx) = sync_channel::<Example>(EXAMPLE_QUEUE_CAPACITY);
    let (error_tx, error_rx)     = sync_channel::<anyhow::Error>(ERROR_QUEUE_CAPACITY);

    thread::scope(|scope| {
        let producer = scope.spawn(move || produce(&example_tx));
        let learner  = scope.spawn(move || trainer.learn(example_rx, error_tx));

        let mut failures = 0usize;
        for err in error_rx {
            failures += 1;
            tracing::warn!("Training error: {:#}", err);
        }

        let model = learner
            .join()
            .map_err(|_| anyhow!("online learner thread panicked"))??;
        let pushed = producer
            .join()
            .map_err(|_| anyhow!("example producer thread panicked"))?;

        Ok((model, StreamSummary { pushed, failures }))
    })
}

/// Push every example from `examples`, stopping early if the
/// consumer hangs up.
pub fn push_all<I>(queue: &SyncSender<Example>, examples: I) -> usize
where
    I: IntoIterator<Item = Example>,
{
    let mut pushed = 0;
    for example in examples {
        if queue.send(example).is_err() {
            break;
        }
        pushed += 1;
    }
    pushed
}

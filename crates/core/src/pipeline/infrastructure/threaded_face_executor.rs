use crate::detection::domain::face_detection::FaceDetection;
use crate::pipeline::face_executor::{FaceExecutor, FaceJob, SequentialFaceExecutor};
use crate::pipeline::result_aggregator::DetectionResult;
use crate::shared::error::PipelineError;

const DEFAULT_CHANNEL_CAPACITY: usize = 8;

type Outcome = Result<DetectionResult, PipelineError>;

/// Refines faces on a pool of scoped worker threads.
///
/// Layout: `main [feed] → workers [pupils + landmarks] → main [reorder]`
///
/// Faces are independent once detected, so refinement fans out freely;
/// outcomes are put back in input order at fan-in.
pub struct ThreadedFaceExecutor {
    workers: usize,
    channel_capacity: usize,
}

impl ThreadedFaceExecutor {
    pub fn new(workers: usize) -> Result<Self, &'static str> {
        if workers < 1 {
            return Err("workers must be >= 1");
        }
        Ok(Self {
            workers,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        })
    }

    /// One worker per available CPU.
    pub fn with_available_parallelism() -> Self {
        let workers = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self {
            workers,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }
}

impl FaceExecutor for ThreadedFaceExecutor {
    fn execute(&self, faces: &[FaceDetection], job: &FaceJob<'_>) -> Vec<Outcome> {
        let workers = self.workers.min(faces.len());
        if workers <= 1 {
            return SequentialFaceExecutor.execute(faces, job);
        }

        let (task_tx, task_rx) =
            crossbeam_channel::bounded::<(usize, &FaceDetection)>(self.channel_capacity);
        let (result_tx, result_rx) = crossbeam_channel::unbounded::<(usize, Outcome)>();

        let mut slots: Vec<Option<Outcome>> = (0..faces.len()).map(|_| None).collect();

        std::thread::scope(|scope| {
            for _ in 0..workers {
                let task_rx = task_rx.clone();
                let result_tx = result_tx.clone();
                scope.spawn(move || {
                    for (idx, face) in task_rx {
                        if result_tx.send((idx, job(face))).is_err() {
                            break;
                        }
                    }
                });
            }
            drop(result_tx);

            for task in faces.iter().enumerate() {
                if task_tx.send(task).is_err() {
                    break;
                }
            }
            drop(task_tx);

            for (idx, outcome) in result_rx {
                slots[idx] = Some(outcome);
            }
        });

        slots
            .into_iter()
            .enumerate()
            .map(|(idx, slot)| {
                slot.unwrap_or_else(|| {
                    Err(PipelineError::Worker(format!("no outcome for face {idx}")))
                })
            })
            .collect()
    }
}

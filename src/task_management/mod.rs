//! # Task Management System
//!
//! A small pool of worker threads for work that is embarrassingly parallel
//! across chunks, such as terrain generation.
//!
//! ## Architecture Overview
//! - `TaskManager`: owns the workers, distributes tasks and collects results
//! - `Task`: a unit of work executed on a worker
//! - `TaskResult`: the outcome of a task, applied back on the owning thread
//! - `TaskChannel`: the pair of channels connecting the owner to one worker
//!
//! Each worker has a dedicated task channel and result channel. Tasks are
//! handed out round-robin, at most `MAX_TASKS_IN_FLIGHT` per worker, and the
//! rest wait in a FIFO queue. Results are only ever applied on the thread that
//! owns the `TaskManager`, so the world index needs no locking.
//!
//! A manager created with zero workers runs every task inline when it is
//! drained, which keeps single-threaded configurations on the same code path.
//!
//! ## Example Usage
//! ```no_run
//! use std::sync::Arc;
//! use voxel_world::config::TerrainConfig;
//! use voxel_world::task_management::TaskManager;
//! use voxel_world::voxels::{
//!     chunk::ChunkCoord, tasks::chunk_generation_task::ChunkGenerationTask,
//!     terrain::TerrainGenerator, world::index::WorldIndex,
//! };
//!
//! let generator = Arc::new(TerrainGenerator::new(7, TerrainConfig::default()));
//! let mut index = WorldIndex::new();
//! let mut task_manager = TaskManager::new(4);
//!
//! task_manager.publish_task(Box::new(ChunkGenerationTask::new(
//!     generator.clone(),
//!     ChunkCoord::new(0, 0),
//! )));
//! task_manager.wait_for_all(&mut index);
//! assert!(index.contains(ChunkCoord::new(0, 0)));
//! ```

pub mod task;

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

use log::{info, warn};

use crate::voxels::world::index::WorldIndex;
use task::{Task, TaskResult};

/// A communication channel between the owning thread and one worker thread.
///
/// # Fields
/// - `task_sender`: Sends tasks from the owner to the worker
/// - `result_receiver`: Receives task results from the worker
/// - `num_tasks_in_flight`: Number of tasks sent but not yet collected
/// - `worker`: Handle to the worker thread, joined on drop
#[derive(Debug)]
pub struct TaskChannel {
    task_sender: Sender<Box<dyn Task + Send>>,
    result_receiver: Receiver<Box<dyn TaskResult + Send>>,
    num_tasks_in_flight: usize,
    worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task + Send>>,
    current_channel: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl TaskManager {
    /// Creates a new `TaskManager` with up to `num_workers` worker threads.
    ///
    /// Workers that fail to spawn are skipped with a warning. With zero
    /// workers every task runs inline in `wait_for_all`.
    pub fn new(num_workers: usize) -> Self {
        let mut channels = Vec::with_capacity(num_workers);

        for worker_idx in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task + Send>>();
            let (result_tx, result_rx) = channel::<Box<dyn TaskResult + Send>>();

            let task_closure = move || {
                while let Ok(task) = task_rx.recv() {
                    let result = task.process();
                    if result_tx.send(result).is_err() {
                        break;
                    }
                }
            };

            let spawned = thread::Builder::new()
                .name(format!("chunk-worker-{worker_idx}"))
                .spawn(task_closure);

            match spawned {
                Ok(worker) => channels.push(TaskChannel {
                    task_sender: task_tx,
                    result_receiver: result_rx,
                    num_tasks_in_flight: 0,
                    worker,
                }),
                Err(err) => warn!("Failed to spawn worker {}: {}", worker_idx, err),
            }
        }

        if !channels.is_empty() {
            info!(
                "Started {} workers (available parallelism: {:?})",
                channels.len(),
                thread::available_parallelism()
            );
        }

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// Number of live worker threads.
    pub fn worker_count(&self) -> usize {
        self.channels.len()
    }

    /// Whether no task is queued or in flight.
    pub fn is_idle(&self) -> bool {
        self.queued_tasks.is_empty()
            && self
                .channels
                .iter()
                .all(|channel| channel.num_tasks_in_flight == 0)
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Returns
    /// - `Ok(())` if the task was handed to the worker
    /// - `Err(task)` if the worker has disconnected
    fn try_send_task(
        &mut self,
        task: Box<dyn Task + Send>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn Task + Send>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(()) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(err) => Err(err.0),
        }
    }

    /// Finds the next channel, round-robin, that can accept another task.
    fn find_available_channel(&self) -> Option<usize> {
        let count = self.channels.len();
        (0..count)
            .map(|offset| (self.current_channel + offset) % count)
            .find(|&idx| self.channels[idx].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT)
    }

    /// Drops a disconnected worker. Its in-flight tasks are lost.
    fn retire_channel(&mut self, channel_idx: usize) {
        let channel = self.channels.remove(channel_idx);
        warn!(
            "Worker disconnected with {} task(s) in flight",
            channel.num_tasks_in_flight
        );
        if self.channels.is_empty() {
            self.current_channel = 0;
        } else {
            self.current_channel %= self.channels.len();
        }
    }

    /// Publishes a new task for execution.
    ///
    /// # Returns
    /// - `true` if the task was immediately handed to a worker
    /// - `false` if it was queued
    pub fn publish_task(&mut self, task: Box<dyn Task + Send>) -> bool {
        let Some(channel_idx) = self.find_available_channel() else {
            self.queued_tasks.push_back(task);
            return false;
        };

        match self.try_send_task(task, channel_idx) {
            Ok(()) => {
                self.current_channel = (channel_idx + 1) % self.channels.len();
                true
            }
            Err(task) => {
                self.retire_channel(channel_idx);
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Moves queued tasks onto workers until the queue is empty or every
    /// worker is busy.
    pub fn process_queued_tasks(&mut self) {
        while let Some(channel_idx) = self.find_available_channel() {
            let Some(task) = self.queued_tasks.pop_front() else {
                break;
            };
            match self.try_send_task(task, channel_idx) {
                Ok(()) => self.current_channel = (channel_idx + 1) % self.channels.len(),
                Err(task) => {
                    self.retire_channel(channel_idx);
                    self.queued_tasks.push_front(task);
                }
            }
        }
    }

    /// Applies every result that is already available, without blocking.
    ///
    /// # Returns
    /// The number of results applied.
    pub fn process_completed_tasks(&mut self, index: &mut WorldIndex) -> usize {
        let mut handled = 0;
        let mut tasks_to_queue = Vec::new();

        for channel in &mut self.channels {
            while let Ok(result) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight = channel.num_tasks_in_flight.saturating_sub(1);
                tasks_to_queue.extend(result.handle_result(index));
                handled += 1;
            }
        }

        for task in tasks_to_queue {
            self.publish_task(task);
        }
        handled
    }

    /// Blocks until every queued and in-flight task has completed and its
    /// result has been applied.
    ///
    /// Tasks left over when no worker remains run inline on this thread.
    pub fn wait_for_all(&mut self, index: &mut WorldIndex) {
        loop {
            self.process_queued_tasks();

            if self.channels.is_empty() {
                while let Some(task) = self.queued_tasks.pop_front() {
                    let follow_ups = task.process().handle_result(index);
                    self.queued_tasks.extend(follow_ups);
                }
                return;
            }

            let mut channel_idx = 0;
            while channel_idx < self.channels.len() {
                if self.channels[channel_idx].num_tasks_in_flight == 0 {
                    channel_idx += 1;
                    continue;
                }

                match self.channels[channel_idx].result_receiver.recv() {
                    Ok(result) => {
                        self.channels[channel_idx].num_tasks_in_flight -= 1;
                        let follow_ups = result.handle_result(index);
                        self.queued_tasks.extend(follow_ups);
                        channel_idx += 1;
                    }
                    Err(_) => self.retire_channel(channel_idx),
                }
            }

            if self.is_idle() {
                return;
            }
        }
    }
}

impl Drop for TaskManager {
    fn drop(&mut self) {
        for channel in self.channels.drain(..) {
            let TaskChannel {
                task_sender,
                worker,
                ..
            } = channel;
            drop(task_sender);
            if worker.join().is_err() {
                warn!("Worker thread panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::chunk::{Chunk, ChunkCoord};

    struct InsertTask {
        position: ChunkCoord,
        follow_up: Option<ChunkCoord>,
    }

    struct InsertResult {
        chunk: Chunk,
        follow_up: Option<ChunkCoord>,
    }

    impl Task for InsertTask {
        fn process(&self) -> Box<dyn TaskResult + Send> {
            Box::new(InsertResult {
                chunk: Chunk::new(self.position),
                follow_up: self.follow_up,
            })
        }
    }

    impl TaskResult for InsertResult {
        fn handle_result(self: Box<Self>, index: &mut WorldIndex) -> Vec<Box<dyn Task + Send>> {
            index.insert(self.chunk);
            self.follow_up
                .map(|position| {
                    Box::new(InsertTask {
                        position,
                        follow_up: None,
                    }) as Box<dyn Task + Send>
                })
                .into_iter()
                .collect()
        }
    }

    fn run_with(workers: usize) -> WorldIndex {
        let mut index = WorldIndex::new();
        let mut manager = TaskManager::new(workers);
        for x in 0..10 {
            manager.publish_task(Box::new(InsertTask {
                position: ChunkCoord::new(x, 0),
                follow_up: Some(ChunkCoord::new(x, 1)),
            }));
        }
        manager.wait_for_all(&mut index);
        assert!(manager.is_idle());
        index
    }

    #[test]
    fn workers_drain_queue_and_follow_ups() {
        let index = run_with(3);
        assert_eq!(index.len(), 20);
        for x in 0..10 {
            assert!(index.contains(ChunkCoord::new(x, 0)));
            assert!(index.contains(ChunkCoord::new(x, 1)));
        }
    }

    #[test]
    fn zero_workers_run_inline() {
        let index = run_with(0);
        assert_eq!(index.len(), 20);
    }

    #[test]
    fn completed_tasks_drain_without_blocking() {
        let mut index = WorldIndex::new();
        let mut manager = TaskManager::new(2);
        for x in 0..4 {
            manager.publish_task(Box::new(InsertTask {
                position: ChunkCoord::new(x, 0),
                follow_up: Some(ChunkCoord::new(x, 1)),
            }));
        }

        let mut handled = 0;
        for _ in 0..2000 {
            if manager.is_idle() {
                break;
            }
            manager.process_queued_tasks();
            handled += manager.process_completed_tasks(&mut index);
            std::thread::sleep(std::time::Duration::from_millis(1));
        }

        assert!(manager.is_idle());
        assert_eq!(handled, 8);
        assert_eq!(index.len(), 8);
        assert_eq!(manager.process_completed_tasks(&mut index), 0);
    }

    #[test]
    fn publish_queues_when_workers_are_busy() {
        let mut manager = TaskManager::new(1);
        let first = manager.publish_task(Box::new(InsertTask {
            position: ChunkCoord::new(0, 0),
            follow_up: None,
        }));
        let second = manager.publish_task(Box::new(InsertTask {
            position: ChunkCoord::new(1, 0),
            follow_up: None,
        }));
        assert!(first);
        assert!(!second);
        assert!(!manager.is_idle());

        let mut index = WorldIndex::new();
        manager.wait_for_all(&mut index);
        assert_eq!(index.len(), 2);
    }
}

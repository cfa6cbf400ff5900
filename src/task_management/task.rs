//! # Task System Core Traits
//!
//! The building blocks of the worker pool.
//!
//! ## Task Lifecycle
//! 1. A `Task` is published via `TaskManager::publish_task()`
//! 2. The task's `process()` method runs on a worker thread
//! 3. The task returns a boxed `TaskResult`
//! 4. The result's `handle_result()` runs on the owning thread with mutable
//!    access to the world index
//! 5. The result may hand back follow-up tasks
//!
//! ## Thread Safety
//! Both traits require `Send`. Tasks own everything they need, typically an
//! `Arc` to shared read-only state plus the coordinates they work on.

use crate::voxels::world::index::WorldIndex;

/// A unit of work that can run on any thread.
pub trait Task: Send {
    /// Does the work and packages the outcome for the owning thread.
    fn process(&self) -> Box<dyn TaskResult + Send>;
}

/// The outcome of a `Task`, applied on the thread that owns the world.
pub trait TaskResult: Send {
    /// Applies the result to the world index.
    ///
    /// # Returns
    /// Follow-up tasks to schedule (usually empty).
    fn handle_result(self: Box<Self>, index: &mut WorldIndex) -> Vec<Box<dyn Task + Send>>;
}

// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Background work off the render path.
//!
//! The frame loop is single-threaded; nothing on the render path may block
//! on I/O or compilation. Blocking work is pushed to the [`WorkerPool`],
//! and its results come back to the main thread through a [`TaskQueue`]
//! drained once per frame via [`TaskQueue::execute_all`]. Rendering code
//! never touches the pool directly.

use std::thread::{self, JoinHandle};

type Task = Box<dyn FnOnce() + Send + 'static>;

/// A thread-safe queue of closures executed on the main thread.
#[derive(Debug)]
pub struct TaskQueue {
    sender: flume::Sender<Task>,
    receiver: flume::Receiver<Task>,
}

impl TaskQueue {
    /// Creates an empty queue with an unbounded channel.
    pub fn new() -> Self {
        let (sender, receiver) = flume::unbounded();
        Self { sender, receiver }
    }

    /// Returns a cloneable sender for posting tasks from other threads.
    pub fn sender(&self) -> TaskSender {
        TaskSender {
            sender: self.sender.clone(),
        }
    }

    /// Posts a task from the owning thread.
    pub fn post(&self, task: impl FnOnce() + Send + 'static) {
        if self.sender.send(Box::new(task)).is_err() {
            log::error!("TaskQueue receiver disconnected; task dropped.");
        }
    }

    /// Drains and runs every queued task in posting order, returning the
    /// number executed. Called once per frame on the main thread.
    pub fn execute_all(&self) -> usize {
        let mut executed = 0;
        while let Ok(task) = self.receiver.try_recv() {
            task();
            executed += 1;
        }
        executed
    }
}

impl Default for TaskQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// A cloneable handle for posting tasks to a [`TaskQueue`] from worker
/// threads.
#[derive(Debug, Clone)]
pub struct TaskSender {
    sender: flume::Sender<Task>,
}

impl TaskSender {
    /// Posts a task to the owning queue.
    pub fn post(&self, task: impl FnOnce() + Send + 'static) {
        if self.sender.send(Box::new(task)).is_err() {
            log::error!("TaskQueue receiver disconnected; task dropped.");
        }
    }
}

/// A fixed-size pool of worker threads for blocking background jobs
/// (shader or script recompilation, asset cooking).
///
/// Workers pull jobs from a shared channel. Dropping the pool closes the
/// channel and joins every worker after it finishes its current job.
#[derive(Debug)]
pub struct WorkerPool {
    sender: Option<flume::Sender<Task>>,
    workers: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `size` worker threads. `size` must be non-zero.
    pub fn new(size: usize) -> Self {
        assert!(size > 0, "WorkerPool requires at least one worker");
        let (sender, receiver) = flume::unbounded::<Task>();
        let workers = (0..size)
            .map(|index| {
                let receiver = receiver.clone();
                thread::Builder::new()
                    .name(format!("vesper-worker-{index}"))
                    .spawn(move || {
                        while let Ok(job) = receiver.recv() {
                            job();
                        }
                    })
                    .expect("failed to spawn worker thread")
            })
            .collect();
        Self {
            sender: Some(sender),
            workers,
        }
    }

    /// Submits a job to the pool.
    pub fn execute(&self, job: impl FnOnce() + Send + 'static) {
        if let Some(sender) = &self.sender {
            if sender.send(Box::new(job)).is_err() {
                log::error!("WorkerPool channel closed; job dropped.");
            }
        }
    }

    /// Returns the number of worker threads.
    pub fn size(&self) -> usize {
        self.workers.len()
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        // Closing the channel lets each worker's recv() fail and exit.
        self.sender.take();
        for worker in self.workers.drain(..) {
            if worker.join().is_err() {
                log::warn!("A worker thread panicked during shutdown.");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[test]
    fn execute_all_runs_tasks_in_posting_order() {
        let queue = TaskQueue::new();
        let order = Arc::new(Mutex::new(Vec::new()));
        for i in 0..5 {
            let order = Arc::clone(&order);
            queue.post(move || order.lock().unwrap().push(i));
        }
        assert_eq!(queue.execute_all(), 5);
        assert_eq!(*order.lock().unwrap(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn execute_all_on_empty_queue_is_zero() {
        let queue = TaskQueue::new();
        assert_eq!(queue.execute_all(), 0);
    }

    #[test]
    fn workers_post_results_back_to_the_queue() {
        let queue = TaskQueue::new();
        let pool = WorkerPool::new(2);
        let counter = Arc::new(AtomicUsize::new(0));

        for _ in 0..8 {
            let sender = queue.sender();
            let counter = Arc::clone(&counter);
            pool.execute(move || {
                // Simulate a compile job finishing off-thread.
                sender.post(move || {
                    counter.fetch_add(1, Ordering::SeqCst);
                });
            });
        }
        drop(pool); // joins workers; all completions are now queued

        assert_eq!(queue.execute_all(), 8);
        assert_eq!(counter.load(Ordering::SeqCst), 8);
    }
}

use keyed_priority_queue::KeyedPriorityQueue;
use rustc_hash::FxHashMap;
use slotmap::{SlotMap, new_key_type};
use std::collections::VecDeque;

// Index into the task table
pub type TaskId = usize;
pub type Ticks = u64;
new_key_type! {
    pub struct QueueId;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    // Not yet arrived
    Pending,
    Runnable,
    Running,
    Completed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Task {
    pub id: TaskId,
    pub arrival_time: Ticks,
    pub burst: Ticks,
    pub priority: u32,
    /// Fraction of the CPU kept busy while this task runs.
    pub cpu_demand: f64,
    pub remaining: Ticks,
    pub state: TaskState,
    pub start_time: Option<Ticks>,
    pub completion_time: Option<Ticks>,
}

impl Task {
    pub fn new(
        id: TaskId,
        arrival_time: Ticks,
        burst: Ticks,
        priority: u32,
        cpu_demand: f64,
    ) -> Self {
        Self {
            id,
            arrival_time,
            burst,
            priority,
            cpu_demand,
            remaining: burst,
            state: TaskState::Pending,
            start_time: None,
            completion_time: None,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.state == TaskState::Completed
    }

    pub fn turnaround(&self) -> Option<Ticks> {
        self.completion_time
            .and_then(|done| done.checked_sub(self.arrival_time))
    }

    /// Time spent ready but not running. Equals `start - arrival` when the
    /// task ran without preemption.
    pub fn wait(&self) -> Option<Ticks> {
        self.turnaround().and_then(|t| t.checked_sub(self.burst))
    }
}

/// Ordering key for keyed queues; the smallest (primary, arrival, id) wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DispatchKey {
    pub primary: u64,
    pub arrival: Ticks,
    pub id: TaskId,
}

impl DispatchKey {
    pub fn new(primary: u64, task: &Task) -> Self {
        Self {
            primary,
            arrival: task.arrival_time,
            id: task.id,
        }
    }
}

// KeyedPriorityQueue is a max-heap, so we need to flip-flop DispatchKey's Ord
impl PartialOrd for DispatchKey {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DispatchKey {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        (other.primary, other.arrival, other.id).cmp(&(self.primary, self.arrival, self.id))
    }
}

#[derive(Debug)]
pub enum TaskQueue {
    Fifo {
        tasks: VecDeque<TaskId>,
    },
    Priq {
        tasks: KeyedPriorityQueue<TaskId, DispatchKey>,
    },
}

impl TaskQueue {
    pub fn new_fifo() -> Self {
        Self::Fifo {
            tasks: VecDeque::new(),
        }
    }

    pub fn new_priq() -> Self {
        Self::Priq {
            tasks: KeyedPriorityQueue::new(),
        }
    }

    pub fn contains(&self, task_id: TaskId) -> bool {
        match self {
            Self::Fifo { tasks } => tasks.contains(&task_id),
            Self::Priq { tasks } => tasks.get_priority(&task_id).is_some(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Self::Fifo { tasks } => tasks.len(),
            Self::Priq { tasks } => tasks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn select_next(&mut self) -> Option<TaskId> {
        match self {
            Self::Fifo { tasks } => tasks.pop_front(),
            Self::Priq { tasks } => tasks.pop().map(|t| t.0),
        }
    }

    pub fn remove(&mut self, task_id: TaskId) -> bool {
        match self {
            Self::Fifo { tasks } => match tasks.iter().position(|&t| t == task_id) {
                Some(pos) => tasks.remove(pos).is_some(),
                None => false,
            },
            Self::Priq { tasks } => tasks.remove(&task_id).is_some(),
        }
    }
}

/// Everything one scheduling run owns: the clock, the single CPU, the task
/// table and the dispatch queues.
#[derive(Debug)]
pub struct SimCtx {
    pub now: Ticks,
    pub current: Option<TaskId>,
    pub tasks: Vec<Task>,
    pub queues: SlotMap<QueueId, TaskQueue>,
    pub task_to_queue: FxHashMap<TaskId, QueueId>,
    pub global_queue_id: QueueId,
}

impl SimCtx {
    pub fn new(tasks: Vec<Task>) -> Self {
        for (index, task) in tasks.iter().enumerate() {
            debug_assert_eq!(task.id, index, "TaskId must match Vec index");
        }

        let mut queues = SlotMap::with_key();
        let global_queue_id = queues.insert(TaskQueue::new_fifo());

        Self {
            now: 0,
            current: None,
            tasks,
            queues,
            task_to_queue: FxHashMap::default(),
            global_queue_id,
        }
    }

    pub fn advance_time(&mut self, delta: Ticks) {
        debug_assert!(self.now.checked_add(delta).is_some(), "Tick clock overflow");
        self.now = self.now.saturating_add(delta);
    }

    pub fn advance_to(&mut self, time: Ticks) {
        debug_assert!(time >= self.now, "Clock must not run backwards");
        self.now = self.now.max(time);
    }

    pub fn create_queue_fifo(&mut self) -> QueueId {
        self.queues.insert(TaskQueue::new_fifo())
    }

    pub fn create_queue_priq(&mut self) -> QueueId {
        self.queues.insert(TaskQueue::new_priq())
    }

    fn queue_push(&mut self, queue_id: QueueId, task_id: TaskId, key: Option<DispatchKey>) {
        assert!(
            !self.task_to_queue.contains_key(&task_id),
            "Task {task_id} already present in some queue"
        );

        let task = self.task(task_id);
        debug_assert!(
            task.state == TaskState::Runnable,
            "Task {task_id} must be Runnable when enqueued"
        );

        let queue = self.queues.get_mut(queue_id).expect("Unknown queue");
        match queue {
            TaskQueue::Fifo { tasks } => tasks.push_back(task_id),
            TaskQueue::Priq { tasks } => {
                tasks.push(
                    task_id,
                    key.expect("Attempted to push to a keyed queue with no key"),
                );
            }
        };

        self.task_to_queue.insert(task_id, queue_id);
    }

    pub fn queue_push_fifo(&mut self, queue_id: QueueId, task_id: TaskId) {
        self.queue_push(queue_id, task_id, None);
    }

    pub fn queue_push_priq(&mut self, queue_id: QueueId, task_id: TaskId, key: DispatchKey) {
        self.queue_push(queue_id, task_id, Some(key));
    }

    pub fn queue_pop(&mut self, queue_id: QueueId) -> Option<TaskId> {
        let task = self.queues.get_mut(queue_id)?.select_next()?;

        let removed = self.task_to_queue.remove(&task);
        debug_assert!(removed.is_some(), "Task {task} missing queue membership");

        Some(task)
    }

    pub fn queue_remove(&mut self, queue_id: QueueId, task_id: TaskId) -> bool {
        let removed = self
            .queues
            .get_mut(queue_id)
            .is_some_and(|queue| queue.remove(task_id));
        if removed {
            self.task_to_queue.remove(&task_id);
        }
        removed
    }

    pub fn queue_is_empty(&self, queue_id: QueueId) -> bool {
        self.queues.get(queue_id).is_none_or(TaskQueue::is_empty)
    }

    pub fn task_in_any_queue(&self, task_id: TaskId) -> bool {
        self.task_to_queue.contains_key(&task_id)
    }

    pub fn task(&self, task_id: TaskId) -> &Task {
        &self.tasks[task_id]
    }

    pub fn task_mut(&mut self, task_id: TaskId) -> &mut Task {
        &mut self.tasks[task_id]
    }

    pub fn global_queue(&self) -> QueueId {
        self.global_queue_id
    }

    pub fn cpu_is_idle(&self) -> bool {
        self.current.is_none()
    }

    pub fn max_burst(&self) -> Ticks {
        self.tasks.iter().map(|t| t.burst).max().unwrap_or(0)
    }

    pub fn mark_runnable(&mut self, task_id: TaskId) {
        let task = self.task_mut(task_id);
        debug_assert!(
            task.state != TaskState::Completed,
            "Completed task {} cannot be runnable",
            task.id
        );
        task.state = TaskState::Runnable;
    }

    pub fn mark_completed(&mut self, task_id: TaskId, completion_time: Ticks) {
        debug_assert!(
            !self.task_to_queue.contains_key(&task_id),
            "Completing task {task_id} that is still enqueued"
        );

        let task = &mut self.tasks[task_id];
        debug_assert!(
            task.state == TaskState::Running,
            "Task {task_id} must have been running before marked complete"
        );

        task.state = TaskState::Completed;
        task.remaining = 0;
        task.completion_time = Some(completion_time);
    }

    // Return previous state
    pub fn set_running(&mut self, task_id: TaskId) -> TaskState {
        debug_assert!(
            !self.task_to_queue.contains_key(&task_id),
            "Running task {task_id} must not be enqueued"
        );
        debug_assert!(self.cpu_is_idle(), "CPU already running a task");

        let now = self.now;
        self.current = Some(task_id);
        let task = self.task_mut(task_id);
        let prev_state = task.state;
        task.state = TaskState::Running;
        task.start_time.get_or_insert(now);
        prev_state
    }

    pub fn clear_cpu(&mut self) {
        self.current = None;
    }
}

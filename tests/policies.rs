// Ordering, timeline and energy properties of the five scheduling policies.

use green_sched::{
    Algorithm, ArrivalModel, Bounds, Config, Simulator,
    core::{ExecInterval, Task},
    scheduler::SchedParams,
    sim::{create_tasks, tasks_from_specs},
};

fn order(timeline: &[ExecInterval]) -> Vec<usize> {
    timeline.iter().map(|i| i.task).collect()
}

fn random_tasks(seed: u64) -> Vec<Task> {
    create_tasks(
        25,
        Bounds::new(1, 40),
        Bounds::new(1, 5),
        Bounds::new(0.1, 1.0),
        ArrivalModel::Uniform { horizon: 200 },
        seed,
    )
}

fn params(quantum: u64) -> SchedParams {
    SchedParams {
        quantum,
        ..SchedParams::default()
    }
}

fn simulator(idle: f64, max: f64) -> Simulator {
    let config = Config::builder()
        .power(idle, max)
        .tick_seconds(1.0)
        .sampling_interval(1)
        .build()
        .unwrap();
    Simulator::new(config).unwrap()
}

// END-TO-END EXAMPLE

#[test]
fn fcfs_and_sjf_average_wait_for_three_tasks() {
    let tasks = tasks_from_specs(&[(0, 5, 1), (0, 2, 1), (0, 8, 1)]);
    let mut sim = simulator(20.0, 65.0);

    let fcfs = sim.run_algorithm(Algorithm::Fcfs, &tasks);
    let sjf = sim.run_algorithm(Algorithm::Sjf, &tasks);

    assert_eq!(fcfs.avg_wait, 4.0);
    assert_eq!(sjf.avg_wait, 3.0);
    assert!(sjf.avg_wait <= fcfs.avg_wait);
    assert_eq!(order(&sjf.timeline), vec![1, 0, 2]);
    assert_eq!(order(&fcfs.timeline), vec![0, 1, 2]);
}

#[test]
fn empty_task_set_gives_zero_metrics() {
    let mut sim = simulator(20.0, 65.0);
    for algo in Algorithm::all() {
        let result = sim.run_algorithm(algo, &[]);
        assert!(result.timeline.is_empty());
        assert_eq!(result.total_energy_kwh, 0.0);
        assert_eq!(result.total_co2_kg, 0.0);
        assert_eq!(result.total_cost, 0.0);
        assert_eq!(result.avg_wait, 0.0);
        assert_eq!(result.avg_turnaround, 0.0);
        assert_eq!(result.tasks_executed, 0);

        let (timeline, tasks) = algo.schedule(Vec::new(), &SchedParams::default());
        assert!(timeline.is_empty());
        assert!(tasks.is_empty());
    }
}

// ORDERING AND TIE-BREAKS

#[test]
fn fcfs_follows_arrival_then_id() {
    let tasks = tasks_from_specs(&[(4, 1, 1), (0, 3, 1), (4, 2, 1), (1, 1, 1)]);
    let (timeline, _) = Algorithm::Fcfs.schedule(tasks, &SchedParams::default());
    assert_eq!(order(&timeline), vec![1, 3, 0, 2]);
}

#[test]
fn fcfs_waits_for_late_arrival() {
    let tasks = tasks_from_specs(&[(0, 2, 1), (10, 3, 1)]);
    let (timeline, tasks) = Algorithm::Fcfs.schedule(tasks, &SchedParams::default());
    assert_eq!(timeline[1].start, 10);
    assert_eq!(tasks[1].wait(), Some(0));
    assert_eq!(tasks[1].completion_time, Some(13));
}

#[test]
fn sjf_only_considers_arrived_tasks() {
    // Task 1 is shorter but not there when the CPU first frees up
    let tasks = tasks_from_specs(&[(0, 6, 1), (7, 1, 1), (2, 4, 1), (3, 5, 1)]);
    let (timeline, _) = Algorithm::Sjf.schedule(tasks, &SchedParams::default());
    // t=6: tasks 2 and 3 ready, 2 is shorter; t=10: 1 (burst 1) beats 3
    assert_eq!(order(&timeline), vec![0, 2, 1, 3]);
}

#[test]
fn sjf_ties_break_on_arrival_then_id() {
    let tasks = tasks_from_specs(&[(0, 10, 1), (5, 3, 1), (2, 3, 1), (2, 3, 1)]);
    let (timeline, _) = Algorithm::Sjf.schedule(tasks, &SchedParams::default());
    assert_eq!(order(&timeline), vec![0, 2, 3, 1]);
}

#[test]
fn priority_runs_lowest_value_first() {
    let tasks = tasks_from_specs(&[(0, 4, 3), (0, 4, 1), (0, 4, 2), (1, 4, 1)]);
    let (timeline, _) = Algorithm::PriorityBased.schedule(tasks, &SchedParams::default());
    // Task 3 arrives at t=1 with top priority, but task 1 is already running
    assert_eq!(order(&timeline), vec![1, 3, 2, 0]);
}

#[test]
fn energy_optimized_orders_like_sjf() {
    for seed in 0..5 {
        let tasks = random_tasks(seed);
        let (sjf, _) = Algorithm::Sjf.schedule(tasks.clone(), &SchedParams::default());
        let (green, _) = Algorithm::EnergyOptimized.schedule(tasks, &SchedParams::default());
        assert_eq!(order(&sjf), order(&green));
    }
}

#[test]
fn equal_arrivals_reduce_to_static_sort() {
    let specs = [(0, 9, 2), (0, 1, 3), (0, 5, 1), (0, 3, 2)];

    let (sjf, _) = Algorithm::Sjf.schedule(tasks_from_specs(&specs), &SchedParams::default());
    assert_eq!(order(&sjf), vec![1, 3, 2, 0]);

    let (prio, _) =
        Algorithm::PriorityBased.schedule(tasks_from_specs(&specs), &SchedParams::default());
    assert_eq!(order(&prio), vec![2, 0, 3, 1]);
}

// ROUND ROBIN

#[test]
fn round_robin_slices_never_exceed_quantum() {
    for seed in 0..5 {
        let (timeline, tasks) = Algorithm::RoundRobin.schedule(random_tasks(seed), &params(7));
        assert!(timeline.iter().all(|i| i.duration() <= 7 && i.duration() > 0));
        assert!(tasks.iter().all(|t| t.remaining == 0));
    }
}

#[test]
fn round_robin_rotates_through_ready_tasks() {
    let tasks = tasks_from_specs(&[(0, 5, 1), (0, 3, 1)]);
    let (timeline, tasks) = Algorithm::RoundRobin.schedule(tasks, &params(2));
    assert_eq!(order(&timeline), vec![0, 1, 0, 1, 0]);
    assert_eq!(tasks[0].completion_time, Some(8));
    assert_eq!(tasks[1].completion_time, Some(7));
}

#[test]
fn round_robin_admits_new_arrivals_before_preempted_task() {
    // Task 1 arrives mid-slice; it must run before task 0 resumes
    let tasks = tasks_from_specs(&[(0, 6, 1), (1, 2, 1)]);
    let (timeline, _) = Algorithm::RoundRobin.schedule(tasks, &params(3));
    assert_eq!(order(&timeline), vec![0, 1, 0]);

    // An arrival exactly at the slice boundary counts as arriving during it
    let tasks = tasks_from_specs(&[(0, 6, 1), (3, 2, 1)]);
    let (timeline, _) = Algorithm::RoundRobin.schedule(tasks, &params(3));
    assert_eq!(order(&timeline), vec![0, 1, 0]);
}

#[test]
fn round_robin_with_large_quantum_matches_fcfs() {
    let tasks = random_tasks(17);
    let (rr, _) = Algorithm::RoundRobin.schedule(tasks.clone(), &params(1_000));
    let (fcfs, _) = Algorithm::Fcfs.schedule(tasks, &SchedParams::default());
    assert_eq!(rr, fcfs);
}

// TIMELINE INVARIANTS

#[test]
fn non_preemptive_timelines_are_ordered_and_disjoint() {
    for algo in [
        Algorithm::Fcfs,
        Algorithm::Sjf,
        Algorithm::PriorityBased,
        Algorithm::EnergyOptimized,
    ] {
        for seed in 0..5 {
            let tasks = random_tasks(seed);
            let count = tasks.len();
            let (timeline, _) = algo.schedule(tasks, &SchedParams::default());
            assert_eq!(timeline.len(), count, "{algo}: one interval per task");
            for pair in timeline.windows(2) {
                assert!(pair[0].start <= pair[1].start, "{algo}: unsorted");
                assert!(pair[0].end <= pair[1].start, "{algo}: overlap");
            }
        }
    }
}

#[test]
fn turnaround_equals_wait_plus_burst() {
    for algo in Algorithm::all() {
        for seed in 0..5 {
            let (_, tasks) = algo.schedule(random_tasks(seed), &params(5));

            let mut turnaround_sum = 0;
            let mut wait_plus_burst = 0;
            for task in &tasks {
                let done = task.completion_time.unwrap();
                let start = task.start_time.unwrap();
                assert!(start >= task.arrival_time, "{algo}: ran before arrival");
                assert!(done >= task.arrival_time + task.burst);
                assert_eq!(task.turnaround().unwrap(), task.wait().unwrap() + task.burst);
                turnaround_sum += done - task.arrival_time;
                wait_plus_burst += task.wait().unwrap() + task.burst;
            }
            assert_eq!(turnaround_sum, wait_plus_burst);
        }
    }
}

#[test]
fn non_preemptive_wait_is_start_minus_arrival() {
    for algo in [Algorithm::Fcfs, Algorithm::Sjf, Algorithm::PriorityBased] {
        let (_, tasks) = algo.schedule(random_tasks(4), &SchedParams::default());
        for task in tasks {
            assert_eq!(
                task.wait().unwrap(),
                task.start_time.unwrap() - task.arrival_time
            );
        }
    }
}

// ENERGY AND DETERMINISM

#[test]
fn energy_optimized_uses_no_more_energy_than_fcfs() {
    let mut sim = simulator(20.0, 65.0);
    for seed in 0..5 {
        let tasks = random_tasks(seed);
        let max_burst = tasks.iter().map(|t| t.burst).max().unwrap();
        assert!(tasks.iter().any(|t| (t.burst as f64) < 0.5 * max_burst as f64));

        let fcfs = sim.run_algorithm(Algorithm::Fcfs, &tasks);
        let green = sim.run_algorithm(Algorithm::EnergyOptimized, &tasks);
        assert!(green.total_energy_kwh < fcfs.total_energy_kwh);
        assert!(green.total_co2_kg < fcfs.total_co2_kg);
    }
}

#[test]
fn runs_do_not_leak_state_into_the_shared_task_set() {
    let tasks = random_tasks(8);
    let snapshot = tasks.clone();
    let mut sim = simulator(5.0, 15.0);
    let comparison = sim.run_with_tasks(&tasks);
    assert_eq!(tasks, snapshot);
    assert!(
        comparison
            .results()
            .iter()
            .all(|r| r.tasks_executed == tasks.len())
    );
}

#[test]
fn same_policy_twice_gives_identical_results() {
    let tasks = random_tasks(21);
    let mut sim = simulator(5.0, 15.0);
    for algo in Algorithm::all() {
        let first = sim.run_algorithm(algo, &tasks);
        let second = sim.run_algorithm(algo, &tasks);
        assert_eq!(first, second);
    }
}

#[test]
fn same_config_gives_identical_comparisons() {
    let config = Config::builder().tasks(12).seed(5).build().unwrap();
    let a = Simulator::new(config.clone()).unwrap().run_all();
    let b = Simulator::new(config).unwrap().run_all();
    assert_eq!(a, b);
}

#[test]
fn rankings_are_sorted_ascending() {
    let config = Config::builder().tasks(15).build().unwrap();
    let comparison = Simulator::new(config).unwrap().run_all();

    let energy: Vec<_> = comparison
        .ranked_by_energy()
        .iter()
        .map(|r| r.total_energy_kwh)
        .collect();
    assert!(energy.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(
        comparison.best_energy().unwrap().total_energy_kwh,
        energy[0]
    );
    assert_eq!(
        comparison.best_co2().unwrap().algorithm,
        comparison.best_energy().unwrap().algorithm
    );
}

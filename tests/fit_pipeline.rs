//! End-to-end tests for the annealing fit pipeline

use std::sync::{Arc, Mutex};

use qfit::{
    ActionId, AnnealObserver, AnnealSchedule, EpsilonGreedy, FitConfig, FitReport, RecordedTask,
    Recording, Result, Softmax, StateId, Trial, run_fit,
};

fn trial(rewarded: u8, port: &str, schedule: &str) -> Trial {
    Trial {
        choice: "1".to_string(),
        rewarded,
        port: ActionId::new(port),
        odor: "odor-a".to_string(),
        schedule: StateId::new(schedule),
    }
}

/// Subject whose correct choice tracks the schedule: port "1" in state "2",
/// port "8" in state "3", all trials rewarded.
fn schedule_following_task(trials: usize) -> RecordedTask {
    let trials = (0..trials)
        .map(|i| {
            let (port, schedule) = if i % 2 == 0 { ("1", "2") } else { ("8", "3") };
            trial(1, port, schedule)
        })
        .collect();
    RecordedTask::new(Recording::new(trials).unwrap())
}

fn config(steps: usize, seed: u64) -> FitConfig {
    FitConfig {
        schedule: AnnealSchedule::new(100.0, 1.0, steps, 10).unwrap(),
        seed: Some(seed),
        ..FitConfig::default()
    }
}

struct StepCounter {
    steps: Arc<Mutex<usize>>,
}

impl AnnealObserver for StepCounter {
    fn on_step(
        &mut self,
        _step: usize,
        temperature: f64,
        energy: f64,
        best_energy: f64,
        _accepted: bool,
    ) -> Result<()> {
        assert!(temperature > 0.0);
        assert!(best_energy <= energy);
        *self.steps.lock().unwrap() += 1;
        Ok(())
    }
}

#[test]
fn test_fit_epsilon_greedy_end_to_end() {
    let task = schedule_following_task(40);
    let report = run_fit(&task, Box::new(EpsilonGreedy), &config(30, 42), Vec::new()).unwrap();

    assert_eq!(report.policy, "epsilon-greedy");
    assert_eq!(report.trials, 40);
    assert_eq!(report.actions.len(), 40);
    assert_eq!(report.attempted_moves, 30);
    assert!(report.best_energy <= 40.0);
    assert!(report.q_table.len() == 4);
    assert!(report.q_table.iter().all(|entry| entry.value.is_finite()));
    assert!(report.log_likelihood <= 0.0);
}

#[test]
fn test_fit_softmax_end_to_end() {
    let task = schedule_following_task(40);
    let report = run_fit(&task, Box::new(Softmax), &config(30, 7), Vec::new()).unwrap();

    assert_eq!(report.policy, "softmax");
    assert_eq!(report.actions.len(), 40);
    assert!(report.parameters.inverse_temperature() > 0.0);
    assert!(report.best_energy <= 40.0);
}

#[test]
fn test_fit_is_reproducible_with_a_seed() {
    let task = schedule_following_task(30);

    let first = run_fit(&task, Box::new(Softmax), &config(20, 99), Vec::new()).unwrap();
    let second = run_fit(&task, Box::new(Softmax), &config(20, 99), Vec::new()).unwrap();

    assert_eq!(first.best_energy, second.best_energy);
    assert_eq!(first.parameters, second.parameters);
    assert_eq!(first.actions, second.actions);
    assert_eq!(first.log_likelihood, second.log_likelihood);
}

#[test]
fn test_observers_are_driven_through_the_whole_run() {
    let task = schedule_following_task(20);
    let steps = Arc::new(Mutex::new(0));
    let observer = StepCounter {
        steps: steps.clone(),
    };

    run_fit(
        &task,
        Box::new(EpsilonGreedy),
        &config(12, 5),
        vec![Box::new(observer)],
    )
    .unwrap();

    assert_eq!(*steps.lock().unwrap(), 12);
}

#[test]
fn test_invalid_schedule_fails_before_fitting() {
    let task = schedule_following_task(20);
    let config = FitConfig {
        schedule: AnnealSchedule {
            t_max: 1.0,
            t_min: 5.0,
            steps: 10,
            updates: 1,
        },
        seed: Some(1),
        ..FitConfig::default()
    };

    assert!(run_fit(&task, Box::new(EpsilonGreedy), &config, Vec::new()).is_err());
}

#[test]
fn test_single_action_recording_is_rejected() {
    let trials = (0..10).map(|_| trial(1, "1", "2")).collect();
    let task = RecordedTask::new(Recording::new(trials).unwrap());

    let result = run_fit(&task, Box::new(EpsilonGreedy), &config(5, 1), Vec::new());
    assert!(result.is_err(), "a one-port recording has no complement action");
}

#[test]
fn test_report_round_trips_through_json() {
    let task = schedule_following_task(20);
    let report = run_fit(&task, Box::new(EpsilonGreedy), &config(10, 11), Vec::new()).unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fit_report.json");
    report.save(&path).unwrap();

    let loaded = FitReport::load(&path).unwrap();
    assert_eq!(loaded.policy, report.policy);
    assert_eq!(loaded.best_energy, report.best_energy);
    assert_eq!(loaded.parameters, report.parameters);
    assert_eq!(loaded.actions, report.actions);
    assert_eq!(loaded.q_table, report.q_table);
    assert_eq!(loaded.schedule, report.schedule);
}

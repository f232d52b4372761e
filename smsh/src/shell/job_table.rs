use crate::process::{Job, Origin};
use nix::unistd::Pid;
use smsh_types::{SmshError, SmshResult};
use std::collections::HashMap;

/// Upper bound on concurrently tracked background jobs.
pub const JOB_TABLE_CAPACITY: usize = 512;

/// Background jobs the shell still owes a completion report for, keyed by pid.
#[derive(Debug)]
pub struct JobTable {
    jobs: HashMap<Pid, Job>,
    capacity: usize,
}

impl Default for JobTable {
    fn default() -> Self {
        Self::new()
    }
}

impl JobTable {
    pub fn new() -> Self {
        Self::with_capacity(JOB_TABLE_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        JobTable {
            jobs: HashMap::new(),
            capacity,
        }
    }

    /// Starts tracking `pid` as a running background job.
    pub fn insert(&mut self, pid: Pid, cmd: &str) -> SmshResult<&Job> {
        if self.jobs.contains_key(&pid) {
            return Err(SmshError::DuplicateJob(pid));
        }
        if self.is_full() {
            return Err(SmshError::JobTableFull {
                capacity: self.capacity,
            });
        }
        let job = Job::new(pid, Origin::Background, cmd.to_string());
        Ok(self.jobs.entry(pid).or_insert(job))
    }

    pub fn remove(&mut self, pid: Pid) -> Option<Job> {
        self.jobs.remove(&pid)
    }

    pub fn get(&self, pid: Pid) -> Option<&Job> {
        self.jobs.get(&pid)
    }

    pub fn get_mut(&mut self, pid: Pid) -> Option<&mut Job> {
        self.jobs.get_mut(&pid)
    }

    /// Tracked jobs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.values()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Job> {
        self.jobs.values_mut()
    }

    pub fn pids(&self) -> impl Iterator<Item = Pid> + '_ {
        self.jobs.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.jobs.len() >= self.capacity
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::process::ProcessState;

    fn pid(n: i32) -> Pid {
        Pid::from_raw(n)
    }

    #[test]
    fn insert_tracks_running_background_job() {
        let mut jobs = JobTable::new();
        let job = jobs.insert(pid(10), "sleep 5").unwrap();
        assert_eq!(job.origin, Origin::Background);
        assert_eq!(job.state, ProcessState::Running);
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs.capacity(), JOB_TABLE_CAPACITY);
    }

    #[test]
    fn duplicate_pid_is_rejected() {
        let mut jobs = JobTable::new();
        jobs.insert(pid(10), "a").unwrap();
        assert!(matches!(
            jobs.insert(pid(10), "b"),
            Err(SmshError::DuplicateJob(p)) if p == pid(10)
        ));
        assert_eq!(jobs.get(pid(10)).unwrap().cmd, "a");
    }

    #[test]
    fn full_table_reports_error_and_freed_slot_is_reused() {
        let mut jobs = JobTable::with_capacity(2);
        jobs.insert(pid(1), "a").unwrap();
        jobs.insert(pid(2), "b").unwrap();
        assert!(jobs.is_full());
        assert!(matches!(
            jobs.insert(pid(3), "c"),
            Err(SmshError::JobTableFull { capacity: 2 })
        ));
        assert_eq!(jobs.len(), 2);

        assert!(jobs.remove(pid(1)).is_some());
        assert!(jobs.insert(pid(3), "c").is_ok());
        assert!(jobs.get(pid(3)).is_some());
    }

    #[test]
    fn remove_missing_is_noop() {
        let mut jobs = JobTable::new();
        jobs.insert(pid(5), "x").unwrap();
        assert!(jobs.remove(pid(6)).is_none());
        assert_eq!(jobs.len(), 1);
    }

    #[test]
    fn iteration_covers_every_job() {
        let mut jobs = JobTable::new();
        for n in 1..=5 {
            jobs.insert(pid(n), "job").unwrap();
        }
        let mut seen: Vec<i32> = jobs.iter().map(|job| job.pid.as_raw()).collect();
        seen.sort();
        assert_eq!(seen, vec![1, 2, 3, 4, 5]);

        for job in jobs.iter_mut() {
            job.state = ProcessState::Completed(0);
        }
        assert!(jobs.iter().all(|job| job.is_completed()));
    }
}

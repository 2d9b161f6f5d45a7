use std::collections::VecDeque;

use warrant_server::{ReplicaHost, ReplicaKey};
use warrant_shared::ConnectionId;

/// Stand-in replication layer whose destruction lags behind requests:
/// each [`tick`](TestReplicaHost::tick) destroys at most `per_tick`
/// requested replicas.
pub struct TestReplicaHost {
    live: Vec<(ConnectionId, ReplicaKey)>,
    doomed: VecDeque<ReplicaKey>,
    per_tick: usize,
}

impl TestReplicaHost {
    pub fn new(per_tick: usize) -> Self {
        Self {
            live: Vec::new(),
            doomed: VecDeque::new(),
            per_tick,
        }
    }

    pub fn spawn(&mut self, creator: ConnectionId, replica: ReplicaKey) {
        self.live.push((creator, replica));
    }

    pub fn tick(&mut self) {
        for _ in 0..self.per_tick {
            let Some(replica) = self.doomed.pop_front() else {
                return;
            };
            self.live.retain(|(_, live)| *live != replica);
        }
    }

    pub fn live_count(&self, creator: &ConnectionId) -> usize {
        self.live
            .iter()
            .filter(|(connection, _)| connection == creator)
            .count()
    }
}

impl ReplicaHost for TestReplicaHost {
    fn replicas_created_by(&self, connection: &ConnectionId) -> Vec<ReplicaKey> {
        self.live
            .iter()
            .filter(|(creator, _)| creator == connection)
            .map(|(_, replica)| replica.clone())
            .collect()
    }

    fn request_destroy(&mut self, replica: &ReplicaKey) {
        if !self.doomed.contains(replica) {
            self.doomed.push_back(replica.clone());
        }
    }
}

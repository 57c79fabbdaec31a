//! `AgentRoster`: the live customers, keyed and iterated by `AgentId`.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;
use sw_core::{AgentId, ShopPoint};
use sw_nav::NavStatus;

use crate::{AgentContext, AgentController, AgentError, AgentResult, StepReport};

/// Ordered map of active controllers.
///
/// Iteration is always in ascending `AgentId` order, which is the order the
/// session applies step commands in.
#[derive(Default)]
pub struct AgentRoster {
    agents: BTreeMap<AgentId, AgentController>,
}

impl AgentRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a controller.
    ///
    /// # Errors
    ///
    /// [`AgentError::DuplicateAgent`] if the id is already live; the roster is
    /// left unchanged.
    pub fn insert(&mut self, controller: AgentController) -> AgentResult<()> {
        let id = controller.id();
        if self.agents.contains_key(&id) {
            return Err(AgentError::DuplicateAgent(id));
        }
        self.agents.insert(id, controller);
        Ok(())
    }

    pub fn remove(&mut self, id: AgentId) -> Option<AgentController> {
        self.agents.remove(&id)
    }

    pub fn get(&self, id: AgentId) -> Option<&AgentController> {
        self.agents.get(&id)
    }

    pub fn get_mut(&mut self, id: AgentId) -> Option<&mut AgentController> {
        self.agents.get_mut(&id)
    }

    pub fn contains(&self, id: AgentId) -> bool {
        self.agents.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.agents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.agents.is_empty()
    }

    /// Live ids in ascending order.
    pub fn ids(&self) -> Vec<AgentId> {
        self.agents.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AgentController> + '_ {
        self.agents.values()
    }

    /// Drop every controller, returning their ids.
    pub fn clear(&mut self) -> Vec<AgentId> {
        let ids = self.ids();
        self.agents.clear();
        ids
    }

    /// Send every live customer toward `exit`.
    pub fn begin_exit_all(&mut self, exit: ShopPoint) {
        for controller in self.agents.values_mut() {
            controller.begin_exit(exit);
        }
    }

    /// Step every controller once.
    ///
    /// `statuses` holds the oracle readings collected before this phase; an
    /// id missing from the map is stepped with `None`.  Results come back in
    /// ascending `AgentId` order.  With the `parallel` feature the steps run
    /// on Rayon's thread pool.
    pub fn step_all(
        &mut self,
        ctx:      &AgentContext<'_>,
        statuses: &FxHashMap<AgentId, Option<NavStatus>>,
    ) -> Vec<(AgentId, StepReport)> {
        #[cfg(not(feature = "parallel"))]
        {
            self.agents
                .iter_mut()
                .map(|(&id, controller)| {
                    let status = statuses.get(&id).copied().flatten();
                    (id, controller.step(status, ctx))
                })
                .collect()
        }

        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;

            let mut reports: Vec<(AgentId, StepReport)> = self
                .agents
                .par_iter_mut()
                .map(|(&id, controller)| {
                    let status = statuses.get(&id).copied().flatten();
                    (id, controller.step(status, ctx))
                })
                .collect();
            reports.sort_unstable_by_key(|(id, _)| *id);
            reports
        }
    }
}

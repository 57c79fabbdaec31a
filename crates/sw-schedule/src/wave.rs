//! One timed batch of customer spawns.

use sw_core::{AgentId, SimRng, TemplateId};

/// A wave's spawn plan and what it produced.
///
/// The thief/regular order is fixed at creation by shuffling `k` thief flags
/// among `customers - k` regular ones.  A wave is sealed once every planned
/// slot has been spawned or skipped.
#[derive(Clone, Debug)]
pub struct Wave {
    /// 1-based position within the day.
    pub number:      u8,
    pub thief_quota: u32,
    spawn_flags:     Vec<bool>,
    next_slot:       usize,
    spawned:         Vec<AgentId>,
    used_templates:  Vec<TemplateId>,
    thieves_spawned: u32,
    skipped:         u32,
    active:          bool,
}

impl Wave {
    /// Plan a wave of `customers` spawns, `thief_quota` of them thieves.
    /// A quota larger than the wave is truncated to the wave size.
    pub fn new(number: u8, thief_quota: u32, customers: u32, rng: &mut SimRng) -> Self {
        let thieves = thief_quota.min(customers) as usize;
        let mut spawn_flags = vec![false; customers as usize];
        spawn_flags[..thieves].fill(true);
        rng.shuffle(&mut spawn_flags);
        Self {
            number,
            thief_quota: thieves as u32,
            spawn_flags,
            next_slot: 0,
            spawned: Vec::new(),
            used_templates: Vec::new(),
            thieves_spawned: 0,
            skipped: 0,
            active: true,
        }
    }

    /// The shuffled thief flag of each slot, in spawn order.
    pub fn spawn_flags(&self) -> &[bool] {
        &self.spawn_flags
    }

    /// Flag of the next slot to spawn; `None` once sealed.
    pub fn next_flag(&self) -> Option<bool> {
        self.spawn_flags.get(self.next_slot).copied()
    }

    pub fn next_slot(&self) -> usize {
        self.next_slot
    }

    /// Pick an entity template, preferring ones this wave has not used yet.
    /// `None` when there are no templates at all.
    pub fn pick_template(&self, template_count: u16, rng: &mut SimRng) -> Option<TemplateId> {
        if template_count == 0 {
            return None;
        }
        let unused: Vec<TemplateId> = (0..template_count)
            .map(TemplateId)
            .filter(|t| !self.used_templates.contains(t))
            .collect();
        match rng.choose(&unused) {
            Some(&t) => Some(t),
            None => Some(TemplateId(rng.gen_range(0..template_count))),
        }
    }

    /// Consume the next slot as spawned with `template`.
    pub(crate) fn consume_slot(&mut self, template: TemplateId) {
        if let Some(true) = self.next_flag() {
            self.thieves_spawned += 1;
        }
        if !self.used_templates.contains(&template) {
            self.used_templates.push(template);
        }
        self.next_slot += 1;
    }

    /// Consume the next slot without spawning anything.
    pub(crate) fn skip_slot(&mut self) {
        self.skipped += 1;
        self.next_slot += 1;
    }

    /// Turn an already consumed `slot` into a skip: the caller could not
    /// create the customer it ordered.
    pub(crate) fn revoke_slot(&mut self, slot: usize) {
        if self.spawn_flags.get(slot) == Some(&true) {
            self.thieves_spawned = self.thieves_spawned.saturating_sub(1);
        }
        self.skipped += 1;
    }

    /// Attach the identity the session gave a spawned customer.
    pub(crate) fn record_agent(&mut self, agent: AgentId) {
        self.spawned.push(agent);
    }

    pub(crate) fn deactivate(&mut self) {
        self.active = false;
    }

    /// Every planned slot has been spawned or skipped.
    pub fn is_sealed(&self) -> bool {
        self.next_slot >= self.spawn_flags.len()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn spawned(&self) -> &[AgentId] {
        &self.spawned
    }

    pub fn thieves_spawned(&self) -> u32 {
        self.thieves_spawned
    }

    /// Slots dropped because no template was available or the customer
    /// could not be created.
    pub fn skipped(&self) -> u32 {
        self.skipped
    }
}

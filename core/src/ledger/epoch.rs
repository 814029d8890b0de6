use relink_act_types::{ActionRecord, ActorRef};

/// A combat participant and everything it dealt during one combat.
#[derive(Debug, Clone)]
pub struct Actor {
    actor_ref: ActorRef,
    actions: Vec<ActionRecord>,
    total_damage: u64,
}

impl Actor {
    fn new(actor_ref: ActorRef) -> Self {
        Self {
            actor_ref,
            actions: Vec::new(),
            total_damage: 0,
        }
    }

    fn add_action(&mut self, action: ActionRecord) {
        self.total_damage = self.total_damage.saturating_add(action.amount);
        self.actions.push(action);
    }

    /// Identity as first seen in this combat
    pub fn actor_ref(&self) -> &ActorRef {
        &self.actor_ref
    }

    pub fn index(&self) -> i32 {
        self.actor_ref.index
    }

    pub fn party_index(&self) -> i32 {
        self.actor_ref.party_index
    }

    /// Actions in arrival order
    pub fn actions(&self) -> &[ActionRecord] {
        &self.actions
    }

    pub fn total_damage(&self) -> u64 {
        self.total_damage
    }
}

/// One bounded combat: everything between two area transitions.
#[derive(Debug, Clone)]
pub struct CombatEpoch {
    number: u64,
    title: String,
    start_timestamp_ms: i64,
    last_timestamp_ms: i64,
    party_total_damage: u64,
    /// Sorted by ascending party index; ties keep first-seen order
    actors: Vec<Actor>,
}

impl CombatEpoch {
    pub(crate) fn new(number: u64, start_timestamp_ms: i64) -> Self {
        Self {
            number,
            title: format!("#{}", number),
            start_timestamp_ms,
            last_timestamp_ms: start_timestamp_ms,
            party_total_damage: 0,
            actors: Vec::new(),
        }
    }

    /// Attribute a damage record to its source actor, admitting the actor if
    /// its index is new to this combat.
    ///
    /// Returns true when a new actor was admitted.
    pub(crate) fn record(&mut self, action: ActionRecord) -> bool {
        let index = action.source.index;
        let (position, admitted) = match self.actors.iter().position(|a| a.index() == index) {
            Some(position) => (position, false),
            None => {
                // The list is always sorted, so inserting after every actor with a
                // lower or equal party index matches a stable re-sort.
                let party_index = action.source.party_index;
                let position = self
                    .actors
                    .partition_point(|a| a.party_index() <= party_index);
                self.actors
                    .insert(position, Actor::new(action.source.clone()));
                (position, true)
            }
        };

        self.party_total_damage = self.party_total_damage.saturating_add(action.amount);
        self.last_timestamp_ms = self.last_timestamp_ms.max(action.timestamp_ms);
        self.actors[position].add_action(action);
        admitted
    }

    /// Sequence number of this combat within the ledger
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Display label, `#<number>`
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn start_timestamp_ms(&self) -> i64 {
        self.start_timestamp_ms
    }

    pub fn last_timestamp_ms(&self) -> i64 {
        self.last_timestamp_ms
    }

    /// Saturates for wire timestamps far apart
    pub fn duration_ms(&self) -> i64 {
        self.last_timestamp_ms.saturating_sub(self.start_timestamp_ms)
    }

    pub fn party_total_damage(&self) -> u64 {
        self.party_total_damage
    }

    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    pub fn actor(&self, index: i32) -> Option<&Actor> {
        self.actors.iter().find(|a| a.index() == index)
    }
}

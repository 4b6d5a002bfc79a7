//! Collision registry
//!
//! Declarative `head -> target` registrations replace per-object trigger
//! callbacks. Each pass over a head's registrations reports only contacts
//! that *entered* overlap since the previous pass. A registration whose pair
//! is currently exempt (unarmed segment, invulnerable hitter) does not track
//! overlap at all, so the contact fires as soon as the exemption lifts while
//! the shapes still overlap.
//!
//! `detect` returns a snapshot; callers mutate registrations only after the
//! pass has finished.

use serde::{Deserialize, Serialize};

use super::bonus::BonusId;
use super::player::PlayerId;

pub type RegistrationId = u32;

/// Shape a head is checked against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Target {
    Segment { owner: PlayerId, index: usize },
    Head(PlayerId),
    Bonus(BonusId),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ContactKind {
    SelfHit,
    OpponentHit,
    HeadClash,
    Pickup,
}

fn kind_of(head: PlayerId, target: Target) -> ContactKind {
    match target {
        Target::Segment { owner, .. } if owner == head => ContactKind::SelfHit,
        Target::Segment { .. } => ContactKind::OpponentHit,
        Target::Head(_) => ContactKind::HeadClash,
        Target::Bonus(_) => ContactKind::Pickup,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registration {
    pub id: RegistrationId,
    pub head: PlayerId,
    pub target: Target,
    touching: bool,
}

impl Registration {
    pub fn kind(&self) -> ContactKind {
        kind_of(self.head, self.target)
    }
}

/// A contact that started this pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub registration: RegistrationId,
    pub head: PlayerId,
    pub target: Target,
}

impl Contact {
    pub fn kind(&self) -> ContactKind {
        kind_of(self.head, self.target)
    }
}

/// Shape and gate lookups the registry needs from the match
pub trait ContactWorld {
    /// False while the pair is exempt from collision
    fn is_interacting(&self, reg: &Registration) -> bool;
    /// Current geometric overlap of the head and its target
    fn is_overlapping(&self, reg: &Registration) -> bool;
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollisionRegistry {
    registrations: Vec<Registration>,
    heads: Vec<PlayerId>,
    next_id: RegistrationId,
}

impl CollisionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn add(&mut self, head: PlayerId, target: Target) -> RegistrationId {
        let id = self.next_id;
        self.next_id += 1;
        self.registrations.push(Registration {
            id,
            head,
            target,
            touching: false,
        });
        id
    }

    /// Register a head: it clashes with every known head and can collect
    /// every active pickup
    pub fn register_head(&mut self, head: PlayerId, active_bonuses: &[BonusId]) {
        if self.heads.contains(&head) {
            return;
        }
        for other in self.heads.clone() {
            self.add(head, Target::Head(other));
            self.add(other, Target::Head(head));
        }
        for &bonus in active_bonuses {
            self.add(head, Target::Bonus(bonus));
        }
        self.heads.push(head);
    }

    pub fn heads(&self) -> &[PlayerId] {
        &self.heads
    }

    /// Register a fresh segment against its owner's head and every other head
    pub fn register_segment(&mut self, owner: PlayerId, index: usize) {
        for head in self.heads.clone() {
            self.add(head, Target::Segment { owner, index });
        }
    }

    /// Make a pickup collectible by every registered head
    pub fn register_bonus(&mut self, bonus: BonusId) {
        for head in self.heads.clone() {
            self.add(head, Target::Bonus(bonus));
        }
    }

    pub fn remove_bonus(&mut self, bonus: BonusId) {
        self.registrations
            .retain(|r| r.target != Target::Bonus(bonus));
    }

    pub fn remove_all_bonuses(&mut self) {
        self.registrations
            .retain(|r| !matches!(r.target, Target::Bonus(_)));
    }

    /// Bulk teardown at match end
    pub fn clear(&mut self) {
        self.registrations.clear();
        self.heads.clear();
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    pub fn count_for(&self, head: PlayerId, kind: ContactKind) -> usize {
        self.registrations
            .iter()
            .filter(|r| r.head == head && r.kind() == kind)
            .count()
    }

    /// Overlap pass for one head; returns contacts that entered overlap
    pub fn detect<W: ContactWorld>(&mut self, head: PlayerId, world: &W) -> Vec<Contact> {
        let mut entered = Vec::new();
        for reg in self.registrations.iter_mut().filter(|r| r.head == head) {
            if !world.is_interacting(reg) {
                reg.touching = false;
                continue;
            }
            let overlapping = world.is_overlapping(reg);
            if overlapping && !reg.touching {
                entered.push(Contact {
                    registration: reg.id,
                    head: reg.head,
                    target: reg.target,
                });
            }
            reg.touching = overlapping;
        }
        entered
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[derive(Default)]
    struct MockWorld {
        overlapping: HashSet<Target>,
        exempt: HashSet<Target>,
    }

    impl ContactWorld for MockWorld {
        fn is_interacting(&self, reg: &Registration) -> bool {
            !self.exempt.contains(&reg.target)
        }

        fn is_overlapping(&self, reg: &Registration) -> bool {
            self.overlapping.contains(&reg.target)
        }
    }

    fn duel() -> CollisionRegistry {
        let mut reg = CollisionRegistry::new();
        reg.register_head(PlayerId::One, &[]);
        reg.register_head(PlayerId::Two, &[]);
        reg.register_segment(PlayerId::One, 0);
        reg.register_segment(PlayerId::Two, 0);
        reg
    }

    #[test]
    fn test_registration_layout() {
        let reg = duel();
        for head in PlayerId::BOTH {
            assert_eq!(reg.count_for(head, ContactKind::HeadClash), 1);
            assert_eq!(reg.count_for(head, ContactKind::SelfHit), 1);
            assert_eq!(reg.count_for(head, ContactKind::OpponentHit), 1);
        }
        assert_eq!(reg.len(), 6);
    }

    #[test]
    fn test_new_segment_adds_one_registration_per_head() {
        let mut reg = duel();
        reg.register_segment(PlayerId::Two, 1);
        assert_eq!(reg.count_for(PlayerId::One, ContactKind::OpponentHit), 2);
        assert_eq!(reg.count_for(PlayerId::Two, ContactKind::SelfHit), 2);
        assert_eq!(reg.len(), 8);
    }

    #[test]
    fn test_contacts_are_edge_triggered() {
        let mut reg = duel();
        let target = Target::Segment {
            owner: PlayerId::Two,
            index: 0,
        };
        let mut world = MockWorld::default();
        world.overlapping.insert(target);

        let first = reg.detect(PlayerId::One, &world);
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].kind(), ContactKind::OpponentHit);
        assert!(reg.detect(PlayerId::One, &world).is_empty());

        world.overlapping.clear();
        assert!(reg.detect(PlayerId::One, &world).is_empty());
        world.overlapping.insert(target);
        assert_eq!(reg.detect(PlayerId::One, &world).len(), 1);
    }

    #[test]
    fn test_exempt_pair_fires_once_exemption_lifts() {
        let mut reg = duel();
        let own = Target::Segment {
            owner: PlayerId::One,
            index: 0,
        };
        let mut world = MockWorld::default();
        world.overlapping.insert(own);
        world.exempt.insert(own);

        for _ in 0..5 {
            assert!(reg.detect(PlayerId::One, &world).is_empty());
        }
        world.exempt.clear();
        let contacts = reg.detect(PlayerId::One, &world);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].kind(), ContactKind::SelfHit);
    }

    #[test]
    fn test_detect_only_checks_requested_head() {
        let mut reg = duel();
        let mut world = MockWorld::default();
        world.overlapping.insert(Target::Head(PlayerId::One));
        assert!(reg.detect(PlayerId::One, &world).is_empty());
        let contacts = reg.detect(PlayerId::Two, &world);
        assert_eq!(contacts.len(), 1);
        assert_eq!(contacts[0].kind(), ContactKind::HeadClash);
    }

    #[test]
    fn test_bonus_registrations_lifecycle() {
        let mut reg = duel();
        reg.register_bonus(7);
        assert_eq!(reg.count_for(PlayerId::One, ContactKind::Pickup), 1);
        assert_eq!(reg.count_for(PlayerId::Two, ContactKind::Pickup), 1);
        reg.remove_bonus(7);
        assert_eq!(reg.count_for(PlayerId::One, ContactKind::Pickup), 0);
        reg.remove_all_bonuses();
        assert_eq!(reg.len(), 6);
    }

    #[test]
    fn test_late_head_sees_existing_bonuses() {
        let mut reg = CollisionRegistry::new();
        reg.register_head(PlayerId::One, &[]);
        reg.register_bonus(3);
        reg.register_head(PlayerId::Two, &[3]);
        assert_eq!(reg.count_for(PlayerId::Two, ContactKind::Pickup), 1);
        assert_eq!(reg.count_for(PlayerId::Two, ContactKind::HeadClash), 1);
        // Registering twice is ignored
        reg.register_head(PlayerId::Two, &[3]);
        assert_eq!(reg.count_for(PlayerId::Two, ContactKind::Pickup), 1);
    }

    #[test]
    fn test_clear_tears_everything_down() {
        let mut reg = duel();
        reg.register_bonus(1);
        reg.clear();
        assert!(reg.is_empty());
        assert!(reg.heads().is_empty());
    }
}

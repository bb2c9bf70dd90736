//! Directional combat between neighboring field cards
//!
//! An attacker swings one face (left or right) into the adjacent slot. The
//! defender answers with the face pointing back at the attacker:
//!
//! ```text
//!   [attacker]  --right-->  [defender]
//!   attack_right    vs    attack_left
//! ```
//!
//! Higher value wins, ties destroy both. Swipes that cannot start a clash are
//! silent; the only visible rejection is "already acted this turn".

use serde::{Deserialize, Serialize};

use super::sequencer::InteractionLock;
use super::state::{Card, CardId, GameEvent, GameState, Owner};

/// Swipe / attack direction along the lane
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    /// Neighboring slot in this direction, if it exists
    pub fn neighbor(self, slot: usize, slot_count: usize) -> Option<usize> {
        match self {
            Direction::Left => slot.checked_sub(1),
            Direction::Right => Some(slot + 1).filter(|&s| s < slot_count),
        }
    }

    /// Outward-facing value a card attacks with in this direction
    pub fn attack_value(self, card: &Card) -> u32 {
        match self {
            Direction::Left => card.combat.attack_left,
            Direction::Right => card.combat.attack_right,
        }
    }

    /// Inward-facing value a card defends with when hit from this direction
    pub fn defense_value(self, card: &Card) -> u32 {
        match self {
            Direction::Left => card.combat.attack_right,
            Direction::Right => card.combat.attack_left,
        }
    }
}

/// Who survives a clash
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClashResult {
    /// Defender destroyed
    AttackerWins,
    /// Attacker destroyed
    DefenderWins,
    /// Both destroyed
    Trade,
}

impl ClashResult {
    pub fn compare(attack: u32, defense: u32) -> Self {
        use std::cmp::Ordering;
        match attack.cmp(&defense) {
            Ordering::Greater => ClashResult::AttackerWins,
            Ordering::Less => ClashResult::DefenderWins,
            Ordering::Equal => ClashResult::Trade,
        }
    }
}

/// A resolved clash, before any state is touched
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatOutcome {
    pub attacker: CardId,
    pub defender: CardId,
    pub direction: Direction,
    pub attack: u32,
    pub defense: u32,
    pub result: ClashResult,
    /// Cards that will be destroyed (attacker first when both die)
    pub destroyed: Vec<CardId>,
}

/// What an attack attempt amounts to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AttackVerdict {
    /// Nothing happens and nothing is shown
    Inert,
    /// Card already acted this turn; shake and cross feedback only
    AlreadyActed,
    Resolved(CombatOutcome),
}

/// Decide what an attack would do. Pure: reads the board, changes nothing.
pub fn resolve_attack(
    state: &GameState,
    attacker_id: CardId,
    direction: Direction,
) -> AttackVerdict {
    if state.lock.is_held() {
        return AttackVerdict::Inert;
    }
    let Some(attacker) = state.find_card(attacker_id) else {
        return AttackVerdict::Inert;
    };
    let Some(slot) = attacker.zone.field_slot() else {
        return AttackVerdict::Inert;
    };
    if attacker.owner != Owner::Player {
        return AttackVerdict::Inert;
    }
    if attacker.combat.has_acted {
        return AttackVerdict::AlreadyActed;
    }

    let Some(target) = direction.neighbor(slot, state.board.len()) else {
        return AttackVerdict::Inert;
    };
    let Some(defender) = state.card_at_slot(target) else {
        return AttackVerdict::Inert;
    };
    if defender.owner == attacker.owner {
        return AttackVerdict::Inert;
    }

    let attack = direction.attack_value(attacker);
    let defense = direction.defense_value(defender);
    let result = ClashResult::compare(attack, defense);
    let destroyed = match result {
        ClashResult::AttackerWins => vec![defender.id],
        ClashResult::DefenderWins => vec![attacker.id],
        ClashResult::Trade => vec![attacker.id, defender.id],
    };

    AttackVerdict::Resolved(CombatOutcome {
        attacker: attacker.id,
        defender: defender.id,
        direction,
        attack,
        defense,
        result,
        destroyed,
    })
}

/// Resolve an attack and apply its immediate effects: feedback timers for a
/// spent card, or acted flag + hit flash + combat lock + destruction sequence
/// for a real clash
pub fn attack(state: &mut GameState, attacker_id: CardId, direction: Direction) -> AttackVerdict {
    let verdict = resolve_attack(state, attacker_id, direction);
    let now = state.now_ms;
    let timings = state.settings.timings;

    match &verdict {
        AttackVerdict::Inert => {
            log::debug!("Attack by {} ({:?}) is inert", attacker_id, direction);
        }
        AttackVerdict::AlreadyActed => {
            if let Some(card) = state.find_card_mut(attacker_id) {
                card.visual.shake.arm(now, timings.shake_ms);
                card.visual.cross.arm(now, timings.cross_ms);
            }
            log::debug!("Card {} already acted this turn", attacker_id);
            state.push_event(GameEvent::AttackRejected { card: attacker_id });
        }
        AttackVerdict::Resolved(outcome) => {
            if let Some(card) = state.find_card_mut(outcome.attacker) {
                card.combat.has_acted = true;
                card.visual.hit_flash.arm(now, timings.flash_ms);
            }
            if let Some(card) = state.find_card_mut(outcome.defender) {
                card.visual.hit_flash.arm(now, timings.flash_ms);
            }
            state.lock.try_acquire(InteractionLock::Combat);
            state
                .sequencer
                .begin(outcome.destroyed.clone(), now + timings.flash_ms);

            log::info!(
                "Card {} attacks {} {:?}: {} vs {} -> {:?}",
                outcome.attacker,
                outcome.defender,
                outcome.direction,
                outcome.attack,
                outcome.defense,
                outcome.result
            );
            state.push_event(GameEvent::AttackResolved {
                attacker: outcome.attacker,
                defender: outcome.defender,
                result: outcome.result,
            });
        }
    }

    verdict
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::{AttackPair, EnemyPlacement, Settings};
    use crate::sim::state::{CombatStats, Zone};
    use crate::sim::tick::tick;
    use proptest::prelude::*;

    /// Empty hand, enemies as given, plus player cards dropped straight into slots
    fn board_with(
        enemies: &[(usize, u32, u32)],
        players: &[(usize, u32, u32)],
    ) -> (GameState, Vec<CardId>) {
        let mut settings = Settings::default();
        settings.setup.hand.clear();
        settings.setup.enemy_field = enemies
            .iter()
            .map(|&(slot, l, r)| EnemyPlacement {
                slot,
                attack: AttackPair::new(l, r),
            })
            .collect();
        let mut state = GameState::new(settings);

        let mut ids = Vec::new();
        for &(slot, l, r) in players {
            let id = state.next_card_id();
            let center = state.board.slots[slot].center;
            state.cards.push(Card::new(
                id,
                Owner::Player,
                Zone::Field { slot },
                center,
                CombatStats::new(l, r),
            ));
            state.board.slots[slot].occupant = Some(id);
            ids.push(id);
        }
        (state, ids)
    }

    fn run_until_idle(state: &mut GameState) {
        for _ in 0..1000 {
            if state.sequencer.is_idle() && state.lock.is_free() {
                return;
            }
            tick(state, crate::consts::SIM_DT_MS);
        }
        panic!("sequence never finished");
    }

    #[test]
    fn test_neighbor_bounds() {
        assert_eq!(Direction::Left.neighbor(0, 5), None);
        assert_eq!(Direction::Left.neighbor(3, 5), Some(2));
        assert_eq!(Direction::Right.neighbor(4, 5), None);
        assert_eq!(Direction::Right.neighbor(0, 5), Some(1));
    }

    #[test]
    fn test_attacker_wins_scenario() {
        // Attacker in slot 0 (right = 5) into defender in slot 1 (left = 3)
        let (mut state, ids) = board_with(&[(1, 3, 9)], &[(0, 1, 5)]);
        let attacker = ids[0];
        let defender = state.card_at_slot(1).expect("defender").id;

        let verdict = attack(&mut state, attacker, Direction::Right);
        let AttackVerdict::Resolved(outcome) = verdict else {
            panic!("expected a clash, got {:?}", verdict);
        };
        assert_eq!(outcome.result, ClashResult::AttackerWins);
        assert_eq!(outcome.destroyed, vec![defender]);
        assert!(state.lock.is_held());
        assert!(state.find_card(attacker).expect("attacker").combat.has_acted);

        run_until_idle(&mut state);
        assert!(state.card_raw(defender).is_none());
        assert!(state.find_card(attacker).is_some());
        assert_eq!(state.board.slots[1].occupant, None);
        assert_eq!(state.board.slots[0].occupant, Some(attacker));
    }

    #[test]
    fn test_trade_destroys_both() {
        let (mut state, ids) = board_with(&[(1, 4, 1)], &[(0, 1, 4)]);
        let attacker = ids[0];
        let defender = state.card_at_slot(1).expect("defender").id;

        let verdict = attack(&mut state, attacker, Direction::Right);
        assert!(matches!(
            verdict,
            AttackVerdict::Resolved(CombatOutcome {
                result: ClashResult::Trade,
                ..
            })
        ));

        run_until_idle(&mut state);
        assert!(state.card_raw(attacker).is_none());
        assert!(state.card_raw(defender).is_none());
        assert_eq!(state.board.slots[0].occupant, None);
        assert_eq!(state.board.slots[1].occupant, None);
    }

    #[test]
    fn test_defender_wins_attacking_left() {
        // Attacker in slot 2 swings left (2) into slot 1 whose right face is 6
        let (mut state, ids) = board_with(&[(1, 0, 6)], &[(2, 2, 9)]);
        let attacker = ids[0];

        let verdict = attack(&mut state, attacker, Direction::Left);
        let AttackVerdict::Resolved(outcome) = verdict else {
            panic!("expected a clash");
        };
        assert_eq!((outcome.attack, outcome.defense), (2, 6));
        assert_eq!(outcome.result, ClashResult::DefenderWins);

        // Acted flag is set even though the attacker is doomed
        assert!(state.find_card(attacker).expect("attacker").combat.has_acted);
        run_until_idle(&mut state);
        assert!(state.card_raw(attacker).is_none());
        assert_eq!(state.board.slots[2].occupant, None);
        assert!(state.card_at_slot(1).is_some());
    }

    #[test]
    fn test_already_acted_gives_feedback_only() {
        let (mut state, ids) = board_with(&[(1, 1, 1)], &[(0, 1, 5)]);
        let attacker = ids[0];
        state.find_card_mut(attacker).expect("card").combat.has_acted = true;
        let before: Vec<Card> = state.cards.clone();

        let verdict = attack(&mut state, attacker, Direction::Right);
        assert_eq!(verdict, AttackVerdict::AlreadyActed);
        assert!(state.lock.is_free());
        assert!(state.sequencer.is_idle());

        let card = state.find_card(attacker).expect("card");
        assert!(card.visual.shake.is_active(state.now_ms));
        assert!(card.visual.cross.is_active(state.now_ms));
        // No board mutation beyond the feedback timers
        assert_eq!(state.cards.len(), before.len());
        let enemy = before.iter().find(|c| c.owner == Owner::Enemy).map(|c| c.id);
        assert_eq!(state.board.slots[1].occupant, enemy);
    }

    #[test]
    fn test_inert_swipes() {
        // Friendly fire, empty lane and off-board are all silent
        let (mut state, ids) = board_with(&[], &[(0, 5, 5), (1, 1, 1)]);
        assert_eq!(attack(&mut state, ids[0], Direction::Right), AttackVerdict::Inert);
        assert_eq!(attack(&mut state, ids[1], Direction::Right), AttackVerdict::Inert);
        assert_eq!(attack(&mut state, ids[0], Direction::Left), AttackVerdict::Inert);
        assert!(state.lock.is_free());
        assert!(state.cards.iter().all(|c| !c.combat.has_acted));
        assert!(state.cards.iter().all(|c| !c.visual.shake.is_active(state.now_ms)));
    }

    #[test]
    fn test_preconditions_are_silent() {
        let (mut state, ids) = board_with(&[(1, 1, 1), (3, 1, 1)], &[(0, 9, 9)]);

        // Hand cards cannot attack
        let mut settings = Settings::default();
        settings.setup.enemy_field.clear();
        let hand_state = GameState::new(settings);
        let hand_card = hand_state.hand(Owner::Player)[0].id;
        assert_eq!(
            resolve_attack(&hand_state, hand_card, Direction::Right),
            AttackVerdict::Inert
        );

        // Enemy cards cannot be driven by the player
        let enemy = state.card_at_slot(3).expect("enemy").id;
        assert_eq!(attack(&mut state, enemy, Direction::Left), AttackVerdict::Inert);

        // Locked board
        state.lock = InteractionLock::Combat;
        assert_eq!(attack(&mut state, ids[0], Direction::Right), AttackVerdict::Inert);
        assert!(!state.find_card(ids[0]).expect("card").combat.has_acted);
    }

    proptest! {
        #[test]
        fn prop_clash_table(attack_value in 0u32..20, defense_value in 0u32..20) {
            let (state, ids) = board_with(&[(2, defense_value, 0)], &[(1, 0, attack_value)]);
            let defender = state.card_at_slot(2).map(|c| c.id).unwrap_or_default();
            let verdict = resolve_attack(&state, ids[0], Direction::Right);
            let AttackVerdict::Resolved(outcome) = verdict else {
                return Err(TestCaseError::fail("expected a clash"));
            };
            let expected = if attack_value > defense_value {
                vec![defender]
            } else if attack_value < defense_value {
                vec![ids[0]]
            } else {
                vec![ids[0], defender]
            };
            prop_assert_eq!(outcome.destroyed, expected);
        }

        #[test]
        fn prop_attack_always_marks_acted(attack_value in 0u32..10, defense_value in 0u32..10) {
            let (mut state, ids) = board_with(&[(3, 0, defense_value)], &[(4, attack_value, 0)]);
            let verdict = attack(&mut state, ids[0], Direction::Left);
            prop_assert!(matches!(verdict, AttackVerdict::Resolved(_)));
            prop_assert!(state.find_card(ids[0]).map(|c| c.combat.has_acted).unwrap_or(false));
            prop_assert!(state.lock.is_held());
        }
    }
}

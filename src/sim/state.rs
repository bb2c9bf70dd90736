//! Game state and core entity types
//!
//! Cards, slots and everything the interaction core mutates live here.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::anim::{MoveAnimation, TimedFlag};
use super::combat::ClashResult;
use super::gesture::InteractionSession;
use super::rect::Rect;
use super::sequencer::{InteractionLock, Sequencer};
use crate::settings::{AttackPair, Settings};

/// Stable card identity (never reused while the process runs)
pub type CardId = u32;

/// Which side a card fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Owner {
    Player,
    Enemy,
}

/// Board region a card belongs to, with its position inside that region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Zone {
    Hand { index: usize },
    Field { slot: usize },
}

impl Zone {
    pub fn hand_index(&self) -> Option<usize> {
        match *self {
            Zone::Hand { index } => Some(index),
            Zone::Field { .. } => None,
        }
    }

    pub fn field_slot(&self) -> Option<usize> {
        match *self {
            Zone::Field { slot } => Some(slot),
            Zone::Hand { .. } => None,
        }
    }

    pub fn is_hand(&self) -> bool {
        matches!(self, Zone::Hand { .. })
    }

    pub fn is_field(&self) -> bool {
        matches!(self, Zone::Field { .. })
    }
}

/// Directional attack values plus the once-per-turn flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatStats {
    pub attack_left: u32,
    pub attack_right: u32,
    /// Cleared by whoever owns turn flow; this crate only reads and sets it
    pub has_acted: bool,
}

impl CombatStats {
    pub fn new(attack_left: u32, attack_right: u32) -> Self {
        Self {
            attack_left,
            attack_right,
            has_acted: false,
        }
    }
}

impl From<AttackPair> for CombatStats {
    fn from(pair: AttackPair) -> Self {
        Self::new(pair.left, pair.right)
    }
}

/// Card is logically dead and fading out
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Removal {
    pub started_ms: f64,
    pub deadline_ms: f64,
}

impl Removal {
    /// Fade progress in [0, 1]
    pub fn progress(&self, now_ms: f64) -> f32 {
        let span = self.deadline_ms - self.started_ms;
        if span <= 0.0 {
            return 1.0;
        }
        ((now_ms - self.started_ms) / span).clamp(0.0, 1.0) as f32
    }
}

/// Presentation-only flags. Written by the animation engine and the
/// sequencer; gestures only touch `dragging`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct VisualState {
    pub dragging: bool,
    pub anim: Option<MoveAnimation>,
    pub shake: TimedFlag,
    pub hit_flash: TimedFlag,
    pub cross: TimedFlag,
    pub removal: Option<Removal>,
}

/// A card entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: CardId,
    pub owner: Owner,
    pub zone: Zone,
    /// Render coordinate (card center), independent of the logical slot
    pub pos: Vec2,
    pub combat: CombatStats,
    pub visual: VisualState,
}

impl Card {
    pub fn new(id: CardId, owner: Owner, zone: Zone, pos: Vec2, combat: CombatStats) -> Self {
        Self {
            id,
            owner,
            zone,
            pos,
            combat,
            visual: VisualState::default(),
        }
    }

    /// Doomed cards stay in the collection until their deadline but are
    /// invisible to lookups, targeting and hit-testing
    #[inline]
    pub fn is_pending_removal(&self) -> bool {
        self.visual.removal.is_some()
    }

    #[inline]
    pub fn is_live(&self) -> bool {
        !self.is_pending_removal()
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.visual.anim.is_some()
    }

    /// Hit region at the current render position
    pub fn bounds(&self, card_size: Vec2) -> Rect {
        Rect::from_center(self.pos, card_size)
    }
}

/// A fixed lane position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slot {
    pub index: usize,
    pub center: Vec2,
    /// Back-reference to the card sitting here
    pub occupant: Option<CardId>,
}

/// Ordered lane of slots; slot i neighbors i-1 and i+1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Board {
    pub slots: Vec<Slot>,
    pub slot_size: Vec2,
}

impl Board {
    pub fn new(settings: &Settings) -> Self {
        let geometry = &settings.geometry;
        let slots = (0..geometry.slot_count)
            .map(|index| Slot {
                index,
                center: geometry.slot_center(index),
                occupant: None,
            })
            .collect();
        Self {
            slots,
            slot_size: geometry.slot_size,
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn slot(&self, index: usize) -> Option<&Slot> {
        self.slots.get(index)
    }

    pub fn slot_bounds(&self, index: usize) -> Option<Rect> {
        self.slot(index)
            .map(|s| Rect::from_center(s.center, self.slot_size))
    }

    /// Clear every slot that points at `card`
    pub fn vacate(&mut self, card: CardId) {
        for slot in &mut self.slots {
            if slot.occupant == Some(card) {
                slot.occupant = None;
            }
        }
    }
}

/// Something presenters may want to react to (sound, HUD); never drives state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// Board rebuilt from the initial setup
    Reset,
    /// Drag started on a hand card
    CardPicked { card: CardId },
    /// Placement animation finished
    CardPlaced { card: CardId, slot: usize },
    /// Failed drop finished sliding back
    CardReturned { card: CardId },
    /// Swipe on a card that already acted this turn
    AttackRejected { card: CardId },
    /// Clash resolved (destruction still pending)
    AttackResolved {
        attacker: CardId,
        defender: CardId,
        result: ClashResult,
    },
    /// Card entered its fade-out window
    CardDestroyed { card: CardId },
    /// Destruction sequence done, lock released
    SequenceFinished,
}

/// Complete interaction state
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    /// Sim clock, advanced only by `tick`
    pub now_ms: f64,
    /// All cards, including pending removals (sorted by id)
    pub cards: Vec<Card>,
    pub board: Board,
    pub lock: InteractionLock,
    pub session: Option<InteractionSession>,
    pub sequencer: Sequencer,
    events: Vec<GameEvent>,
    /// Next card ID
    next_id: CardId,
}

impl GameState {
    /// Create a game with the initial layout already dealt
    pub fn new(settings: Settings) -> Self {
        let board = Board::new(&settings);
        let mut state = Self {
            settings,
            now_ms: 0.0,
            cards: Vec::new(),
            board,
            lock: InteractionLock::Free,
            session: None,
            sequencer: Sequencer::Idle,
            events: Vec::new(),
            next_id: 1,
        };
        state.reset();
        state
    }

    /// Allocate a new card ID
    pub fn next_card_id(&mut self) -> CardId {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Synchronously replace every card with the configured initial layout
    /// and drop any lock, session or sequence in flight
    pub fn reset(&mut self) {
        self.cards.clear();
        for slot in &mut self.board.slots {
            slot.occupant = None;
        }
        self.lock = InteractionLock::Free;
        self.session = None;
        self.sequencer = Sequencer::Idle;

        let geometry = self.settings.geometry;
        let hand = self.settings.setup.hand.clone();
        let enemy_field = self.settings.setup.enemy_field.clone();

        for (index, pair) in hand.iter().enumerate() {
            let id = self.next_card_id();
            self.cards.push(Card::new(
                id,
                Owner::Player,
                Zone::Hand { index },
                geometry.hand_position(index, hand.len()),
                (*pair).into(),
            ));
        }

        for placement in &enemy_field {
            let Some(center) = self.board.slot(placement.slot).map(|s| s.center) else {
                log::warn!("Skipping enemy card for missing slot {}", placement.slot);
                continue;
            };
            if self.board.slots[placement.slot].occupant.is_some() {
                log::warn!("Skipping enemy card for taken slot {}", placement.slot);
                continue;
            }
            let id = self.next_card_id();
            self.cards.push(Card::new(
                id,
                Owner::Enemy,
                Zone::Field {
                    slot: placement.slot,
                },
                center,
                placement.attack.into(),
            ));
            self.board.slots[placement.slot].occupant = Some(id);
        }

        log::info!(
            "Board reset: {} hand cards, {} enemy field cards",
            hand.len(),
            self.cards.len() - hand.len()
        );
        self.push_event(GameEvent::Reset);
    }

    /// Live card by id
    pub fn find_card(&self, id: CardId) -> Option<&Card> {
        self.card_raw(id).filter(|c| c.is_live())
    }

    pub fn find_card_mut(&mut self, id: CardId) -> Option<&mut Card> {
        self.card_raw_mut(id).filter(|c| c.is_live())
    }

    /// Card by id, pending removal or not
    pub fn card_raw(&self, id: CardId) -> Option<&Card> {
        self.cards
            .binary_search_by_key(&id, |c| c.id)
            .ok()
            .map(|i| &self.cards[i])
    }

    pub fn card_raw_mut(&mut self, id: CardId) -> Option<&mut Card> {
        match self.cards.binary_search_by_key(&id, |c| c.id) {
            Ok(i) => Some(&mut self.cards[i]),
            Err(_) => None,
        }
    }

    /// Live occupant of a slot; a stale back-reference resolves to None
    pub fn card_at_slot(&self, slot: usize) -> Option<&Card> {
        let id = self.board.slot(slot)?.occupant?;
        self.find_card(id)
            .filter(|c| c.zone.field_slot() == Some(slot))
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events raised since the last drain
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Cards in hand, ordered by hand index
    pub fn hand(&self, owner: Owner) -> Vec<&Card> {
        let mut cards: Vec<&Card> = self
            .cards
            .iter()
            .filter(|c| c.is_live() && c.owner == owner && c.zone.is_hand())
            .collect();
        cards.sort_by_key(|c| c.zone.hand_index());
        cards
    }

    /// Live cards on the field for one side
    pub fn field(&self, owner: Owner) -> Vec<&Card> {
        self.cards
            .iter()
            .filter(|c| c.is_live() && c.owner == owner && c.zone.is_field())
            .collect()
    }
}

use crate::{FIRST_ROUND_PAIRINGS, RoundKind, SEEDS_PER_REGION};

/// Where a game participant comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Feed {
    /// Index into the field's slot list.
    Slot(usize),
    /// Index of an earlier game in the template (its winner advances).
    Winner(usize),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GameSlot {
    pub unique_game_id: u32,
    pub game_id: u32,
    pub round: RoundKind,
    /// Index into the field's region list; `None` once regions merge.
    pub region: Option<usize>,
    pub feeds: [Feed; 2],
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct BracketTemplate {
    games: Vec<GameSlot>,
}

impl BracketTemplate {
    /// Lay out all games for `region_count` regions. Unique IDs run from 1 in
    /// round order, regions in field order within a round, top to bottom
    /// within a region. Field slots are expected region-major in
    /// `FIRST_ROUND_PAIRINGS` order.
    pub fn new(region_count: usize) -> Self {
        let mut games: Vec<GameSlot> = Vec::with_capacity(region_count * 16);
        let per_region = usize::from(SEEDS_PER_REGION);

        for region in 0..region_count {
            for pair in 0..FIRST_ROUND_PAIRINGS.len() {
                let base = region * per_region + pair * 2;
                push_game(
                    &mut games,
                    RoundKind::First,
                    Some(region),
                    [Feed::Slot(base), Feed::Slot(base + 1)],
                );
            }
        }

        let mut previous: Vec<usize> = (0..games.len()).collect();
        let mut round = RoundKind::First;
        while let Some(next) = round.next() {
            if previous.len() < 2 {
                break;
            }
            let mut current = Vec::with_capacity(previous.len() / 2);
            for pair in previous.chunks_exact(2) {
                let (top, bottom) = (pair[0], pair[1]);
                let region = if next.is_final_four() {
                    None
                } else {
                    games[top].region.filter(|&r| games[bottom].region == Some(r))
                };
                current.push(games.len());
                push_game(&mut games, next, region, [Feed::Winner(top), Feed::Winner(bottom)]);
            }
            previous = current;
            round = next;
        }

        Self { games }
    }

    pub fn games(&self) -> &[GameSlot] {
        &self.games
    }

    pub fn round(&self, kind: RoundKind) -> impl Iterator<Item = (usize, &GameSlot)> {
        self.games.iter().enumerate().filter(move |(_, g)| g.round == kind)
    }
}

fn push_game(games: &mut Vec<GameSlot>, round: RoundKind, region: Option<usize>, feeds: [Feed; 2]) {
    let game_id = games.iter().filter(|g| g.round == round).count() as u32 + 1;
    let unique_game_id = games.len() as u32 + 1;
    games.push(GameSlot { unique_game_id, game_id, round, region, feeds });
}

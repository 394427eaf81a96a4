use super::cards::Rank;
use super::deal::{Deal, DealResult};
use super::rules::{advance_level, starting_level, terminal_level, team_of, Team};

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum MatchStatus {
    Waiting,
    Playing,
    Finished,
}

/// The whole match's progress once it ends: which team took it, and at what
/// level (always `terminal_level()` by construction, kept explicit for the
/// wire payload).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct MatchResult {
    pub winning_team: Team,
    pub final_level: Rank,
    pub deals_played: usize,
}

/// A full match: a running sequence of deals, each advancing one team's
/// level, until a team wins a deal while already at the terminal level.
#[derive(Debug, Clone)]
pub struct Match {
    pub id: u64,
    pub status: MatchStatus,
    pub team_levels: [Rank; 2],
    pub deal_history: Vec<DealResult>,
    pub current_deal: Option<Deal>,
    next_deal_id: u64,
}

impl Match {
    pub fn new(id: u64) -> Match {
        Match {
            id,
            status: MatchStatus::Waiting,
            team_levels: [starting_level(), starting_level()],
            deal_history: Vec::new(),
            current_deal: None,
            next_deal_id: 1,
        }
    }

    fn level_index(team: Team) -> usize {
        match team {
            Team::A => 0,
            Team::B => 1,
        }
    }

    pub fn level_of(&self, team: Team) -> Rank {
        self.team_levels[Self::level_index(team)]
    }

    /// Start (or restart) the current deal at the defending team's level,
    /// with `seed` driving the deterministic shuffle.
    pub fn start_deal(&mut self, seed: u64) {
        let previous_rankings = self.deal_history.last().map(|r| r.rankings);
        let level = match &previous_rankings {
            None => starting_level(),
            Some(rankings) => self.level_of(team_of(rankings[0])),
        };
        let deal = Deal::new(self.next_deal_id, level, seed, previous_rankings);
        self.next_deal_id += 1;
        self.current_deal = Some(deal);
        self.status = MatchStatus::Playing;
    }

    /// Called once `current_deal.is_finished()`: records the result, advances
    /// the winning team's level, and flips the match to `Finished` once a
    /// team takes a deal at the terminal level.
    pub fn finish_current_deal(&mut self) -> Option<DealResult> {
        let deal = self.current_deal.take()?;
        let result = deal.result()?;

        let idx = Self::level_index(result.winning_team);
        let won_match = self.team_levels[idx] == terminal_level();
        self.team_levels[idx] = advance_level(self.team_levels[idx], result.upgrades);

        self.deal_history.push(result.clone());

        if won_match {
            self.status = MatchStatus::Finished;
        }
        Some(result)
    }

    pub fn is_finished(&self) -> bool {
        self.status == MatchStatus::Finished
    }

    pub fn result(&self) -> Option<MatchResult> {
        if !self.is_finished() {
            return None;
        }
        let last = self.deal_history.last()?;
        Some(MatchResult {
            winning_team: last.winning_team,
            final_level: self.level_of(last.winning_team),
            deals_played: self.deal_history.len(),
        })
    }
}

use serde::Serialize;

use crate::quiz::models::VoteResponse;

/// Vote counts per option for one question. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tally {
    question_index: usize,
    counts: Vec<u32>,
    total: u32,
}

impl Tally {
    pub fn empty(question_index: usize, option_count: usize) -> Self {
        Self {
            question_index,
            counts: vec![0; option_count],
            total: 0,
        }
    }

    /// Linear scan over the rows. Votes for another question or for an option
    /// outside `0..option_count` are not counted.
    pub fn from_responses<'a, I>(question_index: usize, option_count: usize, responses: I) -> Self
    where
        I: IntoIterator<Item = &'a VoteResponse>,
    {
        let mut tally = Self::empty(question_index, option_count);
        for vote in responses {
            if vote.question_index != question_index {
                continue;
            }
            if let Some(count) = tally.counts.get_mut(vote.answer) {
                *count += 1;
                tally.total += 1;
            }
        }
        tally
    }

    pub fn question_index(&self) -> usize {
        self.question_index
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn count(&self, option: usize) -> u32 {
        self.counts.get(option).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    /// Share of the votes, rounded half up. Zero when nobody voted.
    pub fn percentage(&self, option: usize) -> u32 {
        if self.total == 0 {
            return 0;
        }
        (self.count(option) * 100 + self.total / 2) / self.total
    }

    /// Bar length relative to the leading option.
    pub fn bar_width(&self, option: usize) -> u32 {
        if self.total == 0 {
            return 0;
        }
        let max = self.counts.iter().copied().max().unwrap_or(0).max(1);
        self.count(option) * 100 / max
    }

    pub fn votes_label(&self) -> String {
        match self.total {
            1 => "1 vote".to_string(),
            n => format!("{} votes", n),
        }
    }
}

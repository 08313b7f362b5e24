// crates/storyreel-core/src/stages.rs
//
// Stage Grouper: ordered cards → ordered stage buckets.
//
//   - Stage order is first-seen order over the feed.
//   - Card order inside a stage is feed order.
//   - A card with no stage key, or with a key outside the accepted set, goes
//     to the terminal stage.
//   - Pre-declared stages with no cards are appended (in declared order) so a
//     page section without items still gets a bucket.

use serde::{Deserialize, Serialize};

use crate::media_types::CardViewModel;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub key:   String,
    /// Position in stage order (0 = first section on the page).
    pub index: usize,
    pub cards: Vec<CardViewModel>,
}

pub struct StageGrouper {
    terminal: String,
    /// `None` accepts any non-empty key.
    accepted: Option<Vec<String>>,
    declared: Vec<String>,
}

impl StageGrouper {
    pub fn new(terminal: impl Into<String>) -> Self {
        Self { terminal: terminal.into(), accepted: None, declared: Vec::new() }
    }

    /// Restrict keys to `keys`; anything else falls to the terminal stage.
    pub fn with_accepted<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.accepted = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    /// Stages that exist on the page whether or not any card lands in them.
    pub fn with_declared<I, K>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<String>,
    {
        self.declared = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn terminal(&self) -> &str {
        &self.terminal
    }

    /// Effective stage key for a card.
    pub fn resolve<'a>(&'a self, card: &'a CardViewModel) -> &'a str {
        match card.stage.as_deref() {
            Some(key) if key == self.terminal => key,
            Some(key) => match &self.accepted {
                Some(accepted) if !accepted.iter().any(|k| k == key) => {
                    tracing::debug!(index = card.index, key, terminal = %self.terminal, "unknown stage key");
                    &self.terminal
                }
                _ => key,
            },
            None => &self.terminal,
        }
    }

    pub fn group(&self, cards: Vec<CardViewModel>) -> Vec<Stage> {
        let mut stages: Vec<Stage> = Vec::new();

        for card in cards {
            let key = self.resolve(&card).to_string();
            match stages.iter_mut().find(|s| s.key == key) {
                Some(stage) => stage.cards.push(card),
                None => stages.push(Stage {
                    index: stages.len(),
                    key,
                    cards: vec![card],
                }),
            }
        }

        for key in &self.declared {
            if !stages.iter().any(|s| &s.key == key) {
                stages.push(Stage {
                    key:   key.clone(),
                    index: stages.len(),
                    cards: Vec::new(),
                });
            }
        }
        stages
    }
}

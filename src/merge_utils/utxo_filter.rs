use crate::actions::Utxo;
use crate::merge_utils::selection_parser::SelectionItem;
use std::collections::HashSet;
use std::fmt;

/// Fewest outputs worth consolidating.
pub const MIN_MERGE_UTXOS: usize = 2;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionWarning {
    IncorrectIndex(String),
    Duplicate(usize),
    OutOfRange(usize),
    NotMature(usize),
}

impl fmt::Display for SelectionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectionWarning::IncorrectIndex(token) => {
                write!(f, "Ignored: Incorrect index {}", token)
            }
            SelectionWarning::Duplicate(index) => write!(f, "Ignored: Duplicate index {}", index),
            SelectionWarning::OutOfRange(index) => {
                write!(f, "Ignored: Index out of range {}", index)
            }
            SelectionWarning::NotMature(index) => write!(f, "Ignored: UTXO[{}] not mature", index),
        }
    }
}

/// Checks selected indices against one listing snapshot and the block count taken with it.
pub struct UtxoFilter<'a> {
    listing: &'a [Utxo],
    current_height: u64,
}

#[derive(Debug, Default)]
pub struct FilterOutcome {
    pub accepted: Vec<usize>,
    pub rejected: usize,
}

impl<'a> UtxoFilter<'a> {
    pub fn new(listing: &'a [Utxo], current_height: u64) -> Self {
        Self {
            listing,
            current_height,
        }
    }

    /// Walks the selection once, handing every rejection to `on_warning` as it happens.
    pub fn apply<I, F>(&self, selection: I, mut on_warning: F) -> FilterOutcome
    where
        I: IntoIterator<Item = SelectionItem>,
        F: FnMut(SelectionWarning),
    {
        let mut seen = HashSet::<usize>::new();
        let mut outcome = FilterOutcome::default();

        for item in selection {
            let warning = match item {
                SelectionItem::Invalid(token) => SelectionWarning::IncorrectIndex(token),
                SelectionItem::Index(index) if seen.contains(&index) => {
                    SelectionWarning::Duplicate(index)
                }
                SelectionItem::Index(index) => match self.listing.get(index) {
                    None => SelectionWarning::OutOfRange(index),
                    Some(utxo) if !utxo.is_mature(self.current_height) => {
                        SelectionWarning::NotMature(index)
                    }
                    Some(_) => {
                        seen.insert(index);
                        outcome.accepted.push(index);
                        continue;
                    }
                },
            };
            tracing::debug!("{}", warning);
            outcome.rejected += 1;
            on_warning(warning);
        }

        outcome
    }

    pub fn merge_set(&self, outcome: &FilterOutcome) -> Vec<Utxo> {
        outcome
            .accepted
            .iter()
            .filter_map(|index| self.listing.get(*index).cloned())
            .collect()
    }
}

impl FilterOutcome {
    pub fn is_mergeable(&self) -> bool {
        self.accepted.len() >= MIN_MERGE_UTXOS
    }
}

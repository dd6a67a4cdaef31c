use itertools::Either;
use std::ops::{Range, RangeInclusive};
use std::str::Split;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectionItem {
    Index(usize),
    /// Token that is neither an index, a range nor `all`.
    Invalid(String),
}

/// Lazily expands a selection such as `1,3,5-8` or `all` into listing indices.
///
/// Tokens are split on `,` and trimmed; empty tokens are skipped. `all` (any case)
/// yields the whole universe in order and ends parsing, so nothing after it is read.
/// A range `a-b` yields `a..=b`; a reversed range is reported as invalid.
pub struct SelectionParser<'a> {
    tokens: Split<'a, char>,
    universe: Range<usize>,
    pending: Option<Either<Range<usize>, RangeInclusive<usize>>>,
    finished: bool,
}

impl<'a> SelectionParser<'a> {
    pub fn new(selection: &'a str, universe: Range<usize>) -> Self {
        Self {
            tokens: selection.split(','),
            universe,
            pending: None,
            finished: false,
        }
    }

    fn next_token(&mut self) -> Option<SelectionItem> {
        while !self.finished {
            let token = match self.tokens.next() {
                Some(token) => token.trim(),
                None => {
                    self.finished = true;
                    break;
                }
            };

            if token.is_empty() {
                continue;
            }
            if token.eq_ignore_ascii_case("all") {
                self.finished = true;
                self.pending = Some(Either::Left(self.universe.clone()));
                return None;
            }
            if let Some((start, end)) = token.split_once('-') {
                match (parse_index(start), parse_index(end)) {
                    (Some(start), Some(end)) if start <= end => {
                        self.pending = Some(Either::Right(start..=end));
                        return None;
                    }
                    _ => return Some(SelectionItem::Invalid(token.to_string())),
                }
            }
            return Some(match parse_index(token) {
                Some(index) => SelectionItem::Index(index),
                None => SelectionItem::Invalid(token.to_string()),
            });
        }
        None
    }
}

impl<'a> Iterator for SelectionParser<'a> {
    type Item = SelectionItem;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(pending) = self.pending.as_mut() {
                match pending.next() {
                    Some(index) => return Some(SelectionItem::Index(index)),
                    None => self.pending = None,
                }
            }
            if let Some(item) = self.next_token() {
                return Some(item);
            }
            if self.pending.is_none() && self.finished {
                return None;
            }
        }
    }
}

fn parse_index(token: &str) -> Option<usize> {
    if token.is_empty() || !token.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    token.parse().ok()
}

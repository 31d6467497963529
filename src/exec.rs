//! Execution engine bits.

use crate::api::Match;

/// A trait for producing successive matches in a haystack.
/// This is broken out from the searcher so iteration does not need to know
/// how attempts are scheduled.
pub trait MatchProducer {
    /// Attempt to find a match at or after \p pos.
    /// \return the Match, storing into \p next_start the position where the
    /// search for the following match should resume, or None on failure.
    fn next_match(&mut self, pos: usize, next_start: &mut Option<usize>) -> Option<Match>;
}

/// An iterator over the non-overlapping matches in a haystack.
#[derive(Debug)]
pub struct Matches<Producer: MatchProducer> {
    producer: Producer,
    offset: Option<usize>,
}

impl<Producer: MatchProducer> Matches<Producer> {
    pub(crate) fn new(producer: Producer, start: usize) -> Self {
        Matches {
            producer,
            offset: Some(start),
        }
    }
}

impl<Producer: MatchProducer> Iterator for Matches<Producer> {
    type Item = Match;

    fn next(&mut self) -> Option<Match> {
        let start = self.offset?;
        self.offset = None;
        self.producer.next_match(start, &mut self.offset)
    }
}

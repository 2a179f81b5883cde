//! A forward-only cursor over the source lines.
use std::collections::VecDeque;
use super::lexer::Line;

pub struct SourceCursor {
    lines: VecDeque<Line>,
}

impl SourceCursor {
    pub fn new<I: IntoIterator<Item = Line>>(lines: I) -> Self {
        SourceCursor { lines: lines.into_iter().collect() }
    }

    /// Pops the next line off the input.
    /// Returns None once every line has been consumed.
    #[inline]
    pub fn consume(&mut self) -> Option<Line> {
        self.lines.pop_front()
    }

    /// Skips blank lines, then consumes and returns the first non-blank one.
    /// The cursor is left at end of input if no such line exists.
    pub fn next_nonblank(&mut self) -> Option<Line> {
        while let Some(line) = self.consume() {
            if !line.is_blank() {
                return Some(line);
            }
            trace!("skipping blank line {}", line.number);
        }
        None
    }

    pub fn remaining(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

use crate::filter::VisibleRow;

/// Which visible row the cursor is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// No rows are visible.
    Empty,
    /// Index into the visible rows, always in range.
    At { index: usize, count: usize },
}

impl Selection {
    /// Start on the first row, if any.
    pub fn new(count: usize) -> Self {
        if count == 0 {
            Selection::Empty
        } else {
            Selection::At { index: 0, count }
        }
    }

    pub fn index(self) -> Option<usize> {
        match self {
            Selection::Empty => None,
            Selection::At { index, .. } => Some(index),
        }
    }

    /// Move by `delta` rows, wrapping around both ends.
    pub fn navigate(&mut self, delta: isize) {
        if let Selection::At { index, count } = self {
            let count_i = *count as isize;
            *index = (*index as isize + delta).rem_euclid(count_i) as usize;
        }
    }

    pub fn first(&mut self) {
        if let Selection::At { index, .. } = self {
            *index = 0;
        }
    }

    pub fn last(&mut self) {
        if let Selection::At { index, count } = self {
            *index = *count - 1;
        }
    }

    /// Re-target after the visible rows changed. The cursor follows the row
    /// it was on when that row is still shown; otherwise it goes back to the
    /// top.
    pub fn refilter(&mut self, previous: &[VisibleRow], next: &[VisibleRow]) {
        let selected = self.index().and_then(|i| previous.get(i));
        let followed = selected.and_then(|row| {
            next.iter()
                .position(|candidate| candidate.values() == row.values())
        });
        *self = match followed {
            Some(index) => Selection::At {
                index,
                count: next.len(),
            },
            None => Selection::new(next.len()),
        };
    }
}

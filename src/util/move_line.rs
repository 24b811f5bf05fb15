use serde::{Deserialize, Serialize};

/// New position of line `current` after a contiguous block of `length`
/// lines moves.
///
/// - `from = None`: `length` lines are inserted so the first new line is `to`.
/// - `to = None`: the `length` lines starting at `from` are deleted; a line
///   inside the deleted block maps to `None`.
/// - both set: the block starting at `from` moves so it starts at `to`
///   (positions in the resulting text), and the lines it jumps over close
///   the gap.
pub fn move_line(
    current: usize,
    from: Option<usize>,
    to: Option<usize>,
    length: usize,
) -> Option<usize> {
    match (from, to) {
        (None, None) => Some(current),
        (None, Some(to)) => {
            if current >= to {
                Some(current + length)
            } else {
                Some(current)
            }
        }
        (Some(from), None) => {
            if current < from {
                Some(current)
            } else if current < from + length {
                None
            } else {
                Some(current - length)
            }
        }
        (Some(from), Some(to)) => {
            if current >= from && current < from + length {
                Some(current + to - from)
            } else if to > from && current >= from + length && current < to + length {
                Some(current - length)
            } else if to < from && current >= to && current < from {
                Some(current + length)
            } else {
                Some(current)
            }
        }
    }
}

/// A structural edit expressed in [`move_line`] terms, so every
/// line-indexed record can follow the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineMove {
    pub from: Option<usize>,
    pub to: Option<usize>,
    pub length: usize,
}

impl LineMove {
    pub fn insert(at: usize, length: usize) -> Self {
        LineMove {
            from: None,
            to: Some(at),
            length,
        }
    }

    pub fn delete(from: usize, length: usize) -> Self {
        LineMove {
            from: Some(from),
            to: None,
            length,
        }
    }

    pub fn moved(from: usize, to: usize, length: usize) -> Self {
        LineMove {
            from: Some(from),
            to: Some(to),
            length,
        }
    }

    pub fn apply(&self, current: usize) -> Option<usize> {
        move_line(current, self.from, self.to, self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_moves() {
        assert_eq!(move_line(1, Some(1), Some(2), 1), Some(2));
        assert_eq!(move_line(2, Some(1), Some(2), 1), Some(1));
        assert_eq!(move_line(3, Some(1), Some(2), 1), Some(3));
        assert_eq!(move_line(2, Some(2), Some(1), 1), Some(1));
        assert_eq!(move_line(1, Some(2), Some(1), 1), Some(2));
    }

    #[test]
    fn test_insertion() {
        assert_eq!(move_line(1, None, Some(1), 1), Some(2));
        assert_eq!(move_line(1, None, Some(2), 1), Some(1));
        assert_eq!(move_line(5, None, Some(2), 3), Some(8));
    }

    #[test]
    fn test_deletion() {
        assert_eq!(move_line(2, Some(1), None, 1), Some(1));
        assert_eq!(move_line(1, Some(1), None, 1), None);
        assert_eq!(move_line(1, Some(2), None, 2), Some(1));
        assert_eq!(move_line(3, Some(2), None, 2), None);
        assert_eq!(move_line(4, Some(2), None, 2), Some(2));
    }

    #[test]
    fn test_block_move_down() {
        // lines 2..=3 move so they start at line 4 (of 6)
        let moved: Vec<Option<usize>> = (1..=6).map(|c| move_line(c, Some(2), Some(4), 2)).collect();
        assert_eq!(
            moved,
            vec![Some(1), Some(4), Some(5), Some(2), Some(3), Some(6)]
        );
    }

    #[test]
    fn test_block_move_up() {
        // lines 4..=5 move so they start at line 1
        let moved: Vec<Option<usize>> = (1..=6).map(|c| move_line(c, Some(4), Some(1), 2)).collect();
        assert_eq!(
            moved,
            vec![Some(3), Some(4), Some(5), Some(1), Some(2), Some(6)]
        );
    }

    #[test]
    fn test_move_is_a_permutation() {
        for len in 1..=3 {
            for from in 1..=(7 - len) {
                for to in 1..=(7 - len) {
                    let mut seen: Vec<usize> = (1..=6)
                        .filter_map(|c| move_line(c, Some(from), Some(to), len))
                        .collect();
                    seen.sort();
                    assert_eq!(seen, (1..=6).collect::<Vec<_>>(), "from={from} to={to} len={len}");
                }
            }
        }
    }

    #[test]
    fn test_no_op() {
        assert_eq!(move_line(3, None, None, 1), Some(3));
        assert_eq!(move_line(3, Some(3), Some(3), 1), Some(3));
    }

    #[test]
    fn test_line_move_apply() {
        assert_eq!(LineMove::insert(2, 1).apply(2), Some(3));
        assert_eq!(LineMove::delete(2, 1).apply(2), None);
        assert_eq!(LineMove::moved(1, 2, 1).apply(1), Some(2));
    }
}

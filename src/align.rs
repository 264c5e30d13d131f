use crate::Weight;
use arrayvec::ArrayVec;
use pathfinding::matrix::Matrix;
use std::iter;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
enum Move {
    Start,
    Pair,
    Delete,
    Insert,
}

/// One step of an optimal alignment between two sibling sequences.
#[derive(Debug, Clone, Eq, PartialEq)]
pub(crate) enum Step<R> {
    /// Compare the `i`-th element on the left with the `j`-th on the right.
    Pair(usize, usize, R),

    /// Delete the `i`-th element on the left along with its descendants.
    Delete(usize),

    /// Insert the `j`-th element on the right along with its descendants.
    Insert(usize),
}

/// An order-preserving alignment of two sequences, filled one cell at a time.
///
/// Cells are filled in row-major order. Whenever a cell needs the distance between two
/// elements, [advance][Alignment::advance] hands the pair back to the caller, who must
/// [resolve][Alignment::resolve] it before the table can grow any further. This lets the
/// distance come from a recursive call just as well as from an explicit stack of frames.
#[derive(Debug)]
pub(crate) struct Alignment<W, R> {
    table: Matrix<(W, Move)>,
    outcomes: Vec<Option<R>>,
    delete: Box<[W]>,
    insert: Box<[W]>,
    filled: usize,
}

impl<W: Weight, R> Alignment<W, R> {
    /// Starts aligning sequences whose elements cost `delete` and `insert` to drop or add whole.
    pub(crate) fn new(delete: Box<[W]>, insert: Box<[W]>) -> Self {
        let (m, n) = (delete.len(), insert.len());

        Alignment {
            table: Matrix::new(m + 1, n + 1, (W::default(), Move::Start)),
            outcomes: iter::repeat_with(|| None).take(m * n).collect(),
            delete,
            insert,
            filled: 0,
        }
    }

    fn cursor(&self) -> (usize, usize) {
        (self.filled / self.table.columns, self.filled % self.table.columns)
    }

    /// Fills every cell that needs no pairwise distance and returns the indices of the next
    /// pair of elements whose distance is needed, if any.
    pub(crate) fn advance(&mut self) -> Option<(usize, usize)> {
        while self.filled < self.table.rows * self.table.columns {
            match self.cursor() {
                (i, j) if i > 0 && j > 0 => return Some((i - 1, j - 1)),
                (i, j) => self.fill(i, j, None),
            }
        }

        None
    }

    /// Provides the distance between the pair last returned by [advance][Alignment::advance],
    /// along with whatever the caller wants back if that pair ends up in the optimal alignment.
    pub(crate) fn resolve(&mut self, distance: W, outcome: R) {
        let (i, j) = self.cursor();
        debug_assert!(i > 0 && j > 0, "no pair is pending");
        self.outcomes[(i - 1) * self.insert.len() + (j - 1)] = Some(outcome);
        self.fill(i, j, Some(distance));
    }

    fn fill(&mut self, i: usize, j: usize, distance: Option<W>) {
        let mut moves = ArrayVec::<_, 3>::new();

        if let Some(d) = distance {
            moves.push((self.table[(i - 1, j - 1)].0 + d, Move::Pair));
        }

        if i > 0 {
            moves.push((self.table[(i - 1, j)].0 + self.delete[i - 1], Move::Delete));
        }

        if j > 0 {
            moves.push((self.table[(i, j - 1)].0 + self.insert[j - 1], Move::Insert));
        }

        self.table[(i, j)] = moves
            .into_iter()
            .min_by_key(|&(w, _)| w)
            .unwrap_or((W::default(), Move::Start));

        self.filled += 1;
    }

    /// Returns the cost of the alignment and the steps that achieve it, left to right.
    ///
    /// Ties are broken in favor of pairing, then of deleting.
    pub(crate) fn finish(mut self) -> (W, Vec<Step<R>>) {
        debug_assert_eq!(self.filled, self.table.rows * self.table.columns);

        let n = self.insert.len();
        let (mut i, mut j) = (self.delete.len(), n);
        let cost = self.table[(i, j)].0;
        let mut steps = Vec::new();

        loop {
            match self.table[(i, j)].1 {
                Move::Start => break,
                Move::Delete => {
                    i -= 1;
                    steps.push(Step::Delete(i));
                }
                Move::Insert => {
                    j -= 1;
                    steps.push(Step::Insert(j));
                }
                Move::Pair => {
                    i -= 1;
                    j -= 1;
                    let outcome = self.outcomes[i * n + j].take();
                    steps.push(Step::Pair(i, j, outcome.expect("paired cells are resolved")));
                }
            }
        }

        steps.reverse();
        (cost, steps)
    }
}

/// Aligns `a` with `b`, asking `pair` for the distance between elements as they are needed.
pub(crate) fn align<A, B, W, R>(
    a: &[A],
    b: &[B],
    delete: impl Fn(&A) -> W,
    insert: impl Fn(&B) -> W,
    mut pair: impl FnMut(&A, &B) -> (W, R),
) -> (W, Vec<Step<R>>)
where
    W: Weight,
{
    let mut alignment = Alignment::new(
        a.iter().map(delete).collect(),
        b.iter().map(insert).collect(),
    );

    while let Some((i, j)) = alignment.advance() {
        let (distance, outcome) = pair(&a[i], &b[j]);
        alignment.resolve(distance, outcome);
    }

    alignment.finish()
}

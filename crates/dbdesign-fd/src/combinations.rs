/// Lazy iterator over every `k`-sized subset of a slice.
///
/// Subsets come out in lexicographic order of their index positions, e.g.
/// `[0, 1]`, `[0, 2]`, `[1, 2]` for three values and `k = 2`. A clone resumes
/// from the current position; call [`combinations`] again for a fresh pass.
#[derive(Debug, Clone)]
pub struct Combinations<'a, T> {
    values: &'a [T],
    indices: Vec<usize>,
    state: State,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Fresh,
    Running,
    Done,
}

/// Enumerate all combinations of `k` elements from `values`.
///
/// `k = 0` yields a single empty combination; `k > values.len()` yields none.
pub fn combinations<T>(values: &[T], k: usize) -> Combinations<'_, T> {
    let state = if k > values.len() {
        State::Done
    } else {
        State::Fresh
    };

    Combinations {
        values,
        indices: (0..k).collect(),
        state,
    }
}

impl<'a, T> Combinations<'a, T> {
    fn current(&self) -> Vec<&'a T> {
        self.indices.iter().map(|&index| &self.values[index]).collect()
    }

    fn advance(&mut self) -> bool {
        let n = self.values.len();
        let k = self.indices.len();

        // Rightmost position that has not reached its maximum value.
        let Some(position) = (0..k).rev().find(|&i| self.indices[i] != i + n - k) else {
            return false;
        };

        self.indices[position] += 1;
        for next in position + 1..k {
            self.indices[next] = self.indices[next - 1] + 1;
        }
        true
    }
}

impl<'a, T> Iterator for Combinations<'a, T> {
    type Item = Vec<&'a T>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.state {
            State::Done => None,
            State::Fresh => {
                self.state = State::Running;
                Some(self.current())
            }
            State::Running => {
                if self.advance() {
                    Some(self.current())
                } else {
                    self.state = State::Done;
                    None
                }
            }
        }
    }
}

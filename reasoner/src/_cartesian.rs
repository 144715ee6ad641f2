//! Lazy cartesian product of a fixed number of candidate lists.

/// Iterates over every combination picking one value in each dimension.
///
/// With no dimension, yields a single empty combination;
/// if any dimension is empty, yields nothing.
pub struct Cartesian<T> {
    dimensions: Vec<Vec<T>>,
    /// one digit per dimension, the last one moving fastest
    odometer: Vec<usize>,
    done: bool,
}

impl<T: Clone> Cartesian<T> {
    pub fn new(dimensions: Vec<Vec<T>>) -> Self {
        Cartesian {
            done: dimensions.iter().any(Vec::is_empty),
            odometer: vec![0; dimensions.len()],
            dimensions,
        }
    }

    /// Number of combinations not yielded yet, saturating at `usize::MAX`.
    fn remaining(&self) -> usize {
        if self.done {
            return 0;
        }
        let mut rest: usize = 1;
        let mut weight: usize = 1;
        for (digit, dimension) in self.odometer.iter().zip(&self.dimensions).rev() {
            rest = rest.saturating_add(weight.saturating_mul(dimension.len() - 1 - digit));
            weight = weight.saturating_mul(dimension.len());
        }
        rest
    }

    fn advance(&mut self) {
        for i in (0..self.odometer.len()).rev() {
            self.odometer[i] += 1;
            if self.odometer[i] < self.dimensions[i].len() {
                return;
            }
            self.odometer[i] = 0;
        }
        self.done = true;
    }
}

impl<T: Clone> Iterator for Cartesian<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let item = self
            .odometer
            .iter()
            .zip(&self.dimensions)
            .map(|(digit, dimension)| dimension[*digit].clone())
            .collect();
        self.advance();
        Some(item)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = self.remaining();
        (rest, Some(rest).filter(|r| *r < usize::MAX))
    }
}

//! Lazy search of injective assignments of query role-players to rule role-players.

/// Iterates over every injective assignment of `n` query role-players
/// to distinct rule role-players, among the candidates allowed for each.
///
/// Each item maps the i-th query role-player to the index of a rule role-player.
/// The search is a depth-first traversal, resumed at every call to `next`,
/// so that only the assignments actually consumed are enumerated.
pub struct RolePlayerMatches {
    /// for each query role-player, the compatible rule role-players
    candidates: Vec<Vec<usize>>,
    /// for each query role-player, the earlier query role-players with the same player
    same_player: Vec<Vec<usize>>,
    /// whether two rule players may hold the same instance
    coherent: Vec<Vec<bool>>,
    /// for each depth, the position of the next candidate to try
    cursor: Vec<usize>,
    /// the rule role-players chosen so far, one per depth
    chosen: Vec<usize>,
    used: Vec<bool>,
    done: bool,
}

impl RolePlayerMatches {
    /// `candidates[i]` lists the rule role-players that the i-th query role-player may be assigned;
    /// `same_player[i]` lists the earlier query role-players sharing its player variable;
    /// `coherent[j][k]` tells whether rule role-players `j` and `k` may be played by the same instance.
    pub fn new(
        candidates: Vec<Vec<usize>>,
        same_player: Vec<Vec<usize>>,
        coherent: Vec<Vec<bool>>,
    ) -> Self {
        let n = candidates.len();
        let m = coherent.len();
        RolePlayerMatches {
            done: candidates.iter().any(Vec::is_empty),
            candidates,
            same_player,
            coherent,
            cursor: vec![0; n],
            chosen: Vec::with_capacity(n),
            used: vec![false; m],
        }
    }

    fn acceptable(&self, depth: usize, j: usize) -> bool {
        !self.used[j]
            && self.same_player[depth]
                .iter()
                .all(|&d| self.coherent[self.chosen[d]][j])
    }
}

impl Iterator for RolePlayerMatches {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let n = self.candidates.len();
        if n == 0 {
            self.done = true;
            return Some(vec![]);
        }
        loop {
            let depth = self.chosen.len();
            let mut found = None;
            while self.cursor[depth] < self.candidates[depth].len() {
                let j = self.candidates[depth][self.cursor[depth]];
                self.cursor[depth] += 1;
                if self.acceptable(depth, j) {
                    found = Some(j);
                    break;
                }
            }
            match found {
                Some(j) if depth + 1 == n => {
                    let mut assignment = self.chosen.clone();
                    assignment.push(j);
                    return Some(assignment);
                }
                Some(j) => {
                    self.used[j] = true;
                    self.chosen.push(j);
                    self.cursor[depth + 1] = 0;
                }
                None => match self.chosen.pop() {
                    Some(j) => self.used[j] = false,
                    None => {
                        self.done = true;
                        return None;
                    }
                },
            }
        }
    }
}

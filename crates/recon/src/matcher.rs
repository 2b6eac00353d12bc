//! Pairing strategies between the old-method and new-method collections.
//!
//! Both strategies share one eligibility test: the names must clear the
//! threshold and the normalized addresses must match. They differ only in
//! how eligible pairs are committed.

use log::debug;

use crate::address::{strip_unit, AddressMatcher, AddressNormalizer};
use crate::config::MergeConfig;
use crate::model::SourceRecord;
use crate::name;
use crate::score::NameScore;

#[derive(Debug, Clone)]
pub struct MatchOptions {
    pub name_threshold: f64,
    pub address: AddressMatcher,
    pub normalizer: AddressNormalizer,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            name_threshold: crate::config::DEFAULT_NAME_THRESHOLD,
            address: AddressMatcher::default(),
            normalizer: AddressNormalizer::default(),
        }
    }
}

impl MatchOptions {
    pub fn from_config(config: &MergeConfig) -> Self {
        Self {
            name_threshold: config.matching.name_threshold,
            address: AddressMatcher::new(config.matching.house_number_tolerance),
            normalizer: AddressNormalizer::new(config.normalize.neighborhoods.clone()),
        }
    }
}

/// Both collections with their addresses normalized once up front.
///
/// Old-method addresses are unit-stripped before normalization; that source
/// carries apartment numbers the others omit.
pub struct Candidates<'a> {
    old: &'a [SourceRecord],
    new: &'a [SourceRecord],
    old_addr: Vec<String>,
    new_addr: Vec<String>,
    options: &'a MatchOptions,
}

impl<'a> Candidates<'a> {
    pub fn new(old: &'a [SourceRecord], new: &'a [SourceRecord], options: &'a MatchOptions) -> Self {
        let old_addr = old
            .iter()
            .map(|r| options.normalizer.normalize(strip_unit(&r.address)))
            .collect();
        let new_addr = new
            .iter()
            .map(|r| options.normalizer.normalize(&r.address))
            .collect();
        Self {
            old,
            new,
            old_addr,
            new_addr,
            options,
        }
    }

    /// Name score for `(old[i], new[j])` if the pair is eligible.
    pub fn judge(&self, i: usize, j: usize) -> Option<NameScore> {
        let score = name::score(&self.old[i].name, &self.new[j].name);
        if !score.passes(self.options.name_threshold) {
            return None;
        }
        if !self.options.address.matches(&self.old_addr[i], &self.new_addr[j]) {
            return None;
        }
        Some(score)
    }
}

/// Commit the first eligible unclaimed new record for each old record, in
/// input order. Returns `(old_index, new_index)` pairs in old-index order.
pub fn match_greedy(
    old: &[SourceRecord],
    new: &[SourceRecord],
    options: &MatchOptions,
) -> Vec<(usize, usize)> {
    let candidates = Candidates::new(old, new, options);
    let mut new_claimed = vec![false; new.len()];
    let mut pairs = Vec::new();

    for i in 0..old.len() {
        for j in 0..new.len() {
            if new_claimed[j] {
                continue;
            }
            if let Some(score) = candidates.judge(i, j) {
                debug!(
                    "greedy: old[{i}] '{}' claims new[{j}] '{}' (name {:?})",
                    old[i].name, new[j].name, score
                );
                new_claimed[j] = true;
                pairs.push((i, j));
                break;
            }
        }
    }

    pairs
}

/// Assignment over the full eligibility matrix: maximize the number of pairs,
/// then the summed name weight. Insensitive to input order up to ties.
/// Returns `(old_index, new_index)` pairs in old-index order.
pub fn match_optimal(
    old: &[SourceRecord],
    new: &[SourceRecord],
    options: &MatchOptions,
) -> Vec<(usize, usize)> {
    if old.is_empty() || new.is_empty() {
        return Vec::new();
    }

    let candidates = Candidates::new(old, new, options);
    let size = old.len().max(new.len());
    // A blocked cell must cost more than any reshuffle of eligible cells can save.
    let blocked = 3.0 * (size as f64 + 1.0);

    let mut cost = vec![vec![blocked; size]; size];
    let mut eligible = 0usize;
    for (i, row) in cost.iter_mut().enumerate().take(old.len()) {
        for (j, cell) in row.iter_mut().enumerate().take(new.len()) {
            if let Some(score) = candidates.judge(i, j) {
                *cell = NameScore::Definite.weight() - score.weight();
                eligible += 1;
            }
        }
    }
    debug!("optimal: {eligible} eligible pairs over {}x{}", old.len(), new.len());

    if eligible == 0 {
        return Vec::new();
    }

    let assignment = min_cost_assignment(&cost);
    let mut pairs: Vec<(usize, usize)> = assignment
        .into_iter()
        .enumerate()
        .filter(|&(i, j)| i < old.len() && j < new.len() && cost[i][j] < blocked)
        .collect();
    pairs.sort_unstable();
    pairs
}

/// Hungarian method on a square cost matrix. Returns the column assigned to
/// each row.
fn min_cost_assignment(cost: &[Vec<f64>]) -> Vec<usize> {
    let n = cost.len();
    // 1-based potentials; index 0 is the virtual start column.
    let mut u = vec![0.0f64; n + 1];
    let mut v = vec![0.0f64; n + 1];
    let mut row_of = vec![0usize; n + 1];
    let mut way = vec![0usize; n + 1];

    for i in 1..=n {
        row_of[0] = i;
        let mut j0 = 0usize;
        let mut min_v = vec![f64::INFINITY; n + 1];
        let mut used = vec![false; n + 1];

        loop {
            used[j0] = true;
            let i0 = row_of[j0];
            let mut delta = f64::INFINITY;
            let mut j1 = 0usize;

            for j in 1..=n {
                if used[j] {
                    continue;
                }
                let cur = cost[i0 - 1][j - 1] - u[i0] - v[j];
                if cur < min_v[j] {
                    min_v[j] = cur;
                    way[j] = j0;
                }
                if min_v[j] < delta {
                    delta = min_v[j];
                    j1 = j;
                }
            }

            for j in 0..=n {
                if used[j] {
                    u[row_of[j]] += delta;
                    v[j] -= delta;
                } else {
                    min_v[j] -= delta;
                }
            }

            j0 = j1;
            if row_of[j0] == 0 {
                break;
            }
        }

        loop {
            let j1 = way[j0];
            row_of[j0] = row_of[j1];
            j0 = j1;
            if j0 == 0 {
                break;
            }
        }
    }

    let mut col_of = vec![0usize; n];
    for j in 1..=n {
        if row_of[j] > 0 {
            col_of[row_of[j] - 1] = j - 1;
        }
    }
    col_of
}

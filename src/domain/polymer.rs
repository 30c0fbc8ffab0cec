//! Pair-insertion polymer growth.
//!
//! Only pair counts matter, so one insertion step is a linear map over the
//! vector of pair counts. `steps` insertions become one matrix power, computed
//! by square-and-multiply.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::LazyLock;

use itertools::{Itertools, MinMaxResult};
use regex::Regex;
use tracing::{debug, instrument};

use crate::domain::error::{DomainError, DomainResult};

static RULE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\S)(\S)\s*->\s*(\S)$").expect("rule pattern compiles"));

type Pair = (char, char);

/// `AB -> C`: between every adjacent `A`,`B` insert `C`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub pair: Pair,
    pub insert: char,
}

impl Rule {
    fn produced(&self) -> [Pair; 2] {
        [(self.pair.0, self.insert), (self.insert, self.pair.1)]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Polymer {
    template: Vec<char>,
    rules: Vec<Rule>,
}

impl Polymer {
    pub fn new(template: &str, rules: Vec<Rule>) -> DomainResult<Self> {
        let template: Vec<char> = template.chars().collect();
        if template.is_empty() {
            return Err(DomainError::EmptyInput);
        }
        Ok(Self { template, rules })
    }

    /// Template on the first line, a blank line, then one `AB -> C` rule per line.
    #[instrument(level = "debug", skip(input))]
    pub fn parse(input: &str) -> DomainResult<Self> {
        let mut lines = input.lines().enumerate();
        let template = lines
            .by_ref()
            .map(|(_, l)| l.trim())
            .find(|l| !l.is_empty())
            .ok_or(DomainError::EmptyInput)?;

        let mut seen = BTreeSet::new();
        let mut rules = Vec::new();
        for (i, line) in lines {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let caps = RULE_LINE.captures(line).ok_or_else(|| {
                DomainError::parse(i + 1, format!("expected `AB -> C`, found {:?}", line))
            })?;
            let first = |n: usize| caps[n].chars().next().unwrap_or_default();
            let rule = Rule {
                pair: (first(1), first(2)),
                insert: first(3),
            };
            if !seen.insert(rule.pair) {
                return Err(DomainError::parse(
                    i + 1,
                    format!("duplicate rule for {}{}", rule.pair.0, rule.pair.1),
                ));
            }
            rules.push(rule);
        }

        debug!("template of {} elements, {} rules", template.len(), rules.len());
        Self::new(template, rules)
    }

    pub fn template(&self) -> String {
        self.template.iter().collect()
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Element occurrences after `steps` insertion rounds.
    #[instrument(level = "debug", skip(self))]
    pub fn element_counts(&self, steps: u32) -> DomainResult<BTreeMap<char, u64>> {
        let table = PairTable::new(&self.template, &self.rules);
        let transition = table.transition_matrix(&self.rules);
        let initial = table.initial_counts(&self.template);

        let overflow = || DomainError::Overflow(format!("pair counts after {} steps", steps));
        let pair_counts = transition
            .checked_pow(steps)
            .and_then(|m| m.checked_apply(&initial))
            .ok_or_else(overflow)?;

        // Every element sits in two pairs except the two template ends
        let mut doubled: BTreeMap<char, u64> = BTreeMap::new();
        for end in [self.template[0], self.template[self.template.len() - 1]] {
            *doubled.entry(end).or_default() += 1;
        }
        for (&(left, right), &count) in table.pairs.iter().zip(&pair_counts) {
            for element in [left, right] {
                let slot = doubled.entry(element).or_default();
                *slot = slot.checked_add(count).ok_or_else(overflow)?;
            }
        }

        Ok(doubled.into_iter().map(|(element, n)| (element, n / 2)).collect())
    }

    /// Most common element count minus least common after `steps` rounds.
    pub fn element_spread(&self, steps: u32) -> DomainResult<u64> {
        let counts = self.element_counts(steps)?;
        let spread = match counts.values().minmax() {
            MinMaxResult::NoElements | MinMaxResult::OneElement(_) => 0,
            MinMaxResult::MinMax(min, max) => max - min,
        };
        debug!("spread after {} steps: {}", steps, spread);
        Ok(spread)
    }
}

/// Every pair that can ever occur, sorted, with its position in the state vector.
struct PairTable {
    pairs: Vec<Pair>,
    index: HashMap<Pair, usize>,
}

impl PairTable {
    fn new(template: &[char], rules: &[Rule]) -> Self {
        let mut all: BTreeSet<Pair> = template.iter().copied().tuple_windows().collect();
        for rule in rules {
            all.insert(rule.pair);
            all.extend(rule.produced());
        }
        let pairs: Vec<Pair> = all.into_iter().collect();
        let index = pairs.iter().enumerate().map(|(i, &p)| (p, i)).collect();
        Self { pairs, index }
    }

    fn position(&self, pair: Pair) -> usize {
        self.index[&pair]
    }

    /// Column `from`, row `to`: how many `to` pairs one `from` pair becomes.
    fn transition_matrix(&self, rules: &[Rule]) -> SquareMatrix {
        let mut matrix = SquareMatrix::identity(self.pairs.len());
        for rule in rules {
            let from = self.position(rule.pair);
            *matrix.at_mut(from, from) -= 1;
            for produced in rule.produced() {
                *matrix.at_mut(self.position(produced), from) += 1;
            }
        }
        matrix
    }

    fn initial_counts(&self, template: &[char]) -> Vec<u64> {
        let mut counts = vec![0; self.pairs.len()];
        for pair in template.iter().copied().tuple_windows() {
            counts[self.position(pair)] += 1;
        }
        counts
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct SquareMatrix {
    n: usize,
    data: Vec<u64>,
}

impl SquareMatrix {
    fn identity(n: usize) -> Self {
        let mut data = vec![0; n * n];
        for i in 0..n {
            data[i * n + i] = 1;
        }
        Self { n, data }
    }

    fn at(&self, row: usize, col: usize) -> u64 {
        self.data[row * self.n + col]
    }

    fn at_mut(&mut self, row: usize, col: usize) -> &mut u64 {
        &mut self.data[row * self.n + col]
    }

    fn checked_mul(&self, other: &Self) -> Option<Self> {
        let n = self.n;
        let mut data = vec![0u64; n * n];
        for row in 0..n {
            for k in 0..n {
                let a = self.at(row, k);
                if a == 0 {
                    continue;
                }
                for col in 0..n {
                    let term = a.checked_mul(other.at(k, col))?;
                    let slot = &mut data[row * n + col];
                    *slot = slot.checked_add(term)?;
                }
            }
        }
        Some(Self { n, data })
    }

    fn checked_pow(&self, mut exp: u32) -> Option<Self> {
        let mut result = Self::identity(self.n);
        let mut base = self.clone();
        while exp > 0 {
            if exp & 1 == 1 {
                result = result.checked_mul(&base)?;
            }
            exp >>= 1;
            if exp > 0 {
                base = base.checked_mul(&base)?;
            }
        }
        Some(result)
    }

    fn checked_apply(&self, vector: &[u64]) -> Option<Vec<u64>> {
        (0..self.n)
            .map(|row| {
                (0..self.n).try_fold(0u64, |acc, col| {
                    acc.checked_add(self.at(row, col).checked_mul(vector[col])?)
                })
            })
            .collect()
    }
}

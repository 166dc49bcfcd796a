//! Dominance table: which kind converts which on contact

use serde::{Deserialize, Serialize};

use super::state::Kind;

/// Outcome of two kinds touching
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clash {
    /// First kind converts the second
    FirstWins,
    /// Second kind converts the first
    SecondWins,
    /// Same kind, nothing converts
    Tie,
}

/// Immutable "beats" lookup, indexed by `Kind::index`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rules {
    beats: [Kind; 3],
}

impl Default for Rules {
    fn default() -> Self {
        Self::classic()
    }
}

impl Rules {
    /// Rock beats scissors, paper beats rock, scissors beats paper
    pub fn classic() -> Self {
        Self {
            beats: [Kind::Scissors, Kind::Rock, Kind::Paper],
        }
    }

    /// Kind that `kind` converts
    #[inline]
    pub fn prey_of(&self, kind: Kind) -> Kind {
        self.beats[kind.index()]
    }

    #[inline]
    pub fn dominates(&self, a: Kind, b: Kind) -> bool {
        a != b && self.prey_of(a) == b
    }

    pub fn clash(&self, a: Kind, b: Kind) -> Clash {
        if self.dominates(a, b) {
            Clash::FirstWins
        } else if self.dominates(b, a) {
            Clash::SecondWins
        } else {
            Clash::Tie
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classic_cycle() {
        let rules = Rules::classic();
        assert!(rules.dominates(Kind::Rock, Kind::Scissors));
        assert!(rules.dominates(Kind::Paper, Kind::Rock));
        assert!(rules.dominates(Kind::Scissors, Kind::Paper));

        assert!(!rules.dominates(Kind::Scissors, Kind::Rock));
        assert!(!rules.dominates(Kind::Rock, Kind::Rock));
    }

    #[test]
    fn test_clash_is_antisymmetric() {
        let rules = Rules::classic();
        for a in Kind::ALL {
            for b in Kind::ALL {
                let forward = rules.clash(a, b);
                let backward = rules.clash(b, a);
                match forward {
                    Clash::FirstWins => assert_eq!(backward, Clash::SecondWins),
                    Clash::SecondWins => assert_eq!(backward, Clash::FirstWins),
                    Clash::Tie => {
                        assert_eq!(a, b);
                        assert_eq!(backward, Clash::Tie);
                    }
                }
            }
        }
    }
}

// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Rules folding neighbour labels into one prediction.

use crate::domain::{CombinationRule, Parameterized};
use crate::param::ParameterDirectory;

/// Most frequent label; ties go to the smaller label.
#[derive(Default)]
pub struct MajorityVote {
    params: ParameterDirectory,
}

impl MajorityVote {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Parameterized for MajorityVote {
    fn name(&self) -> &str {
        "MajorityVote"
    }

    fn params(&self) -> &ParameterDirectory {
        &self.params
    }
}

impl CombinationRule for MajorityVote {
    fn combine(&self, votes: &[f64]) -> f64 {
        let mut sorted = votes.to_vec();
        sorted.sort_by(f64::total_cmp);

        let mut best = (f64::NAN, 0_usize);
        let mut start = 0;
        while start < sorted.len() {
            let label = sorted[start];
            let run = sorted[start..].iter().take_while(|v| **v == label).count().max(1);
            if run > best.1 {
                best = (label, run);
            }
            start += run;
        }
        best.0
    }
}

/// Arithmetic mean of the labels.
#[derive(Default)]
pub struct MeanRule {
    params: ParameterDirectory,
}

impl MeanRule {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Parameterized for MeanRule {
    fn name(&self) -> &str {
        "MeanRule"
    }

    fn params(&self) -> &ParameterDirectory {
        &self.params
    }
}

impl CombinationRule for MeanRule {
    fn combine(&self, votes: &[f64]) -> f64 {
        if votes.is_empty() {
            return f64::NAN;
        }
        votes.iter().sum::<f64>() / votes.len() as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_majority() {
        let rule = MajorityVote::new();
        assert_eq!(rule.combine(&[2.0, 1.0, 2.0]), 2.0);
        // tie between 0 and 1
        assert_eq!(rule.combine(&[1.0, 0.0]), 0.0);
        assert!(rule.combine(&[]).is_nan());
    }

    #[test]
    fn test_mean() {
        assert_eq!(MeanRule::new().combine(&[1.0, 2.0, 6.0]), 3.0);
    }
}

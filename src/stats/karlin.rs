//! Karlin-Altschul statistics for ungapped scoring systems.
//!
//! Given a substitution matrix and the residue composition of the two
//! sequences, this module derives the parameters lambda, K and H of the
//! score distribution and from them the expected length of the
//! best-scoring ungapped segment, `ln(K * m * n) / H`. The dot-plot
//! engine never calls in here; callers use it to pick a sliding-window
//! size before configuring a run.

use anyhow::{bail, Result};

use crate::core::matrix::SubstitutionMatrix;

const LAMBDA_ACCURACY: f64 = 1.0e-7;
const LAMBDA_ITER_MAX: usize = 128;
const K_SUM_LIMIT: f64 = 1.0e-4;
const K_ITER_MAX: usize = 100;

/// Robinson amino acid background frequencies, in the order of the first
/// twenty peptide residue ids.
const ROBINSON_AA_FREQS: [f64; 20] = [
    0.07805, // A
    0.01926, // R
    0.05364, // N
    0.06295, // D
    0.01487, // C
    0.03374, // Q
    0.06661, // E
    0.07129, // G
    0.02105, // H
    0.05142, // I
    0.05744, // L
    0.05068, // K
    0.01471, // M
    0.03965, // F
    0.04728, // P
    0.06141, // S
    0.05506, // T
    0.01330, // W
    0.03216, // Y
    0.06891, // V
];

#[derive(Debug, Clone, Copy)]
pub struct KarlinParams {
    pub lambda: f64,
    pub k: f64,
    pub h: f64,
}

/// Residue composition of an encoded sequence. Ids at or above
/// `alphabet_size` are ignored; the rest normalize to 1.
pub fn residue_frequencies(seq: &[u8], alphabet_size: usize) -> Vec<f64> {
    let mut counts = vec![0u64; alphabet_size];
    for &id in seq {
        if (id as usize) < alphabet_size {
            counts[id as usize] += 1;
        }
    }
    let total: u64 = counts.iter().sum();
    if total == 0 {
        return vec![0.0; alphabet_size];
    }
    counts.iter().map(|&c| c as f64 / total as f64).collect()
}

/// Robinson background composition padded to the peptide alphabet.
pub fn standard_protein_frequencies() -> Vec<f64> {
    let mut freqs = vec![0.0; crate::core::alphabet::AA_ALPHABET_SIZE];
    let sum: f64 = ROBINSON_AA_FREQS.iter().sum();
    for (i, &f) in ROBINSON_AA_FREQS.iter().enumerate() {
        freqs[i] = f / sum;
    }
    freqs
}

/// Probability distribution of single-pair scores under independent
/// residue draws from the two compositions.
#[derive(Debug, Clone)]
pub struct ScoreProfile {
    /// `probs[i]` is the probability of score `min + i`.
    probs: Vec<f64>,
    min: i32,
    max: i32,
    mean: f64,
}

impl ScoreProfile {
    pub fn new(
        matrix: &SubstitutionMatrix,
        query_freqs: &[f64],
        subject_freqs: &[f64],
    ) -> Result<Self> {
        let n = matrix.size();
        if query_freqs.len() != n || subject_freqs.len() != n {
            bail!(
                "composition vectors must match the matrix dimension {}",
                n
            );
        }
        let mut lo = i32::MAX;
        let mut hi = i32::MIN;
        for a in 0..n {
            for b in 0..n {
                if query_freqs[a] > 0.0 && subject_freqs[b] > 0.0 {
                    let s = matrix.score(a as u8, b as u8);
                    lo = lo.min(s);
                    hi = hi.max(s);
                }
            }
        }
        if lo > hi {
            bail!("score profile has no probability mass");
        }
        let mut probs = vec![0.0; (hi - lo + 1) as usize];
        for a in 0..n {
            for b in 0..n {
                let mass = query_freqs[a] * subject_freqs[b];
                if mass > 0.0 {
                    let s = matrix.score(a as u8, b as u8);
                    probs[(s - lo) as usize] += mass;
                }
            }
        }
        let total: f64 = probs.iter().sum();
        let mut mean = 0.0;
        for (i, p) in probs.iter_mut().enumerate() {
            *p /= total;
            mean += (lo + i as i32) as f64 * *p;
        }
        Ok(Self {
            probs,
            min: lo,
            max: hi,
            mean,
        })
    }

    #[inline]
    fn prob(&self, score: i32) -> f64 {
        if score < self.min || score > self.max {
            0.0
        } else {
            self.probs[(score - self.min) as usize]
        }
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }
}

fn gcd(mut a: i32, mut b: i32) -> i32 {
    a = a.abs();
    b = b.abs();
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Common divisor of every score carrying mass. Lambda and K work on the
/// reduced lattice and lambda is scaled back afterwards.
fn score_divisor(profile: &ScoreProfile) -> i32 {
    let mut d = 0;
    for s in profile.min..=profile.max {
        if s != 0 && profile.prob(s) > 0.0 {
            d = gcd(d, s);
        }
    }
    d.max(1)
}

/// Unique positive root of `sum_s p(s) * exp(lambda * s) = 1`, found by
/// doubling out an upper bracket and bisecting it down.
fn solve_lambda(profile: &ScoreProfile) -> Result<f64> {
    let restriction = |lambda: f64| -> f64 {
        let mut sum = 0.0;
        for s in profile.min..=profile.max {
            let p = profile.prob(s);
            if p > 0.0 {
                sum += p * (lambda * s as f64).exp();
            }
        }
        sum - 1.0
    };

    let mut hi = 0.5;
    let mut doubling = 0;
    while restriction(hi) <= 0.0 {
        hi *= 2.0;
        doubling += 1;
        if doubling > 64 {
            bail!("no positive lambda satisfies the score distribution");
        }
    }
    let mut lo = 0.0;
    for _ in 0..LAMBDA_ITER_MAX {
        let mid = 0.5 * (lo + hi);
        if restriction(mid) > 0.0 {
            hi = mid;
        } else {
            lo = mid;
        }
        if hi - lo < LAMBDA_ACCURACY {
            break;
        }
    }
    Ok(0.5 * (lo + hi))
}

/// Relative entropy of the aligned-pair distribution,
/// `H = lambda * sum_s s * p(s) * exp(lambda * s)`.
fn entropy(profile: &ScoreProfile, lambda: f64) -> f64 {
    let mut sum = 0.0;
    for s in profile.min..=profile.max {
        let p = profile.prob(s);
        if p > 0.0 {
            sum += s as f64 * p * (lambda * s as f64).exp();
        }
    }
    lambda * sum
}

fn convolve(acc: &[f64], base: &[f64]) -> Vec<f64> {
    let mut out = vec![0.0; acc.len() + base.len() - 1];
    for (i, &a) in acc.iter().enumerate() {
        if a == 0.0 {
            continue;
        }
        for (j, &b) in base.iter().enumerate() {
            out[i + j] += a * b;
        }
    }
    out
}

/// K on the reduced lattice: closed forms for the (-1, 1) and single-sided
/// cases, otherwise the sum over alignment lengths until the tail is
/// negligible.
fn karlin_k(profile: &ScoreProfile, lambda: f64, h: f64, divisor: i32) -> Result<f64> {
    let low = profile.min / divisor;
    let high = profile.max / divisor;
    let lambda = lambda * divisor as f64;
    let first_term = h / lambda;

    if low == -1 && high == 1 {
        let p_low = profile.prob(profile.min);
        let p_high = profile.prob(profile.max);
        let diff = p_low - p_high;
        return Ok(diff * diff / p_low);
    }

    if low == -1 || high == 1 {
        let term = if high != 1 {
            let mean = profile.mean / divisor as f64;
            mean * mean / first_term
        } else {
            first_term
        };
        return Ok(term * (1.0 - (-lambda).exp()));
    }

    // General lattice. Walk the distribution of k-step alignment sums and
    // accumulate E[exp(lambda * S_k); S_k < 0] + P(S_k >= 0), each term
    // divided by k.
    let base: Vec<f64> = (profile.min..=profile.max)
        .step_by(divisor as usize)
        .map(|s| profile.prob(s))
        .collect();
    let mut sums = vec![1.0];
    let mut outer = 0.0;
    let mut inner = 1.0;
    for iter in 1..=K_ITER_MAX {
        if inner <= K_SUM_LIMIT {
            break;
        }
        sums = convolve(&sums, &base);
        let lowest = iter as i32 * low;
        inner = 0.0;
        for (i, &p) in sums.iter().enumerate() {
            if p == 0.0 {
                continue;
            }
            let s = lowest + i as i32;
            if s < 0 {
                inner += p * (lambda * s as f64).exp();
            } else {
                inner += p;
            }
        }
        outer += inner / iter as f64;
    }

    let k = -(-2.0 * outer).exp() / (first_term * (-lambda).exp_m1());
    if !k.is_finite() || k <= 0.0 {
        bail!("K computation did not converge");
    }
    Ok(k)
}

/// Lambda, K and H for the given score distribution. Fails when the mean
/// pair score is non-negative or no positive score exists; both make the
/// maximal-segment statistics undefined.
pub fn karlin_params(profile: &ScoreProfile) -> Result<KarlinParams> {
    if profile.mean() >= 0.0 {
        bail!(
            "expected pair score must be negative, got {:.4}",
            profile.mean()
        );
    }
    if profile.max() <= 0 {
        bail!("scoring system has no positive score");
    }
    let divisor = score_divisor(profile);
    let lambda = solve_lambda(profile)?;
    let h = entropy(profile, lambda);
    if h <= 0.0 {
        bail!("relative entropy must be positive");
    }
    let k = karlin_k(profile, lambda, h, divisor)?;
    Ok(KarlinParams { lambda, k, h })
}

/// Expected length of the best-scoring ungapped segment over an
/// `m * n` comparison, used as the sliding-window default.
pub fn suggested_window(params: &KarlinParams, query_len: usize, subject_len: usize) -> usize {
    let space = query_len as f64 * subject_len as f64;
    let expected = (params.k * space).ln() / params.h;
    expected.round().max(3.0) as usize
}

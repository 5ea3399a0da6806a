//! Conditional samplers for the two-team skill model
//!
//! The model links two Gaussian skills to a performance difference
//! `t ~ N(skill_a - skill_b, st²)` whose sign is the observed outcome. Gibbs
//! sampling alternates between the two full conditionals implemented here:
//!
//! ```text
//! (skill_a, skill_b) | t        ~ N(μ(t), Σ)            exact bivariate Gaussian
//! t | skill_a, skill_b, outcome ~ N(skill_a - skill_b, st²) truncated by the outcome sign
//! ```
//!
//! Both functions are stateless; the only thing they consume is the random source.

use crate::error::{RatingError, Result};
use crate::types::{Outcome, SkillPriors};
use rand::Rng;
use rand_distr::{Distribution, Exp, StandardNormal};
use statrs::distribution::{ContinuousCDF, Normal};

/// Truncation points further than this into the tail switch from inverse-CDF
/// sampling to exponential rejection sampling.
const TAIL_REJECTION_THRESHOLD: f64 = 5.0;

/// Exact Gaussian conditional of the two skills given a performance difference
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BivariateGaussian {
    pub mean: [f64; 2],
    pub covariance: [[f64; 2]; 2],
    /// Lower Cholesky factor `[l11, l21, l22]` of `covariance`
    cholesky: [f64; 3],
}

impl BivariateGaussian {
    /// Draw one sample using the Cholesky factor of the covariance
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> (f64, f64) {
        let [l11, l21, l22] = self.cholesky;

        let z1: f64 = StandardNormal.sample(rng);
        let z2: f64 = StandardNormal.sample(rng);

        (
            self.mean[0] + l11 * z1,
            self.mean[1] + l21 * z1 + l22 * z2,
        )
    }
}

fn ensure_positive(name: &str, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(RatingError::invalid_parameter(format!(
            "{} must be positive and finite, got {}",
            name, value
        )))
    }
}

/// Compute the conditional distribution of `(skill_a, skill_b)` given `perf_diff`.
///
/// Posterior precision is `diag(1/s1², 1/s2²) + [[1,-1],[-1,1]]/st²` and the
/// posterior mean is `Σ (Λ_prior m + [1,-1]ᵀ t/st²)`. The closed form stays
/// accurate for any positive `st`, however small.
pub fn conditional_skill_distribution(
    priors: &SkillPriors,
    performance_noise: f64,
    perf_diff: f64,
) -> Result<BivariateGaussian> {
    ensure_positive("stddev_a", priors.stddev_a)?;
    ensure_positive("stddev_b", priors.stddev_b)?;
    ensure_positive("performance_noise", performance_noise)?;

    let prec_a = 1.0 / (priors.stddev_a * priors.stddev_a);
    let prec_b = 1.0 / (priors.stddev_b * priors.stddev_b);
    let coupling = 1.0 / (performance_noise * performance_noise);

    // Precision [[prec_a + c, -c], [-c, prec_b + c]]; the c² terms are cancelled
    // by hand since c grows without bound as the noise shrinks
    let det = prec_a * prec_b + coupling * (prec_a + prec_b);

    let covariance = [
        [(prec_b + coupling) / det, coupling / det],
        [coupling / det, (prec_a + coupling) / det],
    ];

    let weighted_means = prec_a * priors.mean_a + prec_b * priors.mean_b;
    let mean = [
        (prec_a * prec_b * priors.mean_a + coupling * (weighted_means + prec_b * perf_diff)) / det,
        (prec_a * prec_b * priors.mean_b + coupling * (weighted_means - prec_a * perf_diff)) / det,
    ];

    // Schur complement: Var(skill_b | skill_a) is the inverse of the precision entry
    let l11 = covariance[0][0].sqrt();
    let l21 = covariance[0][1] / l11;
    let l22 = (prec_b + coupling).recip().sqrt();

    Ok(BivariateGaussian {
        mean,
        covariance,
        cholesky: [l11, l21, l22],
    })
}

/// Draw `(skill_a, skill_b)` from their joint conditional given `perf_diff`
pub fn sample_skills_given_perf_diff<R: Rng + ?Sized>(
    priors: &SkillPriors,
    performance_noise: f64,
    perf_diff: f64,
    rng: &mut R,
) -> Result<(f64, f64)> {
    let conditional = conditional_skill_distribution(priors, performance_noise, perf_diff)?;
    Ok(conditional.sample(rng))
}

/// Draw the performance difference given both skills and the observed outcome.
///
/// The draw is `N(skill_a - skill_b, st²)` restricted to `[0, ∞)` when team A
/// won and to `(-∞, 0]` when team B won. A draw outcome carries no sign and is
/// rejected.
pub fn sample_perf_diff_given_skills<R: Rng + ?Sized>(
    skill_a: f64,
    skill_b: f64,
    performance_noise: f64,
    outcome: Outcome,
    rng: &mut R,
) -> Result<f64> {
    ensure_positive("performance_noise", performance_noise)?;
    if !(skill_a.is_finite() && skill_b.is_finite()) {
        return Err(RatingError::invalid_parameter(format!(
            "skills must be finite, got ({}, {})",
            skill_a, skill_b
        )));
    }

    let center = skill_a - skill_b;
    // Where zero sits on the standard-normal scale around the centre
    let boundary = -center / performance_noise;

    match outcome {
        Outcome::TeamAWin => {
            let z = sample_standard_normal_above(boundary, rng)?;
            Ok((center + performance_noise * z).max(0.0))
        }
        Outcome::TeamBWin => {
            let z = -sample_standard_normal_above(-boundary, rng)?;
            Ok((center + performance_noise * z).min(0.0))
        }
        Outcome::Draw => Err(RatingError::invalid_parameter(
            "performance difference cannot be conditioned on a draw",
        )),
    }
}

/// Sample `z ~ N(0, 1)` conditioned on `z >= lower`.
pub fn sample_standard_normal_above<R: Rng + ?Sized>(lower: f64, rng: &mut R) -> Result<f64> {
    if lower.is_nan() {
        return Err(RatingError::invalid_parameter("truncation point is NaN"));
    }

    if lower > TAIL_REJECTION_THRESHOLD {
        return sample_deep_tail(lower, rng);
    }

    if lower < -TAIL_REJECTION_THRESHOLD {
        // Almost all of the mass is retained; plain rejection accepts on the first try
        loop {
            let z: f64 = StandardNormal.sample(rng);
            if z >= lower {
                return Ok(z);
            }
        }
    }

    let standard = Normal::new(0.0, 1.0)
        .map_err(|e| RatingError::invalid_parameter(format!("standard normal: {}", e)))?;

    // Mass of the retained tail; inverting inside (0, tail] keeps z >= lower
    let tail = standard.cdf(-lower);
    let u: f64 = rng.gen();
    let p = (1.0 - u) * tail;

    Ok(-standard.inverse_cdf(p))
}

/// Exponential rejection sampler for tails where the CDF loses precision (Robert, 1995)
fn sample_deep_tail<R: Rng + ?Sized>(lower: f64, rng: &mut R) -> Result<f64> {
    let alpha = (lower + (lower * lower + 4.0).sqrt()) / 2.0;
    let proposal = Exp::new(alpha)
        .map_err(|e| RatingError::invalid_parameter(format!("tail proposal: {}", e)))?;

    loop {
        let z = lower + proposal.sample(rng);
        let acceptance = (-(z - alpha).powi(2) / 2.0).exp();
        if rng.gen::<f64>() <= acceptance {
            return Ok(z);
        }
    }
}

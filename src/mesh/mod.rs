//! Layer-adapted meshes on a bounded interval.
//!
//! A [`Mesh`] is a strictly increasing knot vector ξ₀ = s < ξ₁ < … < ξ_l = t.
//! Besides the uniform mesh, two families resolve the boundary layers of
//! singularly perturbed problems:
//!
//! - **Shishkin** meshes are piecewise uniform with logarithmic transition
//!   points, in a convection variant (one layer, at the left end) and a
//!   reaction variant (layers at both ends);
//! - **Bakhvalov** meshes grade the layer region through a generating
//!   function χ and continue with a uniform coarse part, the transition τ
//!   being a fixed point computed iteratively.
//!
//! [`Mesh::refined`] produces the r-fold uniform refinement used to build
//! reference solutions. All generators accumulate knots additively inside a
//! uniform piece to keep roundoff from drifting, and pin piece boundaries
//! (including ξ_l = t) to their closed-form values so the endpoint
//! invariants hold bit-exactly.

use log::debug;

use crate::field::{Real, RealField};


/// Iteration cap for the Bakhvalov transition fixed point. The iteration
/// stops on bit-exact stationarity; the cap only guards against a
/// last-place oscillation under to-nearest rounding.
const TRANSITION_SWEEP_CAP: usize = 10_000;

/// Errors from mesh construction.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MeshError {
    /// Fewer subintervals than the generator can work with.
    #[error("a mesh needs at least one subinterval, got l = {0}")]
    TooFewIntervals(usize),

    /// The interval [s, t] is empty or reversed.
    #[error("mesh endpoints must satisfy s < t")]
    EmptyInterval,

    /// The perturbation parameter must be positive.
    #[error("perturbation parameter must be positive")]
    NonpositiveEpsilon,

    /// A layer-mesh shape parameter (σ, β or γ) is not positive.
    #[error("mesh shape parameters must be positive")]
    NonpositiveParameter,

    /// A layer fraction q lies outside (0, 1).
    #[error("layer fraction must lie strictly between 0 and 1")]
    LayerFractionOutOfRange,

    /// ⌊q·l⌋ leaves a piece of the mesh without any subinterval.
    #[error("{0} subintervals are too few to place the layer pieces")]
    NoLayerNodes(usize),

    /// The refinement factor must be at least 1.
    #[error("refinement factor must be at least 1")]
    InvalidRefinement,

    /// Knots from different precision contexts were combined.
    #[error("mesh inputs come from different precision contexts")]
    PrecisionMismatch,

    /// A produced or supplied knot sequence fails strict monotonicity.
    #[error("knot sequence must be strictly increasing")]
    NotIncreasing,

    /// The Bakhvalov transition iteration hit its sweep cap.
    #[error("Bakhvalov transition iteration did not settle")]
    TransitionNotSettled,
}

/// A strictly increasing knot vector over the scalar field.
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh<T> {
    knots: Vec<T>,
}

impl<T: Real> Mesh<T> {
    /// The uniform mesh with `l` subintervals on [s, t].
    ///
    /// ```
    /// use bezcol::mesh::Mesh;
    ///
    /// let mesh = Mesh::uniform(4, &0.0_f64, &1.0).unwrap();
    /// assert_eq!(mesh.knots(), &[0.0, 0.25, 0.5, 0.75, 1.0]);
    /// ```
    pub fn uniform(l: usize, s: &T, t: &T) -> Result<Self, MeshError> {
        validate_interval(l, s, t)?;
        let step = (t.clone() - s.clone()).div_int(l as i64);
        let mut knots = Vec::with_capacity(l + 1);
        knots.push(s.clone());
        for _ in 1..l {
            let prev = knots.last().expect("nonempty").clone();
            knots.push(prev + step.clone());
        }
        knots.push(t.clone());
        Self::from_knots(knots)
    }

    /// The Shishkin mesh for a convection–diffusion problem
    /// −εy″ − by′ + cy = f with b ≥ β > 0: a fine uniform piece of
    /// ⌊q·l⌋ subintervals resolving the layer at s, then a coarse uniform
    /// remainder. The transition is τ = min(σε/β · ln l, q).
    pub fn shishkin(
        l: usize,
        s: &T,
        t: &T,
        q: &T,
        sigma: &T,
        beta: &T,
        epsilon: &T,
    ) -> Result<Self, MeshError> {
        validate_interval(l, s, t)?;
        validate_layer(s, q, sigma, beta, epsilon)?;
        let field = s.field();

        let ql = (q.mul_int(l as i64)).floor().to_f64() as usize;
        if ql < 1 || l - ql < 1 {
            return Err(MeshError::NoLayerNodes(l));
        }

        let mut tau = sigma.clone() * epsilon.clone() / beta.clone() * field.from_usize(l).ln();
        if *q < tau {
            tau = q.clone();
        }
        debug!("shishkin mesh: l={l}, fine piece {ql} intervals, tau={:e}", tau.to_f64());

        let width = t.clone() - s.clone();
        let split = s.clone() + tau.clone() * width.clone();
        let mut knots = Vec::with_capacity(l + 1);
        knots.push(s.clone());
        push_uniform_piece(&mut knots, &split, ql);
        push_uniform_piece(&mut knots, t, l - ql);
        Self::from_knots(knots)
    }

    /// The Shishkin mesh for a reaction–diffusion problem
    /// −εy″ + cy = f with c ≥ γ², γ > 0: fine uniform pieces of ⌊q₀·l⌋ and
    /// ⌊q₁·l⌋ subintervals at both ends and a coarse interior. The
    /// transitions are τᵢ = min(σᵢ·ε/γ · ln l, qᵢ).
    #[allow(clippy::too_many_arguments)]
    pub fn shishkin_reaction(
        l: usize,
        s: &T,
        t: &T,
        q0: &T,
        q1: &T,
        sigma0: &T,
        sigma1: &T,
        gamma: &T,
        epsilon: &T,
    ) -> Result<Self, MeshError> {
        validate_interval(l, s, t)?;
        validate_layer(s, q0, sigma0, gamma, epsilon)?;
        validate_layer(s, q1, sigma1, gamma, epsilon)?;
        let field = s.field();

        let q0l = (q0.mul_int(l as i64)).floor().to_f64() as usize;
        let q1l = (q1.mul_int(l as i64)).floor().to_f64() as usize;
        if q0l < 1 || q1l < 1 || l < q0l + q1l + 1 {
            return Err(MeshError::NoLayerNodes(l));
        }

        let log_l = field.from_usize(l).ln();
        let shared = epsilon.clone() / gamma.clone() * log_l;
        let mut tau0 = sigma0.clone() * shared.clone();
        let mut tau1 = sigma1.clone() * shared;
        if *q0 < tau0 {
            tau0 = q0.clone();
        }
        if *q1 < tau1 {
            tau1 = q1.clone();
        }

        let width = t.clone() - s.clone();
        let split0 = s.clone() + tau0 * width.clone();
        let split1 = t.clone() - tau1 * width;
        let mut knots = Vec::with_capacity(l + 1);
        knots.push(s.clone());
        push_uniform_piece(&mut knots, &split0, q0l);
        push_uniform_piece(&mut knots, &split1, l - q0l - q1l);
        push_uniform_piece(&mut knots, t, q1l);
        Self::from_knots(knots)
    }

    /// The Bakhvalov mesh for a convection–diffusion problem with a layer
    /// at s.
    ///
    /// When σε ≥ βq the generating function degenerates and the result is
    /// the global uniform mesh (τ = 0). Otherwise the layer part follows
    /// ξᵢ = s + χ(i/l)·(t − s) with χ(r) = −(σε/β)·ln((q − r)/q), the first
    /// knot past the transition continues χ tangentially, and the rest of
    /// the mesh is uniform up to t.
    pub fn bakhvalov(
        l: usize,
        s: &T,
        t: &T,
        q: &T,
        sigma: &T,
        beta: &T,
        epsilon: &T,
    ) -> Result<Self, MeshError> {
        validate_interval(l, s, t)?;
        validate_layer(s, q, sigma, beta, epsilon)?;
        let field = s.field();

        if sigma.clone() * epsilon.clone() >= beta.clone() * q.clone() {
            debug!("bakhvalov mesh degenerates to uniform: sigma*epsilon >= beta*q");
            return Self::uniform(l, s, t);
        }

        let c = sigma.clone() * epsilon.clone() / beta.clone();
        let chi = |r: &T| -> T { -(c.clone() * ((q.clone() - r.clone()) / q.clone()).ln()) };
        let tau = bakhvalov_transition(q, sigma, beta, epsilon)?;

        let width = t.clone() - s.clone();
        let chi_tau = chi(&tau);
        let mut knots = Vec::with_capacity(l + 1);
        knots.push(s.clone());
        for i in 1..l {
            let r = field.from_usize(i).div_int(l as i64);
            if r < tau {
                knots.push(s.clone() + chi(&r) * width.clone());
            } else {
                // First knot outside the layer: tangent continuation of chi,
                // then a uniform tail toward t.
                let slope = c.clone() / (q.clone() - tau.clone());
                let anchor =
                    s.clone() + (chi_tau.clone() + slope * (r - tau.clone())) * width.clone();
                let step = (t.clone() - anchor.clone()).div_int((l - i) as i64);
                knots.push(anchor);
                for _ in i + 1..l {
                    let prev = knots.last().expect("nonempty").clone();
                    knots.push(prev + step.clone());
                }
                break;
            }
        }
        knots.push(t.clone());
        Self::from_knots(knots)
    }

    /// The r-fold uniform refinement: every subinterval is split into `r`
    /// equal parts; the original knots are preserved bit-exactly.
    pub fn refined(&self, r: usize) -> Result<Self, MeshError> {
        if r == 0 {
            return Err(MeshError::InvalidRefinement);
        }
        let l = self.intervals();
        let mut knots = Vec::with_capacity(r * l + 1);
        for i in 0..l {
            let step = (self.knots[i + 1].clone() - self.knots[i].clone()).div_int(r as i64);
            knots.push(self.knots[i].clone());
            for _ in 1..r {
                let prev = knots.last().expect("nonempty").clone();
                knots.push(prev + step.clone());
            }
        }
        knots.push(self.knots[l].clone());
        Self::from_knots(knots)
    }

    /// Wrap an explicit knot vector.
    ///
    /// The knots must be strictly increasing, at least two, and minted by a
    /// single precision context.
    pub fn from_knots(knots: Vec<T>) -> Result<Self, MeshError> {
        if knots.len() < 2 {
            return Err(MeshError::TooFewIntervals(knots.len().saturating_sub(1)));
        }
        let field = knots[0].field();
        if knots.iter().any(|k| k.field() != field) {
            return Err(MeshError::PrecisionMismatch);
        }
        for w in knots.windows(2) {
            if w[1] <= w[0] {
                return Err(MeshError::NotIncreasing);
            }
        }
        Ok(Self { knots })
    }

    /// The number of subintervals l.
    pub fn intervals(&self) -> usize {
        self.knots.len() - 1
    }

    /// The knot vector ξ₀, …, ξ_l.
    pub fn knots(&self) -> &[T] {
        &self.knots
    }

    /// The knot ξᵢ.
    pub fn knot(&self, i: usize) -> &T {
        &self.knots[i]
    }

    /// The left endpoint s = ξ₀.
    pub fn start(&self) -> &T {
        &self.knots[0]
    }

    /// The right endpoint t = ξ_l.
    pub fn end(&self) -> &T {
        &self.knots[self.knots.len() - 1]
    }
}

/// Fill `(prev, end]` with `count` uniform steps, pinning the final knot
/// to `end` itself.
fn push_uniform_piece<T: Real>(knots: &mut Vec<T>, end: &T, count: usize) {
    let start = knots.last().expect("nonempty").clone();
    let step = (end.clone() - start).div_int(count as i64);
    for _ in 1..count {
        let prev = knots.last().expect("nonempty").clone();
        knots.push(prev + step.clone());
    }
    knots.push(end.clone());
}

/// The Bakhvalov transition point τ: the fixed point of
/// τ ← q − c·(1 − τ)/(1 − χ(τ)), c = σε/β, iterated from τ = 0 until two
/// successive values agree bit-exactly. Returns zero in the degenerate case
/// σε ≥ βq.
pub fn bakhvalov_transition<T: Real>(
    q: &T,
    sigma: &T,
    beta: &T,
    epsilon: &T,
) -> Result<T, MeshError> {
    validate_layer(q, q, sigma, beta, epsilon)?;
    let field = q.field();
    if sigma.clone() * epsilon.clone() >= beta.clone() * q.clone() {
        return Ok(field.zero());
    }

    let c = sigma.clone() * epsilon.clone() / beta.clone();
    let one = field.one();
    let mut tau = field.zero();
    let mut before_last = field.zero();
    for sweep in 0..TRANSITION_SWEEP_CAP {
        let chi = -(c.clone() * ((q.clone() - tau.clone()) / q.clone()).ln());
        let next =
            q.clone() - c.clone() * (one.clone() - tau.clone()) / (one.clone() - chi);
        // Stationary, or caught in a last-place two-cycle of the rounding.
        if (next.clone() - tau.clone()).is_zero() || (sweep > 0 && next == before_last) {
            debug!("bakhvalov transition settled after {sweep} sweeps: tau={:e}", next.to_f64());
            return Ok(next);
        }
        before_last = tau;
        tau = next;
    }
    Err(MeshError::TransitionNotSettled)
}

fn validate_interval<T: Real>(l: usize, s: &T, t: &T) -> Result<(), MeshError> {
    if l < 1 {
        return Err(MeshError::TooFewIntervals(l));
    }
    if s.field() != t.field() {
        return Err(MeshError::PrecisionMismatch);
    }
    if !(s < t) {
        return Err(MeshError::EmptyInterval);
    }
    Ok(())
}

fn validate_layer<T: Real>(
    anchor: &T,
    q: &T,
    shape: &T,
    scale: &T,
    epsilon: &T,
) -> Result<(), MeshError> {
    let field = anchor.field();
    if [q, shape, scale, epsilon].iter().any(|v| v.field() != field) {
        return Err(MeshError::PrecisionMismatch);
    }
    let zero = field.zero();
    let one = field.one();
    if *epsilon <= zero {
        return Err(MeshError::NonpositiveEpsilon);
    }
    if *shape <= zero || *scale <= zero {
        return Err(MeshError::NonpositiveParameter);
    }
    if *q <= zero || *q >= one {
        return Err(MeshError::LayerFractionOutOfRange);
    }
    Ok(())
}

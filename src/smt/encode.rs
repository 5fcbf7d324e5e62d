//! CNF encoding of linear constraints for plain SAT backends.
//!
//! Every constraint is first normalized to positive weights: a term `w * x`
//! with `w < 0` is rewritten as `|w| * !x` and the bound is shifted by `|w|`.
//! A term of weight `w` then occupies `w` positions. With `n` positions,
//!
//! - `sum >= k` holds iff every set of `n - k + 1` positions contains a true
//!   literal, giving one clause per such subset;
//! - `sum <= k` holds iff no set of `k + 1` positions is all true, giving one
//!   negated clause per such subset;
//! - `sum = k` is both.
//!
//! This is the binomial encoding. It adds no auxiliary variables, so the
//! clause count grows with `C(n, k)` and is capped by [`MAX_CLAUSES`].

use crate::smt::cnf::Cnf;
use crate::smt::constraint::{Comparison, Constraint};
use crate::smt::error::SolveError;
use itertools::Itertools;

/// Upper bound on the clauses a single constraint may expand to.
pub const MAX_CLAUSES: u128 = 1_000_000;

/// A constraint rewritten over positive literal positions.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Normalized {
    positions: Vec<i32>,
    bound: i64,
}

fn normalize(constraint: &Constraint) -> Result<Normalized, SolveError> {
    let mut positions = Vec::new();
    let mut bound = constraint.bound;
    for &(var, weight) in constraint.sum.terms() {
        let overflow = || SolveError::WeightOverflow(weight);
        let magnitude = i64::try_from(weight.unsigned_abs()).map_err(|_| overflow())?;
        let lit = if weight > 0 {
            var.dimacs()
        } else {
            bound = bound.checked_add(magnitude).ok_or_else(overflow)?;
            -var.dimacs()
        };
        let copies = usize::try_from(magnitude).map_err(|_| overflow())?;
        if positions.len().saturating_add(copies) > usize::from(u16::MAX) {
            return Err(overflow());
        }
        positions.extend(std::iter::repeat_n(lit, copies));
    }
    Ok(Normalized { positions, bound })
}

/// Number of `r`-subsets of an `n`-set, saturating at `u128::MAX`.
fn binomial(n: usize, r: usize) -> u128 {
    if r > n {
        return 0;
    }
    let r = r.min(n - r);
    let mut acc: u128 = 1;
    for i in 0..r {
        acc = match acc.checked_mul((n - i) as u128) {
            Some(v) => v / (i as u128 + 1),
            None => return u128::MAX,
        };
    }
    acc
}

fn check_size(n: usize, subset: usize) -> Result<(), SolveError> {
    let clauses = binomial(n, subset);
    if clauses > MAX_CLAUSES {
        return Err(SolveError::EncodingTooLarge {
            positions: n,
            clauses,
        });
    }
    Ok(())
}

fn encode_at_least(cnf: &mut Cnf, positions: &[i32], bound: i64) -> Result<usize, SolveError> {
    let n = positions.len();
    if bound <= 0 {
        return Ok(0);
    }
    let Ok(k) = usize::try_from(bound) else {
        cnf.add_clause([]);
        return Ok(1);
    };
    if k > n {
        cnf.add_clause([]);
        return Ok(1);
    }
    let subset = n - k + 1;
    check_size(n, subset)?;
    let mut added = 0;
    for combo in positions.iter().copied().combinations(subset) {
        if cnf.add_clause(combo) {
            added += 1;
        }
    }
    Ok(added)
}

fn encode_at_most(cnf: &mut Cnf, positions: &[i32], bound: i64) -> Result<usize, SolveError> {
    let n = positions.len();
    if bound < 0 {
        cnf.add_clause([]);
        return Ok(1);
    }
    let k = usize::try_from(bound).unwrap_or(usize::MAX);
    if k >= n {
        return Ok(0);
    }
    check_size(n, k + 1)?;
    let mut added = 0;
    for combo in positions.iter().copied().combinations(k + 1) {
        if cnf.add_clause(combo.into_iter().map(|lit| -lit)) {
            added += 1;
        }
    }
    Ok(added)
}

/// Appends the clauses of `constraint` to `cnf`.
///
/// Returns the number of clauses added. An impossible bound adds the empty
/// clause; a bound every assignment meets adds nothing.
///
/// # Errors
///
/// [`SolveError::EncodingTooLarge`] if the encoding would exceed
/// [`MAX_CLAUSES`], [`SolveError::WeightOverflow`] for weights too large to
/// expand.
pub fn encode_constraint(cnf: &mut Cnf, constraint: &Constraint) -> Result<usize, SolveError> {
    let Normalized { positions, bound } = normalize(constraint)?;
    let added = match constraint.comparison {
        Comparison::Ge => encode_at_least(cnf, &positions, bound)?,
        Comparison::Le => encode_at_most(cnf, &positions, bound)?,
        Comparison::Eq => {
            encode_at_least(cnf, &positions, bound)? + encode_at_most(cnf, &positions, bound)?
        }
    };
    tracing::debug!(
        "Encoded `{constraint}` over {} positions into {added} clauses",
        positions.len()
    );
    Ok(added)
}

//! Algebraic laws of quasimodular forms, checked on Eisenstein series and
//! on forms over a nontrivial lattice.

use std::sync::Arc;

use weilrep::eisenstein::{eisenstein_e2, eisenstein_series};
use weilrep::{
    factorial, Additive, FormAlgebra, FormError, GramMatrix, Multiplicative, QSeries, QuasiForm,
    Scalar, WeilRep, WeilRepModularForm, Weight,
};

fn integer(n: i64) -> Scalar {
    Scalar::from_integer(n.into())
}

fn a1() -> Arc<WeilRep> {
    Arc::new(WeilRep::new(GramMatrix::diagonal(&[-2])).unwrap())
}

// weight 3/2 on the A1 lattice, depth 1
fn theta_like() -> QuasiForm {
    let w = a1();
    let head = WeilRepModularForm::new(
        Weight::new(-1, 2),
        Arc::clone(&w),
        vec![QSeries::from_integers(&[1], 6), QSeries::from_integers(&[2, 1], 6)],
    )
    .unwrap();
    let base = WeilRepModularForm::new(
        Weight::new(3, 2),
        w,
        vec![QSeries::from_integers(&[1, 0, 6], 6), QSeries::from_integers(&[4, 0, 0, 8], 6)],
    )
    .unwrap();
    QuasiForm::new(Weight::new(3, 2), &GramMatrix::diagonal(&[-2]), vec![head, base]).unwrap()
}

// ============================================================================
// Negation and addition
// ============================================================================

#[test]
fn sum_with_negation_is_zero() {
    for f in [eisenstein_e2(6).unwrap(), theta_like()] {
        let z = f.try_add(&-&f).unwrap();
        assert!(matches!(z, QuasiForm::Plain(_)));
        assert!(z.is_zero());
        assert_eq!(z.as_form(), &f.weilrep().zero(f.weight(), f.precision()));
    }
}

#[test]
fn incompatible_lattices_fail_addition() {
    let e2 = eisenstein_e2(6).unwrap();
    let err = e2.try_add(&theta_like()).unwrap_err();
    assert_eq!(
        err,
        FormError::IncompatibleGramMatrices {
            left: GramMatrix::empty(),
            right: GramMatrix::diagonal(&[-2]),
        }
    );
}

#[test]
fn incompatible_weights_fail_addition() {
    let e2 = eisenstein_e2(6).unwrap();
    let e4 = QuasiForm::from(eisenstein_series(4, 6).unwrap());
    assert!(matches!(e2.try_sub(&e4), Err(FormError::IncompatibleWeights { .. })));
}

#[test]
fn scalar_division() {
    let e2 = eisenstein_e2(6).unwrap();
    let half = e2.try_div(&integer(2)).unwrap();
    assert_eq!(half.try_add(&half).unwrap(), e2);
    assert_eq!(e2.try_div(&integer(0)), Err(FormError::DivisionByZero));
}

// ============================================================================
// Tensor products and powers
// ============================================================================

#[test]
fn product_depths_and_weights_add() {
    let e2 = eisenstein_e2(6).unwrap();
    let t = theta_like();
    let p = e2.try_mul(&t).unwrap();
    assert_eq!(p.depth(), e2.depth() + t.depth());
    assert_eq!(p.weight(), e2.weight() + t.weight());
    assert_eq!(p.gram_matrix(), &GramMatrix::diagonal(&[-2]));
    for (i, term) in p.terms().iter().enumerate() {
        let expected = p.weight() - Weight::from(2 * (p.depth() - i) as i64);
        assert_eq!(term.weight(), expected);
    }
}

#[test]
fn product_on_direct_sum_lattice() {
    let t = theta_like();
    let tt = t.try_mul(&t).unwrap();
    assert_eq!(tt.depth(), 2);
    assert_eq!(tt.gram_matrix(), &GramMatrix::diagonal(&[-2, -2]));
    assert_eq!(tt.weilrep().len(), 4);
    // the depth-2 head is head ⊗ head
    let head = &t.terms()[0];
    assert_eq!(tt.terms()[0], head.try_mul(head).unwrap());
}

#[test]
fn binary_exponentiation_law() {
    for f in [eisenstein_e2(5).unwrap(), theta_like()] {
        let f2 = f.pow(2).unwrap();
        let f4 = f.pow(4).unwrap();
        let chain = f
            .try_mul(&f)
            .and_then(|g| g.try_mul(&f))
            .and_then(|g| g.try_mul(&f))
            .unwrap();
        assert_eq!(f4, f2.pow(2).unwrap());
        assert_eq!(f4, chain);
        assert_eq!(f4.depth(), 4 * f.depth());
        assert_eq!(f.pow(3).unwrap(), f2.try_mul(&f).unwrap());
    }
}

#[test]
fn mixed_product_with_plain_form() {
    let e2 = eisenstein_e2(6).unwrap();
    let e4 = eisenstein_series(4, 6).unwrap();
    let p = e2.try_mul(&e4).unwrap();
    assert_eq!(p.depth(), 1);
    assert_eq!(p.weight(), Weight::from(6));
    assert_eq!(p.terms()[0], e2.terms()[0].try_mul(&e4).unwrap());
}

// ============================================================================
// Derivative
// ============================================================================

#[test]
fn derivative_of_weight_two_form() {
    // a depth-0 form of weight 2: term 0 is -2E, term 1 is D(E)
    let e = eisenstein_e2(6).unwrap().as_form().clone();
    let d = QuasiForm::from(e.clone()).derivative().unwrap();
    assert_eq!(d.depth(), 1);
    assert_eq!(d.weight(), Weight::from(4));
    assert_eq!(d.terms()[0], e.scale(&integer(-2)));
    assert_eq!(d.terms()[1], e.q_derivative());
}

#[test]
fn derivative_of_e2() {
    let e2 = eisenstein_e2(6).unwrap();
    let d = e2.derivative().unwrap();
    assert_eq!(d.depth(), 2);
    assert_eq!(d.weight(), Weight::from(4));
    let t = d.terms();
    assert_eq!(t[0].to_string(), "[(), 12 + O(q^6)]");
    assert_eq!(t[1], e2.as_form().scale(&integer(-2)));
    assert_eq!(t[2], e2.as_form().q_derivative());
}

#[test]
fn ramanujan_identity() {
    // D(E2) = (E2^2 - E4) / 12
    let e2 = eisenstein_e2(10).unwrap();
    let e4 = eisenstein_series(4, 10).unwrap();
    let square = e2.as_form().try_mul(e2.as_form()).unwrap();
    let rhs = square.try_sub(&e4).unwrap().try_div(&integer(12)).unwrap();
    assert_eq!(e2.derivative().unwrap().as_form(), &rhs);
}

#[test]
fn derivative_on_fractional_offsets() {
    let t = theta_like();
    let d = t.derivative().unwrap();
    assert_eq!(d.depth(), 2);
    // D(q^(1/4) (4 + 8 q^3)) = q^(1/4) (1 + 26 q^3)
    let last = &d.as_form().fourier_expansion()[1];
    assert_eq!(last.series(), &QSeries::from_integers(&[1, 0, 0, 26], 6));
}

// ============================================================================
// Shift and completion
// ============================================================================

#[test]
fn shift_lowers_weight_by_two() {
    for f in [eisenstein_e2(6).unwrap(), theta_like()] {
        for g in [f.clone(), f.derivative().unwrap(), f.pow(2).unwrap()] {
            let s = g.shift();
            assert_eq!(s.weight(), g.weight() - 2);
            assert_eq!(s.as_form().weight(), g.weight() - 2);
            assert_eq!(s.depth(), g.depth() - 1);
        }
    }
}

#[test]
fn shift_weights_terms_by_factorials() {
    let e2 = eisenstein_e2(6).unwrap();
    let d = e2.derivative().unwrap();
    let s = d.shift();
    // f_2 picks up 2!, f_1 picks up 1!
    assert_eq!(s.terms()[0], d.terms()[0].scale(&integer(2)));
    assert_eq!(s.terms()[1], d.terms()[1]);
}

#[test]
fn completion_recurrence() {
    let e2 = eisenstein_e2(6).unwrap();
    for f in [e2.clone(), e2.derivative().unwrap(), e2.pow(3).unwrap(), theta_like()] {
        let c = f.completion();
        assert_eq!(c.depth(), f.depth());
        assert_eq!(c.terms().len(), f.depth() + 1);
        let mut power = f.clone();
        let mut divisor = integer(1);
        for i in 0..=f.depth() {
            divisor *= factorial(i);
            assert_eq!(c[i], power.try_div(&divisor).unwrap());
            assert_eq!(c[i].weight(), f.weight() - Weight::from(2 * i as i64));
            power = power.shift();
        }
        for i in 1..=f.depth() {
            assert_eq!(c[i], c[i - 1].shift().try_div(&factorial(i)).unwrap());
        }
    }
}

#[test]
fn completion_exposes_each_term() {
    let e2 = eisenstein_e2(6).unwrap();
    let w = Arc::new(WeilRep::trivial());
    let constants = [4, 3, 2, 1]
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            WeilRepModularForm::new(
                Weight::from(2 * i as i64),
                Arc::clone(&w),
                vec![QSeries::from_integers(&[c], 5)],
            )
            .unwrap()
        })
        .collect();
    let depth_three = QuasiForm::new(Weight::from(6), &GramMatrix::empty(), constants).unwrap();
    for f in [depth_three, e2.pow(3).unwrap(), e2.derivative().unwrap().derivative().unwrap()] {
        let c = f.completion();
        assert_eq!(c.depth(), 3);
        for i in 0..=3 {
            assert_eq!(c[i].as_form(), &f.terms()[3 - i]);
        }
    }
}

#[test]
fn e2_end_to_end() {
    let e2 = eisenstein_e2(5).unwrap();
    let c = e2.completion();
    assert_eq!(c.terms().len(), 2);
    assert_eq!(c[1], e2.shift());
    assert_eq!(c[1].to_string(), "[(), -12 + O(q^5)]");
    let text = c.to_string();
    assert!(text.starts_with(
        "Almost holomorphic modular form f_0 + f_1 * (4 pi y)^(-1), where:\nf_0 =\n"
    ));
    assert!(text.ends_with("f_1 =\n[(), -12 + O(q^5)]"));
}

// ============================================================================
// Display
// ============================================================================

fn series(halves: &[i64]) -> QSeries {
    let coefficients = halves
        .iter()
        .map(|&c| Scalar::new(c.into(), 2.into()))
        .collect();
    QSeries::new(0, coefficients, 5)
}

#[test]
fn theta_completion_display() {
    // theta series of -2 I_2 with the polynomial x^2, as weight 3 and depth 1
    let w = Arc::new(WeilRep::new(GramMatrix::diagonal(&[-2, -2])).unwrap());
    let f0 = WeilRepModularForm::new(
        Weight::from(3),
        Arc::clone(&w),
        vec![
            series(&[0, 4, 8, 0, 16]),
            series(&[1, 2, 9, 18, 2]),
            series(&[0, 8, 0, 8, 32]),
            series(&[2, 0, 20, 0, 18]),
        ],
    )
    .unwrap();
    let f1 = WeilRepModularForm::new(
        Weight::from(1),
        w,
        vec![
            series(&[-1, -4, -4, 0, -4]),
            series(&[-2, -4, -2, -4, -4]),
            series(&[-2, -4, -2, -4, -4]),
            series(&[-4, 0, -8, 0, -4]),
        ],
    )
    .unwrap();
    let gram = GramMatrix::diagonal(&[-2, -2]);
    let f = QuasiForm::new(Weight::from(3), &gram, vec![f1, f0]).unwrap();
    let expected = [
        "Almost holomorphic modular form f_0 + f_1 * (4 pi y)^(-1), where:",
        "f_0 =",
        "[(0, 0), 2*q + 4*q^2 + 8*q^4 + O(q^5)]",
        "[(1/2, 0), 1/2*q^(1/4) + q^(5/4) + 9/2*q^(9/4) + 9*q^(13/4) + q^(17/4) + O(q^(21/4))]",
        "[(0, 1/2), 4*q^(5/4) + 4*q^(13/4) + 16*q^(17/4) + O(q^(21/4))]",
        "[(1/2, 1/2), q^(1/2) + 10*q^(5/2) + 9*q^(9/2) + O(q^(11/2))]",
        "-".repeat(80).as_str(),
        "f_1 =",
        "[(0, 0), -1/2 - 2*q - 2*q^2 - 2*q^4 + O(q^5)]",
        "[(1/2, 0), -q^(1/4) - 2*q^(5/4) - q^(9/4) - 2*q^(13/4) - 2*q^(17/4) + O(q^(21/4))]",
        "[(0, 1/2), -q^(1/4) - 2*q^(5/4) - q^(9/4) - 2*q^(13/4) - 2*q^(17/4) + O(q^(21/4))]",
        "[(1/2, 1/2), -2*q^(1/2) - 4*q^(5/2) - 2*q^(9/2) + O(q^(11/2))]",
    ]
    .join("\n");
    assert_eq!(f.completion().to_string(), expected);
}

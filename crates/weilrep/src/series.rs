//! Truncated q-series with exact coefficients.
//!
//! A [`QSeries`] is `Σ c_n q^n + O(q^prec)` with finitely many nonzero
//! rational coefficients. Negative exponents are allowed, so weakly
//! holomorphic components fit as well. Components of vector-valued forms
//! additionally carry a fractional exponent offset, which only enters
//! through [`QSeries::derivative`] and [`QSeries::display_with_offset`].
//!
//! The representation is normalized on construction: no coefficient is
//! stored at or beyond the precision, and the stored window starts and ends
//! with a nonzero coefficient.

use core::fmt;
use core::ops::{Add, Mul, Neg, Sub};

use num_traits::{One, Signed, Zero};

use crate::core::scalar::{floor, integer, is_integral, to_scalar, Offset, Scalar};

/// A truncated Laurent series in `q`.
///
/// # Example
///
/// ```
/// use weilrep::QSeries;
///
/// let f = QSeries::from_integers(&[1, -24, -72], 3);
/// assert_eq!(f.valuation(), Some(0));
/// assert_eq!(f.to_string(), "1 - 24*q - 72*q^2 + O(q^3)");
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QSeries {
    start: i64,
    coefficients: Vec<Scalar>,
    precision: i64,
}

impl QSeries {
    /// `Σ coefficients[i] q^(start + i) + O(q^precision)`.
    #[must_use]
    pub fn new(start: i64, coefficients: Vec<Scalar>, precision: i64) -> Self {
        let mut series = Self {
            start,
            coefficients,
            precision,
        };
        series.normalize();
        series
    }

    /// Series with integer coefficients starting at `q^0`.
    #[must_use]
    pub fn from_integers(coefficients: &[i64], precision: i64) -> Self {
        Self::new(0, coefficients.iter().map(|&c| integer(c)).collect(), precision)
    }

    /// `O(q^precision)`.
    #[inline]
    #[must_use]
    pub fn zero(precision: i64) -> Self {
        Self {
            start: precision,
            coefficients: Vec::new(),
            precision,
        }
    }

    /// `c + O(q^precision)`.
    #[must_use]
    pub fn constant(c: Scalar, precision: i64) -> Self {
        Self::new(0, vec![c], precision)
    }

    fn normalize(&mut self) {
        if self.start >= self.precision {
            self.coefficients.clear();
        } else {
            let room = usize::try_from(self.precision - self.start).unwrap_or(usize::MAX);
            self.coefficients.truncate(room);
        }
        while self.coefficients.last().is_some_and(Zero::is_zero) {
            self.coefficients.pop();
        }
        let leading = self.coefficients.iter().take_while(|c| c.is_zero()).count();
        if leading > 0 {
            self.coefficients.drain(..leading);
            self.start += leading as i64;
        }
        if self.coefficients.is_empty() {
            self.start = self.precision;
        }
    }

    /// Exponent of the big-O term.
    #[inline]
    #[must_use]
    pub fn precision(&self) -> i64 {
        self.precision
    }

    /// Exponent of the first nonzero coefficient, `None` for `O(q^prec)`.
    #[inline]
    #[must_use]
    pub fn valuation(&self) -> Option<i64> {
        if self.coefficients.is_empty() {
            None
        } else {
            Some(self.start)
        }
    }

    /// Returns true if every known coefficient vanishes.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// Coefficient of `q^n` (zero outside the stored window).
    #[must_use]
    pub fn coefficient(&self, n: i64) -> Scalar {
        if n < self.start {
            return Scalar::zero();
        }
        usize::try_from(n - self.start)
            .ok()
            .and_then(|i| self.coefficients.get(i))
            .cloned()
            .unwrap_or_else(Scalar::zero)
    }

    /// Nonzero terms `(n, c_n)` in increasing exponent.
    pub fn terms(&self) -> impl Iterator<Item = (i64, &Scalar)> + '_ {
        self.coefficients
            .iter()
            .enumerate()
            .filter(|(_, c)| !c.is_zero())
            .map(move |(i, c)| (self.start + i as i64, c))
    }

    fn end(&self) -> i64 {
        self.start + self.coefficients.len() as i64
    }

    // valuation, or the precision for a zero series
    fn order(&self) -> i64 {
        self.valuation().unwrap_or(self.precision)
    }

    /// Lowers the precision to `min(self.precision(), precision)`.
    #[must_use]
    pub fn truncate(&self, precision: i64) -> Self {
        Self::new(
            self.start,
            self.coefficients.clone(),
            self.precision.min(precision),
        )
    }

    /// Multiplication by `q^k`.
    #[must_use]
    pub fn shift_exponent(&self, k: i64) -> Self {
        Self {
            start: self.start + k,
            coefficients: self.coefficients.clone(),
            precision: self.precision + k,
        }
    }

    /// Coefficientwise multiplication by `c`.
    #[must_use]
    pub fn scale(&self, c: &Scalar) -> Self {
        if c.is_zero() {
            return Self::zero(self.precision);
        }
        Self {
            start: self.start,
            coefficients: self.coefficients.iter().map(|x| x * c).collect(),
            precision: self.precision,
        }
    }

    fn combine(&self, other: &Self, op: impl Fn(Scalar, Scalar) -> Scalar) -> Self {
        let precision = self.precision.min(other.precision);
        let lo = self.start.min(other.start);
        let hi = self.end().max(other.end()).min(precision);
        if lo >= hi {
            return Self::zero(precision);
        }
        let coefficients = (lo..hi)
            .map(|n| op(self.coefficient(n), other.coefficient(n)))
            .collect();
        Self::new(lo, coefficients, precision)
    }

    /// Formal derivative `q d/dq` of `q^offset · self`, divided back by
    /// `q^offset`.
    ///
    /// The coefficient of `q^n` becomes `(n + offset) c_n`. The precision
    /// drops by `floor(offset)`. A zero series stays `O(q^prec)`.
    ///
    /// # Example
    ///
    /// ```
    /// use weilrep::{Offset, QSeries};
    ///
    /// let f = QSeries::from_integers(&[5, 1, 2], 3);
    /// let df = f.derivative(Offset::from(0));
    /// assert_eq!(df, QSeries::from_integers(&[0, 1, 4], 3));
    /// ```
    #[must_use]
    pub fn derivative(&self, offset: Offset) -> Self {
        if self.is_zero() {
            return Self::zero(self.precision);
        }
        let offset_scalar = to_scalar(&offset);
        let coefficients = self
            .coefficients
            .iter()
            .enumerate()
            .map(|(i, c)| c * (integer(self.start + i as i64) + &offset_scalar))
            .collect();
        Self::new(self.start, coefficients, self.precision - floor(&offset))
    }

    /// Renders the series as the expansion of `q^offset · self`, e.g.
    /// `1/2*q^(1/4) + q^(5/4) + O(q^(9/4))`.
    #[must_use]
    pub fn display_with_offset(&self, offset: Offset) -> SeriesDisplay<'_> {
        SeriesDisplay {
            series: self,
            offset,
        }
    }
}

impl Add for &QSeries {
    type Output = QSeries;

    fn add(self, other: Self) -> QSeries {
        self.combine(other, |a, b| a + b)
    }
}

impl Sub for &QSeries {
    type Output = QSeries;

    fn sub(self, other: Self) -> QSeries {
        self.combine(other, |a, b| a - b)
    }
}

impl Neg for &QSeries {
    type Output = QSeries;

    fn neg(self) -> QSeries {
        QSeries {
            start: self.start,
            coefficients: self.coefficients.iter().map(|c| -c).collect(),
            precision: self.precision,
        }
    }
}

/// Cauchy product. The result is known up to
/// `min(prec(f) + val(g), prec(g) + val(f))`.
impl Mul for &QSeries {
    type Output = QSeries;

    fn mul(self, other: Self) -> QSeries {
        let precision = (self.precision + other.order()).min(other.precision + self.order());
        if self.is_zero() || other.is_zero() {
            return QSeries::zero(precision);
        }
        let mut coefficients =
            vec![Scalar::zero(); self.coefficients.len() + other.coefficients.len() - 1];
        for (i, a) in self.coefficients.iter().enumerate() {
            for (j, b) in other.coefficients.iter().enumerate() {
                coefficients[i + j] += a * b;
            }
        }
        QSeries::new(self.start + other.start, coefficients, precision)
    }
}

/// Display adapter returned by [`QSeries::display_with_offset`].
#[derive(Debug)]
pub struct SeriesDisplay<'a> {
    series: &'a QSeries,
    offset: Offset,
}

fn write_power(f: &mut fmt::Formatter<'_>, exponent: &Offset) -> fmt::Result {
    if exponent.is_one() {
        write!(f, "q")
    } else if is_integral(exponent) {
        write!(f, "q^{exponent}")
    } else {
        write!(f, "q^({exponent})")
    }
}

impl fmt::Display for SeriesDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (n, c) in self.series.terms() {
            let exponent = Offset::from(n) + self.offset;
            match (first, c.is_negative()) {
                (true, true) => write!(f, "-")?,
                (true, false) => {}
                (false, true) => write!(f, " - ")?,
                (false, false) => write!(f, " + ")?,
            }
            first = false;
            let magnitude = c.abs();
            if exponent.is_zero() {
                write!(f, "{magnitude}")?;
                continue;
            }
            if !magnitude.is_one() {
                write!(f, "{magnitude}*")?;
            }
            write_power(f, &exponent)?;
        }
        if !first {
            write!(f, " + ")?;
        }
        let bound = Offset::from(self.series.precision) + self.offset;
        if bound.is_zero() {
            write!(f, "O(1)")
        } else {
            write!(f, "O(")?;
            write_power(f, &bound)?;
            write!(f, ")")
        }
    }
}

impl fmt::Display for QSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.display_with_offset(Offset::zero()), f)
    }
}

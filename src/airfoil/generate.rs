use crate::airfoil::{Airfoil, CamberStation};
use crate::algorithms::CubicSpline;
use crate::errors::GenerationError;
use ncollide2d::na::{Point2, Vector2};

const EPSILON: f64 = 1e-6;

// Thickness distribution coefficients shared by the 4 and 5 digit families
const A0: f64 = 0.2969;
const A1: f64 = -0.1260;
const A2: f64 = -0.3516;
const A3: f64 = 0.2843;
pub(crate) const A4_CLOSED: f64 = -0.1036;
const A4_FINITE: f64 = -0.1015;

/// An AirfoilGenerator is an entity which can generate the x, y position of the mean camber line
/// and the airfoil thickness at fractions of the chord. This provides the information necessary
/// for a generator to compute the airfoil surfaces. All values are for a unit chord.
pub trait AirfoilGenerator {
    /// Return a 2D point with the position of the camber line at a fraction from 0.0 to 1.0
    fn camber_line(&self, x: f64) -> Point2<f64>;

    /// Return the full thickness of the airfoil with respect to the camber line at a fraction from
    /// 0.0 to 1.0
    fn thickness(&self, x: f64) -> f64;

    /// Slope dy/dx of the camber line. The default is a central difference, generators with a
    /// closed form derivative should override it.
    fn camber_slope(&self, x: f64) -> f64 {
        let x0 = (x - EPSILON).max(0.0);
        let x1 = (x + EPSILON).min(1.0);
        let c0 = self.camber_line(x0);
        let c1 = self.camber_line(x1);
        (c1.y - c0.y) / (c1.x - c0.x)
    }

    /// The camber point at x with the upper and lower surface points offset perpendicular to the
    /// camber line by half the thickness
    fn station_at(&self, x: f64) -> CamberStation {
        let clx = self.camber_line(x);
        let theta = self.camber_slope(x).atan();
        let n = Vector2::new(-theta.sin(), theta.cos());
        let half = self.thickness(x) / 2.0;

        CamberStation::new(clx, clx + n * half, clx - n * half)
    }

    /// Generates the airfoil surfaces at the given chord fractions, which must run from 0.0 to
    /// 1.0 in ascending order
    fn generate(&self, fractions: &[f64]) -> Airfoil {
        let stations: Vec<CamberStation> = fractions.iter().map(|x| self.station_at(*x)).collect();
        Airfoil::from_stations(&stations)
    }
}

/// Full thickness of the standard NACA thickness distribution for a maximum thickness t_max
pub(crate) fn naca_thickness(t_max: f64, a4: f64, x: f64) -> f64 {
    let x = x.clamp(0.0, 1.0);
    (10.0 * t_max)
        * (A0 * x.sqrt() + A1 * x + A2 * x.powi(2) + A3 * x.powi(3) + a4 * x.powi(4))
}

/// Splits a NACA designation into its digits, checking the expected length
fn naca_digits(code: &str, count: usize) -> Result<Vec<u32>, GenerationError> {
    let code = code.trim();
    if code.chars().count() != count {
        return Err(GenerationError::invalid_code(
            code,
            if count == 4 {
                "expected 4 digits"
            } else {
                "expected 5 digits"
            },
        ));
    }

    code.chars()
        .map(|c| c.to_digit(10))
        .collect::<Option<Vec<u32>>>()
        .ok_or_else(|| GenerationError::invalid_code(code, "contains a non-digit character"))
}

/// A generator for a NACA 4-digit airfoil of the form MPTT, where M is the maximum camber P is the
/// location of the maximum camber, and TT is the maximum thickness of the airfoil as a fraction of
/// the chord.  For example, a NACA 2412 airfoil has a 2% camber at 40% of the chord and a max
/// thickness which is 12% of the chord length.
#[derive(Clone, Debug)]
pub struct Naca4Digit {
    t: f64,
    m: f64,
    p: f64,
    a4: f64,
}

impl Naca4Digit {
    /// Create a new NACA 4 digit generator.
    ///
    /// # Arguments
    ///
    /// * `t_max` - the maximum thickness of the airfoil as a fraction of the chord length. For
    /// instance, on a NACA 2412 t_max should be 0.12
    ///
    /// * `max_camber` - The max camber as a fraction, for example on a NACA 2412 this value should
    /// be set to 0.02
    ///
    /// * `max_camber_chord` - The location of the max camber as a fraction of chord length. For
    /// example on a NACA 2412 this values should be 0.4
    ///
    /// * `finite_te` - use the thickness coefficient which leaves a small trailing edge gap
    /// instead of closing the trailing edge
    pub fn new(t_max: f64, max_camber: f64, max_camber_chord: f64, finite_te: bool) -> Naca4Digit {
        Naca4Digit {
            t: t_max,
            m: max_camber,
            p: max_camber_chord,
            a4: if finite_te { A4_FINITE } else { A4_CLOSED },
        }
    }

    /// Parse a designation such as "2412"
    pub fn from_code(code: &str, finite_te: bool) -> Result<Naca4Digit, GenerationError> {
        let d = naca_digits(code, 4)?;
        let m = d[0] as f64 / 100.0;
        let p = d[1] as f64 / 10.0;
        let t = (d[2] * 10 + d[3]) as f64 / 100.0;

        if t <= 0.0 {
            return Err(GenerationError::invalid_code(code, "zero thickness"));
        }
        if m > 0.0 && p <= 0.0 {
            return Err(GenerationError::invalid_code(
                code,
                "camber given without a camber position",
            ));
        }

        Ok(Naca4Digit::new(t, m, p, finite_te))
    }
}

impl AirfoilGenerator for Naca4Digit {
    fn camber_line(&self, x: f64) -> Point2<f64> {
        let y = if self.p < 1e-6 || self.m < 1e-9 {
            0.0
        } else if x < self.p {
            (self.m / self.p.powi(2)) * (2.0 * self.p * x - x.powi(2))
        } else {
            (self.m / (1.0 - self.p).powi(2))
                * ((1.0 - 2.0 * self.p) + 2.0 * self.p * x - x.powi(2))
        };

        Point2::new(x, y)
    }

    fn thickness(&self, x: f64) -> f64 {
        naca_thickness(self.t, self.a4, x)
    }

    fn camber_slope(&self, x: f64) -> f64 {
        if self.p < 1e-6 || self.m < 1e-9 {
            0.0
        } else if x < self.p {
            (2.0 * self.m / self.p.powi(2)) * (self.p - x)
        } else {
            (2.0 * self.m / (1.0 - self.p).powi(2)) * (self.p - x)
        }
    }
}

// Standard tables for the 5 digit mean line, indexed by the position of max camber
const NACA5_P: [f64; 5] = [0.05, 0.1, 0.15, 0.2, 0.25];
const NACA5_M: [f64; 5] = [0.0580, 0.1260, 0.2025, 0.2900, 0.3910];
const NACA5_K1: [f64; 5] = [361.4, 51.64, 15.957, 6.643, 3.230];

/// A generator for a NACA 5-digit airfoil of the form LPQTT. L times 0.15 is the design lift
/// coefficient, PQ/200 the position of the max camber and TT the thickness in percent of
/// chord. For example a NACA 23012 has a design lift coefficient of 0.3 with the max camber at
/// 15% of the chord and is 12% thick.
#[derive(Clone, Debug)]
pub struct Naca5Digit {
    t: f64,
    cl: f64,
    m: f64,
    k1: f64,
    a4: f64,
}

impl Naca5Digit {
    pub fn from_code(code: &str, finite_te: bool) -> Result<Naca5Digit, GenerationError> {
        let d = naca_digits(code, 5)?;
        let cl = d[0] as f64 * 0.15;
        let p = (d[1] * 10 + d[2]) as f64 / 200.0;
        let t = (d[3] * 10 + d[4]) as f64 / 100.0;

        if t <= 0.0 {
            return Err(GenerationError::invalid_code(code, "zero thickness"));
        }

        let (m, k1) = if p == 0.0 {
            (0.0, 0.0)
        } else if p < NACA5_P[0] || p > NACA5_P[NACA5_P.len() - 1] {
            return Err(GenerationError::invalid_code(
                code,
                "camber position outside the 5 digit tables",
            ));
        } else {
            let m = CubicSpline::natural(&NACA5_P, &NACA5_M).at(p);
            let k1 = CubicSpline::natural(&NACA5_M, &NACA5_K1).at(m);
            (m, k1)
        };

        Ok(Naca5Digit {
            t,
            cl,
            m,
            k1,
            a4: if finite_te { A4_FINITE } else { A4_CLOSED },
        })
    }

    fn is_symmetric(&self) -> bool {
        self.m <= 0.0 || self.cl <= 0.0
    }
}

impl AirfoilGenerator for Naca5Digit {
    fn camber_line(&self, x: f64) -> Point2<f64> {
        if self.is_symmetric() {
            return Point2::new(x, 0.0);
        }

        let m = self.m;
        let y = if x < m {
            self.k1 / 6.0 * (x.powi(3) - 3.0 * m * x.powi(2) + m.powi(2) * (3.0 - m) * x)
        } else {
            self.k1 / 6.0 * m.powi(3) * (1.0 - x)
        };

        Point2::new(x, y * self.cl / 0.3)
    }

    fn thickness(&self, x: f64) -> f64 {
        naca_thickness(self.t, self.a4, x)
    }

    fn camber_slope(&self, x: f64) -> f64 {
        if self.is_symmetric() {
            return 0.0;
        }

        let m = self.m;
        let slope = if x < m {
            self.k1 / 6.0 * (3.0 * x.powi(2) - 6.0 * m * x + m.powi(2) * (3.0 - m))
        } else {
            -self.k1 / 6.0 * m.powi(3)
        };
        slope * self.cl / 0.3
    }
}

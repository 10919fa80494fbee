use super::offset::{Offset, NEIGHBOURHOOD_4, NEIGHBOURHOOD_8};

/// The distance metric used by path and goal-map computations.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Distance {
    Manhattan,
    Chebyshev,
    Octile,
    Euclidean,
}

impl Distance {
    /// Floating-point distance under this metric, usable as an admissible
    /// A* heuristic for the matching neighbourhood.
    pub fn between(&self, a: &Offset, b: &Offset) -> f64 {
        match self {
            Distance::Manhattan => a.manhattan(b) as f64,
            Distance::Chebyshev => a.chebyshev(b) as f64,
            Distance::Octile => a.octile(b),
            Distance::Euclidean => a.euclidean(b),
        }
    }

    /// The stable-order unit neighbourhood this metric searches over:
    /// 4-way for Manhattan, 8-way otherwise.
    pub fn neighbourhood(&self) -> &'static [Offset] {
        match self {
            Distance::Manhattan => &NEIGHBOURHOOD_4,
            Distance::Chebyshev | Distance::Octile | Distance::Euclidean => &NEIGHBOURHOOD_8,
        }
    }

    /// Unit step cost along this metric's neighbourhood. Diagonal and
    /// cardinal steps are deliberately both costed at 1 for goal maps
    /// (spec: "descent" semantics), but A* uses the metric's true edge
    /// weight so the heuristic stays admissible.
    pub fn step_cost(&self, a: &Offset, b: &Offset) -> f64 {
        match self {
            Distance::Octile => {
                if a.x != b.x && a.y != b.y {
                    std::f64::consts::SQRT_2
                } else {
                    1.0
                }
            }
            _ => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_neighbourhood_is_four_way() {
        assert_eq!(Distance::Manhattan.neighbourhood().len(), 4);
    }

    #[test]
    fn octile_neighbourhood_is_eight_way() {
        assert_eq!(Distance::Octile.neighbourhood().len(), 8);
    }

    #[test]
    fn octile_step_cost_is_root_two_on_diagonal() {
        let a = Offset::new(0, 0);
        let b = Offset::new(1, 1);
        assert!((Distance::Octile.step_cost(&a, &b) - std::f64::consts::SQRT_2).abs() < 1e-9);
    }
}

/// Numeric tolerances used by classification and frontier filtering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerances {
    /// Absolute band around zero within which a utility delta counts as no change.
    pub zero: f64,
    /// Relative tolerance for "at least as good as" comparisons against the frontier.
    pub frontier: f64,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            zero: 1e-9,
            frontier: 1e-9,
        }
    }
}

impl Tolerances {
    pub fn zero(mut self, zero: f64) -> Self {
        self.zero = zero;
        self
    }

    pub fn frontier(mut self, frontier: f64) -> Self {
        self.frontier = frontier;
        self
    }
}

/// Evenly spaced samples over a closed interval, end points included exactly.
#[derive(Clone, Debug)]
pub(crate) struct Linspace {
    start: f64,
    end: f64,
    step: f64,
    index: usize,
    len: usize,
}

impl Linspace {
    pub(crate) fn new(min: f64, max: f64, n: usize) -> Self {
        let step = if n > 1 {
            let num_steps = (n - 1) as f64;
            (max - min) / num_steps
        } else {
            0.
        };
        Linspace {
            start: min,
            end: max,
            step,
            index: 0,
            len: n,
        }
    }

    /// Number of samples covering `[min, max]` at stride `res`, both ends inclusive.
    ///
    /// Quotients within a hair of an integer are treated as that integer, otherwise
    /// `1.3 / 0.0001 == 12999.999999999998` would silently drop the upper bound. A stride
    /// wider than the interval still samples both ends.
    ///
    /// The quotient must be finite and fit a `usize`, callers check it.
    pub(crate) fn count(min: f64, max: f64, res: f64) -> usize {
        let ratio = (max - min) / res;
        let nearest = ratio.round();
        let steps = if (ratio - nearest).abs() <= 1e-9 * nearest.max(1.) {
            nearest
        } else {
            ratio.floor()
        };

        steps.max(1.) as usize + 1
    }
}

impl Iterator for Linspace {
    type Item = f64;

    #[inline]
    fn next(&mut self) -> Option<f64> {
        if self.index >= self.len {
            None
        } else {
            // Calculate the value just like numpy.linspace does, pinning the last sample
            let i = self.index;
            self.index += 1;
            if i + 1 == self.len && self.len > 1 {
                Some(self.end)
            } else {
                Some(self.start + self.step * i as f64)
            }
        }
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.len - self.index;
        (n, Some(n))
    }
}

impl ExactSizeIterator for Linspace {}

#[test]
fn test_linspace_ends() {
    let points: Vec<_> = Linspace::new(-0.5, 1.5, Linspace::count(-0.5, 1.5, 0.5)).collect();

    assert_eq!(points, vec![-0.5, 0., 0.5, 1., 1.5]);
}

#[test]
fn test_count() {
    assert_eq!(Linspace::count(0., 10., 1.), 11);
    assert_eq!(Linspace::count(0., 1.3, 0.0001), 13001);
    assert_eq!(Linspace::count(-100., 100., 0.1), 2001);
    // not evenly divisible: floor, then spread
    assert_eq!(Linspace::count(0., 1., 0.3), 4);
    assert_eq!(Linspace::count(0., 1., 2.), 2);
    assert_eq!(Linspace::count(0., 1., 1.), 2);
}

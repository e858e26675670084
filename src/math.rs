use num::Float;

/// Similar to numpy.interp, for a single sample.
///
/// `coords` must be sorted by x. Outside of the covered range the nearest end value is held.
pub(crate) fn interp<F: Float>(x: F, coords: &[(F, F)]) -> F {
    let mut iter = coords.iter().copied().enumerate().peekable();

    while let Some((i, (x1, y1))) = iter.next() {
        // Base cases
        if i == 0 && x < x1 {
            return y1;
        }
        if iter.peek().is_none() && x > x1 {
            return y1;
        }

        let Some(&(_, (x2, y2))) = iter.peek() else {
            return y1;
        };

        // Actual interpolation
        if x1 <= x && x <= x2 {
            return y1 + (x - x1) * (y2 - y1) / (x2 - x1);
        }
    }

    // no coords at all
    F::zero()
}

#[test]
fn test_interp() {
    let xs = [(1., 3.), (2., 2.), (3., 0.)];
    let got: Vec<f64> = [0., 1., 1.5, 2.72, 3.24].into_iter().map(|x| interp(x, &xs)).collect();

    assert_eq!(got, vec![3., 3., 2.5, 0.5599999999999996, 0.]);

    let xs = [(0., 0.), (1., 2.), (2., 5.), (3., 3.), (4.5, 2.)];
    let got: Vec<f64> = [2.5, -1., 7.5].into_iter().map(|x| interp(x, &xs)).collect();

    assert_eq!(got, vec![4., 0., 2.]);
}

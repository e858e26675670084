//! Linguistic hedges reshape membership curves. They work on bare functions as well as on
//! sets, where the hedged set stays in the domain of the set it was made from.

use crate::functions::Membership;
use crate::set::Set;

pub trait Hedge: Sized {
    /// Sharpen memberships so that only the values close to 1 stay at the top.
    fn very(&self) -> Self;

    /// Sharpen memberships like [`Hedge::very`] but not as strongly.
    fn plus(&self) -> Self;

    /// Widen the support so that more values reach the top.
    fn minus(&self) -> Self;
}

fn raised(func: &Membership, exponent: f64) -> Membership {
    Membership::Power {
        exponent,
        func: Box::new(func.clone()),
    }
}

impl Hedge for Membership {
    fn very(&self) -> Self {
        raised(self, 2.)
    }

    fn plus(&self) -> Self {
        raised(self, 1.25)
    }

    fn minus(&self) -> Self {
        raised(self, 0.75)
    }
}

impl Hedge for Set {
    fn very(&self) -> Self {
        self.with_func(self.func().very())
    }

    fn plus(&self) -> Self {
        self.with_func(self.func().plus())
    }

    fn minus(&self) -> Self {
        self.with_func(self.func().minus())
    }
}

pub fn very<H: Hedge>(g: &H) -> H {
    g.very()
}

pub fn plus<H: Hedge>(g: &H) -> H {
    g.plus()
}

pub fn minus<H: Hedge>(g: &H) -> H {
    g.minus()
}

#[test]
fn test_hedges() {
    use crate::functions::constant;

    let half = constant(0.5).unwrap();

    assert_eq!(very(&half).evaluate(0.), 0.25);
    assert_eq!(half.plus().evaluate(0.), 0.5f64.powf(1.25));
    assert_eq!(minus(&half).evaluate(0.), 0.5f64.powf(0.75));
    assert!(very(&half).evaluate(0.) < half.evaluate(0.));
    assert!(minus(&half).evaluate(0.) > half.evaluate(0.));
}

#[test]
fn test_hedged_sets() {
    use crate::domain::Domain;
    use crate::functions::R;

    let d = Domain::new("d", 0., 10., 1.).unwrap();
    let rising = d.add_set("rising", R(0., 10.).unwrap()).unwrap();
    let very_rising = rising.very();

    assert_eq!(very_rising.domain(), Some(d.clone()));
    assert_eq!(very_rising.name(), None);
    assert_eq!(very_rising.call(5.), 0.25);
    assert!(very_rising.is_subset_of(&rising).unwrap());
    assert!(rising.is_subset_of(&minus(&rising)).unwrap());
    // the hedged set still reaches its domain
    assert_eq!(minus(&rising).domain(), Some(d));
}

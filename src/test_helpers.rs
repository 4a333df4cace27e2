pub trait TestHelper {
    fn assert_approx_eq(&self, expected: Self);
}

impl<const N: usize> TestHelper for [f64; N] {
    #[track_caller]
    fn assert_approx_eq(&self, expected: Self) {
        for (index, (value, expected)) in self.iter().zip(expected).enumerate() {
            assert!(
                (value - expected).abs() < 1e-3,
                "element {index}: {value} is not within 1e-3 of {expected}"
            );
        }
    }
}

/// Mean Earth radius in meters, the length unit edge weights are expected to use.
pub const EARTH_RADIUS: f64 = 6_371_000.;

#[macro_export]
/// Implementation of the Kahan-Babushka-Neumaier algorithm for reduced numerical error in summation
///
/// <https://en.wikipedia.org/wiki/Kahan_summation_algorithm#Further_enhancements>
macro_rules! kbn_summation {
    (for $pat: pat in $expr: expr => {
        $('loop: { $(let $loopvar: ident = $loopvar_expr: expr;)* })?
        $($var: ident += $var_expr: expr;)*
    }) => {
        let ($($var,)*) = {
            use paste::paste;
            paste! {
                $(
                    let mut $var: f64 = 0.;
                    let mut [<$var compensation>] = 0.;
                )*
                    for $pat in $expr {
                        $($(let $loopvar = $loopvar_expr;)*)?
                        $(
                            let input: f64 = $var_expr;
                            let t = $var + input;
                            [<$var compensation>] += if $var.abs() >= input.abs() {
                                ($var - t) + input
                            } else {
                                (input - t) + $var
                            };
                            $var = t;
                        )*
                    }
                ($($var + [<$var compensation>],)*)
            }
        };
    };
}

/// Great-circle distance between two `[latitude, longitude]` pairs given in degrees.
///
/// <https://en.wikipedia.org/wiki/Haversine_formula>
pub fn haversine(from: [f64; 2], to: [f64; 2]) -> f64 {
    let d_lat = (to[0] - from[0]).to_radians();
    let d_lon = (to[1] - from[1]).to_radians();
    let from_lat = from[0].to_radians();
    let to_lat = to[0].to_radians();

    let a = (d_lat / 2.).sin().powi(2) + (d_lon / 2.).sin().powi(2) * from_lat.cos() * to_lat.cos();
    EARTH_RADIUS * 2. * a.sqrt().asin()
}

#[cfg(test)]
mod tests {
    use super::haversine;

    #[test]
    fn test_summation() {
        use std::f64::consts::*;
        let input = [FRAC_PI_8, FRAC_PI_2, FRAC_PI_6, FRAC_PI_3, FRAC_PI_4];
        kbn_summation! {
            for x in input => {
                out += x;
            }
        }

        assert_ne!(input.iter().sum::<f64>(), out);
        assert_eq!(out, 4.31968989868596570288)
    }

    #[test]
    fn test_haversine_of_same_point_is_zero() {
        assert_eq!(haversine([41.15, -8.61], [41.15, -8.61]), 0.);
    }

    #[test]
    fn test_haversine_is_symmetric() {
        let porto = [41.1579, -8.6291];
        let lisbon = [38.7223, -9.1393];
        assert!((haversine(porto, lisbon) - haversine(lisbon, porto)).abs() < 1e-6);
    }

    #[test]
    fn test_haversine_of_one_degree_diagonal_at_equator() {
        let distance = haversine([0., 0.], [1., 1.]);
        assert!((distance - 157_249.4).abs() < 10., "{}", distance);
    }

    #[test]
    fn test_haversine_of_quarter_meridian() {
        let distance = haversine([0., 0.], [90., 0.]);
        let expected = super::EARTH_RADIUS * std::f64::consts::FRAC_PI_2;
        assert!((distance - expected).abs() < 1e-6);
    }
}

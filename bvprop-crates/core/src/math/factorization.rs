//! Factorization of 64-bit values by trial division of small factors, Miller-Rabin primality
//! tests and Pollard's rho method for the remaining composites.
use itertools::Itertools;

/// Factors below this bound are removed by trial division.
const TRIAL_DIVISION_BOUND: u64 = 1 << 10;

/// Witnesses for which Miller-Rabin is deterministic on every 64-bit value.
const WITNESSES: [u64; 12] = [2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37];

fn mul_mod(lhs: u64, rhs: u64, modulus: u64) -> u64 {
    (u128::from(lhs) * u128::from(rhs) % u128::from(modulus)) as u64
}

fn pow_mod(mut base: u64, mut exponent: u64, modulus: u64) -> u64 {
    let mut result = 1 % modulus;
    base %= modulus;
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = mul_mod(result, base, modulus);
        }
        base = mul_mod(base, base, modulus);
        exponent >>= 1;
    }
    result
}

fn gcd(mut lhs: u64, mut rhs: u64) -> u64 {
    while rhs != 0 {
        (lhs, rhs) = (rhs, lhs % rhs);
    }
    lhs
}

fn is_prime(value: u64) -> bool {
    if value < 2 {
        return false;
    }
    if let Some(&witness) = WITNESSES.iter().find(|&&witness| value % witness == 0) {
        return value == witness;
    }

    let shift = (value - 1).trailing_zeros();
    let odd = (value - 1) >> shift;
    WITNESSES.iter().all(|&witness| {
        let mut x = pow_mod(witness, odd, value);
        if x == 1 || x == value - 1 {
            return true;
        }
        for _ in 1..shift {
            x = mul_mod(x, x, value);
            if x == value - 1 {
                return true;
            }
        }
        false
    })
}

/// Returns a non-trivial factor of the odd composite `value`.
fn pollard_rho(value: u64) -> u64 {
    let mut increment: u64 = 1;
    loop {
        let step = |x: u64| {
            ((u128::from(x) * u128::from(x) + u128::from(increment)) % u128::from(value)) as u64
        };
        let (mut slow, mut fast, mut factor) = (2, 2, 1);
        while factor == 1 {
            slow = step(slow);
            fast = step(step(fast));
            factor = gcd(slow.abs_diff(fast), value);
        }
        if factor != value {
            return factor;
        }
        // The sequence cycled without separating a factor; retry with another polynomial.
        increment += 1;
    }
}

fn collect_large_prime_factors(value: u64, factors: &mut Vec<u64>) {
    if value == 1 {
        return;
    }
    if is_prime(value) {
        factors.push(value);
        return;
    }
    let factor = pollard_rho(value);
    collect_large_prime_factors(factor, factors);
    collect_large_prime_factors(value / factor, factors);
}

/// The prime factors of `value`, with multiplicity and in ascending order.
fn prime_factors(mut value: u64) -> Vec<u64> {
    let mut factors = vec![];
    let mut candidate = 2;
    while candidate < TRIAL_DIVISION_BOUND && candidate * candidate <= value {
        while value % candidate == 0 {
            factors.push(candidate);
            value /= candidate;
        }
        candidate += 1;
    }
    if value > 1 {
        if candidate * candidate > value {
            factors.push(value);
        } else {
            collect_large_prime_factors(value, &mut factors);
        }
    }
    factors.sort_unstable();
    factors
}

/// All divisors of `value` in ascending order; `0` has no divisors in this sense.
pub(crate) fn divisors(value: u64) -> Vec<u64> {
    if value == 0 {
        return vec![];
    }

    let mut divisors = vec![1];
    for (exponent, prime) in prime_factors(value).into_iter().dedup_with_count() {
        let smaller = divisors.len();
        let mut power = 1;
        for _ in 0..exponent {
            power *= prime;
            let multiples = divisors[..smaller]
                .iter()
                .map(|divisor| divisor * power)
                .collect::<Vec<_>>();
            divisors.extend(multiples);
        }
    }
    divisors.sort_unstable();
    divisors
}

#[cfg(test)]
mod tests {
    use super::divisors;
    use super::is_prime;
    use super::prime_factors;

    #[test]
    fn primality_of_small_and_large_values() {
        let small_primes = (0..100).filter(|&value| is_prime(value)).collect::<Vec<_>>();
        assert_eq!(
            small_primes,
            vec![
                2, 3, 5, 7, 11, 13, 17, 19, 23, 29, 31, 37, 41, 43, 47, 53, 59, 61, 67, 71, 73, 79,
                83, 89, 97
            ]
        );
        assert!(is_prime(18_446_744_073_709_551_557));
        assert!(is_prime((1 << 61) - 1));
        // A strong pseudoprime to the bases 2, 3, 5 and 7.
        assert!(!is_prime(3_215_031_751));
    }

    #[test]
    fn factors_multiply_to_the_value() {
        for value in [
            1,
            2,
            1024,
            131_071 * 524_287,
            4_294_967_291 * 4_294_967_279,
            (1 << 61) - 1,
            u64::MAX,
            999_999_999_989 * 999_983,
        ] {
            let factors = prime_factors(value);
            assert_eq!(factors.iter().product::<u64>(), value, "{value}");
            assert!(factors.iter().all(|&factor| is_prime(factor)), "{value}");
        }
        assert_eq!(prime_factors(u64::MAX), vec![3, 5, 17, 257, 641, 65_537, 6_700_417]);
    }

    #[test]
    fn divisors_agree_with_trial_division() {
        for value in 1..2000_u64 {
            let expected = (1..=value).filter(|divisor| value % divisor == 0).collect::<Vec<_>>();
            assert_eq!(divisors(value), expected);
        }
        assert_eq!(
            divisors(131_071 * 524_287),
            vec![1, 131_071, 524_287, 131_071 * 524_287]
        );
        assert!(divisors(0).is_empty());
    }
}

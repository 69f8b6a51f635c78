//! Number-theoretic helpers which are not present in the standard library.
mod factorization;

pub(crate) use factorization::divisors;

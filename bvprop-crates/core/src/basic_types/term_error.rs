use thiserror::Error;

/// Errors related to building terms and adding constraints to the
/// [`Solver`](crate::Solver).
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum TermError {
    #[error("bit-width {0} is outside of the supported range 1..=64")]
    InvalidWidth(u32),
    #[error("operands have mismatching bit-widths {left} and {right}")]
    WidthMismatch { left: u32, right: u32 },
    #[error("expected a term of bit-width 1 but got a term of bit-width {0}")]
    NotBoolean(u32),
    #[error("extraction [{upper}:{lower}] is out of range for a term of bit-width {width}")]
    InvalidExtract { upper: u32, lower: u32, width: u32 },
}

#[cfg(all(not(test), not(feature = "debug-checks")))]
pub const BVPROP_ASSERT_LEVEL_DEFINITION: u8 = BVPROP_ASSERT_SIMPLE;

#[cfg(any(test, feature = "debug-checks"))]
pub const BVPROP_ASSERT_LEVEL_DEFINITION: u8 = BVPROP_ASSERT_ADVANCED;

pub const BVPROP_ASSERT_SIMPLE: u8 = 1;
pub const BVPROP_ASSERT_MODERATE: u8 = 2;
pub const BVPROP_ASSERT_ADVANCED: u8 = 3;

#[macro_export]
#[doc(hidden)]
macro_rules! bvprop_assert_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::BVPROP_ASSERT_LEVEL_DEFINITION >= $crate::asserts::BVPROP_ASSERT_SIMPLE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! bvprop_assert_eq_simple {
    ($($arg:tt)*) => {
        if $crate::asserts::BVPROP_ASSERT_LEVEL_DEFINITION >= $crate::asserts::BVPROP_ASSERT_SIMPLE {
            assert_eq!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! bvprop_assert_moderate {
    ($($arg:tt)*) => {
        if $crate::asserts::BVPROP_ASSERT_LEVEL_DEFINITION >= $crate::asserts::BVPROP_ASSERT_MODERATE {
            assert!($($arg)*);
        }
    };
}

#[macro_export]
#[doc(hidden)]
macro_rules! bvprop_assert_advanced {
    ($($arg:tt)*) => {
        if $crate::asserts::BVPROP_ASSERT_LEVEL_DEFINITION >= $crate::asserts::BVPROP_ASSERT_ADVANCED {
            assert!($($arg)*);
        }
    };
}

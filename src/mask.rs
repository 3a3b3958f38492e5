//! Membership masks of candidate families.
//!
//! A family over `n` points is a bit vector of width `2^n`: bit `s` is set
//! iff the subset with mask `s` is a member. The enumerator picks the
//! narrowest machine type that fits the width.

use num_bigint::BigUint;

/// Bit vector of width `2^n` used by the enumerator.
pub trait FamilyMask: Clone + Send + Sync {
    /// Largest `n` whose masks fit this type, if bounded.
    const MAX_POINTS: Option<usize>;

    /// The all-zero mask.
    fn zero() -> Self;

    fn get(&self, bit: u32) -> bool;

    fn set(&mut self, bit: u32);

    fn clear(&mut self, bit: u32);

    /// The mask as an arbitrary-precision integer.
    fn to_code(&self) -> BigUint;
}

macro_rules! impl_family_mask_for_primitive {
    ($t:ty, $points:expr) => {
        impl FamilyMask for $t {
            const MAX_POINTS: Option<usize> = Some($points);

            #[inline]
            fn zero() -> Self {
                0
            }

            #[inline]
            fn get(&self, bit: u32) -> bool {
                (*self >> bit) & 1 != 0
            }

            #[inline]
            fn set(&mut self, bit: u32) {
                *self |= (1 as $t) << bit;
            }

            #[inline]
            fn clear(&mut self, bit: u32) {
                *self &= !((1 as $t) << bit);
            }

            fn to_code(&self) -> BigUint {
                BigUint::from(*self)
            }
        }
    };
}

impl_family_mask_for_primitive!(u64, 6);
impl_family_mask_for_primitive!(u128, 7);

impl FamilyMask for BigUint {
    const MAX_POINTS: Option<usize> = None;

    fn zero() -> Self {
        BigUint::ZERO
    }

    fn get(&self, bit: u32) -> bool {
        self.bit(bit as u64)
    }

    fn set(&mut self, bit: u32) {
        self.set_bit(bit as u64, true);
    }

    fn clear(&mut self, bit: u32) {
        self.set_bit(bit as u64, false);
    }

    fn to_code(&self) -> BigUint {
        self.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    fn exercise<M: FamilyMask>(top: u32) {
        let mut mask = M::zero();
        mask.set(0);
        mask.set(top);
        assert!(mask.get(0));
        assert!(mask.get(top));
        assert!(!mask.get(1));
        assert_eq!(mask.to_code(), (BigUint::from(1u32) << top) + 1u32);
        mask.clear(top);
        assert!(!mask.get(top));
        assert_eq!(mask.to_code(), BigUint::from(1u32));
    }

    #[test]
    fn test_masks_agree() {
        exercise::<u64>(63);
        exercise::<u128>(127);
        exercise::<BigUint>(255);
        exercise::<BigUint>(3);
    }
}

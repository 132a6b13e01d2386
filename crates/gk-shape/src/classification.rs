//! Side classification of objects against a plane.

use std::ops::{BitAnd, BitOr, Not};

use serde::{Deserialize, Serialize};

/// Where an object lies relative to an oriented plane.
///
/// `Coincident` means the object straddles or touches the plane; it is not
/// limited to objects lying exactly in the plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlaneClassification {
    /// Entirely on the side the normal points toward.
    InFrontOf,
    /// Entirely on the side opposite to the normal.
    Behind,
    /// Straddling or touching the plane.
    Coincident,
}

impl PlaneClassification {
    pub const ALL: [PlaneClassification; 3] = [Self::InFrontOf, Self::Behind, Self::Coincident];

    /// Swap front and back; `Coincident` is its own inverse.
    #[inline]
    pub const fn invert(self) -> Self {
        match self {
            Self::InFrontOf => Self::Behind,
            Self::Behind => Self::InFrontOf,
            Self::Coincident => Self::Coincident,
        }
    }

    /// Merge the classifications of two parts of a union.
    ///
    /// Parts on the same side keep that side. As soon as one part touches
    /// the plane, or the parts lie on opposite sides, the union straddles it.
    #[inline]
    pub const fn or(self, other: Self) -> Self {
        match (self, other) {
            (Self::InFrontOf, Self::InFrontOf) => Self::InFrontOf,
            (Self::Behind, Self::Behind) => Self::Behind,
            _ => Self::Coincident,
        }
    }

    /// Merge the classifications of two bounds of a single object.
    ///
    /// Any disagreement means the object spans the plane.
    #[inline]
    pub const fn and(self, other: Self) -> Self {
        if self as u8 == other as u8 {
            self
        } else {
            Self::Coincident
        }
    }

    /// Fold `and` over a sequence; `None` when the sequence is empty.
    pub fn and_all<I: IntoIterator<Item = Self>>(iter: I) -> Option<Self> {
        iter.into_iter().reduce(Self::and)
    }

    /// Fold `or` over a sequence; `None` when the sequence is empty.
    pub fn or_all<I: IntoIterator<Item = Self>>(iter: I) -> Option<Self> {
        iter.into_iter().reduce(Self::or)
    }

    #[inline]
    pub const fn is_coincident(self) -> bool {
        matches!(self, Self::Coincident)
    }
}

impl Not for PlaneClassification {
    type Output = Self;

    fn not(self) -> Self {
        self.invert()
    }
}

impl BitOr for PlaneClassification {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.or(rhs)
    }
}

impl BitAnd for PlaneClassification {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.and(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::PlaneClassification::{self, *};

    #[test]
    fn test_invert_is_involution() {
        for c in PlaneClassification::ALL {
            assert_eq!(c.invert().invert(), c);
        }
        assert_eq!(InFrontOf.invert(), Behind);
        assert_eq!(Coincident.invert(), Coincident);
    }

    #[test]
    fn test_idempotence() {
        for c in PlaneClassification::ALL {
            assert_eq!(c.or(c), c);
            assert_eq!(c.and(c), c);
        }
    }

    #[test]
    fn test_opposite_sides_straddle() {
        assert_eq!(InFrontOf.or(InFrontOf.invert()), Coincident);
        assert_eq!(Behind.or(Behind.invert()), Coincident);
        for c in PlaneClassification::ALL {
            assert_eq!(Coincident.or(c), Coincident);
            assert_eq!(c.or(Coincident), Coincident);
        }
    }

    #[test]
    fn test_commutative_and_associative() {
        for a in PlaneClassification::ALL {
            for b in PlaneClassification::ALL {
                assert_eq!(a | b, b | a);
                assert_eq!(a & b, b & a);
                for c in PlaneClassification::ALL {
                    assert_eq!((a | b) | c, a | (b | c));
                    assert_eq!((a & b) & c, a & (b & c));
                }
            }
        }
    }

    #[test]
    fn test_de_morgan_duality() {
        for a in PlaneClassification::ALL {
            for b in PlaneClassification::ALL {
                assert_eq!(!(a | b), !a & !b, "a={a:?} b={b:?}");
            }
        }
    }

    #[test]
    fn test_folds() {
        assert_eq!(PlaneClassification::and_all([Behind, Behind, Behind]), Some(Behind));
        assert_eq!(PlaneClassification::and_all([Behind, InFrontOf]), Some(Coincident));
        assert_eq!(PlaneClassification::or_all([]), None);
    }
}

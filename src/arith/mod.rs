//! # Field, vector and matrix arithmetic.
//!
//! The algebra underneath the sharing scheme: binary extension fields
//! of dimension 128 and 256, row vectors and matrices over them, and
//! the Gauss-Jordan solve that produces a recovery vector.

pub mod gf2n;
pub mod matrices;
pub mod rows;

/// Asserts the field laws the sharing scheme depends on for a random
/// triple of elements.
#[cfg(test)]
pub(crate) fn test_field_laws(a: &gf2n::Elem, b: &gf2n::Elem, c: &gf2n::Elem) {
    let field = a.field();
    let zero = field.zero();
    let one = field.one();

    // Identities and the annihilator.
    assert_eq!(zero.add(a), *a);
    assert_eq!(one.mul(a), *a);
    assert_eq!(a.mul(&one), *a);
    assert_eq!(zero.mul(a), zero);
    assert_eq!(a.mul(&zero), zero);

    // Commutativity of addition and multiplication.
    assert_eq!(a.add(b), b.add(a));
    assert_eq!(a.mul(b), b.mul(a));

    // Associativity of addition and multiplication.
    assert_eq!(a.add(&b.add(c)), a.add(b).add(c));
    assert_eq!(a.mul(&b.mul(c)), a.mul(b).mul(c));

    // Distributivity of multiplication over addition.
    assert_eq!(a.mul(&b.add(c)), a.mul(b).add(&a.mul(c)));

    // Characteristic two: every element is its own additive inverse.
    assert_eq!(a.add(a), zero);

    // Multiplicative inverse round trip.
    if !a.is_zero() {
        let inv = a.invert();
        assert_eq!(a.mul(&inv), one);
        assert_eq!(inv.mul(a), one);
    }
}

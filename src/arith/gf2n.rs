//! # Binary extension fields `GF(2^n)` for n = 128 and n = 256.
//!
//! A field is identified by its reduction polynomial, stored as the
//! low-degree remainder left after x^n: little-endian bytes, one byte
//! per eight coefficients. An element is a coefficient string of the
//! same length, so addition is XOR and multiplication is a bit scan
//! with one reduction per overflowing shift.

use rand::{CryptoRng, RngCore};

const GF128_MODULUS: [u8; 16] = [135, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0];

const GF256_MODULUS: [u8; 32] = [
    37, 4, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0,
    0,
];

/// GF(2^128), reduced by x^128 + x^7 + x^2 + x + 1.
pub static GF128: Field = Field {
    modulus: &GF128_MODULUS,
};

/// GF(2^256), reduced by x^256 + x^10 + x^5 + x^2 + 1.
pub static GF256: Field = Field {
    modulus: &GF256_MODULUS,
};

/// A binary extension field. The two instances are [`GF128`] and
/// [`GF256`]; elements hold a reference to their field, so fields
/// compare by pointer identity.
#[derive(Debug)]
pub struct Field {
    modulus: &'static [u8],
}

impl PartialEq for Field {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other)
    }
}

impl Eq for Field {}

impl Field {
    /// Selects the field whose element size matches a secret: 16 bytes
    /// is GF(2^128), 32 bytes is GF(2^256).
    pub fn for_secret(len: usize) -> Option<&'static Field> {
        match len {
            16 => Some(&GF128),
            32 => Some(&GF256),
            _ => None,
        }
    }

    /// Element size in bytes.
    pub fn size(&self) -> usize {
        self.modulus.len()
    }

    /// Field dimension n.
    pub fn bit_size(&self) -> usize {
        self.size() * 8
    }

    /// Builds an element from coefficient bytes, zero-padding or
    /// truncating to the element size.
    pub fn elem(&'static self, bytes: &[u8]) -> Elem {
        let mut e = vec![0u8; self.size()];
        let n = bytes.len().min(self.size());
        e[..n].copy_from_slice(&bytes[..n]);
        Elem {
            field: self,
            bytes: e,
        }
    }

    pub fn zero(&'static self) -> Elem {
        self.elem(&[])
    }

    pub fn one(&'static self) -> Elem {
        self.elem(&[1])
    }

    /// The element whose coefficients encode `index` little-endian.
    /// Share indexes occupy the low byte in every practical predicate.
    pub fn index_elem(&'static self, index: usize) -> Elem {
        self.elem(&(index as u64).to_le_bytes())
    }

    /// Samples a uniform element from a cryptographically secure
    /// source. Source failures propagate.
    pub fn random<R>(&'static self, rng: &mut R) -> Result<Elem, rand::Error>
    where
        R: RngCore + CryptoRng,
    {
        let mut bytes = vec![0u8; self.size()];
        rng.try_fill_bytes(&mut bytes)?;
        Ok(Elem { field: self, bytes })
    }
}

/// An element of a [`Field`]: bit i of byte j is the coefficient of
/// x^(8j + i).
#[derive(Debug, Clone)]
pub struct Elem {
    field: &'static Field,
    bytes: Vec<u8>,
}

impl Elem {
    pub fn field(&self) -> &'static Field {
        self.field
    }

    /// Coefficient bytes, little-endian over bits.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    pub fn is_zero(&self) -> bool {
        self.bytes.iter().all(|b| *b == 0)
    }

    /// In-place addition: XOR of the coefficient strings.
    pub fn add_assign(&mut self, rhs: &Elem) {
        debug_assert!(std::ptr::eq(self.field, rhs.field));
        for (a, b) in self.bytes.iter_mut().zip(&rhs.bytes) {
            *a ^= b;
        }
    }

    pub fn add(&self, rhs: &Elem) -> Elem {
        let mut out = self.clone();
        out.add_assign(rhs);
        out
    }

    /// Schoolbook multiplication with incremental reduction: `temp`
    /// tracks rhs * x^i mod M across the bit scan, so each overflowing
    /// shift folds the reduction polynomial straight back in.
    pub fn mul(&self, rhs: &Elem) -> Elem {
        debug_assert!(std::ptr::eq(self.field, rhs.field));
        let mut acc = self.field.zero();
        let mut temp = rhs.clone();
        for i in 0..self.field.bit_size() {
            if self.coeff(i) == 1 {
                acc.add_assign(&temp);
            }
            if temp.shift_assign() {
                temp.reduce();
            }
        }
        acc
    }

    /// Naive exponentiation; exponents never exceed the matrix width.
    pub fn pow(&self, exp: usize) -> Elem {
        let mut acc = self.field.one();
        for _ in 0..exp {
            acc = acc.mul(self);
        }
        acc
    }

    /// Multiplicative inverse by Fermat's little theorem:
    /// a^-1 = a^(2^n - 2), computed as n-2 rounds of square-and-multiply
    /// and one final squaring. Zero has no inverse; callers screen it
    /// out (recovery never inverts a zero pivot).
    pub fn invert(&self) -> Elem {
        let mut elem = self.clone();
        let mut temp = self.clone();
        for _ in 0..self.field.bit_size() - 2 {
            temp = temp.mul(&temp);
            elem = elem.mul(&temp);
        }
        elem.mul(&elem)
    }

    /// The i-th polynomial coefficient, 0 or 1.
    fn coeff(&self, i: usize) -> u8 {
        (self.bytes[i / 8] >> (i % 8)) & 1
    }

    /// Multiplies by x: shifts every byte up one bit, carrying
    /// LSB-first. Returns the coefficient pushed out past x^(n-1).
    fn shift_assign(&mut self) -> bool {
        let mut carry = false;
        for b in self.bytes.iter_mut() {
            let next = *b & 0x80 != 0;
            *b <<= 1;
            if carry {
                *b |= 1;
            }
            carry = next;
        }
        carry
    }

    /// Folds an overflow past x^n back in by adding the reduction
    /// polynomial's remainder.
    fn reduce(&mut self) {
        for (b, m) in self.bytes.iter_mut().zip(self.field.modulus) {
            *b ^= m;
        }
    }
}

impl PartialEq for Elem {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.field, other.field) && self.bytes == other.bytes
    }
}

impl Eq for Elem {}

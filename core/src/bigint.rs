//! Minimal big-integer support: just enough to compare and hash integer
//! literals by mathematical value regardless of how they were spelled
//! (`Int`, or `BigInt` in base 2/8/10/16 etc). This workspace does not
//! perform arbitrary-precision arithmetic on parsed values — digit spans are
//! handed to callers to interpret — but equality and hashing are value-model
//! operations this crate owns, and "BigInt 0xFF equals Int 255" is part of
//! that contract, so a one-way radix-to-decimal conversion lives here.

/// Sign and big-endian decimal digits (no leading zeros, `[0]` for zero) of
/// an integer-family value, normalized so two values compare equal exactly
/// when `sign` and `digits` match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalInt {
    pub negative: bool,
    pub digits: Vec<u8>,
}

impl CanonicalInt {
    pub fn from_i64(n: i64) -> Self {
        if n == 0 {
            return CanonicalInt {
                negative: false,
                digits: vec![0],
            };
        }
        let negative = n < 0;
        // i64::MIN negated overflows i64; widen to i128 first.
        let magnitude = (n as i128).unsigned_abs();
        let mut digits: Vec<u8> = magnitude
            .to_string()
            .bytes()
            .map(|b| b - b'0')
            .collect();
        strip_leading_zeros(&mut digits);
        CanonicalInt { negative, digits }
    }

    /// Convert a validated digit span in the given radix (2, 8, 10, or 16)
    /// into canonical decimal digits via repeated multiply-add, schoolbook
    /// style. `digits` must already be validated (only digits legal for
    /// `radix`, no separators).
    pub fn from_radix_digits(digits: &str, radix: u8, negative: bool) -> Self {
        let mut decimal: Vec<u8> = vec![0];
        for ch in digits.chars() {
            let value = ch.to_digit(radix as u32).expect("validated digit") as u16;
            multiply_add(&mut decimal, radix as u16, value);
        }
        strip_leading_zeros(&mut decimal);
        let negative = negative && !(decimal.len() == 1 && decimal[0] == 0);
        CanonicalInt { negative, digits: decimal }
    }

    pub fn is_zero(&self) -> bool {
        self.digits.len() == 1 && self.digits[0] == 0
    }
}

/// `decimal := decimal * multiplier + add`, `decimal` stored big-endian,
/// one base-10 digit per element.
fn multiply_add(decimal: &mut Vec<u8>, multiplier: u16, add: u16) {
    let mut carry: u32 = add as u32;
    for d in decimal.iter_mut().rev() {
        let product = (*d as u32) * (multiplier as u32) + carry;
        *d = (product % 10) as u8;
        carry = product / 10;
    }
    while carry > 0 {
        decimal.insert(0, (carry % 10) as u8);
        carry /= 10;
    }
}

fn strip_leading_zeros(digits: &mut Vec<u8>) {
    while digits.len() > 1 && digits[0] == 0 {
        digits.remove(0);
    }
}

use std::cmp::Ordering;

use rug::{Complete, Integer};

use crate::error::{PiError, Result};

/// Floor square root by Newton's method, `x² ≤ a < (x+1)²`.
///
/// Starts from `1 << ceil(bits(a)/2)`, which is never below the root, so the
/// iterates decrease until they reach the floor. The multiply and divide are GMP's.
pub fn isqrt(a: &Integer) -> Result<Integer> {
    match a.cmp0() {
        Ordering::Less => return Err(PiError::Domain(format!("isqrt of negative value {a}"))),
        Ordering::Equal => return Ok(Integer::new()),
        Ordering::Greater => {}
    }

    let mut x = Integer::from(1) << a.significant_bits().div_ceil(2);

    loop {
        let mut next = (a / &x).complete();
        next += &x;
        next >>= 1;

        if next >= x {
            break;
        }
        x = next;
    }

    while (&x * &x).complete() > *a {
        x -= 1u32;
    }
    loop {
        let above = (&x + 1u32).complete();
        if (&above * &above).complete() > *a {
            break;
        }
        x = above;
    }

    Ok(x)
}

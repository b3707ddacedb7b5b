//! Integer arithmetic mod `n` used by the affine cipher and its solver.

/// Greatest common divisor, always non-negative.
pub fn gcd(x: i64, n: i64) -> i64 {
    let (mut x, mut n) = (x.abs(), n.abs());
    while n != 0 {
        (x, n) = (n, x % n);
    }
    x
}

/// True modulo: the result lies in `[0, n)` even for negative `x`.
pub fn modulo(x: i64, n: i64) -> i64 {
    x.rem_euclid(n)
}

/// Multiplicative inverse of `x` mod `n`, or `None` when `gcd(x, n) != 1`.
pub fn inverse_mod(x: i64, n: i64) -> Option<i64> {
    if n < 2 {
        return None;
    }

    let (mut old_r, mut r) = (modulo(x, n), n);
    let (mut old_s, mut s) = (1i64, 0i64);

    while r != 0 {
        let q = old_r / r;
        (old_r, r) = (r, old_r - q * r);
        (old_s, s) = (s, old_s - q * s);
    }

    if old_r != 1 {
        return None;
    }
    Some(modulo(old_s, n))
}

/// Every `a` in `[0, n)` satisfying `d·a ≡ e (mod n)`, ascending.
pub fn solve_linear_congruence(d: i64, e: i64, n: i64) -> Vec<i64> {
    let (d, e) = (modulo(d, n), modulo(e, n));
    let g = gcd(d, n);
    if e % g != 0 {
        return Vec::new();
    }

    let step = n / g;
    // d/g is invertible mod n/g; with step == 1 every value is a solution
    let base = match inverse_mod(d / g, step) {
        Some(inv) => modulo((e / g) * inv, step),
        None if step == 1 => 0,
        None => return Vec::new(),
    };

    (0..g).map(|k| base + k * step).collect()
}

/// Numbers in `[0, n)` coprime with `n`.
pub fn units(n: i64) -> impl Iterator<Item = i64> {
    (0..n).filter(move |&a| gcd(a, n) == 1)
}

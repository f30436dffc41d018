// SPDX-License-Identifier: AGPL-3.0-or-later

//! The lipmaa skip-link function: which earlier seq number a given entry links to.
//!
//! Certificate pool construction from Helger Lipmaa's "Optimally efficient accountable
//! time-stamping" applied to a hash chain: every entry, in addition to its back-link, links to
//! an earlier entry chosen so that any entry can be authenticated from the newest one by
//! fetching only `O(log n)` intermediate entries.

/// `g(k) = (3^k - 1) / 2`, the sequence of "round boundaries" the skip-list is built from:
/// `0, 1, 4, 13, 40, 121, ...`. Computed in `u128` since `g(41)` is close to `u64::MAX` and the
/// search below probes one step past whatever boundary it settles on.
fn g(k: u32) -> u128 {
    (3u128.pow(k) - 1) / 2
}

/// Returns the seq number that entry `n`'s lipmaa link points to.
///
/// `n` must be `>= 1`. By convention `lipmaa(1) == 1`, even though no entry 1 ever stores a
/// lipmaa link (seq 1 is the genesis entry and has no links at all).
pub fn lipmaa(n: u64) -> u64 {
    if n <= 1 {
        return 1;
    }

    let mut n = n as u128;
    let mut acc = 0u128;

    loop {
        // Find j such that g(j) < n <= g(j+1).
        let mut j = 0u32;
        while g(j + 1) < n {
            j += 1;
        }
        let m = g(j);
        let a = n - m;

        if a == 2 * m + 1 {
            // n is exactly g(j + 1): the round boundary, jump straight to its start.
            return (acc + m) as u64;
        } else if a < m {
            // n is in the first third of the round: recurse into the smaller round.
            acc += m;
            n = a;
        } else {
            // n is in the second third of the round: direct link within the round.
            return (acc + a) as u64;
        }
    }
}

/// A second, independently structured implementation of the same definition used only to
/// cross-check [`lipmaa`] in tests: genuine recursion through `lipmaa_reference(a) + m` rather
/// than the iterative accumulator `lipmaa` uses, so a bug in translating the recursive
/// certificate-pool definition into an accumulating loop (e.g. an off-by-one in when `acc` is
/// folded in) would show up as a mismatch between the two rather than being self-confirmed by
/// reusing the same code path.
#[cfg(test)]
fn lipmaa_reference(n: u128) -> u128 {
    if n <= 1 {
        return 1;
    }

    let mut j = 0u32;
    while g(j + 1) < n {
        j += 1;
    }
    let m = g(j);
    let a = n - m;

    if a == 2 * m + 1 {
        m
    } else if a < m {
        lipmaa_reference(a) + m
    } else {
        a
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_values() {
        // Pinned by spec.md §4.3 and §8.
        let cases: &[(u64, u64)] = &[
            (1, 1),
            (2, 1),
            (3, 2),
            (4, 1),
            (5, 4),
            (6, 5),
            (7, 6),
            (8, 4),
            (13, 4),
            (14, 13),
        ];
        for &(n, expected) in cases {
            assert_eq!(lipmaa(n), expected, "lipmaa({n})");
        }
    }

    #[test]
    fn reference_values_beyond_spec_pins() {
        // `bamboo_rs_core_ed25519_yasmf` (the upstream lipmaa implementation this format's wire
        // compatibility depends on, per examples/p2panda-p2panda/p2panda-rs/src/entry/seq_num.rs)
        // is not vendored in the retrieval pack, so these were hand-derived by tracing the
        // certificate-pool construction (g(0)=0, g(1)=1, g(2)=4, g(3)=13, g(4)=40) through a full
        // second round, covering both the `n=9..=12` range left unverified by the ten spec-pinned
        // points above and the next round boundary at `n=40`.
        let cases: &[(u64, u64)] = &[
            (9, 5),
            (10, 6),
            (11, 7),
            (12, 8),
            (15, 14),
            (16, 15),
            (17, 14),
            (18, 17),
            (19, 18),
            (20, 19),
            (21, 17),
            (22, 17),
            (23, 19),
            (24, 20),
            (25, 21),
            (26, 13),
            (27, 14),
            (28, 15),
            (29, 16),
            (30, 17),
            (31, 18),
            (32, 19),
            (33, 20),
            (34, 21),
            (35, 22),
            (36, 23),
            (37, 24),
            (38, 25),
            (39, 26),
            (40, 13),
        ];
        for &(n, expected) in cases {
            assert_eq!(lipmaa(n), expected, "lipmaa({n})");
        }
    }

    #[test]
    fn matches_independent_recursive_reference() {
        for n in 1..=500_000u64 {
            assert_eq!(
                lipmaa(n) as u128,
                lipmaa_reference(n as u128),
                "lipmaa({n}) disagrees with the recursive reference"
            );
        }
    }

    #[test]
    fn monotonic_and_strictly_decreasing() {
        for n in 2..=100_000u64 {
            let link = lipmaa(n);
            assert!(link >= 1);
            assert!(link < n, "lipmaa({n}) = {link} is not < n");
        }
    }

    #[test]
    fn reaches_one_in_o_log_n_steps() {
        for n in (1..=1_000_000u64).step_by(997) {
            let mut cur = n;
            let mut steps = 0;
            while cur != 1 {
                cur = lipmaa(cur);
                steps += 1;
                assert!(steps < 100, "too many steps reaching 1 from {n}");
            }
        }
    }
}

//! US-QWERTY adjacency for plausible typo injection.

use rand::Rng;

/// Neighbors used when the intended character has no entry of its own.
const FALLBACK_NEIGHBORS: &[char] = &['a', 's', 'd', 'f'];

/// Pick a key physically adjacent to `c` on a US-QWERTY layout, preserving
/// the case of the intended character.
pub fn neighbor_typo_char(c: char, rng: &mut impl Rng) -> char {
    let (base, make_upper) = if c.is_ascii_uppercase() {
        (c.to_ascii_lowercase(), true)
    } else {
        (c, false)
    };

    let neighbors: &[char] = match base {
        'a' => &['q', 'w', 's', 'z'],
        'b' => &['v', 'g', 'h', 'n'],
        'c' => &['x', 'd', 'f', 'v'],
        'd' => &['s', 'e', 'r', 'f', 'c', 'x'],
        'e' => &['w', 'r', 's', 'd', 'f'],
        'f' => &['d', 'r', 't', 'g', 'v', 'c'],
        'g' => &['f', 't', 'y', 'h', 'b', 'v'],
        'h' => &['g', 'y', 'u', 'j', 'n', 'b'],
        'i' => &['u', 'j', 'k', 'o'],
        'j' => &['h', 'u', 'k', 'm', 'n'],
        'k' => &['i', 'j', 'l', 'm'],
        'l' => &['o', 'p', 'k'],
        'm' => &['n', 'j', 'k'],
        'n' => &['b', 'h', 'j', 'm'],
        'o' => &['i', 'k', 'l', 'p'],
        'p' => &['o', 'l'],
        'q' => &['w', 'a'],
        'r' => &['e', 'd', 'f', 't'],
        's' => &['a', 'w', 'e', 'd', 'z', 'x'],
        't' => &['r', 'f', 'g', 'y'],
        'u' => &['y', 'h', 'j', 'k', 'i', 'o'],
        'v' => &['c', 'f', 'g', 'b'],
        'w' => &['q', 'a', 's', 'e'],
        'x' => &['z', 's', 'd', 'c'],
        'y' => &['t', 'g', 'h', 'u'],
        'z' => &['a', 's', 'x'],
        ' ' => &['c', 'v', 'b', 'n', 'm'],
        _ => FALLBACK_NEIGHBORS,
    };

    let chosen = neighbors[rng.gen_range(0..neighbors.len())];
    if make_upper {
        chosen.to_ascii_uppercase()
    } else {
        chosen
    }
}

use rand::Rng;
use rand::seq::SliceRandom;

/// Pick one entry with uniform probability, or `None` from an empty slice
pub fn pick_random<'a, T, R>(items: &'a [T], rng: &mut R) -> Option<&'a T>
where
    R: Rng + ?Sized,
{
    items.choose(rng)
}

//! Ability checks and score modifiers

use rand::Rng;

/// Advantage state for a d20 check
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Advantage {
    #[default]
    Normal,
    /// Roll twice, keep the higher die
    Advantage,
    /// Roll twice, keep the lower die
    Disadvantage,
}

/// Convert a raw ability score to its modifier
///
/// Uses the standard table: 10-11 is +0, every two points shifts the
/// modifier by one, rounding down for odd scores below 10.
pub fn modifier_from_score(score: i32) -> i32 {
    (score - 10).div_euclid(2)
}

/// Roll a d20 ability check against a flat bonus
pub fn ability_check<R: Rng>(bonus: i32, advantage: Advantage, rng: &mut R) -> i32 {
    let first = rng.gen_range(1..=20);
    let die = match advantage {
        Advantage::Normal => first,
        Advantage::Advantage => first.max(rng.gen_range(1..=20)),
        Advantage::Disadvantage => first.min(rng.gen_range(1..=20)),
    };
    die + bonus
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_modifier_table() {
        assert_eq!(modifier_from_score(1), -5);
        assert_eq!(modifier_from_score(8), -1);
        assert_eq!(modifier_from_score(9), -1);
        assert_eq!(modifier_from_score(10), 0);
        assert_eq!(modifier_from_score(11), 0);
        assert_eq!(modifier_from_score(12), 1);
        assert_eq!(modifier_from_score(15), 2);
        assert_eq!(modifier_from_score(20), 5);
        assert_eq!(modifier_from_score(30), 10);
    }

    #[test]
    fn test_check_within_bounds() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for _ in 0..1000 {
            let roll = ability_check(3, Advantage::Normal, &mut rng);
            assert!((4..=23).contains(&roll));
        }
    }

    #[test]
    fn test_negative_bonus() {
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        for _ in 0..1000 {
            let roll = ability_check(-4, Advantage::Normal, &mut rng);
            assert!((-3..=16).contains(&roll));
        }
    }

    #[test]
    fn test_advantage_beats_disadvantage_on_average() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let iterations = 5000;
        let mut adv_total = 0i64;
        let mut dis_total = 0i64;
        for _ in 0..iterations {
            adv_total += i64::from(ability_check(0, Advantage::Advantage, &mut rng));
            dis_total += i64::from(ability_check(0, Advantage::Disadvantage, &mut rng));
        }
        // Expected means are ~13.8 and ~7.2
        let adv_mean = adv_total as f64 / iterations as f64;
        let dis_mean = dis_total as f64 / iterations as f64;
        assert!(adv_mean > 12.5, "advantage mean was {}", adv_mean);
        assert!(dis_mean < 8.5, "disadvantage mean was {}", dis_mean);
    }
}

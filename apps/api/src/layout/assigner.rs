//! Card layout assignment — decorates an ordered list of cards with a size class
//! and a pixel height for the masonry grid.
//!
//! # Algorithm (one left-to-right pass, no backtracking)
//! 1. Draw a size class from the importance tier's weight table.
//! 2. Break runs: a third consecutive `M` becomes `S`/`L`, a fourth consecutive
//!    `S` becomes `M`/`L` (coin flip). Only *accepted* classes count.
//! 3. Every `l_interval`-th position is forced to `L`, overriding step 2.
//! 4. Draw the height from the final class's distribution.
//!
//! The random source is injected. Production calls draw fresh randomness, so
//! identical input may lay out differently; callers wanting a stable layout
//! pass a seeded generator or memoize the output.

use std::collections::VecDeque;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::layout::rules::{CardHeight, LayoutRules, Prominence, SizeClass};

/// A card plus its layout decoration. The card's own fields are flattened so
/// the wire shape is the original record with `sizeClass` and `height` added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignedCard<T> {
    #[serde(flatten)]
    pub item: T,
    #[serde(rename = "sizeClass")]
    pub size_class: SizeClass,
    pub height: CardHeight,
}

/// Last few accepted size classes, capped at the longest run limit.
#[derive(Debug)]
struct TrailingWindow {
    classes: VecDeque<SizeClass>,
    capacity: usize,
}

impl TrailingWindow {
    fn new(capacity: usize) -> Self {
        Self {
            classes: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    fn push(&mut self, class: SizeClass) {
        if self.classes.len() == self.capacity {
            self.classes.pop_front();
        }
        self.classes.push_back(class);
    }

    /// True if the most recent `len` accepted classes are all `class`.
    fn ends_with_run(&self, class: SizeClass, len: usize) -> bool {
        self.classes.len() >= len && self.classes.iter().rev().take(len).all(|c| *c == class)
    }
}

#[derive(Debug, Clone, Default)]
pub struct LayoutAssigner {
    rules: LayoutRules,
}

impl LayoutAssigner {
    /// Rejects rules the assigner cannot run with (zero interval or run limit).
    pub fn new(rules: LayoutRules) -> anyhow::Result<Self> {
        rules.validate()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &LayoutRules {
        &self.rules
    }

    /// Lays out `items` using the supplied random source. Never fails and never
    /// touches the input; the output has the same length and order.
    pub fn assign<T, R>(&self, items: &[T], rng: &mut R) -> Vec<AssignedCard<T>>
    where
        T: Prominence + Clone,
        R: Rng + ?Sized,
    {
        let rules = &self.rules;
        let mut window = TrailingWindow::new(rules.window_len());
        let mut assigned = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            let mut class = rules.size_weights(item.importance()).pick(rng.gen::<f64>());

            if class == SizeClass::M && window.ends_with_run(SizeClass::M, rules.max_m_run) {
                class = if rng.gen::<f64>() < 0.5 {
                    SizeClass::S
                } else {
                    SizeClass::L
                };
            }
            if class == SizeClass::S && window.ends_with_run(SizeClass::S, rules.max_s_run) {
                class = if rng.gen::<f64>() < 0.5 {
                    SizeClass::M
                } else {
                    SizeClass::L
                };
            }

            if (index + 1) % rules.l_interval == 0 {
                class = SizeClass::L;
            }

            let height = rules.height_thresholds(class).pick(rng.gen::<f64>());

            window.push(class);
            assigned.push(AssignedCard {
                item: item.clone(),
                size_class: class,
                height,
            });
        }

        assigned
    }

    /// Lays out with fresh thread-local randomness.
    pub fn assign_fresh<T>(&self, items: &[T]) -> Vec<AssignedCard<T>>
    where
        T: Prominence + Clone,
    {
        self.assign(items, &mut rand::thread_rng())
    }

    /// Reproducible layout: the same seed and input always give the same output.
    pub fn assign_seeded<T>(&self, items: &[T], seed: u64) -> Vec<AssignedCard<T>>
    where
        T: Prominence + Clone,
    {
        self.assign(items, &mut StdRng::seed_from_u64(seed))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::rules::Importance;
    use rand::RngCore;
    use serde_json::json;

    /// Replays a fixed list of unit draws through `Rng::gen::<f64>()`.
    struct ScriptedRng {
        draws: Vec<f64>,
        next: usize,
    }

    impl ScriptedRng {
        fn new(draws: &[f64]) -> Self {
            Self {
                draws: draws.to_vec(),
                next: 0,
            }
        }

        fn consumed(&self) -> usize {
            self.next
        }
    }

    impl RngCore for ScriptedRng {
        fn next_u64(&mut self) -> u64 {
            let draw = self.draws[self.next];
            self.next += 1;
            // `gen::<f64>()` keeps the top 53 bits of `next_u64`.
            ((draw * (1u64 << 53) as f64) as u64) << 11
        }

        fn next_u32(&mut self) -> u32 {
            (self.next_u64() >> 32) as u32
        }

        fn fill_bytes(&mut self, dest: &mut [u8]) {
            for chunk in dest.chunks_mut(8) {
                let bytes = self.next_u64().to_le_bytes();
                chunk.copy_from_slice(&bytes[..chunk.len()]);
            }
        }

        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            self.fill_bytes(dest);
            Ok(())
        }
    }

    fn classes<T>(cards: &[AssignedCard<T>]) -> Vec<SizeClass> {
        cards.iter().map(|c| c.size_class).collect()
    }

    fn normals(n: usize) -> Vec<Importance> {
        vec![Importance::Normal; n]
    }

    fn assert_invariants<T>(cards: &[AssignedCard<T>], rules: &LayoutRules) {
        let sizes = classes(cards);
        for (i, class) in sizes.iter().enumerate() {
            if (i + 1) % rules.l_interval == 0 {
                assert_eq!(*class, SizeClass::L, "position {} must be L", i + 1);
            }
        }
        for run in sizes.windows(rules.max_m_run + 1) {
            assert!(run.iter().any(|c| *c != SizeClass::M), "M run too long: {sizes:?}");
        }
        for run in sizes.windows(rules.max_s_run + 1) {
            assert!(run.iter().any(|c| *c != SizeClass::S), "S run too long: {sizes:?}");
        }
        for card in cards {
            assert!(matches!(card.height.px(), 96 | 144 | 192));
        }
    }

    #[test]
    fn test_empty_input_gives_empty_output() {
        let assigner = LayoutAssigner::default();
        let out = assigner.assign_fresh::<Importance>(&[]);
        assert!(out.is_empty());
    }

    #[test]
    fn test_invariants_hold_across_many_seeds() {
        let assigner = LayoutAssigner::default();
        let tiers = [Importance::Normal, Importance::Feature, Importance::Hero];
        for seed in 0..300u64 {
            let items: Vec<Importance> = (0..50).map(|i| tiers[(i + seed as usize) % 3]).collect();
            let out = assigner.assign_seeded(&items, seed);
            assert_eq!(out.len(), items.len());
            for (card, item) in out.iter().zip(&items) {
                assert_eq!(card.item, *item);
            }
            assert_invariants(&out, assigner.rules());
        }
    }

    #[test]
    fn test_seven_normal_items_force_l_at_seventh() {
        let assigner = LayoutAssigner::default();
        for seed in 0..100u64 {
            let out = assigner.assign_seeded(&normals(7), seed);
            assert_eq!(out[6].size_class, SizeClass::L);
            assert_invariants(&out, assigner.rules());
        }
    }

    #[test]
    fn test_fourteen_feature_items_force_l_at_7_and_14() {
        let assigner = LayoutAssigner::default();
        let items = vec![Importance::Feature; 14];
        // 0.45 is M on the feature table, and a correction draw of 0.45 goes to S,
        // so no position becomes L except through the periodic override.
        let mut rng = ScriptedRng::new(&[0.45; 40]);
        let out = assigner.assign(&items, &mut rng);
        let sizes = classes(&out);
        assert_eq!(sizes[6], SizeClass::L);
        assert_eq!(sizes[13], SizeClass::L);
        for (i, class) in sizes.iter().enumerate() {
            if i != 6 && i != 13 {
                assert_ne!(*class, SizeClass::L, "position {} forced unexpectedly", i + 1);
            }
        }
        assert_invariants(&out, assigner.rules());
    }

    #[test]
    fn test_single_hero_is_not_forced() {
        let assigner = LayoutAssigner::default();
        // 0.3 on the hero table is M; no correction draw; 0.1 on M heights is 192.
        let mut rng = ScriptedRng::new(&[0.3, 0.1]);
        let out = assigner.assign(&[Importance::Hero], &mut rng);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].size_class, SizeClass::M);
        assert_eq!(out[0].height, CardHeight::Tall);
        assert_eq!(rng.consumed(), 2);
    }

    #[test]
    fn test_three_small_in_a_row_are_allowed_fourth_is_corrected() {
        let assigner = LayoutAssigner::default();
        let mut rng = ScriptedRng::new(&[
            0.1, 0.5, // S
            0.1, 0.5, // S
            0.1, 0.5, // S
            0.1, 0.3, 0.5, // S drawn, corrected to M, height 144
        ]);
        let out = assigner.assign(&normals(4), &mut rng);
        assert_eq!(
            classes(&out),
            vec![SizeClass::S, SizeClass::S, SizeClass::S, SizeClass::M]
        );
        assert_eq!(out[3].height, CardHeight::Medium);
        assert_eq!(rng.consumed(), 9);
    }

    #[test]
    fn test_third_medium_is_corrected() {
        let assigner = LayoutAssigner::default();
        let mut rng = ScriptedRng::new(&[
            0.7, 0.9, // M, 96
            0.7, 0.9, // M, 96
            0.7, 0.7, 0.1, // M drawn, corrected to L, 192
        ]);
        let out = assigner.assign(&normals(3), &mut rng);
        assert_eq!(
            classes(&out),
            vec![SizeClass::M, SizeClass::M, SizeClass::L]
        );
        assert_eq!(out[0].height, CardHeight::Short);
        assert_eq!(out[2].height, CardHeight::Tall);
    }

    #[test]
    fn test_height_follows_final_class_not_draft() {
        let assigner = LayoutAssigner::default();
        // Position 7: drafted S with 0.1, forced to L, height draw 0.65 → 144 on
        // the L table (it would be 96 on the S table).
        let mut rng = ScriptedRng::new(&[
            0.1, 0.5, 0.1, 0.5, 0.7, 0.5, 0.1, 0.5, 0.7, 0.5, 0.1, 0.5, // S S M S M S
            0.1, 0.65, // S drafted, forced L
        ]);
        let out = assigner.assign(&normals(7), &mut rng);
        assert_eq!(out[6].size_class, SizeClass::L);
        assert_eq!(out[6].height, CardHeight::Medium);
        assert_eq!(rng.consumed(), 14);
    }

    #[test]
    fn test_forced_l_breaks_the_following_window() {
        let assigner = LayoutAssigner::default();
        let mut rng = ScriptedRng::new(&[
            0.1, 0.0, // 1: S
            0.1, 0.0, // 2: S
            0.7, 0.0, // 3: M
            0.1, 0.0, // 4: S
            0.7, 0.0, // 5: M
            0.7, 0.0, // 6: M
            0.7, 0.1, 0.0, // 7: M drafted, corrected to S, forced L
            0.7, 0.0, // 8: M
            0.7, 0.0, // 9: M, window is [M, L, M] so no correction
        ]);
        let out = assigner.assign(&normals(9), &mut rng);
        let sizes = classes(&out);
        assert_eq!(sizes[6], SizeClass::L);
        assert_eq!(sizes[7], SizeClass::M);
        assert_eq!(sizes[8], SizeClass::M);
        assert_eq!(rng.consumed(), 19);
    }

    #[test]
    fn test_missing_importance_behaves_as_normal() {
        let assigner = LayoutAssigner::default();
        let bare: Vec<serde_json::Value> = (0..40).map(|i| json!({ "id": i })).collect();
        let normal: Vec<serde_json::Value> = (0..40)
            .map(|i| json!({ "id": i, "importance": "normal" }))
            .collect();
        let unknown: Vec<serde_json::Value> = (0..40)
            .map(|i| json!({ "id": i, "importance": "mythic" }))
            .collect();
        for seed in 0..20u64 {
            let a = classes(&assigner.assign_seeded(&bare, seed));
            let b = classes(&assigner.assign_seeded(&normal, seed));
            let c = classes(&assigner.assign_seeded(&unknown, seed));
            assert_eq!(a, b);
            assert_eq!(a, c);
        }
    }

    #[test]
    fn test_input_is_not_mutated_and_fields_pass_through() {
        let assigner = LayoutAssigner::default();
        let items = vec![
            json!({ "id": "a", "title": "Base", "importance": "hero" }),
            json!({ "id": "b", "regions": ["Europe"] }),
        ];
        let before = items.clone();
        let out = assigner.assign_fresh(&items);
        assert_eq!(items, before);

        let wire = serde_json::to_value(&out).unwrap();
        assert_eq!(wire[0]["title"], "Base");
        assert_eq!(wire[1]["regions"][0], "Europe");
        assert!(matches!(wire[0]["sizeClass"].as_str(), Some("S" | "M" | "L")));
        assert!(wire[1]["height"].is_u64());
    }

    #[test]
    fn test_seeded_layout_is_reproducible() {
        let assigner = LayoutAssigner::default();
        let items = normals(30);
        assert_eq!(
            assigner.assign_seeded(&items, 42),
            assigner.assign_seeded(&items, 42)
        );
    }

    #[test]
    fn test_custom_limits_are_honored() {
        let rules = LayoutRules::with_limits(4, 1, 1).unwrap();
        let assigner = LayoutAssigner::new(rules).unwrap();
        for seed in 0..100u64 {
            let out = assigner.assign_seeded(&normals(40), seed);
            assert_invariants(&out, assigner.rules());
        }
    }

    #[test]
    fn test_new_rejects_unusable_rules() {
        let zero_interval = LayoutRules {
            l_interval: 0,
            ..LayoutRules::default()
        };
        assert!(LayoutAssigner::new(zero_interval).is_err());

        let zero_m_run = LayoutRules {
            max_m_run: 0,
            ..LayoutRules::default()
        };
        assert!(LayoutAssigner::new(zero_m_run).is_err());

        let assigner = LayoutAssigner::new(LayoutRules::default()).unwrap();
        assert_eq!(assigner.assign_seeded(&[Importance::Normal], 1).len(), 1);
    }

    #[test]
    fn test_trailing_window_is_bounded() {
        let mut window = TrailingWindow::new(3);
        for class in [SizeClass::S, SizeClass::M, SizeClass::M, SizeClass::M] {
            window.push(class);
        }
        assert_eq!(window.classes.len(), 3);
        assert!(window.ends_with_run(SizeClass::M, 3));
        assert!(!window.ends_with_run(SizeClass::S, 1));
        assert!(!TrailingWindow::new(2).ends_with_run(SizeClass::M, 2));
    }
}

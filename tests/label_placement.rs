use surveybar::normalize::normalize;
use surveybar::placement::{LabelPolicy, label_policy, outside_slot, place};
use surveybar::{LabelMode, LayoutConfig, Segment};

fn segment(label: &str, raw_count: u64, raw_pct: f64) -> Segment {
    Segment {
        label: label.into(),
        raw_count,
        raw_pct,
        display_pct: raw_pct,
    }
}

#[test]
fn skewed_bar_puts_small_segments_above_then_below() {
    let cfg = LayoutConfig::default();
    let segs = normalize(&[("Yes", 970), ("No", 20), ("Unsure", 10)], &cfg).unwrap();
    let p = place(&segs, &cfg);

    assert_eq!(p.len(), 3);
    assert_eq!(p[0].mode, LabelMode::Inside);
    assert_eq!(p[0].inside_text, "Yes 97.0%");
    assert!(p[0].outside_text.is_empty());

    assert_eq!((p[1].mode, p[1].tier), (LabelMode::OutsideAbove, 0));
    assert_eq!(p[1].outside_text, "No 2.0%");
    assert!(p[1].inside_text.is_empty());

    assert_eq!((p[2].mode, p[2].tier), (LabelMode::OutsideBelow, 0));
    assert_eq!(p[2].outside_text, "Unsure 1.0%");
    assert!(p.iter().all(|x| x.leader_line.is_none()));
    assert_eq!(
        p.iter().map(|x| x.segment_index).collect::<Vec<_>>(),
        vec![0, 1, 2]
    );
}

#[test]
fn five_equal_segments_stack_into_three_rows() {
    let cfg = LayoutConfig::default();
    let counts: Vec<(String, i64)> = ["A", "B", "C", "D", "E"]
        .iter()
        .map(|l| (l.to_string(), 20))
        .collect();
    let segs = normalize(&counts, &cfg).unwrap();
    let p = place(&segs, &cfg);

    let slots: Vec<(LabelMode, u32)> = p.iter().map(|x| (x.mode, x.tier)).collect();
    assert_eq!(
        slots,
        vec![
            (LabelMode::OutsideAbove, 0),
            (LabelMode::OutsideBelow, 0),
            (LabelMode::OutsideAbove, 1),
            (LabelMode::OutsideBelow, 1),
            (LabelMode::OutsideAbove, 2),
        ]
    );
    for x in &p {
        // 20% is at least the inner threshold: name outside, percentage inside.
        assert_eq!(x.inside_text, "20.0%");
        assert_eq!(x.outside_text.len(), 1);
    }
    assert!(p[0].leader_line.is_none());
    assert!(p[1].leader_line.is_none());

    let row = cfg.label_row_height_px;
    let third = p[2].leader_line.unwrap();
    assert!((third.anchor_x - 50.0).abs() < 1e-9);
    assert_eq!(third.label_x, third.anchor_x);
    assert_eq!(third.anchor_y, 0.0);
    assert_eq!(third.label_y, -row);

    let fourth = p[3].leader_line.unwrap();
    assert!((fourth.anchor_x - 70.0).abs() < 1e-9);
    assert_eq!(fourth.anchor_y, cfg.bar_height_px);
    assert_eq!(fourth.label_y, cfg.bar_height_px + row);

    let fifth = p[4].leader_line.unwrap();
    assert!((fifth.anchor_x - 90.0).abs() < 1e-9);
    assert_eq!(fifth.label_y, -2.0 * row);
}

#[test]
fn threshold_itself_is_inside() {
    let cfg = LayoutConfig::default();
    assert_eq!(label_policy(30.0, &cfg), LabelPolicy::Inside);
    assert_eq!(label_policy(29.999, &cfg), LabelPolicy::OutsideName);
    assert_eq!(label_policy(10.0, &cfg), LabelPolicy::OutsideName);
    assert_eq!(label_policy(9.999, &cfg), LabelPolicy::OutsideFull);

    let p = place(&[segment("A", 30, 30.0), segment("B", 70, 70.0)], &cfg);
    assert!(p.iter().all(|x| x.mode == LabelMode::Inside));
}

#[test]
fn policy_is_monotonic_in_share() {
    for cfg in [LayoutConfig::default(), LayoutConfig::revised()] {
        let mut prev = label_policy(100.0, &cfg);
        for i in (0..=10_000).rev() {
            let pct = i as f64 / 100.0;
            let cur = label_policy(pct, &cfg);
            assert!(cur >= prev, "{pct}: {cur:?} after {prev:?}");
            prev = cur;
        }
    }
}

#[test]
fn slots_depend_only_on_rank() {
    for k in 1..=40usize {
        let (mode, tier) = outside_slot(k);
        let want = if k % 2 == 1 {
            LabelMode::OutsideAbove
        } else {
            LabelMode::OutsideBelow
        };
        assert_eq!(mode, want);
        assert_eq!(tier as usize, (k - 1) / 2);
    }

    // Magnitude does not matter: the 1% segment is still the first outside label.
    let cfg = LayoutConfig::default();
    let p = place(
        &[
            segment("tiny", 1, 1.0),
            segment("big", 80, 80.0),
            segment("mid", 19, 19.0),
        ],
        &cfg,
    );
    assert_eq!((p[0].mode, p[0].tier), (LabelMode::OutsideAbove, 0));
    assert_eq!((p[2].mode, p[2].tier), (LabelMode::OutsideBelow, 0));
}

#[test]
fn zero_count_segments_are_hidden_and_skipped_in_ranking() {
    let cfg = LayoutConfig::default();
    let segs = normalize(&[("A", 90), ("B", 0), ("C", 5), ("D", 5)], &cfg).unwrap();
    let p = place(&segs, &cfg);
    assert_eq!(p[1].mode, LabelMode::Hidden);
    assert!(p[1].inside_text.is_empty() && p[1].outside_text.is_empty());
    assert_eq!(p[2].mode, LabelMode::OutsideAbove);
    assert_eq!(p[3].mode, LabelMode::OutsideBelow);
}

#[test]
fn revised_thresholds_keep_more_labels_inside() {
    let cfg = LayoutConfig::revised();
    let segs = normalize(&[("A", 50), ("B", 25), ("C", 19), ("D", 6)], &cfg).unwrap();
    let p = place(&segs, &cfg);
    assert_eq!(p[1].mode, LabelMode::Inside);
    assert_eq!(p[2].outside_text, "C");
    assert_eq!(p[2].inside_text, "19.0%");
    assert_eq!(p[3].outside_text, "D");
    assert_eq!(p[3].inside_text, "6.0%");
}

#[test]
fn rounding_in_the_text_does_not_move_the_threshold() {
    let cfg = LayoutConfig::default();
    let p = place(
        &[
            segment("A", 2996, 29.96),
            segment("B", 6008, 60.08),
            segment("C", 996, 9.96),
        ],
        &cfg,
    );
    assert_eq!(p[0].mode, LabelMode::OutsideAbove);
    assert_eq!(p[0].inside_text, "30.0%");
    assert_eq!(p[0].outside_text, "A");
    assert_eq!(p[1].mode, LabelMode::Inside);
    assert_eq!(p[2].mode, LabelMode::OutsideBelow);
    assert_eq!(p[2].outside_text, "C 10.0%");
    assert!(p[2].inside_text.is_empty());
}

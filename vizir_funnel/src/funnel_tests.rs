// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use kurbo::{Line, Point, Rect};

use crate::{
    DataItem, FunnelConfig, FunnelSeries, HeuristicTextMeasurer, ItemKey, LabelAlign,
    MarkPayload, Orientation, linear,
};

const VALUES: [f64; 4] = [100.0, 80.0, 50.0, 10.0];

fn series_with(config: FunnelConfig, bounds: Rect) -> FunnelSeries {
    let mut series = FunnelSeries::new(config).unwrap();
    for (i, v) in VALUES.iter().enumerate() {
        series
            .push_item(DataItem::new(ItemKey(i as u64), "stage", *v))
            .unwrap();
    }
    series.set_bounds(bounds);
    series
}

fn collapsed_series(config: FunnelConfig) -> FunnelSeries {
    let mut series = FunnelSeries::new(config).unwrap();
    for (i, v) in VALUES.iter().enumerate() {
        series
            .push_item(DataItem::collapsed(ItemKey(i as u64), "stage", *v))
            .unwrap();
    }
    series.set_bounds(Rect::new(0.0, 0.0, 200.0, 400.0));
    series
}

fn keys() -> impl Iterator<Item = ItemKey> {
    (0..VALUES.len() as u64).map(ItemKey)
}

/// Sum of slice lengths plus enabled link lengths along the stack axis.
fn stack_fill(series: &FunnelSeries) -> f64 {
    keys()
        .map(|k| {
            let slice = series.slice(k).unwrap();
            let link = series.link(k).unwrap();
            let mut total = 0.0;
            if !slice.disabled {
                total += slice.length;
            }
            if !link.disabled {
                total += link.length;
            }
            total
        })
        .sum()
}

#[test]
fn four_stage_vertical_funnel() {
    let mut series = series_with(FunnelConfig::new(), Rect::new(0.0, 0.0, 200.0, 400.0));
    series.run_layout_pass(&HeuristicTextMeasurer);

    let top: Vec<f64> = keys().map(|k| series.slice(k).unwrap().top_width).collect();
    assert_eq!(top, [200.0, 160.0, 100.0, 20.0]);

    for (i, k) in keys().enumerate() {
        let slice = series.slice(k).unwrap();
        assert!((slice.offset - 100.0 * i as f64).abs() < 1e-9, "offset of {i}");
        assert!((slice.length - 100.0).abs() < 1e-9, "equal shares at full progress");
        assert_eq!(slice.bottom_width, slice.top_width, "rectangular with ratio 0");
        assert_eq!(slice.cross_center, 100.0);
    }
    assert!(series.link(ItemKey(3)).unwrap().disabled, "last link has no successor");
    assert!((stack_fill(&series) - 400.0).abs() < 1e-9);
}

#[test]
fn links_take_their_length_out_of_each_share() {
    let config = FunnelConfig::new().with_link_length(20.0);
    let mut series = series_with(config, Rect::new(0.0, 0.0, 200.0, 400.0));
    series.run_layout_pass(&HeuristicTextMeasurer);

    for (i, k) in keys().enumerate() {
        let slice = series.slice(k).unwrap();
        let link = series.link(k).unwrap();
        assert!((slice.offset - 105.0 * i as f64).abs() < 1e-9);
        assert!((slice.length - 85.0).abs() < 1e-9);
        assert!((link.offset - (slice.offset + 85.0)).abs() < 1e-9, "link follows slice");
        assert_eq!(link.top_width, slice.bottom_width);
    }
    for k in [ItemKey(0), ItemKey(1), ItemKey(2)] {
        assert!(!series.link(k).unwrap().disabled);
    }
    assert!(series.link(ItemKey(3)).unwrap().disabled);
    assert_eq!(series.link(ItemKey(0)).unwrap().bottom_width, 160.0, "next slice's width");
    assert!((stack_fill(&series) - 400.0).abs() < 1e-9, "slices and links fill the stack");
}

#[test]
fn full_bottom_ratio_meets_next_slice() {
    let config = FunnelConfig::new().with_bottom_ratio(1.0);
    let mut series = series_with(config, Rect::new(0.0, 0.0, 200.0, 400.0));
    series.run_layout_pass(&HeuristicTextMeasurer);

    let keys: Vec<ItemKey> = keys().collect();
    for pair in keys.windows(2) {
        let upper = series.slice(pair[0]).unwrap();
        let lower = series.slice(pair[1]).unwrap();
        assert_eq!(upper.bottom_width, lower.top_width);
    }
    let last = series.slice(ItemKey(3)).unwrap();
    assert_eq!(last.bottom_width, last.top_width, "last slice tapers towards itself");
}

#[test]
fn hidden_items_are_skipped_by_the_taper() {
    let config = FunnelConfig::new().with_bottom_ratio(1.0);
    let mut series = series_with(config, Rect::new(0.0, 0.0, 200.0, 400.0));
    series.hide_item(ItemKey(1), Some(0.0)).unwrap();
    series.run_layout_pass(&HeuristicTextMeasurer);

    assert_eq!(series.slice(ItemKey(0)).unwrap().bottom_width, 100.0, "tapers to item 2");
    assert!(series.slice(ItemKey(1)).unwrap().disabled);
    assert!(!series.label(ItemKey(1)).unwrap().visible);
    assert!((stack_fill(&series) - 400.0).abs() < 1e-9, "visible slices expand");
}

#[test]
fn layout_pass_is_idempotent() {
    let config = FunnelConfig::new()
        .with_link_length(12.0)
        .with_bottom_ratio(0.5)
        .with_align_labels(true);
    let mut series = series_with(config, Rect::new(0.0, 0.0, 300.0, 400.0));
    series.run_layout_pass(&HeuristicTextMeasurer);
    assert!(!series.needs_layout());
    let first: Vec<_> = keys()
        .map(|k| {
            (
                series.slice(k).cloned(),
                series.link(k).cloned(),
                series.tick(k).cloned(),
                series.label(k).cloned(),
            )
        })
        .collect();
    let marks = series.marks();

    series.run_layout_pass(&HeuristicTextMeasurer);
    let second: Vec<_> = keys()
        .map(|k| {
            (
                series.slice(k).cloned(),
                series.link(k).cloned(),
                series.tick(k).cloned(),
                series.label(k).cloned(),
            )
        })
        .collect();
    assert_eq!(first, second);
    assert_eq!(marks, series.marks());
}

#[test]
fn undefined_values_render_nothing() {
    let mut series = series_with(FunnelConfig::new(), Rect::new(0.0, 0.0, 200.0, 300.0));
    series
        .insert_item(1, DataItem::empty(ItemKey(9), "unknown"))
        .unwrap();
    series.run_layout_pass(&HeuristicTextMeasurer);

    assert!(series.slice(ItemKey(9)).unwrap().disabled);
    assert!(!series.label(ItemKey(9)).unwrap().visible);
    assert_eq!(series.aggregates().count, 4);
    assert!((series.slice(ItemKey(1)).unwrap().offset - 75.0).abs() < 1e-9);
    assert!(series.marks().iter().all(|m| m.key != ItemKey(9)));
}

#[test]
fn all_zero_values_render_nothing() {
    let mut series = FunnelSeries::default();
    series.push_item(DataItem::new(ItemKey(0), "a", 0.0)).unwrap();
    series.push_item(DataItem::new(ItemKey(1), "b", 0.0)).unwrap();
    series.set_bounds(Rect::new(0.0, 0.0, 100.0, 100.0));
    series.run_layout_pass(&HeuristicTextMeasurer);
    assert!(series.slice(ItemKey(0)).unwrap().disabled);
    assert!(series.marks().is_empty());
}

#[test]
fn default_labels_are_centered_on_slices() {
    let mut series = series_with(FunnelConfig::new(), Rect::new(0.0, 0.0, 200.0, 400.0));
    series.run_layout_pass(&HeuristicTextMeasurer);

    let label = series.label(ItemKey(0)).unwrap();
    assert_eq!(label.text, "41.7%");
    assert_eq!(label.align, LabelAlign::Middle);
    let bounds = label.bounds().unwrap();
    assert!((bounds.center().x - 100.0).abs() < 1e-9);
    assert!((bounds.center().y - 50.0).abs() < 1e-9);
    assert!(series.tick(ItemKey(0)).unwrap().disabled, "no ticks without aligned labels");
    assert_eq!(series.labels_region(), series.slices_region());
}

#[test]
fn aligned_labels_sit_in_a_column_with_ticks() {
    let config = FunnelConfig::new().with_align_labels(true);
    let mut series = series_with(config, Rect::new(0.0, 0.0, 300.0, 400.0));
    series.run_layout_pass(&HeuristicTextMeasurer);

    // "41.7%": 5 glyphs * 7.2 + 2 * 5 padding = 46 wide, column = 46 + 2 * 10.
    assert_eq!(series.slices_region(), Rect::new(0.0, 0.0, 234.0, 400.0));
    assert_eq!(series.labels_region(), Rect::new(244.0, 10.0, 290.0, 390.0));

    let label = series.label(ItemKey(0)).unwrap();
    assert_eq!(label.align, LabelAlign::Start);
    assert_eq!(label.position, Point::new(244.0, 39.0));

    let tick = series.tick(ItemKey(0)).unwrap();
    assert!(!tick.disabled);
    assert_eq!(tick.line, Some(Line::new((234.0, 50.0), (244.0, 50.0))));
}

#[test]
fn crowded_aligned_labels_do_not_overlap() {
    let config = FunnelConfig::new().with_align_labels(true);
    let mut series = series_with(config, Rect::new(0.0, 0.0, 300.0, 60.0));
    series.run_layout_pass(&HeuristicTextMeasurer);

    let boxes: Vec<Rect> = keys()
        .map(|k| series.label(k).unwrap().bounds().unwrap())
        .collect();
    assert!((boxes[0].y0 - 10.0).abs() < 1e-9, "first label starts at the column origin");
    for pair in boxes.windows(2) {
        assert!(pair[0].y1 <= pair[1].y0 + 1e-9, "labels overlap: {pair:?}");
    }
}

#[test]
fn horizontal_funnel_is_transposed() {
    let config = FunnelConfig::new().with_orientation(Orientation::Horizontal);
    let mut series = series_with(config, Rect::new(0.0, 0.0, 400.0, 200.0));
    series.run_layout_pass(&HeuristicTextMeasurer);

    let region = series.slices_region();
    let bounds = |k| {
        series
            .slice(k)
            .unwrap()
            .bounds(Orientation::Horizontal, region)
    };
    assert_eq!(bounds(ItemKey(0)), Rect::new(0.0, 0.0, 100.0, 200.0));
    assert_eq!(bounds(ItemKey(1)), Rect::new(100.0, 20.0, 200.0, 180.0));

    let label = series.label(ItemKey(0)).unwrap();
    assert_eq!(label.rotation, -90.0);
    let size = label.measured().unwrap();
    assert!(size.height > size.width, "rotated box is transposed");
}

#[test]
fn synchronized_reveal_keeps_the_stack_full() {
    let config = FunnelConfig::new().with_easing(linear).with_link_length(20.0);
    let mut series = collapsed_series(config);
    series.show(Some(100.0));
    assert!(series.advance(50.0));
    series.run_layout_pass(&HeuristicTextMeasurer);

    let top: Vec<f64> = keys().map(|k| series.slice(k).unwrap().top_width).collect();
    assert_eq!(top, [100.0, 80.0, 50.0, 10.0], "widths grow with working values");
    assert!((series.slice(ItemKey(3)).unwrap().offset - 315.0).abs() < 1e-9);
    assert!((stack_fill(&series) - 400.0).abs() < 1e-9);
}

#[test]
fn sequenced_reveal_staggers_items() {
    let config = FunnelConfig::new()
        .with_easing(linear)
        .with_interpolation_duration(200.0)
        .with_sequenced_interpolation(true, 50.0);
    let mut series = collapsed_series(config);
    let handle = series.show(None);
    // Item 3 starts at 3 * 50 + 200 * 3 / 4 = 300 and runs for 200.
    assert!((handle.duration - 500.0).abs() < 1e-9);

    series.advance(100.0);
    assert!((series.item(ItemKey(0)).unwrap().working_value - 50.0).abs() < 1e-9);
    assert_eq!(series.item(ItemKey(3)).unwrap().working_value, 0.0, "still delayed");

    series.run_layout_pass(&HeuristicTextMeasurer);
    assert!((stack_fill(&series) - 400.0).abs() < 1e-9, "stack stays full mid-reveal");

    series.advance(500.0);
    assert!(!series.is_animating());
    let values: Vec<f64> = series.items().iter().map(|i| i.working_value).collect();
    assert_eq!(values, VALUES);
}

#[test]
fn timed_hide_marks_items_until_done() {
    let config = FunnelConfig::new().with_easing(linear);
    let mut series = series_with(config, Rect::new(0.0, 0.0, 200.0, 400.0));
    series.hide(Some(100.0));
    series.advance(50.0);
    let item = series.item(ItemKey(0)).unwrap();
    assert!(item.is_hiding && item.visible);
    assert!((item.working_value - 50.0).abs() < 1e-9);

    series.advance(100.0);
    assert!(series.items().iter().all(|i| !i.visible && !i.is_hiding));
    series.run_layout_pass(&HeuristicTextMeasurer);
    assert!(series.marks().is_empty());
}

#[test]
fn instant_hide_waits_for_running_reveal() {
    let mut series = collapsed_series(FunnelConfig::new());
    let reveal = series.show(Some(100.0));
    let hide = series.hide(Some(0.0));
    assert_eq!(hide, reveal, "deferred hide reports the reveal");
    series.advance(50.0);
    assert!(series.items().iter().all(|i| i.visible), "reveal keeps running");

    series.advance(100.0);
    assert!(series.items().iter().all(|i| !i.visible));
    assert!(series.items().iter().all(|i| i.working_value == 0.0));
    assert!(series.needs_layout());
}

#[test]
fn superseded_reveal_drops_its_deferred_hide() {
    let mut series = collapsed_series(FunnelConfig::new());
    let first = series.show(Some(100.0));
    assert_eq!(series.hide(Some(0.0)), first);
    let second = series.show(Some(100.0));
    assert_ne!(second.id, first.id);

    series.advance(1.0);
    assert!(series.items().iter().all(|i| i.visible), "latest reveal is not undone");
    assert!(series.items().iter().all(|i| i.working_value > 0.0));

    series.advance(101.0);
    let values: Vec<f64> = series.items().iter().map(|i| i.working_value).collect();
    assert_eq!(values, VALUES);
    assert!(series.items().iter().all(|i| i.visible));
}

#[test]
fn configured_zero_duration_hide_waits_for_running_reveal() {
    let config = FunnelConfig::new().with_interpolation_duration(0.0);
    let mut series = collapsed_series(config);
    let reveal = series.show(Some(100.0));
    assert_eq!(series.hide(None), reveal, "resolved duration of 0 defers");
    assert!(series.items().iter().all(|i| i.visible));

    series.advance(100.0);
    assert!(series.items().iter().all(|i| !i.visible));
}

#[test]
fn instant_show_leaves_nothing_running() {
    let mut series = collapsed_series(FunnelConfig::new());
    let handle = series.show(Some(0.0));
    assert_eq!(handle.duration, 0.0);
    assert!(!series.is_animating(), "no tweens were stored");
    let values: Vec<f64> = series.items().iter().map(|i| i.working_value).collect();
    assert_eq!(values, VALUES);
    assert!(series.items().iter().all(|i| i.visible));
}

#[test]
fn removing_an_item_releases_its_elements() {
    let mut series = series_with(FunnelConfig::new(), Rect::new(0.0, 0.0, 200.0, 400.0));
    series.run_layout_pass(&HeuristicTextMeasurer);
    series.hide_item(ItemKey(2), Some(100.0)).unwrap();

    let removed = series.remove_item(ItemKey(2)).unwrap();
    assert_eq!(removed.value, Some(50.0));
    assert!(series.slice(ItemKey(2)).is_none());
    series.advance(1.0);
    assert!(!series.is_animating(), "cancelled group completes");

    series.run_layout_pass(&HeuristicTextMeasurer);
    let offset = series.slice(ItemKey(3)).unwrap().offset;
    assert!((offset - 800.0 / 3.0).abs() < 1e-9, "two shares of 400 / 3, got {offset}");
}

#[test]
fn marks_are_ordered_by_z_index() {
    let config = FunnelConfig::new().with_link_length(20.0);
    let mut series = series_with(config, Rect::new(0.0, 0.0, 200.0, 400.0));
    series.run_layout_pass(&HeuristicTextMeasurer);

    let marks = series.marks();
    assert_eq!(marks.len(), 4 + 3 + 4, "slices, enabled links and labels");
    assert!(marks.windows(2).all(|w| w[0].z_index <= w[1].z_index));
    assert!(matches!(marks[0].payload, MarkPayload::Link { .. }));
    let bullet = series.bullet_position(ItemKey(0), None).unwrap();
    assert_eq!(bullet, Point::new(200.0, 42.5));
}

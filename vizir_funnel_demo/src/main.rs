// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Funnel demos for `vizir_funnel`.
//!
//! Renders a sample funnel in several configurations and writes one SVG per state.

mod svg;

use kurbo::Rect;
use vizir_funnel::{
    DataItem, FunnelConfig, FunnelSeries, HeuristicTextMeasurer, ItemKey, Orientation, linear,
};

const STAGES: [(&str, f64); 5] = [
    ("Visits", 1200.0),
    ("Sign-ups", 740.0),
    ("Trials", 410.0),
    ("Purchases", 180.0),
    ("Renewals", 95.0),
];

fn main() {
    let demos = [
        ("funnel_vertical", vertical_demo()),
        ("funnel_horizontal", horizontal_demo()),
        ("funnel_aligned", aligned_demo()),
        ("funnel_reveal", reveal_demo()),
    ];

    for (name, svg) in demos {
        let path = format!("{name}.svg");
        std::fs::write(&path, svg).expect("write demo svg");
        println!("wrote {path}");
    }
}

fn sample_series(config: FunnelConfig, bounds: Rect) -> FunnelSeries {
    let mut series = FunnelSeries::new(config).expect("valid demo config");
    for (i, (category, value)) in STAGES.iter().enumerate() {
        series
            .push_item(DataItem::new(ItemKey(i as u64), *category, *value))
            .expect("unique demo keys");
    }
    series.set_bounds(bounds);
    series
}

fn render(series: &mut FunnelSeries) -> String {
    series.run_layout_pass(&HeuristicTextMeasurer);
    let mut scene = svg::SvgScene::default();
    scene.set_view_box(series.bounds());
    scene.set_marks(series.marks());
    scene.to_svg_string()
}

fn vertical_demo() -> String {
    let config = FunnelConfig::new()
        .with_bottom_ratio(1.0)
        .with_link_length(8.0);
    let mut series = sample_series(config, Rect::new(0.0, 0.0, 320.0, 420.0));
    render(&mut series)
}

fn horizontal_demo() -> String {
    let config = FunnelConfig::new()
        .with_orientation(Orientation::Horizontal)
        .with_bottom_ratio(0.5)
        .with_link_length(12.0);
    let mut series = sample_series(config, Rect::new(0.0, 0.0, 560.0, 240.0));
    render(&mut series)
}

fn aligned_demo() -> String {
    let config = FunnelConfig::new()
        .with_align_labels(true)
        .with_bottom_ratio(1.0)
        .with_label_formatter(|ctx| format!("{}: {:.1}%", ctx.category, ctx.percent));
    let mut series = sample_series(config, Rect::new(0.0, 0.0, 480.0, 420.0));
    for key in [ItemKey(3), ItemKey(4)] {
        if let Some(tooltip) = series.tooltip_text(key) {
            println!("{tooltip}");
        }
    }
    render(&mut series)
}

fn reveal_demo() -> String {
    let config = FunnelConfig::new()
        .with_easing(linear)
        .with_link_length(8.0)
        .with_sequenced_interpolation(true, 60.0);
    let mut series = sample_series(config, Rect::new(0.0, 0.0, 320.0, 420.0));
    for i in 0..STAGES.len() {
        series
            .hide_item(ItemKey(i as u64), Some(0.0))
            .expect("demo key exists");
    }
    let handle = series.show(Some(400.0));
    series.advance(handle.start + handle.duration / 2.0);
    render(&mut series)
}

use term_chart::axis::{XAxis, YAxis};
use term_chart::data_types::{AxisRange, AxisSide, XAxisKind};

#[test]
fn test_labels_share_width() {
    let mut axis = YAxis::new(AxisSide::Left, 2);
    axis.range = AxisRange::new(0.0, 10.0);

    let labels = axis.labels(3);
    assert_eq!(labels, vec!["0.00", "5.00", "10.0"]);
    assert_eq!(axis.col_width(3), 4);
}

#[test]
fn test_labels_without_range() {
    let axis = YAxis::new(AxisSide::Right, 2);
    assert!(axis.labels(10).is_empty());
    assert_eq!(axis.col_width(10), 0);
}

#[test]
fn test_single_row_shows_minimum() {
    let mut axis = YAxis::new(AxisSide::Left, 1);
    axis.range = AxisRange::new(-2.0, 8.0);
    assert_eq!(axis.labels(1), vec!["-2.0"]);
}

#[test]
fn test_axis_zoom_and_pan() {
    let mut axis = YAxis::new(AxisSide::Left, 2);
    axis.range = AxisRange::new(0.0, 10.0);

    axis.zoom();
    let zoomed = axis.range.span().unwrap();
    assert!(zoomed < 10.0);

    axis.unzoom();
    assert!(axis.range.span().unwrap() > zoomed);

    let before = axis.range.min.unwrap();
    axis.pan_up();
    assert!(axis.range.min.unwrap() > before);
    axis.pan_down();
    assert!((axis.range.min.unwrap() - before).abs() < 1e-9);
}

#[test]
fn test_x_ticks() {
    let numeric = XAxis::new(XAxisKind::Numeric, 0);
    assert_eq!(numeric.chars_per_tick(), 10);
    assert!(numeric.is_tick(0));
    assert!(numeric.is_tick(-20));
    assert!(!numeric.is_tick(15));

    let datetime = XAxis::new(XAxisKind::Datetime, 0);
    assert_eq!(datetime.chars_per_tick(), 16);
    assert!(datetime.is_tick(32));
    assert!(!datetime.is_tick(10));
    assert_eq!(datetime.height(), 2);
}

#[test]
fn test_whole_number_labels_keep_their_value() {
    let mut axis = YAxis::new(AxisSide::Left, 0);
    axis.range = AxisRange::new(5.0, 105.0);

    let labels = axis.labels(3);
    assert_eq!(labels, vec!["  5", " 55", "105"]);
    assert_eq!(labels[0].trim().parse::<f64>().unwrap(), 5.0);
    assert_eq!(axis.col_width(3), 3);
}

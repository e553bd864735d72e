use base::{Rect, Vec2};

#[test]
fn test_from_center() {
    let r = Rect::from_center(Vec2::new(10.0, 20.0), Vec2::new(4.0, 6.0));
    assert_eq!(r.origin, Vec2::new(8.0, 17.0));
    assert_eq!(r.center(), Vec2::new(10.0, 20.0));
}

#[test]
fn test_intersection_overlap() {
    let a = Rect::new(Vec2::new(0.0_f32, 0.0), Vec2::new(4.0, 4.0));
    let b = Rect::new(Vec2::new(2.0_f32, 2.0), Vec2::new(4.0, 4.0));
    let i = a.intersection(b).unwrap();
    assert_eq!(i.origin, Vec2::new(2.0, 2.0));
    assert_eq!(i.size, Vec2::new(2.0, 2.0));
}

#[test]
fn test_intersection_disjoint() {
    let a = Rect::new(Vec2::new(0.0_f32, 0.0), Vec2::new(1.0, 1.0));
    let b = Rect::new(Vec2::new(5.0_f32, 5.0), Vec2::new(1.0, 1.0));
    assert!(a.intersection(b).is_none());
}

#[test]
fn test_iou_identical_is_one() {
    let a = Rect::new(Vec2::new(1.0_f32, 1.0), Vec2::new(3.0, 3.0));
    assert!((a.iou(&a) - 1.0).abs() < 1e-6);
}

#[test]
fn test_iou_half_overlap() {
    let a = Rect::new(Vec2::new(0.0_f32, 0.0), Vec2::new(2.0, 2.0));
    let b = Rect::new(Vec2::new(1.0_f32, 0.0), Vec2::new(2.0, 2.0));
    // intersection 2, union 6
    assert!((a.iou(&b) - 1.0 / 3.0).abs() < 1e-6);
}

#[test]
fn test_iou_zero_area() {
    let a = Rect::new(Vec2::new(0.0_f32, 0.0), Vec2::new(0.0, 2.0));
    let b = Rect::new(Vec2::new(0.0_f32, 0.0), Vec2::new(2.0, 2.0));
    assert_eq!(a.iou(&b), 0.0);
}

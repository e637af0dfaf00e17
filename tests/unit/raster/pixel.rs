use super::*;
use serde_json::json;

#[test]
fn packed_conversions_respect_channel_order() {
    assert_eq!(Pixel::by_rgb(0x123456), Pixel::new(0x12, 0x34, 0x56, 0xFF));
    assert_eq!(Pixel::by_rgba(0x12345678), Pixel::new(0x12, 0x34, 0x56, 0x78));
    assert_eq!(Pixel::by_argb(0x12345678), Pixel::new(0x34, 0x56, 0x78, 0x12));

    let px = Pixel::new(1, 2, 3, 4);
    assert_eq!(Pixel::by_rgba(px.to_rgba()), px);
    assert_eq!(Pixel::by_argb(px.to_argb()), px);
}

#[test]
fn rgb_packing_round_trips_on_sampled_values() {
    for x in (0u32..=0xFF_FFFF).step_by(0x1_0101) {
        let px = Pixel::by_rgb(x);
        assert_eq!(px.to_rgb(), x);
        assert_eq!(Pixel::by_rgb(px.to_rgb()), px);
    }
    assert_eq!(Pixel::by_rgb(0xFF_FFFF).to_rgb(), 0xFF_FFFF);
}

#[test]
fn by_rgb_ignores_high_byte() {
    assert_eq!(Pixel::by_rgb(0xAB_102030), Pixel::by_rgb(0x102030));
}

#[test]
fn transparent_top_keeps_bottom() {
    let bottom = Pixel::new(10, 20, 30, 40);
    assert_eq!(composite_over(bottom, Pixel::BLANK), bottom);
    assert_eq!(composite_over(bottom, Pixel::new(200, 0, 9, 0)), bottom);
}

#[test]
fn opaque_top_replaces_color_and_saturates_alpha() {
    let bottom = Pixel::new(10, 20, 30, 40);
    let top = Pixel::rgb(200, 100, 50);
    let out = composite_over(bottom, top);
    assert_eq!((out.r, out.g, out.b), (200, 100, 50));
    assert_eq!(out.alpha, 0xFF);
}

#[test]
fn weighted_add_matches_reference_values() {
    let bottom = Pixel::by_rgba(0x00FFFF_FF);
    let top = Pixel::by_rgba(0xFFFF00_11);
    assert_eq!(composite_over(bottom, top), Pixel::new(0xFF, 0xFF, 0xEE, 0xFF));

    let bottom = Pixel::new(100, 100, 100, 100);
    let top = Pixel::new(10, 20, 30, 128);
    assert_eq!(composite_over(bottom, top), Pixel::new(60, 70, 80, 228));
}

#[test]
fn alpha_accumulates_additively() {
    let half = Pixel::new(0, 0, 0, 100);
    let out = composite_over(half, half);
    assert_eq!(out.alpha, 200);
    assert_eq!(composite_over(out, half).alpha, 0xFF);
}

#[test]
fn deserializes_hex_object_and_array() {
    let px: Pixel = serde_json::from_value(json!("#ff0000")).unwrap();
    assert_eq!(px, Pixel::rgb(0xFF, 0, 0));

    let px: Pixel = serde_json::from_value(json!("0000ff80")).unwrap();
    assert_eq!(px, Pixel::new(0, 0, 0xFF, 0x80));

    let px: Pixel = serde_json::from_value(json!({"r": 1, "g": 2, "b": 3})).unwrap();
    assert_eq!(px, Pixel::rgb(1, 2, 3));

    let px: Pixel = serde_json::from_value(json!({"r": 1, "g": 2, "b": 3, "a": 4})).unwrap();
    assert_eq!(px, Pixel::new(1, 2, 3, 4));

    let px: Pixel = serde_json::from_value(json!([5, 6, 7, 8])).unwrap();
    assert_eq!(px, Pixel::new(5, 6, 7, 8));

    assert!(serde_json::from_value::<Pixel>(json!("#12345")).is_err());
    assert!(serde_json::from_value::<Pixel>(json!("#+12345")).is_err());
    assert!(serde_json::from_value::<Pixel>(json!([1, 2])).is_err());
}

#[test]
fn serializes_as_rgba_hex() {
    let v = serde_json::to_value(Pixel::new(0x10, 0x20, 0x30, 0x40)).unwrap();
    assert_eq!(v, json!("#10203040"));
    let back: Pixel = serde_json::from_value(v).unwrap();
    assert_eq!(back, Pixel::new(0x10, 0x20, 0x30, 0x40));
}

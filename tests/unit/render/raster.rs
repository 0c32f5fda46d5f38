use super::*;

#[test]
fn empty_draw_is_transparent() {
    let bytes = render_overlay(8, 4, |_| Ok(())).unwrap();
    assert_eq!(bytes.len(), 8 * 4 * 4);
    assert!(bytes.iter().all(|b| *b == 0));
}

#[test]
fn filled_rect_covers_its_pixels() {
    let bytes = render_overlay(8, 8, |ctx| {
        ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(255, 0, 0, 255));
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(2.0, 2.0, 6.0, 6.0));
        Ok(())
    })
    .unwrap();
    let at = |x: usize, y: usize| &bytes[(y * 8 + x) * 4..(y * 8 + x) * 4 + 4];
    assert_eq!(at(4, 4), &[255, 0, 0, 255]);
    assert_eq!(at(0, 0), &[0, 0, 0, 0]);
}

#[test]
fn oversized_surfaces_are_render_errors() {
    let err = render_overlay(70_000, 1, |_| Ok(())).unwrap_err();
    assert!(err.to_string().starts_with("render error:"));
}

#[test]
fn star_alternates_radii() {
    let p = star(5, 1.0, 2.0);
    let bbox = vello_cpu::kurbo::Shape::bounding_box(&p);
    assert!((bbox.min_y() + 2.0).abs() < 1e-9);
}

#[test]
fn gradient_image_validates_dimensions() {
    assert!(premul_bytes_to_image(&[0u8; 12], 2, 2).is_err());
    assert!(straight_image(4, 16, |_, y| [255, (y * 16) as u8, 0, 255]).is_ok());
}

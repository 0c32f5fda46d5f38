use super::*;

fn png_base64(w: u32, h: u32, rgba: [u8; 4]) -> String {
    let img = image::DynamicImage::ImageRgba8(image::RgbaImage::from_pixel(w, h, image::Rgba(rgba)));
    let mut bytes = std::io::Cursor::new(Vec::new());
    img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
    base64::engine::general_purpose::STANDARD.encode(bytes.into_inner())
}

#[test]
fn decodes_plain_and_data_url_payloads() {
    let b64 = png_base64(3, 2, [255, 0, 0, 128]);
    let plain = decode_sprite(&b64).unwrap();
    assert_eq!((plain.width, plain.height), (3, 2));
    assert_eq!(&plain.rgba8_premul[..4], &[128, 0, 0, 128]);

    let url = format!("data:image/png;base64,{b64}");
    let from_url = decode_sprite(&url).unwrap();
    assert_eq!(from_url.rgba8_premul, plain.rgba8_premul);
}

#[test]
fn garbage_is_an_error() {
    assert!(decode_sprite("not base64 at all!").is_err());
    let not_an_image = base64::engine::general_purpose::STANDARD.encode(b"hello");
    assert!(decode_sprite(&not_an_image).is_err());
}

#[test]
fn large_sprites_are_downscaled() {
    let s = decode_sprite(&png_base64(600, 300, [0, 255, 0, 255])).unwrap();
    assert!(s.width <= 256 && s.height <= 256);
}

#[test]
fn cache_hits_and_evicts_least_recently_used() {
    let a = png_base64(1, 1, [1, 2, 3, 255]);
    let b = png_base64(1, 1, [4, 5, 6, 255]);
    let c = png_base64(1, 1, [7, 8, 9, 255]);
    let mut cache = SpriteCache::new(2);
    let first = cache.get_or_decode(&a).unwrap();
    assert!(Arc::ptr_eq(&first, &cache.get_or_decode(&a).unwrap()));
    cache.get_or_decode(&b).unwrap();
    cache.get_or_decode(&a).unwrap();
    cache.get_or_decode(&c).unwrap();
    assert_eq!(cache.len(), 2);
    // `a` was touched after `b`, so `b` is the one evicted.
    assert!(Arc::ptr_eq(&first, &cache.get_or_decode(&a).unwrap()));
}

#[test]
fn failures_are_cached_as_misses() {
    let mut cache = SpriteCache::default();
    assert!(cache.get_or_decode("%%%").is_none());
    assert!(cache.get_or_decode("%%%").is_none());
    assert_eq!(cache.len(), 1);
}

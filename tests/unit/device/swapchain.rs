use super::*;
use crate::foundation::math::Color;

fn temp_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!(
        "softras_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

#[test]
fn present_swaps_and_converts_to_rgba() {
    let viewport = Viewport::new(2, 1).unwrap();
    let mut chain = Swapchain::new(viewport);
    let color = ColorBuffer::new(2);
    color.write_color(0, Color::RED);
    color.write_color(1, Color::BLUE);

    assert_eq!(chain.front(), &[0; 8]);
    chain.present(&color);
    assert_eq!(chain.presented(), 1);
    assert_eq!(chain.front(), &[255, 0, 0, 255, 0, 0, 255, 255]);

    color.write_color(0, Color::GREEN);
    chain.present(&color);
    assert_eq!(&chain.front()[..4], &[0, 255, 0, 255]);
}

#[test]
fn save_png_round_trips_through_image() {
    let tmp = temp_dir("swapchain_png");
    std::fs::create_dir_all(&tmp).unwrap();
    let path = tmp.join("frame.png");

    let viewport = Viewport::new(3, 2).unwrap();
    let mut chain = Swapchain::new(viewport);
    let color = ColorBuffer::new(6);
    color.write_color(4, Color::WHITE);
    chain.present(&color);
    chain.save_png(&path).unwrap();

    let decoded = image::open(&path).unwrap().to_rgba8();
    assert_eq!(decoded.dimensions(), (3, 2));
    assert_eq!(decoded.get_pixel(1, 1).0, [255, 255, 255, 255]);
    assert_eq!(decoded.get_pixel(0, 0).0, [0, 0, 0, 0]);
}

#[test]
fn save_png_into_missing_directory_fails() {
    let chain = Swapchain::new(Viewport::new(1, 1).unwrap());
    let err = chain
        .save_png(temp_dir("missing").join("nested").join("x.png"))
        .unwrap_err();
    assert!(matches!(err, crate::RasterError::Other(_)));
}

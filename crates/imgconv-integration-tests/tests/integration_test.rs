use image::DynamicImage;
use imgconv_common::{Error, TargetFormat};
use imgconv_core::{BatchConverter, BatchProcessor, ConversionRequest};
use imgconv_formats::ImageDecoder;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Gradient so lossy encoders have real content to work with
fn gradient(width: u32, height: u32) -> DynamicImage {
    let mut img = DynamicImage::new_rgb8(width, height);
    let rgb_img = img.as_mut_rgb8().unwrap();
    for (x, y, pixel) in rgb_img.enumerate_pixels_mut() {
        let r = ((x as f32 / width as f32) * 255.0) as u8;
        let g = ((y as f32 / height as f32) * 255.0) as u8;
        let b = (((x + y) as f32 / (width + height) as f32) * 255.0) as u8;
        *pixel = image::Rgb([r, g, b]);
    }
    img
}

fn write_source(dir: &Path, name: &str, width: u32, height: u32) -> PathBuf {
    let path = dir.join(name);
    gradient(width, height).save(&path).unwrap();
    path
}

#[test]
fn test_round_trip_every_builtin_format() {
    let temp_dir = TempDir::new().unwrap();
    let source = write_source(temp_dir.path(), "source.png", 320, 160);
    let converter = BatchConverter::new();

    for format in TargetFormat::all().filter(|f| f.to_image_format().is_some()) {
        let out_dir = temp_dir.path().join(format.extension());
        let request = ConversionRequest::new(vec![source.clone()], format)
            .with_output_dir(&out_dir)
            .with_resize(100, 100, true);

        let report = converter.convert(&request);
        let file = report.outcomes[0]
            .result
            .as_ref()
            .unwrap_or_else(|e| panic!("{} failed: {}", format, e));

        assert_eq!(
            file.destination,
            out_dir.join(format!("source.{}", format.extension()))
        );
        let dims = ImageDecoder::probe(&file.destination).unwrap();
        assert_eq!(dims, (100, 50), "{}", format);
    }
}

#[test]
fn test_each_file_fits_from_the_original_request() {
    let temp_dir = TempDir::new().unwrap();
    let wide = write_source(temp_dir.path(), "wide.png", 1000, 500);
    let tall = write_source(temp_dir.path(), "tall.png", 500, 1000);

    let request = ConversionRequest::new(vec![wide, tall], TargetFormat::Png)
        .with_output_dir(temp_dir.path().join("out"))
        .with_resize(400, 400, true);
    let report = BatchConverter::new().convert(&request);

    let dims: Vec<_> = report
        .outcomes
        .iter()
        .map(|o| {
            let file = o.result.as_ref().unwrap();
            (file.width, file.height)
        })
        .collect();
    // A carried-over 400x200 would give the tall image 100x200
    assert_eq!(dims, vec![(400, 200), (200, 400)]);
}

#[test]
fn test_source_is_never_overwritten() {
    let temp_dir = TempDir::new().unwrap();
    let source = write_source(temp_dir.path(), "keep.png", 64, 64);
    let before = std::fs::read(&source).unwrap();

    let request = ConversionRequest::new(vec![source.clone()], TargetFormat::Png)
        .with_resize(8, 8, false);
    let report = BatchConverter::new().convert(&request);

    assert!(matches!(
        report.outcomes[0].result,
        Err(Error::WouldOverwriteSource(_))
    ));
    assert_eq!(std::fs::read(&source).unwrap(), before);
}

#[test]
fn test_mixed_batch_keeps_order_and_length() {
    let temp_dir = TempDir::new().unwrap();
    let good_a = write_source(temp_dir.path(), "a.png", 30, 30);
    let corrupt = temp_dir.path().join("b.jpg");
    std::fs::write(&corrupt, [0xFF, 0xD8, 0xFF, 0x00, 0x13]).unwrap();
    let good_c = write_source(temp_dir.path(), "c.bmp", 30, 30);

    let inputs = vec![good_a.clone(), corrupt.clone(), good_c.clone()];
    let request = ConversionRequest::new(inputs.clone(), TargetFormat::Tiff);
    let report = BatchConverter::new().convert(&request);

    let sources: Vec<_> = report.outcomes.iter().map(|o| o.source.clone()).collect();
    assert_eq!(sources, inputs);
    assert_eq!(report.succeeded(), 2);
    assert!(report.outcomes[1].result.as_ref().unwrap_err().is_decode());
    assert!(temp_dir.path().join("a.tiff").exists());
    assert!(temp_dir.path().join("c.tiff").exists());
}

#[test]
fn test_jpeg_quality_affects_size() {
    let temp_dir = TempDir::new().unwrap();
    let source = write_source(temp_dir.path(), "photo.png", 640, 480);
    let converter = BatchConverter::new();

    let high = ConversionRequest::new(vec![source.clone()], TargetFormat::Jpeg)
        .with_output_dir(temp_dir.path().join("high"))
        .with_quality(95);
    let low = ConversionRequest::new(vec![source], TargetFormat::Jpeg)
        .with_output_dir(temp_dir.path().join("low"))
        .with_quality(20);

    let high_report = converter.convert(&high);
    let low_report = converter.convert(&low);
    let high_path = &high_report.outcomes[0].result.as_ref().unwrap().destination;
    let low_path = &low_report.outcomes[0].result.as_ref().unwrap().destination;

    let high_size = std::fs::metadata(high_path).unwrap().len();
    let low_size = std::fs::metadata(low_path).unwrap().len();
    assert!(low_size < high_size, "{} !< {}", low_size, high_size);
}

#[tokio::test]
async fn test_large_batch_processing() {
    let temp_dir = TempDir::new().unwrap();

    let inputs: Vec<_> = (0..50)
        .map(|i| write_source(temp_dir.path(), &format!("img_{:03}.png", i), 64, 48))
        .collect();

    let request = ConversionRequest::new(inputs, TargetFormat::Webp);
    let report = BatchProcessor::default()
        .process_batch_logged(request)
        .await
        .unwrap();

    assert_eq!(report.succeeded(), 50);
    assert!(temp_dir.path().join("img_049.webp").exists());
}

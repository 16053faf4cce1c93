//! End-to-end run over a small generated corpus: images plus metadata
//! documents in a temp directory, batched with deliberately small window
//! sizes so the chunking, manifest placement, failure containment, and
//! sub-batch rules are all observable.

use photo_batcher::config::BatcherConfig;
use photo_batcher::manifest::Manifest;
use photo_batcher::workflow::partition;
use std::fs;
use std::path::Path;

fn write_image(path: &Path) {
    image::RgbImage::from_pixel(640, 480, image::Rgb([10, 90, 200]))
        .save(path)
        .unwrap();
}

fn write_template(path: &Path) {
    let mut template = String::from("Diversity Photo Manifest,,,,,\n");
    for _ in 0..9 {
        template.push_str(",,,,,\n");
    }
    fs::write(path, template).unwrap();
}

fn names_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[test]
fn corpus_is_partitioned_into_dated_batches() {
    let root = tempfile::tempdir().unwrap();
    let image_dir = root.path().join("images");
    let output_dir = root.path().join("output");
    let template_path = root.path().join("template.csv");
    fs::create_dir_all(&image_dir).unwrap();
    write_template(&template_path);

    // a..=c are valid images dated 03/2023; d is dated but undecodable;
    // e has no metadata document at all.
    for name in ["a.jpg", "b.jpg", "c.jpg"] {
        write_image(&image_dir.join(name));
    }
    fs::write(image_dir.join("d.jpg"), b"not a jpeg at all").unwrap();
    write_image(&image_dir.join("e.jpg"));
    for stem in ["a", "b", "c", "d"] {
        fs::write(
            image_dir.join(format!("{stem}.json")),
            r#"{"EXIF:DateTimeOriginal": "2023:03:15 10:00:00"}"#,
        )
        .unwrap();
    }

    let config = BatcherConfig {
        image_directory_folder: image_dir.clone(),
        output_directory_folder: output_dir.clone(),
        template_path,
        metadata_db_path: root.path().join("metadata.redb"),
        default_date: "08/2024".to_string(),
        batch_size: 2,
        sub_batch_size: 2,
        max_dimension: 360,
    };

    partition::run(&config).unwrap();

    // Year 2023 holds [a, b, c, d] -> two batches; year 2024 holds [e].
    assert_eq!(
        names_in(&output_dir),
        ["2023_batch_1", "2023_batch_2", "2024_batch_1"]
    );

    let batch_1 = output_dir.join("2023_batch_1");
    assert_eq!(
        names_in(&batch_1),
        ["a.jpg", "b.jpg", "diversity_photos_batch_1.csv", "sub_batch_1"]
    );
    assert_eq!(names_in(&batch_1.join("sub_batch_1")), ["a.jpg", "b.jpg"]);

    // Resized copies are downscaled to the bounding box.
    let (width, height) = image::image_dimensions(batch_1.join("a.jpg")).unwrap();
    assert_eq!((width, height), (360, 270));

    let manifest_1 = Manifest::load_template(&batch_1.join("diversity_photos_batch_1.csv")).unwrap();
    assert_eq!(manifest_1.cell(1, 1), Some("Diversity Photo Manifest"));
    assert_eq!(manifest_1.cell(11, 1), Some("1"));
    assert_eq!(manifest_1.cell(11, 2), Some("a.jpg"));
    assert_eq!(manifest_1.cell(11, 3), Some("a.jpg"));
    assert_eq!(manifest_1.cell(11, 4), Some("03/2023"));
    assert_eq!(manifest_1.cell(11, 5), Some("a.jpg"));
    assert_eq!(manifest_1.cell(11, 6), Some(""));
    assert_eq!(manifest_1.cell(12, 2), Some("b.jpg"));

    // Batch 2 contains c (ok) and d (undecodable): d gets no resized copy,
    // no manifest row, and is absent from the sub-batch.
    let batch_2 = output_dir.join("2023_batch_2");
    assert_eq!(
        names_in(&batch_2),
        ["c.jpg", "diversity_photos_batch_2.csv", "sub_batch_1"]
    );
    assert_eq!(names_in(&batch_2.join("sub_batch_1")), ["c.jpg"]);

    let manifest_2 = Manifest::load_template(&batch_2.join("diversity_photos_batch_2.csv")).unwrap();
    assert_eq!(manifest_2.cell(11, 2), Some("c.jpg"));
    assert_eq!(manifest_2.cell(12, 1), None);

    // e has no metadata document: it lands in the default-date year and its
    // manifest row carries the default bucket.
    let batch_e = output_dir.join("2024_batch_1");
    let manifest_e = Manifest::load_template(&batch_e.join("diversity_photos_batch_1.csv")).unwrap();
    assert_eq!(manifest_e.cell(11, 2), Some("e.jpg"));
    assert_eq!(manifest_e.cell(11, 4), Some("08/2024"));
    assert_eq!(names_in(&batch_e.join("sub_batch_1")), ["e.jpg"]);
}

#[test]
fn sub_batches_window_the_batch_in_order() {
    let root = tempfile::tempdir().unwrap();
    let image_dir = root.path().join("images");
    let output_dir = root.path().join("output");
    let template_path = root.path().join("template.csv");
    fs::create_dir_all(&image_dir).unwrap();
    write_template(&template_path);

    for index in 0..5 {
        write_image(&image_dir.join(format!("img_{index}.jpg")));
    }

    let config = BatcherConfig {
        image_directory_folder: image_dir,
        output_directory_folder: output_dir.clone(),
        template_path,
        metadata_db_path: root.path().join("metadata.redb"),
        default_date: "08/2024".to_string(),
        batch_size: 10,
        sub_batch_size: 2,
        max_dimension: 360,
    };

    partition::run(&config).unwrap();

    let batch_dir = output_dir.join("2024_batch_1");
    assert_eq!(
        names_in(&batch_dir.join("sub_batch_1")),
        ["img_0.jpg", "img_1.jpg"]
    );
    assert_eq!(
        names_in(&batch_dir.join("sub_batch_2")),
        ["img_2.jpg", "img_3.jpg"]
    );
    assert_eq!(names_in(&batch_dir.join("sub_batch_3")), ["img_4.jpg"]);
}

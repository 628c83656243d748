use super::*;

fn touch(dir: &Path, name: &str) {
    std::fs::write(dir.join(name), b"x").unwrap();
}

#[test]
fn scan_filters_and_sorts() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    touch(dir, "crop_02.jpg");
    touch(dir, "crop_01.png");
    touch(dir, "crop_03.jpeg");
    touch(dir, "SKU_THUMBNAIL.png");
    touch(dir, "Stock_photo.jpg");
    touch(dir, "notes.txt");
    std::fs::create_dir(dir.join("nested")).unwrap();

    let found = scan_product_images(dir).unwrap();
    let names: Vec<_> = found
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["crop_01.png", "crop_02.jpg", "crop_03.jpeg"]);
}

#[test]
fn scan_exclusion_is_case_insensitive() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    touch(dir, "a_thumbnail_b.png");
    touch(dir, "A_THUMBNAIL_B.png");
    touch(dir, "my_STOCK_shot.jpeg");
    touch(dir, "keep.png");

    let found = scan_product_images(dir).unwrap();
    assert_eq!(found.len(), 1);
    assert!(found[0].ends_with("keep.png"));
}

#[test]
fn scan_extension_is_case_insensitive() {
    let tmp = tempfile::tempdir().unwrap();
    let dir = tmp.path();
    touch(dir, "upper.PNG");
    touch(dir, "mixed.Jpg");

    let found = scan_product_images(dir).unwrap();
    assert_eq!(found.len(), 2);
}

#[test]
fn scan_product_dirs_sorted() {
    let tmp = tempfile::tempdir().unwrap();
    std::fs::create_dir(tmp.path().join("sku-b")).unwrap();
    std::fs::create_dir(tmp.path().join("sku-a")).unwrap();
    std::fs::write(tmp.path().join("loose.png"), b"x").unwrap();

    let dirs = scan_product_dirs(tmp.path()).unwrap();
    let names: Vec<_> = dirs
        .iter()
        .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
        .collect();
    assert_eq!(names, ["sku-a", "sku-b"]);
}

#[test]
fn scan_missing_directory_errors() {
    let tmp = tempfile::tempdir().unwrap();
    assert!(scan_product_images(&tmp.path().join("absent")).is_err());
}

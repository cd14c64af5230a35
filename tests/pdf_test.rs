//! Integration tests for PDF output.

use dumpdoc::{
    build_document, layout, render_pdf, render_pdf_with_fonts, Agent, BranchReport, ChildSection,
    Error, FontSet, GrandchildSection, GreatGrandchildSection, LayoutConfig, Operation, PdfRenderer,
    Section, SectionTree, Sorting,
};

fn fixture(name: &str) -> std::path::PathBuf {
    std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures").join(name)
}

fn config() -> LayoutConfig {
    LayoutConfig::default().without_logo()
}

fn tree() -> SectionTree {
    let grandchild = (0..40).fold(GrandchildSection::new("Dana"), |g, i| {
        g.with_great_grandchild(GreatGrandchildSection::new(format!("Category {}", i)).with_content("1"))
    });
    SectionTree::new().with_section(
        Section::new("Branch 042").with_child(ChildSection::new("Tellers").with_grandchild(grandchild)),
    )
}

#[test]
fn test_pdf_page_count_matches_layout() {
    let config = config();
    let fonts = FontSet::courier();
    let doc = layout(&tree(), &config, &fonts).unwrap();

    let bytes = PdfRenderer::new(&config, &fonts).render(&doc).unwrap();
    let pdf = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(pdf.get_pages().len() as u32, doc.page_count());
}

#[test]
fn test_render_to_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("report.pdf");

    let config = config();
    let fonts = FontSet::courier();
    let doc = layout(&tree(), &config, &fonts).unwrap();

    let mut file = std::fs::File::create(&path).unwrap();
    PdfRenderer::new(&config, &fonts)
        .render_to_writer(&doc, &mut file)
        .unwrap();
    drop(file);

    let pdf = lopdf::Document::load(&path).unwrap();
    assert!(pdf.get_pages().len() >= 3);
}

#[test]
fn test_page_text_is_extractable() {
    let bytes = render_pdf_with_fonts(&tree(), &config(), &FontSet::courier()).unwrap();
    let pdf = lopdf::Document::load_mem(&bytes).unwrap();

    let text = pdf.extract_text(&[2]).unwrap();
    assert!(text.contains("Tellers"));
}

#[test]
fn test_logo_is_embedded() {
    let dir = tempfile::tempdir().unwrap();
    let logo = dir.path().join("logo.jpg");
    let pixels = image::RgbImage::from_pixel(10, 20, image::Rgb([0, 90, 160]));
    image::DynamicImage::ImageRgb8(pixels).save(&logo).unwrap();

    let config = LayoutConfig::default().with_logo(&logo);
    let fonts = FontSet::courier();
    let doc = layout(&tree(), &config, &fonts).unwrap();
    let result = PdfRenderer::new(&config, &fonts).render_with_stats(&doc).unwrap();
    assert_eq!(result.stats.image_count, 1);
}

#[test]
fn test_transparent_png_logo_is_embedded_with_mask() {
    let dir = tempfile::tempdir().unwrap();
    let logo = dir.path().join("logo.png");
    let mut pixels = image::RgbaImage::from_pixel(8, 8, image::Rgba([0, 90, 160, 255]));
    pixels.put_pixel(0, 0, image::Rgba([0, 0, 0, 0]));
    image::DynamicImage::ImageRgba8(pixels).save(&logo).unwrap();

    let config = LayoutConfig::default().with_logo(&logo);
    let fonts = FontSet::courier();
    let bytes = render_pdf_with_fonts(&tree(), &config, &fonts).unwrap();

    let pdf = lopdf::Document::load_mem(&bytes).unwrap();
    let masked = pdf.objects.values().filter_map(|o| o.as_stream().ok()).any(|s| {
        s.dict.get(b"Subtype").and_then(|v| v.as_name()).ok() == Some(&b"Image"[..])
            && s.dict.has(b"SMask")
    });
    assert!(masked);
}

#[test]
fn test_missing_logo_is_skipped() {
    let config = LayoutConfig::default().with_logo("/nonexistent/logo.png");
    let fonts = FontSet::courier();
    let doc = layout(&tree(), &config, &fonts).unwrap();
    let result = PdfRenderer::new(&config, &fonts).render_with_stats(&doc).unwrap();
    assert_eq!(result.stats.image_count, 0);
    assert!(!result.is_empty());
}

#[test]
fn test_missing_font_files_fail_first() {
    let config = config().with_fonts("/nonexistent/regular.ttf", "/nonexistent/bold.ttf");
    let result = render_pdf(&tree(), &config);
    assert!(matches!(result, Err(Error::MissingResource(ref p)) if p.ends_with("regular.ttf")));
}

#[test]
fn test_report_pipeline() {
    let branch = BranchReport::new(
        "042",
        vec![
            Agent::new("4471", "Dana", "Teller").with_operations(vec![
                Operation::new("Deposits", 8),
                Operation::new("Loans", 14),
            ]),
            Agent::new("5520", "Eli", "Manager").with_operations(vec![Operation::new("Deposits", 1)]),
        ],
    )
    .sorted(Sorting::Operations);

    let tree = build_document(Some("Activity"), &[branch]);
    let config = config();
    let fonts = FontSet::courier();
    let doc = layout(&tree, &config, &fonts).unwrap();
    assert_eq!(doc.page_count(), 2);

    let result = PdfRenderer::new(&config, &fonts).render_with_stats(&doc).unwrap();
    assert_eq!(result.stats.section_count, 7);
    assert_eq!(result.metadata.title, "Activity");
}

#[test]
fn test_truetype_fonts_embed_hebrew_and_latin() {
    let tree = SectionTree::new().with_section(
        Section::new("סניף 042").with_child(
            ChildSection::new("Tellers").with_grandchild(
                GrandchildSection::new("דנה לוי (4471)")
                    .with_great_grandchild(GreatGrandchildSection::new("הפקדות").with_content("12")),
            ),
        ),
    );
    let config = config().with_fonts(fixture("DejaVuSans.ttf"), fixture("DejaVuSans-Bold.ttf"));

    let fonts = FontSet::load(&config.font).unwrap();
    let doc = layout(&tree, &config, &fonts).unwrap();
    let result = PdfRenderer::new(&config, &fonts).render_with_stats(&doc).unwrap();
    assert_eq!(result.stats.embedded_font_count, 2);

    let pdf = lopdf::Document::load_mem(&result.bytes).unwrap();
    let text = pdf.extract_text(&[2]).unwrap();
    assert!(text.contains("Tellers"));
    assert!(text.contains("(4471) יול הנד"));
    assert!(text.contains("12"));

    let type0 = pdf
        .objects
        .values()
        .filter_map(|o| o.as_dict().ok())
        .filter(|d| d.get(b"Subtype").and_then(|v| v.as_name()).ok() == Some(&b"Type0"[..]))
        .count();
    assert_eq!(type0, 2);
}

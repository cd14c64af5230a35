//! Integration tests for section layout.

use dumpdoc::{
    layout, ChildSection, Error, FontSet, GrandchildSection, GreatGrandchildSection, LayoutConfig,
    Section, SectionTree,
};

fn config() -> LayoutConfig {
    LayoutConfig::default().without_logo()
}

fn tree_with_leaves(count: usize) -> SectionTree {
    let grandchild = (0..count).fold(GrandchildSection::new("Dana Levi (4471)"), |g, i| {
        g.with_great_grandchild(
            GreatGrandchildSection::new(format!("Category {}", i)).with_content(format!("{}", i * 3)),
        )
    });
    SectionTree::new().with_section(
        Section::new("Branch 042").with_child(ChildSection::new("Tellers").with_grandchild(grandchild)),
    )
}

#[test]
fn test_thirty_leaves_span_pages() {
    let config = config();
    let doc = layout(&tree_with_leaves(30), &config, &FontSet::courier()).unwrap();

    // cover page plus at least two content pages
    assert!(doc.page_count() >= 3);
    assert_eq!(doc.section_count(), 32);
}

#[test]
fn test_pages_are_filled_before_breaking() {
    let config = config();
    let limit = config.usable_bottom();
    let gap = config.dimensions.feature_margin;
    let doc = layout(&tree_with_leaves(60), &config, &FontSet::courier()).unwrap();

    let content_pages: Vec<_> = doc.pages.iter().filter(|p| !p.is_empty()).collect();
    assert!(content_pages.len() >= 2);

    for pair in content_pages.windows(2) {
        let last = pair[0].elements.last().unwrap();
        let next = &pair[1].elements[0];
        // the first box of the next page would not have fit here
        assert!(last.frame.bottom() + gap + next.frame.height > limit);
    }
}

#[test]
fn test_every_box_is_whole_and_inside_the_content_area() {
    let config = config();
    let doc = layout(&tree_with_leaves(45), &config, &FontSet::courier()).unwrap();

    for page in &doc.pages {
        for placed in &page.elements {
            assert!(placed.frame.y >= config.content_top());
            assert!(placed.frame.bottom() <= config.usable_bottom());
        }
    }

    // each box is placed exactly once, in input order
    let titles = doc.section_titles();
    let leaves: Vec<&String> = titles.iter().filter(|t| t.starts_with("Category")).collect();
    assert_eq!(leaves.len(), 45);
    for (i, title) in leaves.iter().enumerate() {
        assert_eq!(**title, format!("Category {}", i));
    }
}

#[test]
fn test_sections_start_new_pages() {
    let tree = SectionTree::new()
        .with_title("Activity")
        .with_section(Section::new("042").with_child(ChildSection::new("Tellers")))
        .with_section(Section::new("043").with_child(ChildSection::new("Managers")));

    let doc = layout(&tree, &config(), &FontSet::courier()).unwrap();
    let titles: Vec<&str> = doc.pages.iter().map(|p| p.title.as_str()).collect();
    assert_eq!(titles, vec!["Activity", "042", "043"]);
    assert_eq!(doc.pages[2].elements[0].title(), "Managers");
}

#[test]
fn test_oversized_box_fails_before_placement() {
    let content = (0..400).map(|i| format!("line {}", i)).collect::<Vec<_>>().join("\n");
    let tree = SectionTree::new().with_section(
        Section::new("042").with_child(
            ChildSection::new("Tellers").with_grandchild(
                GrandchildSection::new("Dana")
                    .with_great_grandchild(GreatGrandchildSection::new("Notes").with_content(content)),
            ),
        ),
    );

    let result = layout(&tree, &config(), &FontSet::courier());
    match result {
        Err(Error::OversizedSection {
            title,
            height,
            available,
        }) => {
            assert_eq!(title, "Notes");
            assert!(height > available);
        }
        other => panic!("expected an oversized section error, got {:?}", other.map(|d| d.page_count())),
    }
}

#[test]
fn test_smaller_page_breaks_sooner() {
    let tall = layout(&tree_with_leaves(30), &config(), &FontSet::courier()).unwrap();
    let short = layout(
        &tree_with_leaves(30),
        &config().with_page_size(2100.0, 1500.0),
        &FontSet::courier(),
    )
    .unwrap();
    assert!(short.page_count() > tall.page_count());
}

#[test]
fn test_invalid_config_is_rejected() {
    let config = config().with_page_size(2100.0, 300.0);
    let result = layout(&tree_with_leaves(1), &config, &FontSet::courier());
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn test_tree_json_field_names() {
    let json = r#"{
        "sections": [{
            "title": "042",
            "childSections": [{
                "title": "Tellers",
                "grandChildSections": [{
                    "title": "Dana",
                    "greatGrandChildSection": [{ "title": "Loans", "content": "14" }]
                }]
            }]
        }]
    }"#;
    let tree: SectionTree = serde_json::from_str(json).unwrap();
    let doc = layout(&tree, &config().without_cover(), &FontSet::courier()).unwrap();
    assert_eq!(doc.section_titles(), vec!["Tellers", "Dana", "Loans"]);
}

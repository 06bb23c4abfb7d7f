use std::collections::HashSet;

use harvest_core::{
    display_title, image_extension, sanitize_filename, OutputNames, FALLBACK_EXTENSION, UNTITLED,
};
use pretty_assertions::assert_eq;

#[test]
fn sanitizer_replaces_forbidden_characters() {
    assert_eq!(sanitize_filename("Report: Q1/Q2?"), "Report_ Q1_Q2_");
    assert_eq!(sanitize_filename(r#"a\b*c"d<e>f|g"#), "a_b_c_d_e_f_g");
    assert_eq!(sanitize_filename("  padded  "), "padded");
}

#[test]
fn title_falls_back_in_order() {
    assert_eq!(display_title(Some("Primary"), Some("Fallback")), "Primary");
    assert_eq!(display_title(None, Some("  Fallback \n")), "Fallback");
    assert_eq!(display_title(Some("   "), Some("Fallback")), "Fallback");
    assert_eq!(display_title(None, None), UNTITLED);
    assert_eq!(display_title(Some(""), Some("")), UNTITLED);
}

#[test]
fn snapshot_and_asset_names_follow_the_output_scheme() {
    let names = OutputNames::new(3, "Report: Q1/Q2?");
    assert_eq!(names.snapshot(), "conversation-3-Report_ Q1_Q2_.html");
    assert_eq!(
        names.asset(2, ".png"),
        "conversation-3-Report_ Q1_Q2_-image-2.png"
    );
}

#[test]
fn identical_titles_at_different_indices_never_collide() {
    let mut seen = HashSet::new();
    for reverse_index in 1..=50 {
        let names = OutputNames::new(reverse_index, "Same title");
        assert!(seen.insert(names.snapshot()));
        for asset_index in 1..=3 {
            assert!(seen.insert(names.asset(asset_index, ".jpg")));
        }
    }
}

#[test]
fn extension_is_taken_from_a_short_suffix() {
    assert_eq!(image_extension("https://cdn.example.com/a/photo.png"), ".png");
    assert_eq!(image_extension("https://cdn.example.com/a/photo.webp"), ".webp");
}

#[test]
fn extension_falls_back_when_suffix_is_implausible() {
    assert_eq!(
        image_extension("https://cdn.example.com/a/photo.jpeg?w=800"),
        FALLBACK_EXTENSION
    );
    assert_eq!(
        image_extension("https://files.example.com/file-abc123"),
        FALLBACK_EXTENSION
    );
    assert_eq!(image_extension("blob"), FALLBACK_EXTENSION);
    assert_eq!(image_extension("https://x.io/a."), FALLBACK_EXTENSION);
}

use std::sync::Arc;

use verona_core::{Location, SourceFile};

use super::*;

fn loc(file: &Arc<SourceFile>, offset: u32, len: u32) -> Location {
    Location::new(file.clone(), offset, len)
}

#[test]
fn severity_display() {
    insta::assert_snapshot!(format!("{}", Severity::Error), @"error");
    insta::assert_snapshot!(format!("{}", Severity::Warning), @"warning");
}

#[test]
fn error_builder() {
    let file = SourceFile::new("a.verona", "hello world!");
    let mut diagnostics = Diagnostics::new();
    diagnostics.error("test error", loc(&file, 0, 5)).emit();

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.has_errors());
    assert!(!diagnostics.has_warnings());
}

#[test]
fn warning_builder() {
    let file = SourceFile::new("a.verona", "hello world!");
    let mut diagnostics = Diagnostics::new();
    diagnostics.warning("test warning", loc(&file, 0, 5)).emit();

    assert_eq!(diagnostics.len(), 1);
    assert!(!diagnostics.has_errors());
    assert!(diagnostics.has_warnings());
}

#[test]
fn builder_with_related_renders_both_spans() {
    let file = SourceFile::new("a.verona", "hello world!");
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .error("primary", loc(&file, 0, 5))
        .related_to("related info", loc(&file, 6, 4))
        .emit();

    let result = diagnostics.printer().render();
    assert!(result.contains("primary"));
    assert!(result.contains("related info"));
    assert!(result.contains("hello world!"));
}

#[test]
fn builder_with_fix_renders_patch() {
    let file = SourceFile::new("a.verona", "hello world");
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .error("fixable", loc(&file, 0, 5))
        .fix("apply this fix", "fixed")
        .emit();

    let result = diagnostics.printer().render();
    assert!(result.contains("fixable"));
    assert!(result.contains("apply this fix"));
    assert!(result.contains("fixed world"));
}

#[test]
fn printer_colored_emits_ansi() {
    let file = SourceFile::new("a.verona", "hello");
    let mut diagnostics = Diagnostics::new();
    diagnostics.error("test", loc(&file, 0, 5)).emit();

    let result = diagnostics.printer().colored(true).render();
    assert!(result.contains("test"));
    assert!(result.contains('\x1b'));
}

#[test]
fn printer_empty_diagnostics() {
    let diagnostics = Diagnostics::new();
    assert!(diagnostics.printer().render().is_empty());
}

#[test]
fn printer_includes_file_path() {
    let file = SourceFile::new("test.verona", "hello world");
    let mut diagnostics = Diagnostics::new();
    diagnostics.error("test error", loc(&file, 0, 5)).emit();

    let result = diagnostics.printer().render();
    assert!(result.contains("test.verona"));
}

#[test]
fn printer_zero_width_span() {
    let file = SourceFile::new("a.verona", "hello");
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .error("zero width error", loc(&file, 0, 0))
        .emit();

    let result = diagnostics.printer().render();
    assert!(result.contains("zero width error"));
}

#[test]
fn printer_multiple_diagnostics_each_rendered() {
    let file = SourceFile::new("a.verona", "hello world!");
    let mut diagnostics = Diagnostics::new();
    diagnostics.error("first error", loc(&file, 0, 5)).emit();
    diagnostics.error("second error", loc(&file, 6, 4)).emit();

    let result = diagnostics.printer().render();
    assert!(result.contains("first error"));
    assert!(result.contains("second error"));
}

#[test]
fn diagnostics_collection_methods() {
    let file = SourceFile::new("a.verona", "xy");
    let mut diagnostics = Diagnostics::new();
    diagnostics.error("error", loc(&file, 0, 1)).emit();
    diagnostics.warning("warning", loc(&file, 1, 1)).emit();

    assert!(!diagnostics.is_empty());
    assert_eq!(diagnostics.len(), 2);
    assert!(diagnostics.has_errors());
    assert!(diagnostics.has_warnings());
    assert_eq!(diagnostics.error_count(), 1);
    assert_eq!(diagnostics.warning_count(), 1);
}

#[test]
fn extend_merges_two_collections() {
    let file = SourceFile::new("a.verona", "xy");
    let mut a = Diagnostics::new();
    a.error("a", loc(&file, 0, 1)).emit();
    let mut b = Diagnostics::new();
    b.error("b", loc(&file, 1, 1)).emit();

    a.extend(b);
    assert_eq!(a.len(), 2);
}

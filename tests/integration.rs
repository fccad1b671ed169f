use chrono::{DateTime, Local, NaiveDate};
use pretty_assertions::assert_eq;
use sitematter::core::split_items;
use sitematter::ops::{apply_field_request, sync_timestamps};
use sitematter::*;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn write(dir: &Path, name: &str, content: &str) {
    fs::write(dir.join(name), content).unwrap();
}

fn read(dir: &Path, name: &str) -> String {
    fs::read_to_string(dir.join(name)).unwrap()
}

fn run_request(dir: &Path, selection: &Selection, request: &FieldRequest) -> BatchSummary {
    let mut selected = Collection::load(dir).unwrap().select(selection).unwrap();
    let mut sink = Vec::new();
    apply_field_request(&mut selected.documents, request, false, &mut sink).unwrap()
}

fn add_tags(items: &str) -> FieldRequest {
    FieldRequest::new(
        Field::tags(),
        FieldOperation::Edit {
            add: split_items(items),
            remove: BTreeSet::new(),
        },
    )
    .unwrap()
}

#[test]
fn test_round_trip_each_format() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "y.md", "---\ntitle: Yaml\nweight: 3\ndraft: false\ntags:\n- b\n- a\n---\nYaml body\n");
    write(root, "t.md", "+++\ntitle = \"Toml\"\nweight = 3\ndraft = false\ntags = [\"b\", \"a\"]\n+++\nToml body\n");
    write(root, "j.md", "{\n  \"title\": \"Json\",\n  \"weight\": 3,\n  \"draft\": false,\n  \"tags\": [\"b\", \"a\"]\n}\nJson body\n");

    for (name, format) in [
        ("y.md", MetadataFormat::Yaml),
        ("t.md", MetadataFormat::Toml),
        ("j.md", MetadataFormat::Json),
    ] {
        let mut doc = Document::read(root.join(name)).unwrap();
        let before = doc.metadata().clone();
        let body = doc.body().to_string();
        doc.save().unwrap();

        let reread = Document::read(root.join(name)).unwrap();
        assert_eq!(reread.format(), Some(format), "{name}");
        assert_eq!(reread.metadata(), &before, "{name}");
        assert_eq!(reread.body(), body, "{name}");
        assert_eq!(reread.get_list("tags"), vec!["b", "a"], "{name}");
    }
}

#[test]
fn test_add_tag_scenario() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "post.md", "---\ntitle: Post\ntags: [python]\n---\nBody\n");

    let first = run_request(root, &Selection::all(), &add_tags("tutorial"));
    assert_eq!(first.modified, 1);
    assert_eq!(
        Document::read(root.join("post.md")).unwrap().get_list("tags"),
        vec!["python", "tutorial"]
    );

    let second = run_request(root, &Selection::all(), &add_tags("tutorial"));
    assert_eq!(second.modified, 0);
}

#[test]
fn test_add_is_a_set_union() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "post.md", "---\ntags: [rust, cli]\n---\n");

    run_request(root, &Selection::all(), &add_tags("rust, serde,cli"));
    assert_eq!(
        Document::read(root.join("post.md")).unwrap().get_list("tags"),
        vec!["cli", "rust", "serde"]
    );
}

#[test]
fn test_toml_edit_keeps_comments_and_layout() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let original = "+++\n# Post settings\ntitle = \"Hello\"   # shown in lists\ndate = 2023-06-15T14:30:00Z\ntags = [\"python\"]\n\n[params]\nweight = 10 # order\n+++\n\nBody text.\n";
    write(root, "post.md", original);

    // a run that changes nothing leaves the file byte for byte
    let noop = run_request(root, &Selection::all(), &add_tags("python"));
    assert_eq!(noop.modified, 0);
    Document::read(root.join("post.md")).unwrap().save().unwrap();
    assert_eq!(read(root, "post.md"), original);

    let summary = run_request(root, &Selection::all(), &add_tags("tutorial"));
    assert_eq!(summary.modified, 1);

    let updated = read(root, "post.md");
    assert!(updated.starts_with(
        "+++\n# Post settings\ntitle = \"Hello\"   # shown in lists\ndate = 2023-06-15T14:30:00Z\n"
    ));
    assert!(updated.contains("[params]\nweight = 10 # order\n"));
    assert!(updated.ends_with("+++\n\nBody text.\n"));
    assert_eq!(
        Document::read(root.join("post.md")).unwrap().get_list("tags"),
        vec!["python", "tutorial"]
    );
}

#[test]
fn test_toml_non_finite_floats_survive_tag_edit() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "post.md", "+++\ntitle = \"T\"\nratio = nan\nlimit = inf\ntags = [\"a\"]\n+++\nBody\n");

    let summary = run_request(root, &Selection::all(), &add_tags("b"));
    assert_eq!(summary.modified, 1);

    let updated = read(root, "post.md");
    assert!(updated.contains("ratio = nan\n"), "{updated}");
    assert!(updated.contains("limit = inf\n"), "{updated}");
    assert_eq!(
        Document::read(root.join("post.md")).unwrap().get_list("tags"),
        vec!["a", "b"]
    );
}

#[test]
fn test_move_tags_to_categories() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(
        root,
        "post.md",
        "---\ntitle: Post\ntags: [python, tutorial]\ncategories: [Tech]\n---\nBody\n",
    );

    let request = FieldRequest::new(
        Field::categories(),
        FieldOperation::Move {
            source: "tags".to_string(),
        },
    )
    .unwrap();
    let summary = run_request(root, &Selection::all(), &request);
    assert_eq!(summary.modified, 1);

    let doc = Document::read(root.join("post.md")).unwrap();
    assert!(!doc.metadata().contains("tags"));
    assert_eq!(doc.get_list("categories"), vec!["Tech", "python", "tutorial"]);
    assert_eq!(
        read(root, "post.md"),
        "---\ntitle: Post\ncategories:\n- Tech\n- python\n- tutorial\n---\nBody\n"
    );
}

#[test]
fn test_copy_between_kinds_is_rejected_up_front() {
    let err = FieldRequest::new(
        Field::label("author"),
        FieldOperation::Copy {
            source: "categories".to_string(),
        },
    )
    .unwrap_err();
    assert!(err
        .to_string()
        .starts_with("Cannot copy/move between different field types"));
}

#[test]
fn test_datetime_sync_scenario() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "post.md", "---\ntitle: Post\ndate: 2023-06-15 14:30:00\n---\n");

    let old = NaiveDate::from_ymd_opt(2020, 1, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
        .and_local_timezone(Local)
        .earliest()
        .unwrap();
    fs::File::options()
        .write(true)
        .open(root.join("post.md"))
        .unwrap()
        .set_modified(old.into())
        .unwrap();

    let docs = Collection::load(root).unwrap().documents().to_vec();
    let mut sink = Vec::new();
    let first = sync_timestamps(&docs, false, &mut sink).unwrap();
    assert_eq!(first.modified, 1);

    let mtime: DateTime<Local> = fs::metadata(root.join("post.md"))
        .unwrap()
        .modified()
        .unwrap()
        .into();
    assert_eq!(
        mtime.naive_local(),
        NaiveDate::from_ymd_opt(2023, 6, 15)
            .unwrap()
            .and_hms_opt(14, 30, 0)
            .unwrap()
    );

    let second = sync_timestamps(&docs, false, &mut sink).unwrap();
    assert_eq!((second.modified, second.skipped, second.errors), (0, 0, 0));
}

#[test]
fn test_selection_by_path_and_title() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    write(root, "docker.md", "---\ntitle: Docker Basics\n---\n");
    write(root, "rust.md", "---\ntitle: Rust Basics\n---\n");
    write(root, "bare.md", "No front matter here.\n");

    let by_title = Collection::load(root)
        .unwrap()
        .select(&Selection {
            title: Some("DOCKER".to_string()),
            ..Selection::default()
        })
        .unwrap();
    assert_eq!(by_title.documents.len(), 1);
    assert_eq!(by_title.documents[0].title(), "Docker Basics");

    let by_path = Collection::load(root)
        .unwrap()
        .select(&Selection::paths([root.join("rust.md"), root.join("bare.md")]))
        .unwrap();
    assert_eq!(by_path.documents.len(), 1);
    assert_eq!(by_path.unmatched, vec![root.join("bare.md")]);
}

#[test]
fn test_corrupt_file_is_never_overwritten() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    let broken = "+++\ntitle = \"unterminated\n+++\nBody\n";
    write(root, "broken.md", broken);
    write(root, "fine.md", "---\ntags: [a]\n---\n");

    let summary = run_request(root, &Selection::all(), &add_tags("b"));
    assert_eq!(summary.selected, 2);
    assert_eq!(summary.modified, 1);
    assert_eq!(summary.skipped, 1);
    assert_eq!(read(root, "broken.md"), broken);
}

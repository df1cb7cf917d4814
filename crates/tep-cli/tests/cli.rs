use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tep_test_utils::{TempCollection, TepText, INDEX_TEMPLATE};

fn teps(collection: &TempCollection) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("teps");
    cmd.env_remove("RUST_LOG")
        .arg("--teps-folder")
        .arg(collection.path());
    cmd
}

#[test]
fn validate_passes_on_valid_folder() {
    let collection = TempCollection::new().with_tep(1, "one").with_tep(2, "two");
    teps(&collection).arg("validate").assert().success();
}

#[test]
fn validate_reports_mismatch_and_fails() {
    let collection = TempCollection::new();
    collection.add(
        "0042-foo.md",
        &TepText::new(42, "X").declaring("TEP-0043").render(),
    );

    teps(&collection)
        .arg("validate")
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("TEP-0042")
                .and(predicate::str::contains("TEP-0043"))
                .and(predicate::str::contains("0042-foo.md")),
        );
}

#[test]
fn invalid_folder_fails() {
    let mut cmd = cargo_bin_cmd!("teps");
    cmd.args(["--teps-folder", "/no/such/teps/folder", "table"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid TEP folder"));
}

#[test]
fn table_renders_index_and_is_idempotent() {
    let collection = TempCollection::new().with_tep(10, "ten").with_tep(2, "two");
    collection.add("README.md.tmpl", INDEX_TEMPLATE);

    teps(&collection)
        .arg("table")
        .assert()
        .success()
        .stdout(predicate::str::contains("README.md"));
    let first = collection.read("README.md");
    assert!(first.find("TEP-0002").unwrap() < first.find("TEP-0010").unwrap());
    assert!(first.contains("[TEP-0010](0010-ten.md)"));

    teps(&collection).arg("table").assert().success();
    assert_eq!(collection.read("README.md"), first);
}

#[test]
fn new_writes_next_document() {
    let collection = TempCollection::new().with_tep(3, "three");
    collection.add("README.md.tmpl", INDEX_TEMPLATE);

    teps(&collection)
        .args(["new", "--offline", "--update-table", "-t", "Better logs", "-a", "alice", "-a", "bob"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0004-Better-logs.md"));

    let text = collection.read("0004-Better-logs.md");
    assert!(text.contains("# TEP-0004: Better logs"));
    assert!(text.contains("status: proposed"));
    assert!(collection.read("README.md").contains("0004-Better-logs.md"));

    teps(&collection).arg("validate").assert().success();
}

#[test]
fn offline_is_logged() {
    let collection = TempCollection::new();
    teps(&collection)
        .args(["new", "--offline", "-t", "Quiet", "-a", "alice"])
        .assert()
        .success()
        .stderr(predicate::str::contains("offline"));
}

#[test]
fn renumber_keeps_original() {
    let collection = TempCollection::new().with_tep(20, "twenty");
    collection.add("0005-foo.md", &TepText::new(5, "Foo").render());

    teps(&collection)
        .args(["renumber", "--offline", "0005-foo.md"])
        .assert()
        .success()
        .stdout(predicate::str::contains("0021-foo.md").and(predicate::str::contains("TEP-0021")));

    assert_eq!(
        collection.file_names(),
        vec!["0005-foo.md", "0020-twenty.md", "0021-foo.md"]
    );
}

#[test]
fn renumber_refuses_broken_header() {
    let collection = TempCollection::new();
    collection.add(
        "0005-foo.md",
        &TepText::new(5, "Foo").header_line("not a field").render(),
    );

    teps(&collection)
        .args(["renumber", "--offline", "0005-foo.md"])
        .assert()
        .failure();
    assert_eq!(collection.file_names(), vec!["0005-foo.md"]);
}

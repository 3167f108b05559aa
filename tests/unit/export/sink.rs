use super::*;

#[test]
fn directory_sink_writes_file_and_leaves_no_temp() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested");
    let mut sink = DirectorySink::new(&out);
    sink.save("pose-1.png", b"png bytes").unwrap();

    assert_eq!(fs::read(out.join("pose-1.png")).unwrap(), b"png bytes");
    assert_eq!(sink.written(), &[out.join("pose-1.png")]);
    let names: Vec<_> = fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().into_string().unwrap())
        .collect();
    assert_eq!(names, vec!["pose-1.png"]);
}

#[test]
fn directory_sink_overwrites_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = DirectorySink::new(dir.path());
    sink.save("a.png", b"old").unwrap();
    sink.save("a.png", b"new").unwrap();
    assert_eq!(fs::read(dir.path().join("a.png")).unwrap(), b"new");
}

#[test]
fn unwritable_directory_is_an_export_error() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("file");
    fs::write(&blocker, b"x").unwrap();

    let mut sink = DirectorySink::new(blocker.join("sub"));
    let err = sink.save("pose-1.png", b"data").unwrap_err();
    assert!(matches!(err, PosecardError::Export(_)));
    assert!(sink.written().is_empty());
}

#[test]
fn unsafe_filenames_are_refused() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = DirectorySink::new(dir.path());
    for name in ["", "../x.png", "a/b.png", ".hidden"] {
        assert!(matches!(
            sink.save(name, b"x"),
            Err(PosecardError::Export(_))
        ));
    }
}

#[test]
fn in_memory_sink_keeps_order() {
    let mut sink = InMemorySink::new();
    sink.save("b.png", b"2").unwrap();
    sink.save("a.png", b"1").unwrap();
    let names: Vec<_> = sink.files().iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["b.png", "a.png"]);
}

//! Streaming integration tests: snapshot growth across fragment boundaries,
//! progressive type refinement, row-limit termination, and source failures.

use std::io;

use csv_typed::{
    CellType, DateFormats, NumberFormat, ParseOptions, ParseResult, Parser, Row, RowMode, Value,
};

fn parser(options: ParseOptions) -> Parser {
    Parser::new(options).expect("options compile")
}

fn fragments(parts: &[&str]) -> Vec<io::Result<String>> {
    parts.iter().map(|p| Ok(p.to_string())).collect()
}

fn collect_snapshots(parser: &Parser, parts: &[&str]) -> Vec<ParseResult> {
    parser
        .stream(fragments(parts))
        .collect::<csv_typed::Result<Vec<_>>>()
        .expect("no source errors")
}

fn array_row(row: &Row) -> &[Value] {
    match row {
        Row::Array(values) => values,
        other => panic!("Expected array row, got {other:?}"),
    }
}

#[test]
fn snapshots_grow_monotonically() {
    let parser = parser(ParseOptions::default());
    let snapshots = collect_snapshots(
        &parser,
        &["name,v\n", "a,1\nb,", "2\n", "c,3"],
    );
    assert!(snapshots.len() >= 2);
    for pair in snapshots.windows(2) {
        let (earlier, later) = (&pair[0], &pair[1]);
        assert!(earlier.rows.len() <= later.rows.len());
        assert_eq!(earlier.rows[..], later.rows[..earlier.rows.len()]);
        for (a, b) in earlier.columns.iter().zip(&later.columns) {
            assert!(
                a.datatype == CellType::String || a.datatype == b.datatype,
                "non-string column type flipped between snapshots"
            );
        }
    }
    assert_eq!(snapshots.last().unwrap().rows.len(), 3);
}

#[test]
fn fragmented_input_matches_batch_parse() {
    let text = "name,age,city\nJohn,30,NYC\nJane,25,LA\nBob,41,SF";
    let parser = parser(ParseOptions::default());
    let batch = parser.parse_str(text);

    // Split at awkward boundaries: mid-field, mid-line, mid-CRLF-free text.
    let parts = ["name,a", "ge,city\nJo", "hn,30,NYC\nJane,25,LA\nBob", ",41,SF"];
    let streamed = parser
        .stream(fragments(&parts))
        .into_result()
        .expect("no source errors");
    assert_eq!(streamed, batch);
}

#[test]
fn type_refinement_appears_in_later_snapshots() {
    let parser = parser(ParseOptions::default());
    let snapshots = collect_snapshots(&parser, &["v\nhello\n", "42\n", "2.5\n"]);
    assert_eq!(snapshots[0].columns[0].datatype, CellType::String);
    assert_eq!(snapshots[1].columns[0].datatype, CellType::Number);
    assert_eq!(
        snapshots[1].columns[0].number_format,
        Some(NumberFormat::Integer)
    );
    // The integer guess widens to decimal once fractional evidence arrives.
    assert_eq!(
        snapshots[2].columns[0].number_format,
        Some(NumberFormat::Decimal)
    );
    assert_eq!(snapshots[2].columns[0].datatype, CellType::Number);
}

#[test]
fn row_limit_emits_exactly_the_cap_then_stops() {
    let parser = parser(ParseOptions {
        max_rows: Some(2),
        ..ParseOptions::default()
    });
    // Four data rows eventually arrive; only two may be parsed.
    let snapshots = collect_snapshots(
        &parser,
        &["name\n", "r1\n", "r2\n", "r3\n", "r4\n"],
    );
    let last = snapshots.last().expect("snapshots emitted");
    assert_eq!(last.rows.len(), 2);
    assert_eq!(
        array_row(&last.rows[1])[0],
        Value::String("r2".into())
    );
}

#[test]
fn header_split_across_fragments_establishes_once() {
    let parser = parser(ParseOptions::default());
    let snapshots = collect_snapshots(&parser, &["na", "me,a", "ge\n", "John,30\n"]);
    let first = &snapshots[0];
    assert_eq!(first.header, vec!["name", "age"]);
    assert_eq!(snapshots.last().unwrap().rows.len(), 1);
}

#[test]
fn comments_and_blank_lines_are_filtered_mid_stream() {
    let parser = parser(ParseOptions::default());
    let snapshots = collect_snapshots(
        &parser,
        &["# preamble\n\nname,age\n", "# interlude\nJohn,30\n\n"],
    );
    let last = snapshots.last().unwrap();
    assert_eq!(last.header, vec!["name", "age"]);
    assert_eq!(last.rows.len(), 1);
}

#[test]
fn object_mode_streams_named_rows() {
    let parser = parser(ParseOptions {
        row_mode: RowMode::Object,
        ..ParseOptions::default()
    });
    let snapshots = collect_snapshots(&parser, &["name,age\nJohn", ",30\n"]);
    let Row::Object(row) = &snapshots.last().unwrap().rows[0] else {
        panic!("Expected object row");
    };
    assert_eq!(row["name"], Value::String("John".into()));
    assert_eq!(row["age"], Value::Integer(30));
}

#[test]
fn date_detection_works_across_fragments() {
    let parser = parser(ParseOptions {
        date_formats: Some(DateFormats::default()),
        ..ParseOptions::default()
    });
    let snapshots = collect_snapshots(
        &parser,
        &["when\n2024-05", "-06\n14:30:00\n2024-05-06T14:30:00\n"],
    );
    let last = snapshots.last().unwrap();
    // First non-empty evidence wins the type; dates stay raw text.
    assert_eq!(last.columns[0].datatype, CellType::Date);
    assert_eq!(
        array_row(&last.rows[0])[0],
        Value::String("2024-05-06".into())
    );
}

#[test]
fn source_error_ends_the_stream_without_further_snapshots() {
    let parser = parser(ParseOptions::default());
    let source: Vec<io::Result<String>> = vec![
        Ok("name\nJohn\n".into()),
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "upstream died")),
        Ok("Jane\n".into()),
    ];
    let mut stream = parser.stream(source);
    assert_eq!(stream.next().unwrap().unwrap().rows.len(), 1);
    assert!(matches!(
        stream.next().unwrap().unwrap_err(),
        csv_typed::Error::Io(_)
    ));
    assert!(stream.next().is_none());
}

#[test]
fn dropping_the_snapshot_iterator_cancels_the_session() {
    let parser = parser(ParseOptions::default());
    let pulled = std::cell::Cell::new(0usize);
    let source = (0..100).map(|i| {
        pulled.set(pulled.get() + 1);
        Ok(format!("row{i}\n"))
    });
    let mut stream = parser.stream(source);
    let _first = stream.next();
    drop(stream);
    // Consumer stopped early; the producer stopped pulling fragments.
    assert!(pulled.get() <= 2);
}

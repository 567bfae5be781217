use super::*;
use crate::config::DataConfig;
use crate::error::{DashError, DateTimeError};
use crate::types::RawTable;
use chrono::{NaiveDate, NaiveTime};
use pretty_assertions::assert_eq;
use std::io::Cursor;

const DATE_FIELD: &str = "some_date_field";
const QTY_FIELD: &str = "some_qty_field";

fn line(stamp: &str, qty: &str) -> String {
    format!(r#"{{"{DATE_FIELD}":"{stamp}","{QTY_FIELD}":"{qty}","_id":"x"}}"#)
}

fn raw(lines: &[String]) -> RawTable {
    read_records(Cursor::new(lines.join("\n"))).unwrap()
}

fn normalizer() -> Normalizer {
    Normalizer::new(DATE_FIELD, QTY_FIELD)
}

fn three_record_dataset(order: DayOrder) -> Dataset {
    let table = normalizer()
        .normalize(raw(&[
            line("Mon, 02 Jan 2012, 01:00:00 GMT", "7"),
            line("Sun, 01 Jan 2012, 05:30:00 GMT", "12"),
            line("Sun, 01 Jan 2012, 03:15:00 GMT", "30"),
        ]))
        .unwrap();
    Dataset::from_table("memory", table, order)
}

#[test]
fn test_read_json_and_literal_lines() {
    let input = format!(
        "{}\n{{'{DATE_FIELD}': 'Sun, 01 Jan 2012, 10:00:00 GMT', '{QTY_FIELD}': '5'}}\n",
        line("Sun, 01 Jan 2012, 09:00:00 GMT", "3")
    );
    let table = read_records(Cursor::new(input)).unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.records[0].0, 1);
    assert_eq!(table.records[1].0, 2);
    assert_eq!(table.records[1].1[QTY_FIELD], "5");
}

#[test]
fn test_malformed_line_fails_whole_load() {
    let input = format!(
        "{}\nnot a record\n{}",
        line("Sun, 01 Jan 2012, 09:00:00 GMT", "3"),
        line("Sun, 01 Jan 2012, 10:00:00 GMT", "4")
    );
    let err = read_records(Cursor::new(input)).unwrap_err();
    assert!(matches!(err, DashError::MalformedRecord { line: 2, .. }));
}

#[test]
fn test_non_mapping_line_rejected() {
    let err = read_records(Cursor::new("[1, 2, 3]\n")).unwrap_err();
    match err {
        DashError::MalformedRecord { line, reason } => {
            assert_eq!(line, 1);
            assert!(reason.contains("list"), "{reason}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_blank_line_is_malformed() {
    let input = format!(
        "{}\n\n{}\n",
        line("Sun, 01 Jan 2012, 09:00:00 GMT", "3"),
        line("Sun, 01 Jan 2012, 10:00:00 GMT", "4")
    );
    let err = read_records(Cursor::new(input)).unwrap_err();
    assert!(matches!(err, DashError::MalformedRecord { line: 2, .. }));

    let err = read_records(Cursor::new("   \n")).unwrap_err();
    assert!(matches!(err, DashError::MalformedRecord { line: 1, .. }));
}

#[test]
fn test_final_newline_is_not_a_record() {
    let input = format!("{}\n", line("Sun, 01 Jan 2012, 09:00:00 GMT", "3"));
    assert_eq!(read_records(Cursor::new(input)).unwrap().len(), 1);
}

#[test]
fn test_columns_union_in_first_seen_order() {
    let table = read_records(Cursor::new("{\"a\": 1, \"b\": 2}\n{'c': 3, 'a': 4}\n")).unwrap();
    assert_eq!(table.columns(), vec!["a", "b", "c"]);
}

#[test]
fn test_load_missing_file() {
    let err = load_records(std::path::Path::new("/no/such/records.db")).unwrap_err();
    assert!(matches!(err, DashError::Io { .. }));
}

#[test]
fn test_parse_datetime_round_trip() {
    let raw = "Sun, 01 Jan 2012, 13:45:09 GMT";
    let parsed = parse_datetime(raw).unwrap();

    assert_eq!(parsed.timezone, "GMT");
    assert_eq!(parsed.datetime.date(), NaiveDate::from_ymd_opt(2012, 1, 1).unwrap());
    assert_eq!(parsed.datetime.time(), NaiveTime::from_hms_opt(13, 45, 9).unwrap());
    assert_eq!(
        format!("{} {}", parsed.datetime.format(normalize::DATETIME_FORMAT), parsed.timezone),
        raw
    );
}

#[test]
fn test_parse_datetime_rejects_bad_input() {
    assert!(matches!(
        parse_datetime("Sun,01-Jan-2012"),
        Err(DateTimeError::MissingTimezone)
    ));
    assert!(matches!(
        parse_datetime("Sun, 01 Jan 2012, 13:45:09 +0100"),
        Err(DateTimeError::InvalidTimezone(_))
    ));
    // 2012-01-01 was a Sunday
    assert!(matches!(
        parse_datetime("Mon, 01 Jan 2012, 13:45:09 GMT"),
        Err(DateTimeError::Format(_))
    ));
    assert!(matches!(
        parse_datetime("Sun, 01 Jan 2012, 25:00:00 GMT"),
        Err(DateTimeError::Format(_))
    ));
}

#[test]
fn test_normalize_derived_columns() {
    let table = normalizer()
        .normalize(raw(&[line("Sun, 01 Jan 2012, 13:45:09 GMT", " 42 ")]))
        .unwrap();
    let row = &table.rows[0];

    assert_eq!(row.line, 1);
    assert_eq!(row.date, NaiveDate::from_ymd_opt(2012, 1, 1).unwrap());
    assert_eq!(row.date_str, "2012-Jan-01");
    assert_eq!(row.date_key(), "2012-01-01");
    assert_eq!(row.time_str, "13:45:09");
    assert_eq!(row.time_point.to_string(), "1900-01-01 13:45:09");
    assert_eq!(row.seconds_of_day(), 13 * 3600 + 45 * 60 + 9);
    assert_eq!(row.quantity, 42);
    assert_eq!(row.record["_id"], "x");
}

#[test]
fn test_sort_by_time_is_stable() {
    let table = normalizer()
        .normalize(raw(&[
            line("Mon, 02 Jan 2012, 12:00:00 GMT", "1"),
            line("Sun, 01 Jan 2012, 08:00:00 GMT", "2"),
            line("Sun, 01 Jan 2012, 12:00:00 GMT", "3"),
            line("Tue, 03 Jan 2012, 12:00:00 GMT", "4"),
        ]))
        .unwrap();

    let order: Vec<i64> = table.rows.iter().map(|r| r.quantity).collect();
    assert_eq!(order, vec![2, 1, 3, 4]);
}

#[test]
fn test_quantity_coercion() {
    use serde_json::json;
    use normalize::coerce_quantity;

    assert_eq!(coerce_quantity(&json!("17")), Some(17));
    assert_eq!(coerce_quantity(&json!("-3")), Some(-3));
    assert_eq!(coerce_quantity(&json!(" 8\n")), Some(8));
    assert_eq!(coerce_quantity(&json!(12)), Some(12));
    assert_eq!(coerce_quantity(&json!("4x")), None);
    assert_eq!(coerce_quantity(&json!("1.5")), None);
    assert_eq!(coerce_quantity(&json!("")), None);
    assert_eq!(coerce_quantity(&json!(1.5)), None);
    assert_eq!(coerce_quantity(&json!(true)), None);
    assert_eq!(coerce_quantity(&json!(null)), None);
}

#[test]
fn test_non_numeric_quantity_is_an_error() {
    let err = normalizer()
        .normalize(raw(&[
            line("Sun, 01 Jan 2012, 09:00:00 GMT", "3"),
            line("Sun, 01 Jan 2012, 10:00:00 GMT", "lots"),
        ]))
        .unwrap_err();
    match err {
        DashError::InvalidQuantity { line, value } => {
            assert_eq!(line, 2);
            assert_eq!(value, "\"lots\"");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_missing_quantity_field() {
    let input = format!("{{\"{DATE_FIELD}\": \"Sun, 01 Jan 2012, 09:00:00 GMT\"}}");
    let err = normalizer()
        .normalize(read_records(Cursor::new(input)).unwrap())
        .unwrap_err();
    assert!(matches!(err, DashError::MissingField { line: 1, ref field } if field == QTY_FIELD));
}

#[test]
fn test_invalid_datetime_fails_by_default() {
    let err = normalizer()
        .normalize(raw(&[
            line("Sun, 01 Jan 2012, 09:00:00 GMT", "3"),
            line("yesterday", "4"),
        ]))
        .unwrap_err();
    assert!(matches!(err, DashError::InvalidDateTime { line: 2, .. }));
}

#[test]
fn test_invalid_datetime_skipped_under_skip_policy() {
    let table = normalizer()
        .with_policy(InvalidDateTimePolicy::Skip)
        .normalize(raw(&[
            line("Sun, 01 Jan 2012, 09:00:00 GMT", "3"),
            line("yesterday", "4"),
            format!(r#"{{"{QTY_FIELD}":"5"}}"#),
            line("Sun, 01 Jan 2012, 08:00:00 GMT", "6"),
        ]))
        .unwrap();

    assert_eq!(table.len(), 2);
    assert_eq!(table.dropped, vec![2, 3]);
    assert_eq!(table.rows[0].quantity, 6);
}

#[test]
fn test_skip_policy_still_rejects_bad_quantity() {
    let err = normalizer()
        .with_policy(InvalidDateTimePolicy::Skip)
        .normalize(raw(&[line("Sun, 01 Jan 2012, 09:00:00 GMT", "n/a")]))
        .unwrap_err();
    assert!(matches!(err, DashError::InvalidQuantity { line: 1, .. }));
}

#[test]
fn test_three_record_scenario() {
    let dataset = three_record_dataset(DayOrder::FirstSeen);
    let partition = dataset.partition();

    assert_eq!(partition.len(), 2);
    let mut sizes: Vec<usize> = dataset.days().map(|day| day.len()).collect();
    sizes.sort_unstable();
    assert_eq!(sizes, vec![1, 2]);

    assert_eq!(dataset.select("2012-01-01").map(|d| d.len()), Some(2));
    assert_eq!(dataset.select("2012-01-02").map(|d| d.len()), Some(1));
    assert_eq!(dataset.day_keys().count(), 2);
}

#[test]
fn test_partition_covers_table_exactly_once() {
    let dataset = three_record_dataset(DayOrder::FirstSeen);
    let table = dataset.table();

    assert_eq!(dataset.partition().total_rows(), table.len());

    let mut seen: Vec<usize> = dataset
        .partition()
        .groups()
        .iter()
        .flat_map(|g| g.rows.iter().copied())
        .collect();
    seen.sort_unstable();
    assert_eq!(seen, (0..table.len()).collect::<Vec<_>>());

    for day in dataset.days() {
        let expected = table.rows.iter().filter(|r| r.date == day.date()).count();
        assert_eq!(day.len(), expected);
        assert!(day.rows().all(|r| r.date_key() == day.key()));
    }
}

#[test]
fn test_rows_within_day_are_time_ordered() {
    let dataset = three_record_dataset(DayOrder::FirstSeen);
    let day = dataset.select("2012-01-01").unwrap();
    let times: Vec<&str> = day.rows().map(|r| r.time_str.as_str()).collect();
    assert_eq!(times, vec!["03:15:00", "05:30:00"]);
    assert_eq!(day.quantity_bounds(), Some((12, 30)));
}

#[test]
fn test_day_order() {
    // the table is sorted by time, so 2012-01-02 (01:00) is seen first
    let first_seen = three_record_dataset(DayOrder::FirstSeen);
    let keys: Vec<&str> = first_seen.day_keys().collect();
    assert_eq!(keys, vec!["2012-01-02", "2012-01-01"]);

    let ascending = three_record_dataset(DayOrder::Ascending);
    let keys: Vec<&str> = ascending.day_keys().collect();
    assert_eq!(keys, vec!["2012-01-01", "2012-01-02"]);
    assert_eq!(ascending.select("2012-01-02").map(|d| d.len()), Some(1));
}

#[test]
fn test_select_unknown_day() {
    let dataset = three_record_dataset(DayOrder::FirstSeen);
    assert!(dataset.select("2012-01-05").is_none());
    assert!(dataset.select("2012-Jan-01").is_none());
}

#[test]
fn test_default_day() {
    let dataset = three_record_dataset(DayOrder::Ascending);
    assert_eq!(dataset.default_day(Some("2012-01-02")), Some("2012-01-02"));
    assert_eq!(dataset.default_day(Some("1999-12-31")), Some("2012-01-01"));
    assert_eq!(dataset.default_day(None), Some("2012-01-01"));

    // first-seen order starts with 2012-01-02, the default is still the earliest date
    let first_seen = three_record_dataset(DayOrder::FirstSeen);
    assert_eq!(first_seen.day_keys().next(), Some("2012-01-02"));
    assert_eq!(first_seen.default_day(None), Some("2012-01-01"));
    assert_eq!(first_seen.default_day(Some("2030-01-01")), Some("2012-01-01"));

    let empty = Dataset::from_table("memory", Default::default(), DayOrder::FirstSeen);
    assert_eq!(empty.default_day(None), None);
    assert_eq!(empty.days().count(), 0);
}

#[test]
fn test_sample_generation_is_reproducible() {
    let spec = SampleSpec {
        seed: Some(42),
        days: 2,
        per_day: 5,
        ..SampleSpec::default()
    };
    let fields = DataConfig::default();

    let first = sample::generate_records(&spec, &fields);
    let second = sample::generate_records(&spec, &fields);
    assert_eq!(first, second);
    assert_eq!(first.len(), 10);

    let raw = RawTable {
        records: first.into_iter().enumerate().map(|(i, r)| (i + 1, r)).collect(),
    };
    let table = Normalizer::from_config(&fields).normalize(raw).unwrap();
    let dataset = Dataset::from_table("sample", table, DayOrder::Ascending);

    let keys: Vec<&str> = dataset.day_keys().collect();
    assert_eq!(keys, vec!["2012-01-01", "2012-01-02"]);
    assert!(dataset.days().all(|day| day.len() == 5));
    assert!(dataset
        .table()
        .rows
        .iter()
        .all(|r| (0..1000).contains(&r.quantity)));
}

#[test]
fn test_sample_generation_stops_at_last_date() {
    // days * per_day overflows u32; only the one representable day is produced
    let spec = SampleSpec {
        start: NaiveDate::MAX,
        days: u32::MAX,
        per_day: 2,
        seed: Some(1),
    };
    let records = sample::generate_records(&spec, &DataConfig::default());
    assert_eq!(records.len(), 2);
}

use bigdecimal::BigDecimal;
use registry_normalizer::config::AppConfig;
use registry_normalizer::files::{self, output};
use registry_normalizer::models::{
    CellValue, Flag, HouseholdType, OwnershipType, RawRow, ResidenceType,
};
use registry_normalizer::service::{FileProcessor, RegistryPipeline};
use std::fs;
use std::path::Path;
use std::time::{Duration, SystemTime};

const PROPERTY: &str = "서울특별시 강남구 역삼동 45";

fn registry_row(cells: &[(usize, &str)]) -> RawRow {
    let mut values = vec![CellValue::Empty; 46];
    for (idx, v) in cells {
        values[*idx] = CellValue::from(*v);
    }
    RawRow::from_values(values)
}

fn owner_row(seq: &str, marker: &str, name: &str, ho: &str, owner_addr: &str) -> RawRow {
    registry_row(&[
        (0, seq),
        (1, marker),
        (5, PROPERTY),
        (8, "101동"),
        (11, ho),
        (23, name),
        (25, owner_addr),
    ])
}

fn processor_for(input: &Path, output: &Path) -> FileProcessor {
    let mut config = AppConfig::default();
    config.paths.input_dir = input.to_path_buf();
    config.paths.output_dir = output.to_path_buf();
    config.workers = Some(2);
    FileProcessor::new(config)
}

#[test]
fn shared_household_collapses_to_one_record() {
    let rows = vec![
        owner_row("1", "-", "홍길동", "1203", "경기도 성남시 분당구 정자동 10"),
        owner_row("", "-", "홍길순", "1203", "경기도 성남시 분당구 정자동 10"),
        owner_row("", "", "홍길영", "1203", "경기도 성남시 분당구 정자동 10"),
        owner_row("2", "", "김철수", "1204", "부산광역시 해운대구 우동 1"),
        owner_row("3", "", "이영희", "1205", "대전광역시 유성구 봉명동 3"),
        registry_row(&[(45, "3년")]),
    ];

    let outcome = RegistryPipeline::default().normalize(rows);
    assert_eq!(outcome.records.len(), 3);
    assert_eq!(outcome.stats.dropped_rows, 1);

    let first = &outcome.records[0];
    assert_eq!(first.owner_name.as_deref(), Some("홍길동"));
    assert_eq!(first.unit_id.as_deref(), Some("101동 1203호"));
    assert_eq!(first.household_type, HouseholdType::Shared);
    assert_eq!(first.ownership_type, OwnershipType::CoOwner);
    assert_eq!(first.co_owner_count, 2);
    assert_eq!(first.sole_owner_count, 1);

    assert!(outcome.records[1..]
        .iter()
        .all(|r| r.household_type == HouseholdType::Sole && r.co_owner_count == 0));
}

#[test]
fn one_resident_co_owner_makes_the_household_resident() {
    let rows = vec![
        owner_row("7", "-", "투자자", "1203", "부산광역시 해운대구 우동 1"),
        owner_row("", "-", "거주자", "1203", "서울특별시 강남구 역삼동 45 101동 1203호"),
    ];

    let outcome = RegistryPipeline::default().normalize(rows);
    assert_eq!(outcome.records.len(), 1);
    assert_eq!(outcome.records[0].owner_name.as_deref(), Some("투자자"));
    assert_eq!(outcome.records[0].residence_type, ResidenceType::Resident);
}

#[test]
fn same_neighborhood_scores_as_resident() {
    let rows = vec![owner_row("1", "", "홍길동", "1203", "서울특별시 강남구 역삼동 99")];

    let outcome = RegistryPipeline::default().normalize(rows);
    assert_eq!(outcome.records[0].residence_type, ResidenceType::Resident);
}

#[test]
fn header_keyed_json_rows_are_normalized() {
    let rows: Vec<RawRow> = serde_json::from_str(
        r#"[
            {"연번": 1, "__EMPTY_1": "-", "동": "102동", "호수": 301, "성명": "박민수"},
            {"연번": null, "__EMPTY_1": "-", "동": "102동", "호수": "301호", "성명": "박민지"},
            {"연번": 2, "__EMPTY_1": null, "동": "102동", "호수": 302, "성명": "최지우"}
        ]"#,
    )
    .unwrap();

    let outcome = RegistryPipeline::default().normalize(rows);
    assert_eq!(outcome.records.len(), 2);
    assert_eq!(outcome.records[0].unit_id.as_deref(), Some("102동 301호"));
    assert_eq!(outcome.records[0].household_type, HouseholdType::Shared);
    assert_eq!(outcome.records[0].residence_type, ResidenceType::NoInformation);
    assert_eq!(outcome.records[1].owner_name.as_deref(), Some("최지우"));
    assert_eq!(outcome.records[1].mortgage_flag, Flag::N);
    assert_eq!(outcome.records[1].seizure_types, "없음");
}

#[test]
fn written_csv_reads_back() {
    let dir = tempfile::tempdir().unwrap();
    let rows = vec![
        registry_row(&[
            (0, "1"),
            (5, PROPERTY),
            (8, "101동"),
            (11, "1203"),
            (19, "84.97"),
            (23, "홍길동"),
            (24, "850315-1234567"),
            (31, "2020년 5월 15일 매매"),
            (37, "근저당권설정, 가압류"),
            (38, "50000000\n30000000"),
        ]),
        owner_row("2", "", "김철수", "1204", "부산광역시 해운대구 우동 1"),
    ];
    let outcome = RegistryPipeline::default().normalize(rows);

    let path = dir.path().join("out.csv");
    files::write_records(&path, &outcome.records).unwrap();
    assert!(!dir.path().join("out.csv.tmp").exists());

    let parsed = files::read_records(&path).unwrap();
    assert_eq!(parsed, outcome.records);
    assert_eq!(parsed[0].mortgage_amount, Some(BigDecimal::from(80000000)));
    assert_eq!(parsed[0].seizure_types, "압류, 가압류");
    assert_eq!(parsed[0].registration_cause_date.as_deref(), Some("2020-05-15"));

    let raw = fs::read_to_string(&path).unwrap();
    assert!(raw.contains(",80000000,"));
}

#[test]
fn latest_output_picks_newest_matching_file() {
    let dir = tempfile::tempdir().unwrap();
    let older = dir.path().join("명부_전처리_2024-01-01T00-00-00-000Z.csv");
    let newer = dir.path().join("명부_전처리_2024-02-01T00-00-00-000Z.csv");
    fs::write(&older, "x").unwrap();
    fs::write(&newer, "x").unwrap();
    fs::write(dir.path().join("다른명부_전처리_2024-03-01T00-00-00-000Z.csv"), "x").unwrap();

    let past = SystemTime::now() - Duration::from_secs(3600);
    fs::File::options()
        .write(true)
        .open(&older)
        .unwrap()
        .set_modified(past)
        .unwrap();

    let (found, _) = output::latest_output("명부", dir.path()).unwrap().unwrap();
    assert_eq!(found, newer);
    assert!(output::latest_output("없음", dir.path()).unwrap().is_none());
}

#[test]
fn batch_skips_fresh_inputs_unless_forced() {
    let input_dir = tempfile::tempdir().unwrap();
    let output_dir = tempfile::tempdir().unwrap();

    let input = input_dir.path().join("명부.xlsx");
    fs::write(&input, b"not a workbook").unwrap();
    fs::write(input_dir.path().join("readme.txt"), "ignored").unwrap();
    fs::File::options()
        .write(true)
        .open(&input)
        .unwrap()
        .set_modified(SystemTime::now() - Duration::from_secs(3600))
        .unwrap();
    fs::write(
        output_dir.path().join("명부_전처리_2024-01-01T00-00-00-000Z.csv"),
        "x",
    )
    .unwrap();

    let processor = processor_for(input_dir.path(), output_dir.path());
    assert_eq!(processor.list_inputs().unwrap(), vec![input.clone()]);

    let report = processor.process_dir(false).unwrap();
    assert_eq!(report.skipped.len(), 1);
    assert!(report.processed.is_empty() && report.failed.is_empty());

    // 强制重跑时损坏的文件被记录为失败, 不中断批处理
    let report = processor.process_dir(true).unwrap();
    assert!(report.skipped.is_empty());
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].input, input);
}

#[test]
fn missing_input_dir_is_an_empty_batch() {
    let output_dir = tempfile::tempdir().unwrap();
    let processor = processor_for(&output_dir.path().join("nope"), output_dir.path());

    let report = processor.process_dir(false).unwrap();
    assert!(report.processed.is_empty() && report.skipped.is_empty() && report.failed.is_empty());
}

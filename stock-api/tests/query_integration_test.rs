use chrono::NaiveDate;
use std::sync::Arc;
use stock::model::company::column_name;
use stock::{CompanyId, Dataset, FieldKind, Operation, QueryError, QueryService};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Builds a CSV with every company/field column. Each company's prices are
/// offset by its position so records from different companies never collide.
fn full_csv(dates: &[&str]) -> String {
    let mut header = vec!["Date".to_string()];
    for company in CompanyId::ALL {
        for field in FieldKind::ALL {
            header.push(column_name(company, field));
        }
    }

    let mut out = header.join(",");
    out.push('\n');
    for (i, date) in dates.iter().enumerate() {
        let mut cells = vec![date.to_string()];
        for (c, _) in CompanyId::ALL.iter().enumerate() {
            let base = 100.0 * (c + 1) as f64 + i as f64;
            cells.push(format!("{}", base));
            cells.push(format!("{}", base + 2.0));
            cells.push(format!("{}", base - 1.0));
            cells.push(format!("{}", base + 1.0));
            cells.push(format!("{}", 1_000 * (c + 1) + i));
        }
        out.push_str(&cells.join(","));
        out.push('\n');
    }
    out
}

fn service_from(csv: &str) -> QueryService {
    let dataset = Dataset::from_reader(csv.as_bytes()).expect("valid csv");
    QueryService::new(Arc::new(dataset))
}

fn july_service() -> QueryService {
    service_from(&full_csv(&[
        "2023-07-05",
        "2023-07-06",
        "2023-07-07",
        "2023-07-10",
        "2023-07-11",
    ]))
}

fn empty_service() -> QueryService {
    QueryService::new(Arc::new(Dataset::empty()))
}

#[test]
fn test_get_stock_returns_stored_values() {
    let service = july_service();

    for (c, company) in CompanyId::ALL.iter().enumerate() {
        let ticker = company.as_str().to_lowercase();
        let record = service
            .get_stock(Some(&ticker), Some("2023-07-10"))
            .unwrap();

        let base = 100.0 * (c + 1) as f64 + 3.0;
        assert_eq!(record.company, *company);
        assert_eq!(record.date, ymd(2023, 7, 10));
        assert_eq!(record.open, base);
        assert_eq!(record.high, base + 2.0);
        assert_eq!(record.low, base - 1.0);
        assert_eq!(record.close, base + 1.0);
        assert_eq!(record.volume, (1_000 * (c + 1) + 3) as i64);
        assert!(record.change_percent.is_some());
    }
}

#[test]
fn test_get_stock_change_percent_scenario() {
    let csv = "\
Date,AAPL_Open,AAPL_High,AAPL_Low,AAPL_Close,AAPL_Volume
2023-07-10,190.0,192.5,189.1,191.9,48000000
";
    let record = service_from(csv)
        .get_stock(Some("aapl"), Some("2023-07-10"))
        .unwrap();

    assert_eq!(record.company, CompanyId::Aapl);
    assert_eq!(record.change_percent, Some(1.0));
    assert_eq!(record.volume, 48_000_000);
}

#[test]
fn test_get_stock_change_percent_tie_rounds_to_even() {
    let csv = "\
Date,AAPL_Open,AAPL_High,AAPL_Low,AAPL_Close,AAPL_Volume
2023-07-10,800.0,802.0,798.0,801.0,10
2023-07-11,800.0,802.0,798.0,799.0,10
";
    let service = service_from(csv);

    let up = service.get_stock(Some("AAPL"), Some("2023-07-10")).unwrap();
    assert_eq!(up.change_percent, Some(0.12));
    let down = service.get_stock(Some("AAPL"), Some("2023-07-11")).unwrap();
    assert_eq!(down.change_percent, Some(-0.12));
}

#[test]
fn test_get_stock_accepts_unpadded_date() {
    let record = july_service()
        .get_stock(Some("AAPL"), Some("2023-7-5"))
        .unwrap();
    assert_eq!(record.date, ymd(2023, 7, 5));
}

#[test]
fn test_get_stock_zero_open_omits_change_percent() {
    let csv = "\
Date,AAPL_Open,AAPL_High,AAPL_Low,AAPL_Close,AAPL_Volume
2023-07-10,0,1.0,0,0.5,10
";
    let record = service_from(csv)
        .get_stock(Some("AAPL"), Some("2023-07-10"))
        .unwrap();

    assert_eq!(record.open, 0.0);
    assert_eq!(record.change_percent, None);
}

#[test]
fn test_get_stock_missing_parameters() {
    let service = july_service();
    let missing = Err(QueryError::MissingParameter(Operation::Stock));

    assert_eq!(service.get_stock(None, Some("2023-07-10")), missing);
    assert_eq!(service.get_stock(Some("AAPL"), None), missing);
    assert_eq!(service.get_stock(Some(""), Some("2023-07-10")), missing);
    assert_eq!(service.get_stock(Some("AAPL"), Some("")), missing);
}

#[test]
fn test_get_stock_invalid_company() {
    let service = july_service();
    for input in ["nflx", "INVALID", "aapl ", "APPL"] {
        let err = service.get_stock(Some(input), Some("2023-07-10")).unwrap_err();
        assert_eq!(err, QueryError::InvalidCompany(input.to_uppercase()));
        assert_eq!(
            err.to_string(),
            "Invalid company. Choose from: AAPL, AMZN, GOOGL, MSFT, TSLA"
        );
    }
}

#[test]
fn test_get_stock_invalid_date_format() {
    let service = july_service();
    for bad in [
        "07/10/2023",
        "2023-13-01",
        "2023-07-10T00:00:00",
        "tomorrow",
        " 2023-07-10",
        "2023- 07-10",
        "+2023-07-10",
    ] {
        assert_eq!(
            service.get_stock(Some("MSFT"), Some(bad)),
            Err(QueryError::InvalidDateFormat(bad.to_string()))
        );
    }
}

#[test]
fn test_company_is_checked_before_date() {
    let service = july_service();
    assert_eq!(
        service.get_stock(Some("nope"), Some("not-a-date")),
        Err(QueryError::InvalidCompany("NOPE".to_string()))
    );
}

#[test]
fn test_validation_happens_before_availability() {
    let service = empty_service();
    assert_eq!(
        service.get_stock(Some("AAPL"), Some("garbage")),
        Err(QueryError::InvalidDateFormat("garbage".to_string()))
    );
    assert_eq!(
        service.get_stock(Some("AAPL"), Some("2023-07-10")),
        Err(QueryError::DatasetUnavailable)
    );
}

#[test]
fn test_get_stock_no_data_for_date() {
    let err = july_service()
        .get_stock(Some("AAPL"), Some("2023-07-08"))
        .unwrap_err();
    assert_eq!(err, QueryError::NoDataForDate(ymd(2023, 7, 8)));
    assert_eq!(err.to_string(), "No data found for 2023-07-08");
}

#[test]
fn test_get_stock_missing_column() {
    let csv = "\
Date,AAPL_Open,AAPL_High,AAPL_Low,AAPL_Close
2023-07-10,190.0,192.5,189.1,191.9
";
    assert_eq!(
        service_from(csv).get_stock(Some("AAPL"), Some("2023-07-10")),
        Err(QueryError::MissingDataColumn {
            company: CompanyId::Aapl,
            column: "AAPL_Volume".to_string(),
        })
    );
}

#[test]
fn test_get_stock_unreadable_cell_is_internal_error() {
    let csv = "\
Date,AAPL_Open,AAPL_High,AAPL_Low,AAPL_Close,AAPL_Volume
2023-07-10,190.0,192.5,189.1,191.9,
";
    let err = service_from(csv)
        .get_stock(Some("AAPL"), Some("2023-07-10"))
        .unwrap_err();
    match err {
        QueryError::InternalError(details) => assert!(details.contains("AAPL_Volume")),
        other => panic!("expected InternalError, got {:?}", other),
    }
}

#[test]
fn test_get_stock_range_is_inclusive_and_ordered() {
    let records = july_service()
        .get_stock_range(Some("googl"), Some("2023-07-06"), Some("2023-07-10"))
        .unwrap();

    let dates: Vec<_> = records.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![ymd(2023, 7, 6), ymd(2023, 7, 7), ymd(2023, 7, 10)]);
    assert!(records.iter().all(|r| r.company == CompanyId::Googl));
    assert!(records.iter().all(|r| r.change_percent.is_none()));
}

#[test]
fn test_get_stock_range_keeps_source_order() {
    let service = service_from(&full_csv(&["2023-07-11", "2023-07-05", "2023-07-10"]));
    let records = service
        .get_stock_range(Some("TSLA"), Some("2023-07-01"), Some("2023-07-31"))
        .unwrap();

    let dates: Vec<_> = records.iter().map(|r| r.date).collect();
    assert_eq!(dates, vec![ymd(2023, 7, 11), ymd(2023, 7, 5), ymd(2023, 7, 10)]);
}

#[test]
fn test_get_stock_range_inverted_is_no_data() {
    assert_eq!(
        july_service().get_stock_range(Some("AAPL"), Some("2023-07-11"), Some("2023-07-05")),
        Err(QueryError::NoDataForRange {
            start: ymd(2023, 7, 11),
            end: ymd(2023, 7, 5),
        })
    );
}

#[test]
fn test_get_stock_range_validation() {
    let service = july_service();
    assert_eq!(
        service.get_stock_range(Some("AAPL"), Some("2023-07-05"), None),
        Err(QueryError::MissingParameter(Operation::StockRange))
    );
    assert_eq!(
        service.get_stock_range(Some("IBM"), Some("2023-07-05"), Some("2023-07-06")),
        Err(QueryError::InvalidCompany("IBM".to_string()))
    );
    assert_eq!(
        service.get_stock_range(Some("AAPL"), Some("2023-07-05"), Some("2023/07/06")),
        Err(QueryError::InvalidDateFormat("2023/07/06".to_string()))
    );
    assert_eq!(
        empty_service().get_stock_range(Some("AAPL"), Some("2023-07-05"), Some("2023-07-06")),
        Err(QueryError::DatasetUnavailable)
    );
}

#[test]
fn test_get_stock_range_fails_whole_on_missing_column() {
    let csv = "\
Date,AAPL_Open,AAPL_High,AAPL_Low,AAPL_Close,AAPL_Volume,AMZN_Open
2023-07-10,190.0,192.5,189.1,191.9,10,130.0
2023-07-11,191.0,193.5,190.1,192.9,11,131.0
";
    assert_eq!(
        service_from(csv).get_stock_range(Some("amzn"), Some("2023-07-01"), Some("2023-07-31")),
        Err(QueryError::MissingDataColumn {
            company: CompanyId::Amzn,
            column: "AMZN_High".to_string(),
        })
    );
}

#[test]
fn test_date_span() {
    let csv = full_csv(&["2023-07-10", "not a date", "2023-07-03", "2023-07-12"]);
    let span = service_from(&csv).date_span().unwrap();

    assert_eq!(span.min_date, ymd(2023, 7, 3));
    assert_eq!(span.max_date, ymd(2023, 7, 12));
    assert_eq!(span.total_days, 4);
    assert_eq!(empty_service().date_span(), Err(QueryError::DatasetUnavailable));
}

#[test]
fn test_companies_independent_of_dataset() {
    assert_eq!(empty_service().companies(), &CompanyId::ALL);
    assert_eq!(july_service().companies().len(), 5);
}

#[test]
fn test_repeated_queries_are_identical() {
    let service = july_service();
    let first = service.get_stock(Some("MSFT"), Some("2023-07-07"));
    let second = service.get_stock(Some("MSFT"), Some("2023-07-07"));
    assert_eq!(first, second);

    let first = service.get_stock_range(Some("MSFT"), Some("2023-07-05"), Some("2023-07-11"));
    let second = service.get_stock_range(Some("MSFT"), Some("2023-07-05"), Some("2023-07-11"));
    assert_eq!(first, second);
}

#[test]
fn test_concurrent_reads_share_one_dataset() {
    let service = Arc::new(july_service());
    let handles: Vec<_> = CompanyId::ALL
        .into_iter()
        .map(|company| {
            let service = service.clone();
            std::thread::spawn(move || {
                service
                    .get_stock_range(Some(company.as_str()), Some("2023-07-01"), Some("2023-07-31"))
                    .map(|records| records.len())
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), Ok(5));
    }
}

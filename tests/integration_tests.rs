use airq_explorer::config::{PipelineConfig, RowErrorPolicy};
use airq_explorer::models::{LocationSelector, Season, SeverityCategory, Variable};
use airq_explorer::processors::{Correlation, Explorer};
use airq_explorer::PipelineError;
use pretty_assertions::assert_eq;
use std::io::Write;
use tempfile::NamedTempFile;

const HEADER: &str = "No,year,month,day,hour,PM2.5,PM10,SO2,NO2,CO,O3,TEMP,PRES,DEWP,RAIN,wd,WSPM,location";

fn write_csv(rows: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    writeln!(file, "{}", HEADER).unwrap();
    for row in rows {
        writeln!(file, "{}", row).unwrap();
    }
    file.flush().unwrap();
    file
}

#[test]
fn test_end_to_end_two_seasons() {
    let file = write_csv(&[
        "1,2014,1,10,0,40,50,3,20,300,60,-2.0,1025.0,-15.0,0.0,N,3.1,Dongsi",
        "2,2014,1,11,0,60,70,3,20,300,60,-4.0,1027.0,-17.0,0.0,N,2.4,Dongsi",
        "3,2014,7,10,0,10,20,3,20,300,60,28.0,1001.0,21.0,0.3,S,1.2,Tiantan",
        "4,2014,7,11,0,30,40,3,20,300,60,26.0,1003.0,20.0,0.0,S,1.5,Tiantan",
    ]);

    let explorer = Explorer::from_path(file.path(), &PipelineConfig::default(), None).unwrap();
    let exploration = explorer.explore(&LocationSelector::AllLocations);

    let means: Vec<(Season, f64)> = exploration
        .seasonal
        .iter()
        .map(|(season, mean)| (season, mean.mean))
        .collect();
    assert_eq!(means, vec![(Season::Winter, 50.0), (Season::Summer, 20.0)]);

    assert_eq!(exploration.severity.count(SeverityCategory::Baik), 3);
    assert_eq!(exploration.severity.count(SeverityCategory::Sedang), 1);

    for a in Variable::ALL {
        for b in Variable::ALL {
            assert_eq!(exploration.correlation.get(a, b), exploration.correlation.get(b, a));
        }
        assert_eq!(exploration.correlation.get(a, a), Correlation::Defined(1.0));
    }

    let pm_temp = exploration
        .correlation
        .require(Variable::Pm25, Variable::Temp)
        .unwrap();
    assert!(pm_temp < 0.0);
}

#[test]
fn test_location_selection_and_missing_location() {
    let file = write_csv(&[
        "1,2014,1,10,0,40,50,3,20,300,60,-2.0,1025.0,-15.0,0.0,N,3.1,Dongsi",
        "2,2014,4,11,0,60,70,3,20,300,60,12.0,1015.0,-1.0,0.0,N,2.4,Dongsi",
        "3,2014,7,10,0,10,20,3,20,300,60,28.0,1001.0,21.0,0.3,S,1.2,Tiantan",
    ]);

    let explorer = Explorer::from_path(file.path(), &PipelineConfig::default(), None).unwrap();
    assert_eq!(explorer.locations(), vec!["Dongsi", "Tiantan"]);

    let dongsi = explorer.explore(&LocationSelector::specific("Dongsi"));
    assert_eq!(dongsi.view.len(), 2);
    assert_eq!(dongsi.seasonal.mean(Season::Spring), Some(60.0));
    assert_eq!(dongsi.seasonal.mean(Season::Summer), None);

    let nowhere = explorer.explore(&LocationSelector::specific("Yanqing"));
    assert!(nowhere.view.is_empty());
    assert!(nowhere.seasonal.is_empty());
    assert!(nowhere.correlation.is_all_undefined());
    assert_eq!(nowhere.severity.total(), 0);

    let scatter = explorer
        .explore(&LocationSelector::AllLocations)
        .scatter(Variable::Dewp);
    assert_eq!(scatter.len(), 3);
}

#[test]
fn test_schema_error_aborts_before_aggregation() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "year,month,day,location,PM2.5,TEMP").unwrap();
    writeln!(file, "2014,1,1,Dongsi,10,1").unwrap();

    match Explorer::from_path(file.path(), &PipelineConfig::default(), None) {
        Err(PipelineError::Schema { missing }) => {
            assert_eq!(missing, vec!["PRES", "DEWP", "RAIN", "WSPM"]);
        }
        Err(e) => panic!("expected Schema error, got {}", e),
        Ok(_) => panic!("expected Schema error"),
    }
}

#[test]
fn test_row_error_policies() {
    let rows = [
        "1,2014,1,10,0,40,50,3,20,300,60,-2.0,1025.0,-15.0,0.0,N,3.1,Dongsi",
        "2,2014,2,30,0,60,70,3,20,300,60,-4.0,1027.0,-17.0,0.0,N,2.4,Dongsi",
        "3,2014,7,10,0,-5,20,3,20,300,60,28.0,1001.0,21.0,0.3,S,1.2,Tiantan",
    ];

    let file = write_csv(&rows);
    let explorer = Explorer::from_path(file.path(), &PipelineConfig::default(), None).unwrap();
    let rejected: Vec<usize> = explorer.dataset().rejections().iter().map(|r| r.row).collect();
    assert_eq!(rejected, vec![2, 3]);
    assert_eq!(explorer.dataset().len(), 1);

    let file = write_csv(&rows);
    let config = PipelineConfig::default().with_row_error_policy(RowErrorPolicy::Abort);
    assert!(matches!(
        Explorer::from_path(file.path(), &config, None),
        Err(PipelineError::Date { row: 2, .. })
    ));
}

#[test]
fn test_out_of_range_calendar_rows_follow_row_policy() {
    let rows = [
        "1,2014,1,10,0,40,50,3,20,300,60,-2.0,1025.0,-15.0,0.0,N,3.1,Dongsi",
        "2,2014,-1,10,0,60,70,3,20,300,60,-4.0,1027.0,-17.0,0.0,N,2.4,Dongsi",
        "3,2014,13,10,0,50,70,3,20,300,60,-4.0,1027.0,-17.0,0.0,N,2.4,Dongsi",
        "4,2014,3,-2,0,50,70,3,20,300,60,5.0,1020.0,-9.0,0.0,N,2.4,Dongsi",
    ];

    let file = write_csv(&rows);
    let explorer = Explorer::from_path(file.path(), &PipelineConfig::default(), None).unwrap();
    assert_eq!(explorer.dataset().len(), 1);

    let rejected: Vec<usize> = explorer.dataset().rejections().iter().map(|r| r.row).collect();
    assert_eq!(rejected, vec![2, 3, 4]);

    let file = write_csv(&rows);
    let config = PipelineConfig::default().with_row_error_policy(RowErrorPolicy::Abort);
    assert!(matches!(
        Explorer::from_path(file.path(), &config, None),
        Err(PipelineError::InvalidMonth { row: 2, month: -1 })
    ));
}

#[test]
fn test_infinite_cells_are_rejected_rows() {
    let file = write_csv(&[
        "1,2014,1,10,0,40,50,3,20,300,60,inf,1025.0,-15.0,0.0,N,3.1,Dongsi",
        "2,2014,1,11,0,60,70,3,20,300,60,2.0,1027.0,-17.0,0.0,N,2.4,Dongsi",
        "3,2014,7,10,0,10,20,3,20,300,60,3.0,1001.0,21.0,0.3,S,1.2,Tiantan",
        "4,2014,7,11,0,inf,40,3,20,300,60,26.0,1003.0,20.0,0.0,S,1.5,Tiantan",
    ]);

    let explorer = Explorer::from_path(file.path(), &PipelineConfig::default(), None).unwrap();
    let rejected: Vec<usize> = explorer.dataset().rejections().iter().map(|r| r.row).collect();
    assert_eq!(rejected, vec![1, 4]);

    let exploration = explorer.explore(&LocationSelector::AllLocations);
    assert_eq!(exploration.seasonal.mean(Season::Summer), Some(10.0));

    let pm_temp = exploration.correlation.get(Variable::Pm25, Variable::Temp);
    assert!(matches!(pm_temp, Correlation::Defined(r) if r.is_finite()));

    let json = serde_json::to_value(&exploration.correlation).unwrap();
    assert!(!json["values"][0][1].is_null());
}

#[test]
fn test_missing_source() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("main_data.csv");

    assert!(matches!(
        Explorer::from_path(&path, &PipelineConfig::default(), None),
        Err(PipelineError::SourceUnavailable { .. })
    ));
}

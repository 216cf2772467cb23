use std::fs::File;
use std::io::Write;

use carstate_config::load_signal_log_csv;
use rstest::rstest;
use tempfile::tempdir;

fn write_csv(body: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("log.csv");
    let mut f = File::create(&path).unwrap();
    f.write_all(body.as_bytes()).unwrap();
    (dir, path)
}

#[rstest]
fn loads_and_groups_frames() {
    let (_dir, path) = write_csv(
        "frame,message,signal,value\n\
         0,EBCMWheelSpdFront,FLWheelSpd,10.0\n\
         0,EBCMBrakePedalPosition,BrakePedalPosition,50\n\
         1,EBCMWheelSpdFront,FLWheelSpd,11.5\n",
    );
    let frames = load_signal_log_csv(&path).unwrap();
    assert_eq!(frames.len(), 2);
    assert_eq!(frames[0].values.len(), 2);
    assert_eq!(frames[0].values[1].signal, "BrakePedalPosition");
    assert!((frames[1].values[0].value - 11.5).abs() < 1e-12);
}

#[rstest]
fn tolerates_whitespace_around_fields() {
    let (_dir, path) = write_csv(
        "frame, message, signal, value\n0, BCMTurnSignals, TurnSignals, 1\n",
    );
    let frames = load_signal_log_csv(&path).unwrap();
    assert_eq!(frames[0].values[0].message, "BCMTurnSignals");
}

#[rstest]
#[case("raw,grams\n1,2\n")]
#[case("frame,signal,message,value\n0,a,b,1\n")]
fn rejects_wrong_headers(#[case] body: &str) {
    let (_dir, path) = write_csv(body);
    let err = load_signal_log_csv(&path).expect_err("should reject headers");
    assert!(
        format!("{err}")
            .to_lowercase()
            .contains("must have headers 'frame,message,signal,value'")
    );
}

#[rstest]
fn rejects_non_numeric_value_with_row_number() {
    let (_dir, path) = write_csv(
        "frame,message,signal,value\n0,PSCMStatus,LKADriverAppldTrq,0.5\n0,PSCMStatus,LKATorqueDeliveredStatus,abc\n",
    );
    let err = load_signal_log_csv(&path).expect_err("non-numeric value");
    assert!(format!("{err}").contains("invalid CSV row 3"));
}

#[rstest]
fn missing_file_reports_path() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.csv");
    let err = load_signal_log_csv(&path).expect_err("missing file");
    assert!(format!("{err}").contains("open signal log CSV"));
}

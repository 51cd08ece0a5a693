//! FILENAME: tests/test_logging.rs
//! Integration test for the unified log file.
//! Logging state is process-global, so everything runs in one test.

use std::thread;

use widget_engine::engine::row;
use widget_engine::logging::{close_log_file, get_log_path, init_log_file};
use widget_engine::widget_config::{WidgetConfig, WidgetKind};
use widget_engine::{log_info, render_widget};

fn sequence_numbers(lines: &[&str]) -> Vec<u64> {
    lines
        .iter()
        .map(|l| l.split('|').next().unwrap().parse().unwrap())
        .collect()
}

#[test]
fn test_log_file_lifecycle() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("logs").join("widgets.log");

    let opened = init_log_file(&path).unwrap();
    assert_eq!(opened, path);
    assert_eq!(get_log_path(), Some(path.clone()));

    let first_seq = log_info!("TEST", "dashboard {} loaded", "sales");

    let mut config = WidgetConfig::new(WidgetKind::BarChart);
    config.properties.assign("x", ["region"]);
    config.properties.assign("y", ["sales"]);
    let rows = vec![row! { "region" => "East", "sales" => 1.0 }];
    assert!(render_widget(&rows, &config).as_chart().is_some());

    let writers: Vec<_> = (0..4)
        .map(|t| {
            thread::spawn(move || {
                for i in 0..50 {
                    log_info!("WORKER", "thread {} line {}", t, i);
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }

    let content = std::fs::read_to_string(&path).unwrap();
    let lines: Vec<&str> = content.lines().collect();

    let first: Vec<&str> = lines[0].splitn(4, '|').collect();
    assert_eq!(first[0], first_seq.to_string());
    assert_eq!(first[1..], ["I", "TEST", "dashboard sales loaded"]);
    assert!(lines.iter().any(|l| l.contains("|D|PIPELINE|ENTER render_widget kind=bar-chart rows=1")));
    assert!(lines.iter().any(|l| l.contains("|D|PIPELINE|EXIT render_widget chart")));
    assert_eq!(lines.iter().filter(|l| l.contains("|I|WORKER|")).count(), 200);

    // Concurrent writers still land in sequence order, without gaps
    let seqs = sequence_numbers(&lines);
    assert!(seqs.windows(2).all(|w| w[1] == w[0] + 1), "out of order: {:?}", seqs);

    close_log_file();
    assert_eq!(get_log_path(), None);

    log_info!("TEST", "after close");
    let after = std::fs::read_to_string(&path).unwrap();
    assert!(!after.contains("after close"));
}

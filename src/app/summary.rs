use std::time::Duration;

use crate::stats::{summarize, throughput_rps_x100};

pub(crate) fn print_separator() {
    println!("============================");
}

pub(crate) fn print_sample_summary(count_label: &str, samples: &[Duration]) {
    let Some(summary) = summarize(samples) else {
        println!("No samples recorded.");
        return;
    };
    println!("{}: {}", count_label, summary.count);
    println!("Total: {}", format_millis(summary.total));
    println!(
        "Min/Max: {} / {}",
        format_millis(summary.min),
        format_millis(summary.max)
    );
    println!("Mean: {}", format_millis(summary.mean));
    println!("Median: {}", format_millis(summary.median));
    println!("Std Dev: {}", format_millis(summary.std_dev));
}

pub(crate) fn print_burst_summary(requests: usize, elapsed: Duration) {
    let rps_x100 = throughput_rps_x100(requests, elapsed);
    println!("Requests: {}", requests);
    println!("Time: {}", format_millis(elapsed));
    println!("Throughput: {}.{:02} req/s", rps_x100 / 100, rps_x100 % 100);
}

fn format_millis(duration: Duration) -> String {
    let micros = duration.as_micros();
    format!("{}.{:03}ms", micros / 1000, micros % 1000)
}

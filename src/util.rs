use std::time::Instant;

pub fn print_hms(start: &Instant) {
    let millis = start.elapsed().as_millis();
    let (hours, rest) = (millis / 3_600_000, millis % 3_600_000);
    let (minutes, rest) = (rest / 60_000, rest % 60_000);
    let (seconds, millis) = (rest / 1000, rest % 1000);
    println!("Loaded in {hours:02}:{minutes:02}:{seconds:02}.{millis:03}");
}

/// Current time as epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

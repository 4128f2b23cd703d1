//! Small helpers shared across the crate.

use chrono::Local;

/// Current local time formatted the way a US-locale time string reads
/// (`3:04:05 PM`).
pub fn local_time_string() -> String {
    Local::now().format("%-I:%M:%S %p").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_time_string_shape() {
        let time = local_time_string();
        let (clock, meridiem) = time.split_once(' ').unwrap();

        assert!(meridiem == "AM" || meridiem == "PM");
        let parts: Vec<&str> = clock.split(':').collect();
        assert_eq!(parts.len(), 3);
        let hour: u32 = parts[0].parse().unwrap();
        assert!((1..=12).contains(&hour));
        assert_eq!(parts[1].len(), 2);
        assert_eq!(parts[2].len(), 2);
    }
}

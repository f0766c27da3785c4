use crate::record::SightingRecord;
use csv::Writer;
use log::info;
use std::fs::File;

/// Save records to CSV file
pub fn save_to_csv(
    records: &[SightingRecord],
    filename: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(filename)?;
    let mut writer = Writer::from_writer(file);

    for record in records {
        writer.serialize(record)?;
    }

    writer.flush()?;
    info!("Saved {} sightings to {}", records.len(), filename);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{SightingType, Weekday};

    #[test]
    fn test_save_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sightings.csv");
        let path = path.to_str().unwrap();

        let record = SightingRecord {
            id: Some("17".to_string()),
            weekday: Some(Weekday::Thursday),
            time: Some("9:30".to_string()),
            location: Some("南区".to_string()),
            sighting_type: SightingType::Attack,
            latitude: 42.95,
            longitude: 141.31,
            ..SightingRecord::default()
        }
        .with_date(2025, Some(7), Some(3));

        save_to_csv(&[record.clone(), record], path).unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("id,year,month,day,date,weekday,time,location"));
        assert!(!lines[0].contains("timestamp"));
        assert_eq!(
            lines[1],
            "17,2025,7,3,2025-07-03,Thursday,9:30,南区,,,Attack,42.95,141.31"
        );
    }
}

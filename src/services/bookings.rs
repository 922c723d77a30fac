use chrono::{DateTime, Utc};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::{error, info, warn};

use crate::models::api::NewBookingRequest;
use crate::models::booking::{Booking, BookingLocation, BookingMetadata};

// CSV columns: id, uid, user_id, title, start_time, location, metadata
const HEADERS: [&str; 7] = [
    "id",
    "uid",
    "user_id",
    "title",
    "start_time",
    "location",
    "metadata",
];

/// Booking record store backing the waiting room endpoints.
///
/// The scheduling platform owns booking creation; this store stands in for
/// its persistence layer with a CSV file. Updates are mutex-guarded
/// read-modify-rewrite of the whole file, which gives the single-record
/// atomicity the presence recorder relies on.
pub struct BookingStore {
    csv_path: String,
    file_mutex: Mutex<()>,
}

impl BookingStore {
    pub fn new(csv_path: &str) -> Self {
        // Create the CSV file if it doesn't exist with proper headers
        if !Path::new(csv_path).exists() {
            info!("Creating new bookings database file at {}", csv_path);

            let file = File::create(csv_path).unwrap_or_else(|e| {
                error!("Failed to create database file: {}", e);
                panic!("Failed to create database file: {}", e)
            });

            let mut writer = WriterBuilder::new().has_headers(true).from_writer(file);

            if let Err(e) = writer.write_record(HEADERS) {
                error!("Failed to write headers: {}", e);
                panic!("Failed to write headers: {}", e);
            }

            if let Err(e) = writer.flush() {
                error!("Failed to flush headers: {}", e);
                panic!("Failed to flush headers: {}", e);
            }
        }

        Self {
            csv_path: csv_path.to_string(),
            file_mutex: Mutex::new(()),
        }
    }

    /// Insert a booking record. Uids are externally shared identifiers and
    /// must be unique; an existing uid is returned as-is without a second
    /// insert so re-seeding is harmless.
    pub fn insert(&self, request: &NewBookingRequest) -> Result<Booking, String> {
        if let Some(existing) = self.find_by_uid(&request.uid)? {
            info!(
                "Booking with uid {} already exists, skipping insertion",
                request.uid
            );
            return Ok(existing);
        }

        let _lock = self
            .file_mutex
            .lock()
            .map_err(|e| format!("Failed to acquire mutex: {}", e))?;

        let next_id = self.read_all_records()?.len() as i64 + 1;

        let location = match &request.location {
            Some(value) => Some(
                serde_json::from_value::<BookingLocation>(value.clone())
                    .map_err(|e| format!("Invalid location value: {}", e))?,
            ),
            None => None,
        };

        let metadata = match &request.metadata {
            Some(value) => serde_json::from_value::<BookingMetadata>(value.clone())
                .map_err(|e| format!("Invalid metadata value: {}", e))?,
            None => BookingMetadata::default(),
        };

        let booking = Booking {
            id: next_id,
            uid: request.uid.clone(),
            user_id: request.user_id,
            title: request.title.clone(),
            start_time: request.start_time,
            location,
            metadata,
        };

        let file = OpenOptions::new()
            .append(true)
            .open(&self.csv_path)
            .map_err(|e| format!("Failed to open database file: {}", e))?;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

        writer
            .write_record(&Self::booking_to_record(&booking)?)
            .map_err(|e| format!("Failed to write record: {}", e))?;

        writer
            .flush()
            .map_err(|e| format!("Failed to flush writer: {}", e))?;

        info!(
            "Stored booking record {} with uid {}",
            booking.id, booking.uid
        );

        Ok(booking)
    }

    /// Find a booking by its externally shared uid
    pub fn find_by_uid(&self, uid: &str) -> Result<Option<Booking>, String> {
        let _lock = self
            .file_mutex
            .lock()
            .map_err(|e| format!("Failed to acquire mutex: {}", e))?;

        // If file doesn't exist, return None early
        if !Path::new(&self.csv_path).exists() {
            return Ok(None);
        }

        let file = File::open(&self.csv_path)
            .map_err(|e| format!("Failed to open database file: {}", e))?;

        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

        for result in reader.records() {
            let record = result.map_err(|e| format!("Failed to read record: {}", e))?;

            if record.get(1) == Some(uid) {
                return Ok(Some(Self::record_to_booking(&record)?));
            }
        }

        Ok(None)
    }

    /// Replace the metadata document of the booking with the given uid.
    ///
    /// The whole file is rewritten under the mutex, so concurrent presence
    /// recordings serialize and last write wins.
    pub fn update_metadata(&self, uid: &str, metadata: &BookingMetadata) -> Result<(), String> {
        let _lock = self
            .file_mutex
            .lock()
            .map_err(|e| format!("Failed to acquire mutex: {}", e))?;

        let file = File::open(&self.csv_path)
            .map_err(|e| format!("Failed to open database file: {}", e))?;

        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);

        let headers = reader
            .headers()
            .map_err(|e| format!("Failed to read headers: {}", e))?
            .clone();

        let mut records: Vec<StringRecord> = Vec::new();
        let mut updated = false;

        for result in reader.records() {
            let record = result.map_err(|e| format!("Failed to read record: {}", e))?;

            if record.get(1) == Some(uid) {
                let metadata_json = serde_json::to_string(metadata)
                    .map_err(|e| format!("Failed to serialize metadata: {}", e))?;

                let mut updated_vec: Vec<String> = record.iter().map(String::from).collect();
                updated_vec[6] = metadata_json;

                records.push(StringRecord::from(updated_vec));
                updated = true;
            } else {
                records.push(record);
            }
        }

        if !updated {
            warn!("No booking found for uid: {}", uid);
            return Err(format!("No booking found for uid: {}", uid));
        }

        // Write all records back (overwrite the file)
        let file = OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.csv_path)
            .map_err(|e| format!("Failed to open database file for writing: {}", e))?;

        let mut writer = WriterBuilder::new().has_headers(false).from_writer(file);

        writer
            .write_record(&headers)
            .map_err(|e| format!("Failed to write headers: {}", e))?;

        for record in records {
            writer
                .write_record(&record)
                .map_err(|e| format!("Failed to write record: {}", e))?;
        }

        writer
            .flush()
            .map_err(|e| format!("Failed to flush writer: {}", e))?;

        info!("Updated metadata for booking uid {}", uid);

        Ok(())
    }

    // Read all raw records; caller must hold the mutex.
    fn read_all_records(&self) -> Result<Vec<StringRecord>, String> {
        let file = File::open(&self.csv_path)
            .map_err(|e| format!("Failed to open database file: {}", e))?;

        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);
        let mut records = Vec::new();

        for result in reader.records() {
            records.push(result.map_err(|e| format!("Failed to read record: {}", e))?);
        }

        Ok(records)
    }

    // Convert a Booking to its CSV representation
    fn booking_to_record(booking: &Booking) -> Result<StringRecord, String> {
        let location = match &booking.location {
            Some(BookingLocation::Plain(s)) => s.clone(),
            Some(structured) => serde_json::to_string(structured)
                .map_err(|e| format!("Failed to serialize location: {}", e))?,
            None => String::new(),
        };

        let metadata = serde_json::to_string(&booking.metadata)
            .map_err(|e| format!("Failed to serialize metadata: {}", e))?;

        Ok(StringRecord::from(vec![
            booking.id.to_string(),
            booking.uid.clone(),
            booking.user_id.to_string(),
            booking.title.clone(),
            booking
                .start_time
                .map(|t| t.to_rfc3339())
                .unwrap_or_default(),
            location,
            metadata,
        ]))
    }

    // Convert a StringRecord back into a Booking
    fn record_to_booking(record: &StringRecord) -> Result<Booking, String> {
        if record.len() < 7 {
            return Err(format!(
                "Invalid record length: {}. Expected at least 7 fields.",
                record.len()
            ));
        }

        let get_field = |idx: usize| record.get(idx).unwrap_or("").to_string();

        let id = get_field(0)
            .parse::<i64>()
            .map_err(|e| format!("Invalid booking id: {}", e))?;
        let user_id = get_field(2)
            .parse::<i64>()
            .map_err(|e| format!("Invalid user id: {}", e))?;

        let start_time = match record.get(4) {
            Some("") | None => None,
            Some(raw) => Some(
                DateTime::parse_from_rfc3339(raw)
                    .map_err(|e| format!("Invalid start time: {}", e))?
                    .with_timezone(&Utc),
            ),
        };

        // Location column holds either a JSON object or a free-form string
        let location = match record.get(5) {
            Some("") | None => None,
            Some(raw) if raw.trim_start().starts_with('{') => Some(
                serde_json::from_str::<BookingLocation>(raw)
                    .unwrap_or_else(|_| BookingLocation::Plain(raw.to_string())),
            ),
            Some(raw) => Some(BookingLocation::Plain(raw.to_string())),
        };

        let metadata = match record.get(6) {
            Some("") | None => BookingMetadata::default(),
            Some(raw) => serde_json::from_str::<BookingMetadata>(raw)
                .map_err(|e| format!("Invalid metadata document: {}", e))?,
        };

        Ok(Booking {
            id,
            uid: get_field(1),
            user_id,
            title: get_field(3),
            start_time,
            location,
            metadata,
        })
    }
}

// Create a singleton booking store
pub fn create_booking_store() -> Arc<BookingStore> {
    // Default path with environment variable override
    let default_path = "/app/data/bookings.csv";
    let csv_path =
        std::env::var("BOOKING_DATABASE_PATH").unwrap_or_else(|_| default_path.to_string());

    // Create the data directory if it doesn't exist and we're using the default path
    if csv_path == default_path {
        let dir = std::path::Path::new(default_path).parent().unwrap();
        if let Err(e) = std::fs::create_dir_all(dir) {
            tracing::error!("Failed to create data directory: {}", e);
            panic!("Failed to create data directory: {}", e);
        }
    }

    Arc::new(BookingStore::new(&csv_path))
}

//! CSV fixtures and a seeded in-memory store for tests

use std::path::{Path, PathBuf};

use crate::models::DataTable;
use crate::repository::Database;

pub const AIRPORTS_HEADER: &str = "\"id\",\"ident\",\"type\",\"name\",\"latitude_deg\",\"longitude_deg\",\"elevation_ft\",\"continent\",\"iso_country\",\"iso_region\",\"municipality\",\"scheduled_service\",\"icao_code\",\"iata_code\",\"gps_code\",\"local_code\",\"home_link\",\"wikipedia_link\",\"keywords\"";

pub const GENEVA: &str = "2474,\"LSGG\",\"large_airport\",\"Geneva International Airport\",46.23809814453125,6.108950138092041,1411,\"EU\",\"CH\",\"CH-GE\",\"Geneva\",\"yes\",\"LSGG\",\"GVA\",\"LSGG\",,\"http://www.gva.ch/\",\"https://en.wikipedia.org/wiki/Geneva_Airport\",\"Cointrin\"";

pub const JFK: &str = "3622,\"KJFK\",\"large_airport\",\"John F Kennedy International Airport\",40.639447,-73.779317,13,\"NA\",\"US\",\"US-NY\",\"New York\",\"yes\",\"KJFK\",\"JFK\",\"KJFK\",\"JFK\",\"https://www.jfkairport.com/\",\"https://en.wikipedia.org/wiki/John_F._Kennedy_International_Airport\",\"Manhattan, New York City, NYC, Idlewild, IDL, KIDL\"";

pub const NO_ELEVATION: &str = "6523,\"00A\",\"heliport\",\"Total RF Heliport\",40.070985,-74.933689,,\"NA\",\"US\",\"US-PA\",\"Bensalem\",\"no\",\"\",\"\",\"K00A\",\"00A\",\"https://www.penndot.pa.gov/TravelInPA/airports-pa/Pages/Total-RF-Heliport.aspx\",\"\",\"\"";

pub const COUNTRIES_HEADER: &str =
    "\"id\",\"code\",\"name\",\"continent\",\"wikipedia_link\",\"keywords\"";

pub const SWITZERLAND: &str = "302755,\"CH\",\"Switzerland\",\"EU\",\"https://en.wikipedia.org/wiki/Switzerland\",\"Swiss\"";

pub const FRANCE: &str =
    "302659,\"FR\",\"France\",\"EU\",\"https://en.wikipedia.org/wiki/France\",\"French\"";

/// Write a CSV fixture made of a header and rows
pub fn write_csv(dir: &Path, table: DataTable, header: &str, rows: &[&str]) -> PathBuf {
    let path = dir.join(table.csv_file_name());
    let mut content = String::from(header);
    content.push('\n');
    for row in rows {
        content.push_str(row);
        content.push('\n');
    }
    std::fs::write(&path, content).expect("write csv fixture");
    path
}

/// In-memory store loaded with the standard airport and country fixtures
pub async fn seeded_database(dir: &Path) -> Database {
    let db = Database::in_memory().await.expect("in-memory database");
    let airports = write_csv(
        dir,
        DataTable::Airports,
        AIRPORTS_HEADER,
        &[GENEVA, JFK, NO_ELEVATION],
    );
    let countries = write_csv(
        dir,
        DataTable::Countries,
        COUNTRIES_HEADER,
        &[SWITZERLAND, FRANCE],
    );
    db.load_csv(DataTable::Airports, &airports)
        .await
        .expect("load airports");
    db.load_csv(DataTable::Countries, &countries)
        .await
        .expect("load countries");
    db
}

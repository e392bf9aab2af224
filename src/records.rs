use std::collections::HashMap;
use std::error::Error;
use std::fs::File;
use std::path::Path;

use super::geometry::GeoPoint;


type Row = HashMap<String, String>;

fn field<'a>(row: &'a Row, column: &str) -> Result<&'a str, Box<dyn Error>> {
    match row.get(column) {
        Some(value) => Ok(value.trim()),
        None => Err(format!("missing column {}", column).into()),
    }
}

fn position_of_row(row: &Row, lat_column: &str, lon_column: &str) -> Option<GeoPoint> {
    let lat: f64 = field(row, lat_column).ok()?.parse().ok()?;
    let lon: f64 = field(row, lon_column).ok()?.parse().ok()?;
    Some(GeoPoint::new(lat, lon))
}

/// A traffic citation, as published in the city's open data.
#[derive(PartialEq, Debug, Clone)]
pub struct Citation {
    pub id: u64,
    pub date: String,
    pub detection: String,
    pub vehicle_class: String,
    pub service_type: String,
    pub infraction: String,
    pub description: String,
    pub locality: String,
    pub position: GeoPoint,
}

impl Citation {
    /// Reads citations from a CSV file with the open-data column names.  Rows without a usable
    /// coordinate are skipped.
    pub fn all_from_csv(csvpath: &Path) -> Result<Vec<Citation>, Box<dyn Error>> {
        let file = File::open(csvpath)?;
        let mut reader = csv::Reader::from_reader(file);
        let mut citations = vec![];
        let mut skipped = 0;
        for result in reader.deserialize() {
            let row: Row = result?;
            let position = match position_of_row(&row, "LATITUD", "LONGITUD") {
                Some(position) => position,
                None => {
                    skipped += 1;
                    continue;
                }
            };
            citations.push(Citation {
                id: field(&row, "OBJECTID")?.parse()?,
                date: field(&row, "FECHA_HORA")?.to_string(),
                detection: field(&row, "MEDIO_DETE")?.to_string(),
                vehicle_class: field(&row, "CLASE_VEHI")?.to_string(),
                service_type: field(&row, "TIPO_SERVI")?.to_string(),
                infraction: field(&row, "INFRACCION")?.to_string(),
                description: field(&row, "DES_INFRAC")?.to_string(),
                locality: field(&row, "LOCALIDAD")?.to_string(),
                position,
            });
        }
        if skipped > 0 {
            log::warn!("skipped {} citations without coordinates in {}", skipped,
                       csvpath.display());
        }
        log::info!("read {} citations", citations.len());
        Ok(citations)
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct PoliceStation {
    pub id: u64,
    pub name: String,
    pub position: GeoPoint,
}

impl PoliceStation {
    pub fn all_from_csv(csvpath: &Path) -> Result<Vec<PoliceStation>, Box<dyn Error>> {
        let file = File::open(csvpath)?;
        let mut reader = csv::Reader::from_reader(file);
        let mut stations = vec![];
        for result in reader.deserialize() {
            let row: Row = result?;
            let position = position_of_row(&row, "EPOLATITUD", "EPOLONGITU")
                .ok_or_else(|| format!("station {:?} has no coordinates", row.get("OBJECTID")))?;
            stations.push(PoliceStation {
                id: field(&row, "OBJECTID")?.parse()?,
                name: field(&row, "EPODESCRIP")?.to_string(),
                position,
            });
        }
        log::info!("read {} police stations", stations.len());
        Ok(stations)
    }
}

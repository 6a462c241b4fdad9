use super::domain::PropertyListing;
use serde::Deserialize;
use std::io::Read;
use tracing::warn;

pub(crate) fn parse_listings<R: Read>(reader: R) -> Result<Vec<PropertyListing>, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);
    csv_reader.headers()?;

    let mut listings = Vec::new();
    for (index, record) in csv_reader.deserialize::<PropertyRow>().enumerate() {
        match record {
            Ok(row) => match row.into_listing() {
                Some(listing) => listings.push(listing),
                None => warn!(row = index + 1, "skipping listing without coordinates"),
            },
            Err(err) => warn!(row = index + 1, error = %err, "skipping malformed listing row"),
        }
    }

    Ok(listings)
}

#[derive(Debug, Deserialize)]
struct PropertyRow {
    #[serde(rename = "RegionID")]
    region_id: i64,
    zipcode: String,
    #[serde(rename = "City")]
    city: String,
    #[serde(rename = "State")]
    state: String,
    price: f64,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl PropertyRow {
    fn into_listing(self) -> Option<PropertyListing> {
        let latitude = self.latitude.filter(|value| value.is_finite())?;
        let longitude = self.longitude.filter(|value| value.is_finite())?;

        Some(PropertyListing {
            id: self.region_id.to_string(),
            region_id: self.region_id,
            region_name: self.city.clone(),
            metro: format!("{} Metro", self.city),
            county_name: format!("{} County", self.city),
            city: self.city,
            state: self.state,
            price: self.price,
            latitude,
            longitude,
            zipcode: self.zipcode,
        })
    }
}

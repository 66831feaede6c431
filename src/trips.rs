//! Trip record types: raw loader rows, the payment-type enumeration, and
//! cleaned trips with their derived fields.

use chrono::{NaiveDateTime, Weekday};
use serde::{Serialize, Serializer};

/// Column names the loader must supply. Cleaning fails if any is absent.
pub const PICKUP_TIME: &str = "tpep_pickup_datetime";
pub const DROPOFF_TIME: &str = "tpep_dropoff_datetime";
pub const PICKUP_LOCATION: &str = "PULocationID";
pub const DROPOFF_LOCATION: &str = "DOLocationID";
pub const TRIP_DISTANCE: &str = "trip_distance";
pub const FARE_AMOUNT: &str = "fare_amount";
pub const PAYMENT_TYPE: &str = "payment_type";

pub const REQUIRED_COLUMNS: [&str; 7] = [
    PICKUP_TIME,
    DROPOFF_TIME,
    PICKUP_LOCATION,
    DROPOFF_LOCATION,
    TRIP_DISTANCE,
    FARE_AMOUNT,
    PAYMENT_TYPE,
];

/// One trip as delivered by the loader. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTrip {
    pub pickup_time: Option<NaiveDateTime>,
    pub dropoff_time: Option<NaiveDateTime>,
    pub pickup_location_id: Option<u32>,
    pub dropoff_location_id: Option<u32>,
    pub trip_distance: Option<f64>,
    pub fare_amount: Option<f64>,
    pub payment_type: Option<i64>,
}

/// Raw rows plus the set of columns that were present in the source.
#[derive(Debug, Clone, Default)]
pub struct RawTripTable {
    pub columns: Vec<String>,
    pub rows: Vec<RawTrip>,
}

impl RawTripTable {
    /// A table whose schema carries every required column.
    pub fn with_rows(rows: Vec<RawTrip>) -> Self {
        Self {
            columns: REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect(),
            rows,
        }
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

/// Payment method, mapped from the integer code in the raw data.
///
/// Mapping is total: code 5, null, and anything outside the fixed
/// enumeration all land on [`PaymentType::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PaymentType {
    CreditCard,
    Cash,
    NoCharge,
    Dispute,
    VoidedTrip,
    Unknown,
}

impl PaymentType {
    pub const ALL: [PaymentType; 6] = [
        PaymentType::CreditCard,
        PaymentType::Cash,
        PaymentType::NoCharge,
        PaymentType::Dispute,
        PaymentType::VoidedTrip,
        PaymentType::Unknown,
    ];

    pub fn from_code(code: Option<i64>) -> Self {
        match code {
            Some(1) => PaymentType::CreditCard,
            Some(2) => PaymentType::Cash,
            Some(3) => PaymentType::NoCharge,
            Some(4) => PaymentType::Dispute,
            Some(6) => PaymentType::VoidedTrip,
            _ => PaymentType::Unknown,
        }
    }

    /// Representative raw code, used when turning a cleaned trip back into a raw row.
    pub fn code(self) -> i64 {
        match self {
            PaymentType::CreditCard => 1,
            PaymentType::Cash => 2,
            PaymentType::NoCharge => 3,
            PaymentType::Dispute => 4,
            PaymentType::Unknown => 5,
            PaymentType::VoidedTrip => 6,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentType::CreditCard => "Credit Card",
            PaymentType::Cash => "Cash",
            PaymentType::NoCharge => "No Charge",
            PaymentType::Dispute => "Dispute",
            PaymentType::VoidedTrip => "Voided Trip",
            PaymentType::Unknown => "Unknown",
        }
    }

    /// Parses a display label, ignoring case and surrounding whitespace.
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.label().eq_ignore_ascii_case(wanted))
    }
}

impl std::fmt::Display for PaymentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for PaymentType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Canonical weekday order, Monday first.
pub const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

pub fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

pub(crate) fn serialize_weekday<S: Serializer>(day: &Weekday, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(weekday_name(*day))
}

/// A validated trip with derived fields attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleanTrip {
    pub pickup_time: NaiveDateTime,
    pub dropoff_time: NaiveDateTime,
    pub pickup_location_id: u32,
    pub dropoff_location_id: u32,
    pub trip_distance: f64,
    pub fare_amount: f64,
    pub payment_type: PaymentType,

    // derived
    pub duration_minutes: f64,
    pub pickup_hour: u32,
    #[serde(serialize_with = "serialize_weekday")]
    pub pickup_weekday: Weekday,
    pub speed_mph: f64,
}

impl From<&CleanTrip> for RawTrip {
    fn from(trip: &CleanTrip) -> Self {
        RawTrip {
            pickup_time: Some(trip.pickup_time),
            dropoff_time: Some(trip.dropoff_time),
            pickup_location_id: Some(trip.pickup_location_id),
            dropoff_location_id: Some(trip.dropoff_location_id),
            trip_distance: Some(trip.trip_distance),
            fare_amount: Some(trip.fare_amount),
            payment_type: Some(trip.payment_type.code()),
        }
    }
}

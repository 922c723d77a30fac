pub mod bookings;
pub mod urls;

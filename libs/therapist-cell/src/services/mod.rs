pub mod booking;
pub mod intake;
pub mod therapist;

pub use booking::BookingService;
pub use intake::CredentialsService;
pub use therapist::TherapistService;
